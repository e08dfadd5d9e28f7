//! Predicate combinators used to narrow in-memory collections.
//!
//! Filtering never mutates or reorders its input: the result is always the
//! subsequence of items accepted by the predicate, so applying the same
//! predicate twice yields the same collection.

use chrono::NaiveDate;
use serde::Serialize;

/// A categorical predicate. [`Choice::All`] accepts every value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Choice<T> {
    All,
    Only(T),
}

impl<T: PartialEq> Choice<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(expected) => expected == value,
        }
    }
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Choice::All
    }
}

impl<T> From<Option<T>> for Choice<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Choice::Only(value),
            None => Choice::All,
        }
    }
}

/// Anything that can accept or reject an item of type `T`.
pub trait Predicate<T> {
    fn matches(&self, item: &T) -> bool;
}

impl<T, F> Predicate<T> for F
where
    F: Fn(&T) -> bool,
{
    fn matches(&self, item: &T) -> bool {
        self(item)
    }
}

/// Returns the items accepted by `predicate`, preserving their relative order.
pub fn apply<T, P>(items: &[T], predicate: &P) -> Vec<T>
where
    T: Clone,
    P: Predicate<T> + ?Sized,
{
    items
        .iter()
        .filter(|item| predicate.matches(item))
        .cloned()
        .collect()
}

/// Case-insensitive free-text term. An empty term matches everything.
///
/// The term is matched as typed, surrounding whitespace included.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextSearch(Option<String>);

impl TextSearch {
    pub fn new(term: impl AsRef<str>) -> Self {
        let normalized = term.as_ref().to_lowercase();
        if normalized.is_empty() {
            Self(None)
        } else {
            Self(Some(normalized))
        }
    }

    pub fn term(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// True when the term occurs in at least one of `fields`.
    pub fn matches_any(&self, fields: &[&str]) -> bool {
        match &self.0 {
            None => true,
            Some(term) => fields
                .iter()
                .any(|field| field.to_lowercase().contains(term.as_str())),
        }
    }
}

/// Inclusive range of calendar dates.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Builds a range, swapping the bounds if they arrive reversed.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
