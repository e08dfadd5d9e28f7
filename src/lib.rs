//! Maintenance dashboard for a gardening company: clients, crews and visits.

pub mod calendar;
pub mod domain;
pub mod filter;

#[cfg(feature = "app")]
pub mod dto;
#[cfg(feature = "app")]
pub mod error_conversions;
#[cfg(feature = "app")]
pub mod forms;
#[cfg(feature = "app")]
pub mod models;
#[cfg(feature = "app")]
pub mod repository;
#[cfg(feature = "app")]
pub mod services;
#[cfg(feature = "app")]
pub mod session;
