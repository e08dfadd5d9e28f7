//! In-memory store holding every collection for the lifetime of a session.
//!
//! Each write derives a new collection from the current one and swaps it in
//! whole, so readers never observe a half-applied update.

use std::cell::RefCell;

use crate::domain::client::Client;
use crate::domain::crew::Crew;
use crate::domain::types::{ClientId, CrewId, UserEmail, VisitId};
use crate::domain::user::User;
use crate::domain::visit::Visit;
use crate::filter;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::seed::Seed;
use crate::repository::{
    ClientListQuery, ClientReader, ClientWriter, CrewListQuery, CrewReader, CrewWriter,
    UserReader, VisitListQuery, VisitReader, VisitWriter,
};

#[derive(Debug, Default)]
pub struct InMemoryRepository {
    clients: RefCell<Vec<Client>>,
    crews: RefCell<Vec<Crew>>,
    visits: RefCell<Vec<Visit>>,
    users: RefCell<Vec<User>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: Seed) -> Self {
        Self {
            clients: RefCell::new(seed.clients),
            crews: RefCell::new(seed.crews),
            visits: RefCell::new(seed.visits),
            users: RefCell::new(seed.users),
        }
    }

    /// Copy of every visit in stored order.
    pub fn visits_snapshot(&self) -> Vec<Visit> {
        self.visits.borrow().clone()
    }
}

/// Returns a copy of `items` with the element matching `is_target` swapped for `updated`.
///
/// Non-matching elements are kept untouched and in order. `None` when nothing matched.
pub fn replace_by_id<T, F>(items: &[T], updated: &T, is_target: F) -> Option<Vec<T>>
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    if !items.iter().any(&is_target) {
        return None;
    }
    Some(
        items
            .iter()
            .map(|item| {
                if is_target(item) {
                    updated.clone()
                } else {
                    item.clone()
                }
            })
            .collect(),
    )
}

fn swap_in<T, F>(collection: &RefCell<Vec<T>>, updated: &T, is_target: F) -> RepositoryResult<T>
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    let next = replace_by_id(&collection.borrow(), updated, is_target)
        .ok_or(RepositoryError::NotFound)?;
    collection.replace(next);
    Ok(updated.clone())
}

fn append<T: Clone>(collection: &RefCell<Vec<T>>, new_items: &[T]) {
    let mut next = collection.borrow().clone();
    next.extend_from_slice(new_items);
    collection.replace(next);
}

fn paginate<T>(
    matches: Vec<T>,
    pagination: Option<crate::repository::Pagination>,
) -> (usize, Vec<T>) {
    let total = matches.len();
    match pagination {
        Some(pagination) => (total, pagination.page_of(matches)),
        None => (total, matches),
    }
}

impl ClientReader for InMemoryRepository {
    fn get_client_by_id(&self, id: &ClientId) -> RepositoryResult<Option<Client>> {
        Ok(self.clients.borrow().iter().find(|c| &c.id == id).cloned())
    }

    fn list_clients(&self, query: &ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)> {
        let matches = filter::apply(&self.clients.borrow(), query);
        Ok(paginate(matches, query.pagination))
    }
}

impl ClientWriter for InMemoryRepository {
    fn create_clients(&self, new_clients: &[Client]) -> RepositoryResult<usize> {
        {
            let current = self.clients.borrow();
            for (index, client) in new_clients.iter().enumerate() {
                let duplicate = current.iter().any(|c| c.id == client.id)
                    || new_clients[..index].iter().any(|c| c.id == client.id);
                if duplicate {
                    return Err(RepositoryError::ConstraintViolation(format!(
                        "client id {} already exists",
                        client.id
                    )));
                }
            }
        }
        append(&self.clients, new_clients);
        Ok(new_clients.len())
    }

    fn replace_client(&self, client: &Client) -> RepositoryResult<Client> {
        swap_in(&self.clients, client, |c| c.id == client.id)
    }
}

impl CrewReader for InMemoryRepository {
    fn get_crew_by_id(&self, id: &CrewId) -> RepositoryResult<Option<Crew>> {
        Ok(self.crews.borrow().iter().find(|c| &c.id == id).cloned())
    }

    fn list_crews(&self, query: &CrewListQuery) -> RepositoryResult<Vec<Crew>> {
        Ok(filter::apply(&self.crews.borrow(), query))
    }
}

impl CrewWriter for InMemoryRepository {
    fn create_crew(&self, crew: &Crew) -> RepositoryResult<Crew> {
        if self.crews.borrow().iter().any(|c| c.id == crew.id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "crew id {} already exists",
                crew.id
            )));
        }
        append(&self.crews, std::slice::from_ref(crew));
        Ok(crew.clone())
    }

    fn replace_crew(&self, crew: &Crew) -> RepositoryResult<Crew> {
        swap_in(&self.crews, crew, |c| c.id == crew.id)
    }
}

impl VisitReader for InMemoryRepository {
    fn get_visit_by_id(&self, id: &VisitId) -> RepositoryResult<Option<Visit>> {
        Ok(self.visits.borrow().iter().find(|v| &v.id == id).cloned())
    }

    fn list_visits(&self, query: &VisitListQuery) -> RepositoryResult<(usize, Vec<Visit>)> {
        let matches = filter::apply(&self.visits.borrow(), query);
        Ok(paginate(matches, query.pagination))
    }
}

impl VisitWriter for InMemoryRepository {
    fn create_visit(&self, visit: &Visit) -> RepositoryResult<Visit> {
        if self.visits.borrow().iter().any(|v| v.id == visit.id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "visit id {} already exists",
                visit.id
            )));
        }
        append(&self.visits, std::slice::from_ref(visit));
        Ok(visit.clone())
    }

    fn replace_visit(&self, visit: &Visit) -> RepositoryResult<Visit> {
        swap_in(&self.visits, visit, |v| v.id == visit.id)
    }
}

impl UserReader for InMemoryRepository {
    fn get_user_by_email(&self, email: &UserEmail) -> RepositoryResult<Option<User>> {
        Ok(self
            .users
            .borrow()
            .iter()
            .find(|u| &u.email == email)
            .cloned())
    }
}
