use chrono::NaiveDate;

use crate::{
    domain::{
        client::{Client, ClientGroup, PlanTier},
        crew::Crew,
        types::{ClientId, CrewId, UserEmail, VisitId},
        user::User,
        visit::{Visit, VisitStatus},
    },
    filter::{Choice, DateRange, Predicate, TextSearch},
    repository::errors::RepositoryResult,
};

pub mod errors;
pub mod memory;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod seed;

pub use memory::InMemoryRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// Slices one page out of `items`. Pages are 1-based; page 0 reads as page 1.
    /// A page past the end is empty.
    pub fn page_of<T>(&self, items: Vec<T>) -> Vec<T> {
        let page = self.page.max(1);
        items
            .into_iter()
            .skip((page - 1).saturating_mul(self.per_page))
            .take(self.per_page)
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClientListQuery {
    pub search: TextSearch,
    pub group: Choice<ClientGroup>,
    pub plan: Choice<PlanTier>,
    pub active: Choice<bool>,
    pub pagination: Option<Pagination>,
}

impl ClientListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive match against name and email.
    pub fn search(mut self, term: impl AsRef<str>) -> Self {
        self.search = TextSearch::new(term);
        self
    }

    pub fn group(mut self, group: ClientGroup) -> Self {
        self.group = Choice::Only(group);
        self
    }

    pub fn plan(mut self, plan: PlanTier) -> Self {
        self.plan = Choice::Only(plan);
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = Choice::Only(active);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

impl Predicate<Client> for ClientListQuery {
    fn matches(&self, client: &Client) -> bool {
        self.search
            .matches_any(&[client.name.as_str(), client.email.as_str()])
            && self.group.admits(&client.group)
            && self.plan.admits(&client.plan)
            && self.active.admits(&client.active)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CrewListQuery {
    pub search: TextSearch,
    pub active: Choice<bool>,
}

impl CrewListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive match against crew and supervisor names.
    pub fn search(mut self, term: impl AsRef<str>) -> Self {
        self.search = TextSearch::new(term);
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = Choice::Only(active);
        self
    }
}

impl Predicate<Crew> for CrewListQuery {
    fn matches(&self, crew: &Crew) -> bool {
        self.search
            .matches_any(&[crew.name.as_str(), crew.supervisor_name.as_str()])
            && self.active.admits(&crew.active)
    }
}

#[derive(Debug, Clone, Default)]
pub struct VisitListQuery {
    pub search: TextSearch,
    pub client: Choice<ClientId>,
    pub crew: Choice<CrewId>,
    pub status: Choice<VisitStatus>,
    pub dates: Option<DateRange>,
    pub pagination: Option<Pagination>,
}

impl VisitListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive match against client and crew names.
    pub fn search(mut self, term: impl AsRef<str>) -> Self {
        self.search = TextSearch::new(term);
        self
    }

    pub fn client(mut self, client_id: ClientId) -> Self {
        self.client = Choice::Only(client_id);
        self
    }

    pub fn crew(mut self, crew_id: CrewId) -> Self {
        self.crew = Choice::Only(crew_id);
        self
    }

    pub fn status(mut self, status: VisitStatus) -> Self {
        self.status = Choice::Only(status);
        self
    }

    pub fn between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.dates = Some(DateRange::new(start, end));
        self
    }

    pub fn on(self, date: NaiveDate) -> Self {
        self.between(date, date)
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

impl Predicate<Visit> for VisitListQuery {
    fn matches(&self, visit: &Visit) -> bool {
        self.search
            .matches_any(&[visit.client_name.as_str(), visit.crew_name.as_str()])
            && self.client.admits(&visit.client_id)
            && self.crew.admits(&visit.crew_id)
            && self.status.admits(&visit.status)
            && self
                .dates
                .is_none_or(|range| range.contains(visit.scheduled_on))
    }
}

pub trait ClientReader {
    fn get_client_by_id(&self, id: &ClientId) -> RepositoryResult<Option<Client>>;
    /// Returns the number of matches before pagination and the requested page.
    fn list_clients(&self, query: &ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)>;
}

pub trait ClientWriter {
    fn create_clients(&self, new_clients: &[Client]) -> RepositoryResult<usize>;
    /// Replaces the stored client with the same id.
    fn replace_client(&self, client: &Client) -> RepositoryResult<Client>;
}

pub trait CrewReader {
    fn get_crew_by_id(&self, id: &CrewId) -> RepositoryResult<Option<Crew>>;
    fn list_crews(&self, query: &CrewListQuery) -> RepositoryResult<Vec<Crew>>;
}

pub trait CrewWriter {
    fn create_crew(&self, crew: &Crew) -> RepositoryResult<Crew>;
    fn replace_crew(&self, crew: &Crew) -> RepositoryResult<Crew>;
}

pub trait VisitReader {
    fn get_visit_by_id(&self, id: &VisitId) -> RepositoryResult<Option<Visit>>;
    fn list_visits(&self, query: &VisitListQuery) -> RepositoryResult<(usize, Vec<Visit>)>;
}

pub trait VisitWriter {
    fn create_visit(&self, visit: &Visit) -> RepositoryResult<Visit>;
    fn replace_visit(&self, visit: &Visit) -> RepositoryResult<Visit>;
}

pub trait UserReader {
    fn get_user_by_email(&self, email: &UserEmail) -> RepositoryResult<Option<User>>;
}
