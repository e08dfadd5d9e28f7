//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::client::Client;
use crate::domain::crew::Crew;
use crate::domain::types::{ClientId, CrewId, UserEmail, VisitId};
use crate::domain::user::User;
use crate::domain::visit::Visit;
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    ClientListQuery, ClientReader, ClientWriter, CrewListQuery, CrewReader, CrewWriter,
    UserReader, VisitListQuery, VisitReader, VisitWriter,
};

mock! {
    pub Repository {}

    impl ClientReader for Repository {
        fn get_client_by_id(&self, id: &ClientId) -> RepositoryResult<Option<Client>>;
        fn list_clients(&self, query: &ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)>;
    }

    impl ClientWriter for Repository {
        fn create_clients(&self, new_clients: &[Client]) -> RepositoryResult<usize>;
        fn replace_client(&self, client: &Client) -> RepositoryResult<Client>;
    }

    impl CrewReader for Repository {
        fn get_crew_by_id(&self, id: &CrewId) -> RepositoryResult<Option<Crew>>;
        fn list_crews(&self, query: &CrewListQuery) -> RepositoryResult<Vec<Crew>>;
    }

    impl CrewWriter for Repository {
        fn create_crew(&self, crew: &Crew) -> RepositoryResult<Crew>;
        fn replace_crew(&self, crew: &Crew) -> RepositoryResult<Crew>;
    }

    impl VisitReader for Repository {
        fn get_visit_by_id(&self, id: &VisitId) -> RepositoryResult<Option<Visit>>;
        fn list_visits(&self, query: &VisitListQuery) -> RepositoryResult<(usize, Vec<Visit>)>;
    }

    impl VisitWriter for Repository {
        fn create_visit(&self, visit: &Visit) -> RepositoryResult<Visit>;
        fn replace_visit(&self, visit: &Visit) -> RepositoryResult<Visit>;
    }

    impl UserReader for Repository {
        fn get_user_by_email(&self, email: &UserEmail) -> RepositoryResult<Option<User>>;
    }
}
