use serde::Serialize;

use crate::domain::client::Client;

/// Data required to render the clients list.
#[derive(Debug, Serialize)]
pub struct ClientsPageData {
    pub clients: Vec<Client>,
    /// Matches before pagination.
    pub total: usize,
    pub search_query: Option<String>,
}
