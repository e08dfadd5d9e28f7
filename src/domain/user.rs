use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CrewId, PersonName, UserEmail, UserId};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum UserRole {
    #[serde(rename = "administrador")]
    Administrator,
    #[serde(rename = "operador_logistico")]
    LogisticsOperator,
    /// Crew supervisor working from a route sheet.
    #[serde(rename = "encargado")]
    Supervisor,
}

/// Dashboard user profile. This is the record kept in session storage.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub name: PersonName,
    pub email: UserEmail,
    pub role: UserRole,
    pub crew_id: Option<CrewId>,
    pub active: bool,
    pub registered_on: NaiveDate,
}
