use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    Address, ClientEmail, ClientId, ClientName, HistoryEntryId, Notes, PhoneNumber,
    TypeConstraintError,
};

/// Client categorization tag, unrelated to the billing plan.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ClientGroup {
    A,
    B,
    C,
}

impl ClientGroup {
    pub const ALL: [ClientGroup; 3] = [ClientGroup::A, ClientGroup::B, ClientGroup::C];

    pub fn as_str(self) -> &'static str {
        match self {
            ClientGroup::A => "A",
            ClientGroup::B => "B",
            ClientGroup::C => "C",
        }
    }
}

impl TryFrom<&str> for ClientGroup {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "A" | "a" => Ok(ClientGroup::A),
            "B" | "b" => Ok(ClientGroup::B),
            "C" | "c" => Ok(ClientGroup::C),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown client group `{other}`"
            ))),
        }
    }
}

/// Billing frequency of a client account.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PlanTier {
    #[serde(rename = "semanal")]
    Weekly,
    #[serde(rename = "quincenal")]
    Biweekly,
    #[serde(rename = "mensual")]
    Monthly,
}

impl PlanTier {
    pub fn as_str(self) -> &'static str {
        match self {
            PlanTier::Weekly => "semanal",
            PlanTier::Biweekly => "quincenal",
            PlanTier::Monthly => "mensual",
        }
    }

    /// Ordered task list seeded into every new visit for a client on this plan.
    pub fn default_tasks(self) -> &'static [&'static str] {
        match self {
            PlanTier::Weekly => &["Poda de césped", "Riego de plantas", "Limpieza general"],
            PlanTier::Biweekly => &[
                "Mantenimiento de jardines",
                "Poda de arbustos",
                "Fertilización",
            ],
            PlanTier::Monthly => &[
                "Mantenimiento completo",
                "Poda general",
                "Tratamiento de plagas",
            ],
        }
    }
}

impl TryFrom<&str> for PlanTier {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "semanal" | "weekly" => Ok(PlanTier::Weekly),
            "quincenal" | "biweekly" => Ok(PlanTier::Biweekly),
            "mensual" | "monthly" => Ok(PlanTier::Monthly),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown plan `{other}`"
            ))),
        }
    }
}

/// Weekday on which a client is normally serviced.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ServiceDay {
    #[serde(rename = "lunes", alias = "Lunes")]
    Monday,
    #[serde(rename = "martes", alias = "Martes")]
    Tuesday,
    #[serde(rename = "miércoles", alias = "Miércoles", alias = "miercoles")]
    Wednesday,
    #[serde(rename = "jueves", alias = "Jueves")]
    Thursday,
    #[serde(rename = "viernes", alias = "Viernes")]
    Friday,
    #[serde(rename = "sábado", alias = "Sábado", alias = "sabado")]
    Saturday,
    #[serde(rename = "domingo", alias = "Domingo")]
    Sunday,
}

impl ServiceDay {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceDay::Monday => "lunes",
            ServiceDay::Tuesday => "martes",
            ServiceDay::Wednesday => "miércoles",
            ServiceDay::Thursday => "jueves",
            ServiceDay::Friday => "viernes",
            ServiceDay::Saturday => "sábado",
            ServiceDay::Sunday => "domingo",
        }
    }
}

impl TryFrom<&str> for ServiceDay {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "lunes" => Ok(ServiceDay::Monday),
            "martes" => Ok(ServiceDay::Tuesday),
            "miércoles" | "miercoles" => Ok(ServiceDay::Wednesday),
            "jueves" => Ok(ServiceDay::Thursday),
            "viernes" => Ok(ServiceDay::Friday),
            "sábado" | "sabado" => Ok(ServiceDay::Saturday),
            "domingo" => Ok(ServiceDay::Sunday),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown weekday `{other}`"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum HistoryKind {
    #[serde(rename = "cambio_plan")]
    PlanChange,
    #[serde(rename = "observacion")]
    Observation,
    #[serde(rename = "suspension")]
    Suspension,
}

/// One entry of a client's account history.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub id: HistoryEntryId,
    pub date: NaiveDate,
    pub kind: HistoryKind,
    pub description: String,
    pub previous_plan: Option<PlanTier>,
    pub new_plan: Option<PlanTier>,
}

impl HistoryEntry {
    pub fn plan_change(date: NaiveDate, previous: PlanTier, new: PlanTier) -> Self {
        Self {
            id: HistoryEntryId::generate(),
            date,
            kind: HistoryKind::PlanChange,
            description: format!("Cambio de plan: {} → {}", previous.as_str(), new.as_str()),
            previous_plan: Some(previous),
            new_plan: Some(new),
        }
    }

    pub fn observation(date: NaiveDate, text: &Notes) -> Self {
        Self {
            id: HistoryEntryId::generate(),
            date,
            kind: HistoryKind::Observation,
            description: text.as_str().to_string(),
            previous_plan: None,
            new_plan: None,
        }
    }

    pub fn suspension(date: NaiveDate) -> Self {
        Self {
            id: HistoryEntryId::generate(),
            date,
            kind: HistoryKind::Suspension,
            description: "Servicio suspendido".to_string(),
            previous_plan: None,
            new_plan: None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub id: ClientId,
    pub name: ClientName,
    pub address: Address,
    pub phone: PhoneNumber,
    pub email: ClientEmail,
    pub group: ClientGroup,
    pub plan: PlanTier,
    pub service_day: ServiceDay,
    pub registered_on: NaiveDate,
    pub active: bool,
    pub notes: Notes,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl Client {
    /// Returns a copy with `updates` applied, recording a plan change in the history.
    pub fn updated(&self, updates: &UpdateClient, today: NaiveDate) -> Self {
        let mut history = self.history.clone();
        if updates.plan != self.plan {
            history.push(HistoryEntry::plan_change(today, self.plan, updates.plan));
        }

        Self {
            id: self.id.clone(),
            name: updates.name.clone(),
            address: updates.address.clone(),
            phone: updates.phone.clone(),
            email: updates.email.clone(),
            group: updates.group,
            plan: updates.plan,
            service_day: updates.service_day,
            registered_on: self.registered_on,
            active: self.active,
            notes: updates.notes.clone(),
            history,
        }
    }

    /// Returns a copy with the active flag set; deactivation is logged as a suspension.
    pub fn with_active(&self, active: bool, today: NaiveDate) -> Self {
        let mut client = self.clone();
        if self.active && !active {
            client.history.push(HistoryEntry::suspension(today));
        }
        client.active = active;
        client
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewClient {
    pub name: ClientName,
    pub address: Address,
    pub phone: PhoneNumber,
    pub email: ClientEmail,
    pub group: ClientGroup,
    pub plan: PlanTier,
    pub service_day: ServiceDay,
    pub notes: Notes,
}

impl NewClient {
    /// Materializes an active client registered on `today` with a fresh identifier.
    pub fn into_client(self, today: NaiveDate) -> Client {
        Client {
            id: ClientId::generate(),
            name: self.name,
            address: self.address,
            phone: self.phone,
            email: self.email,
            group: self.group,
            plan: self.plan,
            service_day: self.service_day,
            registered_on: today,
            active: true,
            notes: self.notes,
            history: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateClient {
    pub name: ClientName,
    pub address: Address,
    pub phone: PhoneNumber,
    pub email: ClientEmail,
    pub group: ClientGroup,
    pub plan: PlanTier,
    pub service_day: ServiceDay,
    pub notes: Notes,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_client() -> Client {
        NewClient {
            name: ClientName::new("Villa Hermosa").unwrap(),
            address: Address::new("Calle Las Flores 456").unwrap(),
            phone: PhoneNumber::new("+502 2345-6789").unwrap(),
            email: ClientEmail::new("info@villahermosa.com").unwrap(),
            group: ClientGroup::B,
            plan: PlanTier::Biweekly,
            service_day: ServiceDay::Wednesday,
            notes: Notes::new("Acceso por portón lateral"),
        }
        .into_client(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap())
    }

    fn update_from(client: &Client) -> UpdateClient {
        UpdateClient {
            name: client.name.clone(),
            address: client.address.clone(),
            phone: client.phone.clone(),
            email: client.email.clone(),
            group: client.group,
            plan: client.plan,
            service_day: client.service_day,
            notes: client.notes.clone(),
        }
    }

    #[test]
    fn plan_change_appends_single_history_entry() {
        let client = sample_client();
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut updates = update_from(&client);
        updates.plan = PlanTier::Monthly;

        let updated = client.updated(&updates, today);

        assert_eq!(updated.history.len(), 1);
        let entry = &updated.history[0];
        assert_eq!(entry.kind, HistoryKind::PlanChange);
        assert_eq!(entry.previous_plan, Some(PlanTier::Biweekly));
        assert_eq!(entry.new_plan, Some(PlanTier::Monthly));
        assert_eq!(updated.id, client.id);
        assert_eq!(updated.registered_on, client.registered_on);
    }

    #[test]
    fn unchanged_plan_keeps_history() {
        let client = sample_client();
        let updated = client.updated(
            &update_from(&client),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        );
        assert!(updated.history.is_empty());
    }

    #[test]
    fn deactivation_is_recorded_once() {
        let client = sample_client();
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let inactive = client.with_active(false, today);
        let still_inactive = inactive.with_active(false, today);

        assert!(!still_inactive.active);
        assert_eq!(still_inactive.history.len(), 1);
        assert_eq!(still_inactive.history[0].kind, HistoryKind::Suspension);
    }

    #[test]
    fn categorical_fields_parse_from_labels() {
        assert_eq!(PlanTier::try_from("Semanal"), Ok(PlanTier::Weekly));
        assert_eq!(ClientGroup::try_from("b"), Ok(ClientGroup::B));
        assert_eq!(ServiceDay::try_from("Miércoles"), Ok(ServiceDay::Wednesday));
        assert!(PlanTier::try_from("anual").is_err());
    }
}
