//! Initial data loaded into the in-memory store.

use std::path::Path;

use chrono::{Days, NaiveDate};
use serde::Deserialize;

use crate::domain::client::{Client, ClientGroup, PlanTier, ServiceDay};
use crate::domain::crew::Crew;
use crate::domain::types::{
    Address, ClientEmail, ClientId, ClientName, CrewId, CrewName, Notes, PersonName, PhoneNumber,
    TaskName, TypeConstraintError, UserEmail, UserId, VisitId,
};
use crate::domain::user::{User, UserRole};
use crate::domain::visit::{Visit, VisitStatus};
use crate::repository::errors::RepositoryResult;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub crews: Vec<Crew>,
    #[serde(default)]
    pub visits: Vec<Visit>,
    #[serde(default)]
    pub users: Vec<User>,
}

impl Seed {
    pub fn from_json_str(content: &str) -> RepositoryResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> RepositoryResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Demo accounts, crews and users; visits are placed on `today` and the day after.
    pub fn demo(today: NaiveDate) -> Result<Self, TypeConstraintError> {
        let clients = vec![
            demo_client(
                "1",
                "Jardines del Norte S.A.",
                "Av. Principal 123, Zona Norte",
                "+502 2234-5678",
                "contacto@jardinesnorte.com",
                (ClientGroup::A, PlanTier::Weekly, ServiceDay::Monday),
                "2024-01-15",
                "Cliente VIP, requiere atención especial en temporada de lluvia",
            )?,
            demo_client(
                "2",
                "Villa Hermosa",
                "Calle Las Flores 456, Villa Hermosa",
                "+502 2345-6789",
                "info@villahermosa.com",
                (ClientGroup::B, PlanTier::Biweekly, ServiceDay::Wednesday),
                "2024-02-01",
                "Acceso por portón lateral",
            )?,
            demo_client(
                "3",
                "Residencia El Roble",
                "Carrera 12 #34-56",
                "+502 2456-7890",
                "elroble@email.com",
                (ClientGroup::C, PlanTier::Monthly, ServiceDay::Friday),
                "2024-01-25",
                "",
            )?,
        ];

        let crews = vec![
            demo_crew(
                "1",
                "Equipo Alpha",
                ("3", "Carlos Hernández"),
                &["Carlos Hernández", "José Martínez"],
            )?,
            demo_crew(
                "2",
                "Equipo Beta",
                ("4", "Ana García"),
                &["Ana García", "Luis Rodríguez"],
            )?,
        ];

        let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);
        let visits = vec![
            demo_visit("1", &clients[0], &crews[0], today)?,
            demo_visit("2", &clients[1], &crews[1], tomorrow)?,
        ];

        let users = vec![
            demo_user(
                "1",
                "Administrador Sistema",
                "admin@jardineria.com",
                UserRole::Administrator,
                None,
            )?,
            demo_user(
                "2",
                "María López",
                "maria@jardineria.com",
                UserRole::LogisticsOperator,
                None,
            )?,
            demo_user(
                "3",
                "Carlos Hernández",
                "carlos@jardineria.com",
                UserRole::Supervisor,
                Some("1"),
            )?,
        ];

        Ok(Self {
            clients,
            crews,
            visits,
            users,
        })
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, TypeConstraintError> {
    crate::calendar::parse_calendar_date(value)
}

#[allow(clippy::too_many_arguments)]
fn demo_client(
    id: &str,
    name: &str,
    address: &str,
    phone: &str,
    email: &str,
    (group, plan, service_day): (ClientGroup, PlanTier, ServiceDay),
    registered_on: &str,
    notes: &str,
) -> Result<Client, TypeConstraintError> {
    Ok(Client {
        id: ClientId::new(id)?,
        name: ClientName::new(name)?,
        address: Address::new(address)?,
        phone: PhoneNumber::new(phone)?,
        email: ClientEmail::new(email)?,
        group,
        plan,
        service_day,
        registered_on: parse_date(registered_on)?,
        active: true,
        notes: Notes::new(notes),
        history: Vec::new(),
    })
}

fn demo_crew(
    id: &str,
    name: &str,
    (supervisor_id, supervisor_name): (&str, &str),
    members: &[&str],
) -> Result<Crew, TypeConstraintError> {
    Ok(Crew {
        id: CrewId::new(id)?,
        name: CrewName::new(name)?,
        supervisor_id: UserId::new(supervisor_id)?,
        supervisor_name: PersonName::new(supervisor_name)?,
        active: true,
        members: members
            .iter()
            .map(|member| PersonName::new(*member))
            .collect::<Result<_, _>>()?,
    })
}

fn demo_visit(
    id: &str,
    client: &Client,
    crew: &Crew,
    scheduled_on: NaiveDate,
) -> Result<Visit, TypeConstraintError> {
    Ok(Visit {
        id: VisitId::new(id)?,
        client_id: client.id.clone(),
        client_name: client.name.clone(),
        crew_id: crew.id.clone(),
        crew_name: crew.name.clone(),
        scheduled_on,
        completed_at: None,
        status: VisitStatus::Scheduled,
        planned_tasks: client
            .plan
            .default_tasks()
            .iter()
            .map(|task| TaskName::new(*task))
            .collect::<Result<_, _>>()?,
        completed_tasks: Vec::new(),
        extra_tasks: Vec::new(),
        notes: Notes::default(),
        total_minutes: None,
    })
}

fn demo_user(
    id: &str,
    name: &str,
    email: &str,
    role: UserRole,
    crew_id: Option<&str>,
) -> Result<User, TypeConstraintError> {
    Ok(User {
        id: UserId::new(id)?,
        name: PersonName::new(name)?,
        email: UserEmail::new(email)?,
        role,
        crew_id: crew_id.map(CrewId::new).transpose()?,
        active: true,
        registered_on: parse_date("2024-01-01")?,
    })
}
