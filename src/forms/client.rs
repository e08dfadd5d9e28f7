use std::io::Read;

use serde::Deserialize;
use validator::Validate;

use crate::domain::client::{ClientGroup, NewClient, PlanTier, ServiceDay, UpdateClient};
use crate::domain::types::{Address, ClientEmail, ClientId, ClientName, Notes, PhoneNumber};
use crate::forms::{FormError, invalid_value};

#[derive(Clone, Debug, Deserialize, Validate)]
/// Form data for registering a new client.
pub struct AddClientForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(length(min = 1))]
    pub phone: String,
    #[validate(email)]
    pub email: String,
    /// `A`, `B` or `C`.
    pub group: String,
    /// `semanal`, `quincenal` or `mensual`.
    pub plan: String,
    /// Spanish weekday name, e.g. `lunes`.
    pub service_day: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Clone, Debug, Deserialize, Validate)]
/// Form data for updating an existing client.
pub struct SaveClientForm {
    /// Client identifier.
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(nested)]
    #[serde(flatten)]
    pub fields: AddClientForm,
}

#[derive(Deserialize, Validate)]
/// Form data for appending an observation to a client's history.
pub struct AddClientNoteForm {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1))]
    pub text: String,
}

/// Validated payload for [`SaveClientForm`].
pub struct SaveClientPayload {
    pub id: ClientId,
    pub updates: UpdateClient,
}

/// Validated payload for [`AddClientNoteForm`].
pub struct AddClientNotePayload {
    pub id: ClientId,
    pub text: Notes,
}

impl TryFrom<AddClientForm> for NewClient {
    type Error = FormError;

    fn try_from(form: AddClientForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(NewClient {
            name: ClientName::new(form.name).map_err(|_| FormError::InvalidName)?,
            address: Address::new(form.address).map_err(|_| FormError::InvalidAddress)?,
            phone: PhoneNumber::new(form.phone).map_err(|_| FormError::InvalidPhoneNumber)?,
            email: ClientEmail::new(form.email).map_err(|_| FormError::InvalidEmail)?,
            group: ClientGroup::try_from(form.group.as_str()).map_err(invalid_value)?,
            plan: PlanTier::try_from(form.plan.as_str()).map_err(invalid_value)?,
            service_day: ServiceDay::try_from(form.service_day.as_str())
                .map_err(invalid_value)?,
            notes: Notes::new(form.notes),
        })
    }
}

impl TryFrom<SaveClientForm> for SaveClientPayload {
    type Error = FormError;

    fn try_from(form: SaveClientForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let id = ClientId::new(form.id).map_err(|_| FormError::InvalidId)?;
        let new_client = NewClient::try_from(form.fields)?;
        Ok(Self {
            id,
            updates: UpdateClient {
                name: new_client.name,
                address: new_client.address,
                phone: new_client.phone,
                email: new_client.email,
                group: new_client.group,
                plan: new_client.plan,
                service_day: new_client.service_day,
                notes: new_client.notes,
            },
        })
    }
}

impl TryFrom<AddClientNoteForm> for AddClientNotePayload {
    type Error = FormError;

    fn try_from(form: AddClientNoteForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let text = Notes::new(form.text);
        if text.is_empty() {
            return Err(FormError::InvalidValue("note cannot be empty".to_string()));
        }
        Ok(Self {
            id: ClientId::new(form.id).map_err(|_| FormError::InvalidId)?,
            text,
        })
    }
}

/// Reads clients from CSV with a header row.
///
/// Recognized columns are `name`, `address`, `phone`, `email`, `group`, `plan`,
/// `service_day` and `notes`; any other column is ignored. A single invalid
/// row rejects the whole file.
pub fn parse_clients_csv<R: Read>(reader: R) -> Result<Vec<NewClient>, FormError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut clients = Vec::new();

    for (index, record) in rdr.deserialize::<AddClientForm>().enumerate() {
        let form = record?;
        let client = NewClient::try_from(form)
            .map_err(|err| FormError::Csv(format!("row {}: {err}", index + 1)))?;
        clients.push(client);
    }

    Ok(clients)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> AddClientForm {
        AddClientForm {
            name: "Villa Hermosa".to_string(),
            address: "Calle Las Flores 456".to_string(),
            phone: "+502 2345-6789".to_string(),
            email: "Info@VillaHermosa.com".to_string(),
            group: "B".to_string(),
            plan: "quincenal".to_string(),
            service_day: "miércoles".to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn add_form_builds_typed_client() {
        let client = NewClient::try_from(form()).expect("valid form");
        assert_eq!(client.email.as_str(), "info@villahermosa.com");
        assert_eq!(client.plan, PlanTier::Biweekly);
        assert_eq!(client.service_day, ServiceDay::Wednesday);
    }

    #[test]
    fn missing_name_is_rejected() {
        let mut form = form();
        form.name = String::new();
        assert!(matches!(
            NewClient::try_from(form),
            Err(FormError::Validation(_))
        ));
    }

    #[test]
    fn unknown_plan_is_rejected() {
        let mut form = form();
        form.plan = "anual".to_string();
        assert!(matches!(
            NewClient::try_from(form),
            Err(FormError::InvalidValue(_))
        ));
    }

    #[test]
    fn csv_import_reads_all_rows() {
        let data = "name,address,phone,email,group,plan,service_day,notes,extra\n\
                    Villa Rosa,Av. Principal 123,+502 2234-5678,villa.rosa@email.com,A,semanal,lunes,,x\n\
                    Los Pinos,Calle 45 #78-90,+502 2345-6789,lospinos@email.com,B,quincenal,miércoles,Portón azul,y\n";

        let clients = parse_clients_csv(data.as_bytes()).expect("csv parses");

        assert_eq!(clients.len(), 2);
        assert_eq!(clients[1].name.as_str(), "Los Pinos");
        assert_eq!(clients[1].notes.as_str(), "Portón azul");
    }

    #[test]
    fn csv_import_rejects_invalid_row() {
        let data = "name,address,phone,email,group,plan,service_day\n\
                    Villa Rosa,Av. Principal 123,+502 2234-5678,not-an-email,A,semanal,lunes\n";

        assert!(matches!(
            parse_clients_csv(data.as_bytes()),
            Err(FormError::Csv(_))
        ));
    }
}
