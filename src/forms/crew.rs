use serde::Deserialize;
use validator::Validate;

use crate::domain::crew::{NewCrew, UpdateCrew};
use crate::domain::types::{CrewId, CrewName, PersonName, UserId};
use crate::forms::FormError;

#[derive(Clone, Deserialize, Validate)]
/// Form data for creating a crew.
pub struct AddCrewForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub supervisor_id: String,
    #[validate(length(min = 1))]
    pub supervisor_name: String,
    /// Member names; blank entries are skipped.
    #[serde(default)]
    pub members: Vec<String>,
}

#[derive(Deserialize, Validate)]
/// Form data for editing a crew.
pub struct SaveCrewForm {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(nested)]
    #[serde(flatten)]
    pub fields: AddCrewForm,
}

pub struct SaveCrewPayload {
    pub id: CrewId,
    pub updates: UpdateCrew,
}

fn member_names(raw: Vec<String>) -> Vec<PersonName> {
    raw.into_iter()
        .filter_map(|member| PersonName::new(member).ok())
        .collect()
}

impl TryFrom<AddCrewForm> for NewCrew {
    type Error = FormError;

    fn try_from(form: AddCrewForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(NewCrew {
            name: CrewName::new(form.name).map_err(|_| FormError::InvalidName)?,
            supervisor_id: UserId::new(form.supervisor_id).map_err(|_| FormError::InvalidId)?,
            supervisor_name: PersonName::new(form.supervisor_name)
                .map_err(|_| FormError::InvalidName)?,
            members: member_names(form.members),
        })
    }
}

impl TryFrom<SaveCrewForm> for SaveCrewPayload {
    type Error = FormError;

    fn try_from(form: SaveCrewForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let id = CrewId::new(form.id).map_err(|_| FormError::InvalidId)?;
        let crew = NewCrew::try_from(form.fields)?;
        Ok(Self {
            id,
            updates: UpdateCrew {
                name: crew.name,
                supervisor_id: crew.supervisor_id,
                supervisor_name: crew.supervisor_name,
                members: crew.members,
            },
        })
    }
}
