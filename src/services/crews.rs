//! Services handling crew administration.

use crate::domain::crew::{Crew, NewCrew};
use crate::domain::types::CrewId;
use crate::forms::crew::{AddCrewForm, SaveCrewForm, SaveCrewPayload};
use crate::repository::{CrewListQuery, CrewReader, CrewWriter};
use crate::services::{ServiceError, ServiceResult};

fn fetch_crew<R>(repo: &R, crew_id: &CrewId) -> ServiceResult<Crew>
where
    R: CrewReader + ?Sized,
{
    repo.get_crew_by_id(crew_id)?.ok_or_else(|| {
        log::warn!("Crew {crew_id} not found");
        ServiceError::NotFound
    })
}

pub fn list_crews<R>(repo: &R, query: &CrewListQuery) -> ServiceResult<Vec<Crew>>
where
    R: CrewReader + ?Sized,
{
    repo.list_crews(query).map_err(ServiceError::from)
}

/// Validates the form and stores a new active crew.
pub fn add_crew<R>(repo: &R, form: AddCrewForm) -> ServiceResult<Crew>
where
    R: CrewWriter + ?Sized,
{
    let new_crew = NewCrew::try_from(form).map_err(|err| {
        log::error!("Failed to validate crew form: {err}");
        ServiceError::from(err)
    })?;

    repo.create_crew(&new_crew.into_crew()).map_err(|err| {
        log::error!("Failed to add a crew: {err}");
        ServiceError::from(err)
    })
}

pub fn update_crew<R>(repo: &R, form: SaveCrewForm) -> ServiceResult<Crew>
where
    R: CrewReader + CrewWriter + ?Sized,
{
    let SaveCrewPayload { id, updates } = SaveCrewPayload::try_from(form).map_err(|err| {
        log::error!("Failed to validate crew form: {err}");
        ServiceError::from(err)
    })?;

    let crew = fetch_crew(repo, &id)?;
    repo.replace_crew(&crew.updated(&updates)).map_err(|err| {
        log::error!("Failed to update crew {id}: {err}");
        ServiceError::from(err)
    })
}

/// Activates or deactivates a crew. Existing visits keep their crew reference.
pub fn set_crew_active<R>(repo: &R, crew_id: &CrewId, active: bool) -> ServiceResult<Crew>
where
    R: CrewReader + CrewWriter + ?Sized,
{
    let crew = fetch_crew(repo, crew_id)?;
    repo.replace_crew(&Crew { active, ..crew })
        .map_err(ServiceError::from)
}
