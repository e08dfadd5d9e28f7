use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::calendar::parse_calendar_date;
use crate::domain::types::{ClientId, CrewId, Notes, PersonName, TaskName, VisitId};
use crate::domain::visit::NewVisit;
use crate::forms::FormError;

#[derive(Clone, Debug, Default, Deserialize, Validate)]
/// Form data for scheduling a visit. Every field is required.
pub struct ScheduleVisitForm {
    #[validate(length(min = 1))]
    pub client_id: String,
    #[validate(length(min = 1))]
    pub crew_id: String,
    /// `YYYY-MM-DD`.
    #[validate(length(min = 1))]
    pub scheduled_on: String,
}

#[derive(Clone, Debug, Deserialize, Validate)]
/// Form data for moving a visit to another date.
pub struct RescheduleVisitForm {
    #[validate(length(min = 1))]
    pub visit_id: String,
    #[validate(length(min = 1))]
    pub date: String,
}

#[derive(Clone, Debug, Deserialize, Validate)]
/// Checkbox change on a route sheet task.
pub struct ToggleTaskForm {
    #[validate(length(min = 1))]
    pub visit_id: String,
    #[validate(length(min = 1))]
    pub task: String,
    pub done: bool,
}

#[derive(Clone, Debug, Deserialize, Validate)]
/// Form data for closing a visit from the route sheet.
pub struct CompleteVisitForm {
    #[validate(length(min = 1))]
    pub visit_id: String,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
/// Task requested on site in addition to the planned ones.
pub struct ExtraTaskForm {
    #[validate(length(min = 1))]
    pub visit_id: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub billable: bool,
    #[validate(length(min = 1))]
    pub requested_by: String,
}

pub struct ReschedulePayload {
    pub visit_id: VisitId,
    pub date: NaiveDate,
}

pub struct ToggleTaskPayload {
    pub visit_id: VisitId,
    pub task: TaskName,
    pub done: bool,
}

pub struct CompleteVisitPayload {
    pub visit_id: VisitId,
    pub notes: Option<Notes>,
}

pub struct ExtraTaskPayload {
    pub visit_id: VisitId,
    pub name: TaskName,
    pub description: Notes,
    pub billable: bool,
    pub requested_by: PersonName,
}

fn visit_id(raw: String) -> Result<VisitId, FormError> {
    VisitId::new(raw).map_err(|_| FormError::InvalidId)
}

fn date(raw: &str) -> Result<NaiveDate, FormError> {
    parse_calendar_date(raw).map_err(|_| FormError::InvalidDate)
}

impl TryFrom<ScheduleVisitForm> for NewVisit {
    type Error = FormError;

    fn try_from(form: ScheduleVisitForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(NewVisit {
            client_id: ClientId::new(form.client_id).map_err(|_| FormError::InvalidId)?,
            crew_id: CrewId::new(form.crew_id).map_err(|_| FormError::InvalidId)?,
            scheduled_on: date(&form.scheduled_on)?,
        })
    }
}

impl TryFrom<RescheduleVisitForm> for ReschedulePayload {
    type Error = FormError;

    fn try_from(form: RescheduleVisitForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            date: date(&form.date)?,
            visit_id: visit_id(form.visit_id)?,
        })
    }
}

impl TryFrom<ToggleTaskForm> for ToggleTaskPayload {
    type Error = FormError;

    fn try_from(form: ToggleTaskForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            visit_id: visit_id(form.visit_id)?,
            task: TaskName::new(form.task).map_err(|_| FormError::InvalidName)?,
            done: form.done,
        })
    }
}

impl TryFrom<CompleteVisitForm> for CompleteVisitPayload {
    type Error = FormError;

    fn try_from(form: CompleteVisitForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            visit_id: visit_id(form.visit_id)?,
            notes: form.notes.map(Notes::new),
        })
    }
}

impl TryFrom<ExtraTaskForm> for ExtraTaskPayload {
    type Error = FormError;

    fn try_from(form: ExtraTaskForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(Self {
            visit_id: visit_id(form.visit_id)?,
            name: TaskName::new(form.name).map_err(|_| FormError::InvalidName)?,
            description: Notes::new(form.description),
            billable: form.billable,
            requested_by: PersonName::new(form.requested_by).map_err(|_| FormError::InvalidName)?,
        })
    }
}
