use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::client::Client;
use crate::domain::crew::Crew;
use crate::domain::types::{
    ClientId, ClientName, CrewId, CrewName, ExtraTaskId, Notes, PersonName, TaskName,
    TypeConstraintError, VisitId,
};

/// Lifecycle state of a visit.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum VisitStatus {
    #[serde(rename = "programada")]
    Scheduled,
    #[serde(rename = "en_proceso")]
    InProgress,
    #[serde(rename = "completada")]
    Completed,
    #[serde(rename = "reagendada")]
    Rescheduled,
    #[serde(rename = "cancelada")]
    Cancelled,
}

impl VisitStatus {
    pub const ALL: [VisitStatus; 5] = [
        VisitStatus::Scheduled,
        VisitStatus::InProgress,
        VisitStatus::Completed,
        VisitStatus::Rescheduled,
        VisitStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VisitStatus::Scheduled => "programada",
            VisitStatus::InProgress => "en_proceso",
            VisitStatus::Completed => "completada",
            VisitStatus::Rescheduled => "reagendada",
            VisitStatus::Cancelled => "cancelada",
        }
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            VisitStatus::Scheduled => "Programada",
            VisitStatus::InProgress => "En Proceso",
            VisitStatus::Completed => "Completada",
            VisitStatus::Rescheduled => "Reagendada",
            VisitStatus::Cancelled => "Cancelada",
        }
    }

    /// Whether work on the visit is still expected.
    pub fn is_open(self) -> bool {
        match self {
            VisitStatus::Scheduled | VisitStatus::InProgress | VisitStatus::Rescheduled => true,
            VisitStatus::Completed | VisitStatus::Cancelled => false,
        }
    }
}

impl TryFrom<&str> for VisitStatus {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        VisitStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == value.trim())
            .ok_or_else(|| {
                TypeConstraintError::InvalidValue(format!("unknown visit status `{value}`"))
            })
    }
}

/// Business rule violations raised by visit mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VisitRuleError {
    #[error("task `{0}` is not planned for this visit")]
    UnknownTask(String),
    #[error("at least one task must be marked as done before completing the visit")]
    NoCompletedTasks,
}

/// Task requested on site that was not part of the plan.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExtraTask {
    pub id: ExtraTaskId,
    pub name: TaskName,
    pub description: Notes,
    pub billable: bool,
    pub requested_by: PersonName,
    pub requested_on: NaiveDate,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Visit {
    pub id: VisitId,
    pub client_id: ClientId,
    pub client_name: ClientName,
    pub crew_id: CrewId,
    pub crew_name: CrewName,
    pub scheduled_on: NaiveDate,
    pub completed_at: Option<NaiveDateTime>,
    pub status: VisitStatus,
    pub planned_tasks: Vec<TaskName>,
    #[serde(default)]
    pub completed_tasks: Vec<TaskName>,
    #[serde(default)]
    pub extra_tasks: Vec<ExtraTask>,
    #[serde(default)]
    pub notes: Notes,
    pub total_minutes: Option<u32>,
}

impl Visit {
    /// Returns a copy moved to `date` with status [`VisitStatus::Rescheduled`].
    #[must_use]
    pub fn rescheduled(&self, date: NaiveDate) -> Self {
        let mut visit = self.transition_to(VisitStatus::Rescheduled);
        visit.scheduled_on = date;
        visit
    }

    /// Returns a copy in `status`.
    ///
    /// Every status change goes through here. Transitions are currently
    /// unrestricted: any status may follow any other.
    #[must_use]
    pub fn transition_to(&self, status: VisitStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    pub fn is_task_planned(&self, task: &TaskName) -> bool {
        self.planned_tasks.contains(task)
    }

    pub fn is_task_done(&self, task: &TaskName) -> bool {
        self.completed_tasks.contains(task)
    }

    /// Marks `task` done or undone. Returns whether the completed list changed.
    ///
    /// Only planned tasks can be marked done. Unmarking a task that is not
    /// done is a no-op.
    pub fn set_task_done(&mut self, task: &TaskName, done: bool) -> Result<bool, VisitRuleError> {
        if done && !self.is_task_planned(task) {
            return Err(VisitRuleError::UnknownTask(task.to_string()));
        }

        match (done, self.is_task_done(task)) {
            (true, false) => {
                self.completed_tasks.push(task.clone());
                Ok(true)
            }
            (false, true) => {
                self.completed_tasks.retain(|t| t != task);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Closes the visit at `now`. Requires at least one completed task.
    pub fn complete(
        &mut self,
        now: NaiveDateTime,
        notes: Option<Notes>,
    ) -> Result<(), VisitRuleError> {
        if self.completed_tasks.is_empty() {
            return Err(VisitRuleError::NoCompletedTasks);
        }
        *self = self.transition_to(VisitStatus::Completed);
        self.completed_at = Some(now);
        if let Some(notes) = notes {
            self.notes = notes;
        }
        Ok(())
    }

    pub fn all_tasks_done(&self) -> bool {
        !self.planned_tasks.is_empty() && self.completed_tasks.len() == self.planned_tasks.len()
    }

    /// Fraction of planned tasks already done, in `0.0..=1.0`.
    pub fn progress(&self) -> f32 {
        if self.planned_tasks.is_empty() {
            return 0.0;
        }
        self.completed_tasks.len() as f32 / self.planned_tasks.len() as f32
    }

    /// Open visit whose date has already passed.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status.is_open() && self.scheduled_on < today
    }
}

/// Input for scheduling a new visit.
#[derive(Clone, Debug)]
pub struct NewVisit {
    pub client_id: ClientId,
    pub crew_id: CrewId,
    pub scheduled_on: NaiveDate,
}

impl NewVisit {
    /// Builds the visit for the resolved `client` and `crew`, seeding tasks from the plan.
    pub fn into_visit(self, client: &Client, crew: &Crew) -> Visit {
        let planned_tasks = client
            .plan
            .default_tasks()
            .iter()
            .filter_map(|task| TaskName::new(*task).ok())
            .collect();

        Visit {
            id: VisitId::generate(),
            client_id: client.id.clone(),
            client_name: client.name.clone(),
            crew_id: crew.id.clone(),
            crew_name: crew.name.clone(),
            scheduled_on: self.scheduled_on,
            completed_at: None,
            status: VisitStatus::Scheduled,
            planned_tasks,
            completed_tasks: Vec::new(),
            extra_tasks: Vec::new(),
            notes: Notes::default(),
            total_minutes: None,
        }
    }
}
