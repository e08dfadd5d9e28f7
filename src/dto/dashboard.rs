use chrono::NaiveDate;
use serde::Serialize;

/// Headline counters of the dashboard.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DashboardData {
    pub today: NaiveDate,
    pub active_clients: usize,
    /// Visits in the current Monday-started week, any status.
    pub visits_this_week: usize,
    /// Completed task entries on visits scheduled this month.
    pub tasks_completed_this_month: usize,
    /// Open visits whose date has passed and that need a new date.
    pub visits_needing_reschedule: usize,
}
