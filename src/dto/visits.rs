use chrono::NaiveDate;
use serde::Serialize;

use crate::calendar::{CrewBucket, DayBucket, Granularity};
use crate::domain::types::{CrewId, CrewName};
use crate::domain::visit::Visit;
use crate::filter::DateRange;

/// Calendar grid for one period.
#[derive(Debug, Serialize)]
pub struct CalendarPage {
    pub granularity: Granularity,
    pub reference: NaiveDate,
    pub range: DateRange,
    pub previous: NaiveDate,
    pub next: NaiveDate,
    /// One bucket per date of the period, including empty days.
    pub days: Vec<DayBucket>,
}

/// Daily view: visits of a date grouped by crew.
#[derive(Debug, Serialize)]
pub struct DailyAgenda {
    pub date: NaiveDate,
    pub crews: Vec<CrewBucket>,
}

/// One stop on a crew's route sheet.
#[derive(Debug, Serialize)]
pub struct RouteStop {
    /// 1-based position in the day.
    pub position: usize,
    pub visit: Visit,
    pub address: String,
    pub progress: f32,
    pub all_tasks_done: bool,
}

/// A crew's work for one day.
#[derive(Debug, Serialize)]
pub struct RouteSheet {
    pub date: NaiveDate,
    pub crew_id: CrewId,
    pub crew_name: Option<CrewName>,
    pub stops: Vec<RouteStop>,
}
