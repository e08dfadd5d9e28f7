//! Service assembling the dashboard counters.

use chrono::NaiveDate;

use crate::calendar::{self, Granularity};
use crate::dto::dashboard::DashboardData;
use crate::repository::{ClientListQuery, ClientReader, VisitListQuery, VisitReader};
use crate::services::ServiceResult;

/// Headline counters as seen on `today`.
pub fn load_dashboard<R>(repo: &R, today: NaiveDate) -> ServiceResult<DashboardData>
where
    R: ClientReader + VisitReader + ?Sized,
{
    let (active_clients, _) = repo.list_clients(&ClientListQuery::new().active(true))?;

    let week = calendar::period_range(today, Granularity::Week);
    let (visits_this_week, _) =
        repo.list_visits(&VisitListQuery::new().between(week.start, week.end))?;

    let month = calendar::period_range(today, Granularity::Month);
    let (_, month_visits) =
        repo.list_visits(&VisitListQuery::new().between(month.start, month.end))?;
    let tasks_completed_this_month = month_visits
        .iter()
        .map(|visit| visit.completed_tasks.len())
        .sum();

    let (_, all_visits) = repo.list_visits(&VisitListQuery::new())?;
    let visits_needing_reschedule = all_visits
        .iter()
        .filter(|visit| visit.is_overdue(today))
        .count();

    Ok(DashboardData {
        today,
        active_clients,
        visits_this_week,
        tasks_completed_this_month,
        visits_needing_reschedule,
    })
}
