//! Services handling visit scheduling, field work and the calendar views.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

use crate::calendar::{self, Granularity};
use crate::domain::types::{CrewId, ExtraTaskId, Notes, VisitId};
use crate::domain::visit::{ExtraTask, NewVisit, Visit, VisitStatus};
use crate::dto::{UNKNOWN_ADDRESS_LABEL, crew_label};
use crate::dto::visits::{CalendarPage, DailyAgenda, RouteSheet, RouteStop};
use crate::forms::visit::{
    CompleteVisitForm, CompleteVisitPayload, ExtraTaskForm, ExtraTaskPayload,
    RescheduleVisitForm, ReschedulePayload, ScheduleVisitForm, ToggleTaskForm, ToggleTaskPayload,
};
use crate::repository::{
    ClientReader, CrewListQuery, CrewReader, VisitListQuery, VisitReader, VisitWriter,
};
use crate::services::{ServiceError, ServiceResult};

fn fetch_visit<R>(repo: &R, visit_id: &VisitId) -> ServiceResult<Visit>
where
    R: VisitReader + ?Sized,
{
    repo.get_visit_by_id(visit_id)?.ok_or_else(|| {
        log::warn!("Visit {visit_id} not found");
        ServiceError::NotFound
    })
}

fn store_visit<R>(repo: &R, visit: &Visit) -> ServiceResult<Visit>
where
    R: VisitWriter + ?Sized,
{
    repo.replace_visit(visit).map_err(|err| {
        log::error!("Failed to update visit {}: {err}", visit.id);
        ServiceError::from(err)
    })
}

/// Schedules a visit for an existing client and crew.
///
/// Planned tasks come from the client's plan. Nothing is stored when the form
/// is incomplete or either reference cannot be resolved.
pub fn create_visit<R>(repo: &R, form: ScheduleVisitForm) -> ServiceResult<Visit>
where
    R: ClientReader + CrewReader + VisitWriter + ?Sized,
{
    let new_visit = NewVisit::try_from(form).map_err(|err| {
        log::error!("Failed to validate visit form: {err}");
        ServiceError::from(err)
    })?;

    let client = repo
        .get_client_by_id(&new_visit.client_id)?
        .ok_or_else(|| {
            log::error!("Client {} not found", new_visit.client_id);
            ServiceError::NotFound
        })?;
    let crew = repo.get_crew_by_id(&new_visit.crew_id)?.ok_or_else(|| {
        log::error!("Crew {} not found", new_visit.crew_id);
        ServiceError::NotFound
    })?;

    let visit = new_visit.into_visit(&client, &crew);
    repo.create_visit(&visit).map_err(|err| {
        log::error!("Failed to create visit: {err}");
        ServiceError::from(err)
    })
}

/// Moves a visit to another date and marks it as rescheduled.
pub fn reschedule_visit<R>(repo: &R, form: RescheduleVisitForm) -> ServiceResult<Visit>
where
    R: VisitReader + VisitWriter + ?Sized,
{
    let ReschedulePayload { visit_id, date } = ReschedulePayload::try_from(form)?;
    move_visit(repo, &visit_id, date)
}

/// Reschedules to the calendar date the visit was dropped on.
///
/// The date is taken from the drop target's own local components, not from
/// its UTC instant.
pub fn reschedule_to_drop_target<R, Tz>(
    repo: &R,
    visit_id: &VisitId,
    target: &DateTime<Tz>,
) -> ServiceResult<Visit>
where
    R: VisitReader + VisitWriter + ?Sized,
    Tz: TimeZone,
{
    move_visit(repo, visit_id, calendar::local_calendar_date(target))
}

fn move_visit<R>(repo: &R, visit_id: &VisitId, date: NaiveDate) -> ServiceResult<Visit>
where
    R: VisitReader + VisitWriter + ?Sized,
{
    let visit = fetch_visit(repo, visit_id)?;
    let moved = store_visit(repo, &visit.rescheduled(date))?;
    log::info!(
        "Visit {visit_id} moved to {}",
        calendar::format_calendar_date(date)
    );
    Ok(moved)
}

/// Marks a planned task done or undone. Repeating the same change is a no-op.
pub fn toggle_task<R>(repo: &R, form: ToggleTaskForm) -> ServiceResult<Visit>
where
    R: VisitReader + VisitWriter + ?Sized,
{
    let ToggleTaskPayload {
        visit_id,
        task,
        done,
    } = ToggleTaskPayload::try_from(form)?;

    let mut visit = fetch_visit(repo, &visit_id)?;
    let changed = visit.set_task_done(&task, done).map_err(|err| {
        log::error!("Failed to toggle task on visit {visit_id}: {err}");
        ServiceError::from(err)
    })?;

    if !changed {
        return Ok(visit);
    }
    store_visit(repo, &visit)
}

/// Closes a visit at `now`. At least one task must be done.
pub fn complete_visit<R>(
    repo: &R,
    form: CompleteVisitForm,
    now: NaiveDateTime,
) -> ServiceResult<Visit>
where
    R: VisitReader + VisitWriter + ?Sized,
{
    let CompleteVisitPayload { visit_id, notes } = CompleteVisitPayload::try_from(form)?;

    let mut visit = fetch_visit(repo, &visit_id)?;
    visit.complete(now, notes).map_err(|err| {
        log::error!("Failed to complete visit {visit_id}: {err}");
        ServiceError::from(err)
    })?;
    store_visit(repo, &visit)
}

pub fn update_visit_notes<R>(repo: &R, visit_id: &VisitId, notes: &str) -> ServiceResult<Visit>
where
    R: VisitReader + VisitWriter + ?Sized,
{
    let mut visit = fetch_visit(repo, visit_id)?;
    visit.notes = Notes::new(notes);
    store_visit(repo, &visit)
}

/// Records a task requested on site in addition to the planned ones.
pub fn add_extra_task<R>(repo: &R, form: ExtraTaskForm, today: NaiveDate) -> ServiceResult<Visit>
where
    R: VisitReader + VisitWriter + ?Sized,
{
    let payload = ExtraTaskPayload::try_from(form).map_err(|err| {
        log::error!("Failed to validate extra task form: {err}");
        ServiceError::from(err)
    })?;

    let mut visit = fetch_visit(repo, &payload.visit_id)?;
    visit.extra_tasks.push(ExtraTask {
        id: ExtraTaskId::generate(),
        name: payload.name,
        description: payload.description,
        billable: payload.billable,
        requested_by: payload.requested_by,
        requested_on: today,
    });
    store_visit(repo, &visit)
}

pub fn set_visit_status<R>(
    repo: &R,
    visit_id: &VisitId,
    status: VisitStatus,
) -> ServiceResult<Visit>
where
    R: VisitReader + VisitWriter + ?Sized,
{
    let visit = fetch_visit(repo, visit_id)?;
    store_visit(repo, &visit.transition_to(status))
}

/// Puts the visit in progress when the crew arrives.
pub fn start_visit<R>(repo: &R, visit_id: &VisitId) -> ServiceResult<Visit>
where
    R: VisitReader + VisitWriter + ?Sized,
{
    set_visit_status(repo, visit_id, VisitStatus::InProgress)
}

pub fn cancel_visit<R>(repo: &R, visit_id: &VisitId) -> ServiceResult<Visit>
where
    R: VisitReader + VisitWriter + ?Sized,
{
    set_visit_status(repo, visit_id, VisitStatus::Cancelled)
}

pub fn list_visits<R>(repo: &R, query: &VisitListQuery) -> ServiceResult<(usize, Vec<Visit>)>
where
    R: VisitReader + ?Sized,
{
    repo.list_visits(query).map_err(ServiceError::from)
}

/// Builds the calendar grid for the period around `reference`.
///
/// Filters in `query` other than the date range are kept, so the grid can be
/// narrowed to a crew or a status.
pub fn load_calendar<R>(
    repo: &R,
    query: VisitListQuery,
    reference: NaiveDate,
    granularity: Granularity,
) -> ServiceResult<CalendarPage>
where
    R: VisitReader + ?Sized,
{
    let range = calendar::period_range(reference, granularity);
    let (_, visits) = repo.list_visits(&VisitListQuery {
        dates: Some(range),
        pagination: None,
        ..query
    })?;

    Ok(CalendarPage {
        granularity,
        reference,
        range,
        previous: calendar::shift(reference, granularity, -1),
        next: calendar::shift(reference, granularity, 1),
        days: calendar::bucket(&visits, reference, granularity),
    })
}

/// Visits of `date` grouped by crew.
///
/// Crew names come from the crew records; a crew that is no longer stored is
/// shown with a placeholder name.
pub fn load_daily_agenda<R>(repo: &R, date: NaiveDate) -> ServiceResult<DailyAgenda>
where
    R: CrewReader + VisitReader + ?Sized,
{
    let (_, visits) = repo.list_visits(&VisitListQuery::new().on(date))?;
    let crews = repo.list_crews(&CrewListQuery::new())?;

    let mut buckets = calendar::bucket_by_crew(&visits);
    for bucket in &mut buckets {
        bucket.crew_name = crew_label(&crews, &bucket.crew_id);
    }

    Ok(DailyAgenda {
        date,
        crews: buckets,
    })
}

/// The crew's stops for `date` in stored order, with task progress.
///
/// A visit whose client is no longer stored still appears, with a
/// placeholder address.
pub fn load_route_sheet<R>(repo: &R, crew_id: &CrewId, date: NaiveDate) -> ServiceResult<RouteSheet>
where
    R: ClientReader + CrewReader + VisitReader + ?Sized,
{
    let crew_name = repo.get_crew_by_id(crew_id)?.map(|crew| crew.name);
    let (_, visits) = repo.list_visits(&VisitListQuery::new().crew(crew_id.clone()).on(date))?;

    let mut stops = Vec::with_capacity(visits.len());
    for (index, visit) in visits.into_iter().enumerate() {
        let address = repo
            .get_client_by_id(&visit.client_id)?
            .map(|client| client.address.to_string())
            .unwrap_or_else(|| UNKNOWN_ADDRESS_LABEL.to_string());
        stops.push(RouteStop {
            position: index + 1,
            progress: visit.progress(),
            all_tasks_done: visit.all_tasks_done(),
            address,
            visit,
        });
    }

    Ok(RouteSheet {
        date,
        crew_id: crew_id.clone(),
        crew_name,
        stops,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::TaskName;
    use crate::repository::InMemoryRepository;
    use crate::repository::seed::Seed;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 25).unwrap()
    }

    fn repo() -> InMemoryRepository {
        InMemoryRepository::from_seed(Seed::demo(today()).unwrap())
    }

    fn visit_id(raw: &str) -> VisitId {
        VisitId::new(raw).unwrap()
    }

    fn toggle(visit: &str, task: &str, done: bool) -> ToggleTaskForm {
        ToggleTaskForm {
            visit_id: visit.to_string(),
            task: task.to_string(),
            done,
        }
    }

    #[test]
    fn create_visit_seeds_plan_tasks() {
        let repo = repo();
        let form = ScheduleVisitForm {
            client_id: "1".to_string(),
            crew_id: "2".to_string(),
            scheduled_on: "2024-07-01".to_string(),
        };

        let visit = create_visit(&repo, form).expect("visit created");

        assert_eq!(visit.status, VisitStatus::Scheduled);
        assert_eq!(visit.crew_name.as_str(), "Equipo Beta");
        let tasks: Vec<&str> = visit.planned_tasks.iter().map(|t| t.as_str()).collect();
        assert_eq!(
            tasks,
            vec!["Poda de césped", "Riego de plantas", "Limpieza general"]
        );
        assert!(visit.completed_tasks.is_empty());
        assert!(visit.notes.is_empty());
        assert_eq!(repo.visits_snapshot().len(), 3);
    }

    #[test]
    fn create_visit_with_unknown_crew_stores_nothing() {
        let repo = repo();
        let form = ScheduleVisitForm {
            client_id: "1".to_string(),
            crew_id: "99".to_string(),
            scheduled_on: "2024-07-01".to_string(),
        };

        assert!(matches!(
            create_visit(&repo, form),
            Err(ServiceError::NotFound)
        ));
        assert_eq!(repo.visits_snapshot().len(), 2);
    }

    #[test]
    fn create_visit_with_missing_field_is_a_form_error() {
        let repo = repo();
        let form = ScheduleVisitForm {
            client_id: "1".to_string(),
            ..ScheduleVisitForm::default()
        };

        assert!(matches!(
            create_visit(&repo, form),
            Err(ServiceError::Form(_))
        ));
        assert_eq!(repo.visits_snapshot().len(), 2);
    }

    #[test]
    fn toggle_task_is_idempotent_and_rejects_unplanned_tasks() {
        let repo = repo();

        toggle_task(&repo, toggle("1", "Riego de plantas", true)).unwrap();
        let visit = toggle_task(&repo, toggle("1", "Riego de plantas", true)).unwrap();
        assert_eq!(
            visit.completed_tasks,
            vec![TaskName::new("Riego de plantas").unwrap()]
        );

        let result = toggle_task(&repo, toggle("1", "Fumigación", true));
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn complete_visit_requires_done_task() {
        let repo = repo();
        let now = today().and_hms_opt(16, 0, 0).unwrap();
        let form = || CompleteVisitForm {
            visit_id: "1".to_string(),
            notes: Some("Todo en orden".to_string()),
        };

        let before = repo.visits_snapshot();
        assert!(matches!(
            complete_visit(&repo, form(), now),
            Err(ServiceError::Form(_))
        ));
        assert_eq!(repo.visits_snapshot(), before);

        toggle_task(&repo, toggle("1", "Limpieza general", true)).unwrap();
        let visit = complete_visit(&repo, form(), now).unwrap();
        assert_eq!(visit.status, VisitStatus::Completed);
        assert_eq!(visit.completed_at, Some(now));
        assert_eq!(visit.notes.as_str(), "Todo en orden");
    }

    #[test]
    fn status_helpers_go_through_transitions() {
        let repo = repo();
        assert_eq!(
            start_visit(&repo, &visit_id("1")).unwrap().status,
            VisitStatus::InProgress
        );
        assert_eq!(
            cancel_visit(&repo, &visit_id("2")).unwrap().status,
            VisitStatus::Cancelled
        );
        assert!(matches!(
            start_visit(&repo, &visit_id("404")),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn extra_task_is_appended() {
        let repo = repo();
        let form = ExtraTaskForm {
            visit_id: "2".to_string(),
            name: "Retiro de ramas".to_string(),
            description: "Árbol caído junto al portón".to_string(),
            billable: true,
            requested_by: "Sra. Pérez".to_string(),
        };

        let visit = add_extra_task(&repo, form, today()).unwrap();

        assert_eq!(visit.extra_tasks.len(), 1);
        assert!(visit.extra_tasks[0].billable);
        assert_eq!(visit.extra_tasks[0].requested_on, today());
    }

    #[test]
    fn calendar_keeps_empty_days_and_navigation() {
        let repo = repo();
        let page = load_calendar(&repo, VisitListQuery::new(), today(), Granularity::Week).unwrap();

        assert_eq!(page.days.len(), 7);
        assert_eq!(page.range.start, NaiveDate::from_ymd_opt(2024, 6, 24).unwrap());
        assert_eq!(page.previous, NaiveDate::from_ymd_opt(2024, 6, 18).unwrap());
        assert_eq!(page.next, NaiveDate::from_ymd_opt(2024, 7, 2).unwrap());
        let filled: usize = page.days.iter().map(|day| day.visits.len()).sum();
        assert_eq!(filled, 2);
        assert!(page.days[0].is_empty());
    }

    #[test]
    fn route_sheet_lists_crew_stops_with_addresses() {
        let repo = repo();
        let crew = CrewId::new("1").unwrap();

        let sheet = load_route_sheet(&repo, &crew, today()).unwrap();

        assert_eq!(sheet.stops.len(), 1);
        assert_eq!(sheet.stops[0].position, 1);
        assert_eq!(sheet.stops[0].address, "Av. Principal 123, Zona Norte");
        assert_eq!(sheet.crew_name.map(|n| n.to_string()), Some("Equipo Alpha".to_string()));

        let agenda = load_daily_agenda(&repo, today()).unwrap();
        assert_eq!(agenda.crews.len(), 1);
        assert_eq!(agenda.crews[0].crew_name, "Equipo Alpha");
    }

    #[test]
    fn daily_agenda_names_missing_crews_with_a_placeholder() {
        let repo = repo();
        let mut orphan = repo.get_visit_by_id(&visit_id("1")).unwrap().unwrap();
        orphan.id = visit_id("orphan");
        orphan.crew_id = CrewId::new("77").unwrap();
        repo.create_visit(&orphan).unwrap();

        let agenda = load_daily_agenda(&repo, orphan.scheduled_on).unwrap();

        let missing = agenda
            .crews
            .iter()
            .find(|bucket| bucket.crew_id.as_str() == "77")
            .expect("orphan crew bucket");
        assert_eq!(missing.crew_name, crate::dto::UNKNOWN_CREW_LABEL);
        assert_eq!(missing.visits.len(), 1);
    }
}
