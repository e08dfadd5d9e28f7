use chrono::{FixedOffset, NaiveDate, TimeZone};
use garden_crm::domain::types::{TaskName, VisitId};
use garden_crm::domain::visit::VisitStatus;
use garden_crm::forms::visit::{
    CompleteVisitForm, RescheduleVisitForm, ScheduleVisitForm, ToggleTaskForm,
};
use garden_crm::repository::seed::Seed;
use garden_crm::repository::{InMemoryRepository, VisitListQuery, VisitReader};
use garden_crm::services::ServiceError;
use garden_crm::services::visits;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seeded_repo() -> InMemoryRepository {
    InMemoryRepository::from_seed(Seed::demo(date(2024, 6, 25)).unwrap())
}

#[test]
fn reschedule_changes_only_date_and_status() {
    let repo = seeded_repo();
    let before = repo.visits_snapshot();

    let moved = visits::reschedule_visit(
        &repo,
        RescheduleVisitForm {
            visit_id: "1".to_string(),
            date: "2024-07-01".to_string(),
        },
    )
    .unwrap();

    assert_eq!(moved.scheduled_on, date(2024, 7, 1));
    assert_eq!(moved.status, VisitStatus::Rescheduled);
    assert_eq!(moved.planned_tasks, before[0].planned_tasks);
    assert_eq!(moved.client_id, before[0].client_id);
    assert_eq!(moved.crew_id, before[0].crew_id);
    assert_eq!(moved.notes, before[0].notes);

    let after = repo.visits_snapshot();
    assert_eq!(after.len(), before.len());
    assert_eq!(after[0], moved);
    assert_eq!(after[1], before[1]);
}

#[test]
fn reschedule_of_unknown_visit_leaves_store_unchanged() {
    let repo = seeded_repo();
    let before = repo.visits_snapshot();

    let result = visits::reschedule_visit(
        &repo,
        RescheduleVisitForm {
            visit_id: "does-not-exist".to_string(),
            date: "2024-07-01".to_string(),
        },
    );

    assert!(matches!(result, Err(ServiceError::NotFound)));
    assert_eq!(repo.visits_snapshot(), before);
}

#[test]
fn drop_target_late_in_the_evening_keeps_its_local_day() {
    let repo = seeded_repo();
    let offset = FixedOffset::west_opt(5 * 3600).unwrap();
    let target = offset.with_ymd_and_hms(2024, 7, 1, 22, 0, 0).unwrap();

    let moved =
        visits::reschedule_to_drop_target(&repo, &VisitId::new("2").unwrap(), &target).unwrap();

    assert_eq!(moved.scheduled_on, date(2024, 7, 1));
}

#[test]
fn new_weekly_visit_gets_weekly_tasks() {
    let repo = seeded_repo();

    let visit = visits::create_visit(
        &repo,
        ScheduleVisitForm {
            client_id: "1".to_string(),
            crew_id: "1".to_string(),
            scheduled_on: "2024-07-08".to_string(),
        },
    )
    .unwrap();

    let tasks: Vec<&str> = visit.planned_tasks.iter().map(TaskName::as_str).collect();
    assert_eq!(
        tasks,
        vec!["Poda de césped", "Riego de plantas", "Limpieza general"]
    );
    assert_eq!(visit.status, VisitStatus::Scheduled);
    assert_eq!(repo.get_visit_by_id(&visit.id).unwrap(), Some(visit));
}

#[test]
fn creation_without_client_stores_nothing() {
    let repo = seeded_repo();

    let result = visits::create_visit(
        &repo,
        ScheduleVisitForm {
            client_id: String::new(),
            crew_id: "1".to_string(),
            scheduled_on: "2024-07-08".to_string(),
        },
    );

    assert!(matches!(result, Err(ServiceError::Form(_))));
    assert_eq!(repo.visits_snapshot().len(), 2);
}

#[test]
fn toggling_the_same_task_twice_keeps_one_entry() {
    let repo = seeded_repo();
    let form = || ToggleTaskForm {
        visit_id: "2".to_string(),
        task: "Fertilización".to_string(),
        done: true,
    };

    visits::toggle_task(&repo, form()).unwrap();
    let visit = visits::toggle_task(&repo, form()).unwrap();

    assert_eq!(visit.completed_tasks.len(), 1);
    assert_eq!(visit.completed_tasks[0].as_str(), "Fertilización");
}

#[test]
fn completing_without_done_tasks_fails_and_changes_nothing() {
    let repo = seeded_repo();
    let before = repo.visits_snapshot();

    let result = visits::complete_visit(
        &repo,
        CompleteVisitForm {
            visit_id: "1".to_string(),
            notes: None,
        },
        date(2024, 6, 25).and_hms_opt(17, 0, 0).unwrap(),
    );

    assert!(matches!(result, Err(ServiceError::Form(_))));
    assert_eq!(repo.visits_snapshot(), before);
}

#[test]
fn calendar_filters_by_status() {
    let repo = seeded_repo();
    visits::cancel_visit(&repo, &VisitId::new("2").unwrap()).unwrap();

    let page = visits::load_calendar(
        &repo,
        VisitListQuery::new().status(VisitStatus::Scheduled),
        date(2024, 6, 25),
        garden_crm::calendar::Granularity::Week,
    )
    .unwrap();

    let total: usize = page.days.iter().map(|d| d.visits.len()).sum();
    assert_eq!(total, 1);
}

#[test]
fn unmarking_an_unplanned_task_leaves_the_visit_unchanged() {
    let repo = seeded_repo();
    let before = repo.visits_snapshot();

    let visit = visits::toggle_task(
        &repo,
        ToggleTaskForm {
            visit_id: "1".to_string(),
            task: "Fumigación".to_string(),
            done: false,
        },
    )
    .unwrap();

    assert_eq!(visit, before[0]);
    assert_eq!(repo.visits_snapshot(), before);
}
