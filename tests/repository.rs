use chrono::NaiveDate;
use garden_crm::domain::client::{ClientGroup, PlanTier};
use garden_crm::domain::types::{ClientId, CrewId, UserEmail, VisitId};
use garden_crm::domain::visit::VisitStatus;
use garden_crm::filter;
use garden_crm::repository::errors::RepositoryError;
use garden_crm::repository::seed::Seed;
use garden_crm::repository::{
    ClientListQuery, ClientReader, ClientWriter, CrewListQuery, CrewReader, InMemoryRepository,
    UserReader, VisitListQuery, VisitReader, VisitWriter,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 25).unwrap()
}

fn repo() -> InMemoryRepository {
    InMemoryRepository::from_seed(Seed::demo(today()).unwrap())
}

#[test]
fn client_queries_combine_filters() {
    let repo = repo();

    let (total, clients) = repo.list_clients(&ClientListQuery::new()).unwrap();
    assert_eq!(total, 3);
    assert_eq!(clients[0].name.as_str(), "Jardines del Norte S.A.");

    let (total, clients) = repo
        .list_clients(&ClientListQuery::new().search("villa").group(ClientGroup::B))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(clients[0].id.as_str(), "2");

    let (total, _) = repo
        .list_clients(&ClientListQuery::new().search("villa").plan(PlanTier::Monthly))
        .unwrap();
    assert_eq!(total, 0);

    let (total, _) = repo
        .list_clients(&ClientListQuery::new().search("ELROBLE@"))
        .unwrap();
    assert_eq!(total, 1);
}

#[test]
fn pagination_reports_total_before_slicing() {
    let repo = repo();

    let (total, page) = repo
        .list_clients(&ClientListQuery::new().paginate(2, 2))
        .unwrap();

    assert_eq!(total, 3);
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id.as_str(), "3");
}

#[test]
fn page_far_past_the_end_is_empty() {
    let repo = repo();

    let (total, page) = repo
        .list_clients(&ClientListQuery::new().paginate(usize::MAX, 2))
        .unwrap();

    assert_eq!(total, 3);
    assert!(page.is_empty());
}

#[test]
fn client_filter_is_idempotent() {
    let repo = repo();
    let query = ClientListQuery::new().search("a").active(true);

    let (_, once) = repo.list_clients(&query).unwrap();
    let twice = filter::apply(&once, &query);

    assert_eq!(once, twice);
}

#[test]
fn replacing_a_client_keeps_the_others_in_place() {
    let repo = repo();
    let (_, before) = repo.list_clients(&ClientListQuery::new()).unwrap();

    let updated = before[1].with_active(false, today());
    repo.replace_client(&updated).unwrap();

    let (_, after) = repo.list_clients(&ClientListQuery::new()).unwrap();
    assert_eq!(after[0], before[0]);
    assert_eq!(after[1], updated);
    assert_eq!(after[2], before[2]);

    let (active, _) = repo
        .list_clients(&ClientListQuery::new().active(true))
        .unwrap();
    assert_eq!(active, 2);
}

#[test]
fn duplicate_ids_are_rejected() {
    let repo = repo();
    let client = repo
        .get_client_by_id(&ClientId::new("1").unwrap())
        .unwrap()
        .unwrap();
    assert!(matches!(
        repo.create_clients(&[client]),
        Err(RepositoryError::ConstraintViolation(_))
    ));

    let visit = repo
        .get_visit_by_id(&VisitId::new("1").unwrap())
        .unwrap()
        .unwrap();
    assert!(matches!(
        repo.create_visit(&visit),
        Err(RepositoryError::ConstraintViolation(_))
    ));
}

#[test]
fn replacing_a_missing_visit_is_not_found() {
    let repo = repo();
    let mut visit = repo
        .get_visit_by_id(&VisitId::new("1").unwrap())
        .unwrap()
        .unwrap();
    visit.id = VisitId::new("ghost").unwrap();

    assert_eq!(repo.replace_visit(&visit), Err(RepositoryError::NotFound));
    assert_eq!(repo.visits_snapshot().len(), 2);
}

#[test]
fn visit_queries_filter_by_crew_status_and_dates() {
    let repo = repo();

    let (total, _) = repo
        .list_visits(&VisitListQuery::new().crew(CrewId::new("2").unwrap()))
        .unwrap();
    assert_eq!(total, 1);

    let (total, _) = repo
        .list_visits(&VisitListQuery::new().on(today()))
        .unwrap();
    assert_eq!(total, 1);

    let (total, _) = repo
        .list_visits(&VisitListQuery::new().status(VisitStatus::Completed))
        .unwrap();
    assert_eq!(total, 0);

    let (total, _) = repo
        .list_visits(&VisitListQuery::new().search("beta"))
        .unwrap();
    assert_eq!(total, 1);
}

#[test]
fn crews_and_users_are_looked_up() {
    let repo = repo();

    let crews = repo
        .list_crews(&CrewListQuery::new().search("ana garcía"))
        .unwrap();
    assert_eq!(crews.len(), 1);
    assert_eq!(crews[0].name.as_str(), "Equipo Beta");

    let email = UserEmail::new("maria@jardineria.com").unwrap();
    assert!(repo.get_user_by_email(&email).unwrap().is_some());
    assert!(
        repo.get_crew_by_id(&CrewId::new("9").unwrap())
            .unwrap()
            .is_none()
    );
}

#[test]
fn seed_loads_from_json() {
    let json = r#"{
        "crews": [{
            "id": "c1",
            "name": "Equipo Sur",
            "supervisor_id": "u1",
            "supervisor_name": "Rosa Méndez",
            "active": true,
            "members": ["Rosa Méndez"]
        }]
    }"#;

    let seed = Seed::from_json_str(json).unwrap();
    let repo = InMemoryRepository::from_seed(seed);

    assert_eq!(repo.list_crews(&CrewListQuery::new()).unwrap().len(), 1);
    assert_eq!(repo.list_clients(&ClientListQuery::new()).unwrap().0, 0);
}
