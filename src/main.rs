//! Prints the dashboard, the week calendar and the signed-in crew's route sheet.

use std::env;

use config::Config;
use dotenvy::dotenv;

use garden_crm::calendar::{self, Granularity};
use garden_crm::forms::auth::SignInForm;
use garden_crm::models::config::AppConfig;
use garden_crm::repository::{InMemoryRepository, VisitListQuery};
use garden_crm::repository::seed::Seed;
use garden_crm::services::{dashboard, visits};
use garden_crm::session::{FileStorage, Session};

fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let settings = Config::builder()
        // Add `./config/default.yaml`
        .add_source(config::File::with_name("config/default"))
        // Add environment-specific overrides
        .add_source(config::File::with_name(&format!("config/{}", app_env)).required(false))
        // Add settings from the environment (with a prefix of APP)
        .add_source(config::Environment::with_prefix("APP"))
        .build();

    let settings = match settings {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("Error loading settings: {}", err);
            std::process::exit(1);
        }
    };

    let app_config = match settings.try_deserialize::<AppConfig>() {
        Ok(app_config) => app_config,
        Err(err) => {
            log::error!("Error loading app config: {}", err);
            std::process::exit(1);
        }
    };

    let today = match app_config.reference_date.as_deref() {
        Some(raw) => match calendar::parse_calendar_date(raw) {
            Ok(date) => date,
            Err(err) => {
                log::error!("Invalid reference date: {err}");
                std::process::exit(1);
            }
        },
        None => calendar::today(),
    };

    let seed = match app_config.seed_file.as_deref() {
        Some(path) => Seed::from_json_file(path).map_err(|err| err.to_string()),
        None => Seed::demo(today).map_err(|err| err.to_string()),
    };
    let repo = match seed {
        Ok(seed) => InMemoryRepository::from_seed(seed),
        Err(err) => {
            log::error!("Failed to load seed data: {err}");
            std::process::exit(1);
        }
    };

    let mut session = Session::init(FileStorage::new(&app_config.session_file));
    if !session.is_signed_in()
        && let (Some(email), Some(password)) = (
            app_config.sign_in_email.clone(),
            app_config.sign_in_password.clone(),
        )
        && let Err(err) = session.sign_in(&repo, SignInForm { email, password })
    {
        log::error!("Failed to sign in: {err}");
    }

    match dashboard::load_dashboard(&repo, today) {
        Ok(data) => log::info!(
            "Dashboard {}: {} active clients, {} visits this week, {} tasks done this month, {} to reschedule",
            calendar::format_calendar_date(data.today),
            data.active_clients,
            data.visits_this_week,
            data.tasks_completed_this_month,
            data.visits_needing_reschedule
        ),
        Err(err) => log::error!("Failed to load dashboard: {err}"),
    }

    match visits::load_calendar(&repo, VisitListQuery::new(), today, Granularity::Week) {
        Ok(page) => {
            for day in &page.days {
                let names: Vec<String> = day
                    .visits
                    .iter()
                    .map(|visit| format!("{} ({})", visit.client_name, visit.status.label()))
                    .collect();
                log::info!(
                    "{}: {}",
                    calendar::format_calendar_date(day.date),
                    names.join(", ")
                );
            }
        }
        Err(err) => log::error!("Failed to load calendar: {err}"),
    }

    let Some(crew_id) = session.user().and_then(|user| user.crew_id.clone()) else {
        log::info!("No crew assigned to the current session");
        return;
    };

    match visits::load_route_sheet(&repo, &crew_id, today) {
        Ok(sheet) => {
            log::info!(
                "Route sheet for {} with {} stops",
                sheet
                    .crew_name
                    .as_ref()
                    .map(|name| name.to_string())
                    .unwrap_or_else(|| garden_crm::dto::UNKNOWN_CREW_LABEL.to_string()),
                sheet.stops.len()
            );
            for stop in &sheet.stops {
                log::info!(
                    "{}. {} at {} ({:.0}% done)",
                    stop.position,
                    stop.visit.client_name,
                    stop.address,
                    stop.progress * 100.0
                );
            }
        }
        Err(err) => log::error!("Failed to load route sheet: {err}"),
    }
}
