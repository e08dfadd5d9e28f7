//! View data assembled by the services for the presentation layer.

use crate::domain::crew::Crew;
use crate::domain::types::CrewId;

pub mod clients;
pub mod dashboard;
pub mod visits;

pub const UNKNOWN_CREW_LABEL: &str = "Equipo Desconocido";
pub const UNKNOWN_ADDRESS_LABEL: &str = "Dirección no disponible";

/// Name of the crew with `id`, or a placeholder when it is not in `crews`.
pub fn crew_label(crews: &[Crew], id: &CrewId) -> String {
    crews
        .iter()
        .find(|crew| &crew.id == id)
        .map(|crew| crew.name.to_string())
        .unwrap_or_else(|| UNKNOWN_CREW_LABEL.to_string())
}
