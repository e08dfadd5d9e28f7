//! Configuration model loaded from external sources.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
/// Settings of the dashboard binary.
pub struct AppConfig {
    /// JSON file holding the signed-in user's session record.
    pub session_file: String,
    /// JSON seed with clients, crews, visits and users. The built-in demo
    /// data is used when unset.
    #[serde(default)]
    pub seed_file: Option<String>,
    /// `YYYY-MM-DD` date treated as today; the local date when unset.
    #[serde(default)]
    pub reference_date: Option<String>,
    /// Account signed in on start when no session is stored.
    #[serde(default)]
    pub sign_in_email: Option<String>,
    #[serde(default)]
    pub sign_in_password: Option<String>,
}
