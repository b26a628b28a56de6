use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::repository::Client;

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
}

#[derive(Serialize, Deserialize)]
pub struct CreateQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub client: Client,
    pub profile: Option<Value>,
}
