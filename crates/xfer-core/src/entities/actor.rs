use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A person or system account that acts on requests.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Actor {
    pub id: i64,
    pub display_name: String,
    pub role: Option<String>,
    pub created_at: DateTime<Utc>,
}
