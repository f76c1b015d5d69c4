use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Owned, Ownership};

/// Named external media link (article, video, image) attachable to exercises
/// and mental activities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpRef {
    pub id: i64,
    pub name: String,
    #[serde(rename = "ref")]
    pub url: String,
    pub description: Option<String>,
    pub ownership: Ownership,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload; the store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewHttpRef {
    pub name: String,
    pub url: String,
    pub description: Option<String>,
    pub ownership: Ownership,
}

impl Owned for HttpRef {
    fn resource_id(&self) -> i64 {
        self.id
    }

    fn ownership(&self) -> Ownership {
        self.ownership
    }
}
