use serde::{Deserialize, Serialize};

/// Account that can own custom resources. Registration, credentials and
/// session handling live outside this service; requests arrive with an
/// already-authenticated user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
}
