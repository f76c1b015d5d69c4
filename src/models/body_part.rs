use serde::{Deserialize, Serialize};

use super::{Owned, Ownership};

/// Seeded lookup value tagged onto exercises. Body parts are always default;
/// there is no custom variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyPart {
    pub id: i64,
    pub name: String,
}

impl Owned for BodyPart {
    fn resource_id(&self) -> i64 {
        self.id
    }

    fn ownership(&self) -> Ownership {
        Ownership::Default
    }
}
