use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque shape identifier. Images and texts share one id space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeId(Uuid);

impl std::fmt::Display for ShapeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

// Random v4 ids are never handed out twice, so removed ids are never reused
pub fn generate_id() -> ShapeId {
    ShapeId(Uuid::new_v4())
}
