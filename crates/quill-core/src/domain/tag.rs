use serde::{Deserialize, Serialize};

/// Tag entity - a unique label that posts can reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i32,
    pub name: String,
}
