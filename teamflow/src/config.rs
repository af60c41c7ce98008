use crate::model::{NewMember, Position};
use serde::{Deserialize, Serialize};

pub const DEFAULT_STORAGE_KEY: &str = "team-flow-store";

/// Host-supplied settings. Every field is optional on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Key the snapshot is persisted under.
    pub storage_key: String,
    /// Member created by the direct "add" action.
    pub default_member: NewMember,
}

impl Default for FlowConfig {
    fn default() -> Self {
        FlowConfig {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            default_member: NewMember::new("New Member", "Role", Position::new(250.0, 250.0)),
        }
    }
}

impl FlowConfig {
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }
}
