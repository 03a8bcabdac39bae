//! Shared domain types: message roles and generation modes with their credit costs.

use serde::{Deserialize, Serialize};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Wire/storage representation (`"user"` / `"assistant"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Generation kind requested for a message. Each mode has a fixed credit cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    Text,
    Image,
}

impl GenerationMode {
    /// Credits debited for one successful generation in this mode.
    pub fn cost(&self) -> i64 {
        match self {
            GenerationMode::Text => 1,
            GenerationMode::Image => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMode::Text => "text",
            GenerationMode::Image => "image",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_costs() {
        assert_eq!(GenerationMode::Text.cost(), 1);
        assert_eq!(GenerationMode::Image.cost(), 2);
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
    }
}
