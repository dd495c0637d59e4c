use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::NodeError;

/// How containers and list items are reconciled during an edit
///
/// | Strategy | Present | Missing |
/// |---|---|---|
/// | `Upsert` | descend | create, descend |
/// | `Insert` | conflict | create, descend |
/// | `Update` | descend | not found |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditStrategy {
    Upsert,
    Insert,
    Update,
}

impl EditStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditStrategy::Upsert => "upsert",
            EditStrategy::Insert => "insert",
            EditStrategy::Update => "update",
        }
    }
}

impl std::fmt::Display for EditStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditStrategy {
    type Err = NodeError;

    /// Accepts engine names and the matching NETCONF operation names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upsert" | "merge" => Ok(EditStrategy::Upsert),
            "insert" | "create" => Ok(EditStrategy::Insert),
            "update" => Ok(EditStrategy::Update),
            "replace" | "delete" | "remove" => Err(NodeError::StrategyNotImplemented {
                strategy: s.to_string(),
            }),
            _ => Err(NodeError::InvalidInput {
                reason: format!("unknown edit strategy '{}'", s),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_netconf_operation_names() {
        assert_eq!("merge".parse::<EditStrategy>(), Ok(EditStrategy::Upsert));
        assert_eq!("create".parse::<EditStrategy>(), Ok(EditStrategy::Insert));
        assert_eq!("update".parse::<EditStrategy>(), Ok(EditStrategy::Update));
    }

    #[test]
    fn test_unsupported_operation_is_501() {
        let err = "replace".parse::<EditStrategy>().unwrap_err();
        assert_eq!(err.status(), 501);
    }

    #[test]
    fn test_unknown_operation_is_invalid_input() {
        let err = "frobnicate".parse::<EditStrategy>().unwrap_err();
        assert_eq!(err.status(), 400);
    }
}
