//! Rule configuration.
//!
//! The engine runs the reserve-tracking ruleset unless a host opts into
//! the unlimited-reserve variant explicitly. `Rules` is serde-friendly so
//! hosts can load it from whatever config format they already use.

use serde::{Deserialize, Serialize};

/// How placements from reserve are limited.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReserveRule {
    /// Each player starts with `UNITS_PER_SIZE` units of every size and a
    /// placement consumes one.
    #[default]
    Tracked,
    /// Placements draw from an implicit infinite pool.
    Unlimited,
}

/// Engine rule set. Survives [`GameEngine::reset`](crate::GameEngine::reset).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub reserve: ReserveRule,
}

impl Rules {
    /// Rules with an unlimited reserve.
    pub fn unlimited() -> Rules {
        Rules { reserve: ReserveRule::Unlimited }
    }

    #[inline]
    pub fn tracks_reserve(&self) -> bool {
        self.reserve == ReserveRule::Tracked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tracks_reserve() {
        assert_eq!(Rules::default().reserve, ReserveRule::Tracked);
        assert!(Rules::default().tracks_reserve());
        assert!(!Rules::unlimited().tracks_reserve());
    }

    #[test]
    fn test_deserialize_empty_uses_defaults() {
        let rules: Rules = serde_json::from_str("{}").unwrap();
        assert_eq!(rules, Rules::default());
    }

    #[test]
    fn test_deserialize_unlimited() {
        let rules: Rules = serde_json::from_str(r#"{"reserve": "unlimited"}"#).unwrap();
        assert_eq!(rules, Rules::unlimited());
    }

    #[test]
    fn test_unknown_reserve_rule_rejected() {
        let parsed: Result<Rules, _> = serde_json::from_str(r#"{"reserve": "bottomless"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_serialize_roundtrip() {
        let json = serde_json::to_string(&Rules::unlimited()).unwrap();
        assert_eq!(json, r#"{"reserve":"unlimited"}"#);
    }
}
