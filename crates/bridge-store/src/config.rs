use bridge_types::KeyPolicy;
use serde::{Deserialize, Serialize};

/// Configuration for a storage engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Key validation applied to every keyed insert and merge.
    pub key_policy: KeyPolicy,
    /// Maximum nesting depth of a container tree. A lone container has
    /// depth 1. Enforced when nesting containers and when converting
    /// external documents (such as JSON).
    pub max_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            key_policy: KeyPolicy::Strict,
            max_depth: 64,
        }
    }
}

impl EngineConfig {
    /// Accept every key, including the empty string.
    pub fn lenient() -> Self {
        Self {
            key_policy: KeyPolicy::Lenient,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = EngineConfig::default();
        assert_eq!(c.key_policy, KeyPolicy::Strict);
        assert_eq!(c.max_depth, 64);
    }

    #[test]
    fn lenient_preset() {
        let c = EngineConfig::lenient();
        assert_eq!(c.key_policy, KeyPolicy::Lenient);
        assert_eq!(c.max_depth, 64);
    }

    #[test]
    fn toml_fills_missing_fields_from_default() {
        let c: EngineConfig = toml::from_str("key_policy = \"lenient\"").unwrap();
        assert_eq!(c.key_policy, KeyPolicy::Lenient);
        assert_eq!(c.max_depth, 64);

        let c: EngineConfig = toml::from_str("max_depth = 8").unwrap();
        assert_eq!(c.key_policy, KeyPolicy::Strict);
        assert_eq!(c.max_depth, 8);
    }
}
