use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct DeferConfig {
    /// Whether `@defer` creates new delivery groups. When disabled, deferred
    /// fragments are collected together with their parent.
    ///
    /// Can also be set via the `DEFER_ENABLED` environment variable.
    #[serde(default = "default_defer_enabled")]
    pub enabled: bool,
}

fn default_defer_enabled() -> bool {
    true
}

impl Default for DeferConfig {
    fn default() -> Self {
        Self {
            enabled: default_defer_enabled(),
        }
    }
}
