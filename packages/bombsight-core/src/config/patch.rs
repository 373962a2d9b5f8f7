//! Partial configuration overrides
//!
//! A patch only names the fields it changes; everything else comes from the
//! preset it is applied to.

use serde::{Deserialize, Serialize};

use super::trigger_config::TriggerConfig;
use crate::shared::models::{LiteralConstant, TagFamily};

/// Patch type for TriggerConfig (all fields optional)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TriggerConfigPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_search_depth: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_visited_nodes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracked_families: Option<Vec<TagFamily>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_sentinels: Option<Vec<LiteralConstant>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify_path_predicates: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_consistent_predicate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel: Option<bool>,
}

impl TriggerConfig {
    /// Overwrite the fields `patch` sets
    pub fn apply_patch(mut self, patch: TriggerConfigPatch) -> Self {
        if let Some(v) = patch.max_search_depth {
            self.max_search_depth = v;
        }
        if let Some(v) = patch.max_visited_nodes {
            self.max_visited_nodes = v;
        }
        if let Some(v) = patch.tracked_families {
            self.tracked_families = v;
        }
        if let Some(v) = patch.extra_sentinels {
            self.extra_sentinels = v;
        }
        if let Some(v) = patch.verify_path_predicates {
            self.verify_path_predicates = v;
        }
        if let Some(v) = patch.require_consistent_predicate {
            self.require_consistent_predicate = v;
        }
        if let Some(v) = patch.parallel {
            self.parallel = v;
        }
        self
    }
}

/// Full patch reproducing `config` on any preset
impl From<&TriggerConfig> for TriggerConfigPatch {
    fn from(config: &TriggerConfig) -> Self {
        Self {
            max_search_depth: Some(config.max_search_depth),
            max_visited_nodes: Some(config.max_visited_nodes),
            tracked_families: Some(config.tracked_families.clone()),
            extra_sentinels: Some(config.extra_sentinels.clone()),
            verify_path_predicates: Some(config.verify_path_predicates),
            require_consistent_predicate: Some(config.require_consistent_predicate),
            parallel: Some(config.parallel),
        }
    }
}
