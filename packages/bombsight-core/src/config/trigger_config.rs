//! Trigger detection configuration

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use crate::shared::models::{LiteralConstant, TagFamily};

/// Trigger detection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TriggerConfig {
    /// Maximum nesting of branch-to-branch recursion in the
    /// control-dependency search (1..=4096)
    pub max_search_depth: usize,

    /// Maximum branches + procedures one classification may visit
    /// (1..=10_000_000)
    pub max_visited_nodes: usize,

    /// Tag families that make a value suspicious
    pub tracked_families: Vec<TagFamily>,

    /// Comparands treated as sentinels in addition to zero / -1 / null
    pub extra_sentinels: Vec<LiteralConstant>,

    /// Check recovered path formulas against the traversal path
    pub verify_path_predicates: bool,

    /// Drop triggers whose path formula is inconsistent
    pub require_consistent_predicate: bool,

    /// Classify branches on the rayon pool
    pub parallel: bool,
}

fn default_tracked_families() -> Vec<TagFamily> {
    TagFamily::ALL.to_vec()
}

impl TriggerConfig {
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Fast => Self {
                max_search_depth: 16,
                max_visited_nodes: 2_000,
                tracked_families: default_tracked_families(),
                extra_sentinels: Vec::new(),
                verify_path_predicates: false,
                require_consistent_predicate: false,
                parallel: true,
            },
            Preset::Balanced | Preset::Custom => Self {
                max_search_depth: 64,
                max_visited_nodes: 20_000,
                tracked_families: default_tracked_families(),
                extra_sentinels: Vec::new(),
                verify_path_predicates: true,
                require_consistent_predicate: false,
                parallel: false,
            },
            Preset::Thorough => Self {
                max_search_depth: 256,
                max_visited_nodes: 200_000,
                tracked_families: default_tracked_families(),
                extra_sentinels: Vec::new(),
                verify_path_predicates: true,
                require_consistent_predicate: false,
                parallel: false,
            },
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        ConfigError::check_range(
            "max_search_depth",
            self.max_search_depth,
            1,
            4096,
            "search recursion runs on the native stack",
        )?;
        ConfigError::check_range(
            "max_visited_nodes",
            self.max_visited_nodes,
            1,
            10_000_000,
            "branches + procedures per classification",
        )?;

        if self.tracked_families.is_empty() {
            return Err(ConfigError::NoTrackedFamilies);
        }
        let mut seen = FxHashSet::default();
        for family in &self.tracked_families {
            if !seen.insert(*family) {
                return Err(ConfigError::DuplicateTrackedFamily(*family));
            }
        }

        Ok(())
    }

    pub fn max_search_depth(mut self, depth: usize) -> Self {
        self.max_search_depth = depth;
        self
    }

    pub fn max_visited_nodes(mut self, nodes: usize) -> Self {
        self.max_visited_nodes = nodes;
        self
    }

    pub fn tracked_families(mut self, families: Vec<TagFamily>) -> Self {
        self.tracked_families = families;
        self
    }

    pub fn extra_sentinel(mut self, sentinel: LiteralConstant) -> Self {
        self.extra_sentinels.push(sentinel);
        self
    }

    pub fn verify_path_predicates(mut self, enabled: bool) -> Self {
        self.verify_path_predicates = enabled;
        self
    }

    pub fn require_consistent_predicate(mut self, enabled: bool) -> Self {
        self.require_consistent_predicate = enabled;
        self
    }

    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}
