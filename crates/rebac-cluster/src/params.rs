use rebac_types::{CaveatContext, ObjectAndRelation, RelationReference, Revision};
use serde::{Deserialize, Serialize};

use crate::config::PlannerConfig;

/// Engine debug mode. Bulk checks never request debug traces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebugOption {
    #[default]
    NoDebugging,
    BasicDebugging,
    TraceDebugging,
}

/// Per-request inputs shared by every item of a bulk check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusteringParameters {
    pub at_revision: Revision,
    /// Exclusive upper bound on an item's canonical caveat-context size, in bytes.
    pub max_caveat_context_size: usize,
    pub maximum_depth: u32,
}

impl ClusteringParameters {
    pub fn new(at_revision: Revision, max_caveat_context_size: usize, maximum_depth: u32) -> Self {
        Self {
            at_revision,
            max_caveat_context_size,
            maximum_depth,
        }
    }

    pub fn from_config(config: &PlannerConfig, at_revision: Revision) -> Self {
        Self::new(
            at_revision,
            config.max_caveat_context_size,
            config.maximum_depth,
        )
    }
}

/// Parameter block of one engine check call; shared by all chunks of a dispatch unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchCheckParams {
    pub resource_type: RelationReference,
    pub subject: ObjectAndRelation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caveat_context: Option<CaveatContext>,
    pub at_revision: Revision,
    pub maximum_depth: u32,
    pub debug_option: DebugOption,
}
