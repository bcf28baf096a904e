use std::num::NonZeroU16;

use indexmap::IndexMap;
use indexmap::map::Entry;
use rebac_cbor::Hash;
use rebac_types::{CheckItem, ObjectAndRelation, RelationReference, Revision};

use crate::cancel::CancelSignal;
use crate::config::PlannerConfig;
use crate::error::PlanError;
use crate::key::GroupingKey;
use crate::params::{ClusteringParameters, DebugOption, DispatchCheckParams};
use crate::unit::{DispatchPlan, DispatchUnit};

/// Cluster `items` into dispatch units.
///
/// Items land in the same unit iff they agree on resource type, permission, subject
/// (including subject relation) and canonical caveat context. Resource ids keep encounter
/// order within a unit and are chunked to at most `max_chunk_size`. Units come back in
/// first-seen order.
///
/// Every item's caveat context must encode to strictly fewer than
/// `params.max_caveat_context_size` bytes; the first one that does not fails the whole call
/// and nothing is returned.
pub fn cluster_items(
    cancel: &CancelSignal,
    params: &ClusteringParameters,
    items: &[CheckItem],
    max_chunk_size: NonZeroU16,
) -> Result<DispatchPlan, PlanError> {
    if cancel.is_cancelled() {
        tracing::debug!(items = items.len(), "bulk check cancelled before planning");
        return Err(PlanError::Cancelled);
    }

    let mut units: IndexMap<GroupingKey, DispatchUnit> = IndexMap::new();
    for item in items {
        let canonical_context = match item.effective_context() {
            Some(context) => {
                let bytes = context.canonical_bytes()?;
                check_context_size(&bytes, params.max_caveat_context_size)?;
                Some(bytes)
            }
            None => None,
        };

        let key = GroupingKey::new(item, canonical_context);
        let unit = match units.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(DispatchUnit::new(check_params(item, params))),
        };
        unit.push_resource_id(item.resource.object_id.clone(), max_chunk_size);
    }

    let plan = DispatchPlan::new(units.into_values().collect());
    tracing::debug!(
        items = items.len(),
        units = plan.len(),
        chunks = plan.chunk_count(),
        max_chunk_size = max_chunk_size.get(),
        revision = %params.at_revision,
        "planned bulk check dispatch"
    );
    Ok(plan)
}

fn check_context_size(canonical: &[u8], limit: usize) -> Result<(), PlanError> {
    let size = canonical.len();
    if size < limit {
        return Ok(());
    }
    tracing::warn!(
        limit,
        size,
        context = %Hash::of_bytes(canonical),
        "caveat context exceeds size quota"
    );
    Err(PlanError::CaveatContextTooLarge { limit, size })
}

fn check_params(item: &CheckItem, params: &ClusteringParameters) -> DispatchCheckParams {
    DispatchCheckParams {
        resource_type: RelationReference::new(&item.resource.object_type, &item.permission),
        subject: ObjectAndRelation::from(&item.subject),
        caveat_context: item.effective_context().cloned(),
        at_revision: params.at_revision,
        maximum_depth: params.maximum_depth,
        debug_option: DebugOption::NoDebugging,
    }
}

/// Planner bound to server configuration; callers supply only the revision and items.
#[derive(Debug, Clone, Default)]
pub struct ClusterPlanner {
    config: PlannerConfig,
}

impl ClusterPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn parameters(&self, at_revision: Revision) -> ClusteringParameters {
        ClusteringParameters::from_config(&self.config, at_revision)
    }

    pub fn plan(
        &self,
        cancel: &CancelSignal,
        at_revision: Revision,
        items: &[CheckItem],
    ) -> Result<DispatchPlan, PlanError> {
        self.plan_with_chunk_size(cancel, at_revision, items, self.config.dispatch_chunk_size)
    }

    pub fn plan_with_chunk_size(
        &self,
        cancel: &CancelSignal,
        at_revision: Revision,
        items: &[CheckItem],
        max_chunk_size: NonZeroU16,
    ) -> Result<DispatchPlan, PlanError> {
        cluster_items(cancel, &self.parameters(at_revision), items, max_chunk_size)
    }
}
