use std::num::NonZeroU16;

use serde::{Deserialize, Serialize};

use crate::params::DispatchCheckParams;

/// Upper bound on the capacity reserved up front for a fresh chunk.
const INITIAL_CHUNK_CAPACITY: usize = 16;

/// One clustered check: a shared parameter block plus the resource ids to check with it,
/// split into chunks of at most the configured dispatch size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchUnit {
    pub params: DispatchCheckParams,
    pub chunked_resource_ids: Vec<Vec<String>>,
}

/// A single engine call: one chunk of a unit together with the unit's parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchRequest<'a> {
    pub params: &'a DispatchCheckParams,
    pub resource_ids: &'a [String],
}

impl DispatchUnit {
    pub(crate) fn new(params: DispatchCheckParams) -> Self {
        Self {
            params,
            chunked_resource_ids: Vec::new(),
        }
    }

    /// Append to the last chunk, opening a new one when the last is full.
    pub(crate) fn push_resource_id(&mut self, resource_id: String, max_chunk_size: NonZeroU16) {
        let max = usize::from(max_chunk_size.get());
        match self.chunked_resource_ids.last_mut() {
            Some(chunk) if chunk.len() < max => chunk.push(resource_id),
            _ => {
                let mut chunk = Vec::with_capacity(max.min(INITIAL_CHUNK_CAPACITY));
                chunk.push(resource_id);
                self.chunked_resource_ids.push(chunk);
            }
        }
    }

    pub fn chunk_count(&self) -> usize {
        self.chunked_resource_ids.len()
    }

    pub fn resource_id_count(&self) -> usize {
        self.chunked_resource_ids.iter().map(Vec::len).sum()
    }

    pub fn requests(&self) -> impl Iterator<Item = DispatchRequest<'_>> {
        self.chunked_resource_ids
            .iter()
            .map(move |chunk| DispatchRequest {
                params: &self.params,
                resource_ids: chunk,
            })
    }
}

/// Output of one planning call, units in first-seen key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DispatchPlan {
    units: Vec<DispatchUnit>,
}

impl DispatchPlan {
    pub(crate) fn new(units: Vec<DispatchUnit>) -> Self {
        Self { units }
    }

    pub fn units(&self) -> &[DispatchUnit] {
        &self.units
    }

    pub fn into_units(self) -> Vec<DispatchUnit> {
        self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DispatchUnit> {
        self.units.iter()
    }

    pub fn chunk_count(&self) -> usize {
        self.units.iter().map(DispatchUnit::chunk_count).sum()
    }

    pub fn total_resource_ids(&self) -> usize {
        self.units.iter().map(DispatchUnit::resource_id_count).sum()
    }

    /// Every engine call the plan requires, unit by unit.
    pub fn requests(&self) -> impl Iterator<Item = DispatchRequest<'_>> {
        self.units.iter().flat_map(|unit| unit.requests())
    }
}

impl IntoIterator for DispatchPlan {
    type Item = DispatchUnit;
    type IntoIter = std::vec::IntoIter<DispatchUnit>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.into_iter()
    }
}

impl<'a> IntoIterator for &'a DispatchPlan {
    type Item = &'a DispatchUnit;
    type IntoIter = std::slice::Iter<'a, DispatchUnit>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::DebugOption;
    use rebac_types::{ObjectAndRelation, RelationReference, Revision};

    fn unit() -> DispatchUnit {
        DispatchUnit::new(DispatchCheckParams {
            resource_type: RelationReference::new("document", "view"),
            subject: ObjectAndRelation::new("user", "1", "..."),
            caveat_context: None,
            at_revision: Revision::NONE,
            maximum_depth: 1,
            debug_option: DebugOption::NoDebugging,
        })
    }

    fn size(n: u16) -> NonZeroU16 {
        NonZeroU16::new(n).unwrap()
    }

    #[test]
    fn chunks_fill_in_order() {
        let mut unit = unit();
        for id in ["a", "b", "c", "d", "e"] {
            unit.push_resource_id(id.into(), size(2));
        }
        assert_eq!(
            unit.chunked_resource_ids,
            vec![vec!["a", "b"], vec!["c", "d"], vec!["e"]]
        );
        assert_eq!(unit.chunk_count(), 3);
        assert_eq!(unit.resource_id_count(), 5);
    }

    #[test]
    fn chunk_size_one_isolates_every_id() {
        let mut unit = unit();
        for id in ["a", "a", "b"] {
            unit.push_resource_id(id.into(), size(1));
        }
        assert_eq!(unit.chunked_resource_ids, vec![vec!["a"], vec!["a"], vec!["b"]]);
    }

    #[test]
    fn requests_share_unit_params() {
        let mut unit = unit();
        for id in ["1", "2", "3"] {
            unit.push_resource_id(id.into(), size(2));
        }
        let plan = DispatchPlan::new(vec![unit.clone()]);
        let requests: Vec<_> = plan.requests().collect();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|req| req.params == &unit.params));
        assert_eq!(requests[1].resource_ids, ["3".to_string()]);
        assert_eq!(plan.chunk_count(), 2);
        assert_eq!(plan.total_resource_ids(), 3);
    }

    #[test]
    fn empty_plan() {
        let plan = DispatchPlan::default();
        assert!(plan.is_empty());
        assert_eq!(plan.len(), 0);
        assert_eq!(plan.requests().count(), 0);
    }
}
