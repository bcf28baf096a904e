//! Shared helpers for planner integration tests.

#![allow(dead_code)]

use std::num::NonZeroU16;

use rebac_cluster::{
    CancelSignal, ClusteringParameters, DispatchPlan, DispatchUnit, MAX_BULK_CHECK_DISPATCH_CHUNK_SIZE,
    PlanError, cluster_items,
};
use rebac_types::{CheckItem, Revision};

pub const TEST_REVISION: Revision = Revision::new(1234);
pub const TEST_DEPTH: u32 = 1;

/// Expected shape of one unit: `resource_type#permission`, subject and chunks.
pub struct Expected<'a> {
    pub resource: &'a str,
    pub subject: &'a str,
    pub chunks: &'a [&'a [&'a str]],
}

pub fn parse_items(raw: &[&str]) -> Vec<CheckItem> {
    raw.iter()
        .map(|r| r.parse().unwrap_or_else(|err| panic!("parse '{r}': {err}")))
        .collect()
}

pub fn params(max_caveat_context_size: usize) -> ClusteringParameters {
    ClusteringParameters::new(TEST_REVISION, max_caveat_context_size, TEST_DEPTH)
}

pub fn chunk_size(size: u16) -> NonZeroU16 {
    NonZeroU16::new(size).expect("non-zero chunk size")
}

pub fn plan(raw: &[&str], max_chunk_size: Option<u16>) -> Result<DispatchPlan, PlanError> {
    cluster_items(
        &CancelSignal::default(),
        &params(usize::MAX),
        &parse_items(raw),
        max_chunk_size.map_or(MAX_BULK_CHECK_DISPATCH_CHUNK_SIZE, chunk_size),
    )
}

/// Sort key for test comparisons only; output order is not part of the contract.
pub fn unit_sort_key(unit: &DispatchUnit) -> String {
    format!("{}@{}", unit.params.resource_type, unit.params.subject)
}

/// Units ordered by resource type, permission and subject, with every chunk sorted.
pub fn normalized(plan: DispatchPlan) -> Vec<DispatchUnit> {
    let mut units = plan.into_units();
    units.sort_by_key(unit_sort_key);
    for unit in &mut units {
        for chunk in &mut unit.chunked_resource_ids {
            chunk.sort();
        }
    }
    units
}

pub fn assert_plan(plan: DispatchPlan, expected: &[Expected<'_>]) {
    let units = normalized(plan);
    assert_eq!(units.len(), expected.len(), "unit count");
    for (unit, want) in units.iter().zip(expected) {
        assert_eq!(unit.params.resource_type.to_string(), want.resource);
        assert_eq!(unit.params.subject.to_string(), want.subject);
        assert_eq!(unit.params.at_revision, TEST_REVISION);
        assert_eq!(unit.params.maximum_depth, TEST_DEPTH);
        assert_eq!(unit.params.debug_option, rebac_cluster::DebugOption::NoDebugging);

        let mut want_chunks: Vec<Vec<&str>> = want.chunks.iter().map(|c| c.to_vec()).collect();
        for chunk in &mut want_chunks {
            chunk.sort();
        }
        assert_eq!(
            unit.chunked_resource_ids, want_chunks,
            "chunks for {}",
            unit_sort_key(unit)
        );
    }
}
