//! Bulk permission-check planning: cluster check items that share a resource type,
//! permission, subject and caveat context into dispatch units with bounded resource-id
//! chunks, enforcing the caveat-context size quota on the way.

pub mod cancel;
pub mod config;
pub mod error;
pub mod key;
pub mod params;
pub mod planner;
pub mod unit;

pub use cancel::{CancelController, CancelSignal};
pub use config::{ConfigError, MAX_BULK_CHECK_DISPATCH_CHUNK_SIZE, PlannerConfig};
pub use error::{PlanError, StatusClass};
pub use key::GroupingKey;
pub use params::{ClusteringParameters, DebugOption, DispatchCheckParams};
pub use planner::{ClusterPlanner, cluster_items};
pub use unit::{DispatchPlan, DispatchRequest, DispatchUnit};
