//! Request-side data model for bulk permission checks: object and subject references,
//! caveat contexts, check items and the relationship tuple notation.

pub mod caveat;
pub mod item;
pub mod refs;
pub mod revision;
pub mod tuple;

pub use caveat::{CaveatContext, CaveatContextError};
pub use item::CheckItem;
pub use refs::{ObjectAndRelation, ObjectReference, RelationReference, SubjectReference};
pub use revision::Revision;
pub use tuple::{ContextualizedCaveat, ParseError, RelationTuple};
