use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque datastore read point. Every dispatch built for one bulk request carries the same
/// revision so all checks observe a single snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revision(u64);

impl Revision {
    /// Sentinel for "no revision selected".
    pub const NONE: Revision = Revision(0);

    pub const fn new(value: u64) -> Self {
        Revision(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            f.write_str("none")
        } else {
            write!(f, "{}", self.0)
        }
    }
}
