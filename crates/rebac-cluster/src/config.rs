use std::num::NonZeroU16;

use thiserror::Error;

/// Default number of resource ids issued to the engine in one dispatch.
pub const MAX_BULK_CHECK_DISPATCH_CHUNK_SIZE: NonZeroU16 = match NonZeroU16::new(100) {
    Some(size) => size,
    None => unreachable!(),
};

pub const DEFAULT_MAX_CAVEAT_CONTEXT_SIZE: usize = 4096;
pub const DEFAULT_MAXIMUM_DEPTH: u32 = 50;

pub const ENV_MAX_CAVEAT_CONTEXT_SIZE: &str = "REBAC_MAX_CAVEAT_CONTEXT_SIZE";
pub const ENV_MAXIMUM_DEPTH: &str = "REBAC_MAX_CHECK_DEPTH";
pub const ENV_DISPATCH_CHUNK_SIZE: &str = "REBAC_BULK_CHECK_CHUNK_SIZE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Exclusive upper bound, in bytes, on one item's canonical caveat context.
    pub max_caveat_context_size: usize,
    /// Maximum permission-graph traversal depth handed to the engine.
    pub maximum_depth: u32,
    /// Chunk size used when the caller does not supply one.
    pub dispatch_chunk_size: NonZeroU16,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer no larger than {max}, got '{value}'")]
    InvalidValue {
        var: &'static str,
        value: String,
        max: u64,
    },
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_caveat_context_size: DEFAULT_MAX_CAVEAT_CONTEXT_SIZE,
            maximum_depth: DEFAULT_MAXIMUM_DEPTH,
            dispatch_chunk_size: MAX_BULK_CHECK_DISPATCH_CHUNK_SIZE,
        }
    }
}

impl PlannerConfig {
    /// Defaults overridden by any `REBAC_*` variables present in the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable name.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let max_caveat_context_size = read_positive(&lookup, ENV_MAX_CAVEAT_CONTEXT_SIZE)?
            .unwrap_or(defaults.max_caveat_context_size);
        let maximum_depth =
            read_positive(&lookup, ENV_MAXIMUM_DEPTH)?.unwrap_or(defaults.maximum_depth);
        let dispatch_chunk_size = read_positive::<u16, _>(&lookup, ENV_DISPATCH_CHUNK_SIZE)?
            .and_then(NonZeroU16::new)
            .unwrap_or(defaults.dispatch_chunk_size);
        Ok(Self {
            max_caveat_context_size,
            maximum_depth,
            dispatch_chunk_size,
        })
    }
}

fn read_positive<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: TryFrom<u64> + Bounded,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    let invalid = || ConfigError::InvalidValue {
        var,
        value: raw.clone(),
        max: T::MAX_U64,
    };
    let parsed: u64 = raw.trim().parse().map_err(|_| invalid())?;
    if parsed == 0 {
        return Err(invalid());
    }
    T::try_from(parsed).map(Some).map_err(|_| invalid())
}

trait Bounded {
    const MAX_U64: u64;
}

impl Bounded for u16 {
    const MAX_U64: u64 = u16::MAX as u64;
}

impl Bounded for u32 {
    const MAX_U64: u64 = u32::MAX as u64;
}

impl Bounded for usize {
    const MAX_U64: u64 = usize::MAX as u64;
}
