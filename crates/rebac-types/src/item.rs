use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::caveat::CaveatContext;
use crate::refs::{ObjectReference, SubjectReference};
use crate::tuple::{ParseError, RelationTuple, write_caveat};

/// Caveat name used when rendering a check item that carries a context.
const CONTEXT_CAVEAT_NAME: &str = "context";

/// One check of a bulk request: does `subject` have `permission` on `resource`?
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckItem {
    pub resource: ObjectReference,
    pub permission: String,
    pub subject: SubjectReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<CaveatContext>,
}

impl CheckItem {
    pub fn new(
        resource: ObjectReference,
        permission: impl Into<String>,
        subject: SubjectReference,
    ) -> Self {
        Self {
            resource,
            permission: permission.into(),
            subject,
            context: None,
        }
    }

    pub fn with_context(mut self, context: CaveatContext) -> Self {
        self.context = Some(context);
        self
    }

    /// The context, unless it is absent or has no entries.
    pub fn effective_context(&self) -> Option<&CaveatContext> {
        self.context.as_ref().filter(|context| !context.is_empty())
    }
}

impl From<RelationTuple> for CheckItem {
    fn from(tuple: RelationTuple) -> Self {
        CheckItem {
            resource: tuple.resource,
            permission: tuple.relation,
            subject: tuple.subject,
            context: tuple.optional_caveat.and_then(|caveat| caveat.context),
        }
    }
}

impl FromStr for CheckItem {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<RelationTuple>()?.into())
    }
}

impl fmt::Display for CheckItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}@{}", self.resource, self.permission, self.subject)?;
        if let Some(context) = &self.context {
            write_caveat(f, CONTEXT_CAVEAT_NAME, Some(context))?;
        }
        Ok(())
    }
}
