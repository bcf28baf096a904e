use std::fmt;

use serde::{Deserialize, Serialize};

/// Relation name used by the engine for a subject that references the object itself.
pub const ELLIPSIS: &str = "...";

/// A concrete object as named by an API caller (`document:1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectReference {
    pub object_type: String,
    pub object_id: String,
}

impl ObjectReference {
    pub fn new(object_type: impl Into<String>, object_id: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            object_id: object_id.into(),
        }
    }
}

impl fmt::Display for ObjectReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.object_type, self.object_id)
    }
}

/// A check subject: an object, optionally narrowed to a subject set (`group:eng#member`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubjectReference {
    pub object: ObjectReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional_relation: Option<String>,
}

impl SubjectReference {
    pub fn new(object_type: impl Into<String>, object_id: impl Into<String>) -> Self {
        Self {
            object: ObjectReference::new(object_type, object_id),
            optional_relation: None,
        }
    }

    pub fn with_relation(mut self, relation: impl Into<String>) -> Self {
        self.optional_relation = Some(relation.into());
        self
    }

    /// Subject relation as the engine sees it; absent and `...` are the same thing.
    pub fn relation(&self) -> Option<&str> {
        match self.optional_relation.as_deref() {
            None | Some("") | Some(ELLIPSIS) => None,
            Some(rel) => Some(rel),
        }
    }
}

impl fmt::Display for SubjectReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.relation() {
            Some(rel) => write!(f, "{}#{rel}", self.object),
            None => write!(f, "{}", self.object),
        }
    }
}

/// Resolved resource type and permission (or relation) handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelationReference {
    pub namespace: String,
    pub relation: String,
}

impl RelationReference {
    pub fn new(namespace: impl Into<String>, relation: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            relation: relation.into(),
        }
    }
}

impl fmt::Display for RelationReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.namespace, self.relation)
    }
}

/// Resolved subject handed to the engine. A subject without a relation carries `...`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectAndRelation {
    pub namespace: String,
    pub object_id: String,
    pub relation: String,
}

impl ObjectAndRelation {
    pub fn new(
        namespace: impl Into<String>,
        object_id: impl Into<String>,
        relation: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            object_id: object_id.into(),
            relation: relation.into(),
        }
    }

    pub fn is_ellipsis(&self) -> bool {
        self.relation == ELLIPSIS
    }
}

impl From<&SubjectReference> for ObjectAndRelation {
    fn from(subject: &SubjectReference) -> Self {
        ObjectAndRelation {
            namespace: subject.object.object_type.clone(),
            object_id: subject.object.object_id.clone(),
            relation: subject.relation().unwrap_or(ELLIPSIS).to_string(),
        }
    }
}

impl fmt::Display for ObjectAndRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ellipsis() {
            write!(f, "{}:{}", self.namespace, self.object_id)
        } else {
            write!(f, "{}:{}#{}", self.namespace, self.object_id, self.relation)
        }
    }
}
