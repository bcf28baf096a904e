//! Text notation for relationships and checks:
//! `resource_type:resource_id#relation@subject_type:subject_id[#subject_relation][[caveat[:{json}]]]`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::caveat::{CaveatContext, CaveatContextError};
use crate::refs::{ObjectReference, SubjectReference};

const RESERVED: [char; 5] = [':', '#', '@', '[', ']'];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextualizedCaveat {
    pub caveat_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<CaveatContext>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationTuple {
    pub resource: ObjectReference,
    pub relation: String,
    pub subject: SubjectReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional_caveat: Option<ContextualizedCaveat>,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("missing '@subject' in '{0}'")]
    MissingSubject(String),
    #[error("missing '#relation' on resource in '{0}'")]
    MissingRelation(String),
    #[error("invalid object reference '{0}', expected 'type:id'")]
    InvalidObject(String),
    #[error("invalid {field} '{value}'")]
    InvalidIdentifier { field: &'static str, value: String },
    #[error("unterminated caveat in '{0}'")]
    UnterminatedCaveat(String),
    #[error("invalid caveat context json: {0}")]
    InvalidContextJson(#[from] serde_json::Error),
    #[error(transparent)]
    InvalidContext(#[from] CaveatContextError),
}

impl FromStr for RelationTuple {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let (body, optional_caveat) = split_caveat(input)?;
        let (resource_part, subject_part) = body
            .split_once('@')
            .ok_or_else(|| ParseError::MissingSubject(input.to_string()))?;
        let (object, relation) = resource_part
            .split_once('#')
            .ok_or_else(|| ParseError::MissingRelation(input.to_string()))?;
        Ok(RelationTuple {
            resource: parse_object(object)?,
            relation: identifier("relation", relation)?.to_string(),
            subject: parse_subject(subject_part)?,
            optional_caveat,
        })
    }
}

impl fmt::Display for RelationTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}@{}", self.resource, self.relation, self.subject)?;
        if let Some(caveat) = &self.optional_caveat {
            write_caveat(f, &caveat.caveat_name, caveat.context.as_ref())?;
        }
        Ok(())
    }
}

pub(crate) fn write_caveat(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    context: Option<&CaveatContext>,
) -> fmt::Result {
    match context {
        Some(context) => {
            let json = serde_json::to_string(context).map_err(|_| fmt::Error)?;
            write!(f, "[{name}:{json}]")
        }
        None => write!(f, "[{name}]"),
    }
}

fn split_caveat(input: &str) -> Result<(&str, Option<ContextualizedCaveat>), ParseError> {
    let Some(start) = input.find('[') else {
        return Ok((input, None));
    };
    let inner = input[start + 1..]
        .strip_suffix(']')
        .ok_or_else(|| ParseError::UnterminatedCaveat(input.to_string()))?;
    let (name, context) = match inner.split_once(':') {
        Some((name, raw)) => {
            let value: Value = serde_json::from_str(raw)?;
            (name, Some(CaveatContext::try_from(value)?))
        }
        None => (inner, None),
    };
    let caveat = ContextualizedCaveat {
        caveat_name: identifier("caveat name", name)?.to_string(),
        context,
    };
    Ok((&input[..start], Some(caveat)))
}

fn parse_object(raw: &str) -> Result<ObjectReference, ParseError> {
    let (object_type, object_id) = raw
        .split_once(':')
        .ok_or_else(|| ParseError::InvalidObject(raw.to_string()))?;
    Ok(ObjectReference::new(
        identifier("object type", object_type)?,
        identifier("object id", object_id)?,
    ))
}

fn parse_subject(raw: &str) -> Result<SubjectReference, ParseError> {
    let (object, relation) = match raw.split_once('#') {
        Some((object, relation)) => (object, Some(identifier("subject relation", relation)?)),
        None => (raw, None),
    };
    let object = parse_object(object)?;
    Ok(SubjectReference {
        object,
        optional_relation: relation.map(str::to_string),
    })
}

fn identifier<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ParseError> {
    let invalid = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || RESERVED.contains(&c));
    if invalid {
        return Err(ParseError::InvalidIdentifier {
            field,
            value: value.to_string(),
        });
    }
    Ok(value)
}
