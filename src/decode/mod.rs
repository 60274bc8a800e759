//! Decodes predicate trees from JSON
//!
//! A tree is an array of clauses. Each clause is one of:
//!
//! * a predicate, `{"from": "bob"}` or `{"from": {"value": "bob", "modifier": "exclude"}}`
//! * a nested group, either a bare array or `{"exclude": [...]}` / `{"require": [...]}`
//! * the conjunction `"and"` or `"or"`

pub mod utils;

use serde_json::Value as Json;
use thiserror::Error;

use crate::error::QueryError;
use crate::predicate::{BuildContext, PredicateNode, Modifier};
use crate::predicate::clause::{ClauseList, Clause};

use self::utils::{parse_string, parse_modifier, parse_conjunction};


#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("unrecognised search field {0:?}")]
    UnrecognisedField(String),

    #[error("unrecognised key {0:?}")]
    UnrecognisedKey(String),

    #[error("expected key {0:?}")]
    ExpectedKey(&'static str),

    #[error("expected an object")]
    ExpectedObject,

    #[error("expected an array")]
    ExpectedArray,

    #[error("expected a string")]
    ExpectedString,

    #[error("expected an object or a string")]
    ExpectedObjectOrString,

    #[error("expected an object with a single key")]
    ExpectedSingleKey,

    #[error("invalid modifier {0:?}")]
    InvalidModifier(String),

    #[error("invalid conjunction {0:?}")]
    InvalidConjunction(String),

    #[error(transparent)]
    Query(#[from] QueryError),
}


pub fn parse(ctx: &BuildContext, json: &Json) -> Result<ClauseList, DecodeError> {
    match *json {
        Json::Array(ref clauses) => Ok(ClauseList::new(parse_clauses(ctx, clauses)?)),
        Json::Object(_) => Ok(ClauseList::new(vec![parse_clause(ctx, json)?])),
        _ => Err(DecodeError::ExpectedArray),
    }
}


fn parse_clauses(ctx: &BuildContext, clauses: &[Json]) -> Result<Vec<Clause>, DecodeError> {
    let mut parsed = Vec::with_capacity(clauses.len());

    for clause in clauses.iter() {
        parsed.push(parse_clause(ctx, clause)?);
    }

    Ok(parsed)
}


pub fn parse_clause(ctx: &BuildContext, json: &Json) -> Result<Clause, DecodeError> {
    let object = match *json {
        Json::String(ref conjunction) => return Ok(Clause::Conjunction(parse_conjunction(conjunction)?)),
        Json::Array(ref clauses) => return Ok(Clause::List(ClauseList::new(parse_clauses(ctx, clauses)?))),
        Json::Object(ref object) => object,
        _ => return Err(DecodeError::ExpectedObject),
    };

    let (key, value) = match object.iter().next() {
        Some(entry) if object.len() == 1 => entry,
        _ => return Err(DecodeError::ExpectedSingleKey),
    };

    match key.as_ref() {
        "require" | "exclude" => {
            let modifier = parse_modifier(&Json::String(key.clone()))?;
            let clauses = value.as_array().ok_or(DecodeError::ExpectedArray)?;

            Ok(Clause::List(ClauseList::new(parse_clauses(ctx, clauses)?).with_modifier(modifier)))
        }
        field => Ok(Clause::Node(parse_node(ctx, field, value)?)),
    }
}


pub fn parse_node(ctx: &BuildContext, field: &str, json: &Json) -> Result<PredicateNode, DecodeError> {
    let mut modifier = Modifier::None;

    let value = match *json {
        Json::String(ref value) => value.clone(),
        Json::Object(ref inner_object) => {
            let mut value = None;

            for (key, inner_value) in inner_object.iter() {
                match key.as_ref() {
                    "value" => value = Some(parse_string(inner_value)?),
                    "modifier" => modifier = parse_modifier(inner_value)?,
                    _ => return Err(DecodeError::UnrecognisedKey(key.clone())),
                }
            }

            value.ok_or(DecodeError::ExpectedKey("value"))?
        }
        _ => return Err(DecodeError::ExpectedObjectOrString),
    };

    match PredicateNode::build(ctx, field, &value) {
        Some(node) => Ok(node?.with_modifier(modifier)),
        None => Err(DecodeError::UnrecognisedField(field.to_owned())),
    }
}
