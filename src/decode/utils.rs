use serde_json::Value as Json;

use crate::predicate::Modifier;
use crate::predicate::clause::Conjunction;

use super::DecodeError;


pub fn parse_string(json: &Json) -> Result<String, DecodeError> {
    match *json {
        Json::String(ref string) => Ok(string.clone()),
        _ => Err(DecodeError::ExpectedString),
    }
}


pub fn parse_modifier(json: &Json) -> Result<Modifier, DecodeError> {
    match *json {
        Json::String(ref value) => {
            match value.as_ref() {
                "none" => Ok(Modifier::None),
                "require" | "+" => Ok(Modifier::Require),
                "exclude" | "-" => Ok(Modifier::Exclude),
                _ => Err(DecodeError::InvalidModifier(value.clone())),
            }
        }
        _ => Err(DecodeError::ExpectedString),
    }
}


pub fn parse_conjunction(value: &str) -> Result<Conjunction, DecodeError> {
    match &value.to_lowercase()[..] {
        "and" => Ok(Conjunction::And),
        "or" => Ok(Conjunction::Or),
        _ => Err(DecodeError::InvalidConjunction(value.to_owned())),
    }
}
