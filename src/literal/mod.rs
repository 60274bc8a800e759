//! Parsers for the literals that follow a search field
//!
//! Every parser runs when a predicate is built, so a malformed literal fails the request
//! before anything is compiled.

pub mod integer;
pub mod size;
pub mod date;

use std::fmt;
use std::ops::Bound;

use crate::operation::RangeBound;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
}


impl Comparator {
    /// Splits a leading `<`, `<=`, `>` or `>=` off `text`
    pub fn split(text: &str) -> (Option<Comparator>, &str) {
        if let Some(rest) = text.strip_prefix(">=") {
            (Some(Comparator::Ge), rest)
        } else if let Some(rest) = text.strip_prefix("<=") {
            (Some(Comparator::Le), rest)
        } else if let Some(rest) = text.strip_prefix('>') {
            (Some(Comparator::Gt), rest)
        } else if let Some(rest) = text.strip_prefix('<') {
            (Some(Comparator::Lt), rest)
        } else {
            (None, text)
        }
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Comparator::Eq => "",
            Comparator::Lt => "<",
            Comparator::Le => "<=",
            Comparator::Gt => ">",
            Comparator::Ge => ">=",
        }
    }

    /// The range this comparator selects around `value`
    pub fn range<T: Clone + PartialOrd>(&self, value: T) -> RangeBound<T> {
        match *self {
            Comparator::Eq => RangeBound::exact(value),
            Comparator::Lt => RangeBound::new(Bound::Unbounded, Bound::Excluded(value)),
            Comparator::Le => RangeBound::new(Bound::Unbounded, Bound::Included(value)),
            Comparator::Gt => RangeBound::new(Bound::Excluded(value), Bound::Unbounded),
            Comparator::Ge => RangeBound::new(Bound::Included(value), Bound::Unbounded),
        }
    }
}


impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
