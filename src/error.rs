//! Errors raised while building or compiling predicates

use std::fmt;

use thiserror::Error;

use crate::mailbox::{AccountId, FolderId, ItemId};


/// The three failure classes a search request can end with
///
/// None of them are retried, and none of them are downgraded to "no results".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    LiteralParse,
    ReferenceNotFound,
    UnsupportedCombination,
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Date,
    Size,
    Number,
    ItemId,
    String,
}


impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            LiteralKind::Date => "date",
            LiteralKind::Size => "size",
            LiteralKind::Number => "number",
            LiteralKind::ItemId => "item id",
            LiteralKind::String => "string",
        };

        f.write_str(name)
    }
}


/// Something a predicate referred to by name or id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    Folder(String),
    FolderId(FolderId),
    Tag(String),
    Account(AccountId),
    BuiltIn(String),
}


impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Reference::Folder(ref path) => write!(f, "folder {:?}", path),
            Reference::FolderId(id) => write!(f, "folder {}", id),
            Reference::Tag(ref name) => write!(f, "tag {:?}", name),
            Reference::Account(ref id) => write!(f, "account {}", id),
            Reference::BuiltIn(ref name) => write!(f, "built-in query {:?}", name),
        }
    }
}


#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("invalid {kind} literal {text:?}: {reason}")]
    InvalidLiteral {
        kind: LiteralKind,
        text: String,
        reason: &'static str,
    },

    #[error("comparison operators are not allowed with {field}: {text:?}")]
    ComparatorNotAllowed {
        field: &'static str,
        text: String,
    },

    #[error("missing text after {0}")]
    EmptyValue(&'static str),

    #[error("unknown value {value:?} for {field}")]
    UnknownValue {
        field: &'static str,
        value: String,
    },

    #[error("no such {0}")]
    NotFound(Reference),

    #[error("mountpoint chain loops back to folder {0}")]
    MountpointCycle(FolderId),

    #[error("mountpoint chain is deeper than {0} folders")]
    MountpointTooDeep(usize),

    #[error("folder {0} is a local mountpoint inside a subfolder hierarchy, which cannot be expanded")]
    NestedLocalMountpoint(FolderId),

    #[error("wildcards are only supported at the end of the final token: {0:?}")]
    MisplacedWildcard(String),

    #[error("conversation {0} is virtual and must be searched as an item")]
    VirtualConversation(ItemId),
}


impl QueryError {
    pub fn kind(&self) -> ErrorKind {
        match *self {
            QueryError::InvalidLiteral { .. } |
            QueryError::ComparatorNotAllowed { .. } |
            QueryError::EmptyValue(_) |
            QueryError::UnknownValue { .. } => ErrorKind::LiteralParse,
            QueryError::NotFound(_) => ErrorKind::ReferenceNotFound,
            QueryError::MountpointCycle(_) |
            QueryError::MountpointTooDeep(_) |
            QueryError::NestedLocalMountpoint(_) |
            QueryError::MisplacedWildcard(_) |
            QueryError::VirtualConversation(_) => ErrorKind::UnsupportedCombination,
        }
    }

    pub(crate) fn invalid(kind: LiteralKind, text: &str, reason: &'static str) -> QueryError {
        QueryError::InvalidLiteral {
            kind: kind,
            text: text.to_owned(),
            reason: reason,
        }
    }
}
