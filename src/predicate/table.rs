//! Fields whose values are looked up in a fixed table and searched as one exact term

use crate::error::QueryError;
use crate::operation::{Operation, IndexQuery, TextField};

use super::quote;


#[derive(Debug, Clone, PartialEq)]
pub struct TermPredicate {
    pub field: TextField,
    pub term: String,
}


/// Friendly names for mime types, shared by `attachment:` and `type:`
fn mime_type_for(word: &str) -> Option<&'static str> {
    match word {
        "any" => Some("any"),
        "application" | "application/*" => Some("application"),
        "bmp" | "image/bmp" => Some("image/bmp"),
        "gif" | "image/gif" => Some("image/gif"),
        "image" | "image/*" => Some("image"),
        "jpeg" | "image/jpeg" => Some("image/jpeg"),
        "excel" | "xls" | "application/vnd.ms-excel" => Some("application/vnd.ms-excel"),
        "ppt" | "application/vnd.ms-powerpoint" => Some("application/vnd.ms-powerpoint"),
        "ms-tnef" | "application/ms-tnef" => Some("application/ms-tnef"),
        "word" | "msword" | "application/msword" => Some("application/msword"),
        "none" => Some("none"),
        "pdf" | "application/pdf" => Some("application/pdf"),
        "text" | "text/*" => Some("text"),
        _ => None,
    }
}


impl TermPredicate {
    fn new(field: TextField, term: &str) -> TermPredicate {
        TermPredicate {
            field: field,
            term: term.to_owned(),
        }
    }

    fn lookup_mime_type(field: TextField, value: &str) -> Result<TermPredicate, QueryError> {
        let word = value.trim().to_lowercase();
        if word.is_empty() {
            return Err(QueryError::EmptyValue(field.prefix()));
        }

        match mime_type_for(&word) {
            Some(mime_type) => Ok(TermPredicate::new(field, mime_type)),
            None => Ok(TermPredicate::new(field, &word)),
        }
    }

    pub fn attachment(value: &str) -> Result<TermPredicate, QueryError> {
        TermPredicate::lookup_mime_type(TextField::Attachments, value)
    }

    pub fn mime_type(value: &str) -> Result<TermPredicate, QueryError> {
        TermPredicate::lookup_mime_type(TextField::Type, value)
    }

    /// `has:attachment` and the recognised object kinds such as `has:phone`
    pub fn has(value: &str) -> Result<TermPredicate, QueryError> {
        let word = value.trim().to_lowercase();

        match &word[..] {
            "" => Err(QueryError::EmptyValue("has")),
            "attachment" | "att" => Ok(TermPredicate::new(TextField::Attachments, "any")),
            _ => Ok(TermPredicate::new(TextField::Objects, &word)),
        }
    }

    pub fn compile(&self, truth: bool) -> Operation {
        Operation::index(self.field, IndexQuery::Term(self.term.clone()), truth)
    }

    pub fn dump(&self) -> String {
        format!("{}:{}", self.field.prefix(), quote(&self.term))
    }
}
