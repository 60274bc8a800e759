//! Predicates over several address fields at once

use crate::error::QueryError;
use crate::mailbox::Flag;
use crate::operation::{Operation, DbConstraint, IndexQuery, TextField};
use crate::phrase::{PhraseShape, split_wildcard};

use super::{CompileContext, any_of, quote};


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressFields {
    pub from: bool,
    pub to: bool,
    pub cc: bool,
}


impl AddressFields {
    pub const TO: AddressFields = AddressFields { from: false, to: true, cc: false };
    pub const FROM: AddressFields = AddressFields { from: true, to: false, cc: false };
    pub const CC: AddressFields = AddressFields { from: false, to: false, cc: true };
    pub const TO_FROM: AddressFields = AddressFields { from: true, to: true, cc: false };
    pub const TO_CC: AddressFields = AddressFields { from: false, to: true, cc: true };
    pub const FROM_CC: AddressFields = AddressFields { from: true, to: false, cc: true };
    pub const TO_FROM_CC: AddressFields = AddressFields { from: true, to: true, cc: true };

    /// The text fields covered, in from, to, cc order
    pub fn text_fields(&self) -> Vec<TextField> {
        let mut fields = Vec::with_capacity(3);

        if self.from {
            fields.push(TextField::From);
        }
        if self.to {
            fields.push(TextField::To);
        }
        if self.cc {
            fields.push(TextField::Cc);
        }

        fields
    }

    /// `tofrom`, `tocc`, ...
    ///
    /// Single fields have their own text prefixes and are named the same way.
    pub fn name(&self) -> &'static str {
        match (self.to, self.from, self.cc) {
            (true, false, false) => "to",
            (false, true, false) => "from",
            (false, false, true) => "cc",
            (true, true, false) => "tofrom",
            (true, false, true) => "tocc",
            (false, true, true) => "fromcc",
            (true, true, true) => "tofromcc",
            (false, false, false) => "",
        }
    }
}


/// The same text against each of a set of address fields
///
/// Matches when any field matches. The negated form requires every field not to match.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressPredicate {
    pub fields: AddressFields,
    pub text: String,
}


impl AddressPredicate {
    pub fn new(fields: AddressFields, text: &str) -> Result<AddressPredicate, QueryError> {
        if text.trim().is_empty() {
            return Err(QueryError::EmptyValue(fields.name()));
        }

        split_wildcard(text)?;

        Ok(AddressPredicate {
            fields: fields,
            text: text.trim().to_owned(),
        })
    }

    pub fn compile(&self, ctx: &CompileContext, truth: bool) -> Result<Operation, QueryError> {
        let mut operations = Vec::new();

        for field in self.fields.text_fields() {
            let operation = if self.text.starts_with('@') {
                Operation::index(field, IndexQuery::Term(self.text.to_lowercase()), truth)
            } else {
                PhraseShape::build(ctx.analyzer, field, &self.text, false)?.into_operation(field, truth)
            };

            operations.push(operation);
        }

        Ok(any_of(operations, truth))
    }

    pub fn dump(&self) -> String {
        format!("{}:{}", self.fields.name(), quote(&self.text))
    }
}


/// Mail sent by or to the searching account
///
/// Sent mail is found through the `\Sent` flag. Mail to the account is found by searching
/// the to and cc fields for the account name and each of its aliases.
#[derive(Debug, Clone, PartialEq)]
pub struct MePredicate {
    pub fields: AddressFields,
}


impl MePredicate {
    pub fn new(fields: AddressFields) -> MePredicate {
        MePredicate {
            fields: fields,
        }
    }

    pub fn compile(&self, ctx: &CompileContext, truth: bool) -> Result<Operation, QueryError> {
        let mut operations = Vec::new();

        if self.fields.from {
            operations.push(Operation::db(DbConstraint::Tag(Flag::Sent.id()), truth));
        }

        if self.fields.to || self.fields.cc {
            let mut addresses = vec![ctx.mailbox.account_name()];
            addresses.extend(ctx.mailbox.account_aliases()?);

            for address in addresses.iter() {
                if self.fields.to {
                    operations.push(PhraseShape::build(ctx.analyzer, TextField::To, address, false)?.into_operation(TextField::To, truth));
                }
                if self.fields.cc {
                    operations.push(PhraseShape::build(ctx.analyzer, TextField::Cc, address, false)?.into_operation(TextField::Cc, truth));
                }
            }
        }

        Ok(any_of(operations, truth))
    }

    pub fn name(&self) -> &'static str {
        match (self.fields.to, self.fields.from, self.fields.cc) {
            (true, false, false) => "tome",
            (false, true, false) => "fromme",
            (false, false, true) => "ccme",
            (true, true, false) => "tofromme",
            (true, false, true) => "toccme",
            (false, true, true) => "fromccme",
            (true, true, true) | (false, false, false) => "tofromccme",
        }
    }

    pub fn dump(&self) -> String {
        format!("is:{}", self.name())
    }
}
