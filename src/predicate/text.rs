//! Free text predicates over the full-text index

use crate::error::QueryError;
use crate::literal::Comparator;
use crate::operation::{Operation, IndexQuery, TextField};
use crate::phrase::{PhraseShape, split_wildcard};

use super::{CompileContext, PredicateNode, Predicate, quote, quote_always};
use super::range::{StringRangePredicate, StringColumn};


/// Builds the node for a text field such as `subject:` or `from:`
///
/// Address fields given `@domain` search for the domain as a single term. `from:` and
/// `subject:` followed by a comparator become string range predicates.
pub fn text_field(field: TextField, value: &str) -> Result<PredicateNode, QueryError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(QueryError::EmptyValue(field.prefix()));
    }

    if field.is_address() && trimmed.starts_with('@') {
        return Ok(PredicateNode::new(Predicate::Domain(DomainPredicate::new(field, trimmed))));
    }

    let column = match field {
        TextField::From => Some(StringColumn::Sender),
        TextField::Subject => Some(StringColumn::Subject),
        _ => None,
    };

    if let Some(column) = column {
        if trimmed.len() > 1 && (trimmed.starts_with('<') || trimmed.starts_with('>')) {
            return StringRangePredicate::new(column, trimmed).map(|range| PredicateNode::new(Predicate::StringRange(range)));
        }
    }

    TextPredicate::new(field, value, false).map(|text| PredicateNode::new(Predicate::Text(text)))
}


#[derive(Debug, Clone, PartialEq)]
pub struct TextPredicate {
    pub field: TextField,
    pub text: String,

    /// Expand the final token as a prefix even without a trailing `*`
    pub quick: bool,
}


impl TextPredicate {
    pub fn new(field: TextField, text: &str, quick: bool) -> Result<TextPredicate, QueryError> {
        split_wildcard(text)?;

        Ok(TextPredicate {
            field: field,
            text: text.to_owned(),
            quick: quick,
        })
    }

    pub fn compile(&self, ctx: &CompileContext, truth: bool) -> Result<Operation, QueryError> {
        let shape = PhraseShape::build(ctx.analyzer, self.field, &self.text, self.quick)?;

        if shape == PhraseShape::Empty {
            debug!(ctx.log, "text clause has no tokens"; "field" => self.field.prefix(), "text" => &self.text);
        }

        Ok(shape.into_operation(self.field, truth))
    }

    pub fn dump(&self) -> String {
        if self.quick && !self.text.trim_end().ends_with('*') {
            format!("{}:{}", self.field.prefix(), quote(&format!("{}*", self.text.trim_end())))
        } else {
            format!("{}:{}", self.field.prefix(), quote(&self.text))
        }
    }
}


/// Text against the contact field
///
/// A single word is matched as a prefix, so `contact:jo` finds "John".
#[derive(Debug, Clone, PartialEq)]
pub struct ContactPredicate {
    pub text: String,
}


impl ContactPredicate {
    pub fn new(text: &str) -> Result<ContactPredicate, QueryError> {
        if text.trim().is_empty() {
            return Err(QueryError::EmptyValue("contact"));
        }

        split_wildcard(text)?;

        Ok(ContactPredicate {
            text: text.to_owned(),
        })
    }

    pub fn compile(&self, ctx: &CompileContext, truth: bool) -> Result<Operation, QueryError> {
        let (body, wildcard) = split_wildcard(&self.text)?;
        let body = body.trim();

        let auto_wildcard = !wildcard
            && !body.is_empty()
            && body != "."
            && ctx.analyzer.tokenize(TextField::Contact, body).len() <= 1;

        let shape = PhraseShape::build(ctx.analyzer, TextField::Contact, &self.text, auto_wildcard)?;

        if shape == PhraseShape::Empty {
            debug!(ctx.log, "text clause has no tokens"; "field" => "contact", "text" => &self.text);
        }

        Ok(shape.into_operation(TextField::Contact, truth))
    }

    pub fn dump(&self) -> String {
        format!("contact:{}", quote(&self.text))
    }
}


/// `@domain` against an address field, matched as one exact term
#[derive(Debug, Clone, PartialEq)]
pub struct DomainPredicate {
    pub field: TextField,
    pub domain: String,
}


impl DomainPredicate {
    pub fn new(field: TextField, domain: &str) -> DomainPredicate {
        DomainPredicate {
            field: field,
            domain: domain.to_owned(),
        }
    }

    pub fn compile(&self, truth: bool) -> Operation {
        Operation::index(self.field, IndexQuery::Term(self.domain.to_lowercase()), truth)
    }

    pub fn dump(&self) -> String {
        format!("{}:{}", self.field.prefix(), quote(&self.domain))
    }
}


/// A structured field, written `#name:value` or `field[name]:value`
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPredicate {
    pub name: String,
    pub value: String,
}


impl FieldPredicate {
    pub fn new(name: &str, value: &str) -> Result<FieldPredicate, QueryError> {
        if name.is_empty() || value.trim().is_empty() {
            return Err(QueryError::EmptyValue("field"));
        }

        split_wildcard(value)?;

        Ok(FieldPredicate {
            name: name.to_owned(),
            value: value.to_owned(),
        })
    }

    /// The numeric range named by values such as `>5` or `<=10`
    fn numeric_range(&self) -> Option<(Comparator, i64)> {
        match Comparator::split(self.value.trim()) {
            (Some(comparator), number) => number.trim().parse::<i64>().ok().map(|number| (comparator, number)),
            (None, _) => None,
        }
    }

    pub fn compile(&self, ctx: &CompileContext, truth: bool) -> Result<Operation, QueryError> {
        if let Some((comparator, number)) = self.numeric_range() {
            return Ok(Operation::index(TextField::Field, IndexQuery::Range {
                name: self.name.to_lowercase(),
                range: comparator.range(number),
            }, truth));
        }

        let text = format!("{}:{}", self.name, self.value.trim());
        let shape = PhraseShape::build(ctx.analyzer, TextField::Field, &text, false)?;

        Ok(shape.into_operation(TextField::Field, truth))
    }

    pub fn dump(&self) -> String {
        format!("#{}:{}", self.name, quote_always(&self.value))
    }
}
