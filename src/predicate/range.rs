//! Range predicates over dates, sizes, counters and sortable strings
//!
//! Each keeps the text it was built from so that it dumps back to exactly the same literal.

use crate::error::{QueryError, LiteralKind};
use crate::literal::Comparator;
use crate::literal::date::{DateLiteral, DateUnit};
use crate::literal::integer::IntegerLiteral;
use crate::literal::size::SizeLiteral;
use crate::operation::{Operation, DbConstraint, DateField, RangeBound};
use crate::settings::SearchSettings;

use super::{CompileContext, quote};


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePrefix {
    Date,
    Day,
    Week,
    Month,
    Year,
    After,
    Before,
    ModifiedDate,
    AppointmentStart,
    AppointmentEnd,
    ConversationStart,
    ConversationEnd,
}


impl DatePrefix {
    pub fn name(&self) -> &'static str {
        match *self {
            DatePrefix::Date => "date",
            DatePrefix::Day => "day",
            DatePrefix::Week => "week",
            DatePrefix::Month => "month",
            DatePrefix::Year => "year",
            DatePrefix::After => "after",
            DatePrefix::Before => "before",
            DatePrefix::ModifiedDate => "mdate",
            DatePrefix::AppointmentStart => "appt-start",
            DatePrefix::AppointmentEnd => "appt-end",
            DatePrefix::ConversationStart => "conv-start",
            DatePrefix::ConversationEnd => "conv-end",
        }
    }

    pub fn field(&self) -> DateField {
        match *self {
            DatePrefix::ModifiedDate => DateField::ModifiedDate,
            DatePrefix::AppointmentStart => DateField::AppointmentStart,
            DatePrefix::AppointmentEnd => DateField::AppointmentEnd,
            DatePrefix::ConversationStart => DateField::ConversationStart,
            DatePrefix::ConversationEnd => DateField::ConversationEnd,
            _ => DateField::Date,
        }
    }

    fn default_unit(&self) -> DateUnit {
        match *self {
            DatePrefix::Week => DateUnit::Week,
            DatePrefix::Month => DateUnit::Month,
            DatePrefix::Year => DateUnit::Year,
            _ => DateUnit::Day,
        }
    }

    fn implied_comparator(&self) -> Comparator {
        match *self {
            DatePrefix::Before => Comparator::Lt,
            DatePrefix::After => Comparator::Gt,
            _ => Comparator::Eq,
        }
    }

    fn allows_comparator(&self) -> bool {
        match *self {
            DatePrefix::Before | DatePrefix::After => false,
            _ => true,
        }
    }
}


#[derive(Debug, Clone, PartialEq)]
pub struct DatePredicate {
    pub prefix: DatePrefix,
    pub text: String,
    pub literal: DateLiteral,
}


impl DatePredicate {
    pub fn new(prefix: DatePrefix, text: &str, settings: &SearchSettings) -> Result<DatePredicate, QueryError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(QueryError::EmptyValue(prefix.name()));
        }

        let literal = DateLiteral::parse(text, prefix.default_unit(), settings)?;

        if literal.comparator.is_some() && !prefix.allows_comparator() {
            return Err(QueryError::ComparatorNotAllowed {
                field: prefix.name(),
                text: text.to_owned(),
            });
        }

        Ok(DatePredicate {
            prefix: prefix,
            text: text.to_owned(),
            literal: literal,
        })
    }

    pub fn compile(&self, ctx: &CompileContext, truth: bool) -> Operation {
        debug!(ctx.log, "date window"; "field" => self.prefix.name(), "start" => self.literal.window.start, "end" => self.literal.window.end);

        Operation::db(DbConstraint::Date {
            field: self.prefix.field(),
            range: self.literal.range(self.prefix.implied_comparator()),
        }, truth)
    }

    pub fn dump(&self) -> String {
        format!("{}:{}", self.prefix.name(), quote(&self.text))
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizePrefix {
    Size,
    Larger,
    Bigger,
    Smaller,
}


impl SizePrefix {
    pub fn name(&self) -> &'static str {
        match *self {
            SizePrefix::Size => "size",
            SizePrefix::Larger => "larger",
            SizePrefix::Bigger => "bigger",
            SizePrefix::Smaller => "smaller",
        }
    }

    fn implied_comparator(&self) -> Comparator {
        match *self {
            SizePrefix::Size => Comparator::Eq,
            SizePrefix::Larger | SizePrefix::Bigger => Comparator::Gt,
            SizePrefix::Smaller => Comparator::Lt,
        }
    }
}


#[derive(Debug, Clone, PartialEq)]
pub struct SizePredicate {
    pub prefix: SizePrefix,
    pub text: String,
    pub literal: SizeLiteral,
}


impl SizePredicate {
    pub fn new(prefix: SizePrefix, text: &str) -> Result<SizePredicate, QueryError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(QueryError::EmptyValue(prefix.name()));
        }

        Ok(SizePredicate {
            prefix: prefix,
            text: text.to_owned(),
            literal: SizeLiteral::parse(text)?,
        })
    }

    pub fn compile(&self, truth: bool) -> Operation {
        Operation::db(DbConstraint::Size(self.literal.range(self.prefix.implied_comparator())), truth)
    }

    pub fn dump(&self) -> String {
        format!("{}:{}", self.prefix.name(), quote(&self.text))
    }
}


/// `modseq:` and `conv-count:`
#[derive(Debug, Clone, PartialEq)]
pub struct IntegerPredicate {
    pub field: &'static str,
    pub text: String,
    pub literal: IntegerLiteral,
}


impl IntegerPredicate {
    pub fn new(field: &'static str, text: &str) -> Result<IntegerPredicate, QueryError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(QueryError::EmptyValue(field));
        }

        Ok(IntegerPredicate {
            field: field,
            text: text.to_owned(),
            literal: IntegerLiteral::parse(text)?,
        })
    }

    pub fn compile(&self, constraint: fn(RangeBound) -> DbConstraint, truth: bool) -> Operation {
        Operation::db(constraint(self.literal.range()), truth)
    }

    pub fn dump(&self) -> String {
        format!("{}:{}", self.field, quote(&self.text))
    }
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringColumn {
    Sender,
    Subject,
}


impl StringColumn {
    fn prefix(&self) -> &'static str {
        match *self {
            StringColumn::Sender => "from",
            StringColumn::Subject => "subject",
        }
    }
}


/// `from:>=m` or `subject:<b`, compared against the sortable column rather than the index
#[derive(Debug, Clone, PartialEq)]
pub struct StringRangePredicate {
    pub column: StringColumn,
    pub comparator: Comparator,
    pub value: String,
}


impl StringRangePredicate {
    pub fn new(column: StringColumn, text: &str) -> Result<StringRangePredicate, QueryError> {
        let (comparator, value) = Comparator::split(text.trim());

        let comparator = comparator.ok_or_else(|| QueryError::invalid(LiteralKind::String, text, "expected a comparator"))?;
        if value.is_empty() {
            return Err(QueryError::invalid(LiteralKind::String, text, "missing value after the comparator"));
        }

        Ok(StringRangePredicate {
            column: column,
            comparator: comparator,
            value: value.to_owned(),
        })
    }

    pub fn compile(&self, truth: bool) -> Operation {
        let range = self.comparator.range(self.value.clone());

        let constraint = match self.column {
            StringColumn::Sender => DbConstraint::Sender(range),
            StringColumn::Subject => DbConstraint::Subject(range),
        };

        Operation::db(constraint, truth)
    }

    pub fn dump(&self) -> String {
        format!("{}:{}", self.column.prefix(), quote(&format!("{}{}", self.comparator, self.value)))
    }
}


#[cfg(test)]
mod tests {
    use std::ops::Bound;

    use crate::error::{QueryError, LiteralKind};
    use crate::operation::{Operation, DbConstraint, DateField, RangeBound};
    use crate::predicate::tests::{build, compile};

    // 2024-03-14T00:00:00Z and 2024-03-15T00:00:00Z
    const MAR14: i64 = 1710374400000;
    const MAR15: i64 = 1710460800000;

    fn date(field: DateField, low: Bound<i64>, high: Bound<i64>, truth: bool) -> Operation {
        Operation::db(DbConstraint::Date {
            field: field,
            range: RangeBound::new(low, high),
        }, truth)
    }

    #[test]
    fn test_relative_date() {
        let node = build("date", "-1d").unwrap();

        assert_eq!(compile(&node, true), Ok(date(DateField::Date, Bound::Included(MAR14), Bound::Excluded(MAR15), true)));
        assert_eq!(compile(&node, false), Ok(date(DateField::Date, Bound::Included(MAR14), Bound::Excluded(MAR15), false)));
    }

    #[test]
    fn test_before_and_after() {
        assert_eq!(compile(&build("before", "yesterday").unwrap(), true), Ok(date(DateField::Date, Bound::Unbounded, Bound::Excluded(MAR14), true)));
        assert_eq!(compile(&build("after", "yesterday").unwrap(), true), Ok(date(DateField::Date, Bound::Included(MAR15), Bound::Unbounded, true)));
    }

    #[test]
    fn test_before_rejects_comparator() {
        assert_eq!(build("before", ">-1d"), Err(QueryError::ComparatorNotAllowed {
            field: "before",
            text: ">-1d".to_owned(),
        }));
    }

    #[test]
    fn test_date_comparators() {
        assert_eq!(compile(&build("date", "<=-1d").unwrap(), true), Ok(date(DateField::Date, Bound::Unbounded, Bound::Excluded(MAR15), true)));
        assert_eq!(compile(&build("date", ">=-1d").unwrap(), true), Ok(date(DateField::Date, Bound::Included(MAR14), Bound::Unbounded, true)));
    }

    #[test]
    fn test_date_fields() {
        assert_eq!(compile(&build("appt-start", "-1d").unwrap(), true), Ok(date(DateField::AppointmentStart, Bound::Included(MAR14), Bound::Excluded(MAR15), true)));
        assert_eq!(compile(&build("mdate", "-1d").unwrap(), true), Ok(date(DateField::ModifiedDate, Bound::Included(MAR14), Bound::Excluded(MAR15), true)));
    }

    #[test]
    fn test_invalid_date() {
        assert_eq!(build("date", "13/45/2007").unwrap_err().kind(), crate::error::ErrorKind::LiteralParse);
        assert_eq!(build("date", ""), Err(QueryError::EmptyValue("date")));
    }

    #[test]
    fn test_date_dump() {
        assert_eq!(build("after", "01/02/2007").unwrap().dump(), "after:01/02/2007");
        assert_eq!(build("date", "<=-1d").unwrap().dump(), "date:<=-1d");
    }

    #[test]
    fn test_sizes() {
        let larger = build("larger", "10kb").unwrap();
        let exact = build("size", ">=10kb").unwrap();

        assert_eq!(compile(&larger, true), Ok(Operation::db(DbConstraint::Size(RangeBound::new(Bound::Excluded(10240), Bound::Unbounded)), true)));
        assert_eq!(compile(&exact, false), Ok(Operation::db(DbConstraint::Size(RangeBound::new(Bound::Excluded(10239), Bound::Unbounded)), false)));
        assert_eq!(exact.dump(), "size:>=10kb");
    }

    #[test]
    fn test_smaller() {
        let node = build("smaller", "1mb").unwrap();

        assert_eq!(compile(&node, true), Ok(Operation::db(DbConstraint::Size(RangeBound::new(Bound::Unbounded, Bound::Excluded(1048576))), true)));
    }

    #[test]
    fn test_modseq_and_conv_count() {
        assert_eq!(compile(&build("modseq", ">100").unwrap(), true), Ok(Operation::db(DbConstraint::ModSeq(RangeBound::new(Bound::Excluded(100), Bound::Unbounded)), true)));
        assert_eq!(compile(&build("conv-count", "3").unwrap(), false), Ok(Operation::db(DbConstraint::ConvCount(RangeBound::exact(3)), false)));
        assert_eq!(build("conv-count", "<=3").unwrap().dump(), "conv-count:<=3");
    }

    #[test]
    fn test_sender_range() {
        let node = build("from", ">=m").unwrap();

        assert_eq!(compile(&node, false), Ok(Operation::db(DbConstraint::Sender(RangeBound::new(Bound::Included("m".to_owned()), Bound::Unbounded)), false)));
        assert_eq!(node.dump(), "from:>=m");
    }

    #[test]
    fn test_subject_range() {
        let node = build("subject", "<b").unwrap();

        assert_eq!(compile(&node, true), Ok(Operation::db(DbConstraint::Subject(RangeBound::new(Bound::Unbounded, Bound::Excluded("b".to_owned()))), true)));
    }

    #[test]
    fn test_empty_string_range() {
        assert_eq!(build("subject", "<="), Err(QueryError::InvalidLiteral {
            kind: LiteralKind::String,
            text: "<=".to_owned(),
            reason: "missing value after the comparator",
        }));
    }
}
