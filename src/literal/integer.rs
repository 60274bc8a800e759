use crate::error::{QueryError, LiteralKind};
use crate::operation::RangeBound;

use super::Comparator;


/// An integer with an optional leading comparator, as used by `modseq:` and `conv-count:`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerLiteral {
    pub comparator: Comparator,
    pub value: i64,
}


impl IntegerLiteral {
    pub fn parse(text: &str) -> Result<IntegerLiteral, QueryError> {
        let (comparator, number) = Comparator::split(text.trim());

        let value = number.parse::<i64>()
            .map_err(|_| QueryError::invalid(LiteralKind::Number, text, "expected an integer"))?;

        Ok(IntegerLiteral {
            comparator: comparator.unwrap_or(Comparator::Eq),
            value: value,
        })
    }

    pub fn range(&self) -> RangeBound {
        self.comparator.range(self.value)
    }
}
