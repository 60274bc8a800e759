//! Message size literals: `100`, `10kb`, `>=1mb`, `<2G`

use std::ops::Bound;

use crate::error::{QueryError, LiteralKind};
use crate::operation::RangeBound;

use super::Comparator;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeLiteral {
    pub comparator: Option<Comparator>,
    pub bytes: i64,
}


fn unit_multiplier(unit: &str) -> Option<i64> {
    match &unit.to_lowercase()[..] {
        "" | "b" => Some(1),
        "k" | "kb" => Some(1024),
        "m" | "mb" => Some(1024 * 1024),
        "g" | "gb" => Some(1024 * 1024 * 1024),
        _ => None,
    }
}


impl SizeLiteral {
    pub fn parse(text: &str) -> Result<SizeLiteral, QueryError> {
        let (comparator, rest) = Comparator::split(text.trim());

        let digits_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        if digits_end == 0 {
            return Err(QueryError::invalid(LiteralKind::Size, text, "expected a number of bytes"));
        }

        let number = rest[..digits_end].parse::<i64>()
            .map_err(|_| QueryError::invalid(LiteralKind::Size, text, "number is too large"))?;
        let multiplier = unit_multiplier(&rest[digits_end..])
            .ok_or_else(|| QueryError::invalid(LiteralKind::Size, text, "unknown unit"))?;
        let bytes = number.checked_mul(multiplier)
            .ok_or_else(|| QueryError::invalid(LiteralKind::Size, text, "number is too large"))?;

        Ok(SizeLiteral {
            comparator: comparator,
            bytes: bytes,
        })
    }

    /// The range selected, using `implied` when the literal has no comparator of its own
    ///
    /// The store only compares sizes strictly, so `>=` and `<=` widen the bound by one byte.
    pub fn range(&self, implied: Comparator) -> RangeBound {
        let size = self.bytes;

        match self.comparator.unwrap_or(implied) {
            Comparator::Eq => RangeBound::exact(size),
            Comparator::Gt => RangeBound::new(Bound::Excluded(size), Bound::Unbounded),
            Comparator::Lt => RangeBound::new(Bound::Unbounded, Bound::Excluded(size)),
            Comparator::Ge => RangeBound::new(Bound::Excluded(size.saturating_sub(1)), Bound::Unbounded),
            Comparator::Le => RangeBound::new(Bound::Unbounded, Bound::Excluded(size.saturating_add(1))),
        }
    }
}
