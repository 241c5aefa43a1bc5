use crate::parallel::Range;
use thiserror::Error;

/// Failure of the range-sum worker task
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SumError {
    #[error("Subtotal of {range} does not fit in u64")]
    Overflow { range: Range },
}

/// Worker task: sum every integer in `[range.start, range.end)`
///
/// Accumulates one element at a time rather than using the closed form, so
/// overflow is detected exactly where iterative accumulation would hit it.
pub fn range_sum(range: Range) -> Result<u64, SumError> {
    let mut subtotal: u64 = 0;
    for i in range.start..range.end {
        subtotal = subtotal
            .checked_add(i)
            .ok_or(SumError::Overflow { range })?;
    }

    tracing::trace!(%range, subtotal, "Range summed");
    Ok(subtotal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_sum_small_ranges() {
        assert_eq!(range_sum(Range::new(0, 10)), Ok(45));
        assert_eq!(range_sum(Range::new(10, 20)), Ok(145));
        assert_eq!(range_sum(Range::new(7, 8)), Ok(7));
    }

    #[test]
    fn test_range_sum_empty_range_is_zero() {
        assert_eq!(range_sum(Range::new(5, 5)), Ok(0));
    }

    #[test]
    fn test_range_sum_matches_closed_form() {
        let range = Range::new(1_000, 250_000);
        let n = |k: u64| k * (k - 1) / 2;
        assert_eq!(range_sum(range), Ok(n(250_000) - n(1_000)));
    }

    #[test]
    fn test_range_sum_overflow() {
        let range = Range::new(u64::MAX - 2, u64::MAX);
        assert_eq!(range_sum(range), Err(SumError::Overflow { range }));
    }
}
