// src/policy/exit_range.rs

//! Exit code ranges as given to `--success-codes`.
//!
//! The textual form is a comma separated list of single codes and inclusive
//! `from-to` ranges, e.g. `0,2,10-20`. Ranges given back to front (`20-10`)
//! are normalised.

use std::fmt;
use std::str::FromStr;

use crate::errors::{Result, TaskmailError};

/// Inclusive range of exit codes. A single code has `from == to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExitRange {
    from: i32,
    to: i32,
}

impl ExitRange {
    /// Build a range, swapping the bounds if they are out of order.
    pub fn new(from: i32, to: i32) -> Self {
        if from <= to {
            Self { from, to }
        } else {
            Self { from: to, to: from }
        }
    }

    pub fn single(code: i32) -> Self {
        Self {
            from: code,
            to: code,
        }
    }

    pub fn from(&self) -> i32 {
        self.from
    }

    pub fn to(&self) -> i32 {
        self.to
    }

    pub fn contains(&self, code: i32) -> bool {
        self.from <= code && code <= self.to
    }
}

impl fmt::Display for ExitRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.from == self.to {
            write!(f, "{}", self.from)
        } else {
            write!(f, "{}-{}", self.from, self.to)
        }
    }
}

/// The set of exit codes that count as "the task succeeded".
///
/// Order is insignificant and duplicates are kept as given.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExitRangeSet {
    ranges: Vec<ExitRange>,
}

impl ExitRangeSet {
    pub fn new(ranges: Vec<ExitRange>) -> Self {
        Self { ranges }
    }

    /// The set used when nothing was configured: just `0`.
    pub fn zero() -> Self {
        Self::new(vec![ExitRange::single(0)])
    }

    /// Parse a comma separated list of codes and ranges.
    ///
    /// Empty (or whitespace-only) input yields an empty set. Every other
    /// malformed input is an argument error.
    pub fn parse_list(list: &str) -> Result<Self> {
        if list.trim().is_empty() {
            return Ok(Self::default());
        }

        let ranges = list
            .split(',')
            .map(str::trim)
            .map(|part| parse_item(list, part))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(ranges))
    }

    pub fn contains(&self, code: i32) -> bool {
        self.ranges.iter().any(|r| r.contains(code))
    }

    pub fn ranges(&self) -> &[ExitRange] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

impl FromStr for ExitRangeSet {
    type Err = TaskmailError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_list(s)
    }
}

impl fmt::Display for ExitRangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, range) in self.ranges.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{range}")?;
        }
        Ok(())
    }
}

fn parse_item(list: &str, part: &str) -> Result<ExitRange> {
    let bounds: Vec<&str> = part.split('-').collect();
    if part.is_empty() || bounds.len() > 2 {
        return Err(TaskmailError::argument(format!(
            "Invalid exit code range: \"{list}\""
        )));
    }

    match bounds.as_slice() {
        [single] => Ok(ExitRange::single(parse_exit_code(single)?)),
        [from, to] => Ok(ExitRange::new(
            parse_exit_code(from)?,
            parse_exit_code(to)?,
        )),
        _ => Err(TaskmailError::argument(format!(
            "Invalid exit code range: \"{list}\""
        ))),
    }
}

fn parse_exit_code(item: &str) -> Result<i32> {
    item.trim()
        .parse::<i32>()
        .map_err(|_| TaskmailError::argument(format!("Invalid exit code: \"{item}\"")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn set(ranges: &[(i32, i32)]) -> ExitRangeSet {
        ExitRangeSet::new(ranges.iter().map(|&(a, b)| ExitRange::new(a, b)).collect())
    }

    #[test]
    fn single_value_range_contains_only_itself() {
        let range = ExitRange::single(42);
        assert!(range.contains(42));
        assert!(!range.contains(41));
        assert!(!range.contains(43));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let range = ExitRange::new(1, 5);
        assert!(range.contains(1));
        assert!(range.contains(3));
        assert!(range.contains(5));
        assert!(!range.contains(0));
        assert!(!range.contains(42));
    }

    #[test]
    fn new_swaps_out_of_order_bounds() {
        assert_eq!(ExitRange::new(10, 9), ExitRange::new(9, 10));
        assert_eq!(ExitRange::new(10, 9).from(), 9);
    }

    #[test]
    fn parse_single_value() {
        assert_eq!(ExitRangeSet::parse_list("1").unwrap(), set(&[(1, 1)]));
    }

    #[test]
    fn parse_two_values() {
        assert_eq!(
            ExitRangeSet::parse_list("1,2").unwrap(),
            set(&[(1, 1), (2, 2)])
        );
    }

    #[test]
    fn parse_range_in_wrong_order_is_switched() {
        assert_eq!(ExitRangeSet::parse_list("3-1").unwrap(), set(&[(1, 3)]));
    }

    #[test]
    fn parse_mixture_with_whitespace() {
        let parsed = ExitRangeSet::parse_list(" 1, 3-5 ,10-9,7 ").unwrap();
        assert_eq!(parsed, set(&[(1, 1), (3, 5), (9, 10), (7, 7)]));
    }

    #[test]
    fn parse_empty_and_blank_give_empty_set() {
        assert!(ExitRangeSet::parse_list("").unwrap().is_empty());
        assert!(ExitRangeSet::parse_list("   ").unwrap().is_empty());
    }

    #[test]
    fn parse_rejects_malformed_lists() {
        for bad in ["1,", "1-", "-1", "1-2-3", ",", "a", "1-b", "1,,2"] {
            let err = ExitRangeSet::parse_list(bad).unwrap_err();
            assert!(err.is_argument(), "expected argument error for {bad:?}");
        }
    }

    #[test]
    fn parse_error_names_the_offending_token() {
        let err = ExitRangeSet::parse_list("0,abc").unwrap_err();
        assert_eq!(err.to_string(), "Invalid exit code: \"abc\"");

        let err = ExitRangeSet::parse_list("1-2-3").unwrap_err();
        assert_eq!(err.to_string(), "Invalid exit code range: \"1-2-3\"");
    }

    #[test]
    fn set_contains_is_any_member() {
        let codes = set(&[(1, 3), (7, 7), (9, 10)]);
        assert!(codes.contains(2));
        assert!(codes.contains(7));
        assert!(codes.contains(9));
        assert!(!codes.contains(6));
        assert!(!codes.contains(0));
    }

    #[test]
    fn empty_set_contains_nothing() {
        assert!(!ExitRangeSet::default().contains(42));
        assert!(!ExitRangeSet::default().contains(0));
    }

    #[test]
    fn display_matches_input_syntax() {
        let codes = ExitRangeSet::parse_list("0,5-3").unwrap();
        assert_eq!(codes.to_string(), "0,3-5");
        assert_eq!(ExitRangeSet::zero().to_string(), "0");
    }

    proptest! {
        #[test]
        fn two_sided_range_is_normalised(a in 0..=i32::MAX, b in 0..=i32::MAX) {
            let codes = ExitRangeSet::parse_list(&format!("{a}-{b}")).unwrap();
            prop_assert_eq!(codes.ranges(), &[ExitRange::new(a.min(b), a.max(b))][..]);
            prop_assert_eq!(codes.ranges()[0].from(), a.min(b));
            prop_assert_eq!(codes.ranges()[0].to(), a.max(b));
        }

        #[test]
        fn parsed_range_contains_exactly_its_span(a in 0..200i32, b in 0..200i32, code in -10..210i32) {
            let codes = ExitRangeSet::parse_list(&format!("{a}-{b}")).unwrap();
            prop_assert_eq!(codes.contains(code), a.min(b) <= code && code <= a.max(b));
        }
    }
}
