//! Cell and row predicates
//!
//! Any `FnMut(&CellValue) -> bool` is a [`Matcher`] and any
//! `FnMut(&[CellValue]) -> bool` is a [`RowMatcher`]. The helpers here cover
//! the common predicates; [`Criteria`] builds a matcher from text such as
//! `">5"`, `"Foo"` or `"Ho*"`.

use std::fmt;
use std::str::FromStr;

use sheet_seek_core::{CellValue, Error, Result};

/// Predicate over a single cell value
pub trait Matcher {
    /// Whether the value matches
    fn matches(&mut self, value: &CellValue) -> bool;
}

impl<F> Matcher for F
where
    F: FnMut(&CellValue) -> bool,
{
    fn matches(&mut self, value: &CellValue) -> bool {
        self(value)
    }
}

/// Predicate over the values collected so far for one row
pub trait RowMatcher {
    /// Whether the row matches
    fn matches(&mut self, row: &[CellValue]) -> bool;
}

impl<F> RowMatcher for F
where
    F: FnMut(&[CellValue]) -> bool,
{
    fn matches(&mut self, row: &[CellValue]) -> bool {
        self(row)
    }
}

/// Text cell equal to `expected` (case-sensitive)
pub fn text_eq(expected: impl Into<String>) -> impl FnMut(&CellValue) -> bool + Clone {
    let expected = expected.into();
    move |value: &CellValue| value.as_text() == Some(expected.as_str())
}

/// Number cell satisfying `pred`; anything that is not a number never matches
pub fn number_where<P>(mut pred: P) -> impl FnMut(&CellValue) -> bool
where
    P: FnMut(f64) -> bool,
{
    move |value: &CellValue| value.as_number().map_or(false, &mut pred)
}

/// Empty (absent) cell
pub fn is_empty() -> impl FnMut(&CellValue) -> bool + Copy {
    |value: &CellValue| value.is_empty()
}

/// Any cell holding a value
pub fn not_empty() -> impl FnMut(&CellValue) -> bool + Copy {
    |value: &CellValue| !value.is_empty()
}

/// Stop a row at its first empty cell
pub fn any_empty() -> impl FnMut(&[CellValue]) -> bool + Copy {
    |row: &[CellValue]| row.iter().any(CellValue::is_empty)
}

/// True once the row is non-empty and every value in it is empty
pub fn all_empty() -> impl FnMut(&[CellValue]) -> bool + Copy {
    |row: &[CellValue]| !row.is_empty() && row.iter().all(CellValue::is_empty)
}

/// Never stop; the column range decides the row length
pub fn never() -> impl FnMut(&[CellValue]) -> bool + Copy {
    |_: &[CellValue]| false
}

/// Stop once the row would grow past `len` values
pub fn max_len(len: usize) -> impl FnMut(&[CellValue]) -> bool + Copy {
    move |row: &[CellValue]| row.len() > len
}

/// Spreadsheet-style criteria parsed from text.
///
/// - `=` or blank text: empty cell
/// - a number: number equal to it
/// - `>5`, `>=5`, `<5`, `<=5`, `<>5`, `=5`: numeric comparison
/// - `TRUE` / `FALSE`: boolean
/// - anything else: text, with `*` matching any run of characters and `?`
///   exactly one. Text comparison is case-sensitive.
///
/// Only numbers take part in numeric comparisons; text such as `"6"` never
/// satisfies `>5`.
#[derive(Debug, Clone, PartialEq)]
pub struct Criteria {
    kind: CriteriaKind,
}

#[derive(Debug, Clone, PartialEq)]
enum CriteriaKind {
    Empty,
    Number(f64),
    Comparison(ComparisonOp, f64),
    Boolean(bool),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ComparisonOp {
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
}

impl ComparisonOp {
    fn as_str(self) -> &'static str {
        match self {
            ComparisonOp::Equal => "=",
            ComparisonOp::NotEqual => "<>",
            ComparisonOp::LessThan => "<",
            ComparisonOp::LessEqual => "<=",
            ComparisonOp::GreaterThan => ">",
            ComparisonOp::GreaterEqual => ">=",
        }
    }

    fn apply(self, n: f64, rhs: f64) -> bool {
        match self {
            ComparisonOp::Equal => n == rhs,
            ComparisonOp::NotEqual => n != rhs,
            ComparisonOp::LessThan => n < rhs,
            ComparisonOp::LessEqual => n <= rhs,
            ComparisonOp::GreaterThan => n > rhs,
            ComparisonOp::GreaterEqual => n >= rhs,
        }
    }
}

impl Criteria {
    /// Parse criteria text
    pub fn parse(text: &str) -> Self {
        let text = text.trim();

        if text.is_empty() || text == "=" {
            return Self::from_kind(CriteriaKind::Empty);
        }
        if let Some(kind) = Self::try_parse_comparison(text) {
            return Self::from_kind(kind);
        }
        if let Ok(n) = text.parse::<f64>() {
            return Self::from_kind(CriteriaKind::Number(n));
        }
        if text.eq_ignore_ascii_case("true") {
            return Self::from_kind(CriteriaKind::Boolean(true));
        }
        if text.eq_ignore_ascii_case("false") {
            return Self::from_kind(CriteriaKind::Boolean(false));
        }

        // "=Foo" is the explicit form of "Foo"
        let text = text.strip_prefix('=').unwrap_or(text);
        Self::from_kind(CriteriaKind::Text(text.to_string()))
    }

    fn from_kind(kind: CriteriaKind) -> Self {
        Self { kind }
    }

    fn try_parse_comparison(s: &str) -> Option<CriteriaKind> {
        // Longer operators first
        let (op, rest) = [
            (">=", ComparisonOp::GreaterEqual),
            ("<=", ComparisonOp::LessEqual),
            ("<>", ComparisonOp::NotEqual),
            (">", ComparisonOp::GreaterThan),
            ("<", ComparisonOp::LessThan),
            ("=", ComparisonOp::Equal),
        ]
        .into_iter()
        .find_map(|(prefix, op)| s.strip_prefix(prefix).map(|rest| (op, rest)))?;

        rest.trim()
            .parse::<f64>()
            .ok()
            .map(|n| CriteriaKind::Comparison(op, n))
    }

    /// Check a value against the criteria
    pub fn is_match(&self, value: &CellValue) -> bool {
        match &self.kind {
            CriteriaKind::Empty => value.is_empty(),
            CriteriaKind::Number(n) => value.as_number() == Some(*n),
            CriteriaKind::Comparison(op, rhs) => {
                value.as_number().map_or(false, |n| op.apply(n, *rhs))
            }
            CriteriaKind::Boolean(b) => value.as_bool() == Some(*b),
            CriteriaKind::Text(pattern) => value
                .as_text()
                .map_or(false, |text| wildcard_match(pattern, text)),
        }
    }
}

impl Matcher for Criteria {
    fn matches(&mut self, value: &CellValue) -> bool {
        self.is_match(value)
    }
}

impl FromStr for Criteria {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Criteria::parse(s))
    }
}

impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            CriteriaKind::Empty => f.write_str("="),
            CriteriaKind::Number(n) => write!(f, "{}", n),
            CriteriaKind::Comparison(op, n) => write!(f, "{}{}", op.as_str(), n),
            CriteriaKind::Boolean(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            CriteriaKind::Text(text) => f.write_str(text),
        }
    }
}

/// Match with wildcards: `*` = any characters, `?` = single character
fn wildcard_match(pattern: &str, text: &str) -> bool {
    if !pattern.contains(['*', '?']) {
        return pattern == text;
    }

    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let mut pi = 0;
    let mut ti = 0;
    // Last `*` seen and the text position it was tried at
    let mut star: Option<(usize, usize)> = None;

    while ti < text.len() {
        match pattern.get(pi) {
            Some('?') => {
                pi += 1;
                ti += 1;
            }
            Some('*') => {
                star = Some((pi, ti));
                pi += 1;
            }
            Some(&c) if c == text[ti] => {
                pi += 1;
                ti += 1;
            }
            _ => match star {
                Some((star_pi, star_ti)) => {
                    pi = star_pi + 1;
                    ti = star_ti + 1;
                    star = Some((star_pi, star_ti + 1));
                }
                None => return false,
            },
        }
    }

    pattern[pi..].iter().all(|&c| c == '*')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(criteria: &str, value: impl Into<CellValue>) -> bool {
        Criteria::parse(criteria).is_match(&value.into())
    }

    #[test]
    fn test_closures_are_matchers() {
        fn count<M: Matcher>(mut m: M, values: &[CellValue]) -> usize {
            values.iter().filter(|v| m.matches(v)).count()
        }

        let values = [
            CellValue::from("Hoge"),
            CellValue::Number(3.0),
            CellValue::Empty,
            CellValue::Number(8.0),
        ];
        assert_eq!(count(text_eq("Hoge"), &values), 1);
        assert_eq!(count(number_where(|n| n > 5.0), &values), 1);
        assert_eq!(count(is_empty(), &values), 1);
        assert_eq!(count(not_empty(), &values), 3);
        assert_eq!(count(|v: &CellValue| v.is_number(), &values), 2);
    }

    #[test]
    fn test_number_where_guards_type() {
        let mut gt5 = number_where(|n| n > 5.0);
        assert!(gt5(&CellValue::Number(6.0)));
        assert!(!gt5(&CellValue::string("6")));
        assert!(!gt5(&CellValue::Boolean(true)));
        assert!(!gt5(&CellValue::Empty));
    }

    #[test]
    fn test_row_matchers() {
        let full = vec![CellValue::Number(1.0), CellValue::from("a")];
        let gap = vec![CellValue::Number(1.0), CellValue::Empty];
        let blank = vec![CellValue::Empty, CellValue::Empty];
        let none: Vec<CellValue> = Vec::new();

        let mut any = any_empty();
        assert!(!any(&full));
        assert!(any(&gap));

        let mut all = all_empty();
        assert!(!all(&gap));
        assert!(all(&blank));
        assert!(!all(&none));

        assert!(!never()(&blank));

        let mut two = max_len(2);
        assert!(!two(&full));
        assert!(max_len(1)(&full));
    }

    #[test]
    fn test_empty_criteria() {
        assert!(check("", CellValue::Empty));
        assert!(check("=", CellValue::Empty));
        assert!(!check("", 0.0));
        assert!(!check("", "text"));
    }

    #[test]
    fn test_number_criteria() {
        assert!(check("5", 5.0));
        assert!(!check("5", 4.0));
        assert!(!check("5", "5"));
        assert!(!check("1", true));
    }

    #[test]
    fn test_comparison_criteria() {
        assert!(check(">5", 6.0));
        assert!(!check(">5", 5.0));
        assert!(check(">=5", 5.0));
        assert!(check("<5", 4.0));
        assert!(!check("<=5", 6.0));
        assert!(check("<>5", 4.0));
        assert!(!check("<>5", 5.0));
        assert!(check("=5", 5.0));
        assert!(!check(">5", "6"));
        assert!(!check("<>5", CellValue::Empty));
    }

    #[test]
    fn test_boolean_criteria() {
        assert!(check("TRUE", true));
        assert!(check("false", false));
        assert!(!check("TRUE", 1.0));
        assert!(!check("TRUE", "TRUE"));
    }

    #[test]
    fn test_text_criteria_is_case_sensitive() {
        assert!(check("Foo", "Foo"));
        assert!(check("=Foo", "Foo"));
        assert!(!check("Foo", "foo"));
        assert!(!check("Foo", CellValue::Empty));
    }

    #[test]
    fn test_wildcards() {
        assert!(check("Ho*", "Hoge"));
        assert!(check("Ho*", "Ho"));
        assert!(!check("Ho*", "hoge"));
        assert!(check("a*e", "apple"));
        assert!(!check("a*e", "apples"));
        assert!(check("a?ple", "apple"));
        assert!(!check("a?ple", "aple"));
        assert!(check("a?p*", "app"));
        assert!(!check("a?p*", "ap"));
        assert!(check("*", ""));
        assert!(check("*b*b", "abcbxb"));
    }

    #[test]
    fn test_display() {
        for text in ["=", ">=5", "<>0", "3", "TRUE", "Ho*"] {
            assert_eq!(Criteria::parse(text).to_string(), text);
        }
    }
}
