//! Comparison operators shared by all comparing rules.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::error::{CoreError, CoreResult};

/// A comparison operator as configured on a rule (`">="`, `"<"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    GreaterThanEqual,
    LessThanEqual,
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
}

/// The string did not name any [`Operator`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown operator {0}")]
pub struct ParseOperatorError(pub String);

impl Operator {
    pub const ALL: [Operator; 6] = [
        Operator::GreaterThanEqual,
        Operator::LessThanEqual,
        Operator::Equal,
        Operator::NotEqual,
        Operator::GreaterThan,
        Operator::LessThan,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Operator::GreaterThanEqual => ">=",
            Operator::LessThanEqual => "<=",
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::GreaterThan => ">",
            Operator::LessThan => "<",
        }
    }

    /// Parses the operator configured on `rule`.
    ///
    /// ## Errors
    /// [`CoreError::UnsupportedOperator`] naming both the operator and the rule.
    pub fn parse_for(raw: &str, rule: &str) -> CoreResult<Operator> {
        raw.parse::<Operator>()
            .map_err(|_| CoreError::unsupported_operator(raw, rule))
    }

    /// Evaluates `left <op> right`.
    pub fn compare<T: PartialOrd>(&self, left: &T, right: &T) -> bool {
        match self {
            Operator::GreaterThanEqual => left >= right,
            Operator::LessThanEqual => left <= right,
            Operator::Equal => left == right,
            Operator::NotEqual => left != right,
            Operator::GreaterThan => left > right,
            Operator::LessThan => left < right,
        }
    }
}

impl FromStr for Operator {
    type Err = ParseOperatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| ParseOperatorError(s.to_string()))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all() {
        for op in Operator::ALL {
            assert_eq!(op.as_str().parse::<Operator>(), Ok(op));
        }
        assert_eq!("~".parse::<Operator>(), Err(ParseOperatorError("~".to_string())));
        assert!(" >=".parse::<Operator>().is_err());
    }

    #[test]
    fn test_compare() {
        assert!(Operator::GreaterThanEqual.compare(&5, &5));
        assert!(!Operator::GreaterThan.compare(&5, &5));
        assert!(Operator::LessThan.compare(&4, &5));
        assert!(Operator::LessThanEqual.compare(&5, &5));
        assert!(Operator::Equal.compare(&"EK", &"EK"));
        assert!(Operator::NotEqual.compare(&1, &2));
    }

    #[test]
    fn test_parse_for_names_rule() {
        let err = Operator::parse_for("~", "OrderAmountRule").unwrap_err();
        assert_eq!(err.to_string(), "Unsupported operator ~ in OrderAmountRule");
    }
}
