//! The sign carried by every MIX cell.
//!
//! MIX stores sign and magnitude separately, so a zero magnitude still has
//! a sign of its own: `+0` and `-0` are distinct, representable values.

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use crate::word::WordError;

/// Sign of a cell or index cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Sign {
    /// `+`
    #[default]
    Positive,
    /// `-`
    Negative,
}

impl Sign {
    /// Both signs, positive first.
    pub const ALL: [Sign; 2] = [Sign::Positive, Sign::Negative];

    /// The opposite sign.
    #[inline]
    pub const fn flip(self) -> Self {
        match self {
            Sign::Positive => Sign::Negative,
            Sign::Negative => Sign::Positive,
        }
    }

    #[inline]
    pub const fn is_negative(self) -> bool {
        matches!(self, Sign::Negative)
    }

    /// Render as a single character.
    #[inline]
    pub const fn to_char(self) -> char {
        match self {
            Sign::Positive => '+',
            Sign::Negative => '-',
        }
    }

    /// Parse a single `+` or `-` character.
    pub fn from_char(c: char) -> Result<Self, WordError> {
        match c {
            '+' => Ok(Sign::Positive),
            '-' => Ok(Sign::Negative),
            _ => Err(WordError::MalformedSign(c.to_string())),
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl FromStr for Sign {
    type Err = WordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Sign::from_char(c),
            _ => Err(WordError::MalformedSign(token.to_string())),
        }
    }
}

impl std::ops::Neg for Sign {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.flip()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Sign::Negative.to_string(), "-");
        assert_eq!(Sign::Positive.to_string(), "+");
    }

    #[test]
    fn test_flip_involution() {
        for s in Sign::ALL {
            assert_eq!(s.flip().flip(), s);
            assert_ne!(s.flip(), s);
            assert_eq!(-s, s.flip());
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("+".parse::<Sign>().unwrap(), Sign::Positive);
        assert_eq!(" - ".parse::<Sign>().unwrap(), Sign::Negative);
    }

    #[test]
    fn test_parse_malformed() {
        for input in ["", "*", "0", "+-", "plus"] {
            assert!(
                matches!(input.parse::<Sign>(), Err(WordError::MalformedSign(_))),
                "{:?} should be rejected",
                input
            );
        }
    }

    #[test]
    fn test_default_is_positive() {
        assert_eq!(Sign::default(), Sign::Positive);
    }
}
