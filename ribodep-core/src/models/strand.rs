use std::fmt::{self, Display};
use std::str::FromStr;

#[derive(Default, PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum Strand {
    #[default]
    Forward,
    Reverse,
}

impl FromStr for Strand {
    type Err = String;

    /// Only the first character of the token is significant, so aligner tokens
    /// such as `+` or `-1` parse the same way.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.chars().next() {
            Some('+') => Ok(Strand::Forward),
            Some('-') => Ok(Strand::Reverse),
            _ => Err(format!("Invalid strand: '{}'. Expected '+' or '-'", s)),
        }
    }
}

impl Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Forward => write!(f, "+"),
            Strand::Reverse => write!(f, "-"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("+", Strand::Forward)]
    #[case("-", Strand::Reverse)]
    #[case("+1", Strand::Forward)]
    fn test_parse_strand(#[case] token: &str, #[case] expected: Strand) {
        assert_eq!(token.parse::<Strand>().unwrap(), expected);
    }

    #[rstest]
    fn test_parse_invalid_strand() {
        assert!("x".parse::<Strand>().is_err());
        assert!("".parse::<Strand>().is_err());
    }
}
