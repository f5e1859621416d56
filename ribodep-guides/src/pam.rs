use crate::errors::GuideError;
use crate::sequence::{expand_ambiguous, revcomp};

/// A PAM pattern expanded into the concrete sequences it matches on each strand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PamSpec {
    pub pattern: String,
    pub forward: Vec<String>,
    pub reverse: Vec<String>,
}

impl PamSpec {
    pub fn new(pattern: &str) -> Result<Self, GuideError> {
        let pattern = pattern.trim().to_uppercase();
        if pattern.is_empty() {
            return Err(GuideError::InvalidPam(pattern));
        }

        let forward =
            expand_ambiguous(&pattern).map_err(|_| GuideError::InvalidPam(pattern.clone()))?;
        let reverse = forward
            .iter()
            .map(|p| revcomp(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PamSpec {
            pattern,
            forward,
            reverse,
        })
    }

    pub fn len(&self) -> usize {
        self.pattern.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    pub fn matches_forward(&self, bases: &str) -> bool {
        self.forward.iter().any(|p| p == bases)
    }

    pub fn matches_reverse(&self, bases: &str) -> bool {
        self.reverse.iter().any(|p| p == bases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_ngg() {
        let pam = PamSpec::new("ngg").unwrap();
        assert_eq!(pam.pattern, "NGG");
        assert_eq!(pam.len(), 3);
        assert_eq!(pam.reverse, vec!["CCT", "CCG", "CCC", "CCA"]);
        assert!(pam.matches_forward("TGG"));
        assert!(!pam.matches_forward("TGA"));
        assert!(pam.matches_reverse("CCA"));
    }

    #[rstest]
    #[case("")]
    #[case("NZG")]
    fn test_invalid_pattern(#[case] pattern: &str) {
        assert!(matches!(PamSpec::new(pattern), Err(GuideError::InvalidPam(_))));
    }
}
