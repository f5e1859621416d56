use crate::errors::GuideError;

/// Complement of a single IUPAC base.
pub fn complement(base: char) -> Option<char> {
    let c = match base {
        'A' => 'T',
        'C' => 'G',
        'G' => 'C',
        'T' => 'A',
        'N' => 'N',
        'Y' => 'R',
        'R' => 'Y',
        'W' => 'W',
        'S' => 'S',
        'K' => 'M',
        'M' => 'K',
        'D' => 'H',
        'H' => 'D',
        'V' => 'B',
        'B' => 'V',
        'X' => 'X',
        '-' => '-',
        _ => return None,
    };
    Some(c)
}

/// Reverse complement of an uppercase IUPAC sequence.
pub fn revcomp(seq: &str) -> Result<String, GuideError> {
    seq.chars()
        .rev()
        .map(|b| complement(b).ok_or(GuideError::InvalidBase(b)))
        .collect()
}

fn ambiguity_code(base: char) -> Option<&'static [char]> {
    let bases: &'static [char] = match base {
        'N' => &['A', 'C', 'G', 'T'],
        'V' => &['A', 'C', 'G'],
        'H' => &['A', 'C', 'T'],
        'D' => &['A', 'G', 'T'],
        'B' => &['C', 'G', 'T'],
        'M' => &['A', 'C'],
        'K' => &['G', 'T'],
        'W' => &['A', 'T'],
        'S' => &['C', 'G'],
        'Y' => &['C', 'T'],
        'R' => &['A', 'G'],
        'A' => &['A'],
        'C' => &['C'],
        'G' => &['G'],
        'T' => &['T'],
        _ => return None,
    };
    Some(bases)
}

///
/// Every concrete sequence matched by an IUPAC pattern, in lexicographic
/// order of the expansion (`NGG` gives `AGG, CGG, GGG, TGG`).
///
pub fn expand_ambiguous(pattern: &str) -> Result<Vec<String>, GuideError> {
    let mut expanded = vec![String::new()];

    for base in pattern.chars() {
        let options = ambiguity_code(base).ok_or(GuideError::InvalidBase(base))?;
        expanded = expanded
            .iter()
            .flat_map(|prefix| {
                options.iter().map(move |b| {
                    let mut s = prefix.clone();
                    s.push(*b);
                    s
                })
            })
            .collect();
    }

    Ok(expanded)
}

/// GC percentage (0-100). Empty sequences have no GC.
pub fn gc_content(seq: &str) -> f64 {
    if seq.is_empty() {
        return 0.0;
    }
    let gc = seq.bytes().filter(|b| matches!(b, b'G' | b'C')).count();
    100.0 * gc as f64 / seq.len() as f64
}

/// Start offsets of every, possibly overlapping, occurrence of `needle`.
pub fn find_all(haystack: &str, needle: &str) -> Vec<usize> {
    if needle.is_empty() {
        return Vec::new();
    }

    let mut hits = Vec::new();
    let mut from = 0;
    while let Some(i) = haystack.get(from..).and_then(|rest| rest.find(needle)) {
        hits.push(from + i);
        from += i + 1;
        if from >= haystack.len() {
            break;
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("ACGT", "ACGT")]
    #[case("AAGC", "GCTT")]
    #[case("NGG", "CCN")]
    #[case("RYKM", "KMRY")]
    fn test_revcomp(#[case] seq: &str, #[case] expected: &str) {
        assert_eq!(revcomp(seq).unwrap(), expected);
    }

    #[rstest]
    fn test_revcomp_rejects_unknown() {
        assert!(matches!(revcomp("ACZ"), Err(GuideError::InvalidBase('Z'))));
    }

    #[rstest]
    fn test_expand_ambiguous() {
        assert_eq!(
            expand_ambiguous("NGG").unwrap(),
            vec!["AGG", "CGG", "GGG", "TGG"]
        );
        assert_eq!(expand_ambiguous("RY").unwrap().len(), 4);
        assert_eq!(expand_ambiguous("").unwrap(), vec![""]);
        assert!(expand_ambiguous("NXG").is_err());
    }

    #[rstest]
    #[case("GGCC", 100.0)]
    #[case("ATAT", 0.0)]
    #[case("ATGC", 50.0)]
    #[case("", 0.0)]
    fn test_gc_content(#[case] seq: &str, #[case] expected: f64) {
        assert_eq!(gc_content(seq), expected);
    }

    #[rstest]
    fn test_find_all_overlapping() {
        assert_eq!(find_all("AAAA", "AA"), vec![0, 1, 2]);
        assert_eq!(find_all("ACGTACGT", "CG"), vec![1, 5]);
        assert!(find_all("ACGT", "TT").is_empty());
        assert!(find_all("ACGT", "").is_empty());
    }
}
