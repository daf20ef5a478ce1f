//! Windowed alignment for GenoDx
//!
//! Scores every window of a reference sequence that has the same length as a
//! target sequence and keeps the best one. There are no gaps: a window either
//! lines up with the target position by position or it scores lower.
//!
//! Sequences are compared per character, so the scorer works on any alphabet.

use thiserror::Error;

/// Character emitted by [`Aligner::redact`] where the two sequences differ.
pub const REDACTION_PLACEHOLDER: char = '-';

/// Errors raised when an alignment precondition does not hold
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlignError {
    #[error("Reference sequence is shorter than the target: {reference} < {target} symbols")]
    ReferenceTooShort { target: usize, reference: usize },

    #[error("Sequence lengths differ: {left} vs {right} symbols")]
    LengthMismatch { left: usize, right: usize },

    #[error("Target sequence is empty")]
    EmptyTarget,
}

pub type AlignResult<T> = Result<T, AlignError>;

/// Winning window of a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowMatch {
    /// Start of the window in the reference, in characters
    pub offset: usize,
    /// Matching positions between the target and the window
    pub score: usize,
    /// `score` normalized to the target length, rounded half up
    pub similarity: u32,
}

/// Brute-force aligner of a short target against a longer reference.
///
/// The alignment state starts out uncomputed; [`Aligner::compute_best_alignment`]
/// fills it in and a second call recomputes it from scratch.
#[derive(Debug, Clone)]
pub struct Aligner {
    target: String,
    reference: String,
    target_symbols: Vec<char>,
    reference_symbols: Vec<char>,
    redacted: String,
    best: Option<WindowMatch>,
}

impl Aligner {
    /// Create an aligner. The reference must be at least as long as the target.
    pub fn new(target: impl Into<String>, reference: impl Into<String>) -> AlignResult<Self> {
        let target = target.into();
        let reference = reference.into();
        let target_symbols: Vec<char> = target.chars().collect();
        let reference_symbols: Vec<char> = reference.chars().collect();

        if target_symbols.is_empty() {
            return Err(AlignError::EmptyTarget);
        }
        if reference_symbols.len() < target_symbols.len() {
            return Err(AlignError::ReferenceTooShort {
                target: target_symbols.len(),
                reference: reference_symbols.len(),
            });
        }

        Ok(Self {
            target,
            reference,
            target_symbols,
            reference_symbols,
            redacted: String::new(),
            best: None,
        })
    }

    /// Create an aligner and run the scan right away.
    pub fn align(target: impl Into<String>, reference: impl Into<String>) -> AlignResult<Self> {
        let mut aligner = Self::new(target, reference)?;
        aligner.compute_best_alignment();
        Ok(aligner)
    }

    /// Number of positions at which `a` and `b` hold the same character.
    pub fn score_match(a: &str, b: &str) -> AlignResult<usize> {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        ensure_same_length(&a, &b)?;
        Ok(count_matches(&a, &b))
    }

    /// Copy of `a` with every character that differs from `b` replaced by
    /// [`REDACTION_PLACEHOLDER`].
    pub fn redact(a: &str, b: &str) -> AlignResult<String> {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        ensure_same_length(&a, &b)?;
        Ok(redact_symbols(&a, &b))
    }

    /// Slide a target-sized window over the reference and keep the window
    /// with the most matching positions. Ties keep the lowest offset.
    ///
    /// Returns the winning window.
    pub fn compute_best_alignment(&mut self) -> WindowMatch {
        let width = self.target_symbols.len();
        let (mut best_offset, mut best_score) = (0, 0);

        for (offset, window) in self.reference_symbols.windows(width).enumerate() {
            let score = count_matches(&self.target_symbols, window);
            if score > best_score {
                best_offset = offset;
                best_score = score;
            }
        }

        let best = WindowMatch {
            offset: best_offset,
            score: best_score,
            similarity: percentage(best_score, width),
        };

        let window = &self.reference_symbols[best.offset..best.offset + width];
        self.redacted = redact_symbols(&self.target_symbols, window);
        self.best = Some(best);

        log::debug!(
            "Best window at offset {} scored {}/{} over {} candidate windows",
            best.offset,
            best.score,
            width,
            self.reference_symbols.len() - width + 1
        );

        best
    }

    /// Best score normalized to the target length, rounded half up.
    ///
    /// `None` until [`Aligner::compute_best_alignment`] has run.
    pub fn similarity_percentage(&self) -> Option<u32> {
        self.best.map(|best| best.similarity)
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Redacted target from the last scan; empty before the first scan.
    pub fn redacted(&self) -> &str {
        &self.redacted
    }

    /// Winning window of the last scan
    pub fn best_match(&self) -> Option<WindowMatch> {
        self.best
    }

    pub fn best_score(&self) -> Option<usize> {
        self.best.map(|best| best.score)
    }

    /// Start of the winning window in the reference, in characters.
    pub fn best_offset(&self) -> Option<usize> {
        self.best.map(|best| best.offset)
    }

    /// The winning window of the reference.
    pub fn best_window(&self) -> Option<String> {
        self.best.map(|best| {
            self.reference_symbols[best.offset..best.offset + self.target_symbols.len()]
                .iter()
                .collect()
        })
    }
}

fn ensure_same_length(a: &[char], b: &[char]) -> AlignResult<()> {
    if a.len() != b.len() {
        return Err(AlignError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(())
}

fn percentage(score: usize, width: usize) -> u32 {
    ((200 * score + width) / (2 * width)) as u32
}

fn count_matches(a: &[char], b: &[char]) -> usize {
    a.iter().zip(b).filter(|(x, y)| x == y).count()
}

fn redact_symbols(a: &[char], b: &[char]) -> String {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| if x == y { x } else { REDACTION_PLACEHOLDER })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const REFERENCE: &str = "ATGCATGCATGC";

    #[test]
    fn test_constructor_keeps_sequences() {
        let aligner = Aligner::new("ATGC", "ATGCATGC").unwrap();
        assert_eq!(aligner.target(), "ATGC");
        assert_eq!(aligner.reference(), "ATGCATGC");
        assert_eq!(aligner.redacted(), "");
        assert_eq!(aligner.best_score(), None);
    }

    #[test]
    fn test_constructor_rejects_short_reference() {
        let err = Aligner::new("ATGCATGC", "ATGC").unwrap_err();
        assert_eq!(err, AlignError::ReferenceTooShort { target: 8, reference: 4 });
    }

    #[test]
    fn test_constructor_rejects_empty_target() {
        assert_eq!(Aligner::new("", "ATGC").unwrap_err(), AlignError::EmptyTarget);
    }

    #[test]
    fn test_score_match() {
        assert_eq!(Aligner::score_match("ATGC", "GACT").unwrap(), 0);
        assert_eq!(Aligner::score_match("ATGC", "AGGT").unwrap(), 2);
        assert_eq!(Aligner::score_match("AGGG", "AGGG").unwrap(), 4);
    }

    #[test]
    fn test_score_match_length_mismatch() {
        let err = Aligner::score_match("ATG", "ATGC").unwrap_err();
        assert_eq!(err, AlignError::LengthMismatch { left: 3, right: 4 });
    }

    #[test]
    fn test_redact() {
        assert_eq!(Aligner::redact("ATGC", "GGCG").unwrap(), "----");
        assert_eq!(Aligner::redact("GCAT", "ATAT").unwrap(), "--AT");
        assert_eq!(Aligner::redact("GCAT", "GCAT").unwrap(), "GCAT");
        assert!(Aligner::redact("GCAT", "GCA").is_err());
    }

    #[test]
    fn test_low_similarity_window() {
        let aligner = Aligner::align("GGGG", REFERENCE).unwrap();
        assert_eq!(aligner.best_score(), Some(1));
        assert_eq!(aligner.redacted(), "--G-");
    }

    #[test]
    fn test_medium_similarity_window() {
        let aligner = Aligner::align("TGACTG", REFERENCE).unwrap();
        assert_eq!(aligner.best_score(), Some(4));
        assert_eq!(aligner.redacted(), "TG--TG");
    }

    #[test]
    fn test_exact_window() {
        let aligner = Aligner::align("TGCATGCA", REFERENCE).unwrap();
        assert_eq!(aligner.best_score(), Some(8));
        assert_eq!(aligner.redacted(), "TGCATGCA");
        assert_eq!(aligner.best_offset(), Some(1));
        assert_eq!(aligner.best_window().as_deref(), Some("TGCATGCA"));
        assert_eq!(aligner.similarity_percentage(), Some(100));
    }

    #[test]
    fn test_ties_keep_earliest_window() {
        // "GCAT" occurs at offsets 2 and 6
        let aligner = Aligner::align("GCAT", "ATGCATGCATTT").unwrap();
        assert_eq!(aligner.best_score(), Some(4));
        assert_eq!(aligner.best_offset(), Some(2));
    }

    #[test]
    fn test_all_zero_windows_keep_first() {
        let aligner = Aligner::align("CCC", "AAAAA").unwrap();
        assert_eq!(aligner.best_score(), Some(0));
        assert_eq!(aligner.best_offset(), Some(0));
        assert_eq!(aligner.redacted(), "---");
        assert_eq!(aligner.similarity_percentage(), Some(0));
    }

    #[test]
    fn test_equal_lengths_scan_one_window() {
        let aligner = Aligner::align("ATTC", "AGGC").unwrap();
        assert_eq!(aligner.best_score(), Some(Aligner::score_match("ATTC", "AGGC").unwrap()));
        assert_eq!(aligner.similarity_percentage(), Some(50));

        let aligner = Aligner::align("ATGC", "GCAT").unwrap();
        assert_eq!(aligner.similarity_percentage(), Some(0));
    }

    #[test]
    fn test_percentage_before_alignment() {
        let aligner = Aligner::new("ATGCATGC", "ATGCATGC").unwrap();
        assert_eq!(aligner.similarity_percentage(), None);
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        // 1 of 8 matches is 12.5%
        let aligner = Aligner::align("AGGGGGGG", "ATTTTTTT").unwrap();
        assert_eq!(aligner.similarity_percentage(), Some(13));
        // 6 of 9 matches is 66.7%
        let aligner = Aligner::align("TGCCATGGC", "GTACATGCAATGCATGGG").unwrap();
        assert_eq!(aligner.similarity_percentage(), Some(67));
    }

    #[test]
    fn test_rerun_overwrites_with_same_result() {
        let mut aligner = Aligner::new("TGACTG", REFERENCE).unwrap();
        let first = aligner.compute_best_alignment();
        let second = aligner.compute_best_alignment();
        assert_eq!(first, second);
        assert_eq!(second, WindowMatch { offset: 1, score: 4, similarity: 67 });
        assert_eq!(aligner.redacted(), "TG--TG");
    }

    #[test]
    fn test_non_ascii_symbols() {
        let aligner = Aligner::align("αβ", "γαβδ").unwrap();
        assert_eq!(aligner.best_score(), Some(2));
        assert_eq!(aligner.best_offset(), Some(1));
        assert_eq!(aligner.redacted(), "αβ");
    }

    proptest! {
        #[test]
        fn prop_identity_scores_full_length(a in "[ACGT]{0,64}") {
            prop_assert_eq!(Aligner::score_match(&a, &a).unwrap(), a.len());
        }

        #[test]
        fn prop_redaction_marks_exactly_the_mismatches(
            pair in (1usize..48).prop_flat_map(|n| (
                proptest::string::string_regex(&format!("[ACGT]{{{n}}}")).unwrap(),
                proptest::string::string_regex(&format!("[ACGT]{{{n}}}")).unwrap(),
            ))
        ) {
            let (a, b) = pair;
            let redacted = Aligner::redact(&a, &b).unwrap();
            prop_assert_eq!(redacted.len(), a.len());
            for ((r, x), y) in redacted.chars().zip(a.chars()).zip(b.chars()) {
                if x == y {
                    prop_assert_eq!(r, x);
                } else {
                    prop_assert_eq!(r, REDACTION_PLACEHOLDER);
                }
            }
        }

        #[test]
        fn prop_percentage_is_bounded(
            target in "[ACGT]{1,12}",
            padding in "[ACGT]{0,24}",
        ) {
            let reference = format!("{padding}{padding}");
            let reference = if reference.len() < target.len() {
                format!("{reference}{target}")
            } else {
                reference
            };
            let aligner = Aligner::align(target.as_str(), reference).unwrap();
            let pct = aligner.similarity_percentage().unwrap();
            prop_assert!(pct <= 100);
            prop_assert_eq!(aligner.redacted().len(), target.len());
        }
    }
}
