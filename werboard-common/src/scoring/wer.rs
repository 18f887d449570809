//! Corpus-level word error rate
//!
//! WER is aggregated over the whole corpus: total word edits divided by total
//! reference words. It is not the mean of per-utterance rates.

use serde::Serialize;

use crate::{Error, Result};

/// Totals behind a corpus WER
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WerBreakdown {
    /// Substitutions + deletions + insertions across all utterances
    pub edits: usize,
    /// Words in all reference transcripts
    pub reference_words: usize,
}

impl WerBreakdown {
    /// Aggregate rate, always finite and >= 0 (may exceed 1 with insertions)
    pub fn rate(&self) -> f64 {
        self.edits as f64 / self.reference_words as f64
    }
}

/// Whitespace tokenization with surrounding space stripped
fn words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Word-level edit distance between one reference and one hypothesis
pub fn word_edits(reference: &str, hypothesis: &str) -> usize {
    strsim::generic_levenshtein(&words(reference), &words(hypothesis))
}

/// Compute corpus WER over aligned reference/hypothesis lists
///
/// # Errors
/// - [`Error::EmptyCorpus`] when there are no pairs
/// - [`Error::LengthMismatch`] when the lists are not the same length
/// - [`Error::EmptyReference`] when the references hold no words at all
pub fn corpus_wer<R, H>(references: &[R], hypotheses: &[H]) -> Result<WerBreakdown>
where
    R: AsRef<str>,
    H: AsRef<str>,
{
    if references.len() != hypotheses.len() {
        return Err(Error::LengthMismatch {
            references: references.len(),
            hypotheses: hypotheses.len(),
        });
    }
    if references.is_empty() {
        return Err(Error::EmptyCorpus);
    }

    let mut totals = WerBreakdown {
        edits: 0,
        reference_words: 0,
    };

    for (reference, hypothesis) in references.iter().zip(hypotheses) {
        let ref_words = words(reference.as_ref());
        let hyp_words = words(hypothesis.as_ref());
        totals.edits += strsim::generic_levenshtein(&ref_words, &hyp_words);
        totals.reference_words += ref_words.len();
    }

    if totals.reference_words == 0 {
        return Err(Error::EmptyReference);
    }

    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_is_zero() {
        let wer = corpus_wer(&["a b c", "d e"], &["a b c", "d e"]).unwrap();
        assert_eq!(wer.rate(), 0.0);
    }

    #[test]
    fn test_all_substituted_is_one() {
        let wer = corpus_wer(&["a b c"], &["x y z"]).unwrap();
        assert_eq!(wer.edits, 3);
        assert_eq!(wer.rate(), 1.0);
    }

    #[test]
    fn test_aggregate_not_mean_of_rates() {
        // Per-utterance rates 1/1 and 0/4 average to 0.5; corpus WER is 1/5
        let wer = corpus_wer(&["a", "b c d e"], &["x", "b c d e"]).unwrap();
        assert!((wer.rate() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_insertions_can_exceed_one() {
        let wer = corpus_wer(&["a"], &["a b c"]).unwrap();
        assert_eq!(wer.edits, 2);
        assert_eq!(wer.rate(), 2.0);
    }

    #[test]
    fn test_extra_whitespace_ignored() {
        assert_eq!(word_edits("  a   b ", "a b"), 0);
        assert_eq!(word_edits("a b c", ""), 3);
    }

    #[test]
    fn test_empty_corpus_is_error() {
        let empty: [&str; 0] = [];
        assert!(matches!(corpus_wer(&empty, &empty), Err(Error::EmptyCorpus)));
    }

    #[test]
    fn test_length_mismatch_is_error() {
        assert!(matches!(
            corpus_wer(&["a", "b"], &["a"]),
            Err(Error::LengthMismatch { references: 2, hypotheses: 1 })
        ));
    }

    #[test]
    fn test_wordless_reference_is_error() {
        assert!(matches!(
            corpus_wer(&["", "  "], &["a", ""]),
            Err(Error::EmptyReference)
        ));
    }
}
