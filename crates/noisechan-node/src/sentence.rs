use rand::seq::SliceRandom;
use rand::Rng;

use crate::corpus::Corpus;
use crate::error::{NodeError, Result};
use crate::protocol::render_sentence;

/// Closed interval the number of words in a generated sentence is drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WordCountRange {
    low: usize,
    high: usize,
}

impl WordCountRange {
    pub fn new(low: usize, high: usize) -> Result<Self> {
        if low == 0 || low > high {
            return Err(NodeError::WordRange { low, high });
        }
        Ok(Self { low, high })
    }
}

impl Default for WordCountRange {
    fn default() -> Self {
        Self { low: 3, high: 5 }
    }
}

/// Draw a word count, then that many words uniformly from the corpus.
pub fn make_sentence<R: Rng + ?Sized>(
    rng: &mut R,
    range: WordCountRange,
    corpus: &Corpus,
) -> Vec<String> {
    let count = rng.gen_range(range.low..=range.high);
    let vocabulary = corpus.vocabulary();
    (0..count)
        .filter_map(|_| vocabulary.choose(rng).map(|word| word.to_string()))
        .collect()
}

/// Render words as a sentence: first word capitalized, ending with a period.
pub fn format_sentence(words: &[String]) -> String {
    render_sentence(words)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn corpus() -> Corpus {
        Corpus::from_text("alpha\nbeta\ngamma\ndelta\nepsilon\nzeta\neta\ntheta\n").unwrap()
    }

    #[test]
    fn word_count_stays_in_range() {
        let corpus = corpus();
        let range = WordCountRange::new(2, 4).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..200 {
            let words = make_sentence(&mut rng, range, &corpus);
            assert!((2..=4).contains(&words.len()));
            assert!(words.iter().all(|w| corpus.index_of(w).is_ok()));
        }
    }

    #[test]
    fn same_seed_same_sentence() {
        let corpus = corpus();
        let make = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            format_sentence(&make_sentence(&mut rng, WordCountRange::default(), &corpus))
        };
        assert_eq!(make(10), make(10));
    }

    #[test]
    fn formatted_sentence_is_capitalized_with_period() {
        let words = vec!["gamma".to_string(), "beta".to_string()];
        assert_eq!(format_sentence(&words), "Gamma beta.");
    }

    #[test]
    fn invalid_ranges_are_rejected() {
        assert!(matches!(
            WordCountRange::new(0, 3),
            Err(NodeError::WordRange { low: 0, high: 3 })
        ));
        assert!(WordCountRange::new(5, 4).is_err());
        assert!(WordCountRange::new(4, 4).is_ok());
    }
}
