//! Sentence wire protocols.
//!
//! Both variants start with a single `1` bit so the receiver can skip any
//! zero padding the channel put in front, and address words by their 16-bit
//! big-endian corpus index.
//!
//! - [`Protocol::Count`]: start bit, 2-bit `word_count - 3`, then one index
//!   per word (3 to 6 words).
//! - [`Protocol::Sentinel`]: start bit, then up to 5 indices, ended early by
//!   [`SENTINEL`] when the sentence is shorter.

use noisechan_bits::{Bit, Channel};

use crate::corpus::Corpus;
use crate::error::{NodeError, Result};

/// Index value reserved for "end of sentence".
pub const SENTINEL: u16 = 0xFFFF;

const INDEX_BITS: u32 = 16;
const COUNT_BITS: u32 = 2;
const COUNT_MIN: usize = 3;
const COUNT_MAX: usize = COUNT_MIN + (1 << COUNT_BITS) - 1;
const SENTINEL_MAX_WORDS: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Protocol {
    Count,
    Sentinel,
}

impl Protocol {
    /// Word counts the protocol can carry.
    pub fn word_limits(self) -> (usize, usize) {
        match self {
            Protocol::Count => (COUNT_MIN, COUNT_MAX),
            Protocol::Sentinel => (1, SENTINEL_MAX_WORDS),
        }
    }

    pub fn send(self, channel: &mut dyn Channel, corpus: &Corpus, sentence: &str) -> Result<()> {
        let words = sentence_words(sentence);
        let (min, max) = self.word_limits();
        if !(min..=max).contains(&words.len()) {
            return Err(NodeError::WordCount {
                count: words.len(),
                min,
                max,
            });
        }
        if self == Protocol::Sentinel {
            check_sentinel_free(corpus)?;
        }
        let indices = words
            .iter()
            .map(|word| corpus.index_of(word))
            .collect::<Result<Vec<u16>>>()?;

        channel.send(Bit::One)?;
        if self == Protocol::Count {
            channel.send_uint((indices.len() - COUNT_MIN) as u64, COUNT_BITS)?;
        }
        for index in &indices {
            channel.send_uint(u64::from(*index), INDEX_BITS)?;
        }
        if self == Protocol::Sentinel && indices.len() < SENTINEL_MAX_WORDS {
            channel.send_uint(u64::from(SENTINEL), INDEX_BITS)?;
        }
        Ok(())
    }

    pub fn receive(self, channel: &mut dyn Channel, corpus: &Corpus) -> Result<String> {
        skip_to_start(channel)?;

        let mut words = Vec::new();
        match self {
            Protocol::Count => {
                let count = channel.get_uint(COUNT_BITS)? as usize + COUNT_MIN;
                for _ in 0..count {
                    let index = channel.get_uint(INDEX_BITS)?;
                    words.push(corpus.word(index)?);
                }
            }
            Protocol::Sentinel => {
                check_sentinel_free(corpus)?;
                for _ in 0..SENTINEL_MAX_WORDS {
                    let index = channel.get_uint(INDEX_BITS)?;
                    if index == u64::from(SENTINEL) {
                        break;
                    }
                    words.push(corpus.word(index)?);
                }
            }
        }
        Ok(render_sentence(&words))
    }
}

/// Lower-cased words of a sentence, without the final period.
pub fn sentence_words(sentence: &str) -> Vec<String> {
    let sentence = sentence.trim();
    let sentence = sentence.strip_suffix('.').unwrap_or(sentence);
    sentence
        .split_whitespace()
        .map(str::to_lowercase)
        .collect()
}

/// Capitalize the first word, join with single spaces, end with a period.
pub fn render_sentence<S: AsRef<str>>(words: &[S]) -> String {
    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        let word = word.as_ref();
        if i == 0 {
            out.push_str(&capitalize(word));
        } else {
            out.push(' ');
            out.push_str(word);
        }
    }
    out.push('.');
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Discard zero bits up to and including the start bit.
fn skip_to_start(channel: &mut dyn Channel) -> Result<()> {
    while channel.get()? == Bit::Zero {}
    Ok(())
}

fn check_sentinel_free(corpus: &Corpus) -> Result<()> {
    let max = usize::from(SENTINEL);
    if corpus.len() > max {
        return Err(NodeError::CorpusTooLarge {
            len: corpus.len(),
            max,
        });
    }
    Ok(())
}
