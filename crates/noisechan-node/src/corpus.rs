use std::collections::HashMap;
use std::path::Path;

use crate::error::{NodeError, Result};

/// Corpus file used when none is given.
pub const DEFAULT_CORPUS_FILE: &str = "corpus.txt";

/// Largest corpus addressable with 16-bit indices.
pub const MAX_CORPUS_LEN: usize = 1 << 16;

/// The ordered word list shared by sender and receiver.
///
/// Every line is one entry and its index is the line number, so blank lines
/// and lines holding more than one word still take up an index. A word's
/// index is the position of its first occurrence.
#[derive(Clone, Debug)]
pub struct Corpus {
    words: Vec<String>,
    index: HashMap<String, u16>,
}

impl Corpus {
    /// Build from one word per line.
    pub fn from_text(text: &str) -> Result<Self> {
        let words: Vec<String> = text.lines().map(str::to_string).collect();
        if words.iter().all(|word| word.trim().is_empty()) {
            return Err(NodeError::EmptyCorpus);
        }
        if words.len() > MAX_CORPUS_LEN {
            return Err(NodeError::CorpusTooLarge {
                len: words.len(),
                max: MAX_CORPUS_LEN,
            });
        }

        let mut index = HashMap::with_capacity(words.len());
        for (i, word) in words.iter().enumerate() {
            index.entry(word.clone()).or_insert(i as u16);
        }
        Ok(Self { words, index })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| NodeError::CorpusRead {
            path: path.to_path_buf(),
            source,
        })?;
        let corpus = Self::from_text(&text)?;
        tracing::debug!(path = %path.display(), words = corpus.len(), "corpus loaded");
        Ok(corpus)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Whitespace-separated words across all entries, in order.
    pub fn vocabulary(&self) -> Vec<&str> {
        self.words
            .iter()
            .flat_map(|entry| entry.split_whitespace())
            .collect()
    }

    pub fn index_of(&self, word: &str) -> Result<u16> {
        self.index
            .get(word)
            .copied()
            .ok_or_else(|| NodeError::UnknownWord(word.to_string()))
    }

    pub fn word(&self, index: u64) -> Result<&str> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.words.get(i))
            .map(String::as_str)
            .ok_or(NodeError::IndexOutOfRange {
                index,
                len: self.words.len(),
            })
    }
}
