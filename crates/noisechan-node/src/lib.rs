//! Endpoint runtime for noisechan.
//!
//! The harness launches the same program twice, once with `sender` and once
//! with `receiver`. This crate is that program's side: it reads the sentence
//! to send, encodes it over a [`Channel`](noisechan_bits::Channel) with one of
//! the sentence protocols, and decodes it again on the receiving end.

pub mod corpus;
pub mod error;
pub mod node;
pub mod protocol;
pub mod sentence;

pub use corpus::{Corpus, DEFAULT_CORPUS_FILE, MAX_CORPUS_LEN};
pub use error::{NodeError, Result};
pub use node::{run_node, run_receiver, run_sender};
pub use protocol::{render_sentence, sentence_words, Protocol, SENTINEL};
pub use sentence::{format_sentence, make_sentence, WordCountRange};
