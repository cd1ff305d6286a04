//! # Swatch Names: paint color names from vendor catalogs
//!
//! Given a target RGB color, produce a short plausible paint color name for
//! it, learned from the catalogs of several paint vendors.
//!
//! ## Core Ideas
//!
//! - **Basic color terms are learned, not listed**: the most frequent words
//!   of the corpus become reference colors whose RGB is the mean of every
//!   catalog entry that mentions them.
//! - **Names have shapes**: each catalog name is reduced to its POS pattern,
//!   with basic color terms tagged `COLOR`. Generation aims for a pattern in
//!   proportion to how often it occurs.
//! - **Generate, then test**: a Markov chain over the catalog names proposes
//!   candidates and a constraint keeps the first one whose pattern and color
//!   words fit the target.
//!
//! ## Architecture
//!
//! ```text
//! Training:   vendor CSVs → Corpus → basic color terms (+ related words)
//!               → POS patterns → pattern table
//!             raw names → Markov chain
//!               ⇒ vocabulary.json, patterns.json, model.json
//!
//! Generation: target RGB → closest colors ─┐
//!             pattern table → target pattern ┴→ Constraint
//!             Markov chain → candidates → satisfied? → name
//! ```

pub mod artifact;
pub mod color;
pub mod config;
pub mod corpus;
pub mod error;
pub mod extract;
pub mod generate;
pub mod hierarchy;
pub mod markov;
pub mod matcher;
pub mod pattern;
pub mod tag;
pub mod token;
pub mod train;

pub use artifact::Artifacts;
pub use color::{Color, Rgb};
pub use config::{GenerationConfig, TrainingConfig};
pub use corpus::{Corpus, RawColorRecord};
pub use error::SwatchError;
pub use generate::{Constraint, Generation, NameGenerator, Outcome};
pub use markov::{CandidateSource, MarkovChain};
pub use pattern::{Pattern, PatternTable};
pub use tag::{ColorTagger, LexiconTagger, PosTagger};
pub use token::{Tokenizer, TreebankTokenizer};
pub use train::train;
