//! Persisted training artifacts.
//!
//! Training produces three artifacts, each stored as a JSON envelope in one
//! artifact directory:
//!
//! | file              | kind         | payload                        |
//! |-------------------|--------------|--------------------------------|
//! | `vocabulary.json` | `vocabulary` | list of basic [`Color`]s       |
//! | `patterns.json`   | `patterns`   | pattern counts and the lexicon |
//! | `model.json`      | `model`      | [`MarkovChain`] snapshot       |
//!
//! ```json
//! { "format": "swatch", "version": 1, "kind": "patterns",
//!   "payload": { "lexicon": { "crimson": "JJ" }, "counts": { "NNP,COLOR": 812 } } }
//! ```
//!
//! The lexicon the patterns were tagged with travels with them, so that
//! generation tags candidates the same way training tagged the corpus.
//!
//! Loading checks the format tag, the version and the kind before the
//! payload is decoded.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::SwatchError;
use crate::markov::MarkovChain;
use crate::pattern::PatternTable;
use crate::tag::{Lexicon, LexiconTagger};

pub const FORMAT: &str = "swatch";
pub const VERSION: u32 = 1;

pub const VOCABULARY_FILE: &str = "vocabulary.json";
pub const PATTERNS_FILE: &str = "patterns.json";
pub const MODEL_FILE: &str = "model.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Vocabulary,
    Patterns,
    Model,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtifactKind::Vocabulary => "vocabulary",
            ArtifactKind::Patterns => "patterns",
            ArtifactKind::Model => "model",
        };
        write!(f, "{name}")
    }
}

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    format: String,
    version: u32,
    kind: String,
    payload: T,
}

#[derive(Serialize)]
struct PatternsRef<'a> {
    lexicon: &'a Lexicon,
    counts: &'a PatternTable,
}

#[derive(Deserialize)]
struct Patterns {
    #[serde(default)]
    lexicon: Lexicon,
    counts: PatternTable,
}

/// Write one artifact.
pub fn save<T>(path: &Path, kind: ArtifactKind, payload: &T) -> Result<(), SwatchError>
where
    T: Serialize,
{
    let envelope = Envelope {
        format: FORMAT.to_string(),
        version: VERSION,
        kind: kind.to_string(),
        payload,
    };

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, &envelope)?;
    writer.flush()?;

    tracing::info!("Wrote {kind} artifact to {}", path.display());
    Ok(())
}

/// Read one artifact, checking that it holds a payload of `kind`.
pub fn load<T>(path: &Path, kind: ArtifactKind) -> Result<T, SwatchError>
where
    T: DeserializeOwned,
{
    let reader = BufReader::new(File::open(path)?);
    let envelope: Envelope<serde_json::Value> = serde_json::from_reader(reader)?;

    if envelope.format != FORMAT {
        return Err(SwatchError::ArtifactMismatch {
            path: path.to_path_buf(),
            expected: FORMAT.to_string(),
            found: envelope.format,
        });
    }
    if envelope.version != VERSION {
        return Err(SwatchError::ArtifactVersion {
            path: path.to_path_buf(),
            found: envelope.version,
        });
    }
    if envelope.kind != kind.to_string() {
        return Err(SwatchError::ArtifactMismatch {
            path: path.to_path_buf(),
            expected: kind.to_string(),
            found: envelope.kind,
        });
    }

    Ok(serde_json::from_value(envelope.payload)?)
}

/// The three artifacts of one training run.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifacts {
    pub vocabulary: Vec<Color>,
    pub patterns: PatternTable,
    pub lexicon: Lexicon,
    pub model: MarkovChain,
}

impl Artifacts {
    pub fn save(&self, dir: &Path) -> Result<(), SwatchError> {
        std::fs::create_dir_all(dir)?;
        save(&dir.join(VOCABULARY_FILE), ArtifactKind::Vocabulary, &self.vocabulary)?;
        let patterns = PatternsRef {
            lexicon: &self.lexicon,
            counts: &self.patterns,
        };
        save(&dir.join(PATTERNS_FILE), ArtifactKind::Patterns, &patterns)?;
        save(&dir.join(MODEL_FILE), ArtifactKind::Model, &self.model)?;
        Ok(())
    }

    pub fn load(dir: &Path) -> Result<Self, SwatchError> {
        tracing::info!("Reading basic color terms...");
        let vocabulary = load(&dir.join(VOCABULARY_FILE), ArtifactKind::Vocabulary)?;
        tracing::info!("Reading POS pattern counts...");
        let Patterns { lexicon, counts } =
            load(&dir.join(PATTERNS_FILE), ArtifactKind::Patterns)?;
        tracing::info!("Reading markov language model...");
        let model = load(&dir.join(MODEL_FILE), ArtifactKind::Model)?;

        Ok(Artifacts {
            vocabulary,
            patterns: counts,
            lexicon,
            model,
        })
    }

    /// A tagger agreeing with the one the patterns were learned with.
    pub fn tagger(&self) -> LexiconTagger {
        LexiconTagger::from(self.lexicon.clone())
    }
}
