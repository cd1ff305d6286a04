//! Semantic expansion of color terms through a lexical hierarchy.
//!
//! A [`LexicalHierarchy`] maps words to senses and senses to their more
//! specific senses (hyponyms). Expanding a word collects the full hyponym
//! closure of every sense of the word and breaks each collected sense label
//! into its constituent tokens. For a label like `dark_red.n.01` the tokens
//! are `dark` and `red`.
//!
//! [`SenseGraph`] is an in-memory hierarchy that can be loaded from JSON:
//!
//! ```json
//! { "senses": [
//!     { "name": "red.n.01", "lemmas": ["red", "redness"],
//!       "hyponyms": ["sanguine.n.01", "dark_red.n.01"] },
//!     { "name": "dark_red.n.01", "lemmas": ["dark_red"] }
//! ] }
//! ```

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SwatchError;

/// Identifies a sense inside one hierarchy.
pub type SenseId = usize;

/// Read-only access to a word-sense graph.
pub trait LexicalHierarchy {
    /// Every sense the word can take. Unknown words have none.
    fn senses(&self, word: &str) -> Vec<SenseId>;

    /// The immediate hyponyms of a sense.
    fn hyponyms(&self, sense: SenseId) -> Vec<SenseId>;

    /// The canonical label of a sense, e.g. `dark_red.n.01`.
    fn label(&self, sense: SenseId) -> &str;
}

/// Tokens making up a sense label: the part before the first `.`, split on `_`.
pub fn sense_tokens(label: &str) -> BTreeSet<String> {
    let name = label.split('.').next().unwrap_or(label);

    name.split('_')
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Every sense reachable from `sense` through one or more hyponym links.
///
/// The starting sense is only included if some path leads back to it.
pub fn hyponym_closure<H>(hierarchy: &H, sense: SenseId) -> BTreeSet<SenseId>
where
    H: LexicalHierarchy + ?Sized,
{
    let mut closure = BTreeSet::new();
    let mut stack = hierarchy.hyponyms(sense);

    while let Some(next) = stack.pop() {
        if closure.insert(next) {
            stack.extend(hierarchy.hyponyms(next));
        }
    }

    closure
}

/// Expand a word into the tokens of every hyponym of every sense of it.
///
/// Words with no senses, or senses without hyponyms, yield an empty list.
pub fn related_words<H>(hierarchy: &H, word: &str) -> Vec<String>
where
    H: LexicalHierarchy + ?Sized,
{
    let mut hyponyms = BTreeSet::new();
    for sense in hierarchy.senses(word) {
        hyponyms.extend(hyponym_closure(hierarchy, sense));
    }

    let mut words = BTreeSet::new();
    for sense in hyponyms {
        words.extend(sense_tokens(hierarchy.label(sense)));
    }

    words.into_iter().collect()
}

/// One sense as it appears in a JSON sense file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SenseRecord {
    pub name: String,
    #[serde(default)]
    pub lemmas: Vec<String>,
    #[serde(default)]
    pub hyponyms: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SenseFile {
    senses: Vec<SenseRecord>,
}

/// An in-memory [`LexicalHierarchy`].
#[derive(Debug, Clone, Default)]
pub struct SenseGraph {
    labels: Vec<String>,
    hyponyms: Vec<Vec<SenseId>>,
    by_lemma: HashMap<String, Vec<SenseId>>,
}

impl SenseGraph {
    /// Build a graph from sense records.
    ///
    /// Hyponym references to senses that are not themselves listed are
    /// added as leaf senses with no lemmas.
    pub fn from_records(records: Vec<SenseRecord>) -> Self {
        let mut graph = SenseGraph::default();
        let mut ids: HashMap<String, SenseId> = HashMap::new();

        for record in &records {
            graph.intern(&mut ids, &record.name);
        }

        for record in records {
            let id = ids[&record.name];
            for hyponym in &record.hyponyms {
                let child = graph.intern(&mut ids, hyponym);
                graph.hyponyms[id].push(child);
            }
            let mut seen = HashSet::new();
            for lemma in &record.lemmas {
                if seen.insert(lemma.as_str()) {
                    graph.by_lemma.entry(lemma.clone()).or_default().push(id);
                }
            }
        }

        graph
    }

    pub fn from_json(json: &str) -> Result<Self, SwatchError> {
        let file: SenseFile = serde_json::from_str(json)?;
        Ok(SenseGraph::from_records(file.senses))
    }

    pub fn load(path: &Path) -> Result<Self, SwatchError> {
        let json = std::fs::read_to_string(path)?;
        SenseGraph::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    fn intern(&mut self, ids: &mut HashMap<String, SenseId>, name: &str) -> SenseId {
        if let Some(id) = ids.get(name) {
            return *id;
        }
        let id = self.labels.len();
        self.labels.push(name.to_string());
        self.hyponyms.push(Vec::new());
        ids.insert(name.to_string(), id);
        id
    }
}

impl LexicalHierarchy for SenseGraph {
    fn senses(&self, word: &str) -> Vec<SenseId> {
        if let Some(senses) = self.by_lemma.get(word) {
            return senses.clone();
        }
        self.by_lemma
            .get(&word.to_lowercase())
            .cloned()
            .unwrap_or_default()
    }

    fn hyponyms(&self, sense: SenseId) -> Vec<SenseId> {
        self.hyponyms.get(sense).cloned().unwrap_or_default()
    }

    fn label(&self, sense: SenseId) -> &str {
        self.labels.get(sense).map(String::as_str).unwrap_or_default()
    }
}
