//! Learning basic color terms from a corpus of color names.
//!
//! The most frequent words in paint-color names are mostly color words
//! ("blue", "green", "grey", ...). Each frequent word becomes a reference
//! [`Color`] placed at the mean RGB of every name it occurs in, after a
//! stoplist removes frequent words that merely modify colors ("light",
//! "deep", "sea", ...).

use std::collections::HashMap;

use crate::color::Color;
use crate::corpus::RawColorRecord;
use crate::hierarchy::{LexicalHierarchy, related_words};
use crate::token::Tokenizer;

/// Running channel sums for one token.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermStats {
    pub count: u64,
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    /// Position of the token's first occurrence in the corpus.
    pub first_seen: usize,
}

impl TermStats {
    fn add(&mut self, record: &RawColorRecord) {
        self.count += 1;
        self.red += record.red;
        self.green += record.green;
        self.blue += record.blue;
    }

    pub fn centroid(&self) -> (f64, f64, f64) {
        let n = self.count as f64;
        (self.red / n, self.green / n, self.blue / n)
    }
}

/// Per-token statistics for one corpus.
#[derive(Debug, Clone, Default)]
pub struct TermTable {
    stats: HashMap<String, TermStats>,
}

impl TermTable {
    /// Accumulate statistics for every token of every record. A token that
    /// occurs twice in one name is counted twice.
    pub fn build<'a, T, I>(tokenizer: &T, records: I) -> Self
    where
        T: Tokenizer + ?Sized,
        I: IntoIterator<Item = &'a RawColorRecord>,
    {
        let mut stats: HashMap<String, TermStats> = HashMap::new();

        for record in records {
            for token in tokenizer.tokenize(&record.raw_name) {
                let next = stats.len();
                stats
                    .entry(token)
                    .or_insert_with(|| TermStats {
                        first_seen: next,
                        ..TermStats::default()
                    })
                    .add(record);
            }
        }

        TermTable { stats }
    }

    pub fn get(&self, token: &str) -> Option<&TermStats> {
        self.stats.get(token)
    }

    /// Tokens eligible as color terms, most frequent first. Equal counts keep
    /// the order in which the tokens first appeared. Tokens without a single
    /// letter (punctuation, numbers) are never eligible.
    pub fn ranked(&self) -> Vec<(&str, &TermStats)> {
        let mut ranked: Vec<(&str, &TermStats)> = self
            .stats
            .iter()
            .filter(|(token, _)| token.chars().any(char::is_alphabetic))
            .map(|(token, stats)| (token.as_str(), stats))
            .collect();

        ranked.sort_by(|a, b| {
            b.1.count
                .cmp(&a.1.count)
                .then(a.1.first_seen.cmp(&b.1.first_seen))
        });

        ranked
    }
}

/// Learn up to `size` basic color terms from `records`.
///
/// The `size` most frequent tokens are taken first and stoplisted tokens are
/// removed afterwards, so the vocabulary is usually smaller than `size`. When
/// a hierarchy is given, every color carries the words related to its name.
pub fn learn_colors<'a, T, I>(
    records: I,
    tokenizer: &T,
    size: usize,
    stoplist: &[String],
    hierarchy: Option<&dyn LexicalHierarchy>,
) -> Vec<Color>
where
    T: Tokenizer + ?Sized,
    I: IntoIterator<Item = &'a RawColorRecord>,
{
    let table = TermTable::build(tokenizer, records);

    let mut colors = Vec::new();
    for (term, stats) in table.ranked().into_iter().take(size) {
        if stoplist.iter().any(|stop| stop == term) {
            continue;
        }

        let (r, g, b) = stats.centroid();
        let mut color = Color::new(term, r, g, b);
        if let Some(hierarchy) = hierarchy {
            color.set_related_words(related_words(hierarchy, term));
        }

        tracing::debug!("Learned basic color term {color}");
        colors.push(color);
    }

    colors
}
