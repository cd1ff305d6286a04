//! POS patterns and their frequencies across the training corpus.
//!
//! A [`Pattern`] is the tag sequence of one tokenized name, with basic color
//! terms tagged `COLOR`. Written out, a pattern joins its tags with `,`:
//! the name "Crimson Red." tags as `NNP,COLOR,.` when "Red" is a color term.
//! A `,` or `\` inside a tag is escaped with `\`, so the comma tag of
//! "Red, White" is written `COLOR,\,,NNP`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use serde::{Deserialize, Serialize};

use crate::corpus::RawColorRecord;
use crate::error::SwatchError;
use crate::tag::{COLOR_TAG, PosTagger};
use crate::token::Tokenizer;

/// Separator between tags in the string form of a pattern.
pub const TAG_DELIMITER: char = ',';

/// Escapes a delimiter or itself inside a tag.
pub const TAG_ESCAPE: char = '\\';

/// An ordered sequence of POS tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pattern(Vec<String>);

impl Pattern {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Pattern(tags.into_iter().map(Into::into).collect())
    }

    /// The pattern of `text` under the given tokenizer and tagger. Returns the
    /// tokens as well, in the same order as the tags.
    pub fn of_text<Tk, Tg>(text: &str, tokenizer: &Tk, tagger: &Tg) -> (Vec<String>, Pattern)
    where
        Tk: Tokenizer + ?Sized,
        Tg: PosTagger + ?Sized,
    {
        let tokens = tokenizer.tokenize(text);
        let tags = tagger.tag(&tokens).into_iter().map(|(_, tag)| tag);
        let pattern = Pattern::new(tags);
        (tokens, pattern)
    }

    /// Parse the `,`-joined string form, honoring escapes.
    pub fn from_delimited(s: &str) -> Self {
        if s.is_empty() {
            return Pattern(Vec::new());
        }

        let mut tags = Vec::new();
        let mut tag = String::new();
        let mut chars = s.chars();
        while let Some(ch) = chars.next() {
            match ch {
                TAG_ESCAPE => tag.push(chars.next().unwrap_or(TAG_ESCAPE)),
                TAG_DELIMITER => tags.push(std::mem::take(&mut tag)),
                _ => tag.push(ch),
            }
        }
        tags.push(tag);

        Pattern(tags)
    }

    pub fn tags(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_color(&self) -> bool {
        self.0.iter().any(|tag| tag == COLOR_TAG)
    }

    /// Index of the first `COLOR` tag.
    pub fn color_position(&self) -> Option<usize> {
        self.0.iter().position(|tag| tag == COLOR_TAG)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tag) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{TAG_DELIMITER}")?;
            }
            for ch in tag.chars() {
                if ch == TAG_DELIMITER || ch == TAG_ESCAPE {
                    write!(f, "{TAG_ESCAPE}")?;
                }
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for Pattern {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Pattern::from_delimited(s))
    }
}

/// A corpus record together with the pattern of its name.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedRecord<'a> {
    pub uid: usize,
    pub record: &'a RawColorRecord,
    pub pattern: Pattern,
}

/// Tag every record of a corpus.
pub fn tag_records<'a, I, Tk, Tg>(records: I, tokenizer: &Tk, tagger: &Tg) -> Vec<TaggedRecord<'a>>
where
    I: IntoIterator<Item = &'a RawColorRecord>,
    Tk: Tokenizer + ?Sized,
    Tg: PosTagger + ?Sized,
{
    records
        .into_iter()
        .enumerate()
        .map(|(uid, record)| {
            let (_, pattern) = Pattern::of_text(&record.raw_name, tokenizer, tagger);
            TaggedRecord {
                uid,
                record,
                pattern,
            }
        })
        .collect()
}

/// How often each pattern occurs in the training corpus.
///
/// Serializes as a map from the string form of each pattern to its count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, u64>", into = "BTreeMap<String, u64>")]
pub struct PatternTable {
    counts: BTreeMap<Pattern, u64>,
}

impl PatternTable {
    pub fn new() -> Self {
        PatternTable::default()
    }

    /// Count every pattern, without smoothing.
    pub fn tally<'p, I>(patterns: I) -> Self
    where
        I: IntoIterator<Item = &'p Pattern>,
    {
        let mut table = PatternTable::new();
        for pattern in patterns {
            table.record(pattern);
        }
        table
    }

    pub fn record(&mut self, pattern: &Pattern) {
        *self.counts.entry(pattern.clone()).or_default() += 1;
    }

    pub fn count(&self, pattern: &Pattern) -> u64 {
        self.counts.get(pattern).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Pattern, u64)> {
        self.counts.iter().map(|(pattern, count)| (pattern, *count))
    }

    /// A sampler over the patterns containing a `COLOR` tag, or over every
    /// pattern when `all_patterns` is set.
    pub fn distribution(&self, all_patterns: bool) -> Result<PatternDistribution, SwatchError> {
        let (patterns, weights): (Vec<Pattern>, Vec<u64>) = self
            .iter()
            .filter(|(pattern, count)| {
                *count > 0 && (all_patterns || pattern.contains_color())
            })
            .map(|(pattern, count)| (pattern.clone(), count))
            .unzip();

        if patterns.is_empty() {
            return Err(SwatchError::EmptyPatternTable);
        }
        let index = WeightedIndex::new(&weights).map_err(|_| SwatchError::EmptyPatternTable)?;

        Ok(PatternDistribution { patterns, index })
    }
}

impl From<BTreeMap<String, u64>> for PatternTable {
    fn from(counts: BTreeMap<String, u64>) -> Self {
        let mut table = PatternTable::new();
        for (pattern, count) in counts {
            *table
                .counts
                .entry(Pattern::from_delimited(&pattern))
                .or_default() += count;
        }
        table
    }
}

impl From<PatternTable> for BTreeMap<String, u64> {
    fn from(table: PatternTable) -> Self {
        table
            .counts
            .into_iter()
            .map(|(pattern, count)| (pattern.to_string(), count))
            .collect()
    }
}

/// Samples patterns in proportion to their corpus frequency.
#[derive(Debug, Clone)]
pub struct PatternDistribution {
    patterns: Vec<Pattern>,
    index: WeightedIndex<u64>,
}

impl PatternDistribution {
    pub fn sample<R>(&self, rng: &mut R) -> &Pattern
    where
        R: Rng + ?Sized,
    {
        &self.patterns[self.index.sample(rng)]
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::{ColorTagger, LexiconTagger};
    use crate::token::TreebankTokenizer;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn pattern(s: &str) -> Pattern {
        s.parse().unwrap()
    }

    #[test]
    fn string_form_round_trips() {
        let tags = Pattern::new(["JJ", "COLOR", "."]);
        let text = tags.to_string();
        assert_eq!(text, "JJ,COLOR,.");

        let split: Vec<&str> = text.split(TAG_DELIMITER).collect();
        assert_eq!(split, tags.tags());
        assert_eq!(pattern(&text), tags);
    }

    #[test]
    fn commas_in_names_keep_their_tag() -> anyhow::Result<()> {
        let tagger = ColorTagger::new(LexiconTagger::new(), ["Red"]);
        let (_, tagged) = Pattern::of_text("Red, White", &TreebankTokenizer, &tagger);
        assert_eq!(tagged, Pattern::new(["COLOR", ",", "NNP"]));

        let text = tagged.to_string();
        assert_eq!(text, r"COLOR,\,,NNP");
        assert_eq!(pattern(&text), tagged);

        let table = PatternTable::tally(&[tagged.clone()]);
        let restored: PatternTable = serde_json::from_str(&serde_json::to_string(&table)?)?;
        assert_eq!(restored.count(&tagged), 1);
        assert_eq!(restored.distribution(false)?.patterns(), &[tagged]);
        Ok(())
    }

    #[test]
    fn escapes_round_trip() {
        let tags = Pattern::new([r"A\B", ",", "", "C,D"]);
        assert_eq!(pattern(&tags.to_string()), tags);
    }

    #[test]
    fn tagging_is_deterministic() {
        let tagger = ColorTagger::new(LexiconTagger::new(), ["Red"]);
        let (tokens, first) = Pattern::of_text("Crimson Red.", &TreebankTokenizer, &tagger);
        let (_, second) = Pattern::of_text("Crimson Red.", &TreebankTokenizer, &tagger);

        assert_eq!(tokens, vec!["Crimson", "Red", "."]);
        assert_eq!(first, pattern("NNP,COLOR,."));
        assert_eq!(first, second);
        assert_eq!(first.color_position(), Some(1));
    }

    #[test]
    fn tally_counts_each_record() {
        let records = vec![
            RawColorRecord::new("Crimson Red", 0.0, 0.0, 0.0),
            RawColorRecord::new("Ruby Red", 0.0, 0.0, 0.0),
            RawColorRecord::new("Moss", 0.0, 0.0, 0.0),
        ];
        let tagger = ColorTagger::new(LexiconTagger::new(), ["Red"]);
        let tagged = tag_records(&records, &TreebankTokenizer, &tagger);
        let table = PatternTable::tally(tagged.iter().map(|t| &t.pattern));

        assert_eq!(tagged[2].uid, 2);
        assert_eq!(table.count(&pattern("NNP,COLOR")), 2);
        assert_eq!(table.count(&pattern("NNP")), 1);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn distribution_keeps_only_color_patterns_by_default() {
        let table = PatternTable::tally(&[pattern("JJ,NN"), pattern("COLOR")]);

        let colors = table.distribution(false).unwrap();
        assert_eq!(colors.patterns(), &[pattern("COLOR")]);

        let all = table.distribution(true).unwrap();
        assert_eq!(all.patterns().len(), 2);
    }

    #[test]
    fn distribution_requires_an_eligible_pattern() {
        let table = PatternTable::tally(&[pattern("JJ,NN")]);
        assert!(matches!(
            table.distribution(false),
            Err(SwatchError::EmptyPatternTable)
        ));
        assert!(PatternTable::new().distribution(true).is_err());
    }

    #[test]
    fn sampling_follows_frequencies() {
        let mut table = PatternTable::new();
        for _ in 0..9 {
            table.record(&pattern("ADJ,COLOR"));
        }
        table.record(&pattern("COLOR"));

        let distribution = table.distribution(false).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let trials = 20_000;
        let hits = (0..trials)
            .filter(|_| distribution.sample(&mut rng) == &pattern("ADJ,COLOR"))
            .count();

        let share = hits as f64 / trials as f64;
        assert!((share - 0.9).abs() < 0.02, "share was {share}");
    }

    #[test]
    fn table_serializes_as_plain_map() {
        let table = PatternTable::tally(&[pattern("COLOR"), pattern("COLOR")]);
        assert_eq!(serde_json::to_string(&table).unwrap(), r#"{"COLOR":2}"#);
    }
}
