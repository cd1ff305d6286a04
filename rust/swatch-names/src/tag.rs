//! Part-of-speech tagging with a distinguished `COLOR` tag.
//!
//! Tagging is a capability: anything implementing [`PosTagger`] can sit
//! underneath a [`ColorTagger`], which overrides the tag of every token that
//! names a basic color term. Tags follow the Penn Treebank tag set.
//!
//! The bundled [`LexiconTagger`] is a rule cascade rather than a trained
//! model. It consults, in order:
//!
//! 1. punctuation classes (`.`, `,`, `:`, `(`, `)`, quotes, ...)
//! 2. numerals (`CD`)
//! 3. caller-supplied lexicon entries
//! 4. a closed-class lexicon (determiners, prepositions, pronouns, ...)
//! 5. capitalization (`NNP`, `NNPS`)
//! 6. suffix rules (`-ing`, `-ed`, `-ly`, adjective suffixes, plurals)
//!
//! and falls back to `NN`.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

/// The tag substituted for tokens that name a basic color term.
pub const COLOR_TAG: &str = "COLOR";

/// A token paired with its tag.
pub type Tagged = (String, String);

/// Anything that can assign part-of-speech tags to a token sequence.
///
/// Implementations must return exactly one pair per input token, in order.
pub trait PosTagger {
    fn tag(&self, tokens: &[String]) -> Vec<Tagged>;
}

/// Wraps another tagger and replaces the tag of color-term tokens with
/// [`COLOR_TAG`]. Matching is case-sensitive.
#[derive(Debug, Clone)]
pub struct ColorTagger<T> {
    tagger: T,
    color_names: HashSet<String>,
}

impl<T> ColorTagger<T>
where
    T: PosTagger,
{
    pub fn new<I, S>(tagger: T, color_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ColorTagger {
            tagger,
            color_names: color_names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_color(&self, token: &str) -> bool {
        self.color_names.contains(token)
    }
}

impl<T> PosTagger for ColorTagger<T>
where
    T: PosTagger,
{
    fn tag(&self, tokens: &[String]) -> Vec<Tagged> {
        self.tagger
            .tag(tokens)
            .into_iter()
            .map(|(token, tag)| {
                if self.is_color(&token) {
                    (token, COLOR_TAG.to_string())
                } else {
                    (token, tag)
                }
            })
            .collect()
    }
}

const CLOSED_CLASS: &[(&str, &str)] = &[
    ("a", "DT"),
    ("an", "DT"),
    ("the", "DT"),
    ("this", "DT"),
    ("that", "DT"),
    ("these", "DT"),
    ("those", "DT"),
    ("every", "DT"),
    ("some", "DT"),
    ("no", "DT"),
    ("all", "DT"),
    ("of", "IN"),
    ("in", "IN"),
    ("on", "IN"),
    ("at", "IN"),
    ("by", "IN"),
    ("for", "IN"),
    ("from", "IN"),
    ("with", "IN"),
    ("under", "IN"),
    ("over", "IN"),
    ("into", "IN"),
    ("after", "IN"),
    ("before", "IN"),
    ("beyond", "IN"),
    ("above", "IN"),
    ("below", "IN"),
    ("near", "IN"),
    ("like", "IN"),
    ("to", "TO"),
    ("and", "CC"),
    ("or", "CC"),
    ("but", "CC"),
    ("nor", "CC"),
    ("i", "PRP"),
    ("you", "PRP"),
    ("he", "PRP"),
    ("she", "PRP"),
    ("it", "PRP"),
    ("we", "PRP"),
    ("they", "PRP"),
    ("me", "PRP"),
    ("us", "PRP"),
    ("them", "PRP"),
    ("my", "PRP$"),
    ("your", "PRP$"),
    ("his", "PRP$"),
    ("her", "PRP$"),
    ("its", "PRP$"),
    ("our", "PRP$"),
    ("their", "PRP$"),
    ("can", "MD"),
    ("could", "MD"),
    ("will", "MD"),
    ("would", "MD"),
    ("may", "MD"),
    ("might", "MD"),
    ("must", "MD"),
    ("shall", "MD"),
    ("should", "MD"),
    ("is", "VBZ"),
    ("are", "VBP"),
    ("was", "VBD"),
    ("were", "VBD"),
    ("be", "VB"),
    ("been", "VBN"),
    ("do", "VBP"),
    ("does", "VBZ"),
    ("did", "VBD"),
    ("'s", "POS"),
    ("n't", "RB"),
    ("not", "RB"),
    ("very", "RB"),
    ("so", "RB"),
    ("too", "RB"),
    ("just", "RB"),
    ("here", "RB"),
    ("there", "EX"),
    ("what", "WP"),
    ("who", "WP"),
    ("where", "WRB"),
    ("when", "WRB"),
];

const ADJECTIVE_SUFFIXES: &[&str] = &[
    "ous", "ful", "ive", "able", "ible", "al", "ic", "ish", "less", "ary", "ent", "ant",
];

/// Caller-supplied word to tag overrides, keyed by lowercased word.
///
/// Patterns learned in training depend on these entries, so they are
/// stored with the artifacts and reused at generation time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lexicon(BTreeMap<String, String>);

impl Lexicon {
    pub fn new() -> Self {
        Lexicon::default()
    }

    pub fn get(&self, word: &str) -> Option<&str> {
        self.0.get(word).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<W, T> Extend<(W, T)> for Lexicon
where
    W: AsRef<str>,
    T: Into<String>,
{
    fn extend<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (W, T)>,
    {
        self.0.extend(
            entries
                .into_iter()
                .map(|(word, tag)| (word.as_ref().to_lowercase(), tag.into())),
        );
    }
}

impl<W, T> FromIterator<(W, T)> for Lexicon
where
    W: AsRef<str>,
    T: Into<String>,
{
    fn from_iter<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (W, T)>,
    {
        let mut lexicon = Lexicon::new();
        lexicon.extend(entries);
        lexicon
    }
}

/// A rule-based Penn Treebank tagger.
#[derive(Debug, Clone, Default)]
pub struct LexiconTagger {
    lexicon: Lexicon,
}

impl From<Lexicon> for LexiconTagger {
    fn from(lexicon: Lexicon) -> Self {
        LexiconTagger { lexicon }
    }
}

impl LexiconTagger {
    pub fn new() -> Self {
        LexiconTagger::default()
    }

    /// Add lexicon entries. Keys are matched case-insensitively and take
    /// precedence over every built-in rule except punctuation and numerals.
    pub fn with_entries<I, W, T>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (W, T)>,
        W: AsRef<str>,
        T: Into<String>,
    {
        self.lexicon.extend(entries);
        self
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Tag a single token without any sentence context.
    pub fn tag_word(&self, token: &str) -> String {
        if let Some(tag) = punctuation_tag(token) {
            return tag.to_string();
        }
        if is_numeral(token) {
            return "CD".to_string();
        }

        let lower = token.to_lowercase();
        if let Some(tag) = self.lexicon.get(&lower) {
            return tag.to_string();
        }
        if let Some((_, tag)) = CLOSED_CLASS.iter().find(|(word, _)| *word == lower) {
            return tag.to_string();
        }

        if token.chars().next().is_some_and(char::is_uppercase) {
            return if lower.len() > 3 && lower.ends_with('s') && !lower.ends_with("ss") {
                "NNPS".to_string()
            } else {
                "NNP".to_string()
            };
        }

        suffix_tag(&lower).to_string()
    }
}

impl PosTagger for LexiconTagger {
    fn tag(&self, tokens: &[String]) -> Vec<Tagged> {
        tokens
            .iter()
            .map(|token| (token.clone(), self.tag_word(token)))
            .collect()
    }
}

fn punctuation_tag(token: &str) -> Option<&'static str> {
    let tag = match token {
        "." | "?" | "!" => ".",
        "," => ",",
        ":" | ";" | "..." | "--" | "-" => ":",
        "(" | "[" | "{" | "<" => "(",
        ")" | "]" | "}" | ">" => ")",
        "``" => "``",
        "''" | "'" => "''",
        "$" => "$",
        "#" => "#",
        "&" => "CC",
        "%" | "@" => "NN",
        _ => return None,
    };
    Some(tag)
}

fn is_numeral(token: &str) -> bool {
    token.chars().any(|c| c.is_ascii_digit())
        && token
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | ':' | '/' | '-'))
}

fn suffix_tag(lower: &str) -> &'static str {
    let len = lower.chars().count();

    if len > 4 && lower.ends_with("ing") {
        "VBG"
    } else if len > 3 && lower.ends_with("ed") {
        "VBN"
    } else if len > 3 && lower.ends_with("ly") {
        "RB"
    } else if len > 4
        && ADJECTIVE_SUFFIXES
            .iter()
            .any(|suffix| lower.ends_with(suffix))
    {
        "JJ"
    } else if len > 3 && lower.ends_with('y') && !lower.ends_with("ey") {
        "JJ"
    } else if len > 3 && lower.ends_with('s') && !lower.ends_with("ss") && !lower.ends_with("us")
    {
        "NNS"
    } else {
        "NN"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn tags(tagged: Vec<Tagged>) -> Vec<String> {
        tagged.into_iter().map(|(_, tag)| tag).collect()
    }

    /// A tagger that labels everything the same way.
    struct Constant(&'static str);

    impl PosTagger for Constant {
        fn tag(&self, tokens: &[String]) -> Vec<Tagged> {
            tokens
                .iter()
                .map(|t| (t.clone(), self.0.to_string()))
                .collect()
        }
    }

    #[test]
    fn color_terms_always_get_color_tag() {
        let tagger = ColorTagger::new(Constant("VB"), ["red"]);
        let tagged = tagger.tag(&tokens(&["red"]));
        assert_eq!(tagged, vec![("red".to_string(), COLOR_TAG.to_string())]);
    }

    #[test]
    fn color_matching_is_case_sensitive() {
        let tagger = ColorTagger::new(Constant("NN"), ["red"]);
        assert_eq!(
            tags(tagger.tag(&tokens(&["Red", "red"]))),
            vec!["NN", COLOR_TAG]
        );
    }

    #[test]
    fn output_matches_input_length() {
        let tagger = ColorTagger::new(LexiconTagger::new(), ["blue"]);
        let input = tokens(&["the", "blue", "of", "the", "sea", "."]);
        assert_eq!(tagger.tag(&input).len(), input.len());
    }

    #[test]
    fn lexicon_tagger_uses_closed_classes_and_suffixes() {
        let tagger = LexiconTagger::new();
        assert_eq!(
            tags(tagger.tag(&tokens(&[
                "the", "glowing", "faded", "softly", "mysterious", "stones", "moss", "."
            ]))),
            vec!["DT", "VBG", "VBN", "RB", "JJ", "NNS", "NN", "."]
        );
    }

    #[test]
    fn capitalized_words_are_proper_nouns() {
        let tagger = LexiconTagger::new();
        assert_eq!(tagger.tag_word("Tropez"), "NNP");
        assert_eq!(tagger.tag_word("Rockies"), "NNPS");
        assert_eq!(tagger.tag_word("The"), "DT");
    }

    #[test]
    fn lexicon_entries_take_precedence() {
        let tagger = LexiconTagger::new().with_entries([("Mist", "NN"), ("rosy", "JJ")]);
        assert_eq!(tagger.tag_word("mist"), "NN");
        assert_eq!(tagger.tag_word("Mist"), "NN");
        assert_eq!(tagger.tag_word("1,000"), "CD");
    }

    #[test]
    fn lexicon_survives_serialization() {
        let lexicon: Lexicon = [("Crimson", "JJ")].into_iter().collect();
        let json = serde_json::to_string(&lexicon).unwrap();
        assert_eq!(json, r#"{"crimson":"JJ"}"#);

        let tagger = LexiconTagger::from(serde_json::from_str::<Lexicon>(&json).unwrap());
        assert_eq!(tagger.tag_word("Crimson"), "JJ");
        assert_eq!(tagger.lexicon().len(), 1);
    }
}
