//! The constraint engine: generate-and-test over candidate names.
//!
//! A request starts from a target RGB. The nearest basic colors become the
//! colors a name may mention, and a target POS pattern is drawn from the
//! training pattern frequencies. Candidates are then sampled from a
//! [`CandidateSource`] until one satisfies the [`Constraint`] or the
//! iteration budget runs out:
//!
//! ```text
//! target RGB ──► closest colors ─┐
//! pattern table ─► target pattern ┴─► Constraint
//! language model ─► candidate ──────► satisfied? ──► Accepted
//!        ▲                               │ no
//!        └───────── budget left? ◄───────┘ ──► Exhausted
//! ```
//!
//! Running out of budget is an ordinary [`Outcome`], not an error.

use std::fmt;

use rand::Rng;

use crate::color::{Color, Rgb};
use crate::config::GenerationConfig;
use crate::error::SwatchError;
use crate::markov::{CandidateSource, MarkovChain, NovelNames};
use crate::matcher::closest_n_colors;
use crate::pattern::{Pattern, PatternDistribution, PatternTable};
use crate::tag::{ColorTagger, PosTagger};
use crate::token::Tokenizer;

/// What an acceptable name must look like.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub pattern: Pattern,
    pub colors: Vec<Color>,
}

impl Constraint {
    pub fn new(pattern: Pattern, colors: Vec<Color>) -> Self {
        Constraint { pattern, colors }
    }

    /// Check a candidate name.
    ///
    /// The candidate's pattern must equal the target pattern exactly. When
    /// the target has a `COLOR` tag, the token at its first `COLOR` position
    /// must be the name of one of the constraint's colors. Otherwise some
    /// token must be a related word of one of the constraint's colors.
    /// All comparisons are case-sensitive.
    pub fn is_satisfied_by<Tk, Tg>(&self, candidate: &str, tokenizer: &Tk, tagger: &Tg) -> bool
    where
        Tk: Tokenizer + ?Sized,
        Tg: PosTagger + ?Sized,
    {
        let (tokens, pattern) = Pattern::of_text(candidate, tokenizer, tagger);
        if pattern != self.pattern {
            return false;
        }

        match self.pattern.color_position() {
            Some(position) => tokens
                .get(position)
                .is_some_and(|token| self.colors.iter().any(|color| &color.name == token)),
            None => tokens.iter().any(|token| {
                self.colors
                    .iter()
                    .any(|color| color.related_words().contains(token))
            }),
        }
    }
}

/// Draw one candidate and test it. Returns the candidate if it satisfies
/// the constraint.
pub fn attempt<S, Tk, Tg, R>(
    constraint: &Constraint,
    source: &S,
    tokenizer: &Tk,
    tagger: &Tg,
    rng: &mut R,
) -> Option<String>
where
    S: CandidateSource + ?Sized,
    Tk: Tokenizer + ?Sized,
    Tg: PosTagger + ?Sized,
    R: Rng + ?Sized,
{
    let candidate = source.sample(rng)?;
    tracing::debug!("Testing candidate {candidate}");

    if constraint.is_satisfied_by(&candidate, tokenizer, tagger) {
        Some(candidate)
    } else {
        None
    }
}

/// How a generation request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A candidate satisfied the constraint after `iterations` attempts.
    Accepted { name: String, iterations: usize },
    /// The budget of `iterations` attempts ran out.
    Exhausted { iterations: usize },
}

/// The full report of one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub target: Rgb,
    pub constraint: Constraint,
    pub outcome: Outcome,
}

impl Generation {
    pub fn name(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Accepted { name, .. } => Some(name),
            Outcome::Exhausted { .. } => None,
        }
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::Accepted { name, .. } => {
                write!(f, "Found a name for {} -- {}", self.target, name)
            }
            Outcome::Exhausted { iterations } => write!(
                f,
                "No name found for {} in {} iterations (pattern {})",
                self.target, iterations, self.constraint.pattern
            ),
        }
    }
}

/// Everything a generation request reads. Built once from the training
/// artifacts and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct NameGenerator<Tk, Tg> {
    vocabulary: Vec<Color>,
    patterns: PatternDistribution,
    tokenizer: Tk,
    tagger: ColorTagger<Tg>,
    config: GenerationConfig,
}

impl<Tk, Tg> NameGenerator<Tk, Tg>
where
    Tk: Tokenizer,
    Tg: PosTagger,
{
    /// Fails when the vocabulary is empty or no pattern can be sampled.
    pub fn new(
        vocabulary: Vec<Color>,
        patterns: &PatternTable,
        tokenizer: Tk,
        tagger: Tg,
        config: GenerationConfig,
    ) -> Result<Self, SwatchError> {
        if vocabulary.is_empty() {
            return Err(SwatchError::EmptyVocabulary);
        }
        let patterns = patterns.distribution(config.all_patterns)?;
        let tagger = ColorTagger::new(tagger, vocabulary.iter().map(|color| color.name.clone()));

        Ok(NameGenerator {
            vocabulary,
            patterns,
            tokenizer,
            tagger,
            config,
        })
    }

    pub fn vocabulary(&self) -> &[Color] {
        &self.vocabulary
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Pick the nearest colors and a target pattern for `target`.
    pub fn constraint_for<R>(&self, target: Rgb, rng: &mut R) -> Result<Constraint, SwatchError>
    where
        R: Rng + ?Sized,
    {
        let query = Color::query(target);
        let colors: Vec<Color> =
            closest_n_colors(&query, &self.vocabulary, self.config.neighbours.max(1))?
                .into_iter()
                .cloned()
                .collect();
        tracing::debug!(
            "{}",
            colors
                .iter()
                .map(|color| color.name.as_str())
                .collect::<Vec<_>>()
                .join(":")
        );

        let pattern = self.patterns.sample(rng).clone();
        Ok(Constraint::new(pattern, colors))
    }

    /// Run one request against `source`.
    pub fn generate<S, R>(
        &self,
        target: Rgb,
        source: &S,
        rng: &mut R,
    ) -> Result<Generation, SwatchError>
    where
        S: CandidateSource + ?Sized,
        R: Rng + ?Sized,
    {
        let constraint = self.constraint_for(target, rng)?;
        tracing::info!(
            "Generating candidate names using pattern {} for color {}",
            constraint.pattern,
            target
        );

        let max_iterations = self.config.max_iterations;
        for iteration in 1..=max_iterations {
            if let Some(name) = attempt(&constraint, source, &self.tokenizer, &self.tagger, rng) {
                return Ok(Generation {
                    target,
                    constraint,
                    outcome: Outcome::Accepted {
                        name,
                        iterations: iteration,
                    },
                });
            }
        }

        Ok(Generation {
            target,
            constraint,
            outcome: Outcome::Exhausted {
                iterations: max_iterations,
            },
        })
    }

    /// Run one request against a trained chain, honoring `novel_only`.
    pub fn generate_from_chain<R>(
        &self,
        target: Rgb,
        chain: &MarkovChain,
        rng: &mut R,
    ) -> Result<Generation, SwatchError>
    where
        R: Rng + ?Sized,
    {
        if self.config.novel_only {
            self.generate(target, &NovelNames(chain), rng)
        } else {
            self.generate(target, chain, rng)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::LexiconTagger;
    use crate::token::TreebankTokenizer;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::cell::Cell;

    /// Replays a fixed list of candidates and counts how often it is asked.
    struct Script {
        names: Vec<&'static str>,
        calls: Cell<usize>,
    }

    impl Script {
        fn new(names: Vec<&'static str>) -> Self {
            Script {
                names,
                calls: Cell::new(0),
            }
        }
    }

    impl CandidateSource for Script {
        fn sample<R>(&self, _rng: &mut R) -> Option<String>
        where
            R: Rng + ?Sized,
        {
            let call = self.calls.get();
            self.calls.set(call + 1);
            self.names
                .get(call % self.names.len())
                .map(|name| name.to_string())
        }
    }

    fn vocabulary() -> Vec<Color> {
        let mut red = Color::new("Red", 200.0, 10.0, 10.0);
        red.set_related_words(["Cherry", "Ruby"]);
        let blue = Color::new("Blue", 10.0, 10.0, 200.0);
        vec![red, blue]
    }

    fn tagger() -> ColorTagger<LexiconTagger> {
        ColorTagger::new(LexiconTagger::new(), ["Red", "Blue"])
    }

    type Generator = NameGenerator<TreebankTokenizer, LexiconTagger>;

    fn build(
        vocabulary: Vec<Color>,
        table: &PatternTable,
        config: GenerationConfig,
    ) -> Result<Generator, SwatchError> {
        NameGenerator::new(vocabulary, table, TreebankTokenizer, LexiconTagger::new(), config)
    }

    fn generator(table: &PatternTable, config: GenerationConfig) -> Generator {
        build(vocabulary(), table, config).unwrap()
    }

    #[test]
    fn color_pattern_requires_a_candidate_color() {
        let red = vocabulary()[0].clone();
        let constraint = Constraint::new(Pattern::new(["NNP", "COLOR"]), vec![red]);

        assert!(constraint.is_satisfied_by("Crimson Red", &TreebankTokenizer, &tagger()));
        assert!(!constraint.is_satisfied_by("Crimson Blue", &TreebankTokenizer, &tagger()));
        assert!(!constraint.is_satisfied_by("Red", &TreebankTokenizer, &tagger()));
        assert!(!constraint.is_satisfied_by("the Red", &TreebankTokenizer, &tagger()));
    }

    #[test]
    fn colorless_pattern_requires_a_related_word() {
        let constraint = Constraint::new(Pattern::new(["NNP", "NNP"]), vocabulary());

        assert!(constraint.is_satisfied_by("Ruby Slipper", &TreebankTokenizer, &tagger()));
        assert!(!constraint.is_satisfied_by("Glass Slipper", &TreebankTokenizer, &tagger()));
        assert!(!constraint.is_satisfied_by("ruby Slipper", &TreebankTokenizer, &tagger()));
    }

    #[test]
    fn names_with_commas_satisfy_their_stored_pattern() -> anyhow::Result<()> {
        let (_, tagged) = Pattern::of_text("Red, White", &TreebankTokenizer, &tagger());
        let json = serde_json::to_string(&PatternTable::tally(&[tagged]))?;
        let table: PatternTable = serde_json::from_str(&json)?;

        let target = table.distribution(false)?.patterns()[0].clone();
        let constraint = Constraint::new(target, vocabulary());
        assert!(constraint.is_satisfied_by("Red, White", &TreebankTokenizer, &tagger()));
        Ok(())
    }

    #[test]
    fn accepts_first_satisfying_candidate() {
        let table = PatternTable::tally(&[Pattern::new(["NNP", "COLOR"])]);
        let generator = generator(&table, GenerationConfig::default());
        let source = Script::new(vec!["Moss", "Crimson Blue", "Crimson Red", "Ruby Red"]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let generation = generator
            .generate(Rgb::new(210.0, 5.0, 5.0), &source, &mut rng)
            .unwrap();

        assert_eq!(
            generation.outcome,
            Outcome::Accepted {
                name: "Crimson Red".to_string(),
                iterations: 3
            }
        );
        assert_eq!(source.calls.get(), 3);
        assert_eq!(generation.name(), Some("Crimson Red"));
    }

    #[test]
    fn exhausts_after_the_budget() {
        let table = PatternTable::tally(&[Pattern::new(["NNP", "COLOR"])]);
        let config = GenerationConfig {
            max_iterations: 25,
            ..GenerationConfig::default()
        };
        let generator = generator(&table, config);
        let source = Script::new(vec!["Moss"]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let generation = generator
            .generate(Rgb::new(210.0, 5.0, 5.0), &source, &mut rng)
            .unwrap();

        assert_eq!(generation.outcome, Outcome::Exhausted { iterations: 25 });
        assert_eq!(source.calls.get(), 25);
        assert!(generation.to_string().contains("25 iterations"));
    }

    #[test]
    fn empty_attempts_spend_budget() {
        struct Silent;
        impl CandidateSource for Silent {
            fn sample<R>(&self, _rng: &mut R) -> Option<String>
            where
                R: Rng + ?Sized,
            {
                None
            }
        }

        let table = PatternTable::tally(&[Pattern::new(["COLOR"])]);
        let generator = generator(&table, GenerationConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let generation = generator.generate(Rgb::new(0.0, 0.0, 0.0), &Silent, &mut rng).unwrap();

        assert_eq!(generation.outcome, Outcome::Exhausted { iterations: 500 });
    }

    #[test]
    fn neighbours_widen_the_candidate_colors() {
        let table = PatternTable::tally(&[Pattern::new(["COLOR"])]);
        let config = GenerationConfig {
            neighbours: 3,
            ..GenerationConfig::default()
        };
        let generator = generator(&table, config);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let constraint = generator.constraint_for(Rgb::new(210.0, 5.0, 5.0), &mut rng).unwrap();
        let names: Vec<&str> = constraint.colors.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Red", "Blue"]);
    }

    #[test]
    fn construction_checks_its_inputs() {
        let table = PatternTable::tally(&[Pattern::new(["COLOR"])]);
        assert!(matches!(
            build(Vec::new(), &table, GenerationConfig::default()),
            Err(SwatchError::EmptyVocabulary)
        ));

        let colorless = PatternTable::tally(&[Pattern::new(["NN"])]);
        assert!(matches!(
            build(vocabulary(), &colorless, GenerationConfig::default()),
            Err(SwatchError::EmptyPatternTable)
        ));
    }
}
