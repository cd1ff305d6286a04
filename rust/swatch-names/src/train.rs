//! The training phase: corpus in, [`Artifacts`] out.

use crate::artifact::Artifacts;
use crate::config::TrainingConfig;
use crate::corpus::Corpus;
use crate::error::SwatchError;
use crate::extract::learn_colors;
use crate::hierarchy::LexicalHierarchy;
use crate::markov::MarkovChain;
use crate::pattern::{PatternTable, tag_records};
use crate::tag::{ColorTagger, LexiconTagger};
use crate::token::Tokenizer;

/// Learn the vocabulary, tally the pattern of every name against it and
/// train the language model on the raw names. The tagger's lexicon is kept
/// with the artifacts.
pub fn train<Tk>(
    corpus: &Corpus,
    tokenizer: &Tk,
    tagger: LexiconTagger,
    hierarchy: Option<&dyn LexicalHierarchy>,
    config: &TrainingConfig,
) -> Result<Artifacts, SwatchError>
where
    Tk: Tokenizer + ?Sized,
{
    if corpus.is_empty() {
        return Err(SwatchError::EmptyCorpus);
    }

    tracing::info!("Learning basic color terms from {} names...", corpus.len());
    let vocabulary = learn_colors(
        corpus.records(),
        tokenizer,
        config.vocabulary_size,
        &config.stoplist,
        hierarchy,
    );
    if vocabulary.is_empty() {
        return Err(SwatchError::EmptyVocabulary);
    }
    tracing::info!("Learned {} basic color terms", vocabulary.len());

    tracing::info!("Tagging color names...");
    let lexicon = tagger.lexicon().clone();
    let tagger = ColorTagger::new(tagger, vocabulary.iter().map(|color| color.name.clone()));
    let tagged = tag_records(corpus.records(), tokenizer, &tagger);
    let patterns = PatternTable::tally(tagged.iter().map(|record| &record.pattern));
    tracing::info!("Counted {} distinct POS patterns", patterns.len());

    tracing::info!("Training markov language model...");
    let model = MarkovChain::train(&corpus.names_text(), config.state_size)?;

    Ok(Artifacts {
        vocabulary,
        patterns,
        lexicon,
        model,
    })
}
