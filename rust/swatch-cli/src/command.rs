use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use swatch_names::hierarchy::{LexicalHierarchy, SenseGraph};
use swatch_names::{
    Artifacts, Corpus, GenerationConfig, LexiconTagger, NameGenerator, Rgb, TrainingConfig,
    TreebankTokenizer,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{GenerateArgs, TrainArgs};

fn load_lexicon(path: Option<&Path>) -> Result<LexiconTagger> {
    let tagger = LexiconTagger::new();
    let Some(path) = path else {
        return Ok(tagger);
    };

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read lexicon {}", path.display()))?;
    let entries: HashMap<String, String> = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse lexicon {}", path.display()))?;

    tracing::info!("Loaded {} lexicon entries", entries.len());
    Ok(tagger.with_entries(entries))
}

pub async fn train(args: TrainArgs) -> Result<()> {
    let mut config = TrainingConfig {
        vocabulary_size: args.vocabulary_size,
        state_size: args.state_size,
        ..TrainingConfig::default()
    };
    if !args.stopwords.is_empty() {
        config.stoplist = args.stopwords;
    }

    tracing::info!("Reading color name corpus...");
    let corpus = Corpus::read_vendors(&args.data, &args.vendors)
        .await
        .with_context(|| format!("Failed to read corpus from {}", args.data.display()))?;

    let hierarchy = args
        .hierarchy
        .as_deref()
        .map(|path| {
            SenseGraph::load(path)
                .with_context(|| format!("Failed to load hierarchy {}", path.display()))
        })
        .transpose()?;
    let tagger = load_lexicon(args.lexicon.as_deref())?;

    let artifacts = swatch_names::train(
        &corpus,
        &TreebankTokenizer,
        tagger,
        hierarchy.as_ref().map(|graph| graph as &dyn LexicalHierarchy),
        &config,
    )?;

    artifacts
        .save(&args.out)
        .with_context(|| format!("Failed to write artifacts to {}", args.out.display()))?;
    tracing::info!("Training complete");
    Ok(())
}

pub async fn generate(args: GenerateArgs) -> Result<()> {
    let artifacts = Artifacts::load(&args.artifacts)
        .with_context(|| format!("Failed to load artifacts from {}", args.artifacts.display()))?;
    // Tag candidates with the lexicon the patterns were learned with
    let tagger = artifacts.tagger();
    let Artifacts {
        vocabulary,
        patterns,
        model,
        ..
    } = artifacts;

    let config = GenerationConfig {
        max_iterations: args.max_iterations,
        neighbours: args.neighbours,
        all_patterns: args.all_patterns,
        novel_only: args.novel,
    };
    let generator = NameGenerator::new(vocabulary, &patterns, TreebankTokenizer, tagger, config)?;

    let mut rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let mut name = |input: &str| -> Result<()> {
        let target: Rgb = input.parse()?;
        let generation = generator.generate_from_chain(target, &model, &mut rng)?;
        println!("{generation}");
        Ok(())
    };

    if !args.colors.is_empty() {
        for input in &args.colors {
            name(input)?;
        }
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        name(&line)?;
    }

    Ok(())
}
