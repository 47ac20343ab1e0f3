use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;
use wordnet_db::LoadMode;

use lesk_wsd::{EvalConfig, EvaluationReport, Evaluator, SimpleLesk, WordNetLexicon, load_pool, sample};

/// Evaluate Simple Lesk word-sense disambiguation on random SemCor sentences.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// TOML file with evaluation settings.
    #[arg(long, env = "LESK_CONFIG")]
    config: Option<PathBuf>,
    /// WordNet dictionary directory.
    #[arg(long, env = "WNSEARCHDIR")]
    wordnet_dir: Option<PathBuf>,
    /// How dictionary files are loaded: mmap or owned.
    #[arg(long, env = "WORDNET_LOAD_MODE", value_parser = parse_load_mode, default_value = "mmap")]
    wordnet_mode: LoadMode,
    /// Directory of SemCor tagfiles.
    #[arg(long, env = "SEMCOR_DIR")]
    corpus_dir: Option<PathBuf>,
    #[arg(long)]
    sample_size: Option<usize>,
    #[arg(long, env = "LESK_SEED")]
    seed: Option<u64>,
    /// Ignore stopwords and non-alphabetic tokens when scoring.
    #[arg(long)]
    filter_stopwords: bool,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(&cli)?;

    let wn_start = Instant::now();
    let lexicon = match WordNetLexicon::open(
        &config.lexicon_search_path,
        cli.wordnet_mode,
        config.lemmatize,
    ) {
        Ok(lexicon) => lexicon,
        Err(err) => {
            error!("{err:#}");
            println!("Error initializing WordNet database.");
            return Ok(ExitCode::FAILURE);
        }
    };
    info!("wordnet loaded in {} ms", wn_start.elapsed().as_millis());

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    println!("Attempting to load SemCor from: {}", config.corpus_path.display());
    let mut pool = load_pool(&config.corpus_path, &config.corpus_options(), &mut rng);
    if pool.ensure_nonempty() {
        println!("No SemCor sentences found. Using sample data.");
    }

    let selected = sample(pool.as_slice(), config.sample_size, &mut rng);
    println!("Selected {} random sentences", selected.len());

    let lesk = SimpleLesk::new(&lexicon, config.tokenizer(), config.signature);
    let report = Evaluator::new(&lesk, &config.matching).evaluate(selected);
    print_report(&report);

    Ok(ExitCode::SUCCESS)
}

fn load_config(cli: &Cli) -> Result<EvalConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            info!("using config at {}", path.display());
            EvalConfig::load(path)?
        }
        None => EvalConfig::default(),
    };
    if let Some(dir) = &cli.wordnet_dir {
        config.lexicon_search_path = dir.clone();
    }
    if let Some(dir) = &cli.corpus_dir {
        config.corpus_path = dir.clone();
    }
    if let Some(size) = cli.sample_size {
        config.sample_size = size;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if cli.filter_stopwords {
        config.filter_stopwords = true;
    }
    config.validate()?;

    info!(
        "using wordnet at {} (mode: {:?})",
        config.lexicon_search_path.display(),
        cli.wordnet_mode
    );
    Ok(config)
}

fn print_report(report: &EvaluationReport) {
    for (i, outcome) in report.outcomes.iter().enumerate() {
        let sentence = &outcome.sentence;
        println!("\nSentence {}: {}", i + 1, sentence.sentence());
        println!(
            "Target word: {} (Sense key: {})",
            sentence.target_word(),
            sentence.sense_key()
        );
        match &outcome.prediction {
            Some(prediction) => println!(
                "Predicted sense: {} - {}",
                prediction.word, prediction.gloss
            ),
            None => println!("No synset found for '{}'.", sentence.target_word()),
        }
    }

    if let Some(accuracy) = report.accuracy_percent() {
        println!(
            "\nAccuracy: {accuracy:.2}% ({}/{})",
            report.correct, report.total
        );
    }
    if let Some(coverage) = report.coverage_percent() {
        println!(
            "Coverage: {coverage:.2}% ({}/{})",
            report.predicted, report.total
        );
    }
}

fn parse_load_mode(raw: &str) -> Result<LoadMode, String> {
    match raw.to_ascii_lowercase().as_str() {
        "mmap" => Ok(LoadMode::Mmap),
        "owned" => Ok(LoadMode::Owned),
        other => Err(format!("unknown load mode {other:?}, expected mmap or owned")),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level)
        .init();
}
