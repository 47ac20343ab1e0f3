pub mod config;
pub mod corpus;
pub mod evaluate;
pub mod lesk;
pub mod lexicon;
pub mod overlap;
pub mod sample;
pub mod tokenize;

pub use config::{ConfigError, EvalConfig};
pub use corpus::{
    CorpusError, CorpusOptions, FieldLimits, LabeledSentence, SentencePool, load_pool,
    parse_tagfile, read_tagfile,
};
pub use evaluate::{EvaluationReport, Evaluator, KeywordRule, MatchPolicy, Outcome, Prediction};
pub use lesk::{LESK_POS, ScoredSense, SignatureMode, SimpleLesk};
pub use lexicon::{Lexicon, MemoryLexicon, SenseCandidate, WordNetLexicon};
pub use overlap::{overlap, overlap_tokens};
pub use sample::sample;
pub use tokenize::Tokenizer;
