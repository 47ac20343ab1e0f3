//! Runs the selector over labeled sentences and scores it against the gold keys.

use serde::Deserialize;
use tracing::debug;
use wordnet_types::Pos;

use crate::corpus::LabeledSentence;
use crate::lesk::{ScoredSense, SimpleLesk};
use crate::lexicon::Lexicon;

/// Correct when the predicted gloss contains `keyword` and the gold key
/// starts with `gold_prefix`.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
pub struct KeywordRule {
    pub keyword: String,
    pub gold_prefix: String,
}

impl KeywordRule {
    pub fn new(keyword: &str, gold_prefix: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            gold_prefix: gold_prefix.to_string(),
        }
    }

    pub fn matches(&self, gloss: &str, gold_key: &str) -> bool {
        gloss.contains(&self.keyword) && gold_key.starts_with(&self.gold_prefix)
    }
}

/// How a prediction is compared with the gold sense key.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Any rule matching counts the sentence as correct, once.
    Keywords { rules: Vec<KeywordRule> },
    /// The predicted sense key must equal the gold key.
    SenseKey,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self::Keywords {
            rules: vec![
                KeywordRule::new("financial", "bank%1:17:"),
                KeywordRule::new("sloping", "bank%1:17:00"),
            ],
        }
    }
}

impl MatchPolicy {
    pub fn is_correct(&self, prediction: &Prediction, gold_key: &str) -> bool {
        match self {
            Self::Keywords { rules } => rules
                .iter()
                .any(|rule| rule.matches(&prediction.gloss, gold_key)),
            Self::SenseKey => prediction.sense_key.as_deref() == Some(gold_key),
        }
    }
}

/// Owned copy of the selected sense.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    pub word: String,
    pub definition: String,
    pub gloss: String,
    pub pos: Pos,
    pub score: usize,
    pub sense_key: Option<String>,
}

impl From<&ScoredSense<'_>> for Prediction {
    fn from(scored: &ScoredSense<'_>) -> Self {
        Self {
            word: scored.sense.word.to_string(),
            definition: scored.sense.definition.to_string(),
            gloss: scored.sense.gloss.to_string(),
            pos: scored.sense.pos,
            score: scored.score,
            sense_key: scored.sense.sense_key.as_ref().map(ToString::to_string),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    pub sentence: LabeledSentence,
    /// `None` when the lexicon had no sense for the target word.
    pub prediction: Option<Prediction>,
    pub correct: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EvaluationReport {
    pub total: usize,
    pub correct: usize,
    /// Sentences for which some sense was selected.
    pub predicted: usize,
    pub outcomes: Vec<Outcome>,
}

impl EvaluationReport {
    /// `None` for an empty evaluation.
    pub fn accuracy_percent(&self) -> Option<f64> {
        percent(self.correct, self.total)
    }

    pub fn coverage_percent(&self) -> Option<f64> {
        percent(self.predicted, self.total)
    }

    fn record(&mut self, outcome: Outcome) {
        self.total += 1;
        self.predicted += usize::from(outcome.prediction.is_some());
        self.correct += usize::from(outcome.correct);
        self.outcomes.push(outcome);
    }
}

fn percent(part: usize, whole: usize) -> Option<f64> {
    (whole > 0).then(|| 100.0 * part as f64 / whole as f64)
}

pub struct Evaluator<'a, 'l, L: ?Sized> {
    lesk: &'a SimpleLesk<'l, L>,
    policy: &'a MatchPolicy,
}

impl<'a, 'l, L: Lexicon + ?Sized> Evaluator<'a, 'l, L> {
    pub fn new(lesk: &'a SimpleLesk<'l, L>, policy: &'a MatchPolicy) -> Self {
        Self { lesk, policy }
    }

    pub fn judge(&self, sentence: &LabeledSentence) -> Outcome {
        let prediction = self
            .lesk
            .select(sentence.target_word(), sentence.sentence())
            .map(|scored| Prediction::from(&scored));
        let correct = prediction
            .as_ref()
            .is_some_and(|p| self.policy.is_correct(p, sentence.sense_key()));
        debug!(
            "{} / {}: correct={correct}",
            sentence.target_word(),
            sentence.sense_key()
        );
        Outcome {
            sentence: sentence.clone(),
            prediction,
            correct,
        }
    }

    pub fn evaluate<'s, I>(&self, sample: I) -> EvaluationReport
    where
        I: IntoIterator<Item = &'s LabeledSentence>,
    {
        let mut report = EvaluationReport::default();
        for sentence in sample {
            report.record(self.judge(sentence));
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lesk::SignatureMode;
    use crate::lexicon::MemoryLexicon;
    use crate::tokenize::Tokenizer;

    fn bank_lexicon() -> MemoryLexicon {
        let mut lexicon = MemoryLexicon::new();
        lexicon
            .insert("bank", Pos::Noun, "a financial institution that gives loans")
            .insert("bank", Pos::Noun, "sloping land beside water");
        lexicon
    }

    fn gold_sentences() -> Vec<LabeledSentence> {
        vec![
            LabeledSentence::new("The bank gave me a loan.", "bank", "bank%1:17:01::"),
            LabeledSentence::new("She asked the bank for loans.", "bank", "bank%1:17:01::"),
        ]
    }

    #[test]
    fn financial_prediction_scores_full_marks() {
        let lexicon = bank_lexicon();
        let lesk = SimpleLesk::new(&lexicon, Tokenizer::default(), SignatureMode::Definition);
        let policy = MatchPolicy::default();
        let sentences = gold_sentences();

        let report = Evaluator::new(&lesk, &policy).evaluate(&sentences);
        assert_eq!(report.total, 2);
        assert_eq!(report.correct, 2);
        assert_eq!(report.accuracy_percent(), Some(100.0));
        assert_eq!(report.coverage_percent(), Some(100.0));
    }

    #[test]
    fn sloping_prediction_scores_zero() {
        let mut lexicon = MemoryLexicon::new();
        lexicon.insert("bank", Pos::Noun, "sloping land beside water");
        let lesk = SimpleLesk::new(&lexicon, Tokenizer::default(), SignatureMode::Definition);
        let policy = MatchPolicy::default();
        let sentences = gold_sentences();

        let report = Evaluator::new(&lesk, &policy).evaluate(&sentences);
        assert_eq!(report.correct, 0);
        assert_eq!(report.accuracy_percent(), Some(0.0));
        assert_eq!(report.predicted, 2);
    }

    #[test]
    fn overlapping_rules_count_once() {
        let policy = MatchPolicy::Keywords {
            rules: vec![
                KeywordRule::new("financial", "bank%1:17:"),
                KeywordRule::new("institution", "bank%1:17:"),
            ],
        };
        let lexicon = bank_lexicon();
        let lesk = SimpleLesk::new(&lexicon, Tokenizer::default(), SignatureMode::Definition);
        let sentences = gold_sentences();
        let report = Evaluator::new(&lesk, &policy).evaluate(&sentences[..1]);
        assert_eq!((report.total, report.correct), (1, 1));
    }

    #[test]
    fn keywords_are_found_in_gloss_examples() {
        let mut lexicon = MemoryLexicon::new();
        lexicon
            .insert("bank", Pos::Noun, "an institution that gives loans")
            .with_example("a financial firm");
        let lesk = SimpleLesk::new(&lexicon, Tokenizer::default(), SignatureMode::Gloss);
        let policy = MatchPolicy::default();
        let sentences = gold_sentences();

        let report = Evaluator::new(&lesk, &policy).evaluate(&sentences);
        assert_eq!(report.correct, 2);
        let prediction = report.outcomes[0].prediction.as_ref().unwrap();
        assert_eq!(prediction.definition, "an institution that gives loans");
        assert_eq!(prediction.gloss, "an institution that gives loans; \"a financial firm\"");
    }

    #[test]
    fn missing_sense_is_incorrect() {
        let lexicon = MemoryLexicon::new();
        let lesk = SimpleLesk::new(&lexicon, Tokenizer::default(), SignatureMode::Definition);
        let policy = MatchPolicy::default();
        let sentences = gold_sentences();

        let report = Evaluator::new(&lesk, &policy).evaluate(&sentences);
        assert_eq!(report.correct, 0);
        assert_eq!(report.predicted, 0);
        assert_eq!(report.coverage_percent(), Some(0.0));
        assert!(report.outcomes.iter().all(|o| o.prediction.is_none() && !o.correct));
    }

    #[test]
    fn empty_sample_has_no_accuracy() {
        let lexicon = MemoryLexicon::new();
        let lesk = SimpleLesk::new(&lexicon, Tokenizer::default(), SignatureMode::Definition);
        let policy = MatchPolicy::default();
        let report = Evaluator::new(&lesk, &policy).evaluate(&[]);
        assert_eq!(report.total, 0);
        assert_eq!(report.accuracy_percent(), None);
    }

    #[test]
    fn sense_key_policy_compares_exactly() {
        let mut lexicon = MemoryLexicon::new();
        lexicon
            .insert("bank", Pos::Noun, "a financial institution")
            .with_key("bank%1:14:00::");
        let lesk = SimpleLesk::new(&lexicon, Tokenizer::default(), SignatureMode::Definition);
        let policy = MatchPolicy::SenseKey;
        let sentences = [
            LabeledSentence::new("the bank", "bank", "bank%1:14:00::"),
            LabeledSentence::new("the bank", "bank", "bank%1:17:01::"),
        ];
        let report = Evaluator::new(&lesk, &policy).evaluate(&sentences);
        assert!(report.outcomes[0].correct);
        assert!(!report.outcomes[1].correct);
    }
}
