//! Simple Lesk: pick the sense whose gloss shares the most words with the
//! context.

use std::borrow::Cow;

use serde::Deserialize;
use tracing::debug;
use wordnet_types::Pos;

use crate::lexicon::{Lexicon, SenseCandidate};
use crate::overlap::overlap_tokens;
use crate::tokenize::Tokenizer;

/// Parts of speech searched, in order. Ties never move the choice to a later one.
pub const LESK_POS: [Pos; 2] = [Pos::Noun, Pos::Verb];

/// Text a candidate is scored by.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureMode {
    /// The whole gloss, quoted usage examples included.
    #[default]
    Gloss,
    /// The definition alone, examples stripped.
    Definition,
    /// Definition, usage examples and the definitions of hypernyms/hyponyms.
    Extended,
}

/// The winning candidate and its overlap score.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredSense<'a> {
    pub sense: SenseCandidate<'a>,
    pub score: usize,
}

pub struct SimpleLesk<'l, L: ?Sized> {
    lexicon: &'l L,
    tokenizer: Tokenizer,
    signature: SignatureMode,
}

impl<'l, L: Lexicon + ?Sized> SimpleLesk<'l, L> {
    pub fn new(lexicon: &'l L, tokenizer: Tokenizer, signature: SignatureMode) -> Self {
        Self {
            lexicon,
            tokenizer,
            signature,
        }
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Best sense of `word` in `context`, or `None` when the lexicon has no
    /// noun or verb senses for it.
    ///
    /// A candidate replaces the current best only with a strictly higher
    /// score, so the first sense seen wins ties and a zero-score sense is
    /// still chosen when nothing scores better.
    pub fn select(&self, word: &str, context: &str) -> Option<ScoredSense<'l>> {
        let lexicon: &'l L = self.lexicon;
        let context_tokens = self.tokenizer.tokenize(context);
        let mut best: Option<ScoredSense<'l>> = None;

        for pos in LESK_POS {
            for sense in lexicon.senses(word, pos) {
                let signature = self.signature_text(&sense);
                let score = overlap_tokens(&self.tokenizer.tokenize(&signature), &context_tokens);
                debug!(
                    "{word} ({pos}) {:?}: overlap {score}",
                    sense.definition
                );
                if best.as_ref().is_none_or(|b| score > b.score) {
                    best = Some(ScoredSense { sense, score });
                }
            }
        }

        best
    }

    fn signature_text<'s>(&self, sense: &SenseCandidate<'s>) -> Cow<'s, str> {
        match self.signature {
            SignatureMode::Gloss => Cow::Borrowed(sense.gloss),
            SignatureMode::Definition => Cow::Borrowed(sense.definition),
            SignatureMode::Extended => {
                let mut parts: Vec<&str> = vec![sense.definition];
                parts.extend(sense.examples.iter().copied());
                parts.extend(self.lexicon.related_definitions(sense));
                Cow::Owned(parts.join(" "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::MemoryLexicon;

    fn lesk(lexicon: &MemoryLexicon) -> SimpleLesk<'_, MemoryLexicon> {
        SimpleLesk::new(lexicon, Tokenizer::default(), SignatureMode::Definition)
    }

    #[test]
    fn picks_highest_overlap() {
        let mut lexicon = MemoryLexicon::new();
        lexicon
            .insert("bank", Pos::Noun, "sloping land beside a body of water")
            .insert(
                "bank",
                Pos::Noun,
                "a financial institution that accepts deposits and lends money",
            );

        let best = lesk(&lexicon)
            .select("bank", "The bank lends money to people with deposits.")
            .expect("sense found");
        assert!(best.sense.definition.contains("financial"));
        assert_eq!(best.score, 3);
    }

    #[test]
    fn first_candidate_wins_ties() {
        let mut lexicon = MemoryLexicon::new();
        lexicon
            .insert("bank", Pos::Noun, "first river sense")
            .insert("bank", Pos::Noun, "second river sense");
        let best = lesk(&lexicon).select("bank", "river").unwrap();
        assert_eq!(best.sense.definition, "first river sense");
        assert_eq!(best.score, 1);
    }

    #[test]
    fn nouns_win_ties_against_verbs() {
        let mut lexicon = MemoryLexicon::new();
        lexicon
            .insert("bank", Pos::Verb, "keep money at a bank")
            .insert("bank", Pos::Noun, "money institution");
        let best = lesk(&lexicon).select("bank", "money").unwrap();
        assert_eq!(best.sense.pos, Pos::Noun);
    }

    #[test]
    fn later_verb_with_higher_score_wins() {
        let mut lexicon = MemoryLexicon::new();
        lexicon
            .insert("bank", Pos::Noun, "sloping land")
            .insert("bank", Pos::Verb, "tilt an aircraft while turning");
        let best = lesk(&lexicon).select("bank", "the pilot had to tilt while turning").unwrap();
        assert_eq!(best.sense.pos, Pos::Verb);
        assert_eq!(best.score, 3);
    }

    #[test]
    fn zero_overlap_still_selects_first_sense() {
        let mut lexicon = MemoryLexicon::new();
        lexicon
            .insert("bank", Pos::Noun, "sloping land")
            .insert("bank", Pos::Verb, "tilt an aircraft");
        let best = lesk(&lexicon).select("bank", "nothing in common").unwrap();
        assert_eq!(best.sense.definition, "sloping land");
        assert_eq!(best.score, 0);
    }

    #[test]
    fn unknown_word_finds_nothing() {
        let mut lexicon = MemoryLexicon::new();
        lexicon.insert("bank", Pos::Adj, "only an adjective");
        assert!(lesk(&lexicon).select("bank", "bank").is_none());
        assert!(lesk(&MemoryLexicon::new()).select("", "").is_none());
    }

    #[test]
    fn gloss_signature_scores_examples_too() {
        let mut lexicon = MemoryLexicon::new();
        lexicon
            .insert("bank", Pos::Noun, "sloping land")
            .with_example("he sat on the bank of the river")
            .insert("bank", Pos::Verb, "do business with a bank or keep an account at a bank");

        let context = "I sat on the bank";
        let by_definition = lesk(&lexicon).select("bank", context).unwrap();
        assert_eq!(by_definition.sense.pos, Pos::Verb);
        assert_eq!(by_definition.score, 2);

        let by_gloss = SimpleLesk::new(&lexicon, Tokenizer::default(), SignatureMode::default())
            .select("bank", context)
            .unwrap();
        assert_eq!(by_gloss.sense.pos, Pos::Noun);
        assert_eq!(by_gloss.score, 5);
    }

    #[test]
    fn extended_signature_uses_examples() {
        let mut lexicon = MemoryLexicon::new();
        lexicon
            .insert("bank", Pos::Noun, "sloping land")
            .insert("bank", Pos::Noun, "a financial institution")
            .with_example("he cashed a check at the bank");

        let context = "I cashed my check";
        let plain = lesk(&lexicon).select("bank", context).unwrap();
        assert_eq!(plain.sense.definition, "sloping land");

        let extended = SimpleLesk::new(&lexicon, Tokenizer::default(), SignatureMode::Extended)
            .select("bank", context)
            .unwrap();
        assert_eq!(extended.sense.definition, "a financial institution");
        assert_eq!(extended.score, 2);
    }
}
