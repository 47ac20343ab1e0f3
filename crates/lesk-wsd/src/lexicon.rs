//! Sense inventories the disambiguator can draw candidates from.
//!
//! [`Lexicon`] is the only thing [`SimpleLesk`](crate::lesk::SimpleLesk)
//! knows about a dictionary. [`WordNetLexicon`] answers from a loaded WordNet
//! directory; [`MemoryLexicon`] holds a hand-written list of senses.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};
use wordnet_db::{LoadMode, WordNet};
use wordnet_morphy::Morphy;
use wordnet_types::{Pos, SenseKey, SynsetId};

/// One candidate meaning of a word, borrowed from the lexicon that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct SenseCandidate<'a> {
    /// Representative word of the sense (first synonym in WordNet).
    pub word: &'a str,
    /// Definition part of the gloss, before any usage examples.
    pub definition: &'a str,
    /// The whole gloss: definition followed by its quoted examples.
    pub gloss: &'a str,
    pub pos: Pos,
    pub sense_key: Option<SenseKey>,
    pub examples: Vec<&'a str>,
    /// Where the sense lives in WordNet, when it came from there.
    pub synset: Option<SynsetId>,
}

/// Ordered sense lookup for a word and part of speech.
pub trait Lexicon {
    /// Candidate senses in the lexicon's own order; empty when the word is unknown.
    fn senses(&self, word: &str, pos: Pos) -> Vec<SenseCandidate<'_>>;

    /// Definitions of senses directly above or below `sense` in the taxonomy.
    fn related_definitions(&self, _sense: &SenseCandidate<'_>) -> Vec<&str> {
        Vec::new()
    }
}

impl<L: Lexicon + ?Sized> Lexicon for &L {
    fn senses(&self, word: &str, pos: Pos) -> Vec<SenseCandidate<'_>> {
        (**self).senses(word, pos)
    }

    fn related_definitions(&self, sense: &SenseCandidate<'_>) -> Vec<&str> {
        (**self).related_definitions(sense)
    }
}

/// WordNet-backed lexicon. Inflected targets are reduced to their base forms
/// first when a [`Morphy`] is attached.
pub struct WordNetLexicon {
    wordnet: WordNet,
    morphy: Option<Morphy>,
}

impl WordNetLexicon {
    pub fn new(wordnet: WordNet, morphy: Option<Morphy>) -> Self {
        Self { wordnet, morphy }
    }

    /// Load the dictionary in `dict_dir`, plus its exception lists when
    /// `lemmatize` is set.
    pub fn open(dict_dir: impl AsRef<Path>, mode: LoadMode, lemmatize: bool) -> Result<Self> {
        let dir = dict_dir.as_ref();
        let wordnet = WordNet::load_with_mode(dir, mode)
            .with_context(|| format!("loading WordNet from {}", dir.display()))?;
        let morphy = if lemmatize {
            Some(
                Morphy::load(dir)
                    .with_context(|| format!("loading exception lists from {}", dir.display()))?,
            )
        } else {
            None
        };
        info!(
            "wordnet ready: {} index entries, {} synsets",
            wordnet.index_count(),
            wordnet.synset_count()
        );
        Ok(Self::new(wordnet, morphy))
    }

    pub fn wordnet(&self) -> &WordNet {
        &self.wordnet
    }

    fn lemmas(&self, word: &str, pos: Pos) -> Vec<String> {
        match &self.morphy {
            Some(morphy) => {
                morphy.base_forms(pos, word, |p, lemma| self.wordnet.lemma_exists(p, lemma))
            }
            None => vec![word.to_string()],
        }
    }
}

impl Lexicon for WordNetLexicon {
    fn senses(&self, word: &str, pos: Pos) -> Vec<SenseCandidate<'_>> {
        let mut seen = HashSet::new();
        let mut senses = Vec::new();
        for lemma in self.lemmas(word, pos) {
            for id in self.wordnet.synsets_for_lemma(pos, &lemma) {
                if !seen.insert(id) {
                    continue;
                }
                let Some(synset) = self.wordnet.get_synset(id) else {
                    debug!("{lemma} ({pos}): index points at missing synset {}", id.offset);
                    continue;
                };
                senses.push(SenseCandidate {
                    word: synset.head_word(),
                    definition: synset.gloss.definition,
                    gloss: synset.gloss.raw,
                    pos,
                    sense_key: synset.sense_key(&lemma),
                    examples: synset.gloss.examples,
                    synset: Some(id),
                });
            }
        }
        senses
    }

    fn related_definitions(&self, sense: &SenseCandidate<'_>) -> Vec<&str> {
        let Some(id) = sense.synset else {
            return Vec::new();
        };
        self.wordnet
            .related(id, |kind| kind.is_taxonomic())
            .into_iter()
            .map(|synset| synset.gloss.definition)
            .collect()
    }
}

#[derive(Clone, Debug)]
struct MemorySense {
    lemma: String,
    pos: Pos,
    definition: String,
    gloss: String,
    sense_key: Option<SenseKey>,
    examples: Vec<String>,
}

/// Senses kept in a plain list, returned in insertion order.
#[derive(Clone, Debug, Default)]
pub struct MemoryLexicon {
    senses: Vec<MemorySense>,
}

impl MemoryLexicon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, lemma: &str, pos: Pos, definition: &str) -> &mut Self {
        self.senses.push(MemorySense {
            lemma: lemma.trim().to_lowercase(),
            pos,
            definition: definition.to_string(),
            gloss: definition.to_string(),
            sense_key: None,
            examples: Vec::new(),
        });
        self
    }

    /// Attach a sense key to the most recently inserted sense. Unparsable
    /// keys are ignored.
    pub fn with_key(&mut self, raw: &str) -> &mut Self {
        if let Some(last) = self.senses.last_mut() {
            last.sense_key = SenseKey::parse(raw);
        }
        self
    }

    /// Add a usage example to the most recent sense; it is appended to the
    /// gloss WordNet-style, as `; "example"`.
    pub fn with_example(&mut self, example: &str) -> &mut Self {
        if let Some(last) = self.senses.last_mut() {
            last.examples.push(example.to_string());
            last.gloss.push_str(&format!("; \"{example}\""));
        }
        self
    }

    pub fn len(&self) -> usize {
        self.senses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senses.is_empty()
    }
}

impl Lexicon for MemoryLexicon {
    fn senses(&self, word: &str, pos: Pos) -> Vec<SenseCandidate<'_>> {
        let key = word.trim().to_lowercase();
        self.senses
            .iter()
            .filter(|s| s.pos == pos && s.lemma == key)
            .map(|s| SenseCandidate {
                word: &s.lemma,
                definition: &s.definition,
                gloss: &s.gloss,
                pos,
                sense_key: s.sense_key.clone(),
                examples: s.examples.iter().map(String::as_str).collect(),
                synset: None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_lexicon_keeps_insertion_order_per_pos() {
        let mut lexicon = MemoryLexicon::new();
        lexicon
            .insert("bank", Pos::Noun, "sloping land")
            .insert("bank", Pos::Verb, "do business with a bank")
            .insert("Bank", Pos::Noun, "a financial institution")
            .with_key("bank%1:14:00::");

        let nouns = lexicon.senses("BANK", Pos::Noun);
        assert_eq!(nouns.len(), 2);
        assert_eq!(nouns[0].definition, "sloping land");
        assert_eq!(nouns[1].definition, "a financial institution");
        assert_eq!(
            nouns[1].sense_key.as_ref().map(ToString::to_string).as_deref(),
            Some("bank%1:14:00::")
        );
        assert_eq!(lexicon.senses("bank", Pos::Verb).len(), 1);
        assert!(lexicon.senses("bank", Pos::Adj).is_empty());
        assert!(lexicon.senses("river", Pos::Noun).is_empty());
    }

    #[test]
    fn memory_gloss_carries_examples() {
        let mut lexicon = MemoryLexicon::new();
        lexicon
            .insert("bank", Pos::Noun, "sloping land")
            .with_example("they pulled the canoe up on the bank");
        let sense = lexicon.senses("bank", Pos::Noun).remove(0);
        assert_eq!(sense.definition, "sloping land");
        assert_eq!(sense.gloss, "sloping land; \"they pulled the canoe up on the bank\"");
        assert_eq!(sense.examples, vec!["they pulled the canoe up on the bank"]);
    }

    #[test]
    fn memory_lexicon_has_no_taxonomy() {
        let mut lexicon = MemoryLexicon::new();
        lexicon.insert("bank", Pos::Noun, "sloping land");
        let sense = lexicon.senses("bank", Pos::Noun).remove(0);
        assert!(lexicon.related_definitions(&sense).is_empty());
    }
}
