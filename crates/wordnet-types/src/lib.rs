//! Vocabulary shared by the WordNet loader, the morphology helpers and the
//! Lesk disambiguator.
//!
//! Views such as [`Synset`] and [`IndexEntry`] borrow their text from the
//! dictionary buffers that produced them, so a lookup never copies glosses.
//! [`SenseKey`] is the one owned type: it is what annotated corpora such as
//! SemCor use to name a sense (`bank%1:14:00::`), and it has to outlive any
//! particular dictionary handle.
//!
//! ```rust
//! use wordnet_types::{Pos, SenseKey, SynsetType};
//!
//! let key = SenseKey::parse("bank%1:17:01::").unwrap();
//! assert_eq!(key.lemma, "bank");
//! assert_eq!(key.synset_type, SynsetType::Noun);
//! assert_eq!(key.lex_filenum, 17);
//! assert_eq!(key.to_string(), "bank%1:17:01::");
//! assert_eq!(Pos::from_char('v'), Some(Pos::Verb));
//! ```

use std::fmt;

/// Part of speech as written in WordNet file names and pointer blocks.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Pos {
    Noun,
    Verb,
    Adj,
    Adv,
}

impl Pos {
    pub const ALL: [Pos; 4] = [Pos::Noun, Pos::Verb, Pos::Adj, Pos::Adv];

    /// Parse a POS marker; adjective satellites (`s`) fold into [`Pos::Adj`].
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'n' => Some(Pos::Noun),
            'v' => Some(Pos::Verb),
            'a' | 's' => Some(Pos::Adj),
            'r' => Some(Pos::Adv),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Pos::Noun => 'n',
            Pos::Verb => 'v',
            Pos::Adj => 'a',
            Pos::Adv => 'r',
        }
    }

    /// Suffix of the `data.*`/`index.*` file holding this part of speech.
    pub fn file_suffix(self) -> &'static str {
        match self {
            Pos::Noun => "noun",
            Pos::Verb => "verb",
            Pos::Adj => "adj",
            Pos::Adv => "adv",
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_suffix())
    }
}

/// Byte offset of a synset inside its `data.*` file, qualified by POS.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct SynsetId {
    pub pos: Pos,
    pub offset: u32,
}

/// `ss_type` of a synset. Unlike [`Pos`], satellites stay distinct because
/// their sense keys are numbered differently.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SynsetType {
    Noun,
    Verb,
    Adj,
    Adv,
    AdjSatellite,
}

impl SynsetType {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'n' => Some(SynsetType::Noun),
            'v' => Some(SynsetType::Verb),
            'a' => Some(SynsetType::Adj),
            's' => Some(SynsetType::AdjSatellite),
            'r' => Some(SynsetType::Adv),
            _ => None,
        }
    }

    /// Numeric `ss_type` used inside sense keys.
    pub fn sense_number(self) -> u8 {
        match self {
            SynsetType::Noun => 1,
            SynsetType::Verb => 2,
            SynsetType::Adj => 3,
            SynsetType::Adv => 4,
            SynsetType::AdjSatellite => 5,
        }
    }

    pub fn from_sense_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(SynsetType::Noun),
            2 => Some(SynsetType::Verb),
            3 => Some(SynsetType::Adj),
            4 => Some(SynsetType::Adv),
            5 => Some(SynsetType::AdjSatellite),
            _ => None,
        }
    }

    pub fn pos(self) -> Pos {
        match self {
            SynsetType::Noun => Pos::Noun,
            SynsetType::Verb => Pos::Verb,
            SynsetType::Adj | SynsetType::AdjSatellite => Pos::Adj,
            SynsetType::Adv => Pos::Adv,
        }
    }
}

/// Relation named by a pointer symbol. Only the taxonomy links are told
/// apart; everything else is kept as raw text.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum PointerKind<'a> {
    Hypernym,
    InstanceHypernym,
    Hyponym,
    InstanceHyponym,
    Other(&'a str),
}

impl<'a> PointerKind<'a> {
    pub fn from_symbol(symbol: &'a str) -> Self {
        match symbol {
            "@" => PointerKind::Hypernym,
            "@i" => PointerKind::InstanceHypernym,
            "~" => PointerKind::Hyponym,
            "~i" => PointerKind::InstanceHyponym,
            other => PointerKind::Other(other),
        }
    }

    /// Hypernyms and hyponyms of either flavour.
    pub fn is_taxonomic(self) -> bool {
        !matches!(self, PointerKind::Other(_))
    }
}

/// A word of a synset together with its `lex_id`.
#[derive(Clone, Debug)]
pub struct Lemma<'a> {
    pub text: &'a str,
    pub lex_id: u8,
}

impl Lemma<'_> {
    /// Compare against a lookup key, ignoring case and the `_`/space spelling.
    pub fn matches(&self, key: &str) -> bool {
        let key = key.trim();
        self.text.len() == key.len()
            && self
                .text
                .bytes()
                .zip(key.bytes())
                .all(|(a, b)| fold_lemma_byte(a) == fold_lemma_byte(b))
    }
}

fn fold_lemma_byte(b: u8) -> u8 {
    if b == b' ' { b'_' } else { b.to_ascii_lowercase() }
}

#[derive(Clone, Debug)]
pub struct Pointer<'a> {
    pub kind: PointerKind<'a>,
    pub target: SynsetId,
}

/// Gloss split into its definition and quoted usage examples.
#[derive(Clone, Debug)]
pub struct Gloss<'a> {
    pub raw: &'a str,
    pub definition: &'a str,
    pub examples: Vec<&'a str>,
}

#[derive(Clone, Debug)]
pub struct Synset<'a> {
    pub id: SynsetId,
    pub lex_filenum: u8,
    pub synset_type: SynsetType,
    pub words: Vec<Lemma<'a>>,
    pub pointers: Vec<Pointer<'a>>,
    pub gloss: Gloss<'a>,
}

impl<'a> Synset<'a> {
    /// First word of the synset, used as its display name.
    pub fn head_word(&self) -> &'a str {
        self.words.first().map(|w| w.text).unwrap_or("")
    }

    /// Sense key of `lemma` within this synset.
    ///
    /// Satellite adjectives need the head of their cluster, which is not
    /// recorded on the synset itself, so they yield `None`.
    pub fn sense_key(&self, lemma: &str) -> Option<SenseKey> {
        if self.synset_type == SynsetType::AdjSatellite {
            return None;
        }
        let word = self.words.iter().find(|w| w.matches(lemma))?;
        Some(SenseKey {
            lemma: word.text.to_ascii_lowercase(),
            synset_type: self.synset_type,
            lex_filenum: self.lex_filenum,
            lex_id: word.lex_id,
            head: None,
        })
    }
}

/// Line of an `index.*` file. Offsets are listed in sense-number order.
#[derive(Clone, Debug)]
pub struct IndexEntry<'a> {
    pub lemma: &'a str,
    pub pos: Pos,
    pub sense_cnt: u32,
    pub tagsense_cnt: u32,
    pub synset_offsets: &'a [u32],
}

/// `lemma%ss_type:lex_filenum:lex_id:head_word:head_id`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct SenseKey {
    pub lemma: String,
    pub synset_type: SynsetType,
    pub lex_filenum: u8,
    pub lex_id: u8,
    /// Cluster head (word, lex_id) for satellite adjectives.
    pub head: Option<(String, u8)>,
}

impl SenseKey {
    /// Parse a sense key; the lemma is lowercased, trailing whitespace ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        let (lemma, lex_sense) = raw.trim().split_once('%')?;
        if lemma.is_empty() {
            return None;
        }
        let mut fields = lex_sense.split(':');
        let synset_type = fields
            .next()?
            .parse::<u8>()
            .ok()
            .and_then(SynsetType::from_sense_number)?;
        let lex_filenum: u8 = fields.next()?.parse().ok()?;
        let lex_id: u8 = fields.next()?.parse().ok()?;
        let head_word = fields.next().unwrap_or("");
        let head_id = fields.next().unwrap_or("");
        if fields.next().is_some() {
            return None;
        }
        let head = if head_word.is_empty() {
            None
        } else {
            Some((head_word.to_ascii_lowercase(), head_id.parse().ok()?))
        };
        Some(Self {
            lemma: lemma.to_ascii_lowercase(),
            synset_type,
            lex_filenum,
            lex_id,
            head,
        })
    }
}

impl fmt::Display for SenseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}%{}:{:02}:{:02}:",
            self.lemma,
            self.synset_type.sense_number(),
            self.lex_filenum,
            self.lex_id
        )?;
        match &self.head {
            Some((word, id)) => write!(f, "{word}:{id:02}"),
            None => f.write_str(":"),
        }
    }
}
