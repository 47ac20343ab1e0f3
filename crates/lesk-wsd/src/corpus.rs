//! Sense-annotated sentences and the SemCor tagfile reader that produces them.
//!
//! SemCor's `brown*/tagfiles` are SGML-ish: one tag per line, attribute
//! values sometimes quoted and sometimes bare. Each sentence sits between
//! `<s ...>` and `</s>`; words are `<wf ...>surface</wf>` and punctuation is
//! `<punc>,</punc>`. A word with `cmd=done`, a `lemma` and a sense annotation
//! becomes one [`LabeledSentence`] carrying the whole sentence as context.

use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const DEFAULT_MAX_SENTENCE_LEN: usize = 1023;
pub const DEFAULT_MAX_FIELD_LEN: usize = 49;

const BUILTIN_SENTENCE: &str = "The bank gave me a loan.";
const BUILTIN_TARGET: &str = "bank";
const BUILTIN_SENSE_KEY: &str = "bank%1:17:01::";

/// Character capacities of the text fields of a [`LabeledSentence`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldLimits {
    pub max_sentence_len: usize,
    /// Applies to both the target word and the sense key.
    pub max_field_len: usize,
}

impl Default for FieldLimits {
    fn default() -> Self {
        Self {
            max_sentence_len: DEFAULT_MAX_SENTENCE_LEN,
            max_field_len: DEFAULT_MAX_FIELD_LEN,
        }
    }
}

/// A sentence, the word to disambiguate in it, and the annotated sense.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LabeledSentence {
    sentence: String,
    target_word: String,
    sense_key: String,
}

impl LabeledSentence {
    pub fn new(sentence: &str, target_word: &str, sense_key: &str) -> Self {
        Self::bounded(sentence, target_word, sense_key, &FieldLimits::default())
    }

    /// Over-long fields are cut at their capacity.
    pub fn bounded(
        sentence: &str,
        target_word: &str,
        sense_key: &str,
        limits: &FieldLimits,
    ) -> Self {
        Self {
            sentence: truncate_chars(sentence, limits.max_sentence_len).to_string(),
            target_word: truncate_chars(target_word, limits.max_field_len).to_string(),
            sense_key: truncate_chars(sense_key, limits.max_field_len).to_string(),
        }
    }

    /// Example used when no corpus sentence could be loaded.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_SENTENCE, BUILTIN_TARGET, BUILTIN_SENSE_KEY)
    }

    pub fn sentence(&self) -> &str {
        &self.sentence
    }

    pub fn target_word(&self) -> &str {
        &self.target_word
    }

    pub fn sense_key(&self) -> &str {
        &self.sense_key
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Fixed-capacity pool; records offered after it fills up are dropped.
#[derive(Clone, Debug)]
pub struct SentencePool {
    sentences: Vec<LabeledSentence>,
    capacity: usize,
    dropped: usize,
}

impl SentencePool {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sentences: Vec::with_capacity(capacity.min(4096)),
            capacity,
            dropped: 0,
        }
    }

    /// Returns `false` and drops the record when the pool is full.
    pub fn push(&mut self, sentence: LabeledSentence) -> bool {
        if self.is_full() {
            self.dropped += 1;
            return false;
        }
        self.sentences.push(sentence);
        true
    }

    pub fn is_full(&self) -> bool {
        self.sentences.len() >= self.capacity
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records refused because the pool was full.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn as_slice(&self) -> &[LabeledSentence] {
        &self.sentences
    }

    /// Insert [`LabeledSentence::builtin`] into an empty pool, regardless of
    /// capacity. Returns whether the fallback was used.
    pub fn ensure_nonempty(&mut self) -> bool {
        if !self.sentences.is_empty() {
            return false;
        }
        warn!("no corpus sentences found, using the built-in example");
        self.sentences.push(LabeledSentence::builtin());
        true
    }
}

impl Extend<LabeledSentence> for SentencePool {
    fn extend<T: IntoIterator<Item = LabeledSentence>>(&mut self, iter: T) {
        for sentence in iter {
            self.push(sentence);
        }
    }
}

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read corpus directory {}: {source}", path.display())]
    ReadDir { path: PathBuf, source: io::Error },
    #[error("failed to read corpus file {}: {source}", path.display())]
    ReadFile { path: PathBuf, source: io::Error },
}

/// Knobs for [`load_pool`].
#[derive(Clone, Copy, Debug)]
pub struct CorpusOptions {
    pub max_files_scanned: usize,
    pub pool_capacity: usize,
    pub limits: FieldLimits,
}

impl Default for CorpusOptions {
    fn default() -> Self {
        Self {
            max_files_scanned: 100,
            pool_capacity: 500,
            limits: FieldLimits::default(),
        }
    }
}

/// Fill a pool from the tagfiles in `dir`, visiting files in random order.
///
/// Unreadable directories and files are logged and skipped, so the result
/// may be empty; see [`SentencePool::ensure_nonempty`].
pub fn load_pool<R: Rng + ?Sized>(dir: &Path, options: &CorpusOptions, rng: &mut R) -> SentencePool {
    let mut pool = SentencePool::with_capacity(options.pool_capacity);
    info!("loading SemCor from {}", dir.display());

    let mut files = match list_files(dir, options.max_files_scanned) {
        Ok(files) => files,
        Err(err) => {
            warn!("{err}");
            return pool;
        }
    };
    if files.is_empty() {
        warn!("no files found in {}", dir.display());
        return pool;
    }
    files.shuffle(rng);

    for path in &files {
        if pool.is_full() {
            break;
        }
        match read_tagfile(path, &options.limits) {
            Ok(sentences) => {
                debug!("{}: {} annotated words", path.display(), sentences.len());
                pool.extend(sentences);
            }
            Err(err) => warn!("{err}"),
        }
    }

    info!(
        "loaded {} labeled sentences ({} dropped at capacity {})",
        pool.len(),
        pool.dropped(),
        pool.capacity()
    );
    pool
}

/// Regular files directly inside `dir`, sorted by name, at most `max_files`.
fn list_files(dir: &Path, max_files: usize) -> Result<Vec<PathBuf>, CorpusError> {
    let read_dir_err = |source| CorpusError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir_err)? {
        let entry = entry.map_err(read_dir_err)?;
        if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            files.push(entry.path());
        }
    }
    files.sort();
    files.truncate(max_files);
    Ok(files)
}

pub fn read_tagfile(path: &Path, limits: &FieldLimits) -> Result<Vec<LabeledSentence>, CorpusError> {
    let bytes = fs::read(path).map_err(|source| CorpusError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_tagfile(&String::from_utf8_lossy(&bytes), limits))
}

/// Parse tagfile text. Annotated words outside a complete `<s>` element and
/// tags that never close are ignored.
pub fn parse_tagfile(text: &str, limits: &FieldLimits) -> Vec<LabeledSentence> {
    let mut out = Vec::new();
    let mut sentence = SentenceBuilder::default();
    let mut open: Option<OpenWord<'_>> = None;

    for item in Markup::new(text) {
        match item {
            Item::Open { name: "s", .. } => sentence = SentenceBuilder::started(),
            Item::Open { name, attrs } if name == "wf" || name == "punc" => {
                open = Some(OpenWord {
                    attrs,
                    text: String::new(),
                });
            }
            Item::Text(fragment) => {
                if let Some(word) = open.as_mut() {
                    word.text.push_str(fragment);
                }
            }
            Item::Close("wf") => {
                if let Some(word) = open.take() {
                    sentence.word(&word);
                }
            }
            Item::Close("punc") => {
                if let Some(word) = open.take() {
                    sentence.punctuation(&unescape(word.text.trim()));
                }
            }
            Item::Close("s") => {
                out.extend(sentence.finish(limits));
                sentence = SentenceBuilder::default();
                open = None;
            }
            _ => {}
        }
    }
    out
}

struct OpenWord<'a> {
    attrs: &'a str,
    text: String,
}

#[derive(Default)]
struct SentenceBuilder {
    started: bool,
    text: String,
    annotated: Vec<(String, String)>,
}

impl SentenceBuilder {
    fn started() -> Self {
        Self {
            started: true,
            ..Self::default()
        }
    }

    fn word(&mut self, word: &OpenWord<'_>) {
        let surface = unescape(word.text.trim()).replace('_', " ");
        if !surface.is_empty() {
            if !self.text.is_empty() {
                self.text.push(' ');
            }
            self.text.push_str(&surface);
        }

        if attribute(word.attrs, "cmd") != Some("done") {
            return;
        }
        let Some(lemma) = attribute(word.attrs, "lemma").filter(|l| !l.is_empty()) else {
            return;
        };
        let lemma = unescape(lemma).into_owned();
        let key = match (attribute(word.attrs, "lexsn"), attribute(word.attrs, "wnsn")) {
            (Some(lexsn), _) if !lexsn.is_empty() => format!("{lemma}%{lexsn}"),
            (_, Some(wnsn)) if !wnsn.is_empty() => wnsn.to_string(),
            _ => return,
        };
        self.annotated.push((lemma, key));
    }

    fn punctuation(&mut self, mark: &str) {
        if mark.is_empty() {
            return;
        }
        let attaches_left = matches!(mark, "." | "," | ";" | ":" | "!" | "?" | ")" | "'");
        if !self.text.is_empty() && !attaches_left {
            self.text.push(' ');
        }
        self.text.push_str(mark);
    }

    fn finish(self, limits: &FieldLimits) -> Vec<LabeledSentence> {
        if !self.started {
            return Vec::new();
        }
        self.annotated
            .iter()
            .map(|(lemma, key)| LabeledSentence::bounded(&self.text, lemma, key, limits))
            .collect()
    }
}

enum Item<'a> {
    Open { name: &'a str, attrs: &'a str },
    Close(&'a str),
    Text(&'a str),
}

/// Flat scanner over `<tag attrs>`, `</tag>` and the text between them.
struct Markup<'a> {
    rest: &'a str,
}

impl<'a> Markup<'a> {
    fn new(text: &'a str) -> Self {
        Self { rest: text }
    }
}

impl<'a> Iterator for Markup<'a> {
    type Item = Item<'a>;

    fn next(&mut self) -> Option<Item<'a>> {
        if self.rest.is_empty() {
            return None;
        }
        if let Some(tag_body) = self.rest.strip_prefix('<') {
            let Some(end) = tag_body.find('>') else {
                self.rest = "";
                return None;
            };
            let tag = tag_body[..end].trim();
            self.rest = &tag_body[end + 1..];
            if let Some(name) = tag.strip_prefix('/') {
                return Some(Item::Close(name.trim()));
            }
            let tag = tag.trim_end_matches('/');
            let (name, attrs) = tag.split_once(char::is_whitespace).unwrap_or((tag, ""));
            return Some(Item::Open { name, attrs });
        }
        let end = self.rest.find('<').unwrap_or(self.rest.len());
        let (text, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(Item::Text(text))
    }
}

/// Value of `name` in an attribute list such as `cmd=done lemma="bank"`.
fn attribute<'a>(attrs: &'a str, name: &str) -> Option<&'a str> {
    let mut rest = attrs.trim_start();
    while !rest.is_empty() {
        let key_end = rest
            .find(|c: char| c == '=' || c.is_whitespace())
            .unwrap_or(rest.len());
        let key = &rest[..key_end];
        rest = rest[key_end..].trim_start();

        let value = match rest.strip_prefix('=') {
            Some(after) => {
                let after = after.trim_start();
                if let Some(quoted) = after.strip_prefix('"') {
                    let close = quoted.find('"').unwrap_or(quoted.len());
                    rest = quoted.get(close + 1..).unwrap_or("");
                    &quoted[..close]
                } else {
                    let end = after.find(char::is_whitespace).unwrap_or(after.len());
                    rest = &after[end..];
                    &after[..end]
                }
            }
            None => "",
        };
        if key == name {
            return Some(value);
        }
        rest = rest.trim_start();
    }
    None
}

fn unescape(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&apos;", "'")
            .replace("&amp;", "&"),
    )
}
