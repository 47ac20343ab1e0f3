//! Read-only access to a WordNet dictionary directory.
//!
//! The loader understands the classic `index.*`/`data.*` layout shipped with
//! Princeton WordNet and Open English WordNet. Each part of speech keeps its
//! two files in a [`LoadMode`]-selected buffer; parsed records only store byte
//! spans into those buffers, and every accessor hands out borrowed views from
//! `wordnet-types`.
//!
//! The lookups are the ones a gloss-overlap disambiguator needs: senses of a
//! lemma in sense-number order, the synset behind each sense, and the synsets
//! one taxonomy link away.
//!
//! # Example
//! ```no_run
//! use wordnet_db::{LoadMode, WordNet};
//! use wordnet_types::Pos;
//!
//! # fn main() -> anyhow::Result<()> {
//! let wn = WordNet::load_with_mode("/usr/share/wordnet", LoadMode::Mmap)?;
//! for id in wn.synsets_for_lemma(Pos::Noun, "bank") {
//!     let syn = wn.get_synset(id).expect("indexed synset is loaded");
//!     println!("{} - {}", syn.head_word(), syn.gloss.definition);
//! }
//! # Ok(()) }
//! ```
//!
//! For a runnable demo, see `cargo run -p wordnet-db --example stats -- <dict>`.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use memmap2::Mmap;
use tracing::debug;
use wordnet_types::{
    Gloss, IndexEntry, Lemma, Pointer, PointerKind, Pos, Synset, SynsetId, SynsetType,
};

/// Strategy for bringing dictionary files into memory.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map each file.
    Mmap,
    /// Read each file into a heap buffer.
    Owned,
}

enum Buffer {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Buffer {
    fn open(path: &Path, mode: LoadMode) -> Result<Self> {
        let mut file = File::open(path).with_context(|| format!("open {}", path.display()))?;
        match mode {
            LoadMode::Mmap => {
                // SAFETY: dictionary files are treated as immutable for the life of the map.
                let map = unsafe { Mmap::map(&file) }
                    .with_context(|| format!("mmap {}", path.display()))?;
                Ok(Buffer::Mmap(map))
            }
            LoadMode::Owned => {
                let mut bytes = Vec::new();
                file.read_to_end(&mut bytes)
                    .with_context(|| format!("read {}", path.display()))?;
                Ok(Buffer::Owned(bytes))
            }
        }
    }

    fn bytes(&self) -> &[u8] {
        match self {
            Buffer::Mmap(m) => m.as_ref(),
            Buffer::Owned(v) => v.as_slice(),
        }
    }

    fn text(&self, span: Span) -> &str {
        self.bytes()
            .get(span.start..span.start + span.len)
            .and_then(|b| std::str::from_utf8(b).ok())
            .unwrap_or("")
    }
}

/// Byte range of a text field inside one buffer.
#[derive(Clone, Copy, Debug)]
struct Span {
    start: usize,
    len: usize,
}

impl Span {
    fn of(root: &[u8], text: &str) -> Self {
        Span {
            start: text.as_ptr() as usize - root.as_ptr() as usize,
            len: text.len(),
        }
    }
}

struct IndexRecord {
    lemma: Span,
    sense_cnt: u32,
    tagsense_cnt: u32,
    offsets: Vec<u32>,
}

struct WordRecord {
    text: Span,
    lex_id: u8,
}

struct PointerRecord {
    symbol: Span,
    target: SynsetId,
}

struct GlossRecord {
    raw: Span,
    definition: Span,
    examples: Vec<Span>,
}

struct SynsetRecord {
    lex_filenum: u8,
    synset_type: SynsetType,
    words: Vec<WordRecord>,
    pointers: Vec<PointerRecord>,
    gloss: GlossRecord,
}

/// The `index.<pos>` and `data.<pos>` pair for one part of speech.
struct PosFiles {
    pos: Pos,
    index_file: Buffer,
    data_file: Buffer,
    index: HashMap<String, IndexRecord>,
    synsets: HashMap<u32, SynsetRecord>,
}

impl PosFiles {
    fn load(dir: &Path, pos: Pos, mode: LoadMode) -> Result<Self> {
        let index_path = dir.join(format!("index.{}", pos.file_suffix()));
        let data_path = dir.join(format!("data.{}", pos.file_suffix()));
        for path in [&index_path, &data_path] {
            if !path.exists() {
                bail!("missing required WordNet file: {}", path.display());
            }
        }

        let index_file = Buffer::open(&index_path, mode)?;
        let data_file = Buffer::open(&data_path, mode)?;
        let index = parse_index(index_file.bytes(), pos)
            .with_context(|| format!("parse {}", index_path.display()))?;
        let synsets = parse_data(data_file.bytes(), pos)
            .with_context(|| format!("parse {}", data_path.display()))?;
        debug!(
            "{pos}: {} index entries, {} synsets",
            index.len(),
            synsets.len()
        );

        Ok(Self {
            pos,
            index_file,
            data_file,
            index,
            synsets,
        })
    }

    fn synset_view<'a>(&'a self, offset: u32, record: &'a SynsetRecord) -> Synset<'a> {
        let data = &self.data_file;
        Synset {
            id: SynsetId {
                pos: self.pos,
                offset,
            },
            lex_filenum: record.lex_filenum,
            synset_type: record.synset_type,
            words: record
                .words
                .iter()
                .map(|w| Lemma {
                    text: data.text(w.text),
                    lex_id: w.lex_id,
                })
                .collect(),
            pointers: record
                .pointers
                .iter()
                .map(|p| Pointer {
                    kind: PointerKind::from_symbol(data.text(p.symbol)),
                    target: p.target,
                })
                .collect(),
            gloss: Gloss {
                raw: data.text(record.gloss.raw),
                definition: data.text(record.gloss.definition),
                examples: record
                    .gloss
                    .examples
                    .iter()
                    .map(|s| data.text(*s))
                    .collect(),
            },
        }
    }
}

/// A loaded dictionary. Immutable once built, so one handle can serve every
/// lookup for the life of the process.
pub struct WordNet {
    parts: [PosFiles; 4],
}

impl WordNet {
    /// Load from a directory holding `data.*` and `index.*`, memory-mapped.
    pub fn load(dict_dir: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_mode(dict_dir, LoadMode::Mmap)
    }

    pub fn load_with_mode(dict_dir: impl AsRef<Path>, mode: LoadMode) -> Result<Self> {
        let dir = dict_dir.as_ref();
        let parts = [
            PosFiles::load(dir, Pos::Noun, mode)?,
            PosFiles::load(dir, Pos::Verb, mode)?,
            PosFiles::load(dir, Pos::Adj, mode)?,
            PosFiles::load(dir, Pos::Adv, mode)?,
        ];
        Ok(Self { parts })
    }

    fn part(&self, pos: Pos) -> &PosFiles {
        match pos {
            Pos::Noun => &self.parts[0],
            Pos::Verb => &self.parts[1],
            Pos::Adj => &self.parts[2],
            Pos::Adv => &self.parts[3],
        }
    }

    pub fn lemma_exists(&self, pos: Pos, lemma: &str) -> bool {
        self.part(pos).index.contains_key(&normalize_lemma(lemma))
    }

    pub fn index_entry(&self, pos: Pos, lemma: &str) -> Option<IndexEntry<'_>> {
        let part = self.part(pos);
        part.index
            .get(&normalize_lemma(lemma))
            .map(|record| IndexEntry {
                lemma: part.index_file.text(record.lemma),
                pos,
                sense_cnt: record.sense_cnt,
                tagsense_cnt: record.tagsense_cnt,
                synset_offsets: record.offsets.as_slice(),
            })
    }

    /// Synsets of a lemma in sense-number order; empty when the lemma is unknown.
    pub fn synsets_for_lemma(&self, pos: Pos, lemma: &str) -> impl Iterator<Item = SynsetId> + '_ {
        self.part(pos)
            .index
            .get(&normalize_lemma(lemma))
            .map(|record| record.offsets.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(move |&offset| SynsetId { pos, offset })
    }

    pub fn get_synset(&self, id: SynsetId) -> Option<Synset<'_>> {
        let part = self.part(id.pos);
        part.synsets
            .get(&id.offset)
            .map(|record| part.synset_view(id.offset, record))
    }

    /// Synsets reached from `id` through pointers accepted by `keep`,
    /// in pointer order. Dangling targets are skipped.
    pub fn related<F>(&self, id: SynsetId, keep: F) -> Vec<Synset<'_>>
    where
        F: Fn(PointerKind<'_>) -> bool,
    {
        let Some(synset) = self.get_synset(id) else {
            return Vec::new();
        };
        synset
            .pointers
            .iter()
            .filter(|p| keep(p.kind))
            .filter_map(|p| self.get_synset(p.target))
            .collect()
    }

    pub fn iter_synsets(&self) -> impl Iterator<Item = Synset<'_>> + '_ {
        self.parts.iter().flat_map(|part| {
            part.synsets
                .iter()
                .map(move |(offset, record)| part.synset_view(*offset, record))
        })
    }

    /// Number of index entries across all parts of speech.
    pub fn index_count(&self) -> usize {
        self.parts.iter().map(|p| p.index.len()).sum()
    }

    pub fn synset_count(&self) -> usize {
        self.parts.iter().map(|p| p.synsets.len()).sum()
    }
}

/// Dictionary lines; license header lines start with whitespace.
fn entry_lines(bytes: &[u8]) -> impl Iterator<Item = (usize, Result<&str>)> {
    bytes
        .split(|b| *b == b'\n')
        .enumerate()
        .filter_map(|(idx, raw)| {
            let line = raw.strip_suffix(b"\r").unwrap_or(raw);
            if line.is_empty() || matches!(line[0], b' ' | b'\t') {
                return None;
            }
            let parsed = std::str::from_utf8(line)
                .with_context(|| format!("line {} is not utf-8", idx + 1));
            Some((idx + 1, parsed))
        })
}

fn parse_index(bytes: &[u8], pos: Pos) -> Result<HashMap<String, IndexRecord>> {
    let mut index = HashMap::new();
    for (lineno, line) in entry_lines(bytes) {
        let line = line?;
        let fields: Vec<&str> = line.split_ascii_whitespace().collect();
        if fields.len() < 6 {
            bail!("line {lineno}: index entry has too few fields");
        }

        let lemma = fields[0];
        let synset_cnt: usize = parse_field(fields[2], lineno, "synset_cnt")?;
        let p_cnt: usize = parse_field(fields[3], lineno, "p_cnt")?;
        let counts_at = 4 + p_cnt;
        if fields.len() < counts_at + 2 {
            bail!("line {lineno}: index entry is missing sense counts");
        }
        let sense_cnt: u32 = parse_field(fields[counts_at], lineno, "sense_cnt")?;
        let tagsense_cnt: u32 = parse_field(fields[counts_at + 1], lineno, "tagsense_cnt")?;
        let offsets = fields[counts_at + 2..]
            .iter()
            .map(|f| parse_field::<u32>(f, lineno, "synset_offset"))
            .collect::<Result<Vec<_>>>()?;
        if offsets.len() != synset_cnt {
            bail!(
                "line {lineno}: {pos} index lists {} offsets, synset_cnt says {synset_cnt}",
                offsets.len()
            );
        }

        index.insert(
            normalize_lemma(lemma),
            IndexRecord {
                lemma: Span::of(bytes, lemma),
                sense_cnt,
                tagsense_cnt,
                offsets,
            },
        );
    }
    Ok(index)
}

fn parse_data(bytes: &[u8], pos: Pos) -> Result<HashMap<u32, SynsetRecord>> {
    let mut synsets = HashMap::new();
    for (lineno, line) in entry_lines(bytes) {
        let line = line?;
        // Verb frames sit between the pointers and the gloss; they are not read.
        let (head, gloss) = line
            .split_once('|')
            .unwrap_or((line, &line[line.len()..]));
        let fields: Vec<&str> = head.split_ascii_whitespace().collect();
        if fields.len() < 5 {
            bail!("line {lineno}: data entry has too few fields");
        }

        let offset: u32 = parse_field(fields[0], lineno, "synset_offset")?;
        let lex_filenum: u8 = parse_field(fields[1], lineno, "lex_filenum")?;
        let synset_type = fields[2]
            .chars()
            .next()
            .and_then(SynsetType::from_char)
            .with_context(|| format!("line {lineno}: invalid ss_type {:?}", fields[2]))?;
        if synset_type.pos() != pos {
            bail!("line {lineno}: ss_type {:?} in {pos} data", fields[2]);
        }
        let w_cnt = usize::from_str_radix(fields[3], 16)
            .with_context(|| format!("line {lineno}: w_cnt"))?;

        let mut cursor = 4;
        let word_fields = fields
            .get(cursor..cursor + 2 * w_cnt)
            .with_context(|| format!("line {lineno}: expected {w_cnt} words"))?;
        let mut words = Vec::with_capacity(w_cnt);
        for pair in word_fields.chunks_exact(2) {
            let lex_id = u8::from_str_radix(pair[1], 16)
                .with_context(|| format!("line {lineno}: lex_id {:?}", pair[1]))?;
            words.push(WordRecord {
                text: Span::of(bytes, pair[0]),
                lex_id,
            });
        }
        cursor += 2 * w_cnt;

        let p_cnt: usize = fields
            .get(cursor)
            .with_context(|| format!("line {lineno}: missing p_cnt"))
            .and_then(|f| parse_field(f, lineno, "p_cnt"))?;
        cursor += 1;
        let pointer_fields = fields
            .get(cursor..cursor + 4 * p_cnt)
            .with_context(|| format!("line {lineno}: expected {p_cnt} pointers"))?;
        let mut pointers = Vec::with_capacity(p_cnt);
        for ptr in pointer_fields.chunks_exact(4) {
            let target_offset: u32 = parse_field(ptr[1], lineno, "pointer offset")?;
            let target_pos = ptr[2]
                .chars()
                .next()
                .and_then(Pos::from_char)
                .with_context(|| format!("line {lineno}: pointer pos {:?}", ptr[2]))?;
            pointers.push(PointerRecord {
                symbol: Span::of(bytes, ptr[0]),
                target: SynsetId {
                    pos: target_pos,
                    offset: target_offset,
                },
            });
        }

        synsets.insert(
            offset,
            SynsetRecord {
                lex_filenum,
                synset_type,
                words,
                pointers,
                gloss: parse_gloss(bytes, gloss.trim()),
            },
        );
    }
    Ok(synsets)
}

/// Split a gloss into the definition (text before the first `;` outside
/// quotes) and the double-quoted examples.
fn parse_gloss(root: &[u8], gloss: &str) -> GlossRecord {
    let mut examples = Vec::new();
    let mut definition_end = None;
    let mut open_quote: Option<usize> = None;

    for (idx, ch) in gloss.char_indices() {
        match (ch, open_quote) {
            ('"', None) => open_quote = Some(idx + 1),
            ('"', Some(start)) => {
                let example = gloss[start..idx].trim();
                if !example.is_empty() {
                    examples.push(Span::of(root, example));
                }
                open_quote = None;
            }
            (';', None) if definition_end.is_none() => definition_end = Some(idx),
            _ => {}
        }
    }

    let definition = gloss[..definition_end.unwrap_or(gloss.len())].trim();
    GlossRecord {
        raw: Span::of(root, gloss),
        definition: Span::of(root, definition),
        examples,
    }
}

fn parse_field<T: std::str::FromStr>(field: &str, lineno: usize, name: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    field
        .parse()
        .with_context(|| format!("line {lineno}: {name} {field:?}"))
}

fn normalize_lemma(text: &str) -> String {
    text.trim().to_ascii_lowercase().replace(' ', "_")
}
