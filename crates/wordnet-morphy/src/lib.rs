//! Base forms of inflected words, the way WordNet's `morphy` finds them.
//!
//! A surface form is resolved in three passes: the form itself, the
//! irregular forms listed in the `*.exc` exception files, then the regular
//! suffix substitutions for its part of speech. A candidate only survives if
//! the caller's existence check accepts it, so this crate never needs to know
//! how the dictionary is stored.
//!
//! ```no_run
//! use wordnet_db::WordNet;
//! use wordnet_morphy::Morphy;
//! use wordnet_types::Pos;
//!
//! # fn main() -> anyhow::Result<()> {
//! let dict = "/usr/share/wordnet";
//! let wn = WordNet::load(dict)?;
//! let morphy = Morphy::load(dict)?;
//! let forms = morphy.base_forms(Pos::Noun, "banks", |pos, lemma| wn.lemma_exists(pos, lemma));
//! assert_eq!(forms, vec!["bank".to_string()]);
//! # Ok(()) }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use wordnet_types::Pos;

/// Irregular-form tables keyed by part of speech.
#[derive(Clone, Debug, Default)]
pub struct Morphy {
    exceptions: HashMap<Pos, HashMap<String, Vec<String>>>,
}

impl Morphy {
    /// A resolver with no exception lists; only suffix rules apply.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Read `noun.exc`, `verb.exc`, `adj.exc` and `adv.exc` from a dictionary
    /// directory. Missing files count as empty lists.
    pub fn load(dict_dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dict_dir.as_ref();
        let mut morphy = Self::empty();
        for pos in Pos::ALL {
            let path = dir.join(format!("{}.exc", pos.file_suffix()));
            if !path.exists() {
                continue;
            }
            let text = fs::read_to_string(&path)
                .with_context(|| format!("read exception list {}", path.display()))?;
            for line in text.lines() {
                let mut fields = line.split_whitespace();
                let Some(surface) = fields.next() else {
                    continue;
                };
                for lemma in fields {
                    morphy.add_exception(pos, surface, lemma);
                }
            }
        }
        Ok(morphy)
    }

    pub fn add_exception(&mut self, pos: Pos, surface: &str, lemma: &str) {
        self.exceptions
            .entry(pos)
            .or_default()
            .entry(normalize(surface))
            .or_default()
            .push(normalize(lemma));
    }

    /// Base forms of `surface` accepted by `exists`, surface form first, then
    /// exceptions, then rule hits. Duplicates are dropped, order is kept.
    pub fn base_forms<F>(&self, pos: Pos, surface: &str, exists: F) -> Vec<String>
    where
        F: Fn(Pos, &str) -> bool,
    {
        let surface = normalize(surface);
        if surface.is_empty() {
            return Vec::new();
        }

        let irregular = self
            .exceptions
            .get(&pos)
            .and_then(|table| table.get(&surface))
            .into_iter()
            .flatten()
            .cloned();
        let regular = suffix_rules(pos)
            .iter()
            .filter_map(|(suffix, ending)| detach(&surface, suffix, ending))
            .flatten();

        let mut forms: Vec<String> = Vec::new();
        for form in std::iter::once(surface.clone()).chain(irregular).chain(regular) {
            if !forms.contains(&form) && exists(pos, &form) {
                forms.push(form);
            }
        }
        forms
    }
}

/// Replace `suffix` with `ending`. A stem left with a doubled final
/// consonant ("runn", "bigg") is also offered undoubled.
fn detach(surface: &str, suffix: &str, ending: &str) -> Option<Vec<String>> {
    let stem = surface.strip_suffix(suffix)?;
    if stem.is_empty() {
        return None;
    }
    let mut forms = vec![format!("{stem}{ending}")];
    if ending.is_empty() {
        let bytes = stem.as_bytes();
        if let [.., a, b] = bytes
            && a == b
            && !matches!(*a, b'a' | b'e' | b'i' | b'o' | b'u')
        {
            forms.push(stem[..stem.len() - 1].to_string());
        }
    }
    Some(forms)
}

fn suffix_rules(pos: Pos) -> &'static [(&'static str, &'static str)] {
    match pos {
        Pos::Noun => &[
            ("s", ""),
            ("ses", "s"),
            ("xes", "x"),
            ("zes", "z"),
            ("ches", "ch"),
            ("shes", "sh"),
            ("men", "man"),
            ("ies", "y"),
        ],
        Pos::Verb => &[
            ("s", ""),
            ("ies", "y"),
            ("es", "e"),
            ("es", ""),
            ("ed", "e"),
            ("ed", ""),
            ("ing", "e"),
            ("ing", ""),
        ],
        Pos::Adj => &[("er", ""), ("est", ""), ("er", "e"), ("est", "e")],
        Pos::Adv => &[],
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase().replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(entries: &'static [(Pos, &'static str)]) -> impl Fn(Pos, &str) -> bool {
        move |pos, lemma| entries.iter().any(|(p, l)| *p == pos && *l == lemma)
    }

    #[test]
    fn irregular_forms_come_from_exceptions() {
        let mut morphy = Morphy::empty();
        morphy.add_exception(Pos::Noun, "children", "child");
        let forms = morphy.base_forms(Pos::Noun, "Children", known(&[(Pos::Noun, "child")]));
        assert_eq!(forms, vec!["child"]);
    }

    #[test]
    fn surface_form_precedes_rule_hits() {
        let morphy = Morphy::empty();
        let forms = morphy.base_forms(
            Pos::Verb,
            "running",
            known(&[(Pos::Verb, "running"), (Pos::Verb, "run")]),
        );
        assert_eq!(forms, vec!["running", "run"]);
    }

    #[test]
    fn plural_nouns_and_verb_tenses() {
        let morphy = Morphy::empty();
        let exists = known(&[(Pos::Noun, "bank"), (Pos::Noun, "box"), (Pos::Verb, "lend")]);
        assert_eq!(morphy.base_forms(Pos::Noun, "banks", &exists), vec!["bank"]);
        assert_eq!(morphy.base_forms(Pos::Noun, "boxes", &exists), vec!["box"]);
        assert_eq!(morphy.base_forms(Pos::Verb, "lending", &exists), vec!["lend"]);
        assert!(morphy.base_forms(Pos::Verb, "banks", &exists).is_empty());
    }

    #[test]
    fn unknown_words_yield_nothing() {
        let morphy = Morphy::empty();
        assert!(morphy.base_forms(Pos::Noun, "", |_, _| true).is_empty());
        assert!(morphy.base_forms(Pos::Adv, "quickly", |_, _| false).is_empty());
    }
}
