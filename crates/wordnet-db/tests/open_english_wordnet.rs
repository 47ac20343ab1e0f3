use std::env;
use std::path::PathBuf;

use wordnet_db::{LoadMode, WordNet};
use wordnet_types::Pos;

fn dict_dir() -> Option<PathBuf> {
    env::var("WORDNET_DIR").ok().map(PathBuf::from)
}

#[test]
fn loads_full_dictionary() {
    let Some(dir) = dict_dir() else {
        eprintln!("skipping: WORDNET_DIR not set");
        return;
    };
    let wn = WordNet::load_with_mode(&dir, LoadMode::Mmap).expect("load wordnet");

    assert!(wn.index_count() > 10_000, "index too small");
    assert!(wn.synset_count() > 10_000, "synsets too small");
    assert!(wn.synsets_for_lemma(Pos::Noun, "bank").count() >= 2);
    for id in wn.synsets_for_lemma(Pos::Noun, "bank") {
        let synset = wn.get_synset(id).expect("indexed synset loaded");
        assert!(!synset.gloss.definition.is_empty());
    }
}
