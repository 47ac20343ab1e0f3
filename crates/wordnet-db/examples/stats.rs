use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use wordnet_db::{LoadMode, WordNet};
use wordnet_types::{PointerKind, Pos};

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let dict_dir = args
        .next()
        .map(PathBuf::from)
        .context("usage: cargo run -p wordnet-db --example stats -- <path-to-wordnet-dir> [lemma]")?;
    let lemma = args.next().unwrap_or_else(|| "bank".to_string());

    let wn = WordNet::load_with_mode(&dict_dir, LoadMode::Mmap)
        .with_context(|| format!("loading WordNet from {}", dict_dir.display()))?;

    let mut examples = 0usize;
    let mut taxonomy_links = 0usize;
    for syn in wn.iter_synsets() {
        examples += syn.gloss.examples.len();
        taxonomy_links += syn.pointers.iter().filter(|p| p.kind.is_taxonomic()).count();
    }

    println!("Dictionary    : {}", dict_dir.display());
    println!("Index entries : {}", wn.index_count());
    println!("Synsets       : {}", wn.synset_count());
    println!("Gloss examples: {examples}");
    println!("Taxonomy links: {taxonomy_links}");

    for pos in Pos::ALL {
        for (sense, id) in wn.synsets_for_lemma(pos, &lemma).enumerate() {
            let Some(syn) = wn.get_synset(id) else { continue };
            let key = syn
                .sense_key(&lemma)
                .map(|k| k.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!("{pos} #{:<2} {key:<22} {}", sense + 1, syn.gloss.definition);
        }
    }

    Ok(())
}
