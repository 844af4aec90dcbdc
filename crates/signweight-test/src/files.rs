//! Scenario fixtures written to disk, for tests that go through the loaders.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::corpora::SCENARIO;

/// Paths of the tables written by [`write_scenario`].
#[derive(Debug, Clone)]
pub struct ScenarioFiles {
    pub corpus: PathBuf,
    pub compounds: PathBuf,
    pub modifiers: PathBuf,
}

/// Compound 905 decomposes into 3 and 1.
pub const COMPOUNDS_TSV: &str = "compound_id\tcomponents\n905\t3 1\n";

/// Sign 2 is a modifier.
pub const MODIFIERS_TSV: &str = "modifier_id\n2\n";

/// Scenario corpus as TSV with an `inscr_id`/`sign_seq` header.
pub fn scenario_tsv() -> String {
    let mut out = String::from("inscr_id\tsign_seq\n");
    for (i, signs) in SCENARIO.iter().enumerate() {
        let signs: Vec<String> = signs.iter().map(u32::to_string).collect();
        out.push_str(&format!("I-{}\t{}\n", i + 1, signs.join(" ")));
    }
    out
}

/// Writes the corpus, compound and modifier tables into `dir`.
pub fn write_scenario(dir: &Path) -> io::Result<ScenarioFiles> {
    let files = ScenarioFiles {
        corpus: dir.join("corpus.tsv"),
        compounds: dir.join("compounds.tsv"),
        modifiers: dir.join("modifiers.tsv"),
    };
    fs::write(&files.corpus, scenario_tsv())?;
    fs::write(&files.compounds, COMPOUNDS_TSV)?;
    fs::write(&files.modifiers, MODIFIERS_TSV)?;
    Ok(files)
}
