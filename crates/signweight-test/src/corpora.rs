//! In-memory corpora.
//!
//! The scenario corpus has four inscriptions over nine signs:
//!
//! | id  | signs          |
//! |-----|----------------|
//! | I-1 | 1 342 125      |
//! | I-2 | 2 410 126      |
//! | I-3 | 3 342 905      |
//! | I-4 | 1 740 125      |
//!
//! Under [`scenario_config`] signs 125 and 126 are authority, 342, 410 and
//! 740 are commodity, 1 to 3 are numerals and 905 is standard.

use signweight_config::WeightConfig;
use signweight_core::{Bounds, Inscription, SignId};
use signweight_corpus::Corpus;

/// Sign sequences of the scenario corpus.
pub const SCENARIO: [[u32; 3]; 4] = [[1, 342, 125], [2, 410, 126], [3, 342, 905], [1, 740, 125]];

/// Builds a corpus with inscription ids `I-1`, `I-2`, ... in input order.
///
/// Empty sequences are dropped, as the loader would.
pub fn from_sequences(sequences: &[&[u32]]) -> Corpus {
    let inscriptions = sequences
        .iter()
        .enumerate()
        .filter_map(|(i, signs)| {
            Inscription::new(
                format!("I-{}", i + 1),
                signs.iter().map(|&s| SignId(s)).collect(),
            )
        })
        .collect();
    Corpus::from_inscriptions(inscriptions)
}

/// The four-inscription scenario corpus.
pub fn scenario() -> Corpus {
    let sequences: Vec<&[u32]> = SCENARIO.iter().map(|s| s.as_slice()).collect();
    from_sequences(&sequences)
}

/// Authority {125, 126} in `[3, 8]`, commodity {342, 410, 740} in `[1, 4]`,
/// default numeral and standard classes, authority over commodity.
pub fn scenario_config() -> WeightConfig {
    WeightConfig::new()
        .with_authority([125, 126], Bounds::new(3.0, 8.0))
        .with_commodity([342, 410, 740], Bounds::new(1.0, 4.0))
}

/// Scenario configuration whose hierarchy margin cannot be met: authority
/// is capped at 5 and must exceed a commodity floor of 4 by 10.
pub fn infeasible_config() -> WeightConfig {
    let mut config = WeightConfig::new()
        .with_authority([125, 126], Bounds::new(3.0, 5.0))
        .with_commodity([342, 410, 740], Bounds::new(4.0, 5.0));
    for rule in &mut config.hierarchy {
        rule.margin = 10.0;
    }
    config
}
