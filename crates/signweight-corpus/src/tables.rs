//! Optional auxiliary tables: compound signs and modifier signs.
//!
//! Both tables are optional. A missing path or file means "no constraints
//! of this kind"; unreadable files and malformed rows are logged and skipped.

use std::collections::{BTreeMap, BTreeSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use signweight_core::{MalformedRowError, SignId};
use tracing::{info, warn};

use crate::corpus::parse_sign_list;
use crate::tabular::Table;

const COMPOUND_ID_COLUMNS: &[&str] = &["compound_id", "compound"];
const COMPONENT_COLUMNS: &[&str] = &["components", "constituents", "parts"];
const MODIFIER_COLUMNS: &[&str] = &["modifier_id", "modifier", "sign_id"];

/// Outcome of loading the auxiliary tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableReport {
    pub compound_rows: usize,
    pub modifier_rows: usize,
    pub skipped: Vec<MalformedRowError>,
    /// Configured tables that were absent or unreadable.
    pub unavailable: Vec<PathBuf>,
}

/// Compound and modifier mappings.
///
/// # Example
///
/// ```
/// use signweight_corpus::ConstraintTables;
/// use signweight_core::SignId;
///
/// let tables = ConstraintTables::new()
///     .with_compound(SignId(900), [SignId(1), SignId(2)])
///     .with_modifier(SignId(99));
/// assert_eq!(tables.constituents(SignId(900)), Some(&[SignId(1), SignId(2)][..]));
/// assert!(tables.is_modifier(SignId(99)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintTables {
    compounds: BTreeMap<SignId, Vec<SignId>>,
    modifiers: BTreeSet<SignId>,
}

impl ConstraintTables {
    /// Creates empty tables: no compound or modifier constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads whichever tables are given. Never fails.
    pub fn load(compounds: Option<&Path>, modifiers: Option<&Path>) -> (Self, TableReport) {
        let mut tables = Self::new();
        let mut report = TableReport::default();

        if let Some(text) = compounds.and_then(|p| read_optional(p, &mut report)) {
            let (parsed, rows, skipped) = Self::parse_compounds(&text);
            tables.compounds = parsed;
            report.compound_rows = rows;
            report.skipped.extend(skipped);
        }
        if let Some(text) = modifiers.and_then(|p| read_optional(p, &mut report)) {
            let (parsed, rows, skipped) = Self::parse_modifiers(&text);
            tables.modifiers = parsed;
            report.modifier_rows = rows;
            report.skipped.extend(skipped);
        }

        for err in &report.skipped {
            warn!(line = err.line, reason = %err.reason, "skipping table row");
        }
        info!(
            event = "tables_end",
            compound_count = tables.compounds.len() as u64,
            modifier_count = tables.modifiers.len() as u64,
            skipped = report.skipped.len() as u64,
        );
        (tables, report)
    }

    /// Parses `(compound-id, space-separated constituents)` rows.
    ///
    /// Returns the mapping, the number of data rows and the skipped rows.
    pub fn parse_compounds(
        text: &str,
    ) -> (BTreeMap<SignId, Vec<SignId>>, usize, Vec<MalformedRowError>) {
        let mut known = COMPOUND_ID_COLUMNS.to_vec();
        known.extend_from_slice(COMPONENT_COLUMNS);
        let table = Table::parse(text, &known);
        let id_col = table.column(COMPOUND_ID_COLUMNS, 0);
        let parts_col = table.column(COMPONENT_COLUMNS, 1);

        let mut compounds = BTreeMap::new();
        let mut skipped = Vec::new();
        for row in &table.rows {
            let id = match row.field(id_col).map(str::parse::<SignId>) {
                Some(Ok(id)) => id,
                Some(Err(e)) => {
                    skipped.push(MalformedRowError::new(row.line, e.to_string()));
                    continue;
                }
                None => {
                    skipped.push(MalformedRowError::new(row.line, "missing compound id"));
                    continue;
                }
            };
            let parts = match row.field(parts_col).map(parse_sign_list) {
                Some(Ok(parts)) if !parts.is_empty() => parts,
                Some(Err(reason)) => {
                    skipped.push(MalformedRowError::new(row.line, reason));
                    continue;
                }
                _ => {
                    skipped.push(MalformedRowError::new(
                        row.line,
                        format!("compound {} has no constituents", id),
                    ));
                    continue;
                }
            };
            if compounds.insert(id, parts).is_some() {
                warn!(
                    compound = %id,
                    line = row.line,
                    "duplicate compound row, keeping the last one"
                );
            }
        }
        (compounds, table.rows.len(), skipped)
    }

    /// Parses one modifier id per row.
    pub fn parse_modifiers(text: &str) -> (BTreeSet<SignId>, usize, Vec<MalformedRowError>) {
        let table = Table::parse(text, MODIFIER_COLUMNS);
        let col = table.column(MODIFIER_COLUMNS, 0);

        let mut modifiers = BTreeSet::new();
        let mut skipped = Vec::new();
        for row in &table.rows {
            match row.field(col).map(str::parse::<SignId>) {
                Some(Ok(id)) => {
                    modifiers.insert(id);
                }
                Some(Err(e)) => skipped.push(MalformedRowError::new(row.line, e.to_string())),
                None => skipped.push(MalformedRowError::new(row.line, "missing modifier id")),
            }
        }
        (modifiers, table.rows.len(), skipped)
    }

    pub fn with_compound(mut self, id: SignId, parts: impl IntoIterator<Item = SignId>) -> Self {
        self.compounds.insert(id, parts.into_iter().collect());
        self
    }

    pub fn with_modifier(mut self, id: SignId) -> Self {
        self.modifiers.insert(id);
        self
    }

    pub fn compounds(&self) -> &BTreeMap<SignId, Vec<SignId>> {
        &self.compounds
    }

    pub fn constituents(&self, id: SignId) -> Option<&[SignId]> {
        self.compounds.get(&id).map(Vec::as_slice)
    }

    pub fn compound_ids(&self) -> impl Iterator<Item = SignId> + '_ {
        self.compounds.keys().copied()
    }

    pub fn modifiers(&self) -> &BTreeSet<SignId> {
        &self.modifiers
    }

    pub fn is_modifier(&self, id: SignId) -> bool {
        self.modifiers.contains(&id)
    }
}

fn read_optional(path: &Path, report: &mut TableReport) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "table not found, skipping its constraints");
            report.unavailable.push(path.to_path_buf());
            None
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "cannot read table, skipping its constraints"
            );
            report.unavailable.push(path.to_path_buf());
            None
        }
    }
}
