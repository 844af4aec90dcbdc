//! The corpus model: inscriptions and the vocabulary derived from them.

use std::io::Read;
use std::path::Path;

use signweight_core::{Inscription, MalformedRowError, SignId, SignWeightError, Vocabulary};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::tabular::Table;

const ID_COLUMNS: &[&str] = &["inscr_id", "id"];
const SEQUENCE_COLUMNS: &[&str] = &["sign_seq", "signs"];

/// Fatal corpus load failure.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("cannot read corpus: {0}")]
    Io(#[from] std::io::Error),

    #[error("corpus contains no valid inscriptions ({skipped} malformed rows skipped)")]
    Empty { skipped: usize },
}

impl From<CorpusError> for SignWeightError {
    fn from(err: CorpusError) -> Self {
        match err {
            CorpusError::Io(e) => SignWeightError::Io(e),
            other => SignWeightError::Corpus(other.to_string()),
        }
    }
}

/// What happened while reading corpus rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Data rows seen, valid or not.
    pub rows_read: usize,
    /// Rows skipped, with the reason.
    pub skipped: Vec<MalformedRowError>,
}

impl LoadReport {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// All inscriptions of a corpus and their vocabulary.
///
/// # Example
///
/// ```
/// use signweight_corpus::Corpus;
/// use signweight_core::SignId;
///
/// let (corpus, report) = Corpus::parse("inscr_id\tsign_seq\nM-1\t1 342 125\nM-2\t2 x 126\n");
/// assert_eq!(corpus.len(), 1);
/// assert_eq!(report.skipped_count(), 1);
/// assert_eq!(corpus.vocabulary().frequency(SignId(342)), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    inscriptions: Vec<Inscription>,
    vocabulary: Vocabulary,
}

impl Corpus {
    /// Builds a corpus from already parsed inscriptions.
    pub fn from_inscriptions(inscriptions: Vec<Inscription>) -> Self {
        let vocabulary = Vocabulary::from_inscriptions(&inscriptions);
        Self {
            inscriptions,
            vocabulary,
        }
    }

    /// Parses `(id, sign-sequence)` rows. Row `n` of the iterator is reported as line `n + 1`.
    pub fn from_rows<I, A, B>(rows: I) -> (Self, LoadReport)
    where
        I: IntoIterator<Item = (A, B)>,
        A: AsRef<str>,
        B: AsRef<str>,
    {
        let mut inscriptions = Vec::new();
        let mut report = LoadReport::default();
        for (idx, (id, sequence)) in rows.into_iter().enumerate() {
            report.rows_read += 1;
            match parse_row(idx + 1, id.as_ref(), Some(sequence.as_ref())) {
                Ok(inscription) => inscriptions.push(inscription),
                Err(err) => report.skipped.push(err),
            }
        }
        (Self::from_inscriptions(inscriptions), report)
    }

    /// Parses tab-separated corpus text.
    ///
    /// A header naming `inscr_id`/`id` and `sign_seq`/`signs` is honoured;
    /// without one, column 0 is the id and column 1 the sequence.
    pub fn parse(text: &str) -> (Self, LoadReport) {
        let mut known = ID_COLUMNS.to_vec();
        known.extend_from_slice(SEQUENCE_COLUMNS);
        let table = Table::parse(text, &known);
        let id_col = table.column(ID_COLUMNS, 0);
        let seq_col = table.column(SEQUENCE_COLUMNS, 1);

        let mut inscriptions = Vec::with_capacity(table.rows.len());
        let mut report = LoadReport::default();
        for row in &table.rows {
            report.rows_read += 1;
            let id = row.field(id_col).unwrap_or("");
            match parse_row(row.line, id, row.field(seq_col)) {
                Ok(inscription) => inscriptions.push(inscription),
                Err(err) => {
                    debug!(line = err.line, reason = %err.reason, "skipping corpus row");
                    report.skipped.push(err);
                }
            }
        }
        (Self::from_inscriptions(inscriptions), report)
    }

    /// Reads and parses a corpus. Fails when nothing valid remains.
    pub fn from_reader(mut reader: impl Read) -> Result<(Self, LoadReport), CorpusError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        let (corpus, report) = Self::parse(&text);
        if !report.skipped.is_empty() {
            warn!(
                skipped = report.skipped.len(),
                rows = report.rows_read,
                "malformed corpus rows skipped"
            );
        }
        if corpus.is_empty() {
            return Err(CorpusError::Empty {
                skipped: report.skipped.len(),
            });
        }
        Ok((corpus, report))
    }

    /// Loads a corpus file.
    pub fn load(path: impl AsRef<Path>) -> Result<(Self, LoadReport), CorpusError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let (corpus, report) = Self::from_reader(file)?;
        info!(
            event = "load_end",
            path = %path.display(),
            inscription_count = corpus.len() as u64,
            sign_count = corpus.vocabulary.len() as u64,
            token_count = corpus.token_count(),
            skipped = report.skipped.len() as u64,
        );
        Ok((corpus, report))
    }

    /// Flags compound signs in the vocabulary.
    pub fn with_compounds(mut self, compounds: impl IntoIterator<Item = SignId>) -> Self {
        self.vocabulary = self.vocabulary.with_compounds(compounds);
        self
    }

    pub fn inscriptions(&self) -> &[Inscription] {
        &self.inscriptions
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn len(&self) -> usize {
        self.inscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inscriptions.is_empty()
    }

    pub fn token_count(&self) -> u64 {
        self.vocabulary.token_count()
    }
}

/// Parses a whitespace-separated list of sign ids.
pub fn parse_sign_list(text: &str) -> Result<Vec<SignId>, String> {
    text.split_whitespace()
        .map(|token| {
            token
                .parse::<SignId>()
                .map_err(|_| format!("token '{}' is not a sign id", token))
        })
        .collect()
}

fn parse_row(
    line: usize,
    id: &str,
    sequence: Option<&str>,
) -> Result<Inscription, MalformedRowError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(MalformedRowError::new(line, "missing inscription id"));
    }
    let sequence = sequence.ok_or_else(|| MalformedRowError::new(line, "missing sign sequence"))?;
    let signs = parse_sign_list(sequence).map_err(|reason| MalformedRowError::new(line, reason))?;
    Inscription::new(id, signs).ok_or_else(|| MalformedRowError::new(line, "empty sign sequence"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_inscr_id_header() {
        let text = "inscr_id\tsign_seq\nM-1\t1 342 125\nM-2\t2 410 126\n";
        let (corpus, report) = Corpus::parse(text);
        assert_eq!(corpus.len(), 2);
        assert_eq!(report.rows_read, 2);
        assert!(report.skipped.is_empty());
        assert_eq!(corpus.inscriptions()[1].id(), "M-2");
        assert_eq!(
            corpus.inscriptions()[0].signs(),
            &[SignId(1), SignId(342), SignId(125)]
        );
    }

    #[test]
    fn test_parse_with_alternate_header_and_extra_columns() {
        let text = "id\tsite\tsigns\tlayer\nH-7\tHarappa\t740 125\tIII\n";
        let (corpus, _) = Corpus::parse(text);
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.inscriptions()[0].signs(), &[SignId(740), SignId(125)]);
    }

    #[test]
    fn test_parse_headerless() {
        let (corpus, report) = Corpus::parse("a\t1 2 3\nb\t4\n");
        assert_eq!(corpus.len(), 2);
        assert_eq!(report.skipped_count(), 0);
        assert_eq!(corpus.vocabulary().len(), 4);
    }

    #[test]
    fn test_malformed_rows_are_skipped_and_counted() {
        let text = "inscr_id\tsign_seq\nok\t1 2 3\nbad\t1 two 3\nempty\t\n\t5 6\nlast\t7 8\n";
        let (corpus, report) = Corpus::parse(text);
        assert_eq!(corpus.len(), 2);
        assert_eq!(report.rows_read, 5);
        assert_eq!(report.skipped_count(), 3);
        assert_eq!(report.skipped[0].line, 3);
        assert!(report.skipped[0].reason.contains("two"));
        assert_eq!(report.skipped[1].reason, "missing sign sequence");
        assert_eq!(report.skipped[2].reason, "missing inscription id");
    }

    #[test]
    fn test_malformed_first_row_keeps_tab_delimiter() {
        let (corpus, report) = Corpus::parse("M-0\nM-1\t1 342 125\nM-2\t2 410 126\n");
        assert_eq!(corpus.len(), 2);
        assert_eq!(report.rows_read, 3);
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(report.skipped[0].line, 1);
        assert_eq!(report.skipped[0].reason, "missing sign sequence");
    }

    #[test]
    fn test_signed_token_is_malformed() {
        let (corpus, report) = Corpus::parse("M-1\t+1 342 125\nM-2\t2 410 126\n");
        assert_eq!(corpus.len(), 1);
        assert_eq!(report.skipped_count(), 1);
        assert!(report.skipped[0].reason.contains("+1"));
    }

    #[test]
    fn test_from_rows() {
        let rows = vec![("1", "1 342 125"), ("2", "2 410 126"), ("3", "")];
        let (corpus, report) = Corpus::from_rows(rows);
        assert_eq!(corpus.len(), 2);
        assert_eq!(report.skipped[0].line, 3);
        assert_eq!(report.skipped[0].reason, "empty sign sequence");
    }

    #[test]
    fn test_from_reader_rejects_empty_corpus() {
        let text = "inscr_id\tsign_seq\nbad\tx y\n";
        match Corpus::from_reader(text.as_bytes()) {
            Err(CorpusError::Empty { skipped }) => assert_eq!(skipped, 1),
            other => panic!("expected empty corpus error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Corpus::load(dir.path().join("nope.tsv")),
            Err(CorpusError::Io(_))
        ));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.tsv");
        std::fs::write(&path, "inscr_id\tsign_seq\nM-1\t1 342 125\n").unwrap();
        let (corpus, report) = Corpus::load(&path).unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.token_count(), 3);
        assert_eq!(report.rows_read, 1);
    }
}
