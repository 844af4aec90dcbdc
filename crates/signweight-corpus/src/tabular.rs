// Minimal delimited-text reader shared by the corpus and table loaders.
//
// Rows are tab-separated when any content line holds a tab, otherwise
// comma-separated, with an optional header. Blank lines and `#` comments are skipped.

pub(crate) struct Row<'a> {
    /// 1-based line number in the source text.
    pub line: usize,
    pub fields: Vec<&'a str>,
}

impl<'a> Row<'a> {
    pub fn field(&self, idx: usize) -> Option<&'a str> {
        self.fields.get(idx).copied().filter(|f| !f.is_empty())
    }
}

pub(crate) struct Table<'a> {
    header: Option<Vec<String>>,
    pub rows: Vec<Row<'a>>,
}

impl<'a> Table<'a> {
    /// Splits `text` into rows. The first content line is taken as a header
    /// when one of its fields is in `known_columns`.
    pub fn parse(text: &'a str, known_columns: &[&str]) -> Self {
        let content: Vec<(usize, &'a str)> = text
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.trim_end_matches('\r')))
            .filter(|(_, line)| {
                let t = line.trim();
                !t.is_empty() && !t.starts_with('#')
            })
            .collect();

        let delimiter = if content.iter().any(|(_, line)| line.contains('\t')) {
            '\t'
        } else {
            ','
        };
        let mut lines = content.into_iter().peekable();

        let header: Option<Vec<String>> = lines
            .peek()
            .map(|&(_, first)| {
                split(first, delimiter)
                    .into_iter()
                    .map(|f| f.to_ascii_lowercase())
                    .collect::<Vec<_>>()
            })
            .filter(|names| names.iter().any(|n| known_columns.contains(&n.as_str())));
        if header.is_some() {
            lines.next();
        }

        let rows = lines
            .map(|(line, text)| Row {
                line,
                fields: split(text, delimiter),
            })
            .collect();

        Self { header, rows }
    }

    /// Index of the first header column named in `names`, else `fallback`.
    pub fn column(&self, names: &[&str], fallback: usize) -> usize {
        self.header
            .as_ref()
            .and_then(|h| h.iter().position(|c| names.contains(&c.as_str())))
            .unwrap_or(fallback)
    }
}

fn split(line: &str, delimiter: char) -> Vec<&str> {
    line.split(delimiter)
        .map(|f| f.trim().trim_matches('"').trim())
        .collect()
}
