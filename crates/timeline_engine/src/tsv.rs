//! Tab-separated output: field normalization, rows and the run buffer.

pub const COLUMN_SEPARATOR: char = '\t';
pub const ROW_SEPARATOR: char = '\n';
/// Stands in for a literal tab inside a field.
pub const TAB_PLACEHOLDER: char = '↹';
/// Stands in for any line break (CRLF, LF or CR) inside a field.
pub const NEWLINE_PLACEHOLDER: char = '↵';

const HEADER: [&str; 2] = ["User", "Text"];

/// Make a field safe for the TSV output: tabs become `↹`, each line break
/// (`\r\n`, `\n` or `\r`) becomes a single `↵`, then outer whitespace is trimmed.
///
/// Idempotent: the output contains no tab or line break, and trimming is stable.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\t' => out.push(TAB_PLACEHOLDER),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push(NEWLINE_PLACEHOLDER);
            }
            '\n' => out.push(NEWLINE_PLACEHOLDER),
            other => out.push(other),
        }
    }
    out.trim().to_string()
}

/// One extracted post. Both fields are normalized on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    author: String,
    body: String,
}

impl Row {
    pub fn new(author: &str, body: &str) -> Self {
        Self {
            author: normalize(author),
            body: normalize(body),
        }
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Append-only TSV text seeded with the `User<TAB>Text` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsvBuffer {
    text: String,
    rows: usize,
}

impl Default for TsvBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TsvBuffer {
    pub fn new() -> Self {
        let mut buffer = Self {
            text: String::new(),
            rows: 0,
        };
        buffer.push_line(HEADER[0], HEADER[1]);
        buffer
    }

    pub fn append(&mut self, row: &Row) {
        self.push_line(row.author(), row.body());
        self.rows += 1;
    }

    /// Number of data rows, header excluded.
    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    fn push_line(&mut self, author: &str, body: &str) {
        self.text.push_str(author);
        self.text.push(COLUMN_SEPARATOR);
        self.text.push_str(body);
        self.text.push(ROW_SEPARATOR);
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize, Row, TsvBuffer};

    #[test]
    fn replaces_every_tab_and_line_break() {
        assert_eq!(normalize("a\tb\tc"), "a↹b↹c");
        assert_eq!(normalize("one\r\ntwo\nthree\rfour"), "one↵two↵three↵four");
    }

    #[test]
    fn crlf_collapses_to_one_placeholder() {
        assert_eq!(normalize("x\r\n\r\ny"), "x↵↵y");
    }

    #[test]
    fn trims_outer_whitespace_only() {
        assert_eq!(normalize("   padded  text \u{a0}"), "padded  text");
    }

    #[test]
    fn placeholders_survive_trimming() {
        assert_eq!(normalize("\ttrailing\n"), "↹trailing↵");
    }

    #[test]
    fn normalizing_twice_changes_nothing() {
        let samples = [
            "",
            "  plain ",
            "tab\there",
            "\r\n\r\nmixed\r\r\n\n\t ",
            "emoji 🎉\u{2003}wide space",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "sample {sample:?}");
            assert!(!once.contains(['\t', '\r', '\n']));
        }
    }

    #[test]
    fn buffer_starts_with_header_only() {
        let buffer = TsvBuffer::new();
        assert_eq!(buffer.as_str(), "User\tText\n");
        assert_eq!(buffer.row_count(), 0);
    }

    #[test]
    fn rows_are_appended_in_order() {
        let mut buffer = TsvBuffer::new();
        buffer.append(&Row::new("@a", "first"));
        buffer.append(&Row::new("@b", "second\tline"));
        assert_eq!(buffer.row_count(), 2);
        assert_eq!(buffer.into_string(), "User\tText\n@a\tfirst\n@b\tsecond↹line\n");
    }
}
