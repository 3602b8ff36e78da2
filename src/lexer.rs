use std::io::{self, BufRead};
use std::mem;
use std::path::Path;
use std::str::FromStr;

use log::trace;

use crate::error::{Error, SyntaxError};

/// Splits a line into tokens, keeping double-quoted text together
///
/// Runs of whitespace collapse to a single space, inside quotes too. Quote
/// characters stay part of the token. An unbalanced quote runs to the end
/// of the line.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut pending_space = false;

    for c in line.chars() {
        if c.is_whitespace() {
            if in_quotes {
                pending_space = true;
            } else if !current.is_empty() {
                tokens.push(mem::take(&mut current));
            }
            continue;
        }
        if pending_space {
            current.push(' ');
            pending_space = false;
        }
        if c == '"' {
            in_quotes = !in_quotes;
        }
        current.push(c);
    }

    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Byte offset of the first `;` outside double quotes
pub fn find_comment_start(line: &str) -> Option<usize> {
    let mut in_quotes = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => return Some(i),
            _ => {}
        }
    }
    None
}

/// Separates a line into its content and its comment, both trimmed
pub fn split_comment(line: &str) -> (&str, &str) {
    match find_comment_start(line) {
        Some(pos) => (line[..pos].trim(), line[pos + 1..].trim()),
        None => (line.trim(), ""),
    }
}

/// Counts unquoted opening and closing parentheses
pub fn count_parens(line: &str) -> (usize, usize) {
    let mut in_quotes = false;
    let mut open = 0;
    let mut close = 0;
    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            '(' if !in_quotes => open += 1,
            ')' if !in_quotes => close += 1,
            _ => {}
        }
    }
    (open, close)
}

pub fn has_unquoted_paren(line: &str) -> bool {
    count_parens(line) != (0, 0)
}

/// Parses an unsigned decimal, rejecting signs and empty input
pub fn parse_decimal<T: FromStr>(s: &str) -> Option<T> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// True when the token is a decimal that fits into 32 bits
pub fn is_numeric(s: &str) -> bool {
    parse_decimal::<u32>(s).is_some()
}

/// Trims every leading and trailing double quote
pub fn strip_quotes(s: &str) -> &str {
    s.trim_matches('"')
}

/// One record or directive after comment removal and parenthesis joining
#[derive(Debug, Clone)]
pub struct LogicalLine {
    /// Physical line number of the first line
    pub number: usize,
    /// First physical line, untouched
    pub raw: String,
    pub content: String,
    pub comment: String,
}

impl LogicalLine {
    /// Whether the first physical line starts with a blank owner field
    pub fn starts_blank(&self) -> bool {
        self.raw.starts_with(|c: char| c == ' ' || c == '\t')
    }
}

/// Reads logical lines from a zone file
pub struct LineReader<'a, R> {
    lines: io::Lines<R>,
    path: &'a Path,
    line: usize,
}

impl<'a, R: BufRead> LineReader<'a, R> {
    pub fn new(reader: R, path: &'a Path) -> LineReader<'a, R> {
        LineReader {
            lines: reader.lines(),
            path,
            line: 0,
        }
    }

    fn next_physical(&mut self) -> Result<Option<String>, Error> {
        match self.lines.next() {
            Some(Ok(line)) => {
                self.line += 1;
                Ok(Some(line))
            }
            Some(Err(source)) => Err(Error::Read {
                path: self.path.to_path_buf(),
                line: self.line + 1,
                source,
            }),
            None => Ok(None),
        }
    }

    /// Next non-empty logical line, or `None` at end of file
    pub fn next_logical(&mut self) -> Result<Option<LogicalLine>, Error> {
        loop {
            let raw = match self.next_physical()? {
                Some(raw) => raw,
                None => return Ok(None),
            };
            let (content, comment) = split_comment(&raw);
            if content.is_empty() {
                continue;
            }

            let number = self.line;
            let mut content = content.to_owned();
            let comment = comment.to_owned();
            if has_unquoted_paren(&content) {
                content = self.join_parenthesized(content, number)?;
            }

            return Ok(Some(LogicalLine {
                number,
                raw,
                content,
                comment,
            }));
        }
    }

    /// Appends following lines until every unquoted `(` is closed
    fn join_parenthesized(&mut self, first: String, number: usize) -> Result<String, Error> {
        trace!("handling multi-line record starting at line {}", number);

        let (mut open, mut close) = count_parens(&first);
        let mut joined = first;
        while open > close {
            let next = match self.next_physical()? {
                Some(next) => next,
                None => {
                    return Err(Error::Syntax {
                        path: self.path.to_path_buf(),
                        line: number,
                        kind: SyntaxError::UnbalancedParens(joined),
                    })
                }
            };
            let (next, _) = split_comment(&next);
            if next.is_empty() {
                continue;
            }
            trace!("adding line {} to multi-line record: {}", self.line, next);

            // adjacent quoted strings are glued together
            if !(joined.ends_with('"') && next.starts_with('"')) {
                joined.push(' ');
            }
            joined.push_str(next);

            let (o, c) = count_parens(next);
            open += o;
            close += c;
        }

        trace!("multi-line record result: {}", joined);
        Ok(joined)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    fn logical_lines(input: &str) -> Vec<LogicalLine> {
        let path = Path::new("test.zone");
        let mut reader = LineReader::new(Cursor::new(input.as_bytes()), path);
        let mut out = Vec::new();
        while let Some(line) = reader.next_logical().unwrap() {
            out.push(line);
        }
        out
    }

    #[test]
    fn tokenize_keeps_quoted_text_together() {
        assert_eq!(tokenize("simple text"), vec!["simple", "text"]);
        assert_eq!(
            tokenize(r#""quoted with spaces" another "quoted string""#),
            vec![r#""quoted with spaces""#, "another", r#""quoted string""#]
        );
        assert_eq!(
            tokenize(r#""quoted;with;semicolons" unquoted;comment"#),
            vec![r#""quoted;with;semicolons""#, "unquoted;comment"]
        );
        assert_eq!(
            tokenize(r#""empty quotes" "" more"#),
            vec![r#""empty quotes""#, r#""""#, "more"]
        );
    }

    #[test]
    fn tokenize_collapses_whitespace() {
        assert_eq!(tokenize("  multiple \t  spaces  "), vec!["multiple", "spaces"]);
        assert_eq!(tokenize(r#""a   b""#), vec![r#""a b""#]);
        assert_eq!(tokenize(r#""trailing ""#), vec![r#""trailing ""#]);
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \t ").is_empty());
    }

    #[test]
    fn tokenize_unbalanced_quote_runs_to_end() {
        assert_eq!(tokenize(r#"a "b c"#), vec!["a", r#""b c"#]);
    }

    #[test]
    fn comment_outside_quotes() {
        assert_eq!(split_comment("line with ; comment"), ("line with", "comment"));
        assert_eq!(
            split_comment(r#"text "quoted ; text" more ; comment"#),
            (r#"text "quoted ; text" more"#, "comment")
        );
        assert_eq!(split_comment("; just a comment"), ("", "just a comment"));
        assert_eq!(
            split_comment(r#""all ; quoted ; text""#),
            (r#""all ; quoted ; text""#, "")
        );
        assert_eq!(find_comment_start(r#""quoted ; text" ; comment"#), Some(16));
        assert_eq!(find_comment_start("no comment"), None);
    }

    #[test]
    fn parens_inside_quotes_do_not_count() {
        assert!(!has_unquoted_paren(r#""quoted (parentheses)" outside"#));
        assert!(has_unquoted_paren(r#"before "quoted (text)" after (unquoted)"#));
        assert!(has_unquoted_paren(")"));
        assert_eq!(count_parens(r#"( "(" ) )"#), (1, 2));
    }

    #[test]
    fn numeric_tokens() {
        assert!(is_numeric("0"));
        assert!(is_numeric("4294967295"));
        assert!(!is_numeric("4294967296"));
        assert!(!is_numeric("+5"));
        assert!(!is_numeric("-123"));
        assert!(!is_numeric("12.34"));
        assert!(!is_numeric(""));
        assert_eq!(parse_decimal::<u8>("255"), Some(255));
        assert_eq!(parse_decimal::<u8>("256"), None);
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        let lines = logical_lines("\n; comment\n   \nwww IN A 10.0.0.1 ; inaddr\n");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].number, 4);
        assert_eq!(lines[0].content, "www IN A 10.0.0.1");
        assert_eq!(lines[0].comment, "inaddr");
    }

    #[test]
    fn multi_line_record_is_joined() {
        let input = "@ IN SOA ns1 admin ( ; first\n\
                     \t2023010101 ; Serial\n\
                     \n\
                     \t; only a comment\n\
                     \t3600 )\n\
                     next IN A 10.0.0.1\n";
        let lines = logical_lines(input);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].content, "@ IN SOA ns1 admin ( 2023010101 3600 )");
        assert_eq!(lines[0].comment, "first");
        assert_eq!(lines[1].number, 6);
    }

    #[test]
    fn adjacent_quoted_segments_are_glued() {
        let input = "test\tIN\tTXT\t( \"first part \"\n\t\t\"second part\"\n\t\t\"third part\" )\n";
        let lines = logical_lines(input);
        assert_eq!(
            lines[0].content,
            "test\tIN\tTXT\t( \"first part \"\"second part\"\"third part\" )"
        );
    }

    #[test]
    fn unterminated_parens_are_an_error() {
        let path = Path::new("test.zone");
        let mut reader = LineReader::new(Cursor::new(&b"@ IN SOA ns1 admin (\n1\n"[..]), path);
        match reader.next_logical() {
            Err(Error::Syntax { line, kind, .. }) => {
                assert_eq!(line, 1);
                assert!(matches!(kind, SyntaxError::UnbalancedParens(_)));
            }
            other => panic!("expected unbalanced parens, got {:?}", other),
        }
    }

    #[test]
    fn blank_owner_detection() {
        let lines = logical_lines("\tIN A 10.0.0.1\nwww IN A 10.0.0.2\n");
        assert!(lines[0].starts_blank());
        assert!(!lines[1].starts_blank());
    }

    #[test]
    fn invalid_utf8_reports_its_line() {
        let path = Path::new("test.zone");
        let input = &b"www IN A 10.0.0.1\nbad IN TXT \"\xff\xfe\"\n"[..];
        let mut reader = LineReader::new(Cursor::new(input), path);
        assert!(reader.next_logical().unwrap().is_some());
        match reader.next_logical() {
            Err(Error::Read { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected read error, got {:?}", other),
        }
    }
}
