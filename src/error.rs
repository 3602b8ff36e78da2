use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error in a single logical line of a zone file
#[derive(Debug, Error)]
pub enum SyntaxError {
    #[error("incomplete directive: {0}")]
    IncompleteDirective(String),
    #[error("unknown directive: {0}")]
    UnknownDirective(String),
    #[error("invalid TTL value: {0}")]
    InvalidTtl(String),
    #[error("invalid $GENERATE directive: {0}")]
    InvalidGenerate(String),
    #[error("incomplete record: {0}")]
    IncompleteRecord(String),
    #[error("no previous hostname for record: {0}")]
    NoPreviousOwner(String),
    #[error("invalid or missing record type in: {0}")]
    MissingType(String),
    #[error("{rtype} record requires {expected} field(s), got {found}")]
    MissingFields {
        rtype: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("invalid {rtype} {field}: {value}")]
    InvalidNumber {
        rtype: &'static str,
        field: &'static str,
        value: String,
    },
    #[error("invalid A record address: {0}")]
    InvalidIpv4(String),
    #[error("invalid AAAA record address: {0}")]
    InvalidIpv6(String),
    #[error("unbalanced parentheses in record starting with: {0}")]
    UnbalancedParens(String),
}

/// Error parsing a zone file
///
/// Every variant names the file it happened in. Failures inside an included
/// file are wrapped in `Include`, one level per `$INCLUDE`, so the chain of
/// sources leads from the top-level file down to the faulty line.
#[derive(Debug, Error)]
pub enum Error {
    #[error("error opening file {}", .path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("{}:{line}: error reading file", .path.display())]
    Read {
        path: PathBuf,
        line: usize,
        source: io::Error,
    },
    #[error("{}:{line}: {kind}", .path.display())]
    Syntax {
        path: PathBuf,
        line: usize,
        kind: SyntaxError,
    },
    #[error("{}:{line}: error parsing included file", .path.display())]
    Include {
        path: PathBuf,
        line: usize,
        source: Box<Error>,
    },
    #[error("{}:{line}: $INCLUDE nested deeper than {limit} levels", .path.display())]
    IncludeDepth {
        path: PathBuf,
        line: usize,
        limit: usize,
    },
    #[error("no $ORIGIN directive found in {}", .path.display())]
    MissingOrigin { path: PathBuf },
}

impl Error {
    /// Line number the error points at, if it is tied to a line
    pub fn line(&self) -> Option<usize> {
        match *self {
            Error::Read { line, .. }
            | Error::Syntax { line, .. }
            | Error::Include { line, .. }
            | Error::IncludeDepth { line, .. } => Some(line),
            _ => None,
        }
    }

    /// The innermost error, following `$INCLUDE` wrapping
    pub fn root(&self) -> &Error {
        match *self {
            Error::Include { ref source, .. } => source.root(),
            ref other => other,
        }
    }
}
