//! Parser for BIND-style DNS zone files
//!
//! A zone file is read top to bottom, following `$INCLUDE` directives into
//! other files, and turned into an ordered list of [`ZoneEntry`] values:
//! one per hostname with all of its records, plus the `$TTL`, `$ORIGIN`,
//! `$INCLUDE` and `$GENERATE` directives in the order they appeared.
//!
//! ```no_run
//! let zone = zoneparser::parse("db.example.com")?;
//! println!("origin {} ttl {}", zone.metadata.origin, zone.metadata.ttl);
//! for host in zone.hosts() {
//!     for a in &host.records.a {
//!         println!("{} -> {}", host.hostname, a.address);
//!     }
//! }
//! # Ok::<(), zoneparser::Error>(())
//! ```
//!
//! Parsing is fail-fast. The first malformed line, unreadable file or
//! missing `$ORIGIN` aborts the whole parse with an [`Error`] that names the
//! file and line.
//!
//! [`ZoneEntry`]: struct.ZoneEntry.html
//! [`Error`]: enum.Error.html

use std::path::PathBuf;

mod error;
mod format;
pub mod generate;
pub mod lexer;
pub mod name;
mod parser;
mod rrdata;
mod structs;

pub use crate::error::{Error, SyntaxError};
pub use crate::generate::{substitute, GenerateRange};
pub use crate::parser::{Parser, DEFAULT_MAX_INCLUDE_DEPTH, DEFAULT_TTL};
pub use crate::rrdata::{class_from_token, RRData, RecordType, CLASSES, CLASS_IN};
pub use crate::structs::*;

/// Parses a zone file with the default settings
pub fn parse<P: Into<PathBuf>>(path: P) -> Result<Zone, Error> {
    Parser::new(path).parse()
}
