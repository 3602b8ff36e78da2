use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use log::{debug, trace, warn};

use crate::error::{Error, SyntaxError};
use crate::generate::GenerateRange;
use crate::lexer::{is_numeric, parse_decimal, strip_quotes, tokenize, LineReader, LogicalLine};
use crate::name::{absolute, qualify};
use crate::rrdata::{class_from_token, RRData, RecordType, CLASS_IN};
use crate::structs::*;

/// TTL in force until the first `$TTL` directive
pub const DEFAULT_TTL: u32 = 86400;

/// How deep `$INCLUDE` directives may nest by default
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 16;

/// Zone file parser
///
/// Holds the configuration only. Each call to [`parse`](#method.parse)
/// works on its own state, so a parser can be reused and shared.
#[derive(Debug, Clone)]
pub struct Parser {
    path: PathBuf,
    default_ttl: u32,
    max_include_depth: usize,
}

impl Parser {
    pub fn new<P: Into<PathBuf>>(path: P) -> Parser {
        Parser {
            path: path.into(),
            default_ttl: DEFAULT_TTL,
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
        }
    }

    pub fn with_default_ttl(mut self, ttl: u32) -> Parser {
        self.default_ttl = ttl;
        self
    }

    pub fn with_max_include_depth(mut self, depth: usize) -> Parser {
        self.max_include_depth = depth;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parses the zone file and everything it includes
    ///
    /// Fails on the first error. The top-level file, or one of its includes,
    /// must declare an `$ORIGIN`.
    pub fn parse(&self) -> Result<Zone, Error> {
        let mut state = State::new(self);
        state.parse_file(&self.path, 0)?;
        if !state.origin_found {
            return Err(Error::MissingOrigin {
                path: self.path.clone(),
            });
        }
        Ok(state.finish())
    }
}

/// Mutable state of one parse
struct State<'p> {
    parser: &'p Parser,
    origin: String,
    ttl: u32,
    origin_found: bool,
    warned_no_origin: bool,
    entries: Vec<ZoneEntry>,
    hosts: HashMap<String, usize>,
}

impl<'p> State<'p> {
    fn new(parser: &'p Parser) -> State<'p> {
        State {
            parser,
            origin: String::new(),
            ttl: parser.default_ttl,
            origin_found: false,
            warned_no_origin: false,
            entries: Vec::new(),
            hosts: HashMap::new(),
        }
    }

    fn finish(self) -> Zone {
        let metadata = ZoneMetadata {
            origin: self.origin,
            ttl: self.ttl,
        };
        Zone::new(self.entries, metadata, self.hosts)
    }

    fn parse_file(&mut self, path: &Path, depth: usize) -> Result<(), Error> {
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = LineReader::new(BufReader::new(file), path);
        // owner of the previous record in this file, as written
        let mut owner: Option<String> = None;

        debug!("starting to parse file: {}", path.display());

        while let Some(line) = reader.next_logical()? {
            trace!("processing line {}: {}", line.number, line.content);

            if line.content.starts_with('$') {
                self.directive(&line, path, depth)?;
            } else {
                self.record(&line, path, &mut owner)
                    .map_err(|kind| Error::Syntax {
                        path: path.to_path_buf(),
                        line: line.number,
                        kind,
                    })?;
            }
        }

        debug!("finished parsing file: {}", path.display());
        Ok(())
    }

    fn push(&mut self, kind: EntryKind, line: &LogicalLine, path: &Path) {
        self.entries.push(ZoneEntry {
            kind,
            raw_line: line.raw.clone(),
            source_file: path.to_path_buf(),
        });
    }

    fn directive(&mut self, line: &LogicalLine, path: &Path, depth: usize) -> Result<(), Error> {
        let syntax = |kind| Error::Syntax {
            path: path.to_path_buf(),
            line: line.number,
            kind,
        };

        let tokens = tokenize(&line.content);
        if tokens.len() < 2 {
            return Err(syntax(SyntaxError::IncompleteDirective(
                line.content.clone(),
            )));
        }
        debug!("handling directive: {}", line.content);

        match tokens[0].to_ascii_uppercase().as_str() {
            "$TTL" => {
                let ttl = parse_decimal::<u32>(&tokens[1])
                    .ok_or_else(|| syntax(SyntaxError::InvalidTtl(tokens[1].clone())))?;
                if tokens.len() > 2 {
                    warn!("{}:{}: ignoring extra $TTL arguments", path.display(), line.number);
                }
                self.ttl = ttl;
                self.push(EntryKind::Ttl(TtlDirective { value: ttl }), line, path);
            }
            "$ORIGIN" => {
                if tokens.len() > 2 {
                    warn!("{}:{}: ignoring extra $ORIGIN arguments", path.display(), line.number);
                }
                self.origin = absolute(&tokens[1]);
                self.origin_found = true;
                let domain = self.origin.clone();
                self.push(EntryKind::Origin(OriginDirective { domain }), line, path);
            }
            "$INCLUDE" => {
                if tokens.len() > 2 {
                    warn!("{}:{}: ignoring $INCLUDE origin argument", path.display(), line.number);
                }
                self.include(strip_quotes(&tokens[1]), line, path, depth)?;
            }
            "$GENERATE" => {
                let directive = self.generate(&tokens[1..], line).map_err(syntax)?;
                self.push(EntryKind::Generate(directive), line, path);
            }
            _ => {
                return Err(syntax(SyntaxError::UnknownDirective(tokens[0].clone())));
            }
        }

        Ok(())
    }

    fn include(
        &mut self,
        filename: &str,
        line: &LogicalLine,
        path: &Path,
        depth: usize,
    ) -> Result<(), Error> {
        if depth >= self.parser.max_include_depth {
            return Err(Error::IncludeDepth {
                path: path.to_path_buf(),
                line: line.number,
                limit: self.parser.max_include_depth,
            });
        }

        // relative to the including file, not the top-level one
        let target = Path::new(filename);
        let target = match path.parent() {
            Some(dir) if target.is_relative() => dir.join(target),
            _ => target.to_path_buf(),
        };
        debug!("including file: {}", target.display());

        let directive = IncludeDirective {
            filename: filename.to_owned(),
            path: target.clone(),
        };
        self.push(EntryKind::Include(directive), line, path);

        self.parse_file(&target, depth + 1)
            .map_err(|source| Error::Include {
                path: path.to_path_buf(),
                line: line.number,
                source: Box::new(source),
            })
    }

    /// `range owner [ttl] [class] type rdata...`
    fn generate(
        &self,
        args: &[String],
        line: &LogicalLine,
    ) -> Result<GenerateDirective, SyntaxError> {
        if args.len() < 4 {
            return Err(SyntaxError::InvalidGenerate(line.content.clone()));
        }
        args[0].parse::<GenerateRange>()?;

        let mut ttl = None;
        let mut class = None;
        let mut idx = 2;
        while idx < args.len() {
            if ttl.is_none() && is_numeric(&args[idx]) {
                ttl = parse_decimal::<u32>(&args[idx]);
            } else if class.is_none() && class_from_token(&args[idx]).is_some() {
                class = class_from_token(&args[idx]);
            } else {
                break;
            }
            idx += 1;
        }
        if args.len() < idx + 2 {
            return Err(SyntaxError::InvalidGenerate(line.content.clone()));
        }

        let rdata = args[idx + 1..]
            .iter()
            .map(|part| strip_quotes(part))
            .collect::<Vec<_>>()
            .join(" ");

        Ok(GenerateDirective {
            range: args[0].clone(),
            owner: args[1].clone(),
            rtype: args[idx].clone(),
            rdata,
            ttl: ttl.unwrap_or(self.ttl),
            class: class.unwrap_or(CLASS_IN).to_owned(),
            origin: self.origin.clone(),
        })
    }

    /// `[owner] [ttl] [class] type data...`
    fn record(
        &mut self,
        line: &LogicalLine,
        path: &Path,
        owner: &mut Option<String>,
    ) -> Result<(), SyntaxError> {
        let tokens = tokenize(&line.content);
        if tokens.len() < 2 {
            return Err(SyntaxError::IncompleteRecord(line.content.clone()));
        }

        // An indented line that opens with a ttl, class or type belongs to
        // the previous owner.
        let first = &tokens[0];
        let inherits = line.starts_blank()
            && (is_numeric(first)
                || class_from_token(first).is_some()
                || RecordType::from_token(first).is_some());
        let (hostname, rest) = if inherits {
            let previous = owner
                .clone()
                .ok_or_else(|| SyntaxError::NoPreviousOwner(line.content.clone()))?;
            (previous, &tokens[..])
        } else {
            *owner = Some(first.clone());
            (first.clone(), &tokens[1..])
        };

        let mut ttl = None;
        let mut class = None;
        let mut idx = 0;
        while idx < rest.len() {
            if ttl.is_none() && is_numeric(&rest[idx]) {
                ttl = parse_decimal::<u32>(&rest[idx]);
            } else if class.is_none() && class_from_token(&rest[idx]).is_some() {
                class = class_from_token(&rest[idx]);
            } else {
                break;
            }
            idx += 1;
        }

        let rtype = rest
            .get(idx)
            .and_then(|token| RecordType::from_token(token))
            .ok_or_else(|| SyntaxError::MissingType(line.content.clone()))?;
        let data = &rest[idx + 1..];

        if !self.origin_found && !self.warned_no_origin {
            warn!(
                "{}:{}: record before any $ORIGIN directive",
                path.display(),
                line.number
            );
            self.warned_no_origin = true;
        }

        let hostname = qualify(&hostname, &self.origin);
        let rr = ResourceRecord::new(ttl.unwrap_or(self.ttl), class.unwrap_or(CLASS_IN));
        let rdata = RRData::parse(rtype, rr, data, &line.comment, &self.origin)?;
        trace!("parsed record: hostname={}, {:?}", hostname, rdata);

        self.add_record(hostname, rdata, line, path);
        Ok(())
    }

    /// Appends to the host's entry, creating it on first sight
    fn add_record(&mut self, hostname: String, rdata: RRData, line: &LogicalLine, path: &Path) {
        let idx = match self.hosts.get(&hostname) {
            Some(&idx) => idx,
            None => {
                let idx = self.entries.len();
                let host = HostRecord::new(hostname.clone());
                self.push(EntryKind::Record(host), line, path);
                self.hosts.insert(hostname, idx);
                idx
            }
        };
        if let Some(host) = self.entries[idx].host_record_mut() {
            host.records.push(rdata);
        }
    }
}
