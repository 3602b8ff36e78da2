//! `$GENERATE` helpers
//!
//! The parser only captures `$GENERATE` directives. Expanding them into
//! owner/rdata pairs is left to consumers, which use the functions here.
//!
//! Templates support `$` for the iterator value, `${offset[,width[,base]]}`
//! with base `d`, `o`, `x` or `X`, and `\$` for a literal dollar sign.

use std::fmt;
use std::str::FromStr;

use crate::error::SyntaxError;
use crate::structs::GenerateDirective;

/// Iteration range of a `$GENERATE` directive, `start-stop[/step]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateRange {
    pub start: u32,
    pub stop: u32,
    pub step: u32,
}

impl GenerateRange {
    pub fn iter(&self) -> impl Iterator<Item = u32> {
        (self.start..=self.stop).step_by(self.step as usize)
    }
}

impl FromStr for GenerateRange {
    type Err = SyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SyntaxError::InvalidGenerate(format!("invalid range {}", s));

        let (bounds, step) = match s.find('/') {
            Some(pos) => (&s[..pos], Some(&s[pos + 1..])),
            None => (s, None),
        };
        let dash = bounds.find('-').ok_or_else(invalid)?;
        let start = bounds[..dash].parse::<u32>().map_err(|_| invalid())?;
        let stop = bounds[dash + 1..].parse::<u32>().map_err(|_| invalid())?;
        let step = match step {
            Some(step) => step.parse::<u32>().map_err(|_| invalid())?,
            None => 1,
        };
        if step == 0 || start > stop {
            return Err(invalid());
        }

        Ok(GenerateRange { start, stop, step })
    }
}

impl fmt::Display for GenerateRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.stop)?;
        if self.step != 1 {
            write!(f, "/{}", self.step)?;
        }
        Ok(())
    }
}

/// Replaces the placeholders in `template` with `value`
pub fn substitute(template: &str, value: u32) -> Result<String, SyntaxError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'$') => {
                chars.next();
                out.push('$');
            }
            '$' if chars.peek() == Some(&'{') => {
                chars.next();
                let mut modifier = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) => modifier.push(c),
                        None => {
                            return Err(SyntaxError::InvalidGenerate(format!(
                                "unterminated modifier in {}",
                                template
                            )))
                        }
                    }
                }
                out.push_str(&apply_modifier(&modifier, value, template)?);
            }
            '$' => out.push_str(&value.to_string()),
            c => out.push(c),
        }
    }

    Ok(out)
}

fn apply_modifier(modifier: &str, value: u32, template: &str) -> Result<String, SyntaxError> {
    let invalid = || {
        SyntaxError::InvalidGenerate(format!("invalid modifier ${{{}}} in {}", modifier, template))
    };

    let mut parts = modifier.split(',');
    let offset = match parts.next() {
        Some("") | None => 0,
        Some(offset) => offset.parse::<i64>().map_err(|_| invalid())?,
    };
    let width = match parts.next() {
        Some(width) => width.parse::<usize>().map_err(|_| invalid())?,
        None => 0,
    };
    let base = parts.next().unwrap_or("d");
    if parts.next().is_some() {
        return Err(invalid());
    }

    let shifted = i64::from(value) + offset;
    if shifted < 0 {
        return Err(invalid());
    }
    let formatted = match base {
        "d" => format!("{:0width$}", shifted, width = width),
        "o" => format!("{:0width$o}", shifted, width = width),
        "x" => format!("{:0width$x}", shifted, width = width),
        "X" => format!("{:0width$X}", shifted, width = width),
        _ => return Err(invalid()),
    };
    Ok(formatted)
}

impl GenerateDirective {
    pub fn range(&self) -> Result<GenerateRange, SyntaxError> {
        self.range.parse()
    }

    /// Owner name and RDATA for every value of the range
    ///
    /// The owner names come back as written, relative names are not
    /// qualified with the directive's origin.
    pub fn expand(&self) -> Result<Vec<(String, String)>, SyntaxError> {
        self.range()?
            .iter()
            .map(|i| -> Result<(String, String), SyntaxError> {
                Ok((substitute(&self.owner, i)?, substitute(&self.rdata, i)?))
            })
            .collect()
    }
}
