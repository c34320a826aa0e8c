//! Manifest codec
//!
//! The manifest is a whitespace-separated, quote-aware record file. Each
//! record has 1 to 4 fields:
//!
//! | fields | meaning                                               |
//! |--------|-------------------------------------------------------|
//! | 1      | sets the current branch for the records that follow   |
//! | 2      | `rel remote` on the current branch                    |
//! | 3      | `rel remote branch` (deprecated)                      |
//! | 4      | `kind rel remote branch`, kind ignored (deprecated)   |
//!
//! Fields may be quoted with `"`; a doubled `""` inside a quoted field is a
//! literal quote and quoted fields may span lines. Lines whose first
//! non-blank character is `#` are comments.

use std::iter::Peekable;
use std::str::Chars;

use tracing::warn;

use crate::error::{Error, Result};
use crate::record::{Record, RecordSet};

/// Branch in effect before the first branch line.
pub const DEFAULT_BRANCH: &str = "master";

/// One raw record: its fields and the line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RawRecord {
    line: usize,
    fields: Vec<String>,
}

/// Parse manifest text into records.
pub fn parse(text: &str) -> Result<RecordSet> {
    let mut branch = DEFAULT_BRANCH.to_string();
    let mut records = RecordSet::new();

    for (index, raw) in read_records(text)?.into_iter().enumerate() {
        match raw.fields.as_slice() {
            [name] => branch = name.clone(),
            [rel, remote] => records.push(Record::new(rel, remote, &branch)),
            [rel, remote, explicit] => {
                warn!(
                    line = raw.line,
                    "Manifest record with an explicit branch is deprecated, use a branch line instead"
                );
                records.push(Record::new(rel, remote, explicit));
            }
            [_kind, rel, remote, explicit] => {
                warn!(
                    line = raw.line,
                    "Manifest record with a kind field is deprecated, the kind is ignored"
                );
                records.push(Record::new(rel, remote, explicit));
            }
            fields => {
                return Err(Error::ManifestParse {
                    record: index + 1,
                    line: raw.line,
                    fields: fields.len(),
                });
            }
        }
    }

    Ok(records)
}

/// Render records in canonical form.
///
/// Records are sorted by branch then path. A branch line is written whenever
/// the branch differs from the previous record's, starting from
/// [`DEFAULT_BRANCH`]. Every field is quoted.
pub fn serialize(records: &[Record]) -> String {
    let mut sorted = records.to_vec();
    sorted.sort();

    let mut out = String::new();
    let mut previous = DEFAULT_BRANCH;
    for record in &sorted {
        if record.branch() != previous {
            out.push_str(&quote(record.branch()));
            out.push('\n');
        }
        out.push_str(&quote(record.rel()));
        out.push(' ');
        out.push_str(&quote(record.remote()));
        out.push('\n');
        previous = record.branch();
    }
    out
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r')
}

fn skip_blanks(chars: &mut Peekable<Chars<'_>>) {
    while chars.next_if(|c| is_blank(*c)).is_some() {}
}

fn read_records(text: &str) -> Result<Vec<RawRecord>> {
    let mut chars = text.chars().peekable();
    let mut line = 1;
    let mut records = Vec::new();

    while chars.peek().is_some() {
        let start = line;
        skip_blanks(&mut chars);

        if chars.next_if_eq(&'#').is_some() {
            for c in chars.by_ref() {
                if c == '\n' {
                    line += 1;
                    break;
                }
            }
            continue;
        }

        let mut fields = Vec::new();
        loop {
            skip_blanks(&mut chars);
            match chars.peek() {
                None => break,
                Some('\n') => {
                    chars.next();
                    line += 1;
                    break;
                }
                Some('"') => {
                    chars.next();
                    let opened = line;
                    fields.push(read_quoted(&mut chars, &mut line, opened)?);
                    match chars.peek() {
                        None => {}
                        Some(c) if is_blank(*c) || *c == '\n' => {}
                        Some(_) => return Err(Error::ExtraneousQuote { line }),
                    }
                }
                Some(_) => fields.push(read_bare(&mut chars, line)?),
            }
        }

        if !fields.is_empty() {
            records.push(RawRecord {
                line: start,
                fields,
            });
        }
    }

    Ok(records)
}

fn read_quoted(chars: &mut Peekable<Chars<'_>>, line: &mut usize, opened: usize) -> Result<String> {
    let mut field = String::new();
    loop {
        match chars.next() {
            None => return Err(Error::UnterminatedQuote { line: opened }),
            Some('"') => {
                if chars.next_if_eq(&'"').is_some() {
                    field.push('"');
                } else {
                    return Ok(field);
                }
            }
            Some('\n') => {
                *line += 1;
                field.push('\n');
            }
            Some(c) => field.push(c),
        }
    }
}

fn read_bare(chars: &mut Peekable<Chars<'_>>, line: usize) -> Result<String> {
    let mut field = String::new();
    while let Some(&c) = chars.peek() {
        if is_blank(c) || c == '\n' {
            break;
        }
        if c == '"' {
            return Err(Error::BareQuote { line });
        }
        field.push(c);
        chars.next();
    }
    Ok(field)
}
