use std::{error::Error, fmt, str::FromStr};

use dependencies::hex;

use super::announcement::AnnouncementChannel;
use super::update::UpdateChannel;

pub const DELIMITER: char = ',';

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum RecordKind {
    Announcement,
    Update,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RecordKind::Announcement => write!(f, "channel announcement"),
            RecordKind::Update => write!(f, "channel update"),
        }
    }
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Record {
    Announcement(AnnouncementChannel),
    Update(UpdateChannel),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Announcement(_) => RecordKind::Announcement,
            Record::Update(_) => RecordKind::Update,
        }
    }
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum DecodeError {
    FieldCountMismatch {
        expected: usize,
        found: usize,
    },
    /// zero-based index of the field that failed to parse
    FieldParseError(usize),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DecodeError::FieldCountMismatch { expected, found } => {
                write!(f, "expected {} fields, found {}", expected, found)
            },
            DecodeError::FieldParseError(index) => {
                write!(f, "cannot parse field #{}", index)
            },
        }
    }
}

impl Error for DecodeError {}

/// Decodes one dump line into a record of the requested kind.
pub fn decode(kind: RecordKind, line: &str) -> Result<Record, DecodeError> {
    match kind {
        RecordKind::Announcement => AnnouncementChannel::decode(line).map(Record::Announcement),
        RecordKind::Update => UpdateChannel::decode(line).map(Record::Update),
    }
}

// There is no quoting in the dumps, a comma always separates fields.
pub(crate) fn split_fields(line: &str, expected: usize) -> Result<Vec<&str>, DecodeError> {
    let line = line.trim_end_matches(|c: char| c == '\r' || c == '\n');
    let fields = line.split(DELIMITER).collect::<Vec<_>>();
    if fields.len() != expected {
        return Err(DecodeError::FieldCountMismatch {
            expected,
            found: fields.len(),
        });
    }
    Ok(fields)
}

pub(crate) fn parse_field<T>(fields: &[&str], index: usize) -> Result<T, DecodeError>
where
    T: FromStr,
{
    fields[index]
        .trim()
        .parse()
        .map_err(|_| DecodeError::FieldParseError(index))
}

pub(crate) fn hex_field(fields: &[&str], index: usize) -> Result<(), DecodeError> {
    match hex::decode(fields[index]) {
        Ok(ref bytes) if !bytes.is_empty() => Ok(()),
        _ => Err(DecodeError::FieldParseError(index)),
    }
}

pub(crate) fn non_empty_field(fields: &[&str], index: usize) -> Result<(), DecodeError> {
    if fields[index].trim().is_empty() {
        Err(DecodeError::FieldParseError(index))
    } else {
        Ok(())
    }
}
