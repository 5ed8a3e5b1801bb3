//! Instruction trace loading.
//!
//! This module reads the instruction files the simulator replays. It provides:
//! 1. **Line parsing:** `<op> <hex address>` with `op` being `R` or `W`.
//! 2. **Streaming:** `TraceReader` yields operations lazily from any `BufRead`.
//! 3. **File loading:** `open` wraps a file in a buffered reader.
//!
//! Blank lines and lines starting with `#` are skipped. The address may carry
//! a `0x` prefix and is masked to the virtual width only when replayed.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use crate::common::{AccessType, TraceError, VirtAddr};

/// One replayed instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceOp {
    /// Access direction.
    pub op: AccessType,
    /// Unmasked virtual address.
    pub addr: VirtAddr,
}

impl TraceOp {
    /// A read of `addr`.
    pub const fn read(addr: u64) -> Self {
        Self {
            op: AccessType::Read,
            addr: VirtAddr::new(addr),
        }
    }

    /// A write of `addr`.
    pub const fn write(addr: u64) -> Self {
        Self {
            op: AccessType::Write,
            addr: VirtAddr::new(addr),
        }
    }
}

impl FromStr for TraceOp {
    type Err = TraceError;

    /// Parses a single non-empty line; errors report line 1.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_line(s, 1)?.ok_or_else(|| TraceError::Malformed {
            line: 1,
            text: s.trim().to_owned(),
        })
    }
}

/// Parses one trace line.
///
/// # Arguments
///
/// * `line` - Raw line text.
/// * `line_no` - 1-based line number for error reports.
///
/// # Returns
///
/// `Ok(None)` for blank and comment lines.
///
/// # Errors
///
/// [`TraceError::Malformed`], [`TraceError::UnknownOperation`], or
/// [`TraceError::BadAddress`] describing the first problem found.
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<TraceOp>, TraceError> {
    let text = line.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }

    let mut chars = text.chars();
    let Some(op_char) = chars.next() else {
        return Ok(None);
    };
    let rest = chars.as_str().trim();
    if rest.is_empty() || rest.contains(char::is_whitespace) {
        return Err(TraceError::Malformed {
            line: line_no,
            text: text.to_owned(),
        });
    }

    let op = match op_char {
        'R' | 'r' => AccessType::Read,
        'W' | 'w' => AccessType::Write,
        other => {
            return Err(TraceError::UnknownOperation {
                line: line_no,
                op: other.to_string(),
            });
        }
    };

    let digits = rest
        .strip_prefix("0x")
        .or_else(|| rest.strip_prefix("0X"))
        .unwrap_or(rest);
    let addr = u64::from_str_radix(digits, 16).map_err(|_| TraceError::BadAddress {
        line: line_no,
        text: rest.to_owned(),
    })?;

    Ok(Some(TraceOp {
        op,
        addr: VirtAddr::new(addr),
    }))
}

/// Lazy iterator over the operations of a trace.
#[derive(Debug)]
pub struct TraceReader<R> {
    reader: R,
    line_no: usize,
    buf: String,
}

impl<R: BufRead> TraceReader<R> {
    /// Wraps a buffered reader.
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            buf: String::new(),
        }
    }

    /// Lines consumed so far, including skipped ones.
    pub const fn lines_read(&self) -> usize {
        self.line_no
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceOp, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(err) => return Some(Err(err.into())),
            }
            self.line_no += 1;
            match parse_line(&self.buf, self.line_no) {
                Ok(Some(op)) => return Some(Ok(op)),
                Ok(None) => {}
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

/// Opens a trace file for streaming.
///
/// # Errors
///
/// [`TraceError::Io`] if the file cannot be opened.
pub fn open(path: impl AsRef<Path>) -> Result<TraceReader<BufReader<File>>, TraceError> {
    let file = File::open(path)?;
    Ok(TraceReader::new(BufReader::new(file)))
}

/// Parses a whole in-memory trace.
///
/// # Errors
///
/// The first [`TraceError`] encountered.
pub fn parse_str(text: &str) -> Result<Vec<TraceOp>, TraceError> {
    TraceReader::new(text.as_bytes()).collect()
}
