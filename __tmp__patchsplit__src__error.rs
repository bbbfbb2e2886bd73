//! Per-stage error types for the compiler pipeline.
//!
//! Each stage gets its own hand-rolled `Display + std::error::Error` type,
//! one error struct per subsystem rather than a single catch-all string
//! error.

use std::fmt::Display;
use std::io;

#[derive(Debug)]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "parse error on line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug)]
pub struct CompileError {
    pub message: String,
}

impl CompileError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "compile error: {}", self.message)
    }
}

impl std::error::Error for CompileError {}

/// Top-level error, unifying every stage so the driver can match on one type.
#[derive(Debug)]
pub enum JackError {
    Io(io::Error),
    Parse(ParseError),
    Compile(CompileError),
}

impl Display for JackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JackError::Io(err) => write!(f, "io error: {err}"),
            JackError::Parse(err) => write!(f, "{err}"),
            JackError::Compile(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for JackError {}

impl From<io::Error> for JackError {
    fn from(err: io::Error) -> Self {
        JackError::Io(err)
    }
}

impl From<ParseError> for JackError {
    fn from(err: ParseError) -> Self {
        JackError::Parse(err)
    }
}

impl From<CompileError> for JackError {
    fn from(err: CompileError) -> Self {
        JackError::Compile(err)
    }
}


