//! Source positions and spans

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 1-based line/column position in the translated source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Source region covered by a syntax node, `start` inclusive and `end` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Span over `start_line:start_col .. end_line:end_col`
    pub fn from_coords(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            start: Position::new(start_line, start_col),
            end: Position::new(end_line, end_col),
        }
    }

    /// Whether `line` falls between the first and last line of the span
    pub fn covers_line(&self, line: u32) -> bool {
        self.start.line <= line && line <= self.end.line
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Anything the syntax visitor walks that has a location in the source
pub trait SyntaxNode {
    /// Location of the node in the source file
    fn span(&self) -> Span;

    /// Short description of the node kind, used in diagnostics and logs
    fn kind_name(&self) -> &'static str {
        "node"
    }
}

impl<T: SyntaxNode + ?Sized> SyntaxNode for &T {
    fn span(&self) -> Span {
        (**self).span()
    }

    fn kind_name(&self) -> &'static str {
        (**self).kind_name()
    }
}
