//! Source-to-output mapping
//!
//! While the visitor translates a syntax node it keeps a `MappingScope` open.
//! Opening the scope captures where the node starts in the source and which
//! output line comes next; closing it captures the end of both and commits a
//! `Mapping`. After a full traversal the `MappingList` pairs every visited
//! construct with the generated lines it produced, which lets tooling map a
//! failure in the generated program back to the original source.
//!
//! Scopes nest with the visitor's call stack. Each scope commits its own
//! record; records are kept in the order their scopes were opened, so a
//! parent always precedes its children.

use crate::output::OutputLineCounter;
use cecilifier_syntax::{Position, Span, SyntaxNode};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use tracing::{debug, warn};

/// Source side of a mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceBlock {
    pub begin: Position,
    pub end: Position,
}

impl SourceBlock {
    pub fn span(&self) -> Span {
        Span::new(self.begin, self.end)
    }
}

/// A generated output line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutputLine {
    pub line: u32,
}

/// Output side of a mapping: `begin` inclusive, `end` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputBlock {
    pub begin: OutputLine,
    pub end: OutputLine,
}

impl OutputBlock {
    /// Number of output lines generated for the construct
    pub fn length(&self) -> u32 {
        self.end.line.saturating_sub(self.begin.line)
    }

    pub fn contains(&self, line: u32) -> bool {
        self.begin.line <= line && line < self.end.line
    }
}

/// One visited source construct and the output lines it produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    pub source: SourceBlock,
    #[serde(rename = "output", alias = "cecilified")]
    pub cecilified: OutputBlock,
}

/// Ordered, append-only list of mappings of one translation run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingList {
    records: Vec<Mapping>,
    // open order of each record, parallel to `records`
    sequence: Vec<u64>,
}

impl MappingList {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, order: u64, mapping: Mapping) {
        let index = self.sequence.partition_point(|&seq| seq < order);
        self.sequence.insert(index, order);
        self.records.insert(index, mapping);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mapping> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[Mapping] {
        &self.records
    }

    /// The narrowest mapping whose output range contains `line`
    pub fn find_by_output_line(&self, line: u32) -> Option<&Mapping> {
        self.records
            .iter()
            .rev()
            .filter(|m| m.cecilified.contains(line))
            .min_by_key(|m| m.cecilified.length())
    }

    /// Every mapping whose source span covers `line`, outermost first
    pub fn find_by_source_line(&self, line: u32) -> Vec<&Mapping> {
        self.records
            .iter()
            .filter(|m| m.source.span().covers_line(line))
            .collect()
    }

    /// Serialized form handed to debugging tools
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.records)
    }

    /// Parse a list written by `to_json`; blocks that end before they begin are rejected
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let records: Vec<Mapping> = serde_json::from_str(json)?;
        for (index, mapping) in records.iter().enumerate() {
            if mapping.source.end < mapping.source.begin {
                return Err(serde::de::Error::custom(format!(
                    "mapping {}: source block ends at {} before it begins at {}",
                    index, mapping.source.end, mapping.source.begin
                )));
            }
            if mapping.cecilified.end < mapping.cecilified.begin {
                return Err(serde::de::Error::custom(format!(
                    "mapping {}: output block ends at line {} before it begins at line {}",
                    index, mapping.cecilified.end.line, mapping.cecilified.begin.line
                )));
            }
        }
        let sequence = (0..records.len() as u64).collect();
        Ok(Self { records, sequence })
    }
}

impl<'a> IntoIterator for &'a MappingList {
    type Item = &'a Mapping;
    type IntoIter = std::slice::Iter<'a, Mapping>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Records mappings for the nodes visited during one run
#[derive(Debug)]
pub struct MappingTracker {
    enabled: bool,
    mappings: RefCell<MappingList>,
    opened: Cell<u64>,
    depth: Cell<usize>,
}

impl MappingTracker {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            mappings: RefCell::new(MappingList::new()),
            opened: Cell::new(0),
            depth: Cell::new(0),
        }
    }

    /// Start tracking `node`; the returned scope commits the mapping when closed
    pub fn begin_scope<'a>(
        &'a self,
        node: &'a dyn SyntaxNode,
        output: &'a dyn OutputLineCounter,
    ) -> MappingScope<'a> {
        let order = self.opened.get();
        self.opened.set(order + 1);
        self.depth.set(self.depth.get() + 1);

        MappingScope {
            tracker: self,
            node,
            output,
            order,
            source_begin: node.span().start,
            output_begin: output.current_line(),
            closed: false,
        }
    }

    /// Number of scopes currently open
    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Snapshot of the records committed so far
    pub fn mappings(&self) -> MappingList {
        self.mappings.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.mappings.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.borrow().is_empty()
    }

    /// Hand over the finished list, leaving the tracker empty
    pub fn take_mappings(&self) -> MappingList {
        self.mappings.take()
    }

    fn commit(&self, order: u64, mapping: Mapping, kind: &str) {
        self.depth.set(self.depth.get().saturating_sub(1));
        if !self.enabled {
            return;
        }
        debug!(
            kind,
            source_begin = %mapping.source.begin,
            source_end = %mapping.source.end,
            output_begin = mapping.cecilified.begin.line,
            output_end = mapping.cecilified.end.line,
            "mapping committed"
        );
        self.mappings.borrow_mut().insert(order, mapping);
    }
}

impl Default for MappingTracker {
    fn default() -> Self {
        Self::new(true)
    }
}

/// An open mapping for one node
///
/// Call `close` when the node has been translated. A scope dropped without
/// `close` (early return, unwinding) commits its mapping on drop, so every
/// opened scope produces exactly one record.
#[must_use = "a mapping scope records its node when it is closed"]
pub struct MappingScope<'a> {
    tracker: &'a MappingTracker,
    node: &'a dyn SyntaxNode,
    output: &'a dyn OutputLineCounter,
    order: u64,
    source_begin: Position,
    output_begin: u32,
    closed: bool,
}

impl MappingScope<'_> {
    pub fn close(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        let output_end = self.output.current_line().max(self.output_begin);
        let mapping = Mapping {
            source: SourceBlock {
                begin: self.source_begin,
                end: self.node.span().end,
            },
            cecilified: OutputBlock {
                begin: OutputLine { line: self.output_begin },
                end: OutputLine { line: output_end },
            },
        };
        self.tracker.commit(self.order, mapping, self.node.kind_name());
    }
}

impl Drop for MappingScope<'_> {
    fn drop(&mut self) {
        if !self.closed {
            warn!(kind = self.node.kind_name(), "mapping scope released without close");
            self.finish();
        }
    }
}
