//! Statement emission and output line accounting

use std::cell::{Cell, RefCell};

/// Source of the "current output line" read by the mapping tracker
pub trait OutputLineCounter {
    /// Line number the next emitted statement will start on
    fn current_line(&self) -> u32;
}

/// Append-only sink for generated statements
///
/// Each statement advances the line counter by the number of text lines it
/// spans, so a multi-line `foreach` block counts every one of its lines.
#[derive(Debug)]
pub struct StatementWriter {
    statements: RefCell<Vec<String>>,
    next_line: Cell<u32>,
}

impl StatementWriter {
    pub fn new(first_line: u32) -> Self {
        Self {
            statements: RefCell::new(Vec::new()),
            next_line: Cell::new(first_line),
        }
    }

    /// Emit one statement
    pub fn write(&self, statement: impl Into<String>) {
        let mut statement = statement.into();
        statement.truncate(statement.trim_end_matches('\n').len());
        let lines = statement.lines().count().max(1) as u32;
        self.next_line.set(self.next_line.get() + lines);
        self.statements.borrow_mut().push(statement);
    }

    /// Emit several statements in order
    pub fn write_all<I, S>(&self, statements: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for statement in statements {
            self.write(statement);
        }
    }

    pub fn statement_count(&self) -> usize {
        self.statements.borrow().len()
    }

    pub fn statements(&self) -> Vec<String> {
        self.statements.borrow().clone()
    }

    /// Generated program text, one statement after another
    pub fn render(&self) -> String {
        let mut out = String::new();
        for statement in self.statements.borrow().iter() {
            out.push_str(statement);
            out.push('\n');
        }
        out
    }
}

impl Default for StatementWriter {
    fn default() -> Self {
        Self::new(1)
    }
}

impl OutputLineCounter for StatementWriter {
    fn current_line(&self) -> u32 {
        self.next_line.get()
    }
}
