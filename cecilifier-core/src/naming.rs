//! Synthetic variable names for builder-API objects
//!
//! Every object the generated program constructs is bound to a variable whose
//! name comes from here. Names have the shape `__{prefix}{tag}_{hint}_{n}`:
//! the tag identifies the element kind, the hint is a readable fragment of the
//! symbol being represented, and `n` is a per-kind counter. The counter alone
//! keeps names of one kind apart; the tag keeps kinds apart.
//!
//! The leading [`RESERVED_MARKER`] is always present and is not part of the
//! configurable prefix. C# reserves identifiers containing `__` for the
//! implementation, so no well-formed source identifier can collide with a
//! synthesized one.

use crate::config::NamingConfig;
use cecilifier_syntax::sanitize_identifier;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::trace;

/// Fixed opening of every synthesized name
pub const RESERVED_MARKER: &str = "__";

/// Kind of artifact a synthetic name refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementKind {
    Type,
    Field,
    Local,
    Parameter,
    Method,
    Constructor,
    Property,
    Event,
    MemberReference,
    GenericParameter,
    GenericInstance,
    Attribute,
    Label,
    IlProcessor,
    Delegate,
    Lambda,
}

impl ElementKind {
    /// Short tag opening every name of this kind; never contains `_`
    pub fn tag(self) -> &'static str {
        match self {
            ElementKind::Type => "t",
            ElementKind::Field => "fld",
            ElementKind::Local => "l",
            ElementKind::Parameter => "p",
            ElementKind::Method => "m",
            ElementKind::Constructor => "ctor",
            ElementKind::Property => "prop",
            ElementKind::Event => "evt",
            ElementKind::MemberReference => "mr",
            ElementKind::GenericParameter => "gp",
            ElementKind::GenericInstance => "gi",
            ElementKind::Attribute => "attr",
            ElementKind::Label => "lbl",
            ElementKind::IlProcessor => "il",
            ElementKind::Delegate => "del",
            ElementKind::Lambda => "lambda",
        }
    }
}

/// A generated variable name, unique within one translation run
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SyntheticName {
    name: String,
    kind: ElementKind,
}

impl SyntheticName {
    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn into_string(self) -> String {
        self.name
    }
}

impl fmt::Display for SyntheticName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Hands out collision-free variable names for one translation run
#[derive(Debug)]
pub struct NamingService {
    prefix: String,
    max_hint_length: usize,
    counters: RefCell<HashMap<ElementKind, u32>>,
    reserved: RefCell<HashSet<String>>,
}

impl NamingService {
    pub fn new(config: &NamingConfig) -> Self {
        Self {
            prefix: config.prefix.clone(),
            max_hint_length: config.max_hint_length.max(1),
            counters: RefCell::new(HashMap::new()),
            reserved: RefCell::new(config.reserved.iter().cloned().collect()),
        }
    }

    /// Produce a name that was never returned before in this run
    pub fn synthesize(&self, base_hint: &str, kind: ElementKind) -> SyntheticName {
        let hint = self.sanitize_hint(base_hint);
        let reserved = self.reserved.borrow();
        let mut counters = self.counters.borrow_mut();
        let counter = counters.entry(kind).or_insert(0);

        loop {
            *counter += 1;
            let name = if hint.is_empty() {
                format!("{}{}{}_{}", RESERVED_MARKER, self.prefix, kind.tag(), counter)
            } else {
                format!("{}{}{}_{}_{}", RESERVED_MARKER, self.prefix, kind.tag(), hint, counter)
            };

            if !reserved.contains(&name) {
                trace!(%name, ?kind, "synthesized name");
                return SyntheticName { name, kind };
            }
        }
    }

    /// Keep `name` out of every future `synthesize` result
    pub fn reserve(&self, name: impl Into<String>) {
        self.reserved.borrow_mut().insert(name.into());
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved.borrow().contains(name)
    }

    /// How many counter values have been consumed for `kind`
    pub fn synthesized_count(&self, kind: ElementKind) -> u32 {
        self.counters.borrow().get(&kind).copied().unwrap_or(0)
    }

    fn sanitize_hint(&self, hint: &str) -> String {
        sanitize_identifier(hint)
            .chars()
            .take(self.max_hint_length)
            .collect::<String>()
            .trim_matches('_')
            .to_string()
    }
}

impl Default for NamingService {
    fn default() -> Self {
        Self::new(&NamingConfig::default())
    }
}
