//! Type declarations and statement nodes of the translated file

use crate::span::{Span, SyntaxNode};
use serde::{Deserialize, Serialize};

/// Kind of a type declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclarationKind {
    Class,
    Struct,
    Interface,
    /// `record Point(int X, int Y);`
    Record,
    /// `record struct Point(int X, int Y);`
    RecordStruct,
}

/// A parameter of a primary constructor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub type_name: String,
    pub span: Span,
}

impl Parameter {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            span,
        }
    }
}

impl SyntaxNode for Parameter {
    fn span(&self) -> Span {
        self.span
    }

    fn kind_name(&self) -> &'static str {
        "parameter"
    }
}

/// A type declaration, optionally with a primary constructor and a base type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDeclaration {
    pub name: String,
    pub kind: DeclarationKind,
    /// `None` when the declaration has no primary constructor at all
    pub primary_parameters: Option<Vec<Parameter>>,
    /// Name of the declared base type as written in the base list
    pub base_type: Option<String>,
    /// Nested type declarations
    pub members: Vec<TypeDeclaration>,
    pub span: Span,
}

impl TypeDeclaration {
    pub fn new(name: impl Into<String>, kind: DeclarationKind, span: Span) -> Self {
        Self {
            name: name.into(),
            kind,
            primary_parameters: None,
            base_type: None,
            members: Vec::new(),
            span,
        }
    }

    /// Record declaration with a primary constructor
    pub fn record(name: impl Into<String>, parameters: Vec<Parameter>, span: Span) -> Self {
        let mut decl = Self::new(name, DeclarationKind::Record, span);
        decl.primary_parameters = Some(parameters);
        decl
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base_type = Some(base.into());
        self
    }

    pub fn with_member(mut self, member: TypeDeclaration) -> Self {
        self.members.push(member);
        self
    }

    pub fn has_primary_constructor(&self) -> bool {
        self.primary_parameters.is_some()
    }

    /// Primary constructor parameters, empty when there is no primary constructor
    pub fn parameters(&self) -> &[Parameter] {
        self.primary_parameters.as_deref().unwrap_or(&[])
    }
}

impl SyntaxNode for TypeDeclaration {
    fn span(&self) -> Span {
        self.span
    }

    fn kind_name(&self) -> &'static str {
        match self.kind {
            DeclarationKind::Class => "class",
            DeclarationKind::Struct => "struct",
            DeclarationKind::Interface => "interface",
            DeclarationKind::Record => "record",
            DeclarationKind::RecordStruct => "record struct",
        }
    }
}

/// A statement as seen by the mapping tracker: its text and location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementNode {
    pub text: String,
    pub span: Span,
}

impl StatementNode {
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        Self {
            text: text.into(),
            span,
        }
    }
}

impl SyntaxNode for StatementNode {
    fn span(&self) -> Span {
        self.span
    }

    fn kind_name(&self) -> &'static str {
        "statement"
    }
}

/// All top-level declarations of one translated file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyntaxTree {
    pub declarations: Vec<TypeDeclaration>,
}

impl SyntaxTree {
    pub fn new(declarations: Vec<TypeDeclaration>) -> Self {
        Self { declarations }
    }

    /// Every declaration in the tree, nested ones included, in pre-order,
    /// paired with its nesting path (`Outer.Inner`)
    pub fn qualified_declarations(&self) -> Vec<(String, &TypeDeclaration)> {
        let mut out = Vec::new();
        let mut stack: Vec<(String, &TypeDeclaration)> =
            self.declarations.iter().rev().map(|d| (d.name.clone(), d)).collect();
        while let Some((path, decl)) = stack.pop() {
            stack.extend(
                decl.members
                    .iter()
                    .rev()
                    .map(|member| (format!("{}.{}", path, member.name), member)),
            );
            out.push((path, decl));
        }
        out
    }
}
