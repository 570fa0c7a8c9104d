//! Cecilifier syntax model
//!
//! This crate holds the read-only view of the source program that the
//! translation core consumes: source spans, the `SyntaxNode` seam, resolved
//! type and method symbols, and the type declaration tree. Parsing and
//! semantic analysis happen elsewhere; these types only carry their results.

pub mod span;
pub mod symbols;
pub mod declarations;

// Re-export core types
pub use span::{Position, Span, SyntaxNode};
pub use symbols::{sanitize_identifier, MethodSymbol, ParameterSymbol, TypeSymbol};
pub use declarations::{DeclarationKind, Parameter, StatementNode, SyntaxTree, TypeDeclaration};
