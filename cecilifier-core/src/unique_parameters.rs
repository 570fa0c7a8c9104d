//! Primary-constructor parameters introduced by a derived record
//!
//! For `record Derived(int A, int B, int C) : Base(A, B)` only `C` is new:
//! `A` and `B` are forwarded to `Base`, which already declares the matching
//! properties. The resolver walks the base chain of a declaration and keeps
//! the parameters whose names no ancestor's primary constructor declares.
//!
//! Declarations are identified by their nesting path, so a top-level `Node`
//! deriving from `Outer.Node` is not mistaken for a cycle.

use cecilifier_syntax::{Parameter, SyntaxTree, TypeDeclaration};
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// Base-chain resolution errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("Base type '{base}' of '{declaration}' is not declared in the translated file")]
    UnresolvedBase { declaration: String, base: String },

    #[error("Base type '{base}' of '{declaration}' matches more than one declaration")]
    AmbiguousBase { declaration: String, base: String },

    #[error("Base type chain of '{declaration}' is cyclic")]
    CyclicBaseChain { declaration: String },
}

struct Entry<'t> {
    path: String,
    decl: &'t TypeDeclaration,
}

/// Index over every declaration of a tree, keyed by nesting path
pub struct DeclarationIndex<'t> {
    entries: Vec<Entry<'t>>,
    by_path: HashMap<String, usize>,
}

impl<'t> DeclarationIndex<'t> {
    pub fn build(tree: &'t SyntaxTree) -> Self {
        let mut entries = Vec::new();
        let mut by_path = HashMap::new();
        for (path, decl) in tree.qualified_declarations() {
            // first declaration wins when a path is declared twice
            by_path.entry(path.clone()).or_insert(entries.len());
            entries.push(Entry { path, decl });
        }
        Self { entries, by_path }
    }

    /// Look `name` up from file scope
    ///
    /// `Outer.Base<int>` finds the `Base` nested in `Outer`. A name that is
    /// not a full path matches the one declaration whose path ends with it.
    pub fn get(&self, name: &str) -> Option<&'t TypeDeclaration> {
        self.resolve("", name).ok().map(|index| self.entries[index].decl)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ancestors of `decl` that have a primary constructor, nearest first
    ///
    /// The walk stops at a declaration without a base type, or at a base that
    /// has no primary constructor. A base name missing from the index fails
    /// with `UnresolvedBase`, one matching several declarations with
    /// `AmbiguousBase`; revisiting a declaration fails with `CyclicBaseChain`.
    pub fn ancestors(&self, decl: &TypeDeclaration) -> Result<Vec<&'t TypeDeclaration>, ResolveError> {
        let mut chain = Vec::new();
        let mut visited: HashSet<usize> = HashSet::new();

        let start = self.locate(decl);
        let mut current_path = match start {
            Some(index) => {
                visited.insert(index);
                self.entries[index].path.clone()
            }
            None => decl.name.clone(),
        };
        let mut next_base = decl.base_type.as_deref();

        while let Some(base) = next_base {
            let index = self.resolve(container(&current_path), base).map_err(|lookup| match lookup {
                Lookup::Missing => ResolveError::UnresolvedBase {
                    declaration: current_path.clone(),
                    base: base.to_string(),
                },
                Lookup::Ambiguous => ResolveError::AmbiguousBase {
                    declaration: current_path.clone(),
                    base: base.to_string(),
                },
            })?;
            let entry = &self.entries[index];

            if !entry.decl.has_primary_constructor() {
                break;
            }
            if !visited.insert(index) {
                return Err(ResolveError::CyclicBaseChain {
                    declaration: decl.name.clone(),
                });
            }

            trace!(declaration = %decl.name, ancestor = %entry.path, "base resolved");
            chain.push(entry.decl);
            current_path = entry.path.clone();
            next_base = entry.decl.base_type.as_deref();
        }

        Ok(chain)
    }

    // Index of `decl` itself: the same node if it lives in the tree, otherwise an equal one
    fn locate(&self, decl: &TypeDeclaration) -> Option<usize> {
        let candidates = || self.entries.iter().enumerate().filter(|(_, e)| e.decl.name == decl.name);
        candidates()
            .find(|(_, e)| std::ptr::eq(e.decl, decl))
            .or_else(|| candidates().find(|(_, e)| e.decl == decl))
            .map(|(index, _)| index)
    }

    // C# lookup order: the enclosing scopes from innermost outward, then file scope
    fn resolve(&self, scope: &str, written: &str) -> Result<usize, Lookup> {
        let name = strip_type_arguments(written);
        let mut scope = scope;
        loop {
            let candidate = if scope.is_empty() {
                name.clone()
            } else {
                format!("{}.{}", scope, name)
            };
            if let Some(&index) = self.by_path.get(&candidate) {
                return Ok(index);
            }
            if scope.is_empty() {
                break;
            }
            scope = container(scope);
        }

        // namespaces are not part of the path, so `Ns.Outer.Base` ends with `Outer.Base`
        let suffix = format!(".{}", name);
        let mut matches = self
            .by_path
            .iter()
            .filter(|(path, _)| path.ends_with(&suffix) || suffix.ends_with(&format!(".{}", path)));
        match (matches.next(), matches.next()) {
            (Some((_, &index)), None) => Ok(index),
            (None, _) => Err(Lookup::Missing),
            (Some(_), Some(_)) => Err(Lookup::Ambiguous),
        }
    }
}

enum Lookup {
    Missing,
    Ambiguous,
}

/// Parameters of `decl`'s primary constructor that no ancestor declares,
/// in declaration order
pub fn unique_parameters(decl: &TypeDeclaration, tree: &SyntaxTree) -> Result<Vec<Parameter>, ResolveError> {
    if !decl.has_primary_constructor() {
        return Ok(Vec::new());
    }

    let index = DeclarationIndex::build(tree);
    let inherited: HashSet<&str> = index
        .ancestors(decl)?
        .into_iter()
        .flat_map(|ancestor| ancestor.parameters().iter().map(|p| p.name.as_str()))
        .collect();

    Ok(decl
        .parameters()
        .iter()
        .filter(|p| !inherited.contains(p.name.as_str()))
        .cloned()
        .collect())
}

// `Outer.Inner` is contained in `Outer`; a top-level path in ""
fn container(path: &str) -> &str {
    path.rsplit_once('.').map_or("", |(outer, _)| outer)
}

// `global::Outer<T>.Base<int>` becomes `Outer.Base`
fn strip_type_arguments(name: &str) -> String {
    let name = name.trim();
    let name = name.strip_prefix("global::").unwrap_or(name);
    let mut depth = 0usize;
    name.chars()
        .filter(|&c| {
            match c {
                '<' => depth += 1,
                '>' => {
                    depth = depth.saturating_sub(1);
                    return false;
                }
                _ => {}
            }
            depth == 0 && !c.is_whitespace()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cecilifier_syntax::{DeclarationKind, Span};

    fn span() -> Span {
        Span::from_coords(1, 1, 1, 30)
    }

    fn record(name: &str, params: &[&str]) -> TypeDeclaration {
        let params = params.iter().map(|p| Parameter::new(*p, "int", span())).collect();
        TypeDeclaration::record(name, params, span())
    }

    fn names(params: &[Parameter]) -> Vec<&str> {
        params.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_single_base() {
        let base = record("Base", &["a", "b"]);
        let derived = record("Derived", &["a", "b", "c"]).with_base("Base");
        let tree = SyntaxTree::new(vec![base, derived.clone()]);

        let unique = unique_parameters(&derived, &tree).unwrap();
        assert_eq!(names(&unique), vec!["c"]);
    }

    #[test]
    fn test_multi_level_chain() {
        let root = record("Root", &["x"]);
        let mid = record("Mid", &["x", "y"]).with_base("Root");
        let leaf = record("Leaf", &["x", "y", "z"]).with_base("Mid");
        let tree = SyntaxTree::new(vec![leaf.clone(), mid, root]);

        let unique = unique_parameters(&leaf, &tree).unwrap();
        assert_eq!(names(&unique), vec!["z"]);
    }

    #[test]
    fn test_order_follows_declaration() {
        let base = record("Base", &["b"]);
        let derived = record("Derived", &["z", "b", "a"]).with_base("Base");
        let tree = SyntaxTree::new(vec![base, derived.clone()]);

        let unique = unique_parameters(&derived, &tree).unwrap();
        assert_eq!(names(&unique), vec!["z", "a"]);
    }

    #[test]
    fn test_no_primary_constructor_is_empty() {
        let plain = TypeDeclaration::new("Plain", DeclarationKind::Class, span()).with_base("Missing");
        let tree = SyntaxTree::new(vec![plain.clone()]);

        assert!(unique_parameters(&plain, &tree).unwrap().is_empty());
    }

    #[test]
    fn test_no_base_returns_all() {
        let only = record("Only", &["p", "q"]);
        let tree = SyntaxTree::new(vec![only.clone()]);

        assert_eq!(names(&unique_parameters(&only, &tree).unwrap()), vec!["p", "q"]);
    }

    #[test]
    fn test_walk_stops_at_base_without_primary_constructor() {
        let grand = record("Grand", &["a"]);
        let plain = TypeDeclaration::new("Plain", DeclarationKind::Class, span()).with_base("Grand");
        let derived = record("Derived", &["a", "b"]).with_base("Plain");
        let tree = SyntaxTree::new(vec![grand, plain, derived.clone()]);

        assert_eq!(names(&unique_parameters(&derived, &tree).unwrap()), vec!["a", "b"]);
    }

    #[test]
    fn test_unresolved_base() {
        let derived = record("Derived", &["a"]).with_base("External");
        let tree = SyntaxTree::new(vec![derived.clone()]);

        let err = unique_parameters(&derived, &tree).unwrap_err();
        assert_eq!(
            err,
            ResolveError::UnresolvedBase {
                declaration: "Derived".to_string(),
                base: "External".to_string(),
            }
        );
    }

    #[test]
    fn test_cycle_is_detected() {
        let a = record("A", &["x"]).with_base("B");
        let b = record("B", &["x", "y"]).with_base("A");
        let tree = SyntaxTree::new(vec![a.clone(), b]);

        let err = unique_parameters(&a, &tree).unwrap_err();
        assert!(matches!(err, ResolveError::CyclicBaseChain { .. }));
    }

    #[test]
    fn test_generic_and_nested_bases() {
        let base = record("Base", &["id"]);
        let outer = TypeDeclaration::new("Outer", DeclarationKind::Class, span()).with_member(base);
        let derived = record("Derived", &["id", "name"]).with_base("Outer.Base<int>");
        let tree = SyntaxTree::new(vec![outer, derived.clone()]);

        assert_eq!(names(&unique_parameters(&derived, &tree).unwrap()), vec!["name"]);
    }

    #[test]
    fn test_same_simple_name_in_other_scope_is_not_a_cycle() {
        let nested = record("Node", &["v"]);
        let outer = TypeDeclaration::new("Outer", DeclarationKind::Class, span()).with_member(nested);
        let node = record("Node", &["v", "w"]).with_base("Outer.Node");
        let tree = SyntaxTree::new(vec![node, outer]);

        let top_level = &tree.declarations[0];
        assert_eq!(names(&unique_parameters(top_level, &tree).unwrap()), vec!["w"]);
    }

    #[test]
    fn test_base_resolves_in_enclosing_scope_first() {
        let inner_base = record("Base", &["a"]);
        let inner_derived = record("Derived", &["a", "b"]).with_base("Base");
        let outer = TypeDeclaration::new("Outer", DeclarationKind::Class, span())
            .with_member(inner_base)
            .with_member(inner_derived);
        let top_base = record("Base", &["b"]);
        let tree = SyntaxTree::new(vec![top_base, outer]);

        let derived = &tree.declarations[1].members[1];
        assert_eq!(names(&unique_parameters(derived, &tree).unwrap()), vec!["b"]);
    }

    #[test]
    fn test_ambiguous_simple_name() {
        let left = TypeDeclaration::new("Left", DeclarationKind::Class, span()).with_member(record("Base", &["a"]));
        let right = TypeDeclaration::new("Right", DeclarationKind::Class, span()).with_member(record("Base", &["b"]));
        let derived = record("Derived", &["a", "b"]).with_base("Base");
        let tree = SyntaxTree::new(vec![left, right, derived.clone()]);

        let err = unique_parameters(&derived, &tree).unwrap_err();
        assert_eq!(
            err,
            ResolveError::AmbiguousBase {
                declaration: "Derived".to_string(),
                base: "Base".to_string(),
            }
        );
        assert!(DeclarationIndex::build(&tree).get("Right.Base").is_some());
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let root = record("Root", &["x"]);
        let mid = record("Mid", &["x", "y"]).with_base("Root");
        let leaf = record("Leaf", &["x", "y", "z"]).with_base("Mid");
        let tree = SyntaxTree::new(vec![root, mid, leaf.clone()]);
        let index = DeclarationIndex::build(&tree);

        let chain: Vec<&str> = index.ancestors(&leaf).unwrap().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(chain, vec!["Mid", "Root"]);
        assert_eq!(index.len(), 3);
    }
}
