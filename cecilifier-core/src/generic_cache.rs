//! Memoization of generic instantiations
//!
//! Constructing a generic instance such as `List<int>` takes several builder-API
//! statements. The cache makes sure each distinct instantiation is emitted once
//! per run; later references reuse the handle produced by the first emission.
//!
//! Factories must be pure functions of `(key, state)`. The cache does not check
//! this: whatever the first successful call returned is what every later lookup
//! gets.

use crate::handles::Handle;
use cecilifier_syntax::TypeSymbol;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use tracing::{debug, trace};

/// Identity of one generic instantiation: the generic declaration plus its
/// concrete type arguments, in order
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstantiationKey {
    pub declaration: String,
    pub type_arguments: Vec<String>,
}

impl InstantiationKey {
    pub fn new(declaration: impl Into<String>, type_arguments: Vec<String>) -> Self {
        Self {
            declaration: declaration.into(),
            type_arguments,
        }
    }

    /// Key of a constructed type symbol such as `List<int>`
    pub fn from_type(symbol: &TypeSymbol) -> Self {
        Self {
            declaration: symbol.qualified_name(),
            type_arguments: symbol.type_arguments.iter().map(|arg| arg.to_string()).collect(),
        }
    }
}

impl fmt::Display for InstantiationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<{}>", self.declaration, self.type_arguments.join(", "))
    }
}

/// Hit and miss counters of a cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Run-scoped memo table from instantiation key to emitted value
#[derive(Debug)]
pub struct GenericInstantiationCache<K = InstantiationKey, V = Handle> {
    entries: RefCell<HashMap<K, V>>,
    hits: Cell<u64>,
    misses: Cell<u64>,
}

impl<K, V> GenericInstantiationCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    /// Return the stored value for `key`, running `factory` only on a miss
    ///
    /// No borrow of the table is held while `factory` runs, so it may itself
    /// consult this cache (for example to build the `List<int>` inside
    /// `List<List<int>>`). A failing factory stores nothing; the next lookup of
    /// the same key runs a factory again.
    pub fn get_or_try_create<S, E, F>(&self, key: &K, state: S, factory: F) -> Result<V, E>
    where
        F: FnOnce(&K, S) -> Result<V, E>,
    {
        if let Some(value) = self.lookup(key) {
            return Ok(value);
        }

        self.misses.set(self.misses.get() + 1);
        debug!(?key, "generic instantiation cache miss");
        let value = factory(key, state)?;

        let mut entries = self.entries.borrow_mut();
        // a re-entrant factory call may already have stored this key; the first
        // stored value wins
        let stored = entries.entry(key.clone()).or_insert(value);
        Ok(stored.clone())
    }

    /// Infallible form of `get_or_try_create`
    pub fn get_or_create<S, F>(&self, key: &K, state: S, factory: F) -> V
    where
        F: FnOnce(&K, S) -> V,
    {
        match self.get_or_try_create::<S, std::convert::Infallible, _>(key, state, |k, s| Ok(factory(k, s))) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Stored value for `key`, if any; counts as a hit when found
    pub fn lookup(&self, key: &K) -> Option<V> {
        let value = self.entries.borrow().get(key).cloned();
        if value.is_some() {
            self.hits.set(self.hits.get() + 1);
            trace!(?key, "generic instantiation cache hit");
        }
        value
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.get(),
            misses: self.misses.get(),
        }
    }
}

impl<K, V> Default for GenericInstantiationCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::StatementWriter;

    fn list_of(arg: &str) -> TypeSymbol {
        TypeSymbol::new("List`1")
            .in_namespace("System.Collections.Generic")
            .with_type_arguments(vec![TypeSymbol::new(arg)])
    }

    #[test]
    fn test_factory_runs_once_per_key() {
        let cache: GenericInstantiationCache = GenericInstantiationCache::new();
        let calls = Cell::new(0);
        let key = InstantiationKey::from_type(&list_of("int"));

        let make = |k: &InstantiationKey, suffix: &str| {
            calls.set(calls.get() + 1);
            Handle::new(format!("gi_{}_{}", k.declaration.len(), suffix))
        };

        let first = cache.get_or_create(&key, "a", make);
        let second = cache.get_or_create(&key, "b", make);

        assert_eq!(calls.get(), 1);
        assert_eq!(first, second);
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
    }

    #[test]
    fn test_distinct_keys_get_distinct_entries() {
        let cache: GenericInstantiationCache = GenericInstantiationCache::new();
        let writer = StatementWriter::default();

        for arg in ["int", "string", "int"] {
            let key = InstantiationKey::from_type(&list_of(arg));
            cache.get_or_create(&key, &writer, |k, w| {
                w.write(format!("var gi = {}.MakeGenericInstanceType();", k));
                Handle::new(format!("gi_List_{}", k.type_arguments[0]))
            });
        }

        assert_eq!(cache.len(), 2);
        assert_eq!(writer.statement_count(), 2);
    }

    #[test]
    fn test_failed_factory_stores_nothing() {
        let cache: GenericInstantiationCache = GenericInstantiationCache::new();
        let key = InstantiationKey::new("Span`1", vec!["byte".to_string()]);

        let failed: Result<Handle, String> = cache.get_or_try_create(&key, (), |_, _| Err("boom".to_string()));
        assert!(failed.is_err());
        assert!(!cache.contains(&key));

        let retried: Result<Handle, String> =
            cache.get_or_try_create(&key, (), |_, _| Ok(Handle::new("gi_Span_1")));
        assert_eq!(retried.unwrap().as_str(), "gi_Span_1");
        assert_eq!(cache.stats().misses, 2);
    }

    #[test]
    fn test_reentrant_factory() {
        let cache: GenericInstantiationCache = GenericInstantiationCache::new();
        let inner_type = list_of("int");
        let outer_type = TypeSymbol::new("List`1")
            .in_namespace("System.Collections.Generic")
            .with_type_arguments(vec![inner_type.clone()]);

        let outer = cache.get_or_create(&InstantiationKey::from_type(&outer_type), &cache, |_, c| {
            let inner = c.get_or_create(&InstantiationKey::from_type(&inner_type), (), |_, _| {
                Handle::new("gi_List_int_1")
            });
            Handle::new(format!("gi_List_{}_2", inner))
        });

        assert_eq!(outer.as_str(), "gi_List_gi_List_int_1_2");
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_key_display() {
        let key = InstantiationKey::new("Dictionary`2", vec!["string".to_string(), "int".to_string()]);
        assert_eq!(key.to_string(), "Dictionary`2<string, int>");
    }
}
