//! The state of one translation run
//!
//! `TranslationContext` owns the run's `ServiceRegistry` and wires the standard
//! services into it. The syntax visitor receives the context explicitly and
//! resolves whatever it needs from it; nothing here is global.

use crate::config::TranslationConfig;
use crate::generic_cache::GenericInstantiationCache;
use crate::mapping::{MappingList, MappingTracker};
use crate::naming::{ElementKind, NamingService, SyntheticName};
use crate::output::StatementWriter;
use crate::handles::Handle;
use crate::reference_cloner::{ClonedReference, PropertyOverrides, ReferenceCloner};
use crate::registry::{RegistryError, ServiceRegistry};
use cecilifier_syntax::{MethodSymbol, SyntaxNode};
use std::any::Any;
use std::rc::Rc;
use tracing::debug;

/// Services and settings of one translation run
#[derive(Debug)]
pub struct TranslationContext {
    config: TranslationConfig,
    registry: ServiceRegistry,
}

impl TranslationContext {
    /// Start a run with the naming service, the generic instantiation cache, the
    /// mapping tracker and a statement writer registered
    pub fn new(config: TranslationConfig) -> Self {
        let mut registry = ServiceRegistry::new();
        registry.register(NamingService::new(&config.naming));
        registry.register::<GenericInstantiationCache>(GenericInstantiationCache::new());
        registry.register(MappingTracker::new(config.mapping.enabled));
        registry.register(StatementWriter::new(config.mapping.first_output_line));
        debug!(services = registry.len(), "translation run started");

        Self { config, registry }
    }

    /// A run whose registry starts empty; the caller wires every service
    pub fn with_registry(config: TranslationConfig, registry: ServiceRegistry) -> Self {
        Self { config, registry }
    }

    pub fn config(&self) -> &TranslationConfig {
        &self.config
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ServiceRegistry {
        &mut self.registry
    }

    /// Shared instance of a registered service
    pub fn service<T: Any>(&self) -> Result<Rc<T>, RegistryError> {
        self.registry.get::<T>()
    }

    /// Shortcut for asking the naming service for a fresh name
    pub fn synthesize(&self, base_hint: &str, kind: ElementKind) -> Result<SyntheticName, RegistryError> {
        Ok(self.service::<NamingService>()?.synthesize(base_hint, kind))
    }

    /// Emit one statement through the run's statement writer
    pub fn write(&self, statement: impl Into<String>) -> Result<(), RegistryError> {
        self.service::<StatementWriter>()?.write(statement);
        Ok(())
    }

    /// Clone a method reference, naming the clone through the run's naming service
    pub fn clone_reference(
        &self,
        original: &Handle,
        overrides: &PropertyOverrides,
        resolved: &MethodSymbol,
    ) -> Result<ClonedReference, RegistryError> {
        let naming = self.service::<NamingService>()?;
        Ok(ReferenceCloner::new(&naming).clone_overriding(original, overrides, resolved))
    }

    /// Run `visit` inside a mapping scope for `node`
    ///
    /// The scope is closed on every path out of `visit`. An `Err` return closes
    /// it normally; a panic unwinding through here commits it from `Drop`. The
    /// node always gets exactly one mapping record.
    pub fn with_mapping<T, E, F>(&self, node: &dyn SyntaxNode, visit: F) -> Result<T, E>
    where
        E: From<RegistryError>,
        F: FnOnce(&Self) -> Result<T, E>,
    {
        let tracker = self.service::<MappingTracker>()?;
        let writer = self.service::<StatementWriter>()?;

        let scope = tracker.begin_scope(node, &*writer);
        let result = visit(self);
        scope.close();
        result
    }

    /// Finished mapping list of the run
    pub fn into_mappings(self) -> Result<MappingList, RegistryError> {
        Ok(self.service::<MappingTracker>()?.take_mappings())
    }
}

impl Default for TranslationContext {
    fn default() -> Self {
        Self::new(TranslationConfig::default())
    }
}
