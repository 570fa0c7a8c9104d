//! Cecilifier translation core
//!
//! Support engine shared by every syntax-directed rule that turns a source
//! program into statements constructing the same program through a
//! metadata/bytecode builder API. It provides collision-free variable names,
//! typed handles over those names, source-to-output mapping, memoization of
//! generic instantiations, a per-run service registry, cloning of method
//! references, and the primary-constructor parameter analysis for records.
//!
//! Everything here is single-threaded and scoped to one translation run.

pub mod config;
pub mod naming;
pub mod handles;
pub mod output;
pub mod mapping;
pub mod generic_cache;
pub mod registry;
pub mod context;
pub mod reference_cloner;
pub mod unique_parameters;

// Re-export main types
pub use config::{ConfigError, MappingConfig, NamingConfig, TranslationConfig};
pub use naming::{ElementKind, NamingService, SyntheticName, RESERVED_MARKER};
pub use handles::{Handle, Token};
pub use output::{OutputLineCounter, StatementWriter};
pub use mapping::{Mapping, MappingList, MappingScope, MappingTracker, OutputBlock, OutputLine, SourceBlock};
pub use generic_cache::{CacheStats, GenericInstantiationCache, InstantiationKey};
pub use registry::{RegistryError, ServiceRegistry};
pub use context::TranslationContext;
pub use reference_cloner::{ClonableProperty, ClonedReference, PropertyOverrides, ReferenceCloner};
pub use unique_parameters::{unique_parameters, DeclarationIndex, ResolveError};

pub type Result<T> = std::result::Result<T, CecilifierError>;

/// Translation core errors
#[derive(Debug, thiserror::Error)]
pub enum CecilifierError {
    #[error("Service registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Declaration resolution failed: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Mapping serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Code generation failed: {message}")]
    CodeGen { message: String },
}

impl From<String> for CecilifierError {
    fn from(s: String) -> Self {
        CecilifierError::CodeGen { message: s }
    }
}

impl From<&str> for CecilifierError {
    fn from(s: &str) -> Self {
        CecilifierError::CodeGen { message: s.to_string() }
    }
}
