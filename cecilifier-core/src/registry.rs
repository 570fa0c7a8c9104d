//! Per-run container of shared services
//!
//! One `ServiceRegistry` exists per translation run. It holds at most one
//! instance of each service type and hands out shared references to it;
//! services keep their mutable state behind interior mutability so several of
//! them can be in use at the same time during a traversal.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

/// Service registry errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Service not registered: {service}")]
    Unregistered { service: &'static str },
}

struct Entry {
    name: &'static str,
    instance: Rc<dyn Any>,
}

/// Typed service container, keyed by the concrete service type
#[derive(Default)]
pub struct ServiceRegistry {
    services: HashMap<TypeId, Entry>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `instance`, replacing any earlier instance of the same type
    pub fn register<T: Any>(&mut self, instance: T) -> Rc<T> {
        let shared = Rc::new(instance);
        let replaced = self
            .services
            .insert(
                TypeId::of::<T>(),
                Entry {
                    name: type_name::<T>(),
                    instance: shared.clone(),
                },
            )
            .is_some();
        debug!(service = type_name::<T>(), replaced, "service registered");
        shared
    }

    /// Shared instance of `T`
    ///
    /// Asking for a type that was never registered is a wiring defect in run
    /// setup and is reported as `RegistryError::Unregistered`.
    pub fn get<T: Any>(&self) -> Result<Rc<T>, RegistryError> {
        self.try_get::<T>().ok_or(RegistryError::Unregistered {
            service: type_name::<T>(),
        })
    }

    pub fn try_get<T: Any>(&self) -> Option<Rc<T>> {
        let entry = self.services.get(&TypeId::of::<T>())?;
        entry.instance.clone().downcast::<T>().ok()
    }

    pub fn contains<T: Any>(&self) -> bool {
        self.services.contains_key(&TypeId::of::<T>())
    }

    /// Remove the instance of `T`, returning it if it was registered
    pub fn remove<T: Any>(&mut self) -> Option<Rc<T>> {
        let entry = self.services.remove(&TypeId::of::<T>())?;
        entry.instance.downcast::<T>().ok()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Type names of the registered services, sorted
    pub fn service_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.services.values().map(|entry| entry.name).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("services", &self.service_names())
            .finish()
    }
}
