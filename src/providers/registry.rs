//! Provider registry
//!
//! Explicit name-to-adapter map constructed once by the composition root
//! and injected into the executor by reference. No global state; the
//! executor stays unit-testable with fake adapters.

use super::{OpenAiAdapter, ProviderAdapter};
use crate::config::EndpointsConfig;
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Name-to-adapter map used by the executor to resolve chains
#[derive(Default)]
pub struct ProviderRegistry {
    adapters: HashMap<String, Arc<dyn ProviderAdapter>>,
}

impl ProviderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// Register an adapter under a provider name
    pub fn register(&mut self, name: impl Into<String>, adapter: Arc<dyn ProviderAdapter>) {
        self.adapters.insert(name.into(), adapter);
    }

    /// Look up an adapter by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn ProviderAdapter>> {
        self.adapters.get(name).cloned()
    }

    /// Whether a provider name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.adapters.contains_key(name)
    }

    /// Registered provider names
    pub fn names(&self) -> Vec<String> {
        self.adapters.keys().cloned().collect()
    }

    /// Number of registered adapters
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Build a registry from the endpoints file, one reference adapter
    /// per configured endpoint
    pub fn from_endpoints(config: &EndpointsConfig) -> Result<Self> {
        let mut registry = Self::new();

        for (name, endpoint) in &config.providers {
            let adapter = OpenAiAdapter::new(name.clone(), endpoint.clone())?;
            registry.register(name.clone(), Arc::new(adapter));
        }

        info!("Provider registry initialized with {} adapters", registry.len());
        Ok(registry)
    }
}
