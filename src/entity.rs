//! List based decoration: an entity recording decorator names in call order
use super::error::PricingError;
use super::price::{Price, validate_base_price};
use super::registry::DecoratorRegistry;
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_BASE_PRICE: f64 = 100.0;

#[derive(Debug, Clone)]
pub struct PricedEntity {
    base_price: f64, // fixed at construction
    applied: Vec<String>,
    registry: Arc<DecoratorRegistry>,
}

impl PricedEntity {
    /// Construct an undecorated entity backed by the standard registry.
    pub fn new(base_price: f64) -> Result<Self, PricingError> {
        Self::with_registry(base_price, DecoratorRegistry::standard())
    }
    pub fn with_registry(
        base_price: f64,
        registry: Arc<DecoratorRegistry>,
    ) -> Result<Self, PricingError> {
        Ok(Self {
            base_price: validate_base_price(base_price)?,
            applied: vec![],
            registry,
        })
    }
    /// Appends `name` to the decorations. The name is only resolved when the
    /// price is computed, so it may be registered later.
    pub fn decorate(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        debug!(decorator = %name, depth = self.applied.len() + 1, "decorate");
        self.applied.push(name);
        self
    }
    /// Removes the most recent decoration.
    pub fn undecorate(&mut self) -> Option<String> {
        let removed = self.applied.pop();
        if let Some(name) = &removed {
            debug!(decorator = %name, depth = self.applied.len(), "undecorate");
        }
        removed
    }
    pub fn get_price(&self) -> Result<Price, PricingError> {
        self.price_with(&self.registry)
    }
    /// Computes the price against `registry` instead of the entity's own.
    pub fn price_with(&self, registry: &DecoratorRegistry) -> Result<Price, PricingError> {
        registry
            .apply_all(self.base_price, self.applied.iter().map(String::as_str))
            .inspect_err(|e| {
                warn!(base_price = self.base_price, error = %e, "price evaluation failed")
            })
    }
    pub fn base_price(&self) -> f64 {
        self.base_price
    }
    pub fn decorators(&self) -> &[String] {
        &self.applied
    }
    pub fn is_decorated(&self) -> bool {
        !self.applied.is_empty()
    }
    pub fn registry(&self) -> &Arc<DecoratorRegistry> {
        &self.registry
    }
}

impl Default for PricedEntity {
    fn default() -> Self {
        Self {
            base_price: DEFAULT_BASE_PRICE,
            applied: vec![],
            registry: DecoratorRegistry::standard(),
        }
    }
}
