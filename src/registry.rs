//! Named decorator transforms
use super::error::PricingError;
use super::price::{Price, Transform};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

pub const FEDTAX: &str = "fedtax";
pub const QUEBEC: &str = "quebec";
pub const MONEY: &str = "money";
pub const CDN: &str = "cdn";

pub const FEDTAX_RATE: f64 = 1.05;
pub const QUEBEC_RATE: f64 = 1.075;

// built on first use, never mutated afterwards
static STANDARD: Lazy<Arc<DecoratorRegistry>> =
    Lazy::new(|| Arc::new(DecoratorRegistry::with_defaults()));

/// Maps decorator names to the transform each one layers onto a price.
///
/// Registration is expected to happen once during start-up; afterwards the
/// registry is shared read-only behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct DecoratorRegistry {
    transforms: HashMap<String, Transform>,
}

impl DecoratorRegistry {
    /// An empty registry, with none of the standard decorators.
    pub fn new() -> Self {
        Self::default()
    }
    /// A registry holding `fedtax`, `quebec`, `money` and `cdn`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .register(FEDTAX, Transform::rate(FEDTAX_RATE))
            .register(QUEBEC, Transform::rate(QUEBEC_RATE))
            .register(MONEY, Transform::currency("$"))
            .register(CDN, Transform::currency("CDN$ "));
        registry
    }
    /// The process-wide standard registry.
    pub fn standard() -> Arc<DecoratorRegistry> {
        Arc::clone(&STANDARD)
    }
    /// Adds the transform for `name`, replacing any previous one.
    pub fn register(&mut self, name: impl Into<String>, transform: Transform) -> &mut Self {
        let name = name.into();
        debug!(decorator = %name, terminal = transform.is_terminal(), "register decorator");

        if self.transforms.insert(name.clone(), transform).is_some() {
            debug!(decorator = %name, "replaced existing decorator");
        }
        self
    }
    pub fn lookup(&self, name: &str) -> Result<&Transform, PricingError> {
        self.transforms
            .get(name)
            .ok_or_else(|| PricingError::UnknownDecorator(name.to_string()))
    }
    pub fn contains(&self, name: &str) -> bool {
        self.transforms.contains_key(name)
    }
    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.transforms.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
    pub fn len(&self) -> usize {
        self.transforms.len()
    }
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
    /// Folds the transforms named by `decorators` over `base_price`, in order.
    /// Every name is resolved now, not when it was applied.
    pub fn apply_all<'n>(
        &self,
        base_price: f64,
        decorators: impl IntoIterator<Item = &'n str>,
    ) -> Result<Price, PricingError> {
        decorators
            .into_iter()
            .try_fold(Price::Amount(base_price), |price, name| {
                let next = self.lookup(name)?.apply(name, price)?;
                trace!(decorator = name, price = %next, "applied decorator");
                Ok(next)
            })
    }
}
