//! Chained decoration: every decoration wraps the value it decorates
use super::entity::DEFAULT_BASE_PRICE;
use super::error::PricingError;
use super::price::{Price, validate_base_price};
use super::registry::DecoratorRegistry;
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::{debug, warn};

// stands in for a link while a chain is being torn down
static UNLINKED: Lazy<Arc<DecoratedPrice>> =
    Lazy::new(|| Arc::new(DecoratedPrice::default()));

/// An immutable decorated price.
///
/// `decorate` never touches the receiver; it returns a new value holding a
/// shared link to it. Several derivatives can therefore branch from the same
/// base. Evaluation folds the layers from the base up, and dropping a chain
/// unlinks it layer by layer, so chain length is bounded by memory only.
#[derive(Debug, Clone)]
pub enum DecoratedPrice {
    Base {
        price: f64,
        registry: Arc<DecoratorRegistry>,
    },
    Decorated {
        previous: Arc<DecoratedPrice>,
        decorator: String,
        depth: usize,
    },
}

impl DecoratedPrice {
    pub fn new(price: f64) -> Result<Self, PricingError> {
        Self::with_registry(price, DecoratorRegistry::standard())
    }
    pub fn with_registry(
        price: f64,
        registry: Arc<DecoratorRegistry>,
    ) -> Result<Self, PricingError> {
        Ok(DecoratedPrice::Base {
            price: validate_base_price(price)?,
            registry,
        })
    }
    pub fn decorate(&self, name: impl Into<String>) -> DecoratedPrice {
        let decorator = name.into();
        let depth = self.depth() + 1;
        debug!(decorator = %decorator, depth, "decorate");

        DecoratedPrice::Decorated {
            previous: Arc::new(self.clone()),
            decorator,
            depth,
        }
    }
    /// The value this one wraps, or `None` for an undecorated base.
    pub fn undecorate(&self) -> Option<DecoratedPrice> {
        match self {
            DecoratedPrice::Base { .. } => None,
            DecoratedPrice::Decorated { previous, .. } => Some(previous.as_ref().clone()),
        }
    }
    /// Evaluates against the registry held by the base of the chain.
    pub fn get_price(&self) -> Result<Price, PricingError> {
        self.price_with(self.registry())
    }
    pub fn price_with(&self, registry: &DecoratorRegistry) -> Result<Price, PricingError> {
        self.evaluate(registry).inspect_err(|e| {
            warn!(base_price = self.base_price(), error = %e, "price evaluation failed")
        })
    }
    fn evaluate(&self, registry: &DecoratorRegistry) -> Result<Price, PricingError> {
        registry.apply_all(self.base_price(), self.decorators())
    }
    /// Walks from this value down to the base, most recent decoration first.
    fn layers(&self) -> impl Iterator<Item = &DecoratedPrice> {
        std::iter::successors(Some(self), |layer| match *layer {
            DecoratedPrice::Base { .. } => None,
            DecoratedPrice::Decorated { previous, .. } => Some(previous.as_ref()),
        })
    }
    fn root(&self) -> (f64, &Arc<DecoratorRegistry>) {
        let mut layer = self;
        loop {
            match layer {
                DecoratedPrice::Base { price, registry } => return (*price, registry),
                DecoratedPrice::Decorated { previous, .. } => layer = previous.as_ref(),
            }
        }
    }
    pub fn base_price(&self) -> f64 {
        self.root().0
    }
    pub fn registry(&self) -> &Arc<DecoratorRegistry> {
        self.root().1
    }
    /// Number of decorations layered over the base.
    pub fn depth(&self) -> usize {
        match self {
            DecoratedPrice::Base { .. } => 0,
            DecoratedPrice::Decorated { depth, .. } => *depth,
        }
    }
    /// Decorator names in the order they were applied.
    pub fn decorators(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .layers()
            .filter_map(|layer| match layer {
                DecoratedPrice::Base { .. } => None,
                DecoratedPrice::Decorated { decorator, .. } => Some(decorator.as_str()),
            })
            .collect();
        names.reverse();
        names
    }
    pub fn is_decorated(&self) -> bool {
        matches!(self, DecoratedPrice::Decorated { .. })
    }
}

impl Default for DecoratedPrice {
    fn default() -> Self {
        DecoratedPrice::Base {
            price: DEFAULT_BASE_PRICE,
            registry: DecoratorRegistry::standard(),
        }
    }
}

impl Drop for DecoratedPrice {
    // unlink one layer at a time, a recursive drop overflows on long chains
    fn drop(&mut self) {
        let mut link = match self {
            DecoratedPrice::Base { .. } => return,
            DecoratedPrice::Decorated { previous, .. } => unlink(previous),
        };
        // stops at the first layer still shared with another chain
        while let Some(mut layer) = Arc::into_inner(link) {
            link = match &mut layer {
                DecoratedPrice::Base { .. } => return,
                DecoratedPrice::Decorated { previous, .. } => unlink(previous),
            };
        }
    }
}

fn unlink(previous: &mut Arc<DecoratedPrice>) -> Arc<DecoratedPrice> {
    std::mem::replace(previous, Arc::clone(&UNLINKED))
}
