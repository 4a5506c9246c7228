pub mod chain;
pub mod entity;
pub mod error;
pub mod price;
pub mod registry;

pub use chain::DecoratedPrice;
pub use entity::PricedEntity;
pub use error::PricingError;
pub use price::{Price, Transform};
pub use registry::DecoratorRegistry;
