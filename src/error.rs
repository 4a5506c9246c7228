#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    #[error("No decorator registered under '{0}'")]
    UnknownDecorator(String),
    #[error("Decorator '{decorator}' expects an amount, found formatted price '{found}'")]
    TypeMismatch { decorator: String, found: String },
    #[error("Decorator '{decorator}' produced a non-finite amount ({value})")]
    NonFiniteAmount { decorator: String, value: f64 },
    #[error("Base price must be a finite, non-negative number, got {0}")]
    InvalidBasePrice(f64),
}
