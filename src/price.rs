//! Price values and the transforms that decorate them
use super::error::PricingError;
use std::fmt;
use std::sync::Arc;

/// The value flowing through a chain of decorations.
#[derive(Debug, Clone, PartialEq)]
pub enum Price {
    Amount(f64),
    // produced by a terminal formatting transform such as `money`
    Formatted(String),
}

#[derive(Clone)]
pub enum Transform {
    Numeric(Arc<dyn Fn(f64) -> f64 + Send + Sync>),
    Format(Arc<dyn Fn(f64) -> String + Send + Sync>),
}

impl Price {
    pub fn amount(&self) -> Option<f64> {
        match self {
            Price::Amount(value) => Some(*value),
            Price::Formatted(_) => None,
        }
    }
    pub fn formatted(&self) -> Option<&str> {
        match self {
            Price::Amount(_) => None,
            Price::Formatted(text) => Some(text),
        }
    }
    pub fn is_formatted(&self) -> bool {
        matches!(self, Price::Formatted(_))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Amount(value) => write!(f, "{value}"),
            Price::Formatted(text) => f.write_str(text),
        }
    }
}

impl From<f64> for Price {
    fn from(value: f64) -> Self {
        Price::Amount(value)
    }
}

impl From<String> for Price {
    fn from(text: String) -> Self {
        Price::Formatted(text)
    }
}

impl PartialEq<f64> for Price {
    fn eq(&self, other: &f64) -> bool {
        self.amount() == Some(*other)
    }
}

impl PartialEq<&str> for Price {
    fn eq(&self, other: &&str) -> bool {
        self.formatted() == Some(*other)
    }
}

impl Transform {
    pub fn numeric(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Transform::Numeric(Arc::new(f))
    }
    pub fn format(f: impl Fn(f64) -> String + Send + Sync + 'static) -> Self {
        Transform::Format(Arc::new(f))
    }
    /// Multiplies the amount by `rate`, e.g. `1.05` for a 5% tax.
    pub fn rate(rate: f64) -> Self {
        Self::numeric(move |value| value * rate)
    }
    /// Adds a flat amount. Unlike rates, surcharges don't commute with them.
    pub fn surcharge(amount: f64) -> Self {
        Self::numeric(move |value| value + amount)
    }
    /// Formats the amount as `prefix` followed by the value rounded to cents.
    pub fn currency(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self::format(move |value| format!("{prefix}{}", to_cents(value)))
    }
    pub fn is_terminal(&self) -> bool {
        matches!(self, Transform::Format(_))
    }
    /// Applies the transform on behalf of the decorator registered as `name`.
    /// A formatted price can't be fed back into another transform, and a
    /// numeric transform must keep the amount finite.
    pub fn apply(&self, name: &str, price: Price) -> Result<Price, PricingError> {
        let value = match price {
            Price::Amount(value) => value,
            Price::Formatted(found) => {
                return Err(PricingError::TypeMismatch {
                    decorator: name.to_string(),
                    found,
                });
            }
        };

        match self {
            Transform::Numeric(f) => {
                let value = f(value);
                if !value.is_finite() {
                    return Err(PricingError::NonFiniteAmount {
                        decorator: name.to_string(),
                        value,
                    });
                }
                Ok(Price::Amount(value))
            }
            Transform::Format(f) => Ok(Price::Formatted(f(value))),
        }
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::Numeric(_) => f.write_str("Transform::Numeric"),
            Transform::Format(_) => f.write_str("Transform::Format"),
        }
    }
}

/// Accepts any finite, non-negative amount. Zero is a valid price, and a
/// negative zero is stored as zero.
pub fn validate_base_price(value: f64) -> Result<f64, PricingError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value + 0.0)
    } else {
        Err(PricingError::InvalidBasePrice(value))
    }
}

// amounts this large have no fractional part left to round
const WHOLE_AMOUNT: f64 = 4_503_599_627_370_496.0; // 2^52

// round half away from zero to two decimals, so 112.875 -> "112.88"
pub fn to_cents(value: f64) -> String {
    if value.abs() >= WHOLE_AMOUNT {
        return format!("{value:.2}");
    }
    let rounded = (value * 100.0).round() / 100.0 + 0.0;
    format!("{rounded:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cents_round_half_up() {
        assert_eq!(to_cents(112.875), "112.88");
        assert_eq!(to_cents(100.0), "100.00");
        assert_eq!(to_cents(0.004), "0.00");
        assert_eq!(to_cents(19.999), "20.00");
    }

    #[test]
    fn huge_amounts_format_without_overflow() {
        let price = Transform::currency("$").apply("money", 1e307.into()).unwrap();
        let text = price.formatted().unwrap();

        assert!(text.starts_with('$'));
        assert!(text.ends_with(".00"));
        assert_eq!(text.len(), 1 + 308 + 3);
        assert_eq!(to_cents(f64::MAX).len(), 312);
    }

    #[test]
    fn overflowing_rate_is_rejected() {
        let err = Transform::rate(1.05).apply("fedtax", f64::MAX.into()).unwrap_err();

        assert!(matches!(
            err,
            PricingError::NonFiniteAmount { ref decorator, value }
                if decorator == "fedtax" && value == f64::INFINITY
        ));
    }

    #[test]
    fn negative_zero_is_normalised() {
        let base = validate_base_price(-0.0).unwrap();

        assert!(base.is_sign_positive());
        assert_eq!(to_cents(base), "0.00");
        assert_eq!(to_cents(-0.001), "0.00");
    }

    #[test]
    fn base_price_validation() {
        assert_eq!(validate_base_price(0.0), Ok(0.0));
        assert_eq!(validate_base_price(12.5), Ok(12.5));
        assert!(validate_base_price(-1.0).is_err());
        assert!(validate_base_price(f64::INFINITY).is_err());
        assert!(matches!(
            validate_base_price(f64::NAN),
            Err(PricingError::InvalidBasePrice(v)) if v.is_nan()
        ));
    }

    #[test]
    fn formatted_price_is_rejected() {
        let err = Transform::rate(1.05)
            .apply("fedtax", Price::Formatted("$1.00".into()))
            .unwrap_err();

        assert_eq!(
            err,
            PricingError::TypeMismatch {
                decorator: "fedtax".into(),
                found: "$1.00".into()
            }
        );
    }

    #[test]
    fn currency_formats_with_prefix() {
        let price = Transform::currency("CDN$ ").apply("cdn", 100.0.into()).unwrap();
        assert_eq!(price, "CDN$ 100.00");
        assert!(price.is_formatted());
    }
}
