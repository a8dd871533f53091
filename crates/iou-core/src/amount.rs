use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A currency unit known at compile time.
///
/// Amounts are parameterised by their currency, so adding a payment in one
/// currency to a balance in another does not type-check.
pub trait Currency:
    Copy + Clone + fmt::Debug + Default + PartialEq + Eq + PartialOrd + Ord + Hash + Send + Sync + 'static
{
    /// ISO-4217 code, e.g. `"USD"`.
    const CODE: &'static str;
}

/// Declares a zero-sized [`Currency`] marker type.
#[macro_export]
macro_rules! currency {
    ($(#[$meta:meta])* $name:ident, $code:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name;

        impl $crate::amount::Currency for $name {
            const CODE: &'static str = $code;
        }
    };
}

currency!(
    /// United States dollar.
    Usd, "USD"
);
currency!(
    /// Euro.
    Eur, "EUR"
);
currency!(
    /// Pound sterling.
    Gbp, "GBP"
);
currency!(
    /// Swiss franc.
    Chf, "CHF"
);
currency!(
    /// Japanese yen.
    Jpy, "JPY"
);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount quantity must be non-negative, got {0}")]
    Negative(i64),
    #[error("amount overflow adding {rhs} to {lhs}")]
    Overflow { lhs: i64, rhs: i64 },
    #[error("currency mismatch: expected {expected}, got {found}")]
    CurrencyMismatch {
        expected: &'static str,
        found: String,
    },
}

/// A non-negative quantity of minor currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount<C: Currency> {
    quantity: i64,
    token: PhantomData<C>,
}

impl<C: Currency> Amount<C> {
    pub fn new(quantity: i64) -> Result<Self, AmountError> {
        if quantity < 0 {
            return Err(AmountError::Negative(quantity));
        }
        Ok(Self {
            quantity,
            token: PhantomData,
        })
    }

    pub fn zero() -> Self {
        Self {
            quantity: 0,
            token: PhantomData,
        }
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn token_code(&self) -> &'static str {
        C::CODE
    }

    /// Checked addition. Both operands are non-negative, so the only failure
    /// is exceeding `i64::MAX`.
    pub fn plus(self, other: Self) -> Result<Self, AmountError> {
        let quantity = self
            .quantity
            .checked_add(other.quantity)
            .ok_or(AmountError::Overflow {
                lhs: self.quantity,
                rhs: other.quantity,
            })?;

        Ok(Self {
            quantity,
            token: PhantomData,
        })
    }
}

impl<C: Currency> Default for Amount<C> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<C: Currency> fmt::Display for Amount<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.quantity, C::CODE)
    }
}

#[derive(Serialize, Deserialize)]
struct AmountRepr {
    quantity: i64,
    token: String,
}

impl<C: Currency> TryFrom<AmountRepr> for Amount<C> {
    type Error = AmountError;

    fn try_from(repr: AmountRepr) -> Result<Self, Self::Error> {
        if repr.token != C::CODE {
            return Err(AmountError::CurrencyMismatch {
                expected: C::CODE,
                found: repr.token,
            });
        }
        Self::new(repr.quantity)
    }
}

impl<C: Currency> Serialize for Amount<C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        AmountRepr {
            quantity: self.quantity,
            token: C::CODE.to_string(),
        }
        .serialize(serializer)
    }
}

impl<'de, C: Currency> Deserialize<'de> for Amount<C> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = AmountRepr::deserialize(deserializer)?;
        Self::try_from(repr).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_quantity() {
        assert_eq!(Amount::<Usd>::new(-1), Err(AmountError::Negative(-1)));
        assert!(Amount::<Usd>::new(0).is_ok());
    }

    #[test]
    fn plus_accumulates_and_detects_overflow() {
        let a = Amount::<Gbp>::new(250).unwrap();
        let b = Amount::<Gbp>::new(50).unwrap();
        assert_eq!(a.plus(b).unwrap().quantity(), 300);

        let max = Amount::<Gbp>::new(i64::MAX).unwrap();
        assert!(matches!(
            max.plus(b),
            Err(AmountError::Overflow { .. })
        ));
    }

    #[test]
    fn displays_with_currency_code() {
        assert_eq!(Amount::<Jpy>::new(1200).unwrap().to_string(), "1200 JPY");
        assert_eq!(Amount::<Eur>::zero().token_code(), "EUR");
    }

    #[test]
    fn serde_checks_currency_token() {
        let json = serde_json::to_string(&Amount::<Usd>::new(400).unwrap()).unwrap();
        assert_eq!(json, r#"{"quantity":400,"token":"USD"}"#);

        let back: Amount<Usd> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.quantity(), 400);

        assert!(serde_json::from_str::<Amount<Eur>>(&json).is_err());
        assert!(serde_json::from_str::<Amount<Usd>>(r#"{"quantity":-5,"token":"USD"}"#).is_err());
    }
}
