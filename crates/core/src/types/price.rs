//! Type-safe price representation in COP minor units.
//!
//! The store sells in Colombian pesos, which have no fractional unit in
//! practice, so a price is a non-negative integer amount of pesos. Arithmetic
//! saturates instead of wrapping: an absurd cart is better than a panic in a
//! total-function cart store.

use serde::{Deserialize, Serialize};

/// A non-negative amount of money in COP minor units.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// Zero pesos.
    pub const ZERO: Self = Self(0);

    /// Create a price from minor units, clamping negative input to zero.
    #[must_use]
    pub const fn from_minor(amount: i64) -> Self {
        if amount < 0 { Self(0) } else { Self(amount) }
    }

    /// The amount in minor units.
    #[must_use]
    pub const fn as_minor(&self) -> i64 {
        self.0
    }

    /// Whether the price is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Saturating addition.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Saturating subtraction, floored at zero.
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self::from_minor(self.0.saturating_sub(other.0))
    }

    /// Saturating multiplication by a quantity.
    #[must_use]
    pub const fn saturating_mul(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(quantity as i64))
    }

    /// Format for display in the es-CO convention: `$ 1.234.567`.
    #[must_use]
    pub fn display(&self) -> String {
        let digits = self.0.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        let offset = digits.len() % 3;
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (i + 3 - offset) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }
        format!("$ {grouped}")
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

// Stored as a plain BIGINT column.
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i64 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i64 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(
        value: sqlx::postgres::PgValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <i64 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::from_minor(amount))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i64 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_amounts_clamp_to_zero() {
        assert_eq!(Price::from_minor(-500), Price::ZERO);
    }

    #[test]
    fn display_groups_thousands_with_dots() {
        assert_eq!(Price::from_minor(0).display(), "$ 0");
        assert_eq!(Price::from_minor(950).display(), "$ 950");
        assert_eq!(Price::from_minor(50_000).display(), "$ 50.000");
        assert_eq!(Price::from_minor(1_234_567).display(), "$ 1.234.567");
        assert_eq!(Price::from_minor(100).display(), "$ 100");
        assert_eq!(Price::from_minor(1_000).display(), "$ 1.000");
    }

    #[test]
    fn multiplication_saturates() {
        let price = Price::from_minor(i64::MAX);
        assert_eq!(price.saturating_mul(3).as_minor(), i64::MAX);
    }

    #[test]
    fn subtraction_floors_at_zero() {
        let a = Price::from_minor(1_000);
        let b = Price::from_minor(2_500);
        assert_eq!(a.saturating_sub(b), Price::ZERO);
        assert_eq!(b.saturating_sub(a).as_minor(), 1_500);
    }

    #[test]
    fn serde_is_transparent() {
        let price = Price::from_minor(50_000);
        assert_eq!(
            serde_json::to_string(&price).expect("serialize"),
            "50000"
        );
        let back: Price = serde_json::from_str("50000").expect("deserialize");
        assert_eq!(back, price);
    }
}
