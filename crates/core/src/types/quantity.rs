//! Line quantities, always at least one.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityError {
    /// The value was zero.
    #[error("quantity must be at least 1")]
    Zero,
}

/// Number of units of a cart line.
///
/// A quantity is always at least one; a line that would drop to zero is
/// removed from the cart instead. Deserialization enforces the same bound,
/// so a stored record with `"quantity": 0` is rejected as corrupt.
///
/// ## Examples
///
/// ```
/// use lumen_core::Quantity;
///
/// let two = Quantity::ONE.checked_apply(1).unwrap();
/// assert_eq!(two.get(), 2);
///
/// // Falling to zero signals removal to the caller.
/// assert!(Quantity::ONE.checked_apply(-1).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(1);

    /// Create a quantity, rejecting zero.
    #[must_use]
    pub const fn new(value: u32) -> Option<Self> {
        if value == 0 { None } else { Some(Self(value)) }
    }

    /// The underlying count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Apply a signed delta. Returns `None` when the result would fall to
    /// zero or below, which callers treat as a removal.
    #[must_use]
    pub fn checked_apply(self, delta: i64) -> Option<Self> {
        let next = i64::from(self.0).saturating_add(delta);
        if next < 1 {
            return None;
        }
        let clamped = next.min(i64::from(u32::MAX));
        u32::try_from(clamped).ok().and_then(Self::new)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(QuantityError::Zero)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero() {
        assert!(Quantity::new(0).is_none());
        assert_eq!(Quantity::new(3).unwrap().get(), 3);
    }

    #[test]
    fn test_checked_apply_increments() {
        let q = Quantity::new(2).unwrap();
        assert_eq!(q.checked_apply(1).unwrap().get(), 3);
        assert_eq!(q.checked_apply(-1).unwrap().get(), 1);
    }

    #[test]
    fn test_checked_apply_signals_removal() {
        assert!(Quantity::ONE.checked_apply(-1).is_none());
        assert!(Quantity::new(5).unwrap().checked_apply(-10).is_none());
    }

    #[test]
    fn test_checked_apply_saturates() {
        let q = Quantity::new(u32::MAX).unwrap();
        assert_eq!(q.checked_apply(10).unwrap().get(), u32::MAX);
    }

    #[test]
    fn test_serde_rejects_zero() {
        let parsed: Result<Quantity, _> = serde_json::from_str("0");
        assert!(parsed.is_err());

        let three: Quantity = serde_json::from_str("3").unwrap();
        assert_eq!(three.get(), 3);
        assert_eq!(serde_json::to_string(&three).unwrap(), "3");
    }
}
