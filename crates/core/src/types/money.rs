//! Monetary amounts backed by decimal arithmetic.
//!
//! Prices and totals are [`Decimal`] values paired with a [`Currency`].
//! Binary floating point never touches money: parsing, arithmetic, and
//! display all stay in decimal space.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A monetary amount with its currency.
///
/// ## Examples
///
/// ```
/// use lumen_core::{Currency, Money};
///
/// let price = Money::from_cents(5999, Currency::USD);
/// assert_eq!(price.display(), "$59.99");
///
/// // Lenient parsing tolerates symbols and separators.
/// let tagged = Money::parse_lenient("$1,299.99", Currency::USD);
/// assert_eq!(tagged.display(), "$1299.99");
///
/// // Garbage parses to zero rather than failing.
/// let missing = Money::parse_lenient("price on request", Currency::USD);
/// assert!(missing.amount().is_zero());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    amount: Decimal,
    /// ISO 4217 currency.
    currency: Currency,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Zero in the given currency.
    #[must_use]
    pub const fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Create an amount from the smallest currency unit (e.g., cents for USD).
    #[must_use]
    pub fn from_cents(cents: i64, currency: Currency) -> Self {
        Self {
            amount: Decimal::new(cents, 2),
            currency,
        }
    }

    /// Extract the leading decimal number from arbitrary text.
    ///
    /// Currency symbols, thousands separators, and any other characters are
    /// ignored; a second decimal point ends the number. Input with no usable
    /// digits yields zero. This never fails, which makes it safe for text
    /// scraped from a rendered page.
    #[must_use]
    pub fn parse_lenient(text: &str, currency: Currency) -> Self {
        let mut cleaned = String::with_capacity(text.len());
        let mut seen_dot = false;
        for ch in text.chars() {
            match ch {
                '0'..='9' => cleaned.push(ch),
                '.' if !seen_dot => {
                    seen_dot = true;
                    cleaned.push(ch);
                }
                '.' => break,
                _ => {}
            }
        }
        if cleaned.ends_with('.') {
            cleaned.pop();
        }
        if cleaned.starts_with('.') {
            cleaned.insert(0, '0');
        }
        let amount = cleaned.parse::<Decimal>().unwrap_or_default();
        Self { amount, currency }
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// The currency of this amount.
    #[must_use]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// Format for display with the currency symbol and exactly two decimal
    /// places (e.g., "$19.99"). Midpoints round away from zero.
    #[must_use]
    pub fn display(&self) -> String {
        let mut amount = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        amount.rescale(2);
        format!("{}{amount}", self.currency.symbol())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// ISO 4217 currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl Currency {
    /// The display symbol for this currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "\u{20ac}",
            Self::GBP => "\u{a3}",
        }
    }

    /// The ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }

    /// Parse an ISO 4217 code, case-insensitively.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "USD" => Some(Self::USD),
            "EUR" => Some(Self::EUR),
            "GBP" => Some(Self::GBP),
            "CAD" => Some(Self::CAD),
            "AUD" => Some(Self::AUD),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_to_two_decimals() {
        let m = Money::new(Decimal::new(599, 1), Currency::EUR);
        assert_eq!(m.display(), "\u{20ac}59.90");

        let whole = Money::new(Decimal::from(60), Currency::USD);
        assert_eq!(whole.display(), "$60.00");

        assert_eq!(Money::zero(Currency::USD).display(), "$0.00");
    }

    #[test]
    fn test_display_rounds_midpoints_away_from_zero() {
        let m = Money::new(Decimal::new(5999, 3), Currency::USD);
        assert_eq!(m.display(), "$6.00");

        let tax = Money::new(Decimal::new(105, 3), Currency::USD);
        assert_eq!(tax.display(), "$0.11");
    }

    #[test]
    fn test_parse_lenient_strips_currency_noise() {
        let m = Money::parse_lenient("$1,299.99", Currency::USD);
        assert_eq!(m.amount(), Decimal::new(129_999, 2));

        let eur = Money::parse_lenient("49.99 \u{20ac}", Currency::EUR);
        assert_eq!(eur.amount(), Decimal::new(4999, 2));
    }

    #[test]
    fn test_parse_lenient_garbage_is_zero() {
        assert!(Money::parse_lenient("", Currency::USD).amount().is_zero());
        assert!(
            Money::parse_lenient("price on request", Currency::USD)
                .amount()
                .is_zero()
        );
        assert!(
            Money::parse_lenient("..5", Currency::USD)
                .amount()
                .is_zero()
        );
    }

    #[test]
    fn test_parse_lenient_stops_at_second_dot() {
        let m = Money::parse_lenient("1.2.3", Currency::USD);
        assert_eq!(m.amount(), Decimal::new(12, 1));
    }

    #[test]
    fn test_parse_lenient_bare_fraction() {
        let m = Money::parse_lenient(".5", Currency::USD);
        assert_eq!(m.amount(), Decimal::new(5, 1));

        let trailing = Money::parse_lenient("5.", Currency::USD);
        assert_eq!(trailing.amount(), Decimal::from(5));
    }

    #[test]
    fn test_parse_lenient_strips_sign() {
        // A minus sign is noise, not a negation.
        let m = Money::parse_lenient("-10.50", Currency::USD);
        assert_eq!(m.amount(), Decimal::new(1050, 2));
    }

    #[test]
    fn test_from_cents() {
        let m = Money::from_cents(5999, Currency::USD);
        assert_eq!(m.amount(), Decimal::new(5999, 2));
        assert_eq!(m.currency(), Currency::USD);
    }

    #[test]
    fn test_serde_roundtrip() {
        let m = Money::from_cents(5999, Currency::USD);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"amount":"59.99","currency":"USD"}"#);

        let parsed: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, m);
    }

    #[test]
    fn test_currency_symbols() {
        assert_eq!(Currency::USD.symbol(), "$");
        assert_eq!(Currency::EUR.symbol(), "\u{20ac}");
        assert_eq!(Currency::GBP.symbol(), "\u{a3}");
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("usd"), Some(Currency::USD));
        assert_eq!(Currency::from_code("EUR"), Some(Currency::EUR));
        assert_eq!(Currency::from_code("yen"), None);
    }
}
