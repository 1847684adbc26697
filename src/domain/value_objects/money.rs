use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
    Thb,
    Jpy,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "usd",
            Currency::Eur => "eur",
            Currency::Gbp => "gbp",
            Currency::Thb => "thb",
            Currency::Jpy => "jpy",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_lowercase().as_str() {
            "usd" => Some(Currency::Usd),
            "eur" => Some(Currency::Eur),
            "gbp" => Some(Currency::Gbp),
            "thb" => Some(Currency::Thb),
            "jpy" => Some(Currency::Jpy),
            _ => None,
        }
    }

    /// Number of minor-unit digits (2 for cent currencies, 0 for JPY).
    pub fn minor_unit_exponent(&self) -> u32 {
        match self {
            Currency::Jpy => 0,
            _ => 2,
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MoneyError {
    #[error("amount must not be negative")]
    NegativeAmount,
    #[error("amount must be a finite number")]
    NonFinite,
    #[error("unsupported currency: {0}")]
    UnsupportedCurrency(String),
    #[error("currency mismatch: {left} vs {right}")]
    CurrencyMismatch { left: Currency, right: Currency },
    #[error("operation would produce a negative amount")]
    NegativeResult,
    #[error("amount is too large")]
    Overflow,
    #[error("factor must be a finite non-negative number")]
    InvalidFactor,
    #[error("percentage must be between 0 and 100")]
    InvalidPercentage,
}

/// Immutable monetary amount in integer minor units of a single currency.
/// Every operation returns a new value or a typed error; amounts never go
/// negative and currencies never mix silently.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Money {
    amount_minor: i64,
    currency: Currency,
}

/// Result of a fee split: `fee + remainder` equals the original amount exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSplit {
    pub fee: Money,
    pub remainder: Money,
}

impl Money {
    pub fn new(amount: f64, currency_code: &str) -> Result<Self, MoneyError> {
        let currency = Currency::from_code(currency_code)
            .ok_or_else(|| MoneyError::UnsupportedCurrency(currency_code.to_string()))?;

        if !amount.is_finite() {
            return Err(MoneyError::NonFinite);
        }
        if amount < 0.0 {
            return Err(MoneyError::NegativeAmount);
        }

        let scale = 10i64.pow(currency.minor_unit_exponent()) as f64;
        let scaled = amount * scale;
        if scaled > i64::MAX as f64 {
            return Err(MoneyError::Overflow);
        }

        Ok(Self {
            amount_minor: scaled.round() as i64,
            currency,
        })
    }

    pub fn from_minor(amount_minor: i64, currency: Currency) -> Result<Self, MoneyError> {
        if amount_minor < 0 {
            return Err(MoneyError::NegativeAmount);
        }
        Ok(Self {
            amount_minor,
            currency,
        })
    }

    pub fn zero(currency: Currency) -> Self {
        Self {
            amount_minor: 0,
            currency,
        }
    }

    pub fn amount_minor(&self) -> i64 {
        self.amount_minor
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn add(&self, other: &Money) -> Result<Money, MoneyError> {
        self.check_same_currency(other)?;
        let amount_minor = self
            .amount_minor
            .checked_add(other.amount_minor)
            .ok_or(MoneyError::Overflow)?;
        Ok(Money {
            amount_minor,
            currency: self.currency,
        })
    }

    pub fn subtract(&self, other: &Money) -> Result<Money, MoneyError> {
        self.check_same_currency(other)?;
        if other.amount_minor > self.amount_minor {
            return Err(MoneyError::NegativeResult);
        }
        Ok(Money {
            amount_minor: self.amount_minor - other.amount_minor,
            currency: self.currency,
        })
    }

    pub fn multiply(&self, factor: f64) -> Result<Money, MoneyError> {
        if !factor.is_finite() || factor < 0.0 {
            return Err(MoneyError::InvalidFactor);
        }
        let scaled = self.amount_minor as f64 * factor;
        if scaled > i64::MAX as f64 {
            return Err(MoneyError::Overflow);
        }
        Ok(Money {
            amount_minor: scaled.round() as i64,
            currency: self.currency,
        })
    }

    /// Percentage of this amount, rounded half-up in minor units. The percent
    /// is resolved to basis points so repeated computations stay exact.
    pub fn percentage(&self, percent: f64) -> Result<Money, MoneyError> {
        if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
            return Err(MoneyError::InvalidPercentage);
        }
        let basis_points = (percent * 100.0).round() as i128;
        let amount_minor =
            ((self.amount_minor as i128 * basis_points + 5_000) / 10_000) as i64;
        Ok(Money {
            amount_minor,
            currency: self.currency,
        })
    }

    /// Splits this amount into a platform fee and a remainder. The remainder
    /// is derived by subtraction, never rounded independently, so the two
    /// parts always reconcile to the original amount.
    pub fn calculate_platform_fee(&self, fee_percent: f64) -> Result<FeeSplit, MoneyError> {
        let fee = self.percentage(fee_percent)?;
        let remainder = self.subtract(&fee)?;
        Ok(FeeSplit { fee, remainder })
    }

    fn check_same_currency(&self, other: &Money) -> Result<(), MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch {
                left: self.currency,
                right: other.currency,
            });
        }
        Ok(())
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount_minor, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rounds_to_minor_units() {
        let money = Money::new(12.3456, "usd").unwrap();
        assert_eq!(money.amount_minor(), 1235);
        assert_eq!(money.currency(), Currency::Usd);
    }

    #[test]
    fn new_respects_zero_exponent_currencies() {
        let money = Money::new(1200.4, "jpy").unwrap();
        assert_eq!(money.amount_minor(), 1200);
    }

    #[test]
    fn new_rejects_negative_and_non_finite() {
        assert_eq!(Money::new(-1.0, "usd"), Err(MoneyError::NegativeAmount));
        assert_eq!(Money::new(f64::NAN, "usd"), Err(MoneyError::NonFinite));
        assert_eq!(Money::new(f64::INFINITY, "usd"), Err(MoneyError::NonFinite));
    }

    #[test]
    fn new_rejects_unsupported_currency() {
        assert_eq!(
            Money::new(1.0, "xyz"),
            Err(MoneyError::UnsupportedCurrency("xyz".to_string()))
        );
    }

    #[test]
    fn add_and_subtract_keep_currency() {
        let a = Money::from_minor(1500, Currency::Usd).unwrap();
        let b = Money::from_minor(500, Currency::Usd).unwrap();
        assert_eq!(a.add(&b).unwrap().amount_minor(), 2000);
        assert_eq!(a.subtract(&b).unwrap().amount_minor(), 1000);
    }

    #[test]
    fn subtract_never_goes_negative() {
        let a = Money::from_minor(100, Currency::Usd).unwrap();
        let b = Money::from_minor(200, Currency::Usd).unwrap();
        assert_eq!(a.subtract(&b), Err(MoneyError::NegativeResult));
    }

    #[test]
    fn mixing_currencies_is_a_typed_error() {
        let usd = Money::from_minor(100, Currency::Usd).unwrap();
        let eur = Money::from_minor(100, Currency::Eur).unwrap();
        assert!(matches!(
            usd.add(&eur),
            Err(MoneyError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn percentage_rounds_half_up() {
        let money = Money::from_minor(105, Currency::Usd).unwrap();
        // 10% of 105 = 10.5 -> 11
        assert_eq!(money.percentage(10.0).unwrap().amount_minor(), 11);
    }

    #[test]
    fn percentage_rejects_out_of_range() {
        let money = Money::from_minor(100, Currency::Usd).unwrap();
        assert_eq!(money.percentage(-1.0), Err(MoneyError::InvalidPercentage));
        assert_eq!(money.percentage(101.0), Err(MoneyError::InvalidPercentage));
    }

    #[test]
    fn platform_fee_split_reconciles_exactly() {
        for amount in [0, 1, 99, 105, 10_000, 123_457] {
            let money = Money::from_minor(amount, Currency::Usd).unwrap();
            let split = money.calculate_platform_fee(10.0).unwrap();
            assert_eq!(
                split.fee.amount_minor() + split.remainder.amount_minor(),
                amount,
                "fee split must not leak rounding for {amount}"
            );
        }
    }

    #[test]
    fn multiply_rejects_invalid_factor() {
        let money = Money::from_minor(100, Currency::Usd).unwrap();
        assert_eq!(money.multiply(-0.5), Err(MoneyError::InvalidFactor));
        assert_eq!(money.multiply(f64::NAN), Err(MoneyError::InvalidFactor));
    }
}
