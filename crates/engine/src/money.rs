use std::{
    fmt,
    ops::{Add, Sub},
};

/// Signed money amount represented as **integer cents**.
///
/// Use this type for **all** monetary values in the engine (balances, prices,
/// purchase totals) to avoid floating-point drift.
///
/// The value is signed:
/// - positive = credit / increase
/// - negative = debit / decrease
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let amount = MoneyCents::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "$12.34");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Converts a decimal major-unit amount (e.g. `12.34` from an import
    /// file) into cents, rounding to the nearest cent.
    #[must_use]
    pub fn from_major_units(amount: f64) -> Self {
        Self((amount * 100.0).round() as i64)
    }

    /// Checked multiplication by a unit count (returns `None` on overflow).
    #[must_use]
    pub fn checked_mul(self, factor: i64) -> Option<MoneyCents> {
        self.0.checked_mul(factor).map(MoneyCents)
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}${units}.{cents:02}")
    }
}

impl From<i64> for MoneyCents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<MoneyCents> for i64 {
    fn from(value: MoneyCents) -> Self {
        value.0
    }
}

impl Add for MoneyCents {
    type Output = MoneyCents;

    fn add(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0 + rhs.0)
    }
}

impl Sub for MoneyCents {
    type Output = MoneyCents;

    fn sub(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0 - rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_dollars() {
        assert_eq!(MoneyCents::new(0).to_string(), "$0.00");
        assert_eq!(MoneyCents::new(1).to_string(), "$0.01");
        assert_eq!(MoneyCents::new(10).to_string(), "$0.10");
        assert_eq!(MoneyCents::new(1050).to_string(), "$10.50");
        assert_eq!(MoneyCents::new(-1050).to_string(), "-$10.50");
    }

    #[test]
    fn from_major_units_rounds_to_nearest_cent() {
        assert_eq!(MoneyCents::from_major_units(10.0).cents(), 1000);
        assert_eq!(MoneyCents::from_major_units(12.34).cents(), 1234);
        assert_eq!(MoneyCents::from_major_units(0.005).cents(), 1);
        assert_eq!(MoneyCents::from_major_units(-2.50).cents(), -250);
    }

    #[test]
    fn checked_mul_detects_overflow() {
        assert_eq!(
            MoneyCents::new(3000).checked_mul(3),
            Some(MoneyCents::new(9000))
        );
        assert_eq!(MoneyCents::new(i64::MAX).checked_mul(2), None);
    }

    #[test]
    fn comparison_orders_by_cents() {
        assert!(MoneyCents::new(5000) < MoneyCents::new(6000));
        assert!(MoneyCents::new(6000) >= MoneyCents::new(6000));
        assert!((MoneyCents::new(100) - MoneyCents::new(250)).is_negative());
        assert_eq!(MoneyCents::new(100) - MoneyCents::new(100), MoneyCents::ZERO);
    }
}
