use std::{
    fmt::{Debug, Display, Formatter},
    ops::Mul,
};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Price of one gallon, in US dollars.
#[derive(
    Clone,
    Copy,
    Default,
    Deserialize,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    derive_more::Add,
    derive_more::From,
    derive_more::FromStr,
    derive_more::Sub,
)]
#[from(i32, f64, OrderedFloat<f64>)]
#[must_use]
pub struct Dollars(pub OrderedFloat<f64>);

impl Dollars {
    pub const ZERO: Self = Self(OrderedFloat(0.0));

    pub const fn abs(mut self) -> Self {
        self.0 = OrderedFloat(self.0.0.abs());
        self
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0.0 == 0.0
    }

    /// Round half away from zero to the given number of decimals.
    pub fn round(self, n_decimals: i32) -> Self {
        let factor = 10.0_f64.powi(n_decimals);
        Self::from((self.0.0 * factor).round() / factor)
    }
}

impl From<Dollars> for f64 {
    fn from(dollars: Dollars) -> Self {
        dollars.0.0
    }
}

impl Mul<f64> for Dollars {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

/// Shortest decimal form, padded to whole cents: `$3.499`, `$3.50`, `$4.00`.
impl Display for Dollars {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0.0.is_sign_negative() && !self.is_zero() { "-" } else { "" };
        let mut digits = self.abs().0.0.to_string();
        let n_decimals = digits.find('.').map_or(0, |point| digits.len() - point - 1);
        if n_decimals == 0 {
            digits.push('.');
        }
        for _ in n_decimals..2 {
            digits.push('0');
        }
        write!(f, "{sign}${digits}")
    }
}

impl Debug for Dollars {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}$", self.0.0)
    }
}
