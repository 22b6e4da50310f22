//! Exact arithmetic over Kubernetes resource quantities
//!
//! The API server represents quantities with arbitrary-precision decimal or
//! binary notation ("3.5", "250m", "7Gi", "128974848"). Capacity math must be
//! exact: summing requests across a few thousand containers with floating
//! point would drift. `ResourceAmount` stores a signed integer count of
//! milli-units (the API server's milli scale), so addition and subtraction
//! are plain integer ops and subtraction may legally go negative.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Errors from parsing a quantity string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    /// The string does not match the quantity grammar, or the value is not
    /// representable as an integral number of milli-units.
    #[error("malformed resource quantity {0:?}")]
    Malformed(String),

    /// The value does not fit the internal milli-unit representation.
    #[error("resource quantity {0:?} overflows the milli-unit representation")]
    Overflow(String),
}

/// A resource quantity in milli-units.
///
/// One CPU core is 1000 milli-units, one byte of memory is 1000 milli-units,
/// one pod slot is 1000 milli-units. Values are exact; parsing rejects
/// anything that would require rounding.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceAmount(i64);

impl ResourceAmount {
    pub const ZERO: ResourceAmount = ResourceAmount(0);

    /// Build from a raw milli-unit count.
    pub fn from_milli(milli: i64) -> Self {
        ResourceAmount(milli)
    }

    /// Build from a whole number of units (cores, bytes, pods).
    pub fn from_whole(units: i64) -> Self {
        ResourceAmount(units * 1000)
    }

    /// The raw milli-unit count.
    pub fn to_milli(self) -> i64 {
        self.0
    }

    /// The whole-unit value, truncated toward zero.
    pub fn to_whole(self) -> i64 {
        self.0 / 1000
    }

    /// The value as a float, for human-readable display only.
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / 1000.0
    }

    /// Parse an API quantity string.
    ///
    /// Accepts the Kubernetes grammar: optional sign, decimal mantissa,
    /// then an optional binary suffix (Ki..Ei), decimal suffix (k..E),
    /// the milli suffix `m`, or scientific notation (`e`/`E` with an
    /// integer exponent).
    pub fn parse(input: &str) -> Result<Self, QuantityError> {
        let malformed = || QuantityError::Malformed(input.to_string());
        let overflow = || QuantityError::Overflow(input.to_string());

        let s = input.trim();
        if s.is_empty() {
            return Err(malformed());
        }

        let (negative, s) = match s.as_bytes()[0] {
            b'-' => (true, &s[1..]),
            b'+' => (false, &s[1..]),
            _ => (false, s),
        };

        let digits_end = s
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(s.len());
        let int_part = &s[..digits_end];
        let mut rest = &s[digits_end..];

        let mut frac_part = "";
        if let Some(after_dot) = rest.strip_prefix('.') {
            let frac_end = after_dot
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(after_dot.len());
            frac_part = &after_dot[..frac_end];
            rest = &after_dot[frac_end..];
        }

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(malformed());
        }

        // Mantissa as an integer scaled by 10^frac_len.
        let mut mantissa: i128 = 0;
        for b in int_part.bytes().chain(frac_part.bytes()) {
            mantissa = mantissa
                .checked_mul(10)
                .and_then(|m| m.checked_add(i128::from(b - b'0')))
                .ok_or_else(overflow)?;
        }
        let frac_len = frac_part.len() as i32;

        // Suffix: either a power of two, or a power of ten folded into the
        // decimal exponent below. `1E3` is scientific, a bare `E` is the exa
        // suffix (a whole exa-unit overflows the milli representation).
        let mut pow2: u32 = 0;
        let mut pow10: i32 = 0;
        match rest {
            "" => {}
            "m" => pow10 = -3,
            "k" => pow10 = 3,
            "M" => pow10 = 6,
            "G" => pow10 = 9,
            "T" => pow10 = 12,
            "P" => pow10 = 15,
            "E" => pow10 = 18,
            "Ki" => pow2 = 10,
            "Mi" => pow2 = 20,
            "Gi" => pow2 = 30,
            "Ti" => pow2 = 40,
            "Pi" => pow2 = 50,
            "Ei" => pow2 = 60,
            _ => {
                let exp = rest
                    .strip_prefix('e')
                    .or_else(|| rest.strip_prefix('E'))
                    .ok_or_else(malformed)?;
                pow10 = exp.parse::<i32>().map_err(|_| malformed())?;
                if pow10.abs() > 38 {
                    return Err(overflow());
                }
            }
        }

        let mut value = mantissa;
        if pow2 > 0 {
            value = value
                .checked_mul(1i128.checked_shl(pow2).ok_or_else(overflow)?)
                .ok_or_else(overflow)?;
        }

        // Net decimal exponent: suffix/scientific power, minus the fraction
        // digits, plus three for the milli scale.
        let exp10 = pow10 - frac_len + 3;
        if exp10 >= 0 {
            for _ in 0..exp10 {
                value = value.checked_mul(10).ok_or_else(overflow)?;
            }
        } else {
            for _ in 0..(-exp10) {
                if value % 10 != 0 {
                    // Sub-milli precision: the API server never hands these
                    // out for node or container resources.
                    return Err(malformed());
                }
                value /= 10;
            }
        }

        if negative {
            value = -value;
        }

        i64::try_from(value)
            .map(ResourceAmount)
            .map_err(|_| overflow())
    }

    /// Parse the wrapped `k8s_openapi` quantity.
    pub fn parse_quantity(q: &Quantity) -> Result<Self, QuantityError> {
        Self::parse(&q.0)
    }
}

impl Add for ResourceAmount {
    type Output = ResourceAmount;

    fn add(self, rhs: ResourceAmount) -> ResourceAmount {
        ResourceAmount(self.0 + rhs.0)
    }
}

impl AddAssign for ResourceAmount {
    fn add_assign(&mut self, rhs: ResourceAmount) {
        self.0 += rhs.0;
    }
}

impl Sub for ResourceAmount {
    type Output = ResourceAmount;

    fn sub(self, rhs: ResourceAmount) -> ResourceAmount {
        ResourceAmount(self.0 - rhs.0)
    }
}

impl SubAssign for ResourceAmount {
    fn sub_assign(&mut self, rhs: ResourceAmount) {
        self.0 -= rhs.0;
    }
}

impl Sum for ResourceAmount {
    fn sum<I: Iterator<Item = ResourceAmount>>(iter: I) -> ResourceAmount {
        iter.fold(ResourceAmount::ZERO, Add::add)
    }
}

impl fmt::Display for ResourceAmount {
    /// Canonical form: the whole value when integral, `<n>m` otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 1000 == 0 {
            write!(f, "{}", self.0 / 1000)
        } else {
            write!(f, "{}m", self.0)
        }
    }
}

impl Serialize for ResourceAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
