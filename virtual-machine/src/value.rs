//! Integer semantics shared by every execution strategy.
//!
//! Without the `bignum` feature values are 64-bit signed integers with
//! wrapping arithmetic. Division rounds toward negative infinity in both modes.

use num_integer::Integer;
#[cfg(feature = "bignum")]
use num_bigint::BigInt;

#[cfg(not(feature = "bignum"))]
pub type MemoryValue = i64;
#[cfg(feature = "bignum")]
pub type MemoryValue = BigInt;

pub fn memval(v: i64) -> MemoryValue {
    v.into()
}

pub fn from_bool(b: bool) -> MemoryValue {
    memval(b as i64)
}

pub fn is_true(v: &MemoryValue) -> bool {
    *v != memval(0)
}

pub fn is_odd(v: &MemoryValue) -> bool {
    v.is_odd()
}

#[cfg(not(feature = "bignum"))]
mod ops {
    use num_integer::Integer;
    use super::MemoryValue;

    pub fn add(a: &MemoryValue, b: &MemoryValue) -> MemoryValue {
        a.wrapping_add(*b)
    }

    pub fn sub(a: &MemoryValue, b: &MemoryValue) -> MemoryValue {
        a.wrapping_sub(*b)
    }

    pub fn mul(a: &MemoryValue, b: &MemoryValue) -> MemoryValue {
        a.wrapping_mul(*b)
    }

    pub fn neg(a: &MemoryValue) -> MemoryValue {
        a.wrapping_neg()
    }

    pub fn div_nonzero(a: &MemoryValue, b: &MemoryValue) -> MemoryValue {
        // i64::MIN / -1 overflows
        if *b == -1 {
            a.wrapping_neg()
        } else {
            Integer::div_floor(a, b)
        }
    }
}

#[cfg(feature = "bignum")]
mod ops {
    use num_integer::Integer;
    use super::MemoryValue;

    pub fn add(a: &MemoryValue, b: &MemoryValue) -> MemoryValue {
        a + b
    }

    pub fn sub(a: &MemoryValue, b: &MemoryValue) -> MemoryValue {
        a - b
    }

    pub fn mul(a: &MemoryValue, b: &MemoryValue) -> MemoryValue {
        a * b
    }

    pub fn neg(a: &MemoryValue) -> MemoryValue {
        -a
    }

    pub fn div_nonzero(a: &MemoryValue, b: &MemoryValue) -> MemoryValue {
        a.div_floor(b)
    }
}

pub use self::ops::{add, mul, neg, sub};

/// Floor division; `None` when `b` is zero.
pub fn div(a: &MemoryValue, b: &MemoryValue) -> Option<MemoryValue> {
    if is_true(b) {
        Some(ops::div_nonzero(a, b))
    } else {
        None
    }
}
