//! Arbitrary-precision signed integer arithmetic (C1).
//!
//! [`Integer`] wraps [`num_bigint::BigInt`] so the rest of the crate never
//! has to worry about fixed-width overflow: matrices full of basis-change
//! coefficients can grow arbitrarily large during Smith Normal Form
//! reduction without silently wrapping.

use num_bigint::BigInt;
use num_integer::Integer as _;
use num_traits::{One, Signed, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// The arithmetic contract required of a ring element usable as a matrix
/// entry throughout this crate: exact add/sub/mul/negate, gcd with Bezout
/// coefficients, exact division, and the non-negative-remainder division
/// algorithm used by Smith Normal Form's divisibility repair step.
///
/// `is_infinite` is a hook for arithmetic domains that adjoin a point at
/// infinity (e.g. an exact-rational extension); ordinary integers never
/// are, so the default implementation simply returns `false`.
pub trait Int:
    Clone
    + PartialEq
    + Eq
    + PartialOrd
    + Ord
    + fmt::Debug
    + fmt::Display
    + for<'a> Add<&'a Self, Output = Self>
    + for<'a> Sub<&'a Self, Output = Self>
    + for<'a> Mul<&'a Self, Output = Self>
    + Neg<Output = Self>
{
    /// The additive identity.
    fn zero() -> Self;
    /// The multiplicative identity.
    fn one() -> Self;
    /// Embed a machine integer.
    fn from_int(value: i64) -> Self;
    /// `true` iff `self` is the additive identity.
    fn is_zero(&self) -> bool;
    /// `true` iff the value represents a point at infinity (never for plain integers).
    fn is_infinite(&self) -> bool {
        false
    }
    /// Greatest common divisor, always returned non-negative.
    fn gcd(&self, other: &Self) -> Self;
    /// Extended Euclidean algorithm: returns `(d, u, v)` with `d = u*self + v*other`
    /// and `d` the (non-negative) gcd of `self` and `other`.
    fn gcd_with_coeffs(&self, other: &Self) -> (Self, Self, Self);
    /// Exact division. Panics if `other` does not divide `self`; callers
    /// are required to establish divisibility before calling.
    fn div_exact(&self, other: &Self) -> Self;
    /// Division algorithm: `(q, r)` with `self = q*other + r` and `0 <= r < |other|`.
    fn division_alg(&self, other: &Self) -> (Self, Self);
    /// Negate in place (convenience used by the SNF sign-normalization step).
    fn negate(&mut self);
}

/// An exact, arbitrary-precision signed integer.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Integer(BigInt);

impl Integer {
    /// The underlying [`BigInt`] value.
    pub fn as_bigint(&self) -> &BigInt {
        &self.0
    }
}

impl From<BigInt> for Integer {
    fn from(value: BigInt) -> Self {
        Integer(value)
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Integer(BigInt::from(value))
    }
}

impl fmt::Debug for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl PartialOrd for Integer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Integer {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl Add<&Integer> for Integer {
    type Output = Integer;
    fn add(self, rhs: &Integer) -> Integer {
        Integer(self.0 + &rhs.0)
    }
}

impl Sub<&Integer> for Integer {
    type Output = Integer;
    fn sub(self, rhs: &Integer) -> Integer {
        Integer(self.0 - &rhs.0)
    }
}

impl Mul<&Integer> for Integer {
    type Output = Integer;
    fn mul(self, rhs: &Integer) -> Integer {
        Integer(self.0 * &rhs.0)
    }
}

impl Neg for Integer {
    type Output = Integer;
    fn neg(self) -> Integer {
        Integer(-self.0)
    }
}

impl Int for Integer {
    fn zero() -> Self {
        Integer(BigInt::zero())
    }

    fn one() -> Self {
        Integer(BigInt::one())
    }

    fn from_int(value: i64) -> Self {
        Integer::from(value)
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    fn gcd(&self, other: &Self) -> Self {
        Integer(self.0.gcd(&other.0).abs())
    }

    fn gcd_with_coeffs(&self, other: &Self) -> (Self, Self, Self) {
        // Iterative extended Euclidean algorithm, normalized so the
        // returned gcd is non-negative (matching divisionAlg's convention).
        let (mut old_r, mut r) = (self.0.clone(), other.0.clone());
        let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
        let (mut old_t, mut t) = (BigInt::zero(), BigInt::one());

        while !r.is_zero() {
            let quotient = &old_r / &r;
            let new_r = &old_r - &quotient * &r;
            old_r = std::mem::replace(&mut r, new_r);
            let new_s = &old_s - &quotient * &s;
            old_s = std::mem::replace(&mut s, new_s);
            let new_t = &old_t - &quotient * &t;
            old_t = std::mem::replace(&mut t, new_t);
        }

        if old_r.is_negative() {
            old_r = -old_r;
            old_s = -old_s;
            old_t = -old_t;
        }

        (Integer(old_r), Integer(old_s), Integer(old_t))
    }

    fn div_exact(&self, other: &Self) -> Self {
        debug_assert!(!other.0.is_zero(), "div_exact by zero");
        let (q, r) = self.0.div_rem(&other.0);
        debug_assert!(r.is_zero(), "div_exact: {self} is not divisible by {other}");
        Integer(q)
    }

    fn division_alg(&self, other: &Self) -> (Self, Self) {
        // num_integer's div_mod_floor gives a remainder with the sign of
        // the divisor; Regina's divisionAlg wants a remainder in [0, |b|).
        let b = &other.0;
        debug_assert!(!b.is_zero(), "division_alg by zero");
        let (mut q, mut r) = self.0.div_rem(b);
        if r.is_negative() {
            if b.is_positive() {
                r += b;
                q -= 1;
            } else {
                r -= b;
                q += 1;
            }
        }
        (Integer(q), Integer(r))
    }

    fn negate(&mut self) {
        self.0 = -std::mem::replace(&mut self.0, BigInt::zero());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(v: i64) -> Integer {
        Integer::from_int(v)
    }

    #[test]
    fn test_gcd_with_coeffs_bezout_identity() {
        for (a, b) in [(12, 18), (-12, 18), (0, 7), (7, 0), (17, 5), (-17, -5)] {
            let (d, u, v) = int(a).gcd_with_coeffs(&int(b));
            let lhs = u.clone() * &int(a) + &(v.clone() * &int(b));
            assert_eq!(lhs, d.clone(), "bezout identity for ({a},{b})");
            assert!(d.as_bigint() >= &num_bigint::BigInt::from(0));
        }
    }

    #[test]
    fn test_gcd_matches_standard_gcd() {
        assert_eq!(int(12).gcd(&int(18)), int(6));
        assert_eq!(int(-12).gcd(&int(18)), int(6));
        assert_eq!(int(0).gcd(&int(5)), int(5));
        assert_eq!(int(0).gcd(&int(0)), int(0));
    }

    #[test]
    fn test_division_alg_nonnegative_remainder() {
        let (q, r) = int(7).division_alg(&int(3));
        assert_eq!((q, r), (int(2), int(1)));

        let (q, r) = int(-7).division_alg(&int(3));
        assert_eq!((q, r), (int(-3), int(2)));

        let (q, r) = int(7).division_alg(&int(-3));
        assert_eq!((q, r), (int(-2), int(1)));

        let (q, r) = int(-7).division_alg(&int(-3));
        assert_eq!((q, r), (int(3), int(2)));
    }

    #[test]
    fn test_div_exact() {
        assert_eq!(int(12).div_exact(&int(3)), int(4));
        assert_eq!(int(-12).div_exact(&int(3)), int(-4));
    }

    #[test]
    fn test_negate() {
        let mut v = int(5);
        v.negate();
        assert_eq!(v, int(-5));
    }
}
