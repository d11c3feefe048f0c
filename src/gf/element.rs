//! A single GF(2^m) field element, carrying its field's log/antilog tables.
//!
//! This plays the role this codebase's `Galois16` type plays for the fixed
//! GF(2^16) case, generalized to a runtime field width and backed by the
//! shared, memoized `GfTables` for that width (see `crate::init`).

use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Sub, SubAssign};
use std::sync::Arc;

use super::tables::GfTables;

/// An element of GF(2^m) plus a handle to its field's tables.
///
/// Addition/subtraction are XOR; multiplication goes through the log/antilog
/// tables. Cloning is cheap (the tables are reference-counted and shared
/// across every element and the codec that produced them).
#[derive(Clone)]
pub struct Gf {
    value: u16,
    tables: Arc<GfTables>,
}

impl Gf {
    #[inline]
    pub fn new(value: u16, tables: Arc<GfTables>) -> Self {
        debug_assert!((value as u32) <= tables.limit, "value out of range for field width");
        Self { value, tables }
    }

    #[inline]
    pub fn zero(tables: Arc<GfTables>) -> Self {
        Self { value: 0, tables }
    }

    #[inline]
    pub fn one(tables: Arc<GfTables>) -> Self {
        Self { value: 1, tables }
    }

    #[inline]
    pub fn value(&self) -> u16 {
        self.value
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.value == 0
    }

    #[inline]
    pub fn tables(&self) -> &Arc<GfTables> {
        &self.tables
    }

    /// Multiplicative inverse; `None` for zero (no inverse exists).
    #[inline]
    pub fn inverse(&self) -> Option<Self> {
        if self.value == 0 {
            None
        } else {
            Some(Self::new(self.tables.inverse[self.value as usize], self.tables.clone()))
        }
    }
}

impl fmt::Debug for Gf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gf({})", self.value)
    }
}

impl PartialEq for Gf {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}
impl Eq for Gf {}

// Addition is XOR.
impl Add for Gf {
    type Output = Self;
    #[allow(clippy::suspicious_arithmetic_impl)]
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.value ^ rhs.value, self.tables)
    }
}

impl AddAssign for Gf {
    #[allow(clippy::suspicious_op_assign_impl)]
    fn add_assign(&mut self, rhs: Self) {
        self.value ^= rhs.value;
    }
}

// Subtraction is the same as addition in characteristic 2.
impl Sub for Gf {
    type Output = Self;
    #[allow(clippy::suspicious_arithmetic_impl)]
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.value ^ rhs.value, self.tables)
    }
}

impl SubAssign for Gf {
    #[allow(clippy::suspicious_op_assign_impl)]
    fn sub_assign(&mut self, rhs: Self) {
        self.value ^= rhs.value;
    }
}

impl Mul for Gf {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        let v = self.tables.mul(self.value, rhs.value);
        Self::new(v, self.tables)
    }
}

impl MulAssign for Gf {
    fn mul_assign(&mut self, rhs: Self) {
        self.value = self.tables.mul(self.value, rhs.value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gf::tables::GfTables;

    fn t8() -> Arc<GfTables> {
        Arc::new(GfTables::build(8).unwrap())
    }

    #[test]
    fn add_is_xor() {
        let tb = t8();
        let a = Gf::new(0x53, tb.clone());
        let b = Gf::new(0x2A, tb);
        assert_eq!((a.clone() + b.clone()).value(), 0x53 ^ 0x2A);
        assert_eq!((a - b).value(), 0x53 ^ 0x2A);
    }

    #[test]
    fn zero_and_one_identities() {
        let tb = t8();
        let zero = Gf::zero(tb.clone());
        let one = Gf::one(tb.clone());
        let a = Gf::new(77, tb);
        assert_eq!((a.clone() * one).value(), 77);
        assert_eq!((a * zero).value(), 0);
    }

    #[test]
    fn inverse_of_zero_is_none() {
        let tb = t8();
        assert!(Gf::zero(tb).inverse().is_none());
    }

    #[test]
    fn inverse_roundtrip() {
        let tb = t8();
        let a = Gf::new(200, tb.clone());
        let inv = a.clone().inverse().unwrap();
        assert_eq!((a * inv).value(), 1);
    }
}
