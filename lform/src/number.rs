//! Dynamically typed number type.

use std::fmt::{self, Debug, Display};
use std::hash::{Hash, Hasher};

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

/// Represents a numeric literal: a fixed or arbitrary precision integer, a
/// floating point number, an arbitrary precision decimal, or a ratio.
///
/// Integers are equal by value, whether they are held as an `i64` or as
/// an arbitrary precision integer, so `1` and `1N` are the same map key.
/// Integers, floats, decimals and ratios are never equal to each other.
#[derive(Clone)]
pub struct Number {
    n: N,
}

#[derive(Debug, Clone)]
enum N {
    Int(i64),
    BigInt(BigInt),
    Float(f64),
    Decimal(BigDecimal),
    // Always in lowest terms, with a denominator greater than one.
    Ratio(BigInt, BigInt),
}

impl Number {
    /// Construct an integer, using the fixed-size representation when the
    /// value fits into an `i64`.
    ///
    /// ```
    /// # use lform::Number;
    /// # use num_bigint::BigInt;
    /// assert!(Number::integer(BigInt::from(42)).is_i64());
    /// assert!(Number::integer(BigInt::from(u64::MAX)).is_bigint());
    /// ```
    pub fn integer(n: BigInt) -> Self {
        match n.to_i64() {
            Some(n) => Number { n: N::Int(n) },
            None => Number { n: N::BigInt(n) },
        }
    }

    /// Construct an arbitrary precision integer, as written with the `N`
    /// suffix, regardless of its magnitude.
    pub fn bigint(n: BigInt) -> Self {
        Number { n: N::BigInt(n) }
    }

    /// Construct an arbitrary precision decimal, as written with the `M`
    /// suffix.
    pub fn decimal(d: BigDecimal) -> Self {
        Number { n: N::Decimal(d) }
    }

    /// Construct the ratio `numerator/denominator`, reduced to lowest terms.
    ///
    /// Returns `None` if the denominator is zero. A ratio that reduces to a
    /// whole number yields an integer.
    ///
    /// ```
    /// # use lform::Number;
    /// # use num_bigint::BigInt;
    /// let half = Number::ratio(BigInt::from(2), BigInt::from(4)).unwrap();
    /// assert_eq!(half.to_string(), "1/2");
    /// let two = Number::ratio(BigInt::from(4), BigInt::from(2)).unwrap();
    /// assert_eq!(two.as_i64(), Some(2));
    /// assert!(Number::ratio(BigInt::from(1), BigInt::from(0)).is_none());
    /// ```
    pub fn ratio(numerator: BigInt, denominator: BigInt) -> Option<Self> {
        if denominator.is_zero() {
            return None;
        }
        let divisor = gcd(&numerator, &denominator);
        let (mut numerator, mut denominator) = (numerator / &divisor, denominator / &divisor);
        if denominator.is_negative() {
            numerator = -numerator;
            denominator = -denominator;
        }
        if denominator == BigInt::from(1) {
            Some(Number::integer(numerator))
        } else {
            Some(Number {
                n: N::Ratio(numerator, denominator),
            })
        }
    }

    /// Returns true if the number is an integer that is held as an `i64`.
    #[inline]
    pub fn is_i64(&self) -> bool {
        matches!(self.n, N::Int(_))
    }

    /// Returns true if the number is an arbitrary precision integer.
    #[inline]
    pub fn is_bigint(&self) -> bool {
        matches!(self.n, N::BigInt(_))
    }

    /// Returns true for both fixed and arbitrary precision integers.
    #[inline]
    pub fn is_integer(&self) -> bool {
        matches!(self.n, N::Int(_) | N::BigInt(_))
    }

    /// Returns true if the number is a floating point number.
    #[inline]
    pub fn is_f64(&self) -> bool {
        matches!(self.n, N::Float(_))
    }

    /// Returns true if the number is an arbitrary precision decimal.
    #[inline]
    pub fn is_decimal(&self) -> bool {
        matches!(self.n, N::Decimal(_))
    }

    /// Returns true if the number is a ratio.
    #[inline]
    pub fn is_ratio(&self) -> bool {
        matches!(self.n, N::Ratio(..))
    }

    /// Represent an integer as `i64`, if it fits.
    ///
    /// ```
    /// # use lform::Number;
    /// assert_eq!(Number::from(-7).as_i64(), Some(-7));
    /// assert_eq!(Number::from(1.5).as_i64(), None);
    /// ```
    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        match &self.n {
            N::Int(n) => Some(*n),
            N::BigInt(n) => n.to_i64(),
            _ => None,
        }
    }

    /// Represent an integer as a `BigInt`.
    pub fn as_bigint(&self) -> Option<BigInt> {
        match &self.n {
            N::Int(n) => Some(BigInt::from(*n)),
            N::BigInt(n) => Some(n.clone()),
            _ => None,
        }
    }

    /// Numerator and denominator of a ratio.
    pub fn as_ratio(&self) -> Option<(&BigInt, &BigInt)> {
        match &self.n {
            N::Ratio(n, d) => Some((n, d)),
            _ => None,
        }
    }

    /// The value of an arbitrary precision decimal.
    pub fn as_decimal(&self) -> Option<&BigDecimal> {
        match &self.n {
            N::Decimal(d) => Some(d),
            _ => None,
        }
    }

    /// Approximate the number as `f64`.
    ///
    /// ```
    /// # use lform::Number;
    /// assert_eq!(Number::from(3).as_f64(), Some(3.0));
    /// assert_eq!(Number::from(0.25).as_f64(), Some(0.25));
    /// ```
    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match &self.n {
            N::Int(n) => Some(*n as f64),
            N::BigInt(n) => n.to_f64(),
            N::Float(n) => Some(*n),
            N::Decimal(d) => d.to_f64(),
            N::Ratio(n, d) => Some(n.to_f64()? / d.to_f64()?),
        }
    }

    /// Dispatch based on the type of the contained value.
    ///
    /// Depending on the stored value, one of the functions of the
    /// supplied visitor will be called.
    pub fn visit<V>(&self, visitor: V) -> Result<V::Value, V::Error>
    where
        V: Visitor,
    {
        match &self.n {
            N::Int(n) => visitor.visit_i64(*n),
            N::BigInt(n) => visitor.visit_bigint(n),
            N::Float(n) => visitor.visit_f64(*n),
            N::Decimal(d) => visitor.visit_decimal(d),
            N::Ratio(n, d) => visitor.visit_ratio(n, d),
        }
    }
}

fn gcd(a: &BigInt, b: &BigInt) -> BigInt {
    let (mut a, mut b) = (a.abs(), b.abs());
    while !b.is_zero() {
        let r = &a % &b;
        a = b;
        b = r;
    }
    a
}

impl PartialEq for Number {
    fn eq(&self, other: &Number) -> bool {
        match (&self.n, &other.n) {
            (N::Int(a), N::Int(b)) => a == b,
            (N::Int(a), N::BigInt(b)) | (N::BigInt(b), N::Int(a)) => b.to_i64() == Some(*a),
            (N::BigInt(a), N::BigInt(b)) => a == b,
            (N::Float(a), N::Float(b)) => a == b,
            (N::Decimal(a), N::Decimal(b)) => a == b,
            (N::Ratio(n1, d1), N::Ratio(n2, d2)) => n1 == n2 && d1 == d2,
            _ => false,
        }
    }
}

// Must agree with `eq`: integers that fit an `i64` hash the same in either
// representation, and both zeros hash alike.
impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.n {
            N::Int(n) => {
                0u8.hash(state);
                n.hash(state);
            }
            N::BigInt(n) => match n.to_i64() {
                Some(n) => {
                    0u8.hash(state);
                    n.hash(state);
                }
                None => {
                    1u8.hash(state);
                    n.hash(state);
                }
            },
            N::Float(f) => {
                2u8.hash(state);
                let f = if *f == 0.0 { 0.0f64 } else { *f };
                f.to_bits().hash(state);
            }
            N::Decimal(d) => {
                3u8.hash(state);
                d.hash(state);
            }
            N::Ratio(n, d) => {
                4u8.hash(state);
                n.hash(state);
                d.hash(state);
            }
        }
    }
}

/// Trait to access the value stored in `Number`.
///
/// The `Number` type does not directly expose its internal
/// structure to allow future changes without breaking the API.
///
/// Instead, you can implement this trait and pass your implementation
/// to [`Number::visit`].
pub trait Visitor {
    /// The return type of the visitor methods.
    type Value;
    /// The error type of the visitor methods.
    type Error;

    /// The stored value is an `i64`.
    fn visit_i64(self, n: i64) -> Result<Self::Value, Self::Error>;
    /// The stored value is an arbitrary precision integer.
    fn visit_bigint(self, n: &BigInt) -> Result<Self::Value, Self::Error>;
    /// The stored value is `f64`.
    fn visit_f64(self, n: f64) -> Result<Self::Value, Self::Error>;
    /// The stored value is an arbitrary precision decimal.
    fn visit_decimal(self, d: &BigDecimal) -> Result<Self::Value, Self::Error>;
    /// The stored value is a ratio in lowest terms.
    fn visit_ratio(self, numerator: &BigInt, denominator: &BigInt)
        -> Result<Self::Value, Self::Error>;
}

macro_rules! impl_from_int {
    (
        $($ty:ty),*
    ) => {
        $(
            impl From<$ty> for Number {
                #[inline]
                fn from(n: $ty) -> Self {
                    Number { n: N::Int(i64::from(n)) }
                }
            }
        )*
    };
}

impl_from_int!(u8, u16, u32, i8, i16, i32, i64);

impl From<u64> for Number {
    #[inline]
    fn from(n: u64) -> Self {
        Number::integer(BigInt::from(n))
    }
}

impl From<f32> for Number {
    #[inline]
    fn from(n: f32) -> Self {
        Number {
            n: N::Float(f64::from(n)),
        }
    }
}

impl From<f64> for Number {
    #[inline]
    fn from(n: f64) -> Self {
        Number { n: N::Float(n) }
    }
}

impl From<BigInt> for Number {
    fn from(n: BigInt) -> Self {
        Number::bigint(n)
    }
}

impl From<BigDecimal> for Number {
    fn from(d: BigDecimal) -> Self {
        Number::decimal(d)
    }
}

impl Display for Number {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.n {
            N::Int(i) => Display::fmt(i, formatter),
            N::BigInt(i) => write!(formatter, "{}N", i),
            N::Float(f) => {
                if f.is_nan() {
                    formatter.write_str("##NaN")
                } else if f.is_infinite() {
                    formatter.write_str(if *f > 0.0 { "##Inf" } else { "##-Inf" })
                } else {
                    formatter.write_str(ryu::Buffer::new().format_finite(*f))
                }
            }
            N::Decimal(d) => write!(formatter, "{}M", d),
            N::Ratio(n, d) => write!(formatter, "{}/{}", n, d),
        }
    }
}

impl Debug for Number {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.n, formatter)
    }
}
