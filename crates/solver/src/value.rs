//! Typed constants recovered from (or sent to) the solver.

use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use symbridge_smtlib::term::Term;

use crate::kind::{Kind, UninterpretedSort};

/// A typed literal.
///
/// Float and double payloads compare by bit pattern, so `NaN == NaN` and
/// `0.0 != -0.0`.
#[derive(Debug, Clone)]
pub enum ConstantValue {
    /// Bit-vector or unbounded integer. `value` is already normalized to
    /// the kind's range (see [`ConstantValue::integer`]).
    Integer { kind: Kind, value: BigInt },
    Real(BigRational),
    Float(f32),
    Double(f64),
    Uninterpreted {
        sort: UninterpretedSort,
        element: String,
        /// Position in the sort's enumeration, when it has one.
        index: Option<usize>,
    },
}

impl ConstantValue {
    /// Build an integer constant, reinterpreting `raw` per the kind's width
    /// and signedness. Bit-vector values wrap modulo `2^width`.
    pub fn integer(kind: &Kind, raw: BigInt) -> Self {
        Self::Integer {
            kind: kind.clone(),
            value: normalize_integer(kind, raw),
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            ConstantValue::Integer { kind, .. } => kind.clone(),
            ConstantValue::Real(_) => Kind::Real,
            ConstantValue::Float(_) => Kind::Float,
            ConstantValue::Double(_) => Kind::Double,
            ConstantValue::Uninterpreted { sort, .. } => Kind::Uninterpreted(sort.clone()),
        }
    }

    /// The SMT-LIB literal for this constant.
    pub fn to_term(&self) -> Term {
        match self {
            ConstantValue::Integer {
                kind: Kind::Bounded { width, .. },
                value,
            } => Term::BitVecLit(value.clone(), *width),
            ConstantValue::Integer { value, .. } => Term::IntLit(value.clone()),
            ConstantValue::Real(r) => Term::RealLit(r.clone()),
            ConstantValue::Float(f) => {
                let bits = f.to_bits();
                if f.is_nan() {
                    Term::FpNaN(8, 24)
                } else {
                    Term::FpFromBits(
                        (bits >> 31) as u8,
                        u64::from((bits >> 23) & 0xff),
                        u64::from(bits & 0x7f_ffff),
                        8,
                        24,
                    )
                }
            }
            ConstantValue::Double(d) => {
                let bits = d.to_bits();
                if d.is_nan() {
                    Term::FpNaN(11, 53)
                } else {
                    Term::FpFromBits(
                        (bits >> 63) as u8,
                        (bits >> 52) & 0x7ff,
                        bits & 0x000f_ffff_ffff_ffff,
                        11,
                        53,
                    )
                }
            }
            ConstantValue::Uninterpreted { element, .. } => Term::constant(element.clone()),
        }
    }
}

impl PartialEq for ConstantValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                ConstantValue::Integer { kind: k1, value: v1 },
                ConstantValue::Integer { kind: k2, value: v2 },
            ) => k1 == k2 && v1 == v2,
            (ConstantValue::Real(a), ConstantValue::Real(b)) => a == b,
            (ConstantValue::Float(a), ConstantValue::Float(b)) => a.to_bits() == b.to_bits(),
            (ConstantValue::Double(a), ConstantValue::Double(b)) => a.to_bits() == b.to_bits(),
            (
                ConstantValue::Uninterpreted {
                    sort: s1,
                    element: e1,
                    index: i1,
                },
                ConstantValue::Uninterpreted {
                    sort: s2,
                    element: e2,
                    index: i2,
                },
            ) => s1 == s2 && e1 == e2 && i1 == i2,
            _ => false,
        }
    }
}

impl Eq for ConstantValue {}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantValue::Integer { value, .. } => write!(f, "{value}"),
            ConstantValue::Real(r) => match exact_decimal(r) {
                Some(text) => write!(f, "{text}"),
                None => write!(f, "{}/{}", r.numer(), r.denom()),
            },
            ConstantValue::Float(x) => write!(f, "{x}"),
            ConstantValue::Double(x) => write!(f, "{x}"),
            ConstantValue::Uninterpreted { element, .. } => write!(f, "{element}"),
        }
    }
}

/// A model constant, or one of the unbounded results an optimizer can report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneralizedValue {
    Regular(ConstantValue),
    PositiveInfinity(Kind),
    NegativeInfinity(Kind),
    /// Positive infinitesimal.
    PositiveEpsilon(Kind),
    /// Negative infinitesimal.
    NegativeEpsilon(Kind),
}

impl GeneralizedValue {
    pub fn kind(&self) -> Kind {
        match self {
            GeneralizedValue::Regular(cv) => cv.kind(),
            GeneralizedValue::PositiveInfinity(k)
            | GeneralizedValue::NegativeInfinity(k)
            | GeneralizedValue::PositiveEpsilon(k)
            | GeneralizedValue::NegativeEpsilon(k) => k.clone(),
        }
    }

    pub fn as_regular(&self) -> Option<&ConstantValue> {
        match self {
            GeneralizedValue::Regular(cv) => Some(cv),
            _ => None,
        }
    }
}

impl fmt::Display for GeneralizedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneralizedValue::Regular(cv) => write!(f, "{cv}"),
            GeneralizedValue::PositiveInfinity(_) => write!(f, "oo"),
            GeneralizedValue::NegativeInfinity(_) => write!(f, "-oo"),
            GeneralizedValue::PositiveEpsilon(_) => write!(f, "epsilon"),
            GeneralizedValue::NegativeEpsilon(_) => write!(f, "-epsilon"),
        }
    }
}

/// Wrap `raw` into the range of `kind`. Non-bit-vector kinds pass through.
pub fn normalize_integer(kind: &Kind, raw: BigInt) -> BigInt {
    match kind {
        Kind::Bounded { signed, width } => {
            if *width == 0 {
                return BigInt::zero();
            }
            let modulus = BigInt::one() << *width;
            let wrapped = ((raw % &modulus) + &modulus) % &modulus;
            if *signed && wrapped >= (BigInt::one() << (*width - 1)) {
                wrapped - modulus
            } else {
                wrapped
            }
        }
        _ => raw,
    }
}

/// Render `value` as an exact decimal (`0.25`, `-3.0`), or `None` when its
/// expansion does not terminate.
pub(crate) fn exact_decimal(value: &BigRational) -> Option<String> {
    let denom = value.denom();
    let two = BigInt::from(2);
    let five = BigInt::from(5);
    let mut rest = denom.clone();
    let (mut twos, mut fives) = (0usize, 0usize);
    while (&rest % &two).is_zero() {
        rest /= &two;
        twos += 1;
    }
    while (&rest % &five).is_zero() {
        rest /= &five;
        fives += 1;
    }
    if !rest.is_one() {
        return None;
    }

    let places = twos.max(fives).max(1);
    let scaled = (value.numer() * num_traits::pow(BigInt::from(10), places) / denom).abs();
    let mut digits = scaled.to_string();
    if digits.len() <= places {
        digits = format!("{}{digits}", "0".repeat(places + 1 - digits.len()));
    }
    let (whole, frac) = digits.split_at(digits.len() - places);
    let sign = if value.is_negative() { "-" } else { "" };
    Some(format!("{sign}{whole}.{frac}"))
}
