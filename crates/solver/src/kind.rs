//! Value kinds, symbolic references, and declared inputs.

use std::fmt;

use symbridge_smtlib::sort::Sort;

/// An uninterpreted sort, optionally closed over a finite set of named
/// elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UninterpretedSort {
    pub name: String,
    /// Explicit enumeration. `None` means the sort is fully uninterpreted.
    pub elements: Option<Vec<String>>,
}

impl UninterpretedSort {
    pub fn opaque(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            elements: None,
        }
    }

    pub fn enumerated(name: impl Into<String>, elements: Vec<String>) -> Self {
        Self {
            name: name.into(),
            elements: Some(elements),
        }
    }

    /// Position of `element` in the enumeration, if the sort has one.
    pub fn index_of(&self, element: &str) -> Option<usize> {
        self.elements
            .as_ref()
            .and_then(|elems| elems.iter().position(|e| e == element))
    }
}

/// Logical sort of a symbolic value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Fixed-width bit-vector.
    Bounded { signed: bool, width: u32 },
    /// Mathematical integer.
    UnboundedInt,
    /// Algebraic real.
    Real,
    /// IEEE 754 single precision.
    Float,
    /// IEEE 754 double precision.
    Double,
    Uninterpreted(UninterpretedSort),
}

impl Kind {
    pub fn signed(width: u32) -> Self {
        Kind::Bounded {
            signed: true,
            width,
        }
    }

    pub fn unsigned(width: u32) -> Self {
        Kind::Bounded {
            signed: false,
            width,
        }
    }

    /// Bit-vectors and unbounded integers.
    pub fn is_integral(&self) -> bool {
        matches!(self, Kind::Bounded { .. } | Kind::UnboundedInt)
    }

    pub fn is_unbounded_int(&self) -> bool {
        matches!(self, Kind::UnboundedInt)
    }

    pub fn is_real(&self) -> bool {
        matches!(self, Kind::Real)
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Kind::Float)
    }

    pub fn is_double(&self) -> bool {
        matches!(self, Kind::Double)
    }

    pub fn is_uninterpreted(&self) -> bool {
        matches!(self, Kind::Uninterpreted(_))
    }

    /// The SMT-LIB sort this kind is declared with.
    pub fn to_sort(&self) -> Sort {
        match self {
            Kind::Bounded { width, .. } => Sort::BitVec(*width),
            Kind::UnboundedInt => Sort::Int,
            Kind::Real => Sort::Real,
            Kind::Float => Sort::float32(),
            Kind::Double => Sort::float64(),
            Kind::Uninterpreted(sort) => Sort::Uninterpreted(sort.name.clone()),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Bounded {
                signed: true,
                width,
            } => write!(f, "Int{width}"),
            Kind::Bounded {
                signed: false,
                width,
            } => write!(f, "Word{width}"),
            Kind::UnboundedInt => write!(f, "Integer"),
            Kind::Real => write!(f, "Real"),
            Kind::Float => write!(f, "Float"),
            Kind::Double => write!(f, "Double"),
            Kind::Uninterpreted(sort) => write!(f, "{}", sort.name),
        }
    }
}

/// Numeric node id of an allocated symbolic value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Recognize the `s<digits>` spelling used on the wire.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let digits = symbol.strip_prefix('s')?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().map(NodeId)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// A symbolic value allocated by the problem builder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymRef {
    pub id: NodeId,
    pub kind: Kind,
}

impl SymRef {
    pub fn new(id: u64, kind: Kind) -> Self {
        Self {
            id: NodeId(id),
            kind,
        }
    }

    /// Wire name, `s<id>`.
    pub fn name(&self) -> String {
        self.id.to_string()
    }
}

impl fmt::Display for SymRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantifier {
    Exists,
    Forall,
}

/// A declared problem input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedSymVar {
    pub sym: SymRef,
    pub name: String,
    pub quantifier: Quantifier,
    /// Bound inputs this one depends on when it is skolemized. Empty for
    /// inputs that precede every quantifier alternation.
    pub skolem_args: Vec<SymRef>,
}

impl NamedSymVar {
    pub fn exists(sym: SymRef, name: impl Into<String>) -> Self {
        Self {
            sym,
            name: name.into(),
            quantifier: Quantifier::Exists,
            skolem_args: Vec::new(),
        }
    }

    pub fn forall(sym: SymRef, name: impl Into<String>) -> Self {
        Self {
            sym,
            name: name.into(),
            quantifier: Quantifier::Forall,
            skolem_args: Vec::new(),
        }
    }

    pub fn with_skolem_args(mut self, args: Vec<SymRef>) -> Self {
        self.skolem_args = args;
        self
    }

    pub fn kind(&self) -> &Kind {
        &self.sym.kind
    }
}

impl fmt::Display for NamedSymVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.sym, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_from_symbol() {
        assert_eq!(NodeId::from_symbol("s0"), Some(NodeId(0)));
        assert_eq!(NodeId::from_symbol("s42"), Some(NodeId(42)));
        assert_eq!(NodeId::from_symbol("s007"), Some(NodeId(7)));
        assert_eq!(NodeId::from_symbol("s"), None);
        assert_eq!(NodeId::from_symbol("s1a"), None);
        assert_eq!(NodeId::from_symbol("x1"), None);
        assert_eq!(NodeId::from_symbol("s-1"), None);
        assert_eq!(NodeId::from_symbol("s99999999999999999999999"), None);
    }

    #[test]
    fn kind_predicates() {
        assert!(Kind::unsigned(8).is_integral());
        assert!(Kind::UnboundedInt.is_integral());
        assert!(!Kind::Real.is_integral());
        assert!(Kind::Real.is_real());
        assert!(Kind::Uninterpreted(UninterpretedSort::opaque("Q")).is_uninterpreted());
    }

    #[test]
    fn kind_structural_equality() {
        assert_eq!(Kind::signed(8), Kind::signed(8));
        assert_ne!(Kind::signed(8), Kind::unsigned(8));
        let a = Kind::Uninterpreted(UninterpretedSort::enumerated("C", vec!["R".into()]));
        let b = Kind::Uninterpreted(UninterpretedSort::opaque("C"));
        assert_ne!(a, b);
    }

    #[test]
    fn kind_to_sort() {
        assert_eq!(Kind::signed(16).to_sort(), Sort::BitVec(16));
        assert_eq!(Kind::Double.to_sort(), Sort::Float(11, 53));
        assert_eq!(
            Kind::Uninterpreted(UninterpretedSort::opaque("Q")).to_sort(),
            Sort::Uninterpreted("Q".into())
        );
    }

    #[test]
    fn kind_display() {
        assert_eq!(Kind::signed(8).to_string(), "Int8");
        assert_eq!(Kind::unsigned(32).to_string(), "Word32");
        assert_eq!(Kind::UnboundedInt.to_string(), "Integer");
    }

    #[test]
    fn enumeration_index() {
        let sort = UninterpretedSort::enumerated("Color", vec!["Red".into(), "Green".into()]);
        assert_eq!(sort.index_of("Green"), Some(1));
        assert_eq!(sort.index_of("Blue"), None);
        assert_eq!(UninterpretedSort::opaque("Q").index_of("x"), None);
    }

    #[test]
    fn named_var_display() {
        let v = NamedSymVar::exists(SymRef::new(3, Kind::Real), "r");
        assert_eq!(v.to_string(), "s3 (r)");
        assert_eq!(v.quantifier, Quantifier::Exists);
    }
}
