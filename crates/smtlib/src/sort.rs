/// SMT-LIB sort (type) representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Sort {
    /// Boolean sort
    Bool,
    /// Mathematical integer sort
    Int,
    /// Real number sort
    Real,
    /// Fixed-width bitvector: `(_ BitVec n)`
    BitVec(u32),
    /// IEEE 754 floating-point: `(_ FloatingPoint e s)`
    Float(u32, u32),
    /// Array sort: `(Array index_sort element_sort)`
    Array(Box<Sort>, Box<Sort>),
    /// Uninterpreted or enumerated sort, referenced by name
    Uninterpreted(String),
}

impl Sort {
    /// `(_ FloatingPoint 8 24)`
    pub fn float32() -> Self {
        Sort::Float(8, 24)
    }

    /// `(_ FloatingPoint 11 53)`
    pub fn float64() -> Self {
        Sort::Float(11, 53)
    }

    pub fn array(index: Sort, element: Sort) -> Self {
        Sort::Array(Box::new(index), Box::new(element))
    }
}
