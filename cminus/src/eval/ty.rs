use crate::grammer::ast::{Shape, TypeSpec};
use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ty {
    Void,     // void
    Int,      // int
    IntArray, // int[]
    Bool,     // result of a comparison, only valid as a condition
    Error,    // placeholder for error
}

impl Ty {
    /// Type of a declared name: `void x[]` has no valid type
    pub fn of_decl(spec: TypeSpec, shape: &Shape) -> Ty {
        match (spec, shape) {
            (TypeSpec::Int, Shape::Scalar) => Ty::Int,
            (TypeSpec::Int, Shape::Array(_)) => Ty::IntArray,
            (TypeSpec::Void, Shape::Scalar) => Ty::Void,
            (TypeSpec::Void, Shape::Array(_)) => Ty::Error,
        }
    }

    /// Acceptable where an int is required; error operands are already reported
    pub fn is_int_like(self) -> bool {
        matches!(self, Ty::Int | Ty::Error)
    }
}

impl From<TypeSpec> for Ty {
    fn from(spec: TypeSpec) -> Self {
        match spec {
            TypeSpec::Int => Ty::Int,
            TypeSpec::Void => Ty::Void,
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Void => write!(f, "void"),
            Ty::Int => write!(f, "int"),
            Ty::IntArray => write!(f, "int[]"),
            Ty::Bool => write!(f, "bool"),
            Ty::Error => write!(f, "<error>"),
        }
    }
}

impl Serialize for Ty {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
