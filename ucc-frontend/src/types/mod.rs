//! Semantic type definitions for uC
//!
//! `int` and `char` are mutually assignable through implicit truncation
//! and sign extension; those are the only implicit numeric conversions.
//! Array types never appear as rvalues: any use of an array outside of
//! indexing decays to a pointer to its element type. Pointer types are
//! produced only by that decay, never written in source.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A resolved uC type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Type {
    /// Valid only as a function result or as the no-parameter marker
    Void,
    Int,
    Char,
    Array { elem: Box<Type>, len: u64 },
    Pointer { elem: Box<Type> },
    Func { result: Box<Type>, params: Vec<Type> },
}

impl Type {
    /// Integer types, the operands of arithmetic
    pub fn is_arithmetic(&self) -> bool {
        matches!(self, Type::Int | Type::Char)
    }

    /// Scalar types: the integers plus decayed pointers
    pub fn is_scalar(&self) -> bool {
        matches!(self, Type::Int | Type::Char | Type::Pointer { .. })
    }

    /// Array-to-pointer decay; any other type is unchanged
    pub fn decay(&self) -> Type {
        match self {
            Type::Array { elem, .. } => Type::Pointer { elem: elem.clone() },
            other => other.clone(),
        }
    }

    /// Implicit-assignment compatibility, after the source has decayed
    ///
    /// `int` and `char` convert to each other; pointers only match a
    /// pointer to the same element type.
    pub fn is_assignable_to(&self, dest: &Type) -> bool {
        match (self, dest) {
            (Type::Int | Type::Char, Type::Int | Type::Char) => true,
            (Type::Pointer { elem: a }, Type::Pointer { elem: b }) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Void => write!(f, "void"),
            Type::Int => write!(f, "int"),
            Type::Char => write!(f, "char"),
            Type::Array { elem, len } => write!(f, "{}[{}]", elem, len),
            Type::Pointer { elem } => write!(f, "{}*", elem),
            Type::Func { result, params } => {
                write!(f, "{}(", result)?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", param)?;
                }
                write!(f, ")")
            }
        }
    }
}
