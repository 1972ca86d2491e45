//! IR-level types
//!
//! The IR type lattice is small: `i32` for `int`, `i8` for `char`, `i1`
//! for comparison results, plus arrays and pointers. Function types
//! never appear as value types; calls name their callee directly.

use crate::types::Type;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type of an IR value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IrType {
    Void,
    I1,
    I8,
    I32,
    Array { len: u64, elem: Box<IrType> },
    Ptr(Box<IrType>),
}

impl IrType {
    /// Lower a resolved source type
    pub fn of(ty: &Type) -> IrType {
        match ty {
            Type::Void => IrType::Void,
            Type::Int => IrType::I32,
            Type::Char => IrType::I8,
            Type::Array { elem, len } => IrType::Array {
                len: *len,
                elem: Box::new(IrType::of(elem)),
            },
            Type::Pointer { elem } => IrType::Ptr(Box::new(IrType::of(elem))),
            Type::Func { .. } => unreachable!("function types are not value types"),
        }
    }

    pub fn pointer_to(&self) -> IrType {
        IrType::Ptr(Box::new(self.clone()))
    }

    /// Element type of a pointer
    pub fn pointee(&self) -> &IrType {
        match self {
            IrType::Ptr(elem) => elem,
            other => unreachable!("{other} is not a pointer type"),
        }
    }
}

impl fmt::Display for IrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrType::Void => write!(f, "void"),
            IrType::I1 => write!(f, "i1"),
            IrType::I8 => write!(f, "i8"),
            IrType::I32 => write!(f, "i32"),
            IrType::Array { len, elem } => write!(f, "[{} x {}]", len, elem),
            IrType::Ptr(elem) => write!(f, "{}*", elem),
        }
    }
}
