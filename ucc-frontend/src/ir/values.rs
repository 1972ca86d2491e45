//! IR values

use super::IrType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An SSA value operand
///
/// Registers are numbered per function in creation order. Parameters
/// are named values and keep their source name. Globals are always of
/// pointer type; their contents are reached through loads and stores.
/// The only pointer-typed constant is the null pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Reg { id: u32, ty: IrType },
    Arg { name: String, ty: IrType },
    Const { value: i64, ty: IrType },
    Global { name: String, ty: IrType },
}

impl Value {
    pub fn ty(&self) -> &IrType {
        match self {
            Value::Reg { ty, .. }
            | Value::Arg { ty, .. }
            | Value::Const { ty, .. }
            | Value::Global { ty, .. } => ty,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Reg { id, .. } => write!(f, "%{}", id),
            Value::Arg { name, .. } => write!(f, "%{}", name),
            Value::Const {
                ty: IrType::Ptr(_), ..
            } => write!(f, "null"),
            Value::Const { value, .. } => write!(f, "{}", value),
            Value::Global { name, .. } => write!(f, "@{}", name),
        }
    }
}
