//! IR functions

use super::{BasicBlock, IrType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A function definition or declaration
///
/// A declaration has no blocks and serializes as a `declare` line; a
/// definition serializes as a `define` with its body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub params: Vec<(String, IrType)>,
    pub return_type: IrType,
    pub blocks: Vec<BasicBlock>,
}

impl Function {
    /// A body-less declaration; parameter names are not retained
    pub fn declaration(name: &str, param_types: Vec<IrType>, return_type: IrType) -> Self {
        Self {
            name: name.to_string(),
            params: param_types.into_iter().map(|ty| (String::new(), ty)).collect(),
            return_type,
            blocks: Vec::new(),
        }
    }

    pub fn is_declaration(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_declaration() {
            write!(f, "declare {} @{}(", self.return_type, self.name)?;
            for (i, (_, ty)) in self.params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", ty)?;
            }
            return write!(f, ")");
        }
        write!(f, "define {} @{}(", self.return_type, self.name)?;
        for (i, (name, ty)) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} %{}", ty, name)?;
        }
        writeln!(f, ") {{")?;
        for block in &self.blocks {
            write!(f, "{}", block)?;
        }
        write!(f, "}}")
    }
}
