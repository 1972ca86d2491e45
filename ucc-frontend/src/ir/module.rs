//! IR modules
//!
//! A module holds global variables and functions in source order. Its
//! `Display` impl is the byte-exact textual form the whole pipeline is
//! judged by, so the same module always serializes identically.

use super::{Function, IrType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A global variable definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalVar {
    pub name: String,
    pub ty: IrType,
    pub init: Option<i64>,
}

impl fmt::Display for GlobalVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            IrType::Array { .. } => {
                write!(f, "@{} = global {} zeroinitializer", self.name, self.ty)
            }
            _ => write!(
                f,
                "@{} = global {} {}",
                self.name,
                self.ty,
                self.init.unwrap_or(0)
            ),
        }
    }
}

/// A complete IR module
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub globals: Vec<GlobalVar>,
    pub functions: Vec<Function>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sections = Vec::new();
        if !self.globals.is_empty() {
            let lines: Vec<String> = self.globals.iter().map(|g| g.to_string()).collect();
            sections.push(lines.join("\n"));
        }
        for func in &self.functions {
            sections.push(func.to_string());
        }
        if sections.is_empty() {
            return Ok(());
        }
        writeln!(f, "{}", sections.join("\n\n"))
    }
}
