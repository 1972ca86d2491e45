//! Basic blocks

use super::{Instruction, Terminator};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A labeled basic block
///
/// The terminator lives outside the instruction list, so a terminated
/// block can still accept entry-block allocas without breaking the
/// one-terminator invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicBlock {
    pub label: String,
    pub instructions: Vec<Instruction>,
    pub terminator: Option<Terminator>,
}

impl BasicBlock {
    pub fn new(label: String) -> Self {
        Self {
            label,
            instructions: Vec::new(),
            terminator: None,
        }
    }

    pub fn is_terminated(&self) -> bool {
        self.terminator.is_some()
    }
}

impl fmt::Display for BasicBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.label)?;
        for inst in &self.instructions {
            writeln!(f, "    {}", inst)?;
        }
        if let Some(term) = &self.terminator {
            writeln!(f, "    {}", term)?;
        }
        Ok(())
    }
}
