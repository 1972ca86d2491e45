//! Intermediate representation
//!
//! A structured, LLVM-flavored IR of modules, functions, basic blocks
//! and typed values. The textual form produced by the `Display` impls
//! is the compiler's output format and is deterministic down to the
//! byte.

pub mod blocks;
pub mod builder;
pub mod function;
pub mod instructions;
pub mod module;
pub mod types;
pub mod values;


pub use blocks::BasicBlock;
pub use builder::{BlockId, IrBuilder};
pub use function::Function;
pub use instructions::{BinOp, Instruction, Predicate, Terminator};
pub use module::{GlobalVar, Module};
pub use types::IrType;
pub use values::Value;
