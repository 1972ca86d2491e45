//! Front- and middle-end for the uC language
//!
//! The crate takes a parsed [`Ast`], checks it, and lowers it to a
//! textual LLVM-flavored IR module:
//!
//! - [`semantic`] resolves names and types into a [`ResolutionTable`]
//! - [`codegen`] lowers the checked tree to an IR [`Module`]
//! - [`ir`] defines the module structure and its deterministic
//!   serialization
//!
//! Lexing, parsing and any driver around this pipeline live elsewhere;
//! the tree comes in through [`ast`] and the result leaves as the
//! `Display` output of the module.

pub mod ast;
pub mod codegen;
pub mod ir;
pub mod semantic;
pub mod types;

mod codegen_tests;

pub use ast::Ast;
pub use ir::Module;
pub use semantic::ResolutionTable;
pub use types::Type;
pub use ucc_common::CompilerError;

/// Check a translation unit and lower it to an IR module
pub fn compile(ast: &Ast) -> Result<Module, Vec<CompilerError>> {
    let table = semantic::check(ast)?;
    codegen::gen(ast, &table).map_err(|err| vec![err])
}
