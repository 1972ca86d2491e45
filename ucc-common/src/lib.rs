//! uC Compiler - Common Types and Utilities
//!
//! This crate contains the shared types used by every phase of the uC
//! compiler: source positions and the common error type.

pub mod error;
pub mod source_loc;

pub use error::{CompilerError, ErrorReporter};
pub use source_loc::{HasSpan, SourceLocation, SourceSpan};
