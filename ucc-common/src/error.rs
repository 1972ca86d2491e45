//! Error handling for the uC compiler
//!
//! User-facing errors carry a source position and render as
//! `<position>: <message>`. Compiler bugs never go through this type;
//! invariant violations inside the IR builder panic.

use crate::source_loc::SourceLocation;
use thiserror::Error;

/// Main compiler error type that encompasses all phases of compilation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompilerError {
    /// A scoping or declaration error found during semantic analysis.
    #[error("{location}: {message}")]
    Semantic {
        location: SourceLocation,
        message: String,
    },

    /// An operand, assignment, condition or argument type error.
    #[error("{location}: {message}")]
    Type {
        location: SourceLocation,
        message: String,
    },

    /// A user-visible error raised while translating to IR.
    #[error("{location}: {message}")]
    Codegen {
        location: SourceLocation,
        message: String,
    },
}

impl CompilerError {
    /// Create a semantic error
    pub fn semantic_error(message: String, location: SourceLocation) -> Self {
        CompilerError::Semantic { location, message }
    }

    /// Create a type error
    pub fn type_error(message: String, location: SourceLocation) -> Self {
        CompilerError::Type { location, message }
    }

    /// Create a codegen error
    pub fn codegen_error(message: String, location: SourceLocation) -> Self {
        CompilerError::Codegen { location, message }
    }

    /// The source position of the error
    pub fn location(&self) -> &SourceLocation {
        match self {
            CompilerError::Semantic { location, .. }
            | CompilerError::Type { location, .. }
            | CompilerError::Codegen { location, .. } => location,
        }
    }
}

/// Error collector used for per-declaration error recovery
///
/// Semantic analysis aborts the declaration it is looking at on the
/// first error but keeps going with the next top-level declaration, so
/// a single run can surface independent errors in unrelated functions.
#[derive(Debug, Default)]
pub struct ErrorReporter {
    errors: Vec<CompilerError>,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error
    pub fn report(&mut self, error: CompilerError) {
        self.errors.push(error);
    }

    /// Check if any errors have been reported
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get the number of errors
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Consume the reporter, yielding the collected errors
    pub fn into_errors(self) -> Vec<CompilerError> {
        self.errors
    }
}
