//! Semantic analysis error definitions

use crate::types::Type;
use thiserror::Error;
use ucc_common::{CompilerError, SourceLocation};

/// Semantic analysis errors
///
/// Argument count mismatches are reported as a type error, like the
/// other operand errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SemanticError {
    #[error("redeclaration of `{name}` in the same scope")]
    Redeclaration {
        name: String,
        location: SourceLocation,
    },

    #[error("`{name}` redeclared with a conflicting type")]
    ConflictingTypes {
        name: String,
        location: SourceLocation,
    },

    #[error("redefinition of `{name}`")]
    Redefinition {
        name: String,
        location: SourceLocation,
    },

    #[error("global `{name}` initialized more than once")]
    MultipleInitializers {
        name: String,
        location: SourceLocation,
    },

    #[error("undeclared identifier `{name}`")]
    Undeclared {
        name: String,
        location: SourceLocation,
    },

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: Type,
        found: Type,
        location: SourceLocation,
    },

    #[error("condition has non-scalar type {found}")]
    NonScalarCondition {
        found: Type,
        location: SourceLocation,
    },

    #[error("invalid operand to `{op}`: {found}")]
    InvalidOperand {
        op: String,
        found: Type,
        location: SourceLocation,
    },

    #[error("`{name}` is not a function")]
    NotAFunction {
        name: String,
        location: SourceLocation,
    },

    #[error("type {found} cannot be indexed")]
    NotIndexable {
        found: Type,
        location: SourceLocation,
    },

    #[error("call to `{name}`: expected {expected} argument(s), found {found}")]
    ArgumentCountMismatch {
        name: String,
        expected: usize,
        found: usize,
        location: SourceLocation,
    },

    #[error("expression is not an assignable location")]
    InvalidAssignmentTarget { location: SourceLocation },

    #[error("variable `{name}` declared void")]
    VoidVariable {
        name: String,
        location: SourceLocation,
    },

    #[error("array `{name}` has an invalid element type")]
    InvalidArrayElement {
        name: String,
        location: SourceLocation,
    },

    #[error("array `{name}` is missing a size")]
    ArraySizeRequired {
        name: String,
        location: SourceLocation,
    },

    #[error("function `{name}` has an invalid result type")]
    InvalidResultType {
        name: String,
        location: SourceLocation,
    },

    #[error("unnamed parameter in definition of `{name}`")]
    UnnamedParameter {
        name: String,
        location: SourceLocation,
    },

    #[error("initializer of global `{name}` is not a constant")]
    NonConstantInitializer {
        name: String,
        location: SourceLocation,
    },
}

impl SemanticError {
    pub fn location(&self) -> &SourceLocation {
        match self {
            SemanticError::Redeclaration { location, .. }
            | SemanticError::ConflictingTypes { location, .. }
            | SemanticError::Redefinition { location, .. }
            | SemanticError::MultipleInitializers { location, .. }
            | SemanticError::Undeclared { location, .. }
            | SemanticError::TypeMismatch { location, .. }
            | SemanticError::NonScalarCondition { location, .. }
            | SemanticError::InvalidOperand { location, .. }
            | SemanticError::NotAFunction { location, .. }
            | SemanticError::NotIndexable { location, .. }
            | SemanticError::ArgumentCountMismatch { location, .. }
            | SemanticError::InvalidAssignmentTarget { location }
            | SemanticError::VoidVariable { location, .. }
            | SemanticError::InvalidArrayElement { location, .. }
            | SemanticError::ArraySizeRequired { location, .. }
            | SemanticError::InvalidResultType { location, .. }
            | SemanticError::UnnamedParameter { location, .. }
            | SemanticError::NonConstantInitializer { location, .. } => location,
        }
    }

    fn is_type_error(&self) -> bool {
        matches!(
            self,
            SemanticError::TypeMismatch { .. }
                | SemanticError::NonScalarCondition { .. }
                | SemanticError::InvalidOperand { .. }
                | SemanticError::NotAFunction { .. }
                | SemanticError::NotIndexable { .. }
                | SemanticError::ArgumentCountMismatch { .. }
                | SemanticError::InvalidAssignmentTarget { .. }
        )
    }
}

impl From<SemanticError> for CompilerError {
    fn from(err: SemanticError) -> Self {
        let location = err.location().clone();
        let message = err.to_string();
        if err.is_type_error() {
            CompilerError::type_error(message, location)
        } else {
            CompilerError::semantic_error(message, location)
        }
    }
}
