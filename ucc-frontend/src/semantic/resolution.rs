//! Resolution results of semantic analysis
//!
//! The table is built once by the analyzer and read-only afterwards; it
//! is keyed on arena indices so the tree itself stays untouched.

use crate::ast::{DeclId, ExprId};
use crate::types::Type;
use std::collections::HashMap;

/// Append-only mapping from syntax tree nodes to their resolutions
#[derive(Debug, Default)]
pub struct ResolutionTable {
    uses: HashMap<ExprId, DeclId>,
    expr_types: HashMap<ExprId, Type>,
    decl_types: HashMap<DeclId, Type>,
}

impl ResolutionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that an identifier expression resolves to `decl`
    pub fn record_use(&mut self, expr: ExprId, decl: DeclId) {
        let previous = self.uses.insert(expr, decl);
        debug_assert!(previous.is_none(), "identifier use resolved twice");
    }

    /// Record the resolved type of an expression
    pub fn record_expr_type(&mut self, expr: ExprId, ty: Type) {
        self.expr_types.insert(expr, ty);
    }

    /// Record the resolved type of a declaration
    pub fn record_decl_type(&mut self, decl: DeclId, ty: Type) {
        let previous = self.decl_types.insert(decl, ty);
        debug_assert!(previous.is_none(), "declaration type resolved twice");
    }

    pub fn use_of(&self, expr: ExprId) -> Option<DeclId> {
        self.uses.get(&expr).copied()
    }

    pub fn expr_type(&self, expr: ExprId) -> Option<&Type> {
        self.expr_types.get(&expr)
    }

    pub fn decl_type(&self, decl: DeclId) -> Option<&Type> {
        self.decl_types.get(&decl)
    }
}
