//! Expression nodes

use super::{BinaryOp, ExprId, UnaryOp};
use serde::{Deserialize, Serialize};
use ucc_common::{HasSpan, SourceSpan};

/// An expression node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: SourceSpan,
}

impl HasSpan for Expr {
    fn span(&self) -> &SourceSpan {
        &self.span
    }
}

/// Expression kinds
///
/// Nodes carry no resolved type; the semantic analyzer records types in
/// the resolution table instead of mutating the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    /// Integer literal, e.g. `42`
    IntLit(i64),
    /// Character literal, e.g. `'a'`
    CharLit(u8),
    /// Identifier use
    Ident(String),
    /// Parenthesized expression
    Paren(ExprId),
    /// Unary expression, e.g. `-x`, `!x`
    Unary { op: UnaryOp, operand: ExprId },
    /// Binary expression, including assignment and `&&`
    Binary {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    },
    /// Index expression, e.g. `a[i]`
    Index { base: ExprId, index: ExprId },
    /// Call expression; the callee is an identifier in uC
    Call { callee: ExprId, args: Vec<ExprId> },
}
