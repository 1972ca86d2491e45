//! Abstract Syntax Tree definitions for uC
//!
//! The tree is supplied by an external parser and is the input contract
//! of this crate. Nodes live in per-kind arenas owned by [`Ast`] and are
//! addressed by index newtypes; those indices double as the stable node
//! identity that the resolution table is keyed on.

pub mod expressions;
pub mod ops;
pub mod statements;

pub use expressions::{Expr, ExprKind};
pub use ops::{BinaryOp, UnaryOp};
pub use statements::{Decl, DeclKind, Stmt, StmtKind, Storage, TypeSpec};

use serde::{Deserialize, Serialize};
use ucc_common::SourceSpan;

/// Index of an expression node in the [`Ast`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExprId(u32);

/// Index of a statement node in the [`Ast`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StmtId(u32);

/// Index of a declaration node in the [`Ast`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeclId(u32);

impl ExprId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl StmtId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl DeclId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A parsed uC translation unit
///
/// `items` lists the top-level declarations in source order; everything
/// else hangs off them through arena indices.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ast {
    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
    decls: Vec<Decl>,
    pub items: Vec<DeclId>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    pub fn decl(&self, id: DeclId) -> &Decl {
        &self.decls[id.index()]
    }

    fn add_expr(&mut self, kind: ExprKind, span: SourceSpan) -> ExprId {
        self.exprs.push(Expr { kind, span });
        ExprId(self.exprs.len() as u32 - 1)
    }

    fn add_stmt(&mut self, kind: StmtKind, span: SourceSpan) -> StmtId {
        self.stmts.push(Stmt { kind, span });
        StmtId(self.stmts.len() as u32 - 1)
    }

    fn add_decl(&mut self, kind: DeclKind, span: SourceSpan) -> DeclId {
        self.decls.push(Decl { kind, span });
        DeclId(self.decls.len() as u32 - 1)
    }

    /// Append a top-level declaration, preserving source order
    pub fn add_item(&mut self, decl: DeclId) {
        self.items.push(decl);
    }

    // Node constructors, used by the parser and by tests.

    pub fn new_int_lit(&mut self, value: i64, span: SourceSpan) -> ExprId {
        self.add_expr(ExprKind::IntLit(value), span)
    }

    pub fn new_char_lit(&mut self, value: u8, span: SourceSpan) -> ExprId {
        self.add_expr(ExprKind::CharLit(value), span)
    }

    pub fn new_ident(&mut self, name: &str, span: SourceSpan) -> ExprId {
        self.add_expr(ExprKind::Ident(name.to_string()), span)
    }

    pub fn new_paren_expr(&mut self, inner: ExprId, span: SourceSpan) -> ExprId {
        self.add_expr(ExprKind::Paren(inner), span)
    }

    pub fn new_unary_expr(&mut self, op: UnaryOp, operand: ExprId, span: SourceSpan) -> ExprId {
        self.add_expr(ExprKind::Unary { op, operand }, span)
    }

    pub fn new_binary_expr(
        &mut self,
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
        span: SourceSpan,
    ) -> ExprId {
        self.add_expr(ExprKind::Binary { op, lhs, rhs }, span)
    }

    pub fn new_index_expr(&mut self, base: ExprId, index: ExprId, span: SourceSpan) -> ExprId {
        self.add_expr(ExprKind::Index { base, index }, span)
    }

    pub fn new_call_expr(&mut self, callee: ExprId, args: Vec<ExprId>, span: SourceSpan) -> ExprId {
        self.add_expr(ExprKind::Call { callee, args }, span)
    }

    pub fn new_expr_stmt(&mut self, expr: ExprId, span: SourceSpan) -> StmtId {
        self.add_stmt(StmtKind::Expr(expr), span)
    }

    pub fn new_return_stmt(&mut self, value: Option<ExprId>, span: SourceSpan) -> StmtId {
        self.add_stmt(StmtKind::Return(value), span)
    }

    pub fn new_if_stmt(
        &mut self,
        cond: ExprId,
        then_body: StmtId,
        else_body: Option<StmtId>,
        span: SourceSpan,
    ) -> StmtId {
        self.add_stmt(
            StmtKind::If {
                cond,
                then_body,
                else_body,
            },
            span,
        )
    }

    pub fn new_while_stmt(&mut self, cond: ExprId, body: StmtId, span: SourceSpan) -> StmtId {
        self.add_stmt(StmtKind::While { cond, body }, span)
    }

    pub fn new_block_stmt(&mut self, stmts: Vec<StmtId>, span: SourceSpan) -> StmtId {
        self.add_stmt(StmtKind::Block(stmts), span)
    }

    pub fn new_decl_stmt(&mut self, decl: DeclId, span: SourceSpan) -> StmtId {
        self.add_stmt(StmtKind::Decl(decl), span)
    }

    pub fn new_empty_stmt(&mut self, span: SourceSpan) -> StmtId {
        self.add_stmt(StmtKind::Empty, span)
    }

    pub fn new_var_decl(
        &mut self,
        name: &str,
        spec: TypeSpec,
        init: Option<ExprId>,
        storage: Storage,
        span: SourceSpan,
    ) -> DeclId {
        self.add_decl(
            DeclKind::Var {
                name: name.to_string(),
                spec,
                init,
                storage,
            },
            span,
        )
    }

    /// The explicit `void` parameter marking a no-argument function
    pub fn new_void_param(&mut self, span: SourceSpan) -> DeclId {
        self.new_var_decl("", TypeSpec::Void, None, Storage::Param, span)
    }

    pub fn new_func_decl(
        &mut self,
        name: &str,
        params: Vec<DeclId>,
        result: TypeSpec,
        body: Option<StmtId>,
        span: SourceSpan,
    ) -> DeclId {
        self.add_decl(
            DeclKind::Func {
                name: name.to_string(),
                params,
                result,
                body,
            },
            span,
        )
    }
}
