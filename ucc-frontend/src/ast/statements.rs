//! Statement and declaration nodes

use super::{DeclId, ExprId, StmtId};
use serde::{Deserialize, Serialize};
use ucc_common::{HasSpan, SourceSpan};

/// A statement node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: SourceSpan,
}

impl HasSpan for Stmt {
    fn span(&self) -> &SourceSpan {
        &self.span
    }
}

/// Statement kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StmtKind {
    /// Expression evaluated for effect
    Expr(ExprId),
    /// Return statement; the value is absent in void functions
    Return(Option<ExprId>),
    /// If or if/else statement
    If {
        cond: ExprId,
        then_body: StmtId,
        else_body: Option<StmtId>,
    },
    /// While loop
    While { cond: ExprId, body: StmtId },
    /// Block statement, introducing a nested scope
    Block(Vec<StmtId>),
    /// Local variable declaration
    Decl(DeclId),
    /// Empty statement `;`
    Empty,
}

/// Syntactic type specifier, prior to semantic resolution
///
/// Array parameters may omit their length (`int a[]`); everywhere else
/// a length is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeSpec {
    Void,
    Int,
    Char,
    Array {
        elem: Box<TypeSpec>,
        len: Option<u64>,
    },
}

/// Storage class of a variable declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Storage {
    Global,
    Local,
    Param,
}

/// A declaration node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decl {
    pub kind: DeclKind,
    pub span: SourceSpan,
}

impl Decl {
    pub fn name(&self) -> &str {
        match &self.kind {
            DeclKind::Var { name, .. } | DeclKind::Func { name, .. } => name,
        }
    }
}

impl HasSpan for Decl {
    fn span(&self) -> &SourceSpan {
        &self.span
    }
}

/// Declaration kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeclKind {
    /// Scalar or array variable declaration
    Var {
        name: String,
        spec: TypeSpec,
        init: Option<ExprId>,
        storage: Storage,
    },
    /// Function declaration or definition; `body` is absent for a plain
    /// declaration
    Func {
        name: String,
        params: Vec<DeclId>,
        result: TypeSpec,
        body: Option<StmtId>,
    },
}
