//! Statement and function body checking

use super::{loc, SemanticAnalyzer, SemanticError};
use crate::ast::{DeclId, DeclKind, ExprId, Stmt, StmtId, StmtKind};
use crate::types::Type;
use log::debug;

impl SemanticAnalyzer<'_> {
    /// Check a function definition body
    ///
    /// Parameters share the body's outermost frame, so a top-level
    /// local clashing with a parameter is a redeclaration.
    pub(crate) fn check_body(&mut self, id: DeclId, body: StmtId) -> Result<(), SemanticError> {
        let decl = self.ast.decl(id);
        let DeclKind::Func { name, params, .. } = &decl.kind else {
            unreachable!("bodies belong to function declarations");
        };
        debug!("checking body of `{name}`");

        let func_ty = self
            .table
            .decl_type(id)
            .expect("declared functions are typed")
            .clone();
        let Type::Func { result, .. } = func_ty else {
            unreachable!("function declarations have function type");
        };
        self.current_result = Some(*result);
        self.scopes.enter_scope();

        if !self.is_void_marker(params) {
            for &param in params {
                let param_decl = self.ast.decl(param);
                let param_name = param_decl.name();
                if param_name.is_empty() {
                    return Err(SemanticError::UnnamedParameter {
                        name: name.clone(),
                        location: loc(param_decl),
                    });
                }
                if self.scopes.declare(param_name, param).is_err() {
                    return Err(SemanticError::Redeclaration {
                        name: param_name.to_string(),
                        location: loc(param_decl),
                    });
                }
            }
        }

        let StmtKind::Block(stmts) = &self.ast.stmt(body).kind else {
            unreachable!("function bodies are blocks");
        };
        for &stmt in stmts {
            self.check_stmt(stmt)?;
        }

        self.scopes.exit_scope();
        self.current_result = None;
        Ok(())
    }

    fn check_stmt(&mut self, id: StmtId) -> Result<(), SemanticError> {
        let stmt = self.ast.stmt(id);
        match &stmt.kind {
            StmtKind::Expr(expr) => {
                self.check_expr(*expr)?;
                Ok(())
            }
            StmtKind::Return(value) => self.check_return(*value, stmt),
            StmtKind::If {
                cond,
                then_body,
                else_body,
            } => {
                self.check_condition(*cond)?;
                self.check_stmt(*then_body)?;
                if let Some(else_body) = else_body {
                    self.check_stmt(*else_body)?;
                }
                Ok(())
            }
            StmtKind::While { cond, body } => {
                self.check_condition(*cond)?;
                self.check_stmt(*body)
            }
            StmtKind::Block(stmts) => {
                self.scopes.enter_scope();
                for &stmt in stmts {
                    self.check_stmt(stmt)?;
                }
                self.scopes.exit_scope();
                Ok(())
            }
            StmtKind::Decl(decl) => self.check_local_decl(*decl),
            StmtKind::Empty => Ok(()),
        }
    }

    fn check_return(&mut self, value: Option<ExprId>, stmt: &Stmt) -> Result<(), SemanticError> {
        let result = self
            .current_result
            .clone()
            .expect("return statements occur inside function bodies");
        match (value, result) {
            (None, Type::Void) => Ok(()),
            (None, result) => Err(SemanticError::TypeMismatch {
                expected: result,
                found: Type::Void,
                location: loc(stmt),
            }),
            (Some(expr), Type::Void) => {
                let found = self.check_expr(expr)?;
                Err(SemanticError::TypeMismatch {
                    expected: Type::Void,
                    found,
                    location: loc(self.ast.expr(expr)),
                })
            }
            (Some(expr), result) => {
                let found = self.check_expr(expr)?;
                if found.decay().is_assignable_to(&result) {
                    Ok(())
                } else {
                    Err(SemanticError::TypeMismatch {
                        expected: result,
                        found,
                        location: loc(self.ast.expr(expr)),
                    })
                }
            }
        }
    }

    fn check_local_decl(&mut self, id: DeclId) -> Result<(), SemanticError> {
        let decl = self.ast.decl(id);
        let DeclKind::Var {
            name, spec, init, ..
        } = &decl.kind
        else {
            unreachable!("local declarations are variables");
        };
        let location = loc(decl);
        let ty = self.resolve_var_spec(name, spec, &location)?;
        self.table.record_decl_type(id, ty.clone());
        if self.scopes.declare(name, id).is_err() {
            return Err(SemanticError::Redeclaration {
                name: name.clone(),
                location,
            });
        }
        if let Some(init) = *init {
            let found = self.check_expr(init)?;
            if !found.decay().is_assignable_to(&ty) {
                return Err(SemanticError::TypeMismatch {
                    expected: ty,
                    found,
                    location: loc(self.ast.expr(init)),
                });
            }
        }
        Ok(())
    }
}
