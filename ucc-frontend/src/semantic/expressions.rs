//! Expression type checking
//!
//! Arithmetic always happens at `int` width, so every arithmetic and
//! relational operator yields `int` regardless of operand types. Array
//! operands decay to pointers wherever a scalar is expected, but the
//! table records the undecayed type; consumers apply decay at the point
//! of use.

use super::{loc, SemanticAnalyzer, SemanticError};
use crate::ast::{BinaryOp, Expr, ExprId, ExprKind, UnaryOp};
use crate::types::Type;

impl SemanticAnalyzer<'_> {
    /// Check an expression and record its type in the table
    pub(crate) fn check_expr(&mut self, id: ExprId) -> Result<Type, SemanticError> {
        let ty = self.check_expr_kind(id)?;
        self.table.record_expr_type(id, ty.clone());
        Ok(ty)
    }

    /// Check an `if`, `while` or `&&` condition, which must be scalar
    pub(crate) fn check_condition(&mut self, id: ExprId) -> Result<(), SemanticError> {
        let ty = self.check_expr(id)?;
        if ty.decay().is_scalar() {
            Ok(())
        } else {
            Err(SemanticError::NonScalarCondition {
                found: ty,
                location: loc(self.ast.expr(id)),
            })
        }
    }

    fn check_expr_kind(&mut self, id: ExprId) -> Result<Type, SemanticError> {
        let expr = self.ast.expr(id);
        match &expr.kind {
            ExprKind::IntLit(_) => Ok(Type::Int),
            ExprKind::CharLit(_) => Ok(Type::Char),
            ExprKind::Ident(name) => self.check_ident(id, name, expr),
            ExprKind::Paren(inner) => self.check_expr(*inner),
            ExprKind::Unary { op, operand } => self.check_unary(*op, *operand),
            ExprKind::Binary {
                op: BinaryOp::Assign,
                lhs,
                rhs,
            } => self.check_assign(*lhs, *rhs),
            ExprKind::Binary {
                op: BinaryOp::LogicalAnd,
                lhs,
                rhs,
            } => self.check_logical_and(*lhs, *rhs),
            ExprKind::Binary { op, lhs, rhs } => self.check_binary(*op, *lhs, *rhs),
            ExprKind::Index { base, index } => self.check_index(*base, *index),
            ExprKind::Call { callee, args } => self.check_call(*callee, args, expr),
        }
    }

    fn check_ident(&mut self, id: ExprId, name: &str, expr: &Expr) -> Result<Type, SemanticError> {
        let Some(decl) = self.scopes.lookup(name) else {
            return Err(SemanticError::Undeclared {
                name: name.to_string(),
                location: loc(expr),
            });
        };
        self.table.record_use(id, decl);
        let ty = self
            .table
            .decl_type(decl)
            .expect("declared names are typed")
            .clone();
        Ok(ty)
    }

    fn check_unary(&mut self, op: UnaryOp, operand: ExprId) -> Result<Type, SemanticError> {
        let ty = self.check_expr(operand)?;
        let valid = match op {
            UnaryOp::Neg => ty.is_arithmetic(),
            UnaryOp::Not => ty.decay().is_scalar(),
        };
        if valid {
            Ok(Type::Int)
        } else {
            Err(SemanticError::InvalidOperand {
                op: op.to_string(),
                found: ty,
                location: loc(self.ast.expr(operand)),
            })
        }
    }

    fn check_binary(
        &mut self,
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    ) -> Result<Type, SemanticError> {
        for operand in [lhs, rhs] {
            let ty = self.check_expr(operand)?;
            if !ty.is_arithmetic() {
                return Err(SemanticError::InvalidOperand {
                    op: op.to_string(),
                    found: ty,
                    location: loc(self.ast.expr(operand)),
                });
            }
        }
        Ok(Type::Int)
    }

    fn check_logical_and(&mut self, lhs: ExprId, rhs: ExprId) -> Result<Type, SemanticError> {
        for operand in [lhs, rhs] {
            let ty = self.check_expr(operand)?;
            if !ty.decay().is_scalar() {
                return Err(SemanticError::InvalidOperand {
                    op: BinaryOp::LogicalAnd.to_string(),
                    found: ty,
                    location: loc(self.ast.expr(operand)),
                });
            }
        }
        Ok(Type::Int)
    }

    fn check_assign(&mut self, lhs: ExprId, rhs: ExprId) -> Result<Type, SemanticError> {
        if !self.is_lvalue(lhs) {
            return Err(SemanticError::InvalidAssignmentTarget {
                location: loc(self.ast.expr(lhs)),
            });
        }
        let dest = self.check_expr(lhs)?;
        // Arrays and functions name storage but are not assignable.
        if !dest.is_scalar() {
            return Err(SemanticError::InvalidAssignmentTarget {
                location: loc(self.ast.expr(lhs)),
            });
        }
        let found = self.check_expr(rhs)?;
        if found.decay().is_assignable_to(&dest) {
            Ok(dest)
        } else {
            Err(SemanticError::TypeMismatch {
                expected: dest,
                found,
                location: loc(self.ast.expr(rhs)),
            })
        }
    }

    fn is_lvalue(&self, expr: ExprId) -> bool {
        match &self.ast.expr(expr).kind {
            ExprKind::Ident(_) | ExprKind::Index { .. } => true,
            ExprKind::Paren(inner) => self.is_lvalue(*inner),
            _ => false,
        }
    }

    fn check_index(&mut self, base: ExprId, index: ExprId) -> Result<Type, SemanticError> {
        let base_ty = self.check_expr(base)?;
        let elem = match &base_ty {
            Type::Array { elem, .. } | Type::Pointer { elem } => (**elem).clone(),
            _ => {
                return Err(SemanticError::NotIndexable {
                    found: base_ty,
                    location: loc(self.ast.expr(base)),
                })
            }
        };
        let index_ty = self.check_expr(index)?;
        if !index_ty.is_arithmetic() {
            return Err(SemanticError::TypeMismatch {
                expected: Type::Int,
                found: index_ty,
                location: loc(self.ast.expr(index)),
            });
        }
        Ok(elem)
    }

    fn check_call(
        &mut self,
        callee: ExprId,
        args: &[ExprId],
        expr: &Expr,
    ) -> Result<Type, SemanticError> {
        let callee_expr = self.ast.expr(callee);
        let ExprKind::Ident(name) = &callee_expr.kind else {
            unreachable!("call callees are identifiers");
        };
        let func_ty = self.check_expr(callee)?;
        let Type::Func { result, params } = func_ty else {
            return Err(SemanticError::NotAFunction {
                name: name.clone(),
                location: loc(callee_expr),
            });
        };
        if args.len() != params.len() {
            return Err(SemanticError::ArgumentCountMismatch {
                name: name.clone(),
                expected: params.len(),
                found: args.len(),
                location: loc(expr),
            });
        }
        for (&arg, param_ty) in args.iter().zip(&params) {
            let found = self.check_expr(arg)?;
            if !found.decay().is_assignable_to(param_ty) {
                return Err(SemanticError::TypeMismatch {
                    expected: param_ty.clone(),
                    found,
                    location: loc(self.ast.expr(arg)),
                });
            }
        }
        Ok(*result)
    }
}
