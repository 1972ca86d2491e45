//! Expression lowering
//!
//! Arithmetic happens at `i32`; `i8` operands are sign-extended first
//! and results truncate back on store into a `char` slot. Comparisons
//! yield `i1`, which zero-extends when used as a value and passes
//! through untouched when used as a branch condition.

use super::FunctionGen;
use crate::ast::{BinaryOp, ExprId, ExprKind, UnaryOp};
use crate::ir::{BinOp, IrType, Predicate, Value};
use crate::types::Type;
use ucc_common::CompilerError;

fn arith_op(op: BinaryOp) -> Option<BinOp> {
    match op {
        BinaryOp::Add => Some(BinOp::Add),
        BinaryOp::Sub => Some(BinOp::Sub),
        BinaryOp::Mul => Some(BinOp::Mul),
        BinaryOp::Div => Some(BinOp::SDiv),
        _ => None,
    }
}

fn predicate(op: BinaryOp) -> Predicate {
    match op {
        BinaryOp::Lt => Predicate::Slt,
        BinaryOp::Gt => Predicate::Sgt,
        BinaryOp::Le => Predicate::Sle,
        BinaryOp::Ge => Predicate::Sge,
        BinaryOp::Eq => Predicate::Eq,
        BinaryOp::Ne => Predicate::Ne,
        _ => unreachable!("`{op}` is not a comparison"),
    }
}

impl FunctionGen<'_> {
    /// Lower an expression for effect; the value is absent for calls
    /// to void functions
    pub(crate) fn gen_expr(&mut self, id: ExprId) -> Result<Option<Value>, CompilerError> {
        match &self.ast.expr(id).kind {
            ExprKind::Call { .. } => self.gen_call(id),
            _ => self.rvalue(id).map(Some),
        }
    }

    /// Lower an expression in value position
    pub(crate) fn rvalue(&mut self, id: ExprId) -> Result<Value, CompilerError> {
        match &self.ast.expr(id).kind {
            ExprKind::IntLit(value) => Ok(Value::Const {
                value: *value,
                ty: IrType::I32,
            }),
            ExprKind::CharLit(value) => Ok(Value::Const {
                value: *value as i64,
                ty: IrType::I8,
            }),
            ExprKind::Paren(inner) => self.rvalue(*inner),
            ExprKind::Ident(_) => self.gen_ident_rvalue(id),
            ExprKind::Unary { op, operand } => self.gen_unary(*op, *operand),
            ExprKind::Binary {
                op: BinaryOp::Assign,
                lhs,
                rhs,
            } => self.gen_assign(*lhs, *rhs),
            ExprKind::Binary {
                op: BinaryOp::LogicalAnd,
                lhs,
                rhs,
            } => self.gen_land(*lhs, *rhs),
            ExprKind::Binary { op, lhs, rhs } => self.gen_binary(*op, *lhs, *rhs),
            ExprKind::Index { base, index } => {
                let addr = self.index_addr(*base, *index)?;
                Ok(self.builder.build_load(addr))
            }
            ExprKind::Call { .. } => {
                let Some(value) = self.gen_call(id)? else {
                    unreachable!("void call in value position");
                };
                Ok(value)
            }
        }
    }

    /// Lower a condition to `i1`
    ///
    /// Comparison results pass through, and `!` branches straight on
    /// its `icmp` without materializing an `i32`. Any other scalar
    /// compares against zero; for pointers the zero serializes as
    /// `null`.
    pub(crate) fn truth_value(&mut self, id: ExprId) -> Result<Value, CompilerError> {
        match &self.ast.expr(id).kind {
            ExprKind::Paren(inner) => self.truth_value(*inner),
            ExprKind::Unary {
                op: UnaryOp::Not,
                operand,
            } => self.gen_not(*operand),
            _ => {
                let value = self.rvalue(id)?;
                if *value.ty() == IrType::I1 {
                    return Ok(value);
                }
                let zero = Value::Const {
                    value: 0,
                    ty: value.ty().clone(),
                };
                Ok(self.builder.build_compare(Predicate::Ne, value, zero))
            }
        }
    }

    /// Convert a value to the given integer type
    ///
    /// Constants are retyped in place, wrapping to the target width;
    /// registers get an explicit conversion instruction.
    pub(crate) fn coerce(&mut self, value: Value, ty: &IrType) -> Value {
        if value.ty() == ty {
            return value;
        }
        if let Value::Const { value: raw, .. } = value {
            let wrapped = match ty {
                IrType::I1 => raw & 1,
                IrType::I8 => raw as i8 as i64,
                _ => raw,
            };
            return Value::Const {
                value: wrapped,
                ty: ty.clone(),
            };
        }
        match (value.ty().clone(), ty) {
            (IrType::I8, IrType::I32) => self.builder.build_sext(value, IrType::I32),
            (IrType::I32, IrType::I8) => self.builder.build_trunc(value, IrType::I8),
            (IrType::I1, IrType::I32) => self.builder.build_zext(value, IrType::I32),
            (IrType::I1, IrType::I8) => self.builder.build_zext(value, IrType::I8),
            (from, to) => unreachable!("no conversion from {from} to {to}"),
        }
    }

    fn gen_ident_rvalue(&mut self, id: ExprId) -> Result<Value, CompilerError> {
        let is_array = matches!(self.expr_type(id), Type::Array { .. });
        let addr = self.lvalue(id)?;
        if is_array {
            // Array-to-pointer decay: address of the first element.
            let zero = Value::Const {
                value: 0,
                ty: IrType::I32,
            };
            Ok(self.builder.build_gep(addr, vec![zero.clone(), zero]))
        } else {
            Ok(self.builder.build_load(addr))
        }
    }

    /// Address of an assignable or addressable expression
    fn lvalue(&mut self, id: ExprId) -> Result<Value, CompilerError> {
        match &self.ast.expr(id).kind {
            ExprKind::Paren(inner) => self.lvalue(*inner),
            ExprKind::Ident(_) => {
                let Some(decl) = self.table.use_of(id) else {
                    unreachable!("checked identifiers are resolved");
                };
                if let Some(slot) = self.locals.get(&decl) {
                    return Ok(slot.clone());
                }
                let ty = IrType::of(self.decl_type(decl)).pointer_to();
                Ok(Value::Global {
                    name: self.ast.decl(decl).name().to_string(),
                    ty,
                })
            }
            ExprKind::Index { base, index } => self.index_addr(*base, *index),
            _ => unreachable!("expression is not an lvalue"),
        }
    }

    /// Address of `base[index]`
    ///
    /// Array bases are indexed in place through their slot; pointer
    /// bases (decayed array parameters) load the pointer first.
    fn index_addr(&mut self, base: ExprId, index: ExprId) -> Result<Value, CompilerError> {
        let is_array = matches!(self.expr_type(base), Type::Array { .. });
        if is_array {
            let addr = self.lvalue(base)?;
            let index_val = self.rvalue(index)?;
            let index_val = self.coerce(index_val, &IrType::I32);
            let zero = Value::Const {
                value: 0,
                ty: IrType::I32,
            };
            Ok(self.builder.build_gep(addr, vec![zero, index_val]))
        } else {
            let ptr = self.rvalue(base)?;
            let index_val = self.rvalue(index)?;
            let index_val = self.coerce(index_val, &IrType::I32);
            Ok(self.builder.build_gep(ptr, vec![index_val]))
        }
    }

    fn gen_unary(&mut self, op: UnaryOp, operand: ExprId) -> Result<Value, CompilerError> {
        match op {
            UnaryOp::Neg => {
                let value = self.rvalue(operand)?;
                let value = self.coerce(value, &IrType::I32);
                // Negated literals fold; everything else subtracts
                // from zero.
                if let Value::Const { value, .. } = value {
                    return Ok(Value::Const {
                        value: -value,
                        ty: IrType::I32,
                    });
                }
                let zero = Value::Const {
                    value: 0,
                    ty: IrType::I32,
                };
                Ok(self.builder.build_binary(BinOp::Sub, zero, value))
            }
            UnaryOp::Not => {
                let cmp = self.gen_not(operand)?;
                Ok(self.builder.build_zext(cmp, IrType::I32))
            }
        }
    }

    /// `!x` as an `i1`: the operand compared equal to zero
    fn gen_not(&mut self, operand: ExprId) -> Result<Value, CompilerError> {
        let value = self.rvalue(operand)?;
        let value = match value.ty() {
            IrType::I8 => self.builder.build_sext(value, IrType::I32),
            _ => value,
        };
        let zero = Value::Const {
            value: 0,
            ty: value.ty().clone(),
        };
        Ok(self.builder.build_compare(Predicate::Eq, value, zero))
    }

    fn gen_binary(
        &mut self,
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    ) -> Result<Value, CompilerError> {
        let lhs_val = self.rvalue(lhs)?;
        let lhs_val = self.coerce(lhs_val, &IrType::I32);
        let rhs_val = self.rvalue(rhs)?;
        let rhs_val = self.coerce(rhs_val, &IrType::I32);
        match arith_op(op) {
            Some(binop) => Ok(self.builder.build_binary(binop, lhs_val, rhs_val)),
            None => Ok(self.builder.build_compare(predicate(op), lhs_val, rhs_val)),
        }
    }

    fn gen_assign(&mut self, lhs: ExprId, rhs: ExprId) -> Result<Value, CompilerError> {
        let addr = self.lvalue(lhs)?;
        let value = self.rvalue(rhs)?;
        let slot_ty = addr.ty().pointee().clone();
        let value = self.coerce(value, &slot_ty);
        self.builder.build_store(value.clone(), addr);
        Ok(value)
    }

    /// Short-circuit `&&` through an `i1` slot
    ///
    /// The right operand only evaluates when the left is true; both
    /// paths store into the slot and the result is loaded at the join.
    fn gen_land(&mut self, lhs: ExprId, rhs: ExprId) -> Result<Value, CompilerError> {
        let lhs_truth = self.truth_value(lhs)?;
        let slot = self.builder.new_local(IrType::I1);
        let rhs_block = self.builder.new_block("land.rhs");
        let false_block = self.builder.new_block("land.false");
        let end_block = self.builder.new_block("land.end");
        self.builder.cond_branch(lhs_truth, rhs_block, false_block);

        self.builder.set_current_block(rhs_block);
        let rhs_truth = self.truth_value(rhs)?;
        self.builder.build_store(rhs_truth, slot.clone());
        self.builder.branch(end_block);

        self.builder.set_current_block(false_block);
        let zero = Value::Const {
            value: 0,
            ty: IrType::I1,
        };
        self.builder.build_store(zero, slot.clone());
        self.builder.branch(end_block);

        self.builder.set_current_block(end_block);
        Ok(self.builder.build_load(slot))
    }

    fn gen_call(&mut self, id: ExprId) -> Result<Option<Value>, CompilerError> {
        let ExprKind::Call { callee, args } = &self.ast.expr(id).kind else {
            unreachable!("gen_call takes call expressions");
        };
        let Some(decl) = self.table.use_of(*callee) else {
            unreachable!("checked callees are resolved");
        };
        let Type::Func { result, params } = self.decl_type(decl) else {
            unreachable!("callees have function type");
        };
        let name = self.ast.decl(decl).name().to_string();
        let mut arg_vals = Vec::with_capacity(args.len());
        for (&arg, param_ty) in args.iter().zip(params) {
            let value = self.rvalue(arg)?;
            let value = self.coerce(value, &IrType::of(param_ty));
            arg_vals.push(value);
        }
        Ok(self.builder.build_call(&name, arg_vals, IrType::of(result)))
    }
}
