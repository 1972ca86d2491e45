//! Statement lowering
//!
//! Statement generators leave the builder positioned on the block that
//! control falls through to. Once the current block is terminated the
//! rest of the enclosing statement list is dead code and is skipped.

use super::FunctionGen;
use crate::ast::{DeclId, DeclKind, ExprId, StmtId, StmtKind};
use crate::ir::IrType;
use ucc_common::CompilerError;

impl FunctionGen<'_> {
    pub(crate) fn gen_stmt(&mut self, id: StmtId) -> Result<(), CompilerError> {
        match &self.ast.stmt(id).kind {
            StmtKind::Expr(expr) => {
                self.gen_expr(*expr)?;
                Ok(())
            }
            StmtKind::Return(value) => self.gen_return(*value),
            StmtKind::If {
                cond,
                then_body,
                else_body,
            } => self.gen_if(*cond, *then_body, *else_body),
            StmtKind::While { cond, body } => self.gen_while(*cond, *body),
            StmtKind::Block(stmts) => {
                for &stmt in stmts {
                    self.gen_stmt(stmt)?;
                    if self.builder.is_terminated() {
                        break;
                    }
                }
                Ok(())
            }
            StmtKind::Decl(decl) => self.gen_local_decl(*decl),
            StmtKind::Empty => Ok(()),
        }
    }

    fn gen_return(&mut self, value: Option<ExprId>) -> Result<(), CompilerError> {
        match value {
            None => self.builder.ret(None),
            Some(expr) => {
                let value = self.rvalue(expr)?;
                let value = self.coerce(value, &IrType::of(&self.result));
                self.builder.ret(Some(value));
            }
        }
        Ok(())
    }

    fn gen_if(
        &mut self,
        cond: ExprId,
        then_body: StmtId,
        else_body: Option<StmtId>,
    ) -> Result<(), CompilerError> {
        let cond_val = self.truth_value(cond)?;
        let then_block = self.builder.new_block("if.then");
        match else_body {
            None => {
                let end_block = self.builder.new_block("if.end");
                self.builder.cond_branch(cond_val, then_block, end_block);

                self.builder.set_current_block(then_block);
                self.gen_stmt(then_body)?;
                if !self.builder.is_terminated() {
                    self.builder.branch(end_block);
                }
                self.builder.set_current_block(end_block);
            }
            Some(else_stmt) => {
                let else_block = self.builder.new_block("if.else");
                let end_block = self.builder.new_block("if.end");
                self.builder.cond_branch(cond_val, then_block, else_block);

                self.builder.set_current_block(then_block);
                self.gen_stmt(then_body)?;
                if !self.builder.is_terminated() {
                    self.builder.branch(end_block);
                }

                self.builder.set_current_block(else_block);
                self.gen_stmt(else_stmt)?;
                if !self.builder.is_terminated() {
                    self.builder.branch(end_block);
                }
                // When both branches returned, the join is unreachable
                // and gets pruned at finish.
                self.builder.set_current_block(end_block);
            }
        }
        Ok(())
    }

    fn gen_while(&mut self, cond: ExprId, body: StmtId) -> Result<(), CompilerError> {
        let cond_block = self.builder.new_block("while.cond");
        let body_block = self.builder.new_block("while.body");
        let end_block = self.builder.new_block("while.end");
        self.builder.branch(cond_block);

        self.builder.set_current_block(cond_block);
        let cond_val = self.truth_value(cond)?;
        self.builder.cond_branch(cond_val, body_block, end_block);

        self.builder.set_current_block(body_block);
        self.gen_stmt(body)?;
        if !self.builder.is_terminated() {
            self.builder.branch(cond_block);
        }
        self.builder.set_current_block(end_block);
        Ok(())
    }

    fn gen_local_decl(&mut self, id: DeclId) -> Result<(), CompilerError> {
        let ty = IrType::of(self.decl_type(id));
        let slot = self.builder.new_local(ty.clone());
        self.locals.insert(id, slot.clone());
        let DeclKind::Var { init, .. } = &self.ast.decl(id).kind else {
            unreachable!("local declarations are variables");
        };
        if let Some(init) = *init {
            let value = self.rvalue(init)?;
            let value = self.coerce(value, &ty);
            self.builder.build_store(value, slot);
        }
        Ok(())
    }
}
