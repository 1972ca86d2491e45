//! IR generation
//!
//! Lowers a checked syntax tree to an IR [`Module`]. Every variable
//! gets a stack slot and every use goes through an explicit load or
//! store; no mem2reg-style promotion happens here. Output order follows
//! source order, and repeated global declarations collapse into one
//! definition at the position of the first.
//!
//! Generation assumes the resolution table came from a successful
//! semantic pass; a hole in the table is a bug and panics.

pub mod expressions;
pub mod statements;

use crate::ast::{Ast, DeclId, DeclKind, ExprId, ExprKind, StmtId, StmtKind, UnaryOp};
use crate::ir::{Function, GlobalVar, IrBuilder, IrType, Module, Value};
use crate::semantic::ResolutionTable;
use crate::types::Type;
use log::debug;
use std::collections::HashMap;
use ucc_common::{CompilerError, SourceSpan};

/// Generate an IR module from a checked translation unit
pub fn gen(ast: &Ast, table: &ResolutionTable) -> Result<Module, CompilerError> {
    let mut module = Module::new();
    let mut global_index: HashMap<String, usize> = HashMap::new();
    let mut func_index: HashMap<String, usize> = HashMap::new();

    for &item in &ast.items {
        let decl = ast.decl(item);
        match &decl.kind {
            DeclKind::Var { name, init, .. } => {
                let Some(ty) = table.decl_type(item) else {
                    unreachable!("checked globals are typed");
                };
                let init = init.map(|expr| const_value(ast, expr));
                match global_index.get(name) {
                    Some(&index) => {
                        // A tentative definition already reserved the
                        // slot; only the initializer can change.
                        if init.is_some() {
                            module.globals[index].init = init;
                        }
                    }
                    None => {
                        global_index.insert(name.clone(), module.globals.len());
                        module.globals.push(GlobalVar {
                            name: name.clone(),
                            ty: IrType::of(ty),
                            init,
                        });
                    }
                }
            }
            DeclKind::Func { name, body, .. } => {
                let Some(Type::Func { result, params }) = table.decl_type(item) else {
                    unreachable!("checked functions are typed");
                };
                match body {
                    None => {
                        if !func_index.contains_key(name) {
                            func_index.insert(name.clone(), module.functions.len());
                            module.functions.push(Function::declaration(
                                name,
                                params.iter().map(IrType::of).collect(),
                                IrType::of(result),
                            ));
                        }
                    }
                    Some(body) => {
                        let func = FunctionGen::new(ast, table, item).run(*body)?;
                        // The definition takes the declaration's place.
                        match func_index.get(name) {
                            Some(&index) => module.functions[index] = func,
                            None => {
                                func_index.insert(name.clone(), module.functions.len());
                                module.functions.push(func);
                            }
                        }
                    }
                }
            }
        }
    }
    Ok(module)
}

/// Fold a constant initializer
fn const_value(ast: &Ast, expr: ExprId) -> i64 {
    match &ast.expr(expr).kind {
        ExprKind::IntLit(value) => *value,
        ExprKind::CharLit(value) => *value as i64,
        ExprKind::Paren(inner) => const_value(ast, *inner),
        ExprKind::Unary {
            op: UnaryOp::Neg,
            operand,
        } => -const_value(ast, *operand),
        _ => unreachable!("global initializers are constant"),
    }
}

/// Lowering state for one function definition
pub(crate) struct FunctionGen<'a> {
    ast: &'a Ast,
    table: &'a ResolutionTable,
    builder: IrBuilder,
    /// Stack slot of each parameter and local in scope
    locals: HashMap<DeclId, Value>,
    params: Vec<DeclId>,
    result: Type,
    name: String,
    span: SourceSpan,
}

impl<'a> FunctionGen<'a> {
    fn new(ast: &'a Ast, table: &'a ResolutionTable, id: DeclId) -> Self {
        let decl = ast.decl(id);
        let DeclKind::Func { name, params, .. } = &decl.kind else {
            unreachable!("IR functions come from function declarations");
        };
        let Some(Type::Func {
            result,
            params: param_types,
        }) = table.decl_type(id)
        else {
            unreachable!("checked functions are typed");
        };
        // An empty type-level parameter list with syntactic parameters
        // present is the `void` marker.
        let param_decls: Vec<DeclId> = if param_types.is_empty() {
            Vec::new()
        } else {
            params.clone()
        };
        let ir_params = param_decls
            .iter()
            .zip(param_types)
            .map(|(&param, ty)| (ast.decl(param).name().to_string(), IrType::of(ty)))
            .collect();
        let builder = IrBuilder::new_function(name, ir_params, IrType::of(result));
        Self {
            ast,
            table,
            builder,
            locals: HashMap::new(),
            params: param_decls,
            result: (**result).clone(),
            name: name.clone(),
            span: decl.span.clone(),
        }
    }

    fn run(mut self, body: StmtId) -> Result<Function, CompilerError> {
        debug!("lowering function `{}`", self.name);
        // Parameters are spilled to slots so that assignments to them
        // work like any other variable. Slot and store interleave per
        // parameter.
        let params = std::mem::take(&mut self.params);
        for param in params {
            let ty = IrType::of(self.decl_type(param));
            let slot = self.builder.new_local(ty.clone());
            let name = self.ast.decl(param).name().to_string();
            self.builder.build_store(Value::Arg { name, ty }, slot.clone());
            self.locals.insert(param, slot);
        }

        let StmtKind::Block(stmts) = &self.ast.stmt(body).kind else {
            unreachable!("function bodies are blocks");
        };
        for &stmt in stmts {
            self.gen_stmt(stmt)?;
            if self.builder.is_terminated() {
                break;
            }
        }

        if !self.builder.is_terminated() && self.builder.is_current_reachable() {
            if self.result == Type::Void {
                self.builder.ret(None);
            } else {
                return Err(CompilerError::codegen_error(
                    format!("missing return in function `{}`", self.name),
                    self.span.start.clone(),
                ));
            }
        }
        Ok(self.builder.finish())
    }

    fn decl_type(&self, id: DeclId) -> &'a Type {
        let Some(ty) = self.table.decl_type(id) else {
            unreachable!("checked declarations are typed");
        };
        ty
    }

    fn expr_type(&self, id: ExprId) -> &'a Type {
        let Some(ty) = self.table.expr_type(id) else {
            unreachable!("checked expressions are typed");
        };
        ty
    }
}
