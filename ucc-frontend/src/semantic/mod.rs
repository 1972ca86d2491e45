//! Semantic analysis
//!
//! Resolves every identifier use to its declaration and computes the
//! type of every expression and declaration, producing a
//! [`ResolutionTable`] keyed on arena indices. The tree itself is never
//! mutated.
//!
//! Analysis runs in two passes over the top-level items. The first pass
//! declares all globals, so functions may call functions declared later
//! in the file. The second pass checks initializers and function
//! bodies. Recovery is per declaration: an error inside one item is
//! reported and analysis moves on to the next, so a single run surfaces
//! one error per broken item.

pub mod errors;
pub mod expressions;
pub mod resolution;
pub mod scopes;
pub mod statements;

pub use errors::SemanticError;
pub use resolution::ResolutionTable;
pub use scopes::ScopeStack;

use crate::ast::{Ast, DeclId, DeclKind, ExprId, ExprKind, TypeSpec, UnaryOp};
use crate::types::Type;
use log::debug;
use std::collections::{HashMap, HashSet};
use ucc_common::{CompilerError, ErrorReporter, HasSpan, SourceLocation};

/// Analyze a translation unit
///
/// Returns the resolution table on success, or every error found.
pub fn check(ast: &Ast) -> Result<ResolutionTable, Vec<CompilerError>> {
    SemanticAnalyzer::new(ast).run()
}

fn loc(node: &impl HasSpan) -> SourceLocation {
    node.span().start.clone()
}

/// Semantic analyzer state
pub struct SemanticAnalyzer<'a> {
    ast: &'a Ast,
    scopes: ScopeStack,
    table: ResolutionTable,
    reporter: ErrorReporter,
    /// Top-level items whose declaration pass failed; their bodies are
    /// not checked.
    failed: HashSet<DeclId>,
    /// Whether a global name has been given a definition (an
    /// initializer or a function body) so far.
    defined: HashMap<String, bool>,
    /// Result type of the function body currently being checked
    current_result: Option<Type>,
}

impl<'a> SemanticAnalyzer<'a> {
    pub fn new(ast: &'a Ast) -> Self {
        Self {
            ast,
            scopes: ScopeStack::new(),
            table: ResolutionTable::new(),
            reporter: ErrorReporter::new(),
            failed: HashSet::new(),
            defined: HashMap::new(),
            current_result: None,
        }
    }

    pub fn run(mut self) -> Result<ResolutionTable, Vec<CompilerError>> {
        for &item in &self.ast.items {
            if let Err(err) = self.declare_top_level(item) {
                debug!(
                    "declaring `{}` failed: {err}",
                    self.ast.decl(item).name()
                );
                self.reporter.report(err.into());
                self.failed.insert(item);
            }
        }
        for &item in &self.ast.items {
            if self.failed.contains(&item) {
                continue;
            }
            if let Err(err) = self.check_item(item) {
                self.reporter.report(err.into());
                self.reset_scopes();
            }
        }
        if self.reporter.has_errors() {
            debug!("analysis failed with {} errors", self.reporter.error_count());
            // The two passes report out of source order when a
            // declaration error follows a body error in the file.
            let mut errors = self.reporter.into_errors();
            errors.sort_by(|a, b| a.location().cmp(b.location()));
            Err(errors)
        } else {
            Ok(self.table)
        }
    }

    /// Resolve one top-level declaration and bind it at global scope
    fn declare_top_level(&mut self, id: DeclId) -> Result<(), SemanticError> {
        let decl = self.ast.decl(id);
        let location = loc(decl);
        let ty = match &decl.kind {
            DeclKind::Var { name, spec, .. } => self.resolve_var_spec(name, spec, &location)?,
            DeclKind::Func {
                name,
                params,
                result,
                ..
            } => self.resolve_signature(name, params, result, &location)?,
        };
        self.table.record_decl_type(id, ty.clone());

        let name = decl.name();
        let defines = match &decl.kind {
            DeclKind::Var { init, .. } => init.is_some(),
            DeclKind::Func { body, .. } => body.is_some(),
        };
        if let Err(previous) = self.scopes.declare(name, id) {
            return self.merge_global(id, previous, &ty, defines);
        }
        self.defined.insert(name.to_string(), defines);
        Ok(())
    }

    /// Reconcile a repeated global declaration with the first one
    ///
    /// Repeating a declaration is fine as long as the types agree and
    /// at most one occurrence carries a definition. The first
    /// declaration stays the canonical binding.
    fn merge_global(
        &mut self,
        id: DeclId,
        previous: DeclId,
        ty: &Type,
        defines: bool,
    ) -> Result<(), SemanticError> {
        let decl = self.ast.decl(id);
        let name = decl.name().to_string();
        let location = loc(decl);
        let previous_ty = self
            .table
            .decl_type(previous)
            .expect("previously declared globals are typed");
        if previous_ty != ty {
            return Err(SemanticError::ConflictingTypes { name, location });
        }
        let already_defined = self.defined.get(&name).copied().unwrap_or(false);
        if defines && already_defined {
            return Err(match decl.kind {
                DeclKind::Func { .. } => SemanticError::Redefinition { name, location },
                DeclKind::Var { .. } => SemanticError::MultipleInitializers { name, location },
            });
        }
        if defines {
            self.defined.insert(name, true);
        }
        Ok(())
    }

    fn check_item(&mut self, id: DeclId) -> Result<(), SemanticError> {
        let decl = self.ast.decl(id);
        match &decl.kind {
            DeclKind::Var {
                init: Some(init), ..
            } => self.check_global_init(id, *init),
            DeclKind::Func {
                body: Some(body), ..
            } => self.check_body(id, *body),
            _ => Ok(()),
        }
    }

    fn check_global_init(&mut self, id: DeclId, init: ExprId) -> Result<(), SemanticError> {
        let decl = self.ast.decl(id);
        let var_ty = self
            .table
            .decl_type(id)
            .expect("declared globals are typed")
            .clone();
        let found = self.check_expr(init)?;
        if !found.decay().is_assignable_to(&var_ty) {
            return Err(SemanticError::TypeMismatch {
                expected: var_ty,
                found,
                location: loc(self.ast.expr(init)),
            });
        }
        if !self.is_const_expr(init) {
            return Err(SemanticError::NonConstantInitializer {
                name: decl.name().to_string(),
                location: loc(decl),
            });
        }
        Ok(())
    }

    /// Global initializers are literals, possibly negated or
    /// parenthesized.
    fn is_const_expr(&self, expr: ExprId) -> bool {
        match &self.ast.expr(expr).kind {
            ExprKind::IntLit(_) | ExprKind::CharLit(_) => true,
            ExprKind::Paren(inner) => self.is_const_expr(*inner),
            ExprKind::Unary {
                op: UnaryOp::Neg,
                operand,
            } => self.is_const_expr(*operand),
            _ => false,
        }
    }

    /// Resolve the type of a variable declaration
    fn resolve_var_spec(
        &self,
        name: &str,
        spec: &TypeSpec,
        location: &SourceLocation,
    ) -> Result<Type, SemanticError> {
        match spec {
            TypeSpec::Void => Err(SemanticError::VoidVariable {
                name: name.to_string(),
                location: location.clone(),
            }),
            TypeSpec::Int => Ok(Type::Int),
            TypeSpec::Char => Ok(Type::Char),
            TypeSpec::Array { elem, len } => {
                let elem = self.resolve_array_elem(name, elem, location)?;
                let len = len.ok_or_else(|| SemanticError::ArraySizeRequired {
                    name: name.to_string(),
                    location: location.clone(),
                })?;
                Ok(Type::Array {
                    elem: Box::new(elem),
                    len,
                })
            }
        }
    }

    fn resolve_array_elem(
        &self,
        name: &str,
        elem: &TypeSpec,
        location: &SourceLocation,
    ) -> Result<Type, SemanticError> {
        match elem {
            TypeSpec::Int => Ok(Type::Int),
            TypeSpec::Char => Ok(Type::Char),
            _ => Err(SemanticError::InvalidArrayElement {
                name: name.to_string(),
                location: location.clone(),
            }),
        }
    }

    /// Resolve a function signature, typing its parameters as a side
    /// effect
    ///
    /// A single unnamed `void` parameter marks an empty parameter list.
    /// Array parameters decay to pointers and may omit their length.
    fn resolve_signature(
        &mut self,
        name: &str,
        params: &[DeclId],
        result: &TypeSpec,
        location: &SourceLocation,
    ) -> Result<Type, SemanticError> {
        let result_ty = match result {
            TypeSpec::Void => Type::Void,
            TypeSpec::Int => Type::Int,
            TypeSpec::Char => Type::Char,
            TypeSpec::Array { .. } => {
                return Err(SemanticError::InvalidResultType {
                    name: name.to_string(),
                    location: location.clone(),
                })
            }
        };
        let mut param_types = Vec::new();
        if !self.is_void_marker(params) {
            for &param in params {
                let ty = self.resolve_param(param)?;
                self.table.record_decl_type(param, ty.clone());
                param_types.push(ty);
            }
        }
        Ok(Type::Func {
            result: Box::new(result_ty),
            params: param_types,
        })
    }

    fn is_void_marker(&self, params: &[DeclId]) -> bool {
        if params.len() != 1 {
            return false;
        }
        matches!(
            &self.ast.decl(params[0]).kind,
            DeclKind::Var {
                name,
                spec: TypeSpec::Void,
                ..
            } if name.is_empty()
        )
    }

    fn resolve_param(&self, id: DeclId) -> Result<Type, SemanticError> {
        let decl = self.ast.decl(id);
        let location = loc(decl);
        let DeclKind::Var { name, spec, .. } = &decl.kind else {
            unreachable!("parameters are variable declarations");
        };
        match spec {
            TypeSpec::Void => Err(SemanticError::VoidVariable {
                name: name.clone(),
                location,
            }),
            TypeSpec::Int => Ok(Type::Int),
            TypeSpec::Char => Ok(Type::Char),
            TypeSpec::Array { elem, .. } => {
                let elem = self.resolve_array_elem(name, elem, &location)?;
                Ok(Type::Pointer {
                    elem: Box::new(elem),
                })
            }
        }
    }

    fn reset_scopes(&mut self) {
        while !self.scopes.at_global_scope() {
            self.scopes.exit_scope();
        }
        self.current_result = None;
    }
}
