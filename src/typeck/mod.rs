pub mod classify;
pub mod env;
pub mod parallel;
pub mod signature;
pub mod types;
pub mod validate;

use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::config::CheckConfig;
use crate::diagnostics::{sort_diagnostics, Diagnostic, DiagnosticKind};
use crate::parser::ast::*;
use crate::span::{LineIndex, Span, Spanned};
use classify::{classify, ExpressionKind};
use env::{SignatureLookup, SignatureTable, TypeEnv};
use signature::{FuncSig, ResultSignature};
use types::{format_type_list, resolve_type, Type};
use validate::{check_tuple_context, classify_failure, single_value_type, ContextKind, ValueContextSite};

/// Builds the result signature of a declaration from its result list.
pub fn signature_of(func: &Function) -> FuncSig {
    let params = func.params.iter().map(|p| resolve_type(&p.ty.node)).collect();
    let results = func.results.iter().map(|r| resolve_type(&r.node)).collect();
    FuncSig::new(params, ResultSignature::new(results))
}

/// Pass 1: collect every callable signature. Nothing reads the table until
/// this returns.
pub fn collect_signatures(program: &Program, builtins: bool) -> SignatureTable {
    let mut table = if builtins { SignatureTable::with_builtins() } else { SignatureTable::new() };
    for func in &program.functions {
        let f = &func.node;
        if !table.declare(&f.name.node, signature_of(f)) {
            warn!(name = %f.name.node, "duplicate function declaration ignored");
        }
    }
    debug!(count = table.len(), "collected signatures");
    table
}

/// Pass 2a: package-level variables, in declaration order.
pub fn check_globals(
    program: &Program,
    table: &SignatureTable,
    lines: &LineIndex,
) -> (HashMap<String, Type>, Vec<Diagnostic>) {
    let mut checker = Checker::new(TypeEnv::new(table), lines, ResultSignature::void());
    for decl in &program.globals {
        checker.check_var_decl(&decl.node, decl.span, ContextKind::VarInit);
    }
    let Checker { env, diagnostics, .. } = checker;
    (env.into_package_scope(), diagnostics)
}

/// Pass 2b: one function body against the shared table and checked globals.
pub fn check_function(
    func: &Function,
    table: &SignatureTable,
    globals: &HashMap<String, Type>,
    lines: &LineIndex,
) -> Vec<Diagnostic> {
    debug!(function = %func.name.node, "checking function");
    let results = signature_of(func).results;
    let mut checker = Checker::new(TypeEnv::with_globals(table, globals.clone()), lines, results);
    checker.named_results = !func.result_names.is_empty();
    checker.env.push_scope();
    for p in &func.params {
        checker.env.define(&p.name.node, resolve_type(&p.ty.node));
    }
    // Named results are ordinary variables of the body.
    for (name, ty) in func.result_names.iter().zip(&func.results) {
        checker.env.define(&name.node, resolve_type(&ty.node));
    }
    checker.check_block(&func.body.node);
    checker.env.pop_scope();
    checker.diagnostics
}

/// Checks every value context in the program and returns all diagnostics,
/// ordered by source position.
pub fn check_program(program: &Program, lines: &LineIndex, config: &CheckConfig) -> Vec<Diagnostic> {
    if config.jobs > 1 {
        return parallel::check_program_parallel(program, lines, config);
    }
    let table = collect_signatures(program, config.builtins);
    let (globals, mut diagnostics) = check_globals(program, &table, lines);
    for func in &program.functions {
        diagnostics.extend(check_function(&func.node, &table, &globals, lines));
    }
    sort_diagnostics(&mut diagnostics);
    debug!(count = diagnostics.len(), "check finished");
    diagnostics
}

/// Walks statements and submits each value-requiring position to the validator.
/// Statement-position calls are never submitted, so a void call used as a
/// statement is always accepted.
struct Checker<'a> {
    env: TypeEnv<'a>,
    lines: &'a LineIndex,
    results: ResultSignature,
    /// A bare `return` returns the current values of named results.
    named_results: bool,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Checker<'a> {
    fn new(env: TypeEnv<'a>, lines: &'a LineIndex, results: ResultSignature) -> Self {
        Self { env, lines, results, named_results: false, diagnostics: Vec::new() }
    }

    fn report(&mut self, diag: Diagnostic) {
        trace!(kind = %diag.kind, position = %diag.position, "rejected");
        self.diagnostics.push(diag);
    }

    fn mismatch(&mut self, span: Span, msg: String) {
        let pos = self.lines.position(span.start);
        let diag = Diagnostic::new(DiagnosticKind::ResultCountMismatch, span, self.lines, format!("{msg} at {pos}"));
        self.report(diag);
    }

    fn check_block(&mut self, block: &Block) {
        self.check_stmts(&block.stmts);
    }

    fn check_stmts(&mut self, stmts: &[Spanned<Stmt>]) {
        for stmt in stmts {
            self.check_stmt(&stmt.node, stmt.span);
        }
    }

    fn check_stmt(&mut self, stmt: &Stmt, span: Span) {
        match stmt {
            Stmt::Var(decl) => self.check_var_decl(decl, span, ContextKind::VarInit),
            Stmt::ShortVar { names, values } => {
                let declared = self.check_initializers(names.len(), values, span, ContextKind::ShortVarInit);
                for (name, ty) in names.iter().zip(declared) {
                    self.env.define(&name.node, ty);
                }
            }
            Stmt::Assign { targets, values } => {
                for target in targets {
                    self.check_assign_target(target);
                }
                self.check_initializers(targets.len(), values, span, ContextKind::AssignmentRhs);
            }
            Stmt::CompoundAssign { target, value, .. } => {
                self.check_assign_target(target);
                self.value_site(ContextKind::AssignmentRhs, value);
            }
            Stmt::IncDec { target, .. } => self.check_assign_target(target),
            Stmt::Return(values) => self.check_return(values, span),
            Stmt::If { condition, then_block, else_branch } => {
                self.value_site(ContextKind::Condition, condition);
                self.env.push_scope();
                self.check_block(&then_block.node);
                self.env.pop_scope();
                if let Some(else_stmt) = else_branch {
                    self.check_stmt(&else_stmt.node, else_stmt.span);
                }
            }
            Stmt::For { init, condition, post, body } => {
                self.env.push_scope();
                if let Some(init) = init {
                    self.check_stmt(&init.node, init.span);
                }
                if let Some(cond) = condition {
                    self.value_site(ContextKind::Condition, cond);
                }
                if let Some(post) = post {
                    self.check_stmt(&post.node, post.span);
                }
                self.env.push_scope();
                self.check_block(&body.node);
                self.env.pop_scope();
                self.env.pop_scope();
            }
            Stmt::Switch { tag, cases } => {
                if let Some(tag) = tag {
                    self.value_site(ContextKind::SwitchOperand, tag);
                }
                for case in cases {
                    for value in &case.values {
                        self.value_site(ContextKind::CaseOperand, value);
                    }
                    self.env.push_scope();
                    self.check_stmts(&case.body);
                    self.env.pop_scope();
                }
            }
            Stmt::Block(block) => {
                self.env.push_scope();
                self.check_block(&block.node);
                self.env.pop_scope();
            }
            Stmt::Break | Stmt::Continue => {}
            Stmt::Expr(expr) => self.check_expr_stmt(expr),
        }
    }

    /// A call in statement position may produce any number of values; only
    /// the names in it have to resolve to the right kind of entity.
    fn check_expr_stmt(&mut self, expr: &Spanned<Expr>) {
        if let Err(err) = classify(expr, &self.env) {
            let diag = classify_failure(err, None, self.lines);
            self.report(diag);
        }
        self.visit_operands(expr);
    }

    fn check_var_decl(&mut self, decl: &VarDecl, span: Span, context: ContextKind) {
        let declared_ty = decl.ty.as_ref().map(|t| resolve_type(&t.node));
        let inferred = if decl.values.is_empty() {
            vec![Type::Invalid; decl.names.len()]
        } else {
            self.check_initializers(decl.names.len(), &decl.values, span, context)
        };
        for (name, ty) in decl.names.iter().zip(inferred) {
            let ty = declared_ty.clone().unwrap_or(ty);
            self.env.define(&name.node, ty);
        }
    }

    /// Right-hand sides of a declaration or assignment with `count` names.
    /// Returns one type per name; `Invalid` where the value was rejected.
    fn check_initializers(
        &mut self,
        count: usize,
        values: &[Spanned<Expr>],
        span: Span,
        context: ContextKind,
    ) -> Vec<Type> {
        if values.len() == 1 && count > 1 {
            let value = &values[0];
            self.visit_operands(value);
            let site = ValueContextSite::new(&context, value);
            return match check_tuple_context(site, count, &self.env, self.lines) {
                Ok(types) => types,
                Err(diag) => {
                    self.report(diag);
                    vec![Type::Invalid; count]
                }
            };
        }

        let types: Vec<Type> = values.iter().map(|v| self.value_site(context.clone(), v)).collect();
        if values.len() != count {
            // A rejected value already explains the statement.
            if types.iter().all(|t| !t.is_invalid()) {
                self.mismatch(
                    span,
                    format!("assignment mismatch: {} variables but {} values", count, values.len()),
                );
            }
            return vec![Type::Invalid; count];
        }
        types
    }

    fn check_assign_target(&mut self, target: &Spanned<String>) {
        if target.node == "_" || self.env.lookup_variable(&target.node).is_some() {
            return;
        }
        let pos = self.lines.position(target.span.start);
        let diag = if self.env.lookup_function(&target.node).is_some() {
            Diagnostic::new(
                DiagnosticKind::FunctionUsedAsValue,
                target.span,
                self.lines,
                format!("cannot assign to {} (function) at {pos}", target.node),
            )
        } else {
            Diagnostic::new(
                DiagnosticKind::UnresolvedReferenceError,
                target.span,
                self.lines,
                format!("undefined: {} at {pos}", target.node),
            )
        };
        self.report(diag);
    }

    fn check_return(&mut self, values: &[Spanned<Expr>], span: Span) {
        let want = self.results.result_count();
        if values.is_empty() && self.named_results {
            return;
        }
        if values.len() == 1 && want > 1 {
            let value = &values[0];
            self.visit_operands(value);
            let ctx = ContextKind::ReturnValue;
            if let Err(diag) = check_tuple_context(ValueContextSite::new(&ctx, value), want, &self.env, self.lines) {
                self.report(diag);
            }
            return;
        }

        let types: Vec<Type> = values.iter().map(|v| self.value_site(ContextKind::ReturnValue, v)).collect();
        if values.len() != want && types.iter().all(|t| !t.is_invalid()) {
            let have = if values.len() > want { "too many" } else { "not enough" };
            let msg = format!(
                "{have} return values: have {}, want {}",
                values.len(),
                format_type_list(self.results.results())
            );
            self.mismatch(span, msg);
        }
    }

    /// Submits `expr` as a single-value site after its own operands. Returns
    /// the accepted type, or `Invalid` when rejected.
    fn value_site(&mut self, context: ContextKind, expr: &Spanned<Expr>) -> Type {
        self.visit_operands(expr);
        trace!(context = %context, "value site");
        match single_value_type(ValueContextSite::new(&context, expr), &self.env, self.lines) {
            Ok(ty) => ty,
            Err(diag) => {
                self.report(diag);
                Type::Invalid
            }
        }
    }

    /// Submits the value positions nested inside `expr`: call arguments and
    /// operator operands.
    fn visit_operands(&mut self, expr: &Spanned<Expr>) {
        match &expr.node {
            Expr::Call { name, args } => {
                // f(g()) forwards all of g's results as f's arguments.
                if let [only] = args.as_slice()
                    && matches!(classify(only, &self.env), Ok(ExpressionKind::MultiValue { .. }))
                {
                    self.visit_operands(only);
                    return;
                }
                for (index, arg) in args.iter().enumerate() {
                    let ctx = ContextKind::CallArgument { callee: name.node.clone(), index };
                    self.value_site(ctx, arg);
                }
            }
            Expr::BinOp { op, lhs, rhs } => {
                let ctx = if op.is_comparison() { ContextKind::ComparisonOperand } else { ContextKind::Operand };
                self.value_site(ctx.clone(), lhs);
                self.value_site(ctx, rhs);
            }
            Expr::UnaryOp { operand, .. } => {
                self.value_site(ContextKind::Operand, operand);
            }
            Expr::IntLit(_)
            | Expr::FloatLit(_)
            | Expr::BoolLit(_)
            | Expr::StringLit(_)
            | Expr::RuneLit
            | Expr::Ident(_) => {}
        }
    }
}
