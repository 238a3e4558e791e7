//! Accepts or rejects the occupant of a value-requiring position.

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::parser::ast::Expr;
use crate::span::{LineIndex, Span, Spanned};

use super::classify::{classify, describe, ClassifyError, ExpressionKind};
use super::env::SignatureLookup;
use super::types::{format_type_list, Type};

/// Which syntactic position a site occupies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextKind {
    VarInit,
    ShortVarInit,
    AssignmentRhs,
    CallArgument { callee: String, index: usize },
    SwitchOperand,
    CaseOperand,
    ComparisonOperand,
    Operand,
    Condition,
    ReturnValue,
}

impl std::fmt::Display for ContextKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContextKind::VarInit => write!(f, "variable declaration"),
            ContextKind::ShortVarInit => write!(f, "short variable declaration"),
            ContextKind::AssignmentRhs => write!(f, "assignment"),
            ContextKind::CallArgument { callee, index } => write!(f, "argument {} to {callee}()", index + 1),
            ContextKind::SwitchOperand => write!(f, "switch expression"),
            ContextKind::CaseOperand => write!(f, "case expression"),
            ContextKind::ComparisonOperand => write!(f, "comparison"),
            ContextKind::Operand => write!(f, "operand"),
            ContextKind::Condition => write!(f, "condition"),
            ContextKind::ReturnValue => write!(f, "return statement"),
        }
    }
}

/// A position plus the expression occupying it. Borrowed for one check.
#[derive(Debug, Clone, Copy)]
pub struct ValueContextSite<'a> {
    pub kind: &'a ContextKind,
    pub expr: &'a Spanned<Expr>,
}

impl<'a> ValueContextSite<'a> {
    pub fn new(kind: &'a ContextKind, expr: &'a Spanned<Expr>) -> Self {
        Self { kind, expr }
    }

    pub fn span(&self) -> Span {
        self.expr.span
    }
}

fn reject(kind: DiagnosticKind, span: Span, lines: &LineIndex, msg: String) -> Diagnostic {
    let pos = lines.position(span.start);
    Diagnostic::new(kind, span, lines, format!("{msg} at {pos}"))
}

/// Turns a failed classification into a diagnostic, naming the context when
/// the failure happened inside one.
pub(crate) fn classify_failure(err: ClassifyError, context: Option<&ContextKind>, lines: &LineIndex) -> Diagnostic {
    let span = err.span();
    let kind = match err {
        ClassifyError::Unresolved { .. } => DiagnosticKind::UnresolvedReferenceError,
        ClassifyError::NotAFunction { .. } => DiagnosticKind::NotAFunction,
    };
    let msg = match context {
        Some(ctx) => format!("{err} in {ctx}"),
        None => err.to_string(),
    };
    reject(kind, span, lines, msg)
}

/// Checks that a site holds exactly one value.
pub fn check_single_value_context<L>(
    site: ValueContextSite<'_>,
    lookup: &L,
    lines: &LineIndex,
) -> Result<(), Diagnostic>
where
    L: SignatureLookup + ?Sized,
{
    single_value_type(site, lookup, lines).map(|_| ())
}

/// Like `check_single_value_context`, returning the accepted value's type.
pub fn single_value_type<L>(
    site: ValueContextSite<'_>,
    lookup: &L,
    lines: &LineIndex,
) -> Result<Type, Diagnostic>
where
    L: SignatureLookup + ?Sized,
{
    let kind = classify(site.expr, lookup).map_err(|e| classify_failure(e, Some(site.kind), lines))?;
    match kind {
        ExpressionKind::Value(ty) => Ok(ty),
        ExpressionKind::VoidCall { callee } => Err(reject(
            DiagnosticKind::VoidUsedAsValue,
            site.span(),
            lines,
            format!("{}() (no value) used as value in {}", callee, site.kind),
        )),
        ExpressionKind::MultiValue { callee, types } => Err(reject(
            DiagnosticKind::MultiValueInSingleContext,
            site.span(),
            lines,
            format!(
                "multiple-value {}() (value of type {}) in single-value context: {}",
                callee,
                format_type_list(&types),
                site.kind
            ),
        )),
        ExpressionKind::FunctionReference { name } => Err(reject(
            DiagnosticKind::FunctionUsedAsValue,
            site.span(),
            lines,
            format!("{name} (function) is not a value; used in {}", site.kind),
        )),
    }
}

/// Checks that a site produces exactly `expected` values, as in
/// `var a, b = h()`. Returns the produced types.
pub fn check_tuple_context<L>(
    site: ValueContextSite<'_>,
    expected: usize,
    lookup: &L,
    lines: &LineIndex,
) -> Result<Vec<Type>, Diagnostic>
where
    L: SignatureLookup + ?Sized,
{
    let kind = classify(site.expr, lookup).map_err(|e| classify_failure(e, Some(site.kind), lines))?;
    match kind {
        ExpressionKind::MultiValue { types, .. } if types.len() == expected => Ok(types),
        ExpressionKind::Value(ty) if expected == 1 => Ok(vec![ty]),
        // Already reported where the invalid value came from.
        ExpressionKind::Value(Type::Invalid) => Ok(vec![Type::Invalid; expected]),
        ExpressionKind::VoidCall { callee } => Err(reject(
            DiagnosticKind::VoidUsedAsValue,
            site.span(),
            lines,
            format!("{}() (no value) used as value in {}", callee, site.kind),
        )),
        ExpressionKind::FunctionReference { name } => Err(reject(
            DiagnosticKind::FunctionUsedAsValue,
            site.span(),
            lines,
            format!("{name} (function) is not a value; used in {}", site.kind),
        )),
        other => Err(reject(
            DiagnosticKind::ResultCountMismatch,
            site.span(),
            lines,
            format!(
                "{} expects {} values, but {} produces {}",
                site.kind,
                expected,
                describe(&site.expr.node),
                other.value_count()
            ),
        )),
    }
}
