//! Decides how many values an expression produces.

use crate::parser::ast::{Expr, UnaryOp};
use crate::span::{Span, Spanned};

use super::env::SignatureLookup;
use super::types::Type;

/// The classifier's verdict for one expression node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpressionKind {
    /// Exactly one value of the given type.
    Value(Type),
    /// A call to a callable with an empty result list.
    VoidCall { callee: String },
    /// A call to a callable with more than one result.
    MultiValue { callee: String, types: Vec<Type> },
    /// A bare function name. Functions are not values.
    FunctionReference { name: String },
}

impl ExpressionKind {
    /// Number of values produced, with a function reference counting as none.
    pub fn value_count(&self) -> usize {
        match self {
            ExpressionKind::Value(_) => 1,
            ExpressionKind::VoidCall { .. } | ExpressionKind::FunctionReference { .. } => 0,
            ExpressionKind::MultiValue { types, .. } => types.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifyError {
    #[error("undefined: {name}")]
    Unresolved { name: String, span: Span },
    /// `f()` where `f` is a variable in scope, possibly hiding a function.
    #[error("cannot call non-function {name} (variable of type {ty})")]
    NotAFunction { name: String, ty: Type, span: Span },
}

impl ClassifyError {
    pub fn span(&self) -> Span {
        match self {
            ClassifyError::Unresolved { span, .. } | ClassifyError::NotAFunction { span, .. } => *span,
        }
    }
}

pub fn classify<L>(expr: &Spanned<Expr>, lookup: &L) -> Result<ExpressionKind, ClassifyError>
where
    L: SignatureLookup + ?Sized,
{
    match &expr.node {
        Expr::IntLit(_) => Ok(ExpressionKind::Value(Type::Int)),
        Expr::FloatLit(_) => Ok(ExpressionKind::Value(Type::Float64)),
        Expr::BoolLit(_) => Ok(ExpressionKind::Value(Type::Bool)),
        Expr::StringLit(_) => Ok(ExpressionKind::Value(Type::String)),
        Expr::RuneLit => Ok(ExpressionKind::Value(Type::Rune)),
        Expr::Ident(name) => {
            // Variables shadow functions of the same name.
            if let Some(ty) = lookup.lookup_variable(name) {
                Ok(ExpressionKind::Value(ty.clone()))
            } else if lookup.lookup_function(name).is_some() {
                Ok(ExpressionKind::FunctionReference { name: name.clone() })
            } else {
                Err(ClassifyError::Unresolved { name: name.clone(), span: expr.span })
            }
        }
        Expr::Call { name, .. } => {
            if let Some(ty) = lookup.lookup_variable(&name.node) {
                if ty.is_invalid() {
                    return Ok(ExpressionKind::Value(Type::Invalid));
                }
                return Err(ClassifyError::NotAFunction {
                    name: name.node.clone(),
                    ty: ty.clone(),
                    span: name.span,
                });
            }
            let sig = lookup.lookup_function(&name.node).ok_or_else(|| ClassifyError::Unresolved {
                name: name.node.clone(),
                span: name.span,
            })?;
            let results = &sig.results;
            Ok(match results.result_count() {
                0 => ExpressionKind::VoidCall { callee: name.node.clone() },
                1 => ExpressionKind::Value(results.result_type_at(0).cloned().unwrap_or(Type::Invalid)),
                _ => ExpressionKind::MultiValue {
                    callee: name.node.clone(),
                    types: results.results().to_vec(),
                },
            })
        }
        Expr::BinOp { op, lhs, rhs } => {
            if op.is_comparison() || op.is_logical() {
                return Ok(ExpressionKind::Value(Type::Bool));
            }
            let lt = operand_type(lhs, lookup);
            if lt.is_invalid() {
                Ok(ExpressionKind::Value(operand_type(rhs, lookup)))
            } else {
                Ok(ExpressionKind::Value(lt))
            }
        }
        Expr::UnaryOp { op: UnaryOp::Not, .. } => Ok(ExpressionKind::Value(Type::Bool)),
        Expr::UnaryOp { op: UnaryOp::Neg, operand } => Ok(ExpressionKind::Value(operand_type(operand, lookup))),
    }
}

/// Type of an operand, or `Invalid` when it is not a single value. The
/// operand's own site reports the problem.
fn operand_type<L>(expr: &Spanned<Expr>, lookup: &L) -> Type
where
    L: SignatureLookup + ?Sized,
{
    match classify(expr, lookup) {
        Ok(ExpressionKind::Value(ty)) => ty,
        _ => Type::Invalid,
    }
}

/// Short source-like rendering of an expression for messages.
pub fn describe(expr: &Expr) -> String {
    match expr {
        Expr::IntLit(n) => n.to_string(),
        Expr::FloatLit(n) => n.to_string(),
        Expr::BoolLit(b) => b.to_string(),
        Expr::StringLit(s) => format!("{s:?}"),
        Expr::RuneLit => "rune literal".to_string(),
        Expr::Ident(name) => name.clone(),
        Expr::Call { name, args } => {
            let args: Vec<_> = args.iter().map(|a| describe(&a.node)).collect();
            format!("{}({})", name.node, args.join(", "))
        }
        Expr::BinOp { op, lhs, rhs } => format!("{} {op} {}", describe(&lhs.node), describe(&rhs.node)),
        Expr::UnaryOp { op, operand } => format!("{op}{}", describe(&operand.node)),
    }
}
