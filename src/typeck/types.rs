use crate::parser::ast::TypeExpr;

#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Type {
    Int,
    Float64,
    Bool,
    String,
    Rune,
    Slice(Box<Type>),
    /// A declared type name this checker does not interpret further.
    Named(std::string::String),
    /// Placeholder for a value whose type could not be determined because an
    /// earlier site was already rejected. Never reported on again.
    Invalid,
}

impl Type {
    pub fn is_invalid(&self) -> bool {
        matches!(self, Type::Invalid)
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Float64 => write!(f, "float64"),
            Type::Bool => write!(f, "bool"),
            Type::String => write!(f, "string"),
            Type::Rune => write!(f, "rune"),
            Type::Slice(inner) => write!(f, "[]{inner}"),
            Type::Named(name) => write!(f, "{name}"),
            Type::Invalid => write!(f, "invalid type"),
        }
    }
}

/// Resolve a syntactic type to a Type. Unknown names stay `Named`.
pub fn resolve_type(ty: &TypeExpr) -> Type {
    match ty {
        TypeExpr::Named(name) => match name.as_str() {
            "int" => Type::Int,
            "float64" => Type::Float64,
            "bool" => Type::Bool,
            "string" => Type::String,
            "rune" => Type::Rune,
            _ => Type::Named(name.clone()),
        },
        TypeExpr::Slice(elem) => Type::Slice(Box::new(resolve_type(&elem.node))),
    }
}

/// Formats a result list as `(int, string)`.
pub fn format_type_list(types: &[Type]) -> std::string::String {
    let inner: Vec<_> = types.iter().map(|t| t.to_string()).collect();
    format!("({})", inner.join(", "))
}
