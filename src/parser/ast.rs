use crate::span::Spanned;

#[derive(Debug, Clone)]
pub struct Program {
    pub package: Option<Spanned<String>>,
    pub imports: Vec<Spanned<String>>,
    pub globals: Vec<Spanned<VarDecl>>,
    pub functions: Vec<Spanned<Function>>,
}

#[derive(Debug, Clone)]
pub struct Function {
    pub name: Spanned<String>,
    pub params: Vec<Param>,
    /// Declared result list. Empty when omitted.
    pub results: Vec<Spanned<TypeExpr>>,
    /// Names of the results in `(x int, ok bool)`. Empty for unnamed results.
    pub result_names: Vec<Spanned<String>>,
    pub body: Spanned<Block>,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: Spanned<String>,
    pub ty: Spanned<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Named(String),
    Slice(Box<Spanned<TypeExpr>>),
}

#[derive(Debug, Clone)]
pub struct Block {
    pub stmts: Vec<Spanned<Stmt>>,
}

/// `var a, b T = x, y`
#[derive(Debug, Clone)]
pub struct VarDecl {
    pub names: Vec<Spanned<String>>,
    pub ty: Option<Spanned<TypeExpr>>,
    pub values: Vec<Spanned<Expr>>,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Var(VarDecl),
    /// `a, b := x, y`
    ShortVar {
        names: Vec<Spanned<String>>,
        values: Vec<Spanned<Expr>>,
    },
    /// `a, b = x, y`
    Assign {
        targets: Vec<Spanned<String>>,
        values: Vec<Spanned<Expr>>,
    },
    /// `x += y`
    CompoundAssign {
        target: Spanned<String>,
        op: BinOp,
        value: Spanned<Expr>,
    },
    /// `x++` / `x--`
    IncDec {
        target: Spanned<String>,
        increment: bool,
    },
    Return(Vec<Spanned<Expr>>),
    If {
        condition: Spanned<Expr>,
        then_block: Spanned<Block>,
        else_branch: Option<Box<Spanned<Stmt>>>,
    },
    For {
        init: Option<Box<Spanned<Stmt>>>,
        condition: Option<Spanned<Expr>>,
        post: Option<Box<Spanned<Stmt>>>,
        body: Spanned<Block>,
    },
    Switch {
        tag: Option<Spanned<Expr>>,
        cases: Vec<SwitchCase>,
    },
    Block(Spanned<Block>),
    Break,
    Continue,
    Expr(Spanned<Expr>),
}

#[derive(Debug, Clone)]
pub struct SwitchCase {
    /// Empty for `default:`.
    pub values: Vec<Spanned<Expr>>,
    pub body: Vec<Spanned<Stmt>>,
}

impl SwitchCase {
    pub fn is_default(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum Expr {
    IntLit(i64),
    FloatLit(f64),
    BoolLit(bool),
    StringLit(String),
    RuneLit,
    Ident(String),
    Call {
        name: Spanned<String>,
        args: Vec<Spanned<Expr>>,
    },
    BinOp {
        op: BinOp,
        lhs: Box<Spanned<Expr>>,
        rhs: Box<Spanned<Expr>>,
    },
    UnaryOp {
        op: UnaryOp,
        operand: Box<Spanned<Expr>>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Neq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    And,
    Or,
}

impl BinOp {
    pub fn is_comparison(self) -> bool {
        matches!(self, BinOp::Eq | BinOp::Neq | BinOp::Lt | BinOp::Gt | BinOp::LtEq | BinOp::GtEq)
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinOp::And | BinOp::Or)
    }
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::Neq => "!=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::LtEq => "<=",
            BinOp::GtEq => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl std::fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOp::Neg => f.write_str("-"),
            UnaryOp::Not => f.write_str("!"),
        }
    }
}
