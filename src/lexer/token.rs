use logos::Logos;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\f]+")]
pub enum Token {
    // Keywords
    #[token("package")]
    Package,
    #[token("import")]
    Import,
    #[token("func")]
    Func,
    #[token("var")]
    Var,
    #[token("return")]
    Return,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("for")]
    For,
    #[token("switch")]
    Switch,
    #[token("case")]
    Case,
    #[token("default")]
    Default,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("true")]
    True,
    #[token("false")]
    False,

    // Literals
    #[regex(r"0[xX][0-9a-fA-F_]+|[0-9][0-9_]*", |lex| {
        let s = lex.slice();
        if s.starts_with("0x") || s.starts_with("0X") {
            let cleaned = s[2..].replace('_', "");
            if cleaned.is_empty() {
                return None;
            }
            i64::from_str_radix(&cleaned, 16).ok()
        } else {
            s.replace('_', "").parse::<i64>().ok()
        }
    })]
    IntLit(i64),

    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*", |lex| lex.slice().replace('_', "").parse::<f64>().ok())]
    FloatLit(f64),

    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| {
        let s = lex.slice();
        s[1..s.len() - 1].to_string()
    })]
    StringLit(String),

    #[regex(r"`[^`]*`", |lex| {
        let s = lex.slice();
        s[1..s.len() - 1].to_string()
    })]
    RawStringLit(String),

    #[regex(r"'([^'\\\n]|\\.)+'")]
    RuneLit,

    // Identifiers
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    // Operators
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token(":=")]
    ColonEq,
    #[token("=")]
    Eq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("!")]
    Bang,

    // Delimiters
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Dot,

    // Comments: line and block. A block comment may span lines.
    #[regex(r"//[^\n]*")]
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    Comment,

    // Newlines end statements.
    #[token("\n")]
    Newline,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Package => write!(f, "'package'"),
            Token::Import => write!(f, "'import'"),
            Token::Func => write!(f, "'func'"),
            Token::Var => write!(f, "'var'"),
            Token::Return => write!(f, "'return'"),
            Token::If => write!(f, "'if'"),
            Token::Else => write!(f, "'else'"),
            Token::For => write!(f, "'for'"),
            Token::Switch => write!(f, "'switch'"),
            Token::Case => write!(f, "'case'"),
            Token::Default => write!(f, "'default'"),
            Token::Break => write!(f, "'break'"),
            Token::Continue => write!(f, "'continue'"),
            Token::True => write!(f, "'true'"),
            Token::False => write!(f, "'false'"),
            Token::IntLit(n) => write!(f, "integer {n}"),
            Token::FloatLit(n) => write!(f, "float {n}"),
            Token::StringLit(_) | Token::RawStringLit(_) => write!(f, "string literal"),
            Token::RuneLit => write!(f, "rune literal"),
            Token::Ident => write!(f, "identifier"),
            Token::PlusPlus => write!(f, "'++'"),
            Token::MinusMinus => write!(f, "'--'"),
            Token::Plus => write!(f, "'+'"),
            Token::Minus => write!(f, "'-'"),
            Token::Star => write!(f, "'*'"),
            Token::Slash => write!(f, "'/'"),
            Token::Percent => write!(f, "'%'"),
            Token::PlusEq => write!(f, "'+='"),
            Token::MinusEq => write!(f, "'-='"),
            Token::StarEq => write!(f, "'*='"),
            Token::SlashEq => write!(f, "'/='"),
            Token::PercentEq => write!(f, "'%='"),
            Token::ColonEq => write!(f, "':='"),
            Token::Eq => write!(f, "'='"),
            Token::EqEq => write!(f, "'=='"),
            Token::BangEq => write!(f, "'!='"),
            Token::Lt => write!(f, "'<'"),
            Token::Gt => write!(f, "'>'"),
            Token::LtEq => write!(f, "'<='"),
            Token::GtEq => write!(f, "'>='"),
            Token::AmpAmp => write!(f, "'&&'"),
            Token::PipePipe => write!(f, "'||'"),
            Token::Bang => write!(f, "'!'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::LBrace => write!(f, "'{{'"),
            Token::RBrace => write!(f, "'}}'"),
            Token::LBracket => write!(f, "'['"),
            Token::RBracket => write!(f, "']'"),
            Token::Comma => write!(f, "','"),
            Token::Colon => write!(f, "':'"),
            Token::Semicolon => write!(f, "';'"),
            Token::Dot => write!(f, "'.'"),
            Token::Comment => write!(f, "comment"),
            Token::Newline => write!(f, "newline"),
        }
    }
}
