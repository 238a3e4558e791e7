pub mod ast;

use crate::diagnostics::CompileError;
use crate::lexer::token::Token;
use crate::span::{Span, Spanned};
use ast::*;

pub struct Parser<'a> {
    tokens: &'a [Spanned<Token>],
    source: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Spanned<Token>], source: &'a str) -> Self {
        Self { tokens, source, pos: 0 }
    }

    fn peek(&self) -> Option<&Spanned<Token>> {
        let mut i = self.pos;
        // Skip newlines when peeking
        while i < self.tokens.len() {
            if matches!(self.tokens[i].node, Token::Newline) {
                i += 1;
            } else {
                return Some(&self.tokens[i]);
            }
        }
        None
    }

    fn peek_raw(&self) -> Option<&Spanned<Token>> {
        self.tokens.get(self.pos)
    }

    fn check(&self, expected: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(&t.node) == std::mem::discriminant(expected))
    }

    fn check_raw(&self, expected: &Token) -> bool {
        self.peek_raw()
            .is_some_and(|t| std::mem::discriminant(&t.node) == std::mem::discriminant(expected))
    }

    fn advance(&mut self) -> Result<Spanned<Token>, CompileError> {
        match self.tokens.get(self.pos) {
            Some(tok) => {
                self.pos += 1;
                Ok(tok.clone())
            }
            None => Err(CompileError::syntax("unexpected end of file", self.eof_span())),
        }
    }

    fn skip_newlines(&mut self) {
        while self.pos < self.tokens.len() && matches!(self.tokens[self.pos].node, Token::Newline) {
            self.pos += 1;
        }
    }

    fn skip_terminators(&mut self) {
        while self.pos < self.tokens.len()
            && matches!(self.tokens[self.pos].node, Token::Newline | Token::Semicolon)
        {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<Spanned<Token>, CompileError> {
        self.skip_newlines();
        match self.tokens.get(self.pos) {
            Some(tok) if std::mem::discriminant(&tok.node) == std::mem::discriminant(expected) => {
                self.pos += 1;
                Ok(tok.clone())
            }
            Some(tok) => Err(CompileError::syntax(
                format!("expected {expected}, found {}", tok.node),
                tok.span,
            )),
            None => Err(CompileError::syntax(
                format!("expected {expected}, found end of file"),
                self.eof_span(),
            )),
        }
    }

    fn expect_ident(&mut self) -> Result<Spanned<String>, CompileError> {
        self.skip_newlines();
        match self.tokens.get(self.pos) {
            Some(tok) if matches!(tok.node, Token::Ident) => {
                let name = self.source[tok.span.start..tok.span.end].to_string();
                self.pos += 1;
                Ok(Spanned::new(name, tok.span))
            }
            Some(tok) => Err(CompileError::syntax(
                format!("expected identifier, found {}", tok.node),
                tok.span,
            )),
            None => Err(CompileError::syntax(
                "expected identifier, found end of file",
                self.eof_span(),
            )),
        }
    }

    fn eof_span(&self) -> Span {
        if let Some(last) = self.tokens.last() {
            Span::new(last.span.end, last.span.end)
        } else {
            Span::dummy()
        }
    }

    /// End offset of the most recently consumed token.
    fn last_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(0, |t| t.span.end)
    }

    fn at_statement_end(&self) -> bool {
        match self.peek_raw() {
            None => true,
            Some(tok) => matches!(tok.node, Token::Newline | Token::Semicolon | Token::RBrace),
        }
    }

    fn consume_statement_end(&mut self) -> Result<(), CompileError> {
        match self.peek_raw() {
            None => Ok(()),
            Some(tok) => match tok.node {
                Token::Newline | Token::Semicolon => {
                    self.pos += 1;
                    Ok(())
                }
                // `}` closes the block; leave it for the caller
                Token::RBrace => Ok(()),
                _ => Err(CompileError::syntax(
                    format!("expected end of statement, found {}", tok.node),
                    tok.span,
                )),
            },
        }
    }

    pub fn parse_program(&mut self) -> Result<Program, CompileError> {
        let mut package = None;
        let mut imports = Vec::new();
        let mut globals = Vec::new();
        let mut functions = Vec::new();
        self.skip_terminators();

        if self.check(&Token::Package) {
            self.advance()?;
            package = Some(self.expect_ident()?);
            self.consume_statement_end()?;
            self.skip_terminators();
        }

        while self.check(&Token::Import) {
            imports.extend(self.parse_import()?);
            self.skip_terminators();
        }

        while let Some(tok) = self.peek() {
            match &tok.node {
                Token::Func => functions.push(self.parse_function()?),
                Token::Var => {
                    let decl = self.parse_var_decl()?;
                    self.consume_statement_end()?;
                    globals.push(decl);
                }
                _ => {
                    return Err(CompileError::syntax(
                        format!("expected 'func' or 'var', found {}", tok.node),
                        tok.span,
                    ));
                }
            }
            self.skip_terminators();
        }

        Ok(Program { package, imports, globals, functions })
    }

    fn parse_import(&mut self) -> Result<Vec<Spanned<String>>, CompileError> {
        self.expect(&Token::Import)?;
        let mut paths = Vec::new();
        if self.check(&Token::LParen) {
            self.advance()?;
            self.skip_terminators();
            while !self.check(&Token::RParen) {
                paths.push(self.parse_import_path()?);
                self.skip_terminators();
            }
            self.expect(&Token::RParen)?;
        } else {
            paths.push(self.parse_import_path()?);
        }
        self.consume_statement_end()?;
        Ok(paths)
    }

    fn parse_import_path(&mut self) -> Result<Spanned<String>, CompileError> {
        self.skip_newlines();
        let tok = self.advance()?;
        match tok.node {
            Token::StringLit(path) | Token::RawStringLit(path) => Ok(Spanned::new(path, tok.span)),
            other => Err(CompileError::syntax(
                format!("expected import path, found {other}"),
                tok.span,
            )),
        }
    }

    fn parse_function(&mut self) -> Result<Spanned<Function>, CompileError> {
        let func_tok = self.expect(&Token::Func)?;
        let start = func_tok.span.start;
        let name = self.expect_ident()?;

        self.expect(&Token::LParen)?;
        let params = self
            .parse_field_list()?
            .into_iter()
            .map(|(name, ty)| {
                let name = name.unwrap_or_else(|| Spanned::new("_".to_string(), ty.span));
                Param { name, ty }
            })
            .collect();
        self.expect(&Token::RParen)?;

        // Result list: nothing, a single type, or a parenthesized list.
        let mut result_names = Vec::new();
        let results = if self.check_raw(&Token::LParen) {
            self.advance()?;
            let fields = self.parse_field_list()?;
            self.expect(&Token::RParen)?;
            let mut types = Vec::with_capacity(fields.len());
            for (name, ty) in fields {
                result_names.extend(name);
                types.push(ty);
            }
            types
        } else if self.check_raw(&Token::Ident) || self.check_raw(&Token::LBracket) {
            vec![self.parse_type()?]
        } else {
            Vec::new()
        };

        let body = self.parse_block()?;
        let span = Span::new(start, body.span.end);
        Ok(Spanned::new(Function { name, params, results, result_names, body }, span))
    }

    /// Parses `a, b int, c string` or `int, string` up to (not including) `)`.
    /// Names without a type take the type that follows them.
    fn parse_field_list(&mut self) -> Result<Vec<(Option<Spanned<String>>, Spanned<TypeExpr>)>, CompileError> {
        let mut entries: Vec<(Spanned<TypeExpr>, Option<Spanned<TypeExpr>>)> = Vec::new();
        while !self.check(&Token::RParen) {
            if !entries.is_empty() {
                self.expect(&Token::Comma)?;
                // trailing comma
                if self.check(&Token::RParen) {
                    break;
                }
            }
            let first = self.parse_type()?;
            let second = if self.check_raw(&Token::Ident) || self.check_raw(&Token::LBracket) {
                Some(self.parse_type()?)
            } else {
                None
            };
            entries.push((first, second));
        }

        if entries.iter().all(|(_, ty)| ty.is_none()) {
            return Ok(entries.into_iter().map(|(ty, _)| (None, ty)).collect());
        }

        let mut fields = Vec::with_capacity(entries.len());
        let mut pending: Vec<Spanned<String>> = Vec::new();
        for (first, second) in entries {
            let name = match first.node {
                TypeExpr::Named(n) => Spanned::new(n, first.span),
                TypeExpr::Slice(_) => {
                    return Err(CompileError::syntax(
                        "mixed named and unnamed parameters",
                        first.span,
                    ));
                }
            };
            match second {
                None => pending.push(name),
                Some(ty) => {
                    for grouped in pending.drain(..) {
                        fields.push((Some(grouped), ty.clone()));
                    }
                    fields.push((Some(name), ty));
                }
            }
        }
        if let Some(missing) = pending.first() {
            return Err(CompileError::syntax(
                format!("missing type for '{}'", missing.node),
                missing.span,
            ));
        }
        Ok(fields)
    }

    fn parse_type(&mut self) -> Result<Spanned<TypeExpr>, CompileError> {
        self.skip_newlines();
        if self.check(&Token::LBracket) {
            let open = self.advance()?;
            self.expect(&Token::RBracket)?;
            let elem = self.parse_type()?;
            let span = Span::new(open.span.start, elem.span.end);
            return Ok(Spanned::new(TypeExpr::Slice(Box::new(elem)), span));
        }
        let name = self.expect_ident()?;
        Ok(Spanned::new(TypeExpr::Named(name.node), name.span))
    }

    fn parse_block(&mut self) -> Result<Spanned<Block>, CompileError> {
        let open = self.expect(&Token::LBrace)?;
        let start = open.span.start;
        let mut stmts = Vec::new();
        self.skip_terminators();
        while !self.check(&Token::RBrace) {
            if self.peek().is_none() {
                return Err(CompileError::syntax("expected '}', found end of file", self.eof_span()));
            }
            stmts.push(self.parse_stmt()?);
            self.skip_terminators();
        }
        let close = self.expect(&Token::RBrace)?;
        Ok(Spanned::new(Block { stmts }, Span::new(start, close.span.end)))
    }

    /// Statements until the next `case`, `default`, or `}`.
    fn parse_case_body(&mut self) -> Result<Vec<Spanned<Stmt>>, CompileError> {
        let mut stmts = Vec::new();
        self.skip_terminators();
        while !(self.check(&Token::Case) || self.check(&Token::Default) || self.check(&Token::RBrace)) {
            if self.peek().is_none() {
                return Err(CompileError::syntax("expected '}', found end of file", self.eof_span()));
            }
            stmts.push(self.parse_stmt()?);
            self.skip_terminators();
        }
        Ok(stmts)
    }

    fn parse_stmt(&mut self) -> Result<Spanned<Stmt>, CompileError> {
        self.skip_newlines();
        let tok = self
            .peek()
            .ok_or_else(|| CompileError::syntax("unexpected end of file in statement", self.eof_span()))?;
        let start = tok.span.start;

        let stmt = match &tok.node {
            Token::Var => {
                let decl = self.parse_var_decl()?;
                Spanned::new(Stmt::Var(decl.node), decl.span)
            }
            Token::Return => self.parse_return_stmt()?,
            Token::If => return self.parse_if_stmt(),
            Token::For => return self.parse_for_stmt(),
            Token::Switch => return self.parse_switch_stmt(),
            Token::LBrace => {
                let block = self.parse_block()?;
                let span = block.span;
                return Ok(Spanned::new(Stmt::Block(block), span));
            }
            Token::Break => {
                let tok = self.advance()?;
                Spanned::new(Stmt::Break, tok.span)
            }
            Token::Continue => {
                let tok = self.advance()?;
                Spanned::new(Stmt::Continue, tok.span)
            }
            _ => {
                let stmt = self.parse_simple_stmt()?;
                Spanned::new(stmt, Span::new(start, self.last_end()))
            }
        };
        self.consume_statement_end()?;
        Ok(stmt)
    }

    fn parse_var_decl(&mut self) -> Result<Spanned<VarDecl>, CompileError> {
        let var_tok = self.expect(&Token::Var)?;
        let start = var_tok.span.start;
        let mut names = vec![self.expect_ident()?];
        while self.check_raw(&Token::Comma) {
            self.advance()?;
            names.push(self.expect_ident()?);
        }
        let ty = if self.check_raw(&Token::Ident) || self.check_raw(&Token::LBracket) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let values = if self.check_raw(&Token::Eq) {
            self.advance()?;
            self.parse_expr_list()?
        } else {
            Vec::new()
        };
        if ty.is_none() && values.is_empty() {
            return Err(CompileError::syntax(
                "variable declaration needs a type or an initializer",
                Span::new(start, self.last_end()),
            ));
        }
        let span = Span::new(start, self.last_end());
        Ok(Spanned::new(VarDecl { names, ty, values }, span))
    }

    fn parse_return_stmt(&mut self) -> Result<Spanned<Stmt>, CompileError> {
        let ret_tok = self.expect(&Token::Return)?;
        let values = if self.at_statement_end() {
            Vec::new()
        } else {
            self.parse_expr_list()?
        };
        let span = Span::new(ret_tok.span.start, self.last_end());
        Ok(Spanned::new(Stmt::Return(values), span))
    }

    fn parse_if_stmt(&mut self) -> Result<Spanned<Stmt>, CompileError> {
        let if_tok = self.expect(&Token::If)?;
        let condition = self.parse_expr(0)?;
        let then_block = self.parse_block()?;
        let else_branch = if self.check_raw(&Token::Else) {
            self.advance()?;
            if self.check(&Token::If) {
                Some(Box::new(self.parse_if_stmt()?))
            } else {
                let block = self.parse_block()?;
                let span = block.span;
                Some(Box::new(Spanned::new(Stmt::Block(block), span)))
            }
        } else {
            None
        };
        let span = Span::new(if_tok.span.start, self.last_end());
        Ok(Spanned::new(Stmt::If { condition, then_block, else_branch }, span))
    }

    fn parse_for_stmt(&mut self) -> Result<Spanned<Stmt>, CompileError> {
        let for_tok = self.expect(&Token::For)?;
        let start = for_tok.span.start;

        let (init, condition, post) = if self.check(&Token::LBrace) {
            (None, None, None)
        } else {
            let first = if self.check(&Token::Semicolon) {
                None
            } else {
                let s = self.peek().map_or(start, |t| t.span.start);
                let stmt = self.parse_simple_stmt()?;
                Some(Spanned::new(stmt, Span::new(s, self.last_end())))
            };

            if self.check(&Token::Semicolon) {
                self.advance()?;
                let condition = if self.check(&Token::Semicolon) {
                    None
                } else {
                    Some(self.parse_expr(0)?)
                };
                self.expect(&Token::Semicolon)?;
                let post = if self.check(&Token::LBrace) {
                    None
                } else {
                    let s = self.peek().map_or(start, |t| t.span.start);
                    let stmt = self.parse_simple_stmt()?;
                    Some(Box::new(Spanned::new(stmt, Span::new(s, self.last_end()))))
                };
                (first.map(Box::new), condition, post)
            } else {
                match first {
                    Some(Spanned { node: Stmt::Expr(cond), .. }) => (None, Some(cond), None),
                    Some(other) => {
                        return Err(CompileError::syntax(
                            "expected for loop condition",
                            other.span,
                        ));
                    }
                    None => (None, None, None),
                }
            }
        };

        let body = self.parse_block()?;
        let span = Span::new(start, body.span.end);
        Ok(Spanned::new(Stmt::For { init, condition, post, body }, span))
    }

    fn parse_switch_stmt(&mut self) -> Result<Spanned<Stmt>, CompileError> {
        let switch_tok = self.expect(&Token::Switch)?;
        let tag = if self.check(&Token::LBrace) {
            None
        } else {
            Some(self.parse_expr(0)?)
        };
        self.expect(&Token::LBrace)?;
        self.skip_terminators();

        let mut cases = Vec::new();
        let mut seen_default = false;
        while !self.check(&Token::RBrace) {
            let tok = self
                .peek()
                .ok_or_else(|| CompileError::syntax("expected '}', found end of file", self.eof_span()))?;
            match tok.node {
                Token::Case => {
                    self.advance()?;
                    let values = self.parse_expr_list()?;
                    self.expect(&Token::Colon)?;
                    let body = self.parse_case_body()?;
                    cases.push(SwitchCase { values, body });
                }
                Token::Default => {
                    let span = tok.span;
                    if seen_default {
                        return Err(CompileError::syntax("multiple defaults in switch", span));
                    }
                    seen_default = true;
                    self.advance()?;
                    self.expect(&Token::Colon)?;
                    let body = self.parse_case_body()?;
                    cases.push(SwitchCase { values: Vec::new(), body });
                }
                ref other => {
                    return Err(CompileError::syntax(
                        format!("expected 'case' or 'default', found {other}"),
                        tok.span,
                    ));
                }
            }
        }
        let close = self.expect(&Token::RBrace)?;
        let span = Span::new(switch_tok.span.start, close.span.end);
        Ok(Spanned::new(Stmt::Switch { tag, cases }, span))
    }

    /// Expression statement, assignment, short variable declaration, or inc/dec.
    fn parse_simple_stmt(&mut self) -> Result<Stmt, CompileError> {
        let lhs = self.parse_expr_list()?;
        let Some(tok) = self.peek_raw() else {
            return Self::expr_stmt(lhs);
        };
        let tok_span = tok.span;

        let compound = match tok.node {
            Token::PlusEq => Some(BinOp::Add),
            Token::MinusEq => Some(BinOp::Sub),
            Token::StarEq => Some(BinOp::Mul),
            Token::SlashEq => Some(BinOp::Div),
            Token::PercentEq => Some(BinOp::Mod),
            _ => None,
        };
        if let Some(op) = compound {
            self.advance()?;
            let mut targets = Self::into_idents(lhs, "cannot assign to expression")?;
            if targets.len() != 1 {
                return Err(CompileError::syntax("expected a single assignment target", tok_span));
            }
            let target = targets.remove(0);
            let value = self.parse_expr(0)?;
            return Ok(Stmt::CompoundAssign { target, op, value });
        }

        match tok.node {
            Token::ColonEq => {
                self.advance()?;
                let names = Self::into_idents(lhs, "non-name on left side of :=")?;
                let values = self.parse_expr_list()?;
                Ok(Stmt::ShortVar { names, values })
            }
            Token::Eq => {
                self.advance()?;
                let targets = Self::into_idents(lhs, "cannot assign to expression")?;
                let values = self.parse_expr_list()?;
                Ok(Stmt::Assign { targets, values })
            }
            Token::PlusPlus | Token::MinusMinus => {
                let increment = matches!(tok.node, Token::PlusPlus);
                self.advance()?;
                let mut targets = Self::into_idents(lhs, "cannot increment expression")?;
                if targets.len() != 1 {
                    return Err(CompileError::syntax("expected a single operand", tok_span));
                }
                let target = targets.remove(0);
                Ok(Stmt::IncDec { target, increment })
            }
            _ => Self::expr_stmt(lhs),
        }
    }

    fn expr_stmt(mut exprs: Vec<Spanned<Expr>>) -> Result<Stmt, CompileError> {
        if exprs.len() != 1 {
            let span = exprs[0].span.to(exprs[exprs.len() - 1].span);
            return Err(CompileError::syntax("expected assignment after expression list", span));
        }
        Ok(Stmt::Expr(exprs.remove(0)))
    }

    fn into_idents(exprs: Vec<Spanned<Expr>>, msg: &str) -> Result<Vec<Spanned<String>>, CompileError> {
        exprs
            .into_iter()
            .map(|e| match e.node {
                Expr::Ident(name) => Ok(Spanned::new(name, e.span)),
                _ => Err(CompileError::syntax(msg, e.span)),
            })
            .collect()
    }

    fn parse_expr_list(&mut self) -> Result<Vec<Spanned<Expr>>, CompileError> {
        let mut exprs = vec![self.parse_expr(0)?];
        while self.check_raw(&Token::Comma) {
            self.advance()?;
            exprs.push(self.parse_expr(0)?);
        }
        Ok(exprs)
    }

    fn parse_expr(&mut self, min_bp: u8) -> Result<Spanned<Expr>, CompileError> {
        let mut lhs = self.parse_prefix()?;

        loop {
            // A newline ends the expression.
            let Some(tok) = self.peek_raw() else { break };

            if matches!(tok.node, Token::Dot) {
                return Err(CompileError::syntax("selector expressions are not supported", tok.span));
            }

            let op = match tok.node {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                Token::Star => BinOp::Mul,
                Token::Slash => BinOp::Div,
                Token::Percent => BinOp::Mod,
                Token::EqEq => BinOp::Eq,
                Token::BangEq => BinOp::Neq,
                Token::Lt => BinOp::Lt,
                Token::Gt => BinOp::Gt,
                Token::LtEq => BinOp::LtEq,
                Token::GtEq => BinOp::GtEq,
                Token::AmpAmp => BinOp::And,
                Token::PipePipe => BinOp::Or,
                _ => break,
            };

            let (l_bp, r_bp) = infix_binding_power(op);
            if l_bp < min_bp {
                break;
            }

            self.advance()?;
            let rhs = self.parse_expr(r_bp)?;
            let span = lhs.span.to(rhs.span);
            lhs = Spanned::new(
                Expr::BinOp { op, lhs: Box::new(lhs), rhs: Box::new(rhs) },
                span,
            );
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> Result<Spanned<Expr>, CompileError> {
        self.skip_newlines();
        let tok = self.advance()?;

        match tok.node {
            Token::IntLit(n) => Ok(Spanned::new(Expr::IntLit(n), tok.span)),
            Token::FloatLit(n) => Ok(Spanned::new(Expr::FloatLit(n), tok.span)),
            Token::StringLit(s) | Token::RawStringLit(s) => Ok(Spanned::new(Expr::StringLit(s), tok.span)),
            Token::RuneLit => Ok(Spanned::new(Expr::RuneLit, tok.span)),
            Token::True => Ok(Spanned::new(Expr::BoolLit(true), tok.span)),
            Token::False => Ok(Spanned::new(Expr::BoolLit(false), tok.span)),
            Token::Ident => {
                let name = self.source[tok.span.start..tok.span.end].to_string();
                self.parse_expr_after_ident(Spanned::new(name, tok.span))
            }
            Token::LParen => {
                let expr = self.parse_expr(0)?;
                let close = self.expect(&Token::RParen)?;
                Ok(Spanned::new(expr.node, Span::new(tok.span.start, close.span.end)))
            }
            Token::Minus | Token::Bang => {
                let op = if matches!(tok.node, Token::Minus) { UnaryOp::Neg } else { UnaryOp::Not };
                let operand = self.parse_prefix()?;
                let span = Span::new(tok.span.start, operand.span.end);
                Ok(Spanned::new(Expr::UnaryOp { op, operand: Box::new(operand) }, span))
            }
            Token::Plus => self.parse_prefix(),
            other => Err(CompileError::syntax(
                format!("unexpected token {other} in expression"),
                tok.span,
            )),
        }
    }

    /// An identifier is a call when `(` follows on the same line.
    fn parse_expr_after_ident(&mut self, ident: Spanned<String>) -> Result<Spanned<Expr>, CompileError> {
        if !self.check_raw(&Token::LParen) {
            return Ok(Spanned::new(Expr::Ident(ident.node), ident.span));
        }
        self.advance()?;
        let mut args = Vec::new();
        while !self.check(&Token::RParen) {
            if !args.is_empty() {
                self.expect(&Token::Comma)?;
                if self.check(&Token::RParen) {
                    break;
                }
            }
            args.push(self.parse_expr(0)?);
        }
        let close = self.expect(&Token::RParen)?;
        let span = Span::new(ident.span.start, close.span.end);
        Ok(Spanned::new(Expr::Call { name: ident, args }, span))
    }
}

fn infix_binding_power(op: BinOp) -> (u8, u8) {
    match op {
        BinOp::Or => (1, 2),
        BinOp::And => (3, 4),
        BinOp::Eq | BinOp::Neq | BinOp::Lt | BinOp::Gt | BinOp::LtEq | BinOp::GtEq => (5, 6),
        BinOp::Add | BinOp::Sub => (7, 8),
        BinOp::Mul | BinOp::Div | BinOp::Mod => (9, 10),
    }
}
