pub mod token;

use logos::Logos;
use crate::span::{Span, Spanned};
use crate::diagnostics::CompileError;
use token::Token;

pub fn lex(source: &str) -> Result<Vec<Spanned<Token>>, CompileError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(Token::Comment) => {
                // A block comment spanning lines still ends the statement it follows.
                if lexer.slice().contains('\n') {
                    tokens.push(Spanned::new(Token::Newline, Span::new(span.start, span.end)));
                }
            }
            Ok(tok) => tokens.push(Spanned::new(tok, Span::new(span.start, span.end))),
            Err(()) => {
                return Err(CompileError::syntax(
                    rejection_message(&source[span.start..span.end]),
                    Span::new(span.start, span.end),
                ));
            }
        }
    }

    Ok(tokens)
}

/// Integer literals that fail to convert reach the error branch with their
/// whole text as the slice.
fn rejection_message(text: &str) -> String {
    let hex_body = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"));
    match hex_body {
        Some(body) if body.chars().all(|c| c == '_') => format!("invalid integer literal '{text}'"),
        _ if text.starts_with(|c: char| c.is_ascii_digit()) => {
            format!("integer literal out of range: {text}")
        }
        _ => format!("unexpected character '{text}'"),
    }
}
