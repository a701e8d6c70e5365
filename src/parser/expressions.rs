/*
 * ==========================================================================
 * HBARS - Templates with Claws!
 * ==========================================================================
 *
 * File:     parser/expressions.rs
 * Purpose:  Expression grammar: `helperName param* hash?`, paths with
 *           `../` depth, literals, sub-expressions and block params.
 *
 * License:
 * This file is part of the hbars template engine.
 *
 * hbars is dual-licensed under the terms of:
 *   - The MIT license
 *   - The Apache License, Version 2.0
 *
 * You may choose either license to govern your use of this software.
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under these licenses is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *
 * ==========================================================================
 */

use crate::ast::{
    BooleanLiteral, CallExpr, Expr, Hash, HashPair, NumberLiteral, PathExpression, StringLiteral,
    SubExpression,
};
use crate::error::{Error, Result};
use crate::lexer::{Token, TokenKind};
use crate::parser::parser::Parser;

impl Parser {
    /// Parses `helperName param* hash?`.
    pub(crate) fn call_expr(&mut self) -> Result<CallExpr> {
        let path = self.helper_name()?;
        let (params, hash) = self.params_hash()?;

        Ok(CallExpr { path, params, hash })
    }

    /// Parses `param* hash?`.
    pub(crate) fn params_hash(&mut self) -> Result<(Vec<Expr>, Option<Hash>)> {
        let mut params = Vec::new();
        while self.is_param() {
            params.push(self.param()?);
        }

        let hash = if self.is_hash_segment() {
            Some(self.hash()?)
        } else {
            None
        };

        Ok((params, hash))
    }

    /// Returns true if the next tokens represent a `param`.
    fn is_param(&self) -> bool {
        (self.check(TokenKind::OpenSexpr) || self.is_helper_name()) && !self.is_hash_segment()
    }

    fn is_helper_name(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Boolean
                | TokenKind::Number
                | TokenKind::Str
                | TokenKind::Data
                | TokenKind::Id
        )
    }

    /// param : helperName | sexpr
    fn param(&mut self) -> Result<Expr> {
        if self.check(TokenKind::OpenSexpr) {
            self.sexpr()
        } else {
            self.helper_name()
        }
    }

    /// helperName : path | dataName | STRING | NUMBER | BOOLEAN
    pub(crate) fn helper_name(&mut self) -> Result<Expr> {
        let tok = self.peek().clone();

        match tok.kind {
            TokenKind::Boolean => {
                self.shift();
                Ok(Expr::BoolLit(BooleanLiteral {
                    value: tok.lexeme == "true",
                    span: tok.span,
                }))
            }
            TokenKind::Number => {
                self.shift();
                let value = parse_number(&tok)?;
                Ok(Expr::NumberLit(NumberLiteral {
                    value,
                    original: tok.lexeme,
                    span: tok.span,
                }))
            }
            TokenKind::Str => {
                self.shift();
                Ok(Expr::StringLit(StringLiteral {
                    value: tok.lexeme,
                    span: tok.span,
                }))
            }
            TokenKind::Data => {
                self.shift();
                self.path(true)
            }
            _ => self.path(false),
        }
    }

    /// partialName : helperName | sexpr
    pub(crate) fn partial_name(&mut self) -> Result<Expr> {
        if self.check(TokenKind::OpenSexpr) {
            self.sexpr()
        } else {
            self.helper_name()
        }
    }

    /// sexpr : OPEN_SEXPR helperName param* hash? CLOSE_SEXPR
    fn sexpr(&mut self) -> Result<Expr> {
        let open = self.expect(TokenKind::OpenSexpr, "Failed to parse sub-expression.")?;
        let call = self.call_expr()?;
        self.expect(TokenKind::CloseSexpr, "Failed to parse sub-expression.")?;

        Ok(Expr::SubExpr(SubExpression {
            call: Box::new(call),
            span: open.span,
        }))
    }

    /// hash : hashSegment+ where hashSegment : ID EQUALS param
    fn hash(&mut self) -> Result<Hash> {
        let span = self.peek().span;
        let mut pairs: Vec<HashPair> = Vec::new();

        while self.is_hash_segment() {
            let key_tok = self.expect(TokenKind::Id, "Failed to parse hash segment.")?;
            self.expect(TokenKind::Equals, "Failed to parse hash segment.")?;
            let value = self.param()?;

            if pairs.iter().any(|p| p.key == key_tok.lexeme) {
                return Err(Error::parse(
                    format!("Duplicate hash key: {}", key_tok.lexeme),
                    key_tok.span,
                ));
            }

            pairs.push(HashPair {
                key: key_tok.lexeme,
                value,
                span: key_tok.span,
            });
        }

        if pairs.is_empty() {
            let tok = self.peek();
            return Err(Error::parse(
                format!("Failed to parse hash: {}", tok),
                tok.span,
            ));
        }

        Ok(Hash { pairs, span })
    }

    /// blockParams : OPEN_BLOCK_PARAMS ID+ CLOSE_BLOCK_PARAMS
    pub(crate) fn block_params(&mut self) -> Result<Vec<String>> {
        let open = self.expect(TokenKind::OpenBlockParams, "Failed to parse block params.")?;

        let mut names = Vec::new();
        while self.check(TokenKind::Id) {
            names.push(self.shift().lexeme);
        }

        if names.is_empty() {
            return Err(Error::parse(
                "Failed to parse block params: missing name",
                open.span,
            ));
        }

        self.expect(TokenKind::CloseBlockParams, "Failed to parse block params.")?;

        Ok(names)
    }

    /// path : ID (SEP ID)*
    ///
    /// Each leading `..` increments the depth counter; `.` and `this` are
    /// identity segments and contribute no part.
    fn path(&mut self, is_data: bool) -> Result<Expr> {
        let tok = self.expect(TokenKind::Id, "Failed to parse path.")?;

        let mut path = PathExpression::new(is_data, tok.span);
        path.original.push_str(&tok.lexeme);
        path_part(&mut path, &tok)?;

        while self.check(TokenKind::Sep) {
            let sep = self.shift();
            path.original.push_str(&sep.lexeme);

            let seg = self.expect(TokenKind::Id, "Failed to parse path: expected a segment.")?;
            path.original.push_str(&seg.lexeme);
            path_part(&mut path, &seg)?;
        }

        Ok(Expr::Path(path))
    }
}

/// Folds one segment into the path being built.
fn path_part(path: &mut PathExpression, tok: &Token) -> Result<()> {
    match tok.lexeme.as_str() {
        ".." => {
            if !path.parts.is_empty() {
                return Err(Error::parse(
                    format!("Invalid path: {}", path.original),
                    tok.span,
                ));
            }
            path.depth += 1;
        }
        "." | "this" => {}
        part => path.parts.push(part.to_string()),
    }

    Ok(())
}

/// Converts a number token to its value. Hex goes through integer parsing,
/// everything else through float parsing.
fn parse_number(tok: &Token) -> Result<f64> {
    let text = tok.lexeme.as_str();

    let (sign, magnitude) = match text.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, text.strip_prefix('+').unwrap_or(text)),
    };

    let value = if let Some(hex) = magnitude
        .strip_prefix("0x")
        .or_else(|| magnitude.strip_prefix("0X"))
    {
        i64::from_str_radix(hex, 16).map(|v| v as f64).map_err(|_| {
            Error::parse(format!("Failed to parse number: {}", text), tok.span)
        })?
    } else {
        magnitude
            .parse::<f64>()
            .map_err(|_| Error::parse(format!("Failed to parse number: {}", text), tok.span))?
    };

    Ok(sign * value)
}
