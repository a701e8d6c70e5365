/*
 * ==========================================================================
 * HBARS - Templates with Claws!
 * ==========================================================================
 *
 * File:     parser/helpers.rs
 * Purpose:  Token matching, consumption and lookahead utilities shared by
 *           the grammar rules.
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

use crate::ast::Strip;
use crate::error::{Error, Result};
use crate::lexer::{Token, TokenKind};
use crate::parser::parser::Parser;

impl Parser {
    /// Returns the next token without consuming it. The stream always ends
    /// with a terminal `Eof`/`Error` token, which is returned past the end.
    pub(crate) fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    /// Lookahead at offset `n` (0 = next token).
    pub(crate) fn peek_at(&self, n: usize) -> &Token {
        self.tokens
            .get(self.current + n)
            .unwrap_or_else(|| self.tokens.last().expect("token stream is never empty"))
    }

    /// Consumes and returns the next token. The terminal token is never
    /// advanced past.
    pub(crate) fn shift(&mut self) -> Token {
        let tok = self.peek().clone();
        if !matches!(tok.kind, TokenKind::Eof | TokenKind::Error) {
            self.current += 1;
        }
        tok
    }

    /// Checks the next token's kind without consuming it.
    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Consumes a token of the required kind, or fails with a descriptive
    /// error. A pending lexer error surfaces as-is.
    pub(crate) fn expect(&mut self, kind: TokenKind, context: &str) -> Result<Token> {
        let tok = self.peek();

        if tok.kind == kind {
            return Ok(self.shift());
        }

        if tok.kind == TokenKind::Error {
            return Err(Error::lex(tok.lexeme.clone(), tok.span));
        }

        Err(Error::parse(
            format!("{} Expected {} but got: {}", context, kind, tok),
            tok.span,
        ))
    }

    /// hashSegment lookahead: `ID` followed by `=`.
    pub(crate) fn is_hash_segment(&self) -> bool {
        self.peek().kind == TokenKind::Id && self.peek_at(1).kind == TokenKind::Equals
    }

    /// Surfaces a pending lexer error token, if any.
    pub(crate) fn bail_if_lex_error(&self) -> Result<()> {
        let tok = self.peek();
        if tok.kind == TokenKind::Error {
            return Err(Error::lex(tok.lexeme.clone(), tok.span));
        }
        Ok(())
    }
}

/// Reads the strip flags of a tag from its open and close delimiter tokens.
pub(crate) fn strip_between(open: &Token, close: &Token) -> Strip {
    Strip::new(
        open.lexeme.starts_with("{{~"),
        close.lexeme.ends_with("~}}"),
    )
}

/// Reads the strip flags of a single-token tag (`{{^}}`, `{{else}}`,
/// comments).
pub(crate) fn strip_single(tok: &Token) -> Strip {
    Strip::new(
        tok.lexeme.starts_with("{{~"),
        tok.lexeme.ends_with("~}}"),
    )
}
