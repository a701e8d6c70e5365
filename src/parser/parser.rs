/*
 * ==========================================================================
 * HBARS - Templates with Claws!
 * ==========================================================================
 *
 * Core Recursive-Descent Parser Entry Point
 *
 * This file defines the primary `Parser` structure and the public `parse()`
 * driver function used to transform a token stream into a `Program` AST.
 *
 * The parsing implementation itself is split across multiple modules:
 * - `statements.rs`   → Statement-level grammar (mustache, block, partial)
 * - `expressions.rs`  → Expression grammar (paths, literals, hashes)
 * - `helpers.rs`      → Token matching, consumption, and lookahead
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

use crate::ast::Program;
use crate::error::{Error, Result};
use crate::lexer::{tokenize, Token, TokenKind};

/// The recursive-descent template parser.
///
/// The token stream is fully scanned up front; the grammar needs at most
/// two tokens of lookahead. Grammar rules live in the `statements` and
/// `expressions` modules as further `impl Parser` blocks.
pub struct Parser {
    /// Complete token stream, terminated by `Eof` or `Error`.
    pub(crate) tokens: Vec<Token>,

    /// Current cursor position within the token stream.
    pub(crate) current: usize,
}

/// Parses template source into a `Program`.
///
/// The first lex or grammar error aborts the parse; no partial AST is ever
/// returned. Whitespace control is a separate pass (see
/// [`crate::whitespace`]), applied by `Template::parse`.
pub fn parse(source: &str) -> Result<Program> {
    let tokens = tokenize(source);
    let mut parser = Parser { tokens, current: 0 };

    let program = parser.program()?;

    // every token must have been consumed
    let tok = parser.peek();
    match tok.kind {
        TokenKind::Eof => Ok(program),
        TokenKind::Error => Err(Error::lex(tok.lexeme.clone(), tok.span)),
        _ => Err(Error::parse(
            format!("Failed to parse statement: {}", tok),
            tok.span,
        )),
    }
}

impl Parser {
    /// program : statement*
    ///
    /// Consumes statements until a token that cannot start one, leaving
    /// block-structure tokens (`{{else}}`, `{{/…}}`) for the caller.
    pub(crate) fn program(&mut self) -> Result<Program> {
        let mut program = Program::new(self.peek().span);

        while self.is_statement() {
            let stmt = self.statement()?;
            program.body.push(stmt);
        }

        self.bail_if_lex_error()?;

        Ok(program)
    }

    /// Returns true if the next token starts a statement.
    fn is_statement(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Open
                | TokenKind::OpenUnescaped
                | TokenKind::OpenBlock
                | TokenKind::OpenInverse
                | TokenKind::OpenRawBlock
                | TokenKind::OpenPartial
                | TokenKind::Content
                | TokenKind::Comment
        )
    }
}
