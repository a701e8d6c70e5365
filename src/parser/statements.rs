/*
 * ==========================================================================
 * HBARS - Templates with Claws!
 * ==========================================================================
 *
 * File:     parser/statements.rs
 * Purpose:  Statement-level grammar: content, comments, mustaches, blocks
 *           with inverse chains, raw blocks and partials.
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

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::{
    BlockStatement, CommentStatement, ContentStatement, MustacheStatement, PartialStatement,
    PathExpression, Program, Stmt, Strip,
};
use crate::error::{Error, Result};
use crate::lexer::TokenKind;
use crate::parser::helpers::{strip_between, strip_single};
use crate::parser::parser::Parser;

static COMMENT_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\{\{~?!-?-?").unwrap());
static COMMENT_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-?-?~?\}\}$").unwrap());

impl Parser {
    /// statement : mustache | block | rawBlock | partial | content | COMMENT
    pub(crate) fn statement(&mut self) -> Result<Stmt> {
        match self.peek().kind {
            TokenKind::Open | TokenKind::OpenUnescaped => self.mustache(),
            TokenKind::OpenBlock | TokenKind::OpenInverse => self.block(),
            TokenKind::OpenRawBlock => self.raw_block(),
            TokenKind::OpenPartial => self.partial(),
            TokenKind::Content => self.content(),
            TokenKind::Comment => self.comment(),
            _ => {
                let tok = self.peek();
                Err(Error::parse(
                    format!("Failed to parse statement: {}", tok),
                    tok.span,
                ))
            }
        }
    }

    /// content : CONTENT
    fn content(&mut self) -> Result<Stmt> {
        let tok = self.shift();
        Ok(Stmt::Content(ContentStatement::new(tok.lexeme, tok.span)))
    }

    /// COMMENT — the token holds the full tag; delimiters are stripped
    /// here.
    fn comment(&mut self) -> Result<Stmt> {
        let tok = self.shift();

        let strip = strip_single(&tok);
        let value = COMMENT_OPEN.replace(&tok.lexeme, "");
        let value = COMMENT_CLOSE.replace(&value, "").into_owned();

        Ok(Stmt::Comment(CommentStatement {
            value,
            strip,
            span: tok.span,
        }))
    }

    /// mustache : OPEN helperName param* hash? CLOSE
    ///          | OPEN_UNESCAPED helperName param* hash? CLOSE_UNESCAPED
    fn mustache(&mut self) -> Result<Stmt> {
        let open_tok = self.shift();

        let escaped = open_tok.kind == TokenKind::Open && !open_tok.lexeme.contains('&');
        let close_kind = if open_tok.kind == TokenKind::OpenUnescaped {
            TokenKind::CloseUnescaped
        } else {
            TokenKind::Close
        };

        let call = self.call_expr()?;

        let close_tok = self.expect(close_kind, "Failed to parse mustache statement.")?;

        Ok(Stmt::Mustache(MustacheStatement {
            call,
            escaped,
            strip: strip_between(&open_tok, &close_tok),
            span: open_tok.span,
        }))
    }

    /// block : openBlock program inverseChain? closeBlock
    ///       | openInverse program inverseAndProgram? closeBlock
    fn block(&mut self) -> Result<Stmt> {
        // OPEN_BLOCK | OPEN_INVERSE
        let open_tok = self.shift();
        let inverted = open_tok.kind == TokenKind::OpenInverse;

        // helperName param* hash? blockParams?
        let call = self.call_expr()?;
        let block_params = if self.check(TokenKind::OpenBlockParams) {
            self.block_params()?
        } else {
            Vec::new()
        };

        let open_close_tok = self.expect(TokenKind::Close, "Failed to parse open block.")?;
        let open_strip = strip_between(&open_tok, &open_close_tok);

        let mut first = self.program()?;
        first.block_params = block_params;

        let mut inverse_strip = Strip::default();
        let (program, mut inverse) = if inverted {
            // {{^name}} — the first program is the inverse section
            let mut program = None;
            if self.check(TokenKind::Inverse) {
                let inv_tok = self.shift();
                inverse_strip = strip_single(&inv_tok);
                program = Some(self.program()?);
            }
            (program, Some(first))
        } else {
            let inverse = match self.inverse_chain()? {
                Some((chain, strip)) => {
                    inverse_strip = strip;
                    Some(chain)
                }
                None => None,
            };
            (Some(first), inverse)
        };

        // closeBlock : OPEN_ENDBLOCK helperName CLOSE
        let end_tok = self.expect(TokenKind::OpenEndBlock, "Failed to parse block.")?;
        let close_name = self.close_name()?;
        self.match_block_names(&call.path, &close_name)?;
        let end_close_tok = self.expect(TokenKind::Close, "Failed to parse block.")?;
        let close_strip = strip_between(&end_tok, &end_close_tok);

        // chained inverse blocks share the outer close tag
        if let Some(inv) = inverse.as_mut() {
            propagate_close_strip(inv, close_strip);
        }

        Ok(Stmt::Block(BlockStatement {
            call,
            program,
            inverse,
            raw: false,
            open_strip,
            inverse_strip,
            close_strip,
            span: open_tok.span,
        }))
    }

    /// inverseChain : openInverseChain program inverseChain?
    ///              | INVERSE program
    ///
    /// An `{{else helper …}}` section becomes a nested block inside a
    /// program marked `chained`; the returned strip is that of the inverse
    /// delimiter itself.
    fn inverse_chain(&mut self) -> Result<Option<(Program, Strip)>> {
        if self.check(TokenKind::Inverse) {
            // {{^}} or {{else}}
            let tok = self.shift();
            let strip = strip_single(&tok);
            let program = self.program()?;
            return Ok(Some((program, strip)));
        }

        if !self.check(TokenKind::OpenInverseChain) {
            return Ok(None);
        }

        // OPEN_INVERSE_CHAIN helperName param* hash? blockParams? CLOSE
        let open_tok = self.shift();
        let call = self.call_expr()?;
        let block_params = if self.check(TokenKind::OpenBlockParams) {
            self.block_params()?
        } else {
            Vec::new()
        };
        let close_tok = self.expect(TokenKind::Close, "Failed to parse inverse chain.")?;
        let chain_strip = strip_between(&open_tok, &close_tok);

        let mut body = self.program()?;
        body.block_params = block_params;

        let mut inverse_strip = Strip::default();
        let nested = match self.inverse_chain()? {
            Some((chain, strip)) => {
                inverse_strip = strip;
                Some(chain)
            }
            None => None,
        };

        let block = BlockStatement {
            call,
            program: Some(body),
            inverse: nested,
            raw: false,
            open_strip: chain_strip,
            inverse_strip,
            // filled in when the outer close tag is parsed
            close_strip: Strip::default(),
            span: open_tok.span,
        };

        let mut chained = Program::new(open_tok.span);
        chained.chained = true;
        chained.body.push(Stmt::Block(block));

        Ok(Some((chained, chain_strip)))
    }

    /// rawBlock : OPEN_RAW_BLOCK helperName param* hash? CLOSE_RAW_BLOCK
    ///            content
    ///            OPEN_END_RAW_BLOCK helperName CLOSE_RAW_BLOCK
    fn raw_block(&mut self) -> Result<Stmt> {
        let open_tok = self.shift();

        let call = self.call_expr()?;
        self.expect(TokenKind::CloseRawBlock, "Failed to parse raw block.")?;

        // the lexer guarantees exactly one (possibly empty) content token
        let content_tok = self.expect(TokenKind::Content, "Failed to parse raw block.")?;
        let mut program = Program::new(content_tok.span);
        program.body.push(Stmt::Content(ContentStatement::new(
            content_tok.lexeme,
            content_tok.span,
        )));

        self.expect(TokenKind::OpenEndRawBlock, "Failed to parse raw block.")?;
        let close_name = self.close_name()?;
        self.match_block_names(&call.path, &close_name)?;
        self.expect(TokenKind::CloseRawBlock, "Failed to parse raw block.")?;

        Ok(Stmt::Block(BlockStatement {
            call,
            program: Some(program),
            inverse: None,
            raw: true,
            open_strip: Strip::default(),
            inverse_strip: Strip::default(),
            close_strip: Strip::default(),
            span: open_tok.span,
        }))
    }

    /// partial : OPEN_PARTIAL partialName param* hash? CLOSE
    fn partial(&mut self) -> Result<Stmt> {
        let open_tok = self.shift();

        let name = self.partial_name()?;
        let (params, hash) = self.params_hash()?;

        let close_tok = self.expect(TokenKind::Close, "Failed to parse partial statement.")?;

        Ok(Stmt::Partial(PartialStatement {
            name,
            params,
            hash,
            strip: strip_between(&open_tok, &close_tok),
            span: open_tok.span,
        }))
    }

    /// Parses the helper name of a close tag; it must be a plain path.
    fn close_name(&mut self) -> Result<PathExpression> {
        let name = self.helper_name()?;
        match name {
            crate::ast::Expr::Path(p) => Ok(p),
            other => Err(Error::parse(
                "Unexpected name in end block: expected a path",
                other.span(),
            )),
        }
    }

    /// Open and close tag names must be textually identical.
    fn match_block_names(
        &self,
        open_path: &crate::ast::Expr,
        close_name: &PathExpression,
    ) -> Result<()> {
        let open_name = open_path.as_path().ok_or_else(|| {
            Error::parse(
                "Unexpected name in open block: expected a path",
                open_path.span(),
            )
        })?;

        if open_name.original != close_name.original {
            return Err(Error::parse(
                format!(
                    "Open and end blocks names mismatch: {} != {}",
                    open_name.original, close_name.original
                ),
                close_name.span,
            ));
        }

        Ok(())
    }
}

/// Copies the outer close tag's strip flags onto every chained block that
/// shares it.
fn propagate_close_strip(inverse: &mut Program, strip: Strip) {
    if !inverse.chained {
        return;
    }

    if let Some(Stmt::Block(block)) = inverse.body.first_mut() {
        block.close_strip = strip;
        if let Some(nested) = block.inverse.as_mut() {
            propagate_close_strip(nested, strip);
        }
    }
}
