/*
 * ==========================================================================
 * HBARS - Templates with Claws!
 * ==========================================================================
 *
 * File:      token.rs
 * Purpose:   Defines the lexical token types produced while scanning a
 *            template source string.
 *
 * License:
 * This file is part of the hbars template engine.
 *
 * hbars is dual-licensed under the terms of:
 *   - The MIT License
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

use crate::span::Span;
use std::fmt;

/// The category of a lexical token.
///
/// Delimiter tokens keep their raw text (including `~` strip markers and the
/// `&` unescape marker) in the token lexeme, so the parser can read strip
/// flags straight off the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Literal template text outside any tag.
    Content,

    /// A whole comment tag: `{{! … }}` or `{{!-- … --}}`.
    Comment,

    /// `{{` or `{{&`, with an optional `~` after the braces.
    Open,

    /// `}}` or `~}}`.
    Close,

    /// `{{{` or `{{~{`.
    OpenUnescaped,

    /// `}}}` or `}~}}`.
    CloseUnescaped,

    /// `{{#` (block open).
    OpenBlock,

    /// `{{/` (block close).
    OpenEndBlock,

    /// `{{{{` (raw block open).
    OpenRawBlock,

    /// `}}}}`.
    CloseRawBlock,

    /// `{{{{/` (raw block end tag open).
    OpenEndRawBlock,

    /// `{{>`.
    OpenPartial,

    /// A whole inverse tag: `{{^}}` or `{{else}}`.
    Inverse,

    /// `{{^` followed by an expression.
    OpenInverse,

    /// `{{else` followed by an expression (chained inverse).
    OpenInverseChain,

    /// `(` inside an expression.
    OpenSexpr,

    /// `)` inside an expression.
    CloseSexpr,

    /// `=` between a hash key and its value.
    Equals,

    /// `@` data prefix.
    Data,

    /// `.` or `/` path separator.
    Sep,

    /// `as |` opening a block-parameter list.
    OpenBlockParams,

    /// `|` closing a block-parameter list.
    CloseBlockParams,

    /// A path segment / identifier (including the `.` and `..` segments).
    Id,

    /// A quoted string literal; the lexeme holds the unescaped value.
    Str,

    /// A numeric literal.
    Number,

    /// `true` or `false`.
    Boolean,

    /// Terminal scan error; the lexeme holds the message.
    Error,

    /// End of input.
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A single lexical token.
#[derive(Debug, Clone)]
pub struct Token {
    /// The classified category of the token.
    pub kind: TokenKind,

    /// The source text (or cooked value, for strings) of the token.
    pub lexeme: String,

    /// Position of the token's first character.
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }

    /// True if the raw delimiter text carries a `~` strip marker.
    pub fn has_strip_marker(&self) -> bool {
        self.lexeme.contains('~')
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of template"),
            TokenKind::Error => write!(f, "{}", self.lexeme),
            _ => write!(f, "'{}'", self.lexeme),
        }
    }
}
