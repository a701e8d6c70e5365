/*
 * ==========================================================================
 * HBARS - Templates with Claws!
 * ==========================================================================
 *
 * File:     ast/stmt.rs
 * Purpose:  Statement nodes and programs: the tree the parser builds, the
 *           whitespace pass rewrites and the evaluator walks.
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

use crate::ast::expr::{CallExpr, Expr, Hash};
use crate::span::Span;

/// Explicit `~` strip markers recorded on a tag's delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Strip {
    /// `{{~` — strip whitespace before the tag.
    pub open: bool,

    /// `~}}` — strip whitespace after the tag.
    pub close: bool,
}

impl Strip {
    pub fn new(open: bool, close: bool) -> Self {
        Self { open, close }
    }
}

/// An ordered list of statements. Blocks own one for their body and,
/// optionally, one for their inverse section.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub body: Vec<Stmt>,

    /// Names bound by `as |a b|` on the owning block's open tag.
    pub block_params: Vec<String>,

    /// True when this is the inverse program of an `{{else if …}}` chain:
    /// its body is a single nested block sharing the outer close tag.
    pub chained: bool,

    pub span: Span,
}

impl Program {
    pub fn new(span: Span) -> Self {
        Self {
            span,
            ..Default::default()
        }
    }
}

/// A template statement. Closed set; the evaluator and the whitespace pass
/// match exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Content(ContentStatement),
    Comment(CommentStatement),
    Mustache(MustacheStatement),
    Block(BlockStatement),
    Partial(PartialStatement),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Content(s) => s.span,
            Stmt::Comment(s) => s.span,
            Stmt::Mustache(s) => s.span,
            Stmt::Block(s) => s.span,
            Stmt::Partial(s) => s.span,
        }
    }
}

/// Literal template text. `value` is what renders; `original` keeps the
/// pre-strip text for standalone-line detection. The stripped flags make
/// the whitespace pass idempotent.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentStatement {
    pub value: String,
    pub original: String,
    pub left_stripped: bool,
    pub right_stripped: bool,
    pub span: Span,
}

impl ContentStatement {
    pub fn new(value: impl Into<String>, span: Span) -> Self {
        let value = value.into();
        Self {
            original: value.clone(),
            value,
            left_stripped: false,
            right_stripped: false,
            span,
        }
    }
}

/// `{{! … }}` / `{{!-- … --}}`. Renders nothing; participates in
/// standalone-line trimming.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentStatement {
    pub value: String,
    pub strip: Strip,
    pub span: Span,
}

/// `{{expr}}`, `{{{expr}}}` or `{{&expr}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct MustacheStatement {
    pub call: CallExpr,

    /// False for triple-stache and `&` forms.
    pub escaped: bool,

    pub strip: Strip,
    pub span: Span,
}

/// `{{#name …}} body {{else}} inverse {{/name}}` and the `{{^name}}` and
/// `{{{{name}}}}` variants.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub call: CallExpr,

    pub program: Option<Program>,
    pub inverse: Option<Program>,

    /// Verbatim body; no tag parsing inside, rendered raw.
    pub raw: bool,

    pub open_strip: Strip,
    pub inverse_strip: Strip,
    pub close_strip: Strip,

    pub span: Span,
}

/// `{{> name …}}`. The name may be a path, a literal, or a sub-expression
/// computed at render time.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialStatement {
    pub name: Expr,

    /// An optional explicit context (first param) — further params are
    /// accepted by the grammar but ignored at render time.
    pub params: Vec<Expr>,

    pub hash: Option<Hash>,

    pub strip: Strip,
    pub span: Span,
}
