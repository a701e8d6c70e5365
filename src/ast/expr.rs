/*
 * ==========================================================================
 * HBARS - Templates with Claws!
 * ==========================================================================
 *
 * File:     ast/expr.rs
 * Purpose:  Expression nodes: paths, literals, sub-expressions and hashes.
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

use crate::span::Span;

/// An expression inside a tag. Closed set; the evaluator matches
/// exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Path(PathExpression),
    StringLit(StringLiteral),
    NumberLit(NumberLiteral),
    BoolLit(BooleanLiteral),
    SubExpr(SubExpression),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Path(p) => p.span,
            Expr::StringLit(s) => s.span,
            Expr::NumberLit(n) => n.span,
            Expr::BoolLit(b) => b.span,
            Expr::SubExpr(s) => s.span,
        }
    }

    pub fn as_path(&self) -> Option<&PathExpression> {
        match self {
            Expr::Path(p) => Some(p),
            _ => None,
        }
    }
}

/// A dotted/slashed reference into the context stack.
///
/// `depth` counts the leading `../` segments; `parts` holds the remaining
/// segments with the identity segments (`this`, `.`) removed. An empty
/// `parts` with depth 0 is the current context itself. `is_data` marks
/// `@`-prefixed paths, resolved against the private data frame instead of
/// the context stack.
#[derive(Debug, Clone, PartialEq)]
pub struct PathExpression {
    /// The path as written in the source, used for block-name matching and
    /// helper lookup.
    pub original: String,

    /// Number of contexts to pop before the segment walk starts.
    pub depth: usize,

    pub parts: Vec<String>,

    pub is_data: bool,

    pub span: Span,
}

impl PathExpression {
    pub fn new(is_data: bool, span: Span) -> Self {
        Self {
            original: String::new(),
            depth: 0,
            parts: Vec::new(),
            is_data,
            span,
        }
    }

    /// True for a bare single-segment path, the only shape that can name a
    /// helper.
    pub fn is_simple(&self) -> bool {
        self.depth == 0 && !self.is_data && self.parts.len() == 1
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub value: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberLiteral {
    pub value: f64,

    /// Source text, kept for printing.
    pub original: String,

    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanLiteral {
    pub value: bool,
    pub span: Span,
}

/// A parenthesized helper call usable wherever a parameter or hash value
/// is expected. Structurally a mustache call, evaluated to a single value.
#[derive(Debug, Clone, PartialEq)]
pub struct SubExpression {
    pub call: Box<CallExpr>,
    pub span: Span,
}

/// The shared shape of a tag body: a path (or literal) followed by ordered
/// positional params and an optional hash.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub path: Expr,
    pub params: Vec<Expr>,
    pub hash: Option<Hash>,
}

/// Ordered `key=value` pairs; keys are unique (enforced by the parser).
#[derive(Debug, Clone, PartialEq)]
pub struct Hash {
    pub pairs: Vec<HashPair>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HashPair {
    pub key: String,
    pub value: Expr,
    pub span: Span,
}
