/*
 * ==========================================================================
 * HBARS - Templates with Claws!
 * ==========================================================================
 *
 * File:     ast/mod.rs
 * Purpose:  Root module for the abstract syntax tree.
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

/// Expression nodes: paths, literals, sub-expressions, hashes.
pub mod expr;

/// Debug tree printer.
pub mod print;

/// Statement nodes and programs.
pub mod stmt;

pub use expr::{
    BooleanLiteral, CallExpr, Expr, Hash, HashPair, NumberLiteral, PathExpression, StringLiteral,
    SubExpression,
};
pub use print::print;
pub use stmt::{
    BlockStatement, CommentStatement, ContentStatement, MustacheStatement, PartialStatement,
    Program, Stmt, Strip,
};
