/*
 * ==========================================================================
 * HBARS - Templates with Claws!
 * ==========================================================================
 *
 * hbars is a logic-less template engine implementing Handlebars/Mustache
 * semantics: `{{ }}` value interpolation with HTML escaping, block helpers
 * with inverse sections and `{{else if}}` chains, partials, raw blocks,
 * sub-expressions, and `~` whitespace control with standalone-tag
 * trimming.
 *
 * The pipeline:
 *
 * ```text
 * Source → Lexer → Tokens → Parser → AST → Whitespace Control → Evaluator → String
 * ```
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

//! Logic-less Handlebars templates.
//!
//! ```
//! use hbars::Template;
//!
//! let tpl = Template::parse("Hello, {{name}}!").unwrap();
//! let out = tpl.render(serde_json::json!({ "name": "world" })).unwrap();
//! assert_eq!(out, "Hello, world!");
//! ```
//!
//! Templates carry their own helper and partial registries, so multiple
//! independently configured templates coexist in one process:
//!
//! ```
//! use hbars::{HelperContext, Template, Value};
//!
//! let mut tpl = Template::parse("{{shout greeting}}").unwrap();
//! tpl.register_helper("shout", |h: &mut HelperContext| {
//!     Ok(Value::Str(h.param_str(0).to_uppercase()))
//! })
//! .unwrap();
//!
//! let out = tpl.render(serde_json::json!({ "greeting": "hi" })).unwrap();
//! assert_eq!(out, "HI");
//! ```

pub mod ast;
pub mod diagnostics;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod template;
pub mod value;
pub mod whitespace;

pub use diagnostics::DiagnosticPrinter;
pub use error::{Error, Result};
pub use eval::data_frame::DataFrame;
pub use eval::helpers::{Helper, HelperContext};
pub use span::Span;
pub use template::Template;
pub use value::{escape_html, to_value, Value};

/// Parses template source into a reusable [`Template`].
pub fn parse(source: impl Into<String>) -> Result<Template> {
    Template::parse(source)
}

/// One-shot convenience: parse and render in a single call.
pub fn render<T: serde::Serialize>(source: &str, data: T) -> Result<String> {
    Template::parse(source)?.render(data)
}
