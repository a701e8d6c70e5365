/*
 * ==========================================================================
 * HBARS - Templates with Claws!
 * ==========================================================================
 *
 * File:     eval/statements.rs
 * Purpose:  Statement rendering: content, comments, mustaches with output
 *           escaping, blocks with helper/value fallback semantics, and
 *           partial inclusion.
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

use std::mem;

use log::trace;

use crate::ast::{BlockStatement, Expr, MustacheStatement, PartialStatement, Stmt};
use crate::error::{Error, Result};
use crate::eval::helpers::is_builtin;
use crate::eval::{Evaluator, MAX_PARTIAL_DEPTH};
use crate::value::{escape_html, Value};

impl<'t> Evaluator<'t> {
    pub(crate) fn render_stmt(&mut self, stmt: &'t Stmt, out: &mut String) -> Result<()> {
        match stmt {
            Stmt::Content(content) => {
                out.push_str(&content.value);
                Ok(())
            }
            Stmt::Comment(_) => Ok(()),
            Stmt::Mustache(mustache) => self.render_mustache(mustache, out),
            Stmt::Block(block) => self.render_block(block, out),
            Stmt::Partial(partial) => self.render_partial(partial, out),
        }
    }

    /// Evaluates a mustache and writes the stringified result,
    /// HTML-escaped unless the statement is unescaped or the value is a
    /// safe string.
    fn render_mustache(&mut self, mustache: &'t MustacheStatement, out: &mut String) -> Result<()> {
        let value = self.eval_call(&mustache.call)?;

        match &value {
            Value::Safe(text) => out.push_str(text),
            _ if mustache.escaped => out.push_str(&escape_html(&value.stringify())),
            _ => out.push_str(&value.stringify()),
        }

        Ok(())
    }

    /// Renders a block statement. A registered helper (or built-in) takes
    /// the call; otherwise the path's value drives the default block
    /// behavior: iterate sequences, rebind the context when truthy, render
    /// the inverse when falsy.
    fn render_block(&mut self, block: &'t BlockStatement, out: &mut String) -> Result<()> {
        if let Expr::Path(path) = &block.call.path {
            if path.is_simple() {
                let name = &path.parts[0];
                if self.tpl.find_helper(name).is_some() || is_builtin(name) {
                    let name = name.clone();
                    let value = self.invoke_helper(&name, &block.call, Some(block))?;
                    // block output is written raw
                    out.push_str(&value.stringify());
                    return Ok(());
                }
            }
        }

        let value = self.eval_expr(&block.call.path)?;

        // a raw block with nothing to dispatch on keeps its body verbatim
        if block.raw && value == Value::Null {
            if let Some(program) = &block.program {
                self.render_program(program, out)?;
            }
            return Ok(());
        }

        if !value.is_truthy() {
            if let Some(inverse) = &block.inverse {
                self.render_program(inverse, out)?;
            }
            return Ok(());
        }

        match value {
            Value::Array(items) => {
                let len = items.len();
                for (i, item) in items.into_iter().enumerate() {
                    let key = Value::Number(i as f64);
                    let frame = self.data.iter_frame(len, i, key.clone());
                    let saved = mem::replace(&mut self.data, frame);

                    let result = match &block.program {
                        Some(program) => {
                            self.render_program_bound(program, Some(item.clone()), &[item, key])
                        }
                        None => Ok(String::new()),
                    };

                    self.data = saved;
                    out.push_str(&result?);
                }
            }
            other => {
                if let Some(program) = &block.program {
                    let rendered =
                        self.render_program_bound(program, Some(other.clone()), &[other])?;
                    out.push_str(&rendered);
                }
            }
        }

        Ok(())
    }

    /// Renders a partial: resolves the (possibly computed) name in the
    /// partial registry — an unknown name is a hard error — then renders
    /// it recursively with either the current or an explicit context. Hash
    /// entries are merged onto a copy of the current data frame.
    fn render_partial(&mut self, partial: &'t PartialStatement, out: &mut String) -> Result<()> {
        self.partial_depth += 1;
        let result = self.render_partial_guarded(partial, out);
        self.partial_depth -= 1;
        result
    }

    fn render_partial_guarded(
        &mut self,
        partial: &'t PartialStatement,
        out: &mut String,
    ) -> Result<()> {
        if self.partial_depth > MAX_PARTIAL_DEPTH {
            return Err(Error::partial(
                format!("Partial recursion limit ({}) exceeded", MAX_PARTIAL_DEPTH),
                partial.span,
            ));
        }

        let name = self.partial_name(partial)?;
        trace!("partial: {} (depth {})", name, self.partial_depth);

        let tpl = self.tpl;
        let program = tpl.find_partial(&name).ok_or_else(|| {
            Error::partial(format!("Partial not found: {}", name), partial.span)
        })?;

        // explicit context parameter
        let pushed = match partial.params.first() {
            Some(ctx_expr) => {
                let value = self.eval_expr(ctx_expr)?;
                self.ctx.push(value);
                true
            }
            None => false,
        };

        // hash entries ride in on a copy of the current data frame
        let saved_frame = match &partial.hash {
            Some(hash) => {
                let mut pairs = Vec::with_capacity(hash.pairs.len());
                for pair in &hash.pairs {
                    pairs.push((pair.key.clone(), self.eval_expr(&pair.value)?));
                }

                let frame = self.data.copy();
                for (key, value) in pairs {
                    frame.set(key, value);
                }
                Some(mem::replace(&mut self.data, frame))
            }
            None => None,
        };

        let result = self.render_program(program, out);

        if let Some(saved) = saved_frame {
            self.data = saved;
        }
        if pushed {
            self.ctx.pop();
        }

        result
    }

    /// Resolves the partial's name: paths and literals by their source
    /// text, sub-expressions by evaluation.
    fn partial_name(&mut self, partial: &'t PartialStatement) -> Result<String> {
        match &partial.name {
            Expr::Path(path) => Ok(path.original.clone()),
            Expr::StringLit(s) => Ok(s.value.clone()),
            Expr::NumberLit(n) => Ok(n.original.clone()),
            Expr::BoolLit(b) => Ok(b.value.to_string()),
            Expr::SubExpr(sexpr) => {
                let value = self.eval_subexpr(sexpr)?;
                Ok(value.stringify())
            }
        }
    }
}
