/*
 * ==========================================================================
 * HBARS - Templates with Claws!
 * ==========================================================================
 *
 * File:     eval/expressions.rs
 * Purpose:  Expression evaluation: path resolution against the context
 *           stack and data-frame chain, literals, params/hash evaluation
 *           and bottom-up sub-expressions.
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

use crate::ast::{CallExpr, Expr, PathExpression, SubExpression};
use crate::error::{Error, Result};
use crate::eval::helpers::is_builtin;
use crate::eval::Evaluator;
use crate::value::Value;

impl<'t> Evaluator<'t> {
    /// Evaluates any expression to a value.
    pub(crate) fn eval_expr(&mut self, expr: &'t Expr) -> Result<Value> {
        match expr {
            Expr::Path(path) => self.resolve_path(path),
            Expr::StringLit(s) => Ok(Value::Str(s.value.clone())),
            Expr::NumberLit(n) => Ok(Value::Number(n.value)),
            Expr::BoolLit(b) => Ok(Value::Bool(b.value)),
            Expr::SubExpr(s) => self.eval_subexpr(s),
        }
    }

    /// Resolves a path against the context stack (or the private data
    /// frame for `@` paths). A missing key is undefined, not an error;
    /// exceeding the stack depth with `../` is.
    pub(crate) fn resolve_path(&self, path: &PathExpression) -> Result<Value> {
        if path.is_data {
            return Ok(self.data.find(&path.parts));
        }

        if path.depth >= self.ctx.len() {
            return Err(Error::resolution(
                format!(
                    "Path depth {} exceeds context stack of {}: {}",
                    path.depth,
                    self.ctx.len(),
                    path.original
                ),
                path.span,
            ));
        }

        // block parameters shadow the context for local names
        if path.depth == 0 && !path.parts.is_empty() {
            if let Some(bound) = self.lookup_block_param(&path.parts[0]) {
                let mut current = bound;
                for part in &path.parts[1..] {
                    match current.lookup(part) {
                        Some(next) => current = next,
                        None => return Ok(Value::Null),
                    }
                }
                return Ok(current.clone());
            }
        }

        let mut current = &self.ctx[self.ctx.len() - 1 - path.depth];
        for part in &path.parts {
            match current.lookup(part) {
                Some(next) => current = next,
                None => return Ok(Value::Null),
            }
        }

        Ok(current.clone())
    }

    /// Evaluates a mustache-position call: helper invocation when the path
    /// names a helper and either arguments are present or no same-named
    /// field shadows it; plain value resolution otherwise.
    pub(crate) fn eval_call(&mut self, call: &'t CallExpr) -> Result<Value> {
        if let Expr::Path(path) = &call.path {
            if path.is_simple() {
                let name = &path.parts[0];
                let has_args = !call.params.is_empty() || call.hash.is_some();

                if self.tpl.find_helper(name).is_some() || is_builtin(name) {
                    let shadowed = self.current_ctx().lookup(name).is_some()
                        || self.lookup_block_param(name).is_some();

                    if has_args || !shadowed {
                        let name = name.clone();
                        return self.invoke_helper(&name, call, None);
                    }
                }
            }
        }

        self.eval_expr(&call.path)
    }

    /// Sub-expressions are helper calls; an argument-less sub-expression
    /// whose path is not a helper falls back to plain resolution.
    pub(crate) fn eval_subexpr(&mut self, sexpr: &'t SubExpression) -> Result<Value> {
        let call = sexpr.call.as_ref();

        if let Expr::Path(path) = &call.path {
            if path.is_simple() {
                let name = &path.parts[0];

                if self.tpl.find_helper(name).is_some() || is_builtin(name) {
                    let name = name.clone();
                    return self.invoke_helper(&name, call, None);
                }

                if !call.params.is_empty() || call.hash.is_some() {
                    return Err(Error::helper(
                        format!("Helper not found: {}", name),
                        path.span,
                    ));
                }
            }
        }

        self.eval_expr(&call.path)
    }

    /// Evaluates a call's params and hash, sub-expressions first
    /// (bottom-up), preserving order.
    pub(crate) fn eval_call_args(
        &mut self,
        call: &'t CallExpr,
    ) -> Result<(Vec<Value>, Vec<(String, Value)>)> {
        let mut params = Vec::with_capacity(call.params.len());
        for param in &call.params {
            params.push(self.eval_expr(param)?);
        }

        let mut hash = Vec::new();
        if let Some(h) = &call.hash {
            for pair in &h.pairs {
                hash.push((pair.key.clone(), self.eval_expr(&pair.value)?));
            }
        }

        Ok((params, hash))
    }
}
