/*
 * ==========================================================================
 * HBARS - Templates with Claws!
 * ==========================================================================
 *
 * File:     eval/helpers.rs
 * Purpose:  The helper call context handed to helper functions, helper
 *           dispatch, and the built-in `if` / `unless` / `with` / `each`
 *           helpers.
 *
 * Built-ins are evaluator fallbacks, not registry entries: a user helper
 * registered under the same name shadows them.
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

use crate::ast::{BlockStatement, CallExpr};
use crate::error::{Error, Result};
use crate::eval::{Evaluator, NULL_VALUE};
use crate::span::Span;
use crate::value::Value;

/// A helper function. Receives the resolved positional params, the ordered
/// hash, and callable handles into the evaluator; returns the value to
/// substitute at the call site (`Value::Safe` to bypass escaping).
pub type Helper = Box<dyn Fn(&mut HelperContext<'_, '_>) -> Result<Value> + Send + Sync>;

/// True for names handled by the evaluator when no user helper is
/// registered under them.
pub(crate) fn is_builtin(name: &str) -> bool {
    matches!(name, "if" | "unless" | "with" | "each")
}

/// The call context passed to helpers: ordered resolved parameters, the
/// ordered hash, and — for block helpers — handles to render the body and
/// inverse sections, push/pop the context, and read/write private data.
pub struct HelperContext<'r, 't> {
    pub(crate) eval: &'r mut Evaluator<'t>,
    pub(crate) params: Vec<Value>,
    pub(crate) hash: Vec<(String, Value)>,
    pub(crate) block: Option<&'t BlockStatement>,
    pub(crate) span: Span,
}

impl<'r, 't> HelperContext<'r, 't> {
    /// All positional parameters.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Parameter at `i`; missing positions are undefined.
    pub fn param(&self, i: usize) -> &Value {
        self.params.get(i).unwrap_or(&NULL_VALUE)
    }

    /// Stringified parameter at `i`.
    pub fn param_str(&self, i: usize) -> String {
        self.param(i).stringify()
    }

    /// Hash option by name; missing names are undefined.
    pub fn option(&self, name: &str) -> &Value {
        self.hash
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
            .unwrap_or(&NULL_VALUE)
    }

    /// The ordered hash.
    pub fn hash(&self) -> &[(String, Value)] {
        &self.hash
    }

    /// Source position of the call.
    pub fn span(&self) -> Span {
        self.span
    }

    /// The current context value.
    pub fn current(&self) -> &Value {
        self.eval.current_ctx()
    }

    /// Truthiness of the first parameter.
    pub fn truthy_first(&self) -> bool {
        self.param(0).is_truthy()
    }

    /// True when the `includeZero` option is set and the first parameter
    /// is the number zero.
    pub fn is_includable_zero(&self) -> bool {
        self.option("includeZero") == &Value::Bool(true)
            && self.param(0) == &Value::Number(0.0)
    }

    /// Reads a private data value (`@name`) from the current frame.
    pub fn data(&self, name: &str) -> Value {
        self.eval.data.get(name)
    }

    /// Writes a private data value onto the current frame.
    pub fn set_data(&self, name: &str, value: Value) {
        self.eval.data.set(name, value);
    }

    /// Pushes a context for subsequent body renders.
    pub fn push_ctx(&mut self, value: Value) {
        self.eval.ctx.push(value);
    }

    /// Pops the innermost context.
    pub fn pop_ctx(&mut self) -> Option<Value> {
        if self.eval.ctx.len() > 1 {
            self.eval.ctx.pop()
        } else {
            None
        }
    }

    /// Renders the block body in the current context.
    pub fn render_block(&mut self) -> Result<String> {
        self.render_block_with(None, &[])
    }

    /// Renders the block body, optionally rebinding the context, with the
    /// block parameters (`as |a b|`) bound to `params`.
    pub fn render_block_with(&mut self, ctx: Option<Value>, params: &[Value]) -> Result<String> {
        let program = match self.block.and_then(|b| b.program.as_ref()) {
            Some(program) => program,
            None => return Ok(String::new()),
        };

        self.eval.render_program_bound(program, ctx, params)
    }

    /// Renders the inverse section in the current context.
    pub fn render_inverse(&mut self) -> Result<String> {
        let inverse = match self.block.and_then(|b| b.inverse.as_ref()) {
            Some(inverse) => inverse,
            None => return Ok(String::new()),
        };

        self.eval.render_program_bound(inverse, None, &[])
    }
}

impl<'t> Evaluator<'t> {
    /// Resolves `name` to a user helper or built-in and invokes it with the
    /// evaluated arguments. `block` is present for block statements.
    pub(crate) fn invoke_helper(
        &mut self,
        name: &str,
        call: &'t CallExpr,
        block: Option<&'t BlockStatement>,
    ) -> Result<Value> {
        let (params, hash) = self.eval_call_args(call)?;
        let span = call.path.span();
        let tpl = self.tpl;

        let mut ctx = HelperContext {
            eval: self,
            params,
            hash,
            block,
            span,
        };

        if let Some(helper) = tpl.find_helper(name) {
            return helper(&mut ctx);
        }

        match name {
            "if" => if_helper(&mut ctx),
            "unless" => unless_helper(&mut ctx),
            "with" => with_helper(&mut ctx),
            "each" => each_helper(&mut ctx),
            _ => Err(Error::helper(format!("Helper not found: {}", name), span)),
        }
    }
}

//
// Built-in helpers
//

fn if_helper(h: &mut HelperContext) -> Result<Value> {
    let rendered = if h.is_includable_zero() || h.truthy_first() {
        h.render_block()?
    } else {
        h.render_inverse()?
    };

    Ok(Value::Safe(rendered))
}

fn unless_helper(h: &mut HelperContext) -> Result<Value> {
    let rendered = if h.is_includable_zero() || h.truthy_first() {
        h.render_inverse()?
    } else {
        h.render_block()?
    };

    Ok(Value::Safe(rendered))
}

fn with_helper(h: &mut HelperContext) -> Result<Value> {
    let rendered = if h.truthy_first() {
        let value = h.param(0).clone();
        h.render_block_with(Some(value.clone()), &[value])?
    } else {
        h.render_inverse()?
    };

    Ok(Value::Safe(rendered))
}

/// Iterates a sequence or keyed map, rebinding the context to each element
/// and setting `@index` / `@key` / `@first` / `@last` per iteration. Block
/// parameters bind to `|value key|`. Falsy or non-iterable input renders
/// the inverse.
fn each_helper(h: &mut HelperContext) -> Result<Value> {
    if !h.truthy_first() {
        return Ok(Value::Safe(h.render_inverse()?));
    }

    let mut out = String::new();

    match h.param(0).clone() {
        Value::Array(items) => {
            let len = items.len();
            for (i, item) in items.into_iter().enumerate() {
                let key = Value::Number(i as f64);
                iterate_once(h, &mut out, len, i, item, key)?;
            }
        }
        Value::Object(fields) => {
            let len = fields.len();
            for (i, (key, item)) in fields.into_iter().enumerate() {
                iterate_once(h, &mut out, len, i, item, Value::Str(key))?;
            }
        }
        _ => return Ok(Value::Safe(h.render_inverse()?)),
    }

    Ok(Value::Safe(out))
}

fn iterate_once(
    h: &mut HelperContext,
    out: &mut String,
    len: usize,
    index: usize,
    item: Value,
    key: Value,
) -> Result<()> {
    let frame = h.eval.data.iter_frame(len, index, key.clone());
    let saved = mem::replace(&mut h.eval.data, frame);

    let result = h.render_block_with(Some(item.clone()), &[item, key]);

    h.eval.data = saved;
    out.push_str(&result?);

    Ok(())
}
