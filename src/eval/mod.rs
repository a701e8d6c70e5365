/*
 * ==========================================================================
 * HBARS - Templates with Claws!
 * ==========================================================================
 *
 * Evaluator Entry & Render State
 * ------------------------------
 * This module is the runtime entry point of the engine. It owns the
 * per-render state:
 *
 *  - the context stack (`this`-bindings, innermost last)
 *  - the private data-frame chain (`@index`, `@key`, …)
 *  - block-parameter scopes bound by `as |a b|`
 *  - the partial recursion guard
 *
 * All actual evaluation logic is delegated to the submodules:
 *
 *  - statements.rs  → statement rendering (content, mustache, block, partial)
 *  - expressions.rs → expression evaluation and path resolution
 *  - helpers.rs     → helper call context and the built-in helpers
 *  - data_frame.rs  → private data frames
 *
 * An `Evaluator` lives for exactly one render call; on error the render
 * aborts and the caller only ever sees the error, never partial output.
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

pub mod data_frame;
pub mod expressions;
pub mod helpers;
pub mod statements;

use std::rc::Rc;

use log::trace;

use crate::ast::Program;
use crate::error::Result;
use crate::eval::data_frame::DataFrame;
use crate::template::Template;
use crate::value::Value;

/// Nested partial renders beyond this depth abort with an `E_PARTIAL`
/// error; cyclic partial references are not detected any other way.
pub(crate) const MAX_PARTIAL_DEPTH: usize = 128;

pub(crate) static NULL_VALUE: Value = Value::Null;

/// The tree-walking evaluator. Created per render call and discarded
/// afterwards; owns no state that outlives the call.
pub struct Evaluator<'t> {
    pub(crate) tpl: &'t Template,

    /// Context stack, innermost last. Never empty: the render input is the
    /// root context.
    pub(crate) ctx: Vec<Value>,

    /// Current private data frame.
    pub(crate) data: Rc<DataFrame>,

    /// Block-parameter scopes, innermost last.
    pub(crate) block_params: Vec<Vec<(String, Value)>>,

    pub(crate) partial_depth: usize,
}

impl<'t> Evaluator<'t> {
    pub(crate) fn new(tpl: &'t Template, data: Value, frame: Option<Rc<DataFrame>>) -> Self {
        Self {
            tpl,
            ctx: vec![data],
            data: frame.unwrap_or_else(DataFrame::new),
            block_params: Vec::new(),
            partial_depth: 0,
        }
    }

    /// Renders a full program into a fresh output buffer.
    pub(crate) fn render(&mut self, program: &'t Program) -> Result<String> {
        trace!("render: {} top-level statements", program.body.len());

        let mut out = String::new();
        self.render_program(program, &mut out)?;
        Ok(out)
    }

    /// Renders a program into `out`.
    pub(crate) fn render_program(&mut self, program: &'t Program, out: &mut String) -> Result<()> {
        for stmt in &program.body {
            self.render_stmt(stmt, out)?;
        }
        Ok(())
    }

    /// Renders a program with an optional context push and the program's
    /// block parameters bound to `params`, returning the produced text.
    pub(crate) fn render_program_bound(
        &mut self,
        program: &'t Program,
        ctx: Option<Value>,
        params: &[Value],
    ) -> Result<String> {
        let pushed = ctx.is_some();
        if let Some(value) = ctx {
            self.ctx.push(value);
        }

        let bindings: Vec<(String, Value)> = program
            .block_params
            .iter()
            .cloned()
            .zip(params.iter().cloned())
            .collect();
        self.block_params.push(bindings);

        let mut out = String::new();
        let result = self.render_program(program, &mut out);

        self.block_params.pop();
        if pushed {
            self.ctx.pop();
        }

        result.map(|_| out)
    }

    /// The innermost context.
    pub(crate) fn current_ctx(&self) -> &Value {
        self.ctx.last().unwrap_or(&NULL_VALUE)
    }

    /// Finds a block-parameter binding, innermost scope first.
    pub(crate) fn lookup_block_param(&self, name: &str) -> Option<&Value> {
        for scope in self.block_params.iter().rev() {
            for (bound, value) in scope {
                if bound == name {
                    return Some(value);
                }
            }
        }
        None
    }
}
