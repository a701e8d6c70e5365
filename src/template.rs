/*
 * ==========================================================================
 * HBARS - Templates with Claws!
 * ==========================================================================
 *
 * File:     template.rs
 * Purpose:  The `Template` type: a parsed program plus the helper and
 *           partial registries, and the render entry points.
 *
 * Registries are append-only and duplicate names are errors. A fully
 * registered template is safe to share across threads: rendering never
 * mutates it — each render call runs on its own evaluator.
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

use std::collections::HashMap;
use std::rc::Rc;

use log::debug;
use serde::Serialize;

use crate::ast::{self, Program};
use crate::error::{Error, Result};
use crate::eval::data_frame::DataFrame;
use crate::eval::helpers::{Helper, HelperContext};
use crate::eval::Evaluator;
use crate::parser;
use crate::value::{to_value, Value};
use crate::whitespace;

/// A parsed template with its helper and partial registries.
pub struct Template {
    source: String,
    program: Program,
    helpers: HashMap<String, Helper>,
    partials: HashMap<String, Program>,
}

impl std::fmt::Debug for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Template")
            .field("source", &self.source)
            .field("program", &self.program)
            .field("helpers", &self.helpers.keys().collect::<Vec<_>>())
            .field("partials", &self.partials.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Template {
    /// Parses template source: lexing, grammar, then the whitespace-control
    /// pass. The first error aborts; no template is returned.
    pub fn parse(source: impl Into<String>) -> Result<Template> {
        let source = source.into();

        let mut program = parser::parse(&source)?;
        whitespace::process(&mut program);

        debug!(
            "parsed template ({} bytes, {} top-level statements)",
            source.len(),
            program.body.len()
        );

        Ok(Template {
            source,
            program,
            helpers: HashMap::new(),
            partials: HashMap::new(),
        })
    }

    /// The original template source.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Registers a helper. Registering a name twice is an error; built-in
    /// names (`if`, `unless`, `with`, `each`) may be registered once to
    /// shadow the built-in.
    pub fn register_helper<F>(&mut self, name: &str, helper: F) -> Result<()>
    where
        F: Fn(&mut HelperContext<'_, '_>) -> Result<Value> + Send + Sync + 'static,
    {
        if self.helpers.contains_key(name) {
            return Err(Error::registration(format!(
                "Helper already registered: {}",
                name
            )));
        }

        self.helpers.insert(name.to_string(), Box::new(helper));
        Ok(())
    }

    /// Registers several helpers at once.
    pub fn register_helpers<I>(&mut self, helpers: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'static str, Helper)>,
    {
        for (name, helper) in helpers {
            if self.helpers.contains_key(name) {
                return Err(Error::registration(format!(
                    "Helper already registered: {}",
                    name
                )));
            }
            self.helpers.insert(name.to_string(), helper);
        }
        Ok(())
    }

    /// Registers a partial from source; the partial is parsed eagerly so
    /// malformed partials fail here, not at render time. Duplicate names
    /// are errors.
    pub fn register_partial(&mut self, name: &str, source: impl Into<String>) -> Result<()> {
        if self.partials.contains_key(name) {
            return Err(Error::registration(format!(
                "Partial already registered: {}",
                name
            )));
        }

        let mut program = parser::parse(&source.into())?;
        whitespace::process(&mut program);

        self.partials.insert(name.to_string(), program);
        Ok(())
    }

    /// Registers an already-parsed partial program under a name.
    pub fn register_partial_program(&mut self, name: &str, program: Program) -> Result<()> {
        if self.partials.contains_key(name) {
            return Err(Error::registration(format!(
                "Partial already registered: {}",
                name
            )));
        }

        self.partials.insert(name.to_string(), program);
        Ok(())
    }

    /// Registers several partials at once.
    pub fn register_partials<'a, I>(&mut self, partials: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (name, source) in partials {
            self.register_partial(name, source)?;
        }
        Ok(())
    }

    /// Renders the template against any serializable data value.
    pub fn render<T: Serialize>(&self, data: T) -> Result<String> {
        self.render_value(to_value(data)?, None)
    }

    /// Renders with an initial private data frame.
    pub fn render_with_data<T: Serialize>(
        &self,
        data: T,
        frame: Rc<DataFrame>,
    ) -> Result<String> {
        self.render_value(to_value(data)?, Some(frame))
    }

    /// Renders against an already-converted value.
    pub fn render_value(&self, data: Value, frame: Option<Rc<DataFrame>>) -> Result<String> {
        let mut eval = Evaluator::new(self, data, frame);
        eval.render(&self.program)
    }

    /// Textual tree of the parsed program (see [`ast::print`]).
    pub fn print_ast(&self) -> String {
        ast::print(&self.program)
    }

    pub(crate) fn find_helper(&self, name: &str) -> Option<&Helper> {
        self.helpers.get(name)
    }

    pub(crate) fn find_partial(&self, name: &str) -> Option<&Program> {
        self.partials.get(name)
    }
}
