/*
 * ==========================================================================
 * HBARS - Templates with Claws!
 * ==========================================================================
 *
 * File:     ast/print.rs
 * Purpose:  Debug printer for parsed programs. The format is stable and is
 *           what the parser tests assert against.
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
use crate::ast::stmt::{BlockStatement, Program, Stmt};

/// Renders a program as an indented textual tree, one statement per line.
pub fn print(program: &Program) -> String {
    let mut printer = Printer {
        out: String::new(),
        depth: 0,
    };
    printer.program(program);
    printer.out
}

struct Printer {
    out: String,
    depth: usize,
}

impl Printer {
    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
    }

    fn line(&mut self, text: &str) {
        self.indent();
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn program(&mut self, program: &Program) {
        if !program.block_params.is_empty() {
            self.line(&format!(
                "BLOCK PARAMS: [ {} ]",
                program.block_params.join(" ")
            ));
        }

        for stmt in &program.body {
            self.stmt(stmt);
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Content(c) => self.line(&format!("CONTENT[ '{}' ]", c.value)),
            Stmt::Comment(c) => self.line(&format!("{{{{! '{}' }}}}", c.value)),
            Stmt::Mustache(m) => {
                let call = self.call(&m.call);
                self.line(&format!("{{{{ {} }}}}", call));
            }
            Stmt::Block(b) => self.block(b),
            Stmt::Partial(p) => {
                let mut text = format!("{{{{> PARTIAL:{}", partial_name(&p.name));
                if let Some(context) = p.params.first() {
                    text.push(' ');
                    text.push_str(&self.expr(context));
                }
                if let Some(hash) = &p.hash {
                    text.push(' ');
                    text.push_str(&self.hash(hash));
                }
                text.push_str(" }}");
                self.line(&text);
            }
        }
    }

    fn block(&mut self, block: &BlockStatement) {
        self.line("BLOCK:");

        self.depth += 1;
        let call = self.call(&block.call);
        self.line(&call);

        if let Some(program) = &block.program {
            self.line("PROGRAM:");
            self.depth += 1;
            self.program(program);
            self.depth -= 1;
        }

        if let Some(inverse) = &block.inverse {
            self.line("{{^}}");
            self.depth += 1;
            self.program(inverse);
            self.depth -= 1;
        }

        self.depth -= 1;
    }

    fn call(&mut self, call: &CallExpr) -> String {
        let mut text = self.expr(&call.path);

        let params: Vec<String> = call.params.iter().map(|p| self.expr(p)).collect();
        text.push_str(&format!(" [{}]", params.join(", ")));

        if let Some(hash) = &call.hash {
            text.push(' ');
            text.push_str(&self.hash(hash));
        }

        text
    }

    fn hash(&mut self, hash: &Hash) -> String {
        let pairs: Vec<String> = hash
            .pairs
            .iter()
            .map(|p| format!("{}={}", p.key, self.expr(&p.value)))
            .collect();
        format!("HASH{{{}}}", pairs.join(", "))
    }

    fn expr(&mut self, expr: &Expr) -> String {
        match expr {
            Expr::Path(p) => {
                let data = if p.is_data { "@" } else { "" };
                format!("{}PATH:{}", data, p.parts.join("/"))
            }
            Expr::StringLit(s) => format!("\"{}\"", s.value),
            Expr::NumberLit(n) => format!("NUMBER{{{}}}", n.original),
            Expr::BoolLit(b) => format!("BOOLEAN{{{}}}", b.value),
            Expr::SubExpr(s) => {
                let call = self.call(&s.call);
                format!("({})", call)
            }
        }
    }
}

/// Partial names print as written: a path keeps its original text, literals
/// print bare.
fn partial_name(name: &Expr) -> String {
    match name {
        Expr::Path(p) => p.original.clone(),
        Expr::StringLit(s) => s.value.clone(),
        Expr::NumberLit(n) => n.original.clone(),
        Expr::BoolLit(b) => b.value.to_string(),
        Expr::SubExpr(_) => "(dynamic)".to_string(),
    }
}
