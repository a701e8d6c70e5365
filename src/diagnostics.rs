/*
 * ==========================================================================
 * HBARS - Templates with Claws!
 * ==========================================================================
 *
 * File:     diagnostics.rs
 * Purpose:  Compiler-style rendering of template errors against their
 *           source, with a caret pointing at the failing position.
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

use std::fmt::Write;

use crate::error::Error;
use crate::span::Span;

/// Renders human-friendly diagnostics for template errors.
///
/// The output is intentionally inspired by `rustc` diagnostics, but
/// simplified and designed to remain readable without color:
///
/// ```text
/// error[E_PARSE]: Open and end blocks names mismatch: foo != bar
///   --> greeting.hbs:1:12
///    |
///  1 | {{#foo}}x{{/bar}}
///    |            ^
/// ```
pub struct DiagnosticPrinter {
    source: String,
    name: String,
}

impl DiagnosticPrinter {
    /// Creates a printer for a template source. `name` is only used for
    /// display (e.g. a file name or a registry key).
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Formats an error diagnostic as a string.
    pub fn format(&self, error: &Error) -> String {
        let Span { line, column } = error.span;

        let lines: Vec<&str> = self.source.lines().collect();
        let src_line = lines.get(line.saturating_sub(1)).unwrap_or(&"");

        let mut out = String::new();

        let _ = writeln!(
            out,
            "error[{}]: {}\n  --> {}:{}:{}",
            error.code,
            error.message,
            self.name,
            line,
            column + 1
        );

        let _ = writeln!(out, "   |");
        let _ = writeln!(out, "{:>3} | {}", line, src_line);

        let mut underline = String::new();
        for _ in 0..column {
            underline.push(' ');
        }
        underline.push('^');
        let _ = writeln!(out, "   | {}", underline);

        if let Some(help) = &error.help {
            let _ = writeln!(out, "\nhelp: {}", help);
        }

        out
    }

    /// Prints an error diagnostic to stderr.
    pub fn print(&self, error: &Error) {
        eprint!("{}", self.format(error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_at_the_failing_column() {
        let source = "{{#foo}}x{{/bar}}";
        let err = crate::Template::parse(source).unwrap_err();

        let printer = DiagnosticPrinter::new("greeting.hbs", source);
        let out = printer.format(&err);

        assert!(out.starts_with("error[E_PARSE]"));
        assert!(out.contains("--> greeting.hbs:1:"));
        assert!(out.contains("{{#foo}}x{{/bar}}"));
        assert!(out.contains('^'));
    }
}
