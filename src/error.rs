/*
 * ==========================================================================
 * HBARS - Templates with Claws!
 * ==========================================================================
 *
 * File:     error.rs
 * Purpose:  The single structured error type surfaced by every fallible
 *           operation: lexing, parsing, registration and rendering.
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

use std::fmt;

use crate::span::Span;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone)]
pub struct Error {
    /// Stable error code (E_LEX, E_PARSE, …)
    pub code: &'static str,

    /// Human-readable error message
    pub message: String,

    /// Primary source location
    pub span: Span,

    /// Optional note / help text
    pub help: Option<String>,
}

impl Error {
    /// Generic constructor
    pub fn new(code: &'static str, message: impl Into<String>, span: Span) -> Self {
        Self {
            code,
            message: message.into(),
            span,
            help: None,
        }
    }

    /// Lexer error (unterminated string/comment/expression, bad character)
    pub fn lex(message: impl Into<String>, span: Span) -> Self {
        Self::new("E_LEX", message, span)
    }

    /// Parser error (unexpected token, block name mismatch, …)
    pub fn parse(message: impl Into<String>, span: Span) -> Self {
        Self::new("E_PARSE", message, span)
    }

    /// Path resolution error (`../` depth exceeds the context stack)
    pub fn resolution(message: impl Into<String>, span: Span) -> Self {
        Self::new("E_RESOLUTION", message, span)
    }

    /// Helper invocation error
    pub fn helper(message: impl Into<String>, span: Span) -> Self {
        Self::new("E_HELPER", message, span)
    }

    /// Partial error (unregistered name, recursion limit)
    pub fn partial(message: impl Into<String>, span: Span) -> Self {
        Self::new("E_PARTIAL", message, span)
    }

    /// Registration error (duplicate helper or partial name)
    pub fn registration(message: impl Into<String>) -> Self {
        Self::new("E_REGISTRATION", message, Span::default())
    }

    /// Input data error (value refused serialization to the render model)
    pub fn data(message: impl Into<String>) -> Self {
        Self::new("E_DATA", message, Span::default())
    }

    /// Attach a help message to the error (builder-style).
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// True for errors produced before any rendering starts.
    pub fn is_parse_error(&self) -> bool {
        matches!(self.code, "E_LEX" | "E_PARSE")
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} at {}", self.code, self.message, self.span)?;
        if let Some(help) = &self.help {
            write!(f, " ({})", help)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}
