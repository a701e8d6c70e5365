/*
 * ==========================================================================
 * HBARS - Templates with Claws!
 * ==========================================================================
 *
 * File:     parser/mod.rs
 * Purpose:  Root module for the recursive-descent template parser.
 *
 * This module wires together all parser sub-modules, including:
 *   - Core parser control logic
 *   - Statement parsing
 *   - Expression parsing
 *   - Shared helper utilities
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

/// Core parser orchestration:
/// - Owns the `Parser` struct
/// - Exposes the main `parse(source)` entry point
pub mod parser;

/// Statement-level parsing:
/// - content / comments / mustaches
/// - blocks, inverse chains, raw blocks
/// - partials
pub mod statements;

/// Expression-level parsing:
/// - helper names, params, hashes
/// - paths and `../` depth
/// - sub-expressions and block params
pub mod expressions;

/// Shared parser helpers:
/// - token matching and lookahead
/// - required-token consumption
/// - strip-flag extraction
pub mod helpers;

/// Re-export the public parse entry point so callers can use:
/// `crate::parser::parse(...)`
pub use parser::parse;
