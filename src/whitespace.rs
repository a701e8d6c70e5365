/*
 * ==========================================================================
 * HBARS - Templates with Claws!
 * ==========================================================================
 *
 * Whitespace Control Pass
 *
 * A post-parse transform over the AST implementing the two stripping
 * mechanisms:
 *
 *  1. Explicit `~` strip markers: a left strip removes all whitespace back
 *     to the previous non-whitespace character; a right strip removes
 *     whitespace through and including the next newline.
 *
 *  2. Implicit standalone-tag trimming: block open/close tags, inverse
 *     tags, partials and comments that sit alone on a line have that
 *     line's surrounding whitespace removed. Plain mustaches never
 *     trigger implicit trimming.
 *
 * The pass mutates adjacent ContentStatement values in place and is
 * idempotent: single-line trims are guarded by the stripped flags on the
 * content nodes, and multi-character strips reach a fixed point after one
 * application.
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

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::{BlockStatement, Program, Stmt, Strip};

// Standalone-line detection. The root variants also accept the very start
// and end of the template as line boundaries.
static PREV_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r?\n\s*?$").unwrap());
static PREV_WS_ROOT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(^|\r?\n)\s*?$").unwrap());
static NEXT_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*?\r?\n").unwrap());
static NEXT_WS_ROOT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*?(\r?\n|$)").unwrap());

// Strip application. The "multiple" variants implement `~`, the others
// trim a single standalone line.
static ALL_LEADING_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s+").unwrap());
static FIRST_LINE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[ \t]*\r?\n?").unwrap());
static ALL_TRAILING_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+$").unwrap());
static LAST_LINE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+$").unwrap());

/// The strip outcome of visiting one statement: the explicit markers plus
/// the statement's standalone candidacy, which the enclosing program
/// confirms against its neighbors.
#[derive(Debug, Clone, Copy, Default)]
struct StripInfo {
    open: bool,
    close: bool,
    open_standalone: bool,
    close_standalone: bool,
    inline_standalone: bool,
}

/// Applies the whitespace-control pass to a parsed program.
pub fn process(program: &mut Program) {
    visit_program(program, true);
}

fn visit_program(program: &mut Program, is_root: bool) {
    for i in 0..program.body.len() {
        let strip = match visit_stmt(&mut program.body[i]) {
            Some(strip) => strip,
            None => continue,
        };

        let prev_ws = is_prev_whitespace(&program.body, Some(i), is_root);
        let next_ws = is_next_whitespace(&program.body, Some(i), is_root);

        let open_standalone = strip.open_standalone && prev_ws;
        let close_standalone = strip.close_standalone && next_ws;
        let inline_standalone = strip.inline_standalone && prev_ws && next_ws;

        if strip.close {
            omit_right(&mut program.body, Some(i), true);
        }
        if strip.open {
            omit_left(&mut program.body, Some(i), true);
        }

        if inline_standalone {
            omit_right(&mut program.body, Some(i), false);
            omit_left(&mut program.body, Some(i), false);
        }

        if open_standalone {
            // trim just inside the block's open tag
            if let Stmt::Block(block) = &mut program.body[i] {
                if let Some(body) = block.program.as_mut().or(block.inverse.as_mut()) {
                    omit_right(&mut body.body, None, false);
                }
            }
            omit_left(&mut program.body, Some(i), false);
        }

        if close_standalone {
            omit_right(&mut program.body, Some(i), false);
            // trim just inside the block's close tag
            if let Stmt::Block(block) = &mut program.body[i] {
                if let Some(body) = block.inverse.as_mut().or(block.program.as_mut()) {
                    omit_left(&mut body.body, None, false);
                }
            }
        }
    }
}

fn visit_stmt(stmt: &mut Stmt) -> Option<StripInfo> {
    match stmt {
        Stmt::Content(_) => None,

        // value interpolation never trims standalone lines
        Stmt::Mustache(m) => Some(StripInfo {
            open: m.strip.open,
            close: m.strip.close,
            ..Default::default()
        }),

        Stmt::Partial(p) => Some(inline_strip(p.strip)),
        Stmt::Comment(c) => Some(inline_strip(c.strip)),

        Stmt::Block(b) => Some(visit_block(b)),
    }
}

fn inline_strip(strip: Strip) -> StripInfo {
    StripInfo {
        open: strip.open,
        close: strip.close,
        inline_standalone: true,
        ..Default::default()
    }
}

fn visit_block(block: &mut BlockStatement) -> StripInfo {
    if block.raw {
        // raw block bodies are verbatim; only the surrounding program sees
        // the tags, and they carry no strip markers
        return StripInfo::default();
    }

    if let Some(program) = block.program.as_mut() {
        visit_program(program, false);
    }
    if let Some(inverse) = block.inverse.as_mut() {
        visit_program(inverse, false);
    }

    let has_both = block.program.is_some() && block.inverse.is_some();

    // standalone candidacy: whether the tags' inner sides are whitespace;
    // the enclosing program checks the outer sides
    let open_standalone;
    let close_standalone;
    {
        let program = block
            .program
            .as_ref()
            .or(block.inverse.as_ref())
            .expect("parser never builds a block without a body");

        open_standalone = is_next_whitespace(&program.body, None, false);

        close_standalone = if has_both {
            match block.inverse.as_ref() {
                Some(inverse) => {
                    is_prev_whitespace(&first_inverse_ref(inverse).body, None, false)
                }
                None => false,
            }
        } else {
            is_prev_whitespace(&program.body, None, false)
        };
    }

    if block.open_strip.close {
        if let Some(program) = block.program.as_mut().or(block.inverse.as_mut()) {
            omit_right(&mut program.body, None, true);
        }
    }

    if has_both {
        let inverse_strip = block.inverse_strip;

        if inverse_strip.open {
            if let Some(program) = block.program.as_mut() {
                omit_left(&mut program.body, None, true);
            }
        }

        if inverse_strip.close {
            if let Some(inverse) = block.inverse.as_mut() {
                with_first_inverse(inverse, |p| omit_right(&mut p.body, None, true));
            }
        }

        if block.close_strip.open {
            if let Some(inverse) = block.inverse.as_mut() {
                with_last_inverse(inverse, |p| omit_left(&mut p.body, None, true));
            }
        }

        // standalone inverse tag: whitespace-only line between body and
        // inverse section
        let prev_ws = block
            .program
            .as_ref()
            .map(|p| is_prev_whitespace(&p.body, None, false))
            .unwrap_or(false);
        let next_ws = block
            .inverse
            .as_ref()
            .map(|inv| is_next_whitespace(&first_inverse_ref(inv).body, None, false))
            .unwrap_or(false);

        if prev_ws && next_ws {
            if let Some(program) = block.program.as_mut() {
                omit_left(&mut program.body, None, false);
            }
            if let Some(inverse) = block.inverse.as_mut() {
                with_first_inverse(inverse, |p| omit_right(&mut p.body, None, false));
            }
        }
    } else if block.close_strip.open {
        if let Some(program) = block.program.as_mut().or(block.inverse.as_mut()) {
            omit_left(&mut program.body, None, true);
        }
    }

    StripInfo {
        open: block.open_strip.open,
        close: block.close_strip.close,
        open_standalone,
        close_standalone,
        inline_standalone: false,
    }
}

/// In an `{{else if …}}` chain the inverse program wraps a nested block;
/// the program adjacent to the inverse delimiter is that block's body.
fn first_inverse_ref(inverse: &Program) -> &Program {
    if inverse.chained {
        if let Some(Stmt::Block(block)) = inverse.body.first() {
            if let Some(program) = block.program.as_ref() {
                return program;
            }
        }
    }
    inverse
}

fn with_first_inverse<R>(inverse: &mut Program, f: impl FnOnce(&mut Program) -> R) -> R {
    if inverse.chained {
        if let Some(Stmt::Block(block)) = inverse.body.first_mut() {
            if let Some(program) = block.program.as_mut() {
                return f(program);
            }
        }
    }
    f(inverse)
}

/// Walks the chain to the last inverse program that shares the outer close
/// tag.
fn with_last_inverse<R>(program: &mut Program, f: impl FnOnce(&mut Program) -> R) -> R {
    if program.chained {
        if let Some(Stmt::Block(block)) = program.body.last_mut() {
            if let Some(inner) = block.program.as_mut() {
                return with_last_inverse(inner, f);
            }
        }
    }
    f(program)
}

/// True when the statement before index `i` ends at a line boundary.
/// `None` checks from the end of the body (inner side of a close tag).
fn is_prev_whitespace(body: &[Stmt], i: Option<usize>, is_root: bool) -> bool {
    let i = i.unwrap_or(body.len());
    if i == 0 {
        return is_root;
    }

    let has_sibling = i >= 2;
    match &body[i - 1] {
        Stmt::Content(content) => {
            let re: &Regex = if has_sibling || !is_root {
                &PREV_WS
            } else {
                &PREV_WS_ROOT
            };
            re.is_match(&content.original)
        }
        _ => false,
    }
}

/// True when the statement after index `i` starts at a line boundary.
/// `None` checks from the start of the body (inner side of an open tag).
fn is_next_whitespace(body: &[Stmt], i: Option<usize>, is_root: bool) -> bool {
    let next_idx = match i {
        Some(i) => i + 1,
        None => 0,
    };
    if next_idx >= body.len() {
        return is_root;
    }

    let has_sibling = next_idx + 1 < body.len();
    match &body[next_idx] {
        Stmt::Content(content) => {
            let re: &Regex = if has_sibling || !is_root {
                &NEXT_WS
            } else {
                &NEXT_WS_ROOT
            };
            re.is_match(&content.original)
        }
        _ => false,
    }
}

/// Strips whitespace from the start of the content following index `i`
/// (`None` = the first statement). `multiple` removes every whitespace
/// character; otherwise a single line ending is consumed, at most once.
fn omit_right(body: &mut [Stmt], i: Option<usize>, multiple: bool) {
    let idx = match i {
        Some(i) => i + 1,
        None => 0,
    };

    let content = match body.get_mut(idx) {
        Some(Stmt::Content(content)) => content,
        _ => return,
    };

    if !multiple && content.right_stripped {
        return;
    }

    let original = content.value.clone();
    let re: &Regex = if multiple { &ALL_LEADING_WS } else { &FIRST_LINE_WS };
    content.value = re.replace(&content.value, "").into_owned();
    if content.value != original {
        content.right_stripped = true;
    }
}

/// Strips whitespace from the end of the content preceding index `i`
/// (`None` = the last statement).
fn omit_left(body: &mut [Stmt], i: Option<usize>, multiple: bool) {
    let idx = match i {
        Some(0) => return,
        Some(i) => i - 1,
        None => match body.len() {
            0 => return,
            len => len - 1,
        },
    };

    let content = match body.get_mut(idx) {
        Some(Stmt::Content(content)) => content,
        _ => return,
    };

    if !multiple && content.left_stripped {
        return;
    }

    let original = content.value.clone();
    let re: &Regex = if multiple { &ALL_TRAILING_WS } else { &LAST_LINE_WS };
    content.value = re.replace(&content.value, "").into_owned();
    if content.value != original {
        content.left_stripped = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Stmt;
    use crate::parser;

    fn processed(source: &str) -> Program {
        let mut program = parser::parse(source).unwrap();
        process(&mut program);
        program
    }

    fn content_at(program: &Program, i: usize) -> &str {
        match &program.body[i] {
            Stmt::Content(c) => &c.value,
            other => panic!("expected content at {}, got {:?}", i, other),
        }
    }

    #[test]
    fn explicit_strip_on_mustache() {
        let program = processed(" x {{~foo~}} y ");
        assert_eq!(content_at(&program, 0), " x");
        assert_eq!(content_at(&program, 2), "y ");
    }

    #[test]
    fn left_strip_stops_at_non_whitespace() {
        let program = processed("a \n\t {{~foo}}");
        assert_eq!(content_at(&program, 0), "a");
    }

    #[test]
    fn right_strip_takes_everything_after() {
        let program = processed("{{foo~}} \n\n b");
        assert_eq!(content_at(&program, 1), "b");
    }

    #[test]
    fn standalone_comment_line_is_trimmed() {
        let program = processed("a\n  {{! note }}  \nb");
        assert_eq!(content_at(&program, 0), "a\n");
        assert_eq!(content_at(&program, 2), "b");
    }

    #[test]
    fn standalone_block_tags_are_trimmed() {
        let program = processed("a\n{{#if x}}\nb\n{{/if}}\nc");
        match &program.body[1] {
            Stmt::Block(block) => {
                let body = block.program.as_ref().unwrap();
                assert_eq!(
                    body.body,
                    vec![Stmt::Content(crate::ast::ContentStatement {
                        value: "b\n".into(),
                        original: "\nb\n".into(),
                        left_stripped: false,
                        right_stripped: true,
                        span: body.body[0].span(),
                    })]
                );
            }
            other => panic!("expected block, got {:?}", other),
        }
        assert_eq!(content_at(&program, 0), "a\n");
        assert_eq!(content_at(&program, 2), "c");
    }

    #[test]
    fn plain_mustache_is_never_standalone() {
        let program = processed("a\n  {{foo}}  \nb");
        assert_eq!(content_at(&program, 0), "a\n  ");
        assert_eq!(content_at(&program, 2), "  \nb");
    }

    #[test]
    fn pass_is_idempotent() {
        let source = " \n\n{{~#if foo~}} \n\nbar \n\n{{~/if~}}\n\na\n{{! c }}\nb";
        let mut once = parser::parse(source).unwrap();
        process(&mut once);

        let mut twice = parser::parse(source).unwrap();
        process(&mut twice);
        process(&mut twice);

        assert_eq!(once, twice);
    }
}
