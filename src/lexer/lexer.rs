/*
 * ==========================================================================
 * HBARS - Templates with Claws!
 * ==========================================================================
 *
 * Multi-Mode Template Lexer
 *
 * This file defines the scanner that turns raw template text into a stream
 * of tokens. The lexer runs a small mode machine:
 *
 *  - content mode     → literal text, watching for `{{` and `\{{`
 *  - tag-open mode    → classifies which `{{` variant starts the tag
 *  - expression mode  → identifiers, literals, separators, sub-expressions
 *  - comment mode     → `{{! … }}` and `{{!-- … --}}`
 *  - raw mode         → verbatim text between `{{{{name}}}}` and `{{{{/`
 *
 * Tokens are produced strictly in source order, one per `next_token()`
 * call. A scan failure emits a terminal `Error` token and the lexer stops.
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

use crate::lexer::token::{Token, TokenKind};
use crate::span::Span;

// Tag recognition, most specific first. The optional `~` is the strip
// marker; it stays in the token lexeme for the parser to pick up.
static OPEN_RAW: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\{\{\{\{").unwrap());
static OPEN_UNESCAPED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\{\{~?\{").unwrap());
static OPEN_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\{\{~?#").unwrap());
static OPEN_END_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\{\{~?/").unwrap());
static OPEN_PARTIAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\{\{~?>").unwrap());
// {{^}} or {{else}}
static INVERSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\{\{~?\^\s*~?\}\}|\{\{~?\s*else\s*~?\}\})").unwrap());
static OPEN_INVERSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\{\{~?\^").unwrap());
static OPEN_INVERSE_CHAIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\{\{~?\s*else").unwrap());
// {{ or {{&
static OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\{\{~?&?").unwrap());

static CLOSE_RAW: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\}\}\}\}").unwrap());
static CLOSE_UNESCAPED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\}~?\}\}").unwrap());
static CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^~?\}\}").unwrap());

static OPEN_BLOCK_PARAMS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^as\s+\|").unwrap());

// {{!-- ... --}}
static OPEN_COMMENT_DASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\{\{~?!--").unwrap());
static CLOSE_COMMENT_DASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*--~?\}\}").unwrap());
// {{! ... }}
static OPEN_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\{\{~?!").unwrap());
static CLOSE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*~?\}\}").unwrap());

// A path segment is any run of characters outside the reserved set.
static ID: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[^\\s!\"#%&'()*+,./;<=>@\\[\\\\\\]^`{|}~]+").unwrap());

/// Characters that may follow a lone `.` for it to be the identity segment
/// rather than a path separator.
const DOT_LOOKAHEAD: &str = "=~}/.)| \t\r\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Content,
    TagOpen,
    Expression,
    Comment,
    RawContent,
    RawEnd,
    Done,
}

/// The template lexer. Pull one token at a time with `next_token()`, or
/// collect the whole stream with [`tokenize`].
pub struct Lexer<'a> {
    input: &'a str,

    /// Byte offset of the scan position.
    pos: usize,

    line: usize,
    column: usize,

    mode: Mode,

    /// Close pattern of the comment currently being scanned.
    close_comment: Option<&'static Lazy<Regex>>,

    /// Set between `{{{{` and its `}}}}`, so the close switches the lexer
    /// into raw content mode instead of plain content mode.
    in_raw_open: bool,
}

/// Scans the entire source, stopping after the `Eof` or first `Error` token.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();

    loop {
        let token = lexer.next_token();
        let kind = token.kind;
        tokens.push(token);

        if kind == TokenKind::Eof || kind == TokenKind::Error {
            break;
        }
    }

    tokens
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            column: 0,
            mode: Mode::Content,
            close_comment: None,
            in_raw_open: false,
        }
    }

    /// Returns the next token in source order. After `Eof` or `Error` has
    /// been produced, every further call returns `Eof`.
    pub fn next_token(&mut self) -> Token {
        loop {
            match self.mode {
                Mode::Content => {
                    if let Some(token) = self.scan_content() {
                        return token;
                    }
                    // a delimiter was found with no pending content; loop
                    // into the new mode
                }
                Mode::TagOpen => return self.scan_tag_open(),
                Mode::Expression => {
                    if let Some(token) = self.scan_expression() {
                        return token;
                    }
                }
                Mode::Comment => return self.scan_comment(),
                Mode::RawContent => return self.scan_raw_content(),
                Mode::RawEnd => {
                    let span = self.cur_span();
                    self.advance_bytes(5); // {{{{/
                    self.mode = Mode::Expression;
                    return Token::new(TokenKind::OpenEndRawBlock, "{{{{/", span);
                }
                Mode::Done => {
                    return Token::new(TokenKind::Eof, "", self.cur_span());
                }
            }
        }
    }

    // ---------------------------------------------------------------------
    // Content mode
    // ---------------------------------------------------------------------

    /// Scans literal text up to the next tag. Returns `None` when a
    /// delimiter follows immediately with no content to emit first.
    fn scan_content(&mut self) -> Option<Token> {
        let span = self.cur_span();
        let mut buf = String::new();

        loop {
            let rest = self.rest();

            if rest.is_empty() {
                self.mode = Mode::Done;
                if !buf.is_empty() {
                    return Some(Token::new(TokenKind::Content, buf, span));
                }
                return Some(Token::new(TokenKind::Eof, "", self.cur_span()));
            }

            // `\\{{` keeps one backslash and lets the mustache render.
            if rest.starts_with("\\\\{{") {
                buf.push('\\');
                self.advance_bytes(2);
                continue;
            }

            // `\{{` escapes the whole brace run into literal content.
            if rest.starts_with("\\{{") {
                self.advance_bytes(1);
                while self.rest().starts_with('{') {
                    buf.push('{');
                    self.advance_bytes(1);
                }
                continue;
            }

            let next_mode = if OPEN_COMMENT_DASH.is_match(rest) {
                self.close_comment = Some(&CLOSE_COMMENT_DASH);
                Mode::Comment
            } else if OPEN_COMMENT.is_match(rest) {
                self.close_comment = Some(&CLOSE_COMMENT);
                Mode::Comment
            } else if rest.starts_with("{{") {
                Mode::TagOpen
            } else {
                let ch = rest.chars().next().unwrap();
                buf.push(ch);
                self.advance_bytes(ch.len_utf8());
                continue;
            };

            self.mode = next_mode;
            if !buf.is_empty() {
                return Some(Token::new(TokenKind::Content, buf, span));
            }
            return None;
        }
    }

    // ---------------------------------------------------------------------
    // Tag-open mode
    // ---------------------------------------------------------------------

    /// Classifies the `{{` variant at the scan position. Precedence runs
    /// most specific first; the plain `{{`/`{{&` pattern always matches
    /// last.
    fn scan_tag_open(&mut self) -> Token {
        let span = self.cur_span();
        let rest = self.rest();

        let (kind, text, next_mode) = if let Some(m) = OPEN_RAW.find(rest) {
            self.in_raw_open = true;
            (TokenKind::OpenRawBlock, m.as_str(), Mode::Expression)
        } else if let Some(m) = OPEN_UNESCAPED.find(rest) {
            (TokenKind::OpenUnescaped, m.as_str(), Mode::Expression)
        } else if let Some(m) = OPEN_BLOCK.find(rest) {
            (TokenKind::OpenBlock, m.as_str(), Mode::Expression)
        } else if let Some(m) = OPEN_END_BLOCK.find(rest) {
            (TokenKind::OpenEndBlock, m.as_str(), Mode::Expression)
        } else if let Some(m) = OPEN_PARTIAL.find(rest) {
            (TokenKind::OpenPartial, m.as_str(), Mode::Expression)
        } else if let Some(m) = INVERSE.find(rest) {
            (TokenKind::Inverse, m.as_str(), Mode::Content)
        } else if let Some(m) = OPEN_INVERSE.find(rest) {
            (TokenKind::OpenInverse, m.as_str(), Mode::Expression)
        } else if let Some(m) = OPEN_INVERSE_CHAIN.find(rest) {
            (TokenKind::OpenInverseChain, m.as_str(), Mode::Expression)
        } else if let Some(m) = OPEN.find(rest) {
            (TokenKind::Open, m.as_str(), Mode::Expression)
        } else {
            // content mode only hands over at an opening mustache
            return self.error_token("Expected an opening mustache");
        };

        let text = text.to_string();
        self.advance_bytes(text.len());
        self.mode = next_mode;

        Token::new(kind, text, span)
    }

    // ---------------------------------------------------------------------
    // Expression mode
    // ---------------------------------------------------------------------

    /// Scans one token inside a tag. Returns `None` after skipping
    /// whitespace, letting the caller loop.
    fn scan_expression(&mut self) -> Option<Token> {
        let span = self.cur_span();
        let rest = self.rest();

        // close delimiters end the tag
        if rest.starts_with("}}") || rest.starts_with("~}}") || rest.starts_with("}~}}") {
            return Some(self.scan_tag_close());
        }

        // `as |` opens a block-parameter list
        if let Some(m) = OPEN_BLOCK_PARAMS.find(rest) {
            let text = m.as_str().to_string();
            self.advance_bytes(text.len());
            return Some(Token::new(TokenKind::OpenBlockParams, text, span));
        }

        // booleans are matched greedily ahead of identifiers
        if rest.starts_with("true") {
            self.advance_bytes(4);
            return Some(Token::new(TokenKind::Boolean, "true", span));
        }
        if rest.starts_with("false") {
            self.advance_bytes(5);
            return Some(Token::new(TokenKind::Boolean, "false", span));
        }

        let ch = match rest.chars().next() {
            Some(ch) => ch,
            None => return Some(self.error_token("Unclosed expression")),
        };

        match ch {
            ' ' | '\t' | '\r' | '\n' => {
                while matches!(self.peek_char(), Some(' ' | '\t' | '\r' | '\n')) {
                    self.advance_bytes(1);
                }
                None
            }
            '(' => Some(self.single_char_token(TokenKind::OpenSexpr, "(")),
            ')' => Some(self.single_char_token(TokenKind::CloseSexpr, ")")),
            '=' => Some(self.single_char_token(TokenKind::Equals, "=")),
            '@' => Some(self.single_char_token(TokenKind::Data, "@")),
            '"' | '\'' => Some(self.scan_string(ch)),
            '.' => Some(self.scan_dot()),
            '/' => Some(self.single_char_token(TokenKind::Sep, "/")),
            '|' => Some(self.single_char_token(TokenKind::CloseBlockParams, "|")),
            '+' | '-' | '0'..='9' => Some(self.scan_number()),
            _ => {
                if let Some(m) = ID.find(rest) {
                    let text = m.as_str().to_string();
                    self.advance_bytes(text.len());
                    Some(Token::new(TokenKind::Id, text, span))
                } else {
                    Some(self.error_token(format!(
                        "Unexpected character in expression: '{}'",
                        ch
                    )))
                }
            }
        }
    }

    /// Scans `}}`, `~}}`, `}}}`, `}~}}` or `}}}}`.
    fn scan_tag_close(&mut self) -> Token {
        let span = self.cur_span();
        let rest = self.rest();

        let (kind, text) = if let Some(m) = CLOSE_RAW.find(rest) {
            (TokenKind::CloseRawBlock, m.as_str())
        } else if let Some(m) = CLOSE_UNESCAPED.find(rest) {
            (TokenKind::CloseUnescaped, m.as_str())
        } else if let Some(m) = CLOSE.find(rest) {
            (TokenKind::Close, m.as_str())
        } else {
            return self.error_token("Expected a closing mustache");
        };

        let text = text.to_string();
        self.advance_bytes(text.len());

        if kind == TokenKind::CloseRawBlock && self.in_raw_open {
            self.in_raw_open = false;
            self.mode = Mode::RawContent;
        } else {
            self.mode = Mode::Content;
        }

        Token::new(kind, text, span)
    }

    /// A lone `.` is the identity segment when followed by a close
    /// delimiter, whitespace or another separator; otherwise it separates
    /// path segments. `..` is always the parent segment.
    fn scan_dot(&mut self) -> Token {
        let span = self.cur_span();
        let rest = self.rest();

        if rest.starts_with("..") {
            self.advance_bytes(2);
            return Token::new(TokenKind::Id, "..", span);
        }

        let next = rest[1..].chars().next();
        match next {
            None => {
                self.advance_bytes(1);
                Token::new(TokenKind::Id, ".", span)
            }
            Some(ch) if DOT_LOOKAHEAD.contains(ch) => {
                self.advance_bytes(1);
                Token::new(TokenKind::Id, ".", span)
            }
            Some(_) => {
                self.advance_bytes(1);
                Token::new(TokenKind::Sep, ".", span)
            }
        }
    }

    /// Scans a quoted string, cooking backslash escapes. A bare newline or
    /// end of input before the closing quote is an error.
    fn scan_string(&mut self, delim: char) -> Token {
        let span = self.cur_span();
        self.advance_bytes(1); // opening quote

        let mut value = String::new();

        loop {
            let ch = match self.peek_char() {
                Some(ch) => ch,
                None => return self.error_token("Unterminated string"),
            };

            match ch {
                '\\' => {
                    self.advance_bytes(1);
                    match self.peek_char() {
                        None | Some('\n') => return self.error_token("Unterminated string"),
                        Some(esc) => {
                            value.push(esc);
                            self.advance_bytes(esc.len_utf8());
                        }
                    }
                }
                '\n' => return self.error_token("Unterminated string"),
                _ if ch == delim => {
                    self.advance_bytes(1);
                    return Token::new(TokenKind::Str, value, span);
                }
                _ => {
                    value.push(ch);
                    self.advance_bytes(ch.len_utf8());
                }
            }
        }
    }

    /// Scans a number: optional sign, decimal, hex, fraction, exponent.
    /// The character after the number must not be alphanumeric.
    fn scan_number(&mut self) -> Token {
        let span = self.cur_span();
        let start = self.pos;

        self.accept("+-");

        let mut digits = "0123456789";
        if self.accept("0") && self.accept("xX") {
            digits = "0123456789abcdefABCDEF";
        }
        self.accept_run(digits);

        if self.accept(".") {
            self.accept_run(digits);
        }

        if self.accept("eE") {
            self.accept("+-");
            self.accept_run("0123456789");
        }

        if matches!(self.peek_char(), Some(ch) if ch.is_alphanumeric() || ch == '_') {
            self.advance_bytes(1);
            let text = &self.input[start..self.pos];
            return self.error_token(format!("Bad number syntax: \"{}\"", text));
        }

        Token::new(TokenKind::Number, &self.input[start..self.pos], span)
    }

    // ---------------------------------------------------------------------
    // Comment mode
    // ---------------------------------------------------------------------

    /// Scans a whole comment tag, opener included; the parser strips the
    /// delimiters. The close pattern matches the opening variant.
    fn scan_comment(&mut self) -> Token {
        let span = self.cur_span();
        let start = self.pos;
        let close = self.close_comment.expect("comment close pattern set");

        loop {
            if let Some(m) = close.find(self.rest()) {
                self.advance_bytes(m.end());
                self.mode = Mode::Content;
                return Token::new(TokenKind::Comment, &self.input[start..self.pos], span);
            }

            match self.peek_char() {
                Some(ch) => self.advance_bytes(ch.len_utf8()),
                None => return self.error_token("Unclosed comment"),
            }
        }
    }

    // ---------------------------------------------------------------------
    // Raw block mode
    // ---------------------------------------------------------------------

    /// Captures everything up to `{{{{/` verbatim. The content token is
    /// emitted even when empty so raw blocks always carry a body.
    fn scan_raw_content(&mut self) -> Token {
        let span = self.cur_span();
        let rest = self.rest();

        match rest.find("{{{{/") {
            Some(idx) => {
                let content = rest[..idx].to_string();
                self.advance_bytes(idx);
                self.mode = Mode::RawEnd;
                Token::new(TokenKind::Content, content, span)
            }
            None => self.error_token("Unclosed raw block"),
        }
    }

    // ---------------------------------------------------------------------
    // Scan primitives
    // ---------------------------------------------------------------------

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn cur_span(&self) -> Span {
        Span::new(self.line, self.column)
    }

    /// Moves the scan position forward, keeping line/column in sync.
    fn advance_bytes(&mut self, n: usize) {
        for ch in self.input[self.pos..self.pos + n].chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
        self.pos += n;
    }

    /// Consumes the next character if it is in `valid`.
    fn accept(&mut self, valid: &str) -> bool {
        if let Some(ch) = self.peek_char() {
            if valid.contains(ch) {
                self.advance_bytes(ch.len_utf8());
                return true;
            }
        }
        false
    }

    /// Consumes all following characters that are in `valid`.
    fn accept_run(&mut self, valid: &str) {
        while self.accept(valid) {}
    }

    fn single_char_token(&mut self, kind: TokenKind, text: &str) -> Token {
        let span = self.cur_span();
        self.advance_bytes(text.len());
        Token::new(kind, text, span)
    }

    /// Emits a terminal error token; no recovery, lexing stops.
    fn error_token(&mut self, message: impl Into<String>) -> Token {
        let span = self.cur_span();
        self.mode = Mode::Done;
        Token::new(TokenKind::Error, message, span)
    }
}
