//! This module contains the tolerant CSS parser that builds the owned
//! stylesheet tree used by the fallback pass.
//!
//! The parser keeps every byte of the input: whitespace and comments are
//! captured into the `raws` fields of the surrounding nodes, so an
//! unmodified tree serializes back to the original source. Strings,
//! comments and parenthesized groups (e.g. data URLs containing `;`) are
//! opaque while scanning for structural characters.

use crate::error::Error;
use crate::stylesheet::css_tree::{
    Declaration, DeclarationRaws, Position, Rule, RuleKind, RuleRaws, Stylesheet,
};

const EOF_BYTE: u8 = 0;

/// Parses CSS source into a stylesheet tree.
///
/// # Arguments
///
/// * `source` - The CSS text to parse.
///
/// # Returns
///
/// The owned `Stylesheet`, or a positioned `Error::Syntax` for unclosed
/// blocks, strings or comments and for declaration segments without a
/// colon.
pub fn parse(source: &str) -> Result<Stylesheet, Error> {
    let mut parser = Parser::new(source);
    let mut rules = Vec::new();
    loop {
        let before = parser.take_raw()?;
        if parser.eof() {
            return Ok(Stylesheet {
                rules,
                trailing: before,
            });
        }
        let rule = parser.parse_rule(before)?;
        rules.push(rule);
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    line: u32,
    column: u32,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Parser {
            src,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn bytes(&self) -> &'a [u8] {
        self.src.as_bytes()
    }

    fn eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes().get(self.pos).copied()
    }

    fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    /// Moves the cursor forward to `target`, keeping line/column counts in
    /// step with the consumed text.
    fn advance_to(&mut self, target: usize) {
        for c in self.src[self.pos..target].chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.pos = target;
    }

    fn error_at(&mut self, offset: usize, message: &str) -> Error {
        if offset > self.pos {
            self.advance_to(offset);
        }
        Error::Syntax {
            message: message.to_string(),
            line: self.line,
            column: self.column,
        }
    }

    /// Consumes whitespace and comments, returning them verbatim.
    fn take_raw(&mut self) -> Result<String, Error> {
        let bytes = self.bytes();
        let start = self.pos;
        let mut i = self.pos;
        loop {
            match bytes.get(i) {
                Some(b) if b.is_ascii_whitespace() => i += 1,
                Some(b'/') if bytes.get(i + 1) == Some(&b'*') => {
                    i = skip_comment(bytes, i).map_err(|(o, m)| self.error_at(o, m))?;
                }
                _ => break,
            }
        }
        let raw = self.src[start..i].to_string();
        self.advance_to(i);
        Ok(raw)
    }

    fn parse_rule(&mut self, before: String) -> Result<Rule, Error> {
        if self.peek() == Some(b'@') {
            self.parse_at_rule(before)
        } else {
            self.parse_style_rule(before)
        }
    }

    fn parse_style_rule(&mut self, before: String) -> Result<Rule, Error> {
        let position = self.position();
        let start = self.pos;
        let (end, found) =
            find_structural(self.bytes(), start).map_err(|(o, m)| self.error_at(o, m))?;
        if found != b'{' {
            let message = if found == b'}' {
                "Unexpected }"
            } else {
                "Unknown word"
            };
            return Err(self.error_at(start, message));
        }
        let span = &self.src[start..end];
        let selector = span.trim_end().to_string();
        let between = span[selector.len()..].to_string();
        self.advance_to(end + 1);
        let (declarations, rules, after, semicolon) = self.parse_block(position)?;
        Ok(Rule {
            kind: RuleKind::Style { selector },
            declarations,
            rules,
            raws: RuleRaws {
                before,
                afore_params: String::new(),
                between,
                after,
                semicolon,
            },
            position,
        })
    }

    fn parse_at_rule(&mut self, before: String) -> Result<Rule, Error> {
        let position = self.position();
        let bytes = self.bytes();
        let mut i = self.pos + 1; // past '@'
        while i < bytes.len()
            && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-' || bytes[i] == b'_')
        {
            i += 1;
        }
        let name = self.src[self.pos + 1..i].to_string();
        self.advance_to(i);
        let afore_params = self.take_raw()?;

        let start = self.pos;
        let (end, found) =
            find_structural(self.bytes(), start).map_err(|(o, m)| self.error_at(o, m))?;
        let span = &self.src[start..end];
        match found {
            b'{' => {
                let params = span.trim_end().to_string();
                let between = span[params.len()..].to_string();
                self.advance_to(end + 1);
                let (declarations, rules, after, semicolon) = self.parse_block(position)?;
                Ok(Rule {
                    kind: RuleKind::AtRule {
                        name,
                        params,
                        has_block: true,
                    },
                    declarations,
                    rules,
                    raws: RuleRaws {
                        before,
                        afore_params,
                        between,
                        after,
                        semicolon,
                    },
                    position,
                })
            }
            _ => {
                // Block-less at-rule, e.g. `@import url(x);`. A `}` or EOF
                // here terminates the at-rule without consuming it.
                let params = span.to_string();
                let semicolon = found == b';';
                self.advance_to(if semicolon { end + 1 } else { end });
                Ok(Rule {
                    kind: RuleKind::AtRule {
                        name,
                        params,
                        has_block: false,
                    },
                    declarations: Vec::new(),
                    rules: Vec::new(),
                    raws: RuleRaws {
                        before,
                        afore_params,
                        between: String::new(),
                        after: String::new(),
                        semicolon,
                    },
                    position,
                })
            }
        }
    }

    /// Parses the contents of a `{}` block; the opening brace has already
    /// been consumed and the closing brace is consumed on success.
    fn parse_block(
        &mut self,
        open_position: Position,
    ) -> Result<(Vec<Declaration>, Vec<Rule>, String, bool), Error> {
        let mut declarations = Vec::new();
        let mut rules = Vec::new();
        let mut semicolon = false;
        let mut pending = String::new();
        loop {
            let mut before = std::mem::take(&mut pending);
            before.push_str(&self.take_raw()?);
            match self.peek() {
                None => {
                    return Err(Error::Syntax {
                        message: "Unclosed block".to_string(),
                        line: open_position.line,
                        column: open_position.column,
                    });
                }
                Some(b'}') => {
                    self.advance_to(self.pos + 1);
                    return Ok((declarations, rules, before, semicolon));
                }
                Some(b';') => {
                    // Stray semicolon; keep it in the raw text so the
                    // source round-trips.
                    self.advance_to(self.pos + 1);
                    before.push(';');
                    pending = before;
                }
                Some(_) => {
                    let (end, found) = find_structural(self.bytes(), self.pos)
                        .map_err(|(o, m)| self.error_at(o, m))?;
                    if found == b'{' {
                        rules.push(self.parse_rule(before)?);
                    } else {
                        let (decl, trailing, semi) = self.parse_declaration(before, end, found)?;
                        declarations.push(decl);
                        semicolon = semi;
                        pending = trailing;
                    }
                }
            }
        }
    }

    fn parse_declaration(
        &mut self,
        before: String,
        end: usize,
        found: u8,
    ) -> Result<(Declaration, String, bool), Error> {
        let position = self.position();
        let start = self.pos;
        let colon = match find_colon(self.bytes(), start, end) {
            Some(c) => c,
            None => return Err(self.error_at(start, "Unknown word")),
        };
        let segment = &self.src[start..end];
        let prop_part = &segment[..colon - start];
        let property = prop_part.trim_end().to_string();
        let value_part = &segment[colon - start + 1..];
        let lead = value_part.len() - value_part.trim_start().len();
        let between = format!("{}:{}", &prop_part[property.len()..], &value_part[..lead]);
        let value = value_part.trim();
        let trailing = value_part[lead + value.len()..].to_string();
        let value = value.to_string();

        self.advance_to(end);
        let mut semi = false;
        if found == b';' {
            self.advance_to(end + 1);
            semi = true;
        }
        Ok((
            Declaration {
                property,
                value,
                raws: DeclarationRaws { before, between },
                position,
            },
            trailing,
            semi,
        ))
    }
}

/// Finds the next top-level `{`, `}` or `;`, skipping strings, comments
/// and parenthesized groups. Returns `(offset, byte)`, with byte 0 at EOF.
fn find_structural(bytes: &[u8], mut i: usize) -> Result<(usize, u8), (usize, &'static str)> {
    let mut parens = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => i = skip_string(bytes, i)?,
            b'/' if bytes.get(i + 1) == Some(&b'*') => i = skip_comment(bytes, i)?,
            b'(' => {
                parens += 1;
                i += 1;
            }
            b')' => {
                parens = parens.saturating_sub(1);
                i += 1;
            }
            b'{' | b'}' | b';' if parens == 0 => return Ok((i, bytes[i])),
            _ => i += 1,
        }
    }
    Ok((bytes.len(), EOF_BYTE))
}

/// Finds the first top-level `:` in `bytes[i..end]`.
fn find_colon(bytes: &[u8], mut i: usize, end: usize) -> Option<usize> {
    let mut parens = 0usize;
    while i < end {
        match bytes[i] {
            b'"' | b'\'' => i = skip_string(bytes, i).ok()?,
            b'/' if bytes.get(i + 1) == Some(&b'*') => i = skip_comment(bytes, i).ok()?,
            b'(' => {
                parens += 1;
                i += 1;
            }
            b')' => {
                parens = parens.saturating_sub(1);
                i += 1;
            }
            b':' if parens == 0 => return Some(i),
            _ => i += 1,
        }
    }
    None
}

fn skip_string(bytes: &[u8], start: usize) -> Result<usize, (usize, &'static str)> {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            i += 2;
            continue;
        }
        if bytes[i] == quote {
            return Ok(i + 1);
        }
        i += 1;
    }
    Err((start, "Unclosed string"))
}

fn skip_comment(bytes: &[u8], start: usize) -> Result<usize, (usize, &'static str)> {
    let mut i = start + 2;
    while i + 1 < bytes.len() {
        if bytes[i] == b'*' && bytes[i + 1] == b'/' {
            return Ok(i + 2);
        }
        i += 1;
    }
    Err((start, "Unclosed comment"))
}
