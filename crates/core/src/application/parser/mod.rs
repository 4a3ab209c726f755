//! C Source Parser - top-level items of a translation unit
//!
//! Not a C compiler front end. Function bodies and struct/initializer blocks
//! are skipped by brace matching; only the headers of top-level statements
//! are inspected. Everything that is not a function declaration or
//! definition is preserved verbatim as `CItem::Other`.

mod lexer;

use crate::domain::{CArg, CFile, CFunction, CItem};
use crate::error::{AppError, Result};
use lexer::{tokenize, Token, TokenKind};
use tracing::debug;

/// Storage specifiers dropped from return types
const STORAGE_SPECIFIERS: &[&str] = &["static", "extern", "inline", "__inline", "__inline__"];

/// Identifiers that can never be a parameter name
const TYPE_KEYWORDS: &[&str] = &[
    "void", "char", "short", "int", "long", "float", "double", "signed", "unsigned", "bool",
    "_Bool", "const", "volatile", "restrict", "struct", "union", "enum",
];

/// Keywords whose following identifier is a tag, not a declarator
const TAG_KEYWORDS: &[&str] = &["struct", "union", "enum"];

/// Qualifiers that never make up a type on their own
const QUALIFIERS: &[&str] = &["const", "volatile", "restrict"];

/// Parse C source text into its top-level items
///
/// # Example
/// ```text
/// let file = parse_c_source("int add(int a, int b) { return a + b; }")?;
/// assert_eq!(file.definitions().count(), 1);
/// ```
pub fn parse_c_source(src: &str) -> Result<CFile> {
    let tokens = tokenize(src)?;
    let items = Parser {
        src,
        tokens: &tokens,
    }
    .items()?;

    debug!(
        tokens = tokens.len(),
        items = items.len(),
        "C source parsed"
    );

    Ok(CFile::new(items))
}

struct Parser<'a> {
    src: &'a str,
    tokens: &'a [Token],
}

/// How a top-level statement ended
enum Terminator {
    /// `;` at index
    Semicolon(usize),
    /// `{` at index, matching `}` at index
    Body(usize, usize),
}

impl<'a> Parser<'a> {
    fn items(&self) -> Result<Vec<CItem>> {
        let mut items = Vec::new();
        let mut i = 0;

        while i < self.tokens.len() {
            let token = &self.tokens[i];
            if token.kind == TokenKind::Directive {
                items.push(directive_item(&token.text));
                i += 1;
                continue;
            }

            let (item, next) = self.statement(i)?;
            items.push(item);
            i = next;
        }

        Ok(items)
    }

    /// Parse one top-level statement starting at `start`.
    /// Returns the item and the index just past it.
    fn statement(&self, start: usize) -> Result<(CItem, usize)> {
        let mut i = start;
        loop {
            match self.find_terminator(i)? {
                Terminator::Semicolon(end) => {
                    let item = match self.function(start, end, end) {
                        Some(func) => CItem::Declaration(func),
                        None => CItem::Other(self.slice(start, end)),
                    };
                    return Ok((item, end + 1));
                }
                Terminator::Body(open, close) => {
                    // Only a header directly followed by a body is a definition;
                    // `struct S { ... } s;` keeps scanning to its `;`.
                    if i == start {
                        if let Some(func) = self.function(start, open, close) {
                            return Ok((CItem::Definition(func), close + 1));
                        }
                    }
                    i = close + 1;
                }
            }
        }
    }

    /// Scan from `from` to the next `;` or `{ ... }` at paren depth 0
    fn find_terminator(&self, from: usize) -> Result<Terminator> {
        let mut depth: i32 = 0;
        let mut open_line = 0;

        for (i, token) in self.tokens.iter().enumerate().skip(from) {
            match token.kind {
                TokenKind::Directive if depth == 0 => {
                    return Err(AppError::parse(
                        token.line,
                        "preprocessor directive inside a top-level declaration",
                    ))
                }
                TokenKind::Punct => match token.text.as_str() {
                    "(" => {
                        if depth == 0 {
                            open_line = token.line;
                        }
                        depth += 1;
                    }
                    ")" => {
                        depth -= 1;
                        if depth < 0 {
                            return Err(AppError::parse(token.line, "unmatched ')'"));
                        }
                    }
                    ";" if depth == 0 => return Ok(Terminator::Semicolon(i)),
                    "{" if depth == 0 => return Ok(Terminator::Body(i, self.matching_brace(i)?)),
                    "}" if depth == 0 => return Err(AppError::parse(token.line, "unmatched '}'")),
                    _ => {}
                },
                _ => {}
            }
        }

        if depth > 0 {
            return Err(AppError::parse(open_line, "'(' is never closed"));
        }
        let line = self.tokens.get(from).map(|t| t.line).unwrap_or(1);
        Err(AppError::parse(
            line,
            "unexpected end of input (missing ';')",
        ))
    }

    fn matching_brace(&self, open: usize) -> Result<usize> {
        let mut depth = 0;
        for (i, token) in self.tokens.iter().enumerate().skip(open) {
            if token.is_punct("{") {
                depth += 1;
            } else if token.is_punct("}") {
                depth -= 1;
                if depth == 0 {
                    return Ok(i);
                }
            }
        }
        Err(AppError::parse(
            self.tokens[open].line,
            "'{' is never closed",
        ))
    }

    /// Source text from token `start` through token `end` inclusive
    fn slice(&self, start: usize, end: usize) -> String {
        self.src[self.tokens[start].start..self.tokens[end].end].to_string()
    }

    /// Interpret tokens `start..header_end` as a function prototype.
    /// `last` is the index of the token ending the item (`;` or `}`).
    fn function(&self, start: usize, header_end: usize, last: usize) -> Option<CFunction> {
        let header = &self.tokens[start..header_end];
        let first = header.first()?;
        if first.is_ident("typedef") {
            return None;
        }

        let header = strip_attributes(header);
        let close = header.len().checked_sub(1)?;
        if !header[close].is_punct(")") {
            return None;
        }
        let open = matching_paren_backwards(header, close)?;
        let name_idx = open.checked_sub(1)?;
        let name = &header[name_idx];
        if name.kind != TokenKind::Ident || name.text == "__attribute__" {
            return None;
        }
        if header[..name_idx].iter().any(|t| t.is_punct("=")) {
            return None;
        }

        let mut is_static = false;
        let return_tokens: Vec<Token> = header[..name_idx]
            .iter()
            .filter(|t| {
                if t.is_ident("static") {
                    is_static = true;
                }
                !(t.kind == TokenKind::Ident && STORAGE_SPECIFIERS.contains(&t.text.as_str()))
            })
            .cloned()
            .collect();
        if return_tokens.is_empty() {
            return None;
        }

        let args = parse_args(&header[open + 1..close]);

        Some(CFunction {
            name: name.text.clone(),
            return_type: join_tokens(&return_tokens),
            args,
            is_static,
            line: first.line,
            source: self.slice(start, last),
        })
    }
}

fn directive_item(text: &str) -> CItem {
    let body = text.trim_start_matches('#').trim_start();
    if body.starts_with("include") {
        CItem::Include(text.to_string())
    } else {
        CItem::Directive(text.to_string())
    }
}

/// Drop trailing `__attribute__((...))` groups
fn strip_attributes(mut header: &[Token]) -> &[Token] {
    while let Some(close) = header.len().checked_sub(1) {
        if !header[close].is_punct(")") {
            break;
        }
        let Some(open) = matching_paren_backwards(header, close) else {
            break;
        };
        match open.checked_sub(1).map(|i| &header[i]) {
            Some(t) if t.is_ident("__attribute__") => header = &header[..open - 1],
            _ => break,
        }
    }
    header
}

fn matching_paren_backwards(tokens: &[Token], close: usize) -> Option<usize> {
    let mut depth = 0;
    for i in (0..=close).rev() {
        if tokens[i].is_punct(")") {
            depth += 1;
        } else if tokens[i].is_punct("(") {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

fn parse_args(tokens: &[Token]) -> Vec<CArg> {
    let mut groups: Vec<&[Token]> = Vec::new();
    let mut depth = 0;
    let mut begin = 0;
    for (i, token) in tokens.iter().enumerate() {
        match token.text.as_str() {
            "(" | "[" if token.kind == TokenKind::Punct => depth += 1,
            ")" | "]" if token.kind == TokenKind::Punct => depth -= 1,
            "," if token.kind == TokenKind::Punct && depth == 0 => {
                groups.push(&tokens[begin..i]);
                begin = i + 1;
            }
            _ => {}
        }
    }
    if begin < tokens.len() {
        groups.push(&tokens[begin..]);
    }

    if groups.len() == 1 && groups[0].len() == 1 && groups[0][0].is_ident("void") {
        return Vec::new();
    }

    groups.into_iter().filter(|g| !g.is_empty()).map(parse_arg).collect()
}

fn parse_arg(tokens: &[Token]) -> CArg {
    let declaration = join_tokens(tokens);

    if tokens.len() == 1 && tokens[0].is_punct("...") {
        return CArg {
            name: None,
            ty: declaration.clone(),
            declaration,
        };
    }

    // Function pointer: `void (*cb)(int)`
    if let Some(star) = tokens
        .windows(2)
        .position(|w| w[0].is_punct("(") && w[1].is_punct("*"))
    {
        let name_idx = star + 2;
        if let Some(name) = tokens.get(name_idx).filter(|t| t.kind == TokenKind::Ident) {
            let ty: Vec<Token> = tokens
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != name_idx)
                .map(|(_, t)| t.clone())
                .collect();
            return CArg {
                name: Some(name.text.clone()),
                ty: join_tokens(&ty),
                declaration,
            };
        }
    }

    // Plain or array parameter: name is the last identifier before any `[`
    let bracket = tokens
        .iter()
        .position(|t| t.is_punct("["))
        .unwrap_or(tokens.len());
    // `struct point` and `const size_t` are unnamed: the last identifier is
    // a tag or the type itself.
    let named = bracket >= 2
        && tokens[bracket - 1].kind == TokenKind::Ident
        && !TYPE_KEYWORDS.contains(&tokens[bracket - 1].text.as_str())
        && !TAG_KEYWORDS.contains(&tokens[bracket - 2].text.as_str())
        && tokens[..bracket - 1]
            .iter()
            .any(|t| !(t.kind == TokenKind::Ident && QUALIFIERS.contains(&t.text.as_str())));

    if !named {
        return CArg {
            name: None,
            ty: declaration.clone(),
            declaration,
        };
    }

    let ty: Vec<Token> = tokens[..bracket - 1]
        .iter()
        .chain(&tokens[bracket..])
        .cloned()
        .collect();
    CArg {
        name: Some(tokens[bracket - 1].text.clone()),
        ty: join_tokens(&ty),
        declaration,
    }
}

/// Render tokens with conventional C spacing: `char *s`, `void (*cb)(int)`
fn join_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    let mut prev: Option<&str> = None;

    for token in tokens {
        let cur = token.text.as_str();
        if let Some(prev) = prev {
            let tight = matches!(prev, "(" | "[" | "*")
                || matches!(cur, ")" | "," | "[" | "]")
                || (cur == "(" && prev == ")");
            if !tight {
                out.push(' ');
            }
        }
        out.push_str(cur);
        prev = Some(cur);
    }

    out
}
