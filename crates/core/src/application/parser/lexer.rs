// C tokenizer - just enough to find top-level declarations
//
// Comments are dropped, literals are opaque, preprocessor lines become a
// single token. Every token keeps its byte span so callers can slice the
// original text back out.

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Ident,
    Punct,
    Literal,
    Directive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// 1-based
    pub line: usize,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn is_punct(&self, punct: &str) -> bool {
        self.kind == TokenKind::Punct && self.text == punct
    }

    pub fn is_ident(&self, ident: &str) -> bool {
        self.kind == TokenKind::Ident && self.text == ident
    }
}

pub(crate) fn tokenize(src: &str) -> Result<Vec<Token>> {
    Lexer::new(src).run()
}

struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: usize,
    at_line_start: bool,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            line: 1,
            at_line_start: true,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>> {
        while let Some(b) = self.peek(0) {
            match b {
                b'\n' => {
                    self.line += 1;
                    self.pos += 1;
                    self.at_line_start = true;
                }
                b' ' | b'\t' | b'\r' | 0x0c | 0x0b => self.pos += 1,
                b'/' if self.peek(1) == Some(b'/') => self.skip_line_comment(),
                b'/' if self.peek(1) == Some(b'*') => self.skip_block_comment()?,
                b'#' if self.at_line_start => self.directive()?,
                b'"' | b'\'' => self.quoted(b)?,
                b'.' if self.peek(1) == Some(b'.') && self.peek(2) == Some(b'.') => {
                    self.emit(TokenKind::Punct, self.pos, self.pos + 3);
                }
                b if b.is_ascii_alphabetic() || b == b'_' => {
                    let end = self.scan_while(|c| c.is_ascii_alphanumeric() || c == b'_');
                    self.emit(TokenKind::Ident, self.pos, end);
                }
                b if b.is_ascii_digit() => {
                    let end = self.scan_while(|c| c.is_ascii_alphanumeric() || c == b'.' || c == b'_');
                    self.emit(TokenKind::Literal, self.pos, end);
                }
                _ => {
                    let width = self.src[self.pos..]
                        .chars()
                        .next()
                        .map(char::len_utf8)
                        .unwrap_or(1);
                    self.emit(TokenKind::Punct, self.pos, self.pos + width);
                }
            }
        }
        Ok(self.tokens)
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn scan_while(&self, pred: impl Fn(u8) -> bool) -> usize {
        let mut end = self.pos;
        while end < self.bytes.len() && pred(self.bytes[end]) {
            end += 1;
        }
        end
    }

    fn emit(&mut self, kind: TokenKind, start: usize, end: usize) {
        self.tokens.push(Token {
            kind,
            text: self.src[start..end].to_string(),
            line: self.line,
            start,
            end,
        });
        self.pos = end;
        self.at_line_start = false;
    }

    fn skip_line_comment(&mut self) {
        while let Some(b) = self.peek(0) {
            if b == b'\n' {
                break;
            }
            self.pos += 1;
        }
    }

    fn skip_block_comment(&mut self) -> Result<()> {
        let opened_at = self.line;
        self.pos += 2;
        loop {
            match self.peek(0) {
                None => return Err(AppError::parse(opened_at, "unterminated block comment")),
                Some(b'*') if self.peek(1) == Some(b'/') => {
                    self.pos += 2;
                    return Ok(());
                }
                Some(b'\n') => {
                    self.line += 1;
                    self.pos += 1;
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn quoted(&mut self, quote: u8) -> Result<()> {
        let start = self.pos;
        let what = if quote == b'"' { "string" } else { "character" };
        let mut end = self.pos + 1;
        loop {
            match self.bytes.get(end) {
                None | Some(b'\n') => {
                    return Err(AppError::parse(
                        self.line,
                        format!("unterminated {} literal", what),
                    ))
                }
                Some(b'\\') => end += 2,
                Some(&b) if b == quote => break,
                Some(_) => end += 1,
            }
        }
        self.emit(TokenKind::Literal, start, end + 1);
        Ok(())
    }

    /// `#...` up to the end of line, following `\` continuations.
    ///
    /// Quoted literals are copied as-is, so `//` inside a string does not end
    /// the directive. A block comment is replaced by a single space and the
    /// directive continues after it. A trailing `//` comment is left for the
    /// main loop to skip.
    fn directive(&mut self) -> Result<()> {
        let start = self.pos;
        let first_line = self.line;
        let mut text = String::new();
        let mut segment = self.pos;
        let mut end = self.pos;
        while end < self.bytes.len() {
            match self.bytes[end] {
                b'\n' => break,
                b'\\' if self.bytes.get(end + 1) == Some(&b'\n') => {
                    self.line += 1;
                    end += 2;
                }
                quote @ (b'"' | b'\'') => end = self.directive_literal(end, quote),
                b'/' if self.bytes.get(end + 1) == Some(&b'/') => break,
                b'/' if self.bytes.get(end + 1) == Some(&b'*') => {
                    text.push_str(&self.src[segment..end]);
                    text.push(' ');
                    end = self.directive_comment(end)?;
                    segment = end;
                }
                _ => end += 1,
            }
        }
        text.push_str(&self.src[segment..end]);
        let text = text.trim_end();
        self.tokens.push(Token {
            kind: TokenKind::Directive,
            text: text.to_string(),
            line: first_line,
            start,
            end: start + self.src[start..end].trim_end().len(),
        });
        self.pos = end;
        self.at_line_start = false;
        Ok(())
    }

    /// Index just past a literal opened at `open`. An unterminated literal
    /// stops at the end of the line (`#error can't` is legal).
    fn directive_literal(&mut self, open: usize, quote: u8) -> usize {
        let mut end = open + 1;
        loop {
            match self.bytes.get(end) {
                None | Some(b'\n') => return end,
                Some(b'\\') => {
                    if self.bytes.get(end + 1) == Some(&b'\n') {
                        self.line += 1;
                    }
                    end = (end + 2).min(self.bytes.len());
                }
                Some(&b) if b == quote => return end + 1,
                Some(_) => end += 1,
            }
        }
    }

    /// Index just past a block comment opened at `open`.
    fn directive_comment(&mut self, open: usize) -> Result<usize> {
        let opened_at = self.line;
        let mut end = open + 2;
        loop {
            match self.bytes.get(end) {
                None => return Err(AppError::parse(opened_at, "unterminated block comment")),
                Some(b'*') if self.bytes.get(end + 1) == Some(&b'/') => return Ok(end + 2),
                Some(b'\n') => {
                    self.line += 1;
                    end += 1;
                }
                Some(_) => end += 1,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(src: &str) -> Vec<String> {
        tokenize(src).unwrap().into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_comments_are_dropped() {
        let src = "int /* inline */ x; // trailing\n/* multi\nline */ y;";
        assert_eq!(texts(src), vec!["int", "x", ";", "y", ";"]);
    }

    #[test]
    fn test_line_numbers_survive_comments() {
        let tokens = tokenize("a\n/* one\ntwo */\nb").unwrap();
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].line, 4);
    }

    #[test]
    fn test_literals_are_opaque() {
        let tokens = tokenize(r#"s = "a { b; \" }"; c = '}';"#).unwrap();
        let literals: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Literal)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(literals, vec![r#""a { b; \" }""#, "'}'"]);
    }

    #[test]
    fn test_directives_with_continuation() {
        let src = "#include <time.h> // clock\n#define MAX(a, b) \\\n  ((a) > (b))\nint x;";
        let tokens = tokenize(src).unwrap();

        assert_eq!(tokens[0].kind, TokenKind::Directive);
        assert_eq!(tokens[0].text, "#include <time.h>");
        assert_eq!(tokens[1].kind, TokenKind::Directive);
        assert_eq!(tokens[1].text, "#define MAX(a, b) \\\n  ((a) > (b))");
        assert_eq!(tokens[2].text, "int");
        assert_eq!(tokens[2].line, 4);
    }

    #[test]
    fn test_directive_keeps_comment_markers_inside_strings() {
        let src = "#define URL \"http://example.com/*x*/\"\n#define SLASH '/' // note\nint x;";
        let tokens = tokenize(src).unwrap();

        assert_eq!(tokens[0].text, r#"#define URL "http://example.com/*x*/""#);
        assert_eq!(tokens[1].text, "#define SLASH '/'");
        assert_eq!(tokens[2].text, "int");
        assert_eq!(tokens[2].line, 3);
    }

    #[test]
    fn test_directive_continues_after_inline_block_comment() {
        let src = "#define X 1 /* one */ + 2\n#define Y /* spans\nlines */ 3\nint f(void);";
        let tokens = tokenize(src).unwrap();

        assert_eq!(tokens[0].kind, TokenKind::Directive);
        assert_eq!(tokens[0].text, "#define X 1   + 2");
        assert_eq!(tokens[1].kind, TokenKind::Directive);
        assert_eq!(tokens[1].text, "#define Y   3");
        assert_eq!(tokens[1].line, 2);
        assert_eq!(tokens[2].text, "int");
        assert_eq!(tokens[2].line, 4);
    }

    #[test]
    fn test_directive_tolerates_apostrophe_in_message() {
        let tokens = tokenize("#error can't build here\nint x;").unwrap();
        assert_eq!(tokens[0].text, "#error can't build here");
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_directive_unterminated_comment() {
        let err = tokenize("#define X /* open").unwrap_err();
        assert_eq!(err.to_string(), "Parse error at line 1: unterminated block comment");
    }

    #[test]
    fn test_hash_mid_line_is_punct() {
        let tokens = tokenize("a # b").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Punct);
    }

    #[test]
    fn test_ellipsis_and_spans() {
        let src = "int f(int n, ...);";
        let tokens = tokenize(src).unwrap();
        let ellipsis = tokens.iter().find(|t| t.text == "...").unwrap();
        assert!(ellipsis.is_punct("..."));
        assert_eq!(&src[ellipsis.start..ellipsis.end], "...");
    }

    #[test]
    fn test_non_ascii_does_not_split_chars() {
        assert_eq!(texts("é;"), vec!["é", ";"]);
    }

    #[test]
    fn test_unterminated_comment() {
        let err = tokenize("int x;\n/* never closed").unwrap_err();
        assert_eq!(err.to_string(), "Parse error at line 2: unterminated block comment");
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("char *s = \"oops;\n").unwrap_err();
        assert!(err.to_string().contains("unterminated string literal"));
    }
}
