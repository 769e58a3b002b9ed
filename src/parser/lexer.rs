//! Logos-based lexer for the Smithy IDL
//!
//! Fast tokenization using the logos crate. Trivia (whitespace, newlines,
//! comments) is kept in the token list; [`TokenStream`] decides what the
//! parser gets to see.

use logos::Logos;
use text_size::{TextRange, TextSize};

/// A token with its kind, text, and position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub range: TextRange,
}

impl Token<'_> {
    /// A `///` line comment. Plain `//` comments are trivia.
    pub fn is_doc_comment(&self) -> bool {
        self.kind == TokenKind::LineComment && self.text.starts_with("///")
    }

    /// Payload of a doc comment: the slashes and one following space are
    /// removed, further indentation is kept.
    pub fn doc_text(&self) -> &str {
        let body = self.text.trim_start_matches('/').trim_end();
        body.strip_prefix(' ').unwrap_or(body)
    }
}

/// Extends a `/*` match through the closing `*/`. An unterminated comment
/// swallows the rest of the input as an error token.
fn block_comment(lex: &mut logos::Lexer<'_, TokenKind>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => {
            lex.bump(lex.remainder().len());
            false
        }
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\f]+")]
    Whitespace,

    #[token("\n")]
    Newline,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Symbol,

    #[regex(r#""([^"\\]|\\.|\\\n)*""#)]
    String,

    #[regex(r#""""([^"]|"[^"]|""[^"])*""""#)]
    TextBlock,

    #[regex(r"-?[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?")]
    Number,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("#")]
    Hash,
    #[token("$")]
    Dollar,
    #[token("@")]
    At,
    #[token("=")]
    Equals,

    /// Anything the lexer could not match
    Error,
}

impl TokenKind {
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            Self::Whitespace | Self::Newline | Self::LineComment | Self::BlockComment
        )
    }

    /// Human-readable description for error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Whitespace => "whitespace",
            Self::Newline => "newline",
            Self::LineComment => "comment",
            Self::BlockComment => "block comment",
            Self::Symbol => "identifier",
            Self::String | Self::TextBlock => "string",
            Self::Number => "number",
            Self::LBrace => "'{'",
            Self::RBrace => "'}'",
            Self::LBracket => "'['",
            Self::RBracket => "']'",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::Colon => "':'",
            Self::Comma => "','",
            Self::Dot => "'.'",
            Self::Hash => "'#'",
            Self::Dollar => "'$'",
            Self::At => "'@'",
            Self::Equals => "'='",
            Self::Error => "invalid character",
        }
    }
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(input),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let kind = self.inner.next()?.unwrap_or(TokenKind::Error);
        let span = self.inner.span();
        let range = TextRange::new(TextSize::new(span.start as u32), TextSize::new(span.end as u32));
        Some(Token {
            kind,
            text: self.inner.slice(),
            range,
        })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

// ============================================================================
// TOKEN STREAM
// ============================================================================

/// Significant-token cursor with a single token of pushback.
///
/// `None` is the end-of-input sentinel.
pub struct TokenStream<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
    last: Option<usize>,
    end: TextSize,
}

impl<'a> TokenStream<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            tokens: tokenize(input),
            pos: 0,
            last: None,
            end: TextSize::new(input.len() as u32),
        }
    }

    /// Next token, skipping all trivia including doc comments.
    pub fn next(&mut self) -> Option<Token<'a>> {
        self.advance(false)
    }

    /// Next token, skipping trivia but returning `///` doc comments.
    pub fn next_with_docs(&mut self) -> Option<Token<'a>> {
        self.advance(true)
    }

    /// Push the most recently returned token back. Only one level deep.
    /// Rewinds to where that read started, so doc comments skipped on the
    /// way are seen again.
    pub fn unget(&mut self) {
        if let Some(last) = self.last.take() {
            self.pos = last;
        }
    }

    /// Offset of the end of input, for end-of-file diagnostics.
    pub fn end(&self) -> TextSize {
        self.end
    }

    fn advance(&mut self, docs: bool) -> Option<Token<'a>> {
        self.last = Some(self.pos);
        while let Some(token) = self.tokens.get(self.pos).copied() {
            self.pos += 1;
            if !token.kind.is_trivia() || (docs && token.is_doc_comment()) {
                return Some(token);
            }
        }
        None
    }
}

// ============================================================================
// STRING LITERALS
// ============================================================================

/// Decode a quoted string or text block token into its value.
pub fn unquote(token: &Token<'_>) -> Result<String, String> {
    match token.kind {
        TokenKind::String => unescape(&token.text[1..token.text.len() - 1]),
        TokenKind::TextBlock => unescape(&dedent_text_block(&token.text[3..token.text.len() - 3])),
        _ => Err(format!("expected a string, found {}", token.kind.describe())),
    }
}

fn unescape(body: &str) -> Result<String, String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\n') => {}
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let code = u32::from_str_radix(&hex, 16)
                    .map_err(|_| format!("invalid unicode escape '\\u{hex}'"))?;
                let ch = char::from_u32(code)
                    .ok_or_else(|| format!("invalid unicode escape '\\u{hex}'"))?;
                out.push(ch);
            }
            Some(other) => return Err(format!("invalid escape '\\{other}'")),
            None => return Err("dangling escape at end of string".to_string()),
        }
    }
    Ok(out)
}

/// Strip the opening newline and the common indentation of a text block.
/// A closing delimiter on its own line leaves a trailing newline.
fn dedent_text_block(body: &str) -> String {
    let body = body.strip_prefix("\r\n").or_else(|| body.strip_prefix('\n')).unwrap_or(body);
    let lines: Vec<&str> = body.split('\n').collect();
    let last_blank = lines.last().is_some_and(|l| l.trim().is_empty());
    let indent = lines
        .iter()
        .enumerate()
        .filter(|(i, l)| !l.trim().is_empty() || (*i == lines.len() - 1 && last_blank))
        .map(|(_, l)| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);
    let mut out: Vec<String> = lines
        .iter()
        .map(|l| l.get(indent..).unwrap_or("").trim_end().to_string())
        .collect();
    if last_blank {
        if let Some(last) = out.last_mut() {
            last.clear();
        }
    }
    out.join("\n")
}
