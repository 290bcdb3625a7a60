//! Lexer (tokenizer) for Jutsu source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! Newlines are significant only outside brackets: the lexer tracks how many
//! `(`, `[` and `{` are open and drops raw newlines while that count is non-zero,
//! so bracketed expressions may span several lines.

use super::ast::SourceLocation;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, trace};

/// All token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Brackets
    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]
    LBrace,   // {
    RBrace,   // }

    // Single-character punctuation
    Colon,   // :
    Bang,    // !
    Plus,    // +
    Minus,   // -
    Star,    // *
    Slash,   // /
    Percent, // %
    Lt,      // <
    Gt,      // >
    Eq,      // =
    Comma,   // ,
    Dot,     // .

    // Multi-character operators
    SlashSlash, // //
    StarStar,   // **
    EqEq,       // ==
    NotEq,      // !=
    Le,         // <=
    Ge,         // >=
    Or,         // or
    And,        // and

    // Augmented assignment
    PlusEq,       // +=
    MinusEq,      // -=
    StarEq,       // *=
    SlashEq,      // /=
    SlashSlashEq, // //=
    StarStarEq,   // **=

    // Keywords
    Jutsu,
    True,
    False,
    If,
    Elif,
    Else,
    Release,
    Print,

    // Literals
    Int,
    Str,
    Name,

    Newline,
    Eof,
}

impl TokenKind {
    /// Canonical upper-case token name, as printed in token dumps.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LBracket => "LSQB",
            TokenKind::RBracket => "RSQB",
            TokenKind::LBrace => "LCB",
            TokenKind::RBrace => "RCB",
            TokenKind::Colon => "COLON",
            TokenKind::Bang => "NOT",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "MULT",
            TokenKind::Slash => "DIV",
            TokenKind::Percent => "PERCENT",
            TokenKind::Lt => "LT",
            TokenKind::Gt => "GT",
            TokenKind::Eq => "EQ",
            TokenKind::Comma => "COMMA",
            TokenKind::Dot => "DOT",
            TokenKind::SlashSlash => "IDIV",
            TokenKind::StarStar => "DSTAR",
            TokenKind::EqEq => "DEQ",
            TokenKind::NotEq => "NEQ",
            TokenKind::Le => "LEQ",
            TokenKind::Ge => "GEQ",
            TokenKind::Or => "OR",
            TokenKind::And => "AND",
            TokenKind::PlusEq => "PLUSEQ",
            TokenKind::MinusEq => "MINUSEQ",
            TokenKind::StarEq => "MULTEQ",
            TokenKind::SlashEq => "DIVEQ",
            TokenKind::SlashSlashEq => "IDIVEQ",
            TokenKind::StarStarEq => "DSTAREQ",
            TokenKind::Jutsu => "DEFINE",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::If => "IF",
            TokenKind::Elif => "ELIF",
            TokenKind::Else => "ELSE",
            TokenKind::Release => "RETURN",
            TokenKind::Print => "PRINT",
            TokenKind::Int => "INT",
            TokenKind::Str => "STRING",
            TokenKind::Name => "NAME",
            TokenKind::Newline => "NEWLINE",
            TokenKind::Eof => "EOF",
        }
    }

    /// Source spelling for fixed tokens, `None` for literals and structure.
    pub fn symbol(self) -> Option<&'static str> {
        let text = match self {
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Colon => ":",
            TokenKind::Bang => "!",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::Eq => "=",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::SlashSlash => "//",
            TokenKind::StarStar => "**",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Le => "<=",
            TokenKind::Ge => ">=",
            TokenKind::Or => "or",
            TokenKind::And => "and",
            TokenKind::PlusEq => "+=",
            TokenKind::MinusEq => "-=",
            TokenKind::StarEq => "*=",
            TokenKind::SlashEq => "/=",
            TokenKind::SlashSlashEq => "//=",
            TokenKind::StarStarEq => "**=",
            TokenKind::Jutsu => "jutsu",
            TokenKind::True => "True",
            TokenKind::False => "False",
            TokenKind::If => "if",
            TokenKind::Elif => "elif",
            TokenKind::Else => "else",
            TokenKind::Release => "release",
            TokenKind::Print => "print",
            TokenKind::Int
            | TokenKind::Str
            | TokenKind::Name
            | TokenKind::Newline
            | TokenKind::Eof => return None,
        };
        Some(text)
    }

    fn opens_bracket(self) -> bool {
        matches!(self, TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace)
    }

    fn closes_bracket(self) -> bool {
        matches!(self, TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.symbol() {
            Some(text) => write!(f, "'{}'", text),
            None => match self {
                TokenKind::Int => write!(f, "integer literal"),
                TokenKind::Str => write!(f, "string literal"),
                TokenKind::Name => write!(f, "name"),
                TokenKind::Newline => write!(f, "newline"),
                _ => write!(f, "end of input"),
            },
        }
    }
}

/// Multi-character operators, matched longest-first.
const MULTI_CHAR_SYMBOLS: &[(&str, TokenKind)] = &[
    ("//", TokenKind::SlashSlash),
    ("**", TokenKind::StarStar),
    ("==", TokenKind::EqEq),
    ("!=", TokenKind::NotEq),
    ("<=", TokenKind::Le),
    (">=", TokenKind::Ge),
    ("+=", TokenKind::PlusEq),
    ("-=", TokenKind::MinusEq),
    ("*=", TokenKind::StarEq),
    ("/=", TokenKind::SlashEq),
    ("//=", TokenKind::SlashSlashEq),
    ("**=", TokenKind::StarStarEq),
];

/// Reserved words, including the word operators `or` and `and`.
const KEYWORDS: &[(&str, TokenKind)] = &[
    ("or", TokenKind::Or),
    ("and", TokenKind::And),
    ("jutsu", TokenKind::Jutsu),
    ("True", TokenKind::True),
    ("False", TokenKind::False),
    ("if", TokenKind::If),
    ("elif", TokenKind::Elif),
    ("else", TokenKind::Else),
    ("release", TokenKind::Release),
    ("print", TokenKind::Print),
];

fn keyword_table() -> &'static FxHashMap<&'static str, TokenKind> {
    static TABLE: OnceLock<FxHashMap<&'static str, TokenKind>> = OnceLock::new();
    TABLE.get_or_init(|| KEYWORDS.iter().copied().collect())
}

fn single_char_symbol(ch: char) -> Option<TokenKind> {
    let kind = match ch {
        '(' => TokenKind::LParen,
        ')' => TokenKind::RParen,
        '[' => TokenKind::LBracket,
        ']' => TokenKind::RBracket,
        '{' => TokenKind::LBrace,
        '}' => TokenKind::RBrace,
        ':' => TokenKind::Colon,
        '!' => TokenKind::Bang,
        '+' => TokenKind::Plus,
        '-' => TokenKind::Minus,
        '*' => TokenKind::Star,
        '/' => TokenKind::Slash,
        '%' => TokenKind::Percent,
        '<' => TokenKind::Lt,
        '>' => TokenKind::Gt,
        '=' => TokenKind::Eq,
        ',' => TokenKind::Comma,
        '.' => TokenKind::Dot,
        _ => return None,
    };
    Some(kind)
}

/// A single lexical unit.
///
/// Literal kinds (`Int`, `Str`, `Name`) carry the matched text in `lexeme`
/// (string literals without their quotes); every other kind carries `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: Option<String>,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, location: SourceLocation) -> Self {
        Self {
            kind,
            lexeme: None,
            location,
        }
    }

    pub fn literal(kind: TokenKind, lexeme: String, location: SourceLocation) -> Self {
        Self {
            kind,
            lexeme: Some(lexeme),
            location,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn lexeme(&self) -> Option<&str> {
        self.lexeme.as_deref()
    }

    pub fn line(&self) -> usize {
        self.location.line
    }

    /// Human-readable description used in error messages.
    pub fn describe(&self) -> String {
        match (&self.kind, &self.lexeme) {
            (TokenKind::Name, Some(name)) => format!("name '{}'", name),
            (TokenKind::Int, Some(digits)) => format!("integer literal {}", digits),
            (TokenKind::Str, Some(text)) => format!("string literal \"{}\"", text),
            (kind, _) => kind.to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.lexeme {
            Some(lexeme) => write!(f, "{{{}, {}}}", self.kind.name(), lexeme),
            None => write!(f, "{{{}}}", self.kind.name()),
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("Unreadable or invalid character '{ch}' at {location}")]
    UnreadableCharacter { ch: char, location: SourceLocation },

    #[error("Unterminated string literal starting at {location}")]
    UnterminatedString { location: SourceLocation },
}

impl LexError {
    pub fn location(&self) -> SourceLocation {
        match self {
            LexError::UnreadableCharacter { location, .. }
            | LexError::UnterminatedString { location } => *location,
        }
    }
}

pub type LexResult<T> = Result<T, LexError>;

/// Lexer for Jutsu source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    /// Number of currently open brackets of any kind.
    depth: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            depth: 0,
        }
    }

    /// Tokenize the entire input. The last token is always `Eof`.
    pub fn tokenize(&mut self) -> LexResult<Vec<Token>> {
        let mut tokens = Vec::new();

        while let Some(ch) = self.peek() {
            match ch {
                ' ' | '\t' | '\r' => {
                    self.advance();
                }
                '\n' => {
                    let loc = self.current_location();
                    self.advance();
                    if self.depth == 0 {
                        tokens.push(Token::new(TokenKind::Newline, loc));
                    }
                }
                '#' => self.skip_comment(),
                _ => {
                    let token = self.next_token(ch)?;
                    trace!(token = %token, line = token.line(), "lexed token");
                    tokens.push(token);
                }
            }
        }

        tokens.push(Token::new(TokenKind::Eof, self.current_location()));
        debug!(tokens = tokens.len(), lines = self.line, "tokenized source");
        Ok(tokens)
    }

    /// Get next token. Rules are tried in a fixed order: multi-character
    /// symbols, single-character symbols, integers, strings, then words
    /// (keywords or names).
    fn next_token(&mut self, ch: char) -> LexResult<Token> {
        let loc = self.current_location();

        if let Some((kind, len)) = self.longest_multi_char_match() {
            for _ in 0..len {
                self.advance();
            }
            return Ok(Token::new(kind, loc));
        }

        if let Some(kind) = single_char_symbol(ch) {
            self.advance();
            if kind.opens_bracket() {
                self.depth += 1;
            } else if kind.closes_bracket() {
                self.depth = self.depth.saturating_sub(1);
            }
            return Ok(Token::new(kind, loc));
        }

        match ch {
            '0'..='9' => Ok(self.integer_literal(loc)),
            '"' => self.string_literal(loc),
            'a'..='z' | 'A'..='Z' => Ok(self.word(loc)),
            _ => Err(LexError::UnreadableCharacter { ch, location: loc }),
        }
    }

    /// Try every table entry and keep the longest one that matches here.
    fn longest_multi_char_match(&self) -> Option<(TokenKind, usize)> {
        let mut best: Option<(TokenKind, usize)> = None;

        for &(text, kind) in MULTI_CHAR_SYMBOLS {
            let len = text.len();
            if best.is_some_and(|(_, best_len)| best_len >= len) {
                continue;
            }
            if self.matches_at(text) {
                best = Some((kind, len));
            }
        }

        best
    }

    fn matches_at(&self, text: &str) -> bool {
        text.chars()
            .enumerate()
            .all(|(i, expected)| self.peek_ahead(i) == Some(expected))
    }

    /// Parse unsigned integer literal (maximal digit run, kept as text)
    fn integer_literal(&mut self, loc: SourceLocation) -> Token {
        let mut digits = String::new();
        while let Some(ch) = self.peek().filter(char::is_ascii_digit) {
            digits.push(ch);
            self.advance();
        }
        Token::literal(TokenKind::Int, digits, loc)
    }

    /// Parse string literal. The lexeme is the raw text between the quotes;
    /// a backslash keeps the following character from closing the literal.
    fn string_literal(&mut self, loc: SourceLocation) -> LexResult<Token> {
        self.advance(); // opening quote
        let mut contents = String::new();

        while let Some(ch) = self.advance() {
            match ch {
                '"' => return Ok(Token::literal(TokenKind::Str, contents, loc)),
                '\\' => {
                    contents.push(ch);
                    match self.advance() {
                        Some(escaped) => contents.push(escaped),
                        None => break,
                    }
                }
                _ => contents.push(ch),
            }
        }

        Err(LexError::UnterminatedString { location: loc })
    }

    /// Parse keyword or name (maximal run of ASCII letters). A keyword only
    /// matches the whole run, so `order` is a name rather than `or` + `der`.
    fn word(&mut self, loc: SourceLocation) -> Token {
        let mut ident = String::new();
        while let Some(ch) = self.peek().filter(char::is_ascii_alphabetic) {
            ident.push(ch);
            self.advance();
        }

        match keyword_table().get(ident.as_str()) {
            Some(&kind) => Token::new(kind, loc),
            None => Token::literal(TokenKind::Name, ident, loc),
        }
    }

    /// Skip a `#` comment through and including its terminating newline
    fn skip_comment(&mut self) {
        while let Some(ch) = self.advance() {
            if ch == '\n' {
                break;
            }
        }
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    /// Get current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

/// Tokenize `source` in one call.
pub fn tokenize(source: &str) -> LexResult<Vec<Token>> {
    Lexer::new(source).tokenize()
}
