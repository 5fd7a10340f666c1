use crate::error::Span;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    // Single-character tokens
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,

    // One or two character tokens
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals
    Identifier,
    String,
    Number,
    BigInt,

    // Keywords
    And,
    Class,
    Const,
    Else,
    False,
    For,
    Fun,
    If,
    Let,
    Null,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,

    // Special
    Error,
    Eof,
}

impl TokenType {
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenType::And
                | TokenType::Class
                | TokenType::Const
                | TokenType::Else
                | TokenType::False
                | TokenType::For
                | TokenType::Fun
                | TokenType::If
                | TokenType::Let
                | TokenType::Null
                | TokenType::Or
                | TokenType::Print
                | TokenType::Return
                | TokenType::Super
                | TokenType::This
                | TokenType::True
                | TokenType::Var
                | TokenType::While
        )
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            TokenType::LeftParen => "LEFT_PAREN",
            TokenType::RightParen => "RIGHT_PAREN",
            TokenType::LeftBrace => "LEFT_BRACE",
            TokenType::RightBrace => "RIGHT_BRACE",
            TokenType::Comma => "COMMA",
            TokenType::Dot => "DOT",
            TokenType::Minus => "MINUS",
            TokenType::Plus => "PLUS",
            TokenType::Semicolon => "SEMICOLON",
            TokenType::Slash => "SLASH",
            TokenType::Star => "STAR",
            TokenType::Bang => "BANG",
            TokenType::BangEqual => "BANG_EQUAL",
            TokenType::Equal => "EQUAL",
            TokenType::EqualEqual => "EQUAL_EQUAL",
            TokenType::Greater => "GREATER",
            TokenType::GreaterEqual => "GREATER_EQUAL",
            TokenType::Less => "LESS",
            TokenType::LessEqual => "LESS_EQUAL",
            TokenType::Identifier => "IDENTIFIER",
            TokenType::String => "STRING",
            TokenType::Number => "NUMBER",
            TokenType::BigInt => "BIGINT",
            TokenType::And => "AND",
            TokenType::Class => "CLASS",
            TokenType::Const => "CONST",
            TokenType::Else => "ELSE",
            TokenType::False => "FALSE",
            TokenType::For => "FOR",
            TokenType::Fun => "FUN",
            TokenType::If => "IF",
            TokenType::Let => "LET",
            TokenType::Null => "NULL",
            TokenType::Or => "OR",
            TokenType::Print => "PRINT",
            TokenType::Return => "RETURN",
            TokenType::Super => "SUPER",
            TokenType::This => "THIS",
            TokenType::True => "TRUE",
            TokenType::Var => "VAR",
            TokenType::While => "WHILE",
            TokenType::Error => "ERROR",
            TokenType::Eof => "EOF",
        };
        f.write_str(name)
    }
}

/// A classified view into the source buffer.
///
/// For [`TokenType::Error`] the lexeme is a static diagnostic message rather
/// than source text; the span still points at the offending source range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub token_type: TokenType,
    pub lexeme: &'src str,
    pub span: Span,
    pub line: usize,
    /// Set only on error tokens.
    pub error: Option<LexErrorKind>,
}

impl<'src> Token<'src> {
    pub fn new(token_type: TokenType, lexeme: &'src str, span: Span, line: usize) -> Self {
        Self {
            token_type,
            lexeme,
            span,
            line,
            error: None,
        }
    }

    pub fn lex_error(kind: LexErrorKind, span: Span, line: usize) -> Self {
        Self {
            token_type: TokenType::Error,
            lexeme: kind.message(),
            span,
            line,
            error: Some(kind),
        }
    }

    /// Number of source bytes covered by the token.
    pub fn len(&self) -> usize {
        self.span.len()
    }

    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    pub fn is_error(&self) -> bool {
        self.token_type == TokenType::Error
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexErrorKind {
    UnterminatedString,
    UnexpectedCharacter,
}

impl LexErrorKind {
    pub fn message(self) -> &'static str {
        match self {
            LexErrorKind::UnterminatedString => "Unterminated string.",
            LexErrorKind::UnexpectedCharacter => "Unexpected character.",
        }
    }

    pub fn help(self) -> Option<&'static str> {
        match self {
            LexErrorKind::UnterminatedString => Some("close the string with a '\"' before the end of the file"),
            LexErrorKind::UnexpectedCharacter => None,
        }
    }
}

/// Single-pass scanner. Each instance is its own cursor, so independent
/// scans never share state.
#[derive(Debug, Clone)]
pub struct Scanner<'src> {
    source: &'src str,
    start: usize,
    current: usize,
    line: usize,
    done: bool,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            start: 0,
            current: 0,
            line: 1,
            done: false,
        }
    }

    /// An absent source scans as the empty buffer.
    pub fn from_optional(source: Option<&'src str>) -> Self {
        Self::new(source.unwrap_or(""))
    }

    pub fn line(&self) -> usize {
        self.line
    }

    /// Scans the next token. Once the end of input is reached every further
    /// call returns another `Eof` token at the same position.
    pub fn scan_token(&mut self) -> Token<'src> {
        loop {
            self.skip_whitespace();
            self.start = self.current;

            if self.is_at_end() {
                return self.make_token(TokenType::Eof);
            }

            let c = self.advance();

            let token_type = match c {
                b'(' => TokenType::LeftParen,
                b')' => TokenType::RightParen,
                b'{' => TokenType::LeftBrace,
                b'}' => TokenType::RightBrace,
                b';' => TokenType::Semicolon,
                b',' => TokenType::Comma,
                b'.' => TokenType::Dot,
                b'-' => TokenType::Minus,
                b'+' => TokenType::Plus,
                b'*' => TokenType::Star,
                b'/' => {
                    if self.match_byte(b'/') {
                        // Comment goes until end of line
                        while self.peek() != b'\n' && !self.is_at_end() {
                            self.advance();
                        }
                        continue;
                    }
                    TokenType::Slash
                }
                b'!' => self.either(b'=', TokenType::BangEqual, TokenType::Bang),
                b'=' => self.either(b'=', TokenType::EqualEqual, TokenType::Equal),
                b'<' => self.either(b'=', TokenType::LessEqual, TokenType::Less),
                b'>' => self.either(b'=', TokenType::GreaterEqual, TokenType::Greater),
                b'"' => return self.string(),
                c if is_digit(c) => return self.number(),
                c if is_alpha(c) => return self.identifier(),
                c => {
                    // Swallow the rest of a multi-byte char so spans stay on
                    // char boundaries.
                    if !c.is_ascii() {
                        while !self.is_at_end() && !self.source.is_char_boundary(self.current) {
                            self.current += 1;
                        }
                    }
                    return self.error_token(LexErrorKind::UnexpectedCharacter);
                }
            };

            return self.make_token(token_type);
        }
    }

    fn skip_whitespace(&mut self) {
        loop {
            match self.peek() {
                b' ' | b'\r' | b'\t' => {
                    self.advance();
                }
                b'\n' => {
                    self.line += 1;
                    self.advance();
                }
                _ => return,
            }
        }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> u8 {
        let c = self.peek();
        self.current += 1;
        c
    }

    fn peek(&self) -> u8 {
        self.source.as_bytes().get(self.current).copied().unwrap_or(b'\0')
    }

    fn peek_next(&self) -> u8 {
        self.source.as_bytes().get(self.current + 1).copied().unwrap_or(b'\0')
    }

    fn match_byte(&mut self, expected: u8) -> bool {
        if self.is_at_end() || self.peek() != expected {
            false
        } else {
            self.current += 1;
            true
        }
    }

    fn either(&mut self, expected: u8, matched: TokenType, otherwise: TokenType) -> TokenType {
        if self.match_byte(expected) {
            matched
        } else {
            otherwise
        }
    }

    fn string(&mut self) -> Token<'src> {
        while self.peek() != b'"' && !self.is_at_end() {
            if self.peek() == b'\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            return self.error_token(LexErrorKind::UnterminatedString);
        }

        // The closing quote.
        self.advance();
        self.make_token(TokenType::String)
    }

    fn number(&mut self) -> Token<'src> {
        while is_digit(self.peek()) {
            self.advance();
        }

        if self.peek() == b'.' && is_digit(self.peek_next()) {
            self.advance();
            while is_digit(self.peek()) {
                self.advance();
            }
        } else if self.peek() == b'n' {
            self.advance();
            return self.make_token(TokenType::BigInt);
        }

        self.make_token(TokenType::Number)
    }

    fn identifier(&mut self) -> Token<'src> {
        while is_alpha_numeric(self.peek()) {
            self.advance();
        }
        let token_type = self.identifier_type();
        self.make_token(token_type)
    }

    fn identifier_type(&self) -> TokenType {
        let text = &self.source.as_bytes()[self.start..self.current];
        match text[0] {
            b'a' => check_keyword(text, 1, b"nd", TokenType::And),
            b'c' if text.len() > 1 => match text[1] {
                b'l' => check_keyword(text, 2, b"ass", TokenType::Class),
                b'o' => check_keyword(text, 2, b"nst", TokenType::Const),
                _ => TokenType::Identifier,
            },
            b'e' => check_keyword(text, 1, b"lse", TokenType::Else),
            b'f' if text.len() > 1 => match text[1] {
                b'a' => check_keyword(text, 2, b"lse", TokenType::False),
                b'o' => check_keyword(text, 2, b"r", TokenType::For),
                b'u' => check_keyword(text, 2, b"n", TokenType::Fun),
                _ => TokenType::Identifier,
            },
            b'i' => check_keyword(text, 1, b"f", TokenType::If),
            b'l' => check_keyword(text, 1, b"et", TokenType::Let),
            b'n' => check_keyword(text, 1, b"ull", TokenType::Null),
            b'o' => check_keyword(text, 1, b"r", TokenType::Or),
            b'p' => check_keyword(text, 1, b"rint", TokenType::Print),
            b'r' => check_keyword(text, 1, b"eturn", TokenType::Return),
            b's' => check_keyword(text, 1, b"uper", TokenType::Super),
            b't' if text.len() > 1 => match text[1] {
                b'h' => check_keyword(text, 2, b"is", TokenType::This),
                b'r' => check_keyword(text, 2, b"ue", TokenType::True),
                _ => TokenType::Identifier,
            },
            b'v' => check_keyword(text, 1, b"ar", TokenType::Var),
            b'w' => check_keyword(text, 1, b"hile", TokenType::While),
            _ => TokenType::Identifier,
        }
    }

    fn make_token(&self, token_type: TokenType) -> Token<'src> {
        Token::new(
            token_type,
            &self.source[self.start..self.current],
            Span::new(self.start, self.current),
            self.line,
        )
    }

    fn error_token(&self, kind: LexErrorKind) -> Token<'src> {
        Token::lex_error(kind, Span::new(self.start, self.current), self.line)
    }
}

impl<'src> Iterator for Scanner<'src> {
    type Item = Token<'src>;

    /// Yields every token up to and including the end-of-input token.
    fn next(&mut self) -> Option<Token<'src>> {
        if self.done {
            return None;
        }
        let token = self.scan_token();
        if token.token_type == TokenType::Eof {
            self.done = true;
        }
        Some(token)
    }
}

/// Scans the whole source, end-of-input token included.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    Scanner::new(source).collect()
}

/// Exact suffix and exact total length; a shared prefix alone never matches.
fn check_keyword(text: &[u8], offset: usize, rest: &[u8], token_type: TokenType) -> TokenType {
    if text.len() == offset + rest.len() && &text[offset..] == rest {
        token_type
    } else {
        TokenType::Identifier
    }
}

pub fn is_digit(c: u8) -> bool {
    c.is_ascii_digit()
}

pub fn is_alpha(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_alpha_numeric(c: u8) -> bool {
    is_alpha(c) || is_digit(c)
}
