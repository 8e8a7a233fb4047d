//! Lexical scanner for Amber source text.

use codemap::{File, Span};
use smol_str::SmolStr;

use crate::errors::{Error, ErrorKind, EvalResult};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum TokenKind {
    Int(i64),
    Float(f64),
    Str(String),
    Ident(SmolStr),

    KwFn,
    KwUse,
    KwLet,
    KwIf,
    KwElse,
    KwTrue,
    KwFalse,
    KwNull,

    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    Assign,

    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    AndAnd,
    OrOr,

    Eof,
}

impl TokenKind {
    /// Short description used in parser error messages.
    pub(crate) fn describe(&self) -> String {
        match self {
            TokenKind::Int(_) => "integer literal".into(),
            TokenKind::Float(_) => "float literal".into(),
            TokenKind::Str(_) => "string literal".into(),
            TokenKind::Ident(name) => format!("identifier '{}'", name),
            TokenKind::KwFn => "'fn'".into(),
            TokenKind::KwUse => "'use'".into(),
            TokenKind::KwLet => "'let'".into(),
            TokenKind::KwIf => "'if'".into(),
            TokenKind::KwElse => "'else'".into(),
            TokenKind::KwTrue => "'true'".into(),
            TokenKind::KwFalse => "'false'".into(),
            TokenKind::KwNull => "'null'".into(),
            TokenKind::LParen => "'('".into(),
            TokenKind::RParen => "')'".into(),
            TokenKind::LBrace => "'{'".into(),
            TokenKind::RBrace => "'}'".into(),
            TokenKind::Comma => "','".into(),
            TokenKind::Semicolon => "';'".into(),
            TokenKind::Assign => "'='".into(),
            TokenKind::Eq => "'=='".into(),
            TokenKind::Ne => "'!='".into(),
            TokenKind::Lt => "'<'".into(),
            TokenKind::Le => "'<='".into(),
            TokenKind::Gt => "'>'".into(),
            TokenKind::Ge => "'>='".into(),
            TokenKind::Plus => "'+'".into(),
            TokenKind::Minus => "'-'".into(),
            TokenKind::Star => "'*'".into(),
            TokenKind::Slash => "'/'".into(),
            TokenKind::Percent => "'%'".into(),
            TokenKind::Bang => "'!'".into(),
            TokenKind::AndAnd => "'&&'".into(),
            TokenKind::OrOr => "'||'".into(),
            TokenKind::Eof => "end of input".into(),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

struct Lexer<'a> {
    file: &'a File,
    source: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn span(&self, lo: usize, hi: usize) -> Span {
        self.file.span.subspan(lo as u64, hi as u64)
    }

    fn error(&self, msg: impl Into<String>, lo: usize, hi: usize) -> Error {
        Error::new(
            ErrorKind::SyntaxError(msg.into()),
            self.span(lo, hi.min(self.source.len())),
        )
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else if c == '#' {
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.bump();
                }
            } else {
                break;
            }
        }
    }

    fn lex_string(&mut self, lo: usize) -> EvalResult<TokenKind> {
        let mut text = String::new();

        loop {
            match self.bump() {
                None | Some('\n') => {
                    return Err(self.error("unterminated string literal", lo, self.pos))
                }
                Some('"') => return Ok(TokenKind::Str(text)),
                Some('\\') => match self.bump() {
                    Some('"') => text.push('"'),
                    Some('\\') => text.push('\\'),
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some('r') => text.push('\r'),
                    other => {
                        return Err(self.error(
                            format!(
                                "unknown escape sequence '\\{}'",
                                other.map(String::from).unwrap_or_default()
                            ),
                            lo,
                            self.pos,
                        ))
                    }
                },
                Some(c) => text.push(c),
            }
        }
    }

    fn lex_number(&mut self, lo: usize) -> EvalResult<TokenKind> {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.bump();
        }

        // a '.' only belongs to the number if digits follow it
        let mut is_float = false;
        if self.peek() == Some('.') {
            let mut rest = self.source[self.pos..].chars();
            rest.next();
            if matches!(rest.next(), Some(c) if c.is_ascii_digit()) {
                is_float = true;
                self.bump();
                while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                    self.bump();
                }
            }
        }

        let text = &self.source[lo..self.pos];
        if is_float {
            match text.parse() {
                Ok(num) => Ok(TokenKind::Float(num)),
                Err(_) => Err(self.error("invalid float literal", lo, self.pos)),
            }
        } else {
            match text.parse() {
                Ok(num) => Ok(TokenKind::Int(num)),
                Err(_) => Err(self.error("integer literal out of range", lo, self.pos)),
            }
        }
    }

    fn lex_word(&mut self, lo: usize) -> TokenKind {
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.bump();
        }

        match &self.source[lo..self.pos] {
            "fn" => TokenKind::KwFn,
            "use" => TokenKind::KwUse,
            "let" => TokenKind::KwLet,
            "if" => TokenKind::KwIf,
            "else" => TokenKind::KwElse,
            "true" => TokenKind::KwTrue,
            "false" => TokenKind::KwFalse,
            "null" => TokenKind::KwNull,
            word => TokenKind::Ident(SmolStr::new(word)),
        }
    }

    fn next_token(&mut self) -> EvalResult<Token> {
        self.skip_trivia();

        let lo = self.pos;
        let kind = match self.bump() {
            None => TokenKind::Eof,

            Some('(') => TokenKind::LParen,
            Some(')') => TokenKind::RParen,
            Some('{') => TokenKind::LBrace,
            Some('}') => TokenKind::RBrace,
            Some(',') => TokenKind::Comma,
            Some(';') => TokenKind::Semicolon,
            Some('+') => TokenKind::Plus,
            Some('-') => TokenKind::Minus,
            Some('*') => TokenKind::Star,
            Some('/') => TokenKind::Slash,
            Some('%') => TokenKind::Percent,

            Some('=') => {
                if self.peek() == Some('=') {
                    self.bump();
                    TokenKind::Eq
                } else {
                    TokenKind::Assign
                }
            }

            Some('!') => {
                if self.peek() == Some('=') {
                    self.bump();
                    TokenKind::Ne
                } else {
                    TokenKind::Bang
                }
            }

            Some('<') => {
                if self.peek() == Some('=') {
                    self.bump();
                    TokenKind::Le
                } else {
                    TokenKind::Lt
                }
            }

            Some('>') => {
                if self.peek() == Some('=') {
                    self.bump();
                    TokenKind::Ge
                } else {
                    TokenKind::Gt
                }
            }

            Some('&') => {
                if self.peek() == Some('&') {
                    self.bump();
                    TokenKind::AndAnd
                } else {
                    return Err(self.error("expected '&&'", lo, self.pos));
                }
            }

            Some('|') => {
                if self.peek() == Some('|') {
                    self.bump();
                    TokenKind::OrOr
                } else {
                    return Err(self.error("expected '||'", lo, self.pos));
                }
            }

            Some('"') => self.lex_string(lo)?,

            Some(c) if c.is_ascii_digit() => self.lex_number(lo)?,
            Some(c) if c.is_ascii_alphabetic() || c == '_' => self.lex_word(lo),

            Some(c) => return Err(self.error(format!("unexpected character '{}'", c), lo, self.pos)),
        };

        Ok(Token {
            kind,
            span: self.span(lo, self.pos),
        })
    }
}

/// Scan the entire file into a token stream, ending with an `Eof`
/// token carrying the end-of-file span.
pub(crate) fn lex(file: &File) -> EvalResult<Vec<Token>> {
    let mut lexer = Lexer {
        file,
        source: file.source(),
        pos: 0,
    };

    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}
