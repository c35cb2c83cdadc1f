use super::token::{Token, TokenKind};
use crate::error::{Diag, Error};
use std::str::Chars;

/// Source of tokens for the parser.
/// Once the input is exhausted every further call returns `Eof`.
pub trait TokenStream {
    fn next_token(&mut self) -> Token;

    /// Drain problems found while producing tokens
    fn take_diags(&mut self) -> Vec<Diag> {
        Vec::new()
    }
}

pub struct Lexer<'a> {
    iter: Chars<'a>,
    line: usize,
    diags: Vec<Diag>,
}

impl<'a> Lexer<'a> {
    pub fn new(code: &'a str) -> Self {
        Self {
            iter: code.chars(),
            line: 1,
            diags: Vec::new(),
        }
    }

    /// Tokenize the whole input, `Eof` included
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<Diag>) {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if eof {
                break;
            }
        }
        (tokens, self.diags)
    }
}

impl TokenStream for Lexer<'_> {
    fn next_token(&mut self) -> Token {
        loop {
            let ch0 = match self.peek_nth(0) {
                Some('\0') | None => return Token::new(TokenKind::Eof, "", self.line),
                Some(ch) => ch,
            };

            // 0. Skip whitespaces
            if ch0.is_whitespace() {
                self.consume();
                continue;
            }

            // 1. Double character token
            if let Some(ch1) = self.peek_nth(1) {
                // Comment
                if ch0 == '/' && ch1 == '*' {
                    self.consume();
                    self.consume();
                    self.skip_comment();
                    continue;
                }

                if let Some(kind) = double_char_token(ch0, ch1) {
                    let line = self.line;
                    self.consume();
                    self.consume();
                    return Token::new(kind, format!("{ch0}{ch1}"), line);
                }
            }

            // 2. Single character token
            if let Some(kind) = single_char_token(ch0) {
                let line = self.line;
                self.consume();
                return Token::new(kind, ch0.to_string(), line);
            }

            // 3. Number literal
            if ch0.is_ascii_digit() {
                return self.parse_number();
            }

            // 4. Identifier or keyword
            if ch0.is_ascii_alphabetic() {
                return self.parse_word();
            }

            // Error
            let line = self.line;
            self.consume();
            self.diags.push(Diag::error(line, Error::UnexpectedChar(ch0)));
            return Token::new(TokenKind::Error, ch0.to_string(), line);
        }
    }

    fn take_diags(&mut self) -> Vec<Diag> {
        std::mem::take(&mut self.diags)
    }
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

impl Lexer<'_> {
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.iter.clone().nth(n)
    }

    fn consume(&mut self) -> Option<char> {
        let ch = self.iter.next();
        if ch == Some('\n') {
            self.line += 1;
        }
        ch
    }

    fn take_while<F: Fn(char) -> bool>(&mut self, cond: F) -> String {
        let mut lexeme = String::new();
        while let Some(ch) = self.peek_nth(0).filter(|&ch| cond(ch)) {
            self.consume();
            lexeme.push(ch);
        }
        lexeme
    }
}

// ----------------------------------------------------------------------------
// Scanners
// ----------------------------------------------------------------------------

impl Lexer<'_> {
    // Called after the opening "/*"
    fn skip_comment(&mut self) {
        let line = self.line;
        loop {
            match self.peek_nth(0) {
                Some('\0') | None => {
                    self.diags.push(Diag::error(line, Error::UnterminatedComment));
                    return;
                }
                Some('*') if self.peek_nth(1) == Some('/') => {
                    self.consume();
                    self.consume();
                    return;
                }
                Some('/') if self.peek_nth(1) == Some('*') => {
                    self.diags.push(Diag::error(self.line, Error::NestedComment));
                    self.consume();
                    self.consume();
                }
                Some(_) => {
                    self.consume();
                }
            }
        }
    }

    fn parse_number(&mut self) -> Token {
        let line = self.line;
        let lexeme = self.take_while(|ch| ch.is_ascii_digit());
        match lexeme.parse::<i64>() {
            Ok(_) => Token::new(TokenKind::Number, lexeme, line),
            Err(_) => {
                self.diags
                    .push(Diag::error(line, Error::NumberOverflow(lexeme.clone())));
                Token::new(TokenKind::Error, lexeme, line)
            }
        }
    }

    // Identifiers are letters only
    fn parse_word(&mut self) -> Token {
        let line = self.line;
        let lexeme = self.take_while(|ch| ch.is_ascii_alphabetic());
        match keyword(&lexeme) {
            Some(kind) => Token::new(kind, lexeme, line),
            None => Token::new(TokenKind::Ident, lexeme, line),
        }
    }
}

fn double_char_token(ch0: char, ch1: char) -> Option<TokenKind> {
    match (ch0, ch1) {
        ('=', '=') => Some(TokenKind::EqualEqual),
        ('!', '=') => Some(TokenKind::ExclEqual),
        ('<', '=') => Some(TokenKind::LAngleEqual),
        ('>', '=') => Some(TokenKind::RAngleEqual),
        _ => None,
    }
}

fn single_char_token(ch: char) -> Option<TokenKind> {
    match ch {
        '=' => Some(TokenKind::Equal),
        '+' => Some(TokenKind::Plus),
        '-' => Some(TokenKind::Minus),
        '*' => Some(TokenKind::Star),
        '/' => Some(TokenKind::Slash),
        '<' => Some(TokenKind::LAngle),
        '>' => Some(TokenKind::RAngle),
        ';' => Some(TokenKind::Semicolon),
        ',' => Some(TokenKind::Comma),
        '(' => Some(TokenKind::LParen),
        ')' => Some(TokenKind::RParen),
        '[' => Some(TokenKind::LBracket),
        ']' => Some(TokenKind::RBracket),
        '{' => Some(TokenKind::LCurly),
        '}' => Some(TokenKind::RCurly),
        _ => None,
    }
}

fn keyword(s: &str) -> Option<TokenKind> {
    match s {
        "if" => Some(TokenKind::KwIf),
        "else" => Some(TokenKind::KwElse),
        "int" => Some(TokenKind::KwInt),
        "return" => Some(TokenKind::KwReturn),
        "void" => Some(TokenKind::KwVoid),
        "while" => Some(TokenKind::KwWhile),
        "input" => Some(TokenKind::KwInput),
        "output" => Some(TokenKind::KwOutput),
        _ => None,
    }
}
