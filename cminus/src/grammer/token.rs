use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Token {
            kind,
            text: text.into(),
            line,
        }
    }

    /// How the token reads inside an error message
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of input".to_string(),
            _ => format!("`{}`", self.text),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Double character tokens
    EqualEqual,  // '=='
    ExclEqual,   // '!='
    LAngleEqual, // '<='
    RAngleEqual, // '>='

    // Single character tokens
    Equal,     // '='
    Plus,      // '+'
    Minus,     // '-'
    Star,      // '*'
    Slash,     // '/'
    LAngle,    // '<'
    RAngle,    // '>'
    Semicolon, // ';'
    Comma,     // ','
    LParen,    // '('
    RParen,    // ')'
    LBracket,  // '['
    RBracket,  // ']'
    LCurly,    // '{'
    RCurly,    // '}'

    // Keywords
    KwIf,     // "if"
    KwElse,   // "else"
    KwInt,    // "int"
    KwReturn, // "return"
    KwVoid,   // "void"
    KwWhile,  // "while"
    KwInput,  // "input"
    KwOutput, // "output"

    // Identifier
    Ident,

    // Literals
    Number,

    // Special
    Eof,
    Error,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TokenKind::*;
        let text = match self {
            EqualEqual => "`==`",
            ExclEqual => "`!=`",
            LAngleEqual => "`<=`",
            RAngleEqual => "`>=`",
            Equal => "`=`",
            Plus => "`+`",
            Minus => "`-`",
            Star => "`*`",
            Slash => "`/`",
            LAngle => "`<`",
            RAngle => "`>`",
            Semicolon => "`;`",
            Comma => "`,`",
            LParen => "`(`",
            RParen => "`)`",
            LBracket => "`[`",
            RBracket => "`]`",
            LCurly => "`{`",
            RCurly => "`}`",
            KwIf => "`if`",
            KwElse => "`else`",
            KwInt => "`int`",
            KwReturn => "`return`",
            KwVoid => "`void`",
            KwWhile => "`while`",
            KwInput => "`input`",
            KwOutput => "`output`",
            Ident => "identifier",
            Number => "number",
            Eof => "end of input",
            Error => "invalid token",
        };
        write!(f, "{}", text)
    }
}
