use super::ast::{NodeId, Scope};
use super::lexer::TokenStream;
use super::token::Token;
use crate::error::{Diag, Error};

pub struct Parser<T: TokenStream> {
    tokens: T,
    current: Token,
    next_id: NodeId,
    scope: Scope,
    diags: Vec<Diag>,
}

impl<T: TokenStream> Parser<T> {
    pub fn new(mut tokens: T) -> Self {
        let current = tokens.next_token();
        Parser {
            tokens,
            current,
            next_id: 0,
            scope: Scope::Global,
            diags: Vec::new(),
        }
    }

    pub fn error(&mut self, e: Error) {
        self.diags.push(Diag::error(self.current.line, e));
    }

    /// Diagnostics of the token source and the parser, in line order
    pub fn getdiags(mut self) -> Vec<Diag> {
        let mut diags = self.tokens.take_diags();
        diags.append(&mut self.diags);
        diags.sort_by_key(|diag| diag.line);
        diags
    }

    pub fn node_id(&mut self) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Scope that usages parsed from now on belong to
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn set_scope(&mut self, scope: Scope) {
        self.scope = scope;
    }
}

impl<T: TokenStream> Parser<T> {
    /// Peek : Watch next token without consuming it
    pub fn peek(&self) -> &Token {
        &self.current
    }

    /// Next : Consume next token and return it
    pub fn next(&mut self) -> Token {
        let following = self.tokens.next_token();
        std::mem::replace(&mut self.current, following)
    }

    /// Peek and check next token is match with condition
    pub fn check_if<F: Fn(&Token) -> bool>(&self, cond: F) -> bool {
        cond(&self.current)
    }

    /// Consume if next token is match with condition
    pub fn consume_if<F: Fn(&Token) -> bool>(&mut self, cond: F) -> Option<Token> {
        if cond(&self.current) {
            Some(self.next())
        } else {
            None
        }
    }

    /// Next token must be match with condition.
    /// On mismatch the error is recorded and the token stays in place.
    pub fn expect_tobe<F: Fn(&Token) -> bool>(&mut self, cond: F, expected: &str) -> Option<Token> {
        if cond(&self.current) {
            Some(self.next())
        } else {
            self.unexpected(expected);
            None
        }
    }

    /// Record that the next token is not what the grammar allows here
    pub fn unexpected(&mut self, expected: &str) {
        let found = self.current.describe();
        self.error(Error::UnexpectedToken {
            found,
            expected: expected.to_string(),
        });
    }

    /// Record the next token as unexpected and drop it
    pub fn skip_unexpected(&mut self, expected: &str) {
        self.unexpected(expected);
        self.next();
    }
}

#[macro_export]
macro_rules! check {
    ($parser:expr, $kind:pat) => {
        $parser.check_if(|token| matches!(token.kind, $kind))
    };
}

#[macro_export]
macro_rules! expect {
    ($parser:expr, $kind:ident) => {
        $parser.expect_tobe(
            |token| token.kind == $crate::grammer::token::TokenKind::$kind,
            &$crate::grammer::token::TokenKind::$kind.to_string(),
        )
    };
}

#[macro_export]
macro_rules! optional {
    ($parser:expr, $trigger:pat, $following:expr) => {
        if check!($parser, $trigger) {
            $parser.next();
            Some($following)
        } else {
            None
        }
    };
    ($parser:expr, $trigger:pat) => {
        $parser.consume_if(|token| matches!(token.kind, $trigger))
    };
}

/// Parse repeated elements with optional delimiters
/// 3 args: { element } terminal (no delimiter)
/// 4 args: [ element { delimiter element } ] terminal (with delimiter)
#[macro_export]
macro_rules! repeat {
    // Without delimiter: { element } terminal
    ($parser:expr, $elem:expr, $terminal:pat) => {{
        let mut items = Vec::new();
        while !check!($parser, $terminal) {
            items.push($elem);
        }
        items
    }};

    // With delimiter: [ element { delimiter element } ] terminal
    ($parser:expr, $elem:expr, $delimiter:pat, $terminal:pat) => {{
        let mut items = Vec::new();
        if !check!($parser, $terminal) {
            items.push($elem);
            while optional!($parser, $delimiter).is_some() {
                items.push($elem);
            }
        }
        items
    }};
}
