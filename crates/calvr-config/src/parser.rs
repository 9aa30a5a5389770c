use crate::error::ParseError;
use crate::lexer::{Lexer, Spanned, Token};
use crate::tree::{ConfigTree, Entry, Section, Value};

// ── Parser ────────────────────────────────────────────────────────────────

pub struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Spanned>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn current_pos(&self) -> (usize, usize) {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|t| (t.line, t.col))
            .unwrap_or((1, 1))
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).map(|t| &t.token).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens.get(self.pos).map(|t| t.token.clone()).unwrap_or(Token::Eof);
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn err(&self, msg: impl Into<String>) -> ParseError {
        let (line, col) = self.current_pos();
        ParseError::new(msg, line, col)
    }

    // ── Document ──────────────────────────────────────────────────────────

    pub fn parse_document(&mut self) -> Result<ConfigTree, ParseError> {
        let root = self.parse_items(false)?;
        Ok(ConfigTree::new(root))
    }

    /// Parses `item*` up to `}` (when `nested`) or end of input.
    fn parse_items(&mut self, nested: bool) -> Result<Section, ParseError> {
        let mut section = Section::default();

        loop {
            match self.peek() {
                Token::RBrace if nested => {
                    self.advance();
                    return Ok(section);
                }
                Token::Eof if nested => return Err(self.err("unclosed '{' section")),
                Token::Eof => return Ok(section),
                Token::Ident(_) => section.entries.push(self.parse_item()?),
                tok => {
                    return Err(self.err(format!(
                        "unexpected {:?}, expected a setting name",
                        tok
                    )));
                }
            }
        }
    }

    // ── Item ──────────────────────────────────────────────────────────────

    fn parse_item(&mut self) -> Result<(String, Entry), ParseError> {
        let Token::Ident(name) = self.advance() else {
            return Err(self.err("expected a setting name"));
        };

        match self.peek() {
            Token::Colon => {
                self.advance();
                let value = self.parse_value()?;
                Ok((name, Entry::Value(value)))
            }
            Token::LBrace => {
                self.advance();
                let section = self.parse_items(true)?;
                Ok((name, Entry::Section(section)))
            }
            tok => Err(self.err(format!("expected ':' or '{{' after {:?}, got {:?}", name, tok))),
        }
    }

    // ── Value ─────────────────────────────────────────────────────────────

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        match self.advance() {
            Token::Str(s) => Ok(Value::Str(s)),
            Token::Number(n) => Ok(Value::Number(n)),
            Token::Color(c) => Ok(Value::Color(c)),
            Token::Ident(s) => Ok(Value::Ident(s)),
            tok => Err(self.err(format!("expected a value, got {:?}", tok))),
        }
    }
}

// ── Public parse entry point ──────────────────────────────────────────────

/// Parses a `.cvrc` source string into a [`ConfigTree`].
pub fn parse_str(src: &str) -> Result<ConfigTree, ParseError> {
    let tokens = Lexer::new(src).tokenize()?;
    Parser::new(tokens).parse_document()
}
