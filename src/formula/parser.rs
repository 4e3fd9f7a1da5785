use super::{Connective, Formula, stream::Stream};
use crate::strings;
use std::fmt;
use thiserror::Error;
use ustr::Ustr;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at offset {pos}")]
pub struct FormulaError {
    pos: usize,
    kind: FormulaErrorKind,
}

impl FormulaError {
    fn new(pos: usize, kind: FormulaErrorKind) -> Self {
        Self { pos, kind }
    }

    /// Byte offset into the formula text.
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn kind(&self) -> &FormulaErrorKind {
        &self.kind
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormulaErrorKind {
    Empty,
    UnexpectedChar(char),
    UnknownWord(String),
    ExpectedOperand,
    UnclosedParen,
    TrailingInput,
}

impl fmt::Display for FormulaErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulaErrorKind::Empty => write!(f, "empty formula"),
            FormulaErrorKind::UnexpectedChar(c) => write!(f, "unexpected character `{c}`"),
            FormulaErrorKind::UnknownWord(w) => {
                write!(f, "unknown word `{w}` (atoms start with an uppercase letter)")
            }
            FormulaErrorKind::ExpectedOperand => write!(f, "expected an atom, `not`, or `(`"),
            FormulaErrorKind::UnclosedParen => write!(f, "expected `)`"),
            FormulaErrorKind::TrailingInput => write!(f, "expected a connective or end of formula"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Atom(Ustr),
    Conn(Connective),
    LeftParen,
    RightParen,
}

#[derive(Debug, Clone, Copy)]
struct Spanned {
    token: Token,
    pos: usize,
}

fn tokenize(text: &str) -> Result<Vec<Spanned>, FormulaError> {
    let mut stream = Stream::new(text);
    let mut tokens = Vec::new();

    loop {
        stream.skip_whitespace();
        let pos = stream.pos();
        let Some(char) = stream.peek() else {
            return Ok(tokens);
        };

        let token = match char {
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            '¬' => Token::Conn(Connective::Not),
            '∧' => Token::Conn(Connective::And),
            '∨' => Token::Conn(Connective::Or),
            '→' => Token::Conn(Connective::Imp),
            '↔' => Token::Conn(Connective::Iff),
            '⊥' => Token::Conn(Connective::Bot),
            c if c.is_ascii_alphabetic() => {
                let word = stream.take_while(|c| c.is_ascii_alphanumeric() || c == '_');
                tokens.push(Spanned {
                    token: word_token(word).ok_or_else(|| {
                        FormulaError::new(pos, FormulaErrorKind::UnknownWord(word.to_string()))
                    })?,
                    pos,
                });
                continue;
            }
            c => return Err(FormulaError::new(pos, FormulaErrorKind::UnexpectedChar(c))),
        };

        stream.pop();
        tokens.push(Spanned { token, pos });
    }
}

fn word_token(word: &str) -> Option<Token> {
    let word = Ustr::from(word);
    let conn = [
        (*strings::NOT, Connective::Not),
        (*strings::AND, Connective::And),
        (*strings::OR, Connective::Or),
        (*strings::IMP, Connective::Imp),
        (*strings::IFF, Connective::Iff),
        (*strings::BOT, Connective::Bot),
    ]
    .into_iter()
    .find_map(|(kw, conn)| (kw == word).then_some(conn));

    match conn {
        Some(conn) => Some(Token::Conn(conn)),
        None if word.starts_with(|c: char| c.is_ascii_uppercase()) => Some(Token::Atom(word)),
        None => None,
    }
}

struct Parser {
    tokens: Vec<Spanned>,
    next: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.next).map(|t| t.token)
    }

    fn pos(&self) -> usize {
        self.tokens.get(self.next).map_or(self.end, |t| t.pos)
    }

    fn pop(&mut self) -> Option<Token> {
        let token = self.peek()?;
        self.next += 1;
        Some(token)
    }

    fn error(&self, kind: FormulaErrorKind) -> FormulaError {
        FormulaError::new(self.pos(), kind)
    }

    // expr := term { "imp" expr | "iff" term }
    fn expr(&mut self) -> Result<Formula, FormulaError> {
        let mut node = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Conn(Connective::Imp)) => {
                    self.pop();
                    node = Formula::imp(node, self.expr()?);
                }
                Some(Token::Conn(Connective::Iff)) => {
                    self.pop();
                    node = Formula::iff(node, self.term()?);
                }
                _ => return Ok(node),
            }
        }
    }

    // term := factor { ("and" | "or") factor }
    fn term(&mut self) -> Result<Formula, FormulaError> {
        let mut node = self.factor()?;
        loop {
            match self.peek() {
                Some(Token::Conn(Connective::And)) => {
                    self.pop();
                    node = Formula::and(node, self.factor()?);
                }
                Some(Token::Conn(Connective::Or)) => {
                    self.pop();
                    node = Formula::or(node, self.factor()?);
                }
                _ => return Ok(node),
            }
        }
    }

    // factor := "(" expr ")" | "not" factor | atom | "bot"
    fn factor(&mut self) -> Result<Formula, FormulaError> {
        match self.peek() {
            Some(Token::LeftParen) => {
                self.pop();
                let inner = self.expr()?;
                if self.peek() != Some(Token::RightParen) {
                    return Err(self.error(FormulaErrorKind::UnclosedParen));
                }
                self.pop();
                Ok(inner)
            }
            Some(Token::Conn(Connective::Not)) => {
                self.pop();
                Ok(Formula::not(self.factor()?))
            }
            Some(Token::Conn(Connective::Bot)) => {
                self.pop();
                Ok(Formula::Bot)
            }
            Some(Token::Atom(name)) => {
                self.pop();
                Ok(Formula::Atom(name))
            }
            _ => Err(self.error(FormulaErrorKind::ExpectedOperand)),
        }
    }
}

pub fn parse_formula(text: &str) -> Result<Formula, FormulaError> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(FormulaError::new(0, FormulaErrorKind::Empty));
    }

    let mut parser = Parser {
        tokens,
        next: 0,
        end: text.len(),
    };
    let formula = parser.expr()?;

    if parser.peek().is_some() {
        return Err(parser.error(FormulaErrorKind::TrailingInput));
    }

    Ok(formula)
}
