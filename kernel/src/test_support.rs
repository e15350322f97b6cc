//! S-expression reader for terms, the inverse of `Display for Term`.
//!
//! Integers are de Bruijn indices, bare symbols are globals, and `_` stands
//! for a missing annotation.

use crate::ast::{Face, GlueBranch, SystemBranch, Term};
use std::iter::Peekable;
use std::rc::Rc;
use std::str::Chars;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unexpected EOF")]
    UnexpectedEof,
    #[error("Expected {0}")]
    Expected(String),
    #[error("Unknown token: {0}")]
    UnknownToken(String),
    #[error("Trailing input after term")]
    TrailingInput,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    LParen,
    RParen,
    Symbol(String),
    Int(usize),
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Lexer {
            chars: input.chars().peekable(),
        }
    }

    fn tokens(mut self) -> Result<Vec<Token>, ParseError> {
        let mut out = Vec::new();
        while let Some(tok) = self.next_token()? {
            out.push(tok);
        }
        Ok(out)
    }

    fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        while self.chars.next_if(|c| c.is_whitespace()).is_some() {}
        let Some(c) = self.chars.next() else {
            return Ok(None);
        };
        let tok = match c {
            '(' => Token::LParen,
            ')' => Token::RParen,
            c => {
                let mut s = String::from(c);
                while let Some(c) = self.chars.next_if(|c| !c.is_whitespace() && *c != '(' && *c != ')') {
                    s.push(c);
                }
                if s.chars().all(|c| c.is_ascii_digit()) {
                    Token::Int(s.parse().map_err(|_| ParseError::UnknownToken(s.clone()))?)
                } else {
                    Token::Symbol(s)
                }
            }
        };
        Ok(Some(tok))
    }
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

/// Parse a complete term, rejecting trailing input.
pub fn parse(input: &str) -> Result<Rc<Term>, ParseError> {
    let mut parser = Parser::new(input)?;
    let term = parser.parse_term()?;
    if parser.pos < parser.tokens.len() {
        return Err(ParseError::TrailingInput);
    }
    Ok(term)
}

impl Parser {
    pub fn new(input: &str) -> Result<Self, ParseError> {
        Ok(Parser {
            tokens: Lexer::new(input).tokens()?,
            pos: 0,
        })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Result<Token, ParseError> {
        let tok = self.tokens.get(self.pos).cloned().ok_or(ParseError::UnexpectedEof)?;
        self.pos += 1;
        Ok(tok)
    }

    pub fn parse_term(&mut self) -> Result<Rc<Term>, ParseError> {
        match self.next()? {
            Token::Int(n) => Ok(Term::var(n)),
            Token::Symbol(s) => Ok(match s.as_str() {
                "I" => Term::interval(),
                "i0" => Term::i0(),
                "i1" => Term::i1(),
                _ => Term::global(s),
            }),
            Token::LParen => {
                let head = self.expect_symbol()?;
                let term = self.parse_form(&head)?;
                self.expect_rparen()?;
                Ok(term)
            }
            Token::RParen => Err(ParseError::Expected("term".to_string())),
        }
    }

    fn parse_form(&mut self, head: &str) -> Result<Rc<Term>, ParseError> {
        let term = match head {
            "sort" => Term::sort(self.expect_int()?),
            "ivar" => Term::ivar(self.expect_int()?),
            "pi" => {
                let (h, a, b) = (self.expect_symbol()?, self.parse_term()?, self.parse_term()?);
                Term::pi(h, a, b)
            }
            "sigma" => {
                let (h, a, b) = (self.expect_symbol()?, self.parse_term()?, self.parse_term()?);
                Term::sigma(h, a, b)
            }
            "lam" => {
                let h = self.expect_symbol()?;
                let ann = self.parse_opt()?;
                let body = self.parse_term()?;
                Rc::new(Term::Lam(h, ann, body))
            }
            "app" => {
                let f = self.parse_term()?;
                let args = self.parse_until_rparen()?;
                if args.is_empty() {
                    return Err(ParseError::Expected("argument".to_string()));
                }
                Term::apps(f, args)
            }
            "pair" => Term::pair(self.parse_term()?, self.parse_term()?),
            "fst" => Term::fst(self.parse_term()?),
            "snd" => Term::snd(self.parse_term()?),
            "let" => {
                let h = self.expect_symbol()?;
                let ann = self.parse_opt()?;
                let (val, body) = (self.parse_term()?, self.parse_term()?);
                Term::let_in(h, ann, val, body)
            }
            "id" => Term::id(self.parse_term()?, self.parse_term()?, self.parse_term()?),
            "refl" => Term::refl(self.parse_term()?, self.parse_term()?),
            "J" => Term::j(
                self.parse_term()?,
                self.parse_term()?,
                self.parse_term()?,
                self.parse_term()?,
                self.parse_term()?,
                self.parse_term()?,
            ),
            "path" => Term::path(self.parse_term()?, self.parse_term()?, self.parse_term()?),
            "pathp" => Term::pathp(self.parse_term()?, self.parse_term()?, self.parse_term()?),
            "plam" => {
                let h = self.expect_symbol()?;
                Term::plam(h, self.parse_term()?)
            }
            "papp" => Term::papp(self.parse_term()?, self.parse_term()?),
            "transport" => Term::transport(self.parse_term()?, self.parse_term()?),
            "partial" => {
                let phi = self.parse_face()?;
                Rc::new(Term::Partial(phi, self.parse_term()?))
            }
            "system" => Rc::new(Term::System(self.parse_system_branches()?)),
            "comp" | "fill" => {
                let binder = self.expect_symbol()?;
                let ty = self.parse_term()?;
                let phi = self.parse_face()?;
                let (tube, base) = (self.parse_term()?, self.parse_term()?);
                Rc::new(if head == "comp" {
                    Term::Comp { binder, ty, phi, tube, base }
                } else {
                    Term::Fill { binder, ty, phi, tube, base }
                })
            }
            "hcomp" => {
                let ty = self.parse_term()?;
                let phi = self.parse_face()?;
                let (tube, base) = (self.parse_term()?, self.parse_term()?);
                Rc::new(Term::HComp { ty, phi, tube, base })
            }
            "glue" => {
                let a = self.parse_term()?;
                let mut branches = Vec::new();
                while self.peek() == Some(&Token::LParen) {
                    self.next()?;
                    let phi = self.parse_face()?;
                    let (ty, equiv) = (self.parse_term()?, self.parse_term()?);
                    self.expect_rparen()?;
                    branches.push(GlueBranch::new(phi, ty, equiv));
                }
                Rc::new(Term::Glue(a, branches))
            }
            "glue-elem" => {
                let base = self.parse_term()?;
                Rc::new(Term::GlueElem(self.parse_system_branches()?, base))
            }
            "unglue" => {
                let first = self.parse_term()?;
                if self.peek() == Some(&Token::RParen) {
                    Rc::new(Term::Unglue(None, first))
                } else {
                    Rc::new(Term::Unglue(Some(first), self.parse_term()?))
                }
            }
            "ua" => Term::ua(self.parse_term()?, self.parse_term()?, self.parse_term()?),
            "ua-beta" => Rc::new(Term::UABeta(self.parse_term()?, self.parse_term()?)),
            "hit" => {
                let hit = self.expect_symbol()?;
                let ctor = self.expect_symbol()?;
                self.expect_lparen()?;
                let args = self.parse_until_rparen()?;
                self.expect_rparen()?;
                self.expect_lparen()?;
                let iargs = self.parse_until_rparen()?;
                self.expect_rparen()?;
                Rc::new(Term::HITApp { hit, ctor, args, iargs })
            }
            _ => return Err(ParseError::UnknownToken(head.to_string())),
        };
        Ok(term)
    }

    fn parse_opt(&mut self) -> Result<Option<Rc<Term>>, ParseError> {
        if self.peek() == Some(&Token::Symbol("_".to_string())) {
            self.next()?;
            Ok(None)
        } else {
            self.parse_term().map(Some)
        }
    }

    /// Terms up to, but not including, the next closing paren.
    fn parse_until_rparen(&mut self) -> Result<Vec<Rc<Term>>, ParseError> {
        let mut out = Vec::new();
        while !matches!(self.peek(), Some(Token::RParen) | None) {
            out.push(self.parse_term()?);
        }
        Ok(out)
    }

    fn parse_system_branches(&mut self) -> Result<Vec<SystemBranch>, ParseError> {
        let mut branches = Vec::new();
        while self.peek() == Some(&Token::LParen) {
            self.next()?;
            let phi = self.parse_face()?;
            let term = self.parse_term()?;
            self.expect_rparen()?;
            branches.push(SystemBranch::new(phi, term));
        }
        Ok(branches)
    }

    pub fn parse_face(&mut self) -> Result<Face, ParseError> {
        match self.next()? {
            Token::Symbol(s) if s == "top" => Ok(Face::Top),
            Token::Symbol(s) if s == "bot" => Ok(Face::Bot),
            Token::LParen => {
                let head = self.expect_symbol()?;
                let face = match head.as_str() {
                    "=" => {
                        let i = self.expect_int()?;
                        match self.expect_int()? {
                            0 => Face::Eq(i, false),
                            1 => Face::Eq(i, true),
                            _ => return Err(ParseError::Expected("0 or 1".to_string())),
                        }
                    }
                    "and" => Face::And(Box::new(self.parse_face()?), Box::new(self.parse_face()?)),
                    "or" => Face::Or(Box::new(self.parse_face()?), Box::new(self.parse_face()?)),
                    _ => return Err(ParseError::UnknownToken(head)),
                };
                self.expect_rparen()?;
                Ok(face)
            }
            _ => Err(ParseError::Expected("face".to_string())),
        }
    }

    fn expect_symbol(&mut self) -> Result<String, ParseError> {
        match self.next()? {
            Token::Symbol(s) => Ok(s),
            _ => Err(ParseError::Expected("symbol".to_string())),
        }
    }

    fn expect_lparen(&mut self) -> Result<(), ParseError> {
        match self.next()? {
            Token::LParen => Ok(()),
            _ => Err(ParseError::Expected("(".to_string())),
        }
    }

    fn expect_rparen(&mut self) -> Result<(), ParseError> {
        match self.next()? {
            Token::RParen => Ok(()),
            _ => Err(ParseError::Expected(")".to_string())),
        }
    }

    fn expect_int(&mut self) -> Result<usize, ParseError> {
        match self.next()? {
            Token::Int(n) => Ok(n),
            _ => Err(ParseError::Expected("integer".to_string())),
        }
    }
}
