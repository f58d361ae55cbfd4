#![forbid(unsafe_code)]

//! Recursive-descent parser for condition expressions
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expression  := and_expr ( "||" and_expr )*
//! and_expr    := comparison ( "&&" comparison )*
//! comparison  := primary ( ("==" | "!=" | "<" | "<=" | ">" | ">=") primary )*
//! primary     := literal | path | call | "(" expression ")"
//! path        := "$" IDENT ( "." IDENT | "[" INT "]" )*
//! call        := IDENT "(" ( expression ( "," expression )* )? ")"
//! ```
//!
//! Only equality is required by the check corpus today; the comparison and
//! logical tiers exist so the corpus can grow without a grammar redesign.

use crate::error::RuleSyntaxError;
use crate::expr::ast::{Accessor, BinaryOp, Expr, Literal};
use crate::expr::token::{SpannedToken, Token, tokenize};

/// Parses a complete expression, requiring all input to be consumed
pub fn parse_expression(text: &str) -> Result<Expr, RuleSyntaxError> {
    let tokens = tokenize(text)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        end: text.len(),
    };
    let expr = parser.expression()?;
    if let Some(extra) = parser.peek() {
        return Err(RuleSyntaxError::UnexpectedToken {
            token: extra.token.to_string(),
            position: extra.position,
        });
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
    /// Byte length of the source, reported as the position of a premature end
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&SpannedToken> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<SpannedToken> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Consumes the next token if it matches, returning whether it did
    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek().is_some_and(|t| &t.token == expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consumes the next token, requiring it to match
    fn expect(&mut self, expected: &Token, what: &str) -> Result<(), RuleSyntaxError> {
        match self.advance() {
            Some(t) if &t.token == expected => Ok(()),
            Some(t) => Err(RuleSyntaxError::UnexpectedToken {
                token: t.token.to_string(),
                position: t.position,
            }),
            None => Err(RuleSyntaxError::UnexpectedEnd {
                position: self.end,
                expected: what.to_string(),
            }),
        }
    }

    fn expression(&mut self) -> Result<Expr, RuleSyntaxError> {
        let mut lhs = self.and_expr()?;
        while self.eat(&Token::OrOr) {
            let rhs = self.and_expr()?;
            lhs = binary(BinaryOp::Or, lhs, rhs);
        }
        Ok(lhs)
    }

    fn and_expr(&mut self) -> Result<Expr, RuleSyntaxError> {
        let mut lhs = self.comparison()?;
        while self.eat(&Token::AndAnd) {
            let rhs = self.comparison()?;
            lhs = binary(BinaryOp::And, lhs, rhs);
        }
        Ok(lhs)
    }

    fn comparison(&mut self) -> Result<Expr, RuleSyntaxError> {
        let mut lhs = self.primary()?;
        loop {
            let op = match self.peek().map(|t| &t.token) {
                Some(Token::EqEq) => BinaryOp::Eq,
                Some(Token::NotEq) => BinaryOp::Ne,
                Some(Token::Lt) => BinaryOp::Lt,
                Some(Token::Le) => BinaryOp::Le,
                Some(Token::Gt) => BinaryOp::Gt,
                Some(Token::Ge) => BinaryOp::Ge,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.primary()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn primary(&mut self) -> Result<Expr, RuleSyntaxError> {
        let Some(next) = self.advance() else {
            return Err(RuleSyntaxError::UnexpectedEnd {
                position: self.end,
                expected: "an expression".to_string(),
            });
        };

        match next.token {
            Token::Str(s) => Ok(Expr::Literal(Literal::Str(s))),
            Token::Int(i) => Ok(Expr::Literal(Literal::Int(i))),
            Token::Float(x) => Ok(Expr::Literal(Literal::Float(x))),
            Token::True => Ok(Expr::Literal(Literal::Bool(true))),
            Token::False => Ok(Expr::Literal(Literal::Bool(false))),
            Token::Nil => Ok(Expr::Literal(Literal::Nil)),
            Token::Dollar => self.path(next.position),
            Token::Ident(name) => self.call(name, next.position),
            Token::LParen => {
                let inner = self.expression()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(inner)
            }
            other => Err(RuleSyntaxError::UnexpectedToken {
                token: other.to_string(),
                position: next.position,
            }),
        }
    }

    /// Parses the remainder of a path after its `$` sigil
    fn path(&mut self, sigil_position: usize) -> Result<Expr, RuleSyntaxError> {
        let root = match self.peek().map(|t| &t.token) {
            Some(Token::Ident(_)) => match self.advance() {
                Some(SpannedToken {
                    token: Token::Ident(name),
                    ..
                }) => name,
                _ => unreachable!("peeked an identifier"),
            },
            _ => {
                return Err(RuleSyntaxError::EmptyPath {
                    position: sigil_position,
                });
            }
        };

        let mut accessors = Vec::new();
        loop {
            if self.eat(&Token::Dot) {
                match self.advance() {
                    Some(SpannedToken {
                        token: Token::Ident(name),
                        ..
                    }) => accessors.push(Accessor::Key(name)),
                    Some(t) => {
                        return Err(RuleSyntaxError::UnexpectedToken {
                            token: t.token.to_string(),
                            position: t.position,
                        });
                    }
                    None => {
                        return Err(RuleSyntaxError::UnexpectedEnd {
                            position: self.end,
                            expected: "a path segment".to_string(),
                        });
                    }
                }
            } else if self.eat(&Token::LBracket) {
                match self.advance() {
                    Some(SpannedToken {
                        token: Token::Int(i),
                        position,
                    }) => {
                        if i < 0 {
                            return Err(RuleSyntaxError::UnexpectedToken {
                                token: i.to_string(),
                                position,
                            });
                        }
                        accessors.push(Accessor::Index(i as usize));
                    }
                    Some(t) => {
                        return Err(RuleSyntaxError::UnexpectedToken {
                            token: t.token.to_string(),
                            position: t.position,
                        });
                    }
                    None => {
                        return Err(RuleSyntaxError::UnexpectedEnd {
                            position: self.end,
                            expected: "a sequence index".to_string(),
                        });
                    }
                }
                self.expect(&Token::RBracket, "']'")?;
            } else {
                break;
            }
        }

        Ok(Expr::Path { root, accessors })
    }

    /// Parses a function call's argument list; a bare identifier without a
    /// following `(` is not a valid expression
    fn call(&mut self, name: String, position: usize) -> Result<Expr, RuleSyntaxError> {
        if !self.eat(&Token::LParen) {
            return Err(RuleSyntaxError::UnexpectedToken {
                token: name,
                position,
            });
        }

        let mut args = Vec::new();
        if !self.eat(&Token::RParen) {
            loop {
                args.push(self.expression()?);
                if self.eat(&Token::Comma) {
                    continue;
                }
                self.expect(&Token::RParen, "')'")?;
                break;
            }
        }

        Ok(Expr::Call { name, args })
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}
