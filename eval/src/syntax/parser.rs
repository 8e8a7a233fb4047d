//! Recursive-descent parser producing the Amber syntax tree.

use std::rc::Rc;

use codemap::{File, Span};
use smol_str::SmolStr;

use crate::errors::{Error, ErrorKind, EvalResult};
use crate::value::Lambda;

use super::ast::{BinOp, Binding, Expr, Script, UnaryOp};
use super::lexer::{lex, Token, TokenKind};

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn next(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if &self.peek().kind == kind {
            self.next();
            return true;
        }

        false
    }

    fn expect(&mut self, kind: TokenKind) -> EvalResult<Token> {
        if self.peek().kind == kind {
            return Ok(self.next());
        }

        Err(self.unexpected(&format!("expected {}", kind.describe())))
    }

    fn unexpected(&self, what: &str) -> Error {
        let token = self.peek();
        Error::new(
            ErrorKind::SyntaxError(format!("{}, found {}", what, token.kind.describe())),
            token.span,
        )
    }

    fn expect_ident(&mut self) -> EvalResult<(SmolStr, Span)> {
        match self.peek().kind.clone() {
            TokenKind::Ident(name) => {
                let token = self.next();
                Ok((name, token.span))
            }
            _ => Err(self.unexpected("expected an identifier")),
        }
    }

    /// script := ('let' ident '=' expr ';')* expr?
    fn script(&mut self) -> EvalResult<Script> {
        let mut bindings = Vec::new();

        while self.peek().kind == TokenKind::KwLet {
            self.next();
            let (name, _) = self.expect_ident()?;
            self.expect(TokenKind::Assign)?;
            let value = self.expr()?;
            self.expect(TokenKind::Semicolon)?;

            bindings.push(Binding { name, value });
        }

        let result = if self.peek().kind == TokenKind::Eof {
            None
        } else {
            Some(self.expr()?)
        };

        if self.peek().kind != TokenKind::Eof {
            return Err(self.unexpected("expected end of script"));
        }

        Ok(Script { bindings, result })
    }

    fn expr(&mut self) -> EvalResult<Expr> {
        self.or_expr()
    }

    fn binary(
        &mut self,
        operand: fn(&mut Self) -> EvalResult<Expr>,
        table: &[(TokenKind, BinOp)],
    ) -> EvalResult<Expr> {
        let mut lhs = operand(self)?;

        'outer: loop {
            for (kind, op) in table {
                if self.eat(kind) {
                    let rhs = operand(self)?;
                    let span = lhs.span().merge(rhs.span());
                    lhs = Expr::Binary {
                        op: *op,
                        lhs: Box::new(lhs),
                        rhs: Box::new(rhs),
                        span,
                    };
                    continue 'outer;
                }
            }

            return Ok(lhs);
        }
    }

    fn or_expr(&mut self) -> EvalResult<Expr> {
        self.binary(Self::and_expr, &[(TokenKind::OrOr, BinOp::Or)])
    }

    fn and_expr(&mut self) -> EvalResult<Expr> {
        self.binary(Self::eq_expr, &[(TokenKind::AndAnd, BinOp::And)])
    }

    fn eq_expr(&mut self) -> EvalResult<Expr> {
        self.binary(
            Self::cmp_expr,
            &[(TokenKind::Eq, BinOp::Eq), (TokenKind::Ne, BinOp::Ne)],
        )
    }

    fn cmp_expr(&mut self) -> EvalResult<Expr> {
        self.binary(
            Self::add_expr,
            &[
                (TokenKind::Le, BinOp::Le),
                (TokenKind::Lt, BinOp::Lt),
                (TokenKind::Ge, BinOp::Ge),
                (TokenKind::Gt, BinOp::Gt),
            ],
        )
    }

    fn add_expr(&mut self) -> EvalResult<Expr> {
        self.binary(
            Self::mul_expr,
            &[(TokenKind::Plus, BinOp::Add), (TokenKind::Minus, BinOp::Sub)],
        )
    }

    fn mul_expr(&mut self) -> EvalResult<Expr> {
        self.binary(
            Self::unary_expr,
            &[
                (TokenKind::Star, BinOp::Mul),
                (TokenKind::Slash, BinOp::Div),
                (TokenKind::Percent, BinOp::Mod),
            ],
        )
    }

    fn unary_expr(&mut self) -> EvalResult<Expr> {
        let op = match self.peek().kind {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Bang => Some(UnaryOp::Not),
            _ => None,
        };

        if let Some(op) = op {
            let token = self.next();
            let expr = self.unary_expr()?;
            let span = token.span.merge(expr.span());
            return Ok(Expr::Unary {
                op,
                expr: Box::new(expr),
                span,
            });
        }

        self.call_expr()
    }

    /// Postfix call chains: `f(1)(2)`.
    fn call_expr(&mut self) -> EvalResult<Expr> {
        let mut expr = self.primary()?;

        while self.peek().kind == TokenKind::LParen {
            self.next();
            let mut args = Vec::new();

            if self.peek().kind != TokenKind::RParen {
                loop {
                    args.push(self.expr()?);
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
            }

            let rparen = self.expect(TokenKind::RParen)?;
            let span = expr.span().merge(rparen.span);
            expr = Expr::Call {
                callee: Box::new(expr),
                args,
                span,
            };
        }

        Ok(expr)
    }

    fn primary(&mut self) -> EvalResult<Expr> {
        match self.peek().kind.clone() {
            TokenKind::KwNull => Ok(Expr::Null(self.next().span)),
            TokenKind::KwTrue => Ok(Expr::Bool(true, self.next().span)),
            TokenKind::KwFalse => Ok(Expr::Bool(false, self.next().span)),
            TokenKind::Int(num) => Ok(Expr::Int(num, self.next().span)),
            TokenKind::Float(num) => Ok(Expr::Float(num, self.next().span)),
            TokenKind::Str(text) => Ok(Expr::Str(text.into(), self.next().span)),
            TokenKind::Ident(name) => Ok(Expr::Ident(name, self.next().span)),

            TokenKind::LParen => {
                self.next();
                let expr = self.expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }

            TokenKind::KwIf => self.if_expr(),
            TokenKind::KwFn => self.fn_literal(),

            _ => Err(self.unexpected("expected an expression")),
        }
    }

    /// if := 'if' expr '{' expr '}' 'else' '{' expr '}'
    fn if_expr(&mut self) -> EvalResult<Expr> {
        let if_token = self.next();
        let condition = self.expr()?;

        self.expect(TokenKind::LBrace)?;
        let then_body = self.expr()?;
        self.expect(TokenKind::RBrace)?;

        self.expect(TokenKind::KwElse)?;
        self.expect(TokenKind::LBrace)?;
        let else_body = self.expr()?;
        let rbrace = self.expect(TokenKind::RBrace)?;

        Ok(Expr::If {
            condition: Box::new(condition),
            then_body: Box::new(then_body),
            else_body: Box::new(else_body),
            span: if_token.span.merge(rbrace.span),
        })
    }

    /// fn := 'fn' '(' idents? ')' ('use' '(' idents? ')')? '{' expr '}'
    ///
    /// The lambda's span covers the entire literal, which is what
    /// makes its source text recoverable later.
    fn fn_literal(&mut self) -> EvalResult<Expr> {
        let fn_token = self.next();

        self.expect(TokenKind::LParen)?;
        let params = self.ident_list()?;

        let captures = if self.eat(&TokenKind::KwUse) {
            self.expect(TokenKind::LParen)?;
            self.ident_list()?
        } else {
            Vec::new()
        };

        self.expect(TokenKind::LBrace)?;
        let body = self.expr()?;
        let rbrace = self.expect(TokenKind::RBrace)?;

        Ok(Expr::Fn(Rc::new(Lambda {
            params,
            captures,
            body,
            span: fn_token.span.merge(rbrace.span),
        })))
    }

    /// Comma-separated identifiers up to and including the closing
    /// parenthesis.
    fn ident_list(&mut self) -> EvalResult<Vec<SmolStr>> {
        let mut names = Vec::new();

        if self.eat(&TokenKind::RParen) {
            return Ok(names);
        }

        loop {
            let (name, _) = self.expect_ident()?;
            names.push(name);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(TokenKind::RParen)?;
        Ok(names)
    }
}

/// Parse the given file into a script.
pub(crate) fn parse(file: &File) -> EvalResult<Script> {
    let tokens = lex(file)?;
    Parser { tokens, pos: 0 }.script()
}
