//! The Amber runtime: a tree-walking evaluator over the parsed
//! syntax tree.
//!
//! A [`Runtime`] owns the global scope (the builtins) and the source
//! map. Every call to [`Runtime::evaluate_with`] runs in a fresh
//! child scope of the globals, so separate evaluations cannot observe
//! each other's bindings — the property that reconstruction of
//! serialized closures relies on.

use std::path::PathBuf;
use std::rc::Rc;

use codemap::Span;
use smol_str::SmolStr;

use crate::builtins::global_builtins;
use crate::env::Env;
use crate::errors::{Error, ErrorKind, EvalResult};
use crate::source::SourceCode;
use crate::syntax::{self, ast};
use crate::value::{Closure, Value};

pub struct Runtime {
    source: SourceCode,
    globals: Rc<Env>,
}

impl Runtime {
    pub fn new() -> Self {
        let globals = Env::new();
        for (name, value) in global_builtins() {
            globals.define(name.into(), value);
        }

        Runtime {
            source: SourceCode::new(),
            globals,
        }
    }

    /// The source map shared by everything this runtime evaluates.
    pub fn source_map(&self) -> SourceCode {
        self.source.clone()
    }

    /// Evaluate a script in a fresh scope.
    pub fn evaluate(&self, code: &str, location: Option<PathBuf>) -> EvalResult<Value> {
        self.evaluate_with(code, location, &[])
    }

    /// Evaluate a script in a fresh scope seeded with the given
    /// bindings. This is the entry point used to re-evaluate
    /// recovered closure source: the caller injects the captured
    /// variables, and nothing defined here leaks back out.
    pub fn evaluate_with(
        &self,
        code: &str,
        location: Option<PathBuf>,
        bindings: &[(SmolStr, Value)],
    ) -> EvalResult<Value> {
        let name = location
            .map(|path| path.to_string_lossy().into_owned())
            .unwrap_or_else(|| "<eval>".into());
        let file = self.source.add_file(name, code.into());

        let script = syntax::parse(&file)?;

        let env = self.globals.child();
        for (name, value) in bindings {
            env.define(name.clone(), value.clone());
        }

        for binding in &script.bindings {
            let value = self.eval(&binding.value, &env)?;
            env.define(binding.name.clone(), value);
        }

        match &script.result {
            Some(expr) => self.eval(expr, &env),
            None => Ok(Value::Null),
        }
    }

    /// Apply a callable value to the given arguments.
    pub fn call(&self, callee: &Value, args: Vec<Value>) -> EvalResult<Value> {
        self.call_spanned(callee, args, None)
    }

    fn call_spanned(
        &self,
        callee: &Value,
        args: Vec<Value>,
        span: Option<Span>,
    ) -> EvalResult<Value> {
        let result = match callee {
            Value::Builtin(builtin) => builtin.call(args),
            Value::Closure(closure) => return self.call_closure(closure, args, span),
            other => Err(ErrorKind::NotCallable(other.type_of())),
        };

        result.map_err(|kind| Error { kind, span })
    }

    fn call_closure(
        &self,
        closure: &Rc<Closure>,
        args: Vec<Value>,
        span: Option<Span>,
    ) -> EvalResult<Value> {
        let lambda = &closure.lambda;
        if args.len() != lambda.params.len() {
            return Err(Error {
                kind: ErrorKind::WrongArgumentCount {
                    expected: lambda.params.len(),
                    actual: args.len(),
                },
                span,
            });
        }

        // The body scope contains exactly what the language allows a
        // body to see: captures, then parameters, over the globals.
        let env = self.globals.child();
        for (name, value) in closure.captured().iter() {
            env.define(name.clone(), value.clone());
        }
        for (param, arg) in lambda.params.iter().zip(args) {
            env.define(param.clone(), arg);
        }

        self.eval(&lambda.body, &env)
    }

    fn eval(&self, expr: &ast::Expr, env: &Rc<Env>) -> EvalResult<Value> {
        match expr {
            ast::Expr::Null(_) => Ok(Value::Null),
            ast::Expr::Bool(b, _) => Ok(Value::Bool(*b)),
            ast::Expr::Int(n, _) => Ok(Value::Integer(*n)),
            ast::Expr::Float(n, _) => Ok(Value::Float(*n)),
            ast::Expr::Str(s, _) => Ok(Value::String(s.clone())),

            ast::Expr::Ident(name, span) => env
                .lookup(name)
                .ok_or_else(|| Error::new(ErrorKind::UnknownVariable(name.clone()), *span)),

            ast::Expr::Unary { op, expr, span } => {
                let value = self.eval(expr, env)?;
                self.unary_op(*op, value).map_err(|kind| Error::new(kind, *span))
            }

            ast::Expr::Binary { op, lhs, rhs, span } => self.binary_expr(*op, lhs, rhs, env, *span),

            ast::Expr::If {
                condition,
                then_body,
                else_body,
                ..
            } => {
                let chosen = match self
                    .eval(condition, env)?
                    .as_bool()
                    .map_err(|kind| Error::new(kind, condition.span()))?
                {
                    true => then_body,
                    false => else_body,
                };

                self.eval(chosen, env)
            }

            ast::Expr::Call { callee, args, span } => {
                let callee = self.eval(callee, env)?;
                let args = args
                    .iter()
                    .map(|arg| self.eval(arg, env))
                    .collect::<EvalResult<Vec<_>>>()?;

                self.call_spanned(&callee, args, Some(*span))
            }

            // Evaluating a function literal snapshots the current
            // bindings of its capture clause, in clause order. An
            // unbound capture name is an error *here*, at the point
            // of definition.
            ast::Expr::Fn(lambda) => {
                let mut captured = Vec::with_capacity(lambda.captures.len());
                for name in &lambda.captures {
                    let value = env.lookup(name).ok_or_else(|| {
                        Error::new(ErrorKind::UnknownVariable(name.clone()), lambda.span)
                    })?;
                    captured.push((name.clone(), value));
                }

                Ok(Value::Closure(Rc::new(Closure::new(
                    lambda.clone(),
                    captured,
                ))))
            }
        }
    }

    fn unary_op(&self, op: ast::UnaryOp, value: Value) -> Result<Value, ErrorKind> {
        match op {
            ast::UnaryOp::Not => Ok(Value::Bool(!value.as_bool()?)),
            ast::UnaryOp::Neg => match value {
                Value::Integer(n) => n
                    .checked_neg()
                    .map(Value::Integer)
                    .ok_or(ErrorKind::IntegerOverflow),
                Value::Float(n) => Ok(Value::Float(-n)),
                other => Err(ErrorKind::TypeError {
                    expected: "int",
                    actual: other.type_of(),
                }),
            },
        }
    }

    fn binary_expr(
        &self,
        op: ast::BinOp,
        lhs: &ast::Expr,
        rhs: &ast::Expr,
        env: &Rc<Env>,
        span: Span,
    ) -> EvalResult<Value> {
        // && and || short-circuit, everything else is strict
        match op {
            ast::BinOp::And => {
                let lhs = self.eval_bool(lhs, env)?;
                if !lhs {
                    return Ok(Value::Bool(false));
                }
                return Ok(Value::Bool(self.eval_bool(rhs, env)?));
            }

            ast::BinOp::Or => {
                let lhs = self.eval_bool(lhs, env)?;
                if lhs {
                    return Ok(Value::Bool(true));
                }
                return Ok(Value::Bool(self.eval_bool(rhs, env)?));
            }

            _ => {}
        }

        let lhs = self.eval(lhs, env)?;
        let rhs = self.eval(rhs, env)?;

        binary_op(op, lhs, rhs).map_err(|kind| Error::new(kind, span))
    }

    fn eval_bool(&self, expr: &ast::Expr, env: &Rc<Env>) -> EvalResult<bool> {
        self.eval(expr, env)?
            .as_bool()
            .map_err(|kind| Error::new(kind, expr.span()))
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

fn arithmetic(op: ast::BinOp, lhs: Value, rhs: Value) -> Result<Value, ErrorKind> {
    if let (Value::Integer(a), Value::Integer(b)) = (&lhs, &rhs) {
        let (a, b) = (*a, *b);
        let result = match op {
            ast::BinOp::Add => a.checked_add(b),
            ast::BinOp::Sub => a.checked_sub(b),
            ast::BinOp::Mul => a.checked_mul(b),
            ast::BinOp::Div => {
                if b == 0 {
                    return Err(ErrorKind::DivisionByZero);
                }
                a.checked_div(b)
            }
            ast::BinOp::Mod => {
                if b == 0 {
                    return Err(ErrorKind::DivisionByZero);
                }
                a.checked_rem(b)
            }
            _ => unreachable!("arithmetic called with non-arithmetic op"),
        };

        return result.map(Value::Integer).ok_or(ErrorKind::IntegerOverflow);
    }

    let a = lhs.as_float()?;
    let b = rhs.as_float()?;
    let result = match op {
        ast::BinOp::Add => a + b,
        ast::BinOp::Sub => a - b,
        ast::BinOp::Mul => a * b,
        ast::BinOp::Div => a / b,
        ast::BinOp::Mod => a % b,
        _ => unreachable!("arithmetic called with non-arithmetic op"),
    };

    Ok(Value::Float(result))
}

fn comparison(op: ast::BinOp, lhs: Value, rhs: Value) -> Result<Value, ErrorKind> {
    // strings compare lexicographically, numbers numerically
    let ordering = match (&lhs, &rhs) {
        (Value::String(a), Value::String(b)) => a.partial_cmp(b),
        _ => lhs.as_float()?.partial_cmp(&rhs.as_float()?),
    };

    let result = match ordering {
        None => false, // NaN comparisons
        Some(ordering) => match op {
            ast::BinOp::Lt => ordering.is_lt(),
            ast::BinOp::Le => ordering.is_le(),
            ast::BinOp::Gt => ordering.is_gt(),
            ast::BinOp::Ge => ordering.is_ge(),
            _ => unreachable!("comparison called with non-comparison op"),
        },
    };

    Ok(Value::Bool(result))
}

fn binary_op(op: ast::BinOp, lhs: Value, rhs: Value) -> Result<Value, ErrorKind> {
    match op {
        // + doubles as string concatenation
        ast::BinOp::Add => {
            if let (Value::String(a), Value::String(b)) = (&lhs, &rhs) {
                let mut result = String::with_capacity(a.len() + b.len());
                result.push_str(a);
                result.push_str(b);
                return Ok(Value::String(result.into()));
            }

            arithmetic(op, lhs, rhs)
        }

        ast::BinOp::Sub | ast::BinOp::Mul | ast::BinOp::Div | ast::BinOp::Mod => {
            arithmetic(op, lhs, rhs)
        }

        ast::BinOp::Eq => Ok(Value::Bool(lhs == rhs)),
        ast::BinOp::Ne => Ok(Value::Bool(lhs != rhs)),

        ast::BinOp::Lt | ast::BinOp::Le | ast::BinOp::Gt | ast::BinOp::Ge => {
            comparison(op, lhs, rhs)
        }

        ast::BinOp::And | ast::BinOp::Or => {
            unreachable!("logical operators are handled with short-circuiting")
        }
    }
}
