// Copyright (C) 2025 Ryan Daum <ryan.daum@gmail.com> This program is free
// software: you can redistribute it and/or modify it under the terms of the GNU
// General Public License as published by the Free Software Foundation, version
// 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Static checks run over the whole program before anything executes, so a bad name in a branch
//! that is never taken still rejects the fragment.

use crate::ast::{Condition, Expr, Simple, Stmt};
use crate::errors::CheckError;

/// What the harness makes available to a program.
pub struct Environment<'a> {
    pub variables: &'a [&'a str],
    /// Procedure name and arity.
    pub procedures: &'a [(&'a str, usize)],
}

pub fn check_program(program: &[Stmt], env: &Environment) -> Result<(), CheckError> {
    let mut checker = Checker { env, loop_depth: 0 };
    program.iter().try_for_each(|stmt| checker.stmt(stmt))
}

struct Checker<'e, 'a> {
    env: &'e Environment<'a>,
    loop_depth: usize,
}

impl Checker<'_, '_> {
    fn stmt(&mut self, stmt: &Stmt) -> Result<(), CheckError> {
        match stmt {
            Stmt::Block(body) => body.iter().try_for_each(|s| self.stmt(s)),
            Stmt::If {
                condition,
                then,
                otherwise,
            } => {
                self.condition(condition)?;
                self.stmt(then)?;
                if let Some(otherwise) = otherwise {
                    self.stmt(otherwise)?;
                }
                Ok(())
            }
            Stmt::While { condition, body } | Stmt::DoWhile { body, condition } => {
                self.condition(condition)?;
                self.loop_body(body)
            }
            Stmt::For {
                init,
                condition,
                update,
                body,
            } => {
                if let Some(init) = init {
                    self.simple(init)?;
                }
                if let Some(condition) = condition {
                    self.condition(condition)?;
                }
                if let Some(update) = update {
                    self.simple(update)?;
                }
                self.loop_body(body)
            }
            Stmt::Break if self.loop_depth == 0 => Err(CheckError::StrayBreak),
            Stmt::Continue if self.loop_depth == 0 => Err(CheckError::StrayContinue),
            Stmt::Break | Stmt::Continue | Stmt::Empty => Ok(()),
            Stmt::Simple(simple) => self.simple(simple),
        }
    }

    fn loop_body(&mut self, body: &Stmt) -> Result<(), CheckError> {
        self.loop_depth += 1;
        let result = self.stmt(body);
        self.loop_depth -= 1;
        result
    }

    fn simple(&self, simple: &Simple) -> Result<(), CheckError> {
        match simple {
            Simple::Assign { name, value } => {
                self.variable(name)?;
                self.expr(value)
            }
            Simple::Step { name, .. } => self.variable(name),
            Simple::Call { name, args } => {
                let Some((_, arity)) = self.env.procedures.iter().find(|(p, _)| p == name) else {
                    return Err(CheckError::UnknownProcedure(name.clone()));
                };
                if *arity != args.len() {
                    return Err(CheckError::Arity {
                        name: name.clone(),
                        expected: *arity,
                        actual: args.len(),
                    });
                }
                args.iter().try_for_each(|arg| self.expr(arg))
            }
        }
    }

    fn condition(&self, condition: &Condition) -> Result<(), CheckError> {
        self.expr(&condition.lhs)?;
        self.expr(&condition.rhs)
    }

    fn expr(&self, expr: &Expr) -> Result<(), CheckError> {
        match expr {
            Expr::Literal(_) => Ok(()),
            Expr::Var(name) => self.variable(name),
            Expr::Unary(_, operand) => self.expr(operand),
            Expr::Binary(_, lhs, rhs) => {
                self.expr(lhs)?;
                self.expr(rhs)
            }
        }
    }

    fn variable(&self, name: &str) -> Result<(), CheckError> {
        if self.env.variables.contains(&name) {
            Ok(())
        } else {
            Err(CheckError::UnknownVariable(name.to_string()))
        }
    }
}
