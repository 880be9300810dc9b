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

use indexmap::IndexMap;
use scriptgen_common::CAPTURE_PROCEDURE;

use crate::ast::{BinaryOp, Condition, Expr, Simple, Step, Stmt, UnaryOp};
use crate::errors::RuntimeError;

/// How control leaves a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Normal,
    Break,
    Continue,
}

/// A tree-walking interpreter with a fixed step budget. One machine runs one program; nothing is
/// shared between runs.
pub struct Machine {
    variables: IndexMap<String, i64>,
    captured: Option<i64>,
    fuel: u64,
    limit: u64,
}

impl Machine {
    pub fn new<'a>(variables: impl IntoIterator<Item = &'a str>, fuel: u64) -> Self {
        Self {
            variables: variables
                .into_iter()
                .map(|name| (name.to_string(), 0))
                .collect(),
            captured: None,
            fuel,
            limit: fuel,
        }
    }

    pub fn run(&mut self, program: &[Stmt]) -> Result<(), RuntimeError> {
        for stmt in program {
            // A top-level break or continue is rejected by the checker; treat it as an end here.
            if self.exec(stmt)? != Flow::Normal {
                break;
            }
        }
        Ok(())
    }

    pub fn variable(&self, name: &str) -> Option<i64> {
        self.variables.get(name).copied()
    }

    /// The argument of the last capture call, if there was one.
    pub fn captured(&self) -> Option<i64> {
        self.captured
    }

    fn tick(&mut self) -> Result<(), RuntimeError> {
        if self.fuel == 0 {
            return Err(RuntimeError::OutOfFuel(self.limit));
        }
        self.fuel -= 1;
        Ok(())
    }

    fn exec(&mut self, stmt: &Stmt) -> Result<Flow, RuntimeError> {
        self.tick()?;
        match stmt {
            Stmt::Block(body) => {
                for stmt in body {
                    let flow = self.exec(stmt)?;
                    if flow != Flow::Normal {
                        return Ok(flow);
                    }
                }
                Ok(Flow::Normal)
            }
            Stmt::If {
                condition,
                then,
                otherwise,
            } => {
                if self.test(condition)? {
                    self.exec(then)
                } else if let Some(otherwise) = otherwise {
                    self.exec(otherwise)
                } else {
                    Ok(Flow::Normal)
                }
            }
            Stmt::While { condition, body } => {
                loop {
                    self.tick()?;
                    if !self.test(condition)? {
                        break;
                    }
                    if self.exec(body)? == Flow::Break {
                        break;
                    }
                }
                Ok(Flow::Normal)
            }
            Stmt::DoWhile { body, condition } => {
                loop {
                    self.tick()?;
                    if self.exec(body)? == Flow::Break {
                        break;
                    }
                    if !self.test(condition)? {
                        break;
                    }
                }
                Ok(Flow::Normal)
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
                loop {
                    self.tick()?;
                    if let Some(condition) = condition
                        && !self.test(condition)?
                    {
                        break;
                    }
                    if self.exec(body)? == Flow::Break {
                        break;
                    }
                    if let Some(update) = update {
                        self.simple(update)?;
                    }
                }
                Ok(Flow::Normal)
            }
            Stmt::Break => Ok(Flow::Break),
            Stmt::Continue => Ok(Flow::Continue),
            Stmt::Empty => Ok(Flow::Normal),
            Stmt::Simple(simple) => {
                self.simple(simple)?;
                Ok(Flow::Normal)
            }
        }
    }

    fn simple(&mut self, simple: &Simple) -> Result<(), RuntimeError> {
        match simple {
            Simple::Assign { name, value } => {
                let value = self.eval(value)?;
                *self.slot(name)? = value;
            }
            Simple::Step { name, step } => {
                let slot = self.slot(name)?;
                *slot = match step {
                    Step::Increment => slot.wrapping_add(1),
                    Step::Decrement => slot.wrapping_sub(1),
                };
            }
            Simple::Call { name, args } => {
                if name != CAPTURE_PROCEDURE {
                    return Err(RuntimeError::UnknownProcedure(name.clone()));
                }
                let mut last = None;
                for arg in args {
                    last = Some(self.eval(arg)?);
                }
                if let Some(value) = last {
                    self.captured = Some(value);
                }
            }
        }
        Ok(())
    }

    fn slot(&mut self, name: &str) -> Result<&mut i64, RuntimeError> {
        self.variables
            .get_mut(name)
            .ok_or_else(|| RuntimeError::UnknownVariable(name.to_string()))
    }

    fn test(&mut self, condition: &Condition) -> Result<bool, RuntimeError> {
        let lhs = self.eval(&condition.lhs)?;
        let rhs = self.eval(&condition.rhs)?;
        Ok(condition.op.test(lhs, rhs))
    }

    fn eval(&mut self, expr: &Expr) -> Result<i64, RuntimeError> {
        self.tick()?;
        match expr {
            Expr::Literal(value) => Ok(*value),
            Expr::Var(name) => self
                .variable(name)
                .ok_or_else(|| RuntimeError::UnknownVariable(name.clone())),
            Expr::Unary(op, operand) => {
                let value = self.eval(operand)?;
                Ok(match op {
                    UnaryOp::Neg => value.wrapping_neg(),
                    UnaryOp::Plus => value,
                    UnaryOp::BitNot => !value,
                })
            }
            Expr::Binary(op, lhs, rhs) => {
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                binary(*op, lhs, rhs)
            }
        }
    }
}

fn binary(op: BinaryOp, lhs: i64, rhs: i64) -> Result<i64, RuntimeError> {
    let value = match op {
        BinaryOp::BitOr => lhs | rhs,
        BinaryOp::BitXor => lhs ^ rhs,
        BinaryOp::BitAnd => lhs & rhs,
        // Shift counts use their low six bits.
        BinaryOp::Shl => lhs.wrapping_shl((rhs & 0x3f) as u32),
        BinaryOp::Shr => lhs.wrapping_shr((rhs & 0x3f) as u32),
        BinaryOp::Add => lhs.wrapping_add(rhs),
        BinaryOp::Sub => lhs.wrapping_sub(rhs),
        BinaryOp::Mul => lhs.wrapping_mul(rhs),
        BinaryOp::Div | BinaryOp::Mod if rhs == 0 => return Err(RuntimeError::DivisionByZero),
        BinaryOp::Div => lhs.checked_div(rhs).ok_or(RuntimeError::Overflow(op))?,
        BinaryOp::Mod => lhs.checked_rem(rhs).ok_or(RuntimeError::Overflow(op))?,
    };
    Ok(value)
}
