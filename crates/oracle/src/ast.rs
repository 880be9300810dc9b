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

use std::fmt::Display;

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum BinaryOp {
    BitOr,
    BitXor,
    BitAnd,
    Shl,
    Shr,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BitOr => write!(f, "|"),
            Self::BitXor => write!(f, "^"),
            Self::BitAnd => write!(f, "&"),
            Self::Shl => write!(f, "<<"),
            Self::Shr => write!(f, ">>"),
            Self::Add => write!(f, "+"),
            Self::Sub => write!(f, "-"),
            Self::Mul => write!(f, "*"),
            Self::Div => write!(f, "/"),
            Self::Mod => write!(f, "%"),
        }
    }
}

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum UnaryOp {
    Neg,
    Plus,
    BitNot,
}

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparison {
    pub fn test(self, lhs: i64, rhs: i64) -> bool {
        match self {
            Self::Eq => lhs == rhs,
            Self::Ne => lhs != rhs,
            Self::Lt => lhs < rhs,
            Self::Le => lhs <= rhs,
            Self::Gt => lhs > rhs,
            Self::Ge => lhs >= rhs,
        }
    }
}

#[derive(Debug, Eq, PartialEq, Clone)]
pub enum Expr {
    Literal(i64),
    Var(String),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
}

#[derive(Debug, Eq, PartialEq, Clone)]
pub struct Condition {
    pub op: Comparison,
    pub lhs: Expr,
    pub rhs: Expr,
}

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum Step {
    Increment,
    Decrement,
}

/// Statements that may also appear in a `for` header.
#[derive(Debug, Eq, PartialEq, Clone)]
pub enum Simple {
    Assign { name: String, value: Expr },
    Step { name: String, step: Step },
    Call { name: String, args: Vec<Expr> },
}

#[derive(Debug, Eq, PartialEq, Clone)]
pub enum Stmt {
    Block(Vec<Stmt>),
    If {
        condition: Condition,
        then: Box<Stmt>,
        otherwise: Option<Box<Stmt>>,
    },
    While {
        condition: Condition,
        body: Box<Stmt>,
    },
    DoWhile {
        body: Box<Stmt>,
        condition: Condition,
    },
    For {
        init: Option<Simple>,
        condition: Option<Condition>,
        update: Option<Simple>,
        body: Box<Stmt>,
    },
    Break,
    Continue,
    Empty,
    Simple(Simple),
}
