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

use thiserror::Error;

use crate::ast::BinaryOp;

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ParseError {
    #[error("Failure to parse program @ {line}/{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },
    #[error("Integer literal out of range: {0}")]
    LiteralRange(String),
    #[error("Unexpected {0} in parse tree")]
    Unexpected(String),
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum CheckError {
    #[error("Undeclared variable: {0}")]
    UnknownVariable(String),
    #[error("Unknown procedure: {0}")]
    UnknownProcedure(String),
    #[error("Procedure {name} takes {expected} argument(s), got {actual}")]
    Arity {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error("`break` outside of a loop")]
    StrayBreak,
    #[error("`continue` outside of a loop")]
    StrayContinue,
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum RuntimeError {
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Arithmetic overflow in `{0}`")]
    Overflow(BinaryOp),
    #[error("Ran out of fuel after {0} steps")]
    OutOfFuel(u64),
    #[error("Undeclared variable at runtime: {0}")]
    UnknownVariable(String),
    #[error("Unknown procedure at runtime: {0}")]
    UnknownProcedure(String),
}

/// Why the oracle rejected a fragment. Callers that only need the verdict use
/// [`crate::Oracle::evaluate`], which collapses all of these into a failed outcome.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum OracleError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Check(#[from] CheckError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
