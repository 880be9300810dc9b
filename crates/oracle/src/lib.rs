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

//! The ground-truth evaluator for generated fragments.
//!
//! A fragment is rewritten into host source ([`rewrite`]), wrapped in the harness for its
//! [`EvalMode`], parsed, statically checked and run in a fuel-bounded interpreter. Any failure
//! along the way rejects the fragment.

mod ast;
mod check;
mod errors;
mod eval;
mod parse;
mod rewrite;

#[cfg(test)]
mod tests;

use std::borrow::Cow;
use std::sync::Arc;

use scriptgen_common::{CAPTURE_PROCEDURE, ExpressionValidator, IdentifierTable};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use crate::errors::{CheckError, OracleError, ParseError, RuntimeError};
pub use crate::rewrite::rewrite;

use crate::check::{Environment, check_program};
use crate::eval::Machine;
use crate::parse::parse_program;

/// Variable the expression harness assigns the fragment to.
const EXPRESSION_RESULT: &str = "x";
/// General-purpose variable statement fragments assign to.
const SCRATCH_VARIABLE: &str = "val";
/// Iteration counter the loop guard increments.
const LOOP_COUNTER: &str = "tmp_counter";

const PROCEDURES: &[(&str, usize)] = &[(CAPTURE_PROCEDURE, 1)];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleOptions {
    /// Interpreter steps allowed per fragment before it is rejected as non-terminating.
    pub fuel: u64,
}

impl Default for OracleOptions {
    fn default() -> Self {
        Self { fuel: 10_000_000 }
    }
}

/// Which harness a fragment runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalMode {
    /// `x = <fragment>;`, result is `x`.
    Expression,
    /// The fragment runs as-is and reports through the capture procedure. Result is the last
    /// captured value, or 0 when nothing was captured.
    Conditional,
    /// As [`EvalMode::Conditional`] with a loop counter available. When nothing was captured the
    /// final counter is the result.
    Loop,
}

impl EvalMode {
    fn variables(self) -> &'static [&'static str] {
        match self {
            EvalMode::Expression => &[EXPRESSION_RESULT],
            EvalMode::Conditional => &[SCRATCH_VARIABLE],
            EvalMode::Loop => &[SCRATCH_VARIABLE, LOOP_COUNTER],
        }
    }

    fn wrap(self, rewritten: &str) -> Cow<'_, str> {
        match self {
            EvalMode::Expression => Cow::Owned(format!("{EXPRESSION_RESULT} = {rewritten};")),
            EvalMode::Conditional | EvalMode::Loop => Cow::Borrowed(rewritten),
        }
    }

    fn result(self, machine: &Machine) -> i64 {
        match self {
            EvalMode::Expression => machine.variable(EXPRESSION_RESULT).unwrap_or_default(),
            EvalMode::Conditional => machine.captured().unwrap_or_default(),
            EvalMode::Loop => machine
                .captured()
                .or_else(|| machine.variable(LOOP_COUNTER))
                .unwrap_or_default(),
        }
    }
}

/// Verdict for one fragment. `value` is 0 whenever `succeeded` is false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationOutcome {
    pub succeeded: bool,
    pub value: i64,
}

impl EvaluationOutcome {
    pub fn failed() -> Self {
        Self {
            succeeded: false,
            value: 0,
        }
    }

    /// Uppercase hex of the value read as unsigned, without a prefix. `None` for failures.
    pub fn rendered(&self) -> Option<String> {
        self.succeeded.then(|| format!("{:X}", self.value as u64))
    }
}

pub struct Oracle {
    identifiers: Arc<IdentifierTable>,
    options: OracleOptions,
}

impl Oracle {
    pub fn new(identifiers: Arc<IdentifierTable>, options: OracleOptions) -> Self {
        Self {
            identifiers,
            options,
        }
    }

    pub fn rewrite(&self, fragment: &str) -> String {
        rewrite(fragment, &self.identifiers)
    }

    pub fn try_evaluate(&self, fragment: &str, mode: EvalMode) -> Result<i64, OracleError> {
        let rewritten = self.rewrite(fragment);
        let source = mode.wrap(&rewritten);
        let program = parse_program(&source)?;
        let environment = Environment {
            variables: mode.variables(),
            procedures: PROCEDURES,
        };
        check_program(&program, &environment)?;
        let mut machine = Machine::new(mode.variables().iter().copied(), self.options.fuel);
        machine.run(&program)?;
        Ok(mode.result(&machine))
    }

    pub fn evaluate(&self, fragment: &str, mode: EvalMode) -> EvaluationOutcome {
        match self.try_evaluate(fragment, mode) {
            Ok(value) => EvaluationOutcome {
                succeeded: true,
                value,
            },
            Err(e) => {
                debug!(?mode, error = %e, "fragment rejected");
                EvaluationOutcome::failed()
            }
        }
    }
}

impl ExpressionValidator for Oracle {
    fn is_valid_expression(&self, expression: &str) -> bool {
        self.evaluate(expression, EvalMode::Expression).succeeded
    }
}
