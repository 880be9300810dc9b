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

//! Random producers for fragments of the debugger scripting language.
//!
//! Every producer is a method on [`Generator`] that appends to a [`FragmentBuilder`]. Producers
//! recurse into each other freely; termination comes from the [`GenerationContext`] depth
//! counter alone. Once the counter reaches the configured ceiling every random choice is forced
//! onto its non-recursive alternative.
//!
//! Some productions are deliberately malformed (garbage comparators, unbalanced comments). The
//! generator never judges what it emits; that's the oracle's job.

mod context;
mod expr;
mod stmt;


use std::sync::Arc;

use rand::Rng;
use scriptgen_common::{ExpressionValidator, Fragment, FragmentBuilder, IdentifierTable};
use serde::{Deserialize, Serialize};

pub use context::GenerationContext;
pub use expr::{COMPARATORS, INVALID_EXPRESSION_PLACEHOLDER};
pub use stmt::LOOP_GUARD;

/// Tuning knobs for the producers. None of these carry semantic guarantees beyond termination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarOptions {
    /// Depth at which every choice is forced onto its terminating alternative.
    pub depth_ceiling: usize,
    /// Probability of taking a recursive continuation (another operand, another statement, an
    /// `elsif` arm...) while below the ceiling.
    pub continuation_probability: f64,
    /// How many candidates a forced-valid operand may try before falling back to the
    /// always-failing placeholder.
    pub force_valid_retries: usize,
}

impl Default for GrammarOptions {
    fn default() -> Self {
        Self {
            depth_ceiling: 10,
            continuation_probability: 0.5,
            force_valid_retries: 64,
        }
    }
}

pub struct Generator<R: Rng> {
    rng: R,
    identifiers: Arc<IdentifierTable>,
    validator: Option<Arc<dyn ExpressionValidator>>,
    options: GrammarOptions,
    context: GenerationContext,
}

impl<R: Rng> Generator<R> {
    pub fn new(rng: R, identifiers: Arc<IdentifierTable>, options: GrammarOptions) -> Self {
        let continuation_probability = if options.continuation_probability.is_nan() {
            GrammarOptions::default().continuation_probability
        } else {
            options.continuation_probability.clamp(0.0, 1.0)
        };
        let context = GenerationContext::new(options.depth_ceiling);
        Self {
            rng,
            identifiers,
            validator: None,
            options: GrammarOptions {
                continuation_probability,
                ..options
            },
            context,
        }
    }

    /// Use `validator` for operands that must evaluate cleanly. Without one, forced-valid
    /// operands are plain expressions.
    pub fn with_validator(mut self, validator: Arc<dyn ExpressionValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn options(&self) -> &GrammarOptions {
        &self.options
    }

    /// State of the most recent top-level generation.
    pub fn context(&self) -> &GenerationContext {
        &self.context
    }

    pub fn expression(&mut self) -> Fragment {
        self.top_level(|g, out| g.expr(out))
    }

    pub fn expression_forced_valid(&mut self) -> Fragment {
        self.top_level(|g, out| g.expr_forced_valid(out))
    }

    pub fn boolean_expression(&mut self) -> Fragment {
        self.top_level(|g, out| g.boolean(out))
    }

    pub fn statement(&mut self) -> Fragment {
        self.top_level(|g, out| g.stmt(out))
    }

    pub fn statements(&mut self) -> Fragment {
        self.top_level(|g, out| g.stmts(out))
    }

    pub fn if_statement(&mut self, nested: bool) -> Fragment {
        self.top_level(|g, out| g.if_stmt(out, nested))
    }

    pub fn while_statement(&mut self, nested: bool) -> Fragment {
        self.top_level(|g, out| g.while_stmt(out, nested))
    }

    pub fn do_while_statement(&mut self, nested: bool) -> Fragment {
        self.top_level(|g, out| g.do_while_stmt(out, nested))
    }

    pub fn for_statement(&mut self, nested: bool) -> Fragment {
        self.top_level(|g, out| g.for_stmt(out, nested))
    }

    fn top_level(&mut self, produce: impl FnOnce(&mut Self, &mut FragmentBuilder)) -> Fragment {
        self.context.reset();
        let mut out = FragmentBuilder::new();
        produce(self, &mut out);
        debug_assert_eq!(self.context.depth(), 0, "unbalanced producer depth");
        out.finish()
    }

    /// Run `produce` one level deeper. This is the only place depth changes, which keeps every
    /// increment paired with its decrement.
    fn nested<T>(&mut self, produce: impl FnOnce(&mut Self) -> T) -> T {
        self.context.enter();
        let result = produce(self);
        self.context.exit();
        result
    }

    /// Weighted coin for recursive continuations; always tails at the ceiling.
    fn coin(&mut self) -> bool {
        !self.context.at_ceiling() && self.rng.random_bool(self.options.continuation_probability)
    }

    fn pick(&mut self, bound: usize) -> usize {
        self.rng.random_range(0..bound)
    }
}
