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

use rand::Rng;
use scriptgen_common::FragmentBuilder;
use tracing::debug;

use crate::Generator;

/// Binary operators from loosest to tightest. Each level produces the next one up, then an
/// optional chain of `<op> <next level>` continuations.
const LEVELS: &[&str] = &[
    " | ", " ^ ", " & ", " >> ", " << ", " + ", " - ", " * ", " / ", " % ",
];

/// Comparators for boolean expressions. Only some of these are real comparisons; the rest are
/// there to give the oracle something to reject.
pub const COMPARATORS: &[&str] = &[
    " ", " == ", " <= ", " >= ", " <> ", " >< ", " ! ", " ; ", " != ", " = ", " > ", " < ", "((",
    "(", ")", "))",
];

/// Emitted in place of a forced-valid operand when no candidate passed. Divides by zero, so the
/// surrounding fragment is always classified as failing.
pub const INVALID_EXPRESSION_PLACEHOLDER: &str = "(0x1 / 0x0)";

/// Literal operands are drawn from this range.
const LITERAL_BOUND: u32 = 20;

/// Right-hand comparison operands at least this long are regenerated once.
const LONG_OPERAND: usize = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Primary {
    Paren,
    Hex,
    Decimal,
    Octal,
    Binary,
    Negate,
    Plus,
    BitNot,
    Identifier,
}

const PRIMARIES: &[Primary] = &[
    Primary::Paren,
    Primary::Hex,
    Primary::Decimal,
    Primary::Octal,
    Primary::Binary,
    Primary::Negate,
    Primary::Plus,
    Primary::BitNot,
    Primary::Identifier,
];

/// The choices that never recurse, used once the depth ceiling is reached.
const TERMINAL_PRIMARIES: &[Primary] = &[
    Primary::Hex,
    Primary::Decimal,
    Primary::Octal,
    Primary::Binary,
    Primary::Identifier,
];

impl<R: Rng> Generator<R> {
    pub(crate) fn expr(&mut self, out: &mut FragmentBuilder) {
        self.level(out, 0);
    }

    fn level(&mut self, out: &mut FragmentBuilder, index: usize) {
        self.nested(|g| {
            if index == LEVELS.len() {
                g.primary(out);
            } else {
                g.level(out, index + 1);
                g.continuation(out, index);
            }
        })
    }

    fn continuation(&mut self, out: &mut FragmentBuilder, index: usize) {
        self.nested(|g| {
            if g.coin() {
                out.push(LEVELS[index]);
                g.level(out, index + 1);
                g.continuation(out, index);
            }
        })
    }

    fn primary(&mut self, out: &mut FragmentBuilder) {
        self.nested(|g| {
            let choices = if g.context.at_ceiling() {
                TERMINAL_PRIMARIES
            } else {
                PRIMARIES
            };
            let choice = choices[g.pick(choices.len())];
            match choice {
                Primary::Paren => {
                    out.push_char('(');
                    g.expr(out);
                    out.push_char(')');
                }
                Primary::Hex => {
                    let n = g.literal();
                    out.push_fmt(format_args!("0x{n:X}"));
                }
                Primary::Decimal => {
                    let n = g.literal();
                    out.push_fmt(format_args!("0n{n}"));
                }
                // Unprefixed: the host reads these digits back as decimal.
                Primary::Octal => {
                    let n = g.literal();
                    out.push_fmt(format_args!("{n:o}"));
                }
                Primary::Binary => {
                    let n = g.literal();
                    out.push_fmt(format_args!("0y{n:b}"));
                }
                Primary::Negate => {
                    out.push_char('-');
                    g.primary(out);
                }
                Primary::Plus => {
                    out.push_char('+');
                    g.primary(out);
                }
                Primary::BitNot => {
                    out.push_char('~');
                    g.primary(out);
                }
                Primary::Identifier => g.identifier(out),
            }
        })
    }

    fn identifier(&mut self, out: &mut FragmentBuilder) {
        if self.identifiers.is_empty() {
            let n = self.literal();
            out.push_fmt(format_args!("0x{n:X}"));
            return;
        }
        let index = self.pick(self.identifiers.len());
        if let Some(identifier) = self.identifiers.get_index(index) {
            out.push(identifier.name);
        }
    }

    fn literal(&mut self) -> u32 {
        self.rng.random_range(0..LITERAL_BOUND)
    }

    /// An expression the validator accepts, or the failing placeholder once the retry budget is
    /// spent.
    pub(crate) fn expr_forced_valid(&mut self, out: &mut FragmentBuilder) {
        let Some(validator) = self.validator.clone() else {
            self.expr(out);
            return;
        };
        let start = out.len();
        for _ in 0..self.options.force_valid_retries {
            self.expr(out);
            if validator.is_valid_expression(out.since(start)) {
                return;
            }
            out.truncate(start);
        }
        debug!(
            retries = self.options.force_valid_retries,
            "no valid operand found, emitting placeholder"
        );
        out.push(INVALID_EXPRESSION_PLACEHOLDER);
    }

    pub(crate) fn boolean(&mut self, out: &mut FragmentBuilder) {
        self.nested(|g| {
            let comparator = COMPARATORS[g.pick(COMPARATORS.len())];
            let start = out.len();
            g.expr(out);
            if g.pick(3) == 0 {
                let left = out.since(start).to_string();
                out.push(comparator).push(&left);
                return;
            }
            out.push(comparator);
            let right = out.len();
            g.expr_forced_valid(out);
            if out.since(right).chars().count() >= LONG_OPERAND {
                out.truncate(right);
                g.expr_forced_valid(out);
            }
        })
    }
}
