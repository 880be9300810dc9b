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
use scriptgen_common::{CAPTURE_PROCEDURE, FragmentBuilder};

use crate::Generator;

/// Injected at the top of every loop body. Caps iterations no matter what the condition does.
pub const LOOP_GUARD: &str = "tmp_counter = tmp_counter + 1; if (tmp_counter >= 0x1000) { break; }";

const LVALUES: &[&str] = &["val", "@rax"];

const CHECK_TOKEN_BOUND: u32 = 10000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatementKind {
    If,
    While,
    DoWhile,
    For,
    Assign,
    Call,
    Break,
    Comment,
    LineComment,
    UnclosedComment,
    UnopenedComment,
}

const STATEMENTS: &[StatementKind] = &[
    StatementKind::If,
    StatementKind::While,
    StatementKind::DoWhile,
    StatementKind::For,
    StatementKind::Assign,
    StatementKind::Call,
    StatementKind::Break,
    StatementKind::Comment,
    StatementKind::LineComment,
    StatementKind::UnclosedComment,
    StatementKind::UnopenedComment,
];

const SIMPLE_STATEMENTS: &[StatementKind] = &[
    StatementKind::Assign,
    StatementKind::Call,
    StatementKind::Break,
    StatementKind::Comment,
    StatementKind::LineComment,
    StatementKind::UnclosedComment,
    StatementKind::UnopenedComment,
];

impl<R: Rng> Generator<R> {
    /// Zero or more statements, each followed by a space.
    pub(crate) fn stmts(&mut self, out: &mut FragmentBuilder) {
        self.nested(|g| {
            if g.coin() {
                g.stmt(out);
                out.push_char(' ');
                g.stmts(out);
            }
        })
    }

    pub(crate) fn stmt(&mut self, out: &mut FragmentBuilder) {
        self.nested(|g| {
            let choices = if g.context.at_ceiling() {
                SIMPLE_STATEMENTS
            } else {
                STATEMENTS
            };
            match choices[g.pick(choices.len())] {
                StatementKind::If => g.if_stmt(out, false),
                StatementKind::While => g.while_stmt(out, false),
                StatementKind::DoWhile => g.do_while_stmt(out, false),
                StatementKind::For => g.for_stmt(out, false),
                StatementKind::Assign => {
                    g.assignment(out);
                    out.push_char(';');
                }
                // An empty call: nothing but the terminator.
                StatementKind::Call => {
                    out.push_char(';');
                }
                StatementKind::Break => {
                    out.push(" break;");
                }
                StatementKind::Comment => {
                    out.push(" /* This is a comment */");
                }
                StatementKind::LineComment => {
                    out.push(" // /* This is a comment ");
                }
                StatementKind::UnclosedComment => {
                    out.push(" /* This is a not closed comment");
                }
                StatementKind::UnopenedComment => {
                    out.push(" This is a not opened comment */");
                }
            }
        })
    }

    fn assignment(&mut self, out: &mut FragmentBuilder) {
        self.nested(|g| {
            g.lvalue(out);
            out.push(" = ");
            g.expr(out);
            out.push_char(' ');
        })
    }

    fn lvalue(&mut self, out: &mut FragmentBuilder) {
        out.push(LVALUES[self.pick(LVALUES.len())]);
    }

    fn check(&mut self, out: &mut FragmentBuilder) {
        let token = self.rng.random_range(0..CHECK_TOKEN_BOUND);
        // Every arm reports a random token so the taken branch is observable.
        out.push_fmt(format_args!(" {CAPTURE_PROCEDURE}(0x{token:X}); "));
    }

    pub(crate) fn if_stmt(&mut self, out: &mut FragmentBuilder, with_statements: bool) {
        self.nested(|g| {
            out.push(" if (");
            g.boolean(out);
            out.push(")  {");
            g.check(out);
            if with_statements {
                g.stmts(out);
            }
            out.push_char('}');
            g.elsif_arms(out, with_statements);
            g.else_arm(out, with_statements);
        })
    }

    fn elsif_arms(&mut self, out: &mut FragmentBuilder, with_statements: bool) {
        self.nested(|g| {
            if !g.coin() {
                return;
            }
            out.push(" elsif (");
            g.boolean(out);
            out.push(") {");
            g.check(out);
            if with_statements {
                g.stmts(out);
            }
            out.push_char('}');
            g.elsif_arms(out, with_statements);
        })
    }

    fn else_arm(&mut self, out: &mut FragmentBuilder, with_statements: bool) {
        self.nested(|g| {
            if !g.coin() {
                return;
            }
            out.push(" else {");
            g.check(out);
            if with_statements {
                g.stmts(out);
            }
            out.push_char('}');
        })
    }

    pub(crate) fn while_stmt(&mut self, out: &mut FragmentBuilder, with_statements: bool) {
        self.nested(|g| {
            out.push(" while  (");
            g.boolean(out);
            out.push(")  { ").push(LOOP_GUARD).push_char(' ');
            if with_statements {
                g.stmts(out);
                out.push_char(' ');
            }
            out.push_char('}');
        })
    }

    pub(crate) fn do_while_stmt(&mut self, out: &mut FragmentBuilder, with_statements: bool) {
        self.nested(|g| {
            out.push(" do  {  ").push(LOOP_GUARD).push_char(' ');
            if with_statements {
                g.stmts(out);
            }
            out.push("} while ( ");
            g.boolean(out);
            out.push(") ;");
        })
    }

    pub(crate) fn for_stmt(&mut self, out: &mut FragmentBuilder, with_statements: bool) {
        self.nested(|g| {
            out.push(" for (");
            g.for_init(out);
            out.push("; ");
            g.boolean(out);
            out.push_char(';');
            g.lvalue(out);
            out.push("--");
            out.push(") { ").push(LOOP_GUARD).push_char(' ');
            if with_statements {
                g.stmts(out);
            }
            out.push_char('}');
        })
    }

    /// `lvalue = expr`, nothing, or the canned `val = 10`, weighted 1:1:3.
    fn for_init(&mut self, out: &mut FragmentBuilder) {
        self.nested(|g| {
            let choice = if g.context.at_ceiling() { 1 } else { g.pick(5) };
            match choice {
                0 => {
                    g.lvalue(out);
                    out.push(" = ");
                    g.expr(out);
                }
                1 => {}
                _ => {
                    out.push("val = 10");
                }
            }
        })
    }
}
