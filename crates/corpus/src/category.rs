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
use scriptgen_common::{CAPTURE_PROCEDURE, Fragment};
use scriptgen_grammar::Generator;
use scriptgen_oracle::EvalMode;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// The kind of fragment a category produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Shape {
    Expression,
    Conditional,
    ConditionalWithStatements,
    WhileLoop,
    WhileLoopWithStatements,
    DoWhileLoop,
    DoWhileLoopWithStatements,
    ForLoop,
    ForLoopWithStatements,
}

impl Shape {
    pub fn generate<R: Rng>(self, generator: &mut Generator<R>) -> Fragment {
        match self {
            Shape::Expression => generator.expression(),
            Shape::Conditional => generator.if_statement(false),
            Shape::ConditionalWithStatements => generator.if_statement(true),
            Shape::WhileLoop => generator.while_statement(false),
            Shape::WhileLoopWithStatements => generator.while_statement(true),
            Shape::DoWhileLoop => generator.do_while_statement(false),
            Shape::DoWhileLoopWithStatements => generator.do_while_statement(true),
            Shape::ForLoop => generator.for_statement(false),
            Shape::ForLoopWithStatements => generator.for_statement(true),
        }
    }

    pub fn mode(self) -> EvalMode {
        match self {
            Shape::Expression => EvalMode::Expression,
            Shape::Conditional | Shape::ConditionalWithStatements => EvalMode::Conditional,
            _ => EvalMode::Loop,
        }
    }

    /// The text written to the corpus: expressions are wrapped so the script engine reports
    /// their value, statements already report through the capture procedure.
    pub fn script(self, fragment: &Fragment) -> String {
        match self {
            Shape::Expression => {
                format!("x = {fragment}; {CAPTURE_PROCEDURE}(x);")
            }
            _ => fragment.to_string(),
        }
    }
}

/// One named corpus file pair and how much of it to produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub shape: Shape,
    /// Accepted samples to produce before moving on.
    pub quota: u64,
    /// Longest fragment, in characters, that may be recorded.
    pub max_length: usize,
}

impl Category {
    pub fn new(name: &str, shape: Shape, quota: u64, max_length: usize) -> Self {
        Self {
            name: name.to_string(),
            shape,
            quota,
            max_length,
        }
    }
}

pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new("01-expressions", Shape::Expression, 100_000, 200),
        Category::new("02-conditional-statements", Shape::Conditional, 1000, 1000),
        Category::new(
            "03-conditional-statements-with-statements",
            Shape::ConditionalWithStatements,
            100,
            5000,
        ),
        Category::new("04-while-loop", Shape::WhileLoop, 1000, 200),
        Category::new(
            "05-while-loop-with-statements",
            Shape::WhileLoopWithStatements,
            100,
            500,
        ),
        Category::new("06-do-while-loop", Shape::DoWhileLoop, 1000, 500),
        Category::new(
            "07-do-while-loop-with-statements",
            Shape::DoWhileLoopWithStatements,
            300,
            1000,
        ),
        Category::new("08-for-loop", Shape::ForLoop, 100, 200),
        Category::new(
            "09-for-loop-with-statements",
            Shape::ForLoopWithStatements,
            10,
            200,
        ),
    ]
}
