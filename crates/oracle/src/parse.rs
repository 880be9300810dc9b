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

/// Runs the Pest parser over host source and converts the result into our AST.
use lazy_static::lazy_static;
use pest::Parser;
use pest::error::LineColLocation;
use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::{Assoc, Op, PrattParser};

use crate::ast::{BinaryOp, Comparison, Condition, Expr, Simple, Step, Stmt, UnaryOp};
use crate::errors::ParseError;
use crate::parse::host::{HostParser, Rule};

pub mod host {
    use pest_derive::Parser;

    #[derive(Parser)]
    #[grammar = "src/host.pest"]
    pub struct HostParser;
}

lazy_static! {
    // Precedence from lowest to highest, all left associative.
    static ref PRATT: PrattParser<Rule> = PrattParser::new()
        .op(Op::infix(Rule::bor, Assoc::Left))
        .op(Op::infix(Rule::bxor, Assoc::Left))
        .op(Op::infix(Rule::band, Assoc::Left))
        .op(Op::infix(Rule::shl, Assoc::Left) | Op::infix(Rule::shr, Assoc::Left))
        .op(Op::infix(Rule::add, Assoc::Left) | Op::infix(Rule::sub, Assoc::Left))
        .op(Op::infix(Rule::mul, Assoc::Left)
            | Op::infix(Rule::div, Assoc::Left)
            | Op::infix(Rule::modulus, Assoc::Left))
        .op(Op::prefix(Rule::neg) | Op::prefix(Rule::pos) | Op::prefix(Rule::bnot));
}

pub fn parse_program(program_text: &str) -> Result<Vec<Stmt>, ParseError> {
    let mut pairs = HostParser::parse(Rule::program, program_text).map_err(|e| {
        let (line, column) = match e.line_col {
            LineColLocation::Pos(lc) => lc,
            LineColLocation::Span(begin, _) => begin,
        };
        ParseError::Syntax {
            line,
            column,
            message: e.variant.message().to_string(),
        }
    })?;
    let program = next_pair(&mut pairs, "program")?;

    let mut stmts = vec![];
    for pair in program.into_inner() {
        if pair.as_rule() == Rule::EOI {
            continue;
        }
        stmts.push(parse_statement(pair)?);
    }
    Ok(stmts)
}

fn next_pair<'i>(pairs: &mut Pairs<'i, Rule>, what: &str) -> Result<Pair<'i, Rule>, ParseError> {
    pairs
        .next()
        .ok_or_else(|| ParseError::Unexpected(format!("end of {what}")))
}

fn unexpected(pair: &Pair<Rule>) -> ParseError {
    ParseError::Unexpected(format!("{:?}", pair.as_rule()))
}

fn parse_statement(pair: Pair<Rule>) -> Result<Stmt, ParseError> {
    match pair.as_rule() {
        Rule::block => {
            let body = pair
                .into_inner()
                .map(parse_statement)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Stmt::Block(body))
        }
        Rule::if_statement => {
            let mut parts = pair.into_inner();
            let condition = parse_condition(next_pair(&mut parts, "if")?)?;
            let then = Box::new(parse_statement(next_pair(&mut parts, "if")?)?);
            let otherwise = parts.next().map(parse_statement).transpose()?.map(Box::new);
            Ok(Stmt::If {
                condition,
                then,
                otherwise,
            })
        }
        Rule::while_statement => {
            let mut parts = pair.into_inner();
            let condition = parse_condition(next_pair(&mut parts, "while")?)?;
            let body = Box::new(parse_statement(next_pair(&mut parts, "while")?)?);
            Ok(Stmt::While { condition, body })
        }
        Rule::do_while_statement => {
            let mut parts = pair.into_inner();
            let body = Box::new(parse_statement(next_pair(&mut parts, "do")?)?);
            let condition = parse_condition(next_pair(&mut parts, "do")?)?;
            Ok(Stmt::DoWhile { body, condition })
        }
        Rule::for_statement => {
            let mut parts = pair.into_inner();
            let init = next_pair(&mut parts, "for")?
                .into_inner()
                .next()
                .map(parse_simple)
                .transpose()?;
            let condition = next_pair(&mut parts, "for")?
                .into_inner()
                .next()
                .map(parse_condition)
                .transpose()?;
            let update = next_pair(&mut parts, "for")?
                .into_inner()
                .next()
                .map(parse_simple)
                .transpose()?;
            let body = Box::new(parse_statement(next_pair(&mut parts, "for")?)?);
            Ok(Stmt::For {
                init,
                condition,
                update,
                body,
            })
        }
        Rule::break_statement => Ok(Stmt::Break),
        Rule::continue_statement => Ok(Stmt::Continue),
        Rule::empty_statement => Ok(Stmt::Empty),
        Rule::simple_statement => {
            let simple = parse_simple(next_pair(&mut pair.into_inner(), "statement")?)?;
            Ok(Stmt::Simple(simple))
        }
        _ => Err(unexpected(&pair)),
    }
}

fn parse_simple(pair: Pair<Rule>) -> Result<Simple, ParseError> {
    match pair.as_rule() {
        Rule::call => {
            let mut parts = pair.into_inner();
            let name = next_pair(&mut parts, "call")?.as_str().to_string();
            let args = next_pair(&mut parts, "call")?
                .into_inner()
                .map(|arg| parse_expr(arg.into_inner()))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Simple::Call { name, args })
        }
        Rule::assignment => {
            let mut parts = pair.into_inner();
            let name = next_pair(&mut parts, "assignment")?.as_str().to_string();
            let value = parse_expr(next_pair(&mut parts, "assignment")?.into_inner())?;
            Ok(Simple::Assign { name, value })
        }
        Rule::post_step => {
            let mut parts = pair.into_inner();
            let name = next_pair(&mut parts, "step")?.as_str().to_string();
            let step = parse_step(next_pair(&mut parts, "step")?)?;
            Ok(Simple::Step { name, step })
        }
        Rule::pre_step => {
            let mut parts = pair.into_inner();
            let step = parse_step(next_pair(&mut parts, "step")?)?;
            let name = next_pair(&mut parts, "step")?.as_str().to_string();
            Ok(Simple::Step { name, step })
        }
        _ => Err(unexpected(&pair)),
    }
}

fn parse_step(pair: Pair<Rule>) -> Result<Step, ParseError> {
    match pair.as_rule() {
        Rule::increment => Ok(Step::Increment),
        Rule::decrement => Ok(Step::Decrement),
        _ => Err(unexpected(&pair)),
    }
}

fn parse_condition(pair: Pair<Rule>) -> Result<Condition, ParseError> {
    let mut parts = pair.into_inner();
    let lhs = parse_expr(next_pair(&mut parts, "condition")?.into_inner())?;
    let comparator = next_pair(&mut parts, "condition")?;
    let op = match comparator.as_rule() {
        Rule::eq => Comparison::Eq,
        Rule::ne => Comparison::Ne,
        Rule::lt => Comparison::Lt,
        Rule::le => Comparison::Le,
        Rule::gt => Comparison::Gt,
        Rule::ge => Comparison::Ge,
        _ => return Err(unexpected(&comparator)),
    };
    let rhs = parse_expr(next_pair(&mut parts, "condition")?.into_inner())?;
    Ok(Condition { op, lhs, rhs })
}

fn parse_expr(pairs: Pairs<Rule>) -> Result<Expr, ParseError> {
    PRATT
        .map_primary(parse_primary)
        .map_prefix(|op, rhs| {
            let op = match op.as_rule() {
                Rule::neg => UnaryOp::Neg,
                Rule::pos => UnaryOp::Plus,
                Rule::bnot => UnaryOp::BitNot,
                _ => return Err(unexpected(&op)),
            };
            Ok(Expr::Unary(op, Box::new(rhs?)))
        })
        .map_infix(|lhs, op, rhs| {
            let op = match op.as_rule() {
                Rule::bor => BinaryOp::BitOr,
                Rule::bxor => BinaryOp::BitXor,
                Rule::band => BinaryOp::BitAnd,
                Rule::shl => BinaryOp::Shl,
                Rule::shr => BinaryOp::Shr,
                Rule::add => BinaryOp::Add,
                Rule::sub => BinaryOp::Sub,
                Rule::mul => BinaryOp::Mul,
                Rule::div => BinaryOp::Div,
                Rule::modulus => BinaryOp::Mod,
                _ => return Err(unexpected(&op)),
            };
            Ok(Expr::Binary(op, Box::new(lhs?), Box::new(rhs?)))
        })
        .parse(pairs)
}

fn parse_primary(pair: Pair<Rule>) -> Result<Expr, ParseError> {
    let text = pair.as_str();
    match pair.as_rule() {
        // Hex and binary literals cover the full unsigned range and wrap into the signed one.
        Rule::hex => u64::from_str_radix(&text[2..], 16)
            .map(|v| Expr::Literal(v as i64))
            .map_err(|_| ParseError::LiteralRange(text.to_string())),
        Rule::binary => u64::from_str_radix(&text[2..], 2)
            .map(|v| Expr::Literal(v as i64))
            .map_err(|_| ParseError::LiteralRange(text.to_string())),
        Rule::decimal => text
            .parse::<i64>()
            .map(Expr::Literal)
            .map_err(|_| ParseError::LiteralRange(text.to_string())),
        Rule::ident => Ok(Expr::Var(text.to_string())),
        Rule::paren => parse_expr(next_pair(&mut pair.into_inner(), "parentheses")?.into_inner()),
        _ => Err(unexpected(&pair)),
    }
}
