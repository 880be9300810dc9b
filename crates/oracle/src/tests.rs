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

use std::sync::Arc;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use scriptgen_common::{IdentifierTable, hex_literal};
use scriptgen_grammar::{COMPARATORS, Generator, GrammarOptions, LOOP_GUARD};
use test_case::test_case;

use crate::{EvalMode, EvaluationOutcome, Oracle, OracleError, OracleOptions, RuntimeError};

fn oracle() -> Oracle {
    Oracle::new(Arc::new(IdentifierTable::load()), OracleOptions::default())
}

#[test]
fn test_literal_round_trip() {
    let outcome = oracle().evaluate("0x5 + 0n3", EvalMode::Expression);
    assert_eq!(
        outcome,
        EvaluationOutcome {
            succeeded: true,
            value: 8
        }
    );
    assert_eq!(outcome.rendered().as_deref(), Some("8"));
}

#[test]
fn test_identifier_substitution_leaves_no_names() {
    let oracle = oracle();
    let identifiers = IdentifierTable::load();
    for identifier in identifiers.iter() {
        let rewritten = oracle.rewrite(identifier.name);
        assert_eq!(rewritten, hex_literal(identifier.value));
        assert!(!rewritten.contains(['@', '$']));
        assert_eq!(
            oracle.evaluate(identifier.name, EvalMode::Expression).value,
            identifier.value
        );
    }
}

#[test]
fn test_rendering_is_unsigned_hex() {
    let outcome = oracle().evaluate("~0x0", EvalMode::Expression);
    assert_eq!(outcome.rendered().as_deref(), Some("FFFFFFFFFFFFFFFF"));
    let outcome = oracle().evaluate("0x1F * 0n2", EvalMode::Expression);
    assert_eq!(outcome.rendered().as_deref(), Some("3E"));
}

#[test]
fn test_failure_has_zero_value_and_no_rendering() {
    let outcome = oracle().evaluate("(0x1 / 0x0)", EvalMode::Expression);
    assert_eq!(outcome, EvaluationOutcome::failed());
    assert_eq!(outcome.rendered(), None);
}

#[test]
fn test_unclosed_comment_always_rejected() {
    let oracle = oracle();
    for mode in [EvalMode::Conditional, EvalMode::Loop] {
        for _ in 0..5 {
            let outcome = oracle.evaluate(" /* This is a not closed comment", mode);
            assert!(!outcome.succeeded);
        }
    }
}

#[test]
fn test_well_formed_comment_statement_accepted() {
    let outcome = oracle().evaluate(" /* This is a comment */", EvalMode::Conditional);
    assert_eq!(outcome.rendered().as_deref(), Some("0"));
}

#[test_case(" == ", true; "equal")]
#[test_case(" <= ", true; "less or equal")]
#[test_case(" >= ", true; "greater or equal")]
#[test_case(" != ", true; "not equal")]
#[test_case(" > ", true; "greater")]
#[test_case(" < ", true; "less")]
#[test_case(" ", false; "space")]
#[test_case(" <> ", false; "angle pair")]
#[test_case(" >< ", false; "reversed angle pair")]
#[test_case(" ! ", false; "bang")]
#[test_case(" ; ", false; "semicolon")]
#[test_case(" = ", false; "assignment")]
#[test_case("((", false; "double open paren")]
#[test_case("(", false; "open paren")]
#[test_case(")", false; "close paren")]
#[test_case("))", false; "double close paren")]
fn test_comparator_classification(comparator: &str, accepted: bool) {
    let oracle = oracle();
    for (lhs, rhs) in [("0x1", "0x2"), ("@rax", "0n1"), ("(0x3 + 0y1)", "-0x4")] {
        let fragment = format!(" if ({lhs}{comparator}{rhs})  {{ test_statement(0x1); }}");
        assert_eq!(
            oracle.evaluate(&fragment, EvalMode::Conditional).succeeded,
            accepted,
            "{fragment}"
        );
    }
}

#[test]
fn test_comparator_verdict_ignores_operands() {
    let oracle = oracle();
    let mut accepted = 0;
    for comparator in COMPARATORS {
        let verdicts: Vec<bool> = [("0x1", "0x2"), ("$teb", "@r13"), ("~0n7", "(0y0)")]
            .iter()
            .map(|(lhs, rhs)| {
                let fragment = format!(" if ({lhs}{comparator}{rhs})  {{ test_statement(0x1); }}");
                oracle.evaluate(&fragment, EvalMode::Conditional).succeeded
            })
            .collect();
        assert!(
            verdicts.iter().all(|v| *v == verdicts[0]),
            "{comparator:?}: {verdicts:?}"
        );
        if verdicts[0] {
            accepted += 1;
        }
    }
    assert_eq!(accepted, 6);
}

#[test]
fn test_taken_branch_is_captured() {
    let oracle = oracle();
    let fragment = " if (@rax == 0x2)  { test_statement(0xA); } else if (@rax == 0x1) { test_statement(0xB); } else { test_statement(0xC); }";
    assert_eq!(oracle.evaluate(fragment, EvalMode::Conditional).value, 0xB);
    let fragment = " if (0x1 > 0x2)  { test_statement(0xA); } elsif (0x1 > 0x3) { test_statement(0xB); }";
    let outcome = oracle.evaluate(fragment, EvalMode::Conditional);
    assert!(outcome.succeeded);
    assert_eq!(outcome.value, 0);
}

#[test]
fn test_loop_without_capture_reports_counter() {
    let fragment = format!(" while  (0x1 < 0x2)  {{ {LOOP_GUARD} }}");
    let outcome = oracle().evaluate(&fragment, EvalMode::Loop);
    assert_eq!(outcome.rendered().as_deref(), Some("1000"));
}

#[test]
fn test_loop_capture_wins_over_counter() {
    let fragment = format!(" while  (0x1 < 0x2)  {{ {LOOP_GUARD} test_statement(0x2A); }}");
    let outcome = oracle().evaluate(&fragment, EvalMode::Loop);
    assert_eq!(outcome.rendered().as_deref(), Some("2A"));
}

#[test]
fn test_loop_counter_unknown_outside_loop_mode() {
    let fragment = format!(" while  (0x1 < 0x2)  {{ {LOOP_GUARD} }}");
    assert!(matches!(
        oracle().try_evaluate(&fragment, EvalMode::Conditional),
        Err(OracleError::Check(_))
    ));
}

#[test]
fn test_fuel_exhaustion_is_a_failure() {
    let oracle = Oracle::new(
        Arc::new(IdentifierTable::load()),
        OracleOptions { fuel: 100 },
    );
    let fragment = format!(" do  {{  {LOOP_GUARD} }} while ( 0x1 == 0x1) ;");
    assert_eq!(
        oracle.try_evaluate(&fragment, EvalMode::Loop),
        Err(OracleError::Runtime(RuntimeError::OutOfFuel(100)))
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// The injected guard bounds every generated loop, so no fragment exhausts a generous budget.
    #[test]
    fn prop_generated_loops_terminate(seed in any::<u64>(), with_statements in any::<bool>()) {
        let identifiers = Arc::new(IdentifierTable::load());
        let oracle = Arc::new(Oracle::new(identifiers.clone(), OracleOptions { fuel: 50_000_000 }));
        let mut generator = Generator::new(
            StdRng::seed_from_u64(seed),
            identifiers,
            GrammarOptions::default(),
        )
        .with_validator(oracle.clone());

        for fragment in [
            generator.while_statement(with_statements),
            generator.do_while_statement(with_statements),
            generator.for_statement(with_statements),
        ] {
            let result = oracle.try_evaluate(fragment.as_str(), EvalMode::Loop);
            prop_assert!(
                !matches!(result, Err(OracleError::Runtime(RuntimeError::OutOfFuel(_)))),
                "{}",
                fragment
            );
        }
    }
}
