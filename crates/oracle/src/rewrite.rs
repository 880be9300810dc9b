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

//! Translation from generated script text to host source.
//!
//! The scan is token based: words are matched against the identifier table whole, so `@r1` can
//! never be substituted inside `@r10`. Comment bodies are copied through untouched.

use scriptgen_common::{IdentifierTable, hex_literal};

pub fn rewrite(fragment: &str, identifiers: &IdentifierTable) -> String {
    let mut out = String::with_capacity(fragment.len() + fragment.len() / 4);
    let mut rest = fragment;

    while let Some(c) = rest.chars().next() {
        if rest.starts_with("/*") {
            // An unterminated comment runs to the end; the host rejects it.
            let end = rest[2..].find("*/").map_or(rest.len(), |i| i + 4);
            out.push_str(&rest[..end]);
            rest = &rest[end..];
        } else if rest.starts_with("//") {
            let end = rest.find('\n').unwrap_or(rest.len());
            out.push_str(&rest[..end]);
            rest = &rest[end..];
        } else if c == '/' {
            out.push_str(" / ");
            rest = &rest[1..];
        } else if is_word_start(c) {
            let end = word_end(rest, c.len_utf8());
            let word = &rest[..end];
            match word {
                "elsif" => out.push_str("else if"),
                _ => match identifiers.get(word) {
                    Some(value) => out.push_str(&hex_literal(value)),
                    None => out.push_str(word),
                },
            }
            rest = &rest[end..];
        } else if c.is_ascii_digit() {
            let end = word_end(rest, 1);
            let number = &rest[..end];
            if let Some(digits) = number.strip_prefix("0n") {
                out.push_str(digits);
            } else if let Some(digits) = number.strip_prefix("0y") {
                out.push_str("0b");
                out.push_str(digits);
            } else {
                out.push_str(number);
            }
            rest = &rest[end..];
        } else {
            out.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }
    out
}

fn is_word_start(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '_' | '@' | '$')
}

/// Byte offset where the run of word characters starting at `from` ends.
fn word_end(text: &str, from: usize) -> usize {
    text[from..]
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .map_or(text.len(), |i| i + from)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    fn table() -> IdentifierTable {
        IdentifierTable::from_pairs([("@r1", 0x1), ("@r10", 0xA), ("$proc", 0)])
    }

    #[test_case("0x5 + 0n3", "0x5 + 3"; "decimal prefix dropped")]
    #[test_case("0y101 | 17", "0b101 | 17"; "binary prefix translated")]
    #[test_case("@r10 - @r1", "0xA - 0x1"; "prefix names substituted whole")]
    #[test_case("$proc * 2", "0x0 * 2"; "pseudo register")]
    #[test_case("@r11 + 1", "@r11 + 1"; "unknown name left alone")]
    #[test_case("0x4/0n2", "0x4 / 2"; "bare slash padded")]
    #[test_case(" elsif (1 == 1) {}", " else if (1 == 1) {}"; "elsif spelled out")]
    #[test_case(" /* @r1 0n5 elsif */ @r1", " /* @r1 0n5 elsif */ 0x1"; "comment body untouched")]
    #[test_case(" // @r1\n@r1", " // @r1\n0x1"; "line comment ends at newline")]
    #[test_case(" /* never closed @r1", " /* never closed @r1"; "unterminated comment copied")]
    #[test_case("x_elsif = 1;", "x_elsif = 1;"; "keyword inside word")]
    fn test_rewrite(fragment: &str, expected: &str) {
        assert_eq!(rewrite(fragment, &table()), expected);
    }

    #[test]
    fn test_identifier_alone_becomes_its_value() {
        let identifiers = IdentifierTable::load();
        for identifier in identifiers.iter() {
            assert_eq!(
                rewrite(identifier.name, &identifiers),
                hex_literal(identifier.value)
            );
        }
    }

    #[test]
    fn test_rewrite_is_deterministic() {
        let identifiers = IdentifierTable::load();
        let fragment = " if (@rax + 0n3 == 0y11)  { test_statement(0x1F); } elsif ($ip / @r12 >= 0n0) {}";
        let first = rewrite(fragment, &identifiers);
        for _ in 0..10 {
            assert_eq!(rewrite(fragment, &identifiers), first);
        }
    }
}
