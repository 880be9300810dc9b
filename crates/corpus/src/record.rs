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

//! The four-line record format shared with the script engine's test runner:
//!
//! ```text
//! <sequence number>
//! <script>
//! <uppercase hex result, or $error$>
//! $end$
//! ```

use std::io::{BufRead, Write};

use crate::error::CorpusError;

pub const ERROR_MARKER: &str = "$error$";
pub const TERMINATOR: &str = "$end$";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusRecord {
    pub sequence_number: u64,
    pub script: String,
    /// Rendered value, or [`ERROR_MARKER`].
    pub result: String,
}

impl CorpusRecord {
    pub fn accepted(sequence_number: u64, script: String, rendered: String) -> Self {
        Self {
            sequence_number,
            script,
            result: rendered,
        }
    }

    pub fn rejected(sequence_number: u64, script: String) -> Self {
        Self {
            sequence_number,
            script,
            result: ERROR_MARKER.to_string(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.result != ERROR_MARKER
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "{}", self.sequence_number)?;
        writeln!(out, "{}", self.script)?;
        writeln!(out, "{}", self.result)?;
        writeln!(out, "{TERMINATOR}")
    }
}

/// Uppercase hex digits, no prefix or sign, fitting in 64 bits.
fn is_rendered_value(text: &str) -> bool {
    (1..=16).contains(&text.len()) && text.bytes().all(|b| matches!(b, b'0'..=b'9' | b'A'..=b'F'))
}

/// Read back every record from `input`, validating the layout the way the test runner does.
pub fn parse_records<R: BufRead>(input: R) -> Result<Vec<CorpusRecord>, CorpusError> {
    let mut records = vec![];
    let mut lines = input.lines();
    let mut line_num = 0;

    let mut next_line = || -> Result<Option<(usize, String)>, CorpusError> {
        match lines.next() {
            Some(Ok(line)) => {
                line_num += 1;
                Ok(Some((line_num, line)))
            }
            Some(Err(e)) => Err(CorpusError::MalformedRecord {
                line: line_num + 1,
                message: format!("unreadable: {e}"),
            }),
            None => Ok(None),
        }
    };

    // A clean end of input is only allowed between records.
    while let Some((n, number)) = next_line()? {
        let sequence_number =
            number
                .trim()
                .parse::<u64>()
                .map_err(|_| CorpusError::MalformedRecord {
                    line: n,
                    message: format!("bad sequence number {number:?}"),
                })?;

        let mut last = n;
        let mut field = |what: &str| -> Result<(usize, String), CorpusError> {
            match next_line()? {
                Some((n, line)) => {
                    last = n;
                    Ok((n, line))
                }
                None => Err(CorpusError::MalformedRecord {
                    line: last,
                    message: format!("truncated record, expected {what}"),
                }),
            }
        };

        let (_, script) = field("script")?;
        let (n, result) = field("result")?;
        if result != ERROR_MARKER && !is_rendered_value(&result) {
            return Err(CorpusError::MalformedRecord {
                line: n,
                message: format!("bad result {result:?}"),
            });
        }
        let (n, terminator) = field("terminator")?;
        if terminator != TERMINATOR {
            return Err(CorpusError::MalformedRecord {
                line: n,
                message: format!("expected {TERMINATOR}, got {terminator:?}"),
            });
        }
        records.push(CorpusRecord {
            sequence_number,
            script,
            result,
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use pretty_assertions::assert_eq;
    use test_case::test_case;
    use unindent::unindent;

    use super::*;

    #[test]
    fn test_write_layout() {
        let mut out = vec![];
        CorpusRecord::accepted(3, "x = 0x5 + 0n3; test_statement(x);".into(), "8".into())
            .write_to(&mut out)
            .unwrap();
        CorpusRecord::rejected(4, " /* open".into())
            .write_to(&mut out)
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "3\nx = 0x5 + 0n3; test_statement(x);\n8\n$end$\n4\n /* open\n$error$\n$end$\n"
        );
    }

    #[test]
    fn test_parse_records() {
        let text = unindent(
            "
            1
            x = @rax; test_statement(x);
            1
            $end$
            7
             if (0x1 <> 0x2)  { test_statement(0x3); }
            $error$
            $end$
            ",
        );
        let records = parse_records(Cursor::new(text)).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].is_accepted());
        assert_eq!(records[1].sequence_number, 7);
        assert!(!records[1].is_accepted());
        assert_eq!(records[1].script, " if (0x1 <> 0x2)  { test_statement(0x3); }");
    }

    #[test]
    fn test_missing_terminator() {
        let text = "1\nx = 1;\n1\n2\n";
        assert!(matches!(
            parse_records(Cursor::new(text)),
            Err(CorpusError::MalformedRecord { line: 4, .. })
        ));
    }

    #[test]
    fn test_truncated_record_reports_last_line() {
        let text = "1\nx = 1;\n1\n$end$\n2\nx = 2;\n";
        assert!(matches!(
            parse_records(Cursor::new(text)),
            Err(CorpusError::MalformedRecord { line: 6, .. })
        ));
    }

    #[test_case("nope"; "not hex")]
    #[test_case("+8"; "signed")]
    #[test_case("3e"; "lowercase")]
    #[test_case("0x3E"; "prefixed")]
    #[test_case(""; "empty")]
    #[test_case("10000000000000000"; "wider than 64 bits")]
    fn test_bad_result(result: &str) {
        let text = format!("1\nx = 1;\n{result}\n$end$\n");
        assert!(matches!(
            parse_records(Cursor::new(text)),
            Err(CorpusError::MalformedRecord { line: 3, .. })
        ));
    }
}
