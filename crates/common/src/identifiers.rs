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

use indexmap::IndexMap;

/// Registers, mapped to small sequential integers standing in for their register index.
const REGISTERS: &[&str] = &[
    "@rax", "@rcx", "@rdx", "@rbx", "@rsp", "@rbp", "@rsi", "@rdi", "@r8", "@r9", "@r10", "@r11",
    "@r12", "@r13",
];

/// Pseudo-registers have no value known at generation time, so they all read as zero.
const PSEUDO_REGISTERS: &[&str] = &["$proc", "$thread", "$teb", "$ip", "$buffer"];

/// One symbolic name and the value the oracle substitutes for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identifier<'a> {
    pub name: &'a str,
    pub value: i64,
}

/// Insertion-ordered mapping from symbolic names to their ground-truth values.
///
/// Names are expected to be unique. Inserting a duplicate replaces the value in place, which the
/// callers treat as a programming error rather than something to guard against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierTable {
    entries: IndexMap<String, i64>,
}

impl IdentifierTable {
    /// The compiled-in set of registers and pseudo-registers.
    pub fn load() -> Self {
        let registers = REGISTERS
            .iter()
            .zip(1i64..)
            .map(|(name, value)| (*name, value));
        let pseudo_registers = PSEUDO_REGISTERS.iter().map(|name| (*name, 0));
        Self::from_pairs(registers.chain(pseudo_registers))
    }

    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, i64)>,
    {
        let entries = pairs
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.entries.get(name).copied()
    }

    pub fn get_index(&self, index: usize) -> Option<Identifier<'_>> {
        self.entries
            .get_index(index)
            .map(|(name, value)| Identifier {
                name: name.as_str(),
                value: *value,
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = Identifier<'_>> {
        self.entries.iter().map(|(name, value)| Identifier {
            name: name.as_str(),
            value: *value,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The `0x`-prefixed uppercase form used when an identifier is replaced by its value.
pub fn hex_literal(value: i64) -> String {
    format!("0x{value:X}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_registers_are_sequential() {
        let table = IdentifierTable::load();
        assert_eq!(table.get("@rax"), Some(1));
        assert_eq!(table.get("@rcx"), Some(2));
        assert_eq!(table.get("@r13"), Some(14));
    }

    #[test]
    fn test_load_pseudo_registers_are_zero() {
        let table = IdentifierTable::load();
        for name in PSEUDO_REGISTERS {
            assert_eq!(table.get(name), Some(0), "{name}");
        }
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let table = IdentifierTable::load();
        let names: Vec<_> = table.iter().map(|i| i.name).collect();
        let expected: Vec<_> = REGISTERS.iter().chain(PSEUDO_REGISTERS).copied().collect();
        assert_eq!(names, expected);
        assert_eq!(table.get_index(0).map(|i| i.name), Some("@rax"));
    }

    #[test]
    fn test_unknown_name() {
        let table = IdentifierTable::load();
        assert_eq!(table.get("@rip"), None);
        assert_eq!(table.get("rax"), None);
    }

    #[test]
    fn test_hex_literal() {
        assert_eq!(hex_literal(0), "0x0");
        assert_eq!(hex_literal(0xb), "0xB");
        assert_eq!(hex_literal(-1), "0xFFFFFFFFFFFFFFFF");
    }
}
