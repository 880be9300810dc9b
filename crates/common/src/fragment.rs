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

use std::fmt::{Display, Formatter};

/// One generated unit of source text. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fragment {
    text: String,
}

impl Fragment {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in characters, which is what the per-category budgets are expressed in.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl Display for Fragment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for Fragment {
    fn from(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

/// Append-only buffer the grammar producers write into.
#[derive(Debug, Default)]
pub struct FragmentBuilder {
    buffer: String,
}

impl FragmentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, text: &str) -> &mut Self {
        self.buffer.push_str(text);
        self
    }

    pub fn push_char(&mut self, c: char) -> &mut Self {
        self.buffer.push(c);
        self
    }

    pub fn push_fmt(&mut self, args: std::fmt::Arguments<'_>) -> &mut Self {
        // Writing into a String cannot fail.
        let _ = std::fmt::Write::write_fmt(&mut self.buffer, args);
        self
    }

    /// Bytes written so far. Producers use this to measure a span they just emitted.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Text written since byte offset `start`.
    pub fn since(&self, start: usize) -> &str {
        &self.buffer[start..]
    }

    /// Drop everything after byte offset `len`, discarding a rejected candidate.
    pub fn truncate(&mut self, len: usize) {
        self.buffer.truncate(len);
    }

    pub fn finish(self) -> Fragment {
        Fragment { text: self.buffer }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder_appends_in_order() {
        let mut b = FragmentBuilder::new();
        b.push("0x5").push(" + ").push_fmt(format_args!("0n{}", 3));
        assert_eq!(b.since(3), " + 0n3");
        let fragment = b.finish();
        assert_eq!(fragment.as_str(), "0x5 + 0n3");
        assert_eq!(fragment.char_len(), 9);
    }

    #[test]
    fn test_truncate_discards_tail() {
        let mut b = FragmentBuilder::new();
        b.push("@rax");
        let mark = b.len();
        b.push(" | 0x1");
        b.truncate(mark);
        assert_eq!(b.finish().as_str(), "@rax");
    }

    #[test]
    fn test_empty_fragment() {
        let fragment = FragmentBuilder::new().finish();
        assert!(fragment.is_empty());
        assert_eq!(fragment.char_len(), 0);
    }
}
