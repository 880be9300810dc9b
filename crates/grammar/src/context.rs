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

/// Per-fragment recursion bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationContext {
    depth: usize,
    ceiling: usize,
    high_water: usize,
}

impl GenerationContext {
    pub fn new(ceiling: usize) -> Self {
        Self {
            depth: 0,
            ceiling,
            high_water: 0,
        }
    }

    pub fn reset(&mut self) {
        self.depth = 0;
        self.high_water = 0;
    }

    pub(crate) fn enter(&mut self) {
        self.depth += 1;
        self.high_water = self.high_water.max(self.depth);
    }

    pub(crate) fn exit(&mut self) {
        debug_assert!(self.depth > 0, "exit without matching enter");
        self.depth -= 1;
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    /// Deepest level reached since the last reset.
    pub fn high_water(&self) -> usize {
        self.high_water
    }

    pub fn at_ceiling(&self) -> bool {
        self.depth >= self.ceiling
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_exit_is_symmetric() {
        let mut ctx = GenerationContext::new(3);
        ctx.enter();
        ctx.enter();
        assert_eq!(ctx.depth(), 2);
        assert!(!ctx.at_ceiling());
        ctx.enter();
        assert!(ctx.at_ceiling());
        ctx.exit();
        ctx.exit();
        ctx.exit();
        assert_eq!(ctx.depth(), 0);
        assert_eq!(ctx.high_water(), 3);
    }

    #[test]
    fn test_reset_clears_high_water() {
        let mut ctx = GenerationContext::new(1);
        ctx.enter();
        ctx.exit();
        ctx.reset();
        assert_eq!(ctx.high_water(), 0);
        assert_eq!(ctx.ceiling(), 1);
    }
}
