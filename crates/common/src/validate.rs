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

/// Something that can tell whether a generated expression evaluates without error.
///
/// The grammar engine uses this for operands that must not fail, e.g. the right-hand side of a
/// comparison. The oracle is the production implementation.
pub trait ExpressionValidator: Send + Sync {
    fn is_valid_expression(&self, expression: &str) -> bool;
}
