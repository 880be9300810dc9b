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

//! Pieces shared between the grammar engine and the oracle: the table of symbolic identifiers,
//! the append-only fragment buffer, and the trait the generator uses to ask "does this
//! expression evaluate cleanly?" without depending on the oracle itself.

mod fragment;
mod identifiers;
mod validate;

pub use fragment::{Fragment, FragmentBuilder};
pub use identifiers::{Identifier, IdentifierTable, hex_literal};
pub use validate::ExpressionValidator;

/// The one procedure a generated fragment may call. Its single argument is the value the fragment
/// reports.
pub const CAPTURE_PROCEDURE: &str = "test_statement";
