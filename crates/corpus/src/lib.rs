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

//! Produces the differential test corpus: per category, generate fragments, let the oracle
//! classify them and append each to the category's accepted or rejected file.

mod category;
mod config;
mod driver;
mod error;
mod record;
mod writer;

pub use category::{Category, Shape, default_categories};
pub use config::CorpusConfig;
pub use driver::{CategoryReport, CorpusDriver};
pub use error::CorpusError;
pub use record::{CorpusRecord, ERROR_MARKER, TERMINATOR, parse_records};
pub use writer::{ACCEPTED_SUFFIX, CorpusWriter, REJECTED_SUFFIX, accepted_path, rejected_path};
