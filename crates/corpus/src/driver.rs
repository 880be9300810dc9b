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
use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;
use scriptgen_common::{Fragment, IdentifierTable};
use scriptgen_grammar::Generator;
use scriptgen_oracle::Oracle;
use tracing::{debug, info, trace};

use crate::category::{Category, Shape};
use crate::config::CorpusConfig;
use crate::error::CorpusError;
use crate::record::CorpusRecord;
use crate::writer::CorpusWriter;

/// Counters for one finished category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryReport {
    pub name: String,
    /// Every fragment generated, oversized ones included. Also the last sequence number used.
    pub attempts: u64,
    pub accepted: u64,
    pub rejected: u64,
    /// Fragments discarded for exceeding the length budget; never recorded.
    pub oversized: u64,
}

pub struct CorpusDriver {
    config: CorpusConfig,
    generator: Generator<StdRng>,
    oracle: Arc<Oracle>,
}

impl CorpusDriver {
    pub fn new(config: CorpusConfig) -> Result<Self, CorpusError> {
        config.validate()?;
        let identifiers = Arc::new(IdentifierTable::load());
        let oracle = Arc::new(Oracle::new(identifiers.clone(), config.oracle.clone()));
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let generator = Generator::new(rng, identifiers, config.grammar.clone())
            .with_validator(oracle.clone());
        Ok(Self {
            config,
            generator,
            oracle,
        })
    }

    pub fn config(&self) -> &CorpusConfig {
        &self.config
    }

    /// Run every configured category in order. Each category's files are closed before the next
    /// one starts.
    pub fn run(&mut self) -> Result<Vec<CategoryReport>, CorpusError> {
        let categories = self.config.categories.clone();
        categories
            .iter()
            .map(|category| self.run_category(category))
            .collect()
    }

    pub fn run_category(&mut self, category: &Category) -> Result<CategoryReport, CorpusError> {
        info!(
            category = %category.name,
            shape = %category.shape,
            quota = category.quota,
            max_length = category.max_length,
            "Generating category"
        );
        let start = Instant::now();
        let mut writer = CorpusWriter::create(&self.config.output_dir, &category.name)?;
        let mut report = CategoryReport {
            name: category.name.clone(),
            ..Default::default()
        };

        while report.accepted < category.quota {
            if let Some(max_attempts) = self.config.max_attempts
                && report.attempts >= max_attempts
            {
                return Err(CorpusError::AttemptsExhausted {
                    category: category.name.clone(),
                    attempts: report.attempts,
                    accepted: report.accepted,
                });
            }
            report.attempts += 1;

            let fragment = category.shape.generate(&mut self.generator);
            let length = fragment.char_len();
            if length > category.max_length {
                trace!(length, max_length = category.max_length, "Discarding oversized fragment");
                report.oversized += 1;
                continue;
            }

            let record = self.classify(report.attempts, category.shape, &fragment);
            if record.is_accepted() {
                report.accepted += 1;
            } else {
                debug!(sequence = report.attempts, fragment = %fragment, "Recording rejected sample");
                report.rejected += 1;
            }
            writer.append(&record)?;
        }

        writer.finish()?;
        info!(
            category = %report.name,
            attempts = report.attempts,
            accepted = report.accepted,
            rejected = report.rejected,
            oversized = report.oversized,
            "Finished category in {:?}",
            start.elapsed()
        );
        Ok(report)
    }

    /// Evaluate `fragment` and build the record for it.
    pub fn classify(&self, sequence_number: u64, shape: Shape, fragment: &Fragment) -> CorpusRecord {
        let script = shape.script(fragment);
        match self.oracle.evaluate(fragment.as_str(), shape.mode()).rendered() {
            Some(rendered) => CorpusRecord::accepted(sequence_number, script, rendered),
            None => CorpusRecord::rejected(sequence_number, script),
        }
    }
}
