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

use std::collections::HashSet;
use std::path::PathBuf;

use scriptgen_grammar::GrammarOptions;
use scriptgen_oracle::OracleOptions;
use serde::{Deserialize, Serialize};

use crate::category::{Category, default_categories};
use crate::error::CorpusError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    pub output_dir: PathBuf,
    /// Fixed seed for a reproducible run; drawn from the OS when absent.
    pub seed: Option<u64>,
    pub grammar: GrammarOptions,
    pub oracle: OracleOptions,
    /// Attempts a single category may spend before the run gives up on it.
    pub max_attempts: Option<u64>,
    pub categories: Vec<Category>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            seed: None,
            grammar: GrammarOptions::default(),
            oracle: OracleOptions::default(),
            max_attempts: None,
            categories: default_categories(),
        }
    }
}

impl CorpusConfig {
    pub fn validate(&self) -> Result<(), CorpusError> {
        if self.categories.is_empty() {
            return Err(CorpusError::Config("no categories configured".into()));
        }
        let probability = self.grammar.continuation_probability;
        if !(0.0..=1.0).contains(&probability) {
            return Err(CorpusError::Config(format!(
                "continuation probability {probability} is not within [0, 1]"
            )));
        }
        let mut seen = HashSet::new();
        for category in &self.categories {
            if category.name.is_empty()
                || category.name.contains(['/', '\\'])
                || category.name.starts_with('.')
            {
                return Err(CorpusError::Config(format!(
                    "category name {:?} is not usable as a file name",
                    category.name
                )));
            }
            if !seen.insert(category.name.as_str()) {
                return Err(CorpusError::Config(format!(
                    "category {} configured twice",
                    category.name
                )));
            }
        }
        Ok(())
    }

    /// Keep only the named categories, in their configured order.
    pub fn retain_categories(&mut self, names: &[String]) -> Result<(), CorpusError> {
        if let Some(unknown) = names
            .iter()
            .find(|name| !self.categories.iter().any(|c| &c.name == *name))
        {
            return Err(CorpusError::Config(format!("unknown category {unknown}")));
        }
        self.categories.retain(|c| names.contains(&c.name));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::category::Shape;

    #[test]
    fn test_default_is_valid() {
        CorpusConfig::default().validate().unwrap();
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut config = CorpusConfig::default();
        config
            .categories
            .push(Category::new("08-for-loop", Shape::ForLoop, 1, 200));
        assert!(matches!(config.validate(), Err(CorpusError::Config(_))));
    }

    #[test]
    fn test_path_names_rejected() {
        let config = CorpusConfig {
            categories: vec![Category::new("../escape", Shape::Expression, 1, 200)],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(CorpusError::Config(_))));
    }

    #[test]
    fn test_probability_must_be_a_probability() {
        for probability in [f64::NAN, f64::INFINITY, -0.1, 1.5] {
            let mut config = CorpusConfig::default();
            config.grammar.continuation_probability = probability;
            assert!(
                matches!(config.validate(), Err(CorpusError::Config(_))),
                "{probability}"
            );
        }
    }

    #[test]
    fn test_retain_keeps_order() {
        let mut config = CorpusConfig::default();
        config
            .retain_categories(&["08-for-loop".into(), "01-expressions".into()])
            .unwrap();
        let names: Vec<&str> = config.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["01-expressions", "08-for-loop"]);
        assert!(config.retain_categories(&["10-switch".into()]).is_err());
    }
}
