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

use std::path::PathBuf;

use clap::builder::ValueHint;
use clap_derive::Parser;
use eyre::eyre;
use figment::Figment;
use figment::providers::{Format as ProviderFormat, Serialized, Yaml};
use scriptgen_corpus::CorpusConfig;

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    #[arg(
        long,
        value_name = "config",
        help = "Path to configuration (YAML) file to use, if any. If not specified, defaults are used.\
                Configuration file values can be overridden by command line arguments.",
        value_hint = ValueHint::FilePath
    )]
    pub config_file: Option<PathBuf>,

    #[arg(
        long,
        value_name = "output-dir",
        help = "Directory the corpus files are written to",
        value_hint = ValueHint::DirPath
    )]
    pub output_dir: Option<PathBuf>,

    #[arg(long, help = "Seed for a reproducible corpus; random if not given")]
    pub seed: Option<u64>,

    #[arg(
        long,
        value_name = "depth",
        help = "Recursion depth at which the grammar only picks terminating productions"
    )]
    pub depth_ceiling: Option<usize>,

    #[arg(
        long,
        value_name = "attempts",
        help = "Give up on a category after this many generated fragments"
    )]
    pub max_attempts: Option<u64>,

    #[arg(
        long,
        value_name = "name",
        value_delimiter = ',',
        help = "Only generate the named categories (comma-separated)"
    )]
    pub only: Vec<String>,

    #[arg(
        long,
        value_name = "file",
        num_args = 1..,
        help = "Instead of generating, check the format of existing corpus files and report their record counts",
        value_hint = ValueHint::FilePath
    )]
    pub verify: Vec<PathBuf>,

    #[arg(long, help = "Enable debug logging")]
    pub debug: bool,
}

impl Args {
    fn merge_config(&self, mut config: CorpusConfig) -> Result<CorpusConfig, eyre::Report> {
        if let Some(output_dir) = self.output_dir.as_ref() {
            config.output_dir = output_dir.clone();
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(depth_ceiling) = self.depth_ceiling {
            config.grammar.depth_ceiling = depth_ceiling;
        }
        if let Some(max_attempts) = self.max_attempts {
            config.max_attempts = Some(max_attempts);
        }
        if !self.only.is_empty() {
            config.retain_categories(&self.only)?;
        }
        Ok(config)
    }

    /// Load the configuration file if we have it, then apply the command line on top.
    pub fn load_config(&self) -> Result<CorpusConfig, eyre::Report> {
        let config = match self.config_file.as_ref() {
            Some(config_path) => Figment::new()
                .merge(Serialized::defaults(CorpusConfig::default()))
                .merge(Yaml::file(config_path))
                .extract::<CorpusConfig>()
                .map_err(|e| {
                    eyre!(
                        "Failed to parse configuration from {:?}: {}",
                        config_path,
                        e
                    )
                })?,
            None => CorpusConfig::default(),
        };
        let config = self.merge_config(config)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use scriptgen_corpus::Shape;
    use unindent::unindent;

    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let args = Args::parse_from(["scriptgen"]);
        assert_eq!(args.load_config().unwrap(), CorpusConfig::default());
    }

    #[test]
    fn test_file_then_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scriptgen.yaml");
        std::fs::write(
            &path,
            unindent(
                "
                seed: 7
                max_attempts: 1000
                grammar:
                  depth_ceiling: 8
                categories:
                  - name: loops
                    shape: while-loop
                    quota: 4
                    max_length: 300
                  - name: exprs
                    shape: expression
                    quota: 10
                    max_length: 80
                ",
            ),
        )
        .unwrap();

        let args = Args::parse_from([
            "scriptgen",
            "--config-file",
            path.to_str().unwrap(),
            "--seed",
            "11",
            "--only",
            "exprs",
        ]);
        let config = args.load_config().unwrap();
        assert_eq!(config.seed, Some(11));
        assert_eq!(config.max_attempts, Some(1000));
        assert_eq!(config.grammar.depth_ceiling, 8);
        assert_eq!(config.grammar.force_valid_retries, 64);
        assert_eq!(config.categories.len(), 1);
        assert_eq!(config.categories[0].shape, Shape::Expression);
        assert_eq!(config.categories[0].max_length, 80);
    }

    #[test]
    fn test_unknown_category_rejected() {
        let args = Args::parse_from(["scriptgen", "--only", "01-expressions,99-nothing"]);
        assert!(args.load_config().is_err());
    }
}
