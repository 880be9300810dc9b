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

mod args;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Parser;
use eyre::WrapErr;
use scriptgen_corpus::{CorpusDriver, parse_records};
use tracing::{error, info};
use tracing_subscriber::fmt::format::FmtSpan;

use crate::args::Args;

fn verify(paths: &[PathBuf]) -> Result<(), eyre::Report> {
    let mut failures = 0;
    for path in paths {
        let file = File::open(path).wrap_err_with(|| format!("Unable to open {path:?}"))?;
        match parse_records(BufReader::new(file)) {
            Ok(records) => {
                let accepted = records.iter().filter(|r| r.is_accepted()).count();
                info!(
                    ?path,
                    records = records.len(),
                    accepted,
                    rejected = records.len() - accepted,
                    "Corpus file is well formed"
                );
            }
            Err(e) => {
                error!(?path, "{e}");
                failures += 1;
            }
        }
    }
    if failures > 0 {
        return Err(eyre::eyre!("{failures} corpus file(s) failed verification"));
    }
    Ok(())
}

fn main() -> Result<(), eyre::Report> {
    color_eyre::install()?;
    let args: Args = Args::parse();

    let main_subscriber = tracing_subscriber::fmt()
        .compact()
        .with_ansi(true)
        .with_span_events(FmtSpan::NONE)
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_thread_names(false)
        .with_max_level(if args.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .finish();
    tracing::subscriber::set_global_default(main_subscriber).unwrap_or_else(|e| {
        eprintln!("Unable to set configure logging: {e}");
        std::process::exit(1);
    });

    if !args.verify.is_empty() {
        return verify(&args.verify);
    }

    let config = args.load_config()?;
    info!(
        output_dir = ?config.output_dir,
        seed = ?config.seed,
        categories = config.categories.len(),
        "scriptgen {}",
        env!("CARGO_PKG_VERSION")
    );

    let mut driver = CorpusDriver::new(config)?;
    let reports = driver.run()?;
    let attempts: u64 = reports.iter().map(|r| r.attempts).sum();
    let accepted: u64 = reports.iter().map(|r| r.accepted).sum();
    info!(attempts, accepted, "Corpus complete");
    Ok(())
}
