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

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::CorpusError;
use crate::record::CorpusRecord;

pub const ACCEPTED_SUFFIX: &str = "-correct.txt";
pub const REJECTED_SUFFIX: &str = "-wrong.txt";

pub fn accepted_path(directory: &Path, name: &str) -> PathBuf {
    directory.join(format!("{name}{ACCEPTED_SUFFIX}"))
}

pub fn rejected_path(directory: &Path, name: &str) -> PathBuf {
    directory.join(format!("{name}{REJECTED_SUFFIX}"))
}

struct CorpusFile {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl CorpusFile {
    fn create(path: PathBuf) -> Result<Self, CorpusError> {
        let file = File::create(&path).map_err(CorpusError::io(&path))?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    fn append(&mut self, record: &CorpusRecord) -> Result<(), CorpusError> {
        record
            .write_to(&mut self.writer)
            .map_err(CorpusError::io(&self.path))
    }

    fn finish(mut self) -> Result<PathBuf, CorpusError> {
        self.writer.flush().map_err(CorpusError::io(&self.path))?;
        Ok(self.path)
    }
}

/// The accepted/rejected file pair for one category. Both files are truncated on creation.
pub struct CorpusWriter {
    accepted: CorpusFile,
    rejected: CorpusFile,
}

impl CorpusWriter {
    pub fn create(directory: &Path, name: &str) -> Result<Self, CorpusError> {
        std::fs::create_dir_all(directory).map_err(CorpusError::io(directory))?;
        Ok(Self {
            accepted: CorpusFile::create(accepted_path(directory, name))?,
            rejected: CorpusFile::create(rejected_path(directory, name))?,
        })
    }

    /// Append to whichever file matches the record's verdict.
    pub fn append(&mut self, record: &CorpusRecord) -> Result<(), CorpusError> {
        if record.is_accepted() {
            self.accepted.append(record)
        } else {
            self.rejected.append(record)
        }
    }

    /// Flush and close both files, returning their paths.
    pub fn finish(self) -> Result<(PathBuf, PathBuf), CorpusError> {
        Ok((self.accepted.finish()?, self.rejected.finish()?))
    }
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::io::BufReader;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::record::parse_records;

    #[test]
    fn test_records_split_by_verdict() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = CorpusWriter::create(dir.path(), "01-expressions").unwrap();
        writer
            .append(&CorpusRecord::accepted(1, "x = 0x1; test_statement(x);".into(), "1".into()))
            .unwrap();
        writer
            .append(&CorpusRecord::rejected(2, "x = (0x1 / 0x0); test_statement(x);".into()))
            .unwrap();
        writer
            .append(&CorpusRecord::accepted(3, "x = 0y11; test_statement(x);".into(), "3".into()))
            .unwrap();
        let (accepted, rejected) = writer.finish().unwrap();
        assert_eq!(accepted, dir.path().join("01-expressions-correct.txt"));
        assert_eq!(rejected, dir.path().join("01-expressions-wrong.txt"));

        let accepted = parse_records(BufReader::new(File::open(accepted).unwrap())).unwrap();
        let rejected = parse_records(BufReader::new(File::open(rejected).unwrap())).unwrap();
        assert_eq!(
            accepted.iter().map(|r| r.sequence_number).collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].sequence_number, 2);
    }

    #[test]
    fn test_create_truncates_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = CorpusWriter::create(dir.path(), "04-while-loop").unwrap();
        writer
            .append(&CorpusRecord::rejected(1, " while  (0x1 <> 0x2) {}".into()))
            .unwrap();
        writer.finish().unwrap();

        let (_, rejected) = CorpusWriter::create(dir.path(), "04-while-loop")
            .unwrap()
            .finish()
            .unwrap();
        assert_eq!(std::fs::read_to_string(rejected).unwrap(), "");
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("corpus").join("run");
        let (accepted, _) = CorpusWriter::create(&nested, "08-for-loop")
            .unwrap()
            .finish()
            .unwrap();
        assert!(accepted.exists());
    }
}
