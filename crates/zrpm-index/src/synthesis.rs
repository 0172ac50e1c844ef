//! Reader for the compact summary stream (`synthesis.hdlist.cz`).
//!
//! The stream is gzip compressed text. Only three line kinds are used:
//!
//! ```text
//! @summary@VisualOn AMR-WB encoder library
//! @filesize@68793
//! @info@libvo-amrwbenc0-0.1.2-1-rosa2014.1.i586@0@143156@System/Libraries@rosa@2014.1
//! ```
//!
//! `@summary@` and `@filesize@` belong to the next `@info@` line, which
//! completes the record. Everything else (`@provides@`, `@requires@`, ...) is
//! skipped.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    mem,
    path::{Path, PathBuf},
};

use flate2::read::MultiGzDecoder;
use tracing::trace;
use zrpm_utils::fs::open_optional;

use crate::{
    error::{ErrorContext, IndexError, Result},
    package::{split_file_name, SummaryRecord},
};

const INFO_PREFIX: &str = "@info@";
const SUMMARY_PREFIX: &str = "@summary@";
const FILESIZE_PREFIX: &str = "@filesize@";

/// `@info@<fn>@<ignored>@<size>` at least. Lines shorter than the full 8-item
/// layout are accepted on purpose; missing group, disttag and distepoch stay empty.
const MIN_INFO_FIELDS: usize = 5;

#[derive(Default)]
struct SideFields {
    summary: String,
    installed_size: u64,
}

/// Iterator over the records of one summary stream.
///
/// Stops after the first error.
pub struct SummaryReader<R> {
    reader: R,
    path: PathBuf,
    repository: String,
    line_no: usize,
    side: SideFields,
    buf: Vec<u8>,
    done: bool,
}

impl SummaryReader<BufReader<MultiGzDecoder<File>>> {
    /// Opens the summary stream at `path`.
    ///
    /// Returns `Ok(None)` if the file does not exist or is empty.
    pub fn open<P: AsRef<Path>>(path: P, repository: &str) -> Result<Option<Self>> {
        let path = path.as_ref();
        let Some(file) = open_optional(path)? else {
            trace!(path = %path.display(), "summary stream not found");
            return Ok(None);
        };

        let len = file
            .metadata()
            .with_context(|| format!("reading metadata of {}", path.display()))?
            .len();
        if len == 0 {
            trace!(path = %path.display(), "summary stream is empty");
            return Ok(None);
        }

        let reader = BufReader::new(MultiGzDecoder::new(file));
        Ok(Some(Self::new(reader, path, repository)))
    }
}

impl<R: BufRead> SummaryReader<R> {
    pub fn new<P: AsRef<Path>>(reader: R, path: P, repository: &str) -> Self {
        Self {
            reader,
            path: path.as_ref().to_path_buf(),
            repository: repository.to_string(),
            line_no: 0,
            side: SideFields::default(),
            buf: Vec::new(),
            done: false,
        }
    }

    fn parse_error(&self, reason: String) -> IndexError {
        IndexError::Parse {
            path: self.path.clone(),
            line: self.line_no,
            reason,
        }
    }

    fn parse_size(&self, value: &str) -> Result<u64> {
        value.parse().map_err(|_| {
            IndexError::InvalidSize {
                path: self.path.clone(),
                line: self.line_no,
                value: value.to_string(),
            }
        })
    }

    fn parse_info(&mut self, line: &str) -> Result<SummaryRecord> {
        let items: Vec<&str> = line.split('@').collect();
        if items.len() < MIN_INFO_FIELDS {
            return Err(self.parse_error(format!(
                "expected at least {MIN_INFO_FIELDS} fields in info line, got {}",
                items.len()
            )));
        }

        let file_name = items[2];
        let package_size = self.parse_size(items[4])?;
        let (name, version, arch) =
            split_file_name(file_name).map_err(|err| self.parse_error(err.to_string()))?;

        let field = |i: usize| items.get(i).copied().unwrap_or_default().to_string();
        let side = mem::take(&mut self.side);

        Ok(SummaryRecord {
            file_name: file_name.to_string(),
            name,
            version,
            arch,
            disttag: field(6),
            distepoch: field(7),
            summary: side.summary,
            installed_size: side.installed_size,
            package_size,
            group: field(5),
            repository: self.repository.clone(),
        })
    }

    /// Reads lines until an info line completes a record.
    fn next_record(&mut self) -> Result<Option<SummaryRecord>> {
        loop {
            self.buf.clear();
            let read = self
                .reader
                .read_until(b'\n', &mut self.buf)
                .with_context(|| format!("reading {}", self.path.display()))?;
            if read == 0 {
                return Ok(None);
            }
            self.line_no += 1;

            let line = String::from_utf8_lossy(&self.buf)
                .trim_end_matches(|c: char| c == '\n' || c == '\r')
                .to_string();

            if line.starts_with(INFO_PREFIX) {
                return self.parse_info(&line).map(Some);
            }

            if let Some(summary) = line.strip_prefix(SUMMARY_PREFIX) {
                self.side.summary = summary.to_string();
                continue;
            }

            if line.starts_with(FILESIZE_PREFIX) {
                let items: Vec<&str> = line.split('@').collect();
                if items.len() < 3 {
                    return Err(self.parse_error("package filesize not found".to_string()));
                }
                self.side.installed_size = self.parse_size(items[2])?;
            }
        }
    }
}

impl<R: BufRead> Iterator for SummaryReader<R> {
    type Item = Result<SummaryRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use flate2::{write::GzEncoder, Compression};
    use tempfile::tempdir;

    use super::*;

    const SYNTHESIS: &str = "\
@provides@libvo-amrwbenc.so.0@libvo-amrwbenc0[== 0.1.2-1:2014.1]
@requires@libc.so.6@libc.so.6(GLIBC_2.0)@libc.so.6(GLIBC_2.1.3)
@summary@VisualOn AMR-WB encoder library
@filesize@68793
@info@libvo-amrwbenc0-0.1.2-1-rosa2014.1.i586@0@143156@System/Libraries@rosa@2014.1
@summary@Virtual printer
@info@boomaga-0.7.1-1-rosa2014.1.x86_64@0@512000@Publishing
";

    fn reader(content: &str) -> SummaryReader<Cursor<Vec<u8>>> {
        SummaryReader::new(Cursor::new(content.as_bytes().to_vec()), "synthesis.hdlist.cz", "Main")
    }

    #[test]
    fn test_read_records() {
        let records: Vec<SummaryRecord> = reader(SYNTHESIS).collect::<Result<_>>().unwrap();
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.file_name, "libvo-amrwbenc0-0.1.2-1-rosa2014.1.i586");
        assert_eq!(first.name, "libvo-amrwbenc0");
        assert_eq!(first.version, "0.1.2-1");
        assert_eq!(first.arch, "i586");
        assert_eq!(first.summary, "VisualOn AMR-WB encoder library");
        assert_eq!(first.installed_size, 68793);
        assert_eq!(first.package_size, 143156);
        assert_eq!(first.group, "System/Libraries");
        assert_eq!(first.disttag, "rosa");
        assert_eq!(first.distepoch, "2014.1");
        assert_eq!(first.repository, "Main");

        let second = &records[1];
        assert_eq!(second.summary, "Virtual printer");
        assert_eq!(second.installed_size, 0, "side fields must reset after info");
        assert_eq!(second.group, "Publishing");
        assert_eq!(second.disttag, "");
    }

    #[test]
    fn test_crlf_lines() {
        let content = "@summary@Windows line\r\n@info@foo-1.0-1-mdv.noarch@0@10@Misc\r\n";
        let records: Vec<SummaryRecord> = reader(content).collect::<Result<_>>().unwrap();

        assert_eq!(records[0].summary, "Windows line");
        assert_eq!(records[0].group, "Misc");
    }

    #[test]
    fn test_invalid_size() {
        let content = "@summary@x\n@info@foo-1.0-1-mdv.noarch@0@big@Misc\n";
        let mut iter = reader(content);

        match iter.next() {
            Some(Err(IndexError::InvalidSize { line, value, .. })) => {
                assert_eq!(line, 2);
                assert_eq!(value, "big");
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_minimal_info_line() {
        let records: Vec<SummaryRecord> = reader("@info@foo-1.0-1-mdv.noarch@0@10\n")
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(records[0].package_size, 10);
        assert!(records[0].group.is_empty());
        assert!(records[0].distepoch.is_empty());
    }

    #[test]
    fn test_too_few_fields() {
        let mut iter = reader("@info@foo-1.0-1-mdv.noarch@0\n");
        assert!(matches!(
            iter.next(),
            Some(Err(IndexError::Parse { line: 1, .. }))
        ));
    }

    #[test]
    fn test_bad_file_name() {
        let mut iter = reader("@info@foo.noarch@0@10@Misc\n");
        assert!(matches!(iter.next(), Some(Err(IndexError::Parse { .. }))));
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempdir().unwrap();
        let reader = SummaryReader::open(dir.path().join("synthesis.hdlist.cz"), "Main").unwrap();
        assert!(reader.is_none());
    }

    #[test]
    fn test_open_zero_byte_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("synthesis.hdlist.cz");
        std::fs::write(&path, b"").unwrap();

        assert!(SummaryReader::open(&path, "Main").unwrap().is_none());
    }

    #[test]
    fn test_open_gzip_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("synthesis.hdlist.cz");

        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(SYNTHESIS.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let records: Vec<SummaryRecord> = SummaryReader::open(&path, "Main")
            .unwrap()
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].name, "boomaga");
    }

    #[test]
    fn test_corrupt_gzip_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("synthesis.hdlist.cz");
        std::fs::write(&path, b"definitely not gzip").unwrap();

        let mut iter = SummaryReader::open(&path, "Main").unwrap().unwrap();
        assert!(matches!(iter.next(), Some(Err(IndexError::Io { .. }))));
    }
}
