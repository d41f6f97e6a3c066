use crate::schema::RawEvent;
use crate::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

/// Parse one JSONL line of a recorded completion stream
pub fn parse_event_line(line: &str) -> serde_json::Result<RawEvent> {
    serde_json::from_str(line)
}

/// Open a JSONL recording and read it lazily, one event per line.
///
/// Blank lines are skipped. A line that is not an event record is yielded
/// as an error; reading may continue past it.
pub fn read_recording(path: &Path) -> Result<RecordingReader<BufReader<File>>> {
    let file = File::open(path)?;
    Ok(RecordingReader::new(BufReader::new(file)))
}

/// Pull-based reader over JSONL event records
pub struct RecordingReader<R> {
    lines: Lines<R>,
    line_number: usize,
}

impl<R: BufRead> RecordingReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
        }
    }
}

impl<R: BufRead> Iterator for RecordingReader<R> {
    type Item = Result<RawEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => return Some(Err(Error::Io(err))),
            };
            self.line_number += 1;

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            return Some(parse_event_line(line).map_err(|source| Error::Parse {
                line: self.line_number,
                source,
            }));
        }
    }
}
