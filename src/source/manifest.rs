//! JSON Lines asset listing reader.

use std::path::Path;

use futures::stream::{self, BoxStream, StreamExt};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};

use crate::error::{Error, Result};
use crate::source::types::AssetRecord;

/// One-pass stream of asset records.
pub type AssetStream<'a> = BoxStream<'a, Result<AssetRecord>>;

struct ReaderState {
    lines: Lines<BufReader<File>>,
    line_no: u64,
    done: bool,
}

/// Open a JSON Lines listing as a lazy asset stream.
///
/// Blank lines are ignored. A line that does not parse yields a
/// [`Error::MalformedRecord`] item and reading continues; an I/O error ends
/// the stream after being yielded.
pub async fn open_manifest(path: &Path) -> Result<AssetStream<'static>> {
    let file = File::open(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::Source(format!("Asset listing not found: {}", path.display()))
        } else {
            Error::Io(e)
        }
    })?;

    let state = ReaderState {
        lines: BufReader::new(file).lines(),
        line_no: 0,
        done: false,
    };

    let records = stream::unfold(state, |mut state| async move {
        if state.done {
            return None;
        }

        loop {
            state.line_no += 1;
            match state.lines.next_line().await {
                Ok(Some(line)) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    let item = parse_line(trimmed, state.line_no);
                    return Some((item, state));
                }
                Ok(None) => return None,
                Err(e) => {
                    state.done = true;
                    return Some((Err(Error::Io(e)), state));
                }
            }
        }
    });

    Ok(records.boxed())
}

/// Wrap already-fetched records in an asset stream.
pub fn from_records(records: Vec<AssetRecord>) -> AssetStream<'static> {
    stream::iter(records.into_iter().map(Ok)).boxed()
}

fn parse_line(line: &str, line_no: u64) -> Result<AssetRecord> {
    serde_json::from_str(line).map_err(|e| Error::MalformedRecord {
        line: line_no,
        message: e.to_string(),
    })
}
