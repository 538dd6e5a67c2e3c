// src/sink.rs
// =============================================================================
// Collects page records during the crawl and writes them out at the end.
//
// Output is always a JSON array of {"title", "url", "desc"} objects, in one of
// two layouts:
// - array:  pretty-printed, the whole array at once
// - stream: "[", one compact object per line separated by commas, "]"
//
// Records are kept in the order pages finished, which with concurrent fetches
// is not the order they were discovered.
// =============================================================================

use crate::error::SinkError;
use crate::extract::{is_sanitized, sanitize};
use clap::ValueEnum;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// One harvested page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRecord {
    pub title: String,
    pub url: String,
    #[serde(rename = "desc")]
    pub description: String,
}

impl PageRecord {
    /// `title` and `description` come from the extractor already sanitised;
    /// the URL gets the same treatment here.
    pub fn new(title: String, url: &str, description: String) -> Self {
        Self {
            title,
            url: sanitize(url),
            description,
        }
    }

    // Name of the first field that would need escaping, if any
    fn unsanitized_field(&self) -> Option<&'static str> {
        if !is_sanitized(&self.title) {
            Some("title")
        } else if !is_sanitized(&self.url) {
            Some("url")
        } else if !is_sanitized(&self.description) {
            Some("desc")
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    Array,
    Stream,
}

#[derive(Debug, Default)]
pub struct ResultSink {
    records: Mutex<Vec<PageRecord>>,
}

impl ResultSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, record: PageRecord) {
        self.records.lock().push(record);
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Copy of everything appended so far, in completion order
    pub fn records(&self) -> Vec<PageRecord> {
        self.records.lock().clone()
    }

    /// Renders all records. A record that escaped sanitisation is a bug and
    /// fails the whole output rather than producing something half-right.
    pub fn serialize(&self, mode: OutputMode) -> Result<String, SinkError> {
        let records = self.records.lock();

        if let Some((record, field)) = records
            .iter()
            .find_map(|r| r.unsanitized_field().map(|field| (r, field)))
        {
            return Err(SinkError::Unsanitized {
                url: record.url.clone(),
                field,
            });
        }

        match mode {
            OutputMode::Array => Ok(serde_json::to_string_pretty(&*records)?),
            OutputMode::Stream => {
                let mut out = String::from("[\n");
                for (i, record) in records.iter().enumerate() {
                    if i > 0 {
                        out.push_str(",\n");
                    }
                    out.push_str(&serde_json::to_string(record)?);
                }
                out.push_str("\n]");
                Ok(out)
            }
        }
    }

    /// Serialises and writes to `path`, or to stdout when `path` is "-"
    pub fn write_to(&self, path: &Path, mode: OutputMode) -> Result<usize, SinkError> {
        let text = self.serialize(mode)?;
        let write_err = |source: std::io::Error| SinkError::Write {
            path: path.to_path_buf(),
            source,
        };

        if path == Path::new("-") {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{text}").map_err(write_err)?;
            stdout.flush().map_err(write_err)?;
        } else {
            std::fs::write(path, format!("{text}\n")).map_err(write_err)?;
        }

        Ok(self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(n: usize) -> PageRecord {
        PageRecord::new(
            format!("Page {n}"),
            &format!("https://example.com/{n}"),
            format!("Description {n}"),
        )
    }

    #[test]
    fn test_json_uses_desc_key() {
        let sink = ResultSink::new();
        sink.append(record(1));

        let value: serde_json::Value = serde_json::from_str(&sink.serialize(OutputMode::Array).unwrap()).unwrap();
        let object = value[0].as_object().unwrap();
        let mut keys: Vec<_> = object.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["desc", "title", "url"]);
        assert_eq!(object["desc"], "Description 1");
    }

    #[test]
    fn test_both_modes_parse_to_the_same_records() {
        let sink = ResultSink::new();
        for n in 0..3 {
            sink.append(record(n));
        }

        for mode in [OutputMode::Array, OutputMode::Stream] {
            let parsed: Vec<PageRecord> = serde_json::from_str(&sink.serialize(mode).unwrap()).unwrap();
            assert_eq!(parsed, sink.records());
        }
    }

    #[test]
    fn test_empty_sink_is_an_empty_array() {
        let sink = ResultSink::new();
        for mode in [OutputMode::Array, OutputMode::Stream] {
            let parsed: Vec<PageRecord> = serde_json::from_str(&sink.serialize(mode).unwrap()).unwrap();
            assert!(parsed.is_empty());
        }
    }

    #[test]
    fn test_url_is_sanitized_on_construction() {
        let record = PageRecord::new("t".into(), "https://example.com/\"quoted\"", "d".into());
        assert_eq!(record.url, "https://example.com/'quoted'");
    }

    #[test]
    fn test_unsanitized_record_is_fatal() {
        let sink = ResultSink::new();
        sink.append(record(1));
        sink.append(PageRecord {
            title: "Broken\ntitle".into(),
            url: "https://example.com/bad".into(),
            description: "ok".into(),
        });

        let err = sink.serialize(OutputMode::Array).unwrap_err();
        assert!(matches!(
            err,
            SinkError::Unsanitized { ref url, field: "title" } if url == "https://example.com/bad"
        ));
    }

    #[test]
    fn test_write_to_file() {
        let path = std::env::temp_dir().join(format!("page-harvester-{}.json", std::process::id()));
        let sink = ResultSink::new();
        sink.append(record(7));

        assert_eq!(sink.write_to(&path, OutputMode::Stream).unwrap(), 1);
        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<PageRecord> = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, vec![record(7)]);

        std::fs::remove_file(&path).unwrap();
    }
}
