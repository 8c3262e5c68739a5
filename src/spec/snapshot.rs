//! Snapshot schema (the pipelines document served by the status endpoint).
//!
//! JSON shape:
//! {
//!   "version": "1",                          // optional
//!   "pipelines": [
//!     {
//!       "name": "eventids",
//!       "max_seconds_to_reach_end": 900,     // must be > 0
//!       "root": "step2",
//!       "services": [
//!         {
//!           "name": "step2",
//!           "children": ["step3"],           // display order, kept as declared
//!           "required": false,               // optional
//!           "stats": { "events_seen": 100, "events_expected": 100 }
//!         },
//!         ...
//!       ]
//!     }
//!   ]
//! }
//!
//! Everything here is plain data. Shape errors (missing fields, negative
//! counters, a zero deadline) are rejected by serde; topology errors are left
//! to `ServiceIndex` and `TreeBuilder`.

use crate::Result;

use anyhow::Context;
use regex::Regex;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Read;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub pipelines: Vec<PipelineDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PipelineDefinition {
    pub name: String,

    /// Informational bound on end-to-end latency, in seconds.
    #[serde(deserialize_with = "positive_seconds")]
    pub max_seconds_to_reach_end: u64,

    pub root: String,

    #[serde(default)]
    pub services: Vec<ServiceRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceRecord {
    pub name: String,

    #[serde(default)]
    pub children: Vec<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub stats: Stats,
}

/// Raw event counters reported by one service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub events_seen: u64,
    pub events_expected: u64,
}

impl Stats {
    pub fn new(events_seen: u64, events_expected: u64) -> Self {
        Self {
            events_seen,
            events_expected,
        }
    }

    /// `expected - seen`. Negative when more events arrived than expected.
    pub fn lost(&self) -> i128 {
        i128::from(self.events_expected) - i128::from(self.events_seen)
    }
}

fn positive_seconds<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = u64::deserialize(deserializer)?;
    if secs == 0 {
        return Err(de::Error::invalid_value(
            de::Unexpected::Unsigned(0),
            &"a positive number of seconds",
        ));
    }
    Ok(secs)
}

impl Snapshot {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let snapshot: Snapshot =
            serde_json::from_str(text).context("parse pipeline snapshot json")?;
        Ok(snapshot)
    }

    /// Load a snapshot from a file, or from stdin when `path` is `-`.
    pub fn load(path: &str) -> Result<Self> {
        let text = if path == "-" {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("read snapshot from stdin")?;
            buf
        } else {
            fs::read_to_string(path).with_context(|| format!("read snapshot file {}", path))?
        };

        Self::from_json_str(&text).with_context(|| format!("invalid snapshot in {}", path))
    }

    /// Keep only pipelines whose name matches `pattern`.
    pub fn retain_matching(&mut self, pattern: &str) -> Result<()> {
        let re = Regex::new(pattern)
            .with_context(|| format!("invalid pipeline name pattern {:?}", pattern))?;
        self.pipelines.retain(|p| re.is_match(&p.name));
        Ok(())
    }
}
