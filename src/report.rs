//! Serializable report handed to the rendering layer.

use crate::Result;
use crate::model::{ModelOutput, PipelineSnapshot};

use anyhow::Context;
use serde::Serialize;
use std::fs;

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub version: Option<String>,
    pub pipelines: Vec<PipelineSnapshot>,
    pub errors: Vec<ReportError>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportError {
    pub pipeline: String,
    pub kind: &'static str,
    pub service: String,
    pub message: String,
}

impl Report {
    pub fn new(version: Option<String>, output: ModelOutput) -> Self {
        let errors = output
            .errors
            .iter()
            .map(|e| ReportError {
                pipeline: e.pipeline.clone(),
                kind: e.source.kind(),
                service: e.source.service().to_string(),
                message: e.source.to_string(),
            })
            .collect();

        Self {
            version,
            pipelines: output.snapshots,
            errors,
        }
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    pub fn write(&self, path: &str, pretty: bool) -> Result<()> {
        let json = self.to_json(pretty)?;
        fs::write(path, json).with_context(|| format!("write report to {}", path))?;
        Ok(())
    }
}
