//! Resolved tool contracts.
//!
//! A workflow engine describes a task as JSON: input files, output files, a process count and a
//! few task options. [`ResolvedToolContract::to_args`] turns that into the argument list the
//! command line would have had, so the task goes through ordinary option resolution.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::libs::error::Error;

pub const TOOL_ID: &str = "pbalign.tasks.pbalign";
pub const ALGORITHM_OPTIONS_ID: &str = "pbalign.task_options.algorithm_options";
pub const MIN_ACCURACY_ID: &str = "pbalign.task_options.min_accuracy";
pub const MIN_LENGTH_ID: &str = "pbalign.task_options.min_length";
pub const CONCORDANT_ID: &str = "pbalign.task_options.concordant";

#[derive(Debug, Clone, Deserialize)]
pub struct ResolvedToolContract {
    pub resolved_tool_contract: ResolvedTask,
    #[serde(skip)]
    path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResolvedTask {
    #[serde(default)]
    pub tool_contract_id: Option<String>,
    pub input_files: Vec<String>,
    pub output_files: Vec<String>,
    #[serde(default = "default_nproc")]
    pub nproc: usize,
    #[serde(default)]
    pub options: serde_json::Map<String, serde_json::Value>,
}

fn default_nproc() -> usize {
    1
}

impl ResolvedToolContract {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::Contract {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::parse(path, &text)
    }

    pub fn parse(path: impl AsRef<Path>, text: &str) -> Result<Self, Error> {
        let path = path.as_ref();
        let mut rtc: Self = serde_json::from_str(text).map_err(|e| Error::Contract {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        rtc.path = path.to_path_buf();

        if let Some(id) = &rtc.resolved_tool_contract.tool_contract_id {
            if id != TOOL_ID {
                log::warn!("tool contract id {} is not {}", id, TOOL_ID);
            }
        }
        Ok(rtc)
    }

    fn error(&self, reason: impl Into<String>) -> Error {
        Error::Contract {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }

    fn scalar(&self, id: &str) -> Result<Option<String>, Error> {
        match self.resolved_tool_contract.options.get(id) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
            Some(serde_json::Value::String(s)) => Ok(Some(s.clone())),
            Some(serde_json::Value::Bool(b)) => Ok(Some(b.to_string())),
            Some(other) => Err(self.error(format!("option {} is not a scalar: {}", id, other))),
        }
    }

    /// The equivalent command-line arguments, without the program name.
    ///
    /// Task options that are absent are left out, so their built-in defaults apply.
    pub fn to_args(&self) -> Result<Vec<String>, Error> {
        let task = &self.resolved_tool_contract;
        if task.input_files.len() < 2 {
            return Err(self.error("expected a subread set and a reference set as inputs"));
        }
        let output = task
            .output_files
            .first()
            .ok_or_else(|| self.error("expected one output file"))?;

        let mut args = vec![
            task.input_files[0].clone(),
            task.input_files[1].clone(),
            output.clone(),
            "--nproc".to_string(),
            task.nproc.to_string(),
        ];

        if let Some(v) = self.scalar(MIN_ACCURACY_ID)? {
            args.push("--minAccuracy".to_string());
            args.push(v);
        }
        if let Some(v) = self.scalar(MIN_LENGTH_ID)? {
            args.push("--minLength".to_string());
            args.push(v);
        }
        if let Some(v) = self.scalar(CONCORDANT_ID)? {
            if v == "true" {
                args.push("--concordant".to_string());
            }
        }
        if let Some(v) = self.scalar(ALGORITHM_OPTIONS_ID)? {
            // Quoted so a leading dash is never taken for a flag; resolution strips the quotes
            if !v.is_empty() {
                args.push(format!("--algorithmOptions=\"{}\"", v));
            }
        }

        Ok(args)
    }
}
