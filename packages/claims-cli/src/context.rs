//! Application context with shared state and utilities

use anyhow::Result;
use claims::ClaimStore;
use console::style;
use serde::Serialize;
use std::path::Path;

use crate::config::Config;
use crate::inference::HostedInference;
use crate::output;
use crate::pipeline::{Operation, Outcome, Pipeline};

/// Application context passed to all commands
pub struct AppContext {
    pub config: Config,
    pub quiet: bool,
    pub json: bool,
}

impl AppContext {
    pub fn new(config_path: Option<&Path>, quiet: bool, json: bool) -> Result<Self> {
        let config = Config::load(config_path)?;
        Ok(Self {
            config,
            quiet,
            json,
        })
    }

    pub fn store(&self) -> ClaimStore {
        ClaimStore::new(self.config.data.path.clone())
    }

    /// Pipeline for `operation`, with the hosted backend attached only when
    /// the operation calls a model.
    pub fn pipeline(&self, operation: Operation) -> Result<Pipeline> {
        let pipeline = Pipeline::new(
            self.store(),
            self.config.prompts.abstractive_qa_system.as_str(),
        );
        if !operation.needs_inference() {
            return Ok(pipeline);
        }
        Ok(pipeline.with_inference(HostedInference::from_env(&self.config)?))
    }

    /// Print an outcome as JSON or text.
    pub fn emit(&self, outcome: &Outcome) -> Result<()> {
        if self.json {
            return self.emit_json(outcome);
        }
        if let Outcome::Analysis { .. } = outcome {
            let text = output::render(outcome);
            let (header, body) = text.split_once('\n').unwrap_or((text.as_str(), ""));
            self.print_header(header);
            println!("{body}");
        } else {
            println!("{}", output::render(outcome));
        }
        Ok(())
    }

    pub fn emit_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    pub fn print_header(&self, msg: &str) {
        if !self.quiet {
            println!("{}", style(msg).bold());
        }
    }

    pub fn print_success(&self, msg: &str) {
        if !self.quiet {
            println!("{}", style(msg).green());
        }
    }

    pub fn print_info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", style(msg).cyan());
        }
    }
}
