//! End-to-end pipeline: extract, redact, parse, evaluate, assemble

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use reccheck_config::Config;
use reccheck_core::{Report, Result};
use reccheck_parser::RecordParser;
use reccheck_security::{Redaction, Redactor};
use reccheck_sources::ExtractorRegistry;

use crate::assembler::ReportAssembler;
use crate::engine::RuleEngine;

pub struct Checker {
    config: Config,
    registry: ExtractorRegistry,
    redactor: Redactor,
    parser: RecordParser,
    engine: RuleEngine,
    assembler: ReportAssembler,
    cancel: Option<Arc<AtomicBool>>,
}

impl Checker {
    /// Build the pipeline, validating the configuration first
    pub fn new(config: Config) -> Result<Self> {
        let engine = RuleEngine::new(&config)?;
        let parser = RecordParser::from_config(&config)?;
        let redactor = Redactor::new()
            .with_placeholder(config.redaction.name_placeholder.clone())
            .with_titled_names(config.redaction.mask_titled_names);

        Ok(Self {
            config,
            registry: ExtractorRegistry::new(),
            redactor,
            parser,
            engine,
            assembler: ReportAssembler::new(),
            cancel: None,
        })
    }

    /// Abandon the run between records once `flag` is set
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Configured names plus `extra`
    fn names(&self, extra: &[String]) -> Vec<String> {
        self.config
            .redaction
            .names
            .iter()
            .chain(extra)
            .cloned()
            .collect()
    }

    pub fn redact(&self, text: &str, extra_names: &[String]) -> Redaction {
        self.redactor.redact(text, &self.names(extra_names))
    }

    /// Check text that has already been extracted
    pub fn check_text(&self, text: &str, extra_names: &[String]) -> Result<Report> {
        let redaction = self.redact(text, extra_names);
        tracing::debug!("Redacted {} substrings", redaction.substitutions);

        let outcome = self.parser.parse(&redaction.text);
        tracing::info!(
            "Parsed {} student records, {} unparsed blocks",
            outcome.records.len(),
            outcome.failures.len()
        );

        let evaluations = self
            .engine
            .evaluate_all(&outcome.records, self.cancel.as_deref())?;

        Ok(self
            .assembler
            .report(evaluations, outcome.failures, redaction.substitutions))
    }

    /// Extract a document from disk and check it. Extraction failure aborts
    /// the run.
    pub async fn check_path(&self, path: &Path, extra_names: &[String]) -> Result<Report> {
        let document = self.registry.load(path).await?;
        tracing::info!("Extracted {} ({} chars)", document.source_uri, document.text.chars().count());

        let report = self.check_text(&document.text, extra_names)?;
        Ok(report.with_source_hash(document.content_hash))
    }
}
