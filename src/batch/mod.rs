use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::output::{self, FailureRecord};
use crate::resolver::{input_lines, VideoId};
use crate::sources::SourceChain;

/// What happened to one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Transcript(PathBuf),
    Failure(PathBuf),
}

/// Totals for one batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub transcripts: usize,
    pub failures: usize,
    pub elapsed: Duration,
}

impl BatchSummary {
    pub fn processed(&self) -> usize {
        self.transcripts + self.failures
    }
}

/// Drives the source chain over every id in an input file
pub struct BatchRunner {
    chain: SourceChain,
    show_progress: bool,
}

impl BatchRunner {
    pub fn new(chain: SourceChain) -> Self {
        Self {
            chain,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Process every id listed in `input` and write artifacts into `output`.
    ///
    /// Only an unreadable input file or an unwritable output directory abort
    /// the run; per-id failures are recorded and the batch continues.
    pub async fn run(&self, input: &Path, output: &Path) -> Result<BatchSummary> {
        let content = fs_err::read_to_string(input)
            .context("Failed to read input file")?;
        fs_err::create_dir_all(output)
            .context("Failed to create output directory")?;

        let lines: Vec<&str> = input_lines(&content).collect();
        tracing::info!("Processing {} entries from {}", lines.len(), input.display());

        let progress = self.progress_bar(lines.len() as u64);
        let start_time = Instant::now();
        let mut summary = BatchSummary::default();

        for line in lines {
            progress.set_message(line.to_string());

            match self.process_line(line, output).await? {
                LineOutcome::Transcript(_) => summary.transcripts += 1,
                LineOutcome::Failure(_) => summary.failures += 1,
            }

            progress.inc(1);
        }

        progress.finish_and_clear();
        summary.elapsed = start_time.elapsed();

        Ok(summary)
    }

    /// Resolve one line, run the chain and persist exactly one artifact
    pub async fn process_line(&self, raw: &str, output: &Path) -> Result<LineOutcome> {
        let video_id = match VideoId::parse(raw) {
            Ok(video_id) => video_id,
            Err(err) => {
                let path = output::save_invalid_input(output, &FailureRecord::new(raw, &err))?;
                return Ok(LineOutcome::Failure(path));
            }
        };

        match self.chain.fetch(&video_id).await {
            Ok(transcript) => {
                let path = output::save_transcript(output, video_id.as_str(), &transcript)?;
                Ok(LineOutcome::Transcript(path))
            }
            Err(err) => {
                let path = output::save_failure(output, &FailureRecord::new(video_id.as_str(), &err))?;
                Ok(LineOutcome::Failure(path))
            }
        }
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::with_draw_target(Some(len), ProgressDrawTarget::hidden());
        }

        let progress = ProgressBar::new(len);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        progress
    }
}
