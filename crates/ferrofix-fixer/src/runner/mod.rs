//! Fixer runner
//!
//! Applies an ordered fixer list to each file. A file is linted first;
//! invalid input is reported and left alone. The whole list then runs in
//! passes until one pass changes nothing. Every pass that changed the
//! stream is serialized, optionally re-linted and re-tokenized before the
//! next one. A pass that returns to an earlier state, or running out of
//! passes, is reported as non-convergence.
//!
//! Files are independent: a failure in one is recorded in the
//! [`ErrorsManager`] and the batch goes on.

mod errors;

pub use errors::{Error, ErrorKind, ErrorsManager};

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ferrofix_core::{Linter, LintingError, TokenizerLinter, TokensCache};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::WhitespaceConfig;
use crate::fixers::{FixContext, Fixer};

pub const DEFAULT_MAX_PASSES: usize = 10;

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Upper bound on full passes over the fixer list. With `0` no fixer
    /// runs and valid files are reported unchanged.
    pub max_passes: usize,
    /// Lint the output of every changing pass
    pub verify_output: bool,
    pub whitespace: WhitespaceConfig,
    /// Files not yet started when this is set are skipped
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_passes: DEFAULT_MAX_PASSES,
            verify_output: true,
            whitespace: WhitespaceConfig::default(),
            cancel: None,
        }
    }
}

/// A unit of source handed to the runner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub code: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, code: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            code: code.into(),
        }
    }
}

/// Outcome of fixing one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixStatus {
    Unchanged,
    Fixed,
    /// Input failed the linter, no fixer ran
    Invalid(LintingError),
    /// A fixer returned an error; the file is left as it was
    Exception { fixer: &'static str, message: String },
    /// Fixed output failed the linter; the file is left as it was
    Lint(LintingError),
    /// Still changing after `passes` passes. The code is the last pass output.
    NotConverged { passes: usize },
    /// The run was cancelled before this file started
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub status: FixStatus,
    /// Resulting code. Equal to the input unless the status is
    /// [`FixStatus::Fixed`] or [`FixStatus::NotConverged`].
    pub code: String,
    /// Fixers that changed the file, in order of their first change
    pub applied_fixers: Vec<&'static str>,
    changed: bool,
}

impl FileReport {
    fn new(file: &SourceFile, status: FixStatus, code: String, applied_fixers: Vec<&'static str>) -> Self {
        Self {
            path: file.path.clone(),
            changed: code != file.code,
            status,
            code,
            applied_fixers,
        }
    }

    fn untouched(file: &SourceFile, status: FixStatus) -> Self {
        Self::new(file, status, file.code.clone(), Vec::new())
    }

    /// Whether the resulting code differs from the input
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// The error to report for this file, if any
    pub fn error(&self) -> Option<Error> {
        let (kind, message) = match &self.status {
            FixStatus::Unchanged | FixStatus::Fixed | FixStatus::Skipped => return None,
            FixStatus::Invalid(error) => (ErrorKind::Invalid, error.to_string()),
            FixStatus::Exception { fixer, message } => {
                (ErrorKind::Exception, format!("Fixer \"{fixer}\" failed: {message}"))
            }
            FixStatus::Lint(error) => (ErrorKind::Lint, error.to_string()),
            FixStatus::NotConverged { passes } => (
                ErrorKind::Convergence,
                format!("Fixers did not converge after {passes} passes."),
            ),
        };
        Some(Error::new(kind, self.path.clone(), message))
    }
}

/// Result of a batch run
#[derive(Debug, Default)]
pub struct RunReport {
    /// One report per input file, in input order
    pub files: Vec<FileReport>,
    pub errors: ErrorsManager,
}

impl RunReport {
    pub fn changed_files(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| f.is_changed())
    }
}

pub struct Runner<'a> {
    fixers: Vec<&'a dyn Fixer>,
    config: RunnerConfig,
    linter: Box<dyn Linter>,
}

impl<'a> Runner<'a> {
    /// `fixers` must already be in execution order, see
    /// [`crate::factory::FixerFactory::get_fixers`]
    pub fn new(fixers: Vec<&'a dyn Fixer>, config: RunnerConfig) -> Self {
        Self {
            fixers,
            config,
            linter: Box::new(TokenizerLinter),
        }
    }

    pub fn with_linter(mut self, linter: Box<dyn Linter>) -> Self {
        self.linter = linter;
        self
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    fn is_cancelled(&self) -> bool {
        self.config.cancel.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Fix a batch of files in parallel
    pub fn fix(&self, files: &[SourceFile]) -> RunReport {
        info!(files = files.len(), fixers = self.fixers.len(), "starting run");

        let reports: Vec<FileReport> = files
            .par_iter()
            .map_init(TokensCache::new, |cache, file| {
                if self.is_cancelled() {
                    return FileReport::untouched(file, FixStatus::Skipped);
                }
                self.fix_with_cache(file, cache)
            })
            .collect();

        let mut errors = ErrorsManager::new();
        for report in &reports {
            if let Some(error) = report.error() {
                errors.report(error);
            }
        }

        let report = RunReport { files: reports, errors };
        info!(
            fixed = report.changed_files().count(),
            errors = report.errors.len(),
            "run finished"
        );
        report
    }

    /// Fix a single file with a fresh cache
    pub fn fix_file(&self, file: &SourceFile) -> FileReport {
        let mut cache = TokensCache::new();
        self.fix_with_cache(file, &mut cache)
    }

    fn lint(&self, code: &str) -> Result<(), LintingError> {
        self.linter.lint_source(code).check()
    }

    fn fix_with_cache(&self, file: &SourceFile, cache: &mut TokensCache) -> FileReport {
        let path: &Path = &file.path;

        if let Err(error) = self.lint(&file.code) {
            warn!(path = %path.display(), %error, "skipping invalid file");
            return FileReport::untouched(file, FixStatus::Invalid(error));
        }
        if self.config.max_passes == 0 {
            return FileReport::untouched(file, FixStatus::Unchanged);
        }

        let context = FixContext::new(self.config.whitespace).with_path(path);
        let mut tokens = cache.tokenize(&file.code);
        let mut seen = HashSet::from([tokens.code_hash()]);
        let mut code = file.code.clone();
        let mut applied: Vec<&'static str> = Vec::new();

        for pass in 1..=self.config.max_passes {
            let mut pass_changed = false;

            for fixer in &self.fixers {
                if !fixer.supports(Some(path)) || !fixer.is_candidate(&tokens) {
                    continue;
                }

                tokens.clear_changed();
                if let Err(error) = fixer.fix(&mut tokens, &context) {
                    warn!(path = %path.display(), fixer = fixer.name(), %error, "fixer failed");
                    return FileReport::new(
                        file,
                        FixStatus::Exception {
                            fixer: fixer.name(),
                            message: error.to_string(),
                        },
                        file.code.clone(),
                        applied,
                    );
                }

                if tokens.is_changed() {
                    tokens.clear_empty_tokens();
                    pass_changed = true;
                    if !applied.contains(&fixer.name()) {
                        applied.push(fixer.name());
                    }
                }
            }

            if !pass_changed {
                debug!(path = %path.display(), pass, "converged");
                return Self::finished(file, code, applied);
            }

            let output = tokens.generate_code();
            // flags without a textual change repeat forever otherwise
            if output == code {
                debug!(path = %path.display(), pass, "pass left the code as it was");
                return Self::finished(file, code, applied);
            }

            if self.config.verify_output {
                if let Err(error) = self.lint(&output) {
                    warn!(path = %path.display(), %error, fixers = ?applied, "fixed code is invalid");
                    return FileReport::new(file, FixStatus::Lint(error), file.code.clone(), applied);
                }
            }

            tokens = cache.tokenize(&output);
            code = output;
            if !seen.insert(tokens.code_hash()) {
                warn!(path = %path.display(), pass, fixers = ?applied, "fixers oscillate");
                return FileReport::new(file, FixStatus::NotConverged { passes: pass }, code, applied);
            }
        }

        warn!(
            path = %path.display(),
            passes = self.config.max_passes,
            fixers = ?applied,
            "fixers did not converge"
        );
        FileReport::new(
            file,
            FixStatus::NotConverged {
                passes: self.config.max_passes,
            },
            code,
            applied,
        )
    }

    fn finished(file: &SourceFile, code: String, applied: Vec<&'static str>) -> FileReport {
        let status = if code == file.code {
            FixStatus::Unchanged
        } else {
            FixStatus::Fixed
        };
        FileReport::new(file, status, code, applied)
    }
}
