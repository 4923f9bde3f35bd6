//! Per-file errors collected during a run

use std::path::PathBuf;

use serde::Serialize;

/// What went wrong with a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// The input did not pass the linter, nothing was fixed
    Invalid,
    /// A fixer failed while rewriting the file
    Exception,
    /// The fixed output did not pass the linter
    Lint,
    /// Fixing passes kept changing the file
    Convergence,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Error {
    pub kind: ErrorKind,
    pub file_path: PathBuf,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, file_path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            kind,
            file_path: file_path.into(),
            message: message.into(),
        }
    }
}

/// Collects file errors so one bad file never stops the batch
#[derive(Debug, Clone, Default)]
pub struct ErrorsManager {
    errors: Vec<Error>,
}

impl ErrorsManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, error: Error) {
        tracing::debug!(
            kind = ?error.kind,
            path = %error.file_path.display(),
            message = %error.message,
            "file error reported"
        );
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Every error, in reporting order
    pub fn all(&self) -> &[Error] {
        &self.errors
    }

    pub fn get_invalid_errors(&self) -> Vec<&Error> {
        self.of_kind(ErrorKind::Invalid)
    }

    pub fn get_exception_errors(&self) -> Vec<&Error> {
        self.of_kind(ErrorKind::Exception)
    }

    pub fn get_lint_errors(&self) -> Vec<&Error> {
        self.of_kind(ErrorKind::Lint)
    }

    pub fn get_convergence_errors(&self) -> Vec<&Error> {
        self.of_kind(ErrorKind::Convergence)
    }

    /// Take over every error of `other`
    pub fn merge(&mut self, other: ErrorsManager) {
        self.errors.extend(other.errors);
    }

    fn of_kind(&self, kind: ErrorKind) -> Vec<&Error> {
        self.errors.iter().filter(|e| e.kind == kind).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_errors_are_grouped_by_kind() {
        let mut errors = ErrorsManager::new();
        assert!(errors.is_empty());

        errors.report(Error::new(ErrorKind::Invalid, "a.php", "PHP Parse error: x on line 1"));
        errors.report(Error::new(ErrorKind::Exception, "b.php", "boom"));
        errors.report(Error::new(ErrorKind::Invalid, "c.php", "PHP Parse error: y on line 2"));

        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get_invalid_errors().len(), 2);
        assert_eq!(errors.get_exception_errors()[0].file_path, PathBuf::from("b.php"));
        assert!(errors.get_lint_errors().is_empty());
        assert!(errors.get_convergence_errors().is_empty());
    }

    #[test]
    fn test_merge_keeps_order() {
        let mut first = ErrorsManager::new();
        first.report(Error::new(ErrorKind::Lint, "a.php", "lint"));
        let mut second = ErrorsManager::new();
        second.report(Error::new(ErrorKind::Convergence, "b.php", "loop"));

        first.merge(second);

        let paths: Vec<_> = first.all().iter().map(|e| e.file_path.clone()).collect();
        assert_eq!(paths, vec![PathBuf::from("a.php"), PathBuf::from("b.php")]);
        assert_eq!(first.get_convergence_errors().len(), 1);
    }
}
