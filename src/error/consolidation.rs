use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsolidationError {
    #[error("I/O error during {context} for '{path}': {source}")]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed sample line: {line:?}")]
    MalformedSample { line: String },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}

impl ConsolidationError {
    pub(crate) fn io(context: &'static str, path: &Path, source: std::io::Error) -> Self {
        ConsolidationError::Io {
            context,
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn malformed(line: &str) -> Self {
        ConsolidationError::MalformedSample {
            line: line.trim_end().to_owned(),
        }
    }
}
