use thiserror::Error;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("Unknown job '{job_id}'.")]
    UnknownJob { job_id: String },
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
