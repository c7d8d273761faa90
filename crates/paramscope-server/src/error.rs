use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Server error: {0}")]
    Server(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] hyper::Error),

    #[error("Analysis error: {0}")]
    Core(#[from] paramscope_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_converts() {
        let err: Error = paramscope_core::Error::Parse("bad input".to_string()).into();
        assert!(matches!(err, Error::Core(_)));
        assert_eq!(
            err.to_string(),
            "Analysis error: Failed to parse parameters: bad input"
        );
    }
}
