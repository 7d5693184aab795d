use std::{error, fmt};

/// Error returned by map operations.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// A key is not present in a map.
    KeyNotFound,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::KeyNotFound => write!(f, "key not found"),
        }
    }
}

impl error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Error::KeyNotFound.to_string(), "key not found");
    }

    #[test]
    fn boxed() {
        let error: Box<dyn error::Error + Send + Sync> = Error::KeyNotFound.into();

        assert_eq!(error.to_string(), "key not found");
    }
}
