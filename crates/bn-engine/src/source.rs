//! Where a network definition comes from.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use crate::EngineResult;

/// A topology or configuration source handed to
/// [`NetworkEngine::init`][crate::NetworkEngine::init].
///
/// `Inline` is convenient for tests and for networks embedded in a binary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NetworkSource {
    File(PathBuf),
    Inline(String),
}

impl NetworkSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    pub fn inline(text: impl Into<String>) -> Self {
        Self::Inline(text.into())
    }

    /// Open the source for reading.
    pub fn open(&self) -> EngineResult<Box<dyn Read + '_>> {
        match self {
            Self::File(path) => Ok(Box::new(File::open(path)?)),
            Self::Inline(text) => Ok(Box::new(text.as_bytes())),
        }
    }
}

impl fmt::Display for NetworkSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Inline(text) => write!(f, "<inline, {} bytes>", text.len()),
        }
    }
}
