use serde::Serialize;

use crate::utils::prelude::Error;

/// Lines are 1-based, columns 0-based.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Mapping {
    pub generated: Position,
    pub original: Position
}

/// Simplified position map written next to the emitted script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceMap {
    pub version: u32,
    pub sources: Vec<String>,
    pub mappings: Vec<Mapping>
}

impl SourceMap {
    pub const VERSION: u32 = 1;

    pub fn new(source: impl Into<String>, mappings: Vec<Mapping>) -> Self {
        Self {
            version: Self::VERSION,
            sources: vec![source.into()],
            mappings
        }
    }

    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string(self).map_err(|err| Error::Serialize { message: err.to_string() })
    }
}
