//! Netlister configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Output options shared by all dialects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetlistOptions {
    /// Indentation per nesting level in Spectre and Verilog module bodies.
    pub indent: String,
    /// Extra comment lines written after the package header.
    pub header: Vec<String>,
}

impl Default for NetlistOptions {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            header: Vec::new(),
        }
    }
}

impl NetlistOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-level indentation.
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Append a header comment line.
    pub fn with_header_line(mut self, line: impl Into<String>) -> Self {
        self.header.push(line.into());
        self
    }

    /// Load options from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
