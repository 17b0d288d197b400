//! Error types for spicenet-netlist.

use std::fmt;

use spicenet_ir::{QualifiedName, SpiceType};
use thiserror::Error;

use crate::format::NetlistFormat;

/// Result type for netlisting operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while netlisting. All of them abort the current write.
#[derive(Debug, Error)]
pub enum Error {
    /// Local module reference to a module not yet defined in the package.
    #[error("undefined module `{name}`")]
    UndefinedModule { name: String },

    /// Name not present in the built-in primitive table.
    #[error("undefined primitive `{name}`")]
    UndefinedPrimitive { name: String },

    /// Built-in primitive of a kind that cannot be netlisted as a built-in.
    #[error("invalid primitive `{name}` of kind {kind}")]
    InvalidPrimitive { name: String, kind: SpiceType },

    /// Reference into the technology-independent primitive domain.
    #[error(
        "`{name}` is a technology-independent primitive; compile to a target technology, or replace with an ExternalModule"
    )]
    NonNetlistablePrimitive { name: String },

    #[error("undefined external module `{name}`")]
    UndefinedExternalModule { name: QualifiedName },

    #[error("external module `{name}` is registered more than once")]
    DuplicateExternalModule { name: QualifiedName },

    /// Two local modules with the same (sanitized) name.
    #[error("module `{name}` is doubly defined")]
    DuplicateModule { name: String },

    /// Two different modules claim the same netlist name.
    #[error("{namespace} name `{name}` is claimed by both {first} and {second}")]
    NameConflict {
        namespace: Namespace,
        name: String,
        first: String,
        second: String,
    },

    /// Required parameter without override or default.
    #[error("missing required parameter `{param}`")]
    MissingParameter { param: String },

    /// Parameter declaration without the default the dialect requires.
    #[error("parameter `{param}` has no default value")]
    MissingDefault { param: String },

    #[error("invalid value for parameter `{param}`: {reason}")]
    InvalidParamValue { param: String, reason: String },

    #[error("unconnected port `{port}`")]
    UnconnectedPort { port: String },

    /// Connection to a port the target module does not declare.
    #[error("connection to unknown port `{port}` of `{module}`")]
    UnknownPort { port: String, module: String },

    #[error("port `{port}` is connected more than once")]
    DuplicateConnection { port: String },

    #[error("duplicate port `{name}`")]
    DuplicatePort { name: String },

    #[error("duplicate signal `{name}`")]
    DuplicateSignal { name: String },

    #[error("undefined signal `{name}`")]
    UnknownSignal { name: String },

    #[error("signal `{name}` has zero width")]
    InvalidWidth { name: String },

    #[error("empty slice `{signal}[{top}:{bot}]`")]
    EmptySlice { signal: String, top: usize, bot: usize },

    #[error("slice `{signal}[{top}:{bot}]` exceeds signal width {width}")]
    SliceOutOfRange {
        signal: String,
        top: usize,
        bot: usize,
        width: usize,
    },

    #[error("empty concatenation")]
    EmptyConcat,

    /// Port without a direction, where the dialect needs one.
    #[error("port `{port}` has no direction")]
    UndirectedPort { port: String },

    #[error("top module `{name}` not found")]
    UndefinedTop { name: String },

    #[error("top module `{name}` must have exactly one port, found {count}")]
    TopPortCount { name: String, count: usize },

    /// Valid input the chosen dialect cannot express.
    #[error("{feature} is not supported by the {format} netlister")]
    Unsupported {
        format: NetlistFormat,
        feature: String,
    },

    #[error("invalid analysis `{name}`: {reason}")]
    InvalidAnalysis { name: String, reason: String },

    #[error("unknown netlist format `{0}`")]
    UnknownFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("in instance `{instance}`: {source}")]
    InInstance {
        instance: String,
        source: Box<Error>,
    },

    #[error("in module `{module}`: {source}")]
    InModule { module: String, source: Box<Error> },
}

/// Netlist name spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Subckt,
    Model,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::Subckt => f.write_str("subcircuit"),
            Namespace::Model => f.write_str("model"),
        }
    }
}

/// Broad error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Resolution,
    Parameter,
    Structural,
    Unsupported,
    InvalidInput,
    Io,
}

impl Error {
    /// Innermost error, with module and instance context removed.
    pub fn root(&self) -> &Error {
        match self {
            Error::InInstance { source, .. } | Error::InModule { source, .. } => source.root(),
            other => other,
        }
    }

    /// Category of the innermost error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InInstance { source, .. } | Error::InModule { source, .. } => source.kind(),
            Error::UndefinedModule { .. }
            | Error::UndefinedPrimitive { .. }
            | Error::InvalidPrimitive { .. }
            | Error::NonNetlistablePrimitive { .. }
            | Error::UndefinedExternalModule { .. }
            | Error::DuplicateExternalModule { .. }
            | Error::DuplicateModule { .. }
            | Error::NameConflict { .. } => ErrorKind::Resolution,
            Error::MissingParameter { .. }
            | Error::MissingDefault { .. }
            | Error::InvalidParamValue { .. } => ErrorKind::Parameter,
            Error::UnconnectedPort { .. }
            | Error::UnknownPort { .. }
            | Error::DuplicateConnection { .. }
            | Error::DuplicatePort { .. }
            | Error::DuplicateSignal { .. }
            | Error::UnknownSignal { .. }
            | Error::InvalidWidth { .. }
            | Error::EmptySlice { .. }
            | Error::SliceOutOfRange { .. }
            | Error::EmptyConcat
            | Error::UndirectedPort { .. }
            | Error::UndefinedTop { .. }
            | Error::TopPortCount { .. } => ErrorKind::Structural,
            Error::Unsupported { .. } => ErrorKind::Unsupported,
            Error::InvalidAnalysis { .. } | Error::UnknownFormat(_) | Error::Json(_) => {
                ErrorKind::InvalidInput
            }
            Error::Io(_) => ErrorKind::Io,
        }
    }

    /// Whether this is a feature the dialect does not support.
    pub fn is_unsupported(&self) -> bool {
        self.kind() == ErrorKind::Unsupported
    }

    /// Name of the instance the error occurred in, if any.
    pub fn instance(&self) -> Option<&str> {
        match self {
            Error::InInstance { instance, .. } => Some(instance.as_str()),
            Error::InModule { source, .. } => source.instance(),
            _ => None,
        }
    }

    /// Name of the module the error occurred in, if any.
    pub fn module(&self) -> Option<&str> {
        match self {
            Error::InModule { module, .. } => Some(module.as_str()),
            _ => None,
        }
    }

    pub(crate) fn unsupported(format: NetlistFormat, feature: impl Into<String>) -> Self {
        Error::Unsupported {
            format,
            feature: feature.into(),
        }
    }

    pub(crate) fn in_instance(self, instance: &str) -> Self {
        Error::InInstance {
            instance: instance.to_string(),
            source: Box::new(self),
        }
    }

    pub(crate) fn in_module(self, module: &str) -> Self {
        Error::InModule {
            module: module.to_string(),
            source: Box::new(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_and_context() {
        let err = Error::MissingParameter {
            param: "r".to_string(),
        }
        .in_instance("r1")
        .in_module("mid");
        assert_eq!(err.module(), Some("mid"));
        assert_eq!(err.instance(), Some("r1"));
        assert!(matches!(err.root(), Error::MissingParameter { param } if param == "r"));
        assert_eq!(err.kind(), ErrorKind::Parameter);
        assert_eq!(
            err.to_string(),
            "in module `mid`: in instance `r1`: missing required parameter `r`"
        );
    }

    #[test]
    fn test_unsupported_kind() {
        let err = Error::unsupported(NetlistFormat::Ngspice, "DC point sweeps");
        assert!(err.is_unsupported());
        assert_eq!(
            err.to_string(),
            "DC point sweeps is not supported by the ngspice netlister"
        );
        let io = Error::from(std::io::Error::other("closed"));
        assert!(!io.is_unsupported());
        assert_eq!(io.kind(), ErrorKind::Io);
    }
}
