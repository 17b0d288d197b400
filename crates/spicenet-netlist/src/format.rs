//! Netlist output formats.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Target netlist dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetlistFormat {
    Spectre,
    /// Generic SPICE.
    Spice,
    Hspice,
    Ngspice,
    Xyce,
    Cdl,
    /// Structural Verilog.
    Verilog,
}

impl NetlistFormat {
    /// All formats.
    pub const ALL: [NetlistFormat; 7] = [
        NetlistFormat::Spectre,
        NetlistFormat::Spice,
        NetlistFormat::Hspice,
        NetlistFormat::Ngspice,
        NetlistFormat::Xyce,
        NetlistFormat::Cdl,
        NetlistFormat::Verilog,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NetlistFormat::Spectre => "spectre",
            NetlistFormat::Spice => "spice",
            NetlistFormat::Hspice => "hspice",
            NetlistFormat::Ngspice => "ngspice",
            NetlistFormat::Xyce => "xyce",
            NetlistFormat::Cdl => "cdl",
            NetlistFormat::Verilog => "verilog",
        }
    }
}

impl fmt::Display for NetlistFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetlistFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NetlistFormat::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| Error::UnknownFormat(s.to_string()))
    }
}
