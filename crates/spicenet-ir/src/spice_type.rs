//! Spice element kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The element kind an [`ExternalModule`](crate::ExternalModule) is netlisted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpiceType {
    /// Hierarchical subcircuit.
    #[default]
    Subckt,
    Resistor,
    Capacitor,
    Inductor,
    Mos,
    Diode,
    Bipolar,
    Vsource,
    Isource,
    Vcvs,
    Vccs,
    Cccs,
    Ccvs,
    /// Transmission line.
    Tline,
}

impl SpiceType {
    /// Single-character instance-name prefix used by Spice-family dialects.
    pub fn prefix(self) -> char {
        match self {
            SpiceType::Subckt => 'x',
            SpiceType::Resistor => 'r',
            SpiceType::Capacitor => 'c',
            SpiceType::Inductor => 'l',
            SpiceType::Mos => 'm',
            SpiceType::Diode => 'd',
            SpiceType::Bipolar => 'q',
            SpiceType::Vsource => 'v',
            SpiceType::Isource => 'i',
            SpiceType::Vcvs => 'e',
            SpiceType::Vccs => 'g',
            SpiceType::Cccs => 'f',
            SpiceType::Ccvs => 'h',
            SpiceType::Tline => 'o',
        }
    }

    /// Whether instances of this kind refer to a `.model` card.
    pub fn is_model_based(self) -> bool {
        matches!(
            self,
            SpiceType::Mos | SpiceType::Diode | SpiceType::Bipolar | SpiceType::Tline
        )
    }
}

impl fmt::Display for SpiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SpiceType::Subckt => "SUBCKT",
            SpiceType::Resistor => "RESISTOR",
            SpiceType::Capacitor => "CAPACITOR",
            SpiceType::Inductor => "INDUCTOR",
            SpiceType::Mos => "MOS",
            SpiceType::Diode => "DIODE",
            SpiceType::Bipolar => "BIPOLAR",
            SpiceType::Vsource => "VSOURCE",
            SpiceType::Isource => "ISOURCE",
            SpiceType::Vcvs => "VCVS",
            SpiceType::Vccs => "VCCS",
            SpiceType::Cccs => "CCCS",
            SpiceType::Ccvs => "CCVS",
            SpiceType::Tline => "TLINE",
        };
        f.write_str(name)
    }
}
