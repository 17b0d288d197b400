//! Per-dialect syntax hooks.
//!
//! Each supported output format is one variant of [`Dialect`]. Every hook is
//! an exhaustive `match`, so a new dialect cannot be added without deciding
//! each piece of its syntax.

use spicenet_ir::SiPrefix;

use crate::error::{Error, Result};
use crate::format::NetlistFormat;

/// A netlistable dialect. CDL has no writer and is not a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Spectre,
    Spice,
    Hspice,
    Ngspice,
    Xyce,
    Verilog,
}

/// Groups of dialects sharing module and instance layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Spice,
    Spectre,
    Verilog,
}

impl Dialect {
    /// Dialect for `format`. Fails for formats without a writer.
    pub fn new(format: NetlistFormat) -> Result<Self> {
        match format {
            NetlistFormat::Spectre => Ok(Dialect::Spectre),
            NetlistFormat::Spice => Ok(Dialect::Spice),
            NetlistFormat::Hspice => Ok(Dialect::Hspice),
            NetlistFormat::Ngspice => Ok(Dialect::Ngspice),
            NetlistFormat::Xyce => Ok(Dialect::Xyce),
            NetlistFormat::Verilog => Ok(Dialect::Verilog),
            NetlistFormat::Cdl => Err(Error::unsupported(format, "netlisting")),
        }
    }

    pub fn format(self) -> NetlistFormat {
        match self {
            Dialect::Spectre => NetlistFormat::Spectre,
            Dialect::Spice => NetlistFormat::Spice,
            Dialect::Hspice => NetlistFormat::Hspice,
            Dialect::Ngspice => NetlistFormat::Ngspice,
            Dialect::Xyce => NetlistFormat::Xyce,
            Dialect::Verilog => NetlistFormat::Verilog,
        }
    }

    pub fn family(self) -> Family {
        match self {
            Dialect::Spice | Dialect::Hspice | Dialect::Ngspice | Dialect::Xyce => Family::Spice,
            Dialect::Spectre => Family::Spectre,
            Dialect::Verilog => Family::Verilog,
        }
    }

    /// Name written in the package header.
    pub fn writer_name(self) -> &'static str {
        match self {
            Dialect::Spectre => "SpectreNetlister",
            Dialect::Spice => "SpiceNetlister",
            Dialect::Hspice => "HspiceNetlister",
            Dialect::Ngspice => "NgspiceNetlister",
            Dialect::Xyce => "XyceNetlister",
            Dialect::Verilog => "VerilogNetlister",
        }
    }

    /// Line-comment marker.
    pub fn comment_prefix(self) -> &'static str {
        match self {
            Dialect::Spice | Dialect::Hspice | Dialect::Ngspice => "*",
            Dialect::Xyce => ";",
            Dialect::Spectre | Dialect::Verilog => "//",
        }
    }

    /// A full comment line.
    pub fn comment(self, text: &str) -> String {
        if text.is_empty() {
            self.comment_prefix().to_string()
        } else {
            format!("{} {}", self.comment_prefix(), text)
        }
    }

    /// Name of bit `index` of bus `name`.
    pub fn bus_bit(self, name: &str, index: usize) -> String {
        match self {
            Dialect::Spectre
            | Dialect::Spice
            | Dialect::Hspice
            | Dialect::Ngspice
            | Dialect::Xyce => format!("{name}_{index}"),
            Dialect::Verilog => format!("{name}[{index}]"),
        }
    }

    /// Wrap a raw-literal expression.
    pub fn expression(self, expr: &str) -> String {
        match self {
            Dialect::Spice | Dialect::Hspice | Dialect::Ngspice => format!("'{expr}'"),
            Dialect::Xyce => format!("{{{expr}}}"),
            Dialect::Spectre | Dialect::Verilog => expr.to_string(),
        }
    }

    /// Keyword preceding subcircuit parameter declarations and subcircuit
    /// instance parameters.
    pub fn params_keyword(self) -> Option<&'static str> {
        match self {
            Dialect::Xyce => Some("PARAMS:"),
            Dialect::Spectre
            | Dialect::Spice
            | Dialect::Hspice
            | Dialect::Ngspice
            | Dialect::Verilog => None,
        }
    }

    /// Suffix appended to a mantissa for `prefix`.
    pub fn si_suffix(self, prefix: SiPrefix) -> String {
        let letter = match self {
            Dialect::Spice | Dialect::Hspice | Dialect::Ngspice | Dialect::Xyce => {
                spice_suffix(prefix)
            }
            Dialect::Spectre => spectre_suffix(prefix),
            Dialect::Verilog => None,
        };
        match (letter, prefix) {
            (Some(s), _) => s.to_string(),
            (None, SiPrefix::Unit) => String::new(),
            (None, p) => format!("e{}", p.exponent()),
        }
    }

    /// Inline comment appended to the top-level DUT instance.
    pub fn dut_comment(self) -> Option<&'static str> {
        match self {
            Dialect::Spectre | Dialect::Ngspice => Some("// Top-Level DUT"),
            Dialect::Xyce => Some("; Top-Level DUT"),
            Dialect::Hspice => Some("$ Top-Level DUT"),
            Dialect::Spice | Dialect::Verilog => None,
        }
    }
}

// SPICE suffixes are case-insensitive, so `m` is milli and mega needs `meg`.
fn spice_suffix(prefix: SiPrefix) -> Option<&'static str> {
    match prefix {
        SiPrefix::Femto => Some("f"),
        SiPrefix::Pico => Some("p"),
        SiPrefix::Nano => Some("n"),
        SiPrefix::Micro => Some("u"),
        SiPrefix::Milli => Some("m"),
        SiPrefix::Unit => Some(""),
        SiPrefix::Kilo => Some("k"),
        SiPrefix::Mega => Some("meg"),
        SiPrefix::Giga => Some("g"),
        SiPrefix::Tera => Some("t"),
        _ => None,
    }
}

fn spectre_suffix(prefix: SiPrefix) -> Option<&'static str> {
    match prefix {
        SiPrefix::Atto => Some("a"),
        SiPrefix::Femto => Some("f"),
        SiPrefix::Pico => Some("p"),
        SiPrefix::Nano => Some("n"),
        SiPrefix::Micro => Some("u"),
        SiPrefix::Milli => Some("m"),
        SiPrefix::Unit => Some(""),
        SiPrefix::Kilo => Some("K"),
        SiPrefix::Mega => Some("M"),
        SiPrefix::Giga => Some("G"),
        SiPrefix::Tera => Some("T"),
        SiPrefix::Peta => Some("P"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cdl_has_no_writer() {
        let err = Dialect::new(NetlistFormat::Cdl).unwrap_err();
        assert!(err.is_unsupported());
        for fmt in NetlistFormat::ALL {
            if let Ok(d) = Dialect::new(fmt) {
                assert_eq!(d.format(), fmt);
            }
        }
    }

    #[test]
    fn test_bus_bits() {
        assert_eq!(Dialect::Spice.bus_bit("bus", 3), "bus_3");
        assert_eq!(Dialect::Spectre.bus_bit("bus", 0), "bus_0");
        assert_eq!(Dialect::Verilog.bus_bit("bus", 2), "bus[2]");
    }

    #[test]
    fn test_expressions() {
        assert_eq!(Dialect::Spice.expression("w*2"), "'w*2'");
        assert_eq!(Dialect::Xyce.expression("w*2"), "{w*2}");
        assert_eq!(Dialect::Spectre.expression("w*2"), "w*2");
    }

    #[test]
    fn test_si_suffixes() {
        assert_eq!(Dialect::Ngspice.si_suffix(SiPrefix::Mega), "meg");
        assert_eq!(Dialect::Spectre.si_suffix(SiPrefix::Mega), "M");
        assert_eq!(Dialect::Spice.si_suffix(SiPrefix::Centi), "e-2");
        assert_eq!(Dialect::Spice.si_suffix(SiPrefix::Atto), "e-18");
        assert_eq!(Dialect::Spectre.si_suffix(SiPrefix::Atto), "a");
        assert_eq!(Dialect::Spectre.si_suffix(SiPrefix::Yotta), "e24");
        assert_eq!(Dialect::Verilog.si_suffix(SiPrefix::Kilo), "e3");
        assert_eq!(Dialect::Verilog.si_suffix(SiPrefix::Unit), "");
    }

    #[test]
    fn test_comments() {
        assert_eq!(Dialect::Hspice.comment("hi"), "* hi");
        assert_eq!(Dialect::Xyce.comment("hi"), "; hi");
        assert_eq!(Dialect::Verilog.comment(""), "//");
    }
}
