//! Built-in primitive elements.
//!
//! The `vlsir.primitives` domain holds a fixed table of ideal elements
//! (passives, dependent sources, independent sources). Device models such as
//! transistors are not in the table: they need a technology-specific model
//! name, and are created with the generator functions below.

use std::sync::LazyLock;

use indexmap::IndexMap;

use crate::circuit::{ExternalModule, QualifiedName};
use crate::param::{Param, ParamValue};
use crate::spice_type::SpiceType;

/// Domain of the built-in primitive table.
pub const PRIMITIVES_DOMAIN: &str = "vlsir.primitives";

/// Domain of technology-independent primitives that must be compiled to a
/// target technology before netlisting.
pub const PHYSICAL_PRIMITIVES_DOMAIN: &str = "hdl21.primitives";

/// All built-in primitives, keyed by name.
pub static PRIMITIVES: LazyLock<IndexMap<String, ExternalModule>> = LazyLock::new(|| {
    [
        two_terminal("resistor", SpiceType::Resistor, &["r"]),
        two_terminal("capacitor", SpiceType::Capacitor, &["c"]),
        two_terminal("inductor", SpiceType::Inductor, &["l"]),
        dependent_source("vcvs", SpiceType::Vcvs),
        dependent_source("vccs", SpiceType::Vccs),
        dependent_source("cccs", SpiceType::Cccs),
        dependent_source("ccvs", SpiceType::Ccvs),
        two_terminal("isource", SpiceType::Isource, &["dc"]),
        two_terminal("vdc", SpiceType::Vsource, &["dc"])
            .with_parameter(Param::new("ac", ParamValue::Int(0))),
        two_terminal(
            "vpulse",
            SpiceType::Vsource,
            &["v1", "v2", "td", "tr", "tf", "tpw", "tper"],
        ),
        two_terminal(
            "vsin",
            SpiceType::Vsource,
            &["voff", "vamp", "freq", "td", "phase"],
        ),
    ]
    .into_iter()
    .map(|m| (m.name.name.clone(), m))
    .collect()
});

/// Look up a built-in primitive by name.
pub fn primitive(name: &str) -> Option<&'static ExternalModule> {
    PRIMITIVES.get(name)
}

fn two_terminal(name: &str, kind: SpiceType, params: &[&str]) -> ExternalModule {
    with_required(
        ExternalModule::new(QualifiedName::new(PRIMITIVES_DOMAIN, name), kind)
            .with_port("p")
            .with_port("n"),
        params,
    )
}

fn dependent_source(name: &str, kind: SpiceType) -> ExternalModule {
    with_required(
        ExternalModule::new(QualifiedName::new(PRIMITIVES_DOMAIN, name), kind)
            .with_port("p")
            .with_port("n")
            .with_port("cp")
            .with_port("cn"),
        &["gain"],
    )
}

fn with_required(mut module: ExternalModule, params: &[&str]) -> ExternalModule {
    for p in params {
        module = module.with_parameter(Param::required(*p));
    }
    module
}

fn model_based(kind: SpiceType, domain: &str, name: String, ports: &[&str]) -> ExternalModule {
    ports.iter().fold(
        ExternalModule::new(QualifiedName::new(domain, name), kind),
        |m, p| m.with_port(*p),
    )
}

/// A MOS transistor referring to `.model` `name`. Ports `d g s b`.
pub fn mos(name: impl Into<String>) -> ExternalModule {
    model_based(
        SpiceType::Mos,
        "vlsir.primitives.mos",
        name.into(),
        &["d", "g", "s", "b"],
    )
}

/// A bipolar transistor referring to `.model` `name`. Ports `c b e`.
pub fn bipolar(name: impl Into<String>) -> ExternalModule {
    model_based(
        SpiceType::Bipolar,
        "vlsir.primitives.bipolar",
        name.into(),
        &["c", "b", "e"],
    )
}

/// A diode referring to `.model` `name`. Ports `p n`.
pub fn diode(name: impl Into<String>) -> ExternalModule {
    model_based(
        SpiceType::Diode,
        "vlsir.primitives.diode",
        name.into(),
        &["p", "n"],
    )
}

/// A transmission line referring to `.model` `name`.
pub fn tline(name: impl Into<String>) -> ExternalModule {
    model_based(
        SpiceType::Tline,
        "vlsir.primitives.tline",
        name.into(),
        &["p1p", "p1n", "p2p", "p2n"],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_contents() {
        assert_eq!(PRIMITIVES.len(), 11);
        for m in PRIMITIVES.values() {
            assert_eq!(m.name.domain, PRIMITIVES_DOMAIN);
            assert!(
                m.spicetype != SpiceType::Subckt && !m.spicetype.is_model_based(),
                "{} has kind {}",
                m.name,
                m.spicetype
            );
        }
    }

    #[test]
    fn test_vpulse_param_order() {
        let vpulse = primitive("vpulse").expect("vpulse is built in");
        let names: Vec<_> = vpulse.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["v1", "v2", "td", "tr", "tf", "tpw", "tper"]);
        let ports: Vec<_> = vpulse.ports.iter().map(|p| p.signal.as_str()).collect();
        assert_eq!(ports, ["p", "n"]);
    }

    #[test]
    fn test_vdc_ac_default() {
        let vdc = primitive("vdc").unwrap();
        assert_eq!(vdc.parameters[0].value, None);
        assert_eq!(vdc.parameters[1].value, Some(ParamValue::Int(0)));
    }

    #[test]
    fn test_unknown_primitive() {
        assert!(primitive("mos").is_none());
        assert!(primitive("transistor").is_none());
    }

    #[test]
    fn test_generators() {
        let n = mos("nch");
        assert_eq!(n.spicetype, SpiceType::Mos);
        assert_eq!(n.name.domain, "vlsir.primitives.mos");
        assert_eq!(n.ports.len(), 4);
        assert_eq!(bipolar("npn").ports.len(), 3);
        assert_eq!(diode("dio").ports.len(), 2);
        assert_eq!(tline("t0").spicetype, SpiceType::Tline);
    }
}
