//! Spice-family layout: generic Spice, HSpice, NgSpice and Xyce.
//!
//! ```text
//! .SUBCKT inv
//! + i o vdd vss
//! + w=1
//!
//! xbuf
//! + i o vdd vss
//! + buf
//! + w=2
//!
//! .ENDS
//! ```

use std::io::Write;

use spicenet_ir::{Instance, Module, SpiceType};

use super::signals::{SignalTable, port_list};
use super::{Netlister, PortConnection};
use crate::error::{Error, Result};
use crate::params::ResolvedParams;
use crate::resolve::ResolvedRef;

/// Parameter written positionally after the nodes of a basic element.
fn positional_param(kind: SpiceType) -> Option<&'static str> {
    match kind {
        SpiceType::Resistor => Some("r"),
        SpiceType::Capacitor => Some("c"),
        SpiceType::Inductor => Some("l"),
        SpiceType::Isource => Some("dc"),
        SpiceType::Vcvs | SpiceType::Vccs | SpiceType::Cccs | SpiceType::Ccvs => Some("gain"),
        SpiceType::Subckt
        | SpiceType::Vsource
        | SpiceType::Mos
        | SpiceType::Diode
        | SpiceType::Bipolar
        | SpiceType::Tline => None,
    }
}

impl<'a, W: Write> Netlister<'a, W> {
    pub(super) fn write_spice_subckt(
        &mut self,
        module: &'a Module,
        name: &str,
        signals: &SignalTable<'a>,
    ) -> Result<()> {
        self.writeln(format!(".SUBCKT {name}"))?;

        let ports = port_list(self.dialect, signals);
        if ports.is_empty() {
            self.write_comment("No ports")?;
        } else {
            self.writeln(format!("+ {ports}"))?;
        }

        if module.parameters.is_empty() {
            self.write_comment("No parameters")?;
        } else {
            let decls = self.param_declarations(&module.parameters)?.join(" ");
            match self.dialect.params_keyword() {
                Some(kw) => self.writeln(format!("+ {kw} {decls}"))?,
                None => self.writeln(format!("+ {decls}"))?,
            }
        }
        self.blank()?;

        for inst in &module.instances {
            self.write_instance(inst, signals)?;
        }
        for line in &module.literals {
            self.writeln(line)?;
        }

        self.writeln(".ENDS")?;
        self.blank()
    }

    pub(super) fn write_spice_instance(
        &mut self,
        inst: &Instance,
        resolved: ResolvedRef<'a>,
        mut params: ResolvedParams,
        conns: &[PortConnection<'_>],
    ) -> Result<()> {
        match resolved {
            ResolvedRef::Module { name, .. } => {
                self.writeln(format!("{}{}", SpiceType::Subckt.prefix(), inst.name))?;
                self.write_spice_connections(conns)?;
                self.writeln(format!("+ {name}"))?;
                let keyword = self.dialect.params_keyword();
                self.write_params_line(&params, keyword)?;
            }
            ResolvedRef::Model { model, kind, .. } => {
                self.writeln(format!("{}{}", kind.prefix(), inst.name))?;
                self.write_spice_connections(conns)?;
                self.writeln(format!("+ {model}"))?;
                self.write_params_line(&params, None)?;
            }
            ResolvedRef::Builtin {
                module,
                kind: SpiceType::Vsource,
            } => {
                self.writeln(format!("{}{}", SpiceType::Vsource.prefix(), inst.name))?;
                self.write_spice_connections(conns)?;
                let d = self.dialect;
                match module.name.name.as_str() {
                    "vdc" => {
                        let dc = params.pop("dc")?.render(d);
                        let ac = params.pop("ac")?.render(d);
                        self.writeln(format!("+ dc {dc}"))?;
                        self.writeln(format!("+ ac {ac}"))?;
                    }
                    "vpulse" => {
                        let fields = params
                            .pop_many(&["v1", "v2", "td", "tr", "tf", "tpw", "tper"])?
                            .iter()
                            .map(|v| v.render(d))
                            .collect::<Vec<_>>();
                        self.writeln(format!("+ pulse({})", fields.join(" ")))?;
                    }
                    "vsin" => {
                        let fields = params
                            .pop_many(&["voff", "vamp", "freq", "td", "phase"])?
                            .iter()
                            .map(|v| v.render(d))
                            .collect::<Vec<_>>();
                        self.writeln(format!("+ sin({})", fields.join(" ")))?;
                    }
                    other => {
                        return Err(Error::InvalidPrimitive {
                            name: other.to_string(),
                            kind: SpiceType::Vsource,
                        });
                    }
                }
                self.write_params_line(&params, None)?;
            }
            ResolvedRef::Builtin { module, kind } => {
                let key = positional_param(kind).ok_or_else(|| Error::InvalidPrimitive {
                    name: module.name.name.clone(),
                    kind,
                })?;
                self.writeln(format!("{}{}", kind.prefix(), inst.name))?;
                self.write_spice_connections(conns)?;
                let value = params.pop(key)?.render(self.dialect);
                self.writeln(format!("+ {value}"))?;
                self.write_params_line(&params, None)?;
            }
        }
        self.blank()
    }

    fn write_spice_connections(&mut self, conns: &[PortConnection<'_>]) -> Result<()> {
        if conns.is_empty() {
            return self.write_comment("No ports");
        }
        let nodes = conns
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        self.writeln(format!("+ {nodes}"))
    }
}

#[cfg(test)]
mod tests {
    use spicenet_ir::primitives::{PRIMITIVES_DOMAIN, mos};
    use spicenet_ir::{
        ExternalModule, Instance, Module, Package, Param, ParamValue, PortDirection,
        QualifiedName, Reference, SpiceType,
    };

    use crate::{NetlistFormat, netlist_to_string};

    fn resistor_pkg() -> Package {
        Package::new("demo").with_module(
            Module::new("mid")
                .with_port("vvv", PortDirection::Inout)
                .with_port("VSS", PortDirection::Inout)
                .with_instance(
                    Instance::new("r1", Reference::external(PRIMITIVES_DOMAIN, "resistor"))
                        .with_connection("p", "vvv")
                        .with_connection("n", "VSS")
                        .with_param("r", 1e3),
                ),
        )
    }

    #[test]
    fn test_resistor() {
        let text = netlist_to_string(&resistor_pkg(), NetlistFormat::Spice).unwrap();
        let expected = "\
* circuit.Package demo
* Written by SpiceNetlister
*

.SUBCKT mid
+ vvv VSS
* No parameters

rr1
+ vvv VSS
+ 1000.0
* No parameters

.ENDS

";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_subckt_instance_with_params() {
        let pkg = Package::new("demo")
            .with_module(
                Module::new("leaf")
                    .with_port("a", PortDirection::Input)
                    .with_parameter(Param::new("w", ParamValue::literal("1k"))),
            )
            .with_module(
                Module::new("top")
                    .with_port("x", PortDirection::Input)
                    .with_instance(
                        Instance::new("l0", Reference::local("leaf"))
                            .with_connection("a", "x")
                            .with_param("w", ParamValue::literal("2*k")),
                    ),
            );
        let spice = netlist_to_string(&pkg, NetlistFormat::Spice).unwrap();
        assert!(spice.contains(".SUBCKT leaf\n+ a\n+ w='1k'\n"), "{spice}");
        assert!(spice.contains("xl0\n+ x\n+ leaf\n+ w='2*k'\n"), "{spice}");

        let xyce = netlist_to_string(&pkg, NetlistFormat::Xyce).unwrap();
        assert!(xyce.starts_with("; circuit.Package demo\n"), "{xyce}");
        assert!(xyce.contains("+ PARAMS: w={1k}\n"), "{xyce}");
        assert!(xyce.contains("+ leaf\n+ PARAMS: w={2*k}\n"), "{xyce}");
    }

    #[test]
    fn test_vsources() {
        let pkg = Package::new("src").with_module(
            Module::new("tb")
                .with_port("vss", PortDirection::Inout)
                .with_instance(
                    Instance::new("dc", Reference::external(PRIMITIVES_DOMAIN, "vdc"))
                        .with_connection("p", "vss")
                        .with_connection("n", "vss")
                        .with_param("dc", 1.2),
                )
                .with_instance(
                    Instance::new("pls", Reference::external(PRIMITIVES_DOMAIN, "vpulse"))
                        .with_connection("p", "vss")
                        .with_connection("n", "vss")
                        .with_param("tper", 10)
                        .with_param("v1", 0)
                        .with_param("v2", 1)
                        .with_param("td", 1)
                        .with_param("tr", 2)
                        .with_param("tf", 3)
                        .with_param("tpw", 4),
                ),
        );
        let text = netlist_to_string(&pkg, NetlistFormat::Ngspice).unwrap();
        assert!(
            text.contains("vdc\n+ vss vss\n+ dc 1.2\n+ ac 0\n* No parameters\n"),
            "{text}"
        );
        assert!(
            text.contains("vpls\n+ vss vss\n+ pulse(0 1 1 2 3 4 10)\n* No parameters\n"),
            "{text}"
        );
    }

    #[test]
    fn test_model_instance() {
        let nch = mos("nch");
        let pkg = Package::new("demo")
            .with_ext_module(nch.clone())
            .with_module(
                Module::new("inv")
                    .with_port("a", PortDirection::Input)
                    .with_port("y", PortDirection::Output)
                    .with_instance(
                        Instance::new("n0", Reference::External(nch.name.clone()))
                            .with_connection("d", "y")
                            .with_connection("g", "a")
                            .with_connection("s", "a")
                            .with_connection("b", "a")
                            .with_param("w", 1),
                    ),
            );
        let text = netlist_to_string(&pkg, NetlistFormat::Hspice).unwrap();
        assert!(text.contains("mn0\n+ y a a a\n+ nch\n+ w=1\n"), "{text}");
    }

    #[test]
    fn test_literals_and_portless() {
        let ext = ExternalModule::new(QualifiedName::new("pdk", "filler"), SpiceType::Subckt);
        let pkg = Package::new("")
            .with_ext_module(ext)
            .with_module(
                Module::new("top")
                    .with_instance(Instance::new("f0", Reference::external("pdk", "filler")))
                    .with_literal(".include 'extra.sp'"),
            );
        let text = netlist_to_string(&pkg, NetlistFormat::Spice).unwrap();
        assert!(text.starts_with("* Anonymous circuit.Package\n"), "{text}");
        assert!(
            text.contains("xf0\n* No ports\n+ filler\n* No parameters\n\n.include 'extra.sp'\n.ENDS\n"),
            "{text}"
        );
    }

    #[test]
    fn test_missing_default_in_declaration() {
        let pkg = Package::new("demo")
            .with_module(Module::new("leaf").with_parameter(Param::required("w")));
        let err = netlist_to_string(&pkg, NetlistFormat::Spice).unwrap_err();
        assert_eq!(err.module(), Some("leaf"));
        assert!(matches!(err.root(), crate::Error::MissingDefault { .. }));
    }
}
