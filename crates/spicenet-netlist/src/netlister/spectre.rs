//! Spectre layout.
//!
//! Built-in primitives map onto Spectre's own elements. The three voltage
//! sources share one `vsource` element distinguished by `type=`, with
//! fields renamed to Spectre's.

use std::io::Write;

use spicenet_ir::{Instance, Module, SpiceType};

use super::signals::{SignalTable, port_list};
use super::{Netlister, PortConnection};
use crate::error::{Error, Result};
use crate::params::{ParamText, ResolvedParams};
use crate::resolve::ResolvedRef;

const VPULSE_RENAMES: [(&str, &str); 7] = [
    ("v1", "val0"),
    ("v2", "val1"),
    ("td", "delay"),
    ("tr", "rise"),
    ("tf", "fall"),
    ("tpw", "width"),
    ("tper", "period"),
];

const VSIN_RENAMES: [(&str, &str); 4] = [
    ("voff", "sinedc"),
    ("vamp", "ampl"),
    ("td", "delay"),
    ("phase", "sinephase"),
];

/// Spectre element name for a built-in, applying its parameter mapping.
fn map_builtin(name: &str, kind: SpiceType, params: &mut ResolvedParams) -> Result<&'static str> {
    let element = match kind {
        SpiceType::Resistor => "resistor",
        SpiceType::Capacitor => "capacitor",
        SpiceType::Inductor => "inductor",
        SpiceType::Isource => "isource",
        SpiceType::Vcvs => "vcvs",
        SpiceType::Vccs => "vccs",
        SpiceType::Cccs => "cccs",
        SpiceType::Ccvs => "ccvs",
        SpiceType::Vsource => {
            let (source_type, renames): (&str, &[(&str, &str)]) = match name {
                "vdc" => ("dc", &[("ac", "mag")]),
                "vpulse" => ("pulse", &VPULSE_RENAMES),
                "vsin" => ("sine", &VSIN_RENAMES),
                _ => {
                    return Err(Error::InvalidPrimitive {
                        name: name.to_string(),
                        kind,
                    });
                }
            };
            for (from, to) in renames {
                params.rename(from, to);
            }
            params.set_first("type", ParamText::plain(source_type));
            "vsource"
        }
        SpiceType::Subckt
        | SpiceType::Mos
        | SpiceType::Diode
        | SpiceType::Bipolar
        | SpiceType::Tline => {
            return Err(Error::InvalidPrimitive {
                name: name.to_string(),
                kind,
            });
        }
    };
    Ok(element)
}

impl<'a, W: Write> Netlister<'a, W> {
    pub(super) fn write_spectre_subckt(
        &mut self,
        module: &'a Module,
        name: &str,
        signals: &SignalTable<'a>,
    ) -> Result<()> {
        self.writeln(format!("subckt {name}"))?;
        self.indent += 1;

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
            self.writeln(format!("parameters {decls}"))?;
        }
        self.blank()?;

        for inst in &module.instances {
            self.write_instance(inst, signals)?;
        }
        for line in &module.literals {
            self.writeln(line)?;
        }

        self.indent -= 1;
        self.writeln(format!("ends {name}"))?;
        self.blank()
    }

    pub(super) fn write_spectre_instance(
        &mut self,
        inst: &Instance,
        resolved: ResolvedRef<'a>,
        mut params: ResolvedParams,
        conns: &[PortConnection<'_>],
    ) -> Result<()> {
        let target = match resolved {
            ResolvedRef::Module { name, .. } => name,
            ResolvedRef::Model { model, .. } => model,
            ResolvedRef::Builtin { module, kind } => {
                map_builtin(&module.name.name, kind, &mut params)?.to_string()
            }
        };

        self.writeln(&inst.name)?;
        let nodes = conns
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        if nodes.is_empty() {
            self.writeln("+ ( )")?;
        } else {
            self.writeln(format!("+ ( {nodes} )"))?;
        }
        self.writeln(format!("+ {target}"))?;
        self.write_params_line(&params, None)?;
        self.blank()
    }
}
