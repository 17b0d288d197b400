//! Structural Verilog layout.

use std::io::Write;

use spicenet_ir::{Instance, Module, PortDirection, Signal};

use super::signals::SignalTable;
use super::{Netlister, PortConnection};
use crate::error::{Error, Result};
use crate::params::{ResolvedParams, param_text};
use crate::resolve::ResolvedRef;

fn width_range(sig: &Signal) -> String {
    if sig.width > 1 {
        format!("[{}:0] ", sig.width - 1)
    } else {
        String::new()
    }
}

fn direction_keyword(port: &str, direction: PortDirection) -> Result<&'static str> {
    match direction {
        PortDirection::Input => Ok("input"),
        PortDirection::Output => Ok("output"),
        PortDirection::Inout => Ok("inout"),
        PortDirection::None => Err(Error::UndirectedPort {
            port: port.to_string(),
        }),
    }
}

/// Join `items` one per line, with commas after all but the last.
fn comma_lines(items: Vec<String>) -> Vec<String> {
    let last = items.len().saturating_sub(1);
    items
        .into_iter()
        .enumerate()
        .map(|(i, s)| if i < last { format!("{s},") } else { s })
        .collect()
}

impl<'a, W: Write> Netlister<'a, W> {
    pub(super) fn write_verilog_module(
        &mut self,
        module: &'a Module,
        name: &str,
        signals: &SignalTable<'a>,
    ) -> Result<()> {
        self.writeln(format!("module {name}"))?;

        if module.parameters.is_empty() {
            self.write_comment("No parameters")?;
        } else {
            let mut decls = Vec::with_capacity(module.parameters.len());
            for p in &module.parameters {
                decls.push(match &p.value {
                    Some(v) => {
                        let text = param_text(self.dialect, &p.name, v)?.render(self.dialect);
                        format!("parameter {} = {}", p.name, text)
                    }
                    None => format!("parameter {}", p.name),
                });
            }
            self.writeln("#(")?;
            self.indent += 1;
            for line in comma_lines(decls) {
                self.writeln(line)?;
            }
            self.indent -= 1;
            self.writeln(")")?;
        }

        if signals.ports().is_empty() {
            self.writeln("( ); // No ports")?;
        } else {
            let mut decls = Vec::with_capacity(signals.ports().len());
            for (port, sig) in signals.ports() {
                let dir = direction_keyword(&port.signal, port.direction)?;
                decls.push(format!("{dir} wire {}{}", width_range(sig), sig.name));
            }
            self.writeln("(")?;
            self.indent += 1;
            for line in comma_lines(decls) {
                self.writeln(line)?;
            }
            self.indent -= 1;
            self.writeln(");")?;
        }
        self.blank()?;

        self.indent += 1;
        if signals.internal().is_empty() {
            self.write_comment("No Signal Declarations")?;
        } else {
            self.write_comment("Signal Declarations")?;
            for sig in signals.internal() {
                self.writeln(format!("wire {}{};", width_range(sig), sig.name))?;
            }
        }
        self.blank()?;

        if module.instances.is_empty() {
            self.write_comment("No Instances")?;
        } else {
            self.write_comment("Instance Declarations")?;
            for inst in &module.instances {
                self.write_instance(inst, signals)?;
            }
        }
        for line in &module.literals {
            self.writeln(line)?;
        }
        self.indent -= 1;

        self.writeln(format!("endmodule // {name}"))?;
        self.blank()
    }

    pub(super) fn write_verilog_instance(
        &mut self,
        inst: &Instance,
        resolved: ResolvedRef<'a>,
        params: ResolvedParams,
        conns: &[PortConnection<'_>],
    ) -> Result<()> {
        let name = match resolved {
            ResolvedRef::Module { name, .. } => name,
            ResolvedRef::Builtin { module, .. } => {
                return Err(self.unsupported(format!("instances of primitive `{}`", module.name)));
            }
            ResolvedRef::Model { model, .. } => {
                return Err(self.unsupported(format!("instances of device model `{model}`")));
            }
        };

        self.writeln(name)?;
        if params.is_empty() {
            self.write_comment("No parameters")?;
        } else {
            let overrides = params
                .iter()
                .map(|(k, v)| format!(".{k}({})", v.render(self.dialect)))
                .collect::<Vec<_>>()
                .join(", ");
            self.writeln(format!("#( {overrides} )"))?;
        }
        self.writeln(&inst.name)?;

        if conns.is_empty() {
            self.writeln("( );")?;
        } else {
            self.writeln("(")?;
            self.indent += 1;
            let lines = conns
                .iter()
                .map(|c| format!(".{}({})", c.port, c.text))
                .collect();
            for line in comma_lines(lines) {
                self.writeln(line)?;
            }
            self.indent -= 1;
            self.writeln(");")?;
        }
        self.blank()
    }
}

#[cfg(test)]
mod tests {
    use spicenet_ir::primitives::PRIMITIVES_DOMAIN;
    use spicenet_ir::{
        ConnectionTarget, Instance, Module, Package, Param, ParamValue, PortDirection, Reference,
        SiPrefix, Signal,
    };

    use super::comma_lines;
    use crate::{Error, NetlistFormat, netlist_to_string};

    #[test]
    fn test_comma_lines() {
        let lines = comma_lines(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(lines, ["a,", "b,", "c"]);
        assert!(comma_lines(Vec::new()).is_empty());
    }

    #[test]
    fn test_module_layout() {
        let pkg = Package::new("demo")
            .with_module(
                Module::new("leaf")
                    .with_port("i", PortDirection::Input)
                    .with_bus_port("o", 4, PortDirection::Output)
                    .with_parameter(Param::new("w", ParamValue::prefixed(2, SiPrefix::Kilo)))
                    .with_parameter(Param::required("l")),
            )
            .with_module(
                Module::new("top")
                    .with_bus_port("bus", 4, PortDirection::Inout)
                    .with_signal(Signal::scalar("x"))
                    .with_instance(
                        Instance::new("u0", Reference::local("leaf"))
                            .with_param("l", 3)
                            .with_connection("o", "bus")
                            .with_connection("i", ConnectionTarget::slice("bus", 0, 0)),
                    ),
            );
        let text = netlist_to_string(&pkg, NetlistFormat::Verilog).unwrap();
        let expected = "\
// circuit.Package demo
// Written by VerilogNetlister
//

module leaf
#(
  parameter w = 2e3,
  parameter l
)
(
  input wire i,
  output wire [3:0] o
);

  // No Signal Declarations

  // No Instances
endmodule // leaf

module top
// No parameters
(
  inout wire [3:0] bus
);

  // Signal Declarations
  wire x;

  // Instance Declarations
  leaf
  #( .w(2e3), .l(3) )
  u0
  (
    .i(bus[0]),
    .o(bus)
  );

endmodule // top

";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_primitives_rejected() {
        let pkg = Package::new("demo").with_module(
            Module::new("top")
                .with_port("a", PortDirection::Inout)
                .with_instance(
                    Instance::new("r1", Reference::external(PRIMITIVES_DOMAIN, "resistor"))
                        .with_connection("p", "a")
                        .with_connection("n", "a")
                        .with_param("r", 1),
                ),
        );
        let err = netlist_to_string(&pkg, NetlistFormat::Verilog).unwrap_err();
        assert!(err.is_unsupported(), "{err}");
        assert_eq!(err.instance(), Some("r1"));
    }

    #[test]
    fn test_undirected_port() {
        let pkg = Package::new("demo")
            .with_module(Module::new("top").with_port("a", PortDirection::None));
        let err = netlist_to_string(&pkg, NetlistFormat::Verilog).unwrap_err();
        assert!(matches!(err.root(), Error::UndirectedPort { port } if port == "a"));
    }
}
