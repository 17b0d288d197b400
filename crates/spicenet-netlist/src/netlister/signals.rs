//! Per-module signal namespace and connection formatting.

use indexmap::IndexMap;
use spicenet_ir::{ConnectionTarget, Module, Port, Signal, Slice};

use crate::dialect::{Dialect, Family};
use crate::error::{Error, Result};

/// Signals of one module, keyed by name, split into ports and internals.
#[derive(Debug)]
pub struct SignalTable<'a> {
    signals: IndexMap<&'a str, &'a Signal>,
    ports: Vec<(&'a Port, &'a Signal)>,
    internal: Vec<&'a Signal>,
}

impl<'a> SignalTable<'a> {
    pub fn new(module: &'a Module) -> Result<Self> {
        let mut signals = IndexMap::with_capacity(module.signals.len());
        for sig in &module.signals {
            if sig.width == 0 {
                return Err(Error::InvalidWidth {
                    name: sig.name.clone(),
                });
            }
            if signals.insert(sig.name.as_str(), sig).is_some() {
                return Err(Error::DuplicateSignal {
                    name: sig.name.clone(),
                });
            }
        }

        let mut ports: Vec<(&'a Port, &'a Signal)> = Vec::with_capacity(module.ports.len());
        for port in &module.ports {
            if ports.iter().any(|(p, _)| p.signal == port.signal) {
                return Err(Error::DuplicatePort {
                    name: port.signal.clone(),
                });
            }
            let sig = signals
                .get(port.signal.as_str())
                .copied()
                .ok_or_else(|| Error::UnknownSignal {
                    name: port.signal.clone(),
                })?;
            ports.push((port, sig));
        }

        let internal = signals
            .values()
            .copied()
            .filter(|s| !ports.iter().any(|(p, _)| p.signal == s.name))
            .collect();

        Ok(Self {
            signals,
            ports,
            internal,
        })
    }

    pub fn get(&self, name: &str) -> Result<&'a Signal> {
        self.signals
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownSignal {
                name: name.to_string(),
            })
    }

    /// Ports in declaration order, with their signals.
    pub fn ports(&self) -> &[(&'a Port, &'a Signal)] {
        &self.ports
    }

    /// Non-port signals in declaration order.
    pub fn internal(&self) -> &[&'a Signal] {
        &self.internal
    }
}

/// Scalar names of a signal, most-significant bit first.
pub fn signal_bits(dialect: Dialect, sig: &Signal) -> Vec<String> {
    if sig.width == 1 {
        vec![sig.name.clone()]
    } else {
        (0..sig.width)
            .rev()
            .map(|i| dialect.bus_bit(&sig.name, i))
            .collect()
    }
}

/// Space-separated port list of a module.
pub fn port_list(dialect: Dialect, signals: &SignalTable<'_>) -> String {
    signals
        .ports()
        .iter()
        .flat_map(|(_, sig)| signal_bits(dialect, sig))
        .collect::<Vec<_>>()
        .join(" ")
}

fn check_slice(slice: &Slice, signals: &SignalTable<'_>) -> Result<()> {
    let sig = signals.get(&slice.signal)?;
    if slice.top < slice.bot {
        return Err(Error::EmptySlice {
            signal: slice.signal.clone(),
            top: slice.top,
            bot: slice.bot,
        });
    }
    if slice.top >= sig.width {
        return Err(Error::SliceOutOfRange {
            signal: slice.signal.clone(),
            top: slice.top,
            bot: slice.bot,
            width: sig.width,
        });
    }
    Ok(())
}

/// Text of a connection target.
pub fn format_target(
    dialect: Dialect,
    signals: &SignalTable<'_>,
    target: &ConnectionTarget,
) -> Result<String> {
    match target {
        ConnectionTarget::Sig(name) => {
            let sig = signals.get(name)?;
            Ok(match dialect.family() {
                Family::Verilog => sig.name.clone(),
                Family::Spice | Family::Spectre => signal_bits(dialect, sig).join(" "),
            })
        }
        ConnectionTarget::Slice(slice) => {
            check_slice(slice, signals)?;
            Ok(match dialect.family() {
                Family::Verilog if slice.top == slice.bot => {
                    format!("{}[{}]", slice.signal, slice.top)
                }
                Family::Verilog => format!("{}[{}:{}]", slice.signal, slice.top, slice.bot),
                Family::Spice | Family::Spectre => (slice.bot..=slice.top)
                    .rev()
                    .map(|i| dialect.bus_bit(&slice.signal, i))
                    .collect::<Vec<_>>()
                    .join(" "),
            })
        }
        ConnectionTarget::Concat(concat) => {
            if concat.parts.is_empty() {
                return Err(Error::EmptyConcat);
            }
            let parts = concat
                .parts
                .iter()
                .map(|p| format_target(dialect, signals, p))
                .collect::<Result<Vec<_>>>()?;
            Ok(match dialect.family() {
                Family::Verilog => format!("{{{}}}", parts.join(", ")),
                Family::Spice | Family::Spectre => parts.join(" "),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spicenet_ir::{PortDirection, Signal};

    fn module() -> Module {
        Module::new("m")
            .with_bus_port("bus", 4, PortDirection::Inout)
            .with_port("a", PortDirection::Input)
            .with_signal(Signal::scalar("x"))
    }

    #[test]
    fn test_table() {
        let m = module();
        let t = SignalTable::new(&m).expect("valid module");
        assert_eq!(t.ports().len(), 2);
        assert_eq!(t.internal().len(), 1);
        assert_eq!(t.internal()[0].name, "x");
    }

    #[test]
    fn test_bus_expansion() {
        let m = module();
        let t = SignalTable::new(&m).unwrap();
        assert_eq!(port_list(Dialect::Spice, &t), "bus_3 bus_2 bus_1 bus_0 a");
        let target = ConnectionTarget::sig("bus");
        assert_eq!(
            format_target(Dialect::Spectre, &t, &target).unwrap(),
            "bus_3 bus_2 bus_1 bus_0"
        );
        assert_eq!(format_target(Dialect::Verilog, &t, &target).unwrap(), "bus");
    }

    #[test]
    fn test_slices() {
        let m = module();
        let t = SignalTable::new(&m).unwrap();
        let s = ConnectionTarget::slice("bus", 2, 1);
        assert_eq!(format_target(Dialect::Spice, &t, &s).unwrap(), "bus_2 bus_1");
        assert_eq!(format_target(Dialect::Verilog, &t, &s).unwrap(), "bus[2:1]");
        let bit = ConnectionTarget::slice("bus", 3, 3);
        assert_eq!(format_target(Dialect::Verilog, &t, &bit).unwrap(), "bus[3]");

        let empty = ConnectionTarget::slice("bus", 1, 2);
        assert!(matches!(
            format_target(Dialect::Spice, &t, &empty),
            Err(Error::EmptySlice { .. })
        ));
        let wide = ConnectionTarget::slice("bus", 4, 0);
        assert!(matches!(
            format_target(Dialect::Spice, &t, &wide),
            Err(Error::SliceOutOfRange { width: 4, .. })
        ));
    }

    #[test]
    fn test_concat() {
        let m = module();
        let t = SignalTable::new(&m).unwrap();
        let c = ConnectionTarget::concat([
            ConnectionTarget::sig("a"),
            ConnectionTarget::slice("bus", 1, 0),
            ConnectionTarget::sig("x"),
        ]);
        assert_eq!(format_target(Dialect::Spice, &t, &c).unwrap(), "a bus_1 bus_0 x");
        assert_eq!(
            format_target(Dialect::Verilog, &t, &c).unwrap(),
            "{a, bus[1:0], x}"
        );
        let empty = ConnectionTarget::concat(Vec::new());
        assert!(matches!(
            format_target(Dialect::Spice, &t, &empty),
            Err(Error::EmptyConcat)
        ));
    }

    #[test]
    fn test_namespace_errors() {
        let dup_sig = Module::new("m")
            .with_signal(Signal::scalar("a"))
            .with_signal(Signal::scalar("a"));
        assert!(matches!(
            SignalTable::new(&dup_sig),
            Err(Error::DuplicateSignal { .. })
        ));

        let mut dup_port = Module::new("m").with_port("a", PortDirection::Input);
        dup_port.ports.push(dup_port.ports[0].clone());
        assert!(matches!(
            SignalTable::new(&dup_port),
            Err(Error::DuplicatePort { .. })
        ));

        let mut dangling = Module::new("m");
        dangling.ports.push(Port::new("ghost", PortDirection::Input));
        assert!(matches!(
            SignalTable::new(&dangling),
            Err(Error::UnknownSignal { .. })
        ));

        let zero = Module::new("m").with_signal(Signal::new("z", 0));
        assert!(matches!(
            SignalTable::new(&zero),
            Err(Error::InvalidWidth { .. })
        ));

        let m = module();
        let t = SignalTable::new(&m).unwrap();
        assert!(format_target(Dialect::Spice, &t, &ConnectionTarget::sig("nope")).is_err());
    }
}
