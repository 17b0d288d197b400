//! Hierarchical circuit structure: packages, modules and instances.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::param::{Param, ParamValue};
use crate::spice_type::SpiceType;

/// A domain-qualified module name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QualifiedName {
    pub domain: String,
    pub name: String,
}

impl QualifiedName {
    pub fn new(domain: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.domain, self.name)
    }
}

/// A collection of modules and the external modules they reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// Package domain. Empty for anonymous packages.
    #[serde(default)]
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    /// Modules, in dependency order.
    #[serde(default)]
    pub modules: Vec<Module>,
    #[serde(default)]
    pub ext_modules: Vec<ExternalModule>,
}

impl Package {
    /// Create an empty package.
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ..Self::default()
        }
    }

    pub fn with_module(mut self, module: Module) -> Self {
        self.modules.push(module);
        self
    }

    pub fn with_ext_module(mut self, module: ExternalModule) -> Self {
        self.ext_modules.push(module);
        self
    }

    /// Find a module by name.
    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// Load a package from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the package to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Port direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortDirection {
    Input,
    Output,
    Inout,
    /// Undirected.
    #[default]
    None,
}

/// A module port, referring to one of the module's signals by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub signal: String,
    #[serde(default)]
    pub direction: PortDirection,
}

impl Port {
    pub fn new(signal: impl Into<String>, direction: PortDirection) -> Self {
        Self {
            signal: signal.into(),
            direction,
        }
    }
}

/// A named wire or bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub name: String,
    /// Bit width, at least one.
    pub width: usize,
}

impl Signal {
    pub fn new(name: impl Into<String>, width: usize) -> Self {
        Self {
            name: name.into(),
            width,
        }
    }

    /// A single-bit signal.
    pub fn scalar(name: impl Into<String>) -> Self {
        Self::new(name, 1)
    }
}

/// Inclusive bit range `top..=bot` of a signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slice {
    pub signal: String,
    pub top: usize,
    pub bot: usize,
}

/// Ordered concatenation of connection targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concat {
    pub parts: Vec<ConnectionTarget>,
}

/// Anything a port can be connected to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionTarget {
    /// A whole signal, by name.
    Sig(String),
    Slice(Slice),
    Concat(Concat),
}

impl ConnectionTarget {
    pub fn sig(name: impl Into<String>) -> Self {
        ConnectionTarget::Sig(name.into())
    }

    pub fn slice(signal: impl Into<String>, top: usize, bot: usize) -> Self {
        ConnectionTarget::Slice(Slice {
            signal: signal.into(),
            top,
            bot,
        })
    }

    pub fn concat(parts: impl IntoIterator<Item = ConnectionTarget>) -> Self {
        ConnectionTarget::Concat(Concat {
            parts: parts.into_iter().collect(),
        })
    }
}

impl From<&str> for ConnectionTarget {
    fn from(name: &str) -> Self {
        ConnectionTarget::Sig(name.to_string())
    }
}

/// Binding of one instance port to a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub portname: String,
    pub target: ConnectionTarget,
}

/// Reference from an instance to the module it instantiates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reference {
    /// A module defined in the same package.
    Local(String),
    /// An external module or built-in primitive.
    External(QualifiedName),
}

impl Reference {
    pub fn local(name: impl Into<String>) -> Self {
        Reference::Local(name.into())
    }

    pub fn external(domain: impl Into<String>, name: impl Into<String>) -> Self {
        Reference::External(QualifiedName::new(domain, name))
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Local(name) => f.write_str(name),
            Reference::External(qname) => qname.fmt(f),
        }
    }
}

/// An instance of a module within another module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub name: String,
    pub module: Reference,
    /// Parameter overrides, in order.
    #[serde(default)]
    pub parameters: Vec<Param>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl Instance {
    pub fn new(name: impl Into<String>, module: Reference) -> Self {
        Self {
            name: name.into(),
            module,
            parameters: Vec::new(),
            connections: Vec::new(),
        }
    }

    /// Add a parameter override.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.parameters.push(Param::new(name, value));
        self
    }

    /// Connect a port.
    pub fn with_connection(
        mut self,
        portname: impl Into<String>,
        target: impl Into<ConnectionTarget>,
    ) -> Self {
        self.connections.push(Connection {
            portname: portname.into(),
            target: target.into(),
        });
        self
    }
}

/// A module defined in a package, netlisted as a subcircuit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    #[serde(default)]
    pub ports: Vec<Port>,
    /// All signals, ports included.
    #[serde(default)]
    pub signals: Vec<Signal>,
    #[serde(default)]
    pub instances: Vec<Instance>,
    /// Declared parameters. Values are defaults.
    #[serde(default)]
    pub parameters: Vec<Param>,
    /// Raw lines copied into the netlist after the instances.
    #[serde(default)]
    pub literals: Vec<String>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a single-bit port and its signal.
    pub fn with_port(self, name: impl Into<String>, direction: PortDirection) -> Self {
        self.with_bus_port(name, 1, direction)
    }

    /// Add a port of the given width and its signal.
    pub fn with_bus_port(
        mut self,
        name: impl Into<String>,
        width: usize,
        direction: PortDirection,
    ) -> Self {
        let name = name.into();
        self.signals.push(Signal::new(name.clone(), width));
        self.ports.push(Port::new(name, direction));
        self
    }

    /// Add an internal signal.
    pub fn with_signal(mut self, signal: Signal) -> Self {
        self.signals.push(signal);
        self
    }

    pub fn with_parameter(mut self, param: Param) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn with_instance(mut self, instance: Instance) -> Self {
        self.instances.push(instance);
        self
    }

    pub fn with_literal(mut self, line: impl Into<String>) -> Self {
        self.literals.push(line.into());
        self
    }
}

/// A module defined outside the package: a foreign subcircuit, a device
/// model, or a built-in primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalModule {
    pub name: QualifiedName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(default)]
    pub ports: Vec<Port>,
    #[serde(default)]
    pub signals: Vec<Signal>,
    #[serde(default)]
    pub parameters: Vec<Param>,
    #[serde(default)]
    pub spicetype: SpiceType,
}

impl ExternalModule {
    pub fn new(name: QualifiedName, spicetype: SpiceType) -> Self {
        Self {
            name,
            desc: None,
            ports: Vec::new(),
            signals: Vec::new(),
            parameters: Vec::new(),
            spicetype,
        }
    }

    /// Add an undirected single-bit port.
    pub fn with_port(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.signals.push(Signal::scalar(name.clone()));
        self.ports.push(Port::new(name, PortDirection::None));
        self
    }

    pub fn with_parameter(mut self, param: Param) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_builder() {
        let m = Module::new("inv")
            .with_port("i", PortDirection::Input)
            .with_bus_port("o", 4, PortDirection::Output)
            .with_signal(Signal::scalar("x"));
        assert_eq!(m.ports.len(), 2);
        assert_eq!(m.signals.len(), 3);
        assert_eq!(m.signals[1].width, 4);
        assert_eq!(m.ports[1].direction, PortDirection::Output);
    }

    #[test]
    fn test_package_json() {
        let pkg = Package::new("demo").with_module(
            Module::new("top").with_instance(
                Instance::new("x1", Reference::local("leaf"))
                    .with_connection("a", ConnectionTarget::slice("bus", 3, 0)),
            ),
        );
        let json = pkg.to_json().expect("serialize");
        let back = Package::from_json(&json).expect("deserialize");
        assert_eq!(pkg, back);
    }

    #[test]
    fn test_reference_json_shape() {
        let r: Reference =
            serde_json::from_str(r#"{"external": {"domain": "pdk", "name": "nch"}}"#).unwrap();
        assert_eq!(r, Reference::external("pdk", "nch"));
        assert_eq!(r.to_string(), "pdk.nch");
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(Package::from_json("{\"modules\": 3}").is_err());
    }
}
