//! Module reference resolution and netlist name tables.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use spicenet_ir::primitives::{self, PHYSICAL_PRIMITIVES_DOMAIN, PRIMITIVES_DOMAIN};
use spicenet_ir::{ExternalModule, Module, Param, Port, QualifiedName, Reference, SpiceType};

use crate::error::{Error, Namespace, Result};

/// Netlist-safe module name: the part after the last `.`, with every
/// character other than ASCII alphanumerics and `_` replaced by `_`.
pub fn sanitize(name: &str) -> String {
    let base = name.rsplit('.').next().unwrap_or(name);
    base.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// A module that can be instantiated as a subcircuit.
#[derive(Debug, Clone, Copy)]
pub enum ModuleRef<'a> {
    Local(&'a Module),
    External(&'a ExternalModule),
}

impl<'a> ModuleRef<'a> {
    pub fn ports(&self) -> &'a [Port] {
        match self {
            ModuleRef::Local(m) => &m.ports,
            ModuleRef::External(m) => &m.ports,
        }
    }

    pub fn parameters(&self) -> &'a [Param] {
        match self {
            ModuleRef::Local(m) => &m.parameters,
            ModuleRef::External(m) => &m.parameters,
        }
    }
}

/// Outcome of resolving an instance's module reference.
#[derive(Debug, Clone)]
pub enum ResolvedRef<'a> {
    /// A subcircuit, local or external.
    Module { module: ModuleRef<'a>, name: String },
    /// A built-in ideal element.
    Builtin {
        module: &'a ExternalModule,
        kind: SpiceType,
    },
    /// A device referring to a `.model` card.
    Model {
        module: &'a ExternalModule,
        model: String,
        kind: SpiceType,
    },
}

impl<'a> ResolvedRef<'a> {
    pub fn ports(&self) -> &'a [Port] {
        match self {
            ResolvedRef::Module { module, .. } => module.ports(),
            ResolvedRef::Builtin { module, .. } | ResolvedRef::Model { module, .. } => {
                &module.ports
            }
        }
    }

    pub fn parameters(&self) -> &'a [Param] {
        match self {
            ResolvedRef::Module { module, .. } => module.parameters(),
            ResolvedRef::Builtin { module, .. } | ResolvedRef::Model { module, .. } => {
                &module.parameters
            }
        }
    }

    /// Name used in error messages.
    pub fn display_name(&self) -> String {
        match self {
            ResolvedRef::Module { name, .. } => name.clone(),
            ResolvedRef::Builtin { module, .. } => module.name.to_string(),
            ResolvedRef::Model { model, .. } => model.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Owner {
    Local(String),
    External(QualifiedName),
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::Local(name) => write!(f, "module `{name}`"),
            Owner::External(qname) => write!(f, "external module `{qname}`"),
        }
    }
}

/// Names claimed in one netlist namespace.
#[derive(Debug)]
struct NameTable {
    namespace: Namespace,
    names: HashMap<String, Owner>,
}

impl NameTable {
    fn new(namespace: Namespace) -> Self {
        Self {
            namespace,
            names: HashMap::new(),
        }
    }

    /// Claim `name` for `owner`. Claiming again for the same owner is a no-op.
    fn claim(&mut self, name: &str, owner: Owner) -> Result<()> {
        match self.names.entry(name.to_string()) {
            Entry::Vacant(e) => {
                e.insert(owner);
                Ok(())
            }
            Entry::Occupied(e) if *e.get() == owner => Ok(()),
            Entry::Occupied(e) => Err(match (e.get(), &owner) {
                (Owner::Local(_), Owner::Local(_)) => Error::DuplicateModule {
                    name: name.to_string(),
                },
                (first, second) => Error::NameConflict {
                    namespace: self.namespace,
                    name: name.to_string(),
                    first: first.to_string(),
                    second: second.to_string(),
                },
            }),
        }
    }
}

/// Per-run resolution state: defined modules, registered external modules
/// and the subcircuit and model name tables.
#[derive(Debug)]
pub struct Resolver<'a> {
    modules: HashMap<&'a str, &'a Module>,
    ext_modules: HashMap<&'a QualifiedName, &'a ExternalModule>,
    subckt_names: NameTable,
    model_names: NameTable,
}

impl Default for Resolver<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Resolver<'a> {
    pub fn new() -> Self {
        Self {
            modules: HashMap::new(),
            ext_modules: HashMap::new(),
            subckt_names: NameTable::new(Namespace::Subckt),
            model_names: NameTable::new(Namespace::Model),
        }
    }

    /// Register an external module and claim its netlist name.
    pub fn register_external(&mut self, module: &'a ExternalModule) -> Result<()> {
        if self.ext_modules.contains_key(&module.name) {
            return Err(Error::DuplicateExternalModule {
                name: module.name.clone(),
            });
        }
        log::debug!("registering external module {} ({})", module.name, module.spicetype);
        self.claim_external(module)?;
        self.ext_modules.insert(&module.name, module);
        Ok(())
    }

    /// Record a local module definition, returning its sanitized name.
    pub fn define_module(&mut self, module: &'a Module) -> Result<String> {
        let name = sanitize(&module.name);
        if self.modules.contains_key(module.name.as_str()) {
            return Err(Error::DuplicateModule { name });
        }
        self.subckt_names
            .claim(&name, Owner::Local(module.name.clone()))?;
        self.modules.insert(&module.name, module);
        Ok(name)
    }

    /// A previously defined local module.
    pub fn module(&self, name: &str) -> Option<&'a Module> {
        self.modules.get(name).copied()
    }

    /// Resolve an instance's module reference.
    pub fn resolve(&mut self, reference: &Reference) -> Result<ResolvedRef<'a>> {
        match reference {
            Reference::Local(name) => {
                let module = self
                    .module(name)
                    .ok_or_else(|| Error::UndefinedModule { name: name.clone() })?;
                Ok(ResolvedRef::Module {
                    module: ModuleRef::Local(module),
                    name: sanitize(&module.name),
                })
            }
            Reference::External(qname) if qname.domain == PRIMITIVES_DOMAIN => {
                let module = primitives::primitive(&qname.name).ok_or_else(|| {
                    Error::UndefinedPrimitive {
                        name: qname.name.clone(),
                    }
                })?;
                let kind = module.spicetype;
                if kind == SpiceType::Subckt || kind.is_model_based() {
                    return Err(Error::InvalidPrimitive {
                        name: qname.name.clone(),
                        kind,
                    });
                }
                Ok(ResolvedRef::Builtin { module, kind })
            }
            Reference::External(qname) if qname.domain == PHYSICAL_PRIMITIVES_DOMAIN => {
                Err(Error::NonNetlistablePrimitive {
                    name: qname.name.clone(),
                })
            }
            Reference::External(qname) => {
                let module = *self.ext_modules.get(qname).ok_or_else(|| {
                    Error::UndefinedExternalModule {
                        name: qname.clone(),
                    }
                })?;
                let name = self.claim_external(module)?;
                match module.spicetype {
                    SpiceType::Subckt => Ok(ResolvedRef::Module {
                        module: ModuleRef::External(module),
                        name,
                    }),
                    kind => Ok(ResolvedRef::Model {
                        module,
                        model: name,
                        kind,
                    }),
                }
            }
        }
    }

    fn claim_external(&mut self, module: &ExternalModule) -> Result<String> {
        let owner = Owner::External(module.name.clone());
        if module.spicetype == SpiceType::Subckt {
            let name = sanitize(&module.name.name);
            self.subckt_names.claim(&name, owner)?;
            Ok(name)
        } else {
            let name = module.name.name.clone();
            self.model_names.claim(&name, owner)?;
            Ok(name)
        }
    }
}
