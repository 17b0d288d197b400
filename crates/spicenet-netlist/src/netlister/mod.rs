//! The netlisting driver.
//!
//! [`Netlister`] walks a package: it registers external modules, writes a
//! header comment, then writes each module definition. Instances are
//! resolved, their parameters merged with the target's declarations, and
//! their connections ordered by the target's ports before the dialect's
//! writer emits them. Layout per dialect family lives in the submodules.

mod sim;
pub(crate) mod signals;
mod spectre;
mod spice;
mod verilog;

use std::collections::HashMap;
use std::io::Write;

use spicenet_ir::{ConnectionTarget, Instance, Module, Package, Param};

use crate::dialect::{Dialect, Family};
use crate::error::{Error, Result};
use crate::format::NetlistFormat;
use crate::options::NetlistOptions;
use crate::params::{ResolvedParams, param_text, resolve_params};
use crate::resolve::{ResolvedRef, Resolver};

use signals::{SignalTable, format_target};

/// One port of an instance and the text it connects to.
#[derive(Debug, Clone)]
pub(crate) struct PortConnection<'a> {
    pub port: &'a str,
    pub text: String,
}

/// A netlisting session writing one dialect to `out`.
///
/// Name tables live for the whole session, so a `Netlister` should be used
/// for a single package or simulation input.
pub struct Netlister<'a, W: Write> {
    dialect: Dialect,
    opts: NetlistOptions,
    out: W,
    indent: usize,
    resolver: Resolver<'a>,
}

impl<'a, W: Write> Netlister<'a, W> {
    /// Create a netlister. Fails for formats without a writer.
    pub fn new(format: NetlistFormat, out: W) -> Result<Self> {
        Ok(Self {
            dialect: Dialect::new(format)?,
            opts: NetlistOptions::default(),
            out,
            indent: 0,
            resolver: Resolver::new(),
        })
    }

    pub fn with_options(mut self, opts: NetlistOptions) -> Self {
        self.opts = opts;
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn format(&self) -> NetlistFormat {
        self.dialect.format()
    }

    /// Consume the netlister, returning the sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Write every module of `pkg`.
    pub fn write_package(&mut self, pkg: &'a Package) -> Result<()> {
        for emod in &pkg.ext_modules {
            self.resolver.register_external(emod)?;
        }
        self.write_package_header(pkg)?;
        for module in &pkg.modules {
            self.write_module_definition(module)?;
        }
        self.out.flush()?;
        log::info!(
            "wrote {} modules of package `{}` as {}",
            pkg.modules.len(),
            pkg.domain,
            self.format()
        );
        Ok(())
    }

    fn write_package_header(&mut self, pkg: &Package) -> Result<()> {
        if pkg.domain.is_empty() {
            self.write_comment("Anonymous circuit.Package")?;
        } else {
            self.write_comment(&format!("circuit.Package {}", pkg.domain))?;
        }
        if let Some(desc) = &pkg.desc {
            self.write_comment(desc)?;
        }
        self.write_comment(&format!("Written by {}", self.dialect.writer_name()))?;
        for line in self.opts.header.clone() {
            self.write_comment(&line)?;
        }
        self.write_comment("")?;
        self.blank()
    }

    /// Write one module definition.
    pub fn write_module_definition(&mut self, module: &'a Module) -> Result<()> {
        self.module_definition(module)
            .map_err(|e| e.in_module(&module.name))
    }

    fn module_definition(&mut self, module: &'a Module) -> Result<()> {
        let name = self.resolver.define_module(module)?;
        let signals = SignalTable::new(module)?;
        log::debug!(
            "writing module `{}` with {} instances",
            name,
            module.instances.len()
        );
        match self.dialect.family() {
            Family::Spice => self.write_spice_subckt(module, &name, &signals),
            Family::Spectre => self.write_spectre_subckt(module, &name, &signals),
            Family::Verilog => self.write_verilog_module(module, &name, &signals),
        }
    }

    /// Write one instance within the module whose signals are `signals`.
    pub(crate) fn write_instance(
        &mut self,
        inst: &'a Instance,
        signals: &SignalTable<'a>,
    ) -> Result<()> {
        self.instance(inst, signals)
            .map_err(|e| e.in_instance(&inst.name))
    }

    fn instance(&mut self, inst: &'a Instance, signals: &SignalTable<'a>) -> Result<()> {
        let resolved = self.resolver.resolve(&inst.module)?;
        let params = resolve_params(self.dialect, &inst.parameters, resolved.parameters())?;
        let conns = self.connections(inst, &resolved, signals)?;
        log::debug!("writing instance `{}` of {}", inst.name, inst.module);
        match self.dialect.family() {
            Family::Spice => self.write_spice_instance(inst, resolved, params, &conns),
            Family::Spectre => self.write_spectre_instance(inst, resolved, params, &conns),
            Family::Verilog => self.write_verilog_instance(inst, resolved, params, &conns),
        }
    }

    /// Connections of `inst`, in the target's port order.
    fn connections(
        &self,
        inst: &'a Instance,
        resolved: &ResolvedRef<'a>,
        signals: &SignalTable<'a>,
    ) -> Result<Vec<PortConnection<'a>>> {
        let ports = resolved.ports();
        let mut targets: HashMap<&str, &ConnectionTarget> = HashMap::new();
        for conn in &inst.connections {
            if !ports.iter().any(|p| p.signal == conn.portname) {
                return Err(Error::UnknownPort {
                    port: conn.portname.clone(),
                    module: resolved.display_name(),
                });
            }
            if targets.insert(&conn.portname, &conn.target).is_some() {
                return Err(Error::DuplicateConnection {
                    port: conn.portname.clone(),
                });
            }
        }
        ports
            .iter()
            .map(|port| {
                let target =
                    targets
                        .get(port.signal.as_str())
                        .ok_or_else(|| Error::UnconnectedPort {
                            port: port.signal.clone(),
                        })?;
                Ok(PortConnection {
                    port: &port.signal,
                    text: format_target(self.dialect, signals, target)?,
                })
            })
            .collect()
    }

    /// `name=default` declarations for dialects that require defaults.
    fn param_declarations(&self, params: &[Param]) -> Result<Vec<String>> {
        params
            .iter()
            .map(|p| {
                let default = p.value.as_ref().ok_or_else(|| Error::MissingDefault {
                    param: p.name.clone(),
                })?;
                let text = param_text(self.dialect, &p.name, default)?;
                Ok(format!("{}={}", p.name, text.render(self.dialect)))
            })
            .collect()
    }

    fn write_params_line(&mut self, params: &ResolvedParams, keyword: Option<&str>) -> Result<()> {
        if params.is_empty() {
            return self.write_comment("No parameters");
        }
        let assignments = params.assignments(self.dialect).join(" ");
        match keyword {
            Some(kw) => self.writeln(format!("+ {kw} {assignments}")),
            None => self.writeln(format!("+ {assignments}")),
        }
    }

    pub(crate) fn writeln(&mut self, line: impl AsRef<str>) -> Result<()> {
        for _ in 0..self.indent {
            self.out.write_all(self.opts.indent.as_bytes())?;
        }
        writeln!(self.out, "{}", line.as_ref())?;
        Ok(())
    }

    pub(crate) fn blank(&mut self) -> Result<()> {
        writeln!(self.out)?;
        Ok(())
    }

    pub(crate) fn write_comment(&mut self, text: &str) -> Result<()> {
        let line = self.dialect.comment(text);
        self.writeln(line)
    }

    fn unsupported(&self, feature: impl Into<String>) -> Error {
        Error::unsupported(self.format(), feature)
    }
}
