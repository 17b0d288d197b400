//! Netlist writers for the spicenet circuit IR.
//!
//! A [`Netlister`] turns a [`Package`] into the text of one simulator
//! dialect (Spectre, generic Spice, HSpice, NgSpice, Xyce) or structural
//! Verilog, and a [`SimInput`] into a complete simulation deck with
//! options, control cards and analyses.
//!
//! ```rust
//! use spicenet_ir::primitives::PRIMITIVES_DOMAIN;
//! use spicenet_ir::{Instance, Module, Package, PortDirection, Reference};
//! use spicenet_netlist::{NetlistFormat, netlist_to_string};
//!
//! let pkg = Package::new("demo").with_module(
//!     Module::new("divider")
//!         .with_port("vin", PortDirection::Inout)
//!         .with_port("vss", PortDirection::Inout)
//!         .with_instance(
//!             Instance::new("r1", Reference::external(PRIMITIVES_DOMAIN, "resistor"))
//!                 .with_connection("p", "vin")
//!                 .with_connection("n", "vss")
//!                 .with_param("r", 1e3),
//!         ),
//! );
//! let text = netlist_to_string(&pkg, NetlistFormat::Ngspice).unwrap();
//! assert!(text.starts_with("* circuit.Package demo"));
//! ```

pub mod dialect;
pub mod error;
pub mod format;
pub mod netlister;
pub mod options;
pub mod params;
pub mod resolve;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use spicenet_ir::{Package, SimInput};

pub use dialect::{Dialect, Family};
pub use error::{Error, ErrorKind, Namespace, Result};
pub use format::NetlistFormat;
pub use netlister::Netlister;
pub use options::NetlistOptions;
pub use params::{ParamText, ResolvedParams, format_double, resolve_params};
pub use resolve::{ModuleRef, ResolvedRef, Resolver, sanitize};

/// Netlist `pkg` into `out`.
pub fn netlist<W: Write>(pkg: &Package, out: W, format: NetlistFormat) -> Result<()> {
    Netlister::new(format, out)?.write_package(pkg)
}

/// Netlist `pkg` into a string.
pub fn netlist_to_string(pkg: &Package, format: NetlistFormat) -> Result<String> {
    let mut buf = Vec::new();
    netlist(pkg, &mut buf, format)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Netlist `pkg` into the file at `path`. On failure the partial file is
/// removed.
pub fn netlist_to_path(pkg: &Package, path: impl AsRef<Path>, format: NetlistFormat) -> Result<()> {
    let path = path.as_ref();
    let file = BufWriter::new(File::create(path)?);
    let result = netlist(pkg, file, format);
    if result.is_err() {
        log::debug!("removing partial netlist {}", path.display());
        let _ = std::fs::remove_file(path);
    }
    result
}

/// Write a simulation netlist for `inp` into `out`.
pub fn write_sim_input<W: Write>(inp: &SimInput, out: W, format: NetlistFormat) -> Result<()> {
    Netlister::new(format, out)?.write_sim_input(inp)
}

/// Write a simulation netlist for `inp` into a string.
pub fn sim_input_to_string(inp: &SimInput, format: NetlistFormat) -> Result<String> {
    let mut buf = Vec::new();
    write_sim_input(inp, &mut buf, format)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
