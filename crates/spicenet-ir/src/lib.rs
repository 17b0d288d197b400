//! Circuit IR consumed by the spicenet netlister.
//!
//! This crate holds the hierarchical circuit description: packages of
//! modules, externally-defined modules, instances and their connections,
//! parameter values, and the simulation envelope (analyses and control
//! cards). All types are plain data and serialize with serde, so a package
//! can be built in code or loaded from JSON.

pub mod circuit;
pub mod error;
pub mod param;
pub mod primitives;
pub mod sim;
pub mod spice_type;

pub use circuit::{
    Concat, Connection, ConnectionTarget, ExternalModule, Instance, Module, Package, Port,
    PortDirection, QualifiedName, Reference, Signal, Slice,
};
pub use error::{Error, Result};
pub use param::{Param, ParamValue, Prefixed, PrefixedNumber, SiPrefix};
pub use sim::{
    AcInput, Analysis, Control, CustomAnalysis, DcInput, Include, LibInclude, LinearSweep,
    LogSweep, Meas, NoiseInput, OpInput, PointSweep, Save, SaveMode, SimInput, SimOption, Sweep,
    TranInput,
};
pub use spice_type::SpiceType;
