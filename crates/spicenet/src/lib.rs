//! # Spicenet
//!
//! Compile a hierarchical circuit IR into simulator netlists.
//!
//! Supported outputs:
//! - Spectre
//! - Spice, HSpice, NgSpice and Xyce
//! - Structural Verilog (module hierarchy only)
//!
//! ## Quick Start
//!
//! ```rust
//! use spicenet::prelude::*;
//!
//! let pkg = Package::new("demo").with_module(
//!     Module::new("rc")
//!         .with_port("a", PortDirection::Inout)
//!         .with_port("vss", PortDirection::Inout)
//!         .with_instance(
//!             Instance::new("c1", Reference::external(PRIMITIVES_DOMAIN, "capacitor"))
//!                 .with_connection("p", "a")
//!                 .with_connection("n", "vss")
//!                 .with_param("c", ParamValue::prefixed(10, SiPrefix::Pico)),
//!         ),
//! );
//!
//! let text = netlist_to_string(&pkg, NetlistFormat::Spice).unwrap();
//! assert!(text.contains("cc1\n+ a vss\n+ 10p\n"));
//! ```
//!
//! ## Simulation decks
//!
//! ```rust,ignore
//! use spicenet::prelude::*;
//!
//! let inp = SimInput::new(pkg, "tb").with_analysis(Analysis::Tran(TranInput {
//!     analysis_name: "tran0".into(),
//!     tstop: 1e-6,
//!     tstep: 1e-9,
//!     ..Default::default()
//! }));
//! let deck = sim_input_to_string(&inp, NetlistFormat::Ngspice)?;
//! ```

pub use spicenet_ir as ir;
pub use spicenet_netlist as netlist;

// ============================================================================
// Convenient re-exports from spicenet_ir
// ============================================================================

pub use spicenet_ir::primitives::{PHYSICAL_PRIMITIVES_DOMAIN, PRIMITIVES, PRIMITIVES_DOMAIN};
pub use spicenet_ir::{
    Analysis,
    // Circuit structure
    ConnectionTarget,
    Control,
    // Errors
    Error as IrError,
    ExternalModule,
    Instance,
    Module,
    Package,
    // Parameters
    Param,
    ParamValue,
    PortDirection,
    QualifiedName,
    Reference,
    SiPrefix,
    Signal,
    // Simulation
    SimInput,
    SpiceType,
};

// ============================================================================
// Convenient re-exports from spicenet_netlist
// ============================================================================

pub use spicenet_netlist::{
    // Errors
    Error as NetlistError,
    ErrorKind,
    NetlistFormat,
    NetlistOptions,
    Netlister,
    // Entry points
    netlist_to_path,
    netlist_to_string,
    sim_input_to_string,
    write_sim_input,
};

// ============================================================================
// Prelude module for convenient imports
// ============================================================================

/// Prelude module containing commonly used types.
///
/// ```rust
/// use spicenet::prelude::*;
/// ```
pub mod prelude {
    // Circuit structure
    pub use crate::{
        ConnectionTarget, ExternalModule, Instance, Module, Package, PortDirection,
        QualifiedName, Reference, Signal, SpiceType,
    };

    // Parameters
    pub use crate::{Param, ParamValue, SiPrefix};

    // Primitives
    pub use crate::{PRIMITIVES_DOMAIN, PRIMITIVES};

    // Simulation
    pub use crate::ir::{AcInput, DcInput, OpInput, Sweep, TranInput};
    pub use crate::{Analysis, Control, SimInput};

    // Netlisting
    pub use crate::{
        NetlistFormat, NetlistOptions, Netlister, netlist_to_path, netlist_to_string,
        sim_input_to_string,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_netlist_through_reexports() {
        let pkg = Package::new("demo").with_module(Module::new("empty"));
        let text = netlist_to_string(&pkg, NetlistFormat::Ngspice).unwrap();
        assert!(text.contains(".SUBCKT empty\n"), "{text}");
    }

    #[test]
    fn test_prelude_imports() {
        use crate::prelude::*;

        let format: NetlistFormat = "xyce".parse().unwrap();
        assert_eq!(format, NetlistFormat::Xyce);
        assert!(PRIMITIVES.contains_key("resistor"));
        let inst = Instance::new("r0", Reference::external(PRIMITIVES_DOMAIN, "resistor"));
        assert_eq!(inst.module.to_string(), "vlsir.primitives.resistor");
    }

    #[test]
    fn test_error_kinds_reexported() {
        let err = netlist_to_string(&Package::default(), NetlistFormat::Cdl).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }
}
