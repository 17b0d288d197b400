//! Simulation envelope: a package plus analyses and control cards.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::circuit::Package;
use crate::error::Result;
use crate::param::{Param, ParamValue};

/// Everything needed to write a simulation netlist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimInput {
    pub pkg: Package,
    /// Name of the top-level module. It must have exactly one port.
    pub top: String,
    #[serde(default)]
    pub opts: Vec<SimOption>,
    #[serde(default)]
    pub an: Vec<Analysis>,
    #[serde(default)]
    pub ctrls: Vec<Control>,
}

impl SimInput {
    pub fn new(pkg: Package, top: impl Into<String>) -> Self {
        Self {
            pkg,
            top: top.into(),
            ..Self::default()
        }
    }

    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.opts.push(SimOption {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn with_analysis(mut self, an: Analysis) -> Self {
        self.an.push(an);
        self
    }

    pub fn with_control(mut self, ctrl: Control) -> Self {
        self.ctrls.push(ctrl);
        self
    }

    /// Load a simulation input from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A simulator option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimOption {
    pub name: String,
    pub value: ParamValue,
}

/// A requested analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Analysis {
    Op(OpInput),
    Dc(DcInput),
    Ac(AcInput),
    Tran(TranInput),
    Noise(NoiseInput),
    /// Analysis statement copied verbatim.
    Custom(CustomAnalysis),
}

impl Analysis {
    /// Name of the analysis.
    pub fn name(&self) -> &str {
        match self {
            Analysis::Op(a) => &a.analysis_name,
            Analysis::Dc(a) => &a.analysis_name,
            Analysis::Ac(a) => &a.analysis_name,
            Analysis::Tran(a) => &a.analysis_name,
            Analysis::Noise(a) => &a.analysis_name,
            Analysis::Custom(a) => &a.analysis_name,
        }
    }
}

/// Operating point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpInput {
    pub analysis_name: String,
    #[serde(default)]
    pub ctrls: Vec<Control>,
}

/// DC sweep of a parameter or source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DcInput {
    pub analysis_name: String,
    /// Swept parameter or source.
    pub indep_name: String,
    pub sweep: Sweep,
    #[serde(default)]
    pub ctrls: Vec<Control>,
}

/// Small-signal AC sweep, by decade.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AcInput {
    pub analysis_name: String,
    pub fstart: f64,
    pub fstop: f64,
    /// Points per decade.
    pub npts: u64,
    #[serde(default)]
    pub ctrls: Vec<Control>,
}

/// Transient analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranInput {
    pub analysis_name: String,
    pub tstop: f64,
    pub tstep: f64,
    /// Initial conditions, node name to value.
    #[serde(default)]
    pub ic: IndexMap<String, f64>,
    #[serde(default)]
    pub ctrls: Vec<Control>,
}

/// Noise analysis, by decade.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoiseInput {
    pub analysis_name: String,
    /// Positive output node.
    pub output_p: String,
    /// Negative output node. Empty for ground.
    #[serde(default)]
    pub output_n: String,
    /// Name of the input-referred source.
    pub input_source: String,
    pub fstart: f64,
    pub fstop: f64,
    pub npts: u64,
    #[serde(default)]
    pub ctrls: Vec<Control>,
}

/// A simulator-specific analysis statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomAnalysis {
    pub analysis_name: String,
    pub cmd: String,
}

/// Sweep of a DC analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sweep {
    Linear(LinearSweep),
    Log(LogSweep),
    Points(PointSweep),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearSweep {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSweep {
    pub start: f64,
    pub stop: f64,
    /// Points per decade.
    pub npts: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointSweep {
    pub points: Vec<f64>,
}

/// A simulation control card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    Include(Include),
    Lib(LibInclude),
    Save(Save),
    Meas(Meas),
    Param(Param),
    /// Raw netlist text.
    Literal(String),
}

/// Include a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Include {
    pub path: String,
}

/// Include one section of a library file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibInclude {
    pub path: String,
    pub section: String,
}

/// Which signals to save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Save {
    Mode(SaveMode),
    Signal(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveMode {
    None,
    All,
}

/// A measurement statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meas {
    /// Analysis the measurement applies to, e.g. `tran`.
    pub analysis_type: String,
    pub name: String,
    pub expr: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_name() {
        let an = Analysis::Ac(AcInput {
            analysis_name: "ac0".to_string(),
            fstart: 1.0,
            fstop: 1e9,
            npts: 10,
            ctrls: vec![],
        });
        assert_eq!(an.name(), "ac0");
    }

    #[test]
    fn test_sim_input_json() {
        let json = r#"{
            "pkg": {"domain": "demo"},
            "top": "tb",
            "an": [
                {"dc": {"analysis_name": "dc0", "indep_name": "vdd",
                        "sweep": {"points": {"points": [0.0, 0.5, 1.0]}}}},
                {"op": {"analysis_name": "op0"}}
            ],
            "ctrls": [
                {"lib": {"path": "models.lib", "section": "tt"}},
                {"save": {"mode": "all"}}
            ]
        }"#;
        let inp = SimInput::from_json(json).expect("sim input should parse");
        assert_eq!(inp.top, "tb");
        assert_eq!(inp.an.len(), 2);
        match &inp.an[0] {
            Analysis::Dc(dc) => {
                assert_eq!(dc.sweep, Sweep::Points(PointSweep { points: vec![0.0, 0.5, 1.0] }))
            }
            other => panic!("expected dc analysis, got {:?}", other),
        }
        assert_eq!(inp.ctrls[1], Control::Save(Save::Mode(SaveMode::All)));
    }
}
