//! Simulation input: DUT instance, options, control cards and analyses.

use std::io::Write;

use spicenet_ir::{
    AcInput, Analysis, Control, DcInput, NoiseInput, OpInput, Save, SaveMode, SimInput,
    SimOption, Sweep, TranInput,
};

use super::Netlister;
use crate::dialect::{Dialect, Family};
use crate::error::{Error, Result};
use crate::params::{format_double, param_text};
use crate::resolve::sanitize;

impl<'a, W: Write> Netlister<'a, W> {
    /// Write a complete simulation netlist.
    pub fn write_sim_input(&mut self, inp: &'a SimInput) -> Result<()> {
        if self.dialect.family() == Family::Verilog {
            return Err(self.unsupported("simulation input"));
        }
        let top = inp.pkg.module(&inp.top).ok_or_else(|| Error::UndefinedTop {
            name: inp.top.clone(),
        })?;
        if top.ports.len() != 1 {
            return Err(Error::TopPortCount {
                name: inp.top.clone(),
                count: top.ports.len(),
            });
        }

        self.write_sim_header(inp)?;
        self.write_package(&inp.pkg)?;

        let dut = format!("xtop 0 {}", sanitize(&top.name));
        match self.dialect.dut_comment() {
            Some(comment) => self.writeln(format!("{dut} {comment}"))?,
            None => self.writeln(dut)?,
        }
        self.blank()?;

        for opt in &inp.opts {
            self.write_sim_option(opt)?;
        }
        for ctrl in &inp.ctrls {
            self.write_control(ctrl)?;
        }
        for an in &inp.an {
            self.write_analysis(an)?;
        }
        if self.dialect.family() == Family::Spice {
            self.writeln(".end")?;
        }
        self.out.flush()?;
        log::info!(
            "wrote simulation input for `{}` with {} analyses as {}",
            inp.top,
            inp.an.len(),
            self.format()
        );
        Ok(())
    }

    fn write_sim_header(&mut self, inp: &SimInput) -> Result<()> {
        self.write_comment(&format!("Simulation Input, top module `{}`", inp.top))?;
        if self.dialect == Dialect::Spectre {
            self.writeln("simulator lang=spectre")?;
            self.writeln("global 0")?;
        }
        self.blank()
    }

    fn write_sim_option(&mut self, opt: &SimOption) -> Result<()> {
        let value = param_text(self.dialect, &opt.name, &opt.value)?.render(self.dialect);
        match self.dialect {
            Dialect::Spice | Dialect::Hspice | Dialect::Ngspice => {
                self.writeln(format!(".option {}={}", opt.name, value))
            }
            Dialect::Spectre | Dialect::Xyce | Dialect::Verilog => {
                Err(self.unsupported("simulator options"))
            }
        }
    }

    /// Write one control card.
    pub fn write_control(&mut self, ctrl: &Control) -> Result<()> {
        let d = self.dialect;
        match ctrl {
            Control::Include(inc) => match d {
                Dialect::Spectre => self.writeln(format!("include \"{}\"", inc.path)),
                Dialect::Xyce => self.writeln(format!(".include '{}'", inc.path)),
                Dialect::Spice | Dialect::Hspice | Dialect::Ngspice => {
                    self.writeln(format!(".include \"{}\"", inc.path))
                }
                Dialect::Verilog => Err(self.unsupported("include")),
            },
            Control::Lib(lib) => match d {
                Dialect::Spectre => {
                    self.writeln(format!("include \"{}\" section={}", lib.path, lib.section))
                }
                Dialect::Xyce => self.writeln(format!(".lib {} {}", lib.path, lib.section)),
                Dialect::Spice | Dialect::Hspice | Dialect::Ngspice => {
                    self.writeln(format!(".lib \"{}\" {}", lib.path, lib.section))
                }
                Dialect::Verilog => Err(self.unsupported("library include")),
            },
            Control::Param(param) => {
                let value = param.value.as_ref().ok_or_else(|| Error::InvalidParamValue {
                    param: param.name.clone(),
                    reason: "parameter control has no value".to_string(),
                })?;
                let value = param_text(d, &param.name, value)?.render(d);
                match d {
                    Dialect::Spectre => self.writeln(format!("parameters {}={}", param.name, value)),
                    Dialect::Spice | Dialect::Hspice | Dialect::Ngspice | Dialect::Xyce => {
                        self.writeln(format!(".param {}={}", param.name, value))
                    }
                    Dialect::Verilog => Err(self.unsupported("parameter controls")),
                }
            }
            Control::Meas(meas) => {
                let line = format!(".meas {} {} {}", meas.analysis_type, meas.name, meas.expr);
                match d {
                    Dialect::Spectre => {
                        self.writeln("simulator lang=spice")?;
                        self.writeln(line)?;
                        self.writeln("simulator lang=spectre")
                    }
                    Dialect::Spice | Dialect::Hspice | Dialect::Ngspice | Dialect::Xyce => {
                        self.writeln(line)
                    }
                    Dialect::Verilog => Err(self.unsupported("measurements")),
                }
            }
            Control::Save(save) => match (d, save) {
                (Dialect::Ngspice, Save::Mode(SaveMode::All)) => self.writeln(".save all"),
                (Dialect::Ngspice, Save::Signal(sig)) => self.writeln(format!(".save {sig}")),
                (Dialect::Ngspice, Save::Mode(SaveMode::None)) => {
                    Err(self.unsupported("saving no signals"))
                }
                (
                    Dialect::Spectre
                    | Dialect::Spice
                    | Dialect::Hspice
                    | Dialect::Xyce
                    | Dialect::Verilog,
                    _,
                ) => Err(self.unsupported("save controls")),
            },
            Control::Literal(text) => self.writeln(text),
        }
    }

    /// Write one analysis statement.
    pub fn write_analysis(&mut self, an: &Analysis) -> Result<()> {
        let name = an.name();
        if name.is_empty() {
            return Err(Error::InvalidAnalysis {
                name: String::new(),
                reason: "analysis name is required".to_string(),
            });
        }
        let ctrls: &[Control] = match an {
            Analysis::Op(a) => &a.ctrls,
            Analysis::Dc(a) => &a.ctrls,
            Analysis::Ac(a) => &a.ctrls,
            Analysis::Tran(a) => &a.ctrls,
            Analysis::Noise(a) => &a.ctrls,
            Analysis::Custom(_) => &[],
        };
        if !ctrls.is_empty() {
            return Err(self.unsupported("per-analysis controls"));
        }
        match an {
            Analysis::Op(op) => self.write_op(op),
            Analysis::Dc(dc) => self.write_dc(dc),
            Analysis::Ac(ac) => self.write_ac(ac),
            Analysis::Tran(tran) => self.write_tran(tran),
            Analysis::Noise(noise) => self.write_noise(noise),
            Analysis::Custom(custom) => self.writeln(&custom.cmd),
        }
    }

    fn write_op(&mut self, op: &OpInput) -> Result<()> {
        match self.dialect {
            Dialect::Spice | Dialect::Hspice | Dialect::Ngspice => self.writeln(".op"),
            Dialect::Xyce => {
                // Xyce reports an operating point through a one-point DC sweep.
                let dummy = format!("_{}_op", op.analysis_name);
                self.writeln(format!(".param {dummy}=1"))?;
                self.writeln(format!(".dc {dummy} 1 1 1"))
            }
            Dialect::Spectre => {
                self.writeln(format!("{} dc oppoint=rawfile", op.analysis_name))
            }
            Dialect::Verilog => Err(self.unsupported("operating point analysis")),
        }
    }

    fn write_dc(&mut self, dc: &DcInput) -> Result<()> {
        let n = &dc.analysis_name;
        let p = &dc.indep_name;
        let line = match (self.dialect, &dc.sweep) {
            (Dialect::Spice | Dialect::Hspice | Dialect::Ngspice, Sweep::Linear(s)) => format!(
                ".dc {p} {} {} {}",
                num(n, s.start)?,
                num(n, s.stop)?,
                num(n, s.step)?
            ),
            (Dialect::Xyce, Sweep::Linear(s)) => format!(
                ".dc LIN {p} {} {} {}",
                num(n, s.start)?,
                num(n, s.stop)?,
                num(n, s.step)?
            ),
            (Dialect::Xyce, Sweep::Log(s)) => format!(
                ".dc DEC {p} {} {} {}",
                num(n, s.start)?,
                num(n, s.stop)?,
                s.npts
            ),
            (Dialect::Xyce, Sweep::Points(s)) => {
                format!(".dc {p} LIST {}", nums(n, &s.points)?.join(" "))
            }
            (Dialect::Spectre, Sweep::Linear(s)) => format!(
                "{n} dc param={p} start={} stop={} step={}",
                num(n, s.start)?,
                num(n, s.stop)?,
                num(n, s.step)?
            ),
            (Dialect::Spectre, Sweep::Points(s)) => {
                format!("{n} dc param={p} values=[{}]", nums(n, &s.points)?.join(" "))
            }
            (
                Dialect::Spice | Dialect::Hspice | Dialect::Ngspice | Dialect::Spectre,
                Sweep::Log(_),
            ) => return Err(self.unsupported("DC log sweeps")),
            (Dialect::Spice | Dialect::Hspice | Dialect::Ngspice, Sweep::Points(_)) => {
                return Err(self.unsupported("DC point sweeps"));
            }
            (Dialect::Verilog, _) => return Err(self.unsupported("DC analysis")),
        };
        self.writeln(line)
    }

    fn write_ac(&mut self, ac: &AcInput) -> Result<()> {
        let n = &ac.analysis_name;
        check_frequency_range(n, ac.fstart, ac.fstop, ac.npts)?;
        let (fstart, fstop) = (num(n, ac.fstart)?, num(n, ac.fstop)?);
        let npts = ac.npts;
        match self.dialect {
            Dialect::Spice | Dialect::Hspice | Dialect::Ngspice => {
                self.writeln(format!(".ac dec {npts} {fstart} {fstop}"))
            }
            Dialect::Xyce => self.writeln(format!(".ac DEC {npts} {fstart} {fstop}")),
            Dialect::Spectre => {
                self.writeln(format!("{n} ac start={fstart} stop={fstop} dec={npts}"))
            }
            Dialect::Verilog => Err(self.unsupported("AC analysis")),
        }
    }

    fn write_tran(&mut self, tran: &TranInput) -> Result<()> {
        let n = &tran.analysis_name;
        if !tran.ic.is_empty() {
            return Err(self.unsupported("transient initial conditions"));
        }
        let (tstep, tstop) = (num(n, tran.tstep)?, num(n, tran.tstop)?);
        match self.dialect {
            Dialect::Spice | Dialect::Hspice | Dialect::Ngspice | Dialect::Xyce => {
                self.writeln(format!(".tran {tstep} {tstop}"))
            }
            Dialect::Spectre => self.writeln(format!("{n} tran stop={tstop} step={tstep}")),
            Dialect::Verilog => Err(self.unsupported("transient analysis")),
        }
    }

    fn write_noise(&mut self, noise: &NoiseInput) -> Result<()> {
        let n = &noise.analysis_name;
        match self.dialect {
            Dialect::Ngspice => {
                check_frequency_range(n, noise.fstart, noise.fstop, noise.npts)?;
                let output = if noise.output_n.is_empty() {
                    format!("v(xtop.{})", noise.output_p)
                } else {
                    format!("v(xtop.{},xtop.{})", noise.output_p, noise.output_n)
                };
                self.writeln(format!(
                    ".noise {output} v.xtop.v{} dec {} {} {}",
                    noise.input_source,
                    noise.npts,
                    num(n, noise.fstart)?,
                    num(n, noise.fstop)?
                ))
            }
            Dialect::Spice
            | Dialect::Hspice
            | Dialect::Xyce
            | Dialect::Spectre
            | Dialect::Verilog => Err(self.unsupported("noise analysis")),
        }
    }
}

fn num(analysis: &str, value: f64) -> Result<String> {
    if value.is_finite() {
        Ok(format_double(value))
    } else {
        Err(Error::InvalidAnalysis {
            name: analysis.to_string(),
            reason: format!("non-finite value {value}"),
        })
    }
}

fn nums(analysis: &str, values: &[f64]) -> Result<Vec<String>> {
    values.iter().map(|v| num(analysis, *v)).collect()
}

fn check_frequency_range(analysis: &str, fstart: f64, fstop: f64, npts: u64) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidAnalysis {
        name: analysis.to_string(),
        reason: reason.to_string(),
    };
    if fstart <= 0.0 {
        return Err(invalid("fstart must be positive"));
    }
    if fstop <= 0.0 {
        return Err(invalid("fstop must be positive"));
    }
    if npts == 0 {
        return Err(invalid("npts must be positive"));
    }
    Ok(())
}
