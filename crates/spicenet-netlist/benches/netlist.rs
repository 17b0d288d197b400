//! Benchmarks for netlist generation.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use spicenet_ir::primitives::PRIMITIVES_DOMAIN;
use spicenet_ir::{Instance, Module, Package, PortDirection, Reference, Signal};
use spicenet_netlist::{NetlistFormat, netlist};

/// A chain of `modules` ladders, each with `resistors` resistors.
fn ladder_package(modules: usize, resistors: usize) -> Package {
    let mut pkg = Package::new("bench");
    for m in 0..modules {
        let mut module = Module::new(format!("ladder{m}"))
            .with_port("a", PortDirection::Inout)
            .with_port("b", PortDirection::Inout);
        for r in 0..resistors {
            let p = if r == 0 { "a".to_string() } else { format!("n{r}") };
            let n = if r + 1 == resistors {
                "b".to_string()
            } else {
                let name = format!("n{}", r + 1);
                module = module.with_signal(Signal::scalar(name.as_str()));
                name
            };
            module = module.with_instance(
                Instance::new(format!("r{r}"), Reference::external(PRIMITIVES_DOMAIN, "resistor"))
                    .with_connection("p", p.as_str())
                    .with_connection("n", n.as_str())
                    .with_param("r", 1e3),
            );
        }
        if m > 0 {
            module = module.with_instance(
                Instance::new("sub", Reference::local(format!("ladder{}", m - 1)))
                    .with_connection("a", "a")
                    .with_connection("b", "b"),
            );
        }
        pkg = pkg.with_module(module);
    }
    pkg
}

fn bench_netlist_formats(c: &mut Criterion) {
    let pkg = ladder_package(20, 50);
    for format in [
        NetlistFormat::Spectre,
        NetlistFormat::Ngspice,
        NetlistFormat::Xyce,
    ] {
        c.bench_function(&format!("netlist_ladder_20x50_{format}"), |b| {
            b.iter(|| {
                let mut buf = Vec::with_capacity(1 << 16);
                netlist(black_box(&pkg), &mut buf, format).unwrap();
                buf
            });
        });
    }
}

fn bench_netlist_large(c: &mut Criterion) {
    let pkg = ladder_package(100, 200);
    c.bench_function("netlist_ladder_100x200_spice", |b| {
        b.iter(|| {
            let mut buf = Vec::new();
            netlist(black_box(&pkg), &mut buf, NetlistFormat::Spice).unwrap();
            buf
        });
    });
}

criterion_group!(benches, bench_netlist_formats, bench_netlist_large);
criterion_main!(benches);
