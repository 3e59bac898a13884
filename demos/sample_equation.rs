//! Basic usage — y' = (3y + 2xy) / x² against its exact solution.
//!
//! The solution family is g(x) = e^(3 - 3/x) · x²; through (1, 1) the
//! calibrated solution is the family itself. Runs all three schemes, prints
//! endpoint errors, and shows a max-|GTE| sweep.
//!
//! Run with:
//!   cargo run --example sample_equation

use fixedstep::{
    ClosureOde, GraphKind, Middleware, PlotRequest, Scheme, Selection, SweepRequest,
};

fn main() {
    let problem = ClosureOde::new(
        |x: f64, y: f64| (3.0 * y + 2.0 * x * y) / (x * x),
        |x: f64| (3.0 - 3.0 / x).exp() * x * x,
    );
    let mut middleware = Middleware::new(problem);

    let (x0, y0, x, n) = (1.0, 1.0, 3.0, 20);

    let series = middleware
        .plot_request(&PlotRequest {
            x0,
            y0,
            x,
            n,
            methods: Selection::ALL,
            kind: GraphKind::Trajectory,
        })
        .expect("trajectory request");

    println!("y' = (3y + 2xy) / x², y({x0}) = {y0}, integrated to x = {x}, n = {n}");
    println!();

    let exact_end = *series["exact"].y.last().unwrap();
    for scheme in Scheme::ALL {
        let s = &series[scheme.name()];
        let y_end = *s.y.last().unwrap();
        println!(
            "  {:<15} y({x}) = {y_end:>12.6}   (error {:+.3e})",
            s.label,
            y_end - exact_end
        );
    }
    println!("  {:<15} y({x}) = {exact_end:>12.6}", "Exact");
    println!();

    let sweeps = middleware
        .gte_sweep_request(&SweepRequest {
            x0,
            y0,
            x,
            from: 5,
            to: 40,
            methods: Selection::ALL,
        })
        .expect("sweep request");

    println!("max |GTE| over n = 5..=40:");
    for scheme in Scheme::ALL {
        let s = &sweeps[scheme.name()];
        println!(
            "  {:<15} {:.3e} -> {:.3e}",
            s.label,
            s.y.first().unwrap(),
            s.y.last().unwrap()
        );
    }
}
