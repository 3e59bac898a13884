//! # fixedstep: fixed-step explicit ODE integration with error analysis
//!
//! Approximates a scalar first-order ODE y' = f(x, y) from an initial
//! condition (x0, y0) with three classical fixed-step explicit schemes, and
//! quantifies their accuracy against a closed-form analytical solution.
//!
//! ## Features
//!
//! - Explicit Euler, improved Euler (Heun) and classical 4th-order
//!   Runge-Kutta behind one closed [`Scheme`] dispatch
//! - Local truncation error (LTE) per step and global truncation error (GTE)
//!   per point, measured against a solution family calibrated through the
//!   initial condition
//! - Max-|GTE| versus step-count sweeps for error-vs-resolution studies
//! - A request layer that validates inputs and fans out across the schemes,
//!   returning labeled series for a rendering sink
//! - Structured errors naming the input fields implicated in each failure
//!
//! ## Basic usage
//!
//! ```rust
//! use fixedstep::{ClosureOde, FixedStep, Scheme};
//!
//! // y' = y with solution family e^x
//! let problem = ClosureOde::new(|_x, y| y, f64::exp);
//!
//! let mut solver = FixedStep::new(Scheme::RungeKutta4);
//! let trajectory = solver.compute(&problem, 0.0, 1.0, 1.0, 10).unwrap();
//!
//! assert_eq!(trajectory.len(), 11);
//! assert!((trajectory.y[10] - std::f64::consts::E).abs() < 1e-5);
//! ```
//!
//! ## Requests
//!
//! A [`Middleware`] owns one solver per scheme over a shared problem and
//! serves plot and sweep requests:
//!
//! ```rust
//! use fixedstep::{ClosureOde, GraphKind, Middleware, PlotRequest, Selection};
//!
//! let problem = ClosureOde::new(|_x, y| y, f64::exp);
//! let mut middleware = Middleware::new(problem);
//!
//! let series = middleware
//!     .plot_request(&PlotRequest {
//!         x0: 0.5,
//!         y0: 2.0,
//!         x: 2.0,
//!         n: 20,
//!         methods: Selection::ALL,
//!         kind: GraphKind::Trajectory,
//!     })
//!     .unwrap();
//!
//! // Three method series plus the analytical reference.
//! assert_eq!(series.len(), 4);
//! assert!(series.contains_key("exact"));
//! ```
//!
//! ## Failure reporting
//!
//! Validation errors carry the implicated input fields so a presentation
//! layer can highlight exactly those inputs:
//!
//! ```rust
//! use fixedstep::{Error, Field};
//!
//! let error = Error::ReversedInterval;
//! assert_eq!(error.to_string(), "x0 must be less than x");
//! assert_eq!(error.fields(), &[Field::X0, Field::X]);
//! ```
//!
//! ## Scope
//!
//! Scalar equations only, with a fixed step chosen by the caller: no adaptive
//! step-size control, no stiff-equation handling, no systems of ODEs. One
//! [`FixedStep`] instance is not internally thread-safe (it caches its last
//! trajectory); separate instances are fully independent.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod middleware;
pub mod scheme;
pub mod solver;

pub use error::{Error, Field};
pub use middleware::{
    ForbiddenZone, GraphKind, IntervalGuard, Middleware, PlotRequest, Selection, Series,
    SweepRequest,
};
pub use scheme::Scheme;
pub use solver::{
    analytical_samples, Calibrated, ClosureOde, FixedStep, GteSweep, ScalarOde, Stats, Trajectory,
    SAMPLE_DENSITY,
};
