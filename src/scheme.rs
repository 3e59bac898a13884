//! Step formulas for the fixed-step explicit schemes.
//!
//! Each scheme reduces to a per-step increment function a(x, y, h) used in
//! the forward update y_{i+1} = y_i + h * a(x_i, y_i, h):
//!
//! - explicit Euler:     a = f(x, y)
//! - improved Euler:     a = (f(x, y) + f(x + h, y + h f(x, y))) / 2
//! - classical RK4:      a = (k1 + 2 k2 + 2 k3 + k4) / 6
//!
//! The set of schemes is closed, so dispatch is an enum rather than an open
//! trait object.

use crate::solver::ScalarOde;

/// A fixed-step explicit integration scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// Explicit (forward) Euler, first order.
    Euler,
    /// Improved Euler (Heun), second order: one predictor and one corrector
    /// evaluation of the right-hand side.
    ImprovedEuler,
    /// Classical four-stage Runge-Kutta, fourth order.
    RungeKutta4,
}

impl Scheme {
    /// All schemes, in display order.
    pub const ALL: [Scheme; 3] = [Scheme::Euler, Scheme::ImprovedEuler, Scheme::RungeKutta4];

    /// Per-step slope estimate a(x, y, h).
    ///
    /// The forward update is `y + h * increment(x, y, h)`. Euler ignores `h`.
    pub fn increment<P: ScalarOde + ?Sized>(self, problem: &P, x: f64, y: f64, h: f64) -> f64 {
        match self {
            Scheme::Euler => problem.rhs(x, y),
            Scheme::ImprovedEuler => {
                let k1 = problem.rhs(x, y);
                let k2 = problem.rhs(x + h, y + h * k1);
                (k1 + k2) / 2.0
            }
            Scheme::RungeKutta4 => {
                let k1 = problem.rhs(x, y);
                let k2 = problem.rhs(x + h / 2.0, y + h * k1 / 2.0);
                let k3 = problem.rhs(x + h / 2.0, y + h * k2 / 2.0);
                let k4 = problem.rhs(x + h, y + h * k3);
                (k1 + 2.0 * k2 + 2.0 * k3 + k4) / 6.0
            }
        }
    }

    /// Stable identifier used as the series key in request results.
    pub fn name(self) -> &'static str {
        match self {
            Scheme::Euler => "euler",
            Scheme::ImprovedEuler => "improved-euler",
            Scheme::RungeKutta4 => "runge-kutta",
        }
    }

    /// Human-readable display label.
    pub fn label(self) -> &'static str {
        match self {
            Scheme::Euler => "Euler",
            Scheme::ImprovedEuler => "Improved Euler",
            Scheme::RungeKutta4 => "Runge-Kutta",
        }
    }

    /// Display color token for the rendering sink.
    pub fn color(self) -> &'static str {
        match self {
            Scheme::Euler => "r",
            Scheme::ImprovedEuler => "g",
            Scheme::RungeKutta4 => "y",
        }
    }

    /// Order of accuracy of the scheme.
    pub fn order(self) -> u8 {
        match self {
            Scheme::Euler => 1,
            Scheme::ImprovedEuler => 2,
            Scheme::RungeKutta4 => 4,
        }
    }

    /// Right-hand-side evaluations per step, for the solver statistics.
    pub fn rhs_evals_per_step(self) -> u64 {
        match self {
            Scheme::Euler => 1,
            Scheme::ImprovedEuler => 2,
            Scheme::RungeKutta4 => 4,
        }
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
