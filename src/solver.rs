//! Fixed-step marching and truncation-error analysis.
//!
//! The solver advances a scalar first-order ODE y' = f(x, y) from (x0, y0) to
//! a right endpoint over a uniform grid, and measures the result against a
//! calibrated analytical solution:
//!
//! - **LTE** (local truncation error): the error one step introduces when the
//!   exact value is used as its starting point, isolating single-step
//!   truncation from accumulated drift.
//! - **GTE** (global truncation error): the accumulated deviation of the
//!   numerical trajectory from the exact solution at each grid point.
//!
//! A step-count sweep re-runs the integration for every n in a range and
//! records the worst-case |GTE| per run. Each n changes the step size h, so
//! every run starts from scratch; there is no incremental state to reuse.

use crate::error::Error;
use crate::scheme::Scheme;

/// Denominator threshold below which calibration is considered singular.
const CALIBRATION_EPS: f64 = 1e-9;

/// Initial values with magnitude at or below this are treated as negligible
/// when the calibration denominator vanishes.
const NEGLIGIBLE_Y0: f64 = 1e-2;

/// Default number of analytical sample points per unit of x.
pub const SAMPLE_DENSITY: usize = 200;

/// A scalar first-order ODE paired with its general analytical solution.
///
/// `rhs` is the equation f(x, y) = dy/dx; `solution_family` is the
/// unnormalized solution g(x), which the solver scales through a requested
/// initial condition (see [`Calibrated`]). Neither function is checked for
/// domain validity; keeping the integration grid away from singularities of
/// `rhs` is the caller's responsibility.
pub trait ScalarOde {
    /// Evaluate the right-hand side f(x, y).
    fn rhs(&self, x: f64, y: f64) -> f64;

    /// Evaluate the general (unnormalized) analytical solution g(x).
    fn solution_family(&self, x: f64) -> f64;
}

/// [`ScalarOde`] adapter over a pair of closures.
///
/// # Example
/// ```
/// use fixedstep::ClosureOde;
///
/// // y' = y with solution family e^x
/// let problem = ClosureOde::new(|_x, y| y, f64::exp);
/// ```
#[derive(Debug, Clone)]
pub struct ClosureOde<F, G> {
    f: F,
    g: G,
}

impl<F, G> ClosureOde<F, G>
where
    F: Fn(f64, f64) -> f64,
    G: Fn(f64) -> f64,
{
    /// Wrap an equation `f(x, y)` and a solution family `g(x)`.
    pub fn new(f: F, g: G) -> Self {
        Self { f, g }
    }
}

impl<F, G> ScalarOde for ClosureOde<F, G>
where
    F: Fn(f64, f64) -> f64,
    G: Fn(f64) -> f64,
{
    fn rhs(&self, x: f64, y: f64) -> f64 {
        (self.f)(x, y)
    }

    fn solution_family(&self, x: f64) -> f64 {
        (self.g)(x)
    }
}

/// The specific analytical solution through an initial condition.
///
/// Derived from the general family by scaling: y(x) = g(x) * y0 / g(x0).
pub struct Calibrated<'a, P: ?Sized> {
    problem: &'a P,
    scale: f64,
}

impl<P: ?Sized> core::fmt::Debug for Calibrated<'_, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Calibrated")
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}

impl<'a, P: ScalarOde + ?Sized> Calibrated<'a, P> {
    /// Calibrate the solution family through (x0, y0).
    ///
    /// Fails with [`Error::InvalidInitialCondition`] when |g(x0)| <= 1e-9
    /// while |y0| > 1e-2: the family cannot pass through the requested point
    /// without division instability. A vanishing denominator with negligible
    /// y0 pins the scale to zero instead.
    pub fn new(problem: &'a P, x0: f64, y0: f64) -> Result<Self, Error> {
        let denominator = problem.solution_family(x0);
        if denominator.abs() <= CALIBRATION_EPS {
            if y0.abs() > NEGLIGIBLE_Y0 {
                return Err(Error::InvalidInitialCondition);
            }
            return Ok(Self { problem, scale: 0.0 });
        }
        Ok(Self {
            problem,
            scale: y0 / denominator,
        })
    }

    /// Evaluate the calibrated solution at x.
    pub fn eval(&self, x: f64) -> f64 {
        self.problem.solution_family(x) * self.scale
    }
}

/// Result of one integration run.
///
/// All four sequences have length n + 1 and share the same grid index; the
/// x values are strictly increasing. `lte[0]` and `gte[0]` are exactly zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    /// Grid points x0 + i * h.
    pub x: Vec<f64>,
    /// Approximated solution values.
    pub y: Vec<f64>,
    /// Local truncation error per step.
    pub lte: Vec<f64>,
    /// Global truncation error per point.
    pub gte: Vec<f64>,
}

impl Trajectory {
    /// Number of grid points (n + 1).
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Whether the trajectory holds no points.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Result of a step-count sweep: max |GTE| for each n in a closed range.
#[derive(Debug, Clone, PartialEq)]
pub struct GteSweep {
    /// Step counts, `from..=to` in order.
    pub ns: Vec<usize>,
    /// Maximum absolute GTE of the run at the matching step count.
    pub max_gte: Vec<f64>,
}

/// Accumulated work counters for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Total right-hand-side evaluations (marching and LTE probing).
    pub rhs_evals: u64,
    /// Total integration steps taken.
    pub steps: u64,
}

/// Fixed-step explicit solver for one integration scheme.
///
/// The problem is passed by reference to each call, so one problem definition
/// can be shared across several solvers. The solver caches the trajectory of
/// its most recent successful [`compute`](FixedStep::compute) for
/// [`max_abs_gte`](FixedStep::max_abs_gte); a new run replaces it.
///
/// Not internally thread-safe: concurrent calls on one instance race on the
/// cached trajectory and must be serialized by the caller. Separate instances
/// share no state.
#[derive(Debug, Clone)]
pub struct FixedStep {
    scheme: Scheme,
    trajectory: Option<Trajectory>,
    /// Work counters, accumulated across calls.
    pub stats: Stats,
}

impl FixedStep {
    /// Create a solver for the given scheme.
    pub fn new(scheme: Scheme) -> Self {
        Self {
            scheme,
            trajectory: None,
            stats: Stats::default(),
        }
    }

    /// The scheme this solver marches with.
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// The trajectory of the most recent successful `compute`, if any.
    pub fn trajectory(&self) -> Option<&Trajectory> {
        self.trajectory.as_ref()
    }

    /// Reset the work counters.
    pub fn reset_stats(&mut self) {
        self.stats = Stats::default();
    }

    /// Integrate from (x0, y0) to `x_end` in `n` uniform steps.
    ///
    /// Marches strictly left to right; each step depends on the previous one.
    /// At every step the calibrated exact solution is also advanced by one
    /// step to obtain the LTE, and compared pointwise for the GTE.
    ///
    /// # Errors
    /// * [`Error::ZeroSteps`] if `n == 0`.
    /// * [`Error::InvalidInitialCondition`] if calibration fails.
    pub fn compute<P: ScalarOde + ?Sized>(
        &mut self,
        problem: &P,
        x0: f64,
        y0: f64,
        x_end: f64,
        n: usize,
    ) -> Result<&Trajectory, Error> {
        if n == 0 {
            return Err(Error::ZeroSteps);
        }
        let exact = Calibrated::new(problem, x0, y0)?;

        let h = (x_end - x0) / n as f64;

        let mut x = Vec::with_capacity(n + 1);
        let mut y = Vec::with_capacity(n + 1);
        let mut lte = Vec::with_capacity(n + 1);
        let mut gte = Vec::with_capacity(n + 1);

        x.push(x0);
        y.push(y0);
        lte.push(0.0);
        gte.push(0.0);

        for i in 1..=n {
            let x_prev = x[i - 1];
            let y_prev = y[i - 1];
            let x_i = x0 + i as f64 * h;

            let y_i = y_prev + h * self.scheme.increment(problem, x_prev, y_prev, h);

            // One exact-started step isolates the truncation error of this
            // step from the drift accumulated before it.
            let exact_prev = exact.eval(x_prev);
            let exact_i = exact.eval(x_i);
            let exact_step = h * self.scheme.increment(problem, x_prev, exact_prev, h);

            x.push(x_i);
            y.push(y_i);
            lte.push(exact_i - exact_prev - exact_step);
            gte.push(exact_i - y_i);
        }

        self.stats.steps += n as u64;
        // Two increment evaluations per step: the march and the LTE probe.
        self.stats.rhs_evals += 2 * n as u64 * self.scheme.rhs_evals_per_step();

        Ok(self.trajectory.insert(Trajectory { x, y, lte, gte }))
    }

    /// Maximum absolute GTE of the most recent trajectory.
    ///
    /// # Errors
    /// [`Error::NothingComputed`] if no `compute` call has succeeded on this
    /// solver yet. That is a caller contract violation, not a user-input
    /// problem.
    pub fn max_abs_gte(&self) -> Result<f64, Error> {
        let trajectory = self.trajectory.as_ref().ok_or(Error::NothingComputed)?;
        Ok(trajectory
            .gte
            .iter()
            .fold(0.0_f64, |max, g| max.max(g.abs())))
    }

    /// Max |GTE| as a function of step count over `from..=to`.
    ///
    /// Re-runs [`compute`](FixedStep::compute) from scratch for every n: the
    /// step size changes with n, so no state carries over between runs. Cost
    /// is O((to - from) * average n), which is fine for the small ranges this
    /// is meant for.
    ///
    /// # Errors
    /// * [`Error::EmptySweepRange`] if `from > to`.
    /// * Any error from the underlying `compute` calls.
    pub fn gte_sweep<P: ScalarOde + ?Sized>(
        &mut self,
        problem: &P,
        x0: f64,
        y0: f64,
        x_end: f64,
        from: usize,
        to: usize,
    ) -> Result<GteSweep, Error> {
        if from > to {
            return Err(Error::EmptySweepRange);
        }

        let mut ns = Vec::with_capacity(to - from + 1);
        let mut max_gte = Vec::with_capacity(to - from + 1);

        for n in from..=to {
            self.compute(problem, x0, y0, x_end, n)?;
            ns.push(n);
            max_gte.push(self.max_abs_gte()?);
        }

        Ok(GteSweep { ns, max_gte })
    }
}

/// Densely sample the calibrated analytical solution for plotting.
///
/// The curve is independent of any integration scheme and of the step count.
/// The point count is `max(1, floor((x_end - x0) * density))`, spaced evenly
/// and inclusive of both endpoints; [`SAMPLE_DENSITY`] is the usual density.
///
/// # Errors
/// [`Error::InvalidInitialCondition`] if calibration fails.
pub fn analytical_samples<P: ScalarOde + ?Sized>(
    problem: &P,
    x0: f64,
    y0: f64,
    x_end: f64,
    density: usize,
) -> Result<(Vec<f64>, Vec<f64>), Error> {
    let exact = Calibrated::new(problem, x0, y0)?;
    let count = (((x_end - x0) * density as f64).floor() as usize).max(1);
    let xs = linspace(x0, x_end, count);
    let ys = xs.iter().map(|&x| exact.eval(x)).collect();
    Ok((xs, ys))
}

/// `count` evenly spaced points from `a` to `b`, both inclusive.
fn linspace(a: f64, b: f64, count: usize) -> Vec<f64> {
    if count == 1 {
        return vec![a];
    }
    let step = (b - a) / (count - 1) as f64;
    (0..count).map(|i| a + i as f64 * step).collect()
}
