//! Request validation and fan-out across the three schemes.
//!
//! This is the seam between a presentation layer and the solvers: it takes
//! plain numeric inputs plus per-method selection flags, validates them,
//! runs each selected scheme, and returns named series ready for a rendering
//! sink. Nothing here draws anything; axis scaling, legends and titles are
//! the consumer's concern.

use std::collections::BTreeMap;

use crate::error::Error;
use crate::scheme::Scheme;
use crate::solver::{analytical_samples, FixedStep, ScalarOde, SAMPLE_DENSITY};

// Series key, label and color for the analytical reference curve.
const EXACT_KEY: &str = "exact";
const EXACT_LABEL: &str = "Exact";
const EXACT_COLOR: &str = "b";

/// Predicate marking an interval as forbidden (e.g. straddling a singularity).
pub type ForbiddenZone = Box<dyn Fn(f64, f64) -> bool + Send + Sync>;

/// Interval preconditions shared by every request.
///
/// Checks, in order: the endpoints are properly ordered, the interval does
/// not fall inside a forbidden zone, and the endpoints are not degenerately
/// close. The forbidden zone is a caller-supplied predicate because it is an
/// equation-specific policy, not a property of the integration core; the
/// default guards the symmetric neighborhood of x = 0 for equations with x²
/// in a denominator.
pub struct IntervalGuard {
    min_span: f64,
    forbidden: Option<ForbiddenZone>,
}

impl IntervalGuard {
    /// Minimum distance between x0 and x accepted by the default guard.
    pub const DEFAULT_MIN_SPAN: f64 = 0.1;

    /// Half-width of the default forbidden neighborhood around x = 0.
    pub const DEFAULT_EPSILON: f64 = 1e-3;

    /// Guard with a minimum span and no forbidden zone.
    pub fn new(min_span: f64) -> Self {
        Self {
            min_span,
            forbidden: None,
        }
    }

    /// Attach a forbidden-zone predicate over (x0, x).
    pub fn with_forbidden_zone<Z>(mut self, zone: Z) -> Self
    where
        Z: Fn(f64, f64) -> bool + Send + Sync + 'static,
    {
        self.forbidden = Some(Box::new(zone));
        self
    }

    /// Guard rejecting intervals that keep both endpoints within
    /// [-epsilon, epsilon], with the default minimum span.
    pub fn zero_neighborhood(epsilon: f64) -> Self {
        Self::new(Self::DEFAULT_MIN_SPAN)
            .with_forbidden_zone(move |x0, x| x0 <= epsilon && x >= -epsilon)
    }

    /// Validate an interval, reporting the first violated precondition.
    pub fn check(&self, x0: f64, x_end: f64) -> Result<(), Error> {
        if x0 >= x_end {
            return Err(Error::ReversedInterval);
        }
        if let Some(zone) = &self.forbidden {
            if zone(x0, x_end) {
                return Err(Error::ForbiddenInterval);
            }
        }
        if x_end - x0 <= self.min_span {
            return Err(Error::DegenerateInterval);
        }
        Ok(())
    }
}

impl Default for IntervalGuard {
    fn default() -> Self {
        Self::zero_neighborhood(Self::DEFAULT_EPSILON)
    }
}

/// Which integration methods a request includes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    /// Include explicit Euler.
    pub euler: bool,
    /// Include improved Euler (Heun).
    pub improved_euler: bool,
    /// Include classical RK4.
    pub runge_kutta: bool,
}

impl Selection {
    /// Every method selected.
    pub const ALL: Selection = Selection {
        euler: true,
        improved_euler: true,
        runge_kutta: true,
    };

    /// Select a single scheme.
    pub fn only(scheme: Scheme) -> Self {
        let mut selection = Selection::default();
        match scheme {
            Scheme::Euler => selection.euler = true,
            Scheme::ImprovedEuler => selection.improved_euler = true,
            Scheme::RungeKutta4 => selection.runge_kutta = true,
        }
        selection
    }

    /// Whether the given scheme is selected.
    pub fn contains(&self, scheme: Scheme) -> bool {
        match scheme {
            Scheme::Euler => self.euler,
            Scheme::ImprovedEuler => self.improved_euler,
            Scheme::RungeKutta4 => self.runge_kutta,
        }
    }

    /// Whether at least one method is selected.
    pub fn any(&self) -> bool {
        self.euler || self.improved_euler || self.runge_kutta
    }

    /// Selected schemes in display order.
    pub fn schemes(self) -> impl Iterator<Item = Scheme> {
        Scheme::ALL.into_iter().filter(move |s| self.contains(*s))
    }
}

/// Which quantity a plot request extracts from each trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphKind {
    /// The approximated solution, overlaid with the analytical curve.
    Trajectory,
    /// Local truncation error per step.
    Lte,
    /// Global truncation error per point.
    Gte,
}

/// One named curve for the rendering sink.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Ordered x values.
    pub x: Vec<f64>,
    /// Ordered y values, same length as `x`.
    pub y: Vec<f64>,
    /// Display label.
    pub label: &'static str,
    /// Display color token.
    pub color: &'static str,
}

/// Inputs for a trajectory / LTE / GTE plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotRequest {
    /// Initial x value.
    pub x0: f64,
    /// Initial y value.
    pub y0: f64,
    /// Right endpoint of the interval.
    pub x: f64,
    /// Number of integration steps.
    pub n: usize,
    /// Methods to include.
    pub methods: Selection,
    /// Quantity to extract.
    pub kind: GraphKind,
}

/// Inputs for a max-|GTE|-versus-n sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepRequest {
    /// Initial x value.
    pub x0: f64,
    /// Initial y value.
    pub y0: f64,
    /// Right endpoint of the interval.
    pub x: f64,
    /// First step count, inclusive.
    pub from: usize,
    /// Last step count, inclusive.
    pub to: usize,
    /// Methods to include.
    pub methods: Selection,
}

/// Orchestrates one solver per scheme over a shared problem.
///
/// Requests validate their inputs first and return a mapping from series key
/// (scheme name, or `"exact"` for the analytical reference) to [`Series`].
/// Validation failures surface as [`Error`] values carrying the implicated
/// input fields; nothing panics on bad input.
///
/// The fan-out runs the schemes sequentially. The solvers are independent, so
/// a caller needing responsiveness could run them on separate instances, but
/// correctness never requires it.
pub struct Middleware<P> {
    problem: P,
    solvers: [FixedStep; 3],
    guard: IntervalGuard,
}

impl<P: ScalarOde> Middleware<P> {
    /// Create a middleware with the default interval guard.
    pub fn new(problem: P) -> Self {
        Self::with_guard(problem, IntervalGuard::default())
    }

    /// Create a middleware with a custom interval guard.
    pub fn with_guard(problem: P, guard: IntervalGuard) -> Self {
        Self {
            problem,
            solvers: [
                FixedStep::new(Scheme::Euler),
                FixedStep::new(Scheme::ImprovedEuler),
                FixedStep::new(Scheme::RungeKutta4),
            ],
            guard,
        }
    }

    /// The shared problem definition.
    pub fn problem(&self) -> &P {
        &self.problem
    }

    /// Compute the requested quantity for every selected scheme.
    ///
    /// In [`GraphKind::Trajectory`] mode the analytical reference series is
    /// always attached under the `"exact"` key, so the request is valid even
    /// with no method selected; LTE and GTE modes require at least one.
    ///
    /// # Errors
    /// Interval violations, [`Error::ZeroSteps`], [`Error::NoMethodSelected`],
    /// and any calibration failure from the solvers.
    pub fn plot_request(&mut self, request: &PlotRequest) -> Result<BTreeMap<String, Series>, Error> {
        self.guard.check(request.x0, request.x)?;
        if request.n == 0 {
            return Err(Error::ZeroSteps);
        }
        if request.kind != GraphKind::Trajectory && !request.methods.any() {
            return Err(Error::NoMethodSelected);
        }

        let mut series = BTreeMap::new();

        for scheme in request.methods.schemes() {
            let trajectory = self.solvers[scheme_index(scheme)].compute(
                &self.problem,
                request.x0,
                request.y0,
                request.x,
                request.n,
            )?;
            let column = match request.kind {
                GraphKind::Trajectory => &trajectory.y,
                GraphKind::Lte => &trajectory.lte,
                GraphKind::Gte => &trajectory.gte,
            };
            series.insert(
                scheme.name().to_string(),
                Series {
                    x: trajectory.x.clone(),
                    y: column.clone(),
                    label: scheme.label(),
                    color: scheme.color(),
                },
            );
        }

        if request.kind == GraphKind::Trajectory {
            let (x, y) = analytical_samples(
                &self.problem,
                request.x0,
                request.y0,
                request.x,
                SAMPLE_DENSITY,
            )?;
            series.insert(
                EXACT_KEY.to_string(),
                Series {
                    x,
                    y,
                    label: EXACT_LABEL,
                    color: EXACT_COLOR,
                },
            );
        }

        Ok(series)
    }

    /// Run a max-|GTE|-versus-n sweep for every selected scheme.
    ///
    /// # Errors
    /// Interval violations, [`Error::EmptySweepRange`] if `from >= to`,
    /// [`Error::NoMethodSelected`], and any error from the underlying sweeps.
    pub fn gte_sweep_request(
        &mut self,
        request: &SweepRequest,
    ) -> Result<BTreeMap<String, Series>, Error> {
        self.guard.check(request.x0, request.x)?;
        if request.from >= request.to {
            return Err(Error::EmptySweepRange);
        }
        if !request.methods.any() {
            return Err(Error::NoMethodSelected);
        }

        let mut series = BTreeMap::new();

        for scheme in request.methods.schemes() {
            let sweep = self.solvers[scheme_index(scheme)].gte_sweep(
                &self.problem,
                request.x0,
                request.y0,
                request.x,
                request.from,
                request.to,
            )?;
            series.insert(
                scheme.name().to_string(),
                Series {
                    x: sweep.ns.iter().map(|&n| n as f64).collect(),
                    y: sweep.max_gte,
                    label: scheme.label(),
                    color: scheme.color(),
                },
            );
        }

        Ok(series)
    }
}

fn scheme_index(scheme: Scheme) -> usize {
    match scheme {
        Scheme::Euler => 0,
        Scheme::ImprovedEuler => 1,
        Scheme::RungeKutta4 => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::ClosureOde;

    fn exponential() -> ClosureOde<impl Fn(f64, f64) -> f64, impl Fn(f64) -> f64> {
        ClosureOde::new(|_x, y| y, f64::exp)
    }

    fn plot_request(kind: GraphKind, methods: Selection) -> PlotRequest {
        PlotRequest {
            x0: 1.0,
            y0: 2.0,
            x: 2.0,
            n: 10,
            methods,
            kind,
        }
    }

    #[test]
    fn guard_rejects_in_documented_order() {
        let guard = IntervalGuard::default();
        assert_eq!(guard.check(2.0, 1.0).unwrap_err(), Error::ReversedInterval);
        assert_eq!(guard.check(1.0, 1.0).unwrap_err(), Error::ReversedInterval);
        // Both endpoints inside [-eps, eps].
        assert_eq!(
            guard.check(-5e-4, 5e-4).unwrap_err(),
            Error::ForbiddenInterval
        );
        assert_eq!(
            guard.check(1.0, 1.05).unwrap_err(),
            Error::DegenerateInterval
        );
        assert!(guard.check(1.0, 2.0).is_ok());
        // Entirely negative intervals clear the zero neighborhood too.
        assert!(guard.check(-2.0, -1.0).is_ok());
    }

    #[test]
    fn guard_forbidden_zone_is_configurable() {
        let guard = IntervalGuard::new(0.1).with_forbidden_zone(|x0, x| x0 <= 5.0 && x >= 5.0);
        assert_eq!(guard.check(4.0, 6.0).unwrap_err(), Error::ForbiddenInterval);
        assert!(guard.check(6.0, 8.0).is_ok());

        // Without a zone only ordering and span are enforced.
        let plain = IntervalGuard::new(0.1);
        assert!(plain.check(-5e-4, 5e-4).is_err()); // span, not zone
        assert!(plain.check(-1.0, 1.0).is_ok());
    }

    #[test]
    fn trajectory_request_attaches_the_exact_series() {
        let mut middleware = Middleware::new(exponential());
        let series = middleware
            .plot_request(&plot_request(GraphKind::Trajectory, Selection::ALL))
            .unwrap();

        let keys: Vec<&str> = series.keys().map(String::as_str).collect();
        assert_eq!(keys, ["euler", "exact", "improved-euler", "runge-kutta"]);

        let exact = &series["exact"];
        assert_eq!(exact.label, "Exact");
        assert_eq!(exact.color, "b");
        assert_eq!(exact.x.len(), 200); // floor((2 - 1) * 200)

        for scheme in Scheme::ALL {
            let s = &series[scheme.name()];
            assert_eq!(s.x.len(), 11);
            assert_eq!(s.y.len(), 11);
            assert_eq!(s.label, scheme.label());
            assert_eq!(s.color, scheme.color());
        }
    }

    #[test]
    fn trajectory_request_needs_no_method_selected() {
        let mut middleware = Middleware::new(exponential());
        let series = middleware
            .plot_request(&plot_request(GraphKind::Trajectory, Selection::default()))
            .unwrap();
        assert_eq!(series.len(), 1);
        assert!(series.contains_key("exact"));
    }

    #[test]
    fn error_requests_require_a_method() {
        let mut middleware = Middleware::new(exponential());
        for kind in [GraphKind::Lte, GraphKind::Gte] {
            let result = middleware.plot_request(&plot_request(kind, Selection::default()));
            assert_eq!(result.unwrap_err(), Error::NoMethodSelected);
        }
    }

    #[test]
    fn gte_request_extracts_the_gte_column() {
        let mut middleware = Middleware::new(exponential());
        let series = middleware
            .plot_request(&plot_request(GraphKind::Gte, Selection::only(Scheme::Euler)))
            .unwrap();
        assert_eq!(series.len(), 1);
        let euler = &series["euler"];
        assert_eq!(euler.y[0], 0.0); // GTE at the initial point
        assert!(euler.y.last().unwrap().abs() > 0.0);
    }

    #[test]
    fn zero_steps_is_rejected_before_fan_out() {
        let mut middleware = Middleware::new(exponential());
        let mut request = plot_request(GraphKind::Trajectory, Selection::ALL);
        request.n = 0;
        assert_eq!(
            middleware.plot_request(&request).unwrap_err(),
            Error::ZeroSteps
        );
    }

    #[test]
    fn sweep_request_packages_n_against_max_gte() {
        let mut middleware = Middleware::new(exponential());
        let series = middleware
            .gte_sweep_request(&SweepRequest {
                x0: 0.0,
                y0: 1.0,
                x: 1.0,
                from: 2,
                to: 6,
                methods: Selection::ALL,
            })
            .unwrap();

        assert_eq!(series.len(), 3);
        for scheme in Scheme::ALL {
            let s = &series[scheme.name()];
            assert_eq!(s.x, [2.0, 3.0, 4.0, 5.0, 6.0]);
            assert_eq!(s.y.len(), 5);
            assert!(s.y.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn sweep_request_rejects_an_empty_range() {
        let mut middleware = Middleware::new(exponential());
        let request = SweepRequest {
            x0: 0.0,
            y0: 1.0,
            x: 1.0,
            from: 6,
            to: 6,
            methods: Selection::ALL,
        };
        assert_eq!(
            middleware.gte_sweep_request(&request).unwrap_err(),
            Error::EmptySweepRange
        );
    }

    #[test]
    fn sweep_request_requires_a_method() {
        let mut middleware = Middleware::new(exponential());
        let request = SweepRequest {
            x0: 0.0,
            y0: 1.0,
            x: 1.0,
            from: 2,
            to: 6,
            methods: Selection::default(),
        };
        assert_eq!(
            middleware.gte_sweep_request(&request).unwrap_err(),
            Error::NoMethodSelected
        );
    }

    #[test]
    fn calibration_failure_propagates_with_fields() {
        // Family vanishing at x0 = 1 with a non-negligible y0.
        let problem = ClosureOde::new(|_x, y| y, |x| x - 1.0);
        let mut middleware = Middleware::new(problem);
        let error = middleware
            .plot_request(&plot_request(GraphKind::Trajectory, Selection::ALL))
            .unwrap_err();
        assert_eq!(error, Error::InvalidInitialCondition);
        assert_eq!(
            error.fields(),
            &[crate::error::Field::X0, crate::error::Field::Y0]
        );
    }

    #[test]
    fn selection_helpers() {
        assert!(!Selection::default().any());
        assert!(Selection::ALL.any());
        assert_eq!(Selection::ALL.schemes().count(), 3);

        let only_rk = Selection::only(Scheme::RungeKutta4);
        assert!(only_rk.contains(Scheme::RungeKutta4));
        assert!(!only_rk.contains(Scheme::Euler));
        assert_eq!(only_rk.schemes().collect::<Vec<_>>(), [Scheme::RungeKutta4]);
    }
}
