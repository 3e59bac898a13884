//! Error taxonomy for integration and request validation.
//!
//! Every failure here is a deterministic input-validation problem, not a
//! transient fault; retrying the same request never helps. Each variant
//! reports which input fields are implicated via [`Error::fields`] so a
//! presentation layer can highlight exactly those inputs.

use thiserror::Error;

/// Identifier of an input field implicated in a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Initial x value.
    X0,
    /// Initial y value.
    Y0,
    /// Right endpoint of the integration interval.
    X,
    /// Number of integration steps.
    N,
    /// Lower bound of a step-count sweep.
    From,
    /// Upper bound of a step-count sweep.
    To,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Field::X0 => "x0",
            Field::Y0 => "y0",
            Field::X => "x",
            Field::N => "n",
            Field::From => "from",
            Field::To => "to",
        };
        f.write_str(name)
    }
}

/// Errors produced by the solver and the request layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The solution family cannot be scaled through (x0, y0): the
    /// calibration denominator g(x0) is near zero while y0 is not.
    #[error("initial values cannot be calibrated against the solution family")]
    InvalidInitialCondition,

    /// The interval endpoints are reversed or coincide.
    #[error("x0 must be less than x")]
    ReversedInterval,

    /// Both interval endpoints fall inside a forbidden region, e.g. a
    /// neighborhood of a singularity of the right-hand side.
    #[error("interval lies too close to a forbidden region")]
    ForbiddenInterval,

    /// The interval is narrower than the minimum allowed span, which would
    /// produce degenerate step sizes.
    #[error("x0 and x are too close")]
    DegenerateInterval,

    /// A trajectory was requested with zero steps.
    #[error("n must be positive")]
    ZeroSteps,

    /// A sweep range with `from` past `to`.
    #[error("from must be less than to")]
    EmptySweepRange,

    /// An error-analysis request with no integration method selected.
    #[error("at least one method must be selected")]
    NoMethodSelected,

    /// `max_abs_gte` was queried before any successful `compute` call.
    /// This is a caller contract violation rather than a user-input problem.
    #[error("a trajectory must be computed first")]
    NothingComputed,
}

impl Error {
    /// Input fields implicated in this failure.
    ///
    /// Empty for failures that are not attributable to specific inputs
    /// ([`Error::NoMethodSelected`], [`Error::NothingComputed`]).
    pub fn fields(&self) -> &'static [Field] {
        match self {
            Error::InvalidInitialCondition => &[Field::X0, Field::Y0],
            Error::ReversedInterval | Error::ForbiddenInterval | Error::DegenerateInterval => {
                &[Field::X0, Field::X]
            }
            Error::ZeroSteps => &[Field::N],
            Error::EmptySweepRange => &[Field::From, Field::To],
            Error::NoMethodSelected | Error::NothingComputed => &[],
        }
    }
}
