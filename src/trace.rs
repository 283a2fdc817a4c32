//! Tracing hooks that vanish when the `tracing` feature is off.
//!
//! `trace_span!` wraps a pipeline stage (gallery build, descriptor
//! extraction, query matching); `trace_event!` records a measurement inside
//! the current stage. Without the feature both expand to no-ops and call
//! sites stay free of `cfg` attributes.

/// Opens an info-level span around a pipeline stage.
///
/// With the `tracing` feature this is `tracing::info_span!`. Without it the
/// macro yields a [`NoopSpan`] and the field expressions are never evaluated.
#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        tracing::info_span!($name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        $crate::trace::NoopSpan
    };
}

/// Emits an info-level event carrying key measurements.
///
/// Info level keeps these visible under an `edgematch=info` filter. Without
/// the `tracing` feature the values are borrowed and discarded so call sites
/// do not trigger unused warnings.
#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::info!(name: $name, $($key = $value),+)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($(&$value,)+);
    };
}

pub(crate) use trace_event;
pub(crate) use trace_span;

/// Stand-in for `tracing::Span` so `trace_span!(..).entered()` compiles
/// without the feature.
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Returns self, mirroring `Span::entered()`; dropping it does nothing.
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}
