use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag.
///
/// Clones observe the same flag; cancel from any thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Rotation search stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    KabschSeed,
    CanonicalOrientations,
    GridSearch,
    Annealing,
    Refinement,
    Complete,
}

impl Stage {
    /// Share of the overall progress range covered by this stage
    fn span(self) -> (f64, f64) {
        match self {
            Stage::KabschSeed => (0.0, 0.02),
            Stage::CanonicalOrientations => (0.02, 0.05),
            Stage::GridSearch => (0.05, 0.25),
            Stage::Annealing => (0.25, 0.85),
            Stage::Refinement => (0.85, 1.0),
            Stage::Complete => (1.0, 1.0),
        }
    }
}

/// Progress snapshot passed to observers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub stage: Stage,
    /// Overall completion in [0, 1]
    pub fraction: f64,
    pub best_measure: f64,
}

/// Progress observer
pub type ProgressFn<'a> = dyn Fn(&Progress) + Sync + 'a;

/// Optional cancellation and progress hooks for a search
#[derive(Clone, Copy, Default)]
pub struct SearchControl<'a> {
    pub cancel: Option<&'a CancelToken>,
    pub progress: Option<&'a ProgressFn<'a>>,
}

impl<'a> SearchControl<'a> {
    /// No cancellation, no progress reporting
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_cancel(mut self, token: &'a CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn with_progress(mut self, observer: &'a ProgressFn<'a>) -> Self {
        self.progress = Some(observer);
        self
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.map_or(false, CancelToken::is_cancelled)
    }

    /// Report `local` completion (0..=1) within `stage`
    pub(crate) fn report(&self, stage: Stage, local: f64, best_measure: f64) {
        if let Some(observer) = self.progress {
            let (start, end) = stage.span();
            observer(&Progress {
                stage,
                fraction: start + (end - start) * local.clamp(0.0, 1.0),
                best_measure,
            });
        }
    }
}

impl fmt::Debug for SearchControl<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchControl")
            .field("cancel", &self.cancel)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_cancel_shared_between_clones() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!token.is_cancelled());
        other.cancel();
        assert!(token.is_cancelled());
        assert!(SearchControl::none().with_cancel(&token).is_cancelled());
        assert!(!SearchControl::none().is_cancelled());
    }

    #[test]
    fn test_report_maps_into_stage_span() {
        let seen = Mutex::new(Vec::new());
        let observer = |p: &Progress| seen.lock().unwrap().push(*p);
        let control = SearchControl::none().with_progress(&observer);
        control.report(Stage::GridSearch, 0.5, 3.0);
        control.report(Stage::Complete, 1.0, 0.5);
        let seen = seen.into_inner().unwrap();
        assert!((seen[0].fraction - 0.15).abs() < 1e-12);
        assert_eq!(seen[1].fraction, 1.0);
        assert_eq!(seen[1].best_measure, 0.5);
    }
}
