//! Progress reporting and cooperative cancellation.
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub const STAGE_PREPARING: &str = "optimizer.stage.preparing";
pub const STAGE_EVALUATING: &str = "optimizer.stage.evaluating";
pub const STAGE_COMPLETE: &str = "optimizer.stage.complete";
pub const STAGE_CANCELLED: &str = "optimizer.stage.cancelled";

/// Receives `(percent, stage_key)` after each chunk.
pub trait ProgressSink {
    fn report(&mut self, percent: u8, stage: &str);
}

impl<F> ProgressSink for F
where
    F: FnMut(u8, &str),
{
    fn report(&mut self, percent: u8, stage: &str) {
        self(percent, stage);
    }
}

/// Discards progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _percent: u8, _stage: &str) {}
}

/// Shared flag checked at every chunk boundary.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_act_as_sinks() {
        let mut seen = Vec::new();
        {
            let mut sink = |percent: u8, stage: &str| seen.push((percent, stage.to_string()));
            sink.report(40, STAGE_EVALUATING);
            sink.report(100, STAGE_COMPLETE);
        }
        assert_eq!(
            seen,
            vec![
                (40, STAGE_EVALUATING.to_string()),
                (100, STAGE_COMPLETE.to_string())
            ]
        );
    }

    #[test]
    fn clones_share_cancellation() {
        let token = CancellationToken::new();
        let handle = token.clone();
        assert!(!token.is_cancelled());
        handle.cancel();
        assert!(token.is_cancelled());
    }
}
