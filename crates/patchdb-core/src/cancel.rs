use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

///
/// CancelToken
///
/// Cloneable cooperative cancellation flag shared between a caller and
/// one in-flight operation. The reconciler observes it before issuing
/// any write; a signal seen at or before persist aborts with zero
/// partial persistence, and classification gives cancellation priority
/// over concurrent storage failure signals.
///

#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cooperative cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_one_flag() {
        let token = CancelToken::new();
        let observer = token.clone();
        assert!(!observer.is_cancelled());

        token.cancel();
        assert!(observer.is_cancelled());
    }
}
