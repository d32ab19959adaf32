use std::io::IsTerminal;

/// The terminal state switch behind the guard, swappable in tests
pub(crate) trait RawTerm: Send {
    fn enable(&mut self);
    fn disable(&mut self);
}

struct CrosstermTerm;

impl RawTerm for CrosstermTerm {
    fn enable(&mut self) {
        if let Err(e) = crossterm::terminal::enable_raw_mode() {
            tracing::warn!("Failed to enable raw terminal mode: {}", e);
        }
    }

    fn disable(&mut self) {
        if let Err(e) = crossterm::terminal::disable_raw_mode() {
            tracing::warn!("Failed to restore terminal mode: {}", e);
        }
    }
}

/// Nothing to switch when stdin is a pipe or a file
struct InertTerm;

impl RawTerm for InertTerm {
    fn enable(&mut self) {}
    fn disable(&mut self) {}
}

/// Puts the terminal into raw mode for the session and guarantees it is
/// restored exactly once, on every exit path. Dropping an engaged guard
/// restores as a backstop.
pub struct RawModeGuard {
    term: Box<dyn RawTerm>,
    engaged: bool,
}

impl RawModeGuard {
    /// Guard for the process's stdin; inert when stdin is not a terminal
    pub fn for_stdin() -> Self {
        if std::io::stdin().is_terminal() {
            Self::with_term(Box::new(CrosstermTerm))
        } else {
            Self::with_term(Box::new(InertTerm))
        }
    }

    pub(crate) fn with_term(term: Box<dyn RawTerm>) -> Self {
        Self {
            term,
            engaged: false,
        }
    }

    pub fn engage(&mut self) {
        if !self.engaged {
            self.term.enable();
            self.engaged = true;
        }
    }

    /// Idempotent: only the first call after engage touches the terminal
    pub fn restore(&mut self) {
        if self.engaged {
            self.term.disable();
            self.engaged = false;
        }
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        self.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    struct CountingTerm {
        enables: Arc<AtomicU32>,
        disables: Arc<AtomicU32>,
    }

    impl RawTerm for CountingTerm {
        fn enable(&mut self) {
            self.enables.fetch_add(1, Ordering::SeqCst);
        }
        fn disable(&mut self) {
            self.disables.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn counting_guard() -> (RawModeGuard, Arc<AtomicU32>, Arc<AtomicU32>) {
        let enables = Arc::new(AtomicU32::new(0));
        let disables = Arc::new(AtomicU32::new(0));
        let guard = RawModeGuard::with_term(Box::new(CountingTerm {
            enables: enables.clone(),
            disables: disables.clone(),
        }));
        (guard, enables, disables)
    }

    #[test]
    fn test_restore_is_idempotent() {
        let (mut guard, enables, disables) = counting_guard();
        guard.engage();
        guard.restore();
        guard.restore();
        guard.restore();
        assert_eq!(enables.load(Ordering::SeqCst), 1);
        assert_eq!(disables.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_restore_without_engage_is_a_noop() {
        let (mut guard, _, disables) = counting_guard();
        guard.restore();
        drop(guard);
        assert_eq!(disables.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_drop_restores_engaged_guard() {
        let (mut guard, _, disables) = counting_guard();
        guard.engage();
        drop(guard);
        assert_eq!(disables.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_after_restore_does_not_double_restore() {
        let (mut guard, _, disables) = counting_guard();
        guard.engage();
        guard.restore();
        drop(guard);
        assert_eq!(disables.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_panic_while_engaged_restores_during_unwind() {
        let (guard, enables, disables) = counting_guard();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let mut guard = guard;
            guard.engage();
            panic!("session blew up");
        }));
        assert!(result.is_err());
        assert_eq!(enables.load(Ordering::SeqCst), 1);
        assert_eq!(disables.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_engage_twice_enables_once() {
        let (mut guard, enables, _) = counting_guard();
        guard.engage();
        guard.engage();
        assert_eq!(enables.load(Ordering::SeqCst), 1);
    }
}
