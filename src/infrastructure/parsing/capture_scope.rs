//! Depth-indexed stack of deferred rollback actions
//!
//! One frame is pushed for every opened element. An action registered on the
//! innermost frame is handed back exactly once, when that element closes.

/// Capture scopes for one parse call
#[derive(Debug)]
pub struct CaptureScopes<A> {
    frames: Vec<Option<A>>,
}

impl<A> Default for CaptureScopes<A> {
    fn default() -> Self {
        Self { frames: Vec::new() }
    }
}

impl<A> CaptureScopes<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently open frames
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Push a frame for a newly opened element
    pub fn enter(&mut self) {
        self.frames.push(None);
    }

    /// Attach `action` to the innermost open frame.
    ///
    /// Returns the action back if there is no open frame or the frame
    /// already carries one; a frame holds at most one action.
    pub fn register(&mut self, action: A) -> Result<(), A> {
        match self.frames.last_mut() {
            Some(slot) if slot.is_none() => {
                *slot = Some(action);
                Ok(())
            }
            _ => Err(action),
        }
    }

    /// Pop the innermost frame, yielding its action if it had one.
    ///
    /// A close without a matching open leaves the stack untouched.
    pub fn leave(&mut self) -> Option<A> {
        self.frames.pop().flatten()
    }

    /// Drop all frames without running their actions
    pub fn abandon(&mut self) -> usize {
        let pending = self.frames.iter().filter(|f| f.is_some()).count();
        self.frames.clear();
        pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actions_fire_in_lifo_order() {
        let mut scopes = CaptureScopes::new();
        scopes.enter();
        scopes.register("outer").unwrap();
        scopes.enter();
        scopes.enter();
        scopes.register("inner").unwrap();

        assert_eq!(scopes.leave(), Some("inner"));
        assert_eq!(scopes.leave(), None);
        assert_eq!(scopes.leave(), Some("outer"));
        assert_eq!(scopes.depth(), 0);
    }

    #[test]
    fn test_action_never_fires_on_sibling() {
        let mut scopes = CaptureScopes::new();
        scopes.enter();
        scopes.enter();
        scopes.register(1).unwrap();
        assert_eq!(scopes.leave(), Some(1));
        scopes.enter();
        assert_eq!(scopes.leave(), None);
        assert_eq!(scopes.leave(), None);
    }

    #[test]
    fn test_one_action_per_frame() {
        let mut scopes = CaptureScopes::new();
        assert_eq!(scopes.register(1), Err(1));
        scopes.enter();
        assert_eq!(scopes.register(1), Ok(()));
        assert_eq!(scopes.register(2), Err(2));
        assert_eq!(scopes.leave(), Some(1));
    }

    #[test]
    fn test_unmatched_leave_is_noop() {
        let mut scopes: CaptureScopes<u8> = CaptureScopes::new();
        assert_eq!(scopes.leave(), None);
        assert_eq!(scopes.leave(), None);
        assert_eq!(scopes.depth(), 0);
        scopes.enter();
        assert_eq!(scopes.depth(), 1);
    }

    #[test]
    fn test_abandon_counts_pending_actions() {
        let mut scopes = CaptureScopes::new();
        scopes.enter();
        scopes.register('p').unwrap();
        scopes.enter();
        assert_eq!(scopes.abandon(), 1);
        assert_eq!(scopes.depth(), 0);
    }
}
