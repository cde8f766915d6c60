//! One-at-a-time discipline for latent operations.
//!
//! A component keeps its state in a `watch` channel with a `busy` flag.
//! [`claim`] checks and sets the flag in one atomic step and hands back a
//! [`BusyGuard`]; the guard applies the final transition together with
//! clearing the flag, or clears the flag alone if the operation's future is
//! dropped before it finishes.

use tokio::sync::watch;
use tracing::warn;

use crate::error::{HubError, HubResult, Operation};

pub(crate) trait BusyState {
    fn is_busy(&self) -> bool;
    fn set_busy(&mut self, busy: bool);
    fn set_error(&mut self, error: Option<String>);
}

/// Mark `state` busy for `op`, unless it already is or `precondition` fails.
///
/// Claiming also clears any previous error.
pub(crate) fn claim<T: BusyState>(
    state: &watch::Sender<T>,
    op: Operation,
    precondition: impl FnOnce(&T) -> HubResult<()>,
) -> HubResult<BusyGuard<'_, T>> {
    let mut outcome = Ok(());
    state.send_if_modified(|s| {
        outcome = if s.is_busy() {
            Err(HubError::Busy(op))
        } else {
            precondition(s)
        };
        if outcome.is_err() {
            return false;
        }
        s.set_busy(true);
        s.set_error(None);
        true
    });

    if let Err(e) = &outcome {
        warn!(%op, error = %e, "operation rejected");
    }
    outcome.map(|()| BusyGuard { state, armed: true })
}

pub(crate) struct BusyGuard<'a, T: BusyState> {
    state: &'a watch::Sender<T>,
    armed: bool,
}

impl<T: BusyState> BusyGuard<'_, T> {
    /// Apply the final transition and release the flag in one step.
    pub(crate) fn finish(mut self, apply: impl FnOnce(&mut T)) {
        self.armed = false;
        self.state.send_modify(|s| {
            apply(s);
            s.set_busy(false);
        });
    }

    /// Record a failure and release the flag in one step.
    pub(crate) fn fail(self, error: &HubError) {
        let message = error.to_string();
        self.finish(move |s| s.set_error(Some(message)));
    }
}

impl<T: BusyState> Drop for BusyGuard<'_, T> {
    fn drop(&mut self) {
        if self.armed {
            self.state.send_modify(|s| s.set_busy(false));
        }
    }
}
