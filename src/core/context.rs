//! Per-firing execution context.

use tokio_util::sync::CancellationToken;

/// Immutable bundle threaded through every step of one firing.
///
/// The governed object travels next to the context rather than inside it,
/// so that entry and exit callbacks can borrow it mutably.
#[derive(Debug)]
pub struct ExecutionContext<'a, Tr, P> {
    trigger: Tr,
    request: Option<&'a P>,
    cancel: CancellationToken,
}

impl<'a, Tr, P> ExecutionContext<'a, Tr, P> {
    pub fn new(trigger: Tr, cancel: CancellationToken) -> Self {
        Self {
            trigger,
            request: None,
            cancel,
        }
    }

    /// Attach the request payload for this firing.
    pub fn with_request(mut self, request: &'a P) -> Self {
        self.request = Some(request);
        self
    }

    pub fn trigger(&self) -> &Tr {
        &self.trigger
    }

    pub fn request(&self) -> Option<&'a P> {
        self.request
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
