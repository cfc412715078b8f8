//! Side-effecting callbacks: entry, exit, re-entry and trigger actions.

use super::{BoxError, BoxFuture};
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

type PlainActionFn<T> = Arc<
    dyn for<'a> Fn(&'a mut T, &'a CancellationToken) -> BoxFuture<'a, Result<(), BoxError>>
        + Send
        + Sync,
>;

type RequestActionFn<T, P> = Arc<
    dyn for<'a> Fn(&'a mut T, &'a P, &'a CancellationToken) -> BoxFuture<'a, Result<(), BoxError>>
        + Send
        + Sync,
>;

/// Callback run against the governed object.
///
/// An action declared without a payload always runs; one declared with a
/// payload runs only when the firing supplies a request.
///
/// # Example
///
/// ```rust
/// use stateline::core::Action;
///
/// struct Sale {
///     receipts: u32,
/// }
///
/// let print_receipt: Action<Sale> = Action::new(|sale: &mut Sale, _| {
///     sale.receipts += 1;
///     Box::pin(async { Ok(()) })
/// });
/// assert!(!print_receipt.requires_request());
/// ```
pub enum Action<T, P = ()> {
    Plain(PlainActionFn<T>),
    WithRequest(RequestActionFn<T, P>),
}

impl<T, P> Action<T, P> {
    pub fn new<F>(action: F) -> Self
    where
        F: for<'a> Fn(&'a mut T, &'a CancellationToken) -> BoxFuture<'a, Result<(), BoxError>>
            + Send
            + Sync
            + 'static,
    {
        Self::Plain(Arc::new(action))
    }

    pub fn with_request<F>(action: F) -> Self
    where
        F: for<'a> Fn(&'a mut T, &'a P, &'a CancellationToken) -> BoxFuture<'a, Result<(), BoxError>>
            + Send
            + Sync
            + 'static,
    {
        Self::WithRequest(Arc::new(action))
    }

    pub fn requires_request(&self) -> bool {
        matches!(self, Self::WithRequest(_))
    }

    /// Run the action. Returns `Ok(false)` when it was skipped for lack of a
    /// request.
    pub async fn execute(
        &self,
        object: &mut T,
        request: Option<&P>,
        cancel: &CancellationToken,
    ) -> Result<bool, BoxError> {
        match (self, request) {
            (Self::Plain(action), _) => action(object, cancel).await.map(|()| true),
            (Self::WithRequest(action), Some(request)) => {
                action(object, request, cancel).await.map(|()| true)
            }
            (Self::WithRequest(_), None) => Ok(false),
        }
    }
}

impl<T, P> Clone for Action<T, P> {
    fn clone(&self) -> Self {
        match self {
            Self::Plain(action) => Self::Plain(Arc::clone(action)),
            Self::WithRequest(action) => Self::WithRequest(Arc::clone(action)),
        }
    }
}

impl<T, P> fmt::Debug for Action<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(_) => f.write_str("Action::Plain"),
            Self::WithRequest(_) => f.write_str("Action::WithRequest"),
        }
    }
}
