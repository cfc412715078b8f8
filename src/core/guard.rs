//! Guard predicates and destination selectors.
//!
//! Both are asynchronous queries over the governed object. A query is
//! declared either without a request payload or with one; the engine
//! dispatches on the variant instead of inspecting payload types at runtime.

use super::{BoxError, BoxFuture};
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

type PlainQueryFn<T, O> = Arc<
    dyn for<'a> Fn(&'a T, &'a CancellationToken) -> BoxFuture<'a, Result<O, BoxError>>
        + Send
        + Sync,
>;

type RequestQueryFn<T, P, O> = Arc<
    dyn for<'a> Fn(&'a T, &'a P, &'a CancellationToken) -> BoxFuture<'a, Result<O, BoxError>>
        + Send
        + Sync,
>;

/// Asynchronous read-only question asked of the governed object.
pub enum Query<T, P, O> {
    /// Ignores any request payload.
    Plain(PlainQueryFn<T, O>),
    /// Needs a request payload; skipped when a firing supplies none.
    WithRequest(RequestQueryFn<T, P, O>),
}

/// Condition that must hold for a transition to apply.
///
/// # Example
///
/// ```rust
/// use stateline::core::Guard;
///
/// struct Account {
///     balance: i64,
/// }
///
/// let solvent: Guard<Account> =
///     Guard::new(|account: &Account, _| Box::pin(async move { Ok(account.balance >= 0) }));
/// assert!(!solvent.requires_request());
/// ```
pub type Guard<T, P = ()> = Query<T, P, bool>;

/// Computes the destination of a dynamic transition; `None` declines.
pub type Selector<T, S, P = ()> = Query<T, P, Option<S>>;

impl<T, P, O> Query<T, P, O> {
    /// Create a query that ignores the request payload.
    pub fn new<F>(query: F) -> Self
    where
        F: for<'a> Fn(&'a T, &'a CancellationToken) -> BoxFuture<'a, Result<O, BoxError>>
            + Send
            + Sync
            + 'static,
    {
        Self::Plain(Arc::new(query))
    }

    /// Create a query that reads the request payload.
    pub fn with_request<F>(query: F) -> Self
    where
        F: for<'a> Fn(&'a T, &'a P, &'a CancellationToken) -> BoxFuture<'a, Result<O, BoxError>>
            + Send
            + Sync
            + 'static,
    {
        Self::WithRequest(Arc::new(query))
    }

    pub fn requires_request(&self) -> bool {
        matches!(self, Self::WithRequest(_))
    }

    /// Run the query.
    ///
    /// Returns `Ok(None)` when the query needs a request and none was
    /// supplied.
    pub async fn evaluate(
        &self,
        object: &T,
        request: Option<&P>,
        cancel: &CancellationToken,
    ) -> Result<Option<O>, BoxError> {
        match (self, request) {
            (Self::Plain(query), _) => query(object, cancel).await.map(Some),
            (Self::WithRequest(query), Some(request)) => {
                query(object, request, cancel).await.map(Some)
            }
            (Self::WithRequest(_), None) => Ok(None),
        }
    }
}

impl<T, P> Query<T, P, bool> {
    /// Check the guard; a request-only guard without a request is not met.
    pub async fn check(
        &self,
        object: &T,
        request: Option<&P>,
        cancel: &CancellationToken,
    ) -> Result<bool, BoxError> {
        Ok(self
            .evaluate(object, request, cancel)
            .await?
            .unwrap_or(false))
    }
}

impl<T, P, O> Clone for Query<T, P, O> {
    fn clone(&self) -> Self {
        match self {
            Self::Plain(query) => Self::Plain(Arc::clone(query)),
            Self::WithRequest(query) => Self::WithRequest(Arc::clone(query)),
        }
    }
}

impl<T, P, O> fmt::Debug for Query<T, P, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(_) => f.write_str("Query::Plain"),
            Self::WithRequest(_) => f.write_str("Query::WithRequest"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sale {
        balance: i64,
    }

    fn paid_in_full() -> Guard<Sale, i64> {
        Guard::new(|sale: &Sale, _| Box::pin(async move { Ok(sale.balance <= 0) }))
    }

    fn covers_balance() -> Guard<Sale, i64> {
        Guard::with_request(|sale: &Sale, payment: &i64, _| {
            let covered = *payment >= sale.balance;
            Box::pin(async move { Ok(covered) })
        })
    }

    #[tokio::test]
    async fn plain_guard_ignores_request() {
        let cancel = CancellationToken::new();
        let sale = Sale { balance: 0 };

        assert!(paid_in_full().check(&sale, None, &cancel).await.unwrap());
        assert!(paid_in_full().check(&sale, Some(&5), &cancel).await.unwrap());
    }

    #[tokio::test]
    async fn request_guard_reads_payload() {
        let cancel = CancellationToken::new();
        let sale = Sale { balance: 10 };

        assert!(covers_balance().check(&sale, Some(&10), &cancel).await.unwrap());
        assert!(!covers_balance().check(&sale, Some(&3), &cancel).await.unwrap());
    }

    #[tokio::test]
    async fn request_guard_without_request_is_not_met() {
        let cancel = CancellationToken::new();
        let sale = Sale { balance: 0 };
        let guard = covers_balance();

        assert!(guard.requires_request());
        assert_eq!(guard.evaluate(&sale, None, &cancel).await.unwrap(), None);
        assert!(!guard.check(&sale, None, &cancel).await.unwrap());
    }

    #[tokio::test]
    async fn guard_errors_propagate() {
        let cancel = CancellationToken::new();
        let sale = Sale { balance: 0 };
        let guard: Guard<Sale> =
            Guard::new(|_: &Sale, _| Box::pin(async { Err("ledger offline".into()) }));

        let err = guard.check(&sale, None, &cancel).await.unwrap_err();
        assert_eq!(err.to_string(), "ledger offline");
    }

    #[tokio::test]
    async fn selector_returns_destination() {
        let cancel = CancellationToken::new();
        let sale = Sale { balance: 4 };
        let selector: Selector<Sale, &'static str> = Selector::new(|sale: &Sale, _| {
            let next = if sale.balance > 0 { Some("owing") } else { None };
            Box::pin(async move { Ok(next) })
        });

        assert_eq!(
            selector.evaluate(&sale, None, &cancel).await.unwrap(),
            Some(Some("owing"))
        );
    }
}
