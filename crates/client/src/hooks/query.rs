use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use dioxus::prelude::*;
use keikichi_shared::QueryScope;

use crate::stores::queries::{self, QUERIES};

/// A `use_resource` that re-runs whenever its query scope is invalidated.
///
/// `scope` may read signals (a route parameter, say); the query follows them.
///
/// ### Example
///
/// ```rust,ignore
/// let trips = use_query(|| QueryScope::Trips, move || async move {
///     auth.client().trips().await
/// });
///
/// // Anywhere else, after a mutation:
/// queries::invalidate(QueryScope::Trips);
/// ```
pub fn use_query<T, F>(
    scope: impl Fn() -> QueryScope + 'static,
    mut future: impl FnMut() -> F + 'static,
) -> Resource<T>
where
    T: 'static,
    F: Future<Output = T> + 'static,
{
    let generation = use_memo(move || QUERIES.read().generation(&scope()));
    use_resource(move || {
        generation.read();
        future()
    })
}

/// Invalidate a scope every `period` while the calling component is mounted.
/// Used where pushes are best effort and the list has to be reconciled.
pub fn use_reconcile_interval(scope: impl Fn() -> QueryScope + 'static, period: Duration) {
    let scope = Rc::new(scope);
    use_future(move || {
        let scope = scope.clone();
        async move {
            loop {
                crate::timer::sleep(period).await;
                queries::invalidate(scope());
            }
        }
    });
}
