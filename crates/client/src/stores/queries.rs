//! Query store: an invalidation stamp per query scope.
//!
//! Resources read the generation of the scope they fetch under; invalidating
//! a scope stamps it with a fresh epoch and every resource reading it
//! re-fetches. A scope's generation is the newest stamp among the scopes
//! covering it, so detail entries older than a covering list stamp carry no
//! information and are dropped when the list is invalidated.

use std::collections::BTreeMap;

use dioxus::prelude::*;
use keikichi_shared::QueryScope;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryGenerations {
    epoch: u64,
    stamps: BTreeMap<QueryScope, u64>,
}

impl QueryGenerations {
    /// Generation seen by `scope`, including invalidations of broader scopes
    /// that cover it. Zero until something covering it is invalidated.
    pub fn generation(&self, scope: &QueryScope) -> u64 {
        self.stamps
            .iter()
            .filter(|(key, _)| key.covers(scope))
            .map(|(_, stamp)| *stamp)
            .max()
            .unwrap_or(0)
    }

    pub fn invalidate(&mut self, scope: &QueryScope) {
        self.epoch += 1;
        self.stamps
            .retain(|key, _| key == scope || !scope.covers(key));
        self.stamps.insert(scope.clone(), self.epoch);
    }

    /// Number of stamped scopes.
    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }
}

pub static QUERIES: GlobalSignal<QueryGenerations> = Signal::global(QueryGenerations::default);

pub fn invalidate(scope: QueryScope) {
    crate::log_debug!("Invalidating {:?}", scope);
    QUERIES.write().invalidate(&scope);
}

pub fn invalidate_all(scopes: impl IntoIterator<Item = QueryScope>) {
    let mut queries = QUERIES.write();
    for scope in scopes {
        crate::log_debug!("Invalidating {:?}", scope);
        queries.invalidate(&scope);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalidating_one_scope_leaves_others() {
        let mut q = QueryGenerations::default();
        q.invalidate(&QueryScope::Trips);
        assert_ne!(q.generation(&QueryScope::Trips), 0);
        assert_eq!(q.generation(&QueryScope::Reservations), 0);
    }

    #[test]
    fn generation_changes_on_every_invalidation() {
        let mut q = QueryGenerations::default();
        let mut seen = vec![q.generation(&QueryScope::Notifications)];
        for _ in 0..3 {
            q.invalidate(&QueryScope::Notifications);
            let next = q.generation(&QueryScope::Notifications);
            assert!(!seen.contains(&next));
            seen.push(next);
        }
    }

    #[test]
    fn all_trip_spaces_covers_each_trip() {
        let mut q = QueryGenerations::default();
        q.invalidate(&QueryScope::trip_spaces("t1"));
        let t1 = q.generation(&QueryScope::trip_spaces("t1"));
        assert_ne!(t1, 0);
        assert_eq!(q.generation(&QueryScope::trip_spaces("t2")), 0);

        q.invalidate(&QueryScope::TripSpaces(None));
        assert!(q.generation(&QueryScope::trip_spaces("t1")) > t1);
        assert_ne!(q.generation(&QueryScope::trip_spaces("t2")), 0);
    }

    #[test]
    fn list_invalidation_prunes_covered_detail_stamps() {
        let mut q = QueryGenerations::default();
        for id in ["r1", "r2", "r3"] {
            q.invalidate(&QueryScope::Reservation(id.to_string()));
        }
        q.invalidate(&QueryScope::trip_spaces("t1"));
        assert_eq!(q.len(), 4);
        let before = q.generation(&QueryScope::Reservation("r2".into()));

        q.invalidate(&QueryScope::Reservations);

        assert_eq!(q.len(), 2);
        assert!(q.generation(&QueryScope::Reservation("r2".into())) > before);
        assert_eq!(
            q.generation(&QueryScope::Reservation("r9".into())),
            q.generation(&QueryScope::Reservations)
        );
        assert_ne!(q.generation(&QueryScope::trip_spaces("t1")), 0);
    }
}
