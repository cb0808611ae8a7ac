mod query;

pub use query::{use_query, use_reconcile_interval};
