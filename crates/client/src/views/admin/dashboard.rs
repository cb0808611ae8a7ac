use dioxus::prelude::*;
use keikichi_shared::QueryScope;
use serde_json::Value;

use crate::auth_session::AuthContext;
use crate::components::ui::{Card, ErrorBox, Loading};
use crate::hooks::use_query;

/// `total_reservations` -> `Total reservations`
fn stat_label(key: &str) -> String {
    let text = key.replace('_', " ");
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn stat_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => if *b { "Yes" } else { "No" }.to_string(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

#[component]
pub fn AdminDashboard() -> Element {
    let auth = use_context::<AuthContext>();
    let stats = use_query(
        || QueryScope::DashboardStats,
        move || async move { auth.client().dashboard_stats().await },
    );

    rsx! {
        h1 { class: "text-2xl font-bold", "Dashboard" }
        match stats.read().as_ref() {
            Some(Ok(map)) => rsx! {
                div { class: "grid gap-4 sm:grid-cols-2 lg:grid-cols-4",
                    for (key, value) in map.iter() {
                        Card { key: "{key}",
                            p { class: "text-sm text-slate-500", {stat_label(key)} }
                            p { class: "mt-1 text-2xl font-bold", {stat_value(value)} }
                        }
                    }
                }
            },
            Some(Err(e)) => rsx! {
                ErrorBox { message: e.user_message() }
            },
            None => rsx! {
                Loading {}
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_read_like_sentences() {
        assert_eq!(stat_label("pending_payments"), "Pending payments");
        assert_eq!(stat_label(""), "");
    }

    #[test]
    fn values_render_plainly() {
        assert_eq!(stat_value(&serde_json::json!(12)), "12");
        assert_eq!(stat_value(&serde_json::json!("1,200 USD")), "1,200 USD");
        assert_eq!(stat_value(&Value::Null), "-");
    }
}
