//! Locally persisted reservation drafts.

use serde::{Deserialize, Serialize};

use crate::models::{Space, Trip};
use crate::wizard::{ItemForm, ReservationForm};

pub const DRAFT_KEY_PREFIX: &str = "reservation_draft_";

pub fn draft_key(trip_id: &str) -> String {
    format!("{DRAFT_KEY_PREFIX}{trip_id}")
}

/// Stored draft. Carries its trip id so a value read under the wrong key is
/// never applied to another trip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReservationDraft {
    pub trip_id: String,
    pub form: ReservationForm,
}

impl ReservationDraft {
    pub fn new(trip_id: &str, form: &ReservationForm) -> Self {
        Self {
            trip_id: trip_id.to_string(),
            form: form.clone(),
        }
    }

    pub fn key(&self) -> String {
        draft_key(&self.trip_id)
    }
}

/// Build the wizard form for `trip` from the current selection, reusing a
/// saved draft where it matches.
///
/// Items follow the selected spaces: a saved item is reused when its space is
/// still selected and a blank one is created otherwise. `is_international`
/// always comes from the trip.
pub fn restore(draft: Option<ReservationDraft>, trip: &Trip, selected: &[Space]) -> ReservationForm {
    let Some(draft) = draft.filter(|d| d.trip_id == trip.id) else {
        return ReservationForm::new(trip, selected);
    };
    let mut form = draft.form;
    let mut saved = std::mem::take(&mut form.items);
    form.items = selected
        .iter()
        .map(|space| {
            saved
                .iter()
                .position(|item| item.space_id.as_deref() == Some(space.id.as_str()))
                .map(|pos| saved.swap_remove(pos))
                .unwrap_or_else(|| ItemForm::blank(&space.id))
        })
        .collect();
    form.is_international = trip.is_international;
    form
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentMethod;
    use crate::wizard::tests::{space, trip};

    fn saved_draft(trip_id: &str) -> ReservationDraft {
        let mut form = ReservationForm::new(&trip(false), &[space("s1", 1), space("s2", 2)]);
        form.items[0].product_name = "Tomate".into();
        form.items[1].product_name = "Chile".into();
        form.is_international = true;
        form.payment_method = PaymentMethod::Cash;
        let mut draft = ReservationDraft::new("ignored", &form);
        draft.trip_id = trip_id.to_string();
        draft
    }

    #[test]
    fn key_embeds_trip_id() {
        assert_eq!(draft_key("t9"), "reservation_draft_t9");
        assert_eq!(saved_draft("t9").key(), "reservation_draft_t9");
    }

    #[test]
    fn restore_follows_current_selection() {
        let selected = [space("s2", 2), space("s3", 3)];
        let form = restore(Some(saved_draft("t1")), &trip(false), &selected);

        assert_eq!(form.items.len(), 2);
        assert_eq!(form.items[0].product_name, "Chile");
        assert_eq!(form.items[1], ItemForm::blank("s3"));
        assert_eq!(form.payment_method, PaymentMethod::Cash);
        assert!(!form.is_international);
    }

    #[test]
    fn draft_for_another_trip_is_ignored() {
        let selected = [space("s1", 1)];
        let form = restore(Some(saved_draft("other")), &trip(false), &selected);
        assert_eq!(form, ReservationForm::new(&trip(false), &selected));
    }

    #[test]
    fn drafts_survive_a_json_round_trip_with_missing_fields() {
        let json = r#"{"trip_id":"t1","form":{"items":[{"space_id":"s1","product_name":"Mango"}]}}"#;
        let draft: ReservationDraft = serde_json::from_str(json).unwrap();
        let form = restore(Some(draft), &trip(true), &[space("s1", 1)]);
        assert_eq!(form.items[0].product_name, "Mango");
        assert_eq!(form.items[0].weight_unit, "kg");
        assert!(form.is_international);
        assert_eq!(form.payment_method, PaymentMethod::BankTransfer);
    }
}
