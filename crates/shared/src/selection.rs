//! Ephemeral space selection on the trip page.

use std::collections::BTreeSet;

use crate::models::{Space, SpaceStatus};

/// Whether the current user may pick this space: free spaces, or spaces the
/// user already holds or reserved.
pub fn is_clickable(space: &Space) -> bool {
    match space.status {
        SpaceStatus::Available => true,
        SpaceStatus::OnHold | SpaceStatus::Reserved => space.is_mine(),
        SpaceStatus::Blocked | SpaceStatus::Internal => false,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpaceSelection {
    ids: BTreeSet<String>,
}

impl SpaceSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn contains(&self, space_id: &str) -> bool {
        self.ids.contains(space_id)
    }

    /// Flip membership of `space`. Returns whether the selection changed.
    /// Selected spaces can always be dropped; only clickable ones can be added.
    pub fn toggle(&mut self, space: &Space) -> bool {
        if self.ids.remove(&space.id) {
            return true;
        }
        if !is_clickable(space) {
            return false;
        }
        self.ids.insert(space.id.clone())
    }

    /// Drop ids whose space is gone or no longer clickable. Returns the
    /// number of ids removed.
    pub fn reconcile(&mut self, spaces: &[Space]) -> usize {
        let before = self.ids.len();
        self.ids.retain(|id| spaces.iter().any(|s| &s.id == id && is_clickable(s)));
        before - self.ids.len()
    }

    /// Selected spaces ordered by space number.
    pub fn selected_spaces(&self, spaces: &[Space]) -> Vec<Space> {
        let mut selected: Vec<Space> = spaces
            .iter()
            .filter(|s| self.ids.contains(&s.id))
            .cloned()
            .collect();
        selected.sort_by_key(|s| s.space_number);
        selected
    }

    pub fn ids(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

/// A selected space of mine that already belongs to a pending reservation.
/// Holding again would fail server-side; the user should finish that one.
pub fn has_existing_reservation(selected: &[Space]) -> bool {
    selected
        .iter()
        .any(|s| s.is_mine() && s.has_pending_reservation())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn space(id: &str, number: u32, status: SpaceStatus, mine: bool) -> Space {
        Space {
            id: id.into(),
            space_number: number,
            status,
            price: None,
            hold_expires_at: None,
            held_by: None,
            is_mine: Some(mine),
            has_pending_reservation: None,
        }
    }

    #[rstest]
    #[case(SpaceStatus::Available, false, true)]
    #[case(SpaceStatus::OnHold, true, true)]
    #[case(SpaceStatus::OnHold, false, false)]
    #[case(SpaceStatus::Reserved, true, true)]
    #[case(SpaceStatus::Reserved, false, false)]
    #[case(SpaceStatus::Blocked, true, false)]
    #[case(SpaceStatus::Internal, false, false)]
    fn clickability(#[case] status: SpaceStatus, #[case] mine: bool, #[case] expected: bool) {
        assert_eq!(is_clickable(&space("s", 1, status, mine)), expected);
    }

    #[test]
    fn toggle_twice_restores_selection() {
        let s1 = space("s1", 1, SpaceStatus::Available, false);
        let mut selection = SpaceSelection::new();
        assert!(selection.toggle(&s1));
        assert!(selection.contains("s1"));
        assert!(selection.toggle(&s1));
        assert_eq!(selection, SpaceSelection::new());
    }

    #[test]
    fn non_clickable_space_is_not_added() {
        let blocked = space("s2", 2, SpaceStatus::Blocked, false);
        let mut selection = SpaceSelection::new();
        assert!(!selection.toggle(&blocked));
        assert!(selection.is_empty());
    }

    #[test]
    fn reconcile_drops_spaces_that_left_a_clickable_state() {
        let mut spaces = vec![
            space("s1", 1, SpaceStatus::Available, false),
            space("s2", 2, SpaceStatus::Available, false),
            space("s3", 3, SpaceStatus::Available, false),
        ];
        let mut selection = SpaceSelection::new();
        for s in &spaces {
            selection.toggle(s);
        }

        spaces[1].status = SpaceStatus::OnHold;
        spaces.remove(2);
        assert_eq!(selection.reconcile(&spaces), 2);
        assert_eq!(selection.ids(), vec!["s1".to_string()]);
    }

    #[test]
    fn selected_spaces_are_ordered_by_number() {
        let spaces = vec![
            space("b", 7, SpaceStatus::Available, false),
            space("a", 2, SpaceStatus::Available, false),
            space("c", 4, SpaceStatus::Available, false),
        ];
        let mut selection = SpaceSelection::new();
        selection.toggle(&spaces[0]);
        selection.toggle(&spaces[1]);
        let numbers: Vec<u32> = selection
            .selected_spaces(&spaces)
            .iter()
            .map(|s| s.space_number)
            .collect();
        assert_eq!(numbers, vec![2, 7]);
    }

    #[test]
    fn pending_reservation_detection_needs_ownership() {
        let mut mine = space("s1", 1, SpaceStatus::Reserved, true);
        mine.has_pending_reservation = Some(true);
        assert!(has_existing_reservation(&[mine.clone()]));

        mine.is_mine = Some(false);
        assert!(!has_existing_reservation(&[mine]));
    }
}
