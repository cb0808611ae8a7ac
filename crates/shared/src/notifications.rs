//! Notification bell state.

use crate::models::Notification;

pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.is_read).count()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotificationBell {
    open: bool,
}

impl NotificationBell {
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Flip the dropdown. Returns `true` when it just opened with unread
    /// notifications, i.e. when everything should be marked read.
    pub fn toggle(&mut self, unread: usize) -> bool {
        self.open = !self.open;
        self.open && unread > 0
    }

    pub fn close(&mut self) {
        self.open = false;
    }
}

/// Follow-up of clicking a notification in the dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationClick {
    pub mark_read: Option<String>,
    pub navigate_to: Option<String>,
}

impl NotificationBell {
    /// Clicking closes the dropdown, marks an unread item and follows its link.
    pub fn click(&mut self, notification: &Notification) -> NotificationClick {
        self.close();
        NotificationClick {
            mark_read: (!notification.is_read).then(|| notification.id.clone()),
            navigate_to: notification.link.clone().filter(|l| !l.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationType;
    use chrono::Utc;

    fn notification(id: &str, read: bool, link: Option<&str>) -> Notification {
        Notification {
            id: id.into(),
            title: "Pago".into(),
            message: "Aprobado".into(),
            kind: NotificationType::Success,
            is_read: read,
            created_at: Utc::now(),
            link: link.map(str::to_string),
        }
    }

    #[test]
    fn opening_with_unread_marks_once() {
        let list = vec![notification("n1", false, None), notification("n2", true, None)];
        let mut bell = NotificationBell::default();
        let unread = unread_count(&list);
        assert_eq!(unread, 1);

        let mut mark_all_calls = 0;
        if bell.toggle(unread) {
            mark_all_calls += 1;
        }
        // closing never marks
        if bell.toggle(unread) {
            mark_all_calls += 1;
        }
        // reopening once everything was read
        if bell.toggle(0) {
            mark_all_calls += 1;
        }
        assert_eq!(mark_all_calls, 1);
        assert!(bell.is_open());
    }

    #[test]
    fn click_marks_unread_and_follows_link() {
        let mut bell = NotificationBell::default();
        bell.toggle(0);
        let click = bell.click(&notification("n1", false, Some("/reservations")));
        assert!(!bell.is_open());
        assert_eq!(click.mark_read.as_deref(), Some("n1"));
        assert_eq!(click.navigate_to.as_deref(), Some("/reservations"));

        let click = bell.click(&notification("n2", true, None));
        assert_eq!(click.mark_read, None);
        assert_eq!(click.navigate_to, None);
    }
}
