//! Notification dispatcher: records a message for the owner whenever a
//! reservation changes status. Messages are only stored; delivery is up to
//! the clients polling `/notifications`.

use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{
        notification::{NewNotification, Notification},
        reservation::{Reservation, ReservationStatus},
        user::CallerIdentity,
    },
    repository::NotificationStore,
};

#[derive(Clone)]
pub struct NotificationsService {
    store: Arc<dyn NotificationStore>,
}

impl NotificationsService {
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    pub async fn reservation_status_changed(&self, reservation: &Reservation) -> AppResult<Notification> {
        let notification = NewNotification {
            user_id: reservation.user_id,
            reservation_id: Some(reservation.id),
            message: status_message(reservation),
        };
        self.store.create(&notification).await
    }

    pub async fn list_mine(&self, caller: &CallerIdentity) -> AppResult<Vec<Notification>> {
        self.store.list_for_user(caller.user_id).await
    }

    pub async fn mark_read(&self, caller: &CallerIdentity, id: i32) -> AppResult<Notification> {
        self.store.mark_read(id, caller.user_id).await
    }
}

fn status_message(reservation: &Reservation) -> String {
    match &reservation.status {
        ReservationStatus::Approved => match reservation.end_date {
            Some(end) => format!(
                "Your reservation #{} has been approved ({} to {})",
                reservation.id,
                reservation.start_date.format("%Y-%m-%d %H:%M UTC"),
                end.format("%Y-%m-%d %H:%M UTC"),
            ),
            None => format!("Your reservation #{} has been approved", reservation.id),
        },
        ReservationStatus::Rejected => {
            format!("Your reservation #{} has been rejected", reservation.id)
        }
        other => format!(
            "Your reservation #{} status changed to {}",
            reservation.id, other
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockNotificationStore;
    use chrono::{TimeZone, Utc};

    fn reservation(status: ReservationStatus) -> Reservation {
        let start = Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap();
        Reservation {
            id: 12,
            user_id: 4,
            book_id: 8,
            start_date: start,
            end_date: status.is_approved().then(|| start + chrono::Duration::days(2)),
            status,
            created_at: start,
        }
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(
            status_message(&reservation(ReservationStatus::Approved)),
            "Your reservation #12 has been approved (2024-05-06 09:00 UTC to 2024-05-08 09:00 UTC)"
        );
        assert_eq!(
            status_message(&reservation(ReservationStatus::Rejected)),
            "Your reservation #12 has been rejected"
        );
        assert_eq!(
            status_message(&reservation("returned".into())),
            "Your reservation #12 status changed to returned"
        );
    }

    #[tokio::test]
    async fn test_notification_goes_to_owner() {
        let mut store = MockNotificationStore::new();
        store
            .expect_create()
            .withf(|n| n.user_id == 4 && n.reservation_id == Some(12))
            .times(1)
            .returning(|n| {
                Ok(Notification {
                    id: 1,
                    user_id: n.user_id,
                    reservation_id: n.reservation_id,
                    message: n.message.clone(),
                    is_read: false,
                    created_at: Utc::now(),
                })
            });

        let service = NotificationsService::new(Arc::new(store));
        let sent = service
            .reservation_status_changed(&reservation(ReservationStatus::Rejected))
            .await
            .unwrap();
        assert_eq!(sent.user_id, 4);
        assert!(!sent.is_read);
    }

    #[tokio::test]
    async fn test_mark_read_is_scoped_to_caller() {
        let mut store = MockNotificationStore::new();
        store
            .expect_mark_read()
            .withf(|id, user_id| *id == 3 && *user_id == 7)
            .returning(|_, _| Err(crate::error::AppError::NotFound("Notification not found".into())));

        let service = NotificationsService::new(Arc::new(store));
        let caller = CallerIdentity { user_id: 7, is_admin: false };
        assert!(service.mark_read(&caller, 3).await.is_err());
    }
}
