// src/services/message_service.rs
// DOCUMENTATION: Messaging between reservation participants

use crate::db::{MessageRepository, ReservationRepository, UserRepository};
use crate::errors::DomicareError;
use crate::models::{ConversationSummary, Message, SendMessageRequest, UnreadCount, User};
use sqlx::SqlitePool;

pub struct MessageService;

impl MessageService {
    pub async fn send(
        pool: &SqlitePool,
        sender: &User,
        req: SendMessageRequest,
    ) -> Result<Message, DomicareError> {
        if req.receiver_id == sender.id {
            return Err(DomicareError::InvalidInput(
                "You cannot message yourself".to_string(),
            ));
        }

        let content = req.content.trim();
        if content.is_empty() {
            return Err(DomicareError::InvalidInput(
                "Message content cannot be empty".to_string(),
            ));
        }

        let receiver = UserRepository::find_by_id(pool, req.receiver_id)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| DomicareError::NotFound(format!("User {}", req.receiver_id)))?;

        if let Some(reservation_id) = req.reservation_id {
            let reservation = ReservationRepository::get_by_id(pool, reservation_id).await?;
            // Attaching a reservation is reserved to its two participants, admins included
            if !reservation.is_participant(sender.id) || !reservation.is_participant(receiver.id) {
                return Err(DomicareError::Forbidden(
                    "Both users must take part in this reservation".to_string(),
                ));
            }
        } else if !sender.is_admin()
            && !receiver.is_admin()
            && !UserRepository::share_reservation(pool, sender.id, receiver.id).await?
        {
            return Err(DomicareError::Forbidden(
                "You can only message users you share a reservation with".to_string(),
            ));
        }

        let message =
            MessageRepository::create(pool, sender.id, receiver.id, req.reservation_id, content)
                .await?;
        log::debug!("Message {} from {} to {}", message.id, sender.id, receiver.id);
        Ok(message)
    }

    pub async fn conversations(
        pool: &SqlitePool,
        user: &User,
    ) -> Result<Vec<ConversationSummary>, DomicareError> {
        MessageRepository::conversations(pool, user.id).await
    }

    /// Full thread with another user; marks their messages to us as read
    pub async fn thread(
        pool: &SqlitePool,
        user: &User,
        other_id: i64,
    ) -> Result<Vec<Message>, DomicareError> {
        UserRepository::get_by_id(pool, other_id).await?;

        let marked = MessageRepository::mark_read(pool, user.id, other_id).await?;
        if marked > 0 {
            log::debug!("User {} read {} messages from {}", user.id, marked, other_id);
        }

        MessageRepository::thread(pool, user.id, other_id).await
    }

    pub async fn unread_count(pool: &SqlitePool, user: &User) -> Result<UnreadCount, DomicareError> {
        Ok(UnreadCount {
            unread: MessageRepository::unread_count(pool, user.id).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{accepted_reservation, seed_admin, seed_famille, test_pool};

    fn message(receiver_id: i64, reservation_id: Option<i64>, content: &str) -> SendMessageRequest {
        SendMessageRequest {
            receiver_id,
            reservation_id,
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_participants_exchange_messages() {
        let pool = test_pool().await;
        let (famille, pro, reservation) = accepted_reservation(&pool).await;

        MessageService::send(&pool, &famille, message(pro.id, Some(reservation.id), "Bonjour"))
            .await
            .unwrap();
        MessageService::send(&pool, &famille, message(pro.id, None, "Êtes-vous disponible ?"))
            .await
            .unwrap();

        assert_eq!(MessageService::unread_count(&pool, &pro).await.unwrap().unread, 2);

        let inbox = MessageService::conversations(&pool, &pro).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].counterpart_id, famille.id);
        assert_eq!(inbox[0].last_message, "Êtes-vous disponible ?");
        assert_eq!(inbox[0].unread_count, 2);

        let thread = MessageService::thread(&pool, &pro, famille.id).await.unwrap();
        assert_eq!(thread.len(), 2);
        assert_eq!(thread[0].content, "Bonjour");

        assert_eq!(MessageService::unread_count(&pool, &pro).await.unwrap().unread, 0);
    }

    #[tokio::test]
    async fn test_strangers_cannot_message() {
        let pool = test_pool().await;
        let (famille, pro, reservation) = accepted_reservation(&pool).await;
        let stranger = seed_famille(&pool, "stranger@example.fr").await;

        let result = MessageService::send(&pool, &stranger, message(pro.id, None, "Salut")).await;
        assert!(matches!(result, Err(DomicareError::Forbidden(_))));

        let result = MessageService::send(
            &pool,
            &stranger,
            message(famille.id, Some(reservation.id), "Salut"),
        )
        .await;
        assert!(matches!(result, Err(DomicareError::Forbidden(_))));

        let result = MessageService::send(&pool, &famille, message(famille.id, None, "Moi")).await;
        assert!(matches!(result, Err(DomicareError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_admin_can_message_anyone() {
        let pool = test_pool().await;
        let admin = seed_admin(&pool, "admin@example.fr").await;
        let famille = seed_famille(&pool, "famille@example.fr").await;

        tokio_test::assert_ok!(
            MessageService::send(&pool, &admin, message(famille.id, None, "Document manquant")).await
        );
        tokio_test::assert_ok!(
            MessageService::send(&pool, &famille, message(admin.id, None, "Merci")).await
        );
    }

    #[tokio::test]
    async fn test_admin_cannot_attach_foreign_reservation() {
        let pool = test_pool().await;
        let (famille, _pro, reservation) = accepted_reservation(&pool).await;
        let admin = seed_admin(&pool, "admin@example.fr").await;

        let result = MessageService::send(
            &pool,
            &admin,
            message(famille.id, Some(reservation.id), "Au sujet de votre réservation"),
        )
        .await;
        assert!(matches!(result, Err(DomicareError::Forbidden(_))));

        let result = MessageService::send(
            &pool,
            &famille,
            message(admin.id, Some(reservation.id), "Question"),
        )
        .await;
        assert!(matches!(result, Err(DomicareError::Forbidden(_))));

        tokio_test::assert_ok!(
            MessageService::send(&pool, &admin, message(famille.id, None, "Au sujet de votre réservation"))
                .await
        );
    }
}
