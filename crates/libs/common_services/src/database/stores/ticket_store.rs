use crate::database::{Database, DbError};
use chrono::{DateTime, Utc};
use common_types::{AccessTicket, AlbumId};

pub struct TicketStore;

impl TicketStore {
    pub async fn insert(db: &Database, ticket: AccessTicket) -> Result<AccessTicket, DbError> {
        let mut tables = db.write().await;
        if !tables.albums.contains_key(&ticket.album_id) {
            return Err(DbError::not_found("album", ticket.album_id));
        }
        if tables.tickets.contains_key(&ticket.token) {
            return Err(DbError::Conflict {
                entity: "ticket",
                id: ticket.token,
            });
        }
        tables.tickets.insert(ticket.token.clone(), ticket.clone());
        Ok(ticket)
    }

    pub async fn find_by_token(db: &Database, token: &str) -> Result<AccessTicket, DbError> {
        db.read()
            .await
            .tickets
            .get(token)
            .cloned()
            .ok_or_else(|| DbError::not_found("ticket", token))
    }

    pub async fn touch_last_accessed(
        db: &Database,
        token: &str,
        at: DateTime<Utc>,
    ) -> Result<AccessTicket, DbError> {
        let mut tables = db.write().await;
        let ticket = tables
            .tickets
            .get_mut(token)
            .ok_or_else(|| DbError::not_found("ticket", token))?;
        ticket.last_accessed_at = Some(at);
        Ok(ticket.clone())
    }

    /// Tickets are never deleted, only switched off.
    pub async fn deactivate(db: &Database, token: &str) -> Result<AccessTicket, DbError> {
        let mut tables = db.write().await;
        let ticket = tables
            .tickets
            .get_mut(token)
            .ok_or_else(|| DbError::not_found("ticket", token))?;
        ticket.is_active = false;
        Ok(ticket.clone())
    }

    /// Tickets of one album, newest first.
    pub async fn list_for_album(db: &Database, album_id: AlbumId) -> Vec<AccessTicket> {
        let mut tickets: Vec<AccessTicket> = db
            .read()
            .await
            .tickets
            .values()
            .filter(|t| t.album_id == album_id)
            .cloned()
            .collect();
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tickets
    }
}
