use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TicketStatus {
    Pending,
    InProgress,
    Complete,
    Closed,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TicketPriority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub tenant_id: String,
    pub created_by: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateTicket {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub priority: TicketPriority,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTicketStatus {
    pub status: TicketStatus,
}

/// Completion callback from the external workflow engine.
///
/// This path authenticates with the shared webhook secret instead of a
/// token, so the tenant id must arrive in the payload. Field names match
/// the engine's wire format.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketDoneRequest {
    pub ticket_id: String,
    pub status: TicketStatus,
    pub tenant_id: String,
}
