use axum::{
    Extension, Json, Router,
    extract::{Query, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use db::models::{
    message::{Conversation, Message},
    musician::Musician,
    user::{User, UserRole},
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

const GROUP_HISTORY_LIMIT: i64 = 50;

/// A chat message decorated with sender display info.
#[derive(Debug, Serialize, TS)]
pub struct ChatMessage {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipient_id: Option<Uuid>,
    pub username: String,
    pub profile_picture: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub is_own: bool,
}

async fn decorate(
    state: &AppState,
    messages: Vec<Message>,
    current_user_id: Uuid,
) -> Result<Vec<ChatMessage>, ApiError> {
    let pool = &state.db().pool;
    let mut decorated = Vec::with_capacity(messages.len());
    for message in messages {
        let user = User::find_by_id(pool, message.user_id).await?;
        let profile_picture = match &user {
            Some(u) => Musician::find_by_user_id(pool, u.id)
                .await?
                .and_then(|m| m.profile_picture),
            None => None,
        };
        decorated.push(ChatMessage {
            id: message.id,
            user_id: message.user_id,
            recipient_id: message.recipient_id,
            username: user
                .map(|u| u.display_name().to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
            profile_picture,
            content: message.content,
            created_at: message.created_at,
            is_own: message.user_id == current_user_id,
        });
    }
    Ok(decorated)
}

#[derive(Debug, Deserialize, TS)]
pub struct MessagesQueryParams {
    /// Private conversation partner; group chat when absent.
    #[serde(default)]
    pub recipient_id: Option<Uuid>,
    /// Incremental polling cursor for the group chat.
    #[serde(default)]
    pub since: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, TS)]
pub struct MessagesResponse {
    pub messages: Vec<ChatMessage>,
    pub latest_timestamp: Option<DateTime<Utc>>,
}

/// GET /api/chat/messages - Poll group or private history
pub async fn get_messages(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
    Query(params): Query<MessagesQueryParams>,
) -> Result<ResponseJson<ApiResponse<MessagesResponse>>, ApiError> {
    let pool = &state.db().pool;
    let messages = match (params.recipient_id, params.since) {
        (Some(recipient_id), _) => {
            Message::find_pair_history(pool, current.id, recipient_id).await?
        }
        (None, Some(since)) => Message::find_group_since(pool, since).await?,
        (None, None) => Message::find_group_recent(pool, GROUP_HISTORY_LIMIT).await?,
    };

    let latest_timestamp = messages.last().map(|m| m.created_at);
    let messages = decorate(&state, messages, current.id).await?;
    Ok(ResponseJson(ApiResponse::success(MessagesResponse {
        messages,
        latest_timestamp,
    })))
}

#[derive(Debug, Deserialize, TS)]
pub struct SendMessageRequest {
    pub content: String,
    #[serde(default)]
    pub recipient_id: Option<Uuid>,
}

/// POST /api/chat/send - Send a group or private message
pub async fn send_message(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<ResponseJson<ApiResponse<ChatMessage>>, ApiError> {
    let content = payload.content.trim();
    if content.is_empty() {
        return Err(ApiError::BadRequest("Message cannot be empty".to_string()));
    }

    let pool = &state.db().pool;
    if let Some(recipient_id) = payload.recipient_id {
        if recipient_id == current.id {
            return Err(ApiError::BadRequest(
                "Cannot send message to yourself".to_string(),
            ));
        }
        if User::find_by_id(pool, recipient_id).await?.is_none() {
            return Err(ApiError::NotFound("Recipient not found".to_string()));
        }
    }

    let message = Message::create(pool, current.id, payload.recipient_id, content).await?;
    let mut decorated = decorate(&state, vec![message], current.id).await?;
    Ok(ResponseJson(ApiResponse::success(decorated.remove(0))))
}

#[derive(Debug, Serialize, TS)]
pub struct ChatUser {
    pub id: Uuid,
    pub username: String,
    pub role: UserRole,
    pub unread_count: i64,
}

/// GET /api/chat/users - Everyone, with per-sender private unread counts
pub async fn get_chat_users(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
) -> Result<ResponseJson<ApiResponse<Vec<ChatUser>>>, ApiError> {
    let pool = &state.db().pool;
    let users = User::find_all(pool).await?;
    let mut out = Vec::with_capacity(users.len());
    for user in users {
        let unread_count = Message::count_from_sender(pool, user.id, current.id).await?;
        out.push(ChatUser {
            id: user.id,
            username: user.display_name().to_string(),
            role: user.role,
            unread_count,
        });
    }
    Ok(ResponseJson(ApiResponse::success(out)))
}

#[derive(Debug, Serialize, TS)]
pub struct ConversationView {
    pub user_id: Uuid,
    pub username: String,
    pub last_message: String,
    pub last_message_time: DateTime<Utc>,
}

/// GET /api/chat/conversations - Private counterparts, most recent first
pub async fn get_conversations(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
) -> Result<ResponseJson<ApiResponse<Vec<ConversationView>>>, ApiError> {
    let pool = &state.db().pool;
    let conversations: Vec<Conversation> = Message::find_conversations(pool, current.id).await?;
    let mut out = Vec::with_capacity(conversations.len());
    for conversation in conversations {
        let Some(user) = User::find_by_id(pool, conversation.user_id).await? else {
            continue;
        };
        out.push(ConversationView {
            user_id: conversation.user_id,
            username: user.display_name().to_string(),
            last_message: conversation.last_message,
            last_message_time: conversation.last_message_at,
        });
    }
    Ok(ResponseJson(ApiResponse::success(out)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chat/messages", get(get_messages))
        .route("/chat/send", post(send_message))
        .route("/chat/users", get(get_chat_users))
        .route("/chat/conversations", get(get_conversations))
}
