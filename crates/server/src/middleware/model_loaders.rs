//! Middleware that resolves path ids to models before the handler runs.
//!
//! Routes nested under an id segment get the loaded row injected as an
//! extension, so handlers take `Extension<Musician>` instead of re-querying.

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use db::models::{
    announcement::EventAnnouncement, musician::Musician, post::ProfilePost, practice::Practice,
    service::SundayService, slide::Slide, song::Song, tool::Tool,
};
use uuid::Uuid;

use crate::AppState;

macro_rules! loader {
    ($fn_name:ident, $model:ty, $finder:path) => {
        pub async fn $fn_name(
            State(state): State<AppState>,
            Path(id): Path<Uuid>,
            mut request: Request,
            next: Next,
        ) -> Result<Response, StatusCode> {
            let model: $model = $finder(&state.db().pool, id)
                .await
                .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
                .ok_or(StatusCode::NOT_FOUND)?;
            request.extensions_mut().insert(model);
            Ok(next.run(request).await)
        }
    };
}

loader!(load_musician_middleware, Musician, Musician::find_by_id);
loader!(load_post_middleware, ProfilePost, ProfilePost::find_by_id);
loader!(load_service_middleware, SundayService, SundayService::find_by_id);
loader!(load_practice_middleware, Practice, Practice::find_by_id);
loader!(load_song_middleware, Song, Song::find_by_id);
loader!(load_slide_middleware, Slide, Slide::find_by_id);
loader!(
    load_announcement_middleware,
    EventAnnouncement,
    EventAnnouncement::find_by_id
);
loader!(load_tool_middleware, Tool, Tool::find_by_id);
