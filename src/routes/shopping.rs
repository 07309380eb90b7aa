use axum::{
    body::Body,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use super::AppState;
use crate::{
    auth::AuthUser,
    error::{AppError, Result},
};

pub async fn download(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Response> {
    let renderer = state
        .renderer
        .clone()
        .map_err(AppError::ExportUnavailable)?;

    let document = cookshelf_shopping::export_shopping_list(
        state.store.as_ref(),
        renderer,
        &user.id,
        state.config.export.read_timeout(),
    )
    .await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"Shopping_list.pdf\"",
            ),
        ],
        Body::from(document.into_bytes()),
    )
        .into_response())
}
