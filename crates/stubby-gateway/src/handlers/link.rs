use crate::error::Result;
use crate::model::{
    DeleteLinkResponse, LinkResponse, ShortenRequest, ShortenResponse, UpdateLinkRequest,
};
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use stubby_core::LinkId;
use stubby_shortener::ShortenParams;

type JsonBody<T> = std::result::Result<Json<T>, JsonRejection>;
type IdPath = std::result::Result<Path<LinkId>, PathRejection>;

pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: JsonBody<ShortenRequest>,
) -> Result<Json<ShortenResponse>> {
    let Json(request) = payload?;

    let code = state
        .shortener()
        .shorten(ShortenParams {
            original_url: request.url,
            valid_until: request.valid_until,
            length: request.short_len,
        })
        .await?;

    Ok(Json(ShortenResponse {
        short_url: state.short_url(&code),
        short_code: code.into(),
    }))
}

pub async fn list_links_handler(State(state): State<AppState>) -> Result<Json<Vec<LinkResponse>>> {
    let links = state.shortener().list().await?;

    Ok(Json(
        links
            .into_iter()
            .map(|record| LinkResponse::new(&state, record))
            .collect(),
    ))
}

pub async fn get_link_handler(
    State(state): State<AppState>,
    id: IdPath,
) -> Result<Json<LinkResponse>> {
    let Path(id) = id?;
    let record = state.shortener().get(id).await?;

    Ok(Json(LinkResponse::new(&state, record)))
}

pub async fn update_link_handler(
    State(state): State<AppState>,
    id: IdPath,
    payload: JsonBody<UpdateLinkRequest>,
) -> Result<Json<LinkResponse>> {
    let Path(id) = id?;
    let Json(request) = payload?;
    let record = state.shortener().update(id, request.into()).await?;

    Ok(Json(LinkResponse::new(&state, record)))
}

pub async fn delete_link_handler(
    State(state): State<AppState>,
    id: IdPath,
) -> Result<Json<DeleteLinkResponse>> {
    let Path(id) = id?;
    state.shortener().delete(id).await?;

    Ok(Json(DeleteLinkResponse { ok: true }))
}
