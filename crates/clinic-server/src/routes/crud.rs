//! Generic create / read / update / delete / list handlers.
//!
//! Every collection is served by the same handlers instantiated for its
//! entity type; `Entity::KIND` supplies the names used in messages, JSON
//! keys and `Location` headers.

use axum::{
    Router,
    extract::State,
    http::{HeaderValue, header},
    routing::get,
};
use clinic_api::{ApiError, ApiJson, ApiPath, ApiQuery, ApiResponse};
use clinic_core::{PageRequest, Validate, generate_id, now_utc, paginate, validate_id};

use crate::server::AppState;
use crate::store::Stored;

/// `/{collection}` and `/{collection}/{id}` routes for `E`.
pub fn routes<E: Stored>() -> Router<AppState> {
    let base = format!("/{}", E::KIND.collection());
    let item = format!("{base}/{{id}}");
    Router::new()
        .route(&base, get(list::<E>).post(create::<E>))
        .route(
            &item,
            get(read::<E>).put(update::<E>).delete(delete::<E>),
        )
}

/// A malformed id never names a stored entity; it is reported as missing.
pub(crate) fn checked_id<E: Stored>(id: &str) -> Result<(), ApiError> {
    validate_id(id).map_err(|e| {
        tracing::debug!(kind = %E::KIND, error = %e, "malformed id in path");
        ApiError::entity_not_found(E::KIND, id)
    })
}

/// Fetches `id` from the collection of `E`, or a `404`.
pub(crate) async fn fetch<E: Stored>(state: &AppState, id: &str) -> Result<E, ApiError> {
    checked_id::<E>(id)?;
    E::collection(&state.store)
        .get(id)
        .await?
        .ok_or_else(|| ApiError::entity_not_found(E::KIND, id))
}

/// Filters and pages the collection of `E` into a list envelope.
pub(crate) async fn list_page<E: Stored>(
    state: &AppState,
    page: PageRequest,
    filter: &E::Filter,
) -> Result<ApiResponse, ApiError> {
    let window = page.resolve(state.pagination)?;
    let items = E::collection(&state.store).values().await?;
    let page = paginate::<E>(items, filter, window);
    tracing::debug!(kind = %E::KIND, returned = page.len(), total = page.info.total, "listed entities");

    ApiResponse::ok(format!("{} retrieved successfully", E::KIND.label_plural()))
        .with_field(E::KIND.plural_key(), &page.items)?
        .with_page_info(page.info)
}

pub async fn create<E: Stored>(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<E::Create>,
) -> Result<ApiResponse, ApiError> {
    payload.validate()?;
    let entity = E::from_create(generate_id(), now_utc(), payload);
    let id = entity.id().to_string();
    E::collection(&state.store)
        .insert(id.clone(), entity.clone())
        .await?;
    tracing::info!(kind = %E::KIND, id = %id, "entity created");

    let location = HeaderValue::from_str(&format!("/{}/{id}", E::KIND.collection()))
        .map_err(|_| ApiError::internal("An unexpected error occurred"))?;
    Ok(
        ApiResponse::created(format!("{} created successfully", E::KIND.label()))
            .with_field(E::KIND.singular_key(), &entity)?
            .with_header(header::LOCATION, location),
    )
}

pub async fn read<E: Stored>(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<ApiResponse, ApiError> {
    let entity = fetch::<E>(&state, &id).await?;
    ApiResponse::ok(format!("{} retrieved successfully", E::KIND.label()))
        .with_field(E::KIND.singular_key(), &entity)
}

pub async fn update<E: Stored>(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(payload): ApiJson<E::Update>,
) -> Result<ApiResponse, ApiError> {
    payload.validate()?;
    let mut entity = fetch::<E>(&state, &id).await?;
    entity.apply_update(payload, now_utc());
    entity.check_consistency()?;
    E::collection(&state.store)
        .insert(id.clone(), entity.clone())
        .await?;
    tracing::info!(kind = %E::KIND, id = %id, "entity updated");

    ApiResponse::ok(format!("{} updated successfully", E::KIND.label()))
        .with_field(E::KIND.singular_key(), &entity)
}

pub async fn delete<E: Stored>(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<ApiResponse, ApiError> {
    checked_id::<E>(&id)?;
    let removed = E::collection(&state.store)
        .remove(&id)
        .await?
        .ok_or_else(|| ApiError::entity_not_found(E::KIND, &id))?;
    tracing::info!(kind = %E::KIND, id = %id, "entity deleted");

    ApiResponse::ok(format!("{} deleted successfully", E::KIND.label()))
        .with_field(E::KIND.singular_key(), &removed)
}

pub async fn list<E: Stored>(
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<PageRequest>,
    ApiQuery(filter): ApiQuery<E::Filter>,
) -> Result<ApiResponse, ApiError> {
    list_page::<E>(&state, page, &filter).await
}
