use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{Address, AddressDeletedResponse, AddressRequest},
    queries::address_queries,
    utils::{
        extractors::{extract_user_id, parse_id},
        jwt::Claims,
    },
};

fn address_not_found() -> AppError {
    AppError::NotFound("Address not found".to_string())
}

// Two default switches racing on the one-default index.
fn default_conflict(err: AppError) -> AppError {
    err.on_unique_violation("Default address changed, please reload and try again")
}

pub async fn get_addresses(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Address>>> {
    let user_id = extract_user_id(&claims)?;

    Ok(Json(address_queries::list_addresses(&state.db, user_id).await?))
}

pub async fn add_address(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<AddressRequest>,
) -> Result<Json<Vec<Address>>> {
    let user_id = extract_user_id(&claims)?;
    let new_address = payload.into_new()?;

    let addresses = address_queries::create_address(&state.db, user_id, &new_address)
        .await
        .map_err(|e| default_conflict(e.for_missing_user()))?;

    Ok(Json(addresses))
}

pub async fn update_address(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(payload): Json<AddressRequest>,
) -> Result<Json<Vec<Address>>> {
    let user_id = extract_user_id(&claims)?;
    let address_id = parse_id(&id, "Address not found")?;
    let changes = payload.into_changes();

    let addresses = address_queries::update_address(&state.db, user_id, address_id, &changes)
        .await
        .map_err(default_conflict)?
        .ok_or_else(address_not_found)?;

    Ok(Json(addresses))
}

pub async fn delete_address(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<AddressDeletedResponse>> {
    let user_id = extract_user_id(&claims)?;
    let address_id = parse_id(&id, "Address not found")?;

    if address_queries::delete_address(&state.db, user_id, address_id).await? == 0 {
        return Err(address_not_found());
    }

    Ok(Json(AddressDeletedResponse {
        message: "Address removed".to_string(),
        addresses: address_queries::list_addresses(&state.db, user_id).await?,
    }))
}

pub async fn set_default_address(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Address>>> {
    let user_id = extract_user_id(&claims)?;
    let address_id = parse_id(&id, "Address not found")?;

    let addresses = address_queries::set_default(&state.db, user_id, address_id)
        .await
        .map_err(default_conflict)?
        .ok_or_else(address_not_found)?;

    Ok(Json(addresses))
}
