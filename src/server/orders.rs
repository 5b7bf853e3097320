//! Handlers for the order routes
//!
//! Each handler is a thin composition: extract input → (write paths) verify
//! the bearer token via [`AuthUser`] → delegate to the composer and/or the
//! order store → map the result onto a status and JSON body.

use crate::core::auth::AuthUser;
use crate::core::error::ApiError;
use crate::core::order::{Comment, Order, OrderFilter, OrderSubmission};
use crate::core::validation::compose_order;
use crate::server::state::AppState;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

/// Path ids arrive as raw strings; a syntactically invalid id is an
/// infrastructure error (500), not a 404.
fn parse_order_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("malformed order id {raw:?}: {e}")))
}

/// GET /orders
pub async fn list_orders(
    State(state): State<AppState>,
    Query(filter): Query<OrderFilter>,
) -> Result<Json<Value>, ApiError> {
    let orders = state.orders.list(&filter).await?;

    Ok(Json(json!({ "orders": orders })))
}

/// GET /orders/{id}
///
/// Singular reads hide the top-level storage id; ids embedded in the brand
/// and service references stay.
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_order_id(&id)?;

    let order = state
        .orders
        .get(&id)
        .await?
        .ok_or(ApiError::NotFound("Order"))?;

    let mut body = serde_json::to_value(&order).map_err(anyhow::Error::from)?;
    if let Some(map) = body.as_object_mut() {
        map.remove("id");
    }

    Ok(Json(body))
}

/// POST /orders
pub async fn create_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(submission): Json<OrderSubmission>,
) -> Result<impl IntoResponse, ApiError> {
    let fields = compose_order(state.references.as_ref(), submission).await?;

    let order = Order::new(fields);
    let order_id = order.id;
    state.orders.insert(order).await?;

    tracing::info!(%order_id, submitted_by = %auth.username, "new order submitted");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "New Order Submitted",
            "orderId": order_id,
        })),
    ))
}

/// PUT /orders/{id}
///
/// Full replace of every field except comments. Field and reference
/// validation runs before the id is even looked at, so a bad payload yields
/// 400 regardless of whether the order exists.
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    _auth: AuthUser,
    Json(submission): Json<OrderSubmission>,
) -> Result<Json<Value>, ApiError> {
    let fields = compose_order(state.references.as_ref(), submission).await?;

    let id = parse_order_id(&id)?;
    let matched = state.orders.replace_fields(&id, fields).await?;
    if !matched {
        return Err(ApiError::NotFound("Order"));
    }

    Ok(Json(json!({
        "message": format!("Order ID {id} Edited"),
    })))
}

/// Request body for `POST /orders/{id}/comments`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CommentSubmission {
    pub user: Option<String>,
    pub comment: Option<String>,
}

/// POST /orders/{id}/comments
pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    _auth: AuthUser,
    Json(submission): Json<CommentSubmission>,
) -> Result<Json<Value>, ApiError> {
    let user = submission
        .user
        .filter(|s| !s.is_empty())
        .ok_or(ApiError::MissingFields)?;
    let text = submission
        .comment
        .filter(|s| !s.is_empty())
        .ok_or(ApiError::MissingFields)?;

    let id = parse_order_id(&id)?;

    let comment = Comment::new(user, text);
    let comment_id = comment.comment_id;

    let matched = state.orders.push_comment(&id, comment).await?;
    if !matched {
        return Err(ApiError::NotFound("Order"));
    }

    Ok(Json(json!({
        "message": "Comment Added Successfully",
        "commentId": comment_id,
    })))
}

/// DELETE /orders/{id}
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    _auth: AuthUser,
) -> Result<Json<Value>, ApiError> {
    let id = parse_order_id(&id)?;

    let deleted = state.orders.delete(&id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Order"));
    }

    tracing::info!(order_id = %id, "order deleted");

    Ok(Json(json!({
        "message": format!("Order ID {id} Deleted"),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_order_id_accepts_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(parse_order_id(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn test_parse_order_id_maps_garbage_to_internal() {
        let err = parse_order_id("not-a-uuid").unwrap_err();
        assert_eq!(
            err.status_code(),
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
