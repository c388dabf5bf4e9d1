use actix_web::{HttpResponse, get, post, web};

use crate::AppState;
use crate::auth::AuthedUser;
use crate::database::order::Order;
use crate::errors::{ApiError, OrderError};
use crate::luhn;
use crate::models::order::OrderResponse;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(submit_order).service(list_orders);
}

/// `POST /api/user/orders`: the body is the raw order number. Luhn failure is
/// 422; an order already owned by the caller is a no-op 200; owned by
/// another user is 409; otherwise the order is inserted and enqueued (202).
#[utoipa::path(
    post,
    path = "/api/user/orders",
    request_body(content = String, content_type = "text/plain"),
    responses(
        (status = 202, description = "Accepted for processing"),
        (status = 200, description = "Already submitted by this user"),
        (status = 401, description = "Unauthenticated"),
        (status = 409, description = "Order belongs to another user"),
        (status = 422, description = "Order number fails the Luhn check"),
        (status = 500, description = "Internal error"),
    )
)]
#[post("/orders")]
async fn submit_order(
    state: web::Data<AppState>,
    user: AuthedUser,
    body: String,
) -> Result<HttpResponse, ApiError> {
    let number = body.trim().to_owned();

    if !luhn::is_valid(&number) {
        return Err(ApiError::Order(OrderError::InvalidNumber));
    }

    match Order::owner(&state.pool, &number).await? {
        Some(owner_id) if owner_id == user.0 => Ok(HttpResponse::Ok().finish()),
        Some(_) => Err(ApiError::Order(OrderError::OwnedByAnotherUser(number))),
        None => {
            Order::insert(&state.pool, &number, user.0).await?;
            state.worker.enqueue(number).await;
            Ok(HttpResponse::Accepted().finish())
        }
    }
}

/// `GET /api/user/orders`: the caller's orders, newest upload first.
#[utoipa::path(
    get,
    path = "/api/user/orders",
    responses(
        (status = 200, description = "Orders", body = Vec<OrderResponse>),
        (status = 204, description = "No orders yet"),
        (status = 401, description = "Unauthenticated"),
        (status = 500, description = "Internal error"),
    )
)]
#[get("/orders")]
async fn list_orders(
    state: web::Data<AppState>,
    user: AuthedUser,
) -> Result<HttpResponse, ApiError> {
    let orders = Order::list_for_user(&state.pool, user.0).await?;

    if orders.is_empty() {
        return Ok(HttpResponse::NoContent().finish());
    }

    let response: Vec<OrderResponse> = orders.into_iter().map(OrderResponse::from).collect();

    Ok(HttpResponse::Ok().json(response))
}
