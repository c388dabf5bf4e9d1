use actix_web::{HttpResponse, get, post, web};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::AppState;
use crate::auth::AuthedUser;
use crate::database::user::User;
use crate::database::withdrawal::Withdrawal;
use crate::errors::{ApiError, WithdrawalError};
use crate::luhn;
use crate::models::order::BalanceResponse;
use crate::models::withdrawal::{WithdrawRequest, WithdrawalResponse};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(balance).service(withdraw).service(withdrawals);
}

/// `GET /api/user/balance`: `current = accrued - withdrawn`.
#[utoipa::path(
    get,
    path = "/api/user/balance",
    responses(
        (status = 200, description = "Current balance", body = BalanceResponse),
        (status = 401, description = "Unauthenticated"),
        (status = 500, description = "Internal error"),
    )
)]
#[get("/balance")]
async fn balance(state: web::Data<AppState>, user: AuthedUser) -> Result<HttpResponse, ApiError> {
    let balance = User::balance(&state.pool, user.0).await?;

    Ok(HttpResponse::Ok().json(BalanceResponse {
        current: balance.current().to_f64().unwrap_or_default(),
        withdrawn: balance.withdrawn.to_f64().unwrap_or_default(),
    }))
}

/// `POST /api/user/balance/withdraw`: debits the caller's balance for
/// `order`, which need not exist in the Orders table but must pass Luhn.
#[utoipa::path(
    post,
    path = "/api/user/balance/withdraw",
    request_body = WithdrawRequest,
    responses(
        (status = 200, description = "Withdrawal recorded"),
        (status = 400, description = "Missing order number or non-positive sum"),
        (status = 401, description = "Unauthenticated"),
        (status = 402, description = "Insufficient balance"),
        (status = 422, description = "Order number fails the Luhn check"),
        (status = 500, description = "Internal error"),
    )
)]
#[post("/balance/withdraw")]
async fn withdraw(
    state: web::Data<AppState>,
    user: AuthedUser,
    body: web::Json<WithdrawRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();

    if body.order.is_empty() || body.sum <= Decimal::ZERO {
        return Err(ApiError::BadRequest(
            "order must be non-empty and sum must be strictly positive".to_owned(),
        ));
    }

    if !luhn::is_valid(&body.order) {
        return Err(ApiError::Withdrawal(WithdrawalError::InvalidNumber));
    }

    Withdrawal::insert(&state.pool, &body.order, body.sum, user.0).await?;

    Ok(HttpResponse::Ok().finish())
}

/// `GET /api/user/withdrawals`: the caller's withdrawals, newest first.
#[utoipa::path(
    get,
    path = "/api/user/withdrawals",
    responses(
        (status = 200, description = "Withdrawals", body = Vec<WithdrawalResponse>),
        (status = 204, description = "No withdrawals yet"),
        (status = 401, description = "Unauthenticated"),
        (status = 500, description = "Internal error"),
    )
)]
#[get("/withdrawals")]
async fn withdrawals(
    state: web::Data<AppState>,
    user: AuthedUser,
) -> Result<HttpResponse, ApiError> {
    let withdrawals = Withdrawal::list_for_user(&state.pool, user.0).await?;

    if withdrawals.is_empty() {
        return Ok(HttpResponse::NoContent().finish());
    }

    let response: Vec<WithdrawalResponse> = withdrawals
        .into_iter()
        .map(WithdrawalResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(response))
}
