use actix_web::cookie::Cookie;
use actix_web::{HttpResponse, post, web};

use crate::AppState;
use crate::auth::SESSION_COOKIE;
use crate::database::user::User;
use crate::errors::{ApiError, AuthError};
use crate::models::auth::Credentials;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(register).service(login);
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .finish()
}

/// `POST /api/user/register`: creates a user, hashes the password, and mints
/// a session cookie. 409 if the login is already taken.
#[utoipa::path(
    post,
    path = "/api/user/register",
    request_body = Credentials,
    responses(
        (status = 200, description = "Registered and authenticated"),
        (status = 400, description = "Malformed body or empty fields"),
        (status = 409, description = "Login already taken"),
        (status = 500, description = "Internal error"),
    )
)]
#[post("/register")]
async fn register(
    state: web::Data<AppState>,
    body: web::Json<Credentials>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();

    if body.login.is_empty() || body.password.is_empty() {
        return Err(ApiError::BadRequest(
            "login and password must not be empty".to_owned(),
        ));
    }

    let password_hash = bcrypt::hash(&body.password, bcrypt::DEFAULT_COST)
        .map_err(|_| ApiError::BadRequest("could not hash password".to_owned()))?;

    let user = User::create(&state.pool, &body.login, &password_hash).await?;
    let token = state.token_signer.mint(user.id)?;

    Ok(HttpResponse::Ok().cookie(session_cookie(token)).finish())
}

/// `POST /api/user/login`: verifies credentials and mints a session cookie.
#[utoipa::path(
    post,
    path = "/api/user/login",
    request_body = Credentials,
    responses(
        (status = 200, description = "Authenticated"),
        (status = 400, description = "Malformed body or empty fields"),
        (status = 401, description = "Unknown login or wrong password"),
        (status = 500, description = "Internal error"),
    )
)]
#[post("/login")]
async fn login(
    state: web::Data<AppState>,
    body: web::Json<Credentials>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();

    if body.login.is_empty() || body.password.is_empty() {
        return Err(ApiError::BadRequest(
            "login and password must not be empty".to_owned(),
        ));
    }

    let user = User::find_by_login(&state.pool, &body.login)
        .await?
        .ok_or(AuthError::BadCredentials)?;

    let matches = bcrypt::verify(&body.password, &user.password_hash)
        .map_err(|_| AuthError::BadCredentials)?;

    if !matches {
        return Err(ApiError::Auth(AuthError::BadCredentials));
    }

    let token = state.token_signer.mint(user.id)?;

    Ok(HttpResponse::Ok().cookie(session_cookie(token)).finish())
}
