use actix_web::HttpResponse;

#[allow(clippy::unused_async)]
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().body("Not Found")
}
