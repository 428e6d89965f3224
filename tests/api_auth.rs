//! Handler-level checks for the authentication edge: protected handlers
//! deny requests that carry no resolved actor, with the JSON error body the
//! API promises.
use actix_web::{http::StatusCode, test, web, App, HttpResponse};

use community_service::error::Result;
use community_service::middleware::CurrentUser;

async fn whoami(user: CurrentUser) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({ "id": user.0.id })))
}

#[actix_rt::test]
async fn missing_credentials_deny_protected_handlers() {
    let app = test::init_service(App::new().route("/whoami", web::get().to(whoami))).await;

    let req = test::TestRequest::get().uri("/whoami").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 403);
    assert!(body["error"].as_str().unwrap().contains("authentication"));
}
