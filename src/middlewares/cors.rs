use actix_cors::Cors;

/// 跨域配置；allowed_origins 为空时允许任意来源（前端需携带会话 Cookie）
pub fn create_cors(allowed_origins: &[String]) -> Cors {
    let cors = if allowed_origins.is_empty() {
        Cors::default().allowed_origin_fn(|_, _req_head| true)
    } else {
        allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors.allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allow_any_header()
        .supports_credentials()
        .max_age(3600)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, HttpResponse, test, web};

    #[actix_web::test]
    async fn test_configured_origin_only() {
        let app = test::init_service(
            App::new()
                .wrap(create_cors(&["https://wheel.example.com".to_string()]))
                .route("/ping", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/ping")
                .insert_header((header::ORIGIN, "https://wheel.example.com"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://wheel.example.com"
        );

        let resp = test::try_call_service(
            &app,
            test::TestRequest::get()
                .uri("/ping")
                .insert_header((header::ORIGIN, "https://evil.example.com"))
                .to_request(),
        )
        .await;
        let allowed = resp
            .ok()
            .and_then(|r| r.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).cloned());
        assert!(allowed.is_none());
    }
}
