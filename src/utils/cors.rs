use actix_cors::Cors;
use actix_web::http::Method;
use actix_web::http::header::HeaderName;
use tracing::warn;

use crate::config::CorsConfig;

/// 按配置构建 CORS 中间件
///
/// 来源列表为空或包含 `*` 时接受任意来源，此时不允许携带凭据；
/// 否则只接受列出的来源，并允许携带刷新令牌 cookie。
pub fn build_cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default().max_age(config.max_age);

    if config.allowed_origins.is_empty() || config.allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_any_origin();
    } else {
        for origin in &config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
        cors = cors.supports_credentials();
    }

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| match Method::from_bytes(m.trim().to_uppercase().as_bytes()) {
            Ok(method) => Some(method),
            Err(_) => {
                warn!("Ignoring invalid CORS method: {}", m);
                None
            }
        })
        .collect();
    cors = if methods.is_empty() {
        cors.allow_any_method()
    } else {
        cors.allowed_methods(methods)
    };

    let headers: Vec<HeaderName> = config
        .allowed_headers
        .iter()
        .filter_map(|h| match HeaderName::from_bytes(h.trim().as_bytes()) {
            Ok(header) => Some(header),
            Err(_) => {
                warn!("Ignoring invalid CORS header: {}", h);
                None
            }
        })
        .collect();
    if headers.is_empty() {
        cors.allow_any_header()
    } else {
        cors.allowed_headers(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header;
    use actix_web::{App, HttpResponse, test, web};

    fn cors_config(origins: &[&str]) -> CorsConfig {
        CorsConfig {
            allowed_origins: origins.iter().map(|o| o.to_string()).collect(),
            allowed_methods: vec!["GET".into(), "post".into()],
            allowed_headers: vec!["Authorization".into(), "Content-Type".into()],
            max_age: 3600,
        }
    }

    async fn allow_headers(config: CorsConfig, origin: &str) -> (Option<String>, Option<String>) {
        let app = test::init_service(
            App::new()
                .wrap(build_cors(&config))
                .route("/", web::get().to(HttpResponse::Ok)),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((header::ORIGIN, origin))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let read = |name: header::HeaderName| {
            resp.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        (
            read(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            read(header::ACCESS_CONTROL_ALLOW_CREDENTIALS),
        )
    }

    #[actix_web::test]
    async fn test_listed_origin_with_credentials() {
        let config = cors_config(&["http://localhost:5173"]);
        let (origin, credentials) = allow_headers(config, "http://localhost:5173").await;
        assert_eq!(origin.as_deref(), Some("http://localhost:5173"));
        assert_eq!(credentials.as_deref(), Some("true"));
    }

    #[actix_web::test]
    async fn test_unlisted_origin_not_allowed() {
        let config = cors_config(&["http://localhost:5173"]);
        let (origin, _) = allow_headers(config, "http://ailleurs.example").await;
        assert_eq!(origin, None);
    }

    #[actix_web::test]
    async fn test_wildcard_never_sends_credentials() {
        let (origin, credentials) = allow_headers(cors_config(&["*"]), "http://ailleurs.example").await;
        assert!(origin.is_some());
        assert_eq!(credentials, None);

        let (origin, credentials) = allow_headers(cors_config(&[]), "http://ailleurs.example").await;
        assert!(origin.is_some());
        assert_eq!(credentials, None);
    }
}
