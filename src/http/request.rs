//! Request extraction helpers.
//!
//! # Responsibilities
//! - JSON body and query extraction that fail with the API's error envelope
//! - Read the request ID assigned by the request-id layer

use axum::{
    extract::{FromRequest, FromRequestParts},
    http::HeaderMap,
};

use crate::error::ApiError;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// `Json<T>` whose rejection renders as `{ success: false, message }`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `Query<T>` whose rejection renders as `{ success: false, message }`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// The request ID, if one was assigned or supplied.
pub fn request_id(headers: &HeaderMap) -> Option<&str> {
    headers.get(X_REQUEST_ID).and_then(|value| value.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
    use axum::response::IntoResponse;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
    }

    fn json_request(body: &'static str) -> Request<axum::body::Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body() {
        let ApiJson(named) = ApiJson::<Named>::from_request(json_request(r#"{"name":"ada"}"#), &())
            .await
            .unwrap();
        assert_eq!(named.name, "ada");
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let err = ApiJson::<Named>::from_request(json_request("{not json"), &())
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[derive(Debug, Deserialize)]
    struct Paging {
        page: Option<String>,
    }

    async fn query(uri: &str) -> Result<ApiQuery<Paging>, ApiError> {
        let (mut parts, _) = Request::get(uri).body(()).unwrap().into_parts();
        ApiQuery::<Paging>::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_query_string() {
        let ApiQuery(paging) = query("/?page=3").await.unwrap();
        assert_eq!(paging.page.as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn test_duplicate_query_field_is_bad_request() {
        let err = query("/?page=1&page=2").await.unwrap_err();
        assert!(err.to_string().contains("duplicate field"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_request_id_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(request_id(&headers), None);
        headers.insert(X_REQUEST_ID, "abc-123".parse().unwrap());
        assert_eq!(request_id(&headers), Some("abc-123"));
    }
}
