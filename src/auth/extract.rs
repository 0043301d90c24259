// JSON body extractor that reports bad input as `AuthError`

use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::auth::error::AuthError;

/// JSON extractor with validation.
///
/// A body that cannot be deserialized becomes `AuthError::MalformedRequest`
/// and a body that fails `Validate` becomes `AuthError::ValidationError`, so
/// both reach the client as a 400 with the usual error body.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        data.validate()?;
        Ok(ValidatedJson(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::LoginRequest;
    use axum::{body::Body, http::header};

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_missing_field_is_a_validation_error() {
        let result = ValidatedJson::<LoginRequest>::from_request(json_request(r#"{"login":"jdoe"}"#), &()).await;

        match result {
            Err(AuthError::ValidationError(errors)) => {
                assert!(errors.field_errors().contains_key("password"));
                assert!(!errors.field_errors().contains_key("login"));
            }
            Err(other) => panic!("Expected ValidationError, got {:?}", other),
            Ok(_) => panic!("Expected ValidationError, got a request"),
        }
    }

    #[tokio::test]
    async fn test_syntax_error_is_malformed_request() {
        let result = ValidatedJson::<LoginRequest>::from_request(json_request("{not json"), &()).await;

        assert!(matches!(result, Err(AuthError::MalformedRequest(_))));
    }

    #[tokio::test]
    async fn test_valid_body_is_extracted() {
        let result = ValidatedJson::<LoginRequest>::from_request(
            json_request(r#"{"login":"jdoe","password":"p1"}"#),
            &(),
        )
        .await;

        let ValidatedJson(request) = result.unwrap();
        assert_eq!(request.login, "jdoe");
    }
}
