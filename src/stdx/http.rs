use reqwest::Response;
use serde::Deserialize;

use crate::rating::errors::RemoteQueryFailure;

pub static DEFAULT_USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

/// Body PostgREST sends alongside a non-2xx status.
#[derive(Deserialize)]
struct ServiceError {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

pub trait IServiceStatus {
    /// Turns any non-success response into a [`RemoteQueryFailure::Service`],
    /// passing successful responses through untouched.
    async fn or_service_error(self) -> Result<Response, RemoteQueryFailure>;
}

impl IServiceStatus for Response {
    async fn or_service_error(self) -> Result<Response, RemoteQueryFailure> {
        let status = self.status();

        if status.is_success() {
            return Ok(self);
        }

        let body = self.text().await?;

        Err(RemoteQueryFailure::Service {
            status: status.as_u16(),
            message: service_message(&body),
        })
    }
}

fn service_message(body: &str) -> String {
    match serde_json::from_str::<ServiceError>(body) {
        Ok(ServiceError {
            message,
            code: Some(code),
        }) => format!("{message} ({code})"),
        Ok(ServiceError { message, code: None }) => message,
        Err(_) if body.trim().is_empty() => "empty response body".to_owned(),
        Err(_) => body.trim().to_owned(),
    }
}
