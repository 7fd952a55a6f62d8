//! HTTP helpers over `gloo-net`.
//!
//! Transport failures (CORS, offline) become [`FetchError::NetworkError`];
//! non-2xx responses become [`FetchError::HttpError`]. No timeout is imposed.

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::core::error::FetchError;

pub async fn send(builder: RequestBuilder) -> Result<Response, FetchError> {
    builder
        .send()
        .await
        .map_err(|e| FetchError::NetworkError(e.to_string()))
}

pub async fn send_json<T: Serialize>(
    builder: RequestBuilder,
    body: &T,
) -> Result<Response, FetchError> {
    let request = builder
        .json(body)
        .map_err(|_| FetchError::RequestCreationFailed)?;
    request
        .send()
        .await
        .map_err(|e| FetchError::NetworkError(e.to_string()))
}

pub fn check_status(response: &Response) -> Result<(), FetchError> {
    if response.ok() {
        Ok(())
    } else {
        Err(FetchError::HttpError(response.status()))
    }
}

pub async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, FetchError> {
    check_status(&response)?;
    response
        .json::<T>()
        .await
        .map_err(|e| FetchError::JsonParseError(e.to_string()))
}

/// GET a URL and return the body as text.
pub async fn get_text(url: &str) -> Result<String, FetchError> {
    let response = send(Request::get(url)).await?;
    check_status(&response)?;
    response
        .text()
        .await
        .map_err(|_| FetchError::ResponseReadFailed)
}
