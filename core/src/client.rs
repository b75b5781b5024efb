//! Stateless request builder and response parser for the plans API.
//!
//! `PlanClient` holds only the base URL, which includes the mount prefix
//! (`http://localhost:5001/fasting`). Each operation has a `build_*` method
//! producing an `HttpRequest` and a `parse_*` method consuming the matching
//! `HttpResponse`. [`crate::PlanApi`] glues the two halves to a transport.

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{FastingPlan, Message, NewPlan, PlanUpdate};

/// Stateless client for the plans API.
///
/// Produces `HttpRequest` values and consumes `HttpResponse` values.
/// The caller is responsible for executing the HTTP round-trip.
#[derive(Debug, Clone)]
pub struct PlanClient {
    base_url: String,
}

impl PlanClient {
    /// `base_url` includes the mount prefix; a trailing `/` is dropped.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn plans_url(&self) -> String {
        format!("{}/plans", self.base_url)
    }

    fn plan_url(&self, id: Uuid) -> String {
        format!("{}/plans/{id}", self.base_url)
    }

    /// `GET {base}/plans`
    pub fn build_list_plans(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.plans_url(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// `POST {base}/plans` with a JSON body.
    pub fn build_create_plan(&self, input: &NewPlan) -> Result<HttpRequest, ApiError> {
        json_request(HttpMethod::Post, self.plans_url(), input)
    }

    /// `PUT {base}/plans/{id}` carrying only the fields set in `input`.
    pub fn build_update_plan(&self, id: Uuid, input: &PlanUpdate) -> Result<HttpRequest, ApiError> {
        json_request(HttpMethod::Put, self.plan_url(id), input)
    }

    /// `DELETE {base}/plans/{id}`
    pub fn build_delete_plan(&self, id: Uuid) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: self.plan_url(id),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Expects 200 with an array of plans.
    pub fn parse_list_plans(&self, response: HttpResponse) -> Result<Vec<FastingPlan>, ApiError> {
        check_status(&response, 200)?;
        decode(&response)
    }

    /// Expects 201 with the created plan.
    pub fn parse_create_plan(&self, response: HttpResponse) -> Result<FastingPlan, ApiError> {
        check_status(&response, 201)?;
        decode(&response)
    }

    /// Expects 200 with the post-update plan.
    pub fn parse_update_plan(&self, response: HttpResponse) -> Result<FastingPlan, ApiError> {
        check_status(&response, 200)?;
        decode(&response)
    }

    /// Expects 200 with the confirmation message.
    pub fn parse_delete_plan(&self, response: HttpResponse) -> Result<Message, ApiError> {
        check_status(&response, 200)?;
        decode(&response)
    }
}

fn json_request<T: Serialize>(
    method: HttpMethod,
    path: String,
    input: &T,
) -> Result<HttpRequest, ApiError> {
    let body = serde_json::to_string(input).map_err(|e| ApiError::Encode(e.to_string()))?;
    Ok(HttpRequest {
        method,
        path,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(body),
    })
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// The server's `message` (or routing `error`) text, falling back to the raw body.
fn server_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .or_else(|| value.get("error"))
                .and_then(|text| text.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    match response.status {
        status if status == expected => Ok(()),
        404 => Err(ApiError::NotFound {
            message: server_message(&response.body),
        }),
        400 => Err(ApiError::BadRequest {
            message: server_message(&response.body),
        }),
        status @ 500..=599 => Err(ApiError::Server {
            status,
            message: server_message(&response.body),
        }),
        status => Err(ApiError::UnexpectedStatus {
            status,
            body: response.body.clone(),
        }),
    }
}
