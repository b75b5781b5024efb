//! `PlanClient` wired to a transport.
//!
//! Each call is one build, one round-trip and one parse. Failures are
//! logged once here and handed back as values.

use tracing::{debug, warn};
use uuid::Uuid;

use crate::client::PlanClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::types::{FastingPlan, Message, NewPlan, PlanUpdate};

/// A [`PlanClient`] bound to a [`Transport`]: one method per CRUD operation,
/// each returning the parsed body or an [`ApiError`].
pub struct PlanApi<T> {
    client: PlanClient,
    transport: T,
}

impl<T: Transport> PlanApi<T> {
    pub fn new(client: PlanClient, transport: T) -> Self {
        Self { client, transport }
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), url = %request.path, "sending request");
        Ok(self.transport.execute(request)?)
    }

    /// All plans, in the order the server stored them.
    pub fn list_plans(&self) -> Result<Vec<FastingPlan>, ApiError> {
        let request = self.client.build_list_plans();
        self.send(request)
            .and_then(|response| self.client.parse_list_plans(response))
            .inspect_err(|err| warn!(code = ?err.code(), error = %err, "listing plans failed"))
    }

    pub fn create_plan(&self, input: &NewPlan) -> Result<FastingPlan, ApiError> {
        self.client
            .build_create_plan(input)
            .and_then(|request| self.send(request))
            .and_then(|response| self.client.parse_create_plan(response))
            .inspect_err(|err| warn!(code = ?err.code(), error = %err, "creating plan failed"))
    }

    pub fn update_plan(&self, id: Uuid, input: &PlanUpdate) -> Result<FastingPlan, ApiError> {
        self.client
            .build_update_plan(id, input)
            .and_then(|request| self.send(request))
            .and_then(|response| self.client.parse_update_plan(response))
            .inspect_err(|err| warn!(%id, code = ?err.code(), error = %err, "updating plan failed"))
    }

    pub fn delete_plan(&self, id: Uuid) -> Result<Message, ApiError> {
        let request = self.client.build_delete_plan(id);
        self.send(request)
            .and_then(|response| self.client.parse_delete_plan(response))
            .inspect_err(|err| warn!(%id, code = ?err.code(), error = %err, "deleting plan failed"))
    }
}
