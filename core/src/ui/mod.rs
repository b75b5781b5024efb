//! Client UI state: the create form, the plan list and the page holding both.
//!
//! These types own what the screen shows and call [`PlanApi`](crate::PlanApi)
//! for every change. Rendering is left to the host.

mod board;
mod form;
mod list;

pub use board::PlanBoard;
pub use form::{PlanForm, PlanFormData};
pub use list::{PlanList, FETCH_ERROR};

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use uuid::Uuid;

    use crate::http::{HttpRequest, HttpResponse, TransportError};

    /// Canned responses served in order, with every request recorded.
    pub(crate) struct Script {
        responses: RefCell<VecDeque<(u16, String)>>,
        pub(crate) requests: RefCell<Vec<HttpRequest>>,
    }

    impl Script {
        pub(crate) fn new(responses: Vec<(u16, String)>) -> Self {
            Self {
                responses: RefCell::new(responses.into()),
                requests: RefCell::new(Vec::new()),
            }
        }

        pub(crate) fn respond(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.requests.borrow_mut().push(request);
            let (status, body) = self
                .responses
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| TransportError("script exhausted".to_string()))?;
            Ok(HttpResponse {
                status,
                headers: Vec::new(),
                body,
            })
        }
    }

    pub(crate) fn plan_json(id: Uuid, name: &str) -> String {
        serde_json::json!({
            "id": id,
            "name": name,
            "duration": 16,
            "description": "skip breakfast",
            "isPremium": false,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z",
        })
        .to_string()
    }
}
