use std::collections::VecDeque;
use std::error::Error as StdError;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use super::{Auth, BoxFuture, HttpRequest, HttpResponse, HttpTransport, VivialClient};
use crate::domain::AccountId;

/// In-process transport that records requests and replays canned responses.
///
/// Responses are consumed in order; the last one is repeated once the queue
/// holds a single entry.
#[derive(Debug, Clone)]
pub(super) struct FakeTransport {
    state: Arc<Mutex<FakeTransportState>>,
}

#[derive(Debug)]
struct FakeTransportState {
    requests: Vec<HttpRequest>,
    responses: VecDeque<HttpResponse>,
    failure: Option<String>,
}

impl FakeTransport {
    pub(super) fn new(status: u16, body: impl Into<String>) -> Self {
        let response = HttpResponse {
            status,
            body: body.into(),
        };
        Self::with_state(VecDeque::from([response]), None)
    }

    /// Queue a further response after the ones already registered.
    pub(super) fn then(self, status: u16, body: impl Into<String>) -> Self {
        self.state.lock().unwrap().responses.push_back(HttpResponse {
            status,
            body: body.into(),
        });
        self
    }

    pub(super) fn failing(message: &str) -> Self {
        Self::with_state(VecDeque::new(), Some(message.to_owned()))
    }

    fn with_state(responses: VecDeque<HttpResponse>, failure: Option<String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeTransportState {
                requests: Vec::new(),
                responses,
                failure,
            })),
        }
    }

    pub(super) fn last_request(&self) -> HttpRequest {
        let state = self.state.lock().unwrap();
        state.requests.last().cloned().expect("no request recorded")
    }

    pub(super) fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }
}

impl HttpTransport for FakeTransport {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state.requests.push(request);
            if let Some(message) = state.failure.clone() {
                return Err(message.into());
            }
            let response = if state.responses.len() > 1 {
                state.responses.pop_front()
            } else {
                state.responses.front().cloned()
            };
            response.ok_or_else(|| "no canned response".into())
        })
    }
}

impl HttpRequest {
    pub(super) fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub(super) fn json_body(&self) -> Value {
        serde_json::from_slice(self.body.as_deref().expect("request has no body")).unwrap()
    }

    pub(super) fn path(&self) -> &str {
        self.url.path()
    }
}

pub(super) fn make_client_with_auth(auth: Auth, transport: FakeTransport) -> VivialClient {
    VivialClient {
        account_id: AccountId::new(10096).unwrap(),
        auth,
        base_url: "https://example.invalid/api/v1.0/".to_owned(),
        http: Arc::new(transport),
    }
}

pub(super) fn make_client(transport: FakeTransport) -> VivialClient {
    make_client_with_auth(Auth::bearer("test-token").unwrap(), transport)
}
