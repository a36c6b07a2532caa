//! In-memory back ends for exercising facades without hardware or network.

mod logging_env;

use crate::capability::Driver;
use crate::client::{HttpRequest, HttpResponse, Transport};
use crate::errors::{ASCOMError, ASCOMResult};
use crate::params::{MemberKind, Params};
use bytes::Bytes;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Transport that replays scripted responses and records every request.
#[derive(Debug, Default)]
pub(crate) struct MockTransport {
    responses: Mutex<VecDeque<eyre::Result<HttpResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    /// Queue a raw response.
    pub(crate) fn respond(&self, response: HttpResponse) {
        self.responses
            .lock()
            .expect("poisoned response queue")
            .push_back(Ok(response));
    }

    /// Queue a successful JSON envelope.
    ///
    /// `ClientTransactionID` is echoed from the request unless the body sets it.
    pub(crate) fn respond_json(&self, body: Value) {
        self.respond(HttpResponse {
            status: 200,
            content_type: Some("application/json; charset=utf-8".to_owned()),
            content_encoding: None,
            body: Bytes::from(body.to_string()),
        });
    }

    /// Queue a successful envelope carrying `value`.
    pub(crate) fn respond_value(&self, value: impl Into<Value>) {
        self.respond_json(serde_json::json!({
            "Value": value.into(),
            "ErrorNumber": 0,
            "ErrorMessage": "",
        }));
    }

    /// Queue a transport-level failure.
    pub(crate) fn fail(&self, message: &'static str) {
        self.responses
            .lock()
            .expect("poisoned response queue")
            .push_back(Err(eyre::eyre!(message)));
    }

    /// Requests received so far.
    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("poisoned request log").clone()
    }
}

fn echo_transaction(mut response: HttpResponse, request: &HttpRequest) -> HttpResponse {
    let is_json = response
        .content_type
        .as_deref()
        .is_some_and(|ty| ty.starts_with("application/json"));
    let client_transaction_id = request
        .params
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("ClientTransactionID"))
        .and_then(|(_, value)| value.parse::<u32>().ok());

    if let (true, Some(id)) = (is_json, client_transaction_id)
        && let Ok(Value::Object(mut body)) = serde_json::from_slice::<Value>(&response.body)
    {
        _ = body
            .entry("ClientTransactionID")
            .or_insert_with(|| id.into());
        _ = body.entry("ServerTransactionID").or_insert_with(|| id.into());
        response.body = Bytes::from(Value::Object(body).to_string());
    }

    response
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> eyre::Result<HttpResponse> {
        self.requests
            .lock()
            .expect("poisoned request log")
            .push(request.clone());

        let scripted = self
            .responses
            .lock()
            .expect("poisoned response queue")
            .pop_front()
            .unwrap_or_else(|| Err(eyre::eyre!("no response scripted for {}", request.url)));

        scripted.map(|response| echo_transaction(response, &request))
    }
}

/// One call received by [`MockDriver`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DriverCall {
    pub(crate) kind: MemberKind,
    pub(crate) member: String,
    pub(crate) params: Params,
}

/// Local driver backed by a table of member values.
///
/// Reads and calls return the stored value, writes store the parameter named
/// after the member. Anything not in the table is "not implemented".
#[derive(Debug, Default)]
pub(crate) struct MockDriver {
    values: Mutex<HashMap<String, Value>>,
    calls: Mutex<Vec<DriverCall>>,
}

impl MockDriver {
    /// Driver reporting the given `InterfaceVersion`.
    pub(crate) fn with_version(version: i32) -> Self {
        Self::default().with("InterfaceVersion", version)
    }

    /// Add a member value.
    pub(crate) fn with(self, member: &str, value: impl Into<Value>) -> Self {
        _ = self
            .values
            .lock()
            .expect("poisoned driver values")
            .insert(member.to_owned(), value.into());
        self
    }

    /// Current value of a member.
    pub(crate) fn value(&self, member: &str) -> Option<Value> {
        self.values
            .lock()
            .expect("poisoned driver values")
            .get(member)
            .cloned()
    }

    /// Calls received so far, excluding `InterfaceVersion` reads.
    pub(crate) fn calls(&self) -> Vec<DriverCall> {
        self.calls
            .lock()
            .expect("poisoned call log")
            .iter()
            .filter(|call| call.member != "InterfaceVersion")
            .cloned()
            .collect()
    }

    fn record(&self, kind: MemberKind, member: &str, params: &Params) {
        self.calls.lock().expect("poisoned call log").push(DriverCall {
            kind,
            member: member.to_owned(),
            params: params.clone(),
        });
    }
}

#[async_trait::async_trait]
impl Driver for MockDriver {
    async fn get(&self, member: &str, params: &Params) -> ASCOMResult<Value> {
        self.record(MemberKind::Get, member, params);
        self.value(member)
            .ok_or_else(|| ASCOMError::not_implemented(member))
    }

    async fn set(&self, member: &str, params: &Params) -> ASCOMResult {
        self.record(MemberKind::Set, member, params);
        let mut values = self.values.lock().expect("poisoned driver values");
        match (values.get_mut(member), params.get(member)) {
            (Some(slot), Some(value)) => {
                *slot = value.clone();
                Ok(())
            }
            _ => Err(ASCOMError::not_implemented(member)),
        }
    }

    async fn invoke(&self, member: &str, params: &Params) -> ASCOMResult<Value> {
        self.record(MemberKind::Invoke, member, params);
        self.value(member)
            .ok_or_else(|| ASCOMError::not_implemented(member))
    }
}
