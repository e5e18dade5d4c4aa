//! Inbound shapes tenant sources read from.
//!
//! HTTP adapters fill an [`InboundRequest`]; broker consumers fill a
//! [`MessageContext`].

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt;

/// HTTP request as seen by tenant sources.
///
/// Header names are stored lowercase.
#[derive(Debug, Clone, Default)]
pub struct InboundRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
    pub path_params: HashMap<String, String>,
    pub query_params: HashMap<String, String>,
}

impl InboundRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_lowercase(), value.into());
        self
    }

    pub fn with_path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    pub fn with_query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Header value, matched case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Get a path parameter by name
    pub fn param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }

    /// Get a query parameter by name
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(String::as_str)
    }

    /// Parse the request body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Context attached to a broker message.
#[derive(Debug, Clone, Default)]
pub struct MessageContext {
    pub headers: HashMap<String, String>,
    pub routing_key: Option<String>,
}

impl MessageContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_routing_key(mut self, routing_key: impl Into<String>) -> Self {
        self.routing_key = Some(routing_key.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// Anything a tenant can be resolved from.
#[derive(Debug, Clone, Copy)]
pub enum Inbound<'a> {
    Http(&'a InboundRequest),
    Message(&'a MessageContext),
}

impl fmt::Display for Inbound<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inbound::Http(_) => f.write_str("HTTP request"),
            Inbound::Message(_) => f.write_str("broker message"),
        }
    }
}

impl<'a> From<&'a InboundRequest> for Inbound<'a> {
    fn from(request: &'a InboundRequest) -> Self {
        Inbound::Http(request)
    }
}

impl<'a> From<&'a MessageContext> for Inbound<'a> {
    fn from(message: &'a MessageContext) -> Self {
        Inbound::Message(message)
    }
}
