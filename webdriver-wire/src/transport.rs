//! The HTTP executor the wire layer delegates to.
//!
//! The contract: one blocking request per call, ordinary HTTP error
//! statuses are reported in the exchange rather than raised, and only true
//! transport failures (DNS, refused connection, TLS) surface as errors.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::command::Verb;

#[derive(Error, Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum TransportError {
    #[error("http request failure {0}")]
    Http(#[from] reqwest::Error),
    #[error("transport failure {0}")]
    Other(String),
}

/// Outcome of one completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct HttpExchange {
    pub status: u16,
    pub body: String,
    /// URL the response was ultimately served from, after redirects.
    /// Legacy session creation reports the session URL this way.
    pub effective_url: String,
}

/// One-shot options for a single call. Consumed exactly once; the wire
/// layer clears them before the exchange regardless of outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallOptions {
    /// Overrides the overall timeout for this call only. The connect
    /// timeout is fixed at transport construction and cannot be overridden
    /// per call.
    pub timeout: Option<Duration>,
}

pub trait Transport {
    fn execute(
        &self,
        verb: Verb,
        url: &str,
        body: Option<&Value>,
        options: &CallOptions,
    ) -> Result<HttpExchange, TransportError>;
}

/// Default overall timeout for one command round trip.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
/// Default connection establishment timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking [`reqwest`] transport.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeouts(DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT)
    }

    /// Timeouts are set once here; per-call overrides of the overall
    /// timeout go through [`CallOptions`].
    pub fn with_timeouts(connect: Duration, overall: Duration) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(connect)
            .timeout(overall)
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn execute(
        &self,
        verb: Verb,
        url: &str,
        body: Option<&Value>,
        options: &CallOptions,
    ) -> Result<HttpExchange, TransportError> {
        let method = match verb {
            Verb::Get => reqwest::Method::GET,
            Verb::Post => reqwest::Method::POST,
            Verb::Delete => reqwest::Method::DELETE,
        };
        let mut request = self
            .client
            .request(method, url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.body(body.to_string());
        }
        if let Some(timeout) = options.timeout {
            request = request.timeout(timeout);
        }
        let response = request.send()?;
        let status = response.status().as_u16();
        let effective_url = response.url().to_string();
        let body = response.text()?;
        tracing::debug!(status, %effective_url, "completed exchange");
        Ok(HttpExchange {
            status,
            body,
            effective_url,
        })
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! Canned-response transport shared by the crate's tests.

    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;
    use std::time::Duration;

    use serde_json::Value;

    use super::{CallOptions, HttpExchange, Transport, TransportError};
    use crate::command::Verb;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) struct Recorded {
        pub verb: Verb,
        pub url: String,
        pub body: Option<String>,
        pub timeout: Option<Duration>,
    }

    #[derive(Default)]
    pub(crate) struct MockTransport {
        pub requests: RefCell<Vec<Recorded>>,
        replies: RefCell<VecDeque<Result<HttpExchange, TransportError>>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(&self, status: u16, body: &str, effective_url: &str) {
            self.replies.borrow_mut().push_back(Ok(HttpExchange {
                status,
                body: body.to_owned(),
                effective_url: effective_url.to_owned(),
            }));
        }

        pub fn reply_json(&self, body: &str) {
            self.reply(200, body, "http://mock/last");
        }

        pub fn fail(&self, message: &str) {
            self.replies
                .borrow_mut()
                .push_back(Err(TransportError::Other(message.to_owned())));
        }

        pub fn request_count(&self) -> usize {
            self.requests.borrow().len()
        }
    }

    impl Transport for MockTransport {
        fn execute(
            &self,
            verb: Verb,
            url: &str,
            body: Option<&Value>,
            options: &CallOptions,
        ) -> Result<HttpExchange, TransportError> {
            self.requests.borrow_mut().push(Recorded {
                verb,
                url: url.to_owned(),
                body: body.map(std::string::ToString::to_string),
                timeout: options.timeout,
            });
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| panic!("no canned reply for {verb} {url}"))
        }
    }

    /// Boxable handle to a shared mock, so tests keep their own `Rc` for
    /// assertions after handing the transport over.
    pub(crate) struct SharedMock(pub(crate) Rc<MockTransport>);

    impl Transport for SharedMock {
        fn execute(
            &self,
            verb: Verb,
            url: &str,
            body: Option<&Value>,
            options: &CallOptions,
        ) -> Result<HttpExchange, TransportError> {
            self.0.execute(verb, url, body, options)
        }
    }
}
