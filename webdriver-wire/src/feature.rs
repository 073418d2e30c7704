//! Pass-through sub-resources: window, frame, alert, timeouts, ime,
//! touch, storage areas, application cache, log. All dispatch, no new
//! mechanism.

use serde_json::Value;

use crate::error::Result;
use crate::wire::Endpoint;

/// Which storage area a storage sub-resource addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Local,
    Session,
}

impl StorageKind {
    pub(crate) fn suffix(self) -> &'static str {
        match self {
            Self::Local => "local_storage",
            Self::Session => "session_storage",
        }
    }
}

/// A sub-resource under a session URL, defined entirely by its command
/// table.
pub struct Feature {
    endpoint: Endpoint,
}

impl Feature {
    pub(crate) fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }

    pub fn invoke(&self, name: &str, body: Option<Value>) -> Result<Value> {
        self.endpoint.invoke(name, body)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::StorageKind;
    use crate::command::Verb;
    use crate::error::Error;
    use crate::session::tests::w3c_session;

    #[test]
    fn storage_is_one_parametrized_type() {
        let (session, mock) = w3c_session();
        mock.reply_json(r#"{"value": "stored"}"#);
        mock.reply_json(r#"{"value": null}"#);
        session
            .storage(StorageKind::Local)
            .invoke("key", Some(json!("token")))
            .unwrap();
        session
            .storage(StorageKind::Session)
            .invoke("deletekey", Some(json!("token")))
            .unwrap();
        let requests = mock.requests.borrow();
        assert_eq!(
            requests[0].url,
            "http://s/session/sid/local_storage/key/token"
        );
        assert_eq!(requests[0].verb, Verb::Get);
        assert_eq!(
            requests[1].url,
            "http://s/session/sid/session_storage/key/token"
        );
        assert_eq!(requests[1].verb, Verb::Delete);
    }

    #[test]
    fn alert_text_supports_both_verbs() {
        let (session, mock) = w3c_session();
        mock.reply_json(r#"{"value": "sure?"}"#);
        mock.reply_json(r#"{"value": null}"#);
        let alert = session.alert();
        alert.invoke("text", None).unwrap();
        alert.invoke("posttext", Some(json!({"text": "ok"}))).unwrap();
        let requests = mock.requests.borrow();
        assert_eq!(requests[0].verb, Verb::Get);
        assert_eq!(requests[0].url, "http://s/session/sid/alert/text");
        assert_eq!(requests[1].verb, Verb::Post);
    }

    #[test]
    fn feature_tables_are_scoped_to_their_resource() {
        let (session, _mock) = w3c_session();
        // the ime table knows nothing about window commands
        assert!(matches!(
            session.ime().invoke("maximize", None).unwrap_err(),
            Error::UnknownCommand(_)
        ));
    }

    #[test]
    fn timeouts_commands_post_under_the_timeouts_url() {
        let (session, mock) = w3c_session();
        mock.reply_json(r#"{"value": null}"#);
        session
            .timeouts()
            .invoke("implicit_wait", Some(json!({"ms": 500})))
            .unwrap();
        let requests = mock.requests.borrow();
        assert_eq!(
            requests[0].url,
            "http://s/session/sid/timeouts/implicit_wait"
        );
        assert_eq!(requests[0].verb, Verb::Post);
    }
}
