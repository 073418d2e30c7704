//! Batched input actions.
//! <https://www.w3.org/TR/webdriver2/#actions>

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::Result;
use crate::wire::Endpoint;

/// The kind of input source contributing a tick.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    None,
    Key,
    Pointer,
    Wheel,
}

/// One input source's contribution to the batch: an id, the source kind,
/// and the ordered action items.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Tick {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SourceKind,
    pub actions: Vec<Value>,
}

impl Tick {
    pub fn new(id: impl Into<String>, kind: SourceKind, actions: Vec<Value>) -> Self {
        Self {
            id: id.into(),
            kind,
            actions,
        }
    }
}

/// An action batch owned by the caller, one per session at a time.
///
/// Each input source contributes at most one entry per batch: appending a
/// tick for the same `(id, type)` pair as the current last entry merges
/// the action lists instead of appending a second entry.
pub struct Actions {
    endpoint: Endpoint,
    ticks: Vec<Tick>,
}

impl Actions {
    pub(crate) fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            ticks: Vec::new(),
        }
    }

    pub fn add_tick(&mut self, tick: Tick) -> &mut Self {
        match self.ticks.last_mut() {
            Some(last) if last.id == tick.id && last.kind == tick.kind => {
                last.actions.extend(tick.actions);
            }
            _ => self.ticks.push(tick),
        }
        self
    }

    /// Submits the batch. The batch is captured and cleared before the
    /// network call, so a failed submission leaves nothing stale behind to
    /// be resubmitted.
    pub fn perform(&mut self) -> Result<()> {
        let ticks = core::mem::take(&mut self.ticks);
        self.endpoint
            .invoke("actions", Some(json!({"actions": ticks})))
            .map(drop)
    }

    /// Releases all currently depressed inputs. Leaves the batch alone.
    pub fn release(&self) -> Result<()> {
        self.endpoint.invoke("deleteactions", None).map(drop)
    }

    pub fn clear_all_actions(&mut self) {
        self.ticks.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::{SourceKind, Tick};
    use crate::command::Verb;
    use crate::session::tests::w3c_session;

    #[test]
    fn adjacent_same_source_ticks_merge_in_order() {
        let (session, _mock) = w3c_session();
        let mut actions = session.actions();
        let move_action = json!({"type": "pointerMove", "x": 10, "y": 10});
        let down_action = json!({"type": "pointerDown", "button": 0});
        actions
            .add_tick(Tick::new("0", SourceKind::Pointer, vec![move_action.clone()]))
            .add_tick(Tick::new("0", SourceKind::Pointer, vec![down_action.clone()]));
        assert_eq!(actions.ticks.len(), 1);
        assert_eq!(actions.ticks[0].actions, vec![move_action, down_action]);
    }

    #[test]
    fn different_sources_stay_separate() {
        let (session, _mock) = w3c_session();
        let mut actions = session.actions();
        actions
            .add_tick(Tick::new("0", SourceKind::Pointer, vec![json!({"type": "pause"})]))
            .add_tick(Tick::new("1", SourceKind::Pointer, vec![json!({"type": "pause"})]))
            .add_tick(Tick::new("1", SourceKind::Key, vec![json!({"type": "pause"})]));
        assert_eq!(actions.ticks.len(), 3);
    }

    #[test]
    fn same_id_does_not_merge_across_an_intervening_source() {
        let (session, _mock) = w3c_session();
        let mut actions = session.actions();
        actions
            .add_tick(Tick::new("0", SourceKind::Pointer, vec![json!(1)]))
            .add_tick(Tick::new("1", SourceKind::Pointer, vec![json!(2)]))
            .add_tick(Tick::new("0", SourceKind::Pointer, vec![json!(3)]));
        assert_eq!(actions.ticks.len(), 3);
    }

    #[test]
    fn perform_sends_one_merged_input_source() {
        let (session, mock) = w3c_session();
        mock.reply_json(r#"{"value": null}"#);
        let move_action = json!({"type": "pointerMove", "x": 1, "y": 1});
        let down_action = json!({"type": "pointerDown", "button": 0});
        let mut actions = session.actions();
        actions
            .add_tick(Tick::new("0", SourceKind::Pointer, vec![move_action.clone()]))
            .add_tick(Tick::new("0", SourceKind::Pointer, vec![down_action.clone()]));
        actions.perform().unwrap();
        let requests = mock.requests.borrow();
        assert_eq!(requests[0].verb, Verb::Post);
        assert_eq!(requests[0].url, "http://s/session/sid/actions");
        let body: Value = serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"actions": [
                {"id": "0", "type": "pointer", "actions": [move_action, down_action]}
            ]})
        );
    }

    #[test]
    fn perform_clears_the_batch_even_when_the_call_fails() {
        let (session, mock) = w3c_session();
        mock.fail("wire down");
        let mut actions = session.actions();
        actions.add_tick(Tick::new("0", SourceKind::Key, vec![json!({"type": "pause"})]));
        assert!(actions.perform().is_err());
        assert!(actions.is_empty());
        // a retry submits nothing stale
        mock.reply_json(r#"{"value": null}"#);
        actions.perform().unwrap();
        let requests = mock.requests.borrow();
        let body: Value = serde_json::from_str(requests[1].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"actions": []}));
    }

    #[test]
    fn release_issues_delete_and_keeps_the_batch() {
        let (session, mock) = w3c_session();
        mock.reply_json(r#"{"value": null}"#);
        let mut actions = session.actions();
        actions.add_tick(Tick::new("k", SourceKind::Key, vec![json!({"type": "pause"})]));
        actions.release().unwrap();
        assert!(!actions.is_empty());
        let requests = mock.requests.borrow();
        assert_eq!(requests[0].verb, Verb::Delete);
        assert_eq!(requests[0].url, "http://s/session/sid/actions");
    }

    #[test]
    fn clear_all_actions_resets_synchronously() {
        let (session, mock) = w3c_session();
        let mut actions = session.actions();
        actions.add_tick(Tick::new("0", SourceKind::Wheel, vec![json!({"type": "scroll"})]));
        actions.clear_all_actions();
        assert!(actions.is_empty());
        assert_eq!(mock.request_count(), 0);
    }
}
