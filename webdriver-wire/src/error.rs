use thiserror::Error;

use crate::transport::TransportError;

/// Upper bound on how much of a raw response body an error message keeps.
pub(crate) const BODY_SNIPPET_MAX: usize = 1024;

/// One kind per protocol failure, stable across both protocol eras.
///
/// Legacy servers report small numeric status codes
/// (<https://www.selenium.dev/documentation/legacy/json_wire_protocol/#response-status-codes>),
/// W3C servers report lowercase hyphenated strings
/// (<https://www.w3.org/TR/webdriver2/#errors>). Both map into this one
/// enumeration; codes absent from either table collapse to [`ErrorKind::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ElementClickIntercepted,
    ElementNotInteractable,
    ElementNotSelectable,
    ElementNotVisible,
    DetachedShadowRoot,
    ImeEngineActivationFailed,
    ImeNotAvailable,
    InsecureCertificate,
    InvalidArgument,
    InvalidCookieDomain,
    InvalidElementCoordinates,
    InvalidElementState,
    InvalidSelector,
    InvalidSessionId,
    JavascriptError,
    MoveTargetOutOfBounds,
    NoSuchAlert,
    NoSuchCookie,
    NoSuchElement,
    NoSuchFrame,
    NoSuchShadowRoot,
    NoSuchWindow,
    ScriptTimeout,
    SessionNotCreated,
    StaleElementReference,
    Timeout,
    UnableToCaptureScreen,
    UnableToSetCookie,
    UnexpectedAlertOpen,
    UnknownCommand,
    UnknownMethod,
    UnsupportedOperation,
    XpathLookupError,
    Unknown,
}

impl ErrorKind {
    /// Classifies a legacy numeric status code. Total: any code outside the
    /// table, including the success code `0`, is [`ErrorKind::Unknown`].
    #[must_use]
    pub fn from_legacy_status(status: i64) -> Self {
        match status {
            6 => Self::InvalidSessionId,
            7 => Self::NoSuchElement,
            8 => Self::NoSuchFrame,
            9 => Self::UnknownCommand,
            10 => Self::StaleElementReference,
            11 => Self::ElementNotVisible,
            12 => Self::InvalidElementState,
            15 => Self::ElementNotSelectable,
            17 => Self::JavascriptError,
            19 => Self::XpathLookupError,
            21 => Self::Timeout,
            23 => Self::NoSuchWindow,
            24 => Self::InvalidCookieDomain,
            25 => Self::UnableToSetCookie,
            26 => Self::UnexpectedAlertOpen,
            27 => Self::NoSuchAlert,
            28 => Self::ScriptTimeout,
            29 => Self::InvalidElementCoordinates,
            30 => Self::ImeNotAvailable,
            31 => Self::ImeEngineActivationFailed,
            32 => Self::InvalidSelector,
            33 => Self::SessionNotCreated,
            34 => Self::MoveTargetOutOfBounds,
            _ => Self::Unknown,
        }
    }

    /// Classifies a W3C error string. Total, like
    /// [`ErrorKind::from_legacy_status`].
    #[must_use]
    pub fn from_w3c(code: &str) -> Self {
        match code {
            "element click intercepted" => Self::ElementClickIntercepted,
            "element not interactable" => Self::ElementNotInteractable,
            "element not selectable" => Self::ElementNotSelectable,
            "detached shadow root" => Self::DetachedShadowRoot,
            "insecure certificate" => Self::InsecureCertificate,
            "invalid argument" => Self::InvalidArgument,
            "invalid cookie domain" => Self::InvalidCookieDomain,
            "invalid coordinates" => Self::InvalidElementCoordinates,
            "invalid element state" => Self::InvalidElementState,
            "invalid selector" => Self::InvalidSelector,
            "invalid session id" => Self::InvalidSessionId,
            "javascript error" => Self::JavascriptError,
            "move target out of bounds" => Self::MoveTargetOutOfBounds,
            "no such alert" => Self::NoSuchAlert,
            "no such cookie" => Self::NoSuchCookie,
            "no such element" => Self::NoSuchElement,
            "no such frame" => Self::NoSuchFrame,
            "no such shadow root" => Self::NoSuchShadowRoot,
            "no such window" => Self::NoSuchWindow,
            "script timeout" => Self::ScriptTimeout,
            "session not created" => Self::SessionNotCreated,
            "stale element reference" => Self::StaleElementReference,
            "timeout" => Self::Timeout,
            "unable to capture screen" => Self::UnableToCaptureScreen,
            "unable to set cookie" => Self::UnableToSetCookie,
            "unexpected alert open" => Self::UnexpectedAlertOpen,
            "unknown command" => Self::UnknownCommand,
            "unknown method" => Self::UnknownMethod,
            "unsupported operation" => Self::UnsupportedOperation,
            _ => Self::Unknown,
        }
    }

    /// Message used when the server supplies none.
    #[must_use]
    pub fn default_message(self) -> &'static str {
        match self {
            Self::ElementClickIntercepted => {
                "the element click command could not be completed because another element is obscuring it"
            }
            Self::ElementNotInteractable => {
                "the element could not be interacted with via keyboard or pointer"
            }
            Self::ElementNotSelectable => "an attempt was made to select an unselectable element",
            Self::ElementNotVisible => {
                "an element command could not be completed because the element is not visible on the page"
            }
            Self::DetachedShadowRoot => "the referenced shadow root is no longer attached to the DOM",
            Self::ImeEngineActivationFailed => "an IME engine could not be started",
            Self::ImeNotAvailable => "IME was not available",
            Self::InsecureCertificate => {
                "navigation caused the user agent to hit a certificate warning"
            }
            Self::InvalidArgument => "the arguments passed to a command are invalid",
            Self::InvalidCookieDomain => {
                "an illegal attempt was made to set a cookie under a different domain than the current page"
            }
            Self::InvalidElementCoordinates => {
                "the coordinates provided to an interactions operation are invalid"
            }
            Self::InvalidElementState => {
                "an element command could not be completed because the element is in an invalid state"
            }
            Self::InvalidSelector => "the given selector is invalid",
            Self::InvalidSessionId => "the session is either terminated or not started",
            Self::JavascriptError => "an error occurred while executing user supplied JavaScript",
            Self::MoveTargetOutOfBounds => {
                "the target for mouse interaction is not on the viewport"
            }
            Self::NoSuchAlert => "no alert is currently open",
            Self::NoSuchCookie => "no cookie matching the given name was found",
            Self::NoSuchElement => {
                "an element could not be located on the page using the given search parameters"
            }
            Self::NoSuchFrame => {
                "a request to switch to a frame could not be satisfied because the frame could not be found"
            }
            Self::NoSuchShadowRoot => "the element does not have a shadow root",
            Self::NoSuchWindow => {
                "a request to switch to a window could not be satisfied because the window could not be found"
            }
            Self::ScriptTimeout => "a script did not complete before its timeout expired",
            Self::SessionNotCreated => "a new session could not be created",
            Self::StaleElementReference => {
                "an element command failed because the referenced element is no longer attached to the DOM"
            }
            Self::Timeout => "an operation did not complete before its timeout expired",
            Self::UnableToCaptureScreen => "a screen capture was made impossible",
            Self::UnableToSetCookie => "a request to set a cookie's value could not be satisfied",
            Self::UnexpectedAlertOpen => "a modal dialog was open, blocking this operation",
            Self::UnknownCommand => {
                "the requested resource could not be found, or a request was received using an HTTP method that is not supported by the mapped resource"
            }
            Self::UnknownMethod => {
                "the requested command matched a known URL but did not match a method for that URL"
            }
            Self::UnsupportedOperation => {
                "a command could not be supported by the driver or the resource it is operating on"
            }
            Self::XpathLookupError => "an error occurred while searching for an element by XPath",
            Self::Unknown => "an unknown server-side error occurred while processing the command",
        }
    }

    /// The W3C-style name of the kind, used in error display.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ElementClickIntercepted => "element click intercepted",
            Self::ElementNotInteractable => "element not interactable",
            Self::ElementNotSelectable => "element not selectable",
            Self::ElementNotVisible => "element not visible",
            Self::DetachedShadowRoot => "detached shadow root",
            Self::ImeEngineActivationFailed => "ime engine activation failed",
            Self::ImeNotAvailable => "ime not available",
            Self::InsecureCertificate => "insecure certificate",
            Self::InvalidArgument => "invalid argument",
            Self::InvalidCookieDomain => "invalid cookie domain",
            Self::InvalidElementCoordinates => "invalid coordinates",
            Self::InvalidElementState => "invalid element state",
            Self::InvalidSelector => "invalid selector",
            Self::InvalidSessionId => "invalid session id",
            Self::JavascriptError => "javascript error",
            Self::MoveTargetOutOfBounds => "move target out of bounds",
            Self::NoSuchAlert => "no such alert",
            Self::NoSuchCookie => "no such cookie",
            Self::NoSuchElement => "no such element",
            Self::NoSuchFrame => "no such frame",
            Self::NoSuchShadowRoot => "no such shadow root",
            Self::NoSuchWindow => "no such window",
            Self::ScriptTimeout => "script timeout",
            Self::SessionNotCreated => "session not created",
            Self::StaleElementReference => "stale element reference",
            Self::Timeout => "timeout",
            Self::UnableToCaptureScreen => "unable to capture screen",
            Self::UnableToSetCookie => "unable to set cookie",
            Self::UnexpectedAlertOpen => "unexpected alert open",
            Self::UnknownCommand => "unknown command",
            Self::UnknownMethod => "unknown method",
            Self::UnsupportedOperation => "unsupported operation",
            Self::XpathLookupError => "xpath lookup error",
            Self::Unknown => "unknown error",
        }
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum Error {
    /// The server completed the round trip and rejected the command.
    #[error("{kind}: {message}")]
    Protocol { kind: ErrorKind, message: String },
    /// `find_element` failure decorated with the locator that produced it.
    /// The kind is still "no such element"; only the message gains context.
    #[error("no element found using {using} {value:?}: {message}")]
    NoSuchElement {
        using: String,
        value: String,
        message: String,
    },
    #[error("command {command:?} does not accept a JSON body with {verb}")]
    NoParametersExpected { command: String, verb: &'static str },
    #[error("unknown command {0:?}")]
    UnknownCommand(String),
    #[error("obsolete command {0:?}")]
    ObsoleteCommand(String),
    #[error("invalid {verb} request for command {command:?}")]
    InvalidCommandVerb {
        command: String,
        verb: &'static str,
    },
    #[error("unknown locator strategy {0:?}")]
    UnknownLocatorStrategy(String),
    /// 4xx responses carry plaintext per the wire protocol; the body is
    /// kept verbatim (truncated) and never parsed as JSON.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("invalid JSON payload {body:?}")]
    InvalidJsonPayload {
        body: String,
        #[source]
        source: serde_path_to_error::Error<serde_json::Error>,
    },
    #[error("unexpected response payload {0:?}")]
    UnexpectedResponse(String),
    #[error("connection failure: {0}")]
    Transport(#[from] TransportError),
}

pub type Result<T> = core::result::Result<T, Error>;

/// Truncates a raw body for inclusion in an error message.
pub(crate) fn snippet(body: &str) -> String {
    let mut end = BODY_SNIPPET_MAX.min(body.len());
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body[..end].to_owned()
}
