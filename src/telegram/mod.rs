use std::{ffi::OsString, path::PathBuf, str::FromStr};

use serde::Serialize;

use crate::error::SendError;
use form::FormPart;

pub mod api;
pub mod form;

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// What kind of message a single invocation sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendKind {
    Text,
    Photo,
    File,
}

impl SendKind {
    /// Bot API method the message is posted to.
    pub fn method(self) -> &'static str {
        match self {
            SendKind::Text => "sendMessage",
            SendKind::Photo => "sendPhoto",
            SendKind::File => "sendDocument",
        }
    }

    /// Form field carrying the uploaded file, `None` for plain text.
    pub fn attachment_field(self) -> Option<&'static str> {
        match self {
            SendKind::Text => None,
            SendKind::Photo => Some("photo"),
            SendKind::File => Some("document"),
        }
    }
}

impl FromStr for SendKind {
    type Err = SendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(SendKind::Text),
            "photo" => Ok(SendKind::Photo),
            "file" => Ok(SendKind::File),
            _ => Err(SendError::usage(
                "Invalid send type. It should be 'text', 'file', or 'photo'",
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SendRequest {
    pub chat_id: String,
    pub kind: SendKind,
    /// Message text for `Text`, a local file path otherwise.
    pub content: OsString,
    pub thumb: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendMessageBody {
    pub chat_id: String,
    pub text: String,
}

#[derive(Debug)]
pub enum Payload {
    Json(SendMessageBody),
    Multipart(Vec<FormPart>),
}

#[derive(Debug)]
pub struct ComposedRequest {
    pub url: String,
    pub payload: Payload,
    /// Set when the optional thumbnail could not be attached.
    pub thumb_error: Option<SendError>,
}

impl ComposedRequest {
    pub fn content_type(&self) -> &'static str {
        match self.payload {
            Payload::Json(_) => "application/json",
            Payload::Multipart(_) => "multipart/form-data",
        }
    }
}

pub trait Bot {
    fn compose(&self, request: &SendRequest) -> Result<ComposedRequest, SendError>;
    fn dispatch(&self, request: ComposedRequest) -> Result<(), SendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_kind_parse() {
        assert_eq!("text".parse::<SendKind>().unwrap(), SendKind::Text);
        assert_eq!("photo".parse::<SendKind>().unwrap(), SendKind::Photo);
        assert_eq!("file".parse::<SendKind>().unwrap(), SendKind::File);
    }

    #[test]
    fn test_send_kind_rejects_unknown() {
        for raw in ["video", "Text", "", " file"] {
            let err = raw.parse::<SendKind>().unwrap_err();
            assert!(matches!(err, SendError::Usage(_)), "{raw:?} -> {err:?}");
        }
    }

    #[test]
    fn test_send_kind_methods() {
        assert_eq!(SendKind::Text.method(), "sendMessage");
        assert_eq!(SendKind::Photo.method(), "sendPhoto");
        assert_eq!(SendKind::File.method(), "sendDocument");
        assert_eq!(SendKind::Text.attachment_field(), None);
        assert_eq!(SendKind::Photo.attachment_field(), Some("photo"));
        assert_eq!(SendKind::File.attachment_field(), Some("document"));
    }
}
