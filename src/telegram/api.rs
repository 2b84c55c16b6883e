use std::path::Path;

use super::{
    Bot, ComposedRequest, DEFAULT_API_URL, Payload, SendMessageBody, SendRequest,
    form::{self, FormPart},
};
use crate::error::SendError;
use log::{debug, error, info, warn};
use reqwest::{
    StatusCode,
    blocking::{Client, Response},
    header::CONTENT_TYPE,
};

pub struct TelegramBot {
    client: Client,
    base_url: String,
    token: String,
}

impl TelegramBot {
    pub fn new(client: Client, token: &str) -> Self {
        Self::with_api_url(client, DEFAULT_API_URL, token)
    }

    pub fn with_api_url(client: Client, api_url: &str, token: &str) -> Self {
        TelegramBot {
            client,
            base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
            token: token.to_string(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    /// The URL with the token masked, for logging.
    fn redact(&self, url: &str) -> String {
        if self.token.is_empty() {
            return url.to_string();
        }
        url.replace(&self.token, "<token>")
    }
}

impl Bot for TelegramBot {
    fn compose(&self, request: &SendRequest) -> Result<ComposedRequest, SendError> {
        let url = self.method_url(request.kind.method());
        debug!("Composing {:?} request for {}", request.kind, self.redact(&url));

        let Some(field) = request.kind.attachment_field() else {
            if request.thumb.is_some() {
                debug!("Ignoring thumbnail for a text message");
            }
            let text = request
                .content
                .to_str()
                .ok_or_else(|| SendError::usage("The message text must be valid UTF-8"))?;
            return Ok(ComposedRequest {
                url,
                payload: Payload::Json(SendMessageBody {
                    chat_id: request.chat_id.clone(),
                    text: text.to_string(),
                }),
                thumb_error: None,
            });
        };

        let mut parts = vec![FormPart::text("chat_id", &request.chat_id)];
        form::attach_file(&mut parts, field, Path::new(&request.content))?;

        let thumb_error = match &request.thumb {
            Some(thumb) => form::attach_file(&mut parts, "thumb", thumb).err(),
            None => None,
        };
        if let Some(err) = &thumb_error {
            warn!("Sending without thumbnail: {}", err);
        }
        debug!(
            "Form fields: {:?}",
            parts.iter().map(FormPart::name).collect::<Vec<_>>()
        );

        Ok(ComposedRequest {
            url,
            payload: Payload::Multipart(parts),
            thumb_error,
        })
    }

    fn dispatch(&self, request: ComposedRequest) -> Result<(), SendError> {
        let content_type = request.content_type();
        debug!("Posting {} to {}", content_type, self.redact(&request.url));

        let builder = self.client.post(&request.url);
        let builder = match request.payload {
            Payload::Json(body) => builder.header(CONTENT_TYPE, content_type).json(&body),
            Payload::Multipart(parts) => builder.multipart(form::into_form(parts)?),
        };

        let response = builder.send().map_err(|e| {
            error!("Request to {} failed: {}", self.redact(&request.url), e);
            // reqwest keeps the full URL in its error, token included
            SendError::Network(e.without_url())
        })?;
        check_response(response)
    }
}

/// Accepts only `200 OK`; any other status comes back as [`SendError::Api`]
/// carrying the raw response body.
pub fn check_response(response: Response) -> Result<(), SendError> {
    let status = response.status();

    if status == StatusCode::OK {
        // the body is drained but its content doesn't change the outcome
        if let Err(e) = response.bytes() {
            debug!("Could not read the success response body: {}", e);
        }
        info!("Telegram accepted the message: {}", status);
        return Ok(());
    }

    let body = response.text()?;
    error!("Telegram rejected the message: {} - {}", status, body);
    Err(SendError::Api { status, body })
}
