use std::{
    ffi::OsString,
    io::{self, Write},
    iter,
    path::PathBuf,
};

use clap::Parser;
use log::{debug, warn};
use reqwest::blocking::Client;

use crate::{
    error::SendError,
    telegram::{Bot, DEFAULT_API_URL, SendKind, SendRequest, api::TelegramBot},
};

pub const USAGE: &str = "\
⚙️ Tool usage instructions:
  <TOKEN> <CHAT_ID> text \"Text message\"  - To send a text message.
  <TOKEN> <CHAT_ID> file \"File path\"   - To send a file.
  <TOKEN> <CHAT_ID> file \"File path\" \"Thumbnail path\" - To send a file with a thumbnail.
  <TOKEN> <CHAT_ID> photo \"Photo path\" - To send a photo.
  <TOKEN> <CHAT_ID> photo \"Photo path\" \"Thumbnail path\" - To send a photo with a thumbnail.";

pub const BAD_USAGE: &str = "Incorrect command usage. Use --help to learn more.";

/// Positional arguments only. `parse_request` puts a `--` in front of them so
/// values that look like flags (`--`, `-100123`, `-hi`) are taken verbatim.
#[derive(Parser, Debug)]
#[command(name = "tg-send", disable_help_flag = true, disable_version_flag = true)]
struct Args {
    token: String,
    chat_id: String,
    kind: String,
    /// Message text or file path; may not be UTF-8 when it is a path.
    content: OsString,
    thumb: Option<OsString>,
    #[arg(hide = true)]
    rest: Vec<OsString>,
}

/// Parses `argv` (binary name first) into the bot token and what to send.
pub fn parse_request(argv: &[OsString]) -> Result<(String, SendRequest), SendError> {
    let escaped = argv
        .iter()
        .take(1)
        .cloned()
        .chain(iter::once(OsString::from("--")))
        .chain(argv.iter().skip(1).cloned());
    let args = Args::try_parse_from(escaped).map_err(|e| {
        debug!("clap rejected arguments: {:?}", e.kind());
        SendError::usage(BAD_USAGE)
    })?;
    if !args.rest.is_empty() {
        debug!("Ignoring {} extra argument(s)", args.rest.len());
    }

    for (what, value) in [("token", &args.token), ("chat id", &args.chat_id)] {
        if value.trim().is_empty() {
            return Err(SendError::usage(format!("The {what} must not be empty")));
        }
    }
    let blank_content = args
        .content
        .to_str()
        .map_or(args.content.is_empty(), |content| content.trim().is_empty());
    if blank_content {
        return Err(SendError::usage("The content must not be empty"));
    }

    let kind: SendKind = args.kind.parse()?;
    let thumb = match (kind, args.thumb) {
        (SendKind::Text, Some(_)) => {
            warn!("Thumbnails only apply to photos and files, ignoring it");
            None
        }
        (_, Some(thumb)) if !thumb.is_empty() => Some(PathBuf::from(thumb)),
        _ => None,
    };

    Ok((
        args.token,
        SendRequest {
            chat_id: args.chat_id,
            kind,
            content: args.content,
            thumb,
        },
    ))
}

/// Composes, sends and reports one message, writing every outcome to `out`.
pub fn deliver<B: Bot, W: Write>(bot: &B, request: &SendRequest, out: &mut W) -> io::Result<()> {
    let composed = match bot.compose(request) {
        Ok(composed) => composed,
        Err(err) => return writeln!(out, "❌ {err}"),
    };
    if let Some(err) = &composed.thumb_error {
        writeln!(out, "⚠️ Warning: Failed to add thumbnail: {err}")?;
    }

    match bot.dispatch(composed) {
        Ok(()) => writeln!(out, "✅ Sent successfully!"),
        Err(err) => writeln!(out, "❌ {err}"),
    }
}

pub struct App {
    client: Client,
    api_url: String,
}

impl App {
    pub fn new(client: Client) -> Self {
        Self::with_api_url(client, DEFAULT_API_URL)
    }

    pub fn with_api_url(client: Client, api_url: &str) -> Self {
        App {
            client,
            api_url: api_url.to_string(),
        }
    }

    pub fn run<I, W>(&self, argv: I, out: &mut W) -> io::Result<()>
    where
        I: IntoIterator,
        I::Item: Into<OsString>,
        W: Write,
    {
        let argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();

        if argv.get(1).is_some_and(|arg| arg == "--help") {
            return writeln!(out, "{USAGE}");
        }
        if argv.len() < 5 {
            return writeln!(out, "❌ {BAD_USAGE}");
        }

        let (token, request) = match parse_request(&argv) {
            Ok(parsed) => parsed,
            Err(err) => return writeln!(out, "❌ {err}"),
        };

        let bot = TelegramBot::with_api_url(self.client.clone(), &self.api_url, &token);
        deliver(&bot, &request, out)
    }
}
