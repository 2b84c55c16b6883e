use std::{fs::File, io, path::Path};

use log::debug;
use reqwest::blocking::multipart::{Form, Part};

use crate::error::SendError;

const ATTACHMENT_MIME: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        bytes: Vec<u8>,
    },
}

impl FormPart {
    pub fn text(name: &str, value: &str) -> Self {
        FormPart::Text {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FormPart::Text { name, .. } | FormPart::File { name, .. } => name,
        }
    }
}

/// Reads `path` into a file part named `field`, filed under the path's base name.
///
/// Nothing is pushed when the file can't be opened or read.
pub fn attach_file(parts: &mut Vec<FormPart>, field: &str, path: &Path) -> Result<(), SendError> {
    let mut file = File::open(path).map_err(|source| SendError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| field.to_string());

    let mut bytes = Vec::new();
    io::copy(&mut file, &mut bytes).map_err(|source| SendError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Attached {} ({} bytes) as '{}'", file_name, bytes.len(), field);

    parts.push(FormPart::File {
        name: field.to_string(),
        file_name,
        bytes,
    });
    Ok(())
}

/// Turns the collected parts into a form the blocking client can send.
pub fn into_form(parts: Vec<FormPart>) -> Result<Form, reqwest::Error> {
    let mut form = Form::new();
    for part in parts {
        form = match part {
            FormPart::Text { name, value } => form.text(name, value),
            FormPart::File {
                name,
                file_name,
                bytes,
            } => {
                let part = Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str(ATTACHMENT_MIME)?;
                form.part(name, part)
            }
        };
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_attach_file_reads_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        let content: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
        File::create(&path).unwrap().write_all(&content).unwrap();

        let mut parts = Vec::new();
        attach_file(&mut parts, "document", &path).unwrap();

        assert_eq!(
            parts,
            vec![FormPart::File {
                name: "document".to_string(),
                file_name: "report.pdf".to_string(),
                bytes: content,
            }]
        );
    }

    #[test]
    fn test_attach_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.png");

        let mut parts = vec![FormPart::text("chat_id", "42")];
        let err = attach_file(&mut parts, "photo", &path).unwrap_err();

        match err {
            SendError::FileAccess { path: failed, .. } => assert_eq!(failed, path),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(parts.len(), 1);
    }

    #[test]
    fn test_attach_directory_fails_without_part() {
        let dir = tempfile::tempdir().unwrap();

        let mut parts = Vec::new();
        let err = attach_file(&mut parts, "document", dir.path()).unwrap_err();

        // Opening a directory succeeds on unix and fails on reading; windows rejects the open.
        assert!(matches!(
            err,
            SendError::Io { .. } | SendError::FileAccess { .. }
        ));
        assert!(parts.is_empty());
    }

    #[test]
    fn test_into_form_keeps_boundary() {
        let parts = vec![
            FormPart::text("chat_id", "42"),
            FormPart::File {
                name: "document".to_string(),
                file_name: "a.txt".to_string(),
                bytes: b"hello".to_vec(),
            },
        ];
        let form = into_form(parts).unwrap();
        assert!(!form.boundary().is_empty());
    }
}
