// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Handler that writes each message as one line to a file or stdout.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tracing::Instrument;

use crate::errors::HandlerError;
use crate::handlers::filter::MessageFilter;
use crate::handlers::queued::{Inbox, QueueOptions, QueuedHandler};
use crate::message::{LogMessage, Message};
use crate::observability::messages::{handler::SinkWriteFailed, StructuredLog};
use crate::traits::Handler;

/// Line format used by [`WriterHandler`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteFormat {
    /// `<PRI>SECONDS HOST TAG: CONTENT`
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl WriteFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "text" => Some(WriteFormat::Text),
            "json" => Some(WriteFormat::Json),
            _ => None,
        }
    }

    fn render(self, message: &LogMessage) -> Result<String, HandlerError> {
        let mut line = match self {
            WriteFormat::Text => message.to_text_line(),
            WriteFormat::Json => serde_json::to_string(message)?,
        };
        line.push('\n');
        Ok(line)
    }
}

/// Where a [`WriterHandler`] sends its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteTarget {
    Stdout,
    /// Appends to the file, creating it if needed.
    File(PathBuf),
}

impl WriteTarget {
    /// `-` means stdout, anything else is a file path.
    pub fn from_option(path: Option<&str>) -> Self {
        match path {
            None | Some("-") => WriteTarget::Stdout,
            Some(path) => WriteTarget::File(PathBuf::from(path)),
        }
    }
}

type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

pub struct WriterHandler {
    base: QueuedHandler,
}

impl WriterHandler {
    /// Open the target and spawn the writer task.
    pub async fn open(
        name: impl Into<String>,
        options: QueueOptions,
        filter: Option<MessageFilter>,
        target: WriteTarget,
        format: WriteFormat,
    ) -> Result<Self, HandlerError> {
        let writer: BoxedWriter = match &target {
            WriteTarget::Stdout => Box::new(tokio::io::stdout()),
            WriteTarget::File(path) => Box::new(open_append(path).await?),
        };
        Ok(Self::with_writer(name, options, filter, writer, format))
    }

    /// Spawn the writer task over an arbitrary async writer.
    pub fn with_writer<W>(
        name: impl Into<String>,
        options: QueueOptions,
        filter: Option<MessageFilter>,
        writer: W,
        format: WriteFormat,
    ) -> Self
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let (base, inbox) = QueuedHandler::new(name, options, filter);
        let span = inbox.span().clone();
        tokio::spawn(Self::consume(inbox, BufWriter::new(writer), format).instrument(span));
        Self { base }
    }

    async fn consume<W>(mut inbox: Inbox, mut writer: BufWriter<W>, format: WriteFormat) -> Result<(), HandlerError>
    where
        W: AsyncWrite + Send + Unpin,
    {
        while let Some(message) = inbox.get().await {
            if let Err(e) = write_line(&mut writer, &message, format).await {
                SinkWriteFailed { handler: inbox.name(), error: &e }.log();
            }
        }

        if let Err(e) = writer.flush().await {
            let e = HandlerError::from(e);
            SinkWriteFailed { handler: inbox.name(), error: &e }.log();
        }
        // the sink must be closed before shutdown is confirmed
        drop(writer);
        inbox.end()
    }
}

async fn open_append(path: &Path) -> Result<tokio::fs::File, HandlerError> {
    let file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    Ok(file)
}

async fn write_line<W>(writer: &mut BufWriter<W>, message: &LogMessage, format: WriteFormat) -> Result<(), HandlerError>
where
    W: AsyncWrite + Send + Unpin,
{
    let line = format.render(message)?;
    writer.write_all(line.as_bytes()).await?;
    Ok(())
}

#[async_trait]
impl Handler for WriterHandler {
    async fn handle(&self, message: Option<Message>) -> Result<Option<Message>, HandlerError> {
        self.base.handle(message).await
    }

    fn name(&self) -> &str {
        self.base.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Severity;
    use std::time::{Duration, UNIX_EPOCH};

    fn stamped(content: &str) -> Message {
        LogMessage::new(content)
            .with_timestamp(UNIX_EPOCH + Duration::from_secs(100))
            .with_tag("app")
            .into_message()
    }

    #[tokio::test]
    async fn test_text_lines_are_flushed_by_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.log");

        let handler = WriterHandler::open(
            "file",
            QueueOptions::new(8, false),
            None,
            WriteTarget::File(path.clone()),
            WriteFormat::Text,
        )
        .await
        .unwrap();

        handler.handle(Some(stamped("first"))).await.unwrap();
        handler.handle(Some(stamped("second"))).await.unwrap();
        handler.handle(None).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "<13>100 - app: first\n<13>100 - app: second\n");
    }

    #[tokio::test]
    async fn test_json_lines_round_trip_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");

        let handler = WriterHandler::open(
            "json",
            QueueOptions::default(),
            None,
            WriteTarget::File(path.clone()),
            WriteFormat::Json,
        )
        .await
        .unwrap();

        let msg = LogMessage::new("payment failed")
            .with_severity(Severity::Error)
            .with_field("order", 42)
            .into_message();
        handler.handle(Some(msg)).await.unwrap();
        handler.handle(None).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: LogMessage = serde_json::from_str(written.trim_end()).unwrap();
        assert_eq!(parsed.content, "payment failed");
        assert_eq!(parsed.severity, Severity::Error);
        assert_eq!(parsed.fields["order"], 42);
    }

    #[tokio::test]
    async fn test_appends_to_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("existing.log");
        std::fs::write(&path, "old\n").unwrap();

        let handler = WriterHandler::open(
            "append",
            QueueOptions::default(),
            None,
            WriteTarget::File(path.clone()),
            WriteFormat::Text,
        )
        .await
        .unwrap();
        handler.handle(Some(stamped("new"))).await.unwrap();
        handler.handle(None).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("old\n"));
        assert!(written.ends_with("app: new\n"));
    }

    #[test]
    fn test_target_from_option() {
        assert_eq!(WriteTarget::from_option(None), WriteTarget::Stdout);
        assert_eq!(WriteTarget::from_option(Some("-")), WriteTarget::Stdout);
        assert_eq!(
            WriteTarget::from_option(Some("/tmp/x.log")),
            WriteTarget::File(PathBuf::from("/tmp/x.log"))
        );
    }
}
