use std::path::PathBuf;

use chrono::{DateTime, Local};
use tracing::info;

use crate::error::{Result, SummaryError};

#[derive(Debug, Clone)]
pub struct Message {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl Message {
    pub fn new(from: &str, to: &[String], subject: &str, body: String) -> Result<Self> {
        if to.is_empty() {
            return Err(SummaryError::Notify("no recipients".to_string()));
        }
        for addr in to.iter().map(String::as_str).chain(std::iter::once(from)) {
            if !looks_like_address(addr) {
                return Err(SummaryError::Notify(format!("invalid address {addr:?}")));
            }
        }
        Ok(Self {
            from: from.to_string(),
            to: to.to_vec(),
            subject: subject.to_string(),
            body,
        })
    }

    /// RFC 5322 text with CRLF line endings.
    pub fn to_eml(&self, date: DateTime<Local>) -> String {
        let mut out = String::new();
        out.push_str(&format!("Date: {}\r\n", date.to_rfc2822()));
        out.push_str(&format!("From: {}\r\n", self.from));
        out.push_str(&format!("To: {}\r\n", self.to.join(", ")));
        out.push_str(&format!("Subject: {}\r\n", self.subject));
        out.push_str("MIME-Version: 1.0\r\n");
        out.push_str("Content-Type: text/plain; charset=utf-8\r\n\r\n");
        for line in self.body.lines() {
            out.push_str(line);
            out.push_str("\r\n");
        }
        out
    }
}

fn looks_like_address(addr: &str) -> bool {
    match addr.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !addr.chars().any(|c| c.is_whitespace() || c == ',')
        }
        None => false,
    }
}

/// Delivery of a rendered summary.
pub trait Notifier {
    fn send(&self, message: &Message) -> Result<()>;
}

/// Drops each message as an `.eml` file into a directory for a mail agent to pick up.
pub struct OutboxNotifier {
    dir: PathBuf,
}

impl OutboxNotifier {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }
}

impl Notifier for OutboxNotifier {
    fn send(&self, message: &Message) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| SummaryError::Notify(format!("creating {}: {e}", self.dir.display())))?;
        let now = Local::now();
        let path = self.dir.join(format!("summary-{}.eml", now.format("%Y%m%d-%H%M%S%.6f")));
        std::fs::write(&path, message.to_eml(now))
            .map_err(|e| SummaryError::Notify(format!("writing {}: {e}", path.display())))?;
        info!(path = %path.display(), recipients = message.to.len(), "queued summary email");
        Ok(())
    }
}

pub struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn send(&self, message: &Message) -> Result<()> {
        print!("{}", message.to_eml(Local::now()).replace("\r\n", "\n"));
        Ok(())
    }
}
