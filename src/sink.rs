/// Delivery side of the pipeline: posts announcements to their channels.
///
/// Chat transports cap message length, so every announcement is split with
/// `split_message` before it is written. The binary writes to stdout, one
/// `#channel (guild): text` line per chunk; a chat gateway would replace the
/// writer.
///
/// The last `RECENT_CAPACITY` announcements are kept in a ring buffer so
/// they can be inspected (and tested) without re-reading the output.
use crate::{engine::Announcement, messages::html::split_message};
use anyhow::Result;
use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::Receiver;

pub const RECENT_CAPACITY: usize = 50;

/// Shared ring buffer of delivered announcements, oldest first.
#[derive(Debug, Clone, Default)]
pub struct RecentAnnouncements {
    inner: Arc<Mutex<VecDeque<Announcement>>>,
}

impl RecentAnnouncements {
    fn push(&self, announcement: Announcement) {
        let mut q = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        q.push_back(announcement);
        if q.len() > RECENT_CAPACITY {
            q.pop_front();
        }
    }

    pub fn recent(&self) -> Vec<Announcement> {
        let q = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        q.iter().cloned().collect()
    }
}

pub struct Sink<W: Write> {
    writer: W,
    limit:  usize,
    recent: RecentAnnouncements,
}

impl<W: Write> Sink<W> {
    pub fn new(writer: W, limit: usize) -> Self {
        Self { writer, limit, recent: RecentAnnouncements::default() }
    }

    /// Handle for reading delivered announcements from elsewhere.
    pub fn recent(&self) -> RecentAnnouncements {
        self.recent.clone()
    }

    pub fn deliver(&mut self, announcement: Announcement) -> Result<()> {
        let chunks = split_message(&announcement.content, self.limit);
        for chunk in &chunks {
            writeln!(self.writer, "#{} ({}): {}", announcement.channel, announcement.guild_id, chunk)?;
        }
        self.writer.flush()?;
        tracing::info!(
            "Delivered {:?} to #{} in {} ({} part(s))",
            announcement.kind,
            announcement.channel,
            announcement.guild_id,
            chunks.len()
        );
        self.recent.push(announcement);
        Ok(())
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

/// Drains the announcement channel until every sender is gone.
pub async fn run<W: Write>(mut rx: Receiver<Announcement>, mut sink: Sink<W>) -> Result<Sink<W>> {
    while let Some(announcement) = rx.recv().await {
        if let Err(e) = sink.deliver(announcement) {
            tracing::warn!("Failed to deliver announcement: {}", e);
        }
    }
    Ok(sink)
}
