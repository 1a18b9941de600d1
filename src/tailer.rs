/// Tails the tracker feed file, emitting new lines as they are written.
///
/// Uses the `notify` crate to detect modifications of the feed file, then
/// reads from the last known byte offset. Only complete lines are consumed;
/// a half-written trailing line is picked up once its newline arrives.
///
/// Rotation handling: the scraper truncates or recreates the feed when it
/// restarts. If the file shrank below our position, or the path now points
/// at a different file (inode on Unix, creation time elsewhere), we restart
/// from byte 0.
///
/// Lines are read as raw bytes and decoded lossily: a corrupt line is passed
/// on (and rejected by the feed parser) but never blocks the lines after it.
///
/// Everything here blocks; `run` belongs on a dedicated thread
/// (`tokio::task::spawn_blocking`), never on an async worker.
use anyhow::Result;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::borrow::Cow;
use std::fs::{File, Metadata};
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::PathBuf;
use std::sync::mpsc as std_mpsc;
use std::time::Duration;
use tokio::sync::mpsc::Sender;

pub struct TailerState {
    path:     PathBuf,
    position: u64,
    identity: Option<u64>,
}

impl TailerState {
    fn new(path: PathBuf) -> Self {
        Self { path, position: 0, identity: None }
    }

    /// Sends every complete line past the current position.
    /// Returns false once the receiving side is gone.
    fn read_new_lines(&mut self, tx: &Sender<String>) -> Result<bool> {
        let metadata = match std::fs::metadata(&self.path) {
            Ok(m) => m,
            Err(_) => return Ok(true), // not created yet
        };
        let file_len = metadata.len();
        let identity = file_identity(&metadata);

        let replaced = matches!((self.identity, identity), (Some(old), Some(new)) if old != new);
        if replaced || file_len < self.position {
            tracing::info!("Feed rotation detected, restarting from byte 0");
            self.position = 0;
        }
        self.identity = identity;
        if file_len == self.position {
            return Ok(true);
        }

        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(self.position))?;
        let mut reader = BufReader::new(file);
        let mut buf    = Vec::new();
        loop {
            buf.clear();
            let read = match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) => {
                    tracing::warn!("Tailer read error: {}", e);
                    break;
                }
            };
            if buf.last() != Some(&b'\n') {
                break; // partial write
            }
            self.position += read as u64;

            let line = String::from_utf8_lossy(&buf);
            if matches!(line, Cow::Owned(_)) {
                tracing::warn!("Feed line at byte {} is not valid UTF-8", self.position - read as u64);
            }
            let text = line.trim_end_matches(['\r', '\n']);
            if text.is_empty() {
                continue;
            }
            if tx.blocking_send(text.to_owned()).is_err() {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[cfg(unix)]
fn file_identity(metadata: &Metadata) -> Option<u64> {
    use std::os::unix::fs::MetadataExt;
    Some(metadata.ino())
}

#[cfg(not(unix))]
fn file_identity(metadata: &Metadata) -> Option<u64> {
    metadata
        .created()
        .ok()
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|d| d.as_nanos() as u64)
}

pub fn run(feed_path: PathBuf, tx: Sender<String>) -> Result<()> {
    tracing::info!("Tailer starting: {:?}", feed_path);

    let watch_dir = feed_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| std::path::Path::new("."))
        .to_path_buf();

    let (fs_tx, fs_rx) = std_mpsc::channel::<notify::Result<Event>>();
    let config = notify::Config::default().with_poll_interval(Duration::from_millis(500));
    let mut watcher = RecommendedWatcher::new(fs_tx, config)?;
    watcher.watch(&watch_dir, RecursiveMode::NonRecursive)?;

    let mut state = TailerState::new(feed_path.clone());

    // Lines already in the file when we start
    if !state.read_new_lines(&tx)? {
        return Ok(());
    }

    loop {
        match fs_rx.recv() {
            Ok(Ok(Event { kind: EventKind::Modify(_) | EventKind::Create(_), paths, .. })) => {
                if paths.iter().any(|p| p.file_name() == feed_path.file_name()) {
                    match state.read_new_lines(&tx) {
                        Ok(true) => {}
                        Ok(false) => break,
                        Err(e) => tracing::warn!("Tailer read error: {}", e),
                    }
                }
            }
            Ok(Ok(_)) => {}
            Ok(Err(e)) => tracing::error!("Watcher error: {}", e),
            Err(_) => {
                tracing::warn!("Watcher channel closed, tailer exiting");
                break;
            }
        }
    }
    Ok(())
}
