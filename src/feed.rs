//! Live habit feed: a background poller that pushes a fresh snapshot of an
//! owner's habits every time the database changes.
//!
//! Only one feed may be live per process. [`FeedSession`] owns it and takes
//! care of releasing the old feed before a new owner is subscribed.

use crate::db::pool::DbPool;
use crate::db::store::HabitStore;
use crate::errors::{AppError, AppResult};
use crate::models::Habit;
use rusqlite::Connection;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

static FEED_ACTIVE: AtomicBool = AtomicBool::new(false);

const STOP_CHECK: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// Full, ordered list of the owner's habits.
    Habits(Vec<Habit>),
    Failed(String),
}

/// A running subscription to one owner's habits.
pub struct HabitFeed {
    owner_id: String,
    db_path: String,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    events: Receiver<FeedEvent>,
    live: bool,
}

impl HabitFeed {
    /// Start polling `db_path` every `interval`.
    ///
    /// Fails with [`AppError::FeedBusy`] while another feed is live.
    pub fn start(db_path: &str, owner_id: &str, interval: Duration) -> AppResult<Self> {
        if FEED_ACTIVE
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(AppError::FeedBusy(owner_id.to_string()));
        }

        let pool = match DbPool::new(db_path) {
            Ok(p) => p,
            Err(e) => {
                FEED_ACTIVE.store(false, Ordering::SeqCst);
                return Err(e);
            }
        };

        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);
        let owner = owner_id.to_string();

        let handle = thread::Builder::new()
            .name("habit-feed".into())
            .spawn(move || poll_loop(pool, &owner, interval, &thread_stop, &tx));

        match handle {
            Ok(handle) => {
                debug!(owner = owner_id, "habit feed started");
                Ok(Self {
                    owner_id: owner_id.to_string(),
                    db_path: db_path.to_string(),
                    stop,
                    handle: Some(handle),
                    events: rx,
                    live: true,
                })
            }
            Err(e) => {
                FEED_ACTIVE.store(false, Ordering::SeqCst);
                Err(AppError::Io(e))
            }
        }
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Wait up to `timeout` for the next event. `None` on timeout or once
    /// the poller has gone away.
    pub fn next_event(&self, timeout: Duration) -> Option<FeedEvent> {
        match self.events.recv_timeout(timeout) {
            Ok(ev) => Some(ev),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the poller and free the process-wide slot. Idempotent.
    fn shutdown(&mut self) {
        if !self.live {
            return;
        }
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            warn!(owner = %self.owner_id, "habit feed thread panicked");
        }
        self.live = false;
        FEED_ACTIVE.store(false, Ordering::SeqCst);
        debug!(owner = %self.owner_id, "habit feed released");
    }
}

impl Drop for HabitFeed {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn data_version(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("PRAGMA data_version", [], |row| row.get(0))
}

fn poll_loop(
    mut pool: DbPool,
    owner_id: &str,
    interval: Duration,
    stop: &AtomicBool,
    tx: &Sender<FeedEvent>,
) {
    let mut last_version: Option<i64> = None;

    while !stop.load(Ordering::SeqCst) {
        let event = match data_version(&pool.conn) {
            Ok(v) if last_version == Some(v) => None,
            Ok(v) => {
                debug!(owner = owner_id, version = v, "habit feed refresh");
                last_version = Some(v);
                Some(match pool.fetch_habits(owner_id) {
                    Ok(habits) => FeedEvent::Habits(habits),
                    Err(e) => FeedEvent::Failed(e.to_string()),
                })
            }
            Err(e) => Some(FeedEvent::Failed(e.to_string())),
        };

        // receiver gone: nobody is listening any more
        if let Some(ev) = event
            && tx.send(ev).is_err()
        {
            break;
        }

        let started = Instant::now();
        while started.elapsed() < interval && !stop.load(Ordering::SeqCst) {
            thread::sleep(STOP_CHECK.min(interval));
        }
    }
}

/// Holds at most one live [`HabitFeed`].
#[derive(Default)]
pub struct FeedSession {
    current: Option<HabitFeed>,
}

impl FeedSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to `owner_id`. Re-acquiring the live owner keeps the
    /// running feed; any other owner replaces it.
    pub fn acquire(
        &mut self,
        db_path: &str,
        owner_id: &str,
        interval: Duration,
    ) -> AppResult<&HabitFeed> {
        let same = self
            .current
            .as_ref()
            .is_some_and(|f| f.owner_id() == owner_id && f.db_path() == db_path);

        if !same {
            self.release();
            let feed = HabitFeed::start(db_path, owner_id, interval)?;
            self.current = Some(feed);
        }

        self.current
            .as_ref()
            .ok_or_else(|| AppError::Other("habit feed not started".into()))
    }

    pub fn release(&mut self) {
        if let Some(mut feed) = self.current.take() {
            feed.shutdown();
        }
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }
}
