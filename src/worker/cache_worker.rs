use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use crate::worker::policy::OfflineCache;
use crate::worker::protocol::{WorkerCommand, WorkerEvent};

/// Runs an [`OfflineCache`] on its own thread. The window only ever sees
/// the two channels, plus a wake-up call after every event.
pub struct CacheWorker {
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerEvent>,
    cache: OfflineCache,
    wake: Box<dyn Fn() + Send>,
}

pub struct WorkerHandle {
    pub cmd_tx: Sender<WorkerCommand>,
    pub event_rx: Receiver<WorkerEvent>,
}

impl WorkerHandle {
    pub fn send(&self, cmd: WorkerCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            log::warn!("Cache worker has stopped; command dropped");
        }
    }
}

impl CacheWorker {
    /// `wake` runs on the worker thread each time an event is queued.
    pub fn spawn(
        cache: OfflineCache,
        wake: impl Fn() + Send + 'static,
    ) -> io::Result<WorkerHandle> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::Builder::new()
            .name("cache-worker".into())
            .spawn(move || {
                let mut worker = CacheWorker {
                    rx: cmd_rx,
                    tx: event_tx,
                    cache,
                    wake: Box::new(wake),
                };
                worker.run();
            })?;

        Ok(WorkerHandle { cmd_tx, event_rx })
    }

    pub fn run(&mut self) {
        while let Ok(cmd) = self.rx.recv() {
            let event = self.handle(cmd);
            if self.tx.send(event).is_err() {
                break;
            }
            (self.wake)();
        }
        log::debug!("Cache worker {} shutting down", self.cache.name());
    }

    fn handle(&self, cmd: WorkerCommand) -> WorkerEvent {
        match cmd {
            WorkerCommand::Install => match self.cache.install() {
                Ok(report) => {
                    log::info!(
                        "Installed {}: {} cached, {} missed",
                        self.cache.name(),
                        report.cached.len(),
                        report.missed.len()
                    );
                    WorkerEvent::Installed(report)
                }
                Err(e) => failed("install", e),
            },

            WorkerCommand::Activate => match self.cache.activate() {
                Ok(deleted) => WorkerEvent::Activated { deleted },
                Err(e) => failed("activate", e),
            },

            WorkerCommand::Fetch(request) => match self.cache.handle(&request) {
                Ok(response) => WorkerEvent::Fetched(response),
                Err(e) => failed(request.url.as_str(), e),
            },
        }
    }
}

fn failed(what: &str, reason: impl std::fmt::Display) -> WorkerEvent {
    log::warn!("Cache worker: {what} failed: {reason}");
    WorkerEvent::Failed {
        what: what.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::cache::CacheStorage;
    use crate::worker::fetch::testing::FakeFetcher;
    use crate::worker::fetch::{AssetRequest, ResponseSource};
    use crate::worker::policy::{cache_name, CACHE_VERSION};
    use reqwest::Url;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    const BASE: &str = "http://localhost:8080/eldritch-v2/";

    fn recv(handle: &WorkerHandle) -> WorkerEvent {
        handle
            .event_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("worker event")
    }

    #[test]
    fn install_activate_fetch_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let storage = CacheStorage::new(dir.path().to_path_buf());
        storage.open(&cache_name(CACHE_VERSION - 1)).unwrap();

        let root = Url::parse(BASE).unwrap();
        let fetcher = FakeFetcher::online(&[(root.as_str(), "<html>shell</html>")]);
        let cache = OfflineCache::new(storage, Box::new(fetcher), root.clone(), CACHE_VERSION);
        let wakes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&wakes);
        let handle = CacheWorker::spawn(cache, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        handle.send(WorkerCommand::Install);
        handle.send(WorkerCommand::Activate);
        handle.send(WorkerCommand::Fetch(AssetRequest::navigate(root.clone())));

        match recv(&handle) {
            WorkerEvent::Installed(report) => assert_eq!(report.cached, vec![root.to_string()]),
            other => panic!("unexpected {other:?}"),
        }
        match recv(&handle) {
            WorkerEvent::Activated { deleted } => {
                assert_eq!(deleted, vec![cache_name(CACHE_VERSION - 1)])
            }
            other => panic!("unexpected {other:?}"),
        }

        match recv(&handle) {
            WorkerEvent::Fetched(resp) => assert_eq!(resp.body, b"<html>shell</html>"),
            other => panic!("unexpected {other:?}"),
        }

        // The wake-up follows the send, so give the last one a moment.
        for _ in 0..100 {
            if wakes.load(Ordering::SeqCst) == 3 {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(wakes.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn offline_navigation_still_answers() {
        let dir = tempfile::tempdir().unwrap();
        let root = Url::parse(BASE).unwrap();
        let cache = OfflineCache::new(
            CacheStorage::new(dir.path().to_path_buf()),
            Box::new(FakeFetcher::default()),
            root.clone(),
            CACHE_VERSION,
        );
        let handle = CacheWorker::spawn(cache, || {}).unwrap();

        handle.send(WorkerCommand::Fetch(AssetRequest::navigate(root)));
        match recv(&handle) {
            WorkerEvent::Fetched(resp) => assert_eq!(resp.source, ResponseSource::Offline),
            other => panic!("unexpected {other:?}"),
        }
    }
}
