use std::{
    collections::HashMap,
    fmt::Display,
    io,
    path::{Path, PathBuf},
    sync::{atomic::{AtomicBool, Ordering}, Arc},
    time::{Duration, Instant, SystemTime},
};

use walkdir::WalkDir;

const POLL_INTERVAL: Duration = Duration::from_millis(250);
const DEBOUNCE: Duration = Duration::from_millis(100);
const SOURCE_EXTENSION: &str = "ta5bees";

#[derive(Debug, Clone, PartialEq)]
pub enum WatchTarget {
    File(PathBuf),
    /// Every source file below the directory, recursively.
    Directory(PathBuf)
}

impl Display for WatchTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Directory(path) => write!(f, "{}/**/*.{SOURCE_EXTENSION}", path.display())
        }
    }
}

type Snapshot = HashMap<PathBuf, SystemTime>;

impl WatchTarget {
    /// Modification times of the watched files. Files that cannot be read
    /// are left out, so their reappearance counts as a change.
    pub fn snapshot(&self) -> Snapshot {
        match self {
            Self::File(path) => modified(path)
                .map(|time| HashMap::from([(path.clone(), time)]))
                .unwrap_or_default(),
            Self::Directory(dir) => WalkDir::new(dir)
                .into_iter()
                .filter_map(Result::ok)
                .filter(|entry| entry.file_type().is_file())
                .filter(|entry| entry.path().extension().is_some_and(|ext| ext == SOURCE_EXTENSION))
                .filter_map(|entry| modified(entry.path()).map(|time| (entry.into_path(), time)))
                .collect()
        }
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|meta| meta.modified()).ok()
}

/// Polling watcher stopped by Ctrl-C.
pub struct Watcher {
    target: WatchTarget,
    stop: Arc<AtomicBool>
}

impl Watcher {
    pub fn new(target: WatchTarget) -> io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = stop.clone();

        ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err.to_string()))?;

        Ok(Self { target, stop })
    }

    pub fn target(&self) -> &WatchTarget {
        &self.target
    }

    /// Calls `action` once per burst of changes, after the watched files
    /// have been quiet for the debounce period.
    pub fn run(&self, mut action: impl FnMut()) -> io::Result<()> {
        let mut last = self.target.snapshot();
        let mut changed_at: Option<Instant> = None;

        while !self.stop.load(Ordering::SeqCst) {
            std::thread::sleep(POLL_INTERVAL);

            let current = self.target.snapshot();

            if current != last {
                log::debug!("change detected in {}", self.target);

                last = current;
                changed_at = Some(Instant::now());
                continue;
            }

            if changed_at.is_some_and(|at| at.elapsed() >= DEBOUNCE) {
                changed_at = None;
                action();
            }
        }

        log::debug!("stopped watching {}", self.target);

        Ok(())
    }
}

#[cfg(test)]
mod tests;
