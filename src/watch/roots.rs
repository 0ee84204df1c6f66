#[cfg(test)]
use std::path::Path;
use std::path::PathBuf;

use notify::{RecursiveMode, Watcher};

use crate::{debug, log};

/// One directory the watcher should cover.
#[derive(Debug)]
struct Root {
    path: PathBuf,
    attached: bool,
}

/// Source and load-path directories, with their attach state.
///
/// A root that is missing at startup, or that is deleted and recreated
/// (`git checkout`, `rm -r _sass && cp -r ...`), gets attached as soon as
/// it exists again.
pub(super) struct WatchRoots {
    roots: Vec<Root>,
}

impl WatchRoots {
    pub(super) fn new(paths: Vec<PathBuf>) -> Self {
        let roots = paths
            .into_iter()
            .map(|path| Root { path, attached: false })
            .collect();
        Self { roots }
    }

    /// Attach every root that exists now. Fails only if the watcher
    /// rejects an existing directory.
    pub(super) fn attach_existing(&mut self, watcher: &mut impl Watcher) -> notify::Result<()> {
        for root in &mut self.roots {
            if !root.path.is_dir() {
                log!("watch"; "{} does not exist yet, will watch once created", root.path.display());
                continue;
            }
            watcher.watch(&root.path, RecursiveMode::Recursive)?;
            root.attached = true;
        }
        Ok(())
    }

    /// Detach vanished roots and attach reappeared ones.
    ///
    /// Returns the roots attached by this call. Files written into them
    /// before attaching produced no events, so the caller should rebuild.
    pub(super) fn maintain(&mut self, watcher: &mut impl Watcher) -> Vec<PathBuf> {
        let mut reattached = Vec::new();
        for root in &mut self.roots {
            let exists = root.path.is_dir();
            match (root.attached, exists) {
                (true, false) => {
                    // the kernel watch died with the directory
                    let _ = watcher.unwatch(&root.path);
                    root.attached = false;
                    debug!("watch"; "lost {}", root.path.display());
                }
                (false, true) => {
                    if watcher.watch(&root.path, RecursiveMode::Recursive).is_ok() {
                        root.attached = true;
                        debug!("watch"; "attached {}", root.path.display());
                        reattached.push(root.path.clone());
                    }
                }
                _ => {}
            }
        }
        reattached
    }

    #[cfg(test)]
    pub(super) fn is_attached(&self, path: &Path) -> bool {
        self.roots
            .iter()
            .any(|root| root.attached && root.path == path)
    }
}
