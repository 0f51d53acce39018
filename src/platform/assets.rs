//! Native asset manager
//!
//! Images are queued by name and file path, then resolved against a root
//! directory the first time the session polls. Only existence is checked;
//! decoding is the renderer's business.

use std::collections::HashMap;
use std::path::PathBuf;

use super::{AssetSource, ImageHandle, LoadStatus};
use crate::error::AssetError;

/// Images the enemy roster is drawn with
pub const DEFAULT_IMAGES: [(&str, &str); 5] = [
    ("hotdog", "assets/hotdog.png"),
    ("frenchFries", "assets/french-fries.png"),
    ("donut", "assets/donut.png"),
    ("hamburger", "assets/hamburger.png"),
    ("taco", "assets/taco.png"),
];

#[derive(Debug)]
pub struct AssetManager {
    /// Base directory for queued paths; `None` for purely in-memory use
    root: Option<PathBuf>,
    queue: Vec<(String, String)>,
    images: HashMap<String, ImageHandle>,
    next_handle: u32,
    status: LoadStatus,
}

impl AssetManager {
    /// Manager resolving queued files under `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            queue: Vec::new(),
            images: HashMap::new(),
            next_handle: 1,
            status: LoadStatus::Pending,
        }
    }

    /// Manager with no file system; only `register`ed images exist
    pub fn in_memory() -> Self {
        Self {
            root: None,
            ..Self::new(PathBuf::new())
        }
    }

    pub fn queue_image(&mut self, name: impl Into<String>, path: impl Into<String>) {
        self.queue.push((name.into(), path.into()));
        self.status = LoadStatus::Pending;
    }

    /// Queue the stock enemy images
    pub fn queue_defaults(&mut self) {
        for (name, path) in DEFAULT_IMAGES {
            self.queue_image(name, path);
        }
    }

    /// Make an image available without touching disk
    pub fn register(&mut self, name: impl Into<String>) -> ImageHandle {
        let handle = self.alloc_handle();
        self.images.insert(name.into(), handle);
        handle
    }

    pub fn loaded_count(&self) -> usize {
        self.images.len()
    }

    fn alloc_handle(&mut self) -> ImageHandle {
        let handle = ImageHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }

    /// Resolve everything queued; stops at the first missing file
    fn load_queued(&mut self) -> Result<(), AssetError> {
        let queue = std::mem::take(&mut self.queue);
        log::info!("Loading {} assets...", queue.len());

        for (name, path) in queue {
            let Some(root) = &self.root else {
                return Err(AssetError::LoadFailed {
                    name,
                    reason: "no asset directory configured".to_string(),
                });
            };
            let full = root.join(&path);
            if !full.is_file() {
                return Err(AssetError::Missing {
                    name,
                    path: full.display().to_string(),
                });
            }
            let handle = self.alloc_handle();
            log::debug!("Loaded asset: {name} from {}", full.display());
            self.images.insert(name, handle);
        }
        Ok(())
    }
}

impl AssetSource for AssetManager {
    fn poll_load(&mut self) -> LoadStatus {
        if self.status == LoadStatus::Pending {
            self.status = match self.load_queued() {
                Ok(()) => LoadStatus::Ready,
                Err(e) => LoadStatus::Failed(e),
            };
        }
        self.status.clone()
    }

    fn image(&self, name: &str) -> Option<ImageHandle> {
        self.images.get(name).copied()
    }
}
