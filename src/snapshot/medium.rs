//! Durable key-value media backing the snapshot store
//!
//! A medium stores raw strings under string keys and reports writes made by
//! *other* sessions as [`StorageEvent`]s, the way a browser's origin storage
//! fires `storage` events only in the tabs that did not make the change.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::debug;

use super::error::PersistenceError;

/// Notification that another session changed a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    /// `None` when the key was removed
    pub new_value: Option<String>,
}

/// A string-keyed durable store shared between sessions
pub trait DurableMedium {
    /// Read the raw value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Replace the value stored under `key`
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;

    /// Remove `key` entirely
    fn remove(&mut self, key: &str) -> Result<(), PersistenceError>;

    /// Start collecting change notifications. Media that raise none ignore
    /// this.
    fn listen(&mut self) {}

    /// Drain change notifications caused by other sessions since the last call
    fn take_events(&mut self) -> Vec<StorageEvent>;
}

type Inbox = Rc<RefCell<VecDeque<StorageEvent>>>;

#[derive(Debug, Default)]
struct StorageArea {
    entries: BTreeMap<String, String>,
    /// Byte budget over all keys and values; `None` is unlimited
    quota: Option<usize>,
    inboxes: Vec<(usize, Inbox)>,
    next_session: usize,
}

impl StorageArea {
    fn usage_with(&self, key: &str, value: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum::<usize>()
            + key.len()
            + value.len()
    }

    fn broadcast(&self, from: usize, event: StorageEvent) {
        for (session, inbox) in &self.inboxes {
            if *session != from {
                inbox.borrow_mut().push_back(event.clone());
            }
        }
    }
}

/// In-process medium; every [`MemoryMedium::connect`] handle acts as a
/// separate session over the same storage area.
///
/// A handle queues notifications only after [`DurableMedium::listen`], and
/// its queue grows until drained with `take_events`. A handle kept around
/// just to `connect` others never listens and holds nothing.
#[derive(Debug)]
pub struct MemoryMedium {
    area: Rc<RefCell<StorageArea>>,
    session: usize,
    inbox: Option<Inbox>,
}

impl MemoryMedium {
    /// Create a fresh storage area and the first session attached to it
    pub fn new() -> Self {
        Self::attach(Rc::new(RefCell::new(StorageArea::default())))
    }

    /// Create a fresh storage area that rejects writes beyond `bytes`
    pub fn with_quota(bytes: usize) -> Self {
        let medium = Self::new();
        medium.area.borrow_mut().quota = Some(bytes);
        medium
    }

    /// Open another session over the same storage area
    pub fn connect(&self) -> Self {
        Self::attach(Rc::clone(&self.area))
    }

    fn attach(area: Rc<RefCell<StorageArea>>) -> Self {
        let session = {
            let mut a = area.borrow_mut();
            let session = a.next_session;
            a.next_session += 1;
            session
        };
        Self {
            area,
            session,
            inbox: None,
        }
    }
}

impl Default for MemoryMedium {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MemoryMedium {
    fn drop(&mut self) {
        let session = self.session;
        self.area
            .borrow_mut()
            .inboxes
            .retain(|(id, _)| *id != session);
    }
}

impl DurableMedium for MemoryMedium {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.area.borrow().entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let mut area = self.area.borrow_mut();
        if let Some(quota) = area.quota {
            if area.usage_with(key, value) > quota {
                return Err(PersistenceError::write(key, "storage quota exceeded"));
            }
        }
        area.entries.insert(key.to_string(), value.to_string());
        area.broadcast(
            self.session,
            StorageEvent {
                key: key.to_string(),
                new_value: Some(value.to_string()),
            },
        );
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        let mut area = self.area.borrow_mut();
        if area.entries.remove(key).is_some() {
            area.broadcast(
                self.session,
                StorageEvent {
                    key: key.to_string(),
                    new_value: None,
                },
            );
        }
        Ok(())
    }

    fn listen(&mut self) {
        if self.inbox.is_some() {
            return;
        }
        let inbox: Inbox = Rc::new(RefCell::new(VecDeque::new()));
        self.area
            .borrow_mut()
            .inboxes
            .push((self.session, Rc::clone(&inbox)));
        self.inbox = Some(inbox);
    }

    fn take_events(&mut self) -> Vec<StorageEvent> {
        match &self.inbox {
            Some(inbox) => inbox.borrow_mut().drain(..).collect(),
            None => Vec::new(),
        }
    }
}

/// Directory-backed medium storing each key as `<dir>/<key>.json`.
///
/// Other processes writing the same directory are not observed; every
/// process reads the current files when its store is opened.
#[derive(Debug, Clone)]
pub struct FileMedium {
    dir: PathBuf,
}

impl FileMedium {
    /// Use `dir` as the storage directory, creating it if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl DurableMedium for FileMedium {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistenceError::read(key, e.to_string())),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|e| PersistenceError::write(key, e.to_string()))?;
        debug!(path = %path.display(), bytes = value.len(), "wrote storage file");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PersistenceError::write(key, e.to_string())),
        }
    }

    fn take_events(&mut self) -> Vec<StorageEvent> {
        Vec::new()
    }
}
