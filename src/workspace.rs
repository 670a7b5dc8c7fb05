//! Editing workspace
//!
//! A [`Workspace`] ties a live [`Session`] to a [`SnapshotStore`] and a
//! [`Shell`] that can ask the user for confirmation. Operations here never
//! fail: blank titles are ignored, refused confirmations do nothing, and
//! storage failures are logged while the session keeps running.

use tracing::{debug, error, warn};

use crate::layout::Placement;
use crate::renderer::{render_card, SvgConfig};
use crate::session::Session;
use crate::snapshot::{Collection, DurableMedium, Snapshot, SnapshotStore, StoreError};

pub const CONFIRM_DELETE_DOCUMENT: &str = "Are you sure you want to delete this document?";
pub const CONFIRM_DELETE_CONFIGURATION: &str =
    "Are you sure you want to delete this configuration?";
pub const CONFIRM_REMOVE_SLOT: &str = "Are you sure you want to remove this image URL?";
pub const CONFIRM_CLEAR_ALL: &str =
    "Are you sure you want to clear all settings? This will not delete your saved documents or configurations. ";

/// Host capabilities the workspace needs from its surroundings
pub trait Shell {
    /// Ask a yes/no question
    fn confirm(&mut self, message: &str) -> bool;
}

/// Answers yes to everything
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysConfirm;

impl Shell for AlwaysConfirm {
    fn confirm(&mut self, _message: &str) -> bool {
        true
    }
}

pub struct Workspace<M: DurableMedium, S: Shell> {
    session: Session,
    store: SnapshotStore<M>,
    shell: S,
    document_title: String,
    configuration_title: String,
}

impl<M: DurableMedium, S: Shell> Workspace<M, S> {
    pub fn new(session: Session, store: SnapshotStore<M>, shell: S) -> Self {
        Self {
            session,
            store,
            shell,
            document_title: String::new(),
            configuration_title: String::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn store(&self) -> &SnapshotStore<M> {
        &self.store
    }

    pub fn shell_mut(&mut self) -> &mut S {
        &mut self.shell
    }

    pub fn document_title(&self) -> &str {
        &self.document_title
    }

    pub fn set_document_title(&mut self, title: impl Into<String>) {
        self.document_title = title.into();
    }

    pub fn configuration_title(&self) -> &str {
        &self.configuration_title
    }

    pub fn set_configuration_title(&mut self, title: impl Into<String>) {
        self.configuration_title = title.into();
    }

    /// Save the session as a document titled with the pending document
    /// title. The title is cleared on success.
    pub fn save_document(&mut self) -> Option<String> {
        let snapshot = self.session.to_document(&self.document_title);
        let id = self.save(Collection::Documents, snapshot)?;
        self.document_title.clear();
        Some(id)
    }

    /// Save the session styling as a configuration titled with the pending
    /// configuration title. The title is cleared on success.
    pub fn save_configuration(&mut self) -> Option<String> {
        let snapshot = self.session.to_configuration(&self.configuration_title);
        let id = self.save(Collection::Configurations, snapshot)?;
        self.configuration_title.clear();
        Some(id)
    }

    /// Replace the session with a saved document
    pub fn load_document(&mut self, id: &str) -> bool {
        self.load(Collection::Documents, id)
    }

    /// Apply a saved configuration; image slots are kept
    pub fn load_configuration(&mut self, id: &str) -> bool {
        self.load(Collection::Configurations, id)
    }

    pub fn delete_document(&mut self, id: &str) -> bool {
        self.delete(Collection::Documents, id, CONFIRM_DELETE_DOCUMENT)
    }

    pub fn delete_configuration(&mut self, id: &str) -> bool {
        self.delete(Collection::Configurations, id, CONFIRM_DELETE_CONFIGURATION)
    }

    pub fn add_slot(&mut self) {
        self.session.slots_mut().add();
    }

    pub fn update_slot(&mut self, index: usize, url: impl Into<String>) -> bool {
        match self.session.slots_mut().update(index, url) {
            Ok(()) => true,
            Err(e) => {
                debug!(error = %e, "slot update ignored");
                false
            }
        }
    }

    /// Remove an image slot after confirmation. The last slot is never
    /// removed and no question is asked for it.
    pub fn remove_slot(&mut self, index: usize) -> bool {
        let len = self.session.slots().len();
        if len <= 1 || index >= len {
            debug!(index, len, "slot removal ignored");
            return false;
        }
        if !self.shell.confirm(CONFIRM_REMOVE_SLOT) {
            return false;
        }
        self.session.slots_mut().remove(index).is_ok()
    }

    /// Reset the session after confirmation. Saved snapshots are kept.
    pub fn clear_all(&mut self) -> bool {
        if !self.shell.confirm(CONFIRM_CLEAR_ALL) {
            return false;
        }
        self.session.clear();
        true
    }

    /// Apply change notifications from other sessions
    pub fn sync(&mut self) -> usize {
        self.store.sync()
    }

    pub fn placements(&self) -> Vec<Placement> {
        self.session.placements()
    }

    pub fn render_svg(&self, config: &SvgConfig) -> String {
        render_card(&self.session, config)
    }

    pub fn warn_before_exit(&self) -> bool {
        self.session.warn_before_exit()
    }

    fn save(&mut self, collection: Collection, snapshot: Snapshot) -> Option<String> {
        match self.store.save(collection, snapshot) {
            Ok(id) => Some(id),
            Err(StoreError::Validation(e)) => {
                debug!(%collection, error = %e, "save ignored");
                None
            }
            Err(e) => {
                error!(%collection, error = %e, "failed to save snapshot");
                None
            }
        }
    }

    fn load(&mut self, collection: Collection, id: &str) -> bool {
        match self.store.load(collection, id) {
            Ok(snapshot) => {
                self.session.apply(&snapshot);
                true
            }
            Err(e) => {
                warn!(%collection, error = %e, "load failed");
                false
            }
        }
    }

    fn delete(&mut self, collection: Collection, id: &str, message: &str) -> bool {
        if !self.shell.confirm(message) {
            return false;
        }
        match self.store.delete(collection, id) {
            Ok(removed) => removed,
            Err(e) => {
                error!(%collection, error = %e, "failed to delete snapshot");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::MemoryMedium;
    use pretty_assertions::assert_eq;

    /// Records every question and answers with a fixed reply
    struct ScriptedShell {
        answer: bool,
        asked: Vec<String>,
    }

    impl ScriptedShell {
        fn answering(answer: bool) -> Self {
            Self {
                answer,
                asked: Vec::new(),
            }
        }
    }

    impl Shell for ScriptedShell {
        fn confirm(&mut self, message: &str) -> bool {
            self.asked.push(message.to_string());
            self.answer
        }
    }

    fn workspace(answer: bool) -> Workspace<MemoryMedium, ScriptedShell> {
        Workspace::new(
            Session::new(),
            SnapshotStore::open(MemoryMedium::new()),
            ScriptedShell::answering(answer),
        )
    }

    #[test]
    fn test_save_clears_title() {
        let mut ws = workspace(true);
        ws.set_document_title("  Trip  ");
        let id = ws.save_document().unwrap();
        assert_eq!(ws.document_title(), "");
        assert_eq!(ws.store().load(Collection::Documents, &id).unwrap().title, "Trip");
    }

    #[test]
    fn test_blank_title_is_ignored() {
        let mut ws = workspace(true);
        ws.set_configuration_title("   ");
        assert_eq!(ws.save_configuration(), None);
        assert_eq!(ws.configuration_title(), "   ");
        assert!(ws.store().list(Collection::Configurations).is_empty());
    }

    #[test]
    fn test_delete_asks_first() {
        let mut ws = workspace(false);
        ws.set_document_title("Keep");
        let id = ws.save_document().unwrap();

        assert!(!ws.delete_document(&id));
        assert_eq!(ws.store().list(Collection::Documents).len(), 1);
        assert_eq!(ws.shell_mut().asked, vec![CONFIRM_DELETE_DOCUMENT.to_string()]);

        ws.shell_mut().answer = true;
        assert!(ws.delete_document(&id));
        assert!(ws.store().list(Collection::Documents).is_empty());
    }

    #[test]
    fn test_last_slot_removal_asks_nothing() {
        let mut ws = workspace(true);
        assert!(!ws.remove_slot(0));
        assert!(ws.shell_mut().asked.is_empty());

        ws.add_slot();
        assert!(ws.remove_slot(1));
        assert_eq!(ws.shell_mut().asked, vec![CONFIRM_REMOVE_SLOT.to_string()]);
        assert_eq!(ws.session().slots().len(), 1);
    }

    #[test]
    fn test_clear_all_keeps_snapshots() {
        let mut ws = workspace(true);
        ws.update_slot(0, "https://x.test/a.png");
        ws.session_mut().set_fan_rotation(45.0);
        ws.set_configuration_title("Wide");
        ws.save_configuration().unwrap();

        assert!(ws.clear_all());
        assert_eq!(ws.session(), &Session::new());
        assert_eq!(ws.store().list(Collection::Configurations).len(), 1);
    }

    #[test]
    fn test_load_configuration_keeps_slots() {
        let mut ws = workspace(true);
        ws.session_mut().set_fan_spacing(120.0);
        ws.set_configuration_title("Spread");
        let id = ws.save_configuration().unwrap();

        ws.session_mut().set_fan_spacing(10.0);
        ws.update_slot(0, "https://x.test/a.png");
        assert!(ws.load_configuration(&id));
        assert_eq!(ws.session().params().fan_spacing, 120.0);
        assert_eq!(ws.session().slots().as_slice(), &["https://x.test/a.png".to_string()]);
        assert!(ws.warn_before_exit());
    }

    #[test]
    fn test_load_unknown_id() {
        let mut ws = workspace(true);
        assert!(!ws.load_document("missing"));
        assert_eq!(ws.session(), &Session::new());
    }

    #[test]
    fn test_write_failure_is_logged_not_raised() {
        let mut ws = Workspace::new(
            Session::new(),
            SnapshotStore::open(MemoryMedium::with_quota(8)),
            AlwaysConfirm,
        );
        ws.set_document_title("Too big");
        assert_eq!(ws.save_document(), None);
        assert_eq!(ws.document_title(), "Too big");
        assert!(ws.store().list(Collection::Documents).is_empty());
    }
}
