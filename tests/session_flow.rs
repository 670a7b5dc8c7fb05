//! End-to-end editing flows through a `Workspace`.

use fancard::snapshot::Collection;
use fancard::{AlwaysConfirm, MemoryMedium, Session, Shell, SnapshotStore, Workspace};
use pretty_assertions::assert_eq;

/// Declines every question
struct Cautious;

impl Shell for Cautious {
    fn confirm(&mut self, _message: &str) -> bool {
        false
    }
}

fn workspace<S: Shell>(shell: S) -> Workspace<MemoryMedium, S> {
    Workspace::new(Session::new(), SnapshotStore::open(MemoryMedium::new()), shell)
}

#[test]
fn test_document_restores_full_state() {
    let mut ws = workspace(AlwaysConfirm);
    ws.update_slot(0, "https://x.test/1.jpg");
    ws.add_slot();
    ws.update_slot(1, "https://x.test/2.jpg");
    ws.session_mut().set_fan_rotation(10.0);
    ws.session_mut().set_background_color("#000").unwrap();
    let before = ws.session().clone();

    ws.set_document_title("Pair");
    let id = ws.save_document().unwrap();

    assert!(ws.clear_all());
    assert!(!ws.warn_before_exit());

    assert!(ws.load_document(&id));
    assert_eq!(ws.session().params(), before.params());
    assert_eq!(ws.session().background_color(), "#000");
    assert_eq!(ws.session().slots(), before.slots());
    assert!(ws.session().has_multiple_images());
}

#[test]
fn test_two_workspaces_share_snapshots() {
    let medium = MemoryMedium::new();
    let store = || SnapshotStore::open(medium.connect());
    let mut left = Workspace::new(Session::new(), store(), AlwaysConfirm);
    let mut right = Workspace::new(Session::new(), store(), AlwaysConfirm);

    left.session_mut().set_fan_spacing(150.0);
    left.set_configuration_title("Spread");
    let id = left.save_configuration().unwrap();

    assert!(!right.load_configuration(&id));
    assert_eq!(right.sync(), 1);
    assert!(right.load_configuration(&id));
    assert_eq!(right.session().params().fan_spacing, 150.0);
}

#[test]
fn test_declined_confirmations_change_nothing() {
    let mut ws = workspace(Cautious);
    ws.add_slot();
    ws.update_slot(0, "https://x.test/1.jpg");
    ws.set_document_title("Keep me");
    let id = ws.save_document().unwrap();
    let session = ws.session().clone();

    assert!(!ws.remove_slot(1));
    assert!(!ws.clear_all());
    assert!(!ws.delete_document(&id));

    assert_eq!(ws.session(), &session);
    assert_eq!(ws.store().list(Collection::Documents).len(), 1);
}

#[test]
fn test_placements_track_slots() {
    let mut ws = workspace(AlwaysConfirm);
    assert_eq!(ws.placements().len(), 1);
    ws.add_slot();
    ws.add_slot();
    let placements = ws.placements();
    assert_eq!(placements.len(), 3);
    assert_eq!(placements[0].rotation_degrees, -30.0);

    assert!(ws.remove_slot(0));
    assert_eq!(ws.placements().len(), 2);
}

#[test]
fn test_out_of_range_slot_edits_are_ignored() {
    let mut ws = workspace(AlwaysConfirm);
    assert!(!ws.update_slot(3, "x"));
    assert!(!ws.remove_slot(3));
    assert_eq!(ws.session().slots().len(), 1);
}
