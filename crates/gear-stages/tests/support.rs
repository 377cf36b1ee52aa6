#![allow(dead_code)]

use std::path::Path;

use gear_core::{ArtifactStore, InMemoryJournal, Workspace};
use gear_stages::TemplateTree;

pub struct Fixture {
    pub _tmp: tempfile::TempDir,
    pub ws: Workspace,
    pub store: ArtifactStore,
    pub journal: InMemoryJournal,
    pub templates: TemplateTree,
}

pub fn fixture() -> Fixture {
    let tmp = tempfile::tempdir().expect("tempdir");
    let ws = Workspace::create("DemoGear", tmp.path()).expect("workspace");
    let templates = TemplateTree::new(tmp.path().join("assets"));
    Fixture { ws,
              store: ArtifactStore::default(),
              journal: InMemoryJournal::new(),
              templates,
              _tmp: tmp }
}

pub fn write(path: &Path, bytes: &[u8]) {
    std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    std::fs::write(path, bytes).expect("write template");
}
