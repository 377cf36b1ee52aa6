//! Árbol de templates (read-only, externo al workspace).
//!
//! ```text
//! {root}/model/damaged/{group}_damage.stp
//! {root}/model/undamaged/{group}.STEP
//! {root}/cloudmap/{damaged|undamaged}/stress/{group}.png
//! {root}/cloudmap/{damaged|undamaged}/life/{group}.png
//! ```

use std::path::{Path, PathBuf};

use crate::params::GroupId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateTree {
    root: PathBuf,
}

impl TemplateTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn model(&self, group: &GroupId, damaged: bool) -> PathBuf {
        let dir = self.root.join("model");
        if damaged {
            dir.join("damaged").join(format!("{group}_damage.stp"))
        } else {
            dir.join("undamaged").join(format!("{group}.STEP"))
        }
    }

    pub fn stress_cloudmap(&self, group: &GroupId, damaged: bool) -> PathBuf {
        self.cloudmap_dir(damaged).join("stress").join(format!("{group}.png"))
    }

    pub fn life_cloudmap(&self, group: &GroupId, damaged: bool) -> PathBuf {
        self.cloudmap_dir(damaged).join("life").join(format!("{group}.png"))
    }

    fn cloudmap_dir(&self, damaged: bool) -> PathBuf {
        self.root.join("cloudmap").join(damage_dir(damaged))
    }
}

pub(crate) fn damage_dir(damaged: bool) -> &'static str {
    if damaged { "damaged" } else { "undamaged" }
}
