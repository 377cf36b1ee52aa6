use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;

use super::{ProjectEvent, ProjectEventKind};

/// Almacenamiento de eventos append-only, por proyecto.
pub trait ProjectJournal: Send + Sync {
    /// Agrega un evento y devuelve el evento completo (con seq y ts).
    fn append(&self, project_id: Uuid, kind: ProjectEventKind) -> ProjectEvent;
    /// Eventos del proyecto en orden ascendente de seq.
    fn list(&self, project_id: Uuid) -> Vec<ProjectEvent>;
}

#[derive(Debug, Default)]
pub struct InMemoryJournal {
    inner: Mutex<HashMap<Uuid, Vec<ProjectEvent>>>,
}

impl InMemoryJournal {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProjectJournal for InMemoryJournal {
    fn append(&self, project_id: Uuid, kind: ProjectEventKind) -> ProjectEvent {
        let mut map = match self.inner.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        let events = map.entry(project_id).or_default();
        let ev = ProjectEvent { seq: events.len() as u64,
                                project_id,
                                kind,
                                ts: Utc::now() };
        events.push(ev.clone());
        ev
    }

    fn list(&self, project_id: Uuid) -> Vec<ProjectEvent> {
        let map = match self.inner.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        map.get(&project_id).cloned().unwrap_or_default()
    }
}
