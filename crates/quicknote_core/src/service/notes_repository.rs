//! Observer-facing note list kept in sync with the gateway.
//!
//! # Responsibility
//! - Cache the full note list and re-fetch it after every mutation.
//! - Translate list positions into stable note ids before touching storage.
//! - Notify "list changed" listeners on every refresh.
//!
//! # Invariants
//! - The cache is only ever replaced by a verbatim fetch, never patched.
//! - Out-of-bounds positions are no-ops and leave the cache untouched.
//! - Gateway errors are logged and reported as `MutationOutcome::Failed`.

use crate::events::{EventHub, SubscriptionId};
use crate::model::note::{Note, NoteId};
use crate::repo::note_gateway::{NoteGateway, NoteRecord, RepoResult};
use crate::service::editor::EditorCommit;
use log::{debug, warn};

/// Notification emitted after the cache was replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotesEvent {
    ListChanged { count: usize },
}

/// What a mutating call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Change is committed and visible in the cache.
    Applied,
    /// Position or id no longer valid; nothing changed.
    NoOp,
    /// Storage rejected the change; the cache shows the store's last state.
    Failed,
}

impl MutationOutcome {
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }
}

/// In-memory note list backed by an injected gateway.
pub struct NotesRepository<G: NoteGateway> {
    gateway: G,
    cache: Vec<NoteRecord>,
    listeners: EventHub<NotesEvent>,
}

impl<G: NoteGateway> NotesRepository<G> {
    /// Takes ownership of `gateway` and loads the initial list.
    pub fn new(gateway: G) -> Self {
        let mut repository = Self {
            gateway,
            cache: Vec::new(),
            listeners: EventHub::new(),
        };
        repository.refresh();
        repository
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&NotesEvent) + 'static) -> SubscriptionId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Replaces the cache with the store's current contents.
    pub fn refresh(&mut self) {
        self.cache = self.gateway.fetch_all();
        self.listeners.emit(&NotesEvent::ListChanged {
            count: self.cache.len(),
        });
    }

    pub fn add(&mut self, title: &str, content: &str) -> MutationOutcome {
        let result = self.gateway.insert(title, content).map(|_| true);
        self.finish("note_add", result)
    }

    /// Deletes the note shown at `position` in the current cache.
    pub fn delete(&mut self, position: usize) -> MutationOutcome {
        let Some(record) = self.cache.get(position).cloned() else {
            return self.out_of_bounds("note_delete", position);
        };
        let result = self.gateway.delete(&record);
        self.finish("note_delete", result)
    }

    pub fn delete_by_id(&mut self, id: NoteId) -> MutationOutcome {
        let Some(record) = self.cache.iter().find(|record| record.id == id).cloned() else {
            debug!("event=note_delete module=service status=skipped reason=unknown_id note_id={id}");
            return MutationOutcome::NoOp;
        };
        let result = self.gateway.delete(&record);
        self.finish("note_delete", result)
    }

    /// Replaces title/content of the note shown at `position`.
    pub fn update(&mut self, position: usize, title: &str, content: &str) -> MutationOutcome {
        let Some(id) = self.cache.get(position).map(|record| record.id) else {
            return self.out_of_bounds("note_update", position);
        };
        self.update_by_id(id, title, content)
    }

    pub fn update_by_id(&mut self, id: NoteId, title: &str, content: &str) -> MutationOutcome {
        let result = self.gateway.update(id, title, content);
        self.finish("note_update", result)
    }

    /// Persists an editor result: insert in create mode, update in edit mode.
    pub fn save(&mut self, commit: &EditorCommit) -> MutationOutcome {
        let note = &commit.note;
        if commit.is_edit() {
            self.update_by_id(note.id, &note.title, &note.content)
        } else {
            self.add(&note.title, &note.content)
        }
    }

    pub fn count(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn note_at(&self, position: usize) -> Option<Note> {
        self.cache.get(position).map(NoteRecord::to_note)
    }

    pub fn notes(&self) -> Vec<Note> {
        self.cache.iter().map(NoteRecord::to_note).collect()
    }

    pub fn records(&self) -> &[NoteRecord] {
        &self.cache
    }

    pub fn position_of(&self, id: NoteId) -> Option<usize> {
        self.cache.iter().position(|record| record.id == id)
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut G {
        &mut self.gateway
    }

    fn out_of_bounds(&self, event: &str, position: usize) -> MutationOutcome {
        debug!(
            "event={event} module=service status=skipped reason=out_of_bounds position={position} count={}",
            self.cache.len()
        );
        MutationOutcome::NoOp
    }

    fn finish(&mut self, event: &str, result: RepoResult<bool>) -> MutationOutcome {
        let outcome = match result {
            Ok(true) => MutationOutcome::Applied,
            Ok(false) => MutationOutcome::NoOp,
            Err(err) => {
                warn!("event={event} module=service status=error error={err}");
                MutationOutcome::Failed
            }
        };
        self.refresh();
        outcome
    }
}
