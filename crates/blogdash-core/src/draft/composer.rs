use tracing::{debug, info};

use super::store::{DraftError, DraftStore};
use super::Draft;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerState {
    /// Nothing typed, nothing to recover.
    Empty,
    /// The form holds unsent content.
    Composing,
    /// A stored draft was found on mount and the user has not decided yet.
    RecoveryPending,
}

/// Form state of one article composition view plus its draft lifecycle.
///
/// While a recovery prompt is pending nothing is written, so the stored
/// draft cannot be clobbered by the blank form behind the prompt.
pub struct Composer<S: DraftStore> {
    store: S,
    form: Draft,
    pending: Option<Draft>,
}

impl<S: DraftStore> Composer<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            form: Draft::default(),
            pending: None,
        }
    }

    pub fn state(&self) -> ComposerState {
        if self.pending.is_some() {
            ComposerState::RecoveryPending
        } else if self.form.is_empty() {
            ComposerState::Empty
        } else {
            ComposerState::Composing
        }
    }

    pub fn form(&self) -> &Draft {
        &self.form
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Start a fresh view. Returns the stored draft, if any, for the
    /// recovery prompt.
    pub fn mount(&mut self) -> Result<Option<Draft>, DraftError> {
        self.form = Draft::default();
        self.pending = self.store.load()?;
        if self.pending.is_some() {
            debug!("Stored draft found, awaiting recovery decision");
        }
        Ok(self.pending.clone())
    }

    /// Apply a field change and save the result.
    pub fn edit(&mut self, change: impl FnOnce(&mut Draft)) -> Result<(), DraftError> {
        change(&mut self.form);
        self.save_snapshot()?;
        Ok(())
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), DraftError> {
        let title = title.into();
        self.edit(|form| form.title = title)
    }

    pub fn set_content(&mut self, content: impl Into<String>) -> Result<(), DraftError> {
        let content = content.into();
        self.edit(|form| form.content = content)
    }

    pub fn set_category(&mut self, category_id: impl Into<String>) -> Result<(), DraftError> {
        let category_id = category_id.into();
        self.edit(|form| form.category_id = category_id)
    }

    pub fn set_cover(&mut self, cover: super::CoverImage) -> Result<(), DraftError> {
        self.edit(|form| form.cover_image = cover)
    }

    /// Periodic autosave. Returns whether a snapshot was written.
    pub fn tick(&mut self) -> Result<bool, DraftError> {
        self.save_snapshot()
    }

    /// Write the current form before the view goes away. A recovered draft
    /// is only in memory until this or the next edit runs.
    pub fn flush(&mut self) -> Result<bool, DraftError> {
        self.save_snapshot()
    }

    /// Accept the pending draft: delete it from storage and load it into
    /// the form.
    pub fn recover(&mut self) -> Result<Draft, DraftError> {
        let draft = self.pending.take().ok_or(DraftError::NoPendingRecovery)?;
        if let Err(e) = self.store.clear() {
            self.pending = Some(draft);
            return Err(e);
        }
        self.form = draft.clone();
        info!("Draft recovered");
        Ok(draft)
    }

    /// Decline the pending draft and delete it.
    pub fn discard(&mut self) -> Result<(), DraftError> {
        if self.pending.is_none() {
            return Err(DraftError::NoPendingRecovery);
        }
        self.store.clear()?;
        self.pending = None;
        info!("Draft discarded");
        Ok(())
    }

    /// The form was accepted by the backend.
    pub fn submitted(&mut self) -> Result<(), DraftError> {
        self.store.clear()?;
        self.form = Draft::default();
        self.pending = None;
        Ok(())
    }

    /// Whether leaving the view would lose typed content.
    pub fn has_unsaved_changes(&self) -> bool {
        !self.form.is_empty()
    }

    fn save_snapshot(&mut self) -> Result<bool, DraftError> {
        if self.pending.is_some() || self.form.is_empty() {
            return Ok(false);
        }
        self.store.save(&self.form)?;
        debug!(title_len = self.form.title.len(), content_len = self.form.content.len(), "Draft saved");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{CoverImage, FileDraftStore, MemoryDraftStore};

    fn filled() -> Draft {
        Draft {
            title: "Rust notes".to_string(),
            content: "<p>Ownership</p>".to_string(),
            category_id: "2".to_string(),
            cover_image: CoverImage {
                url: "/covers/rust.png".to_string(),
                file: None,
            },
        }
    }

    #[test]
    fn test_empty_form_is_never_saved() {
        let store = MemoryDraftStore::new();
        let mut composer = Composer::new(store.clone());
        assert_eq!(composer.mount().unwrap(), None);
        assert_eq!(composer.state(), ComposerState::Empty);

        assert!(!composer.tick().unwrap());
        assert_eq!(store.save_count(), 0);
        assert!(!composer.has_unsaved_changes());
    }

    #[test]
    fn test_edits_save_immediately() {
        let store = MemoryDraftStore::new();
        let mut composer = Composer::new(store.clone());
        composer.mount().unwrap();

        composer.set_title("Rust notes").unwrap();
        assert_eq!(composer.state(), ComposerState::Composing);
        assert_eq!(store.peek().unwrap().title, "Rust notes");

        composer.set_content("<p>Ownership</p>").unwrap();
        assert!(composer.tick().unwrap());
        assert_eq!(store.save_count(), 3);
        assert!(composer.has_unsaved_changes());
    }

    #[test]
    fn test_recovery_round_trip_across_views() {
        let dir = tempfile::tempdir().unwrap();

        let mut first_view = Composer::new(FileDraftStore::new(dir.path()));
        first_view.mount().unwrap();
        first_view.edit(|form| *form = filled()).unwrap();
        first_view.tick().unwrap();
        drop(first_view);

        let mut second_view = Composer::new(FileDraftStore::new(dir.path()));
        let prompt = second_view.mount().unwrap();
        assert_eq!(prompt, Some(filled()));
        assert_eq!(second_view.state(), ComposerState::RecoveryPending);

        let recovered = second_view.recover().unwrap();
        assert_eq!(recovered, filled());
        assert_eq!(second_view.form(), &filled());
        assert_eq!(second_view.store().load().unwrap(), None);
        assert_eq!(second_view.state(), ComposerState::Composing);
    }

    #[test]
    fn test_recovered_draft_is_written_back_on_leave() {
        let store = MemoryDraftStore::new();
        store.save(&filled()).unwrap();

        let mut composer = Composer::new(store.clone());
        composer.mount().unwrap();
        composer.recover().unwrap();
        assert!(store.peek().is_none());

        // Leaving without touching the form must not lose it.
        assert!(composer.flush().unwrap());
        assert_eq!(store.peek(), Some(filled()));
    }

    #[test]
    fn test_flush_skips_empty_and_pending_forms() {
        let store = MemoryDraftStore::new();
        let mut composer = Composer::new(store.clone());
        composer.mount().unwrap();
        assert!(!composer.flush().unwrap());

        store.save(&filled()).unwrap();
        let mut next_view = Composer::new(store.clone());
        next_view.mount().unwrap();
        assert!(!next_view.flush().unwrap());
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_pending_recovery_suppresses_saves() {
        let store = MemoryDraftStore::new();
        store.save(&filled()).unwrap();

        let mut composer = Composer::new(store.clone());
        composer.mount().unwrap();
        composer.set_title("something else").unwrap();
        assert!(!composer.tick().unwrap());

        assert_eq!(store.save_count(), 1);
        assert_eq!(store.peek(), Some(filled()));
    }

    #[test]
    fn test_discard_deletes_draft() {
        let store = MemoryDraftStore::new();
        store.save(&filled()).unwrap();

        let mut composer = Composer::new(store.clone());
        composer.mount().unwrap();
        composer.discard().unwrap();

        assert_eq!(composer.state(), ComposerState::Empty);
        assert!(store.peek().is_none());
        assert!(composer.form().is_empty());
    }

    #[test]
    fn test_recover_without_prompt_is_an_error() {
        let mut composer = Composer::new(MemoryDraftStore::new());
        composer.mount().unwrap();
        assert!(matches!(composer.recover(), Err(DraftError::NoPendingRecovery)));
        assert!(matches!(composer.discard(), Err(DraftError::NoPendingRecovery)));
    }

    #[test]
    fn test_submitted_clears_everything() {
        let store = MemoryDraftStore::new();
        let mut composer = Composer::new(store.clone());
        composer.mount().unwrap();
        composer.edit(|form| *form = filled()).unwrap();

        composer.submitted().unwrap();

        assert!(store.peek().is_none());
        assert_eq!(composer.state(), ComposerState::Empty);
        assert!(!composer.has_unsaved_changes());
    }

    #[test]
    fn test_new_draft_overwrites_unsent_one() {
        let store = MemoryDraftStore::new();
        let mut composer = Composer::new(store.clone());
        composer.mount().unwrap();
        composer.set_title("old").unwrap();

        let mut next_view = Composer::new(store.clone());
        next_view.mount().unwrap();
        next_view.discard().unwrap();
        next_view.set_title("new").unwrap();

        assert_eq!(store.peek().unwrap().title, "new");
    }
}
