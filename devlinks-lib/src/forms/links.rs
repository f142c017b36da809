use derive_more::Display;
use getset::{CopyGetters, Getters};
use tracing::{debug, warn};

use crate::{
    Error, Result, ValidationError,
    forms::InFlight,
    gateway::{DocumentStore, DocumentUpdate, Link, Session},
    platform::Platform,
};

/// Most drafts a [`LinkForm`] holds at once.
pub const MAX_LINKS: usize = 5;

/// Shown on a draft whose URL doesn't fit its platform.
pub const INVALID_URL: &str = "Please check the URL";

/// Identifies a draft for the lifetime of its form. Ids are never handed out twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub struct DraftId(u64);

/// A link that is still being edited.
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct LinkDraft {
    #[getset(get_copy = "pub")]
    id: DraftId,
    #[getset(get_copy = "pub")]
    platform: Option<Platform>,
    #[getset(get = "pub")]
    url: String,
    #[getset(get = "pub")]
    error: Option<String>,
}

impl LinkDraft {
    fn new(id: DraftId) -> Self {
        Self {
            id,
            platform: None,
            url: String::new(),
            error: None,
        }
    }

    fn validate(&mut self) -> bool {
        let valid = self
            .platform
            .is_some_and(|platform| platform.accepts(&self.url));
        self.error = (!valid).then(|| INVALID_URL.to_string());
        valid
    }
}

/// An edit to a single field of a [`LinkDraft`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftChange {
    Platform(Option<Platform>),
    Url(String),
}

/// Saved links plus up to [`MAX_LINKS`] drafts waiting to be saved after them.
#[derive(Debug, Clone)]
pub struct LinkForm {
    saved: Vec<Link>,
    drafts: Vec<LinkDraft>,
    next_id: u64,
    in_flight: InFlight,
}

impl Default for LinkForm {
    fn default() -> Self {
        Self::with_saved(Vec::new())
    }
}

impl LinkForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// A form whose drafts will be appended to `saved` links.
    pub fn with_saved(saved: Vec<Link>) -> Self {
        Self {
            saved,
            drafts: Vec::new(),
            next_id: 1,
            in_flight: InFlight::default(),
        }
    }

    pub fn saved(&self) -> &[Link] {
        &self.saved
    }

    pub fn drafts(&self) -> &[LinkDraft] {
        &self.drafts
    }

    pub fn draft(&self, id: DraftId) -> Option<&LinkDraft> {
        self.drafts.iter().find(|draft| draft.id == id)
    }

    pub fn is_full(&self) -> bool {
        self.drafts.len() >= MAX_LINKS
    }

    pub fn is_saving(&self) -> bool {
        self.in_flight.is_set()
    }

    /// Swap in the links already stored, keeping the drafts.
    pub fn replace_saved(&mut self, saved: Vec<Link>) {
        self.saved = saved;
    }

    /// Append an empty draft. Once the form is full nothing is added.
    pub fn add_draft(&mut self) -> Result<DraftId> {
        if self.is_full() {
            warn!(limit = MAX_LINKS, "Link limit reached");
            return Err(Error::CapacityExceeded(MAX_LINKS));
        }

        let id = DraftId(self.next_id);
        self.next_id += 1;
        self.drafts.push(LinkDraft::new(id));
        debug!(%id, "Added link draft");

        Ok(id)
    }

    /// Apply `change` to the draft with the given id, if there is one.
    pub fn update_draft(&mut self, id: DraftId, change: DraftChange) {
        let Some(draft) = self.drafts.iter_mut().find(|draft| draft.id == id) else {
            return;
        };

        match change {
            DraftChange::Platform(platform) => draft.platform = platform,
            DraftChange::Url(url) => draft.url = url,
        }
    }

    pub fn remove_draft(&mut self, id: DraftId) {
        self.drafts.retain(|draft| draft.id != id);
    }

    /// Check every draft against its platform's URL pattern, setting or clearing each draft's
    /// error. Returns `true` only if all drafts are valid.
    pub fn validate_all(&mut self) -> bool {
        self.drafts
            .iter_mut()
            .fold(true, |valid, draft| draft.validate() && valid)
    }

    /// Validate the drafts and snapshot saved links followed by drafts for submission, marking
    /// the form busy.
    ///
    /// Every successful call must be paired with [`LinkForm::finish_save`].
    pub fn begin_save(&mut self) -> Result<LinkSubmission> {
        if self.in_flight.is_set() {
            return Err(Error::SaveInProgress);
        }
        if !self.validate_all() {
            let invalid = self
                .drafts
                .iter()
                .filter(|draft| draft.error.is_some())
                .count();
            warn!(invalid, "Rejected link save");
            return Err(ValidationError::InvalidLinks { invalid }.into());
        }

        self.in_flight.acquire()?;

        let links = self
            .saved
            .iter()
            .cloned()
            .chain(self.drafts.iter().filter_map(|draft| {
                draft
                    .platform
                    .map(|platform| Link::new(platform, draft.url.clone()))
            }))
            .collect();

        Ok(LinkSubmission { links })
    }

    /// Clear the busy mark. `committed` holds the links that were stored, if the save
    /// succeeded; they become the saved links and the drafts are cleared.
    pub fn finish_save(&mut self, committed: Option<Vec<Link>>) {
        self.in_flight.release();

        if let Some(links) = committed {
            self.saved = links;
            self.drafts.clear();
        }
    }

    /// Validate and submit the form in one go.
    pub fn save<S>(&mut self, session: &Session, store: &S) -> Result<()>
    where
        S: DocumentStore + ?Sized,
    {
        let submission = self.begin_save()?;

        match submission.submit(session, store) {
            Ok(()) => {
                self.finish_save(Some(submission.into_links()));
                Ok(())
            }
            Err(err) => {
                self.finish_save(None);
                Err(err)
            }
        }
    }
}

/// The full link list a [`LinkForm`] is about to store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSubmission {
    links: Vec<Link>,
}

impl LinkSubmission {
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn into_links(self) -> Vec<Link> {
        self.links
    }

    pub fn submit<S>(&self, session: &Session, store: &S) -> Result<()>
    where
        S: DocumentStore + ?Sized,
    {
        store.update(
            session,
            DocumentUpdate {
                links: Some(self.links.clone()),
                ..DocumentUpdate::default()
            },
        )?;
        debug!(user = %session.user_id(), count = self.links.len(), "Saved links");

        Ok(())
    }
}
