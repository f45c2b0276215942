//! The open CV on the editing surface.
//!
//! An `EditingSession` owns one draft. Sections change it only through
//! [`SectionUpdate`]s, which also raise the unsaved flag; a successful
//! [`EditingSession::save`] is the only thing that clears it.

use tracing::{info, warn};
use uuid::Uuid;

use crate::editor::client::{ClientError, CvApi};
use crate::editor::item::{ItemState, ListItem};
use crate::editor::sections::{ListSection, NewSkillForm, PersonalInfo, SectionEditors, SectionUpdate};
use crate::models::cv::{Cv, CvDraft, CvFields};

#[derive(Debug, Clone, Default)]
pub struct EditingSession {
    id: Option<Uuid>,
    slug: Option<String>,
    draft: CvFields,
    unsaved: bool,
    last_error: Option<String>,
    personal: Option<PersonalInfo>,
    editors: SectionEditors,
}

impl EditingSession {
    /// A brand-new CV on the empty template. Not stored until the first save.
    pub fn new_blank() -> Self {
        Self::default()
    }

    pub fn from_stored(cv: Cv) -> Self {
        Self {
            id: Some(cv.id),
            slug: Some(cv.slug),
            draft: cv.fields,
            ..Self::default()
        }
    }

    pub async fn open(api: &dyn CvApi, id: Uuid) -> Result<Self, ClientError> {
        let cv = api.get(id).await?;
        Ok(Self::from_stored(cv))
    }

    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    pub fn draft(&self) -> &CvFields {
        &self.draft
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// Message of the most recent failed save, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn apply(&mut self, update: SectionUpdate) {
        update.apply_to(&mut self.draft);
        self.unsaved = true;
    }

    // ── Personal info ──────────────────────────────────────────────────────

    pub fn personal_state(&self) -> ItemState<'_, PersonalInfo> {
        match &self.personal {
            Some(local) => ItemState::Editing(local),
            None => ItemState::Viewing,
        }
    }

    pub fn begin_personal_edit(&mut self) {
        self.personal = Some(PersonalInfo::from_fields(&self.draft));
    }

    pub fn personal_local_mut(&mut self) -> Option<&mut PersonalInfo> {
        self.personal.as_mut()
    }

    pub fn cancel_personal_edit(&mut self) -> bool {
        self.personal.take().is_some()
    }

    pub fn commit_personal_edit(&mut self) -> bool {
        match self.personal.take() {
            Some(info) => {
                self.apply(SectionUpdate::PersonalInfo(info));
                true
            }
            None => false,
        }
    }

    // ── List sections ──────────────────────────────────────────────────────

    pub fn item_state<S: ListSection>(&self, id: Uuid) -> ItemState<'_, S::Item> {
        S::editor(&self.editors).state(id)
    }

    /// Returns `false` if no item in the section has this id.
    pub fn begin_edit<S: ListSection>(&mut self, id: Uuid) -> bool {
        let Some(item) = S::items(&self.draft).iter().find(|i| i.item_id() == id) else {
            return false;
        };
        S::editor_mut(&mut self.editors).begin_edit(item);
        true
    }

    pub fn local_mut<S: ListSection>(&mut self, id: Uuid) -> Option<&mut S::Item> {
        S::editor_mut(&mut self.editors).local_mut(id)
    }

    pub fn cancel_edit<S: ListSection>(&mut self, id: Uuid) -> bool {
        S::editor_mut(&mut self.editors).cancel(id)
    }

    pub fn commit_edit<S: ListSection>(&mut self, id: Uuid) -> bool {
        let Some(items) = S::editor_mut(&mut self.editors).commit(id, S::items(&self.draft)) else {
            return false;
        };
        self.apply(S::update(items));
        true
    }

    /// Prepends a blank item, already in editing, and returns its id.
    pub fn add_item<S: ListSection>(&mut self) -> Uuid {
        let (id, items) = S::editor_mut(&mut self.editors).add_blank(S::items(&self.draft));
        self.apply(S::update(items));
        id
    }

    pub fn remove_item<S: ListSection>(&mut self, id: Uuid) -> bool {
        if !S::items(&self.draft).iter().any(|i| i.item_id() == id) {
            return false;
        }
        let items = S::editor_mut(&mut self.editors).remove(id, S::items(&self.draft));
        self.apply(S::update(items));
        true
    }

    /// Appends the skill from the one-step form. `None` if the name is blank.
    pub fn add_skill(&mut self, form: NewSkillForm) -> Option<Uuid> {
        let skill = form.into_skill()?;
        let id = skill.id;
        let mut skills = self.draft.skills.clone();
        skills.push(skill);
        self.apply(SectionUpdate::Skills(skills));
        Some(id)
    }

    // ── Persistence ────────────────────────────────────────────────────────

    /// Submits the whole draft: `create` the first time, `replace` after.
    ///
    /// On success the draft is reset to what the server stored. On failure the
    /// draft and unsaved flag are left alone and the error is recorded.
    pub async fn save(&mut self, api: &dyn CvApi) -> Result<Cv, ClientError> {
        let body = CvDraft::from(self.draft.clone());
        let result = match self.id {
            None => api.create(&body).await,
            Some(id) => api.replace(id, &body).await,
        };

        match result {
            Ok(cv) => {
                info!("Saved CV {} ({})", cv.id, cv.slug);
                self.id = Some(cv.id);
                self.slug = Some(cv.slug.clone());
                self.draft = cv.fields.clone();
                self.unsaved = false;
                self.last_error = None;
                Ok(cv)
            }
            Err(err) => {
                warn!("Save failed: {err}");
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }
}

/// Draft used by the "New CV" action on the home screen.
pub fn starter_draft() -> CvDraft {
    CvDraft::from(CvFields {
        first_name: "New".to_string(),
        last_name: "Developer".to_string(),
        title: Some("IT Professional".to_string()),
        ..CvFields::default()
    })
}

pub async fn create_starter(api: &dyn CvApi) -> Result<Cv, ClientError> {
    api.create(&starter_draft()).await
}
