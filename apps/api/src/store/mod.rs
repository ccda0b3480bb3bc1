//! Document store: the single owner of the CV and the only way to change it.
//!
//! Every successful mutation goes through [`DocumentStore::commit`], which
//! refreshes `updatedAt` and writes the whole document through the
//! persistence adapter. A failed write is logged and otherwise ignored: the
//! in-memory document always reflects the latest mutation.
//!
//! Updates and removals that name an unknown id are silent no-ops.

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::cv::{
    CvDocument, EducationPatch, ExperiencePatch, ListItem, PersonalInfoPatch, Placement,
    ProjectPatch, SkillPatch,
};
use crate::models::sample::sample_document;
use crate::storage::DocumentRepository;

pub mod handlers;
pub mod notifications;
pub mod photo;

pub use notifications::Notification;
use photo::{encode_data_uri, PhotoError};

pub struct DocumentStore {
    document: CvDocument,
    repository: DocumentRepository,
    pending: Vec<Notification>,
}

impl DocumentStore {
    /// Restores the persisted document, or starts from defaults.
    pub async fn open(mut repository: DocumentRepository) -> Self {
        let document = repository.load().await;
        debug!(
            "Document store opened: {} experiences, {} education, {} skills, {} projects",
            document.experiences.len(),
            document.education.len(),
            document.skills.len(),
            document.projects.len()
        );
        Self {
            document,
            repository,
            pending: Vec::new(),
        }
    }

    pub fn document(&self) -> &CvDocument {
        &self.document
    }

    /// Drains the notifications queued since the last call.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.pending)
    }

    fn notify(&mut self, notification: Notification) {
        self.pending.push(notification);
    }

    async fn commit(&mut self) {
        self.document.updated_at = Utc::now();
        self.persist().await;
    }

    async fn persist(&mut self) {
        if let Err(e) = self.repository.save(&self.document).await {
            warn!("Failed to persist CV, keeping in-memory state: {e}");
        }
    }

    async fn replace(&mut self, document: CvDocument) {
        self.document = document;
        self.persist().await;
    }

    // ── Personal info ───────────────────────────────────────────────────────

    pub async fn update_personal_info(&mut self, patch: PersonalInfoPatch) {
        self.document.personal_info.apply(patch);
        self.commit().await;
    }

    /// Validates and stores an uploaded profile photo as a data URI.
    pub async fn set_profile_photo(
        &mut self,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), PhotoError> {
        let uri = encode_data_uri(bytes, content_type)?;
        self.document.personal_info.profile_photo = Some(uri);
        self.commit().await;
        Ok(())
    }

    pub async fn clear_profile_photo(&mut self) {
        self.document.personal_info.profile_photo = None;
        self.commit().await;
    }

    // ── Experience ──────────────────────────────────────────────────────────

    pub async fn add_experience(&mut self) -> String {
        let id = add_item(&mut self.document.experiences);
        self.commit().await;
        id
    }

    pub async fn update_experience(&mut self, id: &str, patch: ExperiencePatch) {
        if update_item(&mut self.document.experiences, id, patch) {
            self.commit().await;
        }
    }

    pub async fn remove_experience(&mut self, id: &str) {
        if remove_item(&mut self.document.experiences, id) {
            self.commit().await;
            self.notify(Notification::info(
                "Experience removed",
                "The experience has been removed from your CV",
            ));
        }
    }

    // ── Education ───────────────────────────────────────────────────────────

    pub async fn add_education(&mut self) -> String {
        let id = add_item(&mut self.document.education);
        self.commit().await;
        id
    }

    pub async fn update_education(&mut self, id: &str, patch: EducationPatch) {
        if update_item(&mut self.document.education, id, patch) {
            self.commit().await;
        }
    }

    pub async fn remove_education(&mut self, id: &str) {
        if remove_item(&mut self.document.education, id) {
            self.commit().await;
            self.notify(Notification::info(
                "Education removed",
                "The education has been removed from your CV",
            ));
        }
    }

    // ── Skills ──────────────────────────────────────────────────────────────

    pub async fn add_skill(&mut self) -> String {
        let id = add_item(&mut self.document.skills);
        self.commit().await;
        id
    }

    pub async fn update_skill(&mut self, id: &str, patch: SkillPatch) {
        if update_item(&mut self.document.skills, id, patch) {
            self.commit().await;
        }
    }

    pub async fn remove_skill(&mut self, id: &str) {
        if remove_item(&mut self.document.skills, id) {
            self.commit().await;
            self.notify(Notification::info(
                "Skill removed",
                "The skill has been removed from your CV",
            ));
        }
    }

    // ── Projects ────────────────────────────────────────────────────────────

    pub async fn add_project(&mut self) -> String {
        let id = add_item(&mut self.document.projects);
        self.commit().await;
        id
    }

    pub async fn update_project(&mut self, id: &str, patch: ProjectPatch) {
        if update_item(&mut self.document.projects, id, patch) {
            self.commit().await;
        }
    }

    pub async fn remove_project(&mut self, id: &str) {
        if remove_item(&mut self.document.projects, id) {
            self.commit().await;
            self.notify(Notification::info(
                "Project removed",
                "The project has been removed from your CV",
            ));
        }
    }

    // ── Whole document ──────────────────────────────────────────────────────

    /// Stores the template id verbatim. Unknown ids are resolved at render time.
    pub async fn set_template(&mut self, template_id: &str) {
        self.document.template = template_id.to_string();
        self.commit().await;
        self.notify(Notification::info(
            "Template updated",
            format!("CV template changed to {template_id}"),
        ));
    }

    pub async fn reset_cv(&mut self) {
        self.replace(CvDocument::default()).await;
        self.notify(Notification::info(
            "CV reset",
            "Your CV has been reset to default",
        ));
    }

    pub async fn load_sample_data(&mut self) {
        self.replace(sample_document()).await;
        self.notify(Notification::info(
            "Sample data loaded",
            "Your CV has been filled with sample data",
        ));
    }
}

// ────────────────────────────────────────────────────────────────────────────
// List helpers
// ────────────────────────────────────────────────────────────────────────────

/// Inserts a blank item with an id unused in `items` and returns that id.
fn add_item<T: ListItem>(items: &mut Vec<T>) -> String {
    let id = loop {
        let candidate = Uuid::new_v4().to_string();
        if !items.iter().any(|item| item.id() == candidate) {
            break candidate;
        }
    };
    let item = T::blank(id.clone());
    match T::PLACEMENT {
        Placement::Prepend => items.insert(0, item),
        Placement::Append => items.push(item),
    }
    id
}

/// Returns `false` when no item has `id`.
fn update_item<T: ListItem>(items: &mut [T], id: &str, patch: T::Patch) -> bool {
    match items.iter_mut().find(|item| item.id() == id) {
        Some(item) => {
            item.apply(patch);
            true
        }
        None => {
            debug!("Update for unknown id {id} ignored");
            false
        }
    }
}

/// Returns `false` when no item has `id`.
fn remove_item<T: ListItem>(items: &mut Vec<T>, id: &str) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cv::PersonalInfo;
    use crate::storage::{KeyValueStore, MemoryStore, StorageError, STORAGE_KEY};
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone};
    use serde_json::json;
    use std::collections::HashSet;
    use std::sync::Arc;
    use tokio::sync::Semaphore;

    async fn open_store() -> (DocumentStore, MemoryStore) {
        let backend = MemoryStore::new();
        let store = DocumentStore::open(DocumentRepository::new(Box::new(backend.clone()))).await;
        (store, backend)
    }

    fn persisted(backend: &MemoryStore) -> CvDocument {
        serde_json::from_str(&backend.raw(STORAGE_KEY).unwrap()).unwrap()
    }

    fn stale_stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap()
    }

    /// The sample document, restored from storage with both stamps in 2000.
    async fn stale_store() -> DocumentStore {
        let backend = MemoryStore::new();
        let mut doc = sample_document();
        doc.created_at = stale_stamp();
        doc.updated_at = stale_stamp();
        backend.insert(STORAGE_KEY, &serde_json::to_string(&doc).unwrap());
        DocumentStore::open(DocumentRepository::new(Box::new(backend))).await
    }

    fn assert_touched(store: &DocumentStore, operation: &str) {
        let doc = store.document();
        assert!(doc.updated_at > stale_stamp(), "{operation} left updatedAt stale");
        assert_eq!(doc.created_at, stale_stamp(), "{operation} changed createdAt");
    }

    struct FailingStore;

    #[async_trait]
    impl KeyValueStore for FailingStore {
        async fn get(&mut self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        async fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }
    }

    /// Parks every write until a permit is added to `gate`.
    struct GatedStore {
        gate: Arc<Semaphore>,
        inner: MemoryStore,
    }

    #[async_trait]
    impl KeyValueStore for GatedStore {
        async fn get(&mut self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key).await
        }

        async fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            let _permit = self
                .gate
                .acquire()
                .await
                .map_err(|e| StorageError::Unavailable(e.to_string()))?;
            self.inner.set(key, value).await
        }
    }

    #[tokio::test]
    async fn test_open_restores_persisted_document() {
        let backend = MemoryStore::new();
        let mut doc = CvDocument::default();
        doc.personal_info.first_name = "Grace".to_string();
        backend.insert(STORAGE_KEY, &serde_json::to_string(&doc).unwrap());

        let store = DocumentStore::open(DocumentRepository::new(Box::new(backend))).await;
        assert_eq!(store.document(), &doc);
    }

    #[tokio::test]
    async fn test_add_experience_prepends_and_persists() {
        let (mut store, backend) = open_store().await;
        let first = store.add_experience().await;
        let second = store.add_experience().await;

        let doc = store.document();
        assert_eq!(doc.experiences.len(), 2);
        assert_eq!(doc.experiences[0].id, second);
        assert_eq!(doc.experiences[1].id, first);
        assert!(!doc.experiences[0].is_current_position);
        assert_eq!(persisted(&backend), *doc);
    }

    #[tokio::test]
    async fn test_add_skill_appends_with_default_level() {
        let (mut store, _) = open_store().await;
        let first = store.add_skill().await;
        let second = store.add_skill().await;

        let skills = &store.document().skills;
        assert_eq!(skills[0].id, first);
        assert_eq!(skills[1].id, second);
        assert!(skills.iter().all(|s| s.level == 3));
    }

    #[tokio::test]
    async fn test_add_yields_unique_ids() {
        let (mut store, _) = open_store().await;
        for _ in 0..50 {
            store.add_project().await;
        }
        let ids: HashSet<&str> = store
            .document()
            .projects
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids.len(), 50);
    }

    #[tokio::test]
    async fn test_update_changes_only_named_fields() {
        let (mut store, backend) = open_store().await;
        let target = store.add_education().await;
        let other = store.add_education().await;
        store
            .update_education(
                &other,
                serde_json::from_value(json!({"institution": "MIT"})).unwrap(),
            )
            .await;
        let untouched_other = store.document().education[0].clone();
        let before = store.document().education[1].clone();

        let patch: EducationPatch =
            serde_json::from_value(json!({"degree": "BSc", "isCurrentlyStudying": true})).unwrap();
        store.update_education(&target, patch).await;

        let doc = store.document();
        let updated = &doc.education[1];
        assert_eq!(updated.degree, "BSc");
        assert!(updated.is_currently_studying);
        assert_eq!(updated.institution, before.institution);
        assert_eq!(updated.field, before.field);
        assert_eq!(updated.description, before.description);
        assert_eq!(doc.education[0], untouched_other);
        assert_eq!(persisted(&backend), *doc);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_silent_noop() {
        let (mut store, _) = open_store().await;
        store.add_skill().await;
        let before = store.document().clone();

        store.update_skill("missing", SkillPatch::default()).await;
        store
            .update_experience("missing", ExperiencePatch::default())
            .await;

        assert_eq!(store.document(), &before);
        assert!(store.take_notifications().is_empty());
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let (mut store, _) = open_store().await;
        let id = store.add_project().await;
        let keep = store.add_project().await;

        store.remove_project(&id).await;
        let after_first = store.document().clone();
        let notes = store.take_notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Project removed");

        store.remove_project(&id).await;
        assert_eq!(store.document(), &after_first);
        assert!(store.take_notifications().is_empty());
        assert_eq!(after_first.projects.len(), 1);
        assert_eq!(after_first.projects[0].id, keep);
    }

    #[tokio::test]
    async fn test_ids_survive_sibling_removal() {
        let (mut store, _) = open_store().await;
        let a = store.add_skill().await;
        let b = store.add_skill().await;
        let c = store.add_skill().await;
        store.remove_skill(&b).await;

        let ids: Vec<&str> = store.document().skills.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec![a.as_str(), c.as_str()]);
    }

    #[tokio::test]
    async fn test_personal_info_and_photo_mutations_refresh_updated_at() {
        let mut store = stale_store().await;
        store
            .update_personal_info(PersonalInfoPatch {
                title: Some("Engineer".to_string()),
                ..PersonalInfoPatch::default()
            })
            .await;
        assert_touched(&store, "update_personal_info");
        assert_eq!(store.document().personal_info.title, "Engineer");

        let mut store = stale_store().await;
        store
            .set_profile_photo(b"\x89PNG", "image/png")
            .await
            .unwrap();
        assert_touched(&store, "set_profile_photo");

        let mut store = stale_store().await;
        store.clear_profile_photo().await;
        assert_touched(&store, "clear_profile_photo");

        let mut store = stale_store().await;
        store.set_template("classic").await;
        assert_touched(&store, "set_template");
    }

    #[tokio::test]
    async fn test_list_mutations_refresh_updated_at() {
        let mut store = stale_store().await;
        store.add_experience().await;
        assert_touched(&store, "add_experience");
        let mut store = stale_store().await;
        let id = store.document().experiences[0].id.clone();
        store
            .update_experience(&id, ExperiencePatch::default())
            .await;
        assert_touched(&store, "update_experience");
        let mut store = stale_store().await;
        let id = store.document().experiences[0].id.clone();
        store.remove_experience(&id).await;
        assert_touched(&store, "remove_experience");

        let mut store = stale_store().await;
        store.add_education().await;
        assert_touched(&store, "add_education");
        let mut store = stale_store().await;
        let id = store.document().education[0].id.clone();
        store.update_education(&id, EducationPatch::default()).await;
        assert_touched(&store, "update_education");
        let mut store = stale_store().await;
        let id = store.document().education[0].id.clone();
        store.remove_education(&id).await;
        assert_touched(&store, "remove_education");

        let mut store = stale_store().await;
        store.add_skill().await;
        assert_touched(&store, "add_skill");
        let mut store = stale_store().await;
        let id = store.document().skills[0].id.clone();
        store.update_skill(&id, SkillPatch::default()).await;
        assert_touched(&store, "update_skill");
        let mut store = stale_store().await;
        let id = store.document().skills[0].id.clone();
        store.remove_skill(&id).await;
        assert_touched(&store, "remove_skill");

        let mut store = stale_store().await;
        store.add_project().await;
        assert_touched(&store, "add_project");
        let mut store = stale_store().await;
        let id = store.document().projects[0].id.clone();
        store.update_project(&id, ProjectPatch::default()).await;
        assert_touched(&store, "update_project");
        let mut store = stale_store().await;
        let id = store.document().projects[0].id.clone();
        store.remove_project(&id).await;
        assert_touched(&store, "remove_project");
    }

    #[tokio::test]
    async fn test_noop_update_keeps_updated_at() {
        let mut store = stale_store().await;
        store.update_skill("missing", SkillPatch::default()).await;
        store.remove_project("missing").await;
        assert_eq!(store.document().updated_at, stale_stamp());
    }

    #[tokio::test]
    async fn test_reset_and_sample_restamp_both_timestamps() {
        let mut store = stale_store().await;
        store.reset_cv().await;
        assert!(store.document().created_at > stale_stamp());
        assert!(store.document().updated_at > stale_stamp());

        let mut store = stale_store().await;
        store.load_sample_data().await;
        assert!(store.document().created_at > stale_stamp());
        assert!(store.document().updated_at > stale_stamp());
    }

    #[tokio::test]
    async fn test_personal_info_merge_keeps_other_fields() {
        let (mut store, _) = open_store().await;
        store
            .update_personal_info(PersonalInfoPatch {
                first_name: Some("Ada".to_string()),
                email: Some("ada@example.com".to_string()),
                ..PersonalInfoPatch::default()
            })
            .await;
        store
            .update_personal_info(PersonalInfoPatch {
                last_name: Some("Lovelace".to_string()),
                ..PersonalInfoPatch::default()
            })
            .await;

        let info = &store.document().personal_info;
        assert_eq!(info.first_name, "Ada");
        assert_eq!(info.last_name, "Lovelace");
        assert_eq!(info.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_set_template_accepts_unknown_id_verbatim() {
        let (mut store, backend) = open_store().await;
        store.set_template("nonexistent").await;

        assert_eq!(store.document().template, "nonexistent");
        assert_eq!(persisted(&backend).template, "nonexistent");
        let notes = store.take_notifications();
        assert_eq!(notes[0].title, "Template updated");
        assert_eq!(notes[0].description, "CV template changed to nonexistent");
    }

    #[tokio::test]
    async fn test_set_template_on_record_without_template() {
        let backend = MemoryStore::new();
        backend.insert(
            STORAGE_KEY,
            r#"{"personalInfo":{},"createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"}"#,
        );
        let mut store =
            DocumentStore::open(DocumentRepository::new(Box::new(backend.clone()))).await;

        store.set_template("modern").await;

        assert_eq!(store.document().template, "modern");
        let raw: serde_json::Value =
            serde_json::from_str(&backend.raw(STORAGE_KEY).unwrap()).unwrap();
        assert_eq!(raw["template"], json!("modern"));
    }

    #[tokio::test]
    async fn test_reset_clears_populated_document() {
        let (mut store, backend) = open_store().await;
        store.load_sample_data().await;
        store.set_template("classic").await;
        store.take_notifications();

        store.reset_cv().await;

        let doc = store.document();
        assert!(doc.experiences.is_empty());
        assert!(doc.education.is_empty());
        assert!(doc.skills.is_empty());
        assert!(doc.projects.is_empty());
        assert_eq!(doc.personal_info, PersonalInfo::default());
        assert_eq!(doc.template, "modern");
        assert!(persisted(&backend).is_blank());
        assert_eq!(store.take_notifications()[0].title, "CV reset");
    }

    #[tokio::test]
    async fn test_load_sample_data_replaces_document() {
        let (mut store, backend) = open_store().await;
        store.add_skill().await;
        store.load_sample_data().await;

        let doc = store.document();
        assert_eq!(doc.personal_info.first_name, "Alex");
        assert_eq!(doc.skills.len(), 8);
        assert_eq!(persisted(&backend), *doc);
        assert_eq!(store.take_notifications()[0].title, "Sample data loaded");
    }

    #[tokio::test]
    async fn test_persistence_failure_does_not_block_mutation() {
        let mut store =
            DocumentStore::open(DocumentRepository::new(Box::new(FailingStore))).await;
        let id = store.add_experience().await;
        store
            .update_experience(
                &id,
                serde_json::from_value(json!({"company": "Acme"})).unwrap(),
            )
            .await;

        assert_eq!(store.document().experiences[0].company, "Acme");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_pending_write_yields_the_runtime() {
        let gate = Arc::new(Semaphore::new(0));
        let backend = MemoryStore::new();
        let store = DocumentStore::open(DocumentRepository::new(Box::new(GatedStore {
            gate: gate.clone(),
            inner: backend.clone(),
        })))
        .await;

        let writer = tokio::spawn(async move {
            let mut store = store;
            store.add_skill().await;
            store
        });

        // One thread only: reaching this point means the writer suspended.
        tokio::task::yield_now().await;
        assert!(!writer.is_finished());
        assert!(backend.raw(STORAGE_KEY).is_none());

        gate.add_permits(1);
        let store = writer.await.unwrap();
        assert_eq!(store.document().skills.len(), 1);
        assert_eq!(persisted(&backend), *store.document());
    }

    #[tokio::test]
    async fn test_profile_photo_upload_and_clear() {
        let (mut store, _) = open_store().await;
        store
            .set_profile_photo(b"\x89PNG", "image/png")
            .await
            .unwrap();
        assert_eq!(
            store.document().personal_info.profile_photo.as_deref(),
            Some("data:image/png;base64,iVBORw==")
        );

        let err = store
            .set_profile_photo(b"text", "text/plain")
            .await
            .unwrap_err();
        assert!(matches!(err, PhotoError::NotAnImage(_)));
        assert!(store.document().personal_info.profile_photo.is_some());

        store.clear_profile_photo().await;
        assert!(store.document().personal_info.profile_photo.is_none());
    }
}
