//! CV document model: the aggregate persisted under a single storage key.
//!
//! Field names serialize in camelCase so the stored record keeps the shape the
//! browser editor has always written. Every list item owns an opaque string id
//! that is generated once and never rewritten by a patch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Template identifier a fresh document starts with.
pub const DEFAULT_TEMPLATE: &str = "modern";

/// Keys a partial update may never overwrite.
const IMMUTABLE_KEYS: &[&str] = &["id"];

// ────────────────────────────────────────────────────────────────────────────
// Entities
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub website: String,
    pub summary: String,
    /// `data:<mime>;base64,...` URI, absent when no photo was uploaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceItem {
    pub id: String,
    pub company: String,
    pub position: String,
    pub location: String,
    /// `YYYY-MM` or empty.
    pub start_date: String,
    pub end_date: String,
    /// When set, renderers show "Present" whatever `end_date` holds.
    pub is_current_position: bool,
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationItem {
    pub id: String,
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub is_currently_studying: bool,
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillItem {
    pub id: String,
    pub name: String,
    /// Intended range 1–5. Not enforced here; the editor clamps it.
    pub level: i32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub url: String,
    pub start_date: String,
    pub end_date: String,
    pub is_ongoing: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The whole CV. Owned exclusively by the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvDocument {
    #[serde(default)]
    pub personal_info: PersonalInfo,
    /// Newest first.
    #[serde(default)]
    pub experiences: Vec<ExperienceItem>,
    /// Newest first.
    #[serde(default)]
    pub education: Vec<EducationItem>,
    /// Append order.
    #[serde(default)]
    pub skills: Vec<SkillItem>,
    /// Newest first.
    #[serde(default)]
    pub projects: Vec<ProjectItem>,
    #[serde(default = "default_template")]
    pub template: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

impl CvDocument {
    /// An empty document stamped with the given creation time.
    pub fn empty_at(now: DateTime<Utc>) -> Self {
        Self {
            personal_info: PersonalInfo::default(),
            experiences: Vec::new(),
            education: Vec::new(),
            skills: Vec::new(),
            projects: Vec::new(),
            template: default_template(),
            created_at: now,
            updated_at: now,
        }
    }

    /// True when every field except the timestamps matches a fresh document.
    #[cfg(test)]
    pub fn is_blank(&self) -> bool {
        let blank = Self::empty_at(self.created_at);
        self.personal_info == blank.personal_info
            && self.experiences.is_empty()
            && self.education.is_empty()
            && self.skills.is_empty()
            && self.projects.is_empty()
            && self.template == blank.template
    }
}

impl Default for CvDocument {
    fn default() -> Self {
        Self::empty_at(Utc::now())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Partial updates
// ────────────────────────────────────────────────────────────────────────────

/// Field-wise patch for [`PersonalInfo`]. Absent fields stay untouched;
/// unknown fields are kept verbatim in `extra`.
///
/// Patches are typed, so there is no separate validation step: a known field
/// carrying the wrong JSON type (say `"level": "high"`) fails deserialization
/// and the request is rejected before the document is touched. The same holds
/// for every patch below. An `id` key is dropped instead of landing in `extra`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfoPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub summary: Option<String>,
    pub profile_photo: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Field-wise patch for [`ExperienceItem`]; typed like [`PersonalInfoPatch`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperiencePatch {
    pub company: Option<String>,
    pub position: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub is_current_position: Option<bool>,
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Field-wise patch for [`EducationItem`]; typed like [`PersonalInfoPatch`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationPatch {
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub field: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub is_currently_studying: Option<bool>,
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Field-wise patch for [`SkillItem`]; typed like [`PersonalInfoPatch`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillPatch {
    pub name: Option<String>,
    pub level: Option<i32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Field-wise patch for [`ProjectItem`]; typed like [`PersonalInfoPatch`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub is_ongoing: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Last write wins for unknown keys; immutable keys are dropped.
fn merge_extra(target: &mut Map<String, Value>, extra: Map<String, Value>) {
    for (key, value) in extra {
        if IMMUTABLE_KEYS.contains(&key.as_str()) {
            continue;
        }
        target.insert(key, value);
    }
}

impl PersonalInfo {
    pub fn apply(&mut self, patch: PersonalInfoPatch) {
        set(&mut self.first_name, patch.first_name);
        set(&mut self.last_name, patch.last_name);
        set(&mut self.title, patch.title);
        set(&mut self.email, patch.email);
        set(&mut self.phone, patch.phone);
        set(&mut self.location, patch.location);
        set(&mut self.website, patch.website);
        set(&mut self.summary, patch.summary);
        if patch.profile_photo.is_some() {
            self.profile_photo = patch.profile_photo;
        }
        merge_extra(&mut self.extra, patch.extra);
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Repeated-entity behaviour shared by the store
// ────────────────────────────────────────────────────────────────────────────

/// Where `add` places a fresh item in its list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Prepend,
    Append,
}

/// A member of one of the document's ordered lists.
pub trait ListItem {
    type Patch;

    /// Where newly created items of this kind go.
    const PLACEMENT: Placement;

    fn id(&self) -> &str;

    /// A new item with type-appropriate empty defaults.
    fn blank(id: String) -> Self;

    /// Merges the named fields of `patch`; everything else is left as is.
    fn apply(&mut self, patch: Self::Patch);
}

impl ListItem for ExperienceItem {
    type Patch = ExperiencePatch;
    const PLACEMENT: Placement = Placement::Prepend;

    fn id(&self) -> &str {
        &self.id
    }

    fn blank(id: String) -> Self {
        Self {
            id,
            company: String::new(),
            position: String::new(),
            location: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            is_current_position: false,
            description: String::new(),
            extra: Map::new(),
        }
    }

    fn apply(&mut self, patch: ExperiencePatch) {
        set(&mut self.company, patch.company);
        set(&mut self.position, patch.position);
        set(&mut self.location, patch.location);
        set(&mut self.start_date, patch.start_date);
        set(&mut self.end_date, patch.end_date);
        set(&mut self.is_current_position, patch.is_current_position);
        set(&mut self.description, patch.description);
        merge_extra(&mut self.extra, patch.extra);
    }
}

impl ListItem for EducationItem {
    type Patch = EducationPatch;
    const PLACEMENT: Placement = Placement::Prepend;

    fn id(&self) -> &str {
        &self.id
    }

    fn blank(id: String) -> Self {
        Self {
            id,
            institution: String::new(),
            degree: String::new(),
            field: String::new(),
            location: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            is_currently_studying: false,
            description: String::new(),
            extra: Map::new(),
        }
    }

    fn apply(&mut self, patch: EducationPatch) {
        set(&mut self.institution, patch.institution);
        set(&mut self.degree, patch.degree);
        set(&mut self.field, patch.field);
        set(&mut self.location, patch.location);
        set(&mut self.start_date, patch.start_date);
        set(&mut self.end_date, patch.end_date);
        set(&mut self.is_currently_studying, patch.is_currently_studying);
        set(&mut self.description, patch.description);
        merge_extra(&mut self.extra, patch.extra);
    }
}

/// Level a freshly added skill starts at.
pub const DEFAULT_SKILL_LEVEL: i32 = 3;

impl ListItem for SkillItem {
    type Patch = SkillPatch;
    const PLACEMENT: Placement = Placement::Append;

    fn id(&self) -> &str {
        &self.id
    }

    fn blank(id: String) -> Self {
        Self {
            id,
            name: String::new(),
            level: DEFAULT_SKILL_LEVEL,
            extra: Map::new(),
        }
    }

    fn apply(&mut self, patch: SkillPatch) {
        set(&mut self.name, patch.name);
        set(&mut self.level, patch.level);
        merge_extra(&mut self.extra, patch.extra);
    }
}

impl ListItem for ProjectItem {
    type Patch = ProjectPatch;
    const PLACEMENT: Placement = Placement::Prepend;

    fn id(&self) -> &str {
        &self.id
    }

    fn blank(id: String) -> Self {
        Self {
            id,
            name: String::new(),
            description: String::new(),
            url: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            is_ongoing: false,
            extra: Map::new(),
        }
    }

    fn apply(&mut self, patch: ProjectPatch) {
        set(&mut self.name, patch.name);
        set(&mut self.description, patch.description);
        set(&mut self.url, patch.url);
        set(&mut self.start_date, patch.start_date);
        set(&mut self.end_date, patch.end_date);
        set(&mut self.is_ongoing, patch.is_ongoing);
        merge_extra(&mut self.extra, patch.extra);
    }
}
