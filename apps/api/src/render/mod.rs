//! Rendering engine: a pure function of the CV document.
//!
//! A template turns a [`CvDocument`] into a [`RenderedCv`]: a structured tree
//! with stable element ids that the preview, the HTML serializer and the
//! export adapter all read. Templates are looked up by id in an explicit
//! registry; an unknown id renders with the fallback template instead.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::models::cv::{CvDocument, DEFAULT_TEMPLATE};

pub mod dates;
pub mod handlers;
pub mod html;
pub mod modern;

/// Element id prefix of a template's root node.
pub const ROOT_ELEMENT_PREFIX: &str = "cv-template-";

pub type RenderFn = fn(&CvDocument) -> RenderedCv;

// ────────────────────────────────────────────────────────────────────────────
// Rendered tree
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedCv {
    /// `cv-template-<template>`; the export adapter looks this up.
    pub element_id: String,
    pub template: String,
    pub header: HeaderBlock,
    /// In display order. Empty lists produce no section.
    pub sections: Vec<Section>,
}

impl RenderedCv {
    /// Whether `element_id` names the root or one of its sections.
    pub fn contains_element(&self, element_id: &str) -> bool {
        self.element_id == element_id || self.sections.iter().any(|s| s.element_id == element_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderBlock {
    pub full_name: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    pub contacts: Vec<ContactLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactLine {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Experience,
    Education,
    Skills,
    Projects,
}

impl SectionKind {
    pub fn element_id(self) -> &'static str {
        match self {
            Self::Experience => "cv-section-experience",
            Self::Education => "cv-section-education",
            Self::Skills => "cv-section-skills",
            Self::Projects => "cv-section-projects",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub element_id: String,
    pub kind: SectionKind,
    pub heading: String,
    pub body: SectionBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "items", rename_all = "snake_case")]
pub enum SectionBody {
    Timeline(Vec<TimelineEntry>),
    Skills(Vec<SkillMeter>),
    Projects(Vec<ProjectEntry>),
}

/// One experience or education entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub id: String,
    pub headline: String,
    pub subheading: String,
    pub location: String,
    pub period: String,
    /// Line breaks are kept as entered.
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillMeter {
    pub id: String,
    pub name: String,
    /// Stored level clamped to the meter's range.
    pub level: u8,
    /// One flag per segment, filled from the left.
    pub segments: Vec<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
    pub id: String,
    pub name: String,
    pub period: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<ProjectLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectLink {
    pub href: String,
    pub label: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Registry
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TemplateInfo {
    pub id: &'static str,
    pub name: &'static str,
}

#[derive(Clone, Copy)]
struct TemplateEntry {
    info: TemplateInfo,
    render: RenderFn,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOutput {
    pub requested_template: String,
    pub template_used: String,
    pub fell_back: bool,
    pub cv: RenderedCv,
    #[serde(skip)]
    pub html: String,
}

/// Template id → renderer, with one entry designated as the fallback.
pub struct TemplateRegistry {
    entries: BTreeMap<&'static str, TemplateEntry>,
    fallback: TemplateEntry,
}

impl TemplateRegistry {
    /// A registry whose only entry, and fallback, is `fallback`.
    pub fn new(fallback: TemplateInfo, render: RenderFn) -> Self {
        let entry = TemplateEntry {
            info: fallback,
            render,
        };
        let mut entries = BTreeMap::new();
        entries.insert(fallback.id, entry);
        Self {
            entries,
            fallback: entry,
        }
    }

    /// Every template this build ships with.
    pub fn with_builtin() -> Self {
        Self::new(
            TemplateInfo {
                id: DEFAULT_TEMPLATE,
                name: "Modern",
            },
            modern::render,
        )
    }

    #[cfg(test)]
    pub fn register(&mut self, info: TemplateInfo, render: RenderFn) {
        self.entries.insert(info.id, TemplateEntry { info, render });
    }

    /// The renderer for `template_id`, and whether the fallback was used.
    pub fn resolve(&self, template_id: &str) -> (TemplateInfo, RenderFn, bool) {
        match self.entries.get(template_id) {
            Some(entry) => (entry.info, entry.render, false),
            None => {
                warn!(
                    "Unknown template '{template_id}', rendering with '{}'",
                    self.fallback.info.id
                );
                (self.fallback.info, self.fallback.render, true)
            }
        }
    }

    /// Renders `document` with its own template (or the fallback).
    pub fn render(&self, document: &CvDocument) -> RenderOutput {
        let (info, render, fell_back) = self.resolve(&document.template);
        let cv = render(document);
        let html = html::to_html(&cv);
        RenderOutput {
            requested_template: document.template.clone(),
            template_used: info.id.to_string(),
            fell_back,
            cv,
            html,
        }
    }

    pub fn available_templates(&self) -> Vec<TemplateInfo> {
        self.entries.values().map(|e| e.info).collect()
    }
}
