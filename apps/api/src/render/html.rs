//! HTML serialization of a rendered CV.
//!
//! Produces the standalone subtree the browser shell mounts for preview and
//! rasterizes for export. All document text is escaped; element ids match
//! the ids on [`RenderedCv`] so the export adapter and the DOM agree.

use std::fmt::Write;

use crate::render::{
    HeaderBlock, ProjectEntry, RenderedCv, Section, SectionBody, SkillMeter, TimelineEntry,
};

/// Escapes text for use in element content and quoted attribute values.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

pub fn to_html(cv: &RenderedCv) -> String {
    let mut out = String::with_capacity(4096);
    let _ = write!(
        out,
        r#"<div id="{}" class="cv cv-{}">"#,
        html_escape(&cv.element_id),
        html_escape(&cv.template)
    );
    write_header(&mut out, &cv.header);
    for section in &cv.sections {
        write_section(&mut out, section);
    }
    out.push_str("</div>");
    out
}

fn write_header(out: &mut String, header: &HeaderBlock) {
    out.push_str(r#"<header class="cv-header"><div class="cv-identity">"#);
    let _ = write!(out, "<h1>{}</h1>", html_escape(&header.full_name));
    if !header.title.trim().is_empty() {
        let _ = write!(out, r#"<p class="cv-title">{}</p>"#, html_escape(&header.title));
    }
    out.push_str("</div>");

    if let Some(photo) = &header.photo {
        let _ = write!(
            out,
            r#"<img class="cv-photo" src="{}" alt="{}">"#,
            html_escape(photo),
            html_escape(&header.full_name)
        );
    }

    if !header.contacts.is_empty() {
        out.push_str(r#"<ul class="cv-contacts">"#);
        for contact in &header.contacts {
            let _ = write!(
                out,
                "<li><span>{}:</span> {}</li>",
                html_escape(&contact.label),
                html_escape(&contact.value)
            );
        }
        out.push_str("</ul>");
    }

    if let Some(summary) = &header.summary {
        let _ = write!(out, r#"<p class="cv-summary">{}</p>"#, html_escape(summary));
    }
    out.push_str("</header>");
}

fn write_section(out: &mut String, section: &Section) {
    let _ = write!(
        out,
        r#"<section id="{}"><h2>{}</h2>"#,
        html_escape(&section.element_id),
        html_escape(&section.heading)
    );
    match &section.body {
        SectionBody::Timeline(entries) => entries.iter().for_each(|e| write_timeline_entry(out, e)),
        SectionBody::Skills(meters) => meters.iter().for_each(|m| write_skill(out, m)),
        SectionBody::Projects(projects) => projects.iter().for_each(|p| write_project(out, p)),
    }
    out.push_str("</section>");
}

fn write_description(out: &mut String, text: &str) {
    if text.trim().is_empty() {
        return;
    }
    // pre-line keeps the author's line breaks.
    let _ = write!(
        out,
        r#"<div class="cv-description" style="white-space: pre-line">{}</div>"#,
        html_escape(text)
    );
}

fn write_timeline_entry(out: &mut String, entry: &TimelineEntry) {
    let _ = write!(
        out,
        r#"<article data-id="{}"><h3>{}</h3><p class="cv-subheading">{}</p><p class="cv-meta">{}</p><p class="cv-period">{}</p>"#,
        html_escape(&entry.id),
        html_escape(&entry.headline),
        html_escape(&entry.subheading),
        html_escape(&entry.location),
        html_escape(&entry.period)
    );
    write_description(out, &entry.description);
    out.push_str("</article>");
}

fn write_skill(out: &mut String, meter: &SkillMeter) {
    let _ = write!(
        out,
        r#"<div class="cv-skill" data-id="{}" data-level="{}"><span>{}</span><span class="cv-meter">"#,
        html_escape(&meter.id),
        meter.level,
        html_escape(&meter.name)
    );
    for filled in &meter.segments {
        out.push_str(if *filled {
            r#"<i class="on"></i>"#
        } else {
            r#"<i class="off"></i>"#
        });
    }
    out.push_str("</span></div>");
}

fn write_project(out: &mut String, project: &ProjectEntry) {
    let _ = write!(
        out,
        r#"<article data-id="{}"><h3>{}</h3><p class="cv-period">{}</p>"#,
        html_escape(&project.id),
        html_escape(&project.name),
        html_escape(&project.period)
    );
    write_description(out, &project.description);
    if let Some(link) = &project.link {
        let _ = write!(
            out,
            r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
            html_escape(&link.href),
            html_escape(&link.label)
        );
    }
    out.push_str("</article>");
}
