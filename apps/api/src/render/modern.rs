// "Modern" template: header with contact strip, then experience, education,
// skills and projects, each only when non-empty.

use crate::models::cv::{CvDocument, EducationItem, ExperienceItem, PersonalInfo, ProjectItem, SkillItem};
use crate::render::dates::period_label;
use crate::render::{
    ContactLine, HeaderBlock, ProjectEntry, ProjectLink, RenderedCv, Section, SectionBody,
    SectionKind, SkillMeter, TimelineEntry, ROOT_ELEMENT_PREFIX,
};

pub const TEMPLATE_ID: &str = "modern";
pub const SKILL_SEGMENTS: u8 = 5;

pub fn render(document: &CvDocument) -> RenderedCv {
    let mut sections = Vec::new();

    if !document.experiences.is_empty() {
        sections.push(section(
            SectionKind::Experience,
            "Professional Experience",
            SectionBody::Timeline(document.experiences.iter().map(experience_entry).collect()),
        ));
    }
    if !document.education.is_empty() {
        sections.push(section(
            SectionKind::Education,
            "Education",
            SectionBody::Timeline(document.education.iter().map(education_entry).collect()),
        ));
    }
    if !document.skills.is_empty() {
        sections.push(section(
            SectionKind::Skills,
            "Skills",
            SectionBody::Skills(document.skills.iter().map(skill_meter).collect()),
        ));
    }
    if !document.projects.is_empty() {
        sections.push(section(
            SectionKind::Projects,
            "Projects",
            SectionBody::Projects(document.projects.iter().map(project_entry).collect()),
        ));
    }

    RenderedCv {
        element_id: format!("{ROOT_ELEMENT_PREFIX}{TEMPLATE_ID}"),
        template: TEMPLATE_ID.to_string(),
        header: header(&document.personal_info),
        sections,
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| value.to_string())
}

fn header(info: &PersonalInfo) -> HeaderBlock {
    let contacts = [
        ("Email", &info.email),
        ("Phone", &info.phone),
        ("Location", &info.location),
        ("Website", &info.website),
    ]
    .into_iter()
    .filter_map(|(label, value)| {
        non_blank(value).map(|value| ContactLine {
            label: label.to_string(),
            value,
        })
    })
    .collect();

    HeaderBlock {
        full_name: info.full_name(),
        title: info.title.clone(),
        photo: info.profile_photo.as_deref().and_then(non_blank),
        contacts,
        summary: non_blank(&info.summary),
    }
}

fn section(kind: SectionKind, heading: &str, body: SectionBody) -> Section {
    Section {
        element_id: kind.element_id().to_string(),
        kind,
        heading: heading.to_string(),
        body,
    }
}

fn experience_entry(item: &ExperienceItem) -> TimelineEntry {
    TimelineEntry {
        id: item.id.clone(),
        headline: item.position.clone(),
        subheading: item.company.clone(),
        location: item.location.clone(),
        period: period_label(&item.start_date, &item.end_date, item.is_current_position),
        description: item.description.clone(),
    }
}

fn education_entry(item: &EducationItem) -> TimelineEntry {
    TimelineEntry {
        id: item.id.clone(),
        headline: format!("{} in {}", item.degree, item.field),
        subheading: item.institution.clone(),
        location: item.location.clone(),
        period: period_label(&item.start_date, &item.end_date, item.is_currently_studying),
        description: item.description.clone(),
    }
}

fn skill_meter(item: &SkillItem) -> SkillMeter {
    let level = item.level.clamp(0, i32::from(SKILL_SEGMENTS)) as u8;
    SkillMeter {
        id: item.id.clone(),
        name: item.name.clone(),
        level,
        segments: (0..SKILL_SEGMENTS).map(|i| i < level).collect(),
    }
}

fn project_entry(item: &ProjectItem) -> ProjectEntry {
    ProjectEntry {
        id: item.id.clone(),
        name: item.name.clone(),
        period: period_label(&item.start_date, &item.end_date, item.is_ongoing),
        description: item.description.clone(),
        link: non_blank(&item.url).map(|url| ProjectLink {
            href: link_href(&url),
            label: url,
        }),
    }
}

/// Stored URLs without a scheme are treated as https.
fn link_href(url: &str) -> String {
    if url.starts_with("http") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cv::ListItem;
    use crate::models::sample::sample_document;

    fn experience(start: &str, end: &str, current: bool) -> ExperienceItem {
        let mut item = ExperienceItem::blank("exp-1".to_string());
        item.position = "Engineer".to_string();
        item.company = "Acme".to_string();
        item.start_date = start.to_string();
        item.end_date = end.to_string();
        item.is_current_position = current;
        item
    }

    fn timeline(cv: &RenderedCv, kind: SectionKind) -> Vec<TimelineEntry> {
        cv.sections
            .iter()
            .find(|s| s.kind == kind)
            .and_then(|s| match &s.body {
                SectionBody::Timeline(entries) => Some(entries.clone()),
                _ => None,
            })
            .unwrap_or_default()
    }

    #[test]
    fn test_current_position_shows_present() {
        let mut document = CvDocument::default();
        document.experiences.push(experience("2020-01", "2019-01", true));

        let cv = render(&document);
        let entries = timeline(&cv, SectionKind::Experience);
        assert_eq!(entries[0].period, "Jan 2020 - Present");
        assert!(!entries[0].period.contains("2019"));
    }

    #[test]
    fn test_finished_position_shows_end_date() {
        let mut document = CvDocument::default();
        document.experiences.push(experience("2016-03", "2019-12", false));

        let entries = timeline(&render(&document), SectionKind::Experience);
        assert_eq!(entries[0].period, "Mar 2016 - Dec 2019");
    }

    #[test]
    fn test_empty_document_has_no_sections() {
        let cv = render(&CvDocument::default());
        assert!(cv.sections.is_empty());
        assert_eq!(cv.element_id, "cv-template-modern");
    }

    #[test]
    fn test_only_populated_sections_render() {
        let mut document = sample_document();
        document.education.clear();
        document.projects.clear();

        let kinds: Vec<SectionKind> = render(&document).sections.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![SectionKind::Experience, SectionKind::Skills]);
    }

    #[test]
    fn test_blank_contact_fields_are_omitted() {
        let mut document = CvDocument::default();
        document.personal_info.first_name = "Sam".to_string();
        document.personal_info.email = "sam@example.com".to_string();
        document.personal_info.phone = "   ".to_string();

        let header = render(&document).header;
        assert_eq!(header.full_name, "Sam");
        assert_eq!(
            header.contacts,
            vec![ContactLine {
                label: "Email".to_string(),
                value: "sam@example.com".to_string()
            }]
        );
        assert!(header.summary.is_none());
        assert!(header.photo.is_none());
    }

    #[test]
    fn test_education_headline_and_studying_flag() {
        let mut item = EducationItem::blank("edu-1".to_string());
        item.degree = "Master of Science".to_string();
        item.field = "Computer Science".to_string();
        item.start_date = "2014-09".to_string();
        item.is_currently_studying = true;
        let mut document = CvDocument::default();
        document.education.push(item);

        let entries = timeline(&render(&document), SectionKind::Education);
        assert_eq!(entries[0].headline, "Master of Science in Computer Science");
        assert_eq!(entries[0].period, "Sep 2014 - Present");
    }

    #[test]
    fn test_skill_level_clamped_to_meter() {
        let mut document = CvDocument::default();
        for (i, level) in [7, -2, 3].into_iter().enumerate() {
            let mut skill = SkillItem::blank(format!("s{i}"));
            skill.level = level;
            document.skills.push(skill);
        }

        let cv = render(&document);
        let SectionBody::Skills(meters) = &cv.sections[0].body else {
            panic!("expected skills section");
        };
        assert_eq!(meters[0].level, 5);
        assert_eq!(meters[0].segments, vec![true; 5]);
        assert_eq!(meters[1].level, 0);
        assert_eq!(meters[2].segments, vec![true, true, true, false, false]);
    }

    #[test]
    fn test_project_link_gets_scheme() {
        assert_eq!(link_href("github.com/alex/x"), "https://github.com/alex/x");
        assert_eq!(link_href("http://example.com"), "http://example.com");

        let mut project = ProjectItem::blank("p1".to_string());
        project.url = "example.com".to_string();
        let entry = project_entry(&project);
        let link = entry.link.unwrap();
        assert_eq!(link.href, "https://example.com");
        assert_eq!(link.label, "example.com");

        project.url = String::new();
        assert!(project_entry(&project).link.is_none());
    }
}
