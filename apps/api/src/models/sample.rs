//! Fully populated demo CV used for onboarding.

use chrono::Utc;
use serde_json::Map;
use uuid::Uuid;

use crate::models::cv::{
    CvDocument, EducationItem, ExperienceItem, PersonalInfo, ProjectItem, SkillItem,
    DEFAULT_TEMPLATE,
};

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn skill(name: &str, level: i32) -> SkillItem {
    SkillItem {
        id: new_id(),
        name: name.to_string(),
        level,
        extra: Map::new(),
    }
}

/// Builds the sample document with fresh ids and timestamps.
pub fn sample_document() -> CvDocument {
    let now = Utc::now();

    CvDocument {
        personal_info: PersonalInfo {
            first_name: "Alex".to_string(),
            last_name: "Johnson".to_string(),
            title: "Senior Software Engineer".to_string(),
            email: "alex.johnson@example.com".to_string(),
            phone: "(555) 123-4567".to_string(),
            location: "San Francisco, CA".to_string(),
            website: "alexjohnson.dev".to_string(),
            summary: "Passionate software engineer with 8+ years of experience developing \
                scalable applications and leading engineering teams. Expertise in JavaScript, \
                React, Node.js, and cloud technologies."
                .to_string(),
            profile_photo: None,
            extra: Map::new(),
        },
        experiences: vec![
            ExperienceItem {
                id: new_id(),
                company: "Tech Innovations Inc.".to_string(),
                position: "Senior Software Engineer".to_string(),
                location: "San Francisco, CA".to_string(),
                start_date: "2020-01".to_string(),
                end_date: String::new(),
                is_current_position: true,
                description: "• Lead a team of 6 engineers developing a cloud-native SaaS platform\n\
                    • Architected and implemented microservices using Node.js and TypeScript\n\
                    • Reduced API response time by 40% through performance optimization\n\
                    • Mentored junior developers and conducted code reviews"
                    .to_string(),
                extra: Map::new(),
            },
            ExperienceItem {
                id: new_id(),
                company: "WebSolutions Co.".to_string(),
                position: "Frontend Developer".to_string(),
                location: "San Jose, CA".to_string(),
                start_date: "2018-03".to_string(),
                end_date: "2019-12".to_string(),
                is_current_position: false,
                description: "• Developed responsive web applications using React and Redux\n\
                    • Implemented component libraries improving development efficiency by 30%\n\
                    • Collaborated with UX designers to implement pixel-perfect interfaces\n\
                    • Maintained 95% test coverage across all frontend codebase"
                    .to_string(),
                extra: Map::new(),
            },
        ],
        education: vec![
            EducationItem {
                id: new_id(),
                institution: "University of California, Berkeley".to_string(),
                degree: "Master's Degree".to_string(),
                field: "Computer Science".to_string(),
                location: "Berkeley, CA".to_string(),
                start_date: "2016-08".to_string(),
                end_date: "2018-05".to_string(),
                is_currently_studying: false,
                description: "• Specialization in Artificial Intelligence and Machine Learning\n\
                    • GPA: 3.85/4.0\n\
                    • Teaching Assistant for Intro to Programming"
                    .to_string(),
                extra: Map::new(),
            },
            EducationItem {
                id: new_id(),
                institution: "Stanford University".to_string(),
                degree: "Bachelor's Degree".to_string(),
                field: "Software Engineering".to_string(),
                location: "Stanford, CA".to_string(),
                start_date: "2012-09".to_string(),
                end_date: "2016-06".to_string(),
                is_currently_studying: false,
                description: "• Dean's List all semesters\n\
                    • Senior Project: Developed an AI-powered study assistant app\n\
                    • Member of Computer Science Club"
                    .to_string(),
                extra: Map::new(),
            },
        ],
        skills: vec![
            skill("JavaScript", 5),
            skill("React", 5),
            skill("Node.js", 4),
            skill("TypeScript", 4),
            skill("GraphQL", 3),
            skill("AWS", 4),
            skill("Docker", 3),
            skill("Python", 3),
        ],
        projects: vec![
            ProjectItem {
                id: new_id(),
                name: "AI Task Manager".to_string(),
                description: "A productivity application that uses machine learning to \
                    prioritize tasks and suggest optimal work schedules based on user habits."
                    .to_string(),
                url: "github.com/alexj/ai-task-manager".to_string(),
                start_date: "2021-06".to_string(),
                end_date: String::new(),
                is_ongoing: true,
                extra: Map::new(),
            },
            ProjectItem {
                id: new_id(),
                name: "E-commerce Platform".to_string(),
                description: "Developed a full-stack e-commerce platform with React, Node.js, \
                    and MongoDB, featuring real-time inventory tracking and payment processing."
                    .to_string(),
                url: "github.com/alexj/ecommerce-platform".to_string(),
                start_date: "2020-02".to_string(),
                end_date: "2020-11".to_string(),
                is_ongoing: false,
                extra: Map::new(),
            },
        ],
        template: DEFAULT_TEMPLATE.to_string(),
        created_at: now,
        updated_at: now,
    }
}
