//! Cross-theme render contract: every theme must agree on which sections
//! appear, which fields are omitted, and how date ranges read.

use cvforge_core::resume::{Basics, JsonResume, Skill, Work};
use cvforge_core::{render, SectionId, ThemeId};

fn sample_resume() -> JsonResume {
    let mut resume = JsonResume::empty();
    resume.basics = Some(Basics {
        name: "Jane Doe".to_string(),
        email: "jane@x.com".to_string(),
        ..Basics::default()
    });
    resume.work.push(Work {
        name: Some("Acme".to_string()),
        position: Some("Engineer".to_string()),
        start_date: Some("2021-01".to_string()),
        ..Work::default()
    });
    resume.work.push(Work {
        name: Some("Globex".to_string()),
        position: Some("Intern".to_string()),
        start_date: Some("2019-06".to_string()),
        end_date: Some("2020-12".to_string()),
        ..Work::default()
    });
    resume.skills.push(Skill {
        name: Some("Rust".to_string()),
        ..Skill::default()
    });
    resume
}

#[test]
fn professional_theme_end_to_end() {
    let mut resume = JsonResume::empty();
    resume.basics = Some(Basics {
        name: "Jane Doe".to_string(),
        email: "jane@x.com".to_string(),
        ..Basics::default()
    });
    resume.work.push(Work {
        name: Some("Acme".to_string()),
        position: Some("Engineer".to_string()),
        start_date: Some("2021-01".to_string()),
        ..Work::default()
    });

    let html = render(&resume, ThemeId::Professional);
    assert!(html.contains("Jane Doe"));
    assert!(html.contains("Acme"));
    assert!(html.contains("Engineer"));
    assert!(html.contains("Jan 2021 – Present"));

    let minimal = render(&resume, ThemeId::Minimal);
    assert!(minimal.contains("Jane Doe"));
    assert!(minimal.contains("Acme"));
}

#[test]
fn missing_work_location_leaves_no_placeholder_in_any_theme() {
    let resume = sample_resume();
    for theme in ThemeId::ALL {
        let html = render(&resume, theme);
        assert!(
            !html.to_lowercase().contains("location"),
            "{theme}: placeholder text leaked into output"
        );
        assert!(!html.contains(" | "), "{theme}: dangling separator");
    }
}

#[test]
fn all_themes_render_the_same_section_set() {
    let resume = sample_resume();
    let populated: Vec<SectionId> = SectionId::ALL
        .into_iter()
        .filter(|s| resume.section_has_content(*s))
        .collect();
    assert!(populated.contains(&SectionId::Work));
    assert!(populated.contains(&SectionId::Skills));

    for theme in ThemeId::ALL {
        let html = render(&resume, theme);
        for section in SectionId::ALL.into_iter().filter(|s| *s != SectionId::Basics) {
            let marker = format!("<section class=\"{}\">", section.as_str());
            assert_eq!(
                html.contains(&marker),
                populated.contains(&section),
                "{theme}: section {section} emission disagrees with content predicate"
            );
        }
    }
}

#[test]
fn closed_range_endpoints_appear_in_order() {
    let resume = sample_resume();
    for theme in ThemeId::ALL {
        let html = render(&resume, theme);
        let start = html.find("Jun 2019").expect("start endpoint missing");
        let end = html.find("Dec 2020").expect("end endpoint missing");
        assert!(start < end, "{theme}: range endpoints out of order");
    }
}

#[test]
fn hidden_sections_drop_out_of_the_render() {
    let resume = sample_resume();
    let filtered = resume.with_sections_hidden(&[SectionId::Skills]);
    for theme in ThemeId::ALL {
        let html = render(&filtered, theme);
        assert!(!html.contains("<h2>Skills</h2>"), "{theme}: hidden section rendered");
        assert!(html.contains("Acme"), "{theme}: unrelated section lost");
    }
}
