//! Single render engine shared by all themes.
//!
//! The engine walks the section registry in order, emits a section only
//! when it has content, and formats every entry through the shared helpers
//! in `format`. Theme differences are confined to the `ThemeSpec`
//! descriptor (region assignment, header treatment, typography), so the
//! structural contract — section emission, per-field omission, date
//! ranges — is identical across themes by construction.

use crate::render::format::{escape, format_date, format_date_range, join_present};
use crate::render::theme::{theme_spec, HeaderStyle, Layout, ThemeId, ThemeSpec};
use crate::resume::{JsonResume, SectionId};

/// Renders a resume into a self-contained, print-oriented HTML document.
///
/// Referentially transparent: the output depends only on the arguments.
/// Missing or malformed optional data never fails the render.
pub fn render(resume: &JsonResume, theme: ThemeId) -> String {
    let spec = theme_spec(theme);
    let name = resume
        .basics
        .as_ref()
        .map(|b| b.name.trim())
        .filter(|n| !n.is_empty())
        .unwrap_or("Your Name");

    let mut out = String::with_capacity(16 * 1024);
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{} – CV</title>\n", escape(name)));
    out.push_str("<style>\n");
    out.push_str(&stylesheet(spec));
    out.push_str("</style>\n</head>\n");
    out.push_str(&format!("<body class=\"theme-{}\">\n", spec.id.as_str()));

    render_header(&mut out, resume, spec, name);
    render_summary(&mut out, resume);
    render_body(&mut out, resume, spec);

    out.push_str("</body>\n</html>\n");
    out
}

fn body_sections() -> impl Iterator<Item = SectionId> {
    // Basics is rendered as the header and summary, not as a body section.
    SectionId::ALL
        .into_iter()
        .filter(|s| *s != SectionId::Basics)
}

fn render_body(out: &mut String, resume: &JsonResume, spec: &ThemeSpec) {
    match spec.layout {
        Layout::SingleColumn => {
            for section in body_sections() {
                render_section(out, resume, section);
            }
        }
        Layout::TwoColumn { sidebar } => {
            out.push_str("<div class=\"columns\">\n<main>\n");
            for section in body_sections().filter(|s| !sidebar.contains(s)) {
                render_section(out, resume, section);
            }
            out.push_str("</main>\n<aside>\n");
            for section in body_sections().filter(|s| sidebar.contains(s)) {
                render_section(out, resume, section);
            }
            out.push_str("</aside>\n</div>\n");
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Header and summary
// ────────────────────────────────────────────────────────────────────────────

fn render_header(out: &mut String, resume: &JsonResume, spec: &ThemeSpec, name: &str) {
    let class = match spec.header {
        HeaderStyle::Ruled => "header ruled",
        HeaderStyle::Banner => "header banner",
        HeaderStyle::Centered => "header centered",
        HeaderStyle::CenteredSerif => "header centered serif",
    };
    out.push_str(&format!("<header class=\"{class}\">\n"));
    out.push_str(&format!("<h1>{}</h1>\n", escape(name)));

    if let Some(basics) = &resume.basics {
        if let Some(label) = present(basics.label.as_deref()) {
            out.push_str(&format!("<p class=\"label\">{}</p>\n", escape(label)));
        }

        let mut contact: Vec<String> = Vec::new();
        if !basics.email.trim().is_empty() {
            contact.push(format!(
                "<a href=\"mailto:{0}\">{0}</a>",
                escape(basics.email.trim())
            ));
        }
        if let Some(phone) = present(basics.phone.as_deref()) {
            contact.push(escape(phone));
        }
        if let Some(url) = present(basics.url.as_deref()) {
            contact.push(format!("<a href=\"{0}\">{0}</a>", escape(url)));
        }
        if let Some(location) = &basics.location {
            let place = join_present(
                &[
                    location.city.as_deref(),
                    location.region.as_deref(),
                    location.country_code.as_deref(),
                ],
                ", ",
            );
            if !place.is_empty() {
                contact.push(escape(&place));
            }
        }
        if !contact.is_empty() {
            out.push_str(&format!(
                "<p class=\"contact\">{}</p>\n",
                contact.join(" <span class=\"sep\">·</span> ")
            ));
        }

        if !basics.profiles.is_empty() {
            out.push_str("<p class=\"profiles\">");
            for profile in &basics.profiles {
                let text = profile
                    .username
                    .as_deref()
                    .filter(|u| !u.trim().is_empty())
                    .or(profile.network.as_deref())
                    .unwrap_or_default();
                if text.is_empty() {
                    continue;
                }
                match present(profile.url.as_deref()) {
                    Some(url) => out.push_str(&format!(
                        "<a href=\"{}\">{}</a> ",
                        escape(url),
                        escape(text)
                    )),
                    None => out.push_str(&format!("<span>{}</span> ", escape(text))),
                }
            }
            out.push_str("</p>\n");
        }
    }
    out.push_str("</header>\n");
}

fn render_summary(out: &mut String, resume: &JsonResume) {
    if let Some(summary) = resume
        .basics
        .as_ref()
        .and_then(|b| present(b.summary.as_deref()))
    {
        out.push_str(&format!(
            "<section class=\"summary\"><p>{}</p></section>\n",
            escape(summary)
        ));
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

fn render_section(out: &mut String, resume: &JsonResume, section: SectionId) {
    // Absence is silent: no header is emitted for an empty section.
    if !resume.section_has_content(section) {
        return;
    }
    let title = match section {
        SectionId::Basics => return,
        SectionId::Work => "Experience",
        SectionId::Education => "Education",
        SectionId::Skills => "Skills",
        SectionId::Projects => "Projects",
        SectionId::Certificates => "Certificates",
        SectionId::Awards => "Awards",
        SectionId::Publications => "Publications",
        SectionId::Languages => "Languages",
        SectionId::Volunteer => "Volunteer Experience",
        SectionId::Interests => "Interests",
        SectionId::References => "References",
    };
    out.push_str(&format!(
        "<section class=\"{}\">\n<h2>{}</h2>\n",
        section.as_str(),
        title
    ));
    match section {
        SectionId::Basics => {}
        SectionId::Work => render_work(out, resume),
        SectionId::Education => render_education(out, resume),
        SectionId::Skills => render_skills(out, resume),
        SectionId::Projects => render_projects(out, resume),
        SectionId::Certificates => render_certificates(out, resume),
        SectionId::Awards => render_awards(out, resume),
        SectionId::Publications => render_publications(out, resume),
        SectionId::Languages => render_languages(out, resume),
        SectionId::Volunteer => render_volunteer(out, resume),
        SectionId::Interests => render_interests(out, resume),
        SectionId::References => render_references(out, resume),
    }
    out.push_str("</section>\n");
}

fn render_work(out: &mut String, resume: &JsonResume) {
    for job in &resume.work {
        out.push_str("<article class=\"entry\">\n");
        entry_heading(
            out,
            job.position.as_deref(),
            format_date_range(job.start_date.as_deref(), job.end_date.as_deref()),
        );
        let employer = join_present(&[job.name.as_deref(), job.location.as_deref()], " | ");
        subline(out, &employer);
        paragraph(out, job.summary.as_deref());
        highlights(out, &job.highlights);
        out.push_str("</article>\n");
    }
}

fn render_education(out: &mut String, resume: &JsonResume) {
    for edu in &resume.education {
        out.push_str("<article class=\"entry\">\n");
        let degree = join_present(&[edu.study_type.as_deref(), edu.area.as_deref()], " in ");
        entry_heading(
            out,
            present(Some(degree.as_str())),
            format_date_range(edu.start_date.as_deref(), edu.end_date.as_deref()),
        );
        subline(out, edu.institution.as_deref().unwrap_or_default());
        if let Some(score) = present(edu.score.as_deref()) {
            out.push_str(&format!("<p class=\"meta\">GPA: {}</p>\n", escape(score)));
        }
        if !edu.courses.is_empty() {
            out.push_str(&format!(
                "<p class=\"meta\">Coursework: {}</p>\n",
                escape(&edu.courses.join(", "))
            ));
        }
        out.push_str("</article>\n");
    }
}

fn render_skills(out: &mut String, resume: &JsonResume) {
    for skill in &resume.skills {
        out.push_str("<p class=\"skill\">");
        if let Some(name) = present(skill.name.as_deref()) {
            out.push_str(&format!("<strong>{}</strong>", escape(name)));
        }
        if let Some(level) = present(skill.level.as_deref()) {
            out.push_str(&format!(" <span class=\"meta\">({})</span>", escape(level)));
        }
        if !skill.keywords.is_empty() {
            out.push_str(&format!(
                " <span class=\"meta\">– {}</span>",
                escape(&skill.keywords.join(", "))
            ));
        }
        out.push_str("</p>\n");
    }
}

fn render_projects(out: &mut String, resume: &JsonResume) {
    for project in &resume.projects {
        out.push_str("<article class=\"entry\">\n");
        entry_heading(
            out,
            project.name.as_deref(),
            format_date_range(project.start_date.as_deref(), project.end_date.as_deref()),
        );
        subline(
            out,
            &join_present(&[project.entity.as_deref(), project.url.as_deref()], " · "),
        );
        paragraph(out, project.description.as_deref());
        highlights(out, &project.highlights);
        if !project.keywords.is_empty() {
            out.push_str(&format!(
                "<p class=\"meta\">Technologies: {}</p>\n",
                escape(&project.keywords.join(", "))
            ));
        }
        out.push_str("</article>\n");
    }
}

fn render_certificates(out: &mut String, resume: &JsonResume) {
    for cert in &resume.certificates {
        out.push_str("<article class=\"entry\">\n");
        entry_heading(
            out,
            cert.name.as_deref(),
            cert.date.as_deref().map(format_date).unwrap_or_default(),
        );
        subline(out, cert.issuer.as_deref().unwrap_or_default());
        out.push_str("</article>\n");
    }
}

fn render_awards(out: &mut String, resume: &JsonResume) {
    for award in &resume.awards {
        out.push_str("<article class=\"entry\">\n");
        entry_heading(
            out,
            award.title.as_deref(),
            award.date.as_deref().map(format_date).unwrap_or_default(),
        );
        subline(out, award.awarder.as_deref().unwrap_or_default());
        paragraph(out, award.summary.as_deref());
        out.push_str("</article>\n");
    }
}

fn render_publications(out: &mut String, resume: &JsonResume) {
    for publication in &resume.publications {
        out.push_str("<article class=\"entry\">\n");
        entry_heading(
            out,
            publication.name.as_deref(),
            publication
                .release_date
                .as_deref()
                .map(format_date)
                .unwrap_or_default(),
        );
        subline(out, publication.publisher.as_deref().unwrap_or_default());
        paragraph(out, publication.summary.as_deref());
        out.push_str("</article>\n");
    }
}

fn render_languages(out: &mut String, resume: &JsonResume) {
    out.push_str("<p class=\"inline-list\">");
    let mut first = true;
    for lang in &resume.languages {
        let text = join_present(&[lang.language.as_deref(), lang.fluency.as_deref()], " – ");
        if text.is_empty() {
            continue;
        }
        if !first {
            out.push_str(" <span class=\"sep\">·</span> ");
        }
        first = false;
        out.push_str(&escape(&text));
    }
    out.push_str("</p>\n");
}

fn render_volunteer(out: &mut String, resume: &JsonResume) {
    for vol in &resume.volunteer {
        out.push_str("<article class=\"entry\">\n");
        entry_heading(
            out,
            vol.position.as_deref(),
            format_date_range(vol.start_date.as_deref(), vol.end_date.as_deref()),
        );
        subline(out, vol.organization.as_deref().unwrap_or_default());
        paragraph(out, vol.summary.as_deref());
        highlights(out, &vol.highlights);
        out.push_str("</article>\n");
    }
}

fn render_interests(out: &mut String, resume: &JsonResume) {
    for interest in &resume.interests {
        out.push_str("<p class=\"skill\">");
        if let Some(name) = present(interest.name.as_deref()) {
            out.push_str(&format!("<strong>{}</strong>", escape(name)));
        }
        if !interest.keywords.is_empty() {
            out.push_str(&format!(
                " <span class=\"meta\">– {}</span>",
                escape(&interest.keywords.join(", "))
            ));
        }
        out.push_str("</p>\n");
    }
}

fn render_references(out: &mut String, resume: &JsonResume) {
    for reference in &resume.references {
        out.push_str("<article class=\"entry\">\n");
        if let Some(name) = present(reference.name.as_deref()) {
            out.push_str(&format!("<h3>{}</h3>\n", escape(name)));
        }
        if let Some(quote) = present(reference.reference.as_deref()) {
            out.push_str(&format!(
                "<blockquote>{}</blockquote>\n",
                escape(quote)
            ));
        }
        out.push_str("</article>\n");
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Entry building blocks
// ────────────────────────────────────────────────────────────────────────────

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Title line with an optional right-aligned date range. Either side may be
/// empty; nothing is emitted for a side with no content.
fn entry_heading(out: &mut String, title: Option<&str>, dates: String) {
    out.push_str("<div class=\"entry-head\">");
    if let Some(title) = present(title) {
        out.push_str(&format!("<h3>{}</h3>", escape(title)));
    }
    if !dates.is_empty() {
        out.push_str(&format!("<span class=\"dates\">{}</span>", escape(&dates)));
    }
    out.push_str("</div>\n");
}

fn subline(out: &mut String, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        out.push_str(&format!("<p class=\"subline\">{}</p>\n", escape(text)));
    }
}

fn paragraph(out: &mut String, text: Option<&str>) {
    if let Some(text) = present(text) {
        out.push_str(&format!("<p>{}</p>\n", escape(text)));
    }
}

fn highlights(out: &mut String, items: &[String]) {
    if items.is_empty() {
        return;
    }
    out.push_str("<ul class=\"highlights\">\n");
    for item in items {
        out.push_str(&format!("<li>{}</li>\n", escape(item)));
    }
    out.push_str("</ul>\n");
}

// ────────────────────────────────────────────────────────────────────────────
// Stylesheet
// ────────────────────────────────────────────────────────────────────────────

fn stylesheet(spec: &ThemeSpec) -> String {
    let mut css = format!(
        "@page {{ size: letter; margin: 1in; }}\n\
         body {{ font-family: {font}; color: #111827; margin: 0 auto; \
         max-width: 7.5in; padding: 24px; font-size: 11pt; line-height: 1.45; }}\n\
         h1 {{ margin: 0; font-size: 24pt; }}\n\
         h2 {{ font-size: 13pt; color: {accent}; text-transform: {transform}; \
         border-bottom: 1px solid #d1d5db; padding-bottom: 2px; margin: 18px 0 8px; }}\n\
         h3 {{ margin: 0; font-size: 11pt; display: inline; }}\n\
         p {{ margin: 2px 0; }}\n\
         a {{ color: inherit; }}\n\
         .label {{ color: #4b5563; font-size: 12pt; }}\n\
         .contact, .profiles, .meta, .subline, .dates {{ color: #4b5563; font-size: 10pt; }}\n\
         .entry {{ margin-bottom: 10px; page-break-inside: avoid; }}\n\
         .entry-head {{ display: flex; justify-content: space-between; align-items: baseline; }}\n\
         .dates {{ white-space: nowrap; }}\n\
         .highlights {{ margin: 4px 0 0 1.2em; padding: 0; list-style: {bullet}; }}\n\
         blockquote {{ margin: 2px 0; font-style: italic; color: #4b5563; }}\n\
         section {{ page-break-inside: auto; }}\n",
        font = spec.font_stack,
        accent = spec.accent,
        transform = spec.heading_transform,
        bullet = spec.bullet,
    );
    match spec.header {
        HeaderStyle::Ruled => {
            css.push_str(".header.ruled { border-bottom: 3px solid #111827; padding-bottom: 10px; }\n");
        }
        HeaderStyle::Banner => {
            css.push_str(&format!(
                ".header.banner {{ background: #1f2933; color: #fff; padding: 18px; }}\n\
                 .header.banner .label {{ color: {}; }}\n\
                 .header.banner .contact, .header.banner .profiles {{ color: #d1d5db; }}\n",
                spec.accent
            ));
        }
        HeaderStyle::Centered => {
            css.push_str(
                ".header.centered { text-align: center; border-bottom: 1px solid #d1d5db; \
                 padding-bottom: 12px; }\n\
                 .header.centered h1 { font-weight: 300; letter-spacing: 2px; \
                 text-transform: uppercase; font-size: 20pt; }\n",
            );
        }
        HeaderStyle::CenteredSerif => {
            css.push_str(
                ".header.centered.serif { text-align: center; padding-bottom: 8px; }\n\
                 .header.centered.serif h1 { font-weight: 400; }\n",
            );
        }
    }
    if matches!(spec.layout, Layout::TwoColumn { .. }) {
        css.push_str(
            ".columns { display: flex; gap: 24px; }\n\
             .columns main { flex: 2; }\n\
             .columns aside { flex: 1; }\n",
        );
    }
    css
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::{Basics, Skill, Work};

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
        resume
    }

    #[test]
    fn test_professional_contains_required_strings() {
        let html = render(&sample_resume(), ThemeId::Professional);
        assert!(html.contains("Jane Doe"));
        assert!(html.contains("Acme"));
        assert!(html.contains("Engineer"));
        assert!(html.contains("Jan 2021 – Present"));
    }

    #[test]
    fn test_minimal_contains_name_and_employer() {
        let html = render(&sample_resume(), ThemeId::Minimal);
        assert!(html.contains("Jane Doe"));
        assert!(html.contains("Acme"));
    }

    #[test]
    fn test_missing_work_location_leaves_no_trace() {
        let resume = sample_resume();
        for theme in ThemeId::ALL {
            let html = render(&resume, theme);
            assert!(!html.contains(" | "), "{theme}: unexpected location separator");
        }
    }

    #[test]
    fn test_empty_sections_emit_no_headers() {
        let html = render(&sample_resume(), ThemeId::Professional);
        assert!(!html.contains("<h2>Education</h2>"));
        assert!(!html.contains("<h2>References</h2>"));
        assert!(html.contains("<h2>Experience</h2>"));
    }

    #[test]
    fn test_placeholder_name_when_basics_missing() {
        let resume = JsonResume::default();
        let html = render(&resume, ThemeId::Academic);
        assert!(html.contains("Your Name"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let mut resume = sample_resume();
        resume.work[0].summary = Some("<script>alert(1)</script>".to_string());
        let html = render(&resume, ThemeId::Modern);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_array_order_is_preserved() {
        let mut resume = sample_resume();
        resume.work.push(Work {
            name: Some("Globex".to_string()),
            position: Some("Intern".to_string()),
            start_date: Some("2018-05".to_string()),
            end_date: Some("2018-08".to_string()),
            ..Work::default()
        });
        let html = render(&resume, ThemeId::Professional);
        let acme = html.find("Acme").unwrap();
        let globex = html.find("Globex").unwrap();
        assert!(acme < globex, "renderer must not re-sort entries");
    }

    #[test]
    fn test_theme_parity_on_section_set() {
        let mut resume = sample_resume();
        resume.work.push(Work::default());
        resume.skills.push(Skill {
            name: Some("Rust".to_string()),
            ..Skill::default()
        });
        for theme in ThemeId::ALL {
            let html = render(&resume, theme);
            assert!(html.contains("<h2>Experience</h2>"), "{theme} dropped work");
            assert!(html.contains("<h2>Skills</h2>"), "{theme} dropped skills");
            assert!(!html.contains("<h2>Projects</h2>"), "{theme} invented projects");
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let resume = sample_resume();
        assert_eq!(
            render(&resume, ThemeId::Modern),
            render(&resume, ThemeId::Modern)
        );
    }
}
