//! Document renderer – turns a [`ResumeRecord`] into self-contained markup.
//!
//! [`render`] is pure: the same record and variant always produce the same
//! bytes. Each section is built by its own function returning
//! `Option<Element>`; `None` omits the section, heading included.

use crate::links::classify_link;
use crate::markup::{Element, Markup};
use crate::record::{
    non_blank, present, EducationEntry, ExperienceEntry, ProjectEntry, ResumeRecord,
};
use crate::variant::{Arrangement, SectionKind, Variant, VariantPolicy};

/// Render `record` in the given variant.
pub fn render(record: &ResumeRecord, variant: Variant) -> Markup {
    let policy = variant.policy();

    let head = Element::new("head")
        .child(Element::new("meta").attr("charset", "utf-8"))
        .child(Element::new("title").text(format!("{} \u{2014} Resume", record.name)));

    let body = Element::new("body")
        .style(policy.palette.body)
        .child(header(record, policy))
        .children(
            policy
                .sections
                .iter()
                .filter_map(|kind| section(*kind, record, policy)),
        );

    Markup::document(&Element::new("html").attr("lang", "en").child(head).child(body))
}

fn section(kind: SectionKind, record: &ResumeRecord, policy: &VariantPolicy) -> Option<Element> {
    match kind {
        SectionKind::Summary => summary(record, policy),
        SectionKind::SkillsAndTools => skills_and_tools(record, policy),
        SectionKind::Experience => experience(&record.experience, policy),
        SectionKind::Projects => projects(&record.projects, policy),
        SectionKind::Education => education(&record.education, policy),
        SectionKind::LanguagesAndSoftSkills => languages_and_soft_skills(record, policy),
    }
}

/// `<section>` with its heading, or `None` when there is no body.
fn titled_section(heading: &str, body: Vec<Element>, policy: &VariantPolicy) -> Option<Element> {
    if body.is_empty() {
        return None;
    }
    Some(
        Element::new("section")
            .style(policy.palette.section)
            .child(Element::new("h2").style(policy.palette.heading).text(heading))
            .children(body),
    )
}

/// `Prefix a<sep>b<sep>c` line, or `None` for an empty list.
fn labelled_list(prefix: &str, items: &[String], separator: &str, css: &str) -> Option<Element> {
    if items.is_empty() {
        return None;
    }
    Some(
        Element::new("div")
            .style(css)
            .child(Element::new("strong").text(prefix))
            .text(format!(" {}", items.join(separator))),
    )
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

fn header(record: &ResumeRecord, policy: &VariantPolicy) -> Element {
    let p = &policy.palette;
    let name = if policy.uppercase_name {
        record.name.to_uppercase()
    } else {
        record.name.clone()
    };

    let military = non_blank(&record.military_status)
        .filter(|_| policy.show_military_status)
        .map(|m| Element::new("div").style(p.military).text(m));

    let identity = Element::new("div")
        .child(Element::new("h1").style(p.name).text(name))
        .child_if(non_blank(&record.title).map(|t| Element::new("div").style(p.title).text(t)));

    let header = Element::new("header").style(p.header);
    match policy.arrangement {
        Arrangement::Columns => header
            .child(identity.child_if(military))
            .child_if(contact_block(record, policy)),
        Arrangement::Stacked => header
            .child(identity)
            .child_if(contact_line(record, policy))
            .child_if(military),
    }
}

fn contact_link(label: &str, url: &str, policy: &VariantPolicy) -> Element {
    Element::new("a")
        .attr("href", url)
        .style(policy.palette.contact_link)
        .text(label)
}

/// Profile links in display order: LinkedIn, GitHub (if shown), website.
fn profile_links<'a>(
    record: &'a ResumeRecord,
    policy: &VariantPolicy,
) -> Vec<(&'static str, &'a str)> {
    let c = &record.contact;
    let mut links = Vec::new();
    if let Some(url) = present(&c.linkedin) {
        links.push(("LinkedIn", url));
    }
    if policy.show_github {
        if let Some(url) = non_blank(&c.github) {
            links.push(("GitHub", url));
        }
    }
    if let Some(url) = non_blank(&c.website) {
        links.push(("Website", url));
    }
    links
}

fn contact_block(record: &ResumeRecord, policy: &VariantPolicy) -> Option<Element> {
    let c = &record.contact;
    let sep = policy.labels.contact_separator;
    let reach: Vec<&str> = [c.email.as_str(), c.phone.as_str()]
        .into_iter()
        .filter_map(present)
        .collect();

    let mut rows = Vec::new();
    if !reach.is_empty() {
        rows.push(Element::new("div").text(reach.join(sep)));
    }
    if let Some(location) = present(&c.location) {
        rows.push(Element::new("div").text(location));
    }

    let links = profile_links(record, policy);
    if !links.is_empty() {
        let mut row = Element::new("div");
        for (i, (label, url)) in links.into_iter().enumerate() {
            if i > 0 {
                row = row.text(sep);
            }
            row = row.child(contact_link(label, url, policy));
        }
        rows.push(row);
    }
    if rows.is_empty() {
        return None;
    }
    Some(Element::new("div").style(policy.palette.contact).children(rows))
}

fn contact_line(record: &ResumeRecord, policy: &VariantPolicy) -> Option<Element> {
    let c = &record.contact;
    let sep = policy.labels.contact_separator;
    let mut line = Element::new("div").style(policy.palette.contact);
    let mut first = true;

    for value in [c.email.as_str(), c.phone.as_str(), c.location.as_str()]
        .into_iter()
        .filter_map(present)
    {
        if !first {
            line = line.text(sep);
        }
        line = line.text(value);
        first = false;
    }
    for (label, url) in profile_links(record, policy) {
        if !first {
            line = line.text(sep);
        }
        line = line.child(contact_link(label, url, policy));
        first = false;
    }

    line.has_children().then_some(line)
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

fn summary(record: &ResumeRecord, policy: &VariantPolicy) -> Option<Element> {
    let text = present(&record.summary)?;
    titled_section(
        policy.labels.summary,
        vec![Element::new("p").style(policy.palette.paragraph).text(text)],
        policy,
    )
}

fn skills_and_tools(record: &ResumeRecord, policy: &VariantPolicy) -> Option<Element> {
    let (l, p) = (&policy.labels, &policy.palette);
    let mut body = Vec::new();

    if policy.skill_pills {
        if !record.skills.is_empty() {
            body.push(
                Element::new("div").style(p.pill_row).children(
                    record
                        .skills
                        .iter()
                        .map(|s| Element::new("span").style(p.pill).text(s.as_str())),
                ),
            );
        }
    } else if let Some(line) =
        labelled_list(l.skills_prefix, &record.skills, l.skills_separator, p.detail_line)
    {
        body.push(line);
    }

    if let Some(line) =
        labelled_list(l.tools_prefix, &record.tools, l.tools_separator, p.detail_line)
    {
        body.push(line);
    }

    titled_section(l.skills, body, policy)
}

fn bullet_list(bullets: &[String], policy: &VariantPolicy) -> Option<Element> {
    if bullets.is_empty() {
        return None;
    }
    Some(
        Element::new("ul").style(policy.palette.list).children(
            bullets
                .iter()
                .map(|b| Element::new("li").style(policy.palette.list_item).text(b.as_str())),
        ),
    )
}

fn link_list(links: &[String], policy: &VariantPolicy) -> Option<Element> {
    if links.is_empty() {
        return None;
    }
    let p = &policy.palette;
    let rows = links.iter().map(|url| {
        let label = if policy.classify_links {
            classify_link(url).label()
        } else {
            policy.labels.plain_link
        };
        Element::new("div")
            .child(
                Element::new("span")
                    .style(p.link_label)
                    .text(format!("{label}:")),
            )
            .text(" ")
            .child(
                Element::new("a")
                    .attr("href", url.as_str())
                    .style(p.link)
                    .text(url.as_str()),
            )
    });
    Some(Element::new("div").style(p.link_list).children(rows))
}

/// Title line with optional dates, shared by project and experience entries.
/// `None` when there is neither a title nor dates.
fn entry_title(title: &str, dates: Option<&str>, policy: &VariantPolicy) -> Option<Element> {
    let p = &policy.palette;
    let title = present(title);
    if title.is_none() && dates.is_none() {
        return None;
    }
    let mut line = Element::new("div").style(p.entry_title);
    if let Some(title) = title {
        line = line.text(title);
    }
    Some(line.child_if(dates.map(|d| {
        let dates = match title {
            Some(_) => format!(" \u{2014} {d}"),
            None => d.to_string(),
        };
        Element::new("span").style(p.entry_dates).text(dates)
    })))
}

fn project_entry(project: &ProjectEntry, policy: &VariantPolicy) -> Element {
    Element::new("div")
        .style(policy.palette.entry)
        .child_if(entry_title(&project.name, non_blank(&project.dates), policy))
        .child_if(bullet_list(&project.bullets, policy))
        .child_if(link_list(&project.links, policy))
}

fn projects(projects: &[ProjectEntry], policy: &VariantPolicy) -> Option<Element> {
    titled_section(
        policy.labels.projects,
        projects.iter().map(|p| project_entry(p, policy)).collect(),
        policy,
    )
}

fn experience_entry(job: &ExperienceEntry, policy: &VariantPolicy) -> Element {
    let title = match (present(&job.role), present(&job.company)) {
        (Some(role), Some(company)) => format!("{role} \u{2014} {company}"),
        (Some(only), None) | (None, Some(only)) => only.to_string(),
        (None, None) => String::new(),
    };
    Element::new("div")
        .style(policy.palette.entry)
        .child_if(entry_title(&title, non_blank(&job.dates), policy))
        .child_if(bullet_list(&job.bullets, policy))
        .child_if(link_list(&job.links, policy))
}

fn experience(jobs: &[ExperienceEntry], policy: &VariantPolicy) -> Option<Element> {
    titled_section(
        policy.labels.experience,
        jobs.iter().map(|j| experience_entry(j, policy)).collect(),
        policy,
    )
}

fn education_entry(ed: &EducationEntry, policy: &VariantPolicy) -> Element {
    let p = &policy.palette;
    let dates = non_blank(&ed.dates).map(|d| Element::new("div").style(p.entry_dates).text(d));

    let header = match policy.arrangement {
        Arrangement::Columns => Element::new("div")
            .style(p.edu_header)
            .child(
                Element::new("div")
                    .child(Element::new("span").style(p.edu_degree).text(ed.degree.as_str()))
                    .text(format!(" \u{2014} {}", ed.school)),
            )
            .child_if(dates),
        Arrangement::Stacked => Element::new("div")
            .child(Element::new("div").style(p.edu_header).text(ed.school.as_str()))
            .child_if(
                present(&ed.degree).map(|d| Element::new("div").style(p.edu_degree).text(d)),
            )
            .child_if(dates),
    };

    Element::new("div")
        .style(p.edu_entry)
        .child(header)
        .child_if(
            non_blank(&ed.details).map(|d| Element::new("div").style(p.edu_details).text(d)),
        )
}

fn education(entries: &[EducationEntry], policy: &VariantPolicy) -> Option<Element> {
    titled_section(
        policy.labels.education,
        entries.iter().map(|e| education_entry(e, policy)).collect(),
        policy,
    )
}

fn languages_and_soft_skills(record: &ResumeRecord, policy: &VariantPolicy) -> Option<Element> {
    let (l, p) = (&policy.labels, &policy.palette);
    let body: Vec<Element> = [
        labelled_list(
            l.languages_prefix,
            &record.languages,
            l.languages_separator,
            "",
        ),
        labelled_list(
            l.soft_skills_prefix,
            &record.soft_skills,
            l.soft_skills_separator,
            p.detail_line,
        ),
    ]
    .into_iter()
    .flatten()
    .collect();
    titled_section(l.languages_section, body, policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Contact;

    fn sample() -> ResumeRecord {
        ResumeRecord {
            name: "Jane Doe".into(),
            title: Some("Backend Engineer".into()),
            contact: Contact {
                email: "j@x.com".into(),
                phone: "555".into(),
                location: "NYC".into(),
                linkedin: "https://linkedin.com/in/jane".into(),
                github: Some("https://github.com/jane".into()),
                website: Some("https://jane.dev".into()),
            },
            military_status: Some("Completed".into()),
            summary: "Builds services.".into(),
            skills: vec!["Go".into(), "Rust".into()],
            tools: vec!["Git".into(), "Docker".into()],
            projects: vec![ProjectEntry {
                name: "Tracker".into(),
                dates: Some("2023".into()),
                bullets: vec!["Shipped v1".into()],
                links: vec!["https://github.com/jane/tracker".into()],
            }],
            experience: vec![ExperienceEntry {
                company: "Acme".into(),
                role: "Engineer".into(),
                dates: Some("2021 - 2024".into()),
                bullets: vec!["Cut latency".into()],
                links: vec![],
            }],
            education: vec![EducationEntry {
                school: "MIT".into(),
                degree: "BS".into(),
                dates: Some("2020".into()),
                details: None,
            }],
            languages: vec!["English".into()],
            soft_skills: vec!["Teamwork".into()],
        }
    }

    #[test]
    fn heading_renders_only_with_body() {
        let policy = Variant::Designed.policy();
        assert!(titled_section("X", vec![], policy).is_none());
        let html = titled_section("X", vec![Element::new("p")], policy)
            .unwrap()
            .to_html();
        assert!(html.contains(">X</h2>"));
    }

    #[test]
    fn designed_pills_keep_order() {
        let html = render(&sample(), Variant::Designed).into_string();
        let go = html.find(">Go</span>").unwrap();
        let rust = html.find(">Rust</span>").unwrap();
        assert!(go < rust);
        assert!(html.contains("Git \u{2022} Docker"));
    }

    #[test]
    fn designed_classifies_links() {
        let html = render(&sample(), Variant::Designed).into_string();
        assert!(html.contains(">GitHub:</span>"));
    }

    #[test]
    fn ats_links_are_uniform() {
        let html = render(&sample(), Variant::AtsSafe).into_string();
        assert!(!html.contains(">GitHub:</span>"));
    }

    #[test]
    fn designed_hides_ats_only_fields() {
        let html = render(&sample(), Variant::Designed).into_string();
        assert!(!html.contains(">Experience</h2>"));
        assert!(!html.contains("Completed"));
        assert!(!html.contains("https://github.com/jane\""));
    }

    #[test]
    fn ats_shows_experience_and_military_status() {
        let html = render(&sample(), Variant::AtsSafe).into_string();
        assert!(html.contains(">Experience</h2>"));
        assert!(html.contains("Engineer \u{2014} Acme"));
        assert!(html.contains(" \u{2014} 2021 - 2024"));
        assert!(html.contains(">Completed</div>"));
        assert!(html.contains("href=\"https://github.com/jane\""));
    }

    #[test]
    fn project_without_dates_has_no_separator() {
        let mut record = sample();
        record.projects[0].dates = None;
        let html = render(&record, Variant::Designed).into_string();
        assert!(html.contains(">Tracker</div>"));
        assert!(!html.contains("Tracker<span"));
    }

    #[test]
    fn ats_contact_line_skips_missing_parts() {
        let mut record = sample();
        record.contact.phone.clear();
        record.contact.website = None;
        let html = render(&record, Variant::AtsSafe).into_string();
        assert!(html.contains("j@x.com | NYC | "));
        assert!(!html.contains(">Website</a>"));
    }

    #[test]
    fn title_mentions_name() {
        let html = render(&sample(), Variant::Designed).into_string();
        assert!(html.contains("<title>Jane Doe \u{2014} Resume</title>"));
    }

    #[test]
    fn blank_entry_titles_leave_no_empty_line() {
        let mut record = sample();
        record.experience[0].role.clear();
        record.experience[0].company = "  ".into();
        record.experience[0].dates = None;
        let html = render(&record, Variant::AtsSafe).into_string();
        assert!(!html.contains(r#"<div style="font-weight: bold"></div>"#));
        assert!(html.contains("Cut latency"));

        record.experience[0].dates = Some("2021".into());
        let html = render(&record, Variant::AtsSafe).into_string();
        assert!(html.contains(r#"<span style="font-size: 10pt">2021</span>"#));
        assert!(!html.contains("\u{2014} 2021"));
    }

    #[test]
    fn designed_header_drops_an_empty_contact_block() {
        let mut record = sample();
        record.contact = Contact {
            email: String::new(),
            phone: String::new(),
            location: " ".into(),
            linkedin: String::new(),
            github: None,
            website: None,
        };
        let html = render(&record, Variant::Designed).into_string();
        assert!(!html.contains("text-align: right"));
        assert!(html.contains(">Jane Doe</h1>"));
    }
}
