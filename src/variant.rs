//! Rendering variants and the per-variant style/inclusion policy.
//!
//! Both variants share the section builders in [`crate::document`]; all that
//! differs between them lives in a [`VariantPolicy`].

use std::fmt;
use std::str::FromStr;

use crate::output::WriteMode;
use crate::page::PageConfig;

/// One of the two fixed rendering styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Variant {
    /// Decorative layout with coloured accents and pill tags.
    #[default]
    Designed,
    /// Plain black-and-white layout for automated resume parsers.
    AtsSafe,
}

impl Variant {
    pub fn policy(self) -> &'static VariantPolicy {
        match self {
            Variant::Designed => &DESIGNED,
            Variant::AtsSafe => &ATS_SAFE,
        }
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "designed" | "design" => Ok(Variant::Designed),
            "ats" | "ats-safe" | "ats_safe" | "plain" => Ok(Variant::AtsSafe),
            other => Err(format!(
                "unknown variant '{other}' (expected 'designed' or 'ats')"
            )),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Designed => f.write_str("designed"),
            Variant::AtsSafe => f.write_str("ats"),
        }
    }
}

/// Document sections, in the order a policy lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Summary,
    SkillsAndTools,
    Experience,
    Projects,
    Education,
    LanguagesAndSoftSkills,
}

/// How header and education entries are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrangement {
    /// Two columns: identity left, contact right; dates pushed right.
    Columns,
    /// Everything stacked top to bottom.
    Stacked,
}

/// Visible headings, prefixes and list separators.
#[derive(Debug, Clone, Copy)]
pub struct Labels {
    pub summary: &'static str,
    pub skills: &'static str,
    pub experience: &'static str,
    pub projects: &'static str,
    pub education: &'static str,
    pub languages_section: &'static str,
    /// Prefix of the inline skills line; unused with pill tags.
    pub skills_prefix: &'static str,
    pub tools_prefix: &'static str,
    pub languages_prefix: &'static str,
    pub soft_skills_prefix: &'static str,
    /// Label for every project/experience link when links are not classified.
    pub plain_link: &'static str,
    pub tools_separator: &'static str,
    pub skills_separator: &'static str,
    pub languages_separator: &'static str,
    pub soft_skills_separator: &'static str,
    pub contact_separator: &'static str,
}

/// Inline CSS for every element the renderer emits.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub body: &'static str,
    pub header: &'static str,
    pub name: &'static str,
    pub title: &'static str,
    pub contact: &'static str,
    pub contact_link: &'static str,
    pub military: &'static str,
    pub section: &'static str,
    pub heading: &'static str,
    pub paragraph: &'static str,
    pub pill_row: &'static str,
    pub pill: &'static str,
    pub detail_line: &'static str,
    pub entry: &'static str,
    pub entry_title: &'static str,
    pub entry_dates: &'static str,
    pub list: &'static str,
    pub list_item: &'static str,
    pub link_list: &'static str,
    pub link_label: &'static str,
    pub link: &'static str,
    pub edu_entry: &'static str,
    pub edu_header: &'static str,
    pub edu_degree: &'static str,
    pub edu_details: &'static str,
}

/// Everything that distinguishes one variant's output from the other's.
#[derive(Debug, Clone, Copy)]
pub struct VariantPolicy {
    pub sections: &'static [SectionKind],
    pub labels: Labels,
    pub palette: Palette,
    pub arrangement: Arrangement,
    /// Skills as pill tags rather than a separated line.
    pub skill_pills: bool,
    /// Label project links by destination ("GitHub", "Demo", ...).
    pub classify_links: bool,
    pub show_github: bool,
    pub show_military_status: bool,
    pub uppercase_name: bool,
    pub page: PageConfig,
    pub write_mode: WriteMode,
}

pub const DESIGNED: VariantPolicy = VariantPolicy {
    sections: &[
        SectionKind::Summary,
        SectionKind::SkillsAndTools,
        SectionKind::Projects,
        SectionKind::Education,
        SectionKind::LanguagesAndSoftSkills,
    ],
    labels: Labels {
        summary: "Summary",
        skills: "Skills & Tools",
        experience: "Experience",
        projects: "Projects",
        education: "Education",
        languages_section: "Languages & Soft Skills",
        skills_prefix: "Skills:",
        tools_prefix: "Tools:",
        languages_prefix: "Languages:",
        soft_skills_prefix: "Soft:",
        plain_link: "Link",
        tools_separator: " \u{2022} ",
        skills_separator: ", ",
        languages_separator: ", ",
        soft_skills_separator: " \u{2022} ",
        contact_separator: " \u{2022} ",
    },
    palette: Palette {
        body: "font-family: Helvetica, Arial, sans-serif; font-size: 11pt; color: #1a1a1a; \
               line-height: 1.45; padding: 32px 40px; background: #ffffff",
        header: "display: flex; justify-content: space-between; align-items: flex-start; \
                 border-bottom: 2px solid #0d47a1; padding-bottom: 12px; margin-bottom: 16px",
        name: "font-size: 22pt; font-weight: 700; color: #0d47a1; margin: 0",
        title: "font-size: 11pt; color: #444444; margin-top: 4px",
        contact: "font-size: 9.5pt; color: #444444; text-align: right",
        contact_link: "color: #0d47a1; text-decoration: none",
        military: "font-size: 9.5pt; color: #444444",
        section: "margin-bottom: 18px",
        heading: "font-size: 12pt; font-weight: 700; color: #0d47a1; margin: 12px 0 6px; \
                  border-bottom: 1px solid #dddddd; padding-bottom: 4px",
        paragraph: "margin: 6px 0",
        pill_row: "display: flex; flex-wrap: wrap; gap: 6px; margin-top: 6px",
        pill: "background: #dce4f7; padding: 4px 10px; border-radius: 12px; font-size: 9pt; \
               color: #0d47a1",
        detail_line: "margin-top: 6px; color: #444444; font-size: 9.5pt",
        entry: "margin-bottom: 12px; padding: 8px 10px; background: #eef2f7; \
                border-left: 3px solid #0d47a1; border-radius: 6px; break-inside: avoid",
        entry_title: "font-weight: 600; font-size: 11pt; margin-bottom: 4px",
        entry_dates: "color: #444444; font-size: 9.5pt",
        list: "margin: 6px 0; padding-left: 20px",
        list_item: "margin-bottom: 4px",
        link_list: "margin-top: 6px; display: flex; flex-direction: column; gap: 4px",
        link_label: "font-weight: 500; font-size: 9pt; margin-right: 6px; color: #333333",
        link: "font-size: 9pt; color: #0b4be0; text-decoration: underline; word-break: break-all",
        edu_entry: "margin-bottom: 10px; break-inside: avoid",
        edu_header: "display: flex; justify-content: space-between; font-weight: 600",
        edu_degree: "color: #0b4be0",
        edu_details: "font-size: 9.5pt; color: #555555; margin-top: 3px",
    },
    arrangement: Arrangement::Columns,
    skill_pills: true,
    classify_links: true,
    show_github: false,
    show_military_status: false,
    uppercase_name: false,
    page: PageConfig::designed(),
    write_mode: WriteMode::Overwrite,
};

pub const ATS_SAFE: VariantPolicy = VariantPolicy {
    sections: &[
        SectionKind::Summary,
        SectionKind::SkillsAndTools,
        SectionKind::Experience,
        SectionKind::Projects,
        SectionKind::Education,
        SectionKind::LanguagesAndSoftSkills,
    ],
    labels: Labels {
        summary: "Summary",
        skills: "Technical Skills",
        experience: "Experience",
        projects: "Projects",
        education: "Education",
        languages_section: "Additional Information",
        skills_prefix: "Skills:",
        tools_prefix: "Tools:",
        languages_prefix: "Languages:",
        soft_skills_prefix: "Soft Skills:",
        plain_link: "Link",
        tools_separator: ", ",
        skills_separator: ", ",
        languages_separator: ", ",
        soft_skills_separator: ", ",
        contact_separator: " | ",
    },
    palette: Palette {
        body: "font-family: Arial, Helvetica, sans-serif; font-size: 10.5pt; color: #000000; \
               line-height: 1.35; background: #ffffff",
        header: "margin-bottom: 8px",
        name: "font-size: 18pt; font-weight: bold; margin: 0",
        title: "font-size: 11pt; margin-top: 2px",
        contact: "font-size: 10pt; margin-top: 4px",
        contact_link: "color: #000000; text-decoration: none",
        military: "font-size: 10pt; margin-top: 2px",
        section: "margin-top: 10px",
        heading: "font-size: 11.5pt; font-weight: bold; margin: 0 0 4px; \
                  border-bottom: 1px solid #000000; padding-bottom: 2px",
        paragraph: "margin: 4px 0",
        pill_row: "",
        pill: "",
        detail_line: "margin-top: 2px",
        entry: "margin-bottom: 8px",
        entry_title: "font-weight: bold",
        entry_dates: "font-size: 10pt",
        list: "margin: 2px 0; padding-left: 18px",
        list_item: "margin-bottom: 2px",
        link_list: "margin-top: 2px",
        link_label: "",
        link: "color: #000000; text-decoration: none",
        edu_entry: "margin-bottom: 6px",
        edu_header: "font-weight: bold",
        edu_degree: "",
        edu_details: "font-size: 10pt",
    },
    arrangement: Arrangement::Stacked,
    skill_pills: false,
    classify_links: false,
    show_github: true,
    show_military_status: true,
    uppercase_name: true,
    page: PageConfig::ats(),
    write_mode: WriteMode::ReplaceExisting,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_variant_names() {
        assert_eq!("designed".parse::<Variant>().unwrap(), Variant::Designed);
        assert_eq!("ATS".parse::<Variant>().unwrap(), Variant::AtsSafe);
        assert_eq!("ats-safe".parse::<Variant>().unwrap(), Variant::AtsSafe);
        assert!("fancy".parse::<Variant>().is_err());
    }

    #[test]
    fn display_round_trips() {
        for v in [Variant::Designed, Variant::AtsSafe] {
            assert_eq!(v.to_string().parse::<Variant>().unwrap(), v);
        }
    }

    #[test]
    fn only_ats_has_experience() {
        assert!(!Variant::Designed
            .policy()
            .sections
            .contains(&SectionKind::Experience));
        assert!(Variant::AtsSafe
            .policy()
            .sections
            .contains(&SectionKind::Experience));
    }

    #[test]
    fn page_settings_per_variant() {
        let designed = Variant::Designed.policy().page;
        assert_eq!(designed.margins.top, 12.0);
        assert!(!designed.print_background);
        let ats = Variant::AtsSafe.policy().page;
        assert_eq!(ats.margins.left, 20.0);
        assert!(ats.print_background);
        assert_eq!(Variant::AtsSafe.policy().write_mode, WriteMode::ReplaceExisting);
    }
}
