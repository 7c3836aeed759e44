//! Resume data model and loader.
//!
//! A [`ResumeRecord`] is read once from a JSON file and never mutated. Every
//! sequence keeps its source order, which is the display order.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ForgeError, Result};

/// The complete structured input describing one person's resume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeRecord {
    pub name: String,
    pub title: Option<String>,
    pub contact: Contact,
    pub military_status: Option<String>,
    pub summary: String,
    pub skills: Vec<String>,
    pub tools: Vec<String>,
    pub projects: Vec<ProjectEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub languages: Vec<String>,
    pub soft_skills: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub github: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectEntry {
    pub name: String,
    pub dates: Option<String>,
    pub bullets: Vec<String>,
    pub links: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub company: String,
    pub role: String,
    pub dates: Option<String>,
    pub bullets: Vec<String>,
    pub links: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub school: String,
    pub degree: String,
    pub dates: Option<String>,
    pub details: Option<String>,
}

/// Present-and-not-blank view of an optional field.
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Same as [`non_blank`] for required-ish string fields.
pub fn present(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

impl ResumeRecord {
    /// Parse a record from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let record: ResumeRecord =
            serde_json::from_str(json).map_err(|e| ForgeError::parse(e.to_string()))?;
        if record.name.trim().is_empty() {
            return Err(ForgeError::parse("`name` must be a non-empty string"));
        }
        Ok(record)
    }
}

/// Read and parse the resume data file at `path`.
pub fn load(path: &Path) -> Result<ResumeRecord> {
    log::info!("Loading resume data from '{}'", path.display());
    let raw = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ForgeError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ForgeError::Read {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    let record = ResumeRecord::from_json(&raw)?;
    log::debug!(
        "Loaded '{}': {} projects, {} experience entries, {} education entries",
        record.name,
        record.projects.len(),
        record.experience.len(),
        record.education.len()
    );
    Ok(record)
}
