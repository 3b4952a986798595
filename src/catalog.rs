//! Read-only content catalog: projects, work history, and theme tags.
//!
//! The catalog is handed over once by the host at startup (the content
//! pipeline that builds it from disk is outside this crate) and never
//! mutated. The engine consults it for filter-matching and for deciding
//! which placeholder a content node should show when an item lacks a
//! sub-resource.

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;

use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;

/// Error returned by [`Catalog::from_json`] and [`Catalog::new`].
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The raw bytes could not be decoded as catalog JSON.
    #[error("failed to decode catalog JSON: {0}")]
    Decode(#[from] serde_json::Error),
    /// Two projects share the same slug.
    #[error("duplicate project slug: {0}")]
    DuplicateProject(String),
    /// Two jobs share the same id.
    #[error("duplicate job id: {0}")]
    DuplicateJob(String),
    /// Two themes share the same id.
    #[error("duplicate theme id: {0}")]
    DuplicateTheme(String),
}

/// A portfolio project. `slug` is the stable identity key; everything else
/// is display metadata or sub-resource URLs the engine only checks for
/// presence.
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub category: String,
    /// Id of the job this project was done under, if any.
    #[serde(default)]
    pub job_id: Option<String>,
    /// Theme tags used for theme filtering.
    #[serde(default)]
    pub themes: Vec<String>,
    /// Gallery image URLs.
    #[serde(default)]
    pub gallery: Vec<String>,
    /// 3D model URL.
    #[serde(default)]
    pub model: Option<String>,
    /// Video embed URL.
    #[serde(default)]
    pub video: Option<String>,
    /// Slide deck embed URL.
    #[serde(default)]
    pub deck: Option<String>,
    /// Named numeric stats for the chart node.
    #[serde(default)]
    pub stats: BTreeMap<String, f64>,
}

/// A work-history entry.
#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    pub id: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub details: Vec<String>,
}

/// A theme tag available for filtering.
#[derive(Debug, Clone, Deserialize)]
pub struct Theme {
    pub id: String,
    #[serde(default)]
    pub label: String,
}

#[derive(Deserialize)]
struct RawCatalog {
    #[serde(default)]
    projects: Vec<Project>,
    #[serde(default)]
    jobs: Vec<Job>,
    #[serde(default)]
    themes: Vec<Theme>,
}

/// The validated, immutable content catalog.
#[derive(Debug)]
pub struct Catalog {
    projects: Vec<Project>,
    jobs: Vec<Job>,
    themes: Vec<Theme>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate identity keys.
    ///
    /// # Errors
    ///
    /// Returns a `Duplicate*` variant naming the first repeated key.
    pub fn new(
        projects: Vec<Project>,
        jobs: Vec<Job>,
        themes: Vec<Theme>,
    ) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for p in &projects {
            if !seen.insert(p.slug.clone()) {
                return Err(CatalogError::DuplicateProject(p.slug.clone()));
            }
        }
        seen.clear();
        for j in &jobs {
            if !seen.insert(j.id.clone()) {
                return Err(CatalogError::DuplicateJob(j.id.clone()));
            }
        }
        seen.clear();
        for t in &themes {
            if !seen.insert(t.id.clone()) {
                return Err(CatalogError::DuplicateTheme(t.id.clone()));
            }
        }
        Ok(Self { projects, jobs, themes })
    }

    /// Decode and validate a catalog from host-provided JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Decode`] for malformed JSON and a
    /// `Duplicate*` variant for repeated identity keys.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalog = serde_json::from_str(json)?;
        Self::new(raw.projects, raw.jobs, raw.themes)
    }

    /// All projects, in catalog order.
    #[must_use]
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// All jobs, in catalog order.
    #[must_use]
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// All themes, in catalog order.
    #[must_use]
    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    /// Look up a project by slug.
    #[must_use]
    pub fn project(&self, slug: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.slug == slug)
    }

    /// Look up a job by id.
    #[must_use]
    pub fn job(&self, id: &str) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == id)
    }

    /// Projects done under the given job, in catalog order.
    #[must_use]
    pub fn projects_for_job(&self, job_id: &str) -> Vec<&Project> {
        self.projects
            .iter()
            .filter(|p| p.job_id.as_deref() == Some(job_id))
            .collect()
    }

    /// Projects tagged with the given theme, in catalog order.
    #[must_use]
    pub fn projects_for_theme(&self, theme_id: &str) -> Vec<&Project> {
        self.projects
            .iter()
            .filter(|p| p.themes.iter().any(|t| t == theme_id))
            .collect()
    }
}

impl Project {
    /// Whether the project has any gallery images.
    #[must_use]
    pub fn has_gallery(&self) -> bool {
        !self.gallery.is_empty()
    }

    /// Whether the project has a 3D model.
    #[must_use]
    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Whether the project has a video embed.
    #[must_use]
    pub fn has_video(&self) -> bool {
        self.video.is_some()
    }

    /// Whether the project has a slide deck embed.
    #[must_use]
    pub fn has_deck(&self) -> bool {
        self.deck.is_some()
    }
}
