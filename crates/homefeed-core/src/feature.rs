//! Feature records as stored in the remote `home_features` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Opaque, store-assigned feature identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(pub String);

impl FeatureId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FeatureId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Closed set of icons a feature may name. Unknown or missing names resolve
/// to [`FeatureIcon::Package`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FeatureIcon {
    #[default]
    Package,
    Code,
    Smartphone,
    Navigation,
    Settings,
    Star,
    Shield,
    Zap,
}

const ICON_TABLE: &[(&str, FeatureIcon)] = &[
    ("Package", FeatureIcon::Package),
    ("Code", FeatureIcon::Code),
    ("Smartphone", FeatureIcon::Smartphone),
    ("Navigation", FeatureIcon::Navigation),
    ("Settings", FeatureIcon::Settings),
    ("Star", FeatureIcon::Star),
    ("Shield", FeatureIcon::Shield),
    ("Zap", FeatureIcon::Zap),
];

impl FeatureIcon {
    pub const ALL: [FeatureIcon; 8] = [
        FeatureIcon::Package,
        FeatureIcon::Code,
        FeatureIcon::Smartphone,
        FeatureIcon::Navigation,
        FeatureIcon::Settings,
        FeatureIcon::Star,
        FeatureIcon::Shield,
        FeatureIcon::Zap,
    ];

    /// Exact-name lookup (names are case-sensitive, as stored).
    pub fn lookup(name: &str) -> Option<FeatureIcon> {
        ICON_TABLE
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, icon)| *icon)
    }

    pub fn resolve(name: Option<&str>) -> FeatureIcon {
        name.and_then(Self::lookup).unwrap_or_default()
    }

    pub fn name(self) -> &'static str {
        ICON_TABLE
            .iter()
            .find(|(_, icon)| *icon == self)
            .map(|(n, _)| *n)
            .unwrap_or("Package")
    }
}

impl fmt::Display for FeatureIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of the feature table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: FeatureId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Symbolic icon name; see [`Feature::icon`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Feature {
    pub fn icon(&self) -> FeatureIcon {
        FeatureIcon::resolve(self.icon.as_deref())
    }
}

/// Invalid client-supplied feature fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("update has no fields to change")]
    EmptyPatch,
}

/// Insert payload: a feature minus the store-owned fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFeature {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub order: i64,
}

impl NewFeature {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(())
    }
}

/// Partial update; `None` fields are left untouched by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeaturePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl FeaturePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.subtitle.is_none() && self.icon.is_none() && self.order.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::EmptyPatch);
        }
        if self.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(())
    }
}

/// Bring a fetch result into display form: stable sort by `order` (ties keep
/// store order), drop rows with a blank title and drop repeated ids, keeping
/// the first occurrence.
pub fn normalize(mut features: Vec<Feature>) -> Vec<Feature> {
    features.sort_by_key(|f| f.order);
    let mut seen = HashSet::with_capacity(features.len());
    features.retain(|f| {
        if f.title.trim().is_empty() {
            tracing::warn!(id = %f.id, "feature with blank title in fetch result; skipping");
            return false;
        }
        let fresh = seen.insert(f.id.clone());
        if !fresh {
            tracing::warn!(id = %f.id, "duplicate feature id in fetch result; keeping first");
        }
        fresh
    });
    features
}
