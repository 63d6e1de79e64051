//! Renderable screen state.

use crate::feature::Feature;

/// What the screen should render. Exactly one variant is active; each
/// transition replaces the whole value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    /// A fetch is in flight and no data is shown.
    #[default]
    Loading,
    /// Every attempt failed; `message` is the last error, verbatim.
    Failed { message: String, attempts: u32 },
    /// The fetch succeeded with zero records.
    Empty,
    /// The fetch succeeded; features are sorted ascending by `order`.
    Ready(Vec<Feature>),
}

impl ViewState {
    /// `Empty` for no features, `Ready` otherwise. Callers pass display-ordered features.
    pub fn from_features(features: Vec<Feature>) -> Self {
        if features.is_empty() {
            ViewState::Empty
        } else {
            ViewState::Ready(features)
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    /// `retry()` is the action offered here.
    pub fn offers_retry(&self) -> bool {
        matches!(self, ViewState::Failed { .. })
    }

    /// `refresh()` is the action offered here.
    pub fn offers_refresh(&self) -> bool {
        matches!(self, ViewState::Empty | ViewState::Ready(_))
    }

    pub fn features(&self) -> &[Feature] {
        match self {
            ViewState::Ready(features) => features,
            _ => &[],
        }
    }
}
