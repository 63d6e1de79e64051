//! Out-of-band notifications for the presentation layer.

/// Title used for terminal load failures.
pub const LOAD_FAILED_TITLE: &str = "Unable to load features";

/// Sent on the controller's notice channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Dismissible alert for a terminal failure. Its "Retry" action maps to
    /// `FeatureFetchController::retry`. `message` equals the `Failed` state's message.
    Error { title: String, message: String },
    /// The user picked a feature.
    FeatureSelected {
        title: String,
        subtitle: Option<String>,
    },
}
