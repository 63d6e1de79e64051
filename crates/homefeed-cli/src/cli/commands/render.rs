//! Plain-text rendering of the feature screen.

use homefeed_core::controller::{Notice, ViewState};
use homefeed_core::feature::Feature;

/// `[icon] Title - Subtitle (id)`
pub fn render_feature_line(feature: &Feature) -> String {
    let mut line = format!("[{}] {}", feature.icon(), feature.title);
    if let Some(subtitle) = feature.subtitle.as_deref().filter(|s| !s.is_empty()) {
        line.push_str(" - ");
        line.push_str(subtitle);
    }
    line.push_str(&format!(" ({})", feature.id));
    line
}

pub fn render_state(state: &ViewState) -> String {
    match state {
        ViewState::Loading => "Loading features...".to_string(),
        ViewState::Failed { message, attempts } => format!(
            "Could not load features after {attempts} attempt(s): {message}\n[r] Retry"
        ),
        ViewState::Empty => "No features available.\n[r] Refresh".to_string(),
        ViewState::Ready(features) => {
            let mut out = String::new();
            for (i, feature) in features.iter().enumerate() {
                out.push_str(&format!("{:>3}. {}\n", i + 1, render_feature_line(feature)));
            }
            out.push_str("[r] Refresh  [s <n>] Select");
            out
        }
    }
}

pub fn render_notice(notice: &Notice) -> String {
    match notice {
        Notice::Error { title, message } => format!("{title}: {message}"),
        Notice::FeatureSelected { title, subtitle } => match subtitle {
            Some(subtitle) => format!("Selected: {title} ({subtitle})"),
            None => format!("Selected: {title}"),
        },
    }
}
