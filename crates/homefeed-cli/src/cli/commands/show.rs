//! `homefeed show [--interactive]` – the feature screen.

use anyhow::{bail, Result};
use homefeed_core::controller::{FeatureFetchController, Notice, ViewState};
use homefeed_core::remote::FeatureStore;
use homefeed_core::retry::RetryPolicy;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{self, error::TryRecvError};

use super::{render_notice, render_state};

const HELP: &str = "Commands: r (retry/refresh), s <n> (select), q (quit)";

/// One line of interactive input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Retry from `Failed`, refresh otherwise.
    Reload,
    /// 1-based position in the displayed list.
    Select(usize),
    Quit,
}

pub fn parse_input(line: &str) -> Option<Input> {
    let mut parts = line.split_whitespace();
    let input = match parts.next()? {
        "r" | "retry" | "refresh" => Input::Reload,
        "q" | "quit" => Input::Quit,
        "s" | "select" => {
            let n: usize = parts.next()?.parse().ok()?;
            if n == 0 {
                return None;
            }
            Input::Select(n)
        }
        _ => return None,
    };
    if parts.next().is_some() {
        return None;
    }
    Some(input)
}

fn drain_notices(notices: &mut broadcast::Receiver<Notice>) {
    loop {
        match notices.try_recv() {
            Ok(notice @ Notice::Error { .. }) => eprintln!("{}", render_notice(&notice)),
            Ok(notice) => println!("{}", render_notice(&notice)),
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "notice receiver lagged");
            }
            Err(_) => break,
        }
    }
}

fn print_screen(controller: &FeatureFetchController, notices: &mut broadcast::Receiver<Notice>) {
    println!("{}", render_state(&controller.state()));
    drain_notices(notices);
}

pub async fn run_show(
    store: Arc<dyn FeatureStore>,
    policy: RetryPolicy,
    precheck_connectivity: bool,
    interactive: bool,
) -> Result<()> {
    let controller = Arc::new(
        FeatureFetchController::new(store, policy)
            .with_connectivity_precheck(precheck_connectivity),
    );
    let mut notices = controller.notices();

    println!("{}", render_state(&controller.state()));
    controller.mount().await?;
    print_screen(&controller, &mut notices);

    if !interactive {
        let state = controller.state();
        controller.dispose();
        if let ViewState::Failed { attempts, .. } = state {
            bail!("feature list unavailable after {attempts} attempt(s)");
        }
        return Ok(());
    }

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_input(&line) {
            Some(Input::Quit) => break,
            Some(Input::Reload) => {
                if controller.state().offers_retry() {
                    controller.retry().await;
                } else {
                    controller.refresh().await;
                }
                print_screen(&controller, &mut notices);
            }
            Some(Input::Select(n)) => {
                let state = controller.state();
                match state.features().get(n - 1) {
                    Some(feature) => controller.select_feature(feature),
                    None => println!("No feature #{n}"),
                }
                drain_notices(&mut notices);
            }
            None => println!("{HELP}"),
        }
    }

    controller.dispose();
    Ok(())
}
