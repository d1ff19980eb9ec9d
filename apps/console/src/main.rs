use std::{sync::Arc, time::Duration};

use anyhow::{bail, Context, Result};
use clap::Parser;
use client_core::{load_settings, HttpResourceClient};
use shared::domain::User;
use tracing_subscriber::EnvFilter;
use workflow::{
    BackendBridge, CreateAcronymController, DismissAction, FlowState, HandBack, PickerState,
    Presenter,
};

/// Creates an acronym for a user from the terminal.
#[derive(Parser, Debug)]
struct Args {
    /// Overrides the base url from acronyms.toml / the environment.
    #[arg(long)]
    base_url: Option<String>,
    /// Position in the user list to own the acronym; defaults to the first user.
    #[arg(long)]
    pick: Option<usize>,
    #[arg(long)]
    short: String,
    #[arg(long)]
    long: String,
}

struct ConsolePresenter {
    screen: &'static str,
}

impl Presenter for ConsolePresenter {
    fn display_selection(&mut self, name: &str) {
        println!("[{}] user: {name}", self.screen);
    }

    fn display_user_list(&mut self, users: &[User]) {
        for (index, user) in users.iter().enumerate() {
            println!("[{}] {index}: {}", self.screen, user.name);
        }
    }

    fn present_error(&mut self, message: &str, on_dismiss: Option<DismissAction>) {
        match on_dismiss {
            Some(DismissAction::ReturnToPriorScreen) => {
                eprintln!("[{}] error: {message} (returning)", self.screen)
            }
            None => eprintln!("[{}] error: {message}", self.screen),
        }
    }

    fn close_flow(&mut self) {
        println!("[{}] closed", self.screen);
    }
}

/// `RUST_LOG` directives when they parse, `info` otherwise.
fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|raw| match EnvFilter::try_new(&raw) {
            Ok(filter) => Some(filter),
            Err(err) => {
                eprintln!("ignoring invalid {}='{raw}': {err}", EnvFilter::DEFAULT_ENV);
                None
            }
        })
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()))
        .init();
    let args = Args::parse();

    let mut settings = load_settings().context("failed to load client settings")?;
    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    let wait = settings.request_timeout() + Duration::from_secs(5);

    let client = HttpResourceClient::new(&settings).context("failed to build http client")?;
    let bridge =
        BackendBridge::launch(Arc::new(client)).context("failed to start backend worker")?;

    let mut controller =
        CreateAcronymController::new(&bridge, ConsolePresenter { screen: "create" });
    controller.flow_entered();
    if !controller.wait_for_event(wait) {
        bail!("timed out waiting for the user list");
    }
    if controller.state() == &FlowState::Failed {
        controller.error_dismissed();
        bail!(
            "cannot create an acronym: {}",
            controller
                .last_error()
                .map(ToString::to_string)
                .unwrap_or_default()
        );
    }

    if let Some(index) = args.pick {
        let mut picker = controller.open_user_picker(ConsolePresenter { screen: "select" });
        picker.flow_entered();
        let hand_back = if picker.wait_for_event(wait) && picker.state() == PickerState::Loaded {
            picker.user_picked(index)
        } else {
            picker.error_dismissed();
            picker.abandon()
        };
        if hand_back == HandBack::Unchanged {
            tracing::warn!(index, "no user picked; keeping the default selection");
        }
        controller.apply_hand_back(hand_back);
    }

    controller
        .submit_requested(&args.short, &args.long)
        .context("acronym not submitted")?;
    if !controller.wait_for_event(wait) {
        bail!("timed out waiting for the server to accept the acronym");
    }

    match controller.state() {
        FlowState::Done => Ok(()),
        _ => bail!(
            "acronym was not saved: {}",
            controller
                .last_error()
                .map(ToString::to_string)
                .unwrap_or_default()
        ),
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
