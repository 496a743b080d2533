//! Text rendering of session views, claim progress and the user listing.

use std::fmt::Write as _;

use dd_core::claim::{ClaimPhase, ClaimProgress};
use dd_core::ports::UserDirectory;
use dd_core::session::{AppPhase, FlowError, SessionView};

const BAR_WIDTH: usize = 20;

pub fn render_view(view: &SessionView) -> String {
    let mut out = String::new();
    match view.phase {
        AppPhase::Loading => out.push_str("Loading...\n"),
        AppPhase::LoggedOut => {
            out.push_str("== DailyDrop ==\n");
            out.push_str("Log in with your phone number and password.\n");
        }
        AppPhase::AwaitingPin => {
            let phone = view.pending_phone.as_deref().unwrap_or("your phone");
            let _ = writeln!(out, "Enter the 6-digit PIN for {phone} (or 'back').");
        }
        AppPhase::Authenticated | AppPhase::ClaimInProgress => {
            if let Some(identity) = &view.identity {
                let _ = writeln!(out, "Welcome, {}!", identity.display_name());
            }
            match (&view.stats, &view.stats_error) {
                (Some(stats), _) => {
                    let _ = writeln!(out, "Total rewards: {}", stats.total_rewards);
                    let last = stats
                        .last_reward_claim
                        .map(|date| date.to_string())
                        .unwrap_or_else(|| "never".to_string());
                    let _ = writeln!(out, "Last claim:    {last}");
                    if let Some(joined) = &stats.join_date {
                        let _ = writeln!(out, "Member since:  {joined}");
                    }
                }
                (None, Some(error)) => {
                    let _ = writeln!(out, "Stats unavailable: {error} (type 'refresh')");
                }
                (None, None) => out.push_str("Loading your stats...\n"),
            }
            if view.phase == AppPhase::ClaimInProgress {
                out.push_str("Collecting your reward... (type 'cancel' to stop)\n");
            } else if view.can_claim_today {
                out.push_str("Today's reward is ready! Type 'claim' to collect it.\n");
            } else if view.stats.is_some() {
                out.push_str("Come back tomorrow for your next reward.\n");
            }
        }
    }
    out
}

pub fn render_error(error: &FlowError) -> String {
    format!("! {error}\n")
}

pub fn render_progress(progress: &ClaimProgress) -> String {
    let filled = (usize::from(progress.rounded()) * BAR_WIDTH) / 100;
    let bar = format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled));
    let label = match progress.phase {
        ClaimPhase::Cancelled => "Cancelled",
        _ => progress.label(),
    };
    format!("[{bar}] {:>3}% {label}", progress.rounded())
}

pub fn render_directory(directory: &UserDirectory) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Users: {}  Active: {}  Rewards handed out: {}",
        directory.total_users, directory.active_users, directory.total_rewards
    );
    let _ = writeln!(
        out,
        "{:<18} {:<20} {:>7} {:<12} {:<6} {:<3}",
        "PHONE", "NAME", "REWARDS", "LAST CLAIM", "ACTIVE", "PIN"
    );
    for user in &directory.users {
        let _ = writeln!(
            out,
            "{:<18} {:<20} {:>7} {:<12} {:<6} {:<3}",
            user.phone,
            user.name.as_deref().unwrap_or("-"),
            user.total_rewards,
            user.last_reward_claim.as_deref().unwrap_or("never"),
            if user.is_active { "yes" } else { "no" },
            if user.has_pin_set { "yes" } else { "no" },
        );
    }
    out
}
