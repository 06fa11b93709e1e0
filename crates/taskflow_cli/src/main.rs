//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `taskflow_core` linkage and environment configuration.
//! - Print the placeholder dashboard in the configured locale.

use std::process::ExitCode;
use taskflow_core::logging::init_from_config;
use taskflow_core::{AppConfig, DashboardShell, DashboardSummary, Message};

fn main() -> ExitCode {
    println!("taskflow_core ping={}", taskflow_core::ping());
    println!("taskflow_core version={}", taskflow_core::core_version());

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config error: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = init_from_config(&config) {
        eprintln!("logging error: {err}");
        return ExitCode::FAILURE;
    }

    let locale = config.locale;
    println!("locale={}", locale.as_str());
    println!(
        "auth={}",
        config.auth.as_ref().map_or("offline", |auth| auth.url.as_str())
    );

    let shell = DashboardShell::new();
    println!();
    println!("{}", shell.brand().text(locale));
    for item in shell.nav_items() {
        println!("  {:<18} {}", item.label_text(locale), item.href());
    }

    let summary = DashboardSummary::placeholder();
    println!();
    println!("{}", Message::DashboardTitle.text(locale));
    for card in &summary.stats {
        println!(
            "  {:<18} {:>4}  {}",
            card.kind.title().text(locale),
            card.value,
            card.caption.text(locale)
        );
    }
    println!("{}", Message::ProjectsInProgress.text(locale));
    for project in &summary.projects {
        println!("  {:<18} {:>3}%", project.name, project.percent);
    }
    println!("{}", Message::RecentActivity.text(locale));
    for item in &summary.activity {
        println!(
            "  {} - {} ({})",
            item.kind.title().text(locale),
            item.description,
            item.time_label(locale)
        );
    }

    ExitCode::SUCCESS
}
