//! Shared rendering utilities for wizard prompts

use super::provisioning::{ReviewSummary, ServiceStep};
use colored::Colorize;
use inquire::ui::{Color, IndexPrefix, RenderConfig, StyleSheet, Styled};

/// Get the standard render config for wizard prompts
pub fn wizard_render_config() -> RenderConfig<'static> {
    RenderConfig::default()
        .with_highlighted_option_prefix(Styled::new("▸ ").with_fg(Color::LightCyan))
        .with_option_index_prefix(IndexPrefix::Simple)
        .with_selected_option(Some(StyleSheet::new().with_fg(Color::LightCyan)))
        .with_scroll_up_prefix(Styled::new("▲ "))
        .with_scroll_down_prefix(Styled::new("▼ "))
}

/// Progress label and position shown in the step header.
/// Source and source review share a slot.
pub fn step_progress(step: ServiceStep) -> Option<(u8, &'static str)> {
    match step {
        ServiceStep::NameTags => Some((1, "Init")),
        ServiceStep::BuildTarget => Some((2, "Type")),
        ServiceStep::Domain => Some((3, "Domain")),
        ServiceStep::Source | ServiceStep::SourceReview => Some((4, "Source")),
        ServiceStep::Config => Some((5, "Config")),
        ServiceStep::Review => Some((6, "Confirm")),
        ServiceStep::Created | ServiceStep::Cancelled => None,
    }
}

/// Display a wizard step header box
pub fn display_step_header(step: ServiceStep, description: &str) {
    let Some((step_number, step_name)) = step_progress(step) else {
        return;
    };
    let term_width = term_size::dimensions().map(|(w, _)| w).unwrap_or(80);
    let box_width = term_width.clamp(24, 70);
    let inner_width = box_width - 4;

    println!();
    let header = format!("─ Step {}/6 · {} ", step_number, step_name);
    println!(
        "{}{}{}",
        "┌".bright_cyan(),
        header.bright_cyan(),
        "─".repeat(inner_width.saturating_sub(header.chars().count())).bright_cyan()
    );

    for line in textwrap::wrap(description, inner_width - 2) {
        println!("{}  {}", "│".dimmed(), line.white());
    }

    println!("{}{}", "└".dimmed(), "─".repeat(box_width - 1).dimmed());
    println!();
}

/// Format a status indicator (checkmark or X)
pub fn status_indicator(connected: bool) -> String {
    if connected {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}

/// Format a count badge
pub fn count_badge(count: usize, label: &str) -> String {
    if count > 0 {
        format!("{} {}", count.to_string().cyan(), label.dimmed())
    } else {
        format!("{} {}", "0".dimmed(), label.dimmed())
    }
}

/// Print the review step
pub fn display_review(review: &ReviewSummary) {
    let rule = "─────────────────────────────────────────────────────────────────";
    println!();
    println!("{}", rule.dimmed());
    println!(" {}", review.name.bright_green().bold());
    println!(" {}.", review.summary);
    println!("{}", rule.dimmed());

    if !review.tags.is_empty() {
        let tags: Vec<String> = review
            .tags
            .iter()
            .map(|t| format!("{}={}", t.name, t.value))
            .collect();
        println!("  Tags:     {}", tags.join(" ").cyan());
    }
    match &review.url {
        Some(url) => println!("  Domain:   {}", url.cyan()),
        None => println!("  Domain:   {}", "none".dimmed()),
    }
    match &review.source {
        Some(source) => println!("  Source:   {} {}", source.to_string().cyan(), source.url().dimmed()),
        None => println!("  Source:   {}", "none".dimmed()),
    }
    if !review.config.is_empty() {
        println!("  Config:");
        for (key, value) in &review.config {
            println!("    {:<16} {}", key, value);
        }
    }
    println!("{}", rule.dimmed());
    println!();
}
