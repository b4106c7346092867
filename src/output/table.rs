use comfy_table::{Cell, Color};

use super::Report;
use crate::core::AutonomyMetrics;
use crate::output::format::{
    create_styled_table, format_count, header_cell, right_cell, styled_cell,
};
use crate::semantic::{SemanticMetrics, category_description};
use crate::utils::{format_duration, format_minutes, format_percentage};

fn print_title(title: &str, subtitle: &str, use_color: bool) {
    if use_color {
        println!("\n  \x1b[1m{title}\x1b[0m  \x1b[2m{subtitle}\x1b[0m\n");
    } else {
        println!("\n  {title}  {subtitle}\n");
    }
}

fn metric_row(label: &str, value: String) -> Vec<Cell> {
    vec![Cell::new(label), right_cell(&value, None, false)]
}

fn print_autonomy_table(report: &Report<'_>, metrics: &AutonomyMetrics, use_color: bool) {
    let c = use_color;
    let mut table = create_styled_table();
    table.set_header(vec![header_cell("Metric", c), header_cell("Value", c)]);

    let stdev = metrics
        .stdev_seconds
        .map(format_minutes)
        .unwrap_or_else(|| "-".to_string());

    table.add_row(metric_row("Prompts sent", format_count(metrics.total_prompts_sent)));
    table.add_row(metric_row("Completed periods", format_count(metrics.completed_periods)));
    table.add_row(metric_row("Sessions", format_count(metrics.unique_sessions)));
    table.add_row(metric_row("Total autonomy", format_duration(metrics.total_seconds)));
    table.add_row(metric_row("Mean", format_minutes(metrics.mean_seconds)));
    table.add_row(metric_row("Median", format_minutes(metrics.median_seconds)));
    table.add_row(metric_row("Longest", format_minutes(metrics.max_seconds)));
    table.add_row(metric_row("Std dev", stdev));
    table.add_row(metric_row(
        "Overlapping starts",
        format_count(report.overlap.overlap_count),
    ));

    let parallel_color = (c && report.overlap.max_parallel_sessions > 1).then_some(Color::Yellow);
    table.add_row(vec![
        Cell::new("Max parallel sessions"),
        right_cell(
            &report.overlap.max_parallel_sessions.to_string(),
            parallel_color,
            parallel_color.is_some(),
        ),
    ]);
    println!("{table}");

    let mut buckets = create_styled_table();
    buckets.set_header(vec![
        header_cell("Duration", c),
        header_cell("Periods", c),
        header_cell("Share", c),
    ]);
    let total = metrics.completed_periods;
    for (label, count) in [
        ("< 1 min", metrics.under_1min),
        ("1-5 min", metrics.between_1_5min),
        ("5-15 min", metrics.between_5_15min),
        ("> 15 min", metrics.over_15min),
    ] {
        buckets.add_row(vec![
            Cell::new(label),
            right_cell(&format_count(count), None, false),
            right_cell(&format_percentage(count, total), None, false),
        ]);
    }
    println!("\n{buckets}");
}

fn print_semantic_tables(metrics: &SemanticMetrics, use_color: bool) {
    let c = use_color;
    print_title(
        "Prompt Categories",
        &format!("{} prompts classified", format_count(metrics.total_prompts)),
        c,
    );

    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Category", c),
        header_cell("Prompts", c),
        header_cell("Share", c),
        header_cell("Description", c),
    ]);
    for stat in &metrics.category_stats {
        table.add_row(vec![
            styled_cell(&stat.category, c.then_some(Color::Green), false),
            right_cell(&format_count(stat.count), None, false),
            right_cell(&format!("{:.1}%", stat.percentage), None, false),
            Cell::new(category_description(&stat.category)),
        ]);
    }
    println!("{table}");

    if !metrics.wildcard_categories.is_empty() {
        let mut wildcards: Vec<(&String, &usize)> = metrics.wildcard_categories.iter().collect();
        wildcards.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        let mut table = create_styled_table();
        table.set_header(vec![header_cell("Custom label", c), header_cell("Prompts", c)]);
        for (label, count) in wildcards {
            table.add_row(vec![
                Cell::new(label),
                right_cell(&format_count(*count), None, false),
            ]);
        }
        println!("\n{table}");
    }

    if !metrics.common_combinations.is_empty() {
        let mut table = create_styled_table();
        table.set_header(vec![header_cell("Combination", c), header_cell("Prompts", c)]);
        for combo in &metrics.common_combinations {
            table.add_row(vec![
                Cell::new(combo.categories.join(" + ")),
                right_cell(&format_count(combo.count), None, false),
            ]);
        }
        println!("\n{table}");
    }

    println!(
        "\n  {} multi-category prompts ({:.1}%) across {} sessions",
        format_count(metrics.multi_category_count),
        metrics.multi_category_percentage,
        format_count(metrics.unique_sessions)
    );
}

/// Terminal summary of one run
pub(crate) fn print_summary(report: &Report<'_>, use_color: bool) {
    print_title("Autonomy Summary", &report.scope.display_range(), use_color);

    match report.autonomy {
        Some(metrics) => print_autonomy_table(report, metrics, use_color),
        None => println!(
            "  No completed autonomy periods ({} prompts sent).",
            format_count(report.total_prompts_sent)
        ),
    }

    if report.semantic_requested {
        match report.semantic {
            Some(metrics) => print_semantic_tables(metrics, use_color),
            None => println!("\n  No prompts to classify."),
        }
    }

    let stats_text = format!("{} sessions scanned", format_count(report.sessions_scanned));
    if use_color {
        println!("\n  {} | \x1b[36m{:.0}ms\x1b[0m\n", stats_text, report.elapsed_ms);
    } else {
        println!("\n  {} | {:.0}ms\n", stats_text, report.elapsed_ms);
    }
}
