//! Operator-facing output of the CLI: the log level picked from the
//! verbosity flags and the run report printed at the end of every run.

use log::LevelFilter;

use crate::classify::Category;
use crate::pipeline::MigrationReport;

/// Maps `-v`/`-q` counts onto a level filter, starting from `info`.
pub fn log_level_filter(verbose: u8, quiet: u8) -> LevelFilter {
    match 2_i16 + i16::from(verbose) - i16::from(quiet) {
        i16::MIN..=0 => LevelFilter::Error,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        3 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Renders the category breakdown, the sitemaps that could not be processed
/// and the closing totals line.
pub fn render_report(report: &MigrationReport) -> String {
    let summary = &report.summary;
    let mut lines = vec![
        "Category distribution:".to_owned(),
        format!("  Writing/Copy:  {} URLs", summary.category_count(Category::Writing)),
        format!("  Design/Video:  {} URLs", summary.category_count(Category::Design)),
        format!("  Vibe Coding:   {} URLs", summary.category_count(Category::VibeCoding)),
        format!("  Productivity:  {} URLs", summary.category_count(Category::Productivity)),
        format!("  General/Other: {} URLs", summary.category_count(Category::All)),
    ];

    lines.extend(
        report
            .failed_sitemaps
            .iter()
            .map(|failed| format!("Not processed: {failed}")),
    );

    lines.push(format!(
        "Migration map generated: {} of {} URLs mapped from {} sitemaps",
        summary.total_redirects,
        summary.total_urls,
        summary.sitemaps_processed.len()
    ));

    lines.join("\n")
}
