use chrono::{DateTime, Utc};
use clap::ValueEnum;
use tabled::{
    builder::Builder,
    settings::{Alignment, Modify, object::Columns},
};

use crate::report::humanize_age;
use crate::types::{BranchMetrics, Classification, RepoReport, RepoStatus};
use crate::ReportData;

mod style;

use style::{apply_style, apply_title};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum TabStyle {
    Rounded,
    Modern,
    ModernRounded,
    Ascii,
    Psql,
    Markdown,
    Sharp,
    Blank,
    Empty,
}

/// One table per repository: Branch, Author, Created, Age, Merged, Status.
#[must_use]
pub fn format_tab(data: &ReportData, style: TabStyle) -> String {
    data.repos
        .iter()
        .map(|repo| render_repo(repo, style, data.generated_at))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_repo(repo: &RepoReport, style: TabStyle, now: DateTime<Utc>) -> String {
    let title = match &repo.base_branch {
        Some(base) => format!("{} (base: {base})", repo.name),
        None => repo.name.clone(),
    };

    let notice = match &repo.status {
        RepoStatus::Synced if repo.branches.is_empty() => Some("(no branches)".to_string()),
        RepoStatus::Synced => None,
        RepoStatus::SyncFailed { cause } => Some(format!("sync failed: {cause}")),
        RepoStatus::SnapshotFailed { cause } => Some(format!("cannot list branches: {cause}")),
        RepoStatus::Cancelled => Some("skipped: run cancelled".to_string()),
    };
    if let Some(notice) = notice {
        let mut builder = Builder::default();
        builder.push_record([notice]);
        let mut table = builder.build();
        apply_style(&mut table, style);
        apply_title(&mut table, style, &title);
        return table.to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(["Branch", "Author", "Created", "Age", "Merged", "Status"]);
    for branch in &repo.branches {
        builder.push_record(row_values(branch, now));
    }
    let mut table = builder.build();
    apply_style(&mut table, style);
    // Columns: 0 Branch, 1 Author, 2 Created, 3 Age, 4 Merged, 5 Status
    table.with(Modify::new(Columns::new(3..4)).with(Alignment::right()));
    apply_title(&mut table, style, &title);
    table.to_string()
}

fn row_values(branch: &BranchMetrics, now: DateTime<Utc>) -> Vec<String> {
    let created = branch.birth_timestamp.map_or_else(
        || "n/a".to_string(),
        |ts| ts.format("%Y-%m-%d").to_string(),
    );
    let age = branch
        .birth_timestamp
        .map_or_else(|| "n/a".to_string(), |ts| humanize_age(ts, now));
    let merged = if branch.is_merged { "yes" } else { "no" };
    let status = match &branch.classification {
        Classification::AnalysisFailed { cause } => format!("analysis-failed: {cause}"),
        other => other.label().to_string(),
    };
    vec![
        branch.branch_name.clone(),
        branch.author.clone().unwrap_or_else(|| "unknown".to_string()),
        created,
        age,
        merged.to_string(),
        status,
    ]
}
