use chrono::{DateTime, Utc};

use crate::types::{BranchMetrics, Classification, RepoReport, RepoStatus, ReportData};

use super::humanize::humanize_age;

const INDENT: &str = "    ";

/// Render the plain text report: one block per configured repository.
#[must_use]
pub fn generate_report(data: &ReportData) -> String {
    data.repos
        .iter()
        .map(|repo| repo_block(repo, data.generated_at))
        .collect::<Vec<_>>()
        .join("\n")
}

fn repo_block(repo: &RepoReport, now: DateTime<Utc>) -> String {
    let header = format!("For repo {} :", repo.name);
    let rows = match &repo.status {
        RepoStatus::Synced => branch_rows(repo, now),
        RepoStatus::SyncFailed { cause } => {
            vec![format!("{INDENT}Unavailable: sync failed: {cause}")]
        }
        RepoStatus::SnapshotFailed { cause } => {
            vec![format!("{INDENT}Unavailable: cannot list branches: {cause}")]
        }
        RepoStatus::Cancelled => vec![format!("{INDENT}Skipped: run cancelled")],
    };
    let mut lines = vec![header];
    lines.extend(rows);
    lines.join("\n") + "\n"
}

fn branch_rows(repo: &RepoReport, now: DateTime<Utc>) -> Vec<String> {
    let mut rows = vec![
        format!("{INDENT}Branch count = {}", repo.branches.len()),
        format!("{INDENT}Branch authors:"),
    ];
    rows.extend(repo.branches.iter().map(|branch| {
        let author = branch.author.as_deref().unwrap_or("unknown");
        format!("{INDENT}{INDENT}{}: {author}", branch.branch_name)
    }));

    match (&repo.base_branch, repo.base_missing()) {
        (Some(base), false) => {
            rows.push(format!("{INDENT}Branch ages (relative to {base}):"));
            rows.extend(repo.branches.iter().map(|branch| {
                format!(
                    "{INDENT}{INDENT}{}: {}",
                    branch.branch_name,
                    age_line(branch, base, now)
                )
            }));
        }
        (Some(base), true) => {
            rows.push(format!("{INDENT}Branch ages: unavailable, base branch {base} not found"));
        }
        (None, _) => {
            rows.push(format!("{INDENT}Branch ages: unavailable, no base branch configured"));
        }
    }

    let merged: Vec<&str> = repo
        .merged_branches()
        .map(|b| b.branch_name.as_str())
        .collect();
    let merged = if merged.is_empty() {
        "(none)".to_string()
    } else {
        merged.join(", ")
    };
    rows.push(format!("{INDENT}Merged branches: {merged}"));

    if repo.cancelled {
        rows.push(format!("{INDENT}(run cancelled; remaining branches not analysed)"));
    }
    rows
}

fn age_line(branch: &BranchMetrics, base: &str, now: DateTime<Utc>) -> String {
    match &branch.classification {
        Classification::Analyzed => {
            let commit = branch
                .birth_commit
                .as_ref()
                .map_or("?", |c| c.short());
            let unique = branch.unique_commits.unwrap_or_default();
            match branch.birth_timestamp {
                Some(ts) => format!(
                    "created {} ({} ago), first commit {commit}, {unique} commits ahead",
                    ts.format("%Y-%m-%d %H:%M UTC"),
                    humanize_age(ts, now)
                ),
                None => format!(
                    "first commit {commit} has no readable timestamp, {unique} commits ahead"
                ),
            }
        }
        Classification::SelfBase if branch.branch_name == base => "base branch".to_string(),
        Classification::SelfBase => format!("same tip as {base}"),
        Classification::NoDivergentCommits => format!("no commits beyond {base}"),
        Classification::NoBaseBranch => format!("n/a, base branch {base} not found"),
        failed if failed.is_cancelled() => "not analysed, run cancelled".to_string(),
        Classification::AnalysisFailed { cause } => format!("analysis failed: {cause}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BranchRef, CommitId};

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).expect("in range")
    }

    fn branch(name: &str, classification: Classification) -> BranchMetrics {
        BranchMetrics {
            author: Some(format!("{name}-author")),
            ..BranchMetrics::unanalyzed(
                &BranchRef::new(name, CommitId::new("8772d940766815ff")),
                classification,
            )
        }
    }

    fn repo(status: RepoStatus, base: Option<&str>, branches: Vec<BranchMetrics>) -> RepoReport {
        RepoReport {
            name: "keyrunner".to_string(),
            url: "https://gitlab.com/rustushki/keyrunner".to_string(),
            base_branch: base.map(ToString::to_string),
            mirror_path: "/repos/keyrunner.git".to_string(),
            status,
            branches,
            cancelled: false,
        }
    }

    #[test]
    fn renders_counts_authors_ages_and_merged_list() {
        let now = at(1_000_000);
        let develop = BranchMetrics {
            birth_commit: Some(CommitId::new("b16e6b4dee93915f")),
            birth_timestamp: Some(at(1_000_000 - 120_960)),
            unique_commits: Some(3),
            ..branch("develop", Classification::Analyzed)
        };
        let stale = BranchMetrics {
            is_merged: true,
            ..branch("stale", Classification::NoDivergentCommits)
        };
        let data = ReportData {
            generated_at: now,
            repos: vec![repo(
                RepoStatus::Synced,
                Some("master"),
                vec![develop, branch("master", Classification::SelfBase), stale],
            )],
        };

        let text = generate_report(&data);

        assert!(text.starts_with("For repo keyrunner :\n"), "{text}");
        assert!(text.contains("    Branch count = 3\n"), "{text}");
        assert!(text.contains("        develop: develop-author\n"), "{text}");
        assert!(
            text.contains("        develop: created 1970-01-11 04:10 UTC (1.4 days ago), first commit b16e6b4d, 3 commits ahead\n"),
            "{text}"
        );
        assert!(text.contains("        master: base branch\n"), "{text}");
        assert!(text.contains("        stale: no commits beyond master\n"), "{text}");
        assert!(text.contains("    Merged branches: stale\n"), "{text}");
    }

    #[test]
    fn missing_base_is_reported_once() {
        let data = ReportData {
            generated_at: at(0),
            repos: vec![repo(
                RepoStatus::Synced,
                Some("trunk"),
                vec![
                    branch("a", Classification::NoBaseBranch),
                    branch("b", Classification::NoBaseBranch),
                ],
            )],
        };
        let text = generate_report(&data);
        assert_eq!(text.matches("base branch trunk not found").count(), 1, "{text}");
        assert!(text.contains("    Merged branches: (none)\n"), "{text}");
    }

    #[test]
    fn cancelled_branches_are_counted_and_explained() {
        let mut report = repo(
            RepoStatus::Synced,
            Some("master"),
            vec![
                branch("master", Classification::SelfBase),
                branch("develop", Classification::cancelled()),
            ],
        );
        report.cancelled = true;
        let data = ReportData {
            generated_at: at(0),
            repos: vec![report],
        };
        let text = generate_report(&data);
        assert!(text.contains("    Branch count = 2\n"), "{text}");
        assert!(text.contains("        develop: not analysed, run cancelled\n"), "{text}");
        assert!(text.contains("remaining branches not analysed"), "{text}");
    }

    #[test]
    fn unavailable_repos_are_still_listed() {
        let data = ReportData {
            generated_at: at(0),
            repos: vec![repo(
                RepoStatus::SyncFailed {
                    cause: "failed to clone x: fatal".to_string(),
                },
                Some("master"),
                Vec::new(),
            )],
        };
        let text = generate_report(&data);
        assert!(text.contains("For repo keyrunner :"));
        assert!(text.contains("Unavailable: sync failed: failed to clone x: fatal"));
    }
}
