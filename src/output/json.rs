use crate::ReportData;

/// Pretty JSON rendering of the whole report.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn to_json(data: &ReportData) -> serde_json::Result<String> {
    serde_json::to_string_pretty(data)
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use serde_json::Value;

    use super::*;
    use crate::types::{BranchMetrics, BranchRef, Classification, CommitId, RepoReport, RepoStatus};

    #[test]
    fn classifications_are_tagged() {
        let failed = BranchMetrics::unanalyzed(
            &BranchRef::new("flaky", CommitId::new("abcd1234")),
            Classification::AnalysisFailed {
                cause: "git rev-list timed out".to_string(),
            },
        );
        let data = ReportData {
            generated_at: DateTime::from_timestamp(0, 0).expect("epoch"),
            repos: vec![RepoReport {
                name: "demo".to_string(),
                url: "https://example.com/demo.git".to_string(),
                base_branch: Some("main".to_string()),
                mirror_path: "/repos/demo.git".to_string(),
                status: RepoStatus::Synced,
                branches: vec![failed],
                cancelled: false,
            }],
        };

        let value: Value = serde_json::from_str(&to_json(&data).expect("json")).expect("parse");
        let branch = &value["repos"][0]["branches"][0];
        assert_eq!(branch["branch_name"], "flaky");
        assert_eq!(branch["tip"], "abcd1234");
        assert_eq!(branch["classification"]["kind"], "ANALYSIS_FAILED");
        assert_eq!(branch["classification"]["cause"], "git rev-list timed out");
        assert_eq!(value["repos"][0]["status"]["kind"], "SYNCED");
        assert!(branch["birth_timestamp"].is_null());
    }
}
