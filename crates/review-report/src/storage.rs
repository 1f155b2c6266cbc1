//! Report persistence

use crate::{Report, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name prefix shared by every saved report
pub const REPORT_FILE_PREFIX: &str = "A股晚间复盘报告";

/// `A股晚间复盘报告_{YYYY-MM-DD}.md`
pub fn report_file_name(date: NaiveDate) -> String {
    format!("{REPORT_FILE_PREFIX}_{}.md", date.format("%Y-%m-%d"))
}

/// Write the report into `dir`, creating it if needed
///
/// An existing report for the same date is overwritten.
pub fn save_report(report: &Report, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let path = dir.join(report_file_name(report.date));
    fs::write(&path, &report.content)?;

    info!("Report saved to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback_document;

    fn report(content: &str) -> Report {
        Report {
            date: NaiveDate::from_ymd_opt(2025, 11, 3).unwrap(),
            content: content.to_string(),
            provider_name: None,
            prompt: "prompt".to_string(),
        }
    }

    #[test]
    fn test_file_name_embeds_date() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
        assert_eq!(report_file_name(date), "A股晚间复盘报告_2025-01-09.md");
    }

    #[test]
    fn test_save_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("reports");

        let path = save_report(&report("# body"), &out).unwrap();

        assert_eq!(path, out.join("A股晚间复盘报告_2025-11-03.md"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "# body");
    }

    #[test]
    fn test_fallback_document_is_saved_with_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let prompt = "## 真实市场数据\n- 上涨家数：0";

        let path = save_report(&report(&fallback_document(prompt)), dir.path()).unwrap();

        let saved = fs::read_to_string(path).unwrap();
        assert!(saved.contains(prompt));
    }

    #[test]
    fn test_save_overwrites_same_day() {
        let dir = tempfile::tempdir().unwrap();
        save_report(&report("first"), dir.path()).unwrap();
        let path = save_report(&report("second"), dir.path()).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "second");
    }
}
