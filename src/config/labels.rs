//! UI label text used to identify labeled statistic rows.

use serde::Deserialize;

/// Label substrings shown by the comment module.
///
/// Statistic rows are matched by label rather than by position, so a row that
/// moves or disappears does not shift every other value.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub current_comment_count: String,
    pub deleted_comment_count: String,
    pub removed_comment_count: String,
    pub age_10s: String,
    pub age_20s: String,
    pub age_30s: String,
    pub age_40s: String,
    pub age_50s: String,
    pub age_60s: String,
    /// Present in the CleanBot status message once the filter is off.
    pub cleanbot_disabled: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            current_comment_count: "현재 댓글".to_string(),
            deleted_comment_count: "작성자 삭제".to_string(),
            removed_comment_count: "규정 미준수".to_string(),
            age_10s: "10대".to_string(),
            age_20s: "20대".to_string(),
            age_30s: "30대".to_string(),
            age_40s: "40대".to_string(),
            age_50s: "50대".to_string(),
            age_60s: "60대".to_string(),
            cleanbot_disabled: "착한댓글".to_string(),
        }
    }
}

/// Which count a statistics row holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountLabel {
    Current,
    Deleted,
    Removed,
}

/// Which age bracket a chart bar holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeBracket {
    Teens,
    Twenties,
    Thirties,
    Forties,
    Fifties,
    SixtiesPlus,
}

impl LabelConfig {
    /// Classify a count row title. The first matching label wins.
    pub fn count_label(&self, title: &str) -> Option<CountLabel> {
        [
            (&self.current_comment_count, CountLabel::Current),
            (&self.deleted_comment_count, CountLabel::Deleted),
            (&self.removed_comment_count, CountLabel::Removed),
        ]
        .into_iter()
        .find(|(label, _)| !label.is_empty() && title.contains(label.as_str()))
        .map(|(_, kind)| kind)
    }

    /// Classify an age chart label.
    pub fn age_bracket(&self, label: &str) -> Option<AgeBracket> {
        [
            (&self.age_10s, AgeBracket::Teens),
            (&self.age_20s, AgeBracket::Twenties),
            (&self.age_30s, AgeBracket::Thirties),
            (&self.age_40s, AgeBracket::Forties),
            (&self.age_50s, AgeBracket::Fifties),
            (&self.age_60s, AgeBracket::SixtiesPlus),
        ]
        .into_iter()
        .find(|(needle, _)| !needle.is_empty() && label.contains(needle.as_str()))
        .map(|(_, bracket)| bracket)
    }
}
