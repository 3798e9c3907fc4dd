//! Selector groups for every field the scraper reads.
//!
//! A group is an ordered list of alternative CSS selectors. Naver serves
//! several article layouts (general, entertainment, sports), so most fields
//! carry more than one candidate and the first one that matches wins.

use serde::{Deserialize, Deserializer};

/// An ordered list of alternative CSS selectors for one logical field.
///
/// Deserializes from either a list of selectors or a single comma-separated
/// string (`"#title_area span, .media_end_head_headline"`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorGroup(Vec<String>);

impl SelectorGroup {
    pub fn new(selectors: &[&str]) -> Self {
        Self(selectors.iter().map(|s| s.to_string()).collect())
    }

    /// Split a comma-separated selector string into a group.
    pub fn parse(s: &str) -> Self {
        Self(
            s.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<String>> for SelectorGroup {
    fn from(selectors: Vec<String>) -> Self {
        Self(selectors)
    }
}

impl<'de> Deserialize<'de> for SelectorGroup {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Joined(String),
            List(Vec<String>),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Joined(s) => SelectorGroup::parse(&s),
            Raw::List(list) => SelectorGroup(
                list.into_iter()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            ),
        })
    }
}

/// All selector groups, one table per page region.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub article: ArticleSelectors,
    pub comment_stats: CommentStatsSelectors,
    pub comment_navigation: CommentNavigationSelectors,
    pub comments: CommentSelectors,
    pub cleanbot: CleanbotSelectors,
}

impl SelectorConfig {
    /// Names of required groups that are empty.
    pub fn empty_groups(&self) -> Vec<&'static str> {
        let required = [
            ("article.title", &self.article.title),
            ("article.comment_count", &self.article.comment_count),
            (
                "comment_navigation.article_to_comment_button",
                &self.comment_navigation.article_to_comment_button,
            ),
            (
                "comment_navigation.comment_page_more_button",
                &self.comment_navigation.comment_page_more_button,
            ),
            ("comments.comment_list", &self.comments.comment_list),
        ];

        required
            .into_iter()
            .filter(|(_, group)| group.is_empty())
            .map(|(name, _)| name)
            .collect()
    }
}

/// Article body and header fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArticleSelectors {
    pub title: SelectorGroup,
    pub content: SelectorGroup,
    pub author: SelectorGroup,
    pub publish_date: SelectorGroup,
    pub category: SelectorGroup,
    pub like_count: SelectorGroup,
    pub comment_count: SelectorGroup,
}

impl Default for ArticleSelectors {
    fn default() -> Self {
        Self {
            title: SelectorGroup::new(&[
                "#title_area span",
                "h2.media_end_head_headline",
                "h2.end_tit",
                ".NewsEndMain_article_title__j5ND9",
                "h2[class*='article_title']",
            ]),
            content: SelectorGroup::new(&[
                "#dic_area",
                "#articleBodyContents",
                "#articeBody",
                "div._article_content",
            ]),
            author: SelectorGroup::new(&[
                ".media_end_head_journalist_name",
                ".byline_s",
                ".journalist_name",
            ]),
            publish_date: SelectorGroup::new(&[
                ".media_end_head_info_datestamp_time",
                "._ARTICLE_DATE_TIME",
                ".article_info .author em",
            ]),
            category: SelectorGroup::new(&[
                ".media_end_categorize_item",
                ".Nitem_link[aria-selected='true'] .Nitem_link_menu",
            ]),
            like_count: SelectorGroup::new(&[
                ".media_end_head_info_variety_like .u_likeit_text._count",
                "._reactionModule .u_likeit_text._count",
            ]),
            comment_count: SelectorGroup::new(&[
                ".media_end_head_cmtcount_button",
                "#comment_count",
            ]),
        }
    }
}

/// The comment summary box: labeled count rows and the demographic chart.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CommentStatsSelectors {
    /// One element per labeled count row.
    pub stat_count_info: SelectorGroup,
    /// Label inside a count row.
    pub stat_title: SelectorGroup,
    /// Value inside a count row.
    pub stat_value: SelectorGroup,
    pub demographic_stats_container: SelectorGroup,
    pub male_ratio: SelectorGroup,
    pub female_ratio: SelectorGroup,
    /// One element per age bracket bar.
    pub age_item: SelectorGroup,
    pub age_label: SelectorGroup,
    pub age_value: SelectorGroup,
}

impl Default for CommentStatsSelectors {
    fn default() -> Self {
        Self {
            stat_count_info: SelectorGroup::new(&[".u_cbox_comment_count_wrap .u_cbox_count_info"]),
            stat_title: SelectorGroup::new(&[".u_cbox_info_title"]),
            stat_value: SelectorGroup::new(&[".u_cbox_info_txt"]),
            demographic_stats_container: SelectorGroup::new(&[".u_cbox_chart_wrap"]),
            male_ratio: SelectorGroup::new(&[".u_cbox_chart_sex .u_cbox_chart_male .u_cbox_chart_per"]),
            female_ratio: SelectorGroup::new(&[
                ".u_cbox_chart_sex .u_cbox_chart_female .u_cbox_chart_per",
            ]),
            age_item: SelectorGroup::new(&[".u_cbox_chart_age .u_cbox_chart_progress"]),
            age_label: SelectorGroup::new(&[".u_cbox_chart_cnt span"]),
            age_value: SelectorGroup::new(&[".u_cbox_chart_per"]),
        }
    }
}

/// Controls that move from the article to the full comment list.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CommentNavigationSelectors {
    pub article_to_comment_button: SelectorGroup,
    pub comment_page_more_button: SelectorGroup,
}

impl Default for CommentNavigationSelectors {
    fn default() -> Self {
        Self {
            article_to_comment_button: SelectorGroup::new(&[".u_cbox_btn_view_comment"]),
            comment_page_more_button: SelectorGroup::new(&[".u_cbox_paginate .u_cbox_btn_more"]),
        }
    }
}

/// Fields of a single comment node, relative to that node.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CommentSelectors {
    pub comment_list: SelectorGroup,
    pub comment_content: SelectorGroup,
    pub comment_author: SelectorGroup,
    pub deleted_comment_author: SelectorGroup,
    pub comment_like: SelectorGroup,
    pub comment_dislike: SelectorGroup,
    pub comment_date: SelectorGroup,
}

impl Default for CommentSelectors {
    fn default() -> Self {
        Self {
            comment_list: SelectorGroup::new(&[".u_cbox_list > li.u_cbox_comment"]),
            comment_content: SelectorGroup::new(&[".u_cbox_contents"]),
            comment_author: SelectorGroup::new(&[".u_cbox_nick"]),
            deleted_comment_author: SelectorGroup::new(&[".u_cbox_nick", ".u_cbox_name"]),
            comment_like: SelectorGroup::new(&[".u_cbox_cnt_recomm"]),
            comment_dislike: SelectorGroup::new(&[".u_cbox_cnt_unrecomm"]),
            comment_date: SelectorGroup::new(&[".u_cbox_date"]),
        }
    }
}

/// The CleanBot comment filter switch and its settings dialog.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CleanbotSelectors {
    pub container: SelectorGroup,
    pub message: SelectorGroup,
    pub setting_button: SelectorGroup,
    pub modal: SelectorGroup,
    pub checkbox: SelectorGroup,
    /// Tried in order when the checkbox itself rejects the click.
    pub checkbox_fallback: SelectorGroup,
    pub confirm_button: SelectorGroup,
    pub close_button: SelectorGroup,
}

impl Default for CleanbotSelectors {
    fn default() -> Self {
        Self {
            container: SelectorGroup::new(&[".u_cbox_cleanbot"]),
            message: SelectorGroup::new(&[".u_cbox_cleanbot_title", ".u_cbox_cleanbot_msg"]),
            setting_button: SelectorGroup::new(&[".u_cbox_cleanbot_setbutton"]),
            modal: SelectorGroup::new(&[
                ".u_cbox_layer_wrap",
                ".u_cbox_layer_cleanbot2_wrap",
                ".u_cbox_layer_cleanbot2",
                ".u_cbox_layer_cleanbot2_content",
            ]),
            checkbox: SelectorGroup::new(&[
                "#cleanbot_dialog_checkbox_cbox_module",
                ".u_cbox_layer_cleanbot2_checkbox",
                "input[data-action='toggleCleanbot2']",
            ]),
            checkbox_fallback: SelectorGroup::new(&[
                ".u_cbox_layer_cleanbot2_checkboxdummy",
                "label[for='cleanbot_dialog_checkbox_cbox_module']",
            ]),
            confirm_button: SelectorGroup::new(&[
                "button[data-action='updateCleanbotStatus']",
                ".u_cbox_layer_cleanbot2_extrabtn",
            ]),
            close_button: SelectorGroup::new(&["button[data-action='closeCleanbotLayer']"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_comma_separated() {
        let group = SelectorGroup::parse(" #title_area span ,.media_end_head_headline,, ");
        assert_eq!(
            group.as_slice(),
            &["#title_area span".to_string(), ".media_end_head_headline".to_string()]
        );
    }

    #[test]
    fn test_deserialize_string_or_list() {
        #[derive(Deserialize)]
        struct Holder {
            a: SelectorGroup,
            b: SelectorGroup,
        }

        let holder: Holder = toml::from_str(
            r#"
a = ".one, .two"
b = [".three", " .four "]
"#,
        )
        .unwrap();

        assert_eq!(holder.a, SelectorGroup::new(&[".one", ".two"]));
        assert_eq!(holder.b, SelectorGroup::new(&[".three", ".four"]));
    }

    #[test]
    fn test_defaults_have_no_empty_required_groups() {
        assert!(SelectorConfig::default().empty_groups().is_empty());
    }

    #[test]
    fn test_empty_groups_reports_names() {
        let mut selectors = SelectorConfig::default();
        selectors.article.title = SelectorGroup::default();
        assert_eq!(selectors.empty_groups(), vec!["article.title"]);
    }
}
