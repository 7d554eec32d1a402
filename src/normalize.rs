//! Assistant-reply normalization.
//!
//! Raw model output arrives decorated with markdown artifacts, multi-reply
//! paragraphs, and the occasional upstream failure string. This module
//! turns it into display-ready text: strip decoration, keep a single
//! reply, reflow into readable lines, and substitute a fixed apology for
//! anything that still looks like an internal failure.
//!
//! The pipeline is pure and idempotent; it is applied identically to
//! freshly received replies and to messages loaded from history.

use once_cell::sync::Lazy;
use regex::Regex;

/// Substrings that mark a reply as an upstream failure rather than real
/// model output. Matched against raw and normalized text alike.
pub const FAILURE_MARKERS: [&str; 3] = ["生成失败", "Connection error", "错误"];

/// Fixed apology substituted for failure-marked replies.
pub const REPLY_FALLBACK: &str = "抱歉，我暂时无法处理这个问题，请稍后再试。";

static HORIZONTAL_RULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-{3,}").expect("static pattern"));
static EMPHASIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*{2,3}").expect("static pattern"));
static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"#{1,3}").expect("static pattern"));
static BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\s").expect("static pattern"));

static SECTION_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n*(第[一二三四五六七八九十\d]+部分[：:])\n*").expect("static pattern")
});
static LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n?(\d+[、.])").expect("static pattern"));
static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([。！？])([^"'\n])"#).expect("static pattern"));
static EXCESS_NEWLINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("static pattern"));

/// Strips markdown decoration: horizontal rules, bold/italic asterisk
/// runs, heading hashes, and bullet markers.
pub fn clean_markdown(text: &str) -> String {
    let text = HORIZONTAL_RULE.replace_all(text, "");
    let text = EMPHASIS.replace_all(&text, "");
    let text = HEADING.replace_all(&text, "");
    let text = BULLET.replace_all(&text, "");
    text.trim().to_string()
}

/// Keeps only the first blank-line-separated paragraph.
///
/// A first paragraph shorter than `merge_threshold` characters is joined
/// with the second so a bare acknowledgement does not swallow the actual
/// answer. Paragraph edges are trimmed.
pub fn single_reply(text: &str, merge_threshold: usize) -> String {
    let Some((first, rest)) = text.split_once("\n\n") else {
        return text.trim().to_string();
    };
    let first = first.trim();
    if first.chars().count() < merge_threshold {
        let second = rest.split("\n\n").next().unwrap_or("").trim();
        if !second.is_empty() {
            return format!("{first}\n\n{second}");
        }
    }
    first.to_string()
}

/// Breaks a wall of text into readable lines.
///
/// Inserts a line break around `第N部分：` section markers and before
/// `1、`-style list markers, and after each sentence-ending mark that is
/// not followed by a quote. Runs of three or more breaks collapse to a
/// blank line. Markers already sitting on their own line are left alone,
/// which keeps the pass idempotent.
pub fn reflow(text: &str) -> String {
    let text = SECTION_MARKER.replace_all(text, "\n$1\n");
    let text = LIST_MARKER.replace_all(&text, "\n$1");
    let text = SENTENCE_END.replace_all(&text, "$1\n$2");
    let text = EXCESS_NEWLINES.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Returns true if the text contains a known failure marker.
pub fn contains_failure_marker(text: &str) -> bool {
    FAILURE_MARKERS.iter().any(|marker| text.contains(marker))
}

/// The full pipeline: clean, truncate to a single reply, reflow, and
/// substitute the apology for anything still failure-marked.
pub fn normalize_reply(text: &str, merge_threshold: usize) -> String {
    let cleaned = clean_markdown(text);
    let truncated = single_reply(&cleaned, merge_threshold);
    let reflowed = reflow(&truncated);
    if contains_failure_marker(&reflowed) {
        REPLY_FALLBACK.to_string()
    } else {
        reflowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Threshold used by the full-page chat surface.
    const PAGE: usize = 20;

    /// Threshold used by the floating widget.
    const WIDGET: usize = 50;

    #[test]
    fn strips_markdown_and_merges_short_first_paragraph() {
        let normalized = normalize_reply("**Hello** world\n\n### Next part", PAGE);
        assert_eq!(normalized, "Hello world\n\nNext part");
    }

    #[test]
    fn strips_horizontal_rules_and_bullets() {
        let cleaned = clean_markdown("---\n* 第一点\n----\n* 第二点");
        assert!(!cleaned.contains('-'));
        assert!(!cleaned.contains('*'));
        assert!(cleaned.contains("第一点"));
    }

    #[test]
    fn long_first_paragraph_stands_alone() {
        let first = "这一段足够长，超过了二十个字符的合并阈值，应当单独成段。";
        let text = format!("{first}\n\n后续内容不应出现。");
        assert_eq!(normalize_reply(&text, PAGE), reflow(first));
    }

    #[test]
    fn widget_threshold_merges_more() {
        // 21 characters: kept alone at threshold 20, merged at threshold 50.
        let first = "这一段正好超过二十个字符一点点，请看下一段。";
        assert!(first.chars().count() > PAGE);
        assert!(first.chars().count() < WIDGET);
        let text = format!("{first}\n\n第二段。");

        let page = normalize_reply(&text, PAGE);
        assert!(!page.contains("第二段"));

        let widget = normalize_reply(&text, WIDGET);
        assert!(widget.contains("第二段"));
    }

    #[test]
    fn breaks_after_sentences_but_not_before_quotes() {
        let reflowed = reflow("学习要点有三。第一点最重要！明白了吗？\"明白。\"");
        assert_eq!(reflowed, "学习要点有三。\n第一点最重要！\n明白了吗？\"明白。\"");
    }

    #[test]
    fn sections_and_list_markers_get_their_own_lines() {
        let reflowed = reflow("概述。第一部分：基础1、数组2、链表");
        assert_eq!(reflowed, "概述。\n第一部分：\n基础\n1、数组\n2、链表");
    }

    #[test]
    fn collapses_excess_blank_lines() {
        assert_eq!(reflow("甲\n\n\n\n乙"), "甲\n\n乙");
    }

    #[test]
    fn normalize_is_idempotent() {
        let samples = [
            "**Hello** world\n\n### Next part",
            "概述。第一部分：基础1、数组2、链表",
            "好的。\n\n第一部分：先讲概念。然后做题！",
            "短。\n\n1、第一项内容比较长，用来验证列表标记。",
            "---\n* 要点：先看题目。再想思路？\"好\"",
        ];
        for sample in samples {
            for threshold in [PAGE, WIDGET] {
                let once = normalize_reply(sample, threshold);
                let twice = normalize_reply(&once, threshold);
                assert_eq!(once, twice, "not idempotent for {sample:?}");
            }
        }
    }

    #[test]
    fn failure_markers_become_the_fallback() {
        for raw in ["生成失败: timeout", "Connection error", "内部错误，请联系管理员"] {
            assert_eq!(normalize_reply(raw, PAGE), REPLY_FALLBACK);
        }
        // The fallback itself is clean.
        assert!(!contains_failure_marker(REPLY_FALLBACK));
    }

    #[test]
    fn fallback_is_a_fixed_point() {
        assert_eq!(normalize_reply(REPLY_FALLBACK, PAGE), REPLY_FALLBACK);
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(normalize_reply("hello there", PAGE), "hello there");
        assert_eq!(normalize_reply("", PAGE), "");
        assert_eq!(normalize_reply("   ", PAGE), "");
    }
}
