/// Text sanitizing utility functions / 文本清理工具函数

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());
static SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Sanitize a single-line text field / 清理单行文本字段
/// 1. Strip markup tags / 去除标签
/// 2. Drop control characters / 去除控制字符
/// 3. Collapse whitespace runs and trim / 合并空白并去除首尾空白
pub fn sanitize_text_field(input: &str) -> String {
    let stripped = TAG_RE.replace_all(input, "");
    let no_control: String = stripped
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    SPACE_RE.replace_all(&no_control, " ").trim().to_string()
}

/// Parse a positive integer id / 解析正整数ID
pub fn parse_positive_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id > 0)
}
