use serde::Serialize;

use scoped_search::models::{ContentRecord, ContentType};
use scoped_search::search::{SearchMode, SearchOutcome};
use scoped_search::utils::sanitize_text_field;

/// Characters kept in a result excerpt / 摘要保留的字符数
pub const EXCERPT_CHARS: usize = 160;

#[derive(Debug, Serialize)]
pub struct SearchResultItem {
    pub id: i64,
    pub title: String,
    pub excerpt: String,
    pub post_type: ContentType,
    pub created_at: String,
}

impl From<ContentRecord> for SearchResultItem {
    fn from(record: ContentRecord) -> Self {
        let text = sanitize_text_field(&record.content);
        let excerpt = match text.char_indices().nth(EXCERPT_CHARS) {
            Some((cut, _)) => format!("{}…", &text[..cut]),
            None => text,
        };
        Self {
            id: record.id,
            title: record.title,
            excerpt,
            post_type: ContentType::new(record.post_type),
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    #[serde(flatten)]
    pub mode: SearchMode,
    /// Content types the search was restricted to / 本次搜索的内容类型范围
    pub scope: Vec<ContentType>,
    pub results: Vec<SearchResultItem>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

impl From<SearchOutcome> for SearchResponse {
    fn from(outcome: SearchOutcome) -> Self {
        let page = outcome.page;
        Self {
            mode: outcome.mode,
            scope: outcome.scope,
            results: page.records.into_iter().map(SearchResultItem::from).collect(),
            total: page.total,
            page: page.page,
            per_page: page.per_page,
            total_pages: page.total_pages,
        }
    }
}
