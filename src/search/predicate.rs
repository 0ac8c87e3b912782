//! Search predicate construction / 搜索谓词构建
//!
//! A predicate compiles to a SQL `WHERE` fragment holding only placeholders;
//! every user-supplied value travels as a bound parameter.

use crate::models::ContentRecord;
use super::scope::ContentTypeScope;

/// Stored status of published records / 已发布状态
pub const PUBLISHED_STATUS: &str = "publish";

/// Case folding shared with SQLite `lower()`, which folds ASCII only
/// 与 SQLite `lower()` 一致的大小写折叠（仅 ASCII）
pub fn fold_case(input: &str) -> String {
    input.to_ascii_lowercase()
}

/// Escape LIKE wildcard characters (`%`, `_`, `\`) in user input / 转义LIKE通配符
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Substring match restricted to a scope / 限定范围的子串匹配
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchPredicate {
    term: String,
    pattern: String,
    scope: ContentTypeScope,
    published_only: bool,
}

impl MatchPredicate {
    /// Escaped LIKE pattern (`%term%`) / 转义后的LIKE模式
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn scope(&self) -> &ContentTypeScope {
        &self.scope
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPredicate {
    /// Matches nothing / 不匹配任何记录
    Empty,
    Match(MatchPredicate),
}

/// Parameterized SQL fragment / 参数化SQL片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhereClause {
    pub sql: String,
    pub params: Vec<String>,
}

/// Build a predicate; a blank term yields [`SearchPredicate::Empty`] / 构建谓词，空词返回 Empty
pub fn build(term: &str, scope: ContentTypeScope, published_only: bool) -> SearchPredicate {
    let term = term.trim();
    if term.is_empty() {
        return SearchPredicate::Empty;
    }
    let term = fold_case(term);
    let pattern = format!("%{}%", escape_like(&term));
    SearchPredicate::Match(MatchPredicate {
        term,
        pattern,
        scope,
        published_only,
    })
}

impl SearchPredicate {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn scope(&self) -> Option<&ContentTypeScope> {
        match self {
            Self::Empty => None,
            Self::Match(m) => Some(&m.scope),
        }
    }

    /// Compile against the `posts` table columns / 编译为 posts 表的查询条件
    pub fn where_clause(&self) -> WhereClause {
        let m = match self {
            Self::Empty => {
                return WhereClause { sql: "1 = 0".to_string(), params: Vec::new() };
            }
            Self::Match(m) => m,
        };

        let mut params = vec![m.pattern.clone(), m.pattern.clone()];
        let placeholders = vec!["?"; m.scope.len()].join(", ");
        params.extend(m.scope.as_slice().iter().map(|t| t.as_str().to_string()));

        let mut sql = format!(
            "(lower(title) LIKE ? ESCAPE '\\' OR lower(content) LIKE ? ESCAPE '\\') AND post_type IN ({})",
            placeholders
        );
        if m.published_only {
            sql.push_str(" AND post_status = ?");
            params.push(PUBLISHED_STATUS.to_string());
        }
        WhereClause { sql, params }
    }

    /// Evaluate against a single record in memory / 在内存中判断单条记录
    pub fn matches(&self, record: &ContentRecord) -> bool {
        let m = match self {
            Self::Empty => return false,
            Self::Match(m) => m,
        };
        if !m.scope.contains(&record.post_type) {
            return false;
        }
        if m.published_only && record.post_status != PUBLISHED_STATUS {
            return false;
        }
        fold_case(&record.title).contains(&m.term) || fold_case(&record.content).contains(&m.term)
    }
}
