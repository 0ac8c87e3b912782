//! Search module - scoped substring search over site content / 搜索模块
//!
//! Architecture principles / 架构原则：
//! - `scope`, `predicate` and `request` are pure: no storage, no clock
//! - `engine` is the only place SQL is executed against content
//! - `service` wires the pieces together for one request
//!
//! Search features / 搜索特性：
//! - Case-insensitive substring match over title and body
//! - Scope: global default, per-form selection, or fixed trend-alert type
//! - Published records only, 10 results per page

pub mod engine;
pub mod predicate;
pub mod request;
pub mod scope;
pub mod service;

pub use engine::{QueryEngine, SearchPage, SqliteQueryEngine, RESULTS_PER_PAGE};
pub use predicate::{build, escape_like, SearchPredicate, WhereClause};
pub use request::{FormIdentity, Marker, SearchParams, SearchRequest};
pub use scope::{resolve, ContentTypeScope, PerFormScopes, FALLBACK_CONTENT_TYPE, TREND_ALERT_CONTENT_TYPE};
pub use service::{plan_search, run_search, SearchMode, SearchOutcome, SearchPlan};
