//! Search pipeline: authenticate → resolve → build → execute / 搜索流程
//!
//! Anything that is not an authenticated plugin request runs the default
//! host search over every public content type.

use serde::Serialize;

use crate::error::Result;
use crate::models::ContentType;
use crate::nonce::{authenticate, AuthResult, NonceIssuer};
use crate::store::{ContentTypeRegistry, FormStore, SettingsStore};
use super::engine::{QueryEngine, SearchPage};
use super::predicate::{build, SearchPredicate};
use super::request::SearchRequest;
use super::scope::{resolve, ContentTypeScope, PerFormScopes};
use super::FormIdentity;

/// Which path served the request / 请求走的搜索路径
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "form", rename_all = "snake_case")]
pub enum SearchMode {
    Scoped(FormIdentity),
    Default,
}

/// Planned search, before execution / 执行前的搜索计划
#[derive(Debug, Clone)]
pub struct SearchPlan {
    pub mode: SearchMode,
    pub predicate: SearchPredicate,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    #[serde(flatten)]
    pub mode: SearchMode,
    pub scope: Vec<ContentType>,
    #[serde(flatten)]
    pub page: SearchPage,
}

/// Scope of the default host search / 默认搜索范围
async fn default_scope<S>(store: &S) -> Result<ContentTypeScope>
where
    S: ContentTypeRegistry + ?Sized,
{
    let registry = store.list_public_content_types().await?;
    Ok(ContentTypeScope::new(registry.into_iter().map(|t| ContentType::new(t.name)))
        .unwrap_or_else(ContentTypeScope::fallback))
}

/// Decide which predicate a request gets / 决定请求使用的谓词
pub async fn plan_search<S>(store: &S, nonces: &NonceIssuer, request: &SearchRequest, now: i64) -> Result<SearchPlan>
where
    S: SettingsStore + FormStore + ContentTypeRegistry + ?Sized,
{
    let identity = match authenticate(request, nonces, now) {
        AuthResult::Authenticated(identity) => identity,
        AuthResult::Unauthenticated => {
            tracing::warn!("Search request failed anti-forgery check, using default search");
            let predicate = build(&request.host_term, default_scope(store).await?, true);
            return Ok(SearchPlan { mode: SearchMode::Default, predicate });
        }
        AuthResult::NotRequested => {
            let predicate = build(&request.host_term, default_scope(store).await?, true);
            return Ok(SearchPlan { mode: SearchMode::Default, predicate });
        }
    };

    let scope = match identity {
        FormIdentity::General => {
            let global = store.get_global_scope().await?;
            resolve(&identity, &global, &PerFormScopes::new())
        }
        FormIdentity::Form(id) => {
            let mut per_form = PerFormScopes::new();
            per_form.insert(id, store.get_form_scope(id).await?);
            resolve(&identity, &[], &per_form)
        }
        FormIdentity::TrendAlert => resolve(&identity, &[], &PerFormScopes::new()),
    };

    tracing::debug!(
        "Scoped search: form={}, scope={:?}, term_len={}",
        identity,
        scope.as_slice(),
        request.term.chars().count()
    );

    Ok(SearchPlan {
        mode: SearchMode::Scoped(identity),
        predicate: build(&request.term, scope, true),
    })
}

/// Plan and execute a search / 规划并执行搜索
pub async fn run_search<S>(
    store: &S,
    engine: &dyn QueryEngine,
    nonces: &NonceIssuer,
    request: &SearchRequest,
    now: i64,
) -> Result<SearchOutcome>
where
    S: SettingsStore + FormStore + ContentTypeRegistry + ?Sized,
{
    let plan = plan_search(store, nonces, request, now).await?;
    let page = engine.execute(&plan.predicate, request.page).await?;
    let scope = plan
        .predicate
        .scope()
        .map(|s| s.as_slice().to_vec())
        .unwrap_or_default();
    Ok(SearchOutcome { mode: plan.mode, scope, page })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_pool;
    use crate::search::engine::{insert_post, SqliteQueryEngine};
    use crate::search::request::Marker;
    use crate::store::SqliteStore;

    const NOW: i64 = 1_760_000_000;

    fn issuer() -> NonceIssuer {
        NonceIssuer::new("pipeline-secret", 86_400).unwrap()
    }

    fn request(marker: Marker, token: Option<String>, term: &str, host_term: &str) -> SearchRequest {
        SearchRequest {
            marker,
            token,
            term: term.to_string(),
            host_term: host_term.to_string(),
            page: 1,
        }
    }

    fn signed(identity: FormIdentity, term: &str) -> SearchRequest {
        let token = issuer().issue(&identity.action(), NOW);
        request(Marker::Claims(identity), Some(token), term, "search-trigger")
    }

    fn types(names: &[&str]) -> Vec<ContentType> {
        names.iter().map(|n| ContentType::from(*n)).collect()
    }

    #[tokio::test]
    async fn test_general_search_uses_global_scope() {
        let store = SqliteStore::new(memory_pool().await);
        store.set_global_scope(&types(&["page"])).await.unwrap();

        let plan = plan_search(&store, &issuer(), &signed(FormIdentity::General, "sale"), NOW).await.unwrap();
        assert_eq!(plan.mode, SearchMode::Scoped(FormIdentity::General));
        assert_eq!(plan.predicate.scope().unwrap().as_slice(), types(&["page"]).as_slice());
    }

    #[tokio::test]
    async fn test_form_scope_overrides_global() {
        let store = SqliteStore::new(memory_pool().await);
        store.set_global_scope(&types(&["page", "post"])).await.unwrap();
        let form = store.create_form("Alerts").await.unwrap();
        store.set_form_scope(form.id, &types(&["trend-alert"])).await.unwrap();

        let plan = plan_search(&store, &issuer(), &signed(FormIdentity::Form(form.id), "q3"), NOW).await.unwrap();
        assert_eq!(plan.predicate.scope().unwrap().as_slice(), types(&["trend-alert"]).as_slice());
    }

    #[tokio::test]
    async fn test_unknown_form_falls_back_to_post() {
        let store = SqliteStore::new(memory_pool().await);
        store.set_global_scope(&types(&["page"])).await.unwrap();

        let plan = plan_search(&store, &issuer(), &signed(FormIdentity::Form(77), "x"), NOW).await.unwrap();
        assert_eq!(plan.predicate.scope().unwrap(), &ContentTypeScope::fallback());
    }

    #[tokio::test]
    async fn test_missing_token_never_scopes() {
        let store = SqliteStore::new(memory_pool().await);
        store.set_global_scope(&types(&["page"])).await.unwrap();
        let nonces = issuer();

        for marker in [Marker::Absent, Marker::Malformed, Marker::Claims(FormIdentity::General), Marker::Claims(FormIdentity::TrendAlert)] {
            for term in ["", "sale"] {
                let plan = plan_search(&store, &nonces, &request(marker.clone(), None, term, ""), NOW).await.unwrap();
                assert_eq!(plan.mode, SearchMode::Default);
                assert!(plan.predicate.is_empty());
            }
        }
    }

    #[tokio::test]
    async fn test_forged_token_uses_default_search() {
        let store = SqliteStore::new(memory_pool().await);
        let nonces = issuer();
        let other_form_token = nonces.issue(&FormIdentity::Form(1).action(), NOW);
        let req = request(Marker::Claims(FormIdentity::Form(2)), Some(other_form_token), "sale", "hello");

        let plan = plan_search(&store, &nonces, &req, NOW).await.unwrap();
        assert_eq!(plan.mode, SearchMode::Default);
        assert_eq!(plan.predicate.scope().unwrap().as_slice(), types(&["page", "post", "trend-alert"]).as_slice());
    }

    #[tokio::test]
    async fn test_trend_alert_scenario() {
        let db = memory_pool().await;
        let hit = insert_post(&db, "trend-alert", "publish", "Q3 Report: retail", "").await;
        insert_post(&db, "trend-alert", "draft", "Q3 report draft", "").await;
        insert_post(&db, "post", "publish", "Our Q3 report", "").await;
        insert_post(&db, "trend-alert", "publish", "Q4 outlook", "").await;

        let store = SqliteStore::new(db.clone());
        store.set_global_scope(&types(&["post"])).await.unwrap();
        let engine = SqliteQueryEngine::new(db);

        let outcome = run_search(&store, &engine, &issuer(), &signed(FormIdentity::TrendAlert, "Q3 report"), NOW)
            .await
            .unwrap();
        assert_eq!(outcome.mode, SearchMode::Scoped(FormIdentity::TrendAlert));
        assert_eq!(outcome.scope, types(&["trend-alert"]));
        assert_eq!(outcome.page.records.iter().map(|r| r.id).collect::<Vec<_>>(), vec![hit]);
    }

    #[tokio::test]
    async fn test_empty_term_fails_closed() {
        let db = memory_pool().await;
        insert_post(&db, "post", "publish", "Anything", "").await;
        let store = SqliteStore::new(db.clone());
        let engine = SqliteQueryEngine::new(db);

        let outcome = run_search(&store, &engine, &issuer(), &signed(FormIdentity::General, ""), NOW)
            .await
            .unwrap();
        assert_eq!(outcome.mode, SearchMode::Scoped(FormIdentity::General));
        assert!(outcome.page.records.is_empty());
        assert!(outcome.scope.is_empty());
    }

    #[tokio::test]
    async fn test_default_search_covers_public_types() {
        let db = memory_pool().await;
        insert_post(&db, "page", "publish", "Hello page", "").await;
        insert_post(&db, "post", "publish", "Hello post", "").await;
        insert_post(&db, "custom_search_form", "publish", "Hello form", "").await;
        let store = SqliteStore::new(db.clone());
        let engine = SqliteQueryEngine::new(db);

        let outcome = run_search(&store, &engine, &issuer(), &request(Marker::Absent, None, "", "hello"), NOW)
            .await
            .unwrap();
        assert_eq!(outcome.mode, SearchMode::Default);
        assert_eq!(outcome.page.total, 2);
    }
}
