//! Invalidate-on-write resource cache over `ApiClient`.
//!
//! Reads are served from cache when present; successful mutations
//! invalidate (or refresh) the affected keys so subsequent reads reflect
//! the change. This is cache invalidation, not a consistency protocol:
//! concurrent sessions still race, last writer wins.
//!
//! Retry policy lives here and only here: a single retry, and only when
//! the first attempt was a transport failure (status 0). Server errors are
//! never retried.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use uuid::Uuid;

use cvforge_core::resume::JsonResume;

use crate::api::{ApiClient, ApiResponse};
use crate::types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Profile,
    Cv,
    CvList,
    CoverLetter,
    CoverLetterList,
    Credits,
}

/// Cache key: resource kind plus an optional instance id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub kind: ResourceKind,
    pub id: Option<Uuid>,
}

impl CacheKey {
    pub fn singleton(kind: ResourceKind) -> Self {
        Self { kind, id: None }
    }

    pub fn item(kind: ResourceKind, id: Uuid) -> Self {
        Self { kind, id: Some(id) }
    }
}

/// Values are stored as JSON so one map serves every resource type.
#[derive(Default)]
pub struct ResourceCache {
    entries: Mutex<HashMap<CacheKey, Value>>,
}

impl ResourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let entries = self.entries.lock().expect("cache poisoned");
        entries
            .get(key)
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
    }

    pub fn put<T: Serialize>(&self, key: CacheKey, value: &T) {
        if let Ok(value) = serde_json::to_value(value) {
            self.entries.lock().expect("cache poisoned").insert(key, value);
        }
    }

    pub fn invalidate(&self, key: &CacheKey) {
        self.entries.lock().expect("cache poisoned").remove(key);
    }

    /// Drops every entry of a kind: used for lists after any member write.
    pub fn invalidate_kind(&self, kind: ResourceKind) {
        self.entries
            .lock()
            .expect("cache poisoned")
            .retain(|k, _| k.kind != kind);
    }

    pub fn clear(&self) {
        self.entries.lock().expect("cache poisoned").clear();
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.lock().expect("cache poisoned").len()
    }
}

/// Retry stance for one logical request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RetryPolicy {
    /// One retry after a transport failure (status 0). Server errors are
    /// never retried.
    TransportOnce,
    /// Single attempt. Credit-consuming calls take this: a duplicate
    /// submission would burn a second credit.
    Never,
}

/// Runs a call under the given policy. Kept free of `CachingClient` so the
/// policy is testable against arbitrary call outcomes.
async fn send_with_policy<T, Fut>(policy: RetryPolicy, call: impl Fn() -> Fut) -> ApiResponse<T>
where
    Fut: Future<Output = ApiResponse<T>>,
{
    let first = call().await;
    if policy == RetryPolicy::TransportOnce && first.is_transport_failure() {
        return call().await;
    }
    first
}

/// `ApiClient` wrapped with the cache and the single-retry policy.
pub struct CachingClient {
    inner: ApiClient,
    cache: ResourceCache,
}

impl CachingClient {
    pub fn new(inner: ApiClient) -> Self {
        Self {
            inner,
            cache: ResourceCache::new(),
        }
    }

    pub fn cache(&self) -> &ResourceCache {
        &self.cache
    }

    // ── Profile ─────────────────────────────────────────────────────────

    pub async fn get_profile(&self) -> ApiResponse<Profile> {
        let key = CacheKey::singleton(ResourceKind::Profile);
        if let Some(profile) = self.cache.get::<Profile>(&key) {
            return ApiResponse::ok(profile, 200);
        }
        let response = send_with_policy(RetryPolicy::TransportOnce, || self.inner.get_profile()).await;
        if let Some(profile) = &response.data {
            self.cache.put(key, profile);
        }
        response
    }

    pub async fn update_profile(&self, resume: &JsonResume) -> ApiResponse<Profile> {
        let response = send_with_policy(RetryPolicy::TransportOnce, || self.inner.update_profile(resume)).await;
        if let Some(profile) = &response.data {
            self.cache.put(CacheKey::singleton(ResourceKind::Profile), profile);
        }
        response
    }

    pub async fn delete_profile(&self) -> ApiResponse<()> {
        let response = send_with_policy(RetryPolicy::TransportOnce, || self.inner.delete_profile()).await;
        if response.is_ok() {
            self.cache.invalidate(&CacheKey::singleton(ResourceKind::Profile));
        }
        response
    }

    // ── CVs ─────────────────────────────────────────────────────────────

    pub async fn list_cvs(&self, page: Option<i64>, page_size: Option<i64>) -> ApiResponse<CvList> {
        // Only the default page is cached; parameterized pages go through.
        let cacheable = page.is_none() && page_size.is_none();
        let key = CacheKey::singleton(ResourceKind::CvList);
        if cacheable {
            if let Some(list) = self.cache.get::<CvList>(&key) {
                return ApiResponse::ok(list, 200);
            }
        }
        let response = send_with_policy(RetryPolicy::TransportOnce, || self.inner.list_cvs(page, page_size)).await;
        if cacheable {
            if let Some(list) = &response.data {
                self.cache.put(key, list);
            }
        }
        response
    }

    pub async fn get_cv(&self, id: Uuid) -> ApiResponse<Cv> {
        let key = CacheKey::item(ResourceKind::Cv, id);
        if let Some(cv) = self.cache.get::<Cv>(&key) {
            return ApiResponse::ok(cv, 200);
        }
        let response = send_with_policy(RetryPolicy::TransportOnce, || self.inner.get_cv(id)).await;
        if let Some(cv) = &response.data {
            self.cache.put(key, cv);
        }
        response
    }

    pub async fn create_cv(&self, req: &CreateCvRequest) -> ApiResponse<Cv> {
        let response = send_with_policy(RetryPolicy::TransportOnce, || self.inner.create_cv(req)).await;
        if let Some(cv) = &response.data {
            self.cache.put(CacheKey::item(ResourceKind::Cv, cv.id), cv);
            self.cache.invalidate_kind(ResourceKind::CvList);
        }
        response
    }

    pub async fn update_cv(&self, id: Uuid, req: &UpdateCvRequest) -> ApiResponse<Cv> {
        let response = send_with_policy(RetryPolicy::TransportOnce, || self.inner.update_cv(id, req)).await;
        if let Some(cv) = &response.data {
            self.cache.put(CacheKey::item(ResourceKind::Cv, id), cv);
            self.cache.invalidate_kind(ResourceKind::CvList);
        }
        response
    }

    pub async fn delete_cv(&self, id: Uuid) -> ApiResponse<()> {
        let response = send_with_policy(RetryPolicy::TransportOnce, || self.inner.delete_cv(id)).await;
        if response.is_ok() {
            self.cache.invalidate(&CacheKey::item(ResourceKind::Cv, id));
            self.cache.invalidate_kind(ResourceKind::CvList);
        }
        response
    }

    pub async fn duplicate_cv(&self, id: Uuid) -> ApiResponse<Cv> {
        let response = send_with_policy(RetryPolicy::TransportOnce, || self.inner.duplicate_cv(id)).await;
        if let Some(cv) = &response.data {
            self.cache.put(CacheKey::item(ResourceKind::Cv, cv.id), cv);
            self.cache.invalidate_kind(ResourceKind::CvList);
        }
        response
    }

    // ── Cover letters ───────────────────────────────────────────────────

    pub async fn list_cover_letters(&self) -> ApiResponse<CoverLetterList> {
        let key = CacheKey::singleton(ResourceKind::CoverLetterList);
        if let Some(list) = self.cache.get::<CoverLetterList>(&key) {
            return ApiResponse::ok(list, 200);
        }
        let response = send_with_policy(RetryPolicy::TransportOnce, || self.inner.list_cover_letters()).await;
        if let Some(list) = &response.data {
            self.cache.put(key, list);
        }
        response
    }

    pub async fn get_cover_letter(&self, id: Uuid) -> ApiResponse<CoverLetter> {
        let key = CacheKey::item(ResourceKind::CoverLetter, id);
        if let Some(letter) = self.cache.get::<CoverLetter>(&key) {
            return ApiResponse::ok(letter, 200);
        }
        let response = send_with_policy(RetryPolicy::TransportOnce, || self.inner.get_cover_letter(id)).await;
        if let Some(letter) = &response.data {
            self.cache.put(key, letter);
        }
        response
    }

    pub async fn create_cover_letter(
        &self,
        req: &CreateCoverLetterRequest,
    ) -> ApiResponse<CoverLetter> {
        let response = send_with_policy(RetryPolicy::TransportOnce, || self.inner.create_cover_letter(req)).await;
        if let Some(letter) = &response.data {
            self.cache
                .put(CacheKey::item(ResourceKind::CoverLetter, letter.id), letter);
            self.cache.invalidate_kind(ResourceKind::CoverLetterList);
        }
        response
    }

    pub async fn update_cover_letter(
        &self,
        id: Uuid,
        req: &UpdateCoverLetterRequest,
    ) -> ApiResponse<CoverLetter> {
        let response = send_with_policy(RetryPolicy::TransportOnce, || self.inner.update_cover_letter(id, req)).await;
        if let Some(letter) = &response.data {
            self.cache
                .put(CacheKey::item(ResourceKind::CoverLetter, id), letter);
            self.cache.invalidate_kind(ResourceKind::CoverLetterList);
        }
        response
    }

    pub async fn delete_cover_letter(&self, id: Uuid) -> ApiResponse<()> {
        let response = send_with_policy(RetryPolicy::TransportOnce, || self.inner.delete_cover_letter(id)).await;
        if response.is_ok() {
            self.cache
                .invalidate(&CacheKey::item(ResourceKind::CoverLetter, id));
            self.cache.invalidate_kind(ResourceKind::CoverLetterList);
        }
        response
    }

    // ── Credits and AI ──────────────────────────────────────────────────

    pub async fn get_credits(&self) -> ApiResponse<Credits> {
        let key = CacheKey::singleton(ResourceKind::Credits);
        if let Some(credits) = self.cache.get::<Credits>(&key) {
            return ApiResponse::ok(credits, 200);
        }
        let response = send_with_policy(RetryPolicy::TransportOnce, || self.inner.get_credits()).await;
        if let Some(credits) = &response.data {
            self.cache.put(key, credits);
        }
        response
    }

    pub async fn analyze_job(&self, req: &AnalyzeJobRequest) -> ApiResponse<AnalyzeJobResponse> {
        send_with_policy(RetryPolicy::Never, || self.inner.analyze_job(req)).await
    }

    pub async fn generate_cv(&self, req: &GenerateCvRequest) -> ApiResponse<GenerateCvResponse> {
        let response = send_with_policy(RetryPolicy::Never, || self.inner.generate_cv(req)).await;
        if response.is_ok() {
            self.cache.invalidate_kind(ResourceKind::CvList);
            self.cache.invalidate(&CacheKey::singleton(ResourceKind::Credits));
        }
        response
    }

    pub async fn generate_cover_letter(
        &self,
        req: &GenerateCoverLetterRequest,
    ) -> ApiResponse<GenerateCoverLetterResponse> {
        let response =
            send_with_policy(RetryPolicy::Never, || self.inner.generate_cover_letter(req)).await;
        if response.is_ok() {
            self.cache.invalidate_kind(ResourceKind::CoverLetterList);
            self.cache.invalidate(&CacheKey::singleton(ResourceKind::Credits));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_transport_failure_is_retried_exactly_once() {
        let calls = AtomicUsize::new(0);
        let response: ApiResponse<u8> = send_with_policy(RetryPolicy::TransportOnce, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { ApiResponse::err("connection refused", 0) }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(response.is_transport_failure());
    }

    #[tokio::test]
    async fn test_retry_outcome_replaces_the_transport_failure() {
        let calls = AtomicUsize::new(0);
        let response = send_with_policy(RetryPolicy::TransportOnce, || {
            let attempt = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    ApiResponse::err("connection reset", 0)
                } else {
                    ApiResponse::ok(7u8, 200)
                }
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(response.data, Some(7));
    }

    #[tokio::test]
    async fn test_server_errors_are_never_retried() {
        let calls = AtomicUsize::new(0);
        let response: ApiResponse<u8> = send_with_policy(RetryPolicy::TransportOnce, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { ApiResponse::err("internal server error", 500) }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(response.status, 500);
    }

    #[tokio::test]
    async fn test_never_policy_makes_a_single_attempt_even_on_transport_failure() {
        let calls = AtomicUsize::new(0);
        let response: ApiResponse<u8> = send_with_policy(RetryPolicy::Never, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { ApiResponse::err("connection refused", 0) }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(response.is_transport_failure());
    }

    #[test]
    fn test_put_get_round_trip() {
        let cache = ResourceCache::new();
        let key = CacheKey::singleton(ResourceKind::Credits);
        let credits = Credits {
            user_id: "user_1".to_string(),
            free_generations_used: 1,
            free_generations_limit: 3,
            free_generations_remaining: 2,
            paid_credits: 0,
            total_generations: 1,
            remaining: 2,
        };
        cache.put(key.clone(), &credits);
        let cached: Credits = cache.get(&key).unwrap();
        assert_eq!(cached.remaining, 2);
    }

    #[test]
    fn test_invalidate_removes_only_target() {
        let cache = ResourceCache::new();
        let a = CacheKey::item(ResourceKind::Cv, Uuid::new_v4());
        let b = CacheKey::item(ResourceKind::Cv, Uuid::new_v4());
        cache.put(a.clone(), &1u8);
        cache.put(b.clone(), &2u8);
        cache.invalidate(&a);
        assert!(cache.get::<u8>(&a).is_none());
        assert_eq!(cache.get::<u8>(&b), Some(2));
    }

    #[test]
    fn test_invalidate_kind_spares_other_kinds() {
        let cache = ResourceCache::new();
        cache.put(CacheKey::singleton(ResourceKind::CvList), &1u8);
        cache.put(CacheKey::item(ResourceKind::Cv, Uuid::new_v4()), &2u8);
        cache.invalidate_kind(ResourceKind::CvList);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_mismatched_type_reads_as_miss() {
        let cache = ResourceCache::new();
        let key = CacheKey::singleton(ResourceKind::Profile);
        cache.put(key.clone(), &"not a profile");
        assert!(cache.get::<Profile>(&key).is_none());
    }
}
