use coderzhub::api::{ApiState, MockApiService};
use coderzhub::cache::{CacheState, MemorySessionCache, SessionCache};
use coderzhub::models::{IdentityError, RawUser};
use coderzhub::session::{SessionStatus, SessionStore};
use std::sync::Arc;
use std::time::Duration;

fn student(id: &str) -> RawUser {
    RawUser {
        id: Some(id.to_string()),
        username: "nova".to_string(),
        first_name: "Nova".to_string(),
        last_name: "Reyes".to_string(),
        email: "nova@example.com".to_string(),
        role: Some("student".to_string()),
        ..RawUser::default()
    }
}

struct Harness {
    api: Arc<MockApiService>,
    cache: Arc<MemorySessionCache>,
    store: Arc<SessionStore>,
}

fn harness(api: MockApiService, cache: MemorySessionCache) -> Harness {
    let api = Arc::new(api);
    let cache = Arc::new(cache);
    let store = Arc::new(SessionStore::new(
        api.clone() as ApiState,
        cache.clone() as CacheState,
    ));
    Harness { api, cache, store }
}

#[tokio::test]
async fn store_starts_unresolved() {
    let h = harness(MockApiService::new(), MemorySessionCache::new());

    let snapshot = h.store.read();
    assert_eq!(snapshot.status, SessionStatus::Unresolved);
    assert_eq!(snapshot.identity, None);
}

#[tokio::test]
async fn login_is_immediately_visible_without_any_network_call() {
    let h = harness(MockApiService::new(), MemorySessionCache::new());

    let identity = h.store.login(student("u-1")).unwrap();

    let snapshot = h.store.read();
    assert_eq!(snapshot.status, SessionStatus::Present);
    assert_eq!(snapshot.identity, Some(identity));
    assert_eq!(h.api.profile_fetches(), 0);

    // The transition also persisted the identity.
    assert!(h.cache.snapshot().is_some());
}

#[tokio::test]
async fn login_rejects_a_record_without_identifier_and_leaves_the_store_untouched() {
    let h = harness(MockApiService::new(), MemorySessionCache::new());

    let mut no_id = student("ignored");
    no_id.id = None;

    assert_eq!(h.store.login(no_id), Err(IdentityError::MissingId));
    assert_eq!(h.store.read().status, SessionStatus::Unresolved);
    assert!(h.cache.snapshot().is_none());
}

#[tokio::test]
async fn logout_clears_the_store_and_the_cache() {
    let h = harness(MockApiService::new(), MemorySessionCache::new());
    h.store.login(student("u-1")).unwrap();

    h.store.logout();

    let snapshot = h.store.read();
    assert_eq!(snapshot.status, SessionStatus::Absent);
    assert_eq!(snapshot.identity, None);
    assert!(h.cache.snapshot().is_none());
}

#[tokio::test]
async fn initialize_settles_present_on_a_confirmed_profile() {
    let h = harness(
        MockApiService::with_profile(student("u-1")),
        MemorySessionCache::new(),
    );

    h.store.initialize().await;

    let snapshot = h.store.read();
    assert_eq!(snapshot.status, SessionStatus::Present);
    assert_eq!(snapshot.identity.unwrap().id, "u-1");
    assert!(h.cache.snapshot().is_some());
}

#[tokio::test]
async fn initialize_settles_absent_when_the_backend_rejects_the_session() {
    // Seed a cached identity from a previous run; the rejected fetch must
    // clear it rather than trust it.
    let cache = MemorySessionCache::new();
    let h = harness(MockApiService::new(), cache);
    h.cache
        .save(&coderzhub::models::UserIdentity::from_raw(student("stale")).unwrap());

    h.store.initialize().await;

    assert_eq!(h.store.read().status, SessionStatus::Absent);
    assert!(h.cache.snapshot().is_none());
}

#[tokio::test]
async fn initialize_normalizes_the_fetched_identity() {
    let mut legacy = student("ignored");
    legacy.id = None;
    legacy.mongo_id = Some("665f1c2ab1".to_string());

    let h = harness(MockApiService::with_profile(legacy), MemorySessionCache::new());
    h.store.initialize().await;

    assert_eq!(h.store.read().identity.unwrap().id, "665f1c2ab1");
}

#[tokio::test]
async fn initialize_discards_corrupt_cache_content() {
    let h = harness(
        MockApiService::new(),
        MemorySessionCache::with_content("{not json"),
    );

    h.store.initialize().await;

    assert_eq!(h.store.read().status, SessionStatus::Absent);
    assert!(h.cache.snapshot().is_none());
}

#[tokio::test]
async fn initialize_discards_cached_records_without_identifier() {
    // Valid JSON, but normalization can find no identifier: same treatment
    // as corrupt content.
    let h = harness(
        MockApiService::new(),
        MemorySessionCache::with_content(r#"{"username":"ghost"}"#),
    );

    h.store.initialize().await;

    assert_eq!(h.store.read().status, SessionStatus::Absent);
    assert!(h.cache.snapshot().is_none());
}

#[tokio::test]
async fn concurrent_initialize_is_single_flight() {
    let api = MockApiService::with_profile(student("u-1"))
        .with_fetch_delay(Duration::from_millis(50));
    let h = harness(api, MemorySessionCache::new());

    let (a, b) = (h.store.clone(), h.store.clone());
    tokio::join!(
        async move { a.initialize().await },
        async move { b.initialize().await }
    );

    // Exactly one network fetch, and both callers observe the same settled
    // state afterwards.
    assert_eq!(h.api.profile_fetches(), 1);
    assert_eq!(h.store.read().status, SessionStatus::Present);
}

#[tokio::test]
async fn repeated_initialize_does_not_fetch_again() {
    let h = harness(
        MockApiService::with_profile(student("u-1")),
        MemorySessionCache::new(),
    );

    h.store.initialize().await;
    h.store.initialize().await;

    assert_eq!(h.api.profile_fetches(), 1);
}

#[tokio::test]
async fn explicit_logout_wins_over_an_in_flight_fetch() {
    // The fetch would succeed, but an explicit logout lands while it is in
    // flight: the stale network result must be discarded.
    let api = MockApiService::with_profile(student("u-1"))
        .with_fetch_delay(Duration::from_millis(80));
    let h = harness(api, MemorySessionCache::new());

    let store = h.store.clone();
    let boot = tokio::spawn(async move { store.initialize().await });

    tokio::time::sleep(Duration::from_millis(20)).await;
    h.store.logout();
    boot.await.unwrap();

    assert_eq!(h.store.read().status, SessionStatus::Absent);
    assert!(h.cache.snapshot().is_none());
}

#[tokio::test]
async fn explicit_login_wins_over_an_in_flight_fetch() {
    // The fetch would settle Absent (no server session), but the user logs
    // in mid-flight; the fresher explicit call must win.
    let api = MockApiService::new().with_fetch_delay(Duration::from_millis(80));
    let h = harness(api, MemorySessionCache::new());

    let store = h.store.clone();
    let boot = tokio::spawn(async move { store.initialize().await });

    tokio::time::sleep(Duration::from_millis(20)).await;
    h.store.login(student("fresh")).unwrap();
    boot.await.unwrap();

    let snapshot = h.store.read();
    assert_eq!(snapshot.status, SessionStatus::Present);
    assert_eq!(snapshot.identity.unwrap().id, "fresh");
    assert!(h.cache.snapshot().is_some());
}
