use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use appbase_cache::{
    BoundArgs, CacheConfig, CacheError, CacheValue, CallArgs, Json, KeyValueCache, MemoryStore,
    Signature, StoreCall, ValueKind,
};
use serde_json::json;

const DEFAULT_TTL: Duration = Duration::from_secs(600);

fn memory_cache() -> (KeyValueCache, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (KeyValueCache::from_shared(store.clone(), DEFAULT_TTL), store)
}

#[allow(dead_code)]
#[derive(Debug)]
enum ServiceError {
    Cache(CacheError),
    Upstream(String),
}

impl From<CacheError> for ServiceError {
    fn from(err: CacheError) -> Self {
        ServiceError::Cache(err)
    }
}

#[tokio::test]
async fn test_memoized_call_ignores_listed_params() {
    let (cache, store) = memory_cache();
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = calls.clone();
    let f = cache.memoize().ignore_params(["b"]).wrap(
        Signature::new("f")
            .required("a")
            .optional("b", 2)
            .optional("c", 3),
        move |args: BoundArgs| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                let a: i64 = args.get("a")?;
                let b: i64 = args.get("b")?;
                let c: i64 = args.get("c")?;
                Ok::<_, CacheError>(json!({"sum": a + b + c}))
            }
        },
    );

    let first = f.call(CallArgs::new().arg(1)).await.unwrap();
    assert_eq!(first, CacheValue::Structured(json!({"sum": 6})));
    assert!(store.contains_key("f:a=1:c=3"));

    // `b` is not part of the key, so this is a hit on the entry above.
    let second = f.call(CallArgs::new().arg(1).kwarg("b", 100)).await.unwrap();
    assert_eq!(second, CacheValue::Structured(json!({"sum": 6})));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let other = f.call(CallArgs::new().arg(1).kwarg("c", 10)).await.unwrap();
    assert_eq!(other, CacheValue::Structured(json!({"sum": 13})));
    assert!(store.contains_key("f:a=1:c=10"));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_memoized_receiver_is_not_in_key() {
    let (cache, _) = memory_cache();

    let method = cache.memoize().expected(ValueKind::Int).wrap(
        Signature::new("count_items").receiver().required("bucket"),
        |args: BoundArgs| async move {
            let bucket: String = args.get("bucket")?;
            Ok::<_, CacheError>(bucket.len() as i64)
        },
    );

    let args = CallArgs::new().arg("service").arg("fruit");
    assert_eq!(method.key_for(&args).unwrap(), "count_items:bucket=fruit");
    assert_eq!(method.call(args).await.unwrap(), CacheValue::Int(5));
}

#[tokio::test]
async fn test_memoized_binding_error_skips_store() {
    let (cache, store) = memory_cache();
    let f = cache.memoize().wrap(
        Signature::new("f").required("a"),
        |_: BoundArgs| async move { Ok::<_, CacheError>(json!({})) },
    );

    let result = f.call(CallArgs::new().kwarg("z", 1)).await;

    assert!(matches!(result, Err(CacheError::Binding { .. })));
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn test_get_or_compute_override_refreshes() {
    let (cache, _) = memory_cache();
    cache.set("greeting", "hello", None).await.unwrap();

    let cached = cache
        .get_or_compute(
            "greeting",
            || async { Ok::<_, CacheError>("ignored") },
            false,
            None,
            ValueKind::Text,
        )
        .await
        .unwrap();
    assert_eq!(cached, CacheValue::Text("hello".into()));

    let refreshed = cache
        .get_or_compute(
            "greeting",
            || async { Ok::<_, CacheError>("bonjour") },
            true,
            None,
            ValueKind::Text,
        )
        .await
        .unwrap();
    assert_eq!(refreshed, CacheValue::Text("bonjour".into()));
    assert_eq!(
        cache.get("greeting", ValueKind::Text).await.unwrap(),
        Some(CacheValue::Text("bonjour".into()))
    );
}

#[tokio::test]
async fn test_supplier_error_propagates_and_stores_nothing() {
    let (cache, store) = memory_cache();

    let result = cache
        .get_or_compute(
            "report",
            || async { Err::<CacheValue, _>(ServiceError::Upstream("timeout".into())) },
            false,
            None,
            ValueKind::Map,
        )
        .await;

    assert!(matches!(result, Err(ServiceError::Upstream(reason)) if reason == "timeout"));
    assert!(!store.contains_key("report"));
}

#[tokio::test]
async fn test_unsupported_values_never_reach_store() {
    let (cache, store) = memory_cache();

    let flag = cache.set("flag", json!(true), None).await;
    let nothing = cache.set("nothing", Json(()), None).await;

    assert!(matches!(flag, Err(CacheError::UnsupportedType(_))));
    assert!(matches!(nothing, Err(CacheError::UnsupportedType(_))));
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn test_set_entries_expire_only_with_explicit_ttl() {
    let (cache, store) = memory_cache();
    let tags: HashSet<String> = ["a", "b"].into_iter().map(String::from).collect();

    cache.set("tags:forever", tags.clone(), None).await.unwrap();
    cache
        .set("tags:short", tags.clone(), Some(Duration::from_secs(30)))
        .await
        .unwrap();
    cache.set("scalar", 42, None).await.unwrap();

    assert_eq!(store.ttl("tags:forever"), None);
    assert!(store.ttl("tags:short").is_some());
    assert!(store.ttl("scalar").is_some());
    assert_eq!(
        cache.get("tags:short", ValueKind::Set).await.unwrap(),
        Some(CacheValue::Set(tags))
    );
}

#[tokio::test]
async fn test_prefix_lookup_across_entry_kinds() {
    let (cache, store) = memory_cache();
    cache.set("session:1", json!({"user": 1}), None).await.unwrap();
    cache
        .set("session:roles", HashSet::from(["admin".to_string()]), None)
        .await
        .unwrap();
    cache.set("sessions", 3, None).await.unwrap();
    cache.set("other", 1.5, None).await.unwrap();
    store.clear_calls();

    let keys = cache.keys_with_prefix("session:").await.unwrap();

    assert_eq!(
        keys,
        HashSet::from(["session:1".to_string(), "session:roles".to_string()])
    );
    assert_eq!(
        store.calls(),
        vec![StoreCall::Scan {
            pattern: "session:*".to_string()
        }]
    );
}

#[tokio::test]
#[ignore = "requires Redis"]
async fn test_redis_round_trip() {
    let cache = KeyValueCache::connect(&CacheConfig::from_env()).unwrap();
    let prefix = format!("appbase-test:{}:", std::process::id());

    cache
        .set(&format!("{prefix}user"), json!({"name": "Ada"}), Some(Duration::from_secs(60)))
        .await
        .unwrap();
    cache
        .set(
            &format!("{prefix}tags"),
            HashSet::from(["x".to_string()]),
            Some(Duration::from_secs(60)),
        )
        .await
        .unwrap();

    assert_eq!(
        cache.get(&format!("{prefix}user"), ValueKind::Map).await.unwrap(),
        Some(CacheValue::Structured(json!({"name": "Ada"})))
    );
    assert_eq!(cache.keys_with_prefix(&prefix).await.unwrap().len(), 2);
}
