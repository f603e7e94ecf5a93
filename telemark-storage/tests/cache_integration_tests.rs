//! Integration tests wiring the storage caches to core identities, the way
//! the metadata layer uses them: series metadata cached under selectors,
//! run configurations cached under context identities.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use proptest::prelude::*;
use serde_json::json;
use telemark_core::{Context, Metric, Selector};
use telemark_storage::{CacheRegistry, IdentityCache, SeriesCache, StoreRegistry};
use telemark_test_utils::{arb_context_mapping, arb_metric_name};

#[derive(Debug, Clone, PartialEq)]
struct SeriesMeta {
    selector: Selector,
    point_count: u64,
}

fn series_backing() -> Vec<SeriesMeta> {
    let train = Arc::new(Context::new(&json!({"subset": "train"})).unwrap());
    let val = Arc::new(Context::new(&json!({"subset": "val"})).unwrap());
    vec![
        SeriesMeta {
            selector: Metric::new("loss", Arc::clone(&train)).selector(),
            point_count: 120,
        },
        SeriesMeta {
            selector: Metric::new("loss", val).selector(),
            point_count: 12,
        },
        SeriesMeta {
            selector: Metric::new("accuracy", train).selector(),
            point_count: 120,
        },
    ]
}

#[test]
fn selector_keyed_lookup_hits_across_context_instances() {
    let mut cache: SeriesCache<SeriesMeta> =
        SeriesCache::new(series_backing, |meta| meta.selector.clone());

    // A selector built from an independently constructed, deeply-equal
    // context addresses the same cached series.
    let rebuilt = Metric::new(
        "loss",
        Arc::new(Context::new(&json!({"subset": "train"})).unwrap()),
    )
    .selector();
    let hit = cache.get(&rebuilt).expect("series present");
    assert_eq!(hit.point_count, 120);

    let unknown = Metric::new(
        "loss",
        Arc::new(Context::new(&json!({"subset": "test"})).unwrap()),
    )
    .selector();
    assert!(cache.get(&unknown).is_none());
}

#[test]
fn identity_keyed_run_lookup() {
    let fetches = Arc::new(AtomicU64::new(0));
    let counter = Arc::clone(&fetches);

    let mut cache: IdentityCache<(u64, String)> = IdentityCache::new(
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
            let ctx = Context::new(&json!({"sweep": "lr-search", "fold": 3})).unwrap();
            vec![(ctx.idx(), "run-0042".to_string())]
        },
        |(idx, _)| *idx,
    );

    let lookup = Context::new(&json!({"fold": 3, "sweep": "lr-search"})).unwrap();
    assert_eq!(
        cache.get(&lookup.idx()).map(|(_, run)| run.as_str()),
        Some("run-0042")
    );
    cache.get(&lookup.idx());
    assert_eq!(fetches.load(Ordering::SeqCst), 1);
}

#[test]
fn registry_of_series_caches_invalidates_together() {
    let mut registry: CacheRegistry<SeriesMeta, Selector> = CacheRegistry::new();
    registry.init_cache("series", series_backing, |meta| meta.selector.clone());

    let selector = series_backing()[0].selector.clone();
    assert!(registry.cache_mut("series").unwrap().get(&selector).is_some());

    registry.invalidate_all();
    assert!(!registry.cache_mut("series").unwrap().is_populated());
    assert!(registry.cache_mut("series").unwrap().get(&selector).is_some());
}

#[test]
fn store_registry_opens_initialized_dirs_only() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry: StoreRegistry<String> = StoreRegistry::new();

    let opened = registry.open_with(dir.path(), |p| {
        telemark_storage::require_existing_dir(p)?;
        Ok(p.display().to_string())
    });
    assert!(opened.is_ok());

    let missing = dir.path().join("never-initialized");
    let err = registry.open_with(&missing, |p| {
        telemark_storage::require_existing_dir(p)?;
        Ok(p.display().to_string())
    });
    assert!(err.is_err());
    assert!(!registry.contains(&missing));
}

proptest! {
    #[test]
    fn prop_cached_selector_lookup_agrees_with_direct_equality(
        name in arb_metric_name(),
        mapping in arb_context_mapping(),
    ) {
        let context = Arc::new(Context::new(&mapping).unwrap());
        let stored = Metric::new(name.clone(), Arc::clone(&context)).selector();
        let backing = vec![(stored.clone(), 1_u64)];

        let mut cache: SeriesCache<(Selector, u64)> =
            SeriesCache::new(move || backing.clone(), |(sel, _)| sel.clone());

        // Rebuilding the context from the same value must address the same
        // cached entry.
        let lookup = Metric::new(name, Arc::new(Context::new(&mapping).unwrap())).selector();
        prop_assert!(cache.get(&lookup).is_some());
    }
}
