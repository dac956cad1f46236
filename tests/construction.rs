//! Construction boundary tests driven through the public `WorkCacheBuilder`
//! surface, mirroring the option bounds from the construction table.

use taskcache::WorkCache;

#[test]
fn defaults_build_successfully() {
    let cache = WorkCache::<i32, _>::builder().build();
    assert!(cache.is_ok());
}

#[test]
fn rejects_max_ttl_below_minimum() {
    let result = WorkCache::<i32, _>::builder().with_max_ttl(59).build();
    assert!(result.is_err());
}

#[test]
fn rejects_max_ttl_above_maximum() {
    let result = WorkCache::<i32, _>::builder().with_max_ttl(86_401).build();
    assert!(result.is_err());
}

#[test]
fn rejects_max_size_below_minimum() {
    let result = WorkCache::<i32, _>::builder().with_max_size(2).build();
    assert!(result.is_err());
}

#[test]
fn rejects_max_size_above_maximum() {
    let result = WorkCache::<i32, _>::builder().with_max_size(1001).build();
    assert!(result.is_err());
}

#[test]
fn rejects_time_tick_below_minimum() {
    let result = WorkCache::<i32, _>::builder().with_time_tick(0).build();
    assert!(result.is_err());
}

#[test]
fn rejects_time_tick_above_maximum() {
    let result = WorkCache::<i32, _>::builder().with_time_tick(121).build();
    assert!(result.is_err());
}

#[test]
fn rejects_async_configuration_where_max_size_is_too_small() {
    let result = WorkCache::<i32, _>::builder()
        .with_max_size(10)
        .with_enable_async_processing(6)
        .build();
    assert!(result.is_err());
}

#[test]
fn accepts_a_valid_async_configuration() {
    let result = WorkCache::<i32, _>::builder()
        .with_max_size(10)
        .with_enable_async_processing(4)
        .build();
    assert!(result.is_ok());
}

#[test]
fn single_async_thread_stays_in_sync_mode() {
    // async_threads = 1 means sync mode, so the max_size/async_threads
    // relation is never checked and construction succeeds.
    let result = WorkCache::<i32, _>::builder().with_enable_async_processing(1).build();
    assert!(result.is_ok());
}
