//! Integration tests for the fallback selector, including the full
//! stack of fallback wrapper over a PAC-backed delegate

use pac_selector::core::proxy::{
    no_proxy_chain, Endpoint, EvaluationError, FallbackProxySelector, PacEvaluationEngine,
    PacProxySelector, ProxyChain, ProxyDescriptor, ProxyError, ProxySelector,
    ProxySelectorConfig,
};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use url::Url;

struct ListDelegate(ProxyChain);

impl ProxySelector for ListDelegate {
    fn select(&self, _uri: &Url) -> ProxyChain {
        self.0.clone()
    }

    fn connect_failed(&self, _uri: &Url, _endpoint: &Endpoint, _cause: &ProxyError) {}
}

struct StubEngine(String);

impl PacEvaluationEngine for StubEngine {
    fn evaluate(&self, _url: &str, _host: &str) -> Result<Option<String>, EvaluationError> {
        Ok(Some(self.0.clone()))
    }
}

fn p1() -> Endpoint {
    Endpoint::new("proxy1.unit-test.invalid", 8080)
}

fn p2() -> Endpoint {
    Endpoint::new("proxy2.unit-test.invalid", 8080)
}

fn uri() -> Url {
    Url::parse("http://host1.unit-test.invalid/").unwrap()
}

fn io_error() -> ProxyError {
    ProxyError::connect("connection refused")
}

fn selector() -> FallbackProxySelector {
    FallbackProxySelector::new(Box::new(ListDelegate(vec![
        ProxyDescriptor::http(p1()),
        ProxyDescriptor::http(p2()),
    ])))
}

// ============================================================================
// Contract of the wrapper over a plain list delegate
// ============================================================================

#[test]
fn test_list_passes_through() {
    let selector = selector();
    let result = selector.select(&uri());
    assert_eq!(result.len(), 2);
    assert_eq!(result[0].endpoint(), Some(&p1()));
    assert_eq!(result[1].endpoint(), Some(&p2()));
}

#[test]
fn test_failed_proxy_is_skipped() {
    let selector = selector();
    selector.connect_failed(&uri(), &p1(), &io_error());

    let result = selector.select(&uri());
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].endpoint(), Some(&p2()));
}

#[test]
fn test_failed_proxy_retried_after_window() {
    let selector = selector();
    selector.set_retry_window(Duration::from_millis(100));
    selector.connect_failed(&uri(), &p1(), &io_error());

    let result = selector.select(&uri());
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].endpoint(), Some(&p2()));

    thread::sleep(Duration::from_millis(200));
    let result = selector.select(&uri());
    assert_eq!(result.len(), 2);
    assert_eq!(result[0].endpoint(), Some(&p1()));
    assert_eq!(result[1].endpoint(), Some(&p2()));
}

#[test]
fn test_all_failed_falls_back_to_direct_then_recovers() {
    let selector = selector();
    selector.set_retry_window(Duration::from_millis(100));

    selector.connect_failed(&uri(), &p1(), &io_error());
    let result = selector.select(&uri());
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].endpoint(), Some(&p2()));

    selector.connect_failed(&uri(), &p2(), &io_error());
    let result = selector.select(&uri());
    assert_eq!(result, no_proxy_chain());

    thread::sleep(Duration::from_millis(200));
    let result = selector.select(&uri());
    assert_eq!(result.len(), 2);
    assert_eq!(result[0].endpoint(), Some(&p1()));
    assert_eq!(result[1].endpoint(), Some(&p2()));
}

#[test]
fn test_select_never_returns_empty() {
    let empty = FallbackProxySelector::new(Box::new(ListDelegate(ProxyChain::new())));
    assert_eq!(empty.select(&uri()), no_proxy_chain());
}

#[test]
fn test_default_retry_window_is_ten_minutes() {
    let selector = selector();
    assert_eq!(selector.retry_window(), Duration::from_secs(600));
}

// ============================================================================
// Full stack: fallback wrapper over the PAC selector
// ============================================================================

fn full_stack(raw: &str) -> (FallbackProxySelector, Arc<PacProxySelector>) {
    let pac = Arc::new(PacProxySelector::new(Ok(
        Box::new(StubEngine(raw.to_string())) as Box<dyn PacEvaluationEngine>,
    )));

    struct Shared(Arc<PacProxySelector>);
    impl ProxySelector for Shared {
        fn select(&self, uri: &Url) -> ProxyChain {
            self.0.select(uri)
        }
        fn connect_failed(&self, uri: &Url, endpoint: &Endpoint, cause: &ProxyError) {
            self.0.connect_failed(uri, endpoint, cause);
        }
    }

    let fallback = FallbackProxySelector::new(Box::new(Shared(Arc::clone(&pac))));
    (fallback, pac)
}

#[test]
fn test_stack_filters_pac_candidates() {
    let (fallback, _pac) = full_stack(
        "PROXY proxy1.unit-test.invalid:8080; PROXY proxy2.unit-test.invalid:8080",
    );

    assert_eq!(fallback.select(&uri()).len(), 2);

    fallback.connect_failed(&uri(), &p1(), &io_error());
    let result = fallback.select(&uri());
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].endpoint(), Some(&p2()));

    fallback.connect_failed(&uri(), &p2(), &io_error());
    assert_eq!(fallback.select(&uri()), no_proxy_chain());
}

#[test]
fn test_stack_disabled_selector_yields_direct() {
    let (fallback, pac) = full_stack("PROXY proxy1.unit-test.invalid:8080");

    pac.set_enabled(false);
    assert_eq!(fallback.select(&uri()), no_proxy_chain());

    pac.set_enabled(true);
    let result = fallback.select(&uri());
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].endpoint(), Some(&p1()));
}

#[test]
fn test_stack_direct_result_never_excluded() {
    let (fallback, _pac) = full_stack("DIRECT");
    // Even with failure records for unrelated proxies, direct survives
    fallback.connect_failed(&uri(), &p1(), &io_error());
    assert_eq!(fallback.select(&uri()), vec![ProxyDescriptor::direct()]);
}

#[test]
fn test_stack_config_wires_window_and_port() {
    let config = ProxySelectorConfig {
        retry_window_secs: 1,
        default_proxy_port: 9999,
        ..Default::default()
    };
    config.validate().unwrap();

    let pac = PacProxySelector::with_config(
        Ok(Box::new(StubEngine("PROXY proxy1.unit-test.invalid".to_string()))
            as Box<dyn PacEvaluationEngine>),
        &config,
    );
    let fallback = FallbackProxySelector::with_config(Box::new(pac), &config);

    assert_eq!(fallback.retry_window(), Duration::from_secs(1));
    let result = fallback.select(&uri());
    assert_eq!(result[0].endpoint().unwrap().port, 9999);
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_mixed_operations() {
    let selector = Arc::new(selector());
    let mut handles = vec![];

    for worker in 0..10 {
        let selector = Arc::clone(&selector);
        handles.push(thread::spawn(move || {
            for round in 0..30 {
                match (worker + round) % 3 {
                    0 => selector.connect_failed(&uri(), &p1(), &io_error()),
                    1 => selector.connect_failed(&uri(), &p2(), &io_error()),
                    _ => {
                        let chain = selector.select(&uri());
                        assert!(!chain.is_empty());
                        assert!(chain.len() <= 2);
                    }
                }
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(selector.select(&uri()), no_proxy_chain());
    assert_eq!(selector.tracked_failures(), 2);
}

#[test]
fn test_concurrent_window_updates() {
    let selector = Arc::new(selector());
    let mut handles = vec![];

    for worker in 0..4u64 {
        let selector = Arc::clone(&selector);
        handles.push(thread::spawn(move || {
            for round in 1..20u64 {
                selector.set_retry_window(Duration::from_millis(worker * 100 + round));
                let _ = selector.retry_window();
                let _ = selector.select(&uri());
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    // No panics and a coherent final window
    assert!(selector.retry_window() > Duration::ZERO);
}
