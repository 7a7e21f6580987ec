use prometheus::{Encoder, IntCounter, Opts, Registry, TextEncoder};
use std::sync::Arc;

#[derive(Clone)]
pub struct Metrics {
    pub searches_run: IntCounter,
    pub cases_fetched: IntCounter,
    pub cases_matched: IntCounter,
    registry: Arc<Registry>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

fn counter(name: &str, help: &str) -> IntCounter {
    IntCounter::with_opts(Opts::new(name, help)).unwrap_or_else(|e| panic!("{name}: {e}"))
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();
        let searches_run = counter("searches_run", "Number of searches executed");
        let cases_fetched = counter("cases_fetched", "Number of test cases fetched from TestRail");
        let cases_matched = counter("cases_matched", "Number of test cases matching a search");

        registry.register(Box::new(searches_run.clone())).ok();
        registry.register(Box::new(cases_fetched.clone())).ok();
        registry.register(Box::new(cases_matched.clone())).ok();

        Metrics {
            searches_run,
            cases_fetched,
            cases_matched,
            registry: Arc::new(registry),
        }
    }

    pub fn gather(&self) -> String {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        if encoder.encode(&metric_families, &mut buffer).is_err() {
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}
