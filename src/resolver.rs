//! Priority-ordered lookup over the URL-based sources

use crate::sources::SdsSource;
use crate::types::SdsLink;
use std::sync::Arc;
use tracing::debug;

/// Asks each source in turn and stops at the first hit
#[derive(Clone)]
pub struct FallbackResolver {
    sources: Vec<Arc<dyn SdsSource>>,
}

impl FallbackResolver {
    /// Create a resolver over `sources`, tried in the given order
    pub fn new(sources: Vec<Arc<dyn SdsSource>>) -> Self {
        Self { sources }
    }

    /// Names of the sources in the order they are tried
    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// First link any source reports for `cas_nr`
    pub async fn resolve(&self, cas_nr: &str) -> Option<SdsLink> {
        for source in &self.sources {
            if let Some(link) = source.find(cas_nr).await {
                return Some(link);
            }
        }
        debug!(cas_nr, "No URL-based source has an SDS");
        None
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubSource {
        name: &'static str,
        hit: bool,
        calls: AtomicUsize,
    }

    impl StubSource {
        fn new(name: &'static str, hit: bool) -> Arc<Self> {
            Arc::new(Self {
                name,
                hit,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SdsSource for StubSource {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn lookup(&self, cas_nr: &str) -> Result<SdsLink, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.hit {
                Ok(SdsLink::new(self.name, format!("https://{}/{cas_nr}.pdf", self.name)))
            } else {
                Err(LookupError::NoMatch {
                    cas_nr: cas_nr.to_string(),
                })
            }
        }
    }

    fn resolver(stubs: &[Arc<StubSource>]) -> FallbackResolver {
        FallbackResolver::new(
            stubs
                .iter()
                .map(|s| Arc::clone(s) as Arc<dyn SdsSource>)
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_first_source_hit_skips_the_rest() {
        let stubs = [
            StubSource::new("a", true),
            StubSource::new("b", true),
            StubSource::new("c", true),
            StubSource::new("d", true),
        ];

        let link = resolver(&stubs).resolve("64-19-7").await.unwrap();

        assert_eq!(link.source, "a");
        assert_eq!(stubs[0].calls(), 1);
        assert_eq!(stubs[1].calls(), 0);
        assert_eq!(stubs[2].calls(), 0);
        assert_eq!(stubs[3].calls(), 0);
    }

    #[tokio::test]
    async fn test_falls_through_in_order() {
        let stubs = [
            StubSource::new("a", false),
            StubSource::new("b", false),
            StubSource::new("c", true),
            StubSource::new("d", true),
        ];

        let link = resolver(&stubs).resolve("623-51-8").await.unwrap();

        assert_eq!(link.source, "c");
        assert_eq!(
            stubs.iter().map(|s| s.calls()).collect::<Vec<_>>(),
            [1, 1, 1, 0]
        );
    }

    #[tokio::test]
    async fn test_no_hit_asks_every_source_once() {
        let stubs = [StubSource::new("a", false), StubSource::new("b", false)];

        assert!(resolver(&stubs).resolve("00000-00-0").await.is_none());
        assert!(stubs.iter().all(|s| s.calls() == 1));
    }

    #[test]
    fn test_source_names_keep_order() {
        let stubs = [StubSource::new("a", false), StubSource::new("b", false)];
        assert_eq!(resolver(&stubs).source_names(), ["a", "b"]);
    }
}
