//! In-process implementation of the URL repository.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::codec::Codec;
use crate::domain::errors::RepositoryError;
use crate::domain::repositories::UrlRepository;

/// Mutable state guarded by the repository lock.
///
/// `slots[i]` holds the URL assigned to identifier `i`, so
/// `slots.len()` doubles as the next identifier to hand out.
#[derive(Debug, Default)]
struct State {
    slots: Vec<String>,
    codes: BTreeMap<String, String>,
}

/// In-memory repository with a dense identifier space.
///
/// Every `save_url` runs dedup lookup, capacity check, encoding, slot write
/// and dedup insert inside one critical section, so a concurrent reader
/// either sees a fully stored URL or none at all. State is only mutated
/// after the last fallible step, so a poisoned lock still guards a
/// consistent state and is recovered.
pub struct InMemoryUrlRepository<C: Codec> {
    codec: Arc<C>,
    capacity: u64,
    state: Mutex<State>,
}

impl<C: Codec> InMemoryUrlRepository<C> {
    /// Creates an empty repository holding at most `max_size` URLs.
    ///
    /// The effective capacity is also bounded by what the codec can represent.
    pub fn new(codec: Arc<C>, max_size: u64) -> Self {
        let capacity = max_size.min(codec.capacity());

        Self {
            codec,
            capacity,
            state: Mutex::new(State::default()),
        }
    }

    /// Maximum number of URLs this repository will store.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Number of identifiers assigned so far.
    pub fn len(&self) -> u64 {
        self.lock().slots.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl<C: Codec + 'static> UrlRepository for InMemoryUrlRepository<C> {
    async fn save_url(&self, original_url: &str) -> Result<String, RepositoryError> {
        if original_url.is_empty() {
            return Err(RepositoryError::EmptyUrl);
        }

        let mut state = self.lock();

        if let Some(code) = state.codes.get(original_url) {
            tracing::debug!(code = %code, "url already stored");
            return Ok(code.clone());
        }

        let id = state.slots.len() as u64;
        if id >= self.capacity {
            tracing::warn!(capacity = self.capacity, "in-memory repository is full");
            return Err(RepositoryError::RepositoryIsFull);
        }

        let code = self.codec.encode(id)?;

        state.slots.push(original_url.to_owned());
        state.codes.insert(original_url.to_owned(), code.clone());

        tracing::debug!(id, code = %code, "url stored");

        Ok(code)
    }

    async fn get_url(&self, code: &str) -> Result<String, RepositoryError> {
        let id = self.codec.decode(code)?;

        if id >= self.capacity {
            return Err(RepositoryError::UrlNotFound);
        }

        let index = usize::try_from(id).map_err(|_| RepositoryError::UrlNotFound)?;

        self.lock()
            .slots
            .get(index)
            .filter(|url| !url.is_empty())
            .cloned()
            .ok_or(RepositoryError::UrlNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::codec::MockCodec;
    use crate::domain::errors::CodecError;
    use crate::utils::code_generator::AlphabetCodec;
    use std::collections::HashSet;

    fn mock_codec() -> MockCodec {
        let mut codec = MockCodec::new();
        codec.expect_capacity().returning(|| u64::MAX);
        codec
    }

    fn abc_repo(max_size: u64) -> InMemoryUrlRepository<AlphabetCodec> {
        let codec = AlphabetCodec::new("abc", 5).unwrap();
        InMemoryUrlRepository::new(Arc::new(codec), max_size)
    }

    #[tokio::test]
    async fn test_save_url_assigns_sequential_ids() {
        let mut codec = mock_codec();
        codec
            .expect_encode()
            .withf(|id| *id == 0)
            .times(1)
            .returning(|_| Ok("shortenedURL".to_string()));
        codec
            .expect_encode()
            .withf(|id| *id == 1)
            .times(1)
            .returning(|_| Ok("shortenedURL2".to_string()));

        let repo = InMemoryUrlRepository::new(Arc::new(codec), 10);

        let first = repo.save_url("http://example.com").await.unwrap();
        let second = repo.save_url("http://example.com/2").await.unwrap();

        assert_eq!(first, "shortenedURL");
        assert_eq!(second, "shortenedURL2");
        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn test_save_url_deduplicates() {
        let mut codec = mock_codec();
        codec
            .expect_encode()
            .times(1)
            .returning(|_| Ok("shortenedURL".to_string()));

        let repo = InMemoryUrlRepository::new(Arc::new(codec), 10);

        let first = repo.save_url("http://example.com").await.unwrap();
        let again = repo.save_url("http://example.com").await.unwrap();

        assert_eq!(first, again);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_save_url_repository_full() {
        let mut codec = mock_codec();
        codec
            .expect_encode()
            .times(1)
            .returning(|_| Ok("shortenedURL".to_string()));

        let repo = InMemoryUrlRepository::new(Arc::new(codec), 1);

        repo.save_url("http://example.com").await.unwrap();
        let err = repo.save_url("http://example.com/2").await.unwrap_err();

        assert!(matches!(err, RepositoryError::RepositoryIsFull));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_save_url_full_still_returns_existing_code() {
        let repo = abc_repo(1);

        let code = repo.save_url("http://example.com").await.unwrap();
        assert!(repo.save_url("http://example.com/2").await.is_err());

        assert_eq!(repo.save_url("http://example.com").await.unwrap(), code);
    }

    #[tokio::test]
    async fn test_save_url_encode_error_leaves_state_untouched() {
        let mut codec = mock_codec();
        codec
            .expect_encode()
            .times(1)
            .returning(|_| Err(CodecError::NumberOverflow));

        let repo = InMemoryUrlRepository::new(Arc::new(codec), 10);

        let err = repo.save_url("http://example.com").await.unwrap_err();

        assert!(matches!(
            err,
            RepositoryError::Codec(CodecError::NumberOverflow)
        ));
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_save_url_rejects_empty_url() {
        let mut codec = mock_codec();
        codec.expect_encode().never();

        let repo = InMemoryUrlRepository::new(Arc::new(codec), 10);

        let err = repo.save_url("").await.unwrap_err();

        assert!(matches!(err, RepositoryError::EmptyUrl));
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_capacity_is_bounded_by_codec() {
        let repo = abc_repo(1_000);
        assert_eq!(repo.capacity(), 243);

        for i in 0..243 {
            repo.save_url(&format!("https://example.com/{i}"))
                .await
                .unwrap();
        }

        let err = repo.save_url("https://example.com/overflow").await;
        assert!(matches!(err, Err(RepositoryError::RepositoryIsFull)));
    }

    #[tokio::test]
    async fn test_get_url_round_trip() {
        let repo = abc_repo(10);
        let url = "https://example.com/path?q=ünïcode&x=1#frag";

        let code = repo.save_url(url).await.unwrap();

        assert_eq!(repo.get_url(&code).await.unwrap(), url);
    }

    #[tokio::test]
    async fn test_get_url_decode_error() {
        let mut codec = mock_codec();
        codec
            .expect_decode()
            .withf(|code: &str| code == "shortenedURL")
            .times(1)
            .returning(|_| Err(CodecError::InvalidCharacter('U')));

        let repo = InMemoryUrlRepository::new(Arc::new(codec), 10);

        let err = repo.get_url("shortenedURL").await.unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::Codec(CodecError::InvalidCharacter('U'))
        ));
    }

    #[tokio::test]
    async fn test_get_url_not_found() {
        let mut codec = mock_codec();
        codec.expect_decode().times(1).returning(|_| Ok(0));

        let repo = InMemoryUrlRepository::new(Arc::new(codec), 10);

        let err = repo.get_url("shortenedURL").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_get_url_beyond_capacity_is_not_found() {
        let repo = abc_repo(2);

        let err = repo.get_url("ccccc").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_get_url_unassigned_code_is_not_found() {
        let repo = abc_repo(10);
        repo.save_url("https://example.com").await.unwrap();

        let err = repo.get_url("aaaab").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_saves_get_distinct_codes() {
        let repo = Arc::new(abc_repo(243));
        let mut handles = Vec::new();

        for i in 0..200 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                let url = format!("https://example.com/{i}");
                let code = repo.save_url(&url).await.unwrap();
                (url, code)
            }));
        }

        let mut codes = HashSet::new();
        for handle in handles {
            let (url, code) = handle.await.unwrap();
            assert_eq!(repo.get_url(&code).await.unwrap(), url);
            codes.insert(code);
        }

        assert_eq!(codes.len(), 200);
        assert_eq!(repo.len(), 200);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_duplicate_saves_consume_one_id() {
        let repo = Arc::new(abc_repo(10));
        let mut handles = Vec::new();

        for _ in 0..50 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.save_url("https://example.com").await.unwrap()
            }));
        }

        let mut codes = HashSet::new();
        for handle in handles {
            codes.insert(handle.await.unwrap());
        }

        assert_eq!(codes.len(), 1);
        assert_eq!(repo.len(), 1);
    }
}
