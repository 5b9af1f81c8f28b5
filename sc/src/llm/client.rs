//! LlmClient trait definition

use async_trait::async_trait;

use super::{GenerationRequest, LlmError};
use crate::credential::Credential;

/// Stateless text-generation client
///
/// Each call is independent; callers flatten any conversation history into
/// the request prompt. The credential travels with each call because the
/// user may supply or replace it mid-session.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send one generation request and return the generated text
    async fn generate(&self, credential: &Credential, request: GenerationRequest) -> Result<String, LlmError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::sync::Notify;
    use tracing::debug;

    /// Mock LLM client for unit tests
    pub struct MockLlmClient {
        responses: Mutex<VecDeque<Result<String, LlmError>>>,
        requests: Mutex<Vec<GenerationRequest>>,
        call_count: AtomicUsize,
        gate: Option<Arc<Notify>>,
    }

    impl MockLlmClient {
        pub fn new(responses: Vec<Result<String, LlmError>>) -> Self {
            debug!(response_count = %responses.len(), "MockLlmClient::new: called");
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
                call_count: AtomicUsize::new(0),
                gate: None,
            }
        }

        /// Hold every call until the gate is notified
        pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
            self.gate = Some(gate);
            self
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        pub fn requests(&self) -> Vec<GenerationRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        async fn generate(&self, _credential: &Credential, request: GenerationRequest) -> Result<String, LlmError> {
            debug!("MockLlmClient::generate: called");
            self.call_count.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(LlmError::InvalidResponse("No more mock responses".to_string())))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn request() -> GenerationRequest {
            GenerationRequest {
                prompt: "Test".to_string(),
                temperature: 0.7,
                max_output_tokens: 100,
            }
        }

        #[tokio::test]
        async fn test_mock_client_returns_responses() {
            let client = MockLlmClient::new(vec![Ok("Response 1".to_string()), Ok("Response 2".to_string())]);
            let key = Credential::new("k").unwrap();

            assert_eq!(client.generate(&key, request()).await.unwrap(), "Response 1");
            assert_eq!(client.generate(&key, request()).await.unwrap(), "Response 2");
            assert_eq!(client.call_count(), 2);
            assert_eq!(client.requests().len(), 2);
        }

        #[tokio::test]
        async fn test_mock_client_errors_when_exhausted() {
            let client = MockLlmClient::new(vec![]);
            let key = Credential::new("k").unwrap();
            assert!(client.generate(&key, request()).await.is_err());
        }
    }
}
