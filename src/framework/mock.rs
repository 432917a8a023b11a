//! Test doubles for store clients.
//!
//! `MockClient<T>` hands out a real `ResourceClient<T>` whose requests are answered from
//! a queue of expectations instead of a running actor. Use it to isolate the code under
//! test from a store and to inject failures that are hard to provoke with real state.
//!
//! ## Patterns
//!
//! - **Pure mock**: wrap `mock.client()` in a typed client and assert on its results.
//! - **Actor with mocked dependencies**: run a real actor (or the transaction coordinator)
//!   with one collaborator mocked. `tests/coordinator_rollback_test.rs` uses this to make
//!   loyalty accrual fail half way through a payment.
//! - **Full system**: see `tests/integration_test.rs`.
//!
//! ```rust,ignore
//! let mut customers = MockClient::<Customer>::new();
//! customers.expect_get(CustomerId(1)).return_ok(Some(customer));
//! customers.expect_action(CustomerId(1)).return_err(FrameworkError::ActorClosed);
//!
//! let client = CustomerClient::new(customers.client());
//! // ... exercise code that uses `client` ...
//! customers.verify();
//! ```
//!
//! Requests are matched strictly in order. A request that does not match the next
//! expectation panics the mock task, which the caller observes as
//! `FrameworkError::ActorDropped`.

use super::client::ResourceClient;
use super::entity::ActorEntity;
use super::error::FrameworkError;
use super::message::ResourceRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

enum Expectation<T: ActorEntity> {
    Get {
        response: Result<Option<T>, FrameworkError>,
    },
    Find {
        response: Result<Vec<T>, FrameworkError>,
    },
    Create {
        response: Result<T::Id, FrameworkError>,
    },
    Delete {
        response: Result<(), FrameworkError>,
    },
    Action {
        response: Result<T::ActionResult, FrameworkError>,
    },
    Batch {
        response: Result<Vec<T::ActionResult>, FrameworkError>,
    },
    Restore {
        response: Result<(), FrameworkError>,
    },
}

type Queue<T> = Arc<Mutex<VecDeque<(Option<<T as ActorEntity>::Id>, Expectation<T>)>>>;

/// Answers requests from a FIFO of canned responses.
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Queue<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let queue = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let next = queue.lock().unwrap().pop_front();
                let Some((expected_id, expectation)) = next else {
                    panic!("Unexpected request: no expectations left");
                };

                match (request, expectation) {
                    (ResourceRequest::Get { id, respond_to }, Expectation::Get { response }) => {
                        check_id::<T>(&expected_id, &id);
                        let _ = respond_to.send(response);
                    }
                    (ResourceRequest::Find { respond_to, .. }, Expectation::Find { response }) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Create { respond_to, .. },
                        Expectation::Create { response },
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Delete { id, respond_to },
                        Expectation::Delete { response },
                    ) => {
                        check_id::<T>(&expected_id, &id);
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Action { id, respond_to, .. },
                        Expectation::Action { response },
                    ) => {
                        check_id::<T>(&expected_id, &id);
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Batch { respond_to, .. },
                        Expectation::Batch { response },
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Restore { id, respond_to, .. },
                        Expectation::Restore { response },
                    ) => {
                        check_id::<T>(&expected_id, &id);
                        let _ = respond_to.send(response);
                    }
                    _ => panic!("Unexpected request or expectation mismatch"),
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// A client wired to this mock; wrap it in the store's typed client.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        self.builder(Some(id), |response| Expectation::Get { response })
    }

    /// The predicate is not evaluated; the canned list is returned as is.
    pub fn expect_find(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        self.builder(None, |response| Expectation::Find { response })
    }

    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T::Id> {
        self.builder(None, |response| Expectation::Create { response })
    }

    pub fn expect_delete(&mut self, id: T::Id) -> ExpectationBuilder<T, ()> {
        self.builder(Some(id), |response| Expectation::Delete { response })
    }

    pub fn expect_action(&mut self, id: T::Id) -> ExpectationBuilder<T, T::ActionResult> {
        self.builder(Some(id), |response| Expectation::Action { response })
    }

    pub fn expect_batch(&mut self) -> ExpectationBuilder<T, Vec<T::ActionResult>> {
        self.builder(None, |response| Expectation::Batch { response })
    }

    pub fn expect_restore(&mut self, id: T::Id) -> ExpectationBuilder<T, ()> {
        self.builder(Some(id), |response| Expectation::Restore { response })
    }

    /// Panics if any queued expectation was never consumed.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }

    fn builder<R>(
        &self,
        id: Option<T::Id>,
        wrap: fn(Result<R, FrameworkError>) -> Expectation<T>,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            id,
            wrap,
            expectations: self.expectations.clone(),
        }
    }
}

fn check_id<T: ActorEntity>(expected: &Option<T::Id>, actual: &T::Id) {
    if let Some(expected) = expected {
        assert_eq!(expected, actual, "mock received a request for the wrong id");
    }
}

/// Builder that queues one expectation with its canned response.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    id: Option<T::Id>,
    wrap: fn(Result<R, FrameworkError>) -> Expectation<T>,
    expectations: Queue<T>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    pub fn return_err(self, error: FrameworkError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<R, FrameworkError>) {
        let expectation = (self.wrap)(response);
        self.expectations
            .lock()
            .unwrap()
            .push_back((self.id, expectation));
    }
}

// =============================================================================
// CHANNEL HELPERS
// =============================================================================

/// Creates a client and the receiver its requests arrive on, for tests that want
/// to inspect each request and answer it by hand.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Next request, if it is an Action.
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Id,
    T::Action,
    tokio::sync::oneshot::Sender<Result<T::ActionResult, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}

/// Next request, if it is a Batch.
pub async fn expect_batch<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    Vec<(T::Id, T::Action)>,
    tokio::sync::oneshot::Sender<Result<Vec<T::ActionResult>, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Batch {
            actions,
            respond_to,
        }) => Some((actions, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Clone, Debug, PartialEq)]
    struct Seat {
        id: u32,
        label: String,
    }

    #[derive(Debug)]
    struct SeatCreate(String);

    #[derive(Debug, thiserror::Error)]
    #[error("seat error")]
    struct SeatError;

    #[async_trait]
    impl ActorEntity for Seat {
        type Id = u32;
        type Create = SeatCreate;
        type Update = ();
        type Action = ();
        type ActionResult = ();
        type Context = ();
        type Error = SeatError;

        fn from_create_params(id: u32, params: SeatCreate) -> Result<Self, Self::Error> {
            Ok(Self {
                id,
                label: params.0,
            })
        }
        async fn on_update(&mut self, _: (), _: &()) -> Result<(), Self::Error> {
            Ok(())
        }
        async fn handle_action(&mut self, _: (), _: &()) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_mock_client_with_expectations() {
        let mut mock = MockClient::<Seat>::new();
        mock.expect_create().return_ok(1);
        mock.expect_get(1).return_ok(Some(Seat {
            id: 1,
            label: "A1".to_string(),
        }));
        mock.expect_action(1).return_err(FrameworkError::ActorClosed);

        let client = mock.client();
        let id = client.create(SeatCreate("A1".to_string())).await.unwrap();
        assert_eq!(id, 1);
        assert_eq!(client.get(1).await.unwrap().unwrap().label, "A1");
        assert!(matches!(
            client.perform_action(1, ()).await,
            Err(FrameworkError::ActorClosed)
        ));

        mock.verify();
    }

    #[tokio::test]
    async fn test_channel_helpers_expose_batch_payload() {
        let (client, mut receiver) = create_mock_client::<Seat>(4);
        let task = tokio::spawn(async move { client.perform_batch(vec![(1, ()), (2, ())]).await });

        let (actions, responder) = expect_batch(&mut receiver).await.expect("batch request");
        assert_eq!(actions.len(), 2);
        responder.send(Ok(vec![(), ()])).unwrap();

        assert_eq!(task.await.unwrap().unwrap().len(), 2);
    }
}
