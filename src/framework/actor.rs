//! The server half of every store: one task, one `HashMap`, one message at a time.

use super::client::ResourceClient;
use super::entity::ActorEntity;
use super::error::FrameworkError;
use super::message::ResourceRequest;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Owns the records of one store and answers [`ResourceRequest`]s.
///
/// Requests are handled strictly in arrival order, so a check followed by a mutation
/// inside one request cannot interleave with another caller and the map needs no lock.
///
/// Build with [`ResourceActor::new`], hand the returned client to whoever needs it, then
/// spawn [`run`](Self::run) with the store's context.
///
/// | Request | Behaviour |
/// |---------|-----------|
/// | Create  | next `u32` id, `from_create_params`, `on_create`; stored only if both succeed |
/// | Get / Find | clones out of the map |
/// | Update / Action | in place; a failed hook puts the previous value back |
/// | Batch   | actions in order; the first failure restores every record the batch touched |
/// | Delete  | `on_delete`, then removal |
/// | Restore | overwrites or re-inserts a captured snapshot |
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id: u32,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// `buffer_size` bounds the request channel; senders wait while it is full.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id: 1,
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    /// Serves requests until every client has been dropped. `context` is passed to each hook.
    pub async fn run(mut self, context: T::Context) {
        // "Order" rather than "cafe_pos::model::order::Order"
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let id = T::Id::from(self.next_id);
                    self.next_id += 1;

                    match T::from_create_params(id.clone(), params) {
                        Ok(mut item) => {
                            if let Err(e) = item.on_create(&context).await {
                                warn!(entity_type, %id, error = %e, "on_create failed");
                                let _ =
                                    respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                                continue;
                            }
                            if let Err(e) = self.check_unique(&id, &item) {
                                warn!(entity_type, %id, error = %e, "Duplicate rejected");
                                let _ =
                                    respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                                continue;
                            }
                            self.store.insert(id.clone(), item);
                            info!(entity_type, %id, size = self.store.len(), "Created");
                            let _ = respond_to.send(Ok(id));
                        }
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        }
                    }
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    let found = item.is_some();
                    debug!(entity_type, %id, found, "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Find { filter, respond_to } => {
                    let items: Vec<T> = self
                        .store
                        .values()
                        .filter(|item| filter.matches(item))
                        .cloned()
                        .collect();
                    debug!(entity_type, matched = items.len(), "Find");
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    if let Some(current) = self.store.get(&id) {
                        // Work on a copy; the stored value changes only if every check passes.
                        let mut item = current.clone();
                        let checked = match item.on_update(update, &context).await {
                            Ok(()) => self.check_unique(&id, &item),
                            Err(e) => Err(e),
                        };
                        if let Err(e) = checked {
                            warn!(entity_type, %id, error = %e, "Update failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                            continue;
                        }
                        self.store.insert(id.clone(), item.clone());
                        info!(entity_type, %id, "Updated");
                        let _ = respond_to.send(Ok(item));
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    if let Some(item) = self.store.get(&id) {
                        if let Err(e) = item.on_delete(&context).await {
                            warn!(entity_type, %id, error = %e, "on_delete failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                            continue;
                        }
                        self.store.remove(&id);
                        info!(entity_type, %id, size = self.store.len(), "Deleted");
                        let _ = respond_to.send(Ok(()));
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    if let Some(item) = self.store.get_mut(&id) {
                        let before = item.clone();
                        let result = item
                            .handle_action(action, &context)
                            .await
                            .map_err(|e| FrameworkError::EntityError(Box::new(e)));
                        match &result {
                            Ok(_) => info!(entity_type, %id, "Action ok"),
                            Err(e) => {
                                *item = before;
                                warn!(entity_type, %id, error = %e, "Action failed");
                            }
                        }
                        let _ = respond_to.send(result);
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
                ResourceRequest::Batch {
                    actions,
                    respond_to,
                } => {
                    let count = actions.len();
                    debug!(entity_type, count, ?actions, "Batch");
                    let result = self.apply_batch(actions, &context).await;
                    match &result {
                        Ok(_) => info!(entity_type, count, "Batch ok"),
                        Err(e) => warn!(entity_type, count, error = %e, "Batch rolled back"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Restore {
                    id,
                    snapshot,
                    respond_to,
                } => {
                    let replaced = self.store.insert(id.clone(), snapshot).is_some();
                    info!(entity_type, %id, replaced, "Restored");
                    let _ = respond_to.send(Ok(()));
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }

    fn check_unique(&self, id: &T::Id, item: &T) -> Result<(), T::Error> {
        self.store
            .iter()
            .filter(|(other_id, _)| *other_id != id)
            .try_for_each(|(_, other)| item.check_unique(other))
    }

    async fn apply_batch(
        &mut self,
        actions: Vec<(T::Id, T::Action)>,
        context: &T::Context,
    ) -> Result<Vec<T::ActionResult>, FrameworkError> {
        let mut touched: Vec<(T::Id, T)> = Vec::new();
        let mut results = Vec::with_capacity(actions.len());
        let mut failure = None;

        for (id, action) in actions {
            let Some(item) = self.store.get_mut(&id) else {
                failure = Some(FrameworkError::NotFound(id.to_string()));
                break;
            };
            if !touched.iter().any(|(seen, _)| *seen == id) {
                touched.push((id.clone(), item.clone()));
            }
            match item.handle_action(action, context).await {
                Ok(result) => results.push(result),
                Err(e) => {
                    failure = Some(FrameworkError::EntityError(Box::new(e)));
                    break;
                }
            }
        }

        match failure {
            None => Ok(results),
            Some(err) => {
                for (id, before) in touched {
                    self.store.insert(id, before);
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    #[derive(Clone, Debug, PartialEq)]
    struct Bin {
        id: u32,
        level: i32,
    }

    #[derive(Debug)]
    struct BinCreate(i32);

    #[derive(Debug)]
    enum BinAction {
        Take(i32),
    }

    #[derive(Debug, thiserror::Error)]
    #[error("bin {0} would go negative")]
    struct BinError(u32);

    #[async_trait]
    impl ActorEntity for Bin {
        type Id = u32;
        type Create = BinCreate;
        type Update = ();
        type Action = BinAction;
        type ActionResult = i32;
        type Context = ();
        type Error = BinError;

        fn from_create_params(id: u32, params: BinCreate) -> Result<Self, Self::Error> {
            Ok(Self {
                id,
                level: params.0,
            })
        }

        async fn on_update(&mut self, _: (), _: &()) -> Result<(), Self::Error> {
            Ok(())
        }

        async fn handle_action(&mut self, action: BinAction, _: &()) -> Result<i32, Self::Error> {
            match action {
                BinAction::Take(n) => {
                    self.level -= n;
                    if self.level < 0 {
                        return Err(BinError(self.id));
                    }
                    Ok(self.level)
                }
            }
        }
    }

    #[tokio::test]
    async fn test_failed_action_leaves_entity_untouched() {
        let (actor, client) = ResourceActor::<Bin>::new(8);
        tokio::spawn(actor.run(()));

        let id = client.create(BinCreate(5)).await.unwrap();
        assert!(client.perform_action(id, BinAction::Take(9)).await.is_err());
        assert_eq!(client.get(id).await.unwrap().unwrap().level, 5);
    }

    #[tokio::test]
    async fn test_batch_is_all_or_nothing() {
        let (actor, client) = ResourceActor::<Bin>::new(8);
        tokio::spawn(actor.run(()));

        let a = client.create(BinCreate(10)).await.unwrap();
        let b = client.create(BinCreate(1)).await.unwrap();

        let result = client
            .perform_batch(vec![(a, BinAction::Take(4)), (b, BinAction::Take(2))])
            .await;
        assert!(matches!(result, Err(FrameworkError::EntityError(_))));
        assert_eq!(client.get(a).await.unwrap().unwrap().level, 10);
        assert_eq!(client.get(b).await.unwrap().unwrap().level, 1);

        let ok = client
            .perform_batch(vec![(a, BinAction::Take(4)), (a, BinAction::Take(3))])
            .await
            .unwrap();
        assert_eq!(ok, vec![6, 3]);
    }

    #[tokio::test]
    async fn test_batch_with_unknown_id_rolls_back() {
        let (actor, client) = ResourceActor::<Bin>::new(8);
        tokio::spawn(actor.run(()));

        let a = client.create(BinCreate(10)).await.unwrap();
        let result = client
            .perform_batch(vec![(a, BinAction::Take(4)), (99, BinAction::Take(1))])
            .await;
        assert!(matches!(result, Err(FrameworkError::NotFound(_))));
        assert_eq!(client.get(a).await.unwrap().unwrap().level, 10);
    }

    #[tokio::test]
    async fn test_find_and_restore() {
        let (actor, client) = ResourceActor::<Bin>::new(8);
        tokio::spawn(actor.run(()));

        let a = client.create(BinCreate(10)).await.unwrap();
        client.create(BinCreate(0)).await.unwrap();

        let empty = client.find(|bin: &Bin| bin.level == 0).await.unwrap();
        assert_eq!(empty.len(), 1);

        let snapshot = client.get(a).await.unwrap().unwrap();
        client.perform_action(a, BinAction::Take(10)).await.unwrap();
        client.restore(a, snapshot.clone()).await.unwrap();
        assert_eq!(client.get(a).await.unwrap().unwrap(), snapshot);
    }
}
