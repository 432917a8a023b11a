//! Wire format between [`ResourceClient`](super::ResourceClient) and
//! [`ResourceActor`](super::ResourceActor).

use super::entity::ActorEntity;
use super::error::FrameworkError;
use std::fmt;
use tokio::sync::oneshot;

/// Where the actor sends its answer.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Predicate evaluated inside the actor against every stored entity.
pub struct Filter<T>(pub Box<dyn Fn(&T) -> bool + Send + Sync>);

impl<T> Filter<T> {
    pub fn new(predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Self(Box::new(predicate))
    }

    pub fn matches(&self, item: &T) -> bool {
        (self.0)(item)
    }
}

impl<T> fmt::Debug for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Filter(..)")
    }
}

/// One request to a store. Each variant carries its own reply channel.
///
/// The CRUD variants map to the usual resource lifecycle. The remaining variants
/// cover what a store needs beyond single-entity CRUD:
///
/// - **Find**: Returns clones of every entity matching a [`Filter`].
/// - **Action**: Executes a custom [`ActorEntity::Action`] on one entity.
/// - **Batch**: Executes several actions, possibly on different entities, as one
///   all-or-nothing step. The first failure restores every entity the batch touched.
/// - **Restore**: Puts a previously captured entity state back in the store,
///   bypassing the hooks. Used to compensate a unit of work that failed part way.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Find {
        filter: Filter<T>,
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
    Batch {
        actions: Vec<(T::Id, T::Action)>,
        respond_to: Response<Vec<T::ActionResult>>,
    },
    Restore {
        id: T::Id,
        snapshot: T,
        respond_to: Response<()>,
    },
}
