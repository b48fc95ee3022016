//! Ownership gate shared by every resource kind.
//!
//! A caller may only see, change or remove resources whose owner is the
//! caller. Lookups check existence first and ownership second, so a
//! non-owner gets `Forbidden` rather than `NotFound` for a row that exists.
//! Collections are filtered to the caller by the store query itself.
//!
//! Owners are written once at creation and never change, which is what
//! makes the unlocked check-then-mutate sequence below safe.

use tracing::debug;

use dayplan_db::ResourceStore;
use dayplan_types::{OwnedResource, UserId};

use crate::error::ApiError;

pub fn list_own<R, S>(store: &S, caller: UserId, filter: &R::Filter) -> Result<Vec<R>, ApiError>
where
    R: OwnedResource,
    S: ResourceStore<R> + ?Sized,
{
    Ok(store.find_all(caller, filter)?)
}

pub fn fetch_owned<R, S>(store: &S, id: i64, caller: UserId) -> Result<R, ApiError>
where
    R: OwnedResource,
    S: ResourceStore<R> + ?Sized,
{
    let resource = store.find_by_id(id)?.ok_or(ApiError::NotFound(R::KIND))?;

    if resource.owner() != caller {
        debug!("User {} denied access to {} {}", caller, R::KIND, id);
        return Err(ApiError::Forbidden);
    }

    Ok(resource)
}

/// The owner always comes from the authenticated caller.
pub fn create<R, S>(store: &S, caller: UserId, draft: R::Draft) -> Result<R, ApiError>
where
    R: OwnedResource,
    S: ResourceStore<R> + ?Sized,
{
    Ok(store.insert(caller, draft)?)
}

pub fn update<R, S>(store: &S, id: i64, caller: UserId, patch: R::Patch) -> Result<R, ApiError>
where
    R: OwnedResource,
    S: ResourceStore<R> + ?Sized,
{
    fetch_owned::<R, S>(store, id, caller)?;

    store
        .update_partial(id, patch)?
        .ok_or(ApiError::NotFound(R::KIND))
}

pub fn delete<R, S>(store: &S, id: i64, caller: UserId) -> Result<(), ApiError>
where
    R: OwnedResource,
    S: ResourceStore<R> + ?Sized,
{
    fetch_owned::<R, S>(store, id, caller)?;

    if !store.delete(id)? {
        return Err(ApiError::NotFound(R::KIND));
    }
    Ok(())
}
