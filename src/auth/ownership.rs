use thiserror::Error;
use uuid::Uuid;

/// Proof that the acting identity owns the resource it is about to mutate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authorized;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Not authorized to modify this {kind}")]
pub struct Forbidden {
    pub kind: &'static str,
}

/// Entities with a single creator field that gates mutation
pub trait Owned {
    const KIND: &'static str;

    fn owner_id(&self) -> Uuid;
}

/// The ownership check. Call it on a freshly fetched resource, before any
/// write is issued.
pub fn ensure_owner<R: Owned>(identity: Uuid, resource: &R) -> Result<Authorized, Forbidden> {
    if resource.owner_id() == identity {
        Ok(Authorized)
    } else {
        Err(Forbidden { kind: R::KIND })
    }
}
