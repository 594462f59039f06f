//! Remote entity snapshots and their fixed-capacity store.
//!
//! The network receive path writes snapshots here once per update; the
//! renderer reads them many times per frame and only ever touches the
//! dead-frame animation counter.
//!
//! # Invariants
//! - Pools never grow: capacity is fixed at construction.
//! - Only the store decides expiry. A cleared or flag-less slot is never
//!   handed to the renderer.

mod pool;
mod snapshot;
mod store;

pub use pool::SlotPool;
pub use snapshot::{NetworkModel, Projectile, RemotePeer};
pub use store::{
    EntityStore, MAX_HOST_PROJECTILES, MAX_NETWORK_MODELS, MAX_PEERS, MAX_REMOTE_PROJECTILES,
    PROJECTILE_MAX_LIFETIME, PROJECTILES_PER_PLAYER,
};

/// Errors from writing into the entity store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("slot {slot} out of range for {pool} (capacity {capacity})")]
    SlotOutOfRange {
        pool: &'static str,
        slot: usize,
        capacity: usize,
    },
    #[error("link ({0}, {1}) references a missing bone; model has {2} bones")]
    BadLink(u8, u8, usize),
}

pub fn crate_info() -> &'static str {
    "flightscene-entities v0.1.0"
}
