use flightscene_common::{Micros, elapsed_micros};

use crate::StoreError;
use crate::pool::SlotPool;
use crate::snapshot::{NetworkModel, Projectile, RemotePeer};

/// Peer table size. Prime, since peers hash into it by address.
pub const MAX_PEERS: usize = 103;
pub const PROJECTILES_PER_PLAYER: usize = 4;
/// Rounds fired by host-controlled guns.
pub const MAX_HOST_PROJECTILES: usize = 96;
pub const MAX_REMOTE_PROJECTILES: usize =
    MAX_PEERS * PROJECTILES_PER_PLAYER + MAX_HOST_PROJECTILES;
pub const MAX_NETWORK_MODELS: usize = 108;
/// Projectiles older than this many microseconds are expired.
pub const PROJECTILE_MAX_LIFETIME: u32 = 8_000_000;

/// Every remote and own entity the renderer may draw.
///
/// Written by the network receive path between frames; read-only during a
/// frame's render pass apart from peer dead-frame counters.
#[derive(Debug, Clone)]
pub struct EntityStore {
    own_projectiles: SlotPool<Projectile>,
    remote_projectiles: SlotPool<Projectile>,
    peers: SlotPool<RemotePeer>,
    network_models: SlotPool<NetworkModel>,
    next_own: usize,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            own_projectiles: SlotPool::new("own projectiles", PROJECTILES_PER_PLAYER),
            remote_projectiles: SlotPool::new("remote projectiles", MAX_REMOTE_PROJECTILES),
            peers: SlotPool::new("peers", MAX_PEERS),
            network_models: SlotPool::new("network models", MAX_NETWORK_MODELS),
            next_own: 0,
        }
    }

    /// Upper bound on dynamic entities alive at once.
    pub fn capacity(&self) -> usize {
        self.own_projectiles.capacity()
            + self.remote_projectiles.capacity()
            + self.peers.capacity()
            + self.network_models.capacity()
    }

    /// Fire one of our own rounds, overwriting the oldest. Returns its slot.
    pub fn fire(&mut self, projectile: Projectile) -> usize {
        let slot = self.own_projectiles.put_wrapping(self.next_own, projectile);
        self.next_own = (slot + 1) % PROJECTILES_PER_PLAYER;
        tracing::trace!(slot, id = projectile.flags, "own projectile fired");
        slot
    }

    pub fn set_remote_projectile(
        &mut self,
        slot: usize,
        projectile: Projectile,
    ) -> Result<(), StoreError> {
        self.remote_projectiles.insert(slot, projectile)?;
        Ok(())
    }

    pub fn set_peer(&mut self, slot: usize, peer: RemotePeer) -> Result<(), StoreError> {
        self.peers.insert(slot, peer)?;
        Ok(())
    }

    pub fn set_network_model(&mut self, slot: usize, model: NetworkModel) -> Result<(), StoreError> {
        self.network_models.insert(slot, model)?;
        Ok(())
    }

    pub fn remove_peer(&mut self, slot: usize) -> Option<RemotePeer> {
        self.peers.remove(slot)
    }

    pub fn remove_network_model(&mut self, slot: usize) -> Option<NetworkModel> {
        self.network_models.remove(slot)
    }

    /// Clear projectiles that are disabled or older than
    /// [`PROJECTILE_MAX_LIFETIME`]. Returns how many were removed.
    pub fn expire(&mut self, now: Micros) -> usize {
        let keep = |p: &Projectile| {
            let age = elapsed_micros(now, p.launch_time);
            p.is_live() && (0..PROJECTILE_MAX_LIFETIME as i32).contains(&age)
        };
        let removed = self.own_projectiles.retain(keep) + self.remote_projectiles.retain(keep);
        if removed > 0 {
            tracing::debug!(removed, "projectiles expired");
        }
        removed
    }

    pub fn own_projectiles(&self) -> &SlotPool<Projectile> {
        &self.own_projectiles
    }

    pub fn remote_projectiles(&self) -> &SlotPool<Projectile> {
        &self.remote_projectiles
    }

    pub fn peers(&self) -> &SlotPool<RemotePeer> {
        &self.peers
    }

    pub fn peers_mut(&mut self) -> &mut SlotPool<RemotePeer> {
        &mut self.peers
    }

    pub fn network_models(&self) -> &SlotPool<NetworkModel> {
        &self.network_models
    }

    pub fn network_models_mut(&mut self) -> &mut SlotPool<NetworkModel> {
        &mut self.network_models
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;

    fn round(launch_time: Micros, flags: u16) -> Projectile {
        Projectile {
            launch_time,
            launch_position: IVec3::ZERO,
            launch_yaw: 0,
            launch_pitch: 0,
            flags,
        }
    }

    #[test]
    fn capacities_match_wire_limits() {
        let store = EntityStore::new();
        assert_eq!(MAX_REMOTE_PROJECTILES, 508);
        assert_eq!(store.capacity(), 4 + 508 + 103 + 108);
    }

    #[test]
    fn own_fire_wraps_around() {
        let mut store = EntityStore::new();
        let slots: Vec<usize> = (0..6).map(|i| store.fire(round(i, 1 + i as u16))).collect();
        assert_eq!(slots, vec![0, 1, 2, 3, 0, 1]);
        assert_eq!(store.own_projectiles().len(), 4);
        assert_eq!(store.own_projectiles().get(0).unwrap().flags, 5);
    }

    #[test]
    fn expiry_removes_old_and_disabled() {
        let mut store = EntityStore::new();
        store.set_remote_projectile(0, round(0, 1)).unwrap();
        store.set_remote_projectile(1, round(5_000_000, 2)).unwrap();
        store.set_remote_projectile(2, round(5_000_000, 0)).unwrap();
        let removed = store.expire(9_000_000);
        assert_eq!(removed, 2);
        assert_eq!(store.remote_projectiles().len(), 1);
        assert!(store.remote_projectiles().get(1).is_some());
    }

    #[test]
    fn expiry_handles_clock_wrap() {
        let mut store = EntityStore::new();
        store.fire(round(u32::MAX - 1_000, 9));
        assert_eq!(store.expire(2_000), 0);
        assert_eq!(store.own_projectiles().len(), 1);
    }

    #[test]
    fn peer_slots_are_bounded() {
        let mut store = EntityStore::new();
        assert!(store.set_peer(MAX_PEERS - 1, RemotePeer::default()).is_ok());
        assert!(matches!(
            store.set_peer(MAX_PEERS, RemotePeer::default()),
            Err(StoreError::SlotOutOfRange { slot: 103, .. })
        ));
        assert!(store.remove_peer(MAX_PEERS - 1).is_some());
    }
}
