use flightscene_common::{Color, Micros};
use glam::IVec3;
use serde::{Deserialize, Serialize};

use crate::StoreError;

/// A fired round, described entirely by its launch state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projectile {
    pub launch_time: Micros,
    pub launch_position: IVec3,
    /// Heading at launch, in HPR units.
    pub launch_yaw: i32,
    /// Pitch at launch, in HPR units.
    pub launch_pitch: i32,
    /// Zero means disabled; otherwise a random ID used for hit attribution.
    pub flags: u16,
}

impl Projectile {
    pub fn is_live(&self) -> bool {
        self.flags != 0
    }
}

/// Last known state of another player's ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemotePeer {
    /// Local timestamp of the update that produced this snapshot.
    pub time_of_update: Micros,
    pub position: IVec3,
    /// Units per 65536 microseconds, per axis.
    pub velocity: [i8; 3],
    /// Yaw, pitch, roll as 0-255 bytes of a full turn.
    pub rotation: [u8; 3],
    /// Zero means absent. Bit 1 marks the ship as destroyed.
    pub base_flags: u8,
    /// While dead: ID of the projectile that destroyed the ship.
    pub aux_flags: u16,
    /// Frames since death; zero while alive. Saturates at 255.
    pub frames_dead: u8,
    pub color: Color,
}

impl RemotePeer {
    pub const FLAG_PRESENT: u8 = 1;
    pub const FLAG_DEAD: u8 = 2;

    pub fn is_live(&self) -> bool {
        self.base_flags != 0
    }

    /// Record a kill: the debris animation starts on the next draw.
    pub fn mark_dead(&mut self, killer: u16) {
        self.base_flags |= Self::FLAG_DEAD;
        self.aux_flags = killer;
        if self.frames_dead == 0 {
            self.frames_dead = 1;
        }
    }
}

impl Default for RemotePeer {
    fn default() -> Self {
        Self {
            time_of_update: 0,
            position: IVec3::ZERO,
            velocity: [0; 3],
            rotation: [0; 3],
            base_flags: Self::FLAG_PRESENT,
            aux_flags: 0,
            frames_dead: 0,
            color: Color(5),
        }
    }
}

/// A server-described shape: a root point plus bone offsets joined by links.
///
/// The network layer decodes the packed descriptor; this is the decoded
/// form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawNetworkModel")]
pub struct NetworkModel {
    pub time_of_update: Micros,
    pub root: IVec3,
    /// Units per 65536 microseconds, per axis.
    pub velocity: [i8; 3],
    pub radius: u8,
    pub color: Color,
    bones: Vec<IVec3>,
    links: Vec<(u8, u8)>,
}

impl NetworkModel {
    pub fn new(
        time_of_update: Micros,
        root: IVec3,
        velocity: [i8; 3],
        radius: u8,
        color: Color,
        bones: Vec<IVec3>,
        links: Vec<(u8, u8)>,
    ) -> Result<Self, StoreError> {
        if let Some(&(a, b)) = links
            .iter()
            .find(|(a, b)| *a as usize >= bones.len() || *b as usize >= bones.len())
        {
            return Err(StoreError::BadLink(a, b, bones.len()));
        }
        Ok(Self {
            time_of_update,
            root,
            velocity,
            radius,
            color,
            bones,
            links,
        })
    }

    /// Bone offsets relative to the root.
    pub fn bones(&self) -> &[IVec3] {
        &self.bones
    }

    pub fn links(&self) -> &[(u8, u8)] {
        &self.links
    }
}

/// Unchecked wire form; links are validated on the way in.
#[derive(Deserialize)]
struct RawNetworkModel {
    time_of_update: Micros,
    root: IVec3,
    velocity: [i8; 3],
    radius: u8,
    color: Color,
    bones: Vec<IVec3>,
    links: Vec<(u8, u8)>,
}

impl TryFrom<RawNetworkModel> for NetworkModel {
    type Error = StoreError;

    fn try_from(raw: RawNetworkModel) -> Result<Self, StoreError> {
        NetworkModel::new(
            raw.time_of_update,
            raw.root,
            raw.velocity,
            raw.radius,
            raw.color,
            raw.bones,
            raw.links,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projectile_liveness_follows_flags() {
        let mut p = Projectile {
            launch_time: 0,
            launch_position: IVec3::ZERO,
            launch_yaw: 0,
            launch_pitch: 0,
            flags: 0,
        };
        assert!(!p.is_live());
        p.flags = 0x1234;
        assert!(p.is_live());
    }

    #[test]
    fn mark_dead_starts_counter_once() {
        let mut peer = RemotePeer::default();
        assert!(peer.is_live());
        peer.mark_dead(77);
        assert_eq!(peer.frames_dead, 1);
        assert_eq!(peer.aux_flags, 77);
        assert_ne!(peer.base_flags & RemotePeer::FLAG_DEAD, 0);
        peer.frames_dead = 40;
        peer.mark_dead(78);
        assert_eq!(peer.frames_dead, 40);
    }

    #[test]
    fn network_model_rejects_dangling_links() {
        let bones = vec![IVec3::ZERO, IVec3::X];
        let ok = NetworkModel::new(0, IVec3::ZERO, [0; 3], 10, Color::WHITE, bones.clone(), vec![(0, 1)]);
        assert!(ok.is_ok());
        let bad = NetworkModel::new(0, IVec3::ZERO, [0; 3], 10, Color::WHITE, bones, vec![(0, 2)]);
        assert_eq!(bad, Err(StoreError::BadLink(0, 2, 2)));
    }

    #[test]
    fn peer_snapshot_deserialises_from_feed_json() {
        let json = r#"{
            "time_of_update": 1000,
            "position": [10, 20, 30],
            "velocity": [1, -1, 0],
            "rotation": [0, 64, 0],
            "base_flags": 1,
            "aux_flags": 0,
            "frames_dead": 0,
            "color": 5
        }"#;
        let peer: RemotePeer = serde_json::from_str(json).unwrap();
        assert_eq!(peer.position, IVec3::new(10, 20, 30));
        assert_eq!(peer.velocity, [1, -1, 0]);
        assert_eq!(peer.color, Color(5));
    }

    #[test]
    fn network_model_json_is_validated() {
        let good = r#"{
            "time_of_update": 0, "root": [0, 0, 0], "velocity": [0, 0, 0],
            "radius": 20, "color": 30,
            "bones": [[0, 0, 0], [10, 0, 0]], "links": [[0, 1]]
        }"#;
        let model: NetworkModel = serde_json::from_str(good).unwrap();
        assert_eq!(model.links(), &[(0, 1)]);

        let dangling = good.replace("[[0, 1]]", "[[0, 5]]");
        assert!(serde_json::from_str::<NetworkModel>(&dangling).is_err());
    }
}
