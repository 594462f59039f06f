use std::path::{Path, PathBuf};

use anyhow::Context;
use flightscene_assets::{Model, ModelTable};
use flightscene_common::{Color, Micros};
use flightscene_entities::{EntityStore, NetworkModel, Projectile, RemotePeer};
use flightscene_render::{Camera, RenderConfig};
use glam::IVec3;
use serde::{Deserialize, Serialize};

/// A cube placed in the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CubeSpec {
    pub label: u16,
    pub half_extent: i16,
    #[serde(default)]
    pub offset: IVec3,
    #[serde(default)]
    pub solid: bool,
}

impl CubeSpec {
    fn build(&self) -> Model {
        let cube = if self.solid {
            Model::solid_cube(self.label, self.half_extent)
        } else {
            Model::wire_cube(self.label, self.half_extent)
        };
        cube.translated(self.offset)
    }
}

/// An entity written to a fixed store slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slotted<T> {
    pub slot: usize,
    pub entity: T,
}

/// Scene description read from JSON. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneFile {
    pub config: RenderConfig,
    pub camera: Camera,
    pub now: Micros,
    /// Packed model blob, relative to the scene file.
    pub model_file: Option<PathBuf>,
    pub cubes: Vec<CubeSpec>,
    pub hidden_labels: Vec<u16>,
    /// Label of the model used for remote ships; a small wire cube if unset.
    pub ship_label: Option<u16>,
    pub own_projectiles: Vec<Projectile>,
    pub remote_projectiles: Vec<Slotted<Projectile>>,
    pub peers: Vec<Slotted<RemotePeer>>,
    pub network_models: Vec<Slotted<NetworkModel>>,
    pub status: Option<String>,
}

/// Owned state a [`flightscene_render::Scene`] borrows from.
pub struct LoadedScene {
    pub models: ModelTable,
    pub ship: Model,
    pub store: EntityStore,
}

impl SceneFile {
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading scene {}", path.display()))?;
        let mut scene: SceneFile = serde_json::from_str(&text)
            .with_context(|| format!("parsing scene {}", path.display()))?;
        if let (Some(file), Some(dir)) = (scene.model_file.as_mut(), path.parent()) {
            *file = dir.join(&*file);
        }
        Ok(scene)
    }

    pub fn load(&self) -> anyhow::Result<LoadedScene> {
        let mut models = match &self.model_file {
            Some(path) => ModelTable::load(path)
                .with_context(|| format!("loading models from {}", path.display()))?,
            None => ModelTable::new(),
        };
        for cube in &self.cubes {
            models.push(cube.build());
        }

        let ship = match self.ship_label {
            Some(label) => models
                .by_label(label)
                .cloned()
                .with_context(|| format!("no model with ship label {label}"))?,
            None => Model::wire_cube(u16::MAX, 60),
        };

        let mut store = EntityStore::new();
        for p in &self.own_projectiles {
            store.fire(*p);
        }
        for p in &self.remote_projectiles {
            store.set_remote_projectile(p.slot, p.entity)?;
        }
        for p in &self.peers {
            store.set_peer(p.slot, p.entity)?;
        }
        for m in &self.network_models {
            store.set_network_model(m.slot, m.entity.clone())?;
        }
        tracing::info!(
            models = models.len(),
            peers = store.peers().len(),
            "scene loaded"
        );

        Ok(LoadedScene {
            models,
            ship,
            store,
        })
    }

    /// Built-in scene: a row of pylons, a solid block, two ships (one
    /// breaking up), rounds in flight and a server-described marker.
    pub fn demo() -> anyhow::Result<Self> {
        let mut cubes: Vec<CubeSpec> = (0..6)
            .map(|i| CubeSpec {
                label: 10 + i as u16,
                half_extent: 60,
                offset: IVec3::new(-750 + i * 300, 0, 1800),
                solid: false,
            })
            .collect();
        cubes.push(CubeSpec {
            label: 1,
            half_extent: 150,
            offset: IVec3::new(0, 0, 1100),
            solid: true,
        });

        let marker = NetworkModel::new(
            0,
            IVec3::new(-400, 250, 1400),
            [0, -4, 0],
            120,
            Color::from_levels(0, 5, 0),
            vec![
                IVec3::ZERO,
                IVec3::new(0, 100, 0),
                IVec3::new(-60, 60, 0),
                IVec3::new(60, 60, 0),
            ],
            vec![(0, 1), (2, 3)],
        )?;

        Ok(Self {
            camera: Camera::new(IVec3::new(0, 150, -200), 0, 40),
            cubes,
            own_projectiles: vec![Projectile {
                launch_time: 0,
                launch_position: IVec3::new(40, 120, -150),
                launch_yaw: 0,
                launch_pitch: 0,
                flags: 0x2a,
            }],
            remote_projectiles: vec![Slotted {
                slot: 0,
                entity: Projectile {
                    launch_time: 0,
                    launch_position: IVec3::new(600, 300, 2400),
                    launch_yaw: 2_970,
                    launch_pitch: 0,
                    flags: 0x51,
                },
            }],
            peers: vec![
                Slotted {
                    slot: 0,
                    entity: RemotePeer {
                        position: IVec3::new(300, 320, 1500),
                        velocity: [-20, 0, 0],
                        rotation: [64, 10, 0],
                        color: Color::from_levels(5, 5, 0),
                        ..RemotePeer::default()
                    },
                },
                Slotted {
                    slot: 1,
                    entity: RemotePeer {
                        position: IVec3::new(-250, 380, 2000),
                        rotation: [200, 0, 30],
                        base_flags: RemotePeer::FLAG_PRESENT | RemotePeer::FLAG_DEAD,
                        aux_flags: 0x51,
                        frames_dead: 1,
                        ..RemotePeer::default()
                    },
                },
            ],
            network_models: vec![Slotted {
                slot: 0,
                entity: marker,
            }],
            status: Some("FLIGHTSCENE DEMO".to_owned()),
            ..Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_scene_loads() {
        let scene = SceneFile::demo().unwrap();
        let loaded = scene.load().unwrap();
        assert_eq!(loaded.models.len(), 7);
        assert_eq!(loaded.store.peers().len(), 2);
        assert_eq!(loaded.store.network_models().len(), 1);
    }

    #[test]
    fn minimal_json_scene() {
        let json = r#"{
            "camera": { "position": [0, 0, -600], "heading": 0, "pitch": 0 },
            "cubes": [ { "label": 1, "half_extent": 100 } ],
            "peers": [ { "slot": 4, "entity": {
                "time_of_update": 0, "position": [0, 0, 400], "velocity": [0, 0, 0],
                "rotation": [0, 0, 0], "base_flags": 1, "aux_flags": 0,
                "frames_dead": 0, "color": 5 } } ]
        }"#;
        let scene: SceneFile = serde_json::from_str(json).unwrap();
        assert_eq!(scene.config, RenderConfig::default());
        let loaded = scene.load().unwrap();
        assert_eq!(loaded.models.len(), 1);
        assert!(loaded.store.peers().get(4).is_some());
    }

    #[test]
    fn missing_ship_label_is_an_error() {
        let scene = SceneFile {
            ship_label: Some(9),
            ..SceneFile::default()
        };
        assert!(scene.load().is_err());
    }

    #[test]
    fn out_of_range_slot_is_an_error() {
        let scene = SceneFile {
            peers: vec![Slotted {
                slot: 1_000,
                entity: RemotePeer::default(),
            }],
            ..SceneFile::default()
        };
        assert!(scene.load().is_err());
    }

    #[test]
    fn model_file_resolves_next_to_scene() {
        let dir = tempfile::tempdir().unwrap();
        let mut table = ModelTable::new();
        table.push(Model::wire_cube(3, 40));
        table.save(dir.path().join("env.bin")).unwrap();
        std::fs::write(
            dir.path().join("scene.json"),
            r#"{ "model_file": "env.bin", "ship_label": 3 }"#,
        )
        .unwrap();

        let scene = SceneFile::read(&dir.path().join("scene.json")).unwrap();
        assert_eq!(scene.model_file, Some(dir.path().join("env.bin")));
        let loaded = scene.load().unwrap();
        assert_eq!(loaded.models.len(), 1);
        assert_eq!(loaded.ship.label(), 3);
    }
}
