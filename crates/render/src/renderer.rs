use flightscene_assets::{Model, ModelTable};
use flightscene_common::{Color, Micros};
use flightscene_entities::EntityStore;
use flightscene_math::Mat4;

use crate::dispatch::{Bounds, DrawContext, Drawable, Scratch, StaticModel};
use crate::{
    Camera, Canvas, ConfigError, DrawList, EntityRef, Frame, RenderConfig, VolumeReject,
    draw_crosshair, draw_status, probe_volume,
};

/// Scratch vertex slots reserved up front; larger models grow it once.
const SCRATCH_VERTICES: usize = 256;

/// Renderer-agnostic interface: one call per frame.
pub trait Renderer {
    /// What a frame reports back to the caller.
    type Output;

    /// Render one frame of `scene` onto `canvas`.
    fn render(&mut self, scene: &mut Scene<'_>, canvas: &mut dyn Canvas) -> Self::Output;
}

/// Everything one frame reads. Entity snapshots must not change while a
/// frame renders; only dead-frame counters are written back.
#[derive(Debug)]
pub struct Scene<'a> {
    /// Environment models.
    pub models: &'a ModelTable,
    /// Labels of environment models hidden this frame.
    pub hidden_labels: &'a [u16],
    /// Model drawn for every remote ship.
    pub ship: &'a Model,
    pub entities: &'a mut EntityStore,
    pub camera: Camera,
    pub now: Micros,
    /// Optional HUD status line.
    pub status: Option<&'a str>,
}

/// Per-frame counts, also logged at trace level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub candidates: usize,
    pub accepted: usize,
    pub behind_camera: usize,
    pub off_screen: usize,
}

/// Depth-ordered software renderer.
///
/// Owns the base projection and every reusable buffer. After the first
/// frame sized for a scene, rendering does not allocate.
#[derive(Debug)]
pub struct SceneRenderer {
    config: RenderConfig,
    perspective: Mat4,
    draw_list: DrawList,
    scratch: Scratch,
}

impl SceneRenderer {
    pub fn new(config: RenderConfig) -> Result<Self, ConfigError> {
        let perspective = config.validate()?;
        tracing::debug!(
            width = config.viewport.width,
            height = config.viewport.height,
            "scene renderer ready"
        );
        Ok(Self {
            config,
            perspective,
            draw_list: DrawList::default(),
            scratch: Scratch::with_capacity(SCRATCH_VERTICES),
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Draw order of the most recent frame, farthest first.
    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    pub fn render_frame(&mut self, scene: &mut Scene<'_>, canvas: &mut dyn Canvas) -> FrameStats {
        let _span = tracing::info_span!("render_frame", now = scene.now).entered();

        let frame = Frame::new(&scene.camera, &self.config, &self.perspective);
        let ctx = DrawContext {
            frame: &frame,
            config: &self.config,
            now: scene.now,
            ship: scene.ship,
        };

        self.draw_list
            .ensure_capacity(scene.models.len() + scene.entities.capacity());
        self.draw_list.clear();
        let mut stats = FrameStats::default();

        {
            let list = &mut self.draw_list;
            let mut consider = |entity: EntityRef, bounds: Bounds| {
                stats.candidates += 1;
                match probe_volume(&frame, bounds.center, bounds.radius) {
                    Ok(depth) => {
                        stats.accepted += 1;
                        list.push(entity, depth);
                    }
                    Err(VolumeReject::BehindCamera) => stats.behind_camera += 1,
                    Err(VolumeReject::OffScreen) => stats.off_screen += 1,
                }
            };

            for (i, model) in scene.models.iter().enumerate() {
                if !scene.hidden_labels.contains(&model.label()) {
                    consider(EntityRef::Static(i), StaticModel(model).probe(&ctx));
                }
            }
            let store = &*scene.entities;
            for (i, p) in store.own_projectiles().iter().filter(|(_, p)| p.is_live()) {
                consider(EntityRef::OwnProjectile(i), p.probe(&ctx));
            }
            for (i, p) in store.remote_projectiles().iter().filter(|(_, p)| p.is_live()) {
                consider(EntityRef::RemoteProjectile(i), p.probe(&ctx));
            }
            for (i, peer) in store.peers().iter().filter(|(_, p)| p.is_live()) {
                consider(EntityRef::Peer(i), peer.probe(&ctx));
            }
            for (i, model) in store.network_models().iter() {
                consider(EntityRef::NetworkModel(i), model.probe(&ctx));
            }
        }

        self.draw_list.sort();

        let scratch = &mut self.scratch;
        for item in self.draw_list.items() {
            match item.entity {
                EntityRef::Static(i) => {
                    if let Some(model) = scene.models.get(i) {
                        StaticModel(model).draw(&ctx, scratch, canvas);
                    }
                }
                EntityRef::OwnProjectile(i) => {
                    if let Some(mut p) = scene.entities.own_projectiles().get(i).copied() {
                        p.draw(&ctx, scratch, canvas);
                    }
                }
                EntityRef::RemoteProjectile(i) => {
                    if let Some(mut p) = scene.entities.remote_projectiles().get(i).copied() {
                        p.draw(&ctx, scratch, canvas);
                    }
                }
                EntityRef::Peer(i) => {
                    if let Some(peer) = scene.entities.peers_mut().get_mut(i) {
                        peer.draw(&ctx, scratch, canvas);
                    }
                }
                EntityRef::NetworkModel(i) => {
                    if let Some(model) = scene.entities.network_models_mut().get_mut(i) {
                        model.draw(&ctx, scratch, canvas);
                    }
                }
            }
        }

        if self.config.hud {
            draw_crosshair(canvas, Color::WHITE);
            if let Some(text) = scene.status {
                draw_status(canvas, text);
            }
        }

        tracing::trace!(
            candidates = stats.candidates,
            accepted = stats.accepted,
            behind = stats.behind_camera,
            off_screen = stats.off_screen,
            "frame composited"
        );
        stats
    }
}

impl Renderer for SceneRenderer {
    type Output = FrameStats;

    fn render(&mut self, scene: &mut Scene<'_>, canvas: &mut dyn Canvas) -> FrameStats {
        self.render_frame(scene, canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Framebuffer;
    use flightscene_common::Viewport;
    use flightscene_entities::{Projectile, RemotePeer};
    use glam::IVec3;

    fn solid_cube_at(label: u16, offset: IVec3) -> Model {
        Model::solid_cube(label, 100).translated(offset)
    }

    fn no_hud() -> RenderConfig {
        RenderConfig {
            hud: false,
            ..RenderConfig::default()
        }
    }

    fn blank() -> Framebuffer {
        let mut fb = Framebuffer::new(Viewport::default());
        fb.clear(Color::TRANSPARENT);
        fb
    }

    fn render(
        config: RenderConfig,
        models: &ModelTable,
        hidden: &[u16],
        store: &mut EntityStore,
        camera: Camera,
    ) -> (Framebuffer, FrameStats, Vec<EntityRef>) {
        let ship = Model::wire_cube(99, 60);
        let mut renderer = SceneRenderer::new(config).unwrap();
        let mut scene = Scene {
            models,
            hidden_labels: hidden,
            ship: &ship,
            entities: store,
            camera,
            now: 0,
            status: Some("ALT 600"),
        };
        let mut fb = blank();
        let stats = renderer.render(&mut scene, &mut fb);
        let order = renderer.draw_list().items().iter().map(|i| i.entity).collect();
        (fb, stats, order)
    }

    #[test]
    fn empty_scene_draws_only_hud() {
        let (fb, stats, order) = render(
            RenderConfig::default(),
            &ModelTable::new(),
            &[],
            &mut EntityStore::new(),
            Camera::default(),
        );
        assert_eq!(stats, FrameStats::default());
        assert!(order.is_empty());
        assert_eq!(fb.count(Color::WHITE), 17);
        assert_eq!(fb.labels().len(), 1);
    }

    #[test]
    fn wire_cube_scene() {
        let models: ModelTable = [Model::wire_cube(1, 100)].into_iter().collect();
        let camera = Camera::new(IVec3::new(50, -30, -600), 0, 0);
        let (fb, stats, order) = render(no_hud(), &models, &[], &mut EntityStore::new(), camera);
        assert_eq!(stats.accepted, 1);
        assert_eq!(order, vec![EntityRef::Static(0)]);
        assert_eq!(fb.lines_drawn(), 12);
        assert!(fb.labels().is_empty());
    }

    #[test]
    fn hidden_labels_are_not_candidates() {
        let models: ModelTable = [Model::wire_cube(1, 100), Model::wire_cube(2, 100)]
            .into_iter()
            .collect();
        let camera = Camera::new(IVec3::new(0, 0, -600), 0, 0);
        let (_, stats, order) = render(no_hud(), &models, &[1], &mut EntityStore::new(), camera);
        assert_eq!(stats.candidates, 1);
        assert_eq!(order, vec![EntityRef::Static(1)]);
    }

    #[test]
    fn rejections_are_counted() {
        let models: ModelTable = [
            solid_cube_at(1, IVec3::new(0, 0, 1000)),
            solid_cube_at(2, IVec3::new(0, 0, -1000)),
            solid_cube_at(3, IVec3::new(-20_000, 0, 1000)),
        ]
        .into_iter()
        .collect();
        let (_, stats, _) = render(no_hud(), &models, &[], &mut EntityStore::new(), Camera::default());
        assert_eq!(
            stats,
            FrameStats {
                candidates: 3,
                accepted: 1,
                behind_camera: 1,
                off_screen: 1,
            }
        );
    }

    #[test]
    fn near_model_paints_over_far_model() {
        let near = solid_cube_at(1, IVec3::new(0, 0, 1000));
        let far = solid_cube_at(2, IVec3::new(0, 0, 2000));
        let both: ModelTable = [near.clone(), far].into_iter().collect();
        let alone: ModelTable = [near].into_iter().collect();

        let (fb_both, _, order) = render(no_hud(), &both, &[], &mut EntityStore::new(), Camera::default());
        let (fb_alone, _, _) = render(no_hud(), &alone, &[], &mut EntityStore::new(), Camera::default());
        assert_eq!(order, vec![EntityRef::Static(1), EntityRef::Static(0)]);
        assert_eq!(fb_both.pixels(), fb_alone.pixels());
    }

    #[test]
    fn entities_join_the_frame() {
        let mut store = EntityStore::new();
        store.fire(Projectile {
            launch_time: 0,
            launch_position: IVec3::new(0, 0, 500),
            launch_yaw: 0,
            launch_pitch: 0,
            flags: 1,
        });
        store
            .set_remote_projectile(
                3,
                Projectile {
                    launch_time: 0,
                    launch_position: IVec3::new(0, 0, 700),
                    launch_yaw: 0,
                    launch_pitch: 0,
                    flags: 0,
                },
            )
            .unwrap();
        let mut dead = RemotePeer {
            position: IVec3::new(0, 0, 1500),
            ..RemotePeer::default()
        };
        dead.mark_dead(42);
        store.set_peer(7, dead).unwrap();

        let (fb, stats, order) = render(
            no_hud(),
            &ModelTable::new(),
            &[],
            &mut store,
            Camera::default(),
        );
        // the disabled remote round is not a candidate
        assert_eq!(stats.candidates, 2);
        assert_eq!(order, vec![EntityRef::Peer(7), EntityRef::OwnProjectile(0)]);
        assert!(fb.count(Color(198)) > 0);
        assert!(fb.count(Color::RED) > 0);
        assert_eq!(store.peers().get(7).unwrap().frames_dead, 2);
    }

    #[test]
    fn invalid_config_is_refused() {
        let config = RenderConfig {
            aspect_scale: 0,
            ..RenderConfig::default()
        };
        assert!(SceneRenderer::new(config).is_err());
    }
}
