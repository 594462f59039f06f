//! Per-kind probe and draw.
//!
//! Every drawable answers two questions: where is it now (probe, no pixels,
//! no side effects) and what does it look like (draw). Kinematic kinds
//! extrapolate their last snapshot to the frame time first.

use flightscene_assets::Model;
use flightscene_common::{Euler, Micros, byte_to_degrees, elapsed_micros, hpr_to_degrees};
use flightscene_entities::{NetworkModel, Projectile, RemotePeer};
use flightscene_math::{Mat4, cos1024, sin1024};
use glam::{IVec2, IVec3};

use crate::{Canvas, Frame, RenderConfig, draw_edge, draw_model, probe_point};

/// Bounding radius of every projectile.
pub const PROJECTILE_RADIUS: i32 = 50;
/// Elapsed microseconds are shifted down by this before scaling the
/// direction, which sets projectile speed.
const PROJECTILE_SPEED_SHIFT: u32 = 11;
/// Tracer length as a shift of the unit direction.
const TRACER_LENGTH_SHIFT: u32 = 3;
/// Velocities are in units per 2^16 microseconds.
const DEAD_RECKON_SHIFT: u32 = 16;
/// Debris offset = hash * frames_dead >> this.
const DEBRIS_SHIFT: u32 = 14;

/// Bounding sphere of a drawable at the frame time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub center: IVec3,
    pub radius: i32,
}

/// Read-only inputs shared by every draw in a frame.
#[derive(Debug, Clone, Copy)]
pub struct DrawContext<'a> {
    pub frame: &'a Frame,
    pub config: &'a RenderConfig,
    pub now: Micros,
    /// Model used for every remote ship.
    pub ship: &'a Model,
}

/// Buffers reused across draws so the render path never allocates once
/// warmed up.
#[derive(Debug, Default)]
pub struct Scratch {
    pub vertices: Vec<IVec3>,
    pub screen: Vec<Option<IVec2>>,
}

impl Scratch {
    /// Pre-size for models of up to `vertex_count` vertices.
    pub fn with_capacity(vertex_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            screen: Vec::with_capacity(vertex_count),
        }
    }
}

/// The two-mode contract shared by every entity kind.
pub trait Drawable {
    /// Current bounding sphere.
    fn probe(&self, ctx: &DrawContext<'_>) -> Bounds;

    /// Emit pixels. May advance animation-only state.
    fn draw(&mut self, ctx: &DrawContext<'_>, scratch: &mut Scratch, canvas: &mut dyn Canvas);
}

/// Unit travel direction (scaled by 1024) for a launch heading and pitch
/// given in HPR units.
pub fn projectile_direction(yaw: i32, pitch: i32) -> IVec3 {
    let yaw = hpr_to_degrees(yaw);
    let pitch = hpr_to_degrees(pitch);
    let horizontal = cos1024(pitch);
    IVec3::new(
        (sin1024(yaw) * horizontal) >> 10,
        -sin1024(pitch),
        (cos1024(yaw) * horizontal) >> 10,
    )
}

/// Where a projectile is at `now`, flown straight from its launch state.
pub fn projectile_center(p: &Projectile, now: Micros) -> IVec3 {
    let distance = elapsed_micros(now, p.launch_time) >> PROJECTILE_SPEED_SHIFT;
    let dir = projectile_direction(p.launch_yaw, p.launch_pitch);
    p.launch_position + shift_each(dir * distance, 10)
}

fn shift_each(v: IVec3, shift: u32) -> IVec3 {
    IVec3::new(v.x >> shift, v.y >> shift, v.z >> shift)
}

/// Linear dead reckoning: `position + velocity * elapsed / 65536` per axis,
/// rounding toward negative infinity.
pub fn dead_reckon(position: IVec3, velocity: [i8; 3], elapsed: i32) -> IVec3 {
    let step = |v: i8| ((v as i64 * elapsed as i64) >> DEAD_RECKON_SHIFT) as i32;
    position + IVec3::new(step(velocity[0]), step(velocity[1]), step(velocity[2]))
}

/// Debris scatter generator. Seeded fresh for every draw so the same seed
/// and frame count always give the same picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebrisRng(i32);

impl DebrisRng {
    pub fn new(seed: u16) -> Self {
        Self(seed as i32)
    }

    pub fn next_i16(&mut self) -> i16 {
        self.0 = self.0.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        (self.0 >> 16) as i16
    }

    fn scatter(&mut self, v: IVec3, frames_dead: i32) -> IVec3 {
        let mut offset = || (self.next_i16() as i32 * frames_dead) >> DEBRIS_SHIFT;
        let (dx, dy, dz) = (offset(), offset(), offset());
        v + IVec3::new(dx, dy, dz)
    }
}

/// Unwelded, scattered copies of each ship edge in world space.
pub(crate) fn debris_segments<'a>(
    ship: &'a Model,
    local: &'a Mat4,
    seed: u16,
    frames_dead: u8,
) -> impl Iterator<Item = (IVec3, IVec3)> + 'a {
    let mut rng = DebrisRng::new(seed);
    let fd = frames_dead as i32;
    let vertices = ship.vertices();
    ship.edges().map(move |(a, b)| {
        let a = local.transform_affine(rng.scatter(vertices[a as usize], fd));
        let b = local.transform_affine(rng.scatter(vertices[b as usize], fd));
        (a, b)
    })
}

impl Drawable for Projectile {
    fn probe(&self, ctx: &DrawContext<'_>) -> Bounds {
        Bounds {
            center: projectile_center(self, ctx.now),
            radius: PROJECTILE_RADIUS,
        }
    }

    /// A short tracer along the direction of travel.
    fn draw(&mut self, ctx: &DrawContext<'_>, _scratch: &mut Scratch, canvas: &mut dyn Canvas) {
        let start = projectile_center(self, ctx.now);
        let tail = shift_each(
            projectile_direction(self.launch_yaw, self.launch_pitch),
            TRACER_LENGTH_SHIFT,
        );
        let (Ok(s), Ok(e)) = (
            probe_point(ctx.frame, start),
            probe_point(ctx.frame, start + tail),
        ) else {
            return;
        };
        canvas.draw_line(s.x, s.y + 1, e.x, e.y - 1, ctx.config.projectile_color);
    }
}

fn peer_center(peer: &RemotePeer, now: Micros) -> IVec3 {
    dead_reckon(
        peer.position,
        peer.velocity,
        elapsed_micros(now, peer.time_of_update),
    )
}

/// Model-to-world transform of a peer ship: yaw, then pitch and roll, then
/// the extrapolated position.
pub(crate) fn peer_transform(peer: &RemotePeer, now: Micros) -> Mat4 {
    let [yaw, pitch, roll] = peer.rotation.map(byte_to_degrees);
    let mut local = Mat4::rotation(Euler::new(359 - yaw, 0, 0));
    local.rotate(Euler::new(0, 359 - pitch, roll));
    local.set_translation(peer_center(peer, now));
    local
}

impl Drawable for RemotePeer {
    fn probe(&self, ctx: &DrawContext<'_>) -> Bounds {
        Bounds {
            center: peer_center(self, ctx.now),
            radius: ctx.ship.radius(),
        }
    }

    fn draw(&mut self, ctx: &DrawContext<'_>, scratch: &mut Scratch, canvas: &mut dyn Canvas) {
        let local = peer_transform(self, ctx.now);

        if self.frames_dead != 0 {
            for (a, b) in debris_segments(ctx.ship, &local, self.aux_flags, self.frames_dead) {
                draw_edge(canvas, ctx.frame, a, b, ctx.config.explosion_color);
            }
            self.frames_dead = self.frames_dead.saturating_add(1);
            return;
        }

        scratch.vertices.clear();
        scratch
            .vertices
            .extend(ctx.ship.vertices().iter().map(|&v| local.transform_affine(v)));
        draw_model(
            canvas,
            ctx.frame,
            ctx.ship,
            &scratch.vertices,
            &mut scratch.screen,
            ctx.config.background,
            self.color,
        );
    }
}

fn network_root(model: &NetworkModel, now: Micros) -> IVec3 {
    dead_reckon(
        model.root,
        model.velocity,
        elapsed_micros(now, model.time_of_update),
    )
}

impl Drawable for NetworkModel {
    fn probe(&self, ctx: &DrawContext<'_>) -> Bounds {
        Bounds {
            center: network_root(self, ctx.now),
            radius: self.radius as i32,
        }
    }

    /// Wireframe of the links between bones, offset from the root.
    fn draw(&mut self, ctx: &DrawContext<'_>, _scratch: &mut Scratch, canvas: &mut dyn Canvas) {
        let root = network_root(self, ctx.now);
        let bones = self.bones();
        for &(a, b) in self.links() {
            if let (Some(&a), Some(&b)) = (bones.get(a as usize), bones.get(b as usize)) {
                draw_edge(canvas, ctx.frame, root + a, root + b, self.color);
            }
        }
    }
}

/// An environment model, drawn as-is.
#[derive(Debug, Clone, Copy)]
pub struct StaticModel<'a>(pub &'a Model);

impl Drawable for StaticModel<'_> {
    fn probe(&self, _ctx: &DrawContext<'_>) -> Bounds {
        Bounds {
            center: self.0.center(),
            radius: self.0.radius(),
        }
    }

    fn draw(&mut self, ctx: &DrawContext<'_>, scratch: &mut Scratch, canvas: &mut dyn Canvas) {
        draw_model(
            canvas,
            ctx.frame,
            self.0,
            self.0.vertices(),
            &mut scratch.screen,
            ctx.config.background,
            ctx.config.line_color,
        );
    }
}
