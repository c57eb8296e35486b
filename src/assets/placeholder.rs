//! Procedural stand-in rigs.
//!
//! Each rig is `root → Hips (bone) → Body, Head (meshes)` with five clips on the hips
//! joint: idle, kick, save, recover and celebrate. The save clip carries root motion
//! (the hips travel sideways and down) so position hand-offs have something to correct.

use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::actor::ActorRole;
use crate::animation::{AnimationClip, InterpolationMode, KeyframeTrack, Track};
use crate::assets::{ActorSource, LoadedActor};
use crate::errors::Result;
use crate::scene::{Aabb, Node, Scene, Surface, Transform};

const HIPS: &str = "Hips";
const HIPS_HEIGHT: f32 = 0.95;

#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderSource;

impl PlaceholderSource {
    /// Builds the rig for `role`. Never fails.
    pub fn build(scene: &mut Scene, role: ActorRole) -> LoadedActor {
        let root = scene.add_node(Node::new(role.node_name()));

        let mut hips = Node::bone(HIPS);
        hips.transform = Transform::from_position(Vec3::new(0.0, HIPS_HEIGHT, 0.0));
        let hips = scene.add_to_parent(hips, root);

        let body_surface = scene.add_surface(Surface::opaque());
        scene.add_to_parent(
            Node::mesh(
                "Body",
                Aabb::from_half_extents(Vec3::new(0.25, 0.45, 0.15)),
                Some(body_surface),
            ),
            hips,
        );

        let head_surface = scene.add_surface(Surface::opaque());
        let mut head = Node::mesh(
            "Head",
            Aabb::from_half_extents(Vec3::splat(0.12)),
            Some(head_surface),
        );
        head.transform = Transform::from_position(Vec3::new(0.0, 0.6, 0.0));
        scene.add_to_parent(head, hips);

        let clips = [idle(), kick(), save(), recover(), celebrate()]
            .into_iter()
            .map(Arc::new)
            .collect();

        LoadedActor { root, clips }
    }
}

impl ActorSource for PlaceholderSource {
    fn load(&mut self, scene: &mut Scene, role: ActorRole) -> Result<LoadedActor> {
        Ok(Self::build(scene, role))
    }
}

fn hips_at(x: f32, y: f32, z: f32) -> Vec3 {
    Vec3::new(x, HIPS_HEIGHT + y, z)
}

fn hips_clip(name: &str, times: &[f32], positions: Vec<Vec3>, rotations: Vec<Quat>) -> AnimationClip {
    AnimationClip::new(
        name,
        vec![
            Track::translation(
                HIPS,
                KeyframeTrack::new(times.to_vec(), positions, InterpolationMode::Linear),
            ),
            Track::rotation(
                HIPS,
                KeyframeTrack::new(times.to_vec(), rotations, InterpolationMode::Linear),
            ),
        ],
    )
}

fn idle() -> AnimationClip {
    hips_clip(
        "idle",
        &[0.0, 1.0, 2.0],
        vec![hips_at(0.0, 0.0, 0.0), hips_at(0.0, 0.02, 0.0), hips_at(0.0, 0.0, 0.0)],
        vec![Quat::IDENTITY; 3],
    )
}

fn kick() -> AnimationClip {
    hips_clip(
        "kick",
        &[0.0, 0.4, 1.0],
        vec![hips_at(0.0, 0.0, 0.0), hips_at(0.0, -0.05, 0.2), hips_at(0.0, 0.0, 0.5)],
        vec![Quat::IDENTITY, Quat::from_rotation_x(-0.3), Quat::IDENTITY],
    )
}

fn save() -> AnimationClip {
    hips_clip(
        "save",
        &[0.0, 0.5, 1.2],
        vec![hips_at(0.0, 0.0, 0.0), hips_at(0.6, -0.25, 0.0), hips_at(1.2, -0.6, 0.0)],
        vec![
            Quat::IDENTITY,
            Quat::from_rotation_z(-0.8),
            Quat::from_rotation_z(-FRAC_PI_2),
        ],
    )
}

fn recover() -> AnimationClip {
    hips_clip(
        "recover",
        &[0.0, 0.5, 1.0],
        vec![hips_at(0.3, -0.6, 0.0), hips_at(0.15, -0.3, 0.0), hips_at(0.0, 0.0, 0.0)],
        vec![
            Quat::from_rotation_z(-FRAC_PI_2),
            Quat::from_rotation_z(-0.6),
            Quat::IDENTITY,
        ],
    )
}

fn celebrate() -> AnimationClip {
    hips_clip(
        "celebrate",
        &[0.0, 0.25, 0.5, 0.75, 1.0],
        vec![
            hips_at(0.0, 0.0, 0.0),
            hips_at(0.0, 0.25, 0.0),
            hips_at(0.0, 0.0, 0.0),
            hips_at(0.0, 0.25, 0.0),
            hips_at(0.0, 0.0, 0.0),
        ],
        vec![Quat::IDENTITY; 5],
    )
}
