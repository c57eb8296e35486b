//! JSON rig files.
//!
//! `RigFileSource` reads `<dir>/<role>.json`: a flat node list (parents by name, listed
//! before their children) plus keyframed clips targeting those nodes by name. The whole
//! file is parsed and validated before anything is added to the scene.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::actor::ActorRole;
use crate::animation::{AnimationClip, InterpolationMode, KeyframeTrack, Track};
use crate::assets::{ActorSource, LoadedActor};
use crate::errors::{Result, VignetteError};
use crate::scene::{Aabb, Node, NodeHandle, NodeRole, Scene, Surface, Transform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
enum RoleDesc {
    Mesh,
    Bone,
    #[default]
    Other,
}

impl From<RoleDesc> for NodeRole {
    fn from(role: RoleDesc) -> Self {
        match role {
            RoleDesc::Mesh => NodeRole::Mesh,
            RoleDesc::Bone => NodeRole::Bone,
            RoleDesc::Other => NodeRole::Other,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct BoundsDesc {
    min: Vec3,
    max: Vec3,
}

#[derive(Debug, Clone, Deserialize)]
struct SurfaceDesc {
    #[serde(default = "default_opacity")]
    opacity: f32,
    #[serde(default)]
    transparent: bool,
}

fn default_opacity() -> f32 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
struct NodeDesc {
    name: String,
    #[serde(default)]
    parent: Option<String>,
    #[serde(default)]
    role: RoleDesc,
    #[serde(default)]
    position: Vec3,
    #[serde(default)]
    rotation: Option<Quat>,
    #[serde(default)]
    bounds: Option<BoundsDesc>,
    #[serde(default)]
    surface: Option<SurfaceDesc>,
}

#[derive(Debug, Clone, Copy, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
enum InterpolationDesc {
    #[default]
    Linear,
    Step,
}

impl From<InterpolationDesc> for InterpolationMode {
    fn from(mode: InterpolationDesc) -> Self {
        match mode {
            InterpolationDesc::Linear => InterpolationMode::Linear,
            InterpolationDesc::Step => InterpolationMode::Step,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "target", rename_all = "lowercase")]
enum TrackDesc {
    Translation {
        node: String,
        times: Vec<f32>,
        values: Vec<Vec3>,
        #[serde(default)]
        interpolation: InterpolationDesc,
    },
    Rotation {
        node: String,
        times: Vec<f32>,
        values: Vec<Quat>,
        #[serde(default)]
        interpolation: InterpolationDesc,
    },
    Scale {
        node: String,
        times: Vec<f32>,
        values: Vec<Vec3>,
        #[serde(default)]
        interpolation: InterpolationDesc,
    },
}

impl TrackDesc {
    fn node(&self) -> &str {
        match self {
            TrackDesc::Translation { node, .. } | TrackDesc::Rotation { node, .. } | TrackDesc::Scale { node, .. } => {
                node
            }
        }
    }

    /// `(times, value count)`
    fn keys(&self) -> (&[f32], usize) {
        match self {
            TrackDesc::Translation { times, values, .. } | TrackDesc::Scale { times, values, .. } => {
                (times, values.len())
            }
            TrackDesc::Rotation { times, values, .. } => (times, values.len()),
        }
    }

    fn into_track(self) -> Track {
        match self {
            TrackDesc::Translation {
                node,
                times,
                values,
                interpolation,
            } => Track::translation(&node, KeyframeTrack::new(times, values, interpolation.into())),
            TrackDesc::Rotation {
                node,
                times,
                values,
                interpolation,
            } => {
                let values = values.into_iter().map(Quat::normalize).collect();
                Track::rotation(&node, KeyframeTrack::new(times, values, interpolation.into()))
            }
            TrackDesc::Scale {
                node,
                times,
                values,
                interpolation,
            } => Track::scale(&node, KeyframeTrack::new(times, values, interpolation.into())),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ClipDesc {
    name: String,
    tracks: Vec<TrackDesc>,
}

#[derive(Debug, Clone, Deserialize)]
struct RigDesc {
    nodes: Vec<NodeDesc>,
    #[serde(default)]
    clips: Vec<ClipDesc>,
}

impl RigDesc {
    fn validate(&self) -> std::result::Result<(), String> {
        let mut seen: Vec<&str> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if let Some(parent) = &node.parent
                && !seen.contains(&parent.as_str())
            {
                return Err(format!("node '{}' lists unknown or later parent '{parent}'", node.name));
            }
            if node.role == RoleDesc::Mesh && node.bounds.is_none() {
                return Err(format!("mesh node '{}' has no bounds", node.name));
            }
            seen.push(&node.name);
        }

        for clip in &self.clips {
            for track in &clip.tracks {
                let (times, count) = track.keys();
                if times.is_empty() || times.len() != count {
                    return Err(format!(
                        "clip '{}' track on '{}' has {} time(s) for {count} value(s)",
                        clip.name,
                        track.node(),
                        times.len()
                    ));
                }
                if times.windows(2).any(|w| w[1] < w[0]) {
                    return Err(format!("clip '{}' track on '{}' is not sorted", clip.name, track.node()));
                }
            }
        }
        Ok(())
    }
}

/// Reads actor rigs from a directory of JSON files named after the role.
#[derive(Debug, Clone)]
pub struct RigFileSource {
    dir: PathBuf,
}

impl RigFileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, role: ActorRole) -> PathBuf {
        self.dir.join(format!("{}.json", role.label()))
    }

    fn instantiate(scene: &mut Scene, role: ActorRole, rig: RigDesc) -> LoadedActor {
        let root = scene.add_node(Node::new(role.node_name()));

        let mut by_name: FxHashMap<String, NodeHandle> = FxHashMap::default();
        for desc in rig.nodes {
            let mut node = Node::with_role(&desc.name, desc.role.into());
            node.transform = Transform::from_position(desc.position);
            if let Some(rotation) = desc.rotation {
                node.transform.rotation = rotation.normalize();
            }
            node.bounds = desc.bounds.map(|b| Aabb::new(b.min, b.max));
            if let Some(surface) = desc.surface {
                node.surface = Some(scene.add_surface(Surface::new(surface.opacity, surface.transparent)));
            } else if node.role == NodeRole::Mesh {
                node.surface = Some(scene.add_surface(Surface::opaque()));
            }

            let parent = desc.parent.and_then(|p| by_name.get(&p).copied()).unwrap_or(root);
            let handle = scene.add_to_parent(node, parent);
            by_name.insert(desc.name, handle);
        }

        let clips = rig
            .clips
            .into_iter()
            .map(|clip| {
                let tracks = clip.tracks.into_iter().map(TrackDesc::into_track).collect();
                Arc::new(AnimationClip::new(clip.name, tracks))
            })
            .collect();

        LoadedActor { root, clips }
    }
}

impl ActorSource for RigFileSource {
    fn load(&mut self, scene: &mut Scene, role: ActorRole) -> Result<LoadedActor> {
        let path = self.path_for(role);
        if !path.is_file() {
            return Err(VignetteError::AssetNotFound(path.display().to_string()));
        }
        let bytes = fs::read(&path)?;
        let rig: RigDesc = serde_json::from_slice(&bytes)?;
        rig.validate().map_err(|reason| VignetteError::InvalidAsset {
            path: path.display().to_string(),
            reason,
        })?;
        Ok(Self::instantiate(scene, role, rig))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RIG: &str = r#"{
        "nodes": [
            { "name": "Hips", "role": "bone", "position": [0.0, 1.0, 0.0] },
            { "name": "Torso", "parent": "Hips", "role": "mesh",
              "bounds": { "min": [-0.2, 0.0, -0.1], "max": [0.2, 0.6, 0.1] } }
        ],
        "clips": [
            { "name": "Idle", "tracks": [
                { "target": "translation", "node": "Hips",
                  "times": [0.0, 1.0], "values": [[0.0, 1.0, 0.0], [0.0, 1.1, 0.0]] }
            ] }
        ]
    }"#;

    #[test]
    fn parses_and_instantiates() {
        let rig: RigDesc = serde_json::from_str(RIG).unwrap();
        assert!(rig.validate().is_ok());

        let mut scene = Scene::new();
        let loaded = RigFileSource::instantiate(&mut scene, ActorRole::Kicker, rig);
        let hips = scene.find_by_name(loaded.root, "Hips").unwrap();
        let torso = scene.find_by_name(loaded.root, "Torso").unwrap();
        assert_eq!(scene.get_node(torso).unwrap().parent(), Some(hips));
        assert_eq!(scene.surfaces_under(loaded.root).len(), 1);
        assert_eq!(loaded.clips.len(), 1);
        assert!((loaded.clips[0].duration - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_forward_parent_references() {
        let json = r#"{ "nodes": [ { "name": "A", "parent": "B" }, { "name": "B" } ] }"#;
        let rig: RigDesc = serde_json::from_str(json).unwrap();
        assert!(rig.validate().is_err());
    }

    #[test]
    fn missing_file_is_not_found() {
        let mut scene = Scene::new();
        let mut source = RigFileSource::new("/nonexistent/rigs");
        let err = source.load(&mut scene, ActorRole::Keeper).unwrap_err();
        assert!(matches!(err, VignetteError::AssetNotFound(_)));
        assert!(scene.nodes.is_empty());
    }
}
