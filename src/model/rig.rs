use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::controller::input::ActionAsset;
use crate::controller::motion::Dependencies;
use crate::controller::physics::KinematicBody;
use crate::model::Camera;

/// Node hanging off a rig. Cameras can sit at any depth.
pub enum RigNode {
    Camera(Rc<RefCell<Camera>>),
    Group { name: String, children: Vec<RigNode> },
}

impl RigNode {
    pub fn group(name: &str, children: Vec<RigNode>) -> Self {
        RigNode::Group { name: name.to_string(), children }
    }

    fn find_camera(&self) -> Option<Rc<RefCell<Camera>>> {
        match self {
            RigNode::Camera(cam) => Some(cam.clone()),
            RigNode::Group { children, .. } => children.iter().find_map(RigNode::find_camera),
        }
    }
}

/// A character body plus whatever is attached to it. Convenience layer for
/// hosts that want the camera looked up instead of passing it explicitly.
pub struct Rig {
    pub body: Rc<RefCell<KinematicBody>>,
    pub children: Vec<RigNode>,
}

impl Rig {
    pub fn new(body: KinematicBody) -> Self {
        Self { body: Rc::new(RefCell::new(body)), children: Vec::new() }
    }

    pub fn with_child(mut self, node: RigNode) -> Self {
        self.children.push(node);
        self
    }

    /// First camera found depth-first among the children
    pub fn find_camera(&self) -> Option<Rc<RefCell<Camera>>> {
        self.children.iter().find_map(RigNode::find_camera)
    }

    /// Build controller dependencies, preferring an explicitly assigned camera
    pub fn dependencies<'a>(
        &self,
        actions: Option<&'a mut ActionAsset>,
        explicit_camera: Option<&Rc<RefCell<Camera>>>,
    ) -> Dependencies<'a> {
        let mut deps = Dependencies::new().with_body(&self.body);
        if let Some(actions) = actions {
            deps = deps.with_actions(actions);
        }

        let camera = explicit_camera.cloned().or_else(|| self.find_camera());
        match camera {
            Some(cam) => {
                debug!(explicit = explicit_camera.is_some(), "camera resolved for rig");
                deps.with_orientation(&cam)
            }
            None => {
                warn!("camera not found, assign a camera manually");
                deps
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_finds_nested_camera() {
        let cam = Rc::new(RefCell::new(Camera::new()));
        let rig = Rig::new(KinematicBody::new(Vec3::ZERO)).with_child(RigNode::group(
            "head",
            vec![RigNode::group("visor", vec![]), RigNode::Camera(cam.clone())],
        ));
        let found = rig.find_camera().unwrap();
        assert!(Rc::ptr_eq(&found, &cam));
    }

    #[test]
    fn test_no_camera() {
        let rig = Rig::new(KinematicBody::new(Vec3::ZERO)).with_child(RigNode::group("empty", vec![]));
        assert!(rig.find_camera().is_none());
        assert!(!rig.dependencies(None, None).has_orientation());
    }

    #[test]
    fn test_explicit_camera_wins() {
        let child = Rc::new(RefCell::new(Camera::new()));
        let explicit = Rc::new(RefCell::new(Camera::new()));
        let rig = Rig::new(KinematicBody::new(Vec3::ZERO)).with_child(RigNode::Camera(child.clone()));
        let deps = rig.dependencies(None, Some(&explicit));
        assert!(deps.has_orientation());
        assert_eq!(Rc::weak_count(&explicit), 1);
        assert_eq!(Rc::weak_count(&child), 0);
    }
}
