//! Tree nodes that carry a component list
//!
//! `ComponentsNode` pairs a scene node with its controller and forwards the
//! host tree's lifecycle notifications to it.

use noco_core::{ComponentsController, ControllerError, ControllerSettings, LifecycleState};
use noco_services::{NodeKind, SceneNode};
use std::cell::RefCell;
use std::rc::Rc;

pub struct ComponentsNode {
    node: Rc<RefCell<SceneNode>>,
    components: ComponentsController,
}

impl ComponentsNode {
    /// Bind a controller to `node` and load whatever the node persisted.
    pub fn new(node: SceneNode, settings: ControllerSettings) -> Result<Self, ControllerError> {
        let node = node.into_ref();
        let mut components = ComponentsController::new(settings);
        components.initialize(node.clone())?;
        Ok(Self { node, components })
    }

    pub fn name(&self) -> String {
        self.node.borrow().name.clone()
    }

    pub fn kind(&self) -> NodeKind {
        self.node.borrow().kind
    }

    pub fn components(&self) -> &ComponentsController {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut ComponentsController {
        &mut self.components
    }

    /// Re-binds first when the node comes back after leaving the tree.
    pub fn enter_tree(&mut self) -> Result<(), ControllerError> {
        if self.components.state() == LifecycleState::Disposed {
            self.components.initialize(self.node.clone())?;
        }
        self.components.enter_tree()
    }

    pub fn ready(&mut self) -> Result<(), ControllerError> {
        self.components.ready()
    }

    pub fn process(&mut self, delta: f64) -> Result<(), ControllerError> {
        self.components.process(delta)
    }

    pub fn physics_process(&mut self, delta: f64) -> Result<(), ControllerError> {
        self.components.physics_process(delta)
    }

    pub fn exit_tree(&mut self) -> Result<(), ControllerError> {
        self.components.exit_tree()
    }

    /// Persisted state of the node, including its component records.
    pub fn scene_node(&self) -> SceneNode {
        self.node.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::{register_demo_components, FrameCounter, Spinner};

    fn spinner_node() -> ComponentsNode {
        register_demo_components().unwrap();
        let mut node = ComponentsNode::new(
            SceneNode::new("Cube", NodeKind::Node3D),
            ControllerSettings::live(),
        )
        .unwrap();
        node.components_mut().add_component::<Spinner>().unwrap().speed = 90.0;
        node.components_mut().apply_components().unwrap();
        node
    }

    #[test]
    fn forwards_tree_lifecycle() {
        let mut node = spinner_node();
        node.enter_tree().unwrap();
        node.ready().unwrap();
        node.physics_process(0.5).unwrap();
        node.process(0.016).unwrap();

        let spinner = node.components().get_component::<Spinner>().unwrap();
        assert_eq!(spinner.angle(), 45.0);
        assert_eq!(node.components().state(), LifecycleState::Live);

        node.exit_tree().unwrap();
        assert_eq!(node.components().state(), LifecycleState::Disposed);
        assert!(node.components().is_empty());
    }

    #[test]
    fn re_entering_the_tree_reloads_persisted_components() {
        let mut node = spinner_node();
        node.components_mut().add_component::<FrameCounter>().unwrap();
        node.enter_tree().unwrap();
        node.exit_tree().unwrap();

        node.enter_tree().unwrap();
        assert_eq!(node.components().count(), 1);
        assert_eq!(node.components().get_component::<Spinner>().unwrap().speed, 90.0);
    }

    #[test]
    fn scene_node_carries_component_records() {
        let node = spinner_node();
        let saved = node.scene_node();
        assert_eq!(saved.name, "Cube");
        assert_eq!(saved.kind, NodeKind::Node3D);

        let reloaded = ComponentsNode::new(saved, ControllerSettings::live()).unwrap();
        assert_eq!(reloaded.components().count(), 1);
        assert_eq!(reloaded.kind(), NodeKind::Node3D);
    }
}
