//! Node Components Runtime
//!
//! Loads (or builds) the demo scene, runs it for a fixed number of frames
//! and writes it back to the save file.

mod clock;
mod demo;
mod node;

use anyhow::{Context, Result};
use clock::{FrameClock, TICK_DURATION};
use demo::{register_demo_components, FrameCounter, Greeter, Spinner};
use node::ComponentsNode;
use noco_core::ControllerSettings;
use noco_services::{NodeKind, SceneNode, SceneSave, Settings};
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const FRAME_COUNT: u32 = 120;
const FRAME_TIME: Duration = Duration::from_micros(33_333);

fn main() -> Result<()> {
    let settings = Settings::load("noco.json")?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Node Components Runtime v{}", noco_core::VERSION);
    register_demo_components()?;

    let mut nodes = load_scene(&settings.save.path, settings.controller)?;
    for node in &mut nodes {
        node.enter_tree()?;
    }
    for node in &mut nodes {
        node.ready()?;
    }

    let mut clock = FrameClock::new();
    for _ in 0..FRAME_COUNT {
        let ticks = clock.advance(FRAME_TIME);
        for node in &mut nodes {
            for _ in 0..ticks {
                node.physics_process(TICK_DURATION.as_secs_f64())?;
            }
            node.process(FRAME_TIME.as_secs_f64())?;
        }
    }
    tracing::info!(
        frames = clock.frame_count(),
        ticks = clock.tick_count(),
        "simulation finished"
    );

    report_metrics(&nodes);

    let mut saved = Vec::with_capacity(nodes.len());
    for node in &mut nodes {
        node.components_mut().apply_components()?;
        saved.push(node.scene_node());
        node.exit_tree()?;
    }
    SceneSave::new(saved)
        .write(&settings.save.path)
        .with_context(|| format!("writing scene to {}", settings.save.path.display()))?;

    tracing::info!("Runtime shut down");
    Ok(())
}

/// Nodes from the save file, or the built-in demo scene on first run.
fn load_scene(path: &Path, settings: ControllerSettings) -> Result<Vec<ComponentsNode>> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "no save file, building demo scene");
        return build_demo_scene(settings);
    }

    let save = SceneSave::read(path)?;
    tracing::info!(path = %path.display(), nodes = save.nodes.len(), "scene loaded");
    save.nodes
        .into_iter()
        .map(|node| ComponentsNode::new(node, settings).map_err(anyhow::Error::from))
        .collect()
}

fn build_demo_scene(settings: ControllerSettings) -> Result<Vec<ComponentsNode>> {
    let mut cube = ComponentsNode::new(SceneNode::new("Cube", NodeKind::Node3D), settings)?;
    {
        let components = cube.components_mut();
        components.add_component::<Spinner>()?.speed = 90.0;
        components.add_component::<Greeter>()?;
        components.apply_components()?;
    }

    let mut hud = ComponentsNode::new(SceneNode::new("Hud", NodeKind::Control), settings)?;
    {
        let components = hud.components_mut();
        components.add_component::<Greeter>()?.greeting = "Welcome".to_string();
        components.add_component::<FrameCounter>()?;
        components.apply_components()?;
    }

    Ok(vec![cube, hud])
}

fn report_metrics(nodes: &[ComponentsNode]) {
    for node in nodes {
        let components = node.components();
        let profiler = components.profiler();
        let hooks = components.hook_counter();
        tracing::info!(
            node = %node.name(),
            kind = ?node.kind(),
            update_avg = ?profiler.average("update"),
            fixed_update_avg = ?profiler.average("fixed_update"),
            updates = hooks.stats("update").calls,
            fixed_updates = hooks.stats("fixed_update").calls,
            failures = hooks.total_failures(),
            "hook metrics"
        );
    }
}
