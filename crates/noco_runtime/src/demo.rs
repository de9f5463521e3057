//! Components the demo scene is built from

use noco_core::{
    define_component, Component, ComponentType, HookContext, HookResult, RegistryError,
};
use serde::{Deserialize, Serialize};

/// Rotates about a single axis at a fixed rate, advanced on physics ticks.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Spinner {
    /// Degrees per second.
    pub speed: f64,
    #[serde(skip)]
    angle: f64,
}
define_component!(Spinner);

impl Spinner {
    /// Current angle in degrees, in `[0, 360)`.
    pub fn angle(&self) -> f64 {
        self.angle
    }
}

impl Component for Spinner {
    fn start(&mut self, ctx: &HookContext<'_>) -> HookResult {
        tracing::info!(owner = ctx.owner().name(), speed = self.speed, "spinner started");
        Ok(())
    }

    fn fixed_update(&mut self, _ctx: &HookContext<'_>, delta: f64) -> HookResult {
        self.angle = (self.angle + self.speed * delta).rem_euclid(360.0);
        Ok(())
    }

    fn on_destroy(&mut self, ctx: &HookContext<'_>) -> HookResult {
        tracing::debug!(owner = ctx.owner().name(), angle = self.angle, "spinner stopped");
        Ok(())
    }
}

/// Says hello to its owner once the scene is running.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Greeter {
    pub greeting: String,
}
define_component!(Greeter);

impl Default for Greeter {
    fn default() -> Self {
        Self {
            greeting: "Hello".to_string(),
        }
    }
}

impl Component for Greeter {
    fn start(&mut self, ctx: &HookContext<'_>) -> HookResult {
        if self.greeting.is_empty() {
            anyhow::bail!("greeter on {} has nothing to say", ctx.owner().name());
        }
        tracing::info!("{}, {}!", self.greeting, ctx.owner().name());
        Ok(())
    }
}

/// Counts the frames it was enabled for.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FrameCounter {
    #[serde(skip)]
    frames: u64,
}
define_component!(FrameCounter);

impl FrameCounter {
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Component for FrameCounter {
    fn update(&mut self, _ctx: &HookContext<'_>, _delta: f64) -> HookResult {
        self.frames += 1;
        Ok(())
    }

    fn on_destroy(&mut self, ctx: &HookContext<'_>) -> HookResult {
        tracing::info!(owner = ctx.owner().name(), frames = self.frames, "frame counter");
        Ok(())
    }
}

pub fn register_demo_components() -> Result<(), RegistryError> {
    Spinner::ensure_registered()?;
    Greeter::ensure_registered()?;
    FrameCounter::ensure_registered()?;
    Ok(())
}
