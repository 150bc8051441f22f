//! Host services: rendering, audio and input
//!
//! The simulation only talks to the outside world through these traits.
//! The `Null*` implementations let it run headless.

use ranch_math::{Mat4, Vec3};

pub trait Renderer {
    fn render_mesh(&mut self, mesh: &str, texture: Option<&str>, model: &Mat4);
}

pub trait AudioSink {
    /// Play a named sound, positioned when `position` is given
    fn play_sound(&mut self, name: &str, position: Option<Vec3>);
}

/// Polled once per frame by the input stage
pub trait InputSource {
    /// Named action, e.g. `"fire"`
    fn get_action(&self, action: &str) -> bool;

    /// Key code, e.g. `"KeyR"` or `"Digit2"`
    fn is_key_pressed(&self, key: &str) -> bool;

    /// Desired player velocity in units per second
    fn movement(&self) -> Vec3 {
        Vec3::ZERO
    }

    /// Aim direction; `None` keeps the current facing
    fn aim(&self) -> Option<Vec3> {
        None
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render_mesh(&mut self, _mesh: &str, _texture: Option<&str>, _model: &Mat4) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play_sound(&mut self, _name: &str, _position: Option<Vec3>) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullInput;

impl InputSource for NullInput {
    fn get_action(&self, _action: &str) -> bool {
        false
    }

    fn is_key_pressed(&self, _key: &str) -> bool {
        false
    }
}

/// The services one game instance runs against
pub struct Services {
    pub renderer: Box<dyn Renderer>,
    pub audio: Box<dyn AudioSink>,
    pub input: Box<dyn InputSource>,
}

impl Services {
    pub fn new(
        renderer: impl Renderer + 'static,
        audio: impl AudioSink + 'static,
        input: impl InputSource + 'static,
    ) -> Self {
        Self {
            renderer: Box::new(renderer),
            audio: Box::new(audio),
            input: Box::new(input),
        }
    }

    /// No output, no input
    pub fn headless() -> Self {
        Self::new(NullRenderer, NullAudio, NullInput)
    }

    pub fn with_audio(mut self, audio: impl AudioSink + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }

    pub fn with_input(mut self, input: impl InputSource + 'static) -> Self {
        self.input = Box::new(input);
        self
    }

    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }
}

impl Default for Services {
    fn default() -> Self {
        Self::headless()
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}
