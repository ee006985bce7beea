//! Window and frame loop.
//!
//! [`Viewer`] opens a window, builds the [`Scene`], and then steps and draws
//! it once per redraw. Each redraw requests the next one, so the animation
//! runs at the display's refresh rate.
//!
//! ```ignore
//! Viewer::new(SceneConfig::default().with_seed(42))
//!     .with_window_size(1600, 900)
//!     .run()?;
//! ```

use std::sync::Arc;

use tracing::{debug, error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::assets::SceneTextures;
use crate::audio::load_intro_audio;
use crate::config::SceneConfig;
use crate::error::{GpuError, ViewerError};
use crate::gpu::Renderer;
use crate::intro::{start_audio, IntroAudio, IntroEvent, IntroSequence};
use crate::scene::Scene;
use crate::time::Time;

const DEFAULT_TITLE: &str = "Nocturne";

/// Builder and entry point for the interactive viewer.
pub struct Viewer {
    config: SceneConfig,
    window_size: (u32, u32),
    title: String,
    /// Overrides the configured intro sound when set.
    audio: Option<Box<dyn IntroAudio>>,
}

impl Viewer {
    pub fn new(config: SceneConfig) -> Self {
        Self {
            config,
            window_size: (1280, 720),
            title: DEFAULT_TITLE.to_string(),
            audio: None,
        }
    }

    /// Initial inner size in logical pixels.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width.max(1), height.max(1));
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Use `audio` for the intro sound instead of `config.intro.audio`.
    pub fn with_audio(mut self, audio: impl IntroAudio + 'static) -> Self {
        self.audio = Some(Box::new(audio));
        self
    }

    /// Open the window and run until it is closed.
    pub fn run(self) -> Result<(), ViewerError> {
        self.config.validate()?;

        let textures = SceneTextures::load(&self.config.assets);
        let intro = if self.config.intro.enabled {
            IntroSequence::new(self.config.intro.text.clone())
        } else {
            IntroSequence::skipped()
        };
        let audio = match self.audio {
            Some(audio) => audio,
            None if self.config.intro.enabled => {
                load_intro_audio(self.config.intro.audio.as_deref())
            }
            None => load_intro_audio(None),
        };
        let aspect = self.window_size.0 as f32 / self.window_size.1 as f32;
        let scene = Scene::new(self.config, aspect)?;

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App {
            scene,
            textures: Some(textures),
            intro,
            audio,
            time: Time::new(),
            title: self.title,
            window_size: self.window_size,
            window: None,
            renderer: None,
            error: None,
        };
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

struct App {
    scene: Scene,
    /// Handed to the renderer once, then dropped.
    textures: Option<SceneTextures>,
    intro: IntroSequence,
    audio: Box<dyn IntroAudio>,
    time: Time,
    title: String,
    window_size: (u32, u32),
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    /// First fatal error, returned from `Viewer::run` after the loop exits.
    error: Option<ViewerError>,
}

impl App {
    fn fail(&mut self, event_loop: &ActiveEventLoop, e: ViewerError) {
        error!("{}", e);
        if self.error.is_none() {
            self.error = Some(e);
        }
        event_loop.exit();
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ViewerError> {
        let window_attrs = Window::default_attributes()
            .with_title(self.title.as_str())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.window_size.0,
                self.window_size.1,
            ));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let textures = self.textures.take().unwrap_or_default();
        let renderer = pollster::block_on(Renderer::new(window.clone(), &self.scene, &textures))
            .map_err(ViewerError::from)?;

        let size = renderer.size();
        self.scene.resize(size.width, size.height);
        info!(width = size.width, height = size.height, "Window ready");

        window.request_redraw();
        self.window = Some(window);
        self.renderer = Some(renderer);
        // The intro timeline starts with the first frame on screen
        self.time = Time::new();
        Ok(())
    }

    fn handle_intro_events(&mut self, events: Vec<IntroEvent>) {
        for event in events {
            debug!(?event, "Intro event");
            match event {
                IntroEvent::StartAudio => {
                    start_audio(self.audio.as_mut());
                }
                IntroEvent::ShowText | IntroEvent::HideText | IntroEvent::Finish => {
                    self.update_title();
                }
                IntroEvent::FadeOutOverlay => {}
            }
        }
    }

    fn update_title(&self) {
        if let Some(window) = &self.window {
            match self.intro.visible_text() {
                Some(text) => window.set_title(text),
                None => window.set_title(&self.title),
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (elapsed, delta) = self.time.update();
        self.scene.step(delta, elapsed);

        let events = self.intro.advance(self.time.elapsed_duration());
        self.handle_intro_events(events);

        let overlay_opacity = self.intro.overlay_opacity();
        let caption_opacity = self.intro.caption_opacity();
        let result = match self.renderer.as_mut() {
            Some(renderer) => renderer.render(&self.scene, overlay_opacity, caption_opacity),
            None => return,
        };
        match result {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.reconfigure();
                }
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                self.fail(event_loop, ViewerError::Gpu(GpuError::OutOfMemory));
                return;
            }
            Err(e) => warn!("Render error: {:?}", e),
        }

        if self.time.frame() % 600 == 0 {
            debug!(fps = self.time.fps(), frame = self.time.frame(), "Frame stats");
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init_window(event_loop) {
                self.fail(event_loop, e);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Window closed");
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                debug!(
                    width = physical_size.width,
                    height = physical_size.height,
                    "Resized"
                );
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(physical_size);
                }
                self.scene.resize(physical_size.width, physical_size.height);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}
