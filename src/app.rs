//! Window/context bootstrap and the per-frame event loop.
//!
//! One window, one OpenGL 3.3 core context. Each `RedrawRequested` runs a
//! full frame and `about_to_wait` immediately schedules the next one, so the
//! loop is paced only by the vsync wait inside the buffer swap.

use std::num::NonZeroU32;
use std::sync::Arc;

use anyhow::{anyhow, Context as _, Result};
use glutin::config::{ConfigTemplateBuilder, GlConfig as _};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext as _,
    PossiblyCurrentContext, Version,
};
use glutin::display::{GetGlDisplay as _, GlDisplay as _};
use glutin::surface::{
    GlSurface as _, Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface,
};
use glutin_winit::{DisplayBuilder, GlWindow as _};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::raw_window_handle::HasWindowHandle as _;
use winit::window::{Window, WindowId};

use crate::config::Config;
use crate::geometry::FigureMesh;
use crate::input::InputState;
use crate::render::FigureRenderer;
use crate::transform::{aspect_scale, SceneTransform};

/// Open the window and run the render loop until close is requested.
///
/// # Errors
///
/// Returns an error if the event loop, window, GL context, surface, or GPU
/// resources cannot be created. Callers treat this as fatal.
pub fn run(config: Config) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to create the event loop")?;
    let mut app = App::new(config);

    event_loop
        .run_app(&mut app)
        .context("event loop terminated abnormally")?;

    match app.init_error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Everything that exists only while the window is alive.
///
/// Field order doubles as drop order: GPU handles are released explicitly
/// in [`App::exiting`], then the surface and context unwind before the
/// window they were created from.
struct GlState {
    renderer: FigureRenderer,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
    /// Current drawable size, feeding the viewport and the aspect scale.
    size: PhysicalSize<u32>,
}

/// The application: configuration, input/transform state, and the GL
/// resources once [`resumed`](ApplicationHandler::resumed) has created them.
struct App {
    config: Config,
    input: InputState,
    transform: SceneTransform,
    gl_state: Option<GlState>,
    /// Bootstrap failure, carried out of the event loop for the fatal-exit
    /// path (`resumed` cannot return an error itself).
    init_error: Option<anyhow::Error>,
}

impl App {
    fn new(config: Config) -> Self {
        Self {
            config,
            input: InputState::default(),
            transform: SceneTransform::new(),
            gl_state: None,
            init_error: None,
        }
    }

    /// Create the window, GL context, surface, and renderer.
    fn init_gl(&self, event_loop: &ActiveEventLoop) -> Result<GlState> {
        let window_attributes = Window::default_attributes()
            .with_title(self.config.title.as_str())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        let template = ConfigTemplateBuilder::new();
        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(window_attributes))
            .build(event_loop, template, pick_gl_config)
            .map_err(|err| anyhow!("failed to create the window: {err}"))?;
        let window = window.context("display builder returned no window")?;

        let raw_window_handle = window
            .window_handle()
            .context("failed to get a window handle")?
            .as_raw();
        let gl_display = gl_config.display();

        // OpenGL 3.3 core, no fallback.
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .build(Some(raw_window_handle));

        let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
            .context("failed to create an OpenGL 3.3 core context")?;

        let surface_attributes = window
            .build_surface_attributes(SurfaceAttributesBuilder::new())
            .context("failed to describe the window surface")?;
        let surface = unsafe { gl_display.create_window_surface(&gl_config, &surface_attributes) }
            .context("failed to create the window surface")?;

        let context = not_current
            .make_current(&surface)
            .context("failed to make the GL context current")?;

        if let Err(err) = surface.set_swap_interval(&context, SwapInterval::Wait(NonZeroU32::MIN))
        {
            log::warn!("could not enable vsync: {err}");
        }

        let gl = Arc::new(unsafe {
            glow::Context::from_loader_function_cstr(|symbol| gl_display.get_proc_address(symbol))
        });

        let mesh = FigureMesh::builtin();
        let renderer = unsafe { FigureRenderer::new(gl, &mesh) }
            .map_err(|err| anyhow!("failed to create GPU resources: {err}"))?;

        let size = window.inner_size();
        unsafe { renderer.set_viewport(size.width, size.height) };

        log::info!(
            "opened {}x{} window with an OpenGL 3.3 core context",
            size.width,
            size.height,
        );

        Ok(GlState {
            renderer,
            surface,
            context,
            window,
            size,
        })
    }

    /// Resize the GL surface and viewport to the new drawable dimensions.
    fn handle_resize(&mut self, size: PhysicalSize<u32>) {
        let Some(state) = self.gl_state.as_mut() else {
            return;
        };
        // Zero-sized surfaces are rejected on EGL; skip until restored.
        let (Some(width), Some(height)) =
            (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return;
        };

        state.surface.resize(&state.context, width, height);
        unsafe { state.renderer.set_viewport(size.width, size.height) };
        state.size = size;
    }

    /// One frame: poll input, draw, present.
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(state) = self.gl_state.as_ref() else {
            return;
        };

        // INPUT. Escape lets the current frame finish; the loop stops at the
        // next check, like a should-close flag.
        let close_requested = self.input.close_requested();
        self.input.apply_movement(&mut self.transform);

        // DRAW. The aspect scale is recomputed every frame from the current
        // window dimensions.
        let scale = aspect_scale(state.size.width, state.size.height);
        unsafe { state.renderer.draw(scale, &self.transform.to_uniform()) };

        // PRESENT. Blocks on vsync while the swap interval is active.
        if let Err(err) = state.surface.swap_buffers(&state.context) {
            log::error!("failed to present the frame: {err}");
        }

        if close_requested {
            event_loop.exit();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gl_state.is_some() {
            return;
        }

        match self.init_gl(event_loop) {
            Ok(state) => {
                event_loop.set_control_flow(ControlFlow::Poll);
                self.gl_state = Some(state);
            }
            Err(err) => {
                self.init_error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => self.handle_resize(size),
            WindowEvent::Focused(focused) => self.input.focus_changed(focused),
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.input.key_changed(code, event.state);
                }
            }
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.gl_state {
            state.window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = self.gl_state.take() {
            // The context is still current here. GPU objects go first; the
            // surface, context, and window then unwind through their drops.
            unsafe { state.renderer.destroy() };
        }
    }
}

/// Choose the GL framebuffer config with the fewest samples; the scene
/// renders into a plain, non-multisampled default framebuffer.
///
/// # Panics
///
/// Panics if the display offers no matching configs at all, which the
/// display builder treats as a build failure before this runs.
fn pick_gl_config(
    configs: Box<dyn Iterator<Item = glutin::config::Config> + '_>,
) -> glutin::config::Config {
    configs
        .reduce(|best, candidate| {
            if candidate.num_samples() < best.num_samples() {
                candidate
            } else {
                best
            }
        })
        .expect("GL display offered no framebuffer configs")
}
