//! Window shell and input handling.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowId},
};

use splat_data::Scene;

use crate::camera::{Camera, MoveInput};
use crate::clock::FrameClock;
use crate::overlay::DebugOverlay;
use crate::renderer::SplatRenderer;

#[derive(Clone, Debug)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "splatview".to_owned(),
            width: 1280,
            height: 720,
        }
    }
}

struct App {
    config: ViewerConfig,
    scene: Scene,
    scene_path: Option<PathBuf>,

    window: Option<Arc<Window>>,
    renderer: Option<SplatRenderer>,
    overlay: Option<DebugOverlay>,

    camera: Camera,
    clock: FrameClock,

    keys_pressed: HashSet<KeyCode>,
    mouse_captured: bool,
}

impl App {
    fn new(config: ViewerConfig, scene: Scene, scene_path: Option<PathBuf>) -> Self {
        Self {
            config,
            scene,
            scene_path,
            window: None,
            renderer: None,
            overlay: None,
            camera: Camera::default(),
            clock: FrameClock::new(),
            keys_pressed: HashSet::new(),
            mouse_captured: false,
        }
    }

    fn handle_input(&mut self, dt: f32) {
        let input = MoveInput {
            forward: self.keys_pressed.contains(&KeyCode::KeyW),
            backward: self.keys_pressed.contains(&KeyCode::KeyS),
            left: self.keys_pressed.contains(&KeyCode::KeyA),
            right: self.keys_pressed.contains(&KeyCode::KeyD),
            down: self.keys_pressed.contains(&KeyCode::KeyQ),
            up: self.keys_pressed.contains(&KeyCode::KeyE),
        };
        self.camera.on_move(input, dt);
    }

    fn set_mouse_captured(&mut self, captured: bool) {
        let Some(window) = &self.window else { return };
        if captured && !self.mouse_captured {
            let grabbed = window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(err) = grabbed {
                tracing::warn!("cursor grab unavailable: {err}");
            }
            window.set_cursor_visible(false);
            self.mouse_captured = true;
        } else if !captured && self.mouse_captured {
            let _ = window.set_cursor_grab(CursorGrabMode::None);
            window.set_cursor_visible(true);
            self.mouse_captured = false;
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let dt = self.clock.tick();
        self.handle_input(dt);

        let (Some(window), Some(renderer), Some(overlay)) =
            (&self.window, &mut self.renderer, &mut self.overlay)
        else {
            return;
        };

        let mut frame = match renderer.begin_frame() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::warn!("surface lost or outdated, reconfiguring");
                let size = window.inner_size();
                renderer.resize(size.width, size.height);
                window.request_redraw();
                return;
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::warn!("surface acquire timed out, skipping frame");
                window.request_redraw();
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                tracing::error!("surface out of memory, exiting");
                event_loop.exit();
                return;
            }
        };

        let view = self.camera.view();
        let proj = self.camera.projection(renderer.aspect_ratio());
        renderer.render_scene(&mut frame, &self.scene, view, proj);

        overlay.begin_frame(window);
        overlay.render(
            &self.camera,
            &self.scene,
            renderer,
            self.scene_path.as_deref(),
            &self.clock,
        );
        overlay.end_frame(
            window,
            renderer.device(),
            renderer.queue(),
            &mut frame,
            renderer.viewport(),
        );

        renderer.end_frame(frame);
        window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .expect("failed to create window"),
        );

        // Shader or resource failures here are fatal to startup.
        let renderer = pollster::block_on(SplatRenderer::new(Arc::clone(&window)))
            .expect("failed to initialize renderer");
        let overlay = DebugOverlay::new(&window, renderer.device(), renderer.surface_format());

        self.window = Some(window);
        self.renderer = Some(renderer);
        self.overlay = Some(overlay);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let (Some(window), Some(overlay)) = (&self.window, &mut self.overlay) {
            let consumed = overlay.on_window_event(window, &event);
            if consumed && !matches!(event, WindowEvent::RedrawRequested) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size.width, size.height);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => {
                            self.keys_pressed.insert(key);
                            if key == KeyCode::Escape {
                                if self.mouse_captured {
                                    self.set_mouse_captured(false);
                                } else {
                                    event_loop.exit();
                                }
                            }
                        }
                        ElementState::Released => {
                            self.keys_pressed.remove(&key);
                        }
                    }
                }
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Right,
                ..
            } => {
                self.set_mouse_captured(state == ElementState::Pressed);
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            if self.mouse_captured {
                self.camera.on_look(dx as f32, dy as f32);
            }
        }
    }
}

/// Run the interactive viewer until the window closes.
pub fn run(scene: Scene, scene_path: Option<PathBuf>, config: ViewerConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, scene, scene_path);
    event_loop.run_app(&mut app)?;
    Ok(())
}
