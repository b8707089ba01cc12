//! egui debug overlay: read-only frame telemetry painted after the splat
//! pass.

use std::path::Path;

use egui_wgpu::ScreenDescriptor;
use winit::event::WindowEvent;
use winit::window::Window;

use splat_data::Scene;

use crate::camera::Camera;
use crate::clock::FrameClock;
use crate::renderer::{Frame, SplatRenderer};

pub struct DebugOverlay {
    ctx: egui::Context,
    state: egui_winit::State,
    painter: egui_wgpu::Renderer,
}

impl DebugOverlay {
    pub fn new(
        window: &Window,
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            window.theme(),
            None,
        );
        let painter = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);
        Self {
            ctx,
            state,
            painter,
        }
    }

    /// Forward a window event to egui; returns true when egui consumed it.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    pub fn begin_frame(&mut self, window: &Window) {
        let raw_input = self.state.take_egui_input(window);
        self.ctx.begin_pass(raw_input);
    }

    /// Build the overlay widgets. Strictly read-only: nothing here mutates
    /// the camera, scene or renderer.
    pub fn render(
        &mut self,
        camera: &Camera,
        scene: &Scene,
        renderer: &SplatRenderer,
        scene_path: Option<&Path>,
        clock: &FrameClock,
    ) {
        egui::Window::new("Debug Overlay").show(&self.ctx, |ui| {
            ui.label(format!("FPS: {:.1}", clock.fps()));
            ui.separator();

            let p = camera.position;
            let f = camera.forward();
            ui.label(format!("Camera pos: ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z));
            ui.label(format!("Yaw/Pitch:  ({:.1}, {:.1})", camera.yaw, camera.pitch));
            ui.label(format!("Forward:    ({:.2}, {:.2}, {:.2})", f.x, f.y, f.z));
            ui.separator();

            ui.label(format!("Gaussians:  {}", scene.len()));
            let path = scene_path
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(none)".to_owned());
            ui.label(format!("Scene:      {path}"));
            ui.separator();

            let (w, h) = renderer.viewport();
            ui.label(format!("Viewport:   {w} x {h}"));
            ui.label(format!("Instances:  {}", renderer.instance_count()));
            ui.label("Controls:   WASD move, Q/E down/up, hold RMB to look");
        });
    }

    /// Finish the egui pass and paint it into the current frame.
    pub fn end_frame(
        &mut self,
        window: &Window,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        frame: &mut Frame,
        viewport: (u32, u32),
    ) {
        let output = self.ctx.end_pass();
        self.state
            .handle_platform_output(window, output.platform_output);

        let paint_jobs = self
            .ctx
            .tessellate(output.shapes, output.pixels_per_point);
        let screen = ScreenDescriptor {
            size_in_pixels: [viewport.0, viewport.1],
            pixels_per_point: window.scale_factor() as f32,
        };

        for (id, delta) in &output.textures_delta.set {
            self.painter.update_texture(device, queue, *id, delta);
        }
        let callback_buffers =
            self.painter
                .update_buffers(device, queue, &mut frame.encoder, &paint_jobs, &screen);
        if !callback_buffers.is_empty() {
            queue.submit(callback_buffers);
        }

        {
            let mut pass = frame
                .encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Overlay Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &frame.view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();
            self.painter.render(&mut pass, &paint_jobs, &screen);
        }

        for id in &output.textures_delta.free {
            self.painter.free_texture(id);
        }
    }
}
