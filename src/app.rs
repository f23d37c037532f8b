//! Application shell: window, event loop, and the glue between winit events
//! and the editor core.
//!
//! Pointer handling is deliberately thin. Cursor motion is converted into
//! window-fraction deltas and fed to the tool engine while a drag is
//! engaged; everything with semantics lives behind
//! [`dispatch`](crate::editor::command::dispatch) and the tool engine.

use std::sync::Arc;
use std::time::Instant;

use cgmath::Vector2;
use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, ModifiersState, PhysicalKey},
    window::{Window, WindowAttributes},
};

use crate::{
    assets::AssetLibrary,
    editor::{
        command::{self, Command},
        DispatchOutcome, EditorContext, Menu,
    },
    gfx::RenderEngine,
    ui::{self, UiManager},
};

const WINDOW_TITLE: &str = "brae scene editor";

/// The editor application. Owns the event loop until [`run`](BraeApp::run)
/// consumes it.
pub struct BraeApp {
    event_loop: Option<EventLoop<()>>,
    state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    assets: AssetLibrary,
    ctx: Option<EditorContext>,

    /// Menu selections produced by the UI pass, drained after each frame.
    selections: Vec<(Menu, u32)>,
    cursor: Vector2<f32>,
    dragging: bool,
    modifiers: ModifiersState,

    frames: u32,
    last_title: Instant,
}

impl BraeApp {
    /// Creates the application with the given asset library.
    pub fn new(assets: AssetLibrary) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        Ok(Self {
            event_loop: Some(event_loop),
            state: AppState {
                window: None,
                render_engine: None,
                ui_manager: None,
                assets,
                ctx: None,
                selections: Vec::new(),
                cursor: Vector2::new(0.0, 0.0),
                dragging: false,
                modifiers: ModifiersState::empty(),
                frames: 0,
                last_title: Instant::now(),
            },
        })
    }

    /// Runs the event loop to completion.
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .ok_or_else(|| anyhow::anyhow!("event loop already consumed"))?;
        event_loop.run_app(&mut self.state)?;
        Ok(())
    }
}

impl AppState {
    /// Decodes and applies one menu selection; exits the loop on a fatal
    /// error or an explicit exit command.
    fn apply_selection(&mut self, event_loop: &ActiveEventLoop, menu: Menu, id: u32) {
        let Some(ctx) = self.ctx.as_mut() else {
            return;
        };
        let outcome = Command::from_menu(menu, id).and_then(|cmd| command::dispatch(ctx, cmd));
        match outcome {
            Ok(DispatchOutcome::Continue) => {}
            Ok(DispatchOutcome::Exit) => {
                info!("exit requested");
                event_loop.exit();
            }
            Err(err) => {
                error!("command failed: {err}");
                if err.is_fatal() {
                    event_loop.exit();
                }
            }
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: KeyCode) {
        let alt = self.modifiers.alt_key();
        let Some(ctx) = self.ctx.as_mut() else {
            return;
        };
        match key {
            KeyCode::Escape => event_loop.exit(),
            KeyCode::KeyA => ctx.store.select_previous(),
            KeyCode::KeyD => ctx.store.select_next(),
            KeyCode::ArrowUp if alt => ctx.camera.zoom_in(),
            KeyCode::ArrowDown if alt => ctx.camera.zoom_out(),
            KeyCode::KeyW if alt => ctx.camera.zoom_in(),
            KeyCode::KeyS if alt => ctx.camera.zoom_out(),
            _ => {}
        }
    }

    fn handle_cursor_moved(&mut self, x: f32, y: f32) {
        let delta = Vector2::new(x, y) - self.cursor;
        self.cursor = Vector2::new(x, y);
        let dragging = self.dragging;
        let Some(ctx) = self.ctx.as_mut() else {
            return;
        };
        ctx.pointer_ground = ctx.camera.ground_point_under_pointer(x, y);

        if dragging {
            let (width, height) = ctx.camera.viewport();
            if width > 0.0 && height > 0.0 {
                let raw = Vector2::new(delta.x / width, delta.y / height);
                let EditorContext {
                    store,
                    camera,
                    tools,
                    ..
                } = ctx;
                tools.pointer_delta(raw, store, camera);
            }
        }
    }

    fn refresh_title(&mut self) {
        self.frames += 1;
        let elapsed = self.last_title.elapsed();
        if elapsed.as_secs_f32() < 1.0 {
            return;
        }
        if let (Some(window), Some(ctx)) = (self.window.as_ref(), self.ctx.as_ref()) {
            let fps = self.frames as f32 / elapsed.as_secs_f32();
            let (width, height) = ctx.camera.viewport();
            window.set_title(&format!(
                "{WINDOW_TITLE} - {}x{} - {fps:.0} fps - {} objects",
                width as u32,
                height as u32,
                ctx.store.count()
            ));
        }
        self.frames = 0;
        self.last_title = Instant::now();
    }

    fn redraw(&mut self) {
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };
        let Some(window) = self.window.as_ref() else {
            return;
        };
        let Some(ctx) = self.ctx.as_ref() else {
            return;
        };

        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let mesh_names: Vec<String> = self.assets.mesh_names().map(str::to_owned).collect();
            let texture_names: Vec<String> =
                self.assets.texture_names().map(str::to_owned).collect();
            let selections = &mut self.selections;

            ui_manager.update_logic(window, |frame| {
                ui::build_menu_bar(frame, &mesh_names, &texture_names, selections);
            });
            render_engine.render_frame(
                &ctx.store,
                &ctx.camera,
                &self.assets,
                Some(|device: &wgpu::Device,
                      queue: &wgpu::Queue,
                      encoder: &mut wgpu::CommandEncoder,
                      view: &wgpu::TextureView| {
                    ui_manager.render_display_only(device, queue, encoder, view);
                }),
            );
        } else {
            render_engine.render_frame(
                &ctx.store,
                &ctx.camera,
                &self.assets,
                None::<fn(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView)>,
            );
        }

        self.refresh_title();
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let Ok(window) = event_loop.create_window(
            WindowAttributes::default()
                .with_title(WINDOW_TITLE)
                .with_inner_size(winit::dpi::LogicalSize::new(1200, 800)),
        ) else {
            error!("window creation failed");
            event_loop.exit();
            return;
        };
        let window = Arc::new(window);
        self.window = Some(window.clone());

        let (width, height) = window.inner_size().into();
        let renderer = pollster::block_on(RenderEngine::new(window.clone(), width, height));
        let ui_manager = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window,
        );

        match EditorContext::new(self.assets.catalog_info(), width, height) {
            Ok(ctx) => self.ctx = Some(ctx),
            Err(err) => {
                error!("editor startup failed: {err}");
                event_loop.exit();
                return;
            }
        }

        self.ui_manager = Some(ui_manager);
        self.render_engine = Some(renderer);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        // UI input capture takes priority over scene interaction.
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let ui_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
                window_id,
                event: event.clone(),
            };
            if ui_manager.handle_input(&window, &ui_event) {
                if self.dragging {
                    self.dragging = false;
                    if let Some(ctx) = self.ctx.as_mut() {
                        ctx.tools.end_drag();
                    }
                }
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
            }
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                self.handle_key(event_loop, key);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.handle_cursor_moved(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if matches!(button, MouseButton::Left | MouseButton::Middle) {
                    if let Some(ctx) = self.ctx.as_mut() {
                        match state {
                            ElementState::Pressed => {
                                self.dragging = true;
                                ctx.tools.begin_drag();
                            }
                            ElementState::Released => {
                                self.dragging = false;
                                ctx.tools.end_drag();
                            }
                        }
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if let Some(ctx) = self.ctx.as_mut() {
                    let steps = match delta {
                        MouseScrollDelta::LineDelta(_, y) => y,
                        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 20.0,
                    };
                    if steps > 0.0 {
                        ctx.camera.zoom_in();
                    } else if steps < 0.0 {
                        ctx.camera.zoom_out();
                    }
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(ctx) = self.ctx.as_mut() {
                    ctx.camera.resize(width, height);
                }
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    ui_manager.update_display_size(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
                // Menu clicks recorded during the UI pass apply now.
                let pending: Vec<(Menu, u32)> = self.selections.drain(..).collect();
                for (menu, id) in pending {
                    self.apply_selection(event_loop, menu, id);
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        if self.dragging {
            self.dragging = false;
            if let Some(ctx) = self.ctx.as_mut() {
                ctx.tools.end_drag();
            }
        }
        warn!("suspended; drag state cleared");
    }
}
