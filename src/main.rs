use dendrite::constants::{FPS_UPDATE_INTERVAL_SECS, TELEMETRY_LOG_INTERVAL_SECS};
use dendrite::renderer::Renderer;
use dendrite::{AggregationEngine, InputEvent, SimulationConfig, Telemetry};
use glam::DVec2;
use std::{sync::Arc, time::Instant};
use winit::{
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, Event, MouseButton, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

// --- Main Function ---
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let config = SimulationConfig::default();
    let grid_size = (config.grid_width, config.grid_height);
    let mut engine = AggregationEngine::new(config)?;

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Dendrite")
            .with_inner_size(PhysicalSize::new(grid_size.0, grid_size.1))
            .build(&event_loop)?,
    );
    let mut renderer = pollster::block_on(Renderer::new(
        window.clone(),
        grid_size,
        engine.initial_total(),
    ))?;

    let mut cursor: Option<PhysicalPosition<f64>> = None;
    let mut pointer_held = false;
    let mut last_fps_update_time = Instant::now();
    let mut last_telemetry_log_time = Instant::now();
    let mut frames_since_last_fps_update = 0;
    let mut current_fps = 0.0;

    event_loop.run(move |event, elwt: &EventLoopWindowTarget<()>| {
        elwt.set_control_flow(ControlFlow::Poll);
        match event {
            Event::AboutToWait => window.request_redraw(),
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => elwt.exit(),
                WindowEvent::Resized(physical_size) => renderer.resize(physical_size),
                WindowEvent::ScaleFactorChanged { .. } => renderer.resize(window.inner_size()),
                WindowEvent::CursorMoved { position, .. } => cursor = Some(position),
                WindowEvent::CursorLeft { .. } => cursor = None,
                WindowEvent::MouseInput {
                    state,
                    button: MouseButton::Left,
                    ..
                } => pointer_held = state == ElementState::Pressed,
                WindowEvent::KeyboardInput {
                    event: key_event, ..
                } => {
                    if key_event.state == ElementState::Pressed && !key_event.repeat {
                        let input = match key_event.physical_key {
                            PhysicalKey::Code(KeyCode::KeyZ) => Some(InputEvent::ToggleDisplayMode),
                            PhysicalKey::Code(KeyCode::KeyC) => Some(InputEvent::ClearWalkers),
                            PhysicalKey::Code(KeyCode::Space) => Some(InputEvent::TogglePause),
                            PhysicalKey::Code(KeyCode::KeyR) => Some(InputEvent::Restart),
                            PhysicalKey::Code(KeyCode::ArrowUp) => {
                                Some(InputEvent::AdjustAttempts { increase: true })
                            }
                            PhysicalKey::Code(KeyCode::ArrowDown) => {
                                Some(InputEvent::AdjustAttempts { increase: false })
                            }
                            PhysicalKey::Code(KeyCode::Escape) => {
                                elwt.exit();
                                None
                            }
                            _ => None,
                        };
                        if let Some(input) = input {
                            engine.handle_input(input);
                        }
                    }
                }
                WindowEvent::RedrawRequested => {
                    if pointer_held {
                        if let Some(position) = cursor {
                            let grid = window_to_grid(position, renderer.size(), grid_size);
                            engine.handle_input(InputEvent::PointerHeld {
                                x: grid.x,
                                y: grid.y,
                            });
                        }
                    }
                    engine.tick();

                    frames_since_last_fps_update += 1;
                    let now = Instant::now();
                    let elapsed_secs = now.duration_since(last_fps_update_time).as_secs_f64();
                    if elapsed_secs >= FPS_UPDATE_INTERVAL_SECS {
                        current_fps = frames_since_last_fps_update as f64 / elapsed_secs;
                        last_fps_update_time = now;
                        frames_since_last_fps_update = 0;
                    }
                    match renderer.render(&engine.view()) {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            renderer.reconfigure()
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("WGPU Error: OutOfMemory");
                            elwt.exit();
                        }
                        Err(e) => log::warn!("WGPU Error: {:?}", e),
                    }

                    let telemetry = engine.telemetry();
                    window.set_title(&title(&telemetry, current_fps));
                    if now.duration_since(last_telemetry_log_time).as_secs_f64()
                        >= TELEMETRY_LOG_INTERVAL_SECS
                    {
                        last_telemetry_log_time = now;
                        log::info!(
                            "iteration {}: {} frozen, {} walking, {} spawned, {} cleared, {:.1} fps",
                            telemetry.iteration,
                            telemetry.aggregate_len,
                            telemetry.walker_len,
                            telemetry.spawned,
                            telemetry.cleared,
                            current_fps
                        );
                    }
                }
                _ => {}
            },
            _ => {}
        }
    })?;
    Ok(())
}

// --- Helper Functions ---

/// Window pixels to grid coordinates; the grid is stretched over the whole surface.
fn window_to_grid(
    position: PhysicalPosition<f64>,
    window_size: PhysicalSize<u32>,
    grid_size: (u32, u32),
) -> DVec2 {
    let window = DVec2::new(
        f64::from(window_size.width.max(1)),
        f64::from(window_size.height.max(1)),
    );
    let grid = DVec2::new(f64::from(grid_size.0), f64::from(grid_size.1));
    DVec2::new(position.x, position.y) / window * grid
}

fn title(telemetry: &Telemetry, fps: f64) -> String {
    let paused_text = if telemetry.paused { " [PAUSED]" } else { "" };
    format!(
        "Dendrite - Frozen: {}, Walking: {} - Attempts: {} - FPS: {:.1}{}",
        telemetry.aggregate_len,
        telemetry.walker_len,
        telemetry.attempts_per_tick,
        fps,
        paused_text
    )
}
