mod audio;
mod keymap;

use std::{path::PathBuf, process::ExitCode, sync::Arc, time};

use anyhow::Context;
use chip8::Chip8;
use clap::Parser;
use log::{debug, error, info, warn};
use pixels::{Pixels, SurfaceTexture};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{self, EventLoop},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::Window,
};

use crate::audio::Beeper;
use crate::keymap::map_key;

const FRAME_INTERVAL: time::Duration = time::Duration::new(0, 1_000_000_000u32 / chip8::TIMER_HZ);

struct AppConfig {
    pub window: winit::window::WindowAttributes,
    pub args: Args,
}

impl AppConfig {
    pub fn new(args: Args) -> Self {
        Self {
            window: Window::default_attributes()
                .with_title("CHIP-8")
                .with_inner_size(LogicalSize::new(
                    (chip8::SCREEN_WIDTH as u32) * args.scale,
                    (chip8::SCREEN_HEIGHT as u32) * args.scale,
                ))
                .with_resizable(false),
            args,
        }
    }
}

struct State {
    pub(crate) window: Arc<Window>,
    pub(crate) pixels: Pixels<'static>,
}

struct App {
    config: AppConfig,
    chip8: Chip8,
    beeper: Option<Beeper>,
    state: Option<State>,
}

impl App {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let mut chip8 = Chip8::new()
            .clock_hz(config.args.clock)
            .legacy_shift(config.args.legacy_shift)
            .jump_add_offset(config.args.jump_add_offset)
            .memory_increment_i(config.args.memory_increment_i);

        chip8
            .load_rom_from_file(&config.args.rom)
            .context("load rom from file")?;
        info!("loaded {}", config.args.rom.display());

        let beeper = match Beeper::new() {
            Ok(beeper) => Some(beeper),
            Err(e) => {
                warn!("no audio, running silently: {:?}", e);
                None
            }
        };

        Ok(Self {
            config,
            chip8,
            beeper,
            state: None,
        })
    }

    pub fn init(&mut self, event_loop: &event_loop::ActiveEventLoop) -> anyhow::Result<()> {
        let window = event_loop
            .create_window(self.config.window.to_owned())
            .context("create window")?;
        let window = Arc::new(window);

        let window_size = window.inner_size();
        let surface_texture =
            SurfaceTexture::new(window_size.width, window_size.height, window.clone());

        let pixels = Pixels::new(
            chip8::SCREEN_WIDTH as u32,
            chip8::SCREEN_HEIGHT as u32,
            surface_texture,
        )
        .context("create pixels instance")?;

        window.request_redraw();
        self.state = Some(State { window, pixels });

        Ok(())
    }

    /// Advance the emulator by one frame and hand its side effects to the window and speaker
    pub fn frame(&mut self) -> anyhow::Result<()> {
        self.chip8.run_frame().context("run frame")?;

        if self.chip8.take_beep() {
            if let Some(beeper) = self.beeper.as_ref() {
                beeper.beep();
            }
        }

        if self.chip8.is_fb_dirty() {
            if let Some(state) = self.state.as_ref() {
                state.window.request_redraw();
            }
        }
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &event_loop::ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            eprintln!("init failed: {:?}", e);
            std::process::exit(1);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &event_loop::ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: winit::event::WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("exiting");
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                let Some(state) = self.state.as_mut() else {
                    return;
                };

                state.window.pre_present_notify();
                if let Err(e) = App::render(&mut self.chip8, state) {
                    error!("render failed: {:?}", e);
                    event_loop.exit();
                }
            }
            WindowEvent::KeyboardInput {
                device_id: _,
                event,
                is_synthetic: _,
            } => {
                let Some(key) = map_key(event.physical_key) else {
                    return;
                };

                if event.state.is_pressed() {
                    if event.repeat {
                        return;
                    }
                    debug!("key {:X} down", key.index());
                    self.chip8.keydown(key);
                } else {
                    self.chip8.keyup(key);
                }
            }
            _ => (),
        }
    }
}

impl App {
    pub fn render(chip8: &mut Chip8, state: &mut State) -> anyhow::Result<()> {
        let fb = chip8.fb();
        for (i, pixel) in state.pixels.frame_mut().chunks_exact_mut(4).enumerate() {
            let x = i % chip8::SCREEN_WIDTH;
            let y = i / chip8::SCREEN_WIDTH;

            let rgba = if fb[y][x] == 1 {
                [255, 255, 255, 255]
            } else {
                [0, 0, 0, 255]
            };

            pixel.copy_from_slice(&rgba);
        }

        state.pixels.render().context("render pixels")
    }
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(value_name = "ROM", help = "Program image to run", value_hint = clap::ValueHint::FilePath)]
    rom: PathBuf,
    #[arg(long, default_value_t = 700, help = "Instructions executed per second")]
    clock: u32,
    #[arg(long, default_value_t = 10, help = "Window pixels per emulated pixel")]
    scale: u32,
    #[arg(long, help = "Toggle shift operation modes")]
    legacy_shift: bool,
    #[arg(long, help = "Toggle jump operation modes")]
    jump_add_offset: bool,
    #[arg(long, help = "Toggle memory read/write operation modes")]
    memory_increment_i: bool,
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut event_loop = EventLoop::new().context("create event loop")?;
    let mut app = App::new(AppConfig::new(args))?;

    loop {
        let timeout = Some(time::Duration::ZERO);
        let status = event_loop.pump_app_events(timeout, &mut app);

        if let PumpStatus::Exit(_) = status {
            break Ok(());
        }

        if app.state.is_some() {
            app.frame()?;
        }

        std::thread::sleep(FRAME_INTERVAL);
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:?}", e);
            ExitCode::FAILURE
        }
    }
}
