//! Desktop viewer for a multi-user zone screen.
//!
//! Usage: `calvr-viewer [config.cvrc]`. Without an argument the embedded
//! default configuration is used.
//!
//! Keys:
//! - `C` zone coloring
//! - `A` adaptive grid
//! - `M` multi-user mode
//! - `1` `2` `3` linear / cosine / gaussian contribution
//! - `+` `-` requested columns
//! - `Esc` quit

mod sim;

use anyhow::Result;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use calvr_kernel::config::KernelConfig;
use calvr_kernel::coords::ColorRgba;
use calvr_kernel::core::{App, AppControl, FrameCtx};
use calvr_kernel::logging::{init_logging, LoggingConfig};
use calvr_kernel::render::ZoneRenderer;
use calvr_kernel::screen::ChannelRect;
use calvr_kernel::window::Runtime;
use calvr_kernel::zones::{HeadlessCameras, ScreenMvZones};

use sim::SimulatedUsers;

const DEFAULT_CONFIG: &str = include_str!("../config/default.cvrc");

/// Seconds between title refreshes.
const TITLE_INTERVAL: f64 = 0.5;

fn main() -> Result<()> {
    let tree = match std::env::args().nth(1) {
        Some(path) => KernelConfig::read_tree(path)?,
        None => KernelConfig::parse_tree(DEFAULT_CONFIG)?,
    };
    // Settings parsing may warn.
    init_logging(LoggingConfig::from_config(&tree));
    let config = KernelConfig::from_tree(&tree);

    let users = SimulatedUsers::new(&config.screen);
    let mut cameras = HeadlessCameras::new();
    let zones = ScreenMvZones::init(config.screen.clone(), &config.zones, &config.stereo, &users, &mut cameras);

    let app = Viewer {
        channel: config.screen.channel,
        users,
        zones,
        renderer: ZoneRenderer::new(),
        title: config.window.title.clone(),
        since_title: TITLE_INTERVAL,
    };

    Runtime::run(config.window, config.gpu, app)
}

struct Viewer {
    channel: ChannelRect,
    users: SimulatedUsers,
    zones: ScreenMvZones,
    renderer: ZoneRenderer,
    title: String,
    since_title: f64,
}

impl Viewer {
    fn on_key(&mut self, code: KeyCode) -> AppControl {
        let z = &mut self.zones;
        match code {
            KeyCode::Escape => return AppControl::Exit,
            KeyCode::KeyC => z.set_zone_coloring(!z.zone_coloring()),
            KeyCode::KeyA => z.set_auto_adjust(!z.auto_adjust()),
            KeyCode::KeyM => z.set_multiple_users(!z.multiple_users()),
            KeyCode::Digit1 | KeyCode::Digit2 | KeyCode::Digit3 => {
                let index = match code {
                    KeyCode::Digit1 => 0,
                    KeyCode::Digit2 => 1,
                    _ => 2,
                };
                z.set_contribution_function_index(index);
            }
            KeyCode::Equal | KeyCode::NumpadAdd => {
                let columns = z.zone_columns() + 1;
                z.set_zone_columns(columns);
            }
            KeyCode::Minus | KeyCode::NumpadSubtract => {
                let columns = z.zone_columns().saturating_sub(1);
                z.set_zone_columns(columns);
            }
            _ => return AppControl::Continue,
        }

        log::info!(
            "coloring {} adaptive {} multi-user {} contribution {} columns {}",
            z.zone_coloring(),
            z.auto_adjust(),
            z.multiple_users(),
            z.contribution_function().as_str(),
            z.zone_columns()
        );
        AppControl::Continue
    }
}

impl App for Viewer {
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed && !event.repeat => {
                match event.physical_key {
                    PhysicalKey::Code(code) => self.on_key(code),
                    PhysicalKey::Unidentified(_) => AppControl::Continue,
                }
            }
            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let dt = ctx.time.dt;
        self.users.advance(dt);
        let grid = self.zones.compute_view_proj(dt, &self.users);

        self.since_title += dt;
        if self.since_title >= TITLE_INTERVAL {
            self.since_title = 0.0;
            ctx.window.set_title(&format!(
                "{} | {}x{} zones | {:.0} fps",
                self.title,
                grid.rows,
                grid.columns,
                ctx.time.fps()
            ));
        }

        let bank = self.zones.camera_bank();
        let channel = self.channel;
        let renderer = &mut self.renderer;
        ctx.render(ColorRgba::black(), |rctx, target| {
            renderer.render(rctx, target, &bank, &channel);
        })
    }
}
