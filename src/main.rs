mod ads;
mod catalog;
mod challenges;
mod config;
mod economy;
mod error;
mod gateway;
mod input;
mod leaderboard;
mod logging;
mod profile;
mod render;
mod router;
mod save;
mod session;
mod time;

use std::{cell::RefCell, io, rc::Rc};

use ratzilla::event::{MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use tracing::{debug, info, warn};

use ads::InstantAds;
use challenges::Dispatcher;
use config::GameConfig;
use gateway::OfflineGateway;
use input::TapTargets;
use router::App;
use save::{InMemoryStorage, LocalStorage, SaveSlot, Storage};
use time::FrameClock;

/// Resolve a pointer position against the grid container's bounding rect.
fn dom_tap_key(mouse_x: u32, mouse_y: u32, targets: &TapTargets) -> Option<char> {
    let window = web_sys::window()?;
    let document = window.document()?;

    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let key = targets.hit_pixel(
        f64::from(mouse_x) - rect.left(),
        f64::from(mouse_y) - rect.top(),
        rect.width(),
        rect.height(),
    );
    debug!(x = mouse_x, y = mouse_y, ?key, targets = targets.targets.len(), "tap");
    key
}

fn now_ms() -> Option<f64> {
    Some(web_sys::window()?.performance()?.now())
}

fn open_storage() -> Box<dyn Storage> {
    match LocalStorage::open() {
        Some(s) => Box::new(s),
        None => {
            warn!("localStorage unavailable, progress will not survive a reload");
            Box::new(InMemoryStorage::new())
        }
    }
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();
    logging::init();

    let config = GameConfig::from_build_env();
    let seed = config.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
    info!(seed, payments = config.payments_enabled(), "starting");

    let app = Rc::new(RefCell::new(App::new(
        SaveSlot::open(open_storage()),
        config,
        Dispatcher::seeded(seed),
        Box::new(OfflineGateway::new()),
        Box::new(InstantAds::new()),
    )));
    let targets = Rc::new(RefCell::new(TapTargets::new()));

    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    // Mouse/touch taps
    terminal.on_mouse_event({
        let app = app.clone();
        let targets = targets.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }
            let key = {
                let t = targets.borrow();
                if t.rows == 0 || t.cols == 0 {
                    return;
                }
                dom_tap_key(mouse_event.x, mouse_event.y, &t)
            };
            if let Some(key) = key {
                app.borrow_mut().handle_key(key);
            }
        }
    });

    terminal.on_key_event({
        let app = app.clone();
        move |key_event| {
            if let Some(key) = input::key_char(&key_event.code) {
                app.borrow_mut().handle_key(key);
            }
        }
    });

    terminal.draw_web({
        let clock = RefCell::new(FrameClock::new());
        move |f| {
            let ticks = now_ms().map_or(0, |now| clock.borrow_mut().advance(now));
            let mut app = app.borrow_mut();
            for _ in 0..ticks {
                app.tick();
            }
            render::draw(f, &app, &mut targets.borrow_mut());
        }
    });

    Ok(())
}
