// What you SEE:
// • A dark window; moving the mouse leaves a fading white trail.
// • Any mouse click spawns a ripple ring (cyan, white, silver in turn).
//   SPACE fires a synthetic click at the pointer.
// • 1 / 2 / 3 switch the cursor: animated arc, double-line X, plus sign.
// • S saves a PNG snapshot of the current frame. ESC quits.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use clap::Parser;
use minifb::Key;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cursor_paint::draw::{draw_text_5x7, Canvas, Drawer};
use cursor_paint::{
    AnimationLoop, CursorStyle, FrameBuffer, OverlayConfig, Overlay, PointerButton, Rgba,
    SharedPointer,
};

const BACKGROUND: Rgba = Rgba::rgb(24, 26, 32);
const WINDOW_FPS: usize = 60;

#[derive(Parser)]
#[command(name = "cursor-paint")]
#[command(author, version, about = "Animated pointer trail, click ripples and cursor decorations")]
struct Cli {
    /// Config file (TOML). Missing file means defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Cursor decoration, overriding the config file
    #[arg(short, long, value_enum)]
    style: Option<CursorStyle>,

    #[arg(long, default_value_t = 800)]
    width: usize,

    #[arg(long, default_value_t = 600)]
    height: usize,
}

fn main() -> cursor_paint::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(OverlayConfig::default_path);
    let mut config = OverlayConfig::load(&config_path)?;
    if let Some(style) = cli.style {
        config.style = style;
    }
    info!("Starting with {} cursor, {} ms ticks", config.style.name(), config.tick_ms);

    let mut drawer = Drawer::new("Cursor Paint", cli.width, cli.height, WINDOW_FPS)?;
    let mut screen = FrameBuffer::new(cli.width, cli.height);

    let overlay = Arc::new(Overlay::new(&config));
    let pointer = SharedPointer::new();
    let animation = AnimationLoop::new(Arc::clone(&overlay), pointer.clone())
        .with_interval(Duration::from_millis(config.tick_ms))
        .spawn()?;

    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");

    while drawer.is_open() && !drawer.esc_pressed() {
        // Inputs: publish the pointer for the next tick, forward clicks.
        let mouse = drawer.mouse_pos();
        pointer.set(mouse);

        if let Some(pos) = mouse {
            for button in drawer.poll_clicks() {
                overlay.on_click(pos, button, false);
            }
            if drawer.key_pressed_once(Key::Space) {
                overlay.on_click(pos, PointerButton::Left, true);
            }
        } else {
            drawer.poll_clicks();
        }

        for (key, style) in [
            (Key::Key1, CursorStyle::Animated),
            (Key::Key2, CursorStyle::DoubleLine),
            (Key::Key3, CursorStyle::PlusSign),
        ] {
            if drawer.key_pressed_once(key) && overlay.style() != style {
                overlay.set_style(style);
            }
        }

        // Frame: background, overlay, HUD.
        screen.clear(BACKGROUND);
        overlay.render(&mut Canvas::new(&mut screen));

        let hud = format!(
            "{} | {} | 1/2/3 STYLE  S SNAP",
            overlay.style().name(),
            hud_fps_text
        );
        draw_text_5x7(&mut screen, 8, 8, &hud, Rgba::WHITE);

        if drawer.key_pressed_once(Key::S) {
            let stamp = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default();
            let path = PathBuf::from(format!("cursor-paint-{stamp}.png"));
            match screen.save(&path) {
                Ok(()) => info!("Saved snapshot {}", path.display()),
                Err(e) => error!("Snapshot failed: {e}"),
            }
        }

        drawer.present(&screen)?;

        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            hud_fps_text = format!("FPS: {:.1}", frames_this_second as f32 / secs);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    let ticks = animation.stop()?;
    info!("Shut down after {ticks} animation ticks");
    Ok(())
}
