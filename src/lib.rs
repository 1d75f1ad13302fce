// Animated pointer overlay: a fading motion trail, click ripples and a
// swappable cursor decoration, updated on a fixed tick and composited onto
// any `Surface` by the host's own frame callback.

pub mod animation;
pub mod config;
pub mod cursor;
pub mod draw;
pub mod error;
pub mod gamma;
pub mod overlay;
pub mod ripple;
pub mod surface;
pub mod trail;
pub mod types;

pub use animation::{AnimationLoop, LoopHandle, PositionSource, SharedPointer};
pub use config::{CursorConfig, OverlayConfig, RippleConfig, TrailConfig};
pub use cursor::{AnimatedCursor, CursorPaint, CursorStyle, DoubleLineCursor, PlusSignCursor};
pub use error::{Error, Result};
pub use overlay::Overlay;
pub use ripple::{Ripple, RippleSet};
pub use surface::{Paint, RecordingSurface, Surface};
pub use trail::TrailBuffer;
pub use types::{FrameBuffer, Point, PointerButton, Rgba};
