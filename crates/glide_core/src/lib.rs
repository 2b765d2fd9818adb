//! Glide Core
//!
//! Foundational types shared by the Glide motion crates:
//!
//! - **Geometry**: document-space rectangles and viewports
//! - **Visual Props**: the opacity/translate/scale bundle every animation writes
//! - **Layout Host**: the read-only seam to whatever owns layout (a DOM binding,
//!   a native tree, or the in-memory [`MemoryHost`])
//! - **Motion Environment**: the accessibility seam answering "reduced motion?"

pub mod environment;
pub mod geometry;
pub mod host;

pub use environment::{MotionEnvironment, SharedPreference, Unavailable};
pub use geometry::{Axis, Rect, Viewport, VisualProps};
pub use host::{ElementId, LayoutHost, MemoryHost};
