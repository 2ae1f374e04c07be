//! Host-independent network backdrop pipeline.
//!
//! [`field`] places nodes, [`connect`] links them, [`animate`] moves them each
//! frame and [`render`] draws a [`Scene`] through any [`Surface`]. Presets in
//! [`presets`] bundle the parameters of each visual variant.

pub mod animate;
pub mod buffers;
pub mod connect;
pub mod error;
pub mod field;
pub mod presets;
pub mod render;
pub mod scene;
pub mod types;

pub use animate::{FrameClock, Motion, Transform};
pub use buffers::GeometryBuffers;
pub use connect::{ConnectParams, Rule, STRUCTURAL_STRENGTH};
pub use error::{BackdropError, BackdropResult};
pub use field::{CountPolicy, NodeField, NodeStyle, Shape};
pub use presets::{Camera, Fog, Preset};
pub use render::{Surface, render};
pub use scene::Scene;
pub use types::{Edge, Node, Rgb, Viewport};
