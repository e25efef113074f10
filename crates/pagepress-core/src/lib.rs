//! PagePress Core Library
//!
//! Platform-agnostic scene model for the PagePress page-layout editor:
//! geometry kernel, shape model, scene store, and the layout engine that
//! mediates between screen space and page space. Rendering backends (the
//! PDF exporter) and I/O live in sibling crates.

pub mod geometry;
pub mod layout;
pub mod shapes;
pub mod store;
pub mod units;

pub use geometry::{rounded_polygon_path, star_vertices, GeometryError};
pub use layout::{clamp_drag_position, fit_scale, recompute_group_bounds, GroupBounds};
pub use shapes::{Rgba, Shape, ShapeId, ShapeStyle, MIN_SHAPE_SIZE};
pub use store::{
    Group, GroupInfo, Page, PageId, SceneChange, SceneCommand, SceneStore, StoreError,
    StoreHandle, SubscriptionId,
};
pub use units::{convert_length, convert_length_f64, px_to_mm, Unit, UnitError, RENDER_DPI};
