//! PagePress application shell.
//!
//! Owns the composition root: project configuration, the editing session
//! holding the scene store, asynchronous asset loading, and paginated
//! document import. UI layers are thin consumers of [`EditorSession`].

pub mod assets;
pub mod import;
pub mod project;
pub mod session;

pub use assets::{AssetError, AssetLoader, BoxFuture, ImageAssetLoader};
pub use import::{import_paginated, ImportError, PageSource, IMPORT_RASTER_SCALE};
pub use project::{create_project, PhysicalLength, ProjectError, ProjectSpec};
pub use session::{EditorSession, SessionError, PAGE_FIT_PADDING};
