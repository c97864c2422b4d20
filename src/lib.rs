//! Client side of the photographer portfolio app.
//!
//! Five tab screens (About, Portfolio, Services, Testimonials, Clients) each
//! manage one singleton JSON document on the portfolio API: fetch on mount,
//! edit through a modal draft, submit with POST/PUT, remove with DELETE.

pub mod app;
pub mod core;
pub mod draft;
pub mod error;
pub mod logging;
pub mod modal;
pub mod schema;
pub mod screen;
pub mod types;
pub mod upload;

pub use app::{Studio, Tab};
pub use crate::core::{data::ResourceClient, settings::Settings};
pub use draft::{Draft, ImageTarget};
pub use error::{Error, Result};
pub use modal::{FormModal, ModalMode};
pub use schema::Resource;
pub use screen::{Notice, NoticeLevel, ResourceScreen, ScreenState};
pub use upload::{ImageUploader, LocalImage, MediaLibrary, Permission, PickedImage};
