//! Image hosting adapters.
//!
//! Provides a signed-upload implementation of the `AssetStore` port against
//! the Cloudinary REST API.

mod cloudinary;

pub use cloudinary::{
    CloudinaryAssetStore, CloudinaryConfig, CloudinaryConfigError, DEFAULT_UPLOAD_FOLDER,
};
