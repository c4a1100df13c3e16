//! Web UI Preview Server
//!
//! Serves the settings web UI that normally runs inside the app's embedded
//! web view, and injects a mock `window.HOOK` / `window.Android` bridge so the
//! pages work in a desktop browser.
//!
//! # Usage
//!
//! ```bash
//! webui-preview --web-dir web --config-file config.json --friend-file friend.json --open
//! ```
//!
//! # Features
//!
//! - Tab and module field metadata embedded in the binary
//! - Optional overlay of a persisted `modelFieldsMap` override file
//! - Friend list re-read from disk on every page load
//! - Static passthrough for `css/`, `js/` and `images/`

pub mod bridge;
pub mod catalog;
pub mod error;
mod handlers;
pub mod merge;
pub mod overrides;
pub mod responder;
mod server;

pub use bridge::{build_bridge_script, BridgeSnapshot};
pub use catalog::{Catalog, FieldDefinition, FieldType, ModuleMetadata, TabDescriptor};
pub use error::PreviewError;
pub use merge::merge_overrides;
pub use overrides::{load_json, FriendRecord, OverrideDocument, OverrideLoader};
pub use responder::PageResponder;
pub use server::{PreviewConfig, PreviewServer};
