//! Lumen theme engine
//!
//! The stateful core of the toolkit's theming pipeline: it loads component
//! token documents, resolves them against the shared resource document and
//! the active theme, expands stylesheet templates with the resolved values,
//! and pushes the result to registered widgets.
//!
//! # Overview
//!
//! - [`ThemeManager`]: process-wide orchestrator for the active theme,
//!   loaded components, the accumulated token map, and theme switching
//! - [`WidgetRegistry`]: non-owning widget bindings with batch re-styling
//! - [`Styleable`] / [`IconRefresh`]: the narrow contract a widget has to
//!   meet to take part
//! - [`StyleKind`]: catalog of the toolkit's component kinds
//! - [`TypographyStyle`]: the type ramp shared by all components
//!
//! # Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use lumen_theme::{StyleKind, ThemeConfig, ThemeManager};
//!
//! // Initialize once at app startup.
//! ThemeManager::init(ThemeConfig::new("path/to/components", "path/to/common.yaml"))?;
//!
//! // Widgets register themselves on construction.
//! let manager = ThemeManager::get();
//! let button: Arc<dyn lumen_theme::Styleable> = Arc::new(MyButton::new());
//! StyleKind::Button.apply(manager, &button)?;
//!
//! // Switching re-resolves every loaded component and re-styles every
//! // still-alive widget.
//! manager.set_theme("Dark");
//! ```
//!
//! Widgets are tracked through [`std::sync::Weak`] handles: the registry
//! never keeps a widget alive, and destroyed widgets fall out of batch
//! updates on their own.

mod catalog;
mod config;
mod error;
mod manager;
mod registry;
mod typography;
mod widget;

pub use catalog::StyleKind;
pub use config::{
    component_style_path, component_token_path, ThemeConfig, CONTROLS_GROUP, DEFAULT_THEME,
};
pub use error::ThemeError;
pub use manager::ThemeManager;
pub use registry::WidgetRegistry;
pub use typography::{FontSpec, FontWeight, TypographyStyle, DEFAULT_FAMILY, FALLBACK_FAMILY};
pub use widget::{IconRefresh, Styleable};

// Resolved token values are plain YAML values.
pub use lumen_tokens::Value;
