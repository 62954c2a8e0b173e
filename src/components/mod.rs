//! Leptos UI components.

pub mod taxonomy_picker;
