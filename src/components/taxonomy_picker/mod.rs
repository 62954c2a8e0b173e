//! Cascading category picker with search-as-you-type.
//!
//! Renders the partition list, one option list per drill-down level, a
//! clickable breadcrumb and a search box over a [`Taxonomy`]. Every pick is
//! reported through the `on_select` callback.
//!
//! # Example
//!
//! ```ignore
//! use taxonomy_navigator::components::taxonomy_picker::TaxonomyPicker;
//!
//! let on_select = Callback::new(|selection: Selection| log::info!("{}", selection.path));
//! view! { <TaxonomyPicker taxonomy=taxonomy on_select=on_select /> }
//! ```
//!
//! [`Taxonomy`]: crate::taxonomy::Taxonomy

mod component;
mod session;
mod timer;

pub use component::TaxonomyPicker;
pub use session::PickerSession;
