//! Listings for Regalia
//!
//! Everything here hangs off a [`ListHelper`] built for one request:
//!
//! - [`ListHelper::table_for`] renders sortable tables, with sort links that
//!   keep the request's other parameters
//! - [`ListHelper::dl_for`] shows one record as a definition list
//! - action links, icons and one-button forms for toolbars and table rows

pub mod actions;
pub mod helper;
pub mod params;
pub mod show;
pub mod table;

pub use actions::ActionButton;
pub use helper::ListHelper;
pub use params::{deep_merge, to_query, Params, RequestParams};
pub use show::{ShowBuilder, ShowOptions};
pub use table::{ColumnOptions, Link, TableBuilder, TableMode, TableOptions};
