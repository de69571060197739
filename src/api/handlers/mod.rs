//! HTTP request handlers.
//!
//! Each module groups the endpoints of one resource.

pub mod analytics;
pub mod health;
pub mod links;
pub mod lists;
pub mod redirect;
pub mod track;

pub use analytics::{
    analytics_handler, clicks_over_time_handler, overview_handler, top_items_handler,
    top_links_handler,
};
pub use health::health_handler;
pub use links::{
    create_link_handler, delete_link_handler, get_link_handler, list_links_handler,
    update_link_handler,
};
pub use lists::{
    add_item_handler, create_list_handler, delete_item_handler, delete_list_handler,
    get_list_handler, list_lists_handler, update_item_handler, update_list_handler,
};
pub use redirect::redirect_handler;
pub use track::track_click_handler;
