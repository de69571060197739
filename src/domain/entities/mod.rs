//! Core domain entities.
//!
//! Entities are plain data. Creation inputs (`New*`) and partial updates (`*Patch`)
//! are separate structs so repositories never see half-built records.
//!
//! - [`ShortLink`] - code/alias to target URL mapping with a lifetime click counter
//! - [`ListPage`], [`ListItem`] - link-in-bio pages
//! - [`Overview`], [`DailyClicks`], [`TopShortLink`], [`TopListItem`] - analytics read models

pub mod analytics;
pub mod link;
pub mod list;

pub use analytics::{DailyClicks, Overview, OverviewCounts, Ranked, TopListItem, TopShortLink};
pub use link::{NewShortLink, ShortLink, ShortLinkPatch};
pub use list::{
    ListItem, ListItemPatch, ListPage, ListPagePatch, ListPageSummary, ListPageWithItems,
    NewListItem, NewListPage,
};
