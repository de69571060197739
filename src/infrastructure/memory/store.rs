//! In-memory implementation of the repository traits.
//!
//! Locks are taken in one order across the store: `pages`, then `slugs`, then
//! `items`, then the event log; `links` before the event log. No operation holds
//! a guard on a later map while locking an earlier one. Readers that join maps
//! snapshot the earlier map before walking the later one.
//!
//! Click events outlive the link or item they reference. Ids are never reused,
//! so orphaned events keep their meaning in the daily series.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::json;

use crate::domain::click_event::{ClickEvent, ClickTarget};
use crate::domain::clock::Clock;
use crate::domain::entities::{
    DailyClicks, ListItem, ListItemPatch, ListPage, ListPagePatch, ListPageSummary, NewListItem,
    NewListPage, NewShortLink, OverviewCounts, ShortLink, ShortLinkPatch, TopListItem,
    TopShortLink,
};
use crate::domain::repositories::{
    AnalyticsRepository, ClickRepository, LinkRepository, ListRepository,
};
use crate::error::AppError;

pub struct MemoryStore {
    clock: Arc<dyn Clock>,
    next_id: AtomicI64,
    links: DashMap<i64, ShortLink>,
    /// Code and alias namespace, name to link id.
    names: DashMap<String, i64>,
    pages: DashMap<i64, ListPage>,
    slugs: DashMap<String, i64>,
    items: DashMap<i64, ListItem>,
    events: Mutex<Vec<ClickEvent>>,
}

impl MemoryStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            next_id: AtomicI64::new(1),
            links: DashMap::new(),
            names: DashMap::new(),
            pages: DashMap::new(),
            slugs: DashMap::new(),
            items: DashMap::new(),
            events: Mutex::new(Vec::new()),
        }
    }

    /// Number of stored click events.
    pub fn event_count(&self) -> Result<usize, AppError> {
        Ok(self.events()?.len())
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn events(&self) -> Result<MutexGuard<'_, Vec<ClickEvent>>, AppError> {
        self.events
            .lock()
            .map_err(|_| AppError::internal("Click log unavailable", json!({})))
    }

    fn claim_name(&self, name: &str, id: i64, field: &'static str) -> Result<(), AppError> {
        match self.names.entry(name.to_string()) {
            Entry::Occupied(_) => Err(name_taken(field, name)),
            Entry::Vacant(vacant) => {
                vacant.insert(id);
                Ok(())
            }
        }
    }
}

fn name_taken(field: &'static str, name: &str) -> AppError {
    let label = match field {
        "alias" => "Alias",
        "slug" => "Slug",
        _ => "Code",
    };
    AppError::conflict(
        format!("{label} is already taken"),
        json!({ "field": field, "name": name }),
    )
}

#[async_trait]
impl LinkRepository for MemoryStore {
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let id = self.next_id();

        self.claim_name(&new_link.code, id, "code")?;
        if let Some(ref alias) = new_link.alias
            && let Err(e) = self.claim_name(alias, id, "alias")
        {
            self.names.remove(&new_link.code);
            return Err(e);
        }

        let link = ShortLink {
            id,
            code: new_link.code,
            alias: new_link.alias,
            target_url: new_link.target_url,
            description: new_link.description,
            tags: new_link.tags,
            active: true,
            expires_at: new_link.expires_at,
            click_count: 0,
            created_at: self.clock.now(),
        };
        self.links.insert(id, link.clone());

        Ok(link)
    }

    async fn find_by_code_or_alias(&self, name: &str) -> Result<Option<ShortLink>, AppError> {
        let Some(id) = self.names.get(name).map(|id| *id) else {
            return Ok(None);
        };
        Ok(self.links.get(&id).map(|link| link.clone()))
    }

    async fn name_exists(&self, name: &str) -> Result<bool, AppError> {
        Ok(self.names.contains_key(name))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ShortLink>, AppError> {
        Ok(self.links.get(&id).map(|link| link.clone()))
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<ShortLink>, AppError> {
        let mut links: Vec<ShortLink> = self.links.iter().map(|e| e.value().clone()).collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(links
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.links.len() as i64)
    }

    async fn update(&self, id: i64, patch: ShortLinkPatch) -> Result<ShortLink, AppError> {
        let mut link = self
            .links
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "id": id })))?;

        if let Some(target_url) = patch.target_url {
            link.target_url = target_url;
        }
        if let Some(description) = patch.description {
            link.description = description;
        }
        if let Some(tags) = patch.tags {
            link.tags = tags;
        }
        if let Some(active) = patch.active {
            link.active = active;
        }
        if let Some(expires_at) = patch.expires_at {
            link.expires_at = expires_at;
        }

        Ok(link.clone())
    }

    async fn delete(&self, id: i64) -> Result<Option<ShortLink>, AppError> {
        let Some((_, link)) = self.links.remove(&id) else {
            return Ok(None);
        };
        for name in link.names() {
            self.names.remove(name);
        }

        Ok(Some(link))
    }
}

#[async_trait]
impl ListRepository for MemoryStore {
    async fn create_page(&self, new_page: NewListPage) -> Result<ListPage, AppError> {
        let id = self.next_id();
        match self.slugs.entry(new_page.slug.clone()) {
            Entry::Occupied(_) => return Err(name_taken("slug", &new_page.slug)),
            Entry::Vacant(vacant) => {
                vacant.insert(id);
            }
        }

        let page = ListPage {
            id,
            title: new_page.title,
            slug: new_page.slug,
            description: new_page.description,
            created_at: self.clock.now(),
        };
        self.pages.insert(id, page.clone());

        Ok(page)
    }

    async fn find_page(&self, id: i64) -> Result<Option<ListPage>, AppError> {
        Ok(self.pages.get(&id).map(|page| page.clone()))
    }

    async fn list_pages(&self, offset: i64, limit: i64) -> Result<Vec<ListPageSummary>, AppError> {
        let mut pages: Vec<ListPage> = self.pages.iter().map(|e| e.value().clone()).collect();
        pages.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let mut counts: HashMap<i64, i64> = HashMap::new();
        for item in self.items.iter() {
            *counts.entry(item.list_page_id).or_insert(0) += 1;
        }

        Ok(pages
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .map(|page| ListPageSummary {
                item_count: counts.get(&page.id).copied().unwrap_or(0),
                page,
            })
            .collect())
    }

    async fn count_pages(&self) -> Result<i64, AppError> {
        Ok(self.pages.len() as i64)
    }

    async fn update_page(
        &self,
        id: i64,
        patch: ListPagePatch,
    ) -> Result<Option<ListPage>, AppError> {
        let Some(mut page) = self.pages.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(slug) = patch.slug
            && slug != page.slug
        {
            match self.slugs.entry(slug.clone()) {
                Entry::Occupied(_) => return Err(name_taken("slug", &slug)),
                Entry::Vacant(vacant) => {
                    vacant.insert(id);
                }
            }
            self.slugs.remove(&page.slug);
            page.slug = slug;
        }
        if let Some(title) = patch.title {
            page.title = title;
        }
        if let Some(description) = patch.description {
            page.description = description;
        }

        Ok(Some(page.clone()))
    }

    async fn delete_page(&self, id: i64) -> Result<bool, AppError> {
        let Some((_, page)) = self.pages.remove(&id) else {
            return Ok(false);
        };
        self.slugs.remove(&page.slug);
        self.items.retain(|_, item| item.list_page_id != id);

        Ok(true)
    }

    async fn list_items(&self, page_id: i64) -> Result<Vec<ListItem>, AppError> {
        let mut items: Vec<ListItem> = self
            .items
            .iter()
            .filter(|e| e.list_page_id == page_id)
            .map(|e| e.value().clone())
            .collect();
        items.sort_by_key(|item| (item.position, item.id));
        Ok(items)
    }

    async fn add_item(&self, new_item: NewListItem) -> Result<ListItem, AppError> {
        // Exclusive page guard serializes appends to one page.
        let _page = self.pages.get_mut(&new_item.list_page_id).ok_or_else(|| {
            AppError::not_found(
                "List page not found",
                json!({ "id": new_item.list_page_id }),
            )
        })?;

        let position = self
            .items
            .iter()
            .filter(|e| e.list_page_id == new_item.list_page_id)
            .map(|e| e.position + 1)
            .max()
            .unwrap_or(0);

        let item = ListItem {
            id: self.next_id(),
            list_page_id: new_item.list_page_id,
            title: new_item.title,
            target_url: new_item.target_url,
            click_count: 0,
            visible: new_item.visible,
            position,
            created_at: self.clock.now(),
        };
        self.items.insert(item.id, item.clone());

        Ok(item)
    }

    async fn update_item(
        &self,
        id: i64,
        patch: ListItemPatch,
    ) -> Result<Option<ListItem>, AppError> {
        let Some(mut item) = self.items.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = patch.title {
            item.title = title;
        }
        if let Some(target_url) = patch.target_url {
            item.target_url = target_url;
        }
        if let Some(visible) = patch.visible {
            item.visible = visible;
        }
        if let Some(position) = patch.position {
            item.position = position;
        }

        Ok(Some(item.clone()))
    }

    async fn delete_item(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.items.remove(&id).is_some())
    }
}

#[async_trait]
impl ClickRepository for MemoryStore {
    async fn record_click(
        &self,
        target: ClickTarget,
        occurred_at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let event = ClickEvent::new(target, occurred_at);

        // The counter guard stays held while the event is appended.
        match target {
            ClickTarget::ShortLink(id) => {
                let Some(mut link) = self.links.get_mut(&id) else {
                    return Ok(false);
                };
                self.events()?.push(event);
                link.click_count += 1;
            }
            ClickTarget::ListItem(id) => {
                let Some(mut item) = self.items.get_mut(&id) else {
                    return Ok(false);
                };
                self.events()?.push(event);
                item.click_count += 1;
            }
        }

        Ok(true)
    }
}

#[async_trait]
impl AnalyticsRepository for MemoryStore {
    async fn overview(&self) -> Result<OverviewCounts, AppError> {
        let mut counts = OverviewCounts {
            list_pages: self.pages.len() as i64,
            ..OverviewCounts::default()
        };

        for link in self.links.iter() {
            counts.total_short_links += 1;
            if link.active {
                counts.active_short_links += 1;
            }
            counts.short_link_clicks += link.click_count;
        }
        for item in self.items.iter() {
            counts.list_items += 1;
            counts.list_clicks += item.click_count;
        }

        Ok(counts)
    }

    async fn daily_clicks(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<DailyClicks>, AppError> {
        let mut days = BTreeMap::new();
        for event in self.events()?.iter() {
            if event.occurred_at >= from && event.occurred_at <= to {
                *days.entry(event.occurred_at.date_naive()).or_insert(0) += 1;
            }
        }

        Ok(days
            .into_iter()
            .map(|(date, count)| DailyClicks { date, count })
            .collect())
    }

    async fn top_short_links(&self, limit: i64) -> Result<Vec<TopShortLink>, AppError> {
        let mut top: Vec<TopShortLink> = self
            .links
            .iter()
            .map(|link| TopShortLink {
                id: link.id,
                code: link.code.clone(),
                alias: link.alias.clone(),
                target_url: link.target_url.clone(),
                click_count: link.click_count,
                created_at: link.created_at,
            })
            .collect();

        top.sort_by(|a, b| {
            b.click_count
                .cmp(&a.click_count)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
        top.truncate(limit.max(0) as usize);
        Ok(top)
    }

    async fn top_list_items(&self, limit: i64) -> Result<Vec<TopListItem>, AppError> {
        let titles: HashMap<i64, String> = self
            .pages
            .iter()
            .map(|page| (page.id, page.title.clone()))
            .collect();

        let mut top: Vec<TopListItem> = self
            .items
            .iter()
            .filter_map(|item| {
                let list_title = titles.get(&item.list_page_id)?.clone();
                Some(TopListItem {
                    id: item.id,
                    title: item.title.clone(),
                    target_url: item.target_url.clone(),
                    list_page_id: item.list_page_id,
                    list_title,
                    click_count: item.click_count,
                    created_at: item.created_at,
                })
            })
            .collect();

        top.sort_by(|a, b| {
            b.click_count
                .cmp(&a.click_count)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
        top.truncate(limit.max(0) as usize);
        Ok(top)
    }
}
