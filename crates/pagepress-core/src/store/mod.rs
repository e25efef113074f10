//! The authoritative in-memory document: pages, element groups, shapes.
//!
//! All mutation goes through explicit store operations; every successful
//! operation notifies subscribers exactly once, and a rejected operation
//! leaves the store structurally unchanged. The store itself is
//! single-threaded; [`handle::StoreHandle`] wraps it in the single-writer
//! command queue used by the composition root.

mod handle;

pub use handle::{SceneCommand, StoreHandle};

use crate::layout::{recompute_group_bounds, GroupBounds};
use crate::shapes::{Rgba, Shape};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for pages.
pub type PageId = Uuid;

/// Store operation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("page index {0} out of range")]
    PageOutOfRange(usize),
    #[error("group index {group} out of range on page {page}")]
    GroupOutOfRange { page: usize, group: usize },
}

/// One output sheet and its visual canvas.
///
/// Dimensions are px at the fixed render resolution. The id never changes
/// after creation; width, height, and background are mutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub width: f64,
    pub height: f64,
    pub background: Rgba,
    /// Element groups in z-order; later entries draw on top.
    pub groups: Vec<Group>,
}

impl Page {
    /// Create an empty page.
    pub fn new(width: f64, height: f64, background: Rgba) -> Self {
        Self {
            id: Uuid::new_v4(),
            width,
            height,
            background,
            groups: Vec::new(),
        }
    }

    fn with_id(id: PageId, width: f64, height: f64, background: Rgba) -> Self {
        Self {
            id,
            width,
            height,
            background,
            groups: Vec::new(),
        }
    }
}

/// Placement and bounding metadata of a group on its page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupInfo {
    /// Placement origin on the page.
    pub x: f64,
    pub y: f64,
    /// Rotation in degrees.
    pub rotation: f64,
    /// Tight bounding box of the re-based member shapes.
    pub widest_x: f64,
    pub widest_y: f64,
}

/// The unit of selection, duplication, drag, and page reassignment.
///
/// Member shapes live in group-local coordinates: after construction every
/// shape lies within `[0, widest_x] x [0, widest_y]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub widest_x: f64,
    pub widest_y: f64,
    pub shapes: Vec<Shape>,
}

impl Group {
    /// Build a group from a free-floating shape set, re-basing it into
    /// group-local coordinates. Placement defaults to the page origin.
    pub fn from_shapes(mut shapes: Vec<Shape>) -> Self {
        let GroupBounds { widest_x, widest_y } = recompute_group_bounds(&mut shapes);
        Self {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            widest_x,
            widest_y,
            shapes,
        }
    }

    /// Current placement metadata.
    pub fn info(&self) -> GroupInfo {
        GroupInfo {
            x: self.x,
            y: self.y,
            rotation: self.rotation,
            widest_x: self.widest_x,
            widest_y: self.widest_y,
        }
    }

    fn apply_info(&mut self, info: GroupInfo) {
        self.x = info.x;
        self.y = info.y;
        self.rotation = info.rotation;
        self.widest_x = info.widest_x;
        self.widest_y = info.widest_y;
    }
}

/// Description of a successful store mutation, passed to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneChange {
    PageAdded { page: usize },
    PagesCleared,
    GroupAdded { page: usize, group: usize },
    GroupChanged { page: usize, group: usize },
    GroupRemoved { page: usize, group: usize },
    GroupMoved { from_page: usize, group: usize, to_page: usize },
    CurrentPageChanged { page: usize },
}

/// Handle returned by [`SceneStore::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscriber {
    id: SubscriptionId,
    callback: Box<dyn FnMut(&SceneChange)>,
}

/// The in-memory document store.
#[derive(Default)]
pub struct SceneStore {
    pages: Vec<Page>,
    estimated_current_page: usize,
    subscribers: Vec<Subscriber>,
    next_subscription: u64,
}

impl std::fmt::Debug for SceneStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneStore")
            .field("pages", &self.pages.len())
            .field("estimated_current_page", &self.estimated_current_page)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl SceneStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Look up a page, failing loudly on a bad index.
    pub fn page(&self, index: usize) -> Result<&Page, StoreError> {
        self.pages.get(index).ok_or(StoreError::PageOutOfRange(index))
    }

    /// Look up a group, failing loudly on either bad index.
    pub fn group(&self, page: usize, group: usize) -> Result<&Group, StoreError> {
        self.page(page)?
            .groups
            .get(group)
            .ok_or(StoreError::GroupOutOfRange { page, group })
    }

    /// Append a page at the end of the document.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
        let index = self.pages.len() - 1;
        self.notify(SceneChange::PageAdded { page: index });
    }

    /// Append a new empty page copying the last page's dimensions and
    /// background. Silently does nothing on an empty store; callers decide
    /// whether emptiness is an error before calling.
    pub fn duplicate_last_page_into(&mut self, new_id: PageId) {
        let Some(last) = self.pages.last() else {
            log::debug!("duplicate_last_page_into on empty store ignored");
            return;
        };
        let page = Page::with_id(new_id, last.width, last.height, last.background);
        self.pages.push(page);
        let index = self.pages.len() - 1;
        self.notify(SceneChange::PageAdded { page: index });
    }

    /// Remove every page and reset the tracked current page.
    pub fn delete_all_pages(&mut self) {
        self.pages.clear();
        self.estimated_current_page = 0;
        self.notify(SceneChange::PagesCleared);
    }

    /// Re-base a shape set into a new group appended to a page.
    pub fn add_group(&mut self, shapes: Vec<Shape>, page: usize) -> Result<(), StoreError> {
        if page >= self.pages.len() {
            return Err(StoreError::PageOutOfRange(page));
        }
        self.pages[page].groups.push(Group::from_shapes(shapes));
        let group = self.pages[page].groups.len() - 1;
        self.notify(SceneChange::GroupAdded { page, group });
        Ok(())
    }

    /// Replace a group's member shapes, keeping its placement.
    pub fn set_group(
        &mut self,
        shapes: Vec<Shape>,
        page: usize,
        group: usize,
    ) -> Result<(), StoreError> {
        self.group(page, group)?;
        let rebuilt = Group::from_shapes(shapes);
        let target = &mut self.pages[page].groups[group];
        target.shapes = rebuilt.shapes;
        target.widest_x = rebuilt.widest_x;
        target.widest_y = rebuilt.widest_y;
        self.notify(SceneChange::GroupChanged { page, group });
        Ok(())
    }

    /// Remove a group; later groups shift left.
    pub fn delete_group(&mut self, page: usize, group: usize) -> Result<(), StoreError> {
        self.group(page, group)?;
        self.pages[page].groups.remove(group);
        self.notify(SceneChange::GroupRemoved { page, group });
        Ok(())
    }

    /// Deep-copy a group onto the end of the same page with fresh shape ids.
    pub fn duplicate_group(&mut self, page: usize, group: usize) -> Result<(), StoreError> {
        let mut copy = self.group(page, group)?.clone();
        for shape in &mut copy.shapes {
            shape.regenerate_id();
        }
        self.pages[page].groups.push(copy);
        let new_index = self.pages[page].groups.len() - 1;
        self.notify(SceneChange::GroupAdded { page, group: new_index });
        Ok(())
    }

    /// Update a group's placement metadata.
    pub fn set_group_info(
        &mut self,
        info: GroupInfo,
        page: usize,
        group: usize,
    ) -> Result<(), StoreError> {
        self.group(page, group)?;
        self.pages[page].groups[group].apply_info(info);
        self.notify(SceneChange::GroupChanged { page, group });
        Ok(())
    }

    /// Move a group to the end of another page, preserving its internal
    /// shape order.
    pub fn move_group_to_page(
        &mut self,
        page: usize,
        group: usize,
        dest_page: usize,
    ) -> Result<(), StoreError> {
        self.group(page, group)?;
        if dest_page >= self.pages.len() {
            return Err(StoreError::PageOutOfRange(dest_page));
        }
        let moved = self.pages[page].groups.remove(group);
        self.pages[dest_page].groups.push(moved);
        self.notify(SceneChange::GroupMoved {
            from_page: page,
            group,
            to_page: dest_page,
        });
        Ok(())
    }

    /// The page currently estimated to be in the user's viewport. Newly
    /// inserted shapes land here.
    pub fn estimated_current_page(&self) -> usize {
        self.estimated_current_page
    }

    pub fn set_estimated_current_page(&mut self, page: usize) -> Result<(), StoreError> {
        if page >= self.pages.len() {
            return Err(StoreError::PageOutOfRange(page));
        }
        self.estimated_current_page = page;
        self.notify(SceneChange::CurrentPageChanged { page });
        Ok(())
    }

    /// Register a change callback. Callbacks receive a description of each
    /// successful mutation; they must not mutate the store directly (commit
    /// through a [`StoreHandle`], which queues re-entrant commands).
    pub fn subscribe(&mut self, callback: impl FnMut(&SceneChange) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push(Subscriber {
            id,
            callback: Box::new(callback),
        });
        id
    }

    /// Remove a subscription. Returns whether it existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    fn notify(&mut self, change: SceneChange) {
        // Detach the subscriber list while dispatching so a callback that
        // subscribes/unsubscribes cannot invalidate the iteration.
        let mut subscribers = std::mem::take(&mut self.subscribers);
        for subscriber in &mut subscribers {
            (subscriber.callback)(&change);
        }
        subscribers.append(&mut self.subscribers);
        self.subscribers = subscribers;
    }
}
