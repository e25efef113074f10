//! Single-writer command queue around the scene store.
//!
//! The store notifies subscribers synchronously from inside each mutation.
//! A subscriber reacting to a change may need to mutate the store again;
//! executing that inline would re-enter the store mid-mutation. The handle
//! serializes instead: commands committed while a dispatch is in flight are
//! queued and applied after the current mutation (and its notification
//! pass) completes.

use super::{GroupInfo, Page, PageId, SceneStore, StoreError};
use crate::shapes::Shape;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

/// A deferred store mutation.
#[derive(Debug)]
pub enum SceneCommand {
    AddPage(Page),
    DuplicateLastPageInto(PageId),
    DeleteAllPages,
    AddGroup { shapes: Vec<Shape>, page: usize },
    SetGroup { shapes: Vec<Shape>, page: usize, group: usize },
    DeleteGroup { page: usize, group: usize },
    DuplicateGroup { page: usize, group: usize },
    SetGroupInfo { info: GroupInfo, page: usize, group: usize },
    MoveGroupToPage { page: usize, group: usize, dest_page: usize },
    SetEstimatedCurrentPage(usize),
}

/// Shared, cloneable handle owning the store.
///
/// The composition root creates one and passes clones to every consumer;
/// there is no ambient singleton. The scene edit loop is event-driven and
/// single-threaded, so the handle is not `Send`.
#[derive(Clone)]
pub struct StoreHandle {
    store: Rc<RefCell<SceneStore>>,
    queue: Rc<RefCell<VecDeque<SceneCommand>>>,
    dispatching: Rc<Cell<bool>>,
}

impl StoreHandle {
    /// Wrap a store in a handle.
    pub fn new(store: SceneStore) -> Self {
        Self {
            store: Rc::new(RefCell::new(store)),
            queue: Rc::new(RefCell::new(VecDeque::new())),
            dispatching: Rc::new(Cell::new(false)),
        }
    }

    /// Apply a command, or queue it when another command is mid-dispatch.
    ///
    /// A queued command reports `Ok(())` immediately; if it later fails,
    /// the failure is logged (there is nobody left to hand the error to).
    pub fn commit(&self, command: SceneCommand) -> Result<(), StoreError> {
        if self.dispatching.get() {
            log::debug!("queueing re-entrant scene command: {command:?}");
            self.queue.borrow_mut().push_back(command);
            return Ok(());
        }

        self.dispatching.set(true);
        let result = Self::apply(&mut self.store.borrow_mut(), command);

        loop {
            let next = self.queue.borrow_mut().pop_front();
            let Some(command) = next else { break };
            if let Err(err) = Self::apply(&mut self.store.borrow_mut(), command) {
                log::warn!("queued scene command failed: {err}");
            }
        }
        self.dispatching.set(false);
        result
    }

    fn apply(store: &mut SceneStore, command: SceneCommand) -> Result<(), StoreError> {
        match command {
            SceneCommand::AddPage(page) => {
                store.add_page(page);
                Ok(())
            }
            SceneCommand::DuplicateLastPageInto(id) => {
                store.duplicate_last_page_into(id);
                Ok(())
            }
            SceneCommand::DeleteAllPages => {
                store.delete_all_pages();
                Ok(())
            }
            SceneCommand::AddGroup { shapes, page } => store.add_group(shapes, page),
            SceneCommand::SetGroup { shapes, page, group } => store.set_group(shapes, page, group),
            SceneCommand::DeleteGroup { page, group } => store.delete_group(page, group),
            SceneCommand::DuplicateGroup { page, group } => store.duplicate_group(page, group),
            SceneCommand::SetGroupInfo { info, page, group } => {
                store.set_group_info(info, page, group)
            }
            SceneCommand::MoveGroupToPage { page, group, dest_page } => {
                store.move_group_to_page(page, group, dest_page)
            }
            SceneCommand::SetEstimatedCurrentPage(page) => store.set_estimated_current_page(page),
        }
    }

    /// Read access to the store. Must not be called from inside a change
    /// notification (the store is borrowed for the duration of a dispatch).
    pub fn read<R>(&self, f: impl FnOnce(&SceneStore) -> R) -> R {
        f(&self.store.borrow())
    }

    /// Register a change callback on the wrapped store.
    pub fn subscribe(
        &self,
        callback: impl FnMut(&super::SceneChange) + 'static,
    ) -> super::SubscriptionId {
        self.store.borrow_mut().subscribe(callback)
    }

    /// Remove a subscription.
    pub fn unsubscribe(&self, id: super::SubscriptionId) -> bool {
        self.store.borrow_mut().unsubscribe(id)
    }
}
