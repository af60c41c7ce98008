pub mod config;
pub mod error;
pub mod events;
pub mod json;
pub mod model;
pub mod palette;
pub mod projection;
pub mod storage;
pub mod store;

pub use config::FlowConfig;
pub use error::{EventError, PersistError, StorageError};
pub use events::CanvasEvent;
pub use model::{Edge, EdgeId, Member, MemberId, MemberPatch, NewMember, Position, Snapshot};
pub use palette::{default_palette, PaletteDrop, PaletteItem, Viewport};
pub use projection::{
    ActiveDrag, EditRequest, EditSession, ModalView, Projection, RenderEdge, RenderNode, RoleBadge,
};
pub use storage::{MemoryStorage, Storage};
pub use store::{CommandOutcome, StoreCommand, Subscription, TeamStore};

use std::rc::Rc;

/// One store and the projection that renders it.
///
/// Every store mutation issued through here is followed by a reconcile, so
/// `view()` always reflects `store().current()`.
pub struct TeamFlow {
    store: TeamStore,
    view: Projection,
    config: FlowConfig,
}

impl TeamFlow {
    pub fn new(store: TeamStore, config: FlowConfig) -> Self {
        let view = Projection::from_snapshot(store.current());
        TeamFlow {
            store,
            view,
            config,
        }
    }

    /// Rehydrate from `storage` under the configured key.
    pub fn open(storage: Box<dyn Storage>, config: FlowConfig) -> Self {
        let store = TeamStore::open(storage, config.storage_key.clone());
        Self::new(store, config)
    }

    pub fn in_memory(config: FlowConfig) -> Self {
        Self::new(TeamStore::new(), config)
    }

    pub fn store(&self) -> &TeamStore {
        &self.store
    }
    pub fn view(&self) -> &Projection {
        &self.view
    }
    pub fn config(&self) -> &FlowConfig {
        &self.config
    }
    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }
    pub fn nodes(&self) -> &[Rc<RenderNode>] {
        self.view.nodes()
    }
    pub fn edges(&self) -> &[Rc<RenderEdge>] {
        self.view.edges()
    }
    pub fn modal(&self) -> ModalView {
        self.view.modal()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&Snapshot) + 'static) -> Subscription {
        self.store.subscribe(listener)
    }
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.store.unsubscribe(subscription)
    }

    pub fn dispatch(&mut self, command: StoreCommand) -> CommandOutcome {
        let outcome = self.store.apply(command);
        self.view.reconcile(self.store.current());
        outcome
    }

    // Store operations
    pub fn add_member(&mut self, member: NewMember) -> MemberId {
        let id = self.store.add_member(member);
        self.view.reconcile(self.store.current());
        id
    }
    pub fn update_member(&mut self, id: &str, patch: MemberPatch) -> bool {
        self.applied(StoreCommand::UpdateMember {
            id: id.to_string(),
            patch,
        })
    }
    pub fn update_member_position(&mut self, id: &str, position: Position) -> bool {
        self.applied(StoreCommand::MoveMember {
            id: id.to_string(),
            position,
        })
    }
    pub fn delete_member(&mut self, id: &str) -> bool {
        self.applied(StoreCommand::DeleteMember { id: id.to_string() })
    }
    pub fn add_edge(&mut self, source: &str, target: &str) -> EdgeId {
        let id = self.store.add_edge(source, target);
        self.view.reconcile(self.store.current());
        id
    }
    pub fn delete_edge(&mut self, id: &str) -> bool {
        self.applied(StoreCommand::DeleteEdge { id: id.to_string() })
    }

    pub fn replace_snapshot(&mut self, snapshot: Snapshot) -> Result<(), PersistError> {
        self.store.replace(snapshot)?;
        self.view.reconcile(self.store.current());
        Ok(())
    }
    pub fn reset(&mut self) {
        self.store.reset();
        self.view.reconcile(self.store.current());
    }

    fn applied(&mut self, command: StoreCommand) -> bool {
        matches!(self.dispatch(command), CommandOutcome::Applied(true))
    }

    // Gestures
    pub fn handle_event(&mut self, event: CanvasEvent) -> Option<CommandOutcome> {
        let command = self.view.handle(event)?;
        Some(self.dispatch(command))
    }

    pub fn open_editor(&mut self, id: &str) -> bool {
        self.view.open_editor(id)
    }
    pub fn request_edit(&mut self, request: &EditRequest) -> bool {
        self.view.request_edit(request)
    }
    pub fn set_draft_name(&mut self, name: impl Into<String>) -> bool {
        self.view.set_draft_name(name)
    }
    pub fn set_draft_role(&mut self, role: impl Into<String>) -> bool {
        self.view.set_draft_role(role)
    }
    pub fn save_edit(&mut self) -> bool {
        match self.view.save() {
            Some(command) => self.applied(command),
            None => false,
        }
    }
    pub fn delete_edit(&mut self) -> bool {
        match self.view.delete() {
            Some(command) => self.applied(command),
            None => false,
        }
    }
    pub fn cancel_edit(&mut self) -> bool {
        self.view.cancel()
    }

    pub fn add_default_member(&mut self) -> MemberId {
        let member = self.config.default_member.clone();
        self.add_member(member)
    }

    pub fn drop_palette_item(&mut self, item: &PaletteItem, drop: &PaletteDrop) -> Option<MemberId> {
        match self.dispatch(projection::palette_drop(item, drop)?) {
            CommandOutcome::MemberAdded(id) => Some(id),
            _ => None,
        }
    }
}

impl Default for TeamFlow {
    fn default() -> Self {
        Self::in_memory(FlowConfig::default())
    }
}
