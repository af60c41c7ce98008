//! Canonical member/edge state and every mutation on it.
//!
//! Each mutating call that changes state produces exactly one transition:
//! the revision is bumped, the full snapshot is persisted (best effort) and
//! every listener sees the new snapshot. Calls naming an unknown id return
//! `false` and leave state, revision and storage untouched, as do moves to a
//! non-finite position.

use crate::error::PersistError;
use crate::json;
use crate::model::{Edge, EdgeId, Member, MemberId, MemberPatch, NewMember, Position, Snapshot};
use crate::storage::Storage;
use log::{debug, warn};
use std::collections::HashSet;
use std::rc::Rc;
use uuid::Uuid;

type Listener = Box<dyn FnMut(&Snapshot)>;

/// Handle returned by [`TeamStore::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

impl Subscription {
    pub fn id(&self) -> u64 {
        self.0
    }
    pub fn from_id(id: u64) -> Self {
        Subscription(id)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum StoreCommand {
    AddMember(NewMember),
    UpdateMember { id: MemberId, patch: MemberPatch },
    MoveMember { id: MemberId, position: Position },
    DeleteMember { id: MemberId },
    AddEdge { source: MemberId, target: MemberId },
    DeleteEdge { id: EdgeId },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    MemberAdded(MemberId),
    EdgeAdded(EdgeId),
    /// `false` when the command named an id the store does not hold.
    Applied(bool),
}

pub struct TeamStore {
    snapshot: Snapshot,
    listeners: Vec<(u64, Listener)>,
    next_listener: u64,
    // every id this store has held or issued; fresh ids never repeat one
    issued: HashSet<String>,
    revision: u64,
    storage: Option<Box<dyn Storage>>,
    storage_key: String,
}

impl TeamStore {
    /// Seeded store without persistence.
    pub fn new() -> Self {
        Self::with_snapshot(Snapshot::seed())
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        let mut store = TeamStore {
            snapshot: Snapshot::default(),
            listeners: Vec::new(),
            next_listener: 0,
            issued: HashSet::new(),
            revision: 0,
            storage: None,
            storage_key: String::new(),
        };
        store.remember_ids(&snapshot);
        store.snapshot = snapshot;
        store
    }

    /// Rehydrate from `storage` under `key`, falling back to the seed when the
    /// record is absent or unreadable. Later transitions are written back.
    pub fn open(storage: Box<dyn Storage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let snapshot = match json::load(&*storage, &key) {
            Ok(Some(snapshot)) => {
                debug!(
                    "rehydrated team store key={key} members={} edges={}",
                    snapshot.members.len(),
                    snapshot.edges.len()
                );
                snapshot
            }
            Ok(None) => {
                debug!("no persisted team store under key={key}; using seed");
                Snapshot::seed()
            }
            Err(err) => {
                warn!("discarding persisted team store key={key} err={err}");
                Snapshot::seed()
            }
        };
        let mut store = Self::with_snapshot(snapshot);
        store.storage = Some(storage);
        store.storage_key = key;
        store
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.clone()
    }
    /// Borrow the current state without cloning the entry lists.
    pub fn current(&self) -> &Snapshot {
        &self.snapshot
    }
    pub fn revision(&self) -> u64 {
        self.revision
    }
    pub fn storage_key(&self) -> Option<&str> {
        self.storage.as_ref().map(|_| self.storage_key.as_str())
    }

    pub fn member(&self, id: &str) -> Option<&Member> {
        self.snapshot.member(id).map(|entry| &**entry)
    }
    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.snapshot.edge(id).map(|entry| &**entry)
    }
    pub fn member_count(&self) -> usize {
        self.snapshot.members.len()
    }
    pub fn edge_count(&self) -> usize {
        self.snapshot.edges.len()
    }

    // Members
    /// A non-finite position is replaced by the origin.
    pub fn add_member(&mut self, member: NewMember) -> MemberId {
        let id = self.fresh_id();
        let position = if member.position.is_finite() {
            member.position
        } else {
            warn!("non-finite position for new member id={id}; placing at origin");
            Position::default()
        };
        self.snapshot.members.push(Rc::new(Member {
            id: id.clone(),
            name: member.name,
            role: member.role,
            position,
        }));
        self.transition();
        id
    }

    pub fn update_member(&mut self, id: &str, patch: MemberPatch) -> bool {
        let Some(slot) = self.snapshot.members.iter_mut().find(|m| m.id == id) else {
            return false;
        };
        *slot = Rc::new(patch.merge_into(slot));
        self.transition();
        true
    }

    pub fn update_member_position(&mut self, id: &str, position: Position) -> bool {
        if !position.is_finite() {
            debug!("ignoring non-finite move of member id={id}");
            return false;
        }
        let Some(slot) = self.snapshot.members.iter_mut().find(|m| m.id == id) else {
            return false;
        };
        let mut moved = Member::clone(slot);
        moved.position = position;
        *slot = Rc::new(moved);
        self.transition();
        true
    }

    /// Removes the member and every edge touching it in one transition.
    pub fn delete_member(&mut self, id: &str) -> bool {
        let before = self.snapshot.members.len();
        self.snapshot.members.retain(|m| m.id != id);
        if self.snapshot.members.len() == before {
            return false;
        }
        self.snapshot.edges.retain(|e| !e.touches(id));
        self.transition();
        true
    }

    // Edges
    pub fn add_edge(&mut self, source: &str, target: &str) -> EdgeId {
        let id = self.fresh_id();
        self.snapshot.edges.push(Rc::new(Edge {
            id: id.clone(),
            source: source.to_string(),
            target: target.to_string(),
        }));
        self.transition();
        id
    }

    pub fn delete_edge(&mut self, id: &str) -> bool {
        let before = self.snapshot.edges.len();
        self.snapshot.edges.retain(|e| e.id != id);
        if self.snapshot.edges.len() == before {
            return false;
        }
        self.transition();
        true
    }

    pub fn apply(&mut self, command: StoreCommand) -> CommandOutcome {
        match command {
            StoreCommand::AddMember(member) => CommandOutcome::MemberAdded(self.add_member(member)),
            StoreCommand::UpdateMember { id, patch } => {
                CommandOutcome::Applied(self.update_member(&id, patch))
            }
            StoreCommand::MoveMember { id, position } => {
                CommandOutcome::Applied(self.update_member_position(&id, position))
            }
            StoreCommand::DeleteMember { id } => CommandOutcome::Applied(self.delete_member(&id)),
            StoreCommand::AddEdge { source, target } => {
                CommandOutcome::EdgeAdded(self.add_edge(&source, &target))
            }
            StoreCommand::DeleteEdge { id } => CommandOutcome::Applied(self.delete_edge(&id)),
        }
    }

    /// Swap in a whole snapshot as one transition. Rejects duplicate ids and
    /// non-finite positions.
    pub fn replace(&mut self, snapshot: Snapshot) -> Result<(), PersistError> {
        json::validate(&snapshot)?;
        self.remember_ids(&snapshot);
        self.snapshot = snapshot;
        self.transition();
        Ok(())
    }

    pub fn reset(&mut self) {
        let seed = Snapshot::seed();
        self.remember_ids(&seed);
        self.snapshot = seed;
        self.transition();
    }

    // Subscriptions
    pub fn subscribe(&mut self, listener: impl FnMut(&Snapshot) + 'static) -> Subscription {
        let id = self.next_listener;
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        Subscription(id)
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != subscription.0);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn fresh_id(&mut self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if self.issued.insert(id.clone()) {
                return id;
            }
        }
    }

    fn remember_ids(&mut self, snapshot: &Snapshot) {
        self.issued.extend(snapshot.members.iter().map(|m| m.id.clone()));
        self.issued.extend(snapshot.edges.iter().map(|e| e.id.clone()));
    }

    fn transition(&mut self) {
        self.revision = self.revision.wrapping_add(1);
        if let Some(storage) = self.storage.as_mut() {
            if let Err(err) = json::save(storage.as_mut(), &self.storage_key, &self.snapshot) {
                warn!(
                    "team store persist failed key={} revision={} err={err}",
                    self.storage_key, self.revision
                );
            }
        }
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.snapshot);
        }
    }
}

impl Default for TeamStore {
    fn default() -> Self {
        Self::new()
    }
}
