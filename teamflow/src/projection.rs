//! Renderable nodes/edges derived from store snapshots, plus the transient
//! drag and edit state the canvas needs between commits.
//!
//! # Invariants
//! - After `reconcile`, `nodes()` lists exactly the snapshot's members in
//!   order, with the active drag's draft position substituted for its node.
//! - A node whose member `Rc` is unchanged and whose drag state is unchanged
//!   keeps the same `Rc<RenderNode>` across reconciles. Edges likewise.
//! - Intermediate drag moves never produce a store command; only the release
//!   does.

use crate::events::CanvasEvent;
use crate::model::{Edge, EdgeId, Member, MemberId, MemberPatch, Position, Snapshot};
use crate::palette::{PaletteDrop, PaletteItem};
use crate::store::StoreCommand;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::rc::Rc;

/// Icon hint derived from a member's role label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleBadge {
    Developer,
    Manager,
    TeamMember,
    Other,
}

impl RoleBadge {
    pub fn for_role(role: &str) -> Self {
        match role {
            "Developer" => RoleBadge::Developer,
            "Manager" => RoleBadge::Manager,
            "Team Member" => RoleBadge::TeamMember,
            _ => RoleBadge::Other,
        }
    }
}

/// Handed back by the host when a rendered node asks to be edited.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EditRequest {
    pub member_id: MemberId,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderNode {
    pub id: MemberId,
    pub position: Position,
    pub display_name: String,
    pub display_role: String,
    pub role_badge: RoleBadge,
    pub dragging: bool,
    pub on_edit: EditRequest,
}

impl RenderNode {
    fn build(member: &Member, draft: Option<Position>) -> Self {
        RenderNode {
            id: member.id.clone(),
            position: draft.unwrap_or(member.position),
            display_name: member.name.clone(),
            display_role: member.role.clone(),
            role_badge: RoleBadge::for_role(&member.role),
            dragging: draft.is_some(),
            on_edit: EditRequest {
                member_id: member.id.clone(),
            },
        }
    }

    fn matches_draft(&self, draft: Option<Position>) -> bool {
        match draft {
            Some(p) => self.dragging && self.position == p,
            None => !self.dragging,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RenderEdge {
    pub id: EdgeId,
    pub source: MemberId,
    pub target: MemberId,
}

impl From<&Edge> for RenderEdge {
    fn from(e: &Edge) -> Self {
        RenderEdge {
            id: e.id.clone(),
            source: e.source.clone(),
            target: e.target.clone(),
        }
    }
}

/// Node being moved and where the pointer has it right now.
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveDrag {
    pub node_id: MemberId,
    pub draft_position: Position,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditSession {
    pub member_id: MemberId,
    pub draft_name: String,
    pub draft_role: String,
}

/// What the edit modal should show.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalView {
    pub open: bool,
    pub name: String,
    pub role: String,
}

#[derive(Default)]
pub struct Projection {
    nodes: Vec<Rc<RenderNode>>,
    edges: Vec<Rc<RenderEdge>>,
    // member/edge each render entry was built from
    node_cache: HashMap<MemberId, (Rc<Member>, Rc<RenderNode>)>,
    edge_cache: HashMap<EdgeId, (Rc<Edge>, Rc<RenderEdge>)>,
    drag: Option<ActiveDrag>,
    edit: Option<EditSession>,
}

impl Projection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let mut view = Self::new();
        view.reconcile(snapshot);
        view
    }

    pub fn nodes(&self) -> &[Rc<RenderNode>] {
        &self.nodes
    }
    pub fn edges(&self) -> &[Rc<RenderEdge>] {
        &self.edges
    }
    pub fn node(&self, id: &str) -> Option<&Rc<RenderNode>> {
        self.nodes.iter().find(|n| n.id == id)
    }
    pub fn active_drag(&self) -> Option<&ActiveDrag> {
        self.drag.as_ref()
    }
    pub fn editing(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    /// Bring the render lists in line with `snapshot`, keeping an in-progress
    /// drag on top of the committed position.
    pub fn reconcile(&mut self, snapshot: &Snapshot) {
        if self
            .drag
            .as_ref()
            .is_some_and(|d| !snapshot.has_member(&d.node_id))
        {
            debug!("dropping drag of removed member");
            self.drag = None;
        }
        if self
            .edit
            .as_ref()
            .is_some_and(|e| !snapshot.has_member(&e.member_id))
        {
            debug!("closing editor of removed member");
            self.edit = None;
        }

        let mut previous = std::mem::take(&mut self.node_cache);
        let mut nodes = Vec::with_capacity(snapshot.members.len());
        for member in &snapshot.members {
            let draft = self.draft_for(&member.id);
            let node = match previous.remove(&member.id) {
                Some((built_from, node))
                    if Rc::ptr_eq(&built_from, member) && node.matches_draft(draft) =>
                {
                    node
                }
                _ => Rc::new(RenderNode::build(member, draft)),
            };
            self.node_cache
                .insert(member.id.clone(), (Rc::clone(member), Rc::clone(&node)));
            nodes.push(node);
        }
        self.nodes = nodes;

        let mut previous = std::mem::take(&mut self.edge_cache);
        let mut edges = Vec::with_capacity(snapshot.edges.len());
        for edge in &snapshot.edges {
            let rendered = match previous.remove(&edge.id) {
                Some((built_from, rendered)) if Rc::ptr_eq(&built_from, edge) => rendered,
                _ => Rc::new(RenderEdge::from(&**edge)),
            };
            self.edge_cache
                .insert(edge.id.clone(), (Rc::clone(edge), Rc::clone(&rendered)));
            edges.push(rendered);
        }
        self.edges = edges;
    }

    /// Translate a canvas gesture. Local-only effects (drag drafts, opening
    /// the editor) happen here; anything the store must see is returned.
    pub fn handle(&mut self, event: CanvasEvent) -> Option<StoreCommand> {
        if let Some((source, target)) = event.connection() {
            return Some(StoreCommand::AddEdge {
                source: source.to_string(),
                target: target.to_string(),
            });
        }
        match event {
            CanvasEvent::PositionChanged {
                id,
                position,
                dragging: true,
            } => {
                self.drag_to(&id, position);
                None
            }
            CanvasEvent::PositionChanged {
                id,
                position,
                dragging: false,
            } => {
                self.end_drag(&id);
                Some(StoreCommand::MoveMember { id, position })
            }
            CanvasEvent::DragCancelled { id } => {
                self.cancel_drag(&id);
                None
            }
            CanvasEvent::ConnectCompleted { .. } => {
                debug!("discarding connection without both endpoints");
                None
            }
            CanvasEvent::NodeClicked { id } => {
                self.open_editor(&id);
                None
            }
            CanvasEvent::EdgeClicked { id } => Some(StoreCommand::DeleteEdge { id }),
        }
    }

    // Drag
    fn draft_for(&self, id: &str) -> Option<Position> {
        self.drag
            .as_ref()
            .filter(|d| d.node_id == id)
            .map(|d| d.draft_position)
    }

    fn drag_to(&mut self, id: &str, position: Position) {
        if !self.node_cache.contains_key(id) {
            debug!("ignoring drag of unknown node");
            return;
        }
        if let Some(prev) = self.drag.take() {
            if prev.node_id != id {
                self.rebuild_node(&prev.node_id);
            }
        }
        self.drag = Some(ActiveDrag {
            node_id: id.to_string(),
            draft_position: position,
        });
        self.rebuild_node(id);
    }

    fn end_drag(&mut self, id: &str) {
        if self.draft_for(id).is_some() {
            self.drag = None;
        }
    }

    /// Abandon the drag of `id` and put its node back at the committed position.
    pub fn cancel_drag(&mut self, id: &str) -> bool {
        if self.draft_for(id).is_none() {
            return false;
        }
        self.drag = None;
        self.rebuild_node(id);
        true
    }

    fn rebuild_node(&mut self, id: &str) {
        let draft = self.draft_for(id);
        let Some((member, node)) = self.node_cache.get_mut(id) else {
            return;
        };
        if node.matches_draft(draft) && draft.is_none() {
            return;
        }
        let rebuilt = Rc::new(RenderNode::build(member, draft));
        *node = Rc::clone(&rebuilt);
        if let Some(slot) = self.nodes.iter_mut().find(|n| n.id == id) {
            *slot = rebuilt;
        }
    }

    // Edit
    pub fn open_editor(&mut self, id: &str) -> bool {
        let Some((member, _)) = self.node_cache.get(id) else {
            debug!("ignoring edit request for unknown node");
            return false;
        };
        self.edit = Some(EditSession {
            member_id: member.id.clone(),
            draft_name: member.name.clone(),
            draft_role: member.role.clone(),
        });
        true
    }

    pub fn request_edit(&mut self, request: &EditRequest) -> bool {
        self.open_editor(&request.member_id)
    }

    pub fn set_draft_name(&mut self, name: impl Into<String>) -> bool {
        match self.edit.as_mut() {
            Some(session) => {
                session.draft_name = name.into();
                true
            }
            None => false,
        }
    }

    pub fn set_draft_role(&mut self, role: impl Into<String>) -> bool {
        match self.edit.as_mut() {
            Some(session) => {
                session.draft_role = role.into();
                true
            }
            None => false,
        }
    }

    pub fn save(&mut self) -> Option<StoreCommand> {
        let session = self.edit.take()?;
        Some(StoreCommand::UpdateMember {
            id: session.member_id,
            patch: MemberPatch::default()
                .name(session.draft_name)
                .role(session.draft_role),
        })
    }

    pub fn delete(&mut self) -> Option<StoreCommand> {
        let session = self.edit.take()?;
        Some(StoreCommand::DeleteMember {
            id: session.member_id,
        })
    }

    /// Close the modal and drop the draft. No store call.
    pub fn cancel(&mut self) -> bool {
        self.edit.take().is_some()
    }

    pub fn modal(&self) -> ModalView {
        match &self.edit {
            Some(session) => ModalView {
                open: true,
                name: session.draft_name.clone(),
                role: session.draft_role.clone(),
            },
            None => ModalView::default(),
        }
    }
}

/// Member creation for a palette item released over the canvas. `None` when
/// the pointer or transform cannot be mapped to canvas coordinates.
pub fn palette_drop(item: &PaletteItem, drop: &PaletteDrop) -> Option<StoreCommand> {
    let position = drop.canvas_position()?;
    Some(StoreCommand::AddMember(item.place_at(position)))
}
