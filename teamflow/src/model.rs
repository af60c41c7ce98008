use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::rc::Rc;

pub type MemberId = String;
pub type EdgeId = String;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub role: String,
    pub position: Position,
}

/// Directed link between two member ids. Endpoints are not checked on creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: MemberId,
    pub target: MemberId,
}

impl Edge {
    pub fn touches(&self, member: &str) -> bool {
        self.source == member || self.target == member
    }
}

/// Member fields supplied by the caller; the store assigns the id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewMember {
    pub name: String,
    pub role: String,
    pub position: Position,
}

impl NewMember {
    pub fn new(name: impl Into<String>, role: impl Into<String>, position: Position) -> Self {
        NewMember {
            name: name.into(),
            role: role.into(),
            position,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemberPatch {
    pub name: Option<String>,
    pub role: Option<String>,
}

impl MemberPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.role.is_none()
    }
    pub(crate) fn merge_into(&self, member: &Member) -> Member {
        Member {
            id: member.id.clone(),
            name: self.name.clone().unwrap_or_else(|| member.name.clone()),
            role: self.role.clone().unwrap_or_else(|| member.role.clone()),
            position: member.position,
        }
    }
}

/// Full `{members, edges}` state at a point in time.
///
/// Entries sit behind `Rc` and the store replaces them on every change, so a
/// snapshot handed out earlier never observes later mutations. Equality is
/// structural.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub members: Vec<Rc<Member>>,
    pub edges: Vec<Rc<Edge>>,
}

impl Snapshot {
    /// Two members and one edge between them.
    pub fn seed() -> Self {
        let member = |id: &str, name: &str, role: &str, x: f64, y: f64| {
            Rc::new(Member {
                id: id.to_string(),
                name: name.to_string(),
                role: role.to_string(),
                position: Position::new(x, y),
            })
        };
        Snapshot {
            members: vec![
                member("1", "Alice", "Manager", 200.0, 100.0),
                member("2", "Bob", "Developer", 400.0, 300.0),
            ],
            edges: vec![Rc::new(Edge {
                id: "e1-2".to_string(),
                source: "1".to_string(),
                target: "2".to_string(),
            })],
        }
    }

    pub fn member(&self, id: &str) -> Option<&Rc<Member>> {
        self.members.iter().find(|m| m.id == id)
    }
    pub fn edge(&self, id: &str) -> Option<&Rc<Edge>> {
        self.edges.iter().find(|e| e.id == id)
    }
    pub fn has_member(&self, id: &str) -> bool {
        self.member(id).is_some()
    }

    /// First repeated id, reported as `(kind, id)`.
    pub fn first_duplicate_id(&self) -> Option<(&'static str, &str)> {
        let mut seen = HashSet::new();
        for m in &self.members {
            if !seen.insert(m.id.as_str()) {
                return Some(("member", m.id.as_str()));
            }
        }
        seen.clear();
        for e in &self.edges {
            if !seen.insert(e.id.as_str()) {
                return Some(("edge", e.id.as_str()));
            }
        }
        None
    }

    /// First member whose position cannot be written as JSON numbers.
    pub fn first_non_finite(&self) -> Option<&str> {
        self.members
            .iter()
            .find(|m| !m.position.is_finite())
            .map(|m| m.id.as_str())
    }

    /// Edges whose source or target names no current member.
    pub fn dangling_edges(&self) -> impl Iterator<Item = &Rc<Edge>> {
        self.edges
            .iter()
            .filter(move |e| !self.has_member(&e.source) || !self.has_member(&e.target))
    }
}
