use crate::error::EventError;
use crate::model::{EdgeId, MemberId, Position};
use serde::{Deserialize, Serialize};

/// Gesture reported by the rendering canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CanvasEvent {
    /// `dragging` stays true while the pointer is held; the release arrives
    /// with `dragging: false` and the final position.
    PositionChanged {
        id: MemberId,
        position: Position,
        dragging: bool,
    },
    DragCancelled {
        id: MemberId,
    },
    /// Either end is absent when the gesture was dropped on empty canvas.
    ConnectCompleted {
        #[serde(default)]
        source: Option<MemberId>,
        #[serde(default)]
        target: Option<MemberId>,
    },
    NodeClicked {
        id: MemberId,
    },
    EdgeClicked {
        id: EdgeId,
    },
}

impl CanvasEvent {
    pub fn validate(&self) -> Result<(), EventError> {
        match self {
            CanvasEvent::PositionChanged { id, position, .. } => {
                require_id(id)?;
                if !position.x.is_finite() {
                    return Err(EventError::NonFinite("x"));
                }
                if !position.y.is_finite() {
                    return Err(EventError::NonFinite("y"));
                }
                Ok(())
            }
            CanvasEvent::DragCancelled { id }
            | CanvasEvent::NodeClicked { id }
            | CanvasEvent::EdgeClicked { id } => require_id(id),
            CanvasEvent::ConnectCompleted { .. } => Ok(()),
        }
    }

    /// Both endpoints of a completed connection, if the gesture has them.
    pub fn connection(&self) -> Option<(&str, &str)> {
        match self {
            CanvasEvent::ConnectCompleted {
                source: Some(source),
                target: Some(target),
            } if !source.is_empty() && !target.is_empty() => Some((source.as_str(), target.as_str())),
            _ => None,
        }
    }
}

fn require_id(id: &str) -> Result<(), EventError> {
    if id.is_empty() {
        Err(EventError::EmptyId("id"))
    } else {
        Ok(())
    }
}
