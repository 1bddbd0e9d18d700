use crate::view::{ElementId, GroupId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("element handle {0:?} does not refer to a live element")]
    StaleElement(ElementId),
    #[error("dispatch group handle {0:?} does not refer to a live group")]
    StaleGroup(GroupId),
    #[error("element {0:?} is not a container and cannot own children")]
    NotAContainer(ElementId),
    #[error("moving {child:?} under {parent:?} would make it its own ancestor")]
    Cycle { child: ElementId, parent: ElementId },
}

pub type SceneResult<T> = Result<T, SceneError>;
