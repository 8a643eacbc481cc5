use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of one native engine instance, as returned by the backend's
/// `create()`.
///
/// An id is only an identity: the backend it came from stays inside the
/// session's lock, so holding an id grants no access to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EngineId(u64);

impl EngineId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "engine#{:x}", self.0)
    }
}

/// Engine handle state machine.
///
/// ```text
/// Absent ──create()──▶ Active(id)
///   ▲                     │
///   └──────delete(id)─────┘
/// ```
///
/// The handle is `Active` exactly while the native instance is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineHandle {
    #[default]
    Absent,
    Active(EngineId),
}

impl EngineHandle {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn id(&self) -> Option<EngineId> {
        match self {
            Self::Active(id) => Some(*id),
            Self::Absent => None,
        }
    }
}

impl From<Option<EngineId>> for EngineHandle {
    fn from(slot: Option<EngineId>) -> Self {
        slot.map_or(Self::Absent, Self::Active)
    }
}

/// Host application foreground state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecyclePhase {
    Foreground,
    Background,
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Foreground => f.write_str("foreground"),
            Self::Background => f.write_str("background"),
        }
    }
}
