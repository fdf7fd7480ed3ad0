#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]
//! Rendering-agnostic core behind the admin menu tables.
//!
//! Builds stable row identities from a catalog snapshot, derives tri-state
//! selection and actionable roots, maps row clicks onto selection and
//! expansion, and runs the drag-to-reorder gesture against injected
//! persistence and undo collaborators.

pub mod click;
pub mod config;
pub mod drag;
pub mod error;
pub mod key;
pub mod model;
pub mod pinned;
pub mod ports;
pub mod registry;
pub mod selection;
pub mod store;
pub mod timer;

pub use click::{ClickDisambiguator, ClickEffect, ClickEvent, RowClickHandler};
pub use config::EngineTimings;
pub use drag::{
    DragEligibility, DragOverOutcome, DragReorderEngine, DropOutcome, DropPosition, ReorderPlan,
    RowBounds,
};
pub use error::{ConfigError, KeyParseError, ReorderError, ReorderResult};
pub use key::{EntityId, EntityKind, RowKey};
pub use model::{Entity, Group, MenuGroup, MenuItem};
pub use pinned::{PinnedRows, split_pinned};
pub use ports::{ReorderCommand, ReorderOps, UndoAction, UndoSink};
pub use registry::{Level, Registry, RowIdentity};
pub use selection::{CheckboxState, HeaderStats, SelectionModel, SelectionSet};
pub use store::{ExpandStore, MemorySelectionStore, Navigator, SelectionStore};
