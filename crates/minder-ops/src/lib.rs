//! File operation engine for minder.
//!
//! This crate resolves user-typed path specs (relative paths, globs and the
//! `dir/.` contents form) and runs copy, move, remove and create operations
//! against the real filesystem. Conflicts with existing entries are settled
//! through a [`DecisionProvider`]; the [`OperationExecutor`] runs operations
//! on a blocking worker and hands conflicts back over a channel.

mod conflict;
mod copy;
mod create;
mod executor;
mod handoff;
mod move_op;
mod operation;
mod remove;
mod report;
mod resolve;
mod spec;
mod transfer;
mod wildcard;

pub use conflict::{
    Conflict, ConflictAction, ConflictArbiter, ConflictMode, ConflictSession, DecisionProvider,
    Disposition, FixedDecision,
};
pub use create::{create_directory, touch_file};
pub use executor::{OperationComplete, OperationEvent, OperationExecutor, RefreshHook};
pub use handoff::{ChannelProvider, DecisionRequest};
pub use operation::FileOperation;
pub use remove::{DangerousRoots, RemovalEngine};
pub use report::{OperationKind, OperationReport, ReportEntry, TransferOutcome};
pub use resolve::{PathResolver, base_dir, canonical_form, is_subpath, normalize, resolve_path};
pub use spec::{PathSpec, ResolvedSpec};
pub use transfer::{RenameFn, TransferEngine, TransferKind};
pub use wildcard::{expand, has_glob};

/// Default channel buffer size for operation events.
pub const OPERATION_CHANNEL_SIZE: usize = 100;
