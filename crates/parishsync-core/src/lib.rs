//! # Parishsync Core Library
//!
//! This library provides the core business logic for the Parishsync
//! parish meeting scheduler. It implements a CLI-first philosophy where
//! all operations are available via a standalone CLI binary; any GUI is
//! a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Liturgical Engine**: Pure functions over a bundled data table
//!   (fixed feasts, Pascha-anchored moveable feasts, fasting rules,
//!   choir tones, seasons)
//! - **Conflict Detection**: Pure checks of meetings against the
//!   liturgy windows implied by parish settings
//! - **Storage**: SQLite-based meeting storage and TOML-based parish
//!   settings
//! - **Sync**: Two-way reconciliation with an external calendar store
//!   (export, smart import, drift detection)
//! - **Remote**: Cached day lookups with local-engine fallback
//!
//! ## Key Components
//!
//! - [`LiturgicalData`]: Bundled feast and Pascha tables
//! - [`MeetingDb`]: Meeting persistence
//! - [`ParishSettings`]: Parish configuration
//! - [`CalendarStore`]: Trait for external calendar backends
//! - [`App`]: Application state and command entry points

pub mod app;
pub mod conflict;
pub mod error;
pub mod liturgical;
pub mod meeting;
pub mod remote;
pub mod storage;
pub mod sync;

pub use app::{App, RefreshSummary, SaveOutcome};
pub use conflict::{detect_all_conflicts, detect_conflict, Conflict, ConflictType, Severity};
pub use error::{ConfigError, CoreError, Result, StoreError, ValidationError};
pub use liturgical::{
    FastingLevel, FeastLevel, LiturgicalData, OrthodoxEvent, Season,
};
pub use meeting::Meeting;
pub use remote::{DayDetail, DayDetailClient, DayInfo, DayLookupClient, DaySource};
pub use storage::{MeetingDb, MeetingStore, ParishSettings};
pub use sync::{
    CalendarStore, DriftSummary, GoogleCalendarStore, ImportSummary, PermissionStatus, SyncError,
    SyncReconciler,
};
