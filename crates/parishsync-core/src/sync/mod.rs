//! Two-way synchronization between local meetings and an external
//! calendar store.
//!
//! Reconciliation passes are not safe to run concurrently; callers must
//! serialize them (the [`crate::app::App`] entry points hold a single
//! in-flight guard).

pub mod google;
pub mod reconciler;
pub mod store;
pub mod types;

pub use google::GoogleCalendarStore;
pub use reconciler::{SyncReconciler, APP_CALENDAR_NAME};
pub use store::CalendarStore;
pub use types::{
    CalendarInfo, DriftSummary, EventDetails, ExternalEvent, ImportSummary, PermissionStatus,
    SyncError,
};

/// Thin wrapper around the OS keyring for credential storage.
pub mod keyring_store {
    const SERVICE: &str = "parishsync";

    pub fn get(key: &str) -> Result<Option<String>, Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn set(key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        entry.set_password(value)?;
        Ok(())
    }

    pub fn delete(key: &str) -> Result<(), Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, key)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
