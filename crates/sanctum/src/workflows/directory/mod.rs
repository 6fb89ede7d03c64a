//! Admin user directory: profiles joined with auth-provider email
//! addresses, filtered in memory for the back-office user list.

pub mod router;
pub mod service;

pub use router::directory_router;
pub use service::{
    filter_entries, AccountError, AccountProvider, DirectoryEntry, DirectoryError, RoleFilter,
    UserDirectory, UNKNOWN_EMAIL,
};
