//! Business workflows, leaves first per the platform's dependency order:
//! profile store, priest application workflow (with its listing
//! provisioner), booking store, and the admin user directory read model.

pub mod booking;
pub mod directory;
pub mod priest;
pub mod profiles;
