/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Administrator - approves accounts, assigns packages, answers questions
pub const ROLE_ADMIN: &str = "admin";

/// Registered clinician asking questions
pub const ROLE_USER: &str = "user";

// =============================================================================
// ACCOUNT CONSTANTS
// =============================================================================

/// Account status assigned at registration
pub const ACCOUNT_STATUS_PENDING: &str = "pending";

/// Account status after admin approval
pub const ACCOUNT_STATUS_APPROVED: &str = "approved";

/// Package assigned at registration
pub const PACKAGE_FREE: &str = "free";
