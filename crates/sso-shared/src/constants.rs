//! Application-wide constants

/// Id carried by a registered service that has not been persisted yet.
pub const UNASSIGNED_SERVICE_ID: i64 = 0;

/// A `service_id` starting with this prefix is a full regular expression.
pub const REGEX_PATTERN_PREFIX: char = '^';

pub const MAX_SERVICE_NAME_LENGTH: u64 = 255;
pub const MAX_SERVICE_ID_LENGTH: u64 = 2048;
pub const MAX_DESCRIPTION_LENGTH: u64 = 2000;
pub const MAX_THEME_LENGTH: u64 = 100;

/// Attributes treated as identity-bearing when no deployment list is configured.
pub const DEFAULT_IDENTITY_ATTRIBUTES: &[&str] = &[
    "uid",
    "employeeNumber",
    "eduPersonPrincipalName",
    "eduPersonTargetedID",
    "principal",
];
