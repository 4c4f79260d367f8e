//! Google API endpoints and protocol constants

/// Sheets REST API root
pub const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com/v4";

/// OAuth2 token endpoint for service-account assertions
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Read/write access to spreadsheets
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Grant type for the JWT-bearer token exchange
pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for each signed assertion (Google caps it at one hour)
pub const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Refresh a cached token this long before it expires
pub const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

/// Cells are stored exactly as sent, never parsed as formulas or dates
pub const VALUE_INPUT_OPTION: &str = "RAW";

/// Appends insert new rows instead of overwriting blank ones
pub const INSERT_DATA_OPTION: &str = "INSERT_ROWS";
