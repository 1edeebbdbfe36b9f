// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display and platform directories)
pub const APP_NAME: &str = "Stockroom";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "stockroom";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".stockroom";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "stockroom.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "STOCKROOM_CONFIG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "STOCKROOM_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "STOCKROOM_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "STOCKROOM_LOG";

/// Environment variable for debug mode
pub const ENV_DEBUG: &str = "STOCKROOM_DEBUG";

/// Environment variable to override data directory
pub const ENV_DATA_DIR: &str = "STOCKROOM_DATA_DIR";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5570;

/// Seconds to wait for background tasks during shutdown
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// SQLite Database
// =============================================================================

/// SQLite database filename
pub const SQLITE_DB_FILENAME: &str = "stockroom.db";

/// SQLite connection pool max connections
pub const SQLITE_MAX_CONNECTIONS: u32 = 5;

/// SQLite busy timeout in seconds
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 30;

/// SQLite cache size (negative = KB, so -64000 = 64MB)
pub const SQLITE_CACHE_SIZE: &str = "-64000";

/// SQLite WAL autocheckpoint threshold (pages)
pub const SQLITE_WAL_AUTOCHECKPOINT: &str = "1000";

/// Interval between background WAL checkpoints in seconds
pub const SQLITE_CHECKPOINT_INTERVAL_SECS: u64 = 300;

// =============================================================================
// Table Query Contract
// =============================================================================

/// Default page number (1-based)
pub const DEFAULT_PAGE: u32 = 1;

/// Default items per page
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Maximum items per page
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Maximum number of filter conditions per request
pub const MAX_FILTERS: usize = 50;

/// Maximum size of the filters JSON param in bytes (64KB)
pub const MAX_FILTER_JSON_SIZE: usize = 64 * 1024;

/// Maximum number of sort entries per request
pub const MAX_SORT_ENTRIES: usize = 10;

// =============================================================================
// Dashboard
// =============================================================================

/// Stock quantity at or below which a product counts as low stock
pub const LOW_STOCK_THRESHOLD: i64 = 10;
