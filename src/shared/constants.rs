/// Fixed page size of the idea listing
pub const IDEAS_PER_PAGE: i64 = 10;

/// Pseudo status name meaning "no status filter"
pub const ALL_STATUSES: &str = "All";

/// Attempts at claiming a free slug before giving up on a create
pub const MAX_SLUG_ATTEMPTS: usize = 5;

/// Buffered idea events per subscriber before old ones are dropped
pub const EVENT_BUS_CAPACITY: usize = 256;
