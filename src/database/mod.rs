pub mod connection;
pub mod ledger;
pub mod matches;
pub mod models;
pub mod notifications;
pub mod players;
pub mod reports;
pub mod setup;
pub mod snapshots;
pub mod tournaments;

pub use connection::{create_memory_pool, create_pool, get_connection, DbConn, DbPool};
pub use models::*;

/// Maps a TEXT column onto one of the domain enums, failing the row parse
/// when the stored value is unknown.
pub(crate) fn text_column<T>(
    idx: usize,
    raw: String,
    parse: impl Fn(&str) -> Option<T>,
) -> rusqlite::Result<T> {
    parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            format!("unrecognized value '{raw}'").into(),
        )
    })
}
