use anyhow::Result;
use diesel::{
    Connection, PgConnection,
    r2d2::{ConnectionManager, Pool},
};

pub type PgPoolSquad = Pool<ConnectionManager<PgConnection>>;

pub fn establish_connection(database_url: &str) -> Result<PgPoolSquad> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = Pool::builder().build(manager)?;
    Ok(pool)
}

/// Runs `f` inside one database transaction: commit on `Ok`, rollback on any
/// `Err`, including early returns. Every mutating settlement sequence goes
/// through here so partial ledger state is never visible.
pub fn with_transaction<T, F>(pool: &PgPoolSquad, f: F) -> Result<T>
where
    F: FnOnce(&mut PgConnection) -> Result<T>,
{
    let mut conn = pool.get()?;
    conn.transaction(|conn| f(conn))
}
