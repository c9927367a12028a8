use sqlx::PgConnection;

use super::row::DynRow;

/// Cap on how many songs one request pulls back.
pub const SONGS_LIMIT: i64 = 200;

pub async fn list_songs(conn: &mut PgConnection, limit: i64) -> Result<Vec<DynRow>, sqlx::Error> {
    let rows = sqlx::query("SELECT * FROM songs LIMIT $1")
        .bind(limit)
        .fetch_all(conn)
        .await?;
    Ok(rows.iter().map(DynRow::from_pg_row).collect())
}
