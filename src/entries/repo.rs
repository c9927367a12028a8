use sqlx::PgConnection;

pub async fn list_names(conn: &mut PgConnection) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT name FROM entries ORDER BY id")
        .fetch_all(conn)
        .await
}

pub async fn insert_name(conn: &mut PgConnection, name: &str) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO entries (name) VALUES ($1)")
        .bind(name)
        .execute(conn)
        .await?;
    Ok(())
}
