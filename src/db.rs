use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
};
use sqlx::{pool::PoolConnection, PgPool, Postgres};
use tracing::error;

/// One database connection scoped to one request.
///
/// Acquired before the handler body runs; released exactly once when the
/// request ends, on every exit path, by `PoolConnection`'s drop. When the
/// pool cannot produce a connection the request is rejected with 503 and
/// no handler logic executes.
pub struct DbConn(pub PoolConnection<Postgres>);

#[async_trait]
impl<S> FromRequestParts<S> for DbConn
where
    S: Send + Sync,
    PgPool: FromRef<S>,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pool = PgPool::from_ref(state);
        match pool.acquire().await {
            Ok(conn) => Ok(DbConn(conn)),
            Err(e) => {
                error!(error = %e, "could not acquire database connection");
                Err((
                    StatusCode::SERVICE_UNAVAILABLE,
                    "database unavailable".to_string(),
                ))
            }
        }
    }
}
