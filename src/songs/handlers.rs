use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tracing::{error, info, instrument};

use crate::{
    auth::extractors::SessionUser, auth::session::SessionClaims, db::DbConn, state::AppState, ui,
};

use super::repo::{self, SONGS_LIMIT};
use super::row::DynRow;

// Both routes are session-gated; the JSON endpoint is not public.
pub fn song_routes() -> Router<AppState> {
    Router::new()
        .route("/songs", get(songs_page))
        .route("/api/songs", get(api_songs))
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => ui::escape(s),
        other => ui::escape(&other.to_string()),
    }
}

fn render_songs(user: &SessionClaims, rows: &[DynRow]) -> String {
    let nav = format!(
        r#"<nav><a href="/">Home</a> <span>{}</span> <a href="/logout">Log out</a></nav>"#,
        ui::escape(&user.email)
    );

    if rows.is_empty() {
        return format!("{nav}\n<h1>Songs</h1>\n<p>No songs found.</p>");
    }

    let header: String = rows[0]
        .column_names()
        .map(|name| format!("<th>{}</th>", ui::escape(name)))
        .collect();

    let body_rows: String = rows
        .iter()
        .map(|row| {
            let cells: String = row
                .fields()
                .iter()
                .map(|(_, value)| format!("<td>{}</td>", cell_text(value)))
                .collect();
            format!("        <tr>{cells}</tr>\n")
        })
        .collect();

    format!(
        r#"{nav}
<h1>Songs</h1>
<table>
    <thead><tr>{header}</tr></thead>
    <tbody>
{body_rows}    </tbody>
</table>"#
    )
}

#[instrument(skip(user, conn))]
pub async fn songs_page(SessionUser(user): SessionUser, DbConn(mut conn): DbConn) -> Response {
    match repo::list_songs(&mut conn, SONGS_LIMIT).await {
        Ok(rows) => {
            info!(user_id = %user.sub, rows = rows.len(), "songs page rendered");
            ui::page("Songs", None, &render_songs(&user, &rows)).into_response()
        }
        Err(e) => {
            error!(error = %e, "list songs failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "could not load songs".to_string(),
            )
                .into_response()
        }
    }
}

#[instrument(skip(user, conn))]
pub async fn api_songs(
    SessionUser(user): SessionUser,
    DbConn(mut conn): DbConn,
) -> Result<Json<Vec<DynRow>>, (StatusCode, String)> {
    let rows = repo::list_songs(&mut conn, SONGS_LIMIT)
        .await
        .map_err(internal)?;
    info!(user_id = %user.sub, rows = rows.len(), "songs listed");
    Ok(Json(rows))
}

fn internal<E: std::error::Error>(e: E) -> (StatusCode, String) {
    error!(error = %e, "songs query failed");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn make_claims() -> SessionClaims {
        SessionClaims {
            sub: Uuid::new_v4(),
            email: "a@x.com".into(),
            iat: 0,
            exp: 0,
            iss: "test".into(),
            aud: "test".into(),
        }
    }

    #[test]
    fn cell_text_formats_values() {
        assert_eq!(cell_text(&Value::Null), "");
        assert_eq!(cell_text(&json!("plain")), "plain");
        assert_eq!(cell_text(&json!("<b>x</b>")), "&lt;b&gt;x&lt;/b&gt;");
        assert_eq!(cell_text(&json!(42)), "42");
        assert_eq!(cell_text(&json!(true)), "true");
    }

    #[test]
    fn renders_table_from_discovered_columns() {
        let rows = vec![
            DynRow(vec![
                ("title".into(), json!("Take Five")),
                ("year".into(), json!(1959)),
            ]),
            DynRow(vec![
                ("title".into(), json!("So What")),
                ("year".into(), Value::Null),
            ]),
        ];
        let html = render_songs(&make_claims(), &rows);
        assert!(html.contains("<th>title</th><th>year</th>"));
        assert!(html.contains("<td>Take Five</td><td>1959</td>"));
        assert!(html.contains("<td>So What</td><td></td>"));
    }

    #[test]
    fn renders_empty_state() {
        let html = render_songs(&make_claims(), &[]);
        assert!(html.contains("No songs found."));
        assert!(html.contains("a@x.com"));
    }
}
