use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use tracing::{error, info, instrument};

use crate::{
    auth::extractors::MaybeSession, auth::session::SessionClaims, db::DbConn, state::AppState, ui,
};

use super::repo;

#[derive(Debug, Deserialize)]
pub struct AddEntry {
    pub name: String,
}

pub fn entry_routes() -> Router<AppState> {
    Router::new().route("/", get(index)).route("/add", post(add))
}

fn render_index(names: &[String], session: Option<&SessionClaims>) -> String {
    let nav = match session {
        Some(claims) => format!(
            r#"<nav><a href="/songs">Songs</a> <span>{}</span> <a href="/logout">Log out</a></nav>"#,
            ui::escape(&claims.email)
        ),
        None => r#"<nav><a href="/login">Login</a><a href="/register">Register</a></nav>"#.into(),
    };

    let items: String = names
        .iter()
        .map(|name| format!("    <li>{}</li>\n", ui::escape(name)))
        .collect();

    format!(
        r#"{nav}
<h1>Entries</h1>
<ul>
{items}</ul>
<form method="post" action="/add">
    <label>Name <input type="text" name="name" required></label>
    <button type="submit">Add</button>
</form>"#
    )
}

#[instrument(skip(conn, session))]
pub async fn index(DbConn(mut conn): DbConn, MaybeSession(session): MaybeSession) -> Response {
    let names = match repo::list_names(&mut conn).await {
        Ok(names) => names,
        Err(e) => {
            error!(error = %e, "list entries failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "could not load entries".to_string(),
            )
                .into_response();
        }
    };

    ui::page("Entries", None, &render_index(&names, session.as_ref())).into_response()
}

#[instrument(skip(conn, payload))]
pub async fn add(DbConn(mut conn): DbConn, Form(payload): Form<AddEntry>) -> Response {
    match repo::insert_name(&mut conn, &payload.name).await {
        Ok(()) => {
            info!(name = %payload.name, "entry added");
            Redirect::to("/").into_response()
        }
        Err(e) => {
            error!(error = %e, "insert entry failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "could not add entry".to_string(),
            )
                .into_response()
        }
    }
}
