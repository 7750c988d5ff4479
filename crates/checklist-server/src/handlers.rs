//! Route handlers for `/lists`.
//!
//! Each handler works on its request's copy of the session: read, validate,
//! mutate, write back, then render or redirect. Validation failures re-render
//! the originating form (422) and leave the stored session untouched apart
//! from consumed flash messages. References to lists or todos that do not
//! exist redirect to `/lists` with an error flash.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use checklist_core::errors::ListError;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::AppError;
use crate::server::AppState;
use crate::session::Session;

type HandlerResult = Result<Response, AppError>;

const LIST_CREATED: &str = "The list has been created.";
const LIST_UPDATED: &str = "The list has been updated.";
const LIST_DELETED: &str = "The list has been deleted.";
const TODO_ADDED: &str = "The todo was added.";
const TODO_DELETED: &str = "The todo has been deleted.";
const TODO_UPDATED: &str = "The todo has been updated.";
const ALL_COMPLETED: &str = "All todos have been completed.";

#[derive(Debug, Deserialize)]
pub struct ListNameForm {
    #[serde(default)]
    pub list_name: String,
}

#[derive(Debug, Deserialize)]
pub struct TodoForm {
    #[serde(default)]
    pub todo: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckForm {
    #[serde(default)]
    pub completed: String,
}

/// Path segments are zero-based positions written as plain ASCII digits.
/// Anything else, including a sign, resolves to a position that never exists.
fn position(raw: &str) -> usize {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return usize::MAX;
    }
    raw.parse().unwrap_or(usize::MAX)
}

fn redirect_to_list(index: usize) -> Redirect {
    Redirect::to(&format!("/lists/{index}"))
}

/// Commit the session and send the browser to `to`.
fn redirect(state: &AppState, session: Session, to: Redirect) -> HandlerResult {
    let jar = session.commit(state)?;
    Ok((jar, to).into_response())
}

fn page(state: &AppState, session: Session, status: StatusCode, html: String) -> HandlerResult {
    let jar = session.commit(state)?;
    Ok((status, jar, Html(html)).into_response())
}

/// Missing list or todo: flash the error and fall back to the index page.
fn not_found(state: &AppState, mut session: Session, err: &ListError) -> HandlerResult {
    debug!(session_id = %session.id, error = %err, "reference not found");
    session.data.flash.error = Some(err.to_string());
    redirect(state, session, Redirect::to("/lists"))
}

/// GET /
pub async fn root() -> Redirect {
    Redirect::to("/lists")
}

/// GET /lists
pub async fn index(State(state): State<AppState>, mut session: Session) -> HandlerResult {
    let flash = session.data.flash.take();
    let html = state.views.lists_page(&session.data.lists, &flash)?;
    page(&state, session, StatusCode::OK, html)
}

/// GET /lists/new
pub async fn new_list(State(state): State<AppState>, mut session: Session) -> HandlerResult {
    let flash = session.data.flash.take();
    let html = state.views.new_list_page(&flash, "")?;
    page(&state, session, StatusCode::OK, html)
}

/// POST /lists
pub async fn create_list(
    State(state): State<AppState>,
    mut session: Session,
    Form(form): Form<ListNameForm>,
) -> HandlerResult {
    let name = form.list_name.trim();
    match session.data.lists.create_list(name) {
        Ok(list) => {
            info!(session_id = %session.id, list = %list.name, "list created");
            session.data.flash.success = Some(LIST_CREATED.to_string());
            redirect(&state, session, Redirect::to("/lists"))
        }
        Err(err) => {
            let mut flash = session.data.flash.take();
            flash.error = Some(err.to_string());
            let html = state.views.new_list_page(&flash, name)?;
            page(&state, session, StatusCode::UNPROCESSABLE_ENTITY, html)
        }
    }
}

/// GET /lists/{id}
pub async fn show_list(
    State(state): State<AppState>,
    mut session: Session,
    Path(id): Path<String>,
) -> HandlerResult {
    let index = position(&id);
    let flash = session.data.flash.take();
    let html = match session.data.lists.get(index) {
        Ok(list) => state.views.list_page(index, list, &flash, "")?,
        Err(err) => return not_found(&state, session, &err),
    };
    page(&state, session, StatusCode::OK, html)
}

/// GET /lists/{id}/edit
pub async fn edit_list(
    State(state): State<AppState>,
    mut session: Session,
    Path(id): Path<String>,
) -> HandlerResult {
    let index = position(&id);
    let flash = session.data.flash.take();
    let html = match session.data.lists.get(index) {
        Ok(list) => state.views.edit_list_page(index, list, &flash, &list.name)?,
        Err(err) => return not_found(&state, session, &err),
    };
    page(&state, session, StatusCode::OK, html)
}

/// POST /lists/{id}/edit
pub async fn rename_list(
    State(state): State<AppState>,
    mut session: Session,
    Path(id): Path<String>,
    Form(form): Form<ListNameForm>,
) -> HandlerResult {
    let index = position(&id);
    let name = form.list_name.trim();
    let policy = state.config.rename_policy;
    match session.data.lists.rename_list(index, name, policy) {
        Ok(_) => {
            info!(session_id = %session.id, index, list = %name, "list renamed");
            session.data.flash.success = Some(LIST_UPDATED.to_string());
            redirect(&state, session, redirect_to_list(index))
        }
        Err(err @ ListError::NotFound(_)) => not_found(&state, session, &err),
        Err(err) => {
            let mut flash = session.data.flash.take();
            flash.error = Some(err.to_string());
            let html = match session.data.lists.get(index) {
                Ok(list) => state.views.edit_list_page(index, list, &flash, name)?,
                Err(missing) => return not_found(&state, session, &missing),
            };
            page(&state, session, StatusCode::UNPROCESSABLE_ENTITY, html)
        }
    }
}

/// POST /lists/{id}/destroy
pub async fn destroy_list(
    State(state): State<AppState>,
    mut session: Session,
    Path(id): Path<String>,
) -> HandlerResult {
    match session.data.lists.delete_list(position(&id)) {
        Ok(list) => {
            info!(session_id = %session.id, list = %list.name, "list deleted");
            session.data.flash.delete = Some(LIST_DELETED.to_string());
            redirect(&state, session, Redirect::to("/lists"))
        }
        Err(err) => not_found(&state, session, &err),
    }
}

/// POST /lists/{id}/todos
pub async fn add_todo(
    State(state): State<AppState>,
    mut session: Session,
    Path(id): Path<String>,
    Form(form): Form<TodoForm>,
) -> HandlerResult {
    let index = position(&id);
    let name = form.todo.trim();
    match session.data.lists.add_todo(index, name) {
        Ok(todo) => {
            debug!(session_id = %session.id, index, todo_id = todo.id, "todo added");
            session.data.flash.success = Some(TODO_ADDED.to_string());
            redirect(&state, session, redirect_to_list(index))
        }
        Err(err @ ListError::NotFound(_)) => not_found(&state, session, &err),
        Err(err) => {
            let mut flash = session.data.flash.take();
            flash.error = Some(err.to_string());
            let html = match session.data.lists.get(index) {
                Ok(list) => state.views.list_page(index, list, &flash, name)?,
                Err(missing) => return not_found(&state, session, &missing),
            };
            page(&state, session, StatusCode::UNPROCESSABLE_ENTITY, html)
        }
    }
}

/// POST /lists/{id}/todos/{todo_id}/destroy
pub async fn destroy_todo(
    State(state): State<AppState>,
    mut session: Session,
    Path((id, todo_id)): Path<(String, String)>,
) -> HandlerResult {
    let index = position(&id);
    match session.data.lists.delete_todo(index, position(&todo_id)) {
        Ok(todo) => {
            debug!(session_id = %session.id, index, todo_id = todo.id, "todo deleted");
            session.data.flash.delete = Some(TODO_DELETED.to_string());
            redirect(&state, session, redirect_to_list(index))
        }
        Err(err) => not_found(&state, session, &err),
    }
}

/// POST /lists/{id}/todos/{todo_id}/check
pub async fn check_todo(
    State(state): State<AppState>,
    mut session: Session,
    Path((id, todo_id)): Path<(String, String)>,
    Form(form): Form<CheckForm>,
) -> HandlerResult {
    let index = position(&id);
    let completed = form.completed == "true";
    match session
        .data
        .lists
        .set_todo_completed(index, position(&todo_id), completed)
    {
        Ok(()) => {
            session.data.flash.success = Some(TODO_UPDATED.to_string());
            redirect(&state, session, redirect_to_list(index))
        }
        Err(err) => not_found(&state, session, &err),
    }
}

/// POST /lists/{id}/todos/complete_all
pub async fn complete_all(
    State(state): State<AppState>,
    mut session: Session,
    Path(id): Path<String>,
) -> HandlerResult {
    let index = position(&id);
    match session.data.lists.complete_all(index) {
        Ok(()) => {
            session.data.flash.success = Some(ALL_COMPLETED.to_string());
            redirect(&state, session, redirect_to_list(index))
        }
        Err(err) => not_found(&state, session, &err),
    }
}
