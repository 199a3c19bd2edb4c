use crate::dashboard::build_dashboard;
use crate::errors::AppError;
use crate::models::{DashboardView, LoginForm, SelectedFile, SelectionResponse, SubmitResponse, SubmitStatus};
use crate::state::AppState;
use crate::storage::off_thread;
use crate::ui::{render_dashboard, render_login, render_upload};
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use tracing::{info, warn};

pub async fn index() -> Redirect {
    Redirect::to("/login")
}

pub async fn login_page(State(state): State<AppState>) -> Html<String> {
    Html(render_login(state.identity.get().as_deref(), None))
}

pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Result<Response, AppError> {
    let email = form.email.trim();
    if email.is_empty() || form.password.is_empty() {
        let page = render_login(None, Some("Please enter email and password"));
        return Ok((StatusCode::BAD_REQUEST, Html(page)).into_response());
    }

    let identity = state.identity.clone();
    let tag = email.to_string();
    off_thread(move || identity.set(&tag)).await?;
    info!("identity set for {email}");
    Ok(Redirect::to("/upload").into_response())
}

pub async fn logout(State(state): State<AppState>) -> Result<Redirect, AppError> {
    let identity = state.identity.clone();
    off_thread(move || identity.clear()).await?;
    Ok(Redirect::to("/login"))
}

pub async fn upload_page(State(state): State<AppState>) -> Html<String> {
    Html(render_upload(&state.identity.current()))
}

pub async fn dashboard_page() -> Html<String> {
    Html(render_dashboard())
}

pub async fn list_files(State(state): State<AppState>) -> Json<SelectionResponse> {
    Json(state.uploader.selection().await)
}

/// Accepts every file part of a multipart body, whatever its field name.
/// Plain text fields are ignored.
pub async fn add_files(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SelectionResponse>, AppError> {
    let mut batch = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);
        let content = field.bytes().await?;

        let mut file = SelectedFile::new(name, content);
        if let Some(content_type) = content_type {
            file = file.with_content_type(content_type);
        }
        batch.push(file);
    }

    if batch.is_empty() {
        warn!("file upload request carried no files");
        return Err(AppError::bad_request("No files"));
    }

    Ok(Json(state.uploader.add_files(batch).await?))
}

pub async fn remove_file(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<SelectionResponse>, AppError> {
    Ok(Json(state.uploader.remove_file(index).await?))
}

pub async fn clear_files(State(state): State<AppState>) -> Result<Json<SelectionResponse>, AppError> {
    Ok(Json(state.uploader.clear_files().await?))
}

pub async fn submit(State(state): State<AppState>) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
    let response = state.uploader.submit().await?;
    let status = match response.status {
        SubmitStatus::Success => StatusCode::OK,
        SubmitStatus::Error => StatusCode::BAD_GATEWAY,
    };
    Ok((status, Json(response)))
}

pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardView> {
    Json(build_dashboard(state.cache.get().as_ref()))
}

pub async fn clear_dashboard(State(state): State<AppState>) -> Result<Json<DashboardView>, AppError> {
    let cache = state.cache.clone();
    off_thread(move || cache.clear()).await?;
    info!("cached result cleared");
    Ok(Json(build_dashboard(None)))
}

pub async fn regenerate_summary(State(state): State<AppState>) -> Result<Json<DashboardView>, AppError> {
    Ok(Json(state.summarizer.regenerate().await?))
}
