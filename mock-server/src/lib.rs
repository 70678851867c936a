use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use base64::prelude::*;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

#[derive(Clone, Debug, Serialize)]
pub struct Page {
    pub page_name: String,
    #[serde(skip)]
    pub password: String,
    pub title: String,
    pub content: String,
}

#[derive(Deserialize)]
pub struct NewPage {
    pub page_name: String,
    pub password: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Deserialize)]
pub struct PageUpdate {
    pub page_name: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
}

pub type Db = Arc<RwLock<HashMap<String, Page>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/pages", post(create_page))
        .route(
            "/pages/{name}",
            get(get_page).put(update_page).delete(delete_page),
        )
        .route("/pages/{name}/{format}", get(get_page_format))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn name_is_valid(name: &str) -> bool {
    (2..=60).contains(&name.chars().count())
}

fn password_is_valid(password: &str) -> bool {
    (1..=30).contains(&password.chars().count())
}

fn title_is_valid(title: &str) -> bool {
    title.chars().count() <= 255
}

/// Every route requires a non-empty `api-key` header.
fn require_api_key(headers: &HeaderMap) -> Result<(), StatusCode> {
    match headers.get("api-key").and_then(|v| v.to_str().ok()) {
        Some(key) if !key.is_empty() => Ok(()),
        _ => Err(StatusCode::BAD_REQUEST),
    }
}

/// Decode `Authorization: Basic ...` into (user, password).
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = String::from_utf8(BASE64_STANDARD.decode(encoded).ok()?).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

/// 401 without credentials, 403 when they don't match the page.
fn authorize(headers: &HeaderMap, page: &Page) -> Result<(), StatusCode> {
    match basic_credentials(headers) {
        None => Err(StatusCode::UNAUTHORIZED),
        Some((user, password)) if user == page.page_name && password == page.password => Ok(()),
        Some(_) => Err(StatusCode::FORBIDDEN),
    }
}

/// Anonymous reads are allowed; credentials, when sent, must match.
fn authorize_read(headers: &HeaderMap, page: &Page) -> Result<(), StatusCode> {
    if headers.contains_key(header::AUTHORIZATION) {
        authorize(headers, page)
    } else {
        Ok(())
    }
}

fn escape_markup(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn render_html(page: &Page) -> Response {
    let html = format!(
        "<html><head><title>{}</title></head><body>{}</body></html>",
        escape_markup(&page.title),
        escape_markup(&page.content)
    );
    ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], html).into_response()
}

fn render_xml(page: &Page) -> Response {
    let xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <page><page_name>{}</page_name><title>{}</title><content>{}</content></page>",
        escape_markup(&page.page_name),
        escape_markup(&page.title),
        escape_markup(&page.content)
    );
    ([(header::CONTENT_TYPE, "application/xml")], xml).into_response()
}

async fn lookup(db: &Db, headers: &HeaderMap, name: &str) -> Result<Page, StatusCode> {
    require_api_key(headers)?;
    let pages = db.read().await;
    let page = pages.get(name).cloned().ok_or(StatusCode::NOT_FOUND)?;
    authorize_read(headers, &page)?;
    Ok(page)
}

/// Also answers HEAD, which the router derives from the GET route.
async fn get_page(
    State(db): State<Db>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Result<Response, StatusCode> {
    let page = lookup(&db, &headers, &name).await?;
    Ok(render_html(&page))
}

async fn get_page_format(
    State(db): State<Db>,
    Path((name, format)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, StatusCode> {
    let page = lookup(&db, &headers, &name).await?;
    match format.as_str() {
        "html" => Ok(render_html(&page)),
        "json" => Ok(Json(page).into_response()),
        "xml" => Ok(render_xml(&page)),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

async fn create_page(
    State(db): State<Db>,
    headers: HeaderMap,
    Form(input): Form<NewPage>,
) -> Result<StatusCode, StatusCode> {
    require_api_key(&headers)?;
    if !name_is_valid(&input.page_name)
        || !password_is_valid(&input.password)
        || !title_is_valid(&input.title)
    {
        return Err(StatusCode::PRECONDITION_FAILED);
    }
    let mut pages = db.write().await;
    if pages.contains_key(&input.page_name) {
        return Err(StatusCode::CONFLICT);
    }
    info!(page = %input.page_name, "page created");
    pages.insert(
        input.page_name.clone(),
        Page {
            page_name: input.page_name,
            password: input.password,
            title: input.title,
            content: input.content,
        },
    );
    Ok(StatusCode::CREATED)
}

async fn update_page(
    State(db): State<Db>,
    Path(name): Path<String>,
    headers: HeaderMap,
    Form(input): Form<PageUpdate>,
) -> Result<Response, StatusCode> {
    require_api_key(&headers)?;
    let mut pages = db.write().await;
    let page = pages.get(&name).ok_or(StatusCode::NOT_FOUND)?;
    authorize(&headers, page)?;

    let new_name = input.page_name.filter(|n| !n.is_empty() && *n != name);
    if let Some(new_name) = &new_name {
        if !name_is_valid(new_name) {
            return Err(StatusCode::PRECONDITION_FAILED);
        }
        if pages.contains_key(new_name) {
            return Err(StatusCode::CONFLICT);
        }
    }
    if let Some(title) = &input.title {
        if !title_is_valid(title) {
            return Err(StatusCode::PRECONDITION_FAILED);
        }
    }

    let mut page = pages.remove(&name).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(title) = input.title {
        page.title = title;
    }
    if let Some(content) = input.content {
        page.content = content;
    }
    match new_name {
        Some(new_name) => {
            info!(from = %name, to = %new_name, "page renamed");
            page.page_name = new_name.clone();
            pages.insert(new_name.clone(), page);
            let location = format!("/pages/{new_name}");
            Ok((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response())
        }
        None => {
            pages.insert(name, page);
            Ok(StatusCode::NO_CONTENT.into_response())
        }
    }
}

async fn delete_page(
    State(db): State<Db>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    require_api_key(&headers)?;
    let mut pages = db.write().await;
    let page = pages.get(&name).ok_or(StatusCode::NOT_FOUND)?;
    authorize(&headers, page)?;
    pages.remove(&name);
    info!(page = %name, "page deleted");
    Ok(StatusCode::NO_CONTENT)
}
