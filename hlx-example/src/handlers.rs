use actix_web::{web, HttpResponse};
use hlx::{Document, HlxError, Operation};
use serde::Deserialize;

use crate::{AppState, Note};

/// Configure all API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/status", web::get().to(status))
            // Notes (typed)
            .route("/notes", web::post().to(create_note))
            .route("/notes/search", web::get().to(search_notes))
            .route("/notes/{id}", web::get().to(get_note))
            .route("/notes/{id}", web::delete().to(delete_note))
            // Snippets (dynamic)
            .route("/snippets", web::post().to(create_snippet))
            .route("/snippets/search", web::get().to(search_snippets))
            .route("/snippets/{id}", web::get().to(get_snippet))
            .route("/snippets/{id}", web::delete().to(delete_snippet)),
    );
}

#[derive(Deserialize)]
pub struct SearchQuery {
    q: String,
}

// ── Helpers ─────────────────────────────────────────────────────────

fn err_response(e: HlxError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match &e {
        HlxError::NotFound { .. } => HttpResponse::NotFound().json(body),
        HlxError::Encode(_) | HlxError::Decode(_) | HlxError::Schema(_) => {
            HttpResponse::BadRequest().json(body)
        }
        _ if e.operation() == Some(Operation::Search) => HttpResponse::BadRequest().json(body),
        _ => {
            log::error!("Internal error: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            }))
        }
    }
}

fn index_status<D, B: hlx::Backend>(index: &hlx::Index<D, B>) -> serde_json::Value
where
    D: hlx::FromRow,
{
    serde_json::json!({
        "table": index.table(),
        "fields": index.fields().names(),
        "count": index.count().ok(),
    })
}

// ── Status ──────────────────────────────────────────────────────────

async fn status(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "notes": index_status(&*state.notes()),
        "snippets": index_status(&*state.snippets()),
    }))
}

// ── Notes ───────────────────────────────────────────────────────────

async fn create_note(state: web::Data<AppState>, body: web::Json<Note>) -> HttpResponse {
    match state.notes().insert(&[body.into_inner()]) {
        Ok(ids) => HttpResponse::Created().json(serde_json::json!({ "id": ids[0] })),
        Err(e) => err_response(e),
    }
}

async fn search_notes(state: web::Data<AppState>, query: web::Query<SearchQuery>) -> HttpResponse {
    match state.notes().search(&query.q) {
        Ok(notes) => HttpResponse::Ok().json(notes),
        Err(e) => err_response(e),
    }
}

async fn get_note(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    match state.notes().get(&path) {
        Ok(note) => HttpResponse::Ok().json(note),
        Err(e) => err_response(e),
    }
}

async fn delete_note(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    match state.notes().delete(&path) {
        Ok(deleted) => HttpResponse::Ok().json(serde_json::json!({ "ok": true, "deleted": deleted })),
        Err(e) => err_response(e),
    }
}

// ── Snippets ────────────────────────────────────────────────────────

async fn create_snippet(
    state: web::Data<AppState>,
    body: web::Json<serde_json::Value>,
) -> HttpResponse {
    let doc = match Document::from_json(&body) {
        Ok(doc) => doc,
        Err(e) => return err_response(e),
    };
    match state.snippets().insert_map(&[doc]) {
        Ok(ids) => HttpResponse::Created().json(serde_json::json!({ "id": ids[0] })),
        Err(e) => err_response(e),
    }
}

async fn search_snippets(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> HttpResponse {
    match state.snippets().search(&query.q) {
        Ok(docs) => HttpResponse::Ok().json(docs),
        Err(e) => err_response(e),
    }
}

async fn get_snippet(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    match state.snippets().get(&path) {
        Ok(doc) => HttpResponse::Ok().json(doc),
        Err(e) => err_response(e),
    }
}

async fn delete_snippet(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    match state.snippets().delete(&path) {
        Ok(deleted) => HttpResponse::Ok().json(serde_json::json!({ "ok": true, "deleted": deleted })),
        Err(e) => err_response(e),
    }
}
