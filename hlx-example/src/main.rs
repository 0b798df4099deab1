use actix_web::{web, App, HttpServer};
use hlx::{Document, Index, IndexOptions};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[allow(dead_code)]
mod generated {
    include!(concat!(env!("OUT_DIR"), "/generated.rs"));
}
mod handlers;

pub use generated::Note;

/// Shared application state. SQLite connections are not `Sync`, so each
/// index sits behind its own lock.
pub struct AppState {
    pub notes: Mutex<Index<Note>>,
    pub snippets: Mutex<Index<Document>>,
}

impl AppState {
    pub fn notes(&self) -> MutexGuard<'_, Index<Note>> {
        self.notes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snippets(&self) -> MutexGuard<'_, Index<Document>> {
        self.snippets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn open_state(db: &str) -> hlx::Result<AppState> {
    let notes = Note::open_index(db, IndexOptions::default())?;

    let schema = hlx::schema::parse_schema_str(include_str!("../schema.yaml"))?;
    let snippets_def = schema
        .index("snippets")
        .ok_or_else(|| hlx::HlxError::Config("schema.yaml has no 'snippets' index".into()))?;
    let snippets = Index::open_with_fields(
        db,
        snippets_def.field_set()?,
        snippets_def.options("snippets"),
    )?;

    Ok(AppState {
        notes: Mutex::new(notes),
        snippets: Mutex::new(snippets),
    })
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();
    log::info!("Starting hlx example server");

    let db = std::env::var("HLX_DB").unwrap_or_else(|_| "hlx-example.db".to_string());
    let host = std::env::var("HLX_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("HLX_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Opening indexes at: {db}");
    let state = open_state(&db).map_err(std::io::Error::other)?;
    let state = web::Data::new(state);

    log::info!("Listening on {host}:{port}");
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(handlers::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test};

    fn memory_state() -> web::Data<AppState> {
        web::Data::new(open_state(":memory:").unwrap())
    }

    #[actix_web::test]
    async fn test_note_lifecycle() {
        let app = test::init_service(
            App::new()
                .app_data(memory_state())
                .configure(handlers::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/notes")
            .set_json(serde_json::json!({ "title": "greeting", "content": "hello world", "views": 3 }))
            .to_request();
        let created: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let id = created["id"].as_str().unwrap().to_string();
        assert_eq!(id.len(), 26);

        let req = test::TestRequest::get()
            .uri("/api/notes/search?q=world")
            .to_request();
        let found: Vec<Note> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "greeting");
        assert_eq!(found[0].views, 3);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/notes/{id}"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri(&format!("/api/notes/{id}"))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[actix_web::test]
    async fn test_snippets_and_errors() {
        let app = test::init_service(
            App::new()
                .app_data(memory_state())
                .configure(handlers::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/snippets")
            .set_json(serde_json::json!({ "name": "hello", "language": "rust", "content": "println!" }))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::CREATED
        );

        let req = test::TestRequest::post()
            .uri("/api/snippets")
            .set_json(serde_json::json!({ "colour": "red" }))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST
        );

        let req = test::TestRequest::get()
            .uri("/api/snippets/search?q=language%3Arust")
            .to_request();
        let found: Vec<serde_json::Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["name"], "hello");

        let req = test::TestRequest::get()
            .uri("/api/snippets/search?q=AND%20AND%20(")
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST
        );

        let req = test::TestRequest::get().uri("/api/status").to_request();
        let status: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(status["snippets"]["count"], 1);
        assert_eq!(status["notes"]["table"], "notes");
    }
}
