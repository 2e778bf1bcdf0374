//! Route table shared by the server and the integration tests.

use actix_files::{Files, NamedFile};
use actix_web::{error, web, HttpRequest, HttpResponse};
use log::{debug, info};
use std::path::Path;

use crate::document::handlers::download_file;
use crate::history::handlers::{delete_item, get_history};
use crate::question::handlers::{generate_documents, list_models};
use crate::{AppState, ErrorResponse};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(web::resource("/").route(web::get().to(index)))
        .service(web::resource("/history").route(web::get().to(get_history)))
        .service(web::resource("/generate-documents").route(web::post().to(generate_documents)))
        .service(web::resource("/delete-item/{id}").route(web::delete().to(delete_item)))
        .service(web::resource("/download/{filename}").route(web::get().to(download_file)))
        .service(web::resource("/models").route(web::get().to(list_models)));
}

/// Malformed JSON bodies get the same error envelope as every other failure.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| {
            debug!("Rejected request body: {}", err);
            let response =
                HttpResponse::BadRequest().json(ErrorResponse::bad_request(&err.to_string()));
            error::InternalError::from_response(err, response).into()
        })
}

/// Static assets of the web UI, mounted under `/static`.
pub fn static_files(dir: &Path) -> Files {
    Files::new("/static", dir).prefer_utf8(true)
}

async fn index(req: HttpRequest, data: web::Data<AppState>) -> HttpResponse {
    info!("Executing index handler");
    let page = data.config.static_dir.join("index.html");

    match NamedFile::open_async(&page).await {
        Ok(file) => file.into_response(&req),
        Err(e) => {
            log::error!("Failed to open UI page {}: {}", page.display(), e);
            HttpResponse::NotFound().json(ErrorResponse::not_found("UI page not found"))
        }
    }
}
