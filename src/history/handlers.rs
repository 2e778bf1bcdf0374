use actix_web::{web, HttpResponse, Responder};
use log::{error, info};

use super::models::{DeleteOutcome, DeleteResponse, HistoryEntry};
use crate::{AppState, ErrorResponse};

#[utoipa::path(
    tag = "History",
    get,
    path = "/history",
    responses(
        (status = 200, description = "All history entries, newest first", body = [HistoryEntry]),
        (status = 500, description = "Internal Server Error", body = ErrorResponse)
    )
)]
pub async fn get_history(data: web::Data<AppState>) -> impl Responder {
    info!("Executing get_history handler");
    let history = data.history.clone();

    match web::block(move || history.list_newest_first()).await {
        Ok(Ok(entries)) => HttpResponse::Ok().json(entries),
        Ok(Err(e)) => {
            error!("Failed to load history: {}", e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to load history"))
        }
        Err(e) => {
            error!("History task did not complete: {}", e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to load history"))
        }
    }
}

#[utoipa::path(
    tag = "History",
    delete,
    path = "/delete-item/{id}",
    params(
        ("id" = String, Path, description = "Run identifier of the entry to delete")
    ),
    responses(
        (status = 200, description = "Entry and its files deleted", body = DeleteResponse),
        (status = 404, description = "Entry not found", body = DeleteResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse)
    )
)]
pub async fn delete_item(path: web::Path<String>, data: web::Data<AppState>) -> impl Responder {
    let id = path.into_inner();
    info!("Executing delete_item handler for id: {}", id);
    let history = data.history.clone();
    let target = id.clone();

    match web::block(move || history.delete(&target)).await {
        Ok(Ok(DeleteOutcome::Deleted { removed_files })) => {
            info!("History entry {} deleted with {} files", id, removed_files);
            HttpResponse::Ok().json(DeleteResponse {
                success: true,
                message: "Entry and its files were deleted".to_string(),
            })
        }
        Ok(Ok(DeleteOutcome::NotFound)) => HttpResponse::NotFound().json(DeleteResponse {
            success: false,
            message: "Entry not found".to_string(),
        }),
        Ok(Err(e)) => {
            error!("Failed to delete history entry {}: {}", id, e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to delete entry"))
        }
        Err(e) => {
            error!("Delete task did not complete: {}", e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to delete entry"))
        }
    }
}
