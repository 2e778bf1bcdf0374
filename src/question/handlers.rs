use actix_web::{web, HttpResponse, Responder};
use log::{debug, error, info};
use serde::Serialize;
use utoipa::ToSchema;

use super::models::GenerateRequest;
use super::validation::Validator;
use crate::generation::{new_run_id, record_generation};
use crate::history::HistoryEntry;
use crate::{AppState, ErrorResponse};

const GENERATION_FAILED: &str = "The AI service could not produce questions";

#[derive(Serialize, ToSchema)]
pub struct ModelsResponse {
    pub models: Vec<String>,
}

#[utoipa::path(
    tag = "Generation",
    post,
    path = "/generate-documents",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Documents generated", body = HistoryEntry),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Generation failed", body = ErrorResponse)
    )
)]
pub async fn generate_documents(
    req: web::Json<GenerateRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let request = req.into_inner();
    info!(
        "Executing generate_documents handler for '{}' ({} questions)",
        request.label(),
        request.count
    );

    if let Err(message) = request.validate() {
        debug!("Rejected generation request: {}", message);
        return HttpResponse::BadRequest().json(ErrorResponse::bad_request(&message));
    }

    let questions = match data.source.generate(&request.to_source_request()).await {
        Ok(questions) => questions,
        Err(e) => {
            error!("Question generation failed: {}", e);
            return HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(GENERATION_FAILED));
        }
    };

    let assembler = data.assembler.clone();
    let history = data.history.clone();
    let label = request.label();
    let run_id = new_run_id();
    debug!("Assigned run id {} to '{}'", run_id, label);

    let result = web::block(move || record_generation(&assembler, &history, questions, label, run_id)).await;

    match result {
        Ok(Ok(entry)) => {
            info!(
                "Generated run {} with {} questions and {} figures",
                entry.id,
                entry.count,
                entry.files.svg_files.len()
            );
            HttpResponse::Ok().json(entry)
        }
        Ok(Err(e)) => {
            error!("Failed to produce documents: {}", e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to produce documents"))
        }
        Err(e) => {
            error!("Document task did not complete: {}", e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to produce documents"))
        }
    }
}

#[utoipa::path(
    tag = "Generation",
    get,
    path = "/models",
    responses(
        (status = 200, description = "Models that support content generation", body = ModelsResponse),
        (status = 502, description = "Upstream API failure", body = ErrorResponse)
    )
)]
pub async fn list_models(data: web::Data<AppState>) -> impl Responder {
    info!("Executing list_models handler");
    match data.source.list_models().await {
        Ok(models) => {
            debug!("Upstream reported {} usable models", models.len());
            HttpResponse::Ok().json(ModelsResponse { models })
        }
        Err(e) => {
            error!("Failed to list models: {}", e);
            HttpResponse::BadGateway().json(ErrorResponse::bad_gateway("Failed to list models"))
        }
    }
}
