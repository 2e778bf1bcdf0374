use actix_files::NamedFile;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpRequest, HttpResponse};
use log::{debug, error, info, warn};
use std::io::ErrorKind;

use super::naming::is_plain_file_name;
use crate::{AppState, ErrorResponse};

#[utoipa::path(
    tag = "Documents",
    get,
    path = "/download/{filename}",
    params(
        ("filename" = String, Path, description = "Name of a generated file")
    ),
    responses(
        (status = 200, description = "File content as an attachment", content_type = "application/octet-stream"),
        (status = 400, description = "Invalid file name", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
pub async fn download_file(req: HttpRequest, data: web::Data<AppState>) -> HttpResponse {
    let filename: String = req.match_info().query("filename").into();
    info!("Executing download_file handler for filename: {}", &filename);

    if !is_plain_file_name(&filename) {
        warn!("Rejected download of suspicious file name '{}'", &filename);
        return HttpResponse::BadRequest()
            .json(ErrorResponse::bad_request("Invalid file name"));
    }

    let path = data.assembler.output_dir().join(&filename);
    debug!("Serving generated file from {}", path.display());

    match NamedFile::open_async(&path).await {
        Ok(file) => file
            .set_content_disposition(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(filename)],
            })
            .into_response(&req),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("Generated file {} does not exist", &filename);
            HttpResponse::NotFound().json(ErrorResponse::not_found(&format!(
                "File '{}' not found",
                filename
            )))
        }
        Err(e) => {
            error!("Failed to open generated file {}: {}", &filename, e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to read file"))
        }
    }
}
