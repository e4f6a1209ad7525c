//! Lectura del campo `file` de un formulario multipart

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;

use crate::controllers::vehicle_controller::UploadedFile;
use crate::utils::errors::{bad_request_error, AppError};

pub const FILE_FIELD: &str = "file";

pub async fn read_file_field(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field
            .file_name()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or("archivo")
            .to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;

        return Ok(UploadedFile {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Err(bad_request_error("Falta el campo 'file' en el formulario"))
}

fn multipart_error(error: MultipartError) -> AppError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("El archivo supera el tamaño permitido".to_string())
    } else {
        AppError::BadRequest(format!("Formulario multipart inválido: {}", error.body_text()))
    }
}
