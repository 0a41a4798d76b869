use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{CLASS_NAME_MAX_CHARS, ClassService};
use crate::models::classes::requests::UpdateClassRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{current_user, not_found, require_class_manager, storage_failure};
use crate::utils::validate::validate_title;

pub async fn update_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
    mut update_data: UpdateClassRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    if let Err(resp) = require_class_manager(&storage, &user, class_id).await {
        return Ok(resp);
    }

    if let Some(name) = update_data.name.take() {
        match validate_title(&name, CLASS_NAME_MAX_CHARS) {
            Ok(name) => update_data.name = Some(name),
            Err(msg) => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
            }
        }
    }

    match storage.update_class(class_id, update_data).await {
        Ok(Some(class)) => {
            info!("Class {} updated by {}", class_id, user.username);
            Ok(HttpResponse::Ok().json(ApiResponse::success(class, "Class updated successfully")))
        }
        Ok(None) => Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => Ok(storage_failure("Failed to update class", e)),
    }
}
