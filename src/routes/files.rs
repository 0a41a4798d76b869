use actix_web::{HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::services::FileService;
use crate::utils::SafeUploadPath;

// 懒加载的全局 FileService 实例
static FILE_SERVICE: Lazy<FileService> = Lazy::new(FileService::new_lazy);

pub async fn serve_upload(path: SafeUploadPath) -> ActixResult<HttpResponse> {
    FILE_SERVICE.serve_upload(path).await
}

// 练习图片公开访问，页面通过 <img> 直接引用
pub fn configure_upload_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/uploads/{category}/{name}", web::get().to(serve_upload));
}
