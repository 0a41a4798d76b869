use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::models::classes::requests::{ClassListQuery, ClassQueryParams, ClassScope};
use crate::models::users::entities::{User, UserRole};
use crate::models::ApiResponse;
use crate::services::access::{current_user, storage_failure};

pub async fn list_classes(
    service: &ClassService,
    request: &HttpRequest,
    query: ClassQueryParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let list_query = ClassListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        scope: scope_for(&user),
        search: query.search,
    };

    match storage.list_classes_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Class list retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure("Failed to retrieve class list", e)),
    }
}

/// 教师看自己的班级，学生看已加入的班级，管理员看全部
fn scope_for(user: &User) -> ClassScope {
    match user.role {
        UserRole::Admin => ClassScope::All,
        UserRole::Teacher => ClassScope::OwnedBy(user.id),
        UserRole::Student => ClassScope::EnrolledBy(user.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserStatus;

    fn user(id: i64, role: UserRole) -> User {
        let now = chrono::Utc::now();
        User {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@ecole.fr"),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            display_name: None,
            school_name: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_scope_follows_role() {
        assert_eq!(scope_for(&user(1, UserRole::Admin)), ClassScope::All);
        assert_eq!(scope_for(&user(2, UserRole::Teacher)), ClassScope::OwnedBy(2));
        assert_eq!(scope_for(&user(3, UserRole::Student)), ClassScope::EnrolledBy(3));
    }
}
