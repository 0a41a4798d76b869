//! 作答服务测试用的内存数据库数据

use std::sync::Arc;

use serde_json::json;

use crate::models::classes::entities::Class;
use crate::models::classes::requests::CreateClassRequest;
use crate::models::courses::entities::Course;
use crate::models::courses::requests::CreateCourseRequest;
use crate::models::exercises::entities::Exercise;
use crate::models::exercises::requests::CreateExerciseRequest;
use crate::models::users::{CreateUserRequest, User, UserRole};
use crate::storage::Storage;
use crate::storage::sea_orm_storage::SeaOrmStorage;

/// 一名教师、一名学生、一个班级、一门课程和一道单选题，互相之间尚未关联
pub(crate) struct Fixture {
    pub storage: Arc<dyn Storage>,
    pub teacher: User,
    pub student: User,
    pub class: Class,
    pub course: Course,
    pub exercise: Exercise,
}

async fn create_user(storage: &Arc<dyn Storage>, username: &str, role: UserRole) -> User {
    storage
        .create_user(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@ecole.fr"),
            password_hash: "hash".to_string(),
            role,
            display_name: None,
            school_name: None,
        })
        .await
        .unwrap()
}

impl Fixture {
    pub async fn new(max_attempts: Option<i32>) -> Self {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::new_in_memory().await.unwrap());
        let teacher = create_user(&storage, "prof_durand", UserRole::Teacher).await;
        let student = create_user(&storage, "eleve_martin", UserRole::Student).await;

        let class = storage
            .create_class(
                teacher.id,
                CreateClassRequest {
                    name: "CM2 B".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap();
        let course = storage
            .create_course(
                class.id,
                CreateCourseRequest {
                    title: "Calcul".to_string(),
                    content: None,
                },
            )
            .await
            .unwrap();
        let exercise = storage
            .create_exercise(
                teacher.id,
                CreateExerciseRequest {
                    title: "Additions".to_string(),
                    description: None,
                    exercise_type: "qcm".to_string(),
                    content: json!({
                        "questions": [{"text": "2 + 2 ?", "options": ["3", "4"], "correct": 1}]
                    }),
                    subject: None,
                    max_attempts,
                    image_path: None,
                },
            )
            .await
            .unwrap();

        Self {
            storage,
            teacher,
            student,
            class,
            course,
            exercise,
        }
    }

    pub async fn enroll(&self) {
        self.storage
            .join_class(self.class.id, self.student.id)
            .await
            .unwrap();
    }

    pub async fn attach(&self) {
        self.storage
            .attach_exercise(self.course.id, self.exercise.id)
            .await
            .unwrap();
    }
}
