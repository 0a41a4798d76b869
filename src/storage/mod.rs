use std::sync::Arc;

use crate::models::{
    attempts::{ExerciseAttempt, NewExerciseAttempt},
    classes::{
        entities::{Class, ClassStudent},
        requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
        responses::ClassListResponse,
    },
    courses::{
        entities::{Course, CourseExercise},
        requests::{CreateCourseRequest, UpdateCourseRequest},
    },
    exercises::{
        entities::Exercise,
        requests::{CreateExerciseRequest, ExerciseListQuery, UpdateExerciseRequest},
        responses::ExerciseListResponse,
    },
    files::{CourseFile, NewCourseFile},
    users::{CreateUserRequest, User},
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 批量获取用户
    async fn get_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>>;
    // 是否已存在管理员
    async fn has_admin(&self) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;

    /// 班级管理方法
    // 创建班级（生成访问码）
    async fn create_class(&self, teacher_id: i64, class: CreateClassRequest) -> Result<Class>;
    // 通过ID获取班级信息
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    // 通过访问码获取班级信息
    async fn get_class_by_access_code(&self, access_code: &str) -> Result<Option<Class>>;
    // 列出班级
    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse>;
    // 更新班级信息
    async fn update_class(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>>;
    // 删除班级
    async fn delete_class(&self, class_id: i64) -> Result<bool>;

    /// 班级成员方法
    // 学生加入班级
    async fn join_class(&self, class_id: i64, student_id: i64) -> Result<()>;
    // 学生是否在班级中
    async fn is_student_enrolled(&self, class_id: i64, student_id: i64) -> Result<bool>;
    // 列出班级学生
    async fn list_class_students(&self, class_id: i64) -> Result<Vec<ClassStudent>>;
    // 班级学生数量
    async fn count_class_students(&self, class_id: i64) -> Result<i64>;
    // 移出学生
    async fn remove_class_student(&self, class_id: i64, student_id: i64) -> Result<bool>;

    /// 课程管理方法
    // 创建课程
    async fn create_course(&self, class_id: i64, course: CreateCourseRequest) -> Result<Course>;
    // 通过ID获取课程
    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>>;
    // 列出班级课程
    async fn list_courses_by_class(&self, class_id: i64) -> Result<Vec<Course>>;
    // 更新课程
    async fn update_course(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>>;
    // 删除课程
    async fn delete_course(&self, course_id: i64) -> Result<bool>;
    // 关联练习
    async fn attach_exercise(&self, course_id: i64, exercise_id: i64) -> Result<CourseExercise>;
    // 取消关联练习
    async fn detach_exercise(&self, course_id: i64, exercise_id: i64) -> Result<bool>;
    // 练习是否已关联到课程
    async fn is_exercise_attached(&self, course_id: i64, exercise_id: i64) -> Result<bool>;
    // 列出课程中的练习
    async fn list_course_exercises(&self, course_id: i64) -> Result<Vec<Exercise>>;
    // 教师自己的、尚未关联到课程的练习
    async fn list_available_exercises(
        &self,
        course_id: i64,
        teacher_id: i64,
    ) -> Result<Vec<Exercise>>;
    // 学生是否能通过已加入班级的课程访问练习
    async fn student_can_access_exercise(&self, student_id: i64, exercise_id: i64)
    -> Result<bool>;
    // 教师名下班级的课程是否包含该练习
    async fn teacher_has_exercise_in_courses(
        &self,
        teacher_id: i64,
        exercise_id: i64,
    ) -> Result<bool>;

    /// 练习管理方法
    // 创建练习
    async fn create_exercise(
        &self,
        teacher_id: i64,
        exercise: CreateExerciseRequest,
    ) -> Result<Exercise>;
    // 通过ID获取练习
    async fn get_exercise_by_id(&self, exercise_id: i64) -> Result<Option<Exercise>>;
    // 列出练习库
    async fn list_exercises_with_pagination(
        &self,
        query: ExerciseListQuery,
    ) -> Result<ExerciseListResponse>;
    // 更新练习
    async fn update_exercise(
        &self,
        exercise_id: i64,
        update: UpdateExerciseRequest,
    ) -> Result<Option<Exercise>>;
    // 删除练习
    async fn delete_exercise(&self, exercise_id: i64) -> Result<bool>;

    /// 答题记录方法
    // 写入答题记录
    async fn create_attempt(&self, attempt: NewExerciseAttempt) -> Result<ExerciseAttempt>;
    // 通过ID获取答题记录
    async fn get_attempt_by_id(&self, attempt_id: i64) -> Result<Option<ExerciseAttempt>>;
    // 学生某练习的全部记录，最新在前
    async fn list_student_attempts(
        &self,
        student_id: i64,
        exercise_id: i64,
    ) -> Result<Vec<ExerciseAttempt>>;
    // 学生某练习的记录数
    async fn count_student_attempts(&self, student_id: i64, exercise_id: i64) -> Result<i64>;
    // 练习的全部记录，可按课程筛选
    async fn list_exercise_attempts(
        &self,
        exercise_id: i64,
        course_id: Option<i64>,
    ) -> Result<Vec<ExerciseAttempt>>;

    /// 课程附件方法
    // 登记附件
    async fn create_course_file(&self, file: NewCourseFile) -> Result<CourseFile>;
    // 通过ID获取附件
    async fn get_course_file_by_id(&self, file_id: i64) -> Result<Option<CourseFile>>;
    // 列出课程附件
    async fn list_course_files(&self, course_id: i64) -> Result<Vec<CourseFile>>;
    // 删除附件记录
    async fn delete_course_file(&self, file_id: i64) -> Result<bool>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
