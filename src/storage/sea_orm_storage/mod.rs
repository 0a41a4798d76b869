//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod attempts;
mod class_students;
mod classes;
mod course_files;
mod courses;
mod exercises;
mod users;

use crate::config::AppConfig;
use crate::errors::{ClassNumError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::sea_query::LikeExpr;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// 内存 SQLite，测试用
    #[cfg(test)]
    pub(crate) async fn new_in_memory() -> Result<Self> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::SqlitePoolOptions;

        // 内存库只存在于单个连接上
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| ClassNumError::database_connection(format!("SQLite 连接失败: {e}")))?;
        let db = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool);

        Migrator::up(&db, None)
            .await
            .map_err(|e| ClassNumError::database_operation(format!("数据库迁移失败: {e}")))?;
        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| ClassNumError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| ClassNumError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| ClassNumError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(ClassNumError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 搜索用的 LIKE 表达式，关键字中的通配符已转义
pub(crate) fn like_search(search: Option<&str>) -> Option<LikeExpr> {
    crate::utils::search_pattern(search).map(|pattern| LikeExpr::new(pattern).escape('\\'))
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn get_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>> {
        self.get_users_by_ids_impl(ids).await
    }

    async fn has_admin(&self) -> Result<bool> {
        self.has_admin_impl().await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    // 班级模块
    async fn create_class(&self, teacher_id: i64, class: CreateClassRequest) -> Result<Class> {
        self.create_class_impl(teacher_id, class).await
    }

    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(class_id).await
    }

    async fn get_class_by_access_code(&self, access_code: &str) -> Result<Option<Class>> {
        self.get_class_by_access_code_impl(access_code).await
    }

    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        self.list_classes_with_pagination_impl(query).await
    }

    async fn update_class(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        self.update_class_impl(class_id, update).await
    }

    async fn delete_class(&self, class_id: i64) -> Result<bool> {
        self.delete_class_impl(class_id).await
    }

    // 班级成员模块
    async fn join_class(&self, class_id: i64, student_id: i64) -> Result<()> {
        self.join_class_impl(class_id, student_id).await
    }

    async fn is_student_enrolled(&self, class_id: i64, student_id: i64) -> Result<bool> {
        self.is_student_enrolled_impl(class_id, student_id).await
    }

    async fn list_class_students(&self, class_id: i64) -> Result<Vec<ClassStudent>> {
        self.list_class_students_impl(class_id).await
    }

    async fn count_class_students(&self, class_id: i64) -> Result<i64> {
        self.count_class_students_impl(class_id).await
    }

    async fn remove_class_student(&self, class_id: i64, student_id: i64) -> Result<bool> {
        self.remove_class_student_impl(class_id, student_id).await
    }

    // 课程模块
    async fn create_course(&self, class_id: i64, course: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(class_id, course).await
    }

    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(course_id).await
    }

    async fn list_courses_by_class(&self, class_id: i64) -> Result<Vec<Course>> {
        self.list_courses_by_class_impl(class_id).await
    }

    async fn update_course(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        self.update_course_impl(course_id, update).await
    }

    async fn delete_course(&self, course_id: i64) -> Result<bool> {
        self.delete_course_impl(course_id).await
    }

    async fn attach_exercise(&self, course_id: i64, exercise_id: i64) -> Result<CourseExercise> {
        self.attach_exercise_impl(course_id, exercise_id).await
    }

    async fn detach_exercise(&self, course_id: i64, exercise_id: i64) -> Result<bool> {
        self.detach_exercise_impl(course_id, exercise_id).await
    }

    async fn is_exercise_attached(&self, course_id: i64, exercise_id: i64) -> Result<bool> {
        self.is_exercise_attached_impl(course_id, exercise_id).await
    }

    async fn list_course_exercises(&self, course_id: i64) -> Result<Vec<Exercise>> {
        self.list_course_exercises_impl(course_id).await
    }

    async fn list_available_exercises(
        &self,
        course_id: i64,
        teacher_id: i64,
    ) -> Result<Vec<Exercise>> {
        self.list_available_exercises_impl(course_id, teacher_id)
            .await
    }

    async fn student_can_access_exercise(
        &self,
        student_id: i64,
        exercise_id: i64,
    ) -> Result<bool> {
        self.student_can_access_exercise_impl(student_id, exercise_id)
            .await
    }

    async fn teacher_has_exercise_in_courses(
        &self,
        teacher_id: i64,
        exercise_id: i64,
    ) -> Result<bool> {
        self.teacher_has_exercise_in_courses_impl(teacher_id, exercise_id)
            .await
    }

    // 练习模块
    async fn create_exercise(
        &self,
        teacher_id: i64,
        exercise: CreateExerciseRequest,
    ) -> Result<Exercise> {
        self.create_exercise_impl(teacher_id, exercise).await
    }

    async fn get_exercise_by_id(&self, exercise_id: i64) -> Result<Option<Exercise>> {
        self.get_exercise_by_id_impl(exercise_id).await
    }

    async fn list_exercises_with_pagination(
        &self,
        query: ExerciseListQuery,
    ) -> Result<ExerciseListResponse> {
        self.list_exercises_with_pagination_impl(query).await
    }

    async fn update_exercise(
        &self,
        exercise_id: i64,
        update: UpdateExerciseRequest,
    ) -> Result<Option<Exercise>> {
        self.update_exercise_impl(exercise_id, update).await
    }

    async fn delete_exercise(&self, exercise_id: i64) -> Result<bool> {
        self.delete_exercise_impl(exercise_id).await
    }

    // 答题记录模块
    async fn create_attempt(&self, attempt: NewExerciseAttempt) -> Result<ExerciseAttempt> {
        self.create_attempt_impl(attempt).await
    }

    async fn get_attempt_by_id(&self, attempt_id: i64) -> Result<Option<ExerciseAttempt>> {
        self.get_attempt_by_id_impl(attempt_id).await
    }

    async fn list_student_attempts(
        &self,
        student_id: i64,
        exercise_id: i64,
    ) -> Result<Vec<ExerciseAttempt>> {
        self.list_student_attempts_impl(student_id, exercise_id)
            .await
    }

    async fn count_student_attempts(&self, student_id: i64, exercise_id: i64) -> Result<i64> {
        self.count_student_attempts_impl(student_id, exercise_id)
            .await
    }

    async fn list_exercise_attempts(
        &self,
        exercise_id: i64,
        course_id: Option<i64>,
    ) -> Result<Vec<ExerciseAttempt>> {
        self.list_exercise_attempts_impl(exercise_id, course_id)
            .await
    }

    // 课程附件模块
    async fn create_course_file(&self, file: NewCourseFile) -> Result<CourseFile> {
        self.create_course_file_impl(file).await
    }

    async fn get_course_file_by_id(&self, file_id: i64) -> Result<Option<CourseFile>> {
        self.get_course_file_by_id_impl(file_id).await
    }

    async fn list_course_files(&self, course_id: i64) -> Result<Vec<CourseFile>> {
        self.list_course_files_impl(course_id).await
    }

    async fn delete_course_file(&self, file_id: i64) -> Result<bool> {
        self.delete_course_file_impl(file_id).await
    }
}
