use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::Status).string().not_null())
                    .col(ColumnDef::new(Users::DisplayName).string().null())
                    .col(ColumnDef::new(Users::SchoolName).string().null())
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建班级表
        manager
            .create_table(
                Table::create()
                    .table(Classes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Classes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Classes::TeacherId).big_integer().not_null())
                    .col(ColumnDef::new(Classes::Name).string().not_null())
                    .col(ColumnDef::new(Classes::Description).text().null())
                    .col(
                        ColumnDef::new(Classes::AccessCode)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Classes::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Classes::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Classes::Table, Classes::TeacherId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 班级学生关联表
        manager
            .create_table(
                Table::create()
                    .table(ClassStudents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClassStudents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ClassStudents::ClassId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassStudents::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassStudents::JoinedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassStudents::Table, ClassStudents::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassStudents::Table, ClassStudents::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 课程表
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Courses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Courses::ClassId).big_integer().not_null())
                    .col(ColumnDef::new(Courses::Title).string().not_null())
                    .col(ColumnDef::new(Courses::Content).text().null())
                    .col(ColumnDef::new(Courses::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Courses::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Courses::Table, Courses::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 练习表
        manager
            .create_table(
                Table::create()
                    .table(Exercises::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Exercises::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Exercises::TeacherId).big_integer().not_null())
                    .col(ColumnDef::new(Exercises::Title).string().not_null())
                    .col(ColumnDef::new(Exercises::Description).text().null())
                    .col(ColumnDef::new(Exercises::ExerciseType).string().not_null())
                    .col(ColumnDef::new(Exercises::Content).text().not_null())
                    .col(ColumnDef::new(Exercises::Subject).string().null())
                    .col(ColumnDef::new(Exercises::ImagePath).string().null())
                    .col(ColumnDef::new(Exercises::MaxAttempts).integer().null())
                    .col(ColumnDef::new(Exercises::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Exercises::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Exercises::Table, Exercises::TeacherId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 课程练习关联表
        manager
            .create_table(
                Table::create()
                    .table(CourseExercises::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourseExercises::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CourseExercises::CourseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CourseExercises::ExerciseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CourseExercises::AddedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CourseExercises::Table, CourseExercises::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CourseExercises::Table, CourseExercises::ExerciseId)
                            .to(Exercises::Table, Exercises::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 课程文件表
        manager
            .create_table(
                Table::create()
                    .table(CourseFiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourseFiles::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CourseFiles::CourseId).big_integer().not_null())
                    .col(
                        ColumnDef::new(CourseFiles::UploadedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CourseFiles::OriginalName).string().not_null())
                    .col(ColumnDef::new(CourseFiles::StoredName).string().not_null())
                    .col(ColumnDef::new(CourseFiles::ContentType).string().not_null())
                    .col(ColumnDef::new(CourseFiles::FileSize).big_integer().not_null())
                    .col(ColumnDef::new(CourseFiles::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(CourseFiles::Table, CourseFiles::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CourseFiles::Table, CourseFiles::UploadedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 作答记录表
        manager
            .create_table(
                Table::create()
                    .table(ExerciseAttempts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExerciseAttempts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ExerciseAttempts::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExerciseAttempts::ExerciseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExerciseAttempts::CourseId).big_integer().null())
                    .col(ColumnDef::new(ExerciseAttempts::Score).double().not_null())
                    .col(ColumnDef::new(ExerciseAttempts::Answers).text().not_null())
                    .col(ColumnDef::new(ExerciseAttempts::Feedback).text().not_null())
                    .col(
                        ColumnDef::new(ExerciseAttempts::Completed)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ExerciseAttempts::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExerciseAttempts::Table, ExerciseAttempts::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExerciseAttempts::Table, ExerciseAttempts::ExerciseId)
                            .to(Exercises::Table, Exercises::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExerciseAttempts::Table, ExerciseAttempts::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_role")
                    .table(Users::Table)
                    .col(Users::Role)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_classes_teacher_id")
                    .table(Classes::Table)
                    .col(Classes::TeacherId)
                    .to_owned(),
            )
            .await?;

        // 同一学生不能重复加入同一班级
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_class_students_unique")
                    .table(ClassStudents::Table)
                    .col(ClassStudents::ClassId)
                    .col(ClassStudents::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_courses_class_id")
                    .table(Courses::Table)
                    .col(Courses::ClassId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_exercises_type_subject")
                    .table(Exercises::Table)
                    .col(Exercises::ExerciseType)
                    .col(Exercises::Subject)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_course_exercises_unique")
                    .table(CourseExercises::Table)
                    .col(CourseExercises::CourseId)
                    .col(CourseExercises::ExerciseId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_attempts_exercise_student")
                    .table(ExerciseAttempts::Table)
                    .col(ExerciseAttempts::ExerciseId)
                    .col(ExerciseAttempts::StudentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(ExerciseAttempts::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(CourseFiles::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(CourseExercises::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Exercises::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ClassStudents::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Classes::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Role,
    Status,
    DisplayName,
    SchoolName,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Classes {
    #[sea_orm(iden = "classes")]
    Table,
    Id,
    TeacherId,
    Name,
    Description,
    AccessCode,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ClassStudents {
    #[sea_orm(iden = "class_students")]
    Table,
    Id,
    ClassId,
    StudentId,
    JoinedAt,
}

#[derive(DeriveIden)]
enum Courses {
    #[sea_orm(iden = "courses")]
    Table,
    Id,
    ClassId,
    Title,
    Content,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Exercises {
    #[sea_orm(iden = "exercises")]
    Table,
    Id,
    TeacherId,
    Title,
    Description,
    ExerciseType,
    Content,
    Subject,
    ImagePath,
    MaxAttempts,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CourseExercises {
    #[sea_orm(iden = "course_exercises")]
    Table,
    Id,
    CourseId,
    ExerciseId,
    AddedAt,
}

#[derive(DeriveIden)]
enum CourseFiles {
    #[sea_orm(iden = "course_files")]
    Table,
    Id,
    CourseId,
    UploadedBy,
    OriginalName,
    StoredName,
    ContentType,
    FileSize,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ExerciseAttempts {
    #[sea_orm(iden = "exercise_attempts")]
    Table,
    Id,
    StudentId,
    ExerciseId,
    CourseId,
    Score,
    Answers,
    Feedback,
    Completed,
    CreatedAt,
}
