//! `SQLite` implementation of the academic year, class and student
//! repositories.

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

use casebook_app::ports::{AcademicYearRepository, ClassRepository, StudentRepository};
use casebook_domain::academic_year::AcademicYear;
use casebook_domain::error::CasebookError;
use casebook_domain::id::{AcademicYearId, ClassId, StudentId};
use casebook_domain::school_class::SchoolClass;
use casebook_domain::student::Student;

use crate::error::StorageError;
use crate::store::{SqliteStore, parse_id};

struct YearWrapper(AcademicYear);

impl<'r> FromRow<'r, SqliteRow> for YearWrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;

        Ok(Self(AcademicYear {
            id: parse_id(&id)?,
            start_year: row.try_get("start_year")?,
        }))
    }
}

struct ClassWrapper(SchoolClass);

impl<'r> FromRow<'r, SqliteRow> for ClassWrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let academic_year_id: String = row.try_get("academic_year_id")?;

        Ok(Self(SchoolClass {
            id: parse_id(&id)?,
            academic_year_id: parse_id(&academic_year_id)?,
            name: row.try_get("name")?,
        }))
    }
}

struct StudentWrapper(Student);

impl<'r> FromRow<'r, SqliteRow> for StudentWrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let class_id: String = row.try_get("class_id")?;

        Ok(Self(Student {
            id: parse_id(&id)?,
            class_id: parse_id(&class_id)?,
            full_name: row.try_get("full_name")?,
            email: row.try_get("email")?,
            parent_email: row.try_get("parent_email")?,
        }))
    }
}

const INSERT_YEAR: &str = "INSERT INTO academic_years (id, start_year) VALUES (?, ?)";
const SELECT_YEAR: &str = "SELECT * FROM academic_years WHERE id = ?";
const SELECT_YEAR_BY_START: &str = "SELECT * FROM academic_years WHERE start_year = ?";
const SELECT_YEARS: &str = "SELECT * FROM academic_years ORDER BY start_year DESC";

const INSERT_CLASS: &str = "INSERT INTO classes (id, academic_year_id, name) VALUES (?, ?, ?)";
const SELECT_CLASS: &str = "SELECT * FROM classes WHERE id = ?";
const SELECT_CLASSES_OF_YEAR: &str =
    "SELECT * FROM classes WHERE academic_year_id = ? ORDER BY name";
const SELECT_CLASS_BY_NAME: &str =
    "SELECT * FROM classes WHERE academic_year_id = ? AND name = ?";
const DELETE_CLASS: &str = "DELETE FROM classes WHERE id = ?";

const INSERT_STUDENT: &str = r"
    INSERT INTO students (id, class_id, full_name, email, parent_email)
    VALUES (?, ?, ?, ?, ?)
";
const SELECT_STUDENT: &str = "SELECT * FROM students WHERE id = ?";
const SELECT_STUDENTS_OF_CLASS: &str =
    "SELECT * FROM students WHERE class_id = ? ORDER BY full_name";

impl AcademicYearRepository for SqliteStore {
    async fn create_academic_year(&self, year: AcademicYear) -> Result<AcademicYear, CasebookError> {
        sqlx::query(INSERT_YEAR)
            .bind(year.id.to_string())
            .bind(year.start_year)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(year)
    }

    async fn get_academic_year(
        &self,
        id: AcademicYearId,
    ) -> Result<Option<AcademicYear>, CasebookError> {
        let row: Option<YearWrapper> = sqlx::query_as(SELECT_YEAR)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn find_academic_year(&self, start_year: i32) -> Result<Option<AcademicYear>, CasebookError> {
        let row: Option<YearWrapper> = sqlx::query_as(SELECT_YEAR_BY_START)
            .bind(start_year)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn list_academic_years(&self) -> Result<Vec<AcademicYear>, CasebookError> {
        let rows: Vec<YearWrapper> = sqlx::query_as(SELECT_YEARS)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}

impl ClassRepository for SqliteStore {
    async fn create_class(&self, class: SchoolClass) -> Result<SchoolClass, CasebookError> {
        sqlx::query(INSERT_CLASS)
            .bind(class.id.to_string())
            .bind(class.academic_year_id.to_string())
            .bind(&class.name)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(class)
    }

    async fn get_class(&self, id: ClassId) -> Result<Option<SchoolClass>, CasebookError> {
        let row: Option<ClassWrapper> = sqlx::query_as(SELECT_CLASS)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn classes_for_year(&self, year: AcademicYearId) -> Result<Vec<SchoolClass>, CasebookError> {
        let rows: Vec<ClassWrapper> = sqlx::query_as(SELECT_CLASSES_OF_YEAR)
            .bind(year.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn find_class(
        &self,
        year: AcademicYearId,
        name: &str,
    ) -> Result<Option<SchoolClass>, CasebookError> {
        // `name` is declared COLLATE NOCASE
        let row: Option<ClassWrapper> = sqlx::query_as(SELECT_CLASS_BY_NAME)
            .bind(year.to_string())
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn delete_class(&self, id: ClassId) -> Result<(), CasebookError> {
        sqlx::query(DELETE_CLASS)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}

impl StudentRepository for SqliteStore {
    async fn create_student(&self, student: Student) -> Result<Student, CasebookError> {
        sqlx::query(INSERT_STUDENT)
            .bind(student.id.to_string())
            .bind(student.class_id.to_string())
            .bind(&student.full_name)
            .bind(&student.email)
            .bind(&student.parent_email)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(student)
    }

    async fn get_student(&self, id: StudentId) -> Result<Option<Student>, CasebookError> {
        let row: Option<StudentWrapper> = sqlx::query_as(SELECT_STUDENT)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn students_in_class(&self, class: ClassId) -> Result<Vec<Student>, CasebookError> {
        let rows: Vec<StudentWrapper> = sqlx::query_as(SELECT_STUDENTS_OF_CLASS)
            .bind(class.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casebook_domain::error::ConflictError;
    use casebook_domain::student::Enrollment;

    use crate::store::testing::store;

    async fn year(store: &SqliteStore, start: i32) -> AcademicYear {
        store
            .create_academic_year(AcademicYear::new(start).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn should_list_years_most_recent_first() {
        let store = store().await;
        year(&store, 2023).await;
        year(&store, 2025).await;
        year(&store, 2024).await;

        let starts: Vec<i32> = store
            .list_academic_years()
            .await
            .unwrap()
            .iter()
            .map(|y| y.start_year)
            .collect();
        assert_eq!(starts, vec![2025, 2024, 2023]);
        assert!(store.find_academic_year(2024).await.unwrap().is_some());
        assert!(store.find_academic_year(2030).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_find_class_ignoring_case() {
        let store = store().await;
        let y = year(&store, 2024).await;
        let class = store
            .create_class(SchoolClass::new(y.id, "3A").unwrap())
            .await
            .unwrap();

        let found = store.find_class(y.id, "3a").await.unwrap().unwrap();
        assert_eq!(found.id, class.id);

        let result = store.create_class(SchoolClass::new(y.id, "3a").unwrap()).await;
        assert!(matches!(
            result,
            Err(CasebookError::Conflict(ConflictError::Duplicate(_)))
        ));
    }

    #[tokio::test]
    async fn should_delete_students_with_their_class() {
        let store = store().await;
        let y = year(&store, 2024).await;
        let class = store
            .create_class(SchoolClass::new(y.id, "3A").unwrap())
            .await
            .unwrap();
        let student = Student::enroll(
            class.id,
            &Enrollment {
                full_name: "Luca Verdi".to_string(),
                email: "luca@school.example.org".to_string(),
                parent_email: "parent@mail.example.org".to_string(),
            },
        )
        .unwrap();
        let student = store.create_student(student).await.unwrap();
        assert_eq!(store.students_in_class(class.id).await.unwrap().len(), 1);

        store.delete_class(class.id).await.unwrap();

        assert!(store.get_student(student.id).await.unwrap().is_none());
        assert!(store.classes_for_year(y.id).await.unwrap().is_empty());
    }
}
