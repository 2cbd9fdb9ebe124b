//! School service: academic years, classes and student enrollment.

use casebook_domain::academic_year::AcademicYear;
use casebook_domain::error::{CasebookError, ConflictError};
use casebook_domain::id::{AcademicYearId, ClassId, StudentId};
use casebook_domain::school_class::SchoolClass;
use casebook_domain::student::{Enrollment, Student};

use crate::ports::{AcademicYearRepository, ClassRepository, StudentRepository};

pub struct SchoolService<S> {
    store: S,
}

impl<S> SchoolService<S>
where
    S: AcademicYearRepository + ClassRepository + StudentRepository,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::Validation`] for a year out of range,
    /// [`ConflictError::AcademicYearExists`], or a storage error.
    pub async fn create_academic_year(&self, start_year: i32) -> Result<AcademicYear, CasebookError> {
        let year = AcademicYear::new(start_year)?;
        if self.store.find_academic_year(start_year).await?.is_some() {
            return Err(ConflictError::AcademicYearExists(start_year).into());
        }
        let year = self.store.create_academic_year(year).await?;
        tracing::info!(academic_year_id = %year.id, label = %year.label(), "academic year created");
        Ok(year)
    }

    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_academic_years(&self) -> Result<Vec<AcademicYear>, CasebookError> {
        self.store.list_academic_years().await
    }

    /// Create a class in an existing academic year.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when the year is missing,
    /// [`CasebookError::Validation`] for an invalid name,
    /// [`ConflictError::ClassExists`] when the year already has a class
    /// with that name, or a storage error.
    pub async fn create_class(
        &self,
        year: AcademicYearId,
        name: &str,
    ) -> Result<SchoolClass, CasebookError> {
        self.get_academic_year(year).await?;
        let class = SchoolClass::new(year, name)?;
        if self.store.find_class(year, &class.name).await?.is_some() {
            tracing::warn!(academic_year_id = %year, name = %class.name, "class already exists");
            return Err(ConflictError::ClassExists(class.name).into());
        }
        let class = self.store.create_class(class).await?;
        tracing::info!(class_id = %class.id, name = %class.name, "class created");
        Ok(class)
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when the year is missing, or a
    /// storage error.
    pub async fn list_classes(&self, year: AcademicYearId) -> Result<Vec<SchoolClass>, CasebookError> {
        self.get_academic_year(year).await?;
        self.store.classes_for_year(year).await
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] or a storage error.
    pub async fn get_class(&self, id: ClassId) -> Result<SchoolClass, CasebookError> {
        self.store
            .get_class(id)
            .await?
            .ok_or_else(|| id.not_found().into())
    }

    /// Delete a class, its students and their attendance.
    ///
    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] or a storage error.
    pub async fn delete_class(&self, id: ClassId) -> Result<(), CasebookError> {
        self.get_class(id).await?;
        self.store.delete_class(id).await?;
        tracing::info!(class_id = %id, "class deleted");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when the class is missing,
    /// [`CasebookError::Validation`] listing every failed rule, or a
    /// storage error.
    pub async fn enroll_student(
        &self,
        class: ClassId,
        enrollment: &Enrollment,
    ) -> Result<Student, CasebookError> {
        self.get_class(class).await?;
        let student = Student::enroll(class, enrollment)?;
        let student = self.store.create_student(student).await?;
        tracing::info!(student_id = %student.id, class_id = %class, "student enrolled");
        Ok(student)
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] when the class is missing, or a
    /// storage error.
    pub async fn list_students(&self, class: ClassId) -> Result<Vec<Student>, CasebookError> {
        self.get_class(class).await?;
        self.store.students_in_class(class).await
    }

    /// # Errors
    ///
    /// Returns [`CasebookError::NotFound`] or a storage error.
    pub async fn get_student(&self, id: StudentId) -> Result<Student, CasebookError> {
        self.store
            .get_student(id)
            .await?
            .ok_or_else(|| id.not_found().into())
    }

    async fn get_academic_year(&self, id: AcademicYearId) -> Result<AcademicYear, CasebookError> {
        self.store
            .get_academic_year(id)
            .await?
            .ok_or_else(|| id.not_found().into())
    }
}
