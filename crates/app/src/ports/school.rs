//! SMOS repository ports: persistence for users and their enrollment
//! requests, academic years, classes, students, the curriculum, attendance,
//! disciplinary notes and report cards.

use std::future::Future;

use casebook_domain::academic_year::AcademicYear;
use casebook_domain::attendance::{AttendanceRecord, Justification};
use casebook_domain::curriculum::{Address, Teaching};
use casebook_domain::enrollment::EnrollmentRequest;
use casebook_domain::error::CasebookError;
use casebook_domain::id::{
    AcademicYearId, AddressId, AttendanceRecordId, ClassId, EnrollmentRequestId, JustificationId,
    NoteId, StudentId, TeachingId, UserId,
};
use casebook_domain::note::Note;
use casebook_domain::report_card::{ReportCard, Term};
use casebook_domain::school_class::SchoolClass;
use casebook_domain::student::Student;
use casebook_domain::time::Date;
use casebook_domain::user::User;

/// Repository for SMOS [`User`]s and the students parents look after.
pub trait UserRepository {
    fn create_user(&self, user: User) -> impl Future<Output = Result<User, CasebookError>> + Send;

    fn get_user(&self, id: UserId)
    -> impl Future<Output = Result<Option<User>, CasebookError>> + Send;

    fn find_user_by_login(
        &self,
        login: &str,
    ) -> impl Future<Output = Result<Option<User>, CasebookError>> + Send;

    fn find_user_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<User>, CasebookError>> + Send;

    /// Users ordered by login.
    fn list_users(&self) -> impl Future<Output = Result<Vec<User>, CasebookError>> + Send;

    fn update_user(&self, user: User) -> impl Future<Output = Result<User, CasebookError>> + Send;

    fn delete_user(&self, id: UserId) -> impl Future<Output = Result<(), CasebookError>> + Send;

    /// Link a student to a parent account. Linking twice is a no-op.
    fn add_child(
        &self,
        parent: UserId,
        student: StudentId,
    ) -> impl Future<Output = Result<(), CasebookError>> + Send;

    fn remove_child(
        &self,
        parent: UserId,
        student: StudentId,
    ) -> impl Future<Output = Result<(), CasebookError>> + Send;

    /// Students linked to a parent, in linking order.
    fn children_of(
        &self,
        parent: UserId,
    ) -> impl Future<Output = Result<Vec<StudentId>, CasebookError>> + Send;
}

pub trait EnrollmentRequestRepository {
    fn create_request(
        &self,
        request: EnrollmentRequest,
    ) -> impl Future<Output = Result<EnrollmentRequest, CasebookError>> + Send;

    fn get_request(
        &self,
        id: EnrollmentRequestId,
    ) -> impl Future<Output = Result<Option<EnrollmentRequest>, CasebookError>> + Send;

    /// Pending request using `login` or `email`, if any.
    fn find_request(
        &self,
        login: &str,
        email: &str,
    ) -> impl Future<Output = Result<Option<EnrollmentRequest>, CasebookError>> + Send;

    /// Pending requests, oldest first.
    fn list_requests(
        &self,
    ) -> impl Future<Output = Result<Vec<EnrollmentRequest>, CasebookError>> + Send;

    fn delete_request(
        &self,
        id: EnrollmentRequestId,
    ) -> impl Future<Output = Result<(), CasebookError>> + Send;
}

pub trait AcademicYearRepository {
    fn create_academic_year(
        &self,
        year: AcademicYear,
    ) -> impl Future<Output = Result<AcademicYear, CasebookError>> + Send;

    fn get_academic_year(
        &self,
        id: AcademicYearId,
    ) -> impl Future<Output = Result<Option<AcademicYear>, CasebookError>> + Send;

    fn find_academic_year(
        &self,
        start_year: i32,
    ) -> impl Future<Output = Result<Option<AcademicYear>, CasebookError>> + Send;

    /// Academic years, most recent first.
    fn list_academic_years(
        &self,
    ) -> impl Future<Output = Result<Vec<AcademicYear>, CasebookError>> + Send;
}

pub trait ClassRepository {
    fn create_class(
        &self,
        class: SchoolClass,
    ) -> impl Future<Output = Result<SchoolClass, CasebookError>> + Send;

    fn get_class(
        &self,
        id: ClassId,
    ) -> impl Future<Output = Result<Option<SchoolClass>, CasebookError>> + Send;

    /// Classes of an academic year ordered by name.
    fn classes_for_year(
        &self,
        year: AcademicYearId,
    ) -> impl Future<Output = Result<Vec<SchoolClass>, CasebookError>> + Send;

    /// Case-insensitive lookup of a class name within a year.
    fn find_class(
        &self,
        year: AcademicYearId,
        name: &str,
    ) -> impl Future<Output = Result<Option<SchoolClass>, CasebookError>> + Send;

    /// Delete a class together with its students and their attendance.
    fn delete_class(&self, id: ClassId) -> impl Future<Output = Result<(), CasebookError>> + Send;
}

pub trait StudentRepository {
    fn create_student(
        &self,
        student: Student,
    ) -> impl Future<Output = Result<Student, CasebookError>> + Send;

    fn get_student(
        &self,
        id: StudentId,
    ) -> impl Future<Output = Result<Option<Student>, CasebookError>> + Send;

    /// Students of a class ordered by name.
    fn students_in_class(
        &self,
        class: ClassId,
    ) -> impl Future<Output = Result<Vec<Student>, CasebookError>> + Send;
}

pub trait AttendanceRepository {
    /// Bring the records of `class` on `date` in line with `records`, as
    /// one atomic step computed by [`RegisterDiff`].
    ///
    /// Unchanged records keep their id and justification. A record whose
    /// kind changed is updated in place, losing its justification when it
    /// stops being an absence. Returns the records inserted or updated,
    /// with their stored ids.
    ///
    /// [`RegisterDiff`]: casebook_domain::attendance::RegisterDiff
    fn merge_register(
        &self,
        class: ClassId,
        date: Date,
        records: Vec<AttendanceRecord>,
    ) -> impl Future<Output = Result<Vec<AttendanceRecord>, CasebookError>> + Send;

    fn get_record(
        &self,
        id: AttendanceRecordId,
    ) -> impl Future<Output = Result<Option<AttendanceRecord>, CasebookError>> + Send;

    fn records_for_day(
        &self,
        class: ClassId,
        date: Date,
    ) -> impl Future<Output = Result<Vec<AttendanceRecord>, CasebookError>> + Send;

    /// Records of a student, oldest first.
    fn records_for_student(
        &self,
        student: StudentId,
    ) -> impl Future<Output = Result<Vec<AttendanceRecord>, CasebookError>> + Send;
}

pub trait JustificationRepository {
    fn create_justification(
        &self,
        justification: Justification,
    ) -> impl Future<Output = Result<Justification, CasebookError>> + Send;

    fn get_justification(
        &self,
        id: JustificationId,
    ) -> impl Future<Output = Result<Option<Justification>, CasebookError>> + Send;

    fn justification_for_record(
        &self,
        record: AttendanceRecordId,
    ) -> impl Future<Output = Result<Option<Justification>, CasebookError>> + Send;

    /// Justifications of every record of a student, oldest first.
    fn justifications_for_student(
        &self,
        student: StudentId,
    ) -> impl Future<Output = Result<Vec<Justification>, CasebookError>> + Send;

    fn update_justification(
        &self,
        justification: Justification,
    ) -> impl Future<Output = Result<Justification, CasebookError>> + Send;

    fn delete_justification(
        &self,
        id: JustificationId,
    ) -> impl Future<Output = Result<(), CasebookError>> + Send;
}

pub trait ReportCardRepository {
    /// Store `card`, replacing any card of the same student, year and term.
    fn upsert_report_card(
        &self,
        card: ReportCard,
    ) -> impl Future<Output = Result<ReportCard, CasebookError>> + Send;

    fn find_report_card(
        &self,
        student: StudentId,
        year: AcademicYearId,
        term: Term,
    ) -> impl Future<Output = Result<Option<ReportCard>, CasebookError>> + Send;

    fn report_cards_for_student(
        &self,
        student: StudentId,
    ) -> impl Future<Output = Result<Vec<ReportCard>, CasebookError>> + Send;
}

pub trait NoteRepository {
    fn create_note(&self, note: Note) -> impl Future<Output = Result<Note, CasebookError>> + Send;

    fn get_note(&self, id: NoteId)
    -> impl Future<Output = Result<Option<Note>, CasebookError>> + Send;

    /// Notes of a student, oldest first.
    fn notes_for_student(
        &self,
        student: StudentId,
    ) -> impl Future<Output = Result<Vec<Note>, CasebookError>> + Send;

    fn update_note(&self, note: Note) -> impl Future<Output = Result<Note, CasebookError>> + Send;

    fn delete_note(&self, id: NoteId) -> impl Future<Output = Result<(), CasebookError>> + Send;
}

pub trait TeachingRepository {
    fn create_teaching(
        &self,
        teaching: Teaching,
    ) -> impl Future<Output = Result<Teaching, CasebookError>> + Send;

    fn get_teaching(
        &self,
        id: TeachingId,
    ) -> impl Future<Output = Result<Option<Teaching>, CasebookError>> + Send;

    fn find_teaching_by_name(
        &self,
        name_key: &str,
    ) -> impl Future<Output = Result<Option<Teaching>, CasebookError>> + Send;

    /// Teachings ordered by name.
    fn list_teachings(&self) -> impl Future<Output = Result<Vec<Teaching>, CasebookError>> + Send;

    fn update_teaching(
        &self,
        teaching: Teaching,
    ) -> impl Future<Output = Result<Teaching, CasebookError>> + Send;

    /// Delete a teaching and withdraw it from every address.
    fn delete_teaching(
        &self,
        id: TeachingId,
    ) -> impl Future<Output = Result<(), CasebookError>> + Send;
}

/// Repository for study [`Address`]es, their teachings included.
pub trait AddressRepository {
    fn create_address(
        &self,
        address: Address,
    ) -> impl Future<Output = Result<Address, CasebookError>> + Send;

    fn get_address(
        &self,
        id: AddressId,
    ) -> impl Future<Output = Result<Option<Address>, CasebookError>> + Send;

    fn find_address_by_name(
        &self,
        name_key: &str,
    ) -> impl Future<Output = Result<Option<Address>, CasebookError>> + Send;

    /// Addresses ordered by name.
    fn list_addresses(&self) -> impl Future<Output = Result<Vec<Address>, CasebookError>> + Send;

    /// Store the name and teaching list of an existing address.
    fn update_address(
        &self,
        address: Address,
    ) -> impl Future<Output = Result<Address, CasebookError>> + Send;

    fn delete_address(
        &self,
        id: AddressId,
    ) -> impl Future<Output = Result<(), CasebookError>> + Send;
}
