//! In-memory doubles of every port, shared by the service tests.

use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use casebook_domain::academic_year::AcademicYear;
use casebook_domain::attendance::{AttendanceRecord, Justification, RegisterDiff};
use casebook_domain::banner::Banner;
use casebook_domain::convention::Convention;
use casebook_domain::curriculum::{Address, Teaching};
use casebook_domain::enrollment::EnrollmentRequest;
use casebook_domain::error::{CasebookError, ConflictError};
use casebook_domain::event::{Event, EventKind};
use casebook_domain::feedback::Feedback;
use casebook_domain::id::{
    AcademicYearId, AddressId, AttendanceRecordId, BannerId, ClassId, ConventionId,
    EnrollmentRequestId, FeedbackId, JustificationId, NoteId, RefreshmentPointId, ReportCardId,
    SiteId, StudentId, TagId, TeachingId, TouristId, UserId,
};
use casebook_domain::note::Note;
use casebook_domain::refreshment_point::RefreshmentPoint;
use casebook_domain::report_card::{ReportCard, Term};
use casebook_domain::school_class::SchoolClass;
use casebook_domain::site::Site;
use casebook_domain::student::Student;
use casebook_domain::tag::Tag;
use casebook_domain::time::Date;
use casebook_domain::tourist::Tourist;
use casebook_domain::user::User;

use crate::ports::{
    AcademicYearRepository, AddressRepository, AttendanceRepository, BannerRepository,
    ClassRepository, ConventionRepository, EnrollmentRequestRepository, EventPublisher,
    FeedbackRepository, JustificationRepository, NoteRepository, RefreshmentPointRepository,
    ReportCardRepository, SiteRepository, StudentRepository, TagRepository, TeachingRepository,
    TouristRepository, UserRepository,
};

#[derive(Default)]
struct Tables {
    tourists: HashMap<TouristId, Tourist>,
    preferences: BTreeSet<(TouristId, SiteId)>,
    preferred_tags: HashMap<TouristId, BTreeSet<TagId>>,
    sites: HashMap<SiteId, Site>,
    feedback: HashMap<FeedbackId, Feedback>,
    points: HashMap<RefreshmentPointId, RefreshmentPoint>,
    banners: HashMap<BannerId, Banner>,
    conventions: HashMap<ConventionId, Convention>,
    tags: HashMap<TagId, Tag>,
    users: HashMap<UserId, User>,
    /// Parent and student pairs, in linking order.
    children: Vec<(UserId, StudentId)>,
    requests: HashMap<EnrollmentRequestId, EnrollmentRequest>,
    years: HashMap<AcademicYearId, AcademicYear>,
    classes: HashMap<ClassId, SchoolClass>,
    students: HashMap<StudentId, Student>,
    records: HashMap<AttendanceRecordId, AttendanceRecord>,
    justifications: HashMap<JustificationId, Justification>,
    report_cards: HashMap<ReportCardId, ReportCard>,
    notes: HashMap<NoteId, Note>,
    teachings: HashMap<TeachingId, Teaching>,
    addresses: HashMap<AddressId, Address>,
}

/// Store keeping every table in a mutex-protected map.
#[derive(Clone, Default)]
pub(crate) struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }
}

fn ready<T: Send>(value: T) -> impl Future<Output = Result<T, CasebookError>> + Send {
    async { Ok(value) }
}

impl TouristRepository for InMemoryStore {
    fn create_tourist(
        &self,
        tourist: Tourist,
    ) -> impl Future<Output = Result<Tourist, CasebookError>> + Send {
        self.lock().tourists.insert(tourist.id, tourist.clone());
        ready(tourist)
    }

    fn get_tourist(
        &self,
        id: TouristId,
    ) -> impl Future<Output = Result<Option<Tourist>, CasebookError>> + Send {
        ready(self.lock().tourists.get(&id).cloned())
    }

    fn find_tourist_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<Tourist>, CasebookError>> + Send {
        let found = self
            .lock()
            .tourists
            .values()
            .find(|t| t.username == username)
            .cloned();
        ready(found)
    }

    fn find_tourist_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<Tourist>, CasebookError>> + Send {
        let found = self
            .lock()
            .tourists
            .values()
            .find(|t| t.email == email)
            .cloned();
        ready(found)
    }

    fn list_tourists(&self) -> impl Future<Output = Result<Vec<Tourist>, CasebookError>> + Send {
        let mut all: Vec<Tourist> = self.lock().tourists.values().cloned().collect();
        all.sort_by(|a, b| a.username.cmp(&b.username));
        ready(all)
    }

    fn update_tourist(
        &self,
        tourist: Tourist,
    ) -> impl Future<Output = Result<Tourist, CasebookError>> + Send {
        self.lock().tourists.insert(tourist.id, tourist.clone());
        ready(tourist)
    }

    fn delete_tourist(
        &self,
        id: TouristId,
    ) -> impl Future<Output = Result<(), CasebookError>> + Send {
        let mut tables = self.lock();
        tables.tourists.remove(&id);
        tables.preferences.retain(|(tourist, _)| *tourist != id);
        tables.preferred_tags.remove(&id);
        tables.feedback.retain(|_, f| f.tourist_id != id);
        ready(())
    }

    fn add_preferred_site(
        &self,
        tourist: TouristId,
        site: SiteId,
    ) -> impl Future<Output = Result<(), CasebookError>> + Send {
        self.lock().preferences.insert((tourist, site));
        ready(())
    }

    fn remove_preferred_site(
        &self,
        tourist: TouristId,
        site: SiteId,
    ) -> impl Future<Output = Result<(), CasebookError>> + Send {
        self.lock().preferences.remove(&(tourist, site));
        ready(())
    }

    fn preferred_sites(
        &self,
        tourist: TouristId,
    ) -> impl Future<Output = Result<Vec<SiteId>, CasebookError>> + Send {
        let sites = self
            .lock()
            .preferences
            .iter()
            .filter(|(t, _)| *t == tourist)
            .map(|(_, s)| *s)
            .collect();
        ready(sites)
    }

    fn set_preferred_tags(
        &self,
        tourist: TouristId,
        tags: BTreeSet<TagId>,
    ) -> impl Future<Output = Result<(), CasebookError>> + Send {
        self.lock().preferred_tags.insert(tourist, tags);
        ready(())
    }

    fn preferred_tags(
        &self,
        tourist: TouristId,
    ) -> impl Future<Output = Result<BTreeSet<TagId>, CasebookError>> + Send {
        let tags = self
            .lock()
            .preferred_tags
            .get(&tourist)
            .cloned()
            .unwrap_or_default();
        ready(tags)
    }
}

impl SiteRepository for InMemoryStore {
    fn create_site(&self, site: Site) -> impl Future<Output = Result<Site, CasebookError>> + Send {
        self.lock().sites.insert(site.id, site.clone());
        ready(site)
    }

    fn get_site(
        &self,
        id: SiteId,
    ) -> impl Future<Output = Result<Option<Site>, CasebookError>> + Send {
        ready(self.lock().sites.get(&id).cloned())
    }

    fn list_sites(&self) -> impl Future<Output = Result<Vec<Site>, CasebookError>> + Send {
        let mut all: Vec<Site> = self.lock().sites.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        ready(all)
    }

    fn update_site(&self, site: Site) -> impl Future<Output = Result<Site, CasebookError>> + Send {
        self.lock().sites.insert(site.id, site.clone());
        ready(site)
    }

    fn delete_site(&self, id: SiteId) -> impl Future<Output = Result<(), CasebookError>> + Send {
        let mut tables = self.lock();
        tables.sites.remove(&id);
        tables.preferences.retain(|(_, site)| *site != id);
        tables.feedback.retain(|_, f| f.site_id != id);
        ready(())
    }
}

impl FeedbackRepository for InMemoryStore {
    fn create_feedback(
        &self,
        feedback: Feedback,
    ) -> impl Future<Output = Result<Feedback, CasebookError>> + Send {
        self.lock().feedback.insert(feedback.id, feedback.clone());
        ready(feedback)
    }

    fn get_feedback(
        &self,
        id: FeedbackId,
    ) -> impl Future<Output = Result<Option<Feedback>, CasebookError>> + Send {
        ready(self.lock().feedback.get(&id).cloned())
    }

    fn find_feedback(
        &self,
        tourist: TouristId,
        site: SiteId,
    ) -> impl Future<Output = Result<Option<Feedback>, CasebookError>> + Send {
        let found = self
            .lock()
            .feedback
            .values()
            .find(|f| f.tourist_id == tourist && f.site_id == site)
            .cloned();
        ready(found)
    }

    fn feedback_for_site(
        &self,
        site: SiteId,
    ) -> impl Future<Output = Result<Vec<Feedback>, CasebookError>> + Send {
        let mut found: Vec<Feedback> = self
            .lock()
            .feedback
            .values()
            .filter(|f| f.site_id == site)
            .cloned()
            .collect();
        found.sort_by_key(|f| f.created_at);
        ready(found)
    }

    fn feedback_by_tourist(
        &self,
        tourist: TouristId,
    ) -> impl Future<Output = Result<Vec<Feedback>, CasebookError>> + Send {
        let mut found: Vec<Feedback> = self
            .lock()
            .feedback
            .values()
            .filter(|f| f.tourist_id == tourist)
            .cloned()
            .collect();
        found.sort_by_key(|f| f.created_at);
        ready(found)
    }

    fn update_feedback(
        &self,
        feedback: Feedback,
    ) -> impl Future<Output = Result<Feedback, CasebookError>> + Send {
        self.lock().feedback.insert(feedback.id, feedback.clone());
        ready(feedback)
    }
}

impl RefreshmentPointRepository for InMemoryStore {
    fn create_point(
        &self,
        point: RefreshmentPoint,
    ) -> impl Future<Output = Result<RefreshmentPoint, CasebookError>> + Send {
        self.lock().points.insert(point.id, point.clone());
        ready(point)
    }

    fn get_point(
        &self,
        id: RefreshmentPointId,
    ) -> impl Future<Output = Result<Option<RefreshmentPoint>, CasebookError>> + Send {
        ready(self.lock().points.get(&id).cloned())
    }

    fn list_points(
        &self,
    ) -> impl Future<Output = Result<Vec<RefreshmentPoint>, CasebookError>> + Send {
        let mut all: Vec<RefreshmentPoint> = self.lock().points.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        ready(all)
    }

    fn update_point(
        &self,
        point: RefreshmentPoint,
    ) -> impl Future<Output = Result<RefreshmentPoint, CasebookError>> + Send {
        self.lock().points.insert(point.id, point.clone());
        ready(point)
    }

    fn delete_point(
        &self,
        id: RefreshmentPointId,
    ) -> impl Future<Output = Result<(), CasebookError>> + Send {
        let mut tables = self.lock();
        tables.points.remove(&id);
        tables.banners.retain(|_, b| b.point_id != id);
        tables.conventions.retain(|_, c| c.point_id != id);
        ready(())
    }
}

impl BannerRepository for InMemoryStore {
    fn create_banner_within(
        &self,
        banner: Banner,
        max_banners: u32,
    ) -> impl Future<Output = Result<Banner, CasebookError>> + Send {
        let mut tables = self.lock();
        let displayed = tables
            .banners
            .values()
            .filter(|b| b.point_id == banner.point_id)
            .count();
        let result = if u32::try_from(displayed).is_ok_and(|n| n < max_banners) {
            tables.banners.insert(banner.id, banner.clone());
            Ok(banner)
        } else {
            Err(ConflictError::BannerLimitReached {
                point: banner.point_id.to_string(),
                max: max_banners,
            }
            .into())
        };
        async { result }
    }

    fn get_banner(
        &self,
        id: BannerId,
    ) -> impl Future<Output = Result<Option<Banner>, CasebookError>> + Send {
        ready(self.lock().banners.get(&id).cloned())
    }

    fn banners_for_point(
        &self,
        point: RefreshmentPointId,
    ) -> impl Future<Output = Result<Vec<Banner>, CasebookError>> + Send {
        let mut found: Vec<Banner> = self
            .lock()
            .banners
            .values()
            .filter(|b| b.point_id == point)
            .cloned()
            .collect();
        found.sort_by_key(|b| b.created_at);
        ready(found)
    }

    fn update_banner(
        &self,
        banner: Banner,
    ) -> impl Future<Output = Result<Banner, CasebookError>> + Send {
        self.lock().banners.insert(banner.id, banner.clone());
        ready(banner)
    }

    fn delete_banner(
        &self,
        id: BannerId,
    ) -> impl Future<Output = Result<(), CasebookError>> + Send {
        self.lock().banners.remove(&id);
        ready(())
    }
}

impl TagRepository for InMemoryStore {
    fn create_tag(&self, tag: Tag) -> impl Future<Output = Result<Tag, CasebookError>> + Send {
        self.lock().tags.insert(tag.id, tag.clone());
        ready(tag)
    }

    fn get_tag(
        &self,
        id: TagId,
    ) -> impl Future<Output = Result<Option<Tag>, CasebookError>> + Send {
        ready(self.lock().tags.get(&id).cloned())
    }

    fn find_tag_by_name(
        &self,
        normalized_name: &str,
    ) -> impl Future<Output = Result<Option<Tag>, CasebookError>> + Send {
        let found = self
            .lock()
            .tags
            .values()
            .find(|t| t.normalized_name() == normalized_name)
            .cloned();
        ready(found)
    }

    fn list_tags(&self) -> impl Future<Output = Result<Vec<Tag>, CasebookError>> + Send {
        let mut all: Vec<Tag> = self.lock().tags.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        ready(all)
    }

    fn delete_tag(&self, id: TagId) -> impl Future<Output = Result<(), CasebookError>> + Send {
        let mut tables = self.lock();
        tables.tags.remove(&id);
        for site in tables.sites.values_mut() {
            site.tags.retain(|tag| *tag != id);
        }
        for tags in tables.preferred_tags.values_mut() {
            tags.remove(&id);
        }
        ready(())
    }
}

impl UserRepository for InMemoryStore {
    fn create_user(&self, user: User) -> impl Future<Output = Result<User, CasebookError>> + Send {
        self.lock().users.insert(user.id, user.clone());
        ready(user)
    }

    fn get_user(
        &self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<User>, CasebookError>> + Send {
        ready(self.lock().users.get(&id).cloned())
    }

    fn find_user_by_login(
        &self,
        login: &str,
    ) -> impl Future<Output = Result<Option<User>, CasebookError>> + Send {
        let found = self
            .lock()
            .users
            .values()
            .find(|u| u.login == login)
            .cloned();
        ready(found)
    }

    fn find_user_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<User>, CasebookError>> + Send {
        let found = self
            .lock()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned();
        ready(found)
    }

    fn list_users(&self) -> impl Future<Output = Result<Vec<User>, CasebookError>> + Send {
        let mut all: Vec<User> = self.lock().users.values().cloned().collect();
        all.sort_by(|a, b| a.login.cmp(&b.login));
        ready(all)
    }

    fn update_user(&self, user: User) -> impl Future<Output = Result<User, CasebookError>> + Send {
        self.lock().users.insert(user.id, user.clone());
        ready(user)
    }

    fn delete_user(&self, id: UserId) -> impl Future<Output = Result<(), CasebookError>> + Send {
        let mut tables = self.lock();
        tables.users.remove(&id);
        tables.children.retain(|(parent, _)| *parent != id);
        ready(())
    }

    fn add_child(
        &self,
        parent: UserId,
        student: StudentId,
    ) -> impl Future<Output = Result<(), CasebookError>> + Send {
        let mut tables = self.lock();
        if !tables.children.contains(&(parent, student)) {
            tables.children.push((parent, student));
        }
        ready(())
    }

    fn remove_child(
        &self,
        parent: UserId,
        student: StudentId,
    ) -> impl Future<Output = Result<(), CasebookError>> + Send {
        self.lock()
            .children
            .retain(|link| *link != (parent, student));
        ready(())
    }

    fn children_of(
        &self,
        parent: UserId,
    ) -> impl Future<Output = Result<Vec<StudentId>, CasebookError>> + Send {
        let found = self
            .lock()
            .children
            .iter()
            .filter(|(p, _)| *p == parent)
            .map(|(_, s)| *s)
            .collect();
        ready(found)
    }
}

impl AcademicYearRepository for InMemoryStore {
    fn create_academic_year(
        &self,
        year: AcademicYear,
    ) -> impl Future<Output = Result<AcademicYear, CasebookError>> + Send {
        self.lock().years.insert(year.id, year.clone());
        ready(year)
    }

    fn get_academic_year(
        &self,
        id: AcademicYearId,
    ) -> impl Future<Output = Result<Option<AcademicYear>, CasebookError>> + Send {
        ready(self.lock().years.get(&id).cloned())
    }

    fn find_academic_year(
        &self,
        start_year: i32,
    ) -> impl Future<Output = Result<Option<AcademicYear>, CasebookError>> + Send {
        let found = self
            .lock()
            .years
            .values()
            .find(|y| y.start_year == start_year)
            .cloned();
        ready(found)
    }

    fn list_academic_years(
        &self,
    ) -> impl Future<Output = Result<Vec<AcademicYear>, CasebookError>> + Send {
        let mut all: Vec<AcademicYear> = self.lock().years.values().cloned().collect();
        all.sort_by(|a, b| b.start_year.cmp(&a.start_year));
        ready(all)
    }
}

impl ClassRepository for InMemoryStore {
    fn create_class(
        &self,
        class: SchoolClass,
    ) -> impl Future<Output = Result<SchoolClass, CasebookError>> + Send {
        self.lock().classes.insert(class.id, class.clone());
        ready(class)
    }

    fn get_class(
        &self,
        id: ClassId,
    ) -> impl Future<Output = Result<Option<SchoolClass>, CasebookError>> + Send {
        ready(self.lock().classes.get(&id).cloned())
    }

    fn classes_for_year(
        &self,
        year: AcademicYearId,
    ) -> impl Future<Output = Result<Vec<SchoolClass>, CasebookError>> + Send {
        let mut found: Vec<SchoolClass> = self
            .lock()
            .classes
            .values()
            .filter(|c| c.academic_year_id == year)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        ready(found)
    }

    fn find_class(
        &self,
        year: AcademicYearId,
        name: &str,
    ) -> impl Future<Output = Result<Option<SchoolClass>, CasebookError>> + Send {
        let found = self
            .lock()
            .classes
            .values()
            .find(|c| c.academic_year_id == year && c.name.eq_ignore_ascii_case(name))
            .cloned();
        ready(found)
    }

    fn delete_class(&self, id: ClassId) -> impl Future<Output = Result<(), CasebookError>> + Send {
        let mut tables = self.lock();
        tables.classes.remove(&id);
        let leaving: Vec<StudentId> = tables
            .students
            .values()
            .filter(|s| s.class_id == id)
            .map(|s| s.id)
            .collect();
        tables.students.retain(|_, s| s.class_id != id);
        tables.records.retain(|_, r| r.class_id != id);
        tables.notes.retain(|_, n| !leaving.contains(&n.student_id));
        tables.children.retain(|(_, s)| !leaving.contains(s));
        ready(())
    }
}

impl StudentRepository for InMemoryStore {
    fn create_student(
        &self,
        student: Student,
    ) -> impl Future<Output = Result<Student, CasebookError>> + Send {
        self.lock().students.insert(student.id, student.clone());
        ready(student)
    }

    fn get_student(
        &self,
        id: StudentId,
    ) -> impl Future<Output = Result<Option<Student>, CasebookError>> + Send {
        ready(self.lock().students.get(&id).cloned())
    }

    fn students_in_class(
        &self,
        class: ClassId,
    ) -> impl Future<Output = Result<Vec<Student>, CasebookError>> + Send {
        let mut found: Vec<Student> = self
            .lock()
            .students
            .values()
            .filter(|s| s.class_id == class)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        ready(found)
    }
}

impl AttendanceRepository for InMemoryStore {
    fn merge_register(
        &self,
        class: ClassId,
        date: Date,
        records: Vec<AttendanceRecord>,
    ) -> impl Future<Output = Result<Vec<AttendanceRecord>, CasebookError>> + Send {
        let mut tables = self.lock();
        let stored: Vec<AttendanceRecord> = tables
            .records
            .values()
            .filter(|r| r.class_id == class && r.date == date)
            .cloned()
            .collect();
        let diff = RegisterDiff::between(&stored, records);
        for id in &diff.removed {
            tables.records.remove(id);
        }
        let orphaned: Vec<AttendanceRecordId> =
            diff.removed.iter().copied().chain(diff.unjustifiable()).collect();
        tables
            .justifications
            .retain(|_, j| !orphaned.contains(&j.record_id));
        for change in &diff.changes {
            let record = change.record();
            tables.records.insert(record.id, record.clone());
        }
        ready(diff.into_changed())
    }

    fn get_record(
        &self,
        id: AttendanceRecordId,
    ) -> impl Future<Output = Result<Option<AttendanceRecord>, CasebookError>> + Send {
        ready(self.lock().records.get(&id).cloned())
    }

    fn records_for_day(
        &self,
        class: ClassId,
        date: Date,
    ) -> impl Future<Output = Result<Vec<AttendanceRecord>, CasebookError>> + Send {
        let found = self
            .lock()
            .records
            .values()
            .filter(|r| r.class_id == class && r.date == date)
            .cloned()
            .collect();
        ready(found)
    }

    fn records_for_student(
        &self,
        student: StudentId,
    ) -> impl Future<Output = Result<Vec<AttendanceRecord>, CasebookError>> + Send {
        let mut found: Vec<AttendanceRecord> = self
            .lock()
            .records
            .values()
            .filter(|r| r.student_id == student)
            .cloned()
            .collect();
        found.sort_by_key(|r| r.date);
        ready(found)
    }
}

impl JustificationRepository for InMemoryStore {
    fn create_justification(
        &self,
        justification: Justification,
    ) -> impl Future<Output = Result<Justification, CasebookError>> + Send {
        self.lock()
            .justifications
            .insert(justification.id, justification.clone());
        ready(justification)
    }

    fn get_justification(
        &self,
        id: JustificationId,
    ) -> impl Future<Output = Result<Option<Justification>, CasebookError>> + Send {
        ready(self.lock().justifications.get(&id).cloned())
    }

    fn justification_for_record(
        &self,
        record: AttendanceRecordId,
    ) -> impl Future<Output = Result<Option<Justification>, CasebookError>> + Send {
        let found = self
            .lock()
            .justifications
            .values()
            .find(|j| j.record_id == record)
            .cloned();
        ready(found)
    }

    fn justifications_for_student(
        &self,
        student: StudentId,
    ) -> impl Future<Output = Result<Vec<Justification>, CasebookError>> + Send {
        let tables = self.lock();
        let mut found: Vec<Justification> = tables
            .justifications
            .values()
            .filter(|j| {
                tables
                    .records
                    .get(&j.record_id)
                    .is_some_and(|r| r.student_id == student)
            })
            .cloned()
            .collect();
        found.sort_by_key(|j| j.submitted_on);
        ready(found)
    }

    fn update_justification(
        &self,
        justification: Justification,
    ) -> impl Future<Output = Result<Justification, CasebookError>> + Send {
        self.lock()
            .justifications
            .insert(justification.id, justification.clone());
        ready(justification)
    }

    fn delete_justification(
        &self,
        id: JustificationId,
    ) -> impl Future<Output = Result<(), CasebookError>> + Send {
        self.lock().justifications.remove(&id);
        ready(())
    }
}

impl ReportCardRepository for InMemoryStore {
    fn upsert_report_card(
        &self,
        card: ReportCard,
    ) -> impl Future<Output = Result<ReportCard, CasebookError>> + Send {
        let mut tables = self.lock();
        tables.report_cards.retain(|_, c| {
            !(c.student_id == card.student_id
                && c.academic_year_id == card.academic_year_id
                && c.term == card.term)
        });
        tables.report_cards.insert(card.id, card.clone());
        ready(card)
    }

    fn find_report_card(
        &self,
        student: StudentId,
        year: AcademicYearId,
        term: Term,
    ) -> impl Future<Output = Result<Option<ReportCard>, CasebookError>> + Send {
        let found = self
            .lock()
            .report_cards
            .values()
            .find(|c| c.student_id == student && c.academic_year_id == year && c.term == term)
            .cloned();
        ready(found)
    }

    fn report_cards_for_student(
        &self,
        student: StudentId,
    ) -> impl Future<Output = Result<Vec<ReportCard>, CasebookError>> + Send {
        let mut found: Vec<ReportCard> = self
            .lock()
            .report_cards
            .values()
            .filter(|c| c.student_id == student)
            .cloned()
            .collect();
        found.sort_by_key(|c| c.term);
        ready(found)
    }
}

impl ConventionRepository for InMemoryStore {
    fn create_convention(
        &self,
        convention: Convention,
    ) -> impl Future<Output = Result<Convention, CasebookError>> + Send {
        self.lock()
            .conventions
            .insert(convention.id, convention.clone());
        ready(convention)
    }

    fn get_convention(
        &self,
        id: ConventionId,
    ) -> impl Future<Output = Result<Option<Convention>, CasebookError>> + Send {
        ready(self.lock().conventions.get(&id).cloned())
    }

    fn conventions_for_point(
        &self,
        point: RefreshmentPointId,
    ) -> impl Future<Output = Result<Vec<Convention>, CasebookError>> + Send {
        let mut found: Vec<Convention> = self
            .lock()
            .conventions
            .values()
            .filter(|c| c.point_id == point)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.requested_at.cmp(&a.requested_at));
        ready(found)
    }

    fn update_convention(
        &self,
        convention: Convention,
    ) -> impl Future<Output = Result<Convention, CasebookError>> + Send {
        self.lock()
            .conventions
            .insert(convention.id, convention.clone());
        ready(convention)
    }
}

impl EnrollmentRequestRepository for InMemoryStore {
    fn create_request(
        &self,
        request: EnrollmentRequest,
    ) -> impl Future<Output = Result<EnrollmentRequest, CasebookError>> + Send {
        self.lock().requests.insert(request.id, request.clone());
        ready(request)
    }

    fn get_request(
        &self,
        id: EnrollmentRequestId,
    ) -> impl Future<Output = Result<Option<EnrollmentRequest>, CasebookError>> + Send {
        ready(self.lock().requests.get(&id).cloned())
    }

    fn find_request(
        &self,
        login: &str,
        email: &str,
    ) -> impl Future<Output = Result<Option<EnrollmentRequest>, CasebookError>> + Send {
        let found = self
            .lock()
            .requests
            .values()
            .find(|r| r.login == login || r.email == email)
            .cloned();
        ready(found)
    }

    fn list_requests(
        &self,
    ) -> impl Future<Output = Result<Vec<EnrollmentRequest>, CasebookError>> + Send {
        let mut all: Vec<EnrollmentRequest> = self.lock().requests.values().cloned().collect();
        all.sort_by_key(|r| r.requested_at);
        ready(all)
    }

    fn delete_request(
        &self,
        id: EnrollmentRequestId,
    ) -> impl Future<Output = Result<(), CasebookError>> + Send {
        self.lock().requests.remove(&id);
        ready(())
    }
}

impl NoteRepository for InMemoryStore {
    fn create_note(&self, note: Note) -> impl Future<Output = Result<Note, CasebookError>> + Send {
        self.lock().notes.insert(note.id, note.clone());
        ready(note)
    }

    fn get_note(
        &self,
        id: NoteId,
    ) -> impl Future<Output = Result<Option<Note>, CasebookError>> + Send {
        ready(self.lock().notes.get(&id).cloned())
    }

    fn notes_for_student(
        &self,
        student: StudentId,
    ) -> impl Future<Output = Result<Vec<Note>, CasebookError>> + Send {
        let mut found: Vec<Note> = self
            .lock()
            .notes
            .values()
            .filter(|n| n.student_id == student)
            .cloned()
            .collect();
        found.sort_by_key(|n| (n.date, n.created_at));
        ready(found)
    }

    fn update_note(&self, note: Note) -> impl Future<Output = Result<Note, CasebookError>> + Send {
        self.lock().notes.insert(note.id, note.clone());
        ready(note)
    }

    fn delete_note(&self, id: NoteId) -> impl Future<Output = Result<(), CasebookError>> + Send {
        self.lock().notes.remove(&id);
        ready(())
    }
}

impl TeachingRepository for InMemoryStore {
    fn create_teaching(
        &self,
        teaching: Teaching,
    ) -> impl Future<Output = Result<Teaching, CasebookError>> + Send {
        self.lock().teachings.insert(teaching.id, teaching.clone());
        ready(teaching)
    }

    fn get_teaching(
        &self,
        id: TeachingId,
    ) -> impl Future<Output = Result<Option<Teaching>, CasebookError>> + Send {
        ready(self.lock().teachings.get(&id).cloned())
    }

    fn find_teaching_by_name(
        &self,
        name_key: &str,
    ) -> impl Future<Output = Result<Option<Teaching>, CasebookError>> + Send {
        let found = self
            .lock()
            .teachings
            .values()
            .find(|t| t.name_key() == name_key)
            .cloned();
        ready(found)
    }

    fn list_teachings(&self) -> impl Future<Output = Result<Vec<Teaching>, CasebookError>> + Send {
        let mut all: Vec<Teaching> = self.lock().teachings.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        ready(all)
    }

    fn update_teaching(
        &self,
        teaching: Teaching,
    ) -> impl Future<Output = Result<Teaching, CasebookError>> + Send {
        self.lock().teachings.insert(teaching.id, teaching.clone());
        ready(teaching)
    }

    fn delete_teaching(
        &self,
        id: TeachingId,
    ) -> impl Future<Output = Result<(), CasebookError>> + Send {
        let mut tables = self.lock();
        tables.teachings.remove(&id);
        for address in tables.addresses.values_mut() {
            address.teachings.retain(|t| *t != id);
        }
        ready(())
    }
}

impl AddressRepository for InMemoryStore {
    fn create_address(
        &self,
        address: Address,
    ) -> impl Future<Output = Result<Address, CasebookError>> + Send {
        self.lock().addresses.insert(address.id, address.clone());
        ready(address)
    }

    fn get_address(
        &self,
        id: AddressId,
    ) -> impl Future<Output = Result<Option<Address>, CasebookError>> + Send {
        ready(self.lock().addresses.get(&id).cloned())
    }

    fn find_address_by_name(
        &self,
        name_key: &str,
    ) -> impl Future<Output = Result<Option<Address>, CasebookError>> + Send {
        let found = self
            .lock()
            .addresses
            .values()
            .find(|a| a.name_key() == name_key)
            .cloned();
        ready(found)
    }

    fn list_addresses(&self) -> impl Future<Output = Result<Vec<Address>, CasebookError>> + Send {
        let mut all: Vec<Address> = self.lock().addresses.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        ready(all)
    }

    fn update_address(
        &self,
        address: Address,
    ) -> impl Future<Output = Result<Address, CasebookError>> + Send {
        self.lock().addresses.insert(address.id, address.clone());
        ready(address)
    }

    fn delete_address(
        &self,
        id: AddressId,
    ) -> impl Future<Output = Result<(), CasebookError>> + Send {
        self.lock().addresses.remove(&id);
        ready(())
    }
}

/// Publisher remembering every event it was given.
#[derive(Clone, Default)]
pub(crate) struct RecordingPublisher {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingPublisher {
    pub(crate) fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub(crate) fn kinds(&self) -> Vec<EventKind> {
        self.events().iter().map(|e| e.kind).collect()
    }
}

impl EventPublisher for RecordingPublisher {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), CasebookError>> + Send {
        self.events.lock().unwrap().push(event);
        async { Ok(()) }
    }
}
