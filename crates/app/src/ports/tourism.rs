//! eTour repository ports: persistence for tourists, sites, feedback,
//! refreshment points with their banners and conventions, and tags.
//!
//! Method names carry the aggregate they act on so that a single store type
//! can implement every repository without ambiguous calls.

use std::future::Future;

use std::collections::BTreeSet;

use casebook_domain::banner::Banner;
use casebook_domain::convention::Convention;
use casebook_domain::error::CasebookError;
use casebook_domain::feedback::Feedback;
use casebook_domain::id::{
    BannerId, ConventionId, FeedbackId, RefreshmentPointId, SiteId, TagId, TouristId,
};
use casebook_domain::refreshment_point::RefreshmentPoint;
use casebook_domain::site::Site;
use casebook_domain::tag::Tag;
use casebook_domain::tourist::Tourist;

/// Repository for persisting and querying [`Tourist`]s, their preferred
/// sites and their search preferences.
pub trait TouristRepository {
    fn create_tourist(
        &self,
        tourist: Tourist,
    ) -> impl Future<Output = Result<Tourist, CasebookError>> + Send;

    fn get_tourist(
        &self,
        id: TouristId,
    ) -> impl Future<Output = Result<Option<Tourist>, CasebookError>> + Send;

    /// Exact, case-sensitive lookup.
    fn find_tourist_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<Tourist>, CasebookError>> + Send;

    /// Lookup on the stored (lowercase) email.
    fn find_tourist_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<Tourist>, CasebookError>> + Send;

    fn list_tourists(&self) -> impl Future<Output = Result<Vec<Tourist>, CasebookError>> + Send;

    fn update_tourist(
        &self,
        tourist: Tourist,
    ) -> impl Future<Output = Result<Tourist, CasebookError>> + Send;

    /// Delete a tourist together with its feedback and preferences.
    fn delete_tourist(
        &self,
        id: TouristId,
    ) -> impl Future<Output = Result<(), CasebookError>> + Send;

    /// Mark `site` as preferred. Adding an already preferred site is a no-op.
    fn add_preferred_site(
        &self,
        tourist: TouristId,
        site: SiteId,
    ) -> impl Future<Output = Result<(), CasebookError>> + Send;

    fn remove_preferred_site(
        &self,
        tourist: TouristId,
        site: SiteId,
    ) -> impl Future<Output = Result<(), CasebookError>> + Send;

    fn preferred_sites(
        &self,
        tourist: TouristId,
    ) -> impl Future<Output = Result<Vec<SiteId>, CasebookError>> + Send;

    /// Replace the preferred tags of a tourist.
    fn set_preferred_tags(
        &self,
        tourist: TouristId,
        tags: BTreeSet<TagId>,
    ) -> impl Future<Output = Result<(), CasebookError>> + Send;

    fn preferred_tags(
        &self,
        tourist: TouristId,
    ) -> impl Future<Output = Result<BTreeSet<TagId>, CasebookError>> + Send;
}

/// Repository for cultural heritage [`Site`]s.
pub trait SiteRepository {
    fn create_site(&self, site: Site) -> impl Future<Output = Result<Site, CasebookError>> + Send;

    fn get_site(
        &self,
        id: SiteId,
    ) -> impl Future<Output = Result<Option<Site>, CasebookError>> + Send;

    fn list_sites(&self) -> impl Future<Output = Result<Vec<Site>, CasebookError>> + Send;

    /// Replace the stored site, tags included.
    fn update_site(&self, site: Site) -> impl Future<Output = Result<Site, CasebookError>> + Send;

    /// Delete a site together with its feedback, tags and preferences.
    fn delete_site(&self, id: SiteId) -> impl Future<Output = Result<(), CasebookError>> + Send;
}

/// Repository for tourist [`Feedback`].
pub trait FeedbackRepository {
    fn create_feedback(
        &self,
        feedback: Feedback,
    ) -> impl Future<Output = Result<Feedback, CasebookError>> + Send;

    fn get_feedback(
        &self,
        id: FeedbackId,
    ) -> impl Future<Output = Result<Option<Feedback>, CasebookError>> + Send;

    /// The feedback a tourist released for a site, if any.
    fn find_feedback(
        &self,
        tourist: TouristId,
        site: SiteId,
    ) -> impl Future<Output = Result<Option<Feedback>, CasebookError>> + Send;

    /// Feedback of a site, oldest first.
    fn feedback_for_site(
        &self,
        site: SiteId,
    ) -> impl Future<Output = Result<Vec<Feedback>, CasebookError>> + Send;

    /// Feedback written by a tourist, oldest first.
    fn feedback_by_tourist(
        &self,
        tourist: TouristId,
    ) -> impl Future<Output = Result<Vec<Feedback>, CasebookError>> + Send;

    fn update_feedback(
        &self,
        feedback: Feedback,
    ) -> impl Future<Output = Result<Feedback, CasebookError>> + Send;
}

/// Repository for [`RefreshmentPoint`]s.
pub trait RefreshmentPointRepository {
    fn create_point(
        &self,
        point: RefreshmentPoint,
    ) -> impl Future<Output = Result<RefreshmentPoint, CasebookError>> + Send;

    fn get_point(
        &self,
        id: RefreshmentPointId,
    ) -> impl Future<Output = Result<Option<RefreshmentPoint>, CasebookError>> + Send;

    fn list_points(
        &self,
    ) -> impl Future<Output = Result<Vec<RefreshmentPoint>, CasebookError>> + Send;

    fn update_point(
        &self,
        point: RefreshmentPoint,
    ) -> impl Future<Output = Result<RefreshmentPoint, CasebookError>> + Send;

    /// Delete a point together with its banners.
    fn delete_point(
        &self,
        id: RefreshmentPointId,
    ) -> impl Future<Output = Result<(), CasebookError>> + Send;
}

/// Repository for refreshment point [`Banner`]s.
pub trait BannerRepository {
    /// Store `banner` unless its point already displays `max_banners`.
    ///
    /// Counting and inserting happen as one atomic step, so concurrent
    /// inserts never push a point past its capacity.
    ///
    /// # Errors
    ///
    /// Returns [`ConflictError::BannerLimitReached`] when the point is full.
    ///
    /// [`ConflictError::BannerLimitReached`]: casebook_domain::error::ConflictError::BannerLimitReached
    fn create_banner_within(
        &self,
        banner: Banner,
        max_banners: u32,
    ) -> impl Future<Output = Result<Banner, CasebookError>> + Send;

    fn get_banner(
        &self,
        id: BannerId,
    ) -> impl Future<Output = Result<Option<Banner>, CasebookError>> + Send;

    /// Banners of a point, oldest first.
    fn banners_for_point(
        &self,
        point: RefreshmentPointId,
    ) -> impl Future<Output = Result<Vec<Banner>, CasebookError>> + Send;

    fn update_banner(
        &self,
        banner: Banner,
    ) -> impl Future<Output = Result<Banner, CasebookError>> + Send;

    fn delete_banner(&self, id: BannerId)
    -> impl Future<Output = Result<(), CasebookError>> + Send;
}

/// Repository for search [`Tag`]s.
pub trait TagRepository {
    fn create_tag(&self, tag: Tag) -> impl Future<Output = Result<Tag, CasebookError>> + Send;

    fn get_tag(&self, id: TagId)
    -> impl Future<Output = Result<Option<Tag>, CasebookError>> + Send;

    /// Lookup by normalized (trimmed, lowercase) name.
    fn find_tag_by_name(
        &self,
        normalized_name: &str,
    ) -> impl Future<Output = Result<Option<Tag>, CasebookError>> + Send;

    /// Tags ordered by name.
    fn list_tags(&self) -> impl Future<Output = Result<Vec<Tag>, CasebookError>> + Send;

    fn delete_tag(&self, id: TagId) -> impl Future<Output = Result<(), CasebookError>> + Send;
}

pub trait ConventionRepository {
    fn create_convention(
        &self,
        convention: Convention,
    ) -> impl Future<Output = Result<Convention, CasebookError>> + Send;

    fn get_convention(
        &self,
        id: ConventionId,
    ) -> impl Future<Output = Result<Option<Convention>, CasebookError>> + Send;

    /// Conventions of a point, most recent request first.
    fn conventions_for_point(
        &self,
        point: RefreshmentPointId,
    ) -> impl Future<Output = Result<Vec<Convention>, CasebookError>> + Send;

    fn update_convention(
        &self,
        convention: Convention,
    ) -> impl Future<Output = Result<Convention, CasebookError>> + Send;
}
