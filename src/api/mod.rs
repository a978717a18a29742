//! Backend API access
//!
//! A shared [`ApiClient`] carries the base URL, bearer token and cookie jar.
//! Each resource is exposed through the [`ListSource`] / [`ResourceService`]
//! traits so the list state can be driven by any implementation.

pub mod client;
pub mod endpoints;
pub mod envelope;
pub mod error;
pub mod service;

pub mod accommodation;
pub mod institutions;
pub mod insurance;
pub mod skill_assessments;
pub mod visa;

pub use client::{ApiClient, Query};
pub use envelope::Envelope;
pub use error::{ApiError, ApiResult};
pub use service::{ListSource, Listing, ResourceService, ResourceSpec, RestResource};

pub use accommodation::AccommodationService;
pub use institutions::{institutions, ImportSummary, Institutions, NewCourse};
pub use insurance::{health_insurances, HealthInsurances};
pub use skill_assessments::{skill_assessments, SkillAssessmentLookups, SkillAssessments};
pub use visa::{visa_services, VisaServices};
