//! Offer listing and guardian/student lookup handlers
//!
//! Both handlers take a document path parameter that is only compared against the
//! not-found sentinel. The offer list is the same for every document and the lookup
//! always returns the same guardian; only the student's `ra` echoes the parameter.

use serde::{Deserialize, Serialize};
use warp::{Rejection, Reply};

use super::generic::{ApiError, DataResponse};
use crate::fixtures::{self, Guardian, Offer, Student};

/// Payload of `GET /api/v1/offers/:doc`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffersData {
    pub offers: Vec<Offer>,
}

/// Payload of `GET /api/v1/:doc`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentData {
    pub student: Student,
    pub guardian: Guardian,
}

/// Handler for `GET /api/v1/offers/:doc`.
///
/// # Returns
///
/// * `Ok(warp::Reply)` - `{"data": {"offers": [...]}}`
/// * `Err(warp::Rejection)` - `doc` is the not-found sentinel
pub async fn get_offers_handler(doc: String) -> Result<impl Reply, Rejection> {
    if fixtures::is_not_found_sentinel(&doc) {
        return Err(warp::reject::custom(ApiError::NotFound));
    }

    Ok(warp::reply::json(&DataResponse {
        data: OffersData {
            offers: fixtures::offers(),
        },
    }))
}

/// Handler for `GET /api/v1/:doc`.
///
/// # Returns
///
/// * `Ok(warp::Reply)` - `{"data": {"student": {...}, "guardian": {...}}}`
/// * `Err(warp::Rejection)` - `doc` is the not-found sentinel
pub async fn get_enrollment_handler(doc: String) -> Result<impl Reply, Rejection> {
    if fixtures::is_not_found_sentinel(&doc) {
        return Err(warp::reject::custom(ApiError::NotFound));
    }

    Ok(warp::reply::json(&DataResponse {
        data: EnrollmentData {
            student: fixtures::student(&doc),
            guardian: fixtures::guardian(),
        },
    }))
}
