//! Coupon moderation over the data directory.

use std::path::Path;

use perkpass_core::{Coupon, CouponFilter, CouponId, CouponSubmission};
use perkpass_server::{Storage, services::CouponService};
use tracing::info;

/// Load the coupon store from `data_dir`.
///
/// # Errors
///
/// Returns an error if the directory or its blobs cannot be read.
pub async fn open(data_dir: &Path) -> Result<CouponService, Box<dyn std::error::Error>> {
    let storage = Storage::directory(data_dir).await?;
    Ok(CouponService::load(storage).await?)
}

fn log_coupon(coupon: &Coupon) {
    info!(
        id = %coupon.id,
        business = %coupon.business_name,
        category = %coupon.category,
        status = %coupon.status,
        "{} ({})",
        coupon.title,
        coupon.discount
    );
}

/// Log listed coupons, or the review queue when `pending` is set.
pub async fn list(coupons: &CouponService, pending: bool) {
    let listed = if pending {
        coupons.pending().await
    } else {
        coupons.list(&CouponFilter::default()).await
    };

    for coupon in &listed {
        log_coupon(coupon);
    }
    info!(count = listed.len(), pending, "Done");
}

/// # Errors
///
/// Returns an error if the coupon is not pending or storage fails.
pub async fn approve(coupons: &CouponService, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let coupon = coupons.approve(&CouponId::new(id)).await?;
    info!(id = %coupon.id, "Approved \"{}\"", coupon.title);
    Ok(())
}

/// # Errors
///
/// Returns an error if the coupon is not pending or storage fails.
pub async fn deny(coupons: &CouponService, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let coupon = coupons.deny(&CouponId::new(id)).await?;
    info!(id = %coupon.id, "Denied \"{}\"", coupon.title);
    Ok(())
}

/// Parse a YAML list of submissions.
///
/// # Errors
///
/// Returns an error if the YAML does not match the submission shape.
pub fn parse_submissions(content: &str) -> Result<Vec<CouponSubmission>, serde_yaml::Error> {
    serde_yaml::from_str(content)
}

/// Submit every coupon in a YAML file for review.
///
/// All entries are validated before any is submitted, so a bad file leaves
/// the queue untouched.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, an entry is
/// invalid, or storage fails.
pub async fn import(coupons: &CouponService, file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    info!(path = %file.display(), "Loading coupons from file");
    let content = tokio::fs::read_to_string(file).await?;
    let submissions = parse_submissions(&content)?;

    for (index, submission) in submissions.iter().enumerate() {
        submission
            .validate()
            .map_err(|e| format!("entry {}: {e}", index + 1))?;
    }

    let total = submissions.len();
    for submission in submissions {
        let coupon = coupons.submit(submission).await?;
        info!(id = %coupon.id, "Queued \"{}\"", coupon.title);
    }
    info!(count = total, "Import complete");
    Ok(())
}
