//! Engagement and platform analytics.
//!
//! Everything here is recomputed from the raw ledger and view counts on each
//! call by a linear scan. There is no caching or index.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::coupon::Coupon;
use crate::engagement::{RedemptionLedger, ViewCounter};
use crate::types::{BusinessId, CouponId, Email, Price};

/// Number of days covered by the redemption trend.
pub const TREND_DAYS: i64 = 7;

/// Assumed subscription lifetime, in months, for lifetime-value estimates.
pub const LIFETIME_MONTHS: usize = 8;

/// Redemptions per hundred views.
///
/// Zero views yields `0.0`, never NaN or infinity. Redemptions are not tied
/// to views, so the rate can exceed 100.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn conversion_rate(redemptions: usize, views: u64) -> f64 {
    if views == 0 {
        return 0.0;
    }
    redemptions as f64 / views as f64 * 100.0
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Views and redemptions for one coupon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponStats {
    pub coupon_id: CouponId,
    pub title: String,
    pub views: u64,
    pub redemptions: usize,
    /// Percentage, rounded to one decimal.
    pub conversion_rate: f64,
    pub last_redeemed_at: Option<DateTime<Utc>>,
}

/// Redemptions on one calendar day (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// A business's engagement dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponAnalytics {
    pub business_name: String,
    pub total_coupons: usize,
    pub total_views: u64,
    pub total_redemptions: usize,
    /// Overall percentage, rounded to one decimal.
    pub conversion_rate: f64,
    pub coupons: Vec<CouponStats>,
    /// The coupon with the most redemptions; the earliest listed wins ties.
    pub top_performer: Option<CouponStats>,
    /// The last [`TREND_DAYS`] days ending `today`, oldest first.
    pub daily_redemptions: Vec<DailyCount>,
}

impl CouponAnalytics {
    /// Aggregate engagement for `coupons`, which the caller has already
    /// narrowed to one business.
    ///
    /// The daily trend only counts redemptions of those coupons.
    #[must_use]
    pub fn for_business<'a>(
        business_name: &str,
        coupons: impl IntoIterator<Item = &'a Coupon>,
        ledger: &RedemptionLedger,
        views: &ViewCounter,
        today: NaiveDate,
    ) -> Self {
        let stats: Vec<CouponStats> = coupons
            .into_iter()
            .map(|coupon| {
                let coupon_views = views.get(&coupon.id);
                let redemptions = ledger.count_for_coupon(&coupon.id);
                CouponStats {
                    coupon_id: coupon.id.clone(),
                    title: coupon.title.clone(),
                    views: coupon_views,
                    redemptions,
                    conversion_rate: round_tenth(conversion_rate(redemptions, coupon_views)),
                    last_redeemed_at: ledger.last_for_coupon(&coupon.id).map(|r| r.redeemed_at),
                }
            })
            .collect();

        let total_views = stats.iter().map(|s| s.views).sum();
        let total_redemptions = stats.iter().map(|s| s.redemptions).sum();

        let top_performer = stats
            .iter()
            .reduce(|best, s| if s.redemptions > best.redemptions { s } else { best })
            .cloned();

        let daily_redemptions = daily_trend(
            ledger
                .iter()
                .filter(|r| stats.iter().any(|s| s.coupon_id == r.coupon_id))
                .map(|r| r.redeemed_at.date_naive()),
            today,
        );

        Self {
            business_name: business_name.to_owned(),
            total_coupons: stats.len(),
            total_views,
            total_redemptions,
            conversion_rate: round_tenth(conversion_rate(total_redemptions, total_views)),
            coupons: stats,
            top_performer,
            daily_redemptions,
        }
    }
}

fn daily_trend(dates: impl Iterator<Item = NaiveDate>, today: NaiveDate) -> Vec<DailyCount> {
    let mut trend: Vec<DailyCount> = (0..TREND_DAYS)
        .rev()
        .map(|offset| DailyCount {
            date: today - Duration::days(offset),
            count: 0,
        })
        .collect();

    for date in dates {
        if let Some(day) = trend.iter_mut().find(|d| d.date == date) {
            day.count += 1;
        }
    }
    trend
}

/// One business as shown on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessRecord {
    pub id: BusinessId,
    pub business_name: String,
    pub owner_name: String,
    pub email: Email,
    pub signup_date: DateTime<Utc>,
    pub subscription_active: bool,
    pub total_coupons: u64,
    pub total_redemptions: u64,
    pub revenue: Price,
}

/// Admin-wide totals over the business directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformAnalytics {
    pub total_businesses: usize,
    pub active_subscriptions: usize,
    pub total_revenue: Price,
    pub total_coupons: u64,
    pub total_redemptions: u64,
    /// Rounded half up; zero when there are no businesses.
    pub avg_redemptions_per_business: u64,
    pub businesses: Vec<BusinessRecord>,
}

impl PlatformAnalytics {
    #[must_use]
    pub fn summarize(businesses: Vec<BusinessRecord>) -> Self {
        let total_businesses = businesses.len();
        let active_subscriptions = businesses.iter().filter(|b| b.subscription_active).count();
        let total_revenue = businesses.iter().map(|b| b.revenue).sum();
        let total_coupons = businesses.iter().map(|b| b.total_coupons).sum();
        let total_redemptions: u64 = businesses.iter().map(|b| b.total_redemptions).sum();

        let avg_redemptions_per_business = match u64::try_from(total_businesses) {
            Ok(0) | Err(_) => 0,
            Ok(n) => (total_redemptions * 2 + n) / (2 * n),
        };

        Self {
            total_businesses,
            active_subscriptions,
            total_revenue,
            total_coupons,
            total_redemptions,
            avg_redemptions_per_business,
            businesses,
        }
    }
}

/// Subscription revenue snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueSummary {
    pub subscription_price: Price,
    pub total_businesses: usize,
    pub active_subscriptions: usize,
    pub monthly_recurring_revenue: Price,
    /// Inactive share of businesses, as a percentage rounded to one decimal.
    pub churn_rate: f64,
    pub average_lifetime_value: Price,
    pub platform_fee_percent: u32,
    /// Platform cut of one subscription payment.
    pub platform_fee: Price,
    /// What a business keeps of one subscription payment.
    pub business_payout: Price,
}

impl RevenueSummary {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_records(
        businesses: &[BusinessRecord],
        subscription_price: Price,
        fee: PlatformFee,
    ) -> Self {
        let total_businesses = businesses.len();
        let active_subscriptions = businesses.iter().filter(|b| b.subscription_active).count();
        let churn_rate = if total_businesses == 0 {
            0.0
        } else {
            round_tenth(
                (total_businesses - active_subscriptions) as f64 / total_businesses as f64 * 100.0,
            )
        };

        Self {
            subscription_price,
            total_businesses,
            active_subscriptions,
            monthly_recurring_revenue: subscription_price.times(active_subscriptions),
            churn_rate,
            average_lifetime_value: subscription_price.times(LIFETIME_MONTHS),
            platform_fee_percent: fee.percent(),
            platform_fee: fee.fee(subscription_price),
            business_payout: fee.payout(subscription_price),
        }
    }
}

/// Platform commission on business payments, as a whole percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformFee {
    percent: u32,
}

impl PlatformFee {
    /// Percentages above 100 are clamped to 100.
    #[must_use]
    pub const fn new(percent: u32) -> Self {
        Self {
            percent: if percent > 100 { 100 } else { percent },
        }
    }

    #[must_use]
    pub const fn percent(self) -> u32 {
        self.percent
    }

    /// Fee on `amount`, rounded to the cent (half away from zero).
    ///
    /// The rate is at most one, so the product never exceeds `amount`.
    #[must_use]
    pub fn fee(self, amount: Price) -> Price {
        let rate = Decimal::new(i64::from(self.percent), 2);
        Price::new(
            (amount.amount() * rate)
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// What the business keeps after the fee.
    #[must_use]
    pub fn payout(self, amount: Price) -> Price {
        Price::new(amount.amount() - self.fee(amount).amount())
    }
}
