//! Statistical estimate of on-site setup minutes.
//!
//! Each product contributes `round(mean + k * stddev)` of its historical
//! samples, with outliers beyond two standard deviations discarded once
//! enough samples exist. An order's estimate is the sum over its products,
//! floored at the minimum delivery time.

use crate::distance::whole_minutes;
use crate::model::Product;
use crate::settings::SetupTimeSettings;

/// Estimates setup minutes from historical samples.
///
/// # Examples
/// ```
/// use medroute_core::{CertificationType, Product, SetupTimeEstimator, SetupTimeSettings};
///
/// let estimator = SetupTimeEstimator::new(SetupTimeSettings::default());
/// let walker = Product::new("p1", "Walker", CertificationType::Mobility)
///     .with_setup_samples([10, 10, 10]);
/// assert_eq!(estimator.product_minutes(&walker), 10);
/// // The order total never drops below the 15 minute floor.
/// assert_eq!(estimator.order_minutes(&[&walker]), 15);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SetupTimeEstimator {
    settings: SetupTimeSettings,
}

impl SetupTimeEstimator {
    /// Construct an estimator.
    pub const fn new(settings: SetupTimeSettings) -> Self {
        Self { settings }
    }

    /// Estimated minutes for one product, without the order floor.
    ///
    /// Products with no samples contribute nothing.
    pub fn product_minutes(&self, product: &Product) -> u32 {
        let samples: Vec<f64> = product
            .historical_setup_minutes
            .iter()
            .map(|&minutes| f64::from(minutes))
            .collect();
        let Some((mean, std_dev)) = mean_and_std_dev(&samples) else {
            return 0;
        };

        let kept: Vec<f64> = if samples.len() >= self.settings.outlier_sample_threshold {
            samples
                .into_iter()
                .filter(|sample| (sample - mean).abs() <= 2.0 * std_dev)
                .collect()
        } else {
            samples
        };

        mean_and_std_dev(&kept).map_or(0, |(mean, std_dev)| {
            whole_minutes(mean + self.settings.std_dev_multiple * std_dev)
        })
    }

    /// Estimated minutes for an order's products, floored at the minimum
    /// delivery time.
    pub fn order_minutes(&self, products: &[&Product]) -> u32 {
        let total = products
            .iter()
            .map(|product| self.product_minutes(product))
            .fold(0_u32, u32::saturating_add);
        total.max(self.settings.minimum_delivery_minutes)
    }

    /// Settings in use.
    pub const fn settings(&self) -> &SetupTimeSettings {
        &self.settings
    }
}

/// Population mean and standard deviation, or `None` for no samples.
fn mean_and_std_dev(samples: &[f64]) -> Option<(f64, f64)> {
    if samples.is_empty() {
        return None;
    }
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some((mean, variance.sqrt()))
}
