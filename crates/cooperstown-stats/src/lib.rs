//! Statistical building blocks for the Cooperstown project.
//!
//! This crate provides the small numeric kernels shared by the aggregation
//! engine and the classifier pipeline:
//!
//! - **Descriptive statistics**: mean, variance and standard deviation of a dataset
//! - **Mean accumulation**: streaming `(sum, count)` pairs that only produce a mean
//!   when at least one value contributed
//! - **Checked ratios**: divisions that surface a zero denominator as an explicit
//!   [`ratio::UndefinedMetricError`] instead of `NaN` or a misleading zero
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`mean`]: Two-phase mean accumulation
//! - [`ratio`]: Ratios with explicit undefined-denominator errors
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use cooperstown_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```
//!
//! ## Accumulating a mean
//!
//! ```
//! use cooperstown_stats::mean::MeanAccumulator;
//!
//! let mut acc = MeanAccumulator::default();
//! assert_eq!(acc.mean(), None);
//! acc.push(2.0);
//! acc.push(4.0);
//! assert_eq!(acc.mean(), Some(3.0));
//! ```
//!
//! ## Checked ratios
//!
//! ```
//! use cooperstown_stats::ratio;
//!
//! assert_eq!(ratio::checked("precision", 8.0, 10.0).unwrap(), 0.8);
//! assert!(ratio::checked("precision", 0.0, 0.0).is_err());
//! ```

pub mod descriptive;
pub mod mean;
pub mod ratio;
