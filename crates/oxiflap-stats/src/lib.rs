//! Statistical summaries for the oxiflap project.
//!
//! Currently a single tool: [`descriptive::DescriptiveStats`], used by the
//! trainer to report per-generation fitness distributions.
//!
//! # Example
//!
//! ```
//! use oxiflap_stats::descriptive::DescriptiveStats;
//!
//! let fitness = [4.9, 12.3, 4.9, 30.1, 8.2];
//! let stats = DescriptiveStats::new(fitness).unwrap();
//! assert_eq!(stats.min, 4.9);
//! assert_eq!(stats.max, 30.1);
//! ```

pub mod descriptive;
