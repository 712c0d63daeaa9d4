//! SiteGate Quality: deploy gate evaluation
//!
//! Scores a validation pass with fixed penalties and decides whether a site
//! may ship.
//!
//! # Example
//!
//! ```
//! use sitegate_quality::{DeployGate, Findings};
//! use sitegate_core::Completeness;
//!
//! let gate = DeployGate::default();
//! let result = gate.evaluate(Findings {
//!     completeness: Completeness { has_index: true, ..Default::default() },
//!     ..Default::default()
//! });
//! assert!(result.can_deploy);
//! assert_eq!(result.score, 100);
//! ```

pub mod completeness;
pub mod gate;
pub mod profile;

pub use completeness::{check_completeness, page_slug, page_target, PageTarget};
pub use gate::{Check, CheckStatus, DeployGate, Findings, IssueCounts};
pub use profile::PenaltyProfile;
