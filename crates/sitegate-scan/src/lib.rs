//! SiteGate Scan: trust-claim and placeholder detection
//!
//! Pure functions over text. Two independent pattern families are
//! provided: fabricated-trust claims (statistics, compliance claims,
//! testimonials, dollar outcomes, canned trust phrases) and unresolved
//! placeholders (lorem ipsum, `[TODO]` tokens, template tokens, generic
//! brand names).
//!
//! # Example
//!
//! ```
//! use sitegate_scan::{scan_trust_claims, ViolationCategory};
//!
//! let hits = scan_trust_claims("An award-winning bakery");
//! assert_eq!(hits[0].category, ViolationCategory::TrustSignal);
//! assert_eq!(hits[0].line, 1);
//! ```

pub mod patterns;
pub mod scanner;

pub use patterns::{Pattern, PLACEHOLDER_PATTERNS, TRUST_PATTERNS};
pub use scanner::{is_approved, line_at, scan, scan_placeholders, scan_trust_claims, Match};
pub use sitegate_core::ViolationCategory;
