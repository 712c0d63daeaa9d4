//! Fixed pattern families for trust claims and placeholders.
//!
//! Families are compiled once and never mutated. Trust families are listed in
//! precedence order: when two matches overlap, the earlier family wins
//! (security before dollar before trust before testimonial before numeric).

use lazy_static::lazy_static;
use regex::Regex;
use sitegate_core::ViolationCategory;

/// A named, immutable detection pattern
#[derive(Debug, Clone)]
pub struct Pattern {
    pub category: ViolationCategory,
    pub name: &'static str,
    pub regex: Regex,
}

impl Pattern {
    fn new(category: ViolationCategory, name: &'static str, pattern: &str) -> Self {
        Self {
            category,
            name,
            regex: Regex::new(pattern).unwrap(),
        }
    }
}

use ViolationCategory::{
    DollarClaim, NumericClaim, Placeholder, SecurityClaim, Testimonial, TrustSignal,
};

const AUDIENCE: &str =
    "users|customers|clients|businesses|companies|teams|downloads|members|people|subscribers";

/// At most one descriptive word between a count and its audience ("5,000 happy customers")
const ADJECTIVE: &str = r"(?:[a-z]+\s+)?";

lazy_static! {
    /// Fabricated-trust families, in precedence order
    pub static ref TRUST_PATTERNS: Vec<Pattern> = vec![
        // === Security / compliance ===
        Pattern::new(SecurityClaim, "soc2",
            r"(?i)\bSOC\s?2\b(?:\s+Type\s+(?:II|I|1|2)\b)?(?:\s+(?:certified|compliant|compliance|audited)\b)?"),
        Pattern::new(SecurityClaim, "hipaa", r"(?i)\bHIPAA(?:[- ]compliant)?\b"),
        Pattern::new(SecurityClaim, "gdpr", r"(?i)\bGDPR[- ]compliant\b"),
        Pattern::new(SecurityClaim, "iso27001", r"(?i)\bISO\s?27001(?:[- ]certified)?\b"),
        Pattern::new(SecurityClaim, "pci", r"(?i)\bPCI[- ]DSS(?:[- ]compliant)?\b"),
        Pattern::new(SecurityClaim, "grade_encryption",
            r"(?i)\b(?:bank|military|enterprise)[- ]grade\s+(?:encryption|security)\b"),
        Pattern::new(SecurityClaim, "uptime_sla", r"(?i)\b99\.9+\s?%\s*uptime\b"),
        Pattern::new(SecurityClaim, "e2e", r"(?i)\bend[- ]to[- ]end\s+encrypt(?:ed|ion)\b"),

        // === Dollar outcomes ===
        Pattern::new(DollarClaim, "amount_then_outcome",
            r"(?i)\$\d[\d,]*(?:\.\d+)?\s*(?:[kmb]\b|million\b|billion\b|thousand\b)?\+?\s*(?:saved|in savings|in revenue|revenue|raised|in funding|generated|roi|(?:in\s+)?sales)\b"),
        Pattern::new(DollarClaim, "outcome_then_amount",
            r"(?i)\b(?:saved|generated|raised|earned)\s+(?:(?:over|more than|nearly|up to)\s+)?\$\d[\d,]*(?:\.\d+)?(?:\s*(?:[kmb]\b|million\b|billion\b))?\+?"),

        // === Canned trust phrases ===
        Pattern::new(TrustSignal, "trusted_by", r#"(?i)\btrusted\s+by\s+(?:[^.!?<>"\n]|\.\d){1,60}"#),
        Pattern::new(TrustSignal, "award_winning", r"(?i)\baward[- ]winning\b"),
        Pattern::new(TrustSignal, "number_one", r"(?i)#1\s+[a-z][a-z-]*"),
        Pattern::new(TrustSignal, "number_one_words",
            r"(?i)\bnumber\s+one\s+(?:choice|rated|provider|platform|solution|in)\b"),
        Pattern::new(TrustSignal, "industry_leading", r"(?i)\b(?:industry|market)[- ]leading\b"),
        Pattern::new(TrustSignal, "world_class", r"(?i)\bworld[- ]class\b"),
        Pattern::new(TrustSignal, "best_in_class", r"(?i)\bbest[- ]in[- ]class\b"),
        Pattern::new(TrustSignal, "leading_provider", r"(?i)\bleading\s+provider\b"),
        Pattern::new(TrustSignal, "as_seen", r"(?i)\bas\s+(?:seen|featured)\s+(?:on|in)\b"),
        Pattern::new(TrustSignal, "press_mention",
            r"(?i)\b(?:featured|seen)\s+(?:in|on)\s+(?:Forbes|TechCrunch|Wired|Bloomberg|CNN|BBC|The\s+New\s+York\s+Times)\b"),
        Pattern::new(TrustSignal, "star_rated", r"(?i)\b(?:5|five)[- ]star\s+(?:rated|reviews?|rating)\b"),

        // === Attributed quotes ===
        Pattern::new(Testimonial, "quoted_attribution",
            r#"["“][^"”\n]{10,200}["”]\s*(?:-|–|—|&mdash;|&ndash;)\s*[A-Z][a-zA-Z'.]+(?:\s+[A-Z][a-zA-Z'.]+){0,3}"#),

        // === Numeric claims ===
        Pattern::new(NumericClaim, "grouped_count",
            &format!(r"(?i)\b\d{{1,3}}(?:,\d{{3}})+\+?\s*{ADJECTIVE}(?:{AUDIENCE})\b")),
        Pattern::new(NumericClaim, "plain_count",
            &format!(r"(?i)\b\d{{4,}}\s+(?:{AUDIENCE})\b")),
        Pattern::new(NumericClaim, "scaled_count",
            &format!(r"(?i)\b\d+(?:\.\d+)?(?:\s?[kmb]|\s+(?:thousand|million|billion))\+?\s+(?:{AUDIENCE})\b")),
        Pattern::new(NumericClaim, "plus_count",
            &format!(r"(?i)\b\d{{3,}}\+\s*{ADJECTIVE}(?:{AUDIENCE})\b")),
        Pattern::new(NumericClaim, "countries", r"(?i)\b\d+\+?\s+countries\b"),
        Pattern::new(NumericClaim, "percentage",
            r"(?i)\b\d{1,3}(?:\.\d+)?\s?%\s+(?:customer\s+)?(?:satisfaction|faster|increase|growth|more|success\s+rate|accuracy|uptime|retention|of\s+(?:customers|users|clients))\b"),
    ];

    /// Unresolved template content
    pub static ref PLACEHOLDER_PATTERNS: Vec<Pattern> = vec![
        Pattern::new(Placeholder, "lorem_ipsum", r"(?i)\blorem\s+ipsum\b"),
        Pattern::new(Placeholder, "dolor_sit_amet", r"(?i)\bdolor\s+sit\s+amet\b"),
        Pattern::new(Placeholder, "bracket_token",
            r"(?i)\[\s*(?:TODO|TBD|INSERT|PLACEHOLDER|YOUR)\b[^\]\n]{0,80}\]"),
        Pattern::new(Placeholder, "template_token", r"\{\{\s*[A-Za-z_][\w.\-]*\s*\}\}"),
        Pattern::new(Placeholder, "acme",
            r"(?i)\bAcme\b(?:\s+(?:Corporation|Corp|Inc|Co|Company|Industries)\b\.?)?"),
        Pattern::new(Placeholder, "generic_name",
            r"\b(?:Company Name|Your Company|Example Corp|Business Name|Your Brand)\b"),
        Pattern::new(Placeholder, "your_token",
            r"(?i)\byour[-_](?:company|brand|business|logo|domain|name)\b"),
        Pattern::new(Placeholder, "your_domain",
            r"(?i)\b(?:yourcompany|yourdomain|yourbrand|yoursite)\b(?:\.(?:com|io|net))?"),
    ];
}
