//! The static 30-day sprint catalogue.
//!
//! The catalogue is the fixed, versioned set of phases, sections, and
//! checklist items that every client sprint is tracked against. It is pure
//! data: built once at startup and injected into the engine, never mutated.
//!
//! Item ids are unique across the whole catalogue, not just within their
//! section. The reconciliation engine depends on this: sprint task identity
//! is the bare item id with no section or phase qualifier.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// One checklist item within a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistItem {
    /// Globally unique item id (e.g. "gbp", "pixel-install").
    pub id: &'static str,
    pub text: &'static str,
    /// Critical items are surfaced separately while incomplete.
    pub critical: bool,
}

/// An ordered group of checklist items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub id: &'static str,
    pub title: &'static str,
    pub items: Vec<ChecklistItem>,
}

/// An ordered group of sections, referenced by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phase {
    pub id: &'static str,
    pub name: &'static str,
    pub subtitle: &'static str,
    pub sections: Vec<&'static str>,
}

/// The full catalogue: phases in display order plus a section lookup.
#[derive(Debug, Clone)]
pub struct Catalogue {
    phases: Vec<Phase>,
    sections: Vec<Section>,
    section_index: HashMap<&'static str, usize>,
    item_index: HashMap<&'static str, (usize, usize)>,
}

impl Catalogue {
    /// Build a catalogue from phases and sections.
    ///
    /// # Panics
    ///
    /// Panics if a phase references an unknown section or an item id is
    /// duplicated across the catalogue. Both would be authoring bugs in the
    /// static data, caught at startup.
    #[must_use]
    pub fn new(phases: Vec<Phase>, sections: Vec<Section>) -> Self {
        let mut section_index = HashMap::new();
        let mut item_index = HashMap::new();

        for (si, section) in sections.iter().enumerate() {
            assert!(
                section_index.insert(section.id, si).is_none(),
                "duplicate section id {}",
                section.id
            );
            for (ii, item) in section.items.iter().enumerate() {
                assert!(
                    item_index.insert(item.id, (si, ii)).is_none(),
                    "duplicate item id {}",
                    item.id
                );
            }
        }
        for phase in &phases {
            for section_id in &phase.sections {
                assert!(
                    section_index.contains_key(section_id),
                    "phase {} references unknown section {}",
                    phase.id,
                    section_id
                );
            }
        }

        Self {
            phases,
            sections,
            section_index,
            item_index,
        }
    }

    /// Phases in display order.
    #[must_use]
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Look up a phase by id.
    #[must_use]
    pub fn phase(&self, id: &str) -> Option<&Phase> {
        self.phases.iter().find(|p| p.id == id)
    }

    /// Look up a section by id.
    #[must_use]
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.section_index.get(id).map(|&si| &self.sections[si])
    }

    /// Look up an item and its owning section by item id.
    #[must_use]
    pub fn item(&self, id: &str) -> Option<(&Section, &ChecklistItem)> {
        self.item_index.get(id).map(|&(si, ii)| {
            let section = &self.sections[si];
            (section, &section.items[ii])
        })
    }

    /// Does the catalogue contain this item id?
    #[must_use]
    pub fn contains_item(&self, id: &str) -> bool {
        self.item_index.contains_key(id)
    }

    /// Total number of checklist items.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.item_index.len()
    }

    /// Iterate (phase, section) pairs in catalogue traversal order:
    /// phase order, then section order within each phase.
    pub fn traverse(&self) -> impl Iterator<Item = (&Phase, &Section)> {
        self.phases.iter().flat_map(move |phase| {
            phase.sections.iter().filter_map(move |sid| {
                self.section(sid).map(|section| (phase, section))
            })
        })
    }
}

fn item(id: &'static str, text: &'static str) -> ChecklistItem {
    ChecklistItem {
        id,
        text,
        critical: false,
    }
}

fn critical(id: &'static str, text: &'static str) -> ChecklistItem {
    ChecklistItem {
        id,
        text,
        critical: true,
    }
}

fn section(id: &'static str, title: &'static str, items: Vec<ChecklistItem>) -> Section {
    Section { id, title, items }
}

static THIRTY_DAY_SPRINT: Lazy<Catalogue> = Lazy::new(build_thirty_day_sprint);

/// The shared 30-day sprint catalogue.
#[must_use]
pub fn thirty_day_sprint() -> &'static Catalogue {
    &THIRTY_DAY_SPRINT
}

#[allow(clippy::too_many_lines)]
fn build_thirty_day_sprint() -> Catalogue {
    let sections = vec![
        section(
            "preSprintAccess",
            "Access & Credentials",
            vec![
                critical("gbp", "Google Business Profile (Owner access)"),
                critical("ga4", "Google Analytics 4 (Admin access)"),
                item("gads", "Google Ads (Admin access, if existing)"),
                item("meta", "Meta Business Manager (Admin access)"),
                critical("website", "Website backend access"),
                item("domain", "Domain registrar access"),
                item("crm", "CRM access (if applicable)"),
                item("hosting", "Hosting panel access"),
            ],
        ),
        section(
            "preSprintVendasta",
            "Vendasta Setup",
            vec![
                critical("vendasta-account", "Create client account in Vendasta"),
                critical(
                    "vendasta-listings",
                    "Activate Business Listings (Listings Sync Pro)",
                ),
                item("vendasta-reputation", "Activate Reputation Management"),
                item("vendasta-seo", "Activate Local SEO (if applicable)"),
                item("vendasta-social", "Activate Social Marketing dashboard"),
                item("vendasta-notifications", "Configure email notifications"),
                item("vendasta-invite", "Send client portal invitation"),
            ],
        ),
        section(
            "preSprintOviond",
            "Oviond Reporting",
            vec![
                critical("oviond-workspace", "Create new client workspace"),
                item("oviond-ga4", "Connect Google Analytics 4"),
                item("oviond-gsc", "Connect Google Search Console"),
                item("oviond-gads", "Connect Google Ads (if applicable)"),
                item("oviond-meta", "Connect Meta Ads (if applicable)"),
                item("oviond-gbp", "Connect Google Business Profile"),
                item("oviond-widgets", "Configure dashboard widgets"),
                item("oviond-reports", "Set up automated weekly reports"),
            ],
        ),
        section(
            "preSprintAssets",
            "Asset Collection",
            vec![
                item("logo", "Logo files (vector preferred)"),
                item("colors", "Brand colors (hex codes)"),
                item("fonts", "Brand fonts (if specified)"),
                item("photos", "Current photography library"),
                item("testimonials", "Existing testimonials and reviews"),
                item("service-area", "Service area documentation"),
                item("pricing", "Current pricing structure"),
            ],
        ),
        section(
            "week1Technical",
            "Day 1-2: Technical Infrastructure",
            vec![
                critical("pixel-install", "Install EngageEngine Identity Pixel"),
                item("pixel-verify", "Verify pixel firing in diagnostics"),
                item("pixel-test", "Test across desktop, mobile, tablet"),
                critical("clarity-create", "Create Clarity project"),
                item("clarity-install", "Install Clarity tracking code"),
                item("clarity-recordings", "Enable session recordings"),
                item("clarity-heatmaps", "Enable heatmaps"),
                item("clarity-verify", "Verify data collection"),
                item("ga4-verify", "Verify GA4 property exists"),
                item("ga4-enhanced", "Enable Enhanced Measurement"),
                item(
                    "ga4-conversions",
                    "Configure conversion events (phone, form, email)",
                ),
                item("ga4-audiences", "Set up audience definitions"),
                item("ga4-link-gads", "Link to Google Ads"),
                item("ga4-link-gsc", "Link to Search Console"),
                item("gtm-access", "Access/create GTM container"),
                item("gtm-verify", "Verify container on all pages"),
                item("gtm-phone", "Configure phone click tracking"),
                item("gtm-form", "Configure form submission tracking"),
                item("gtm-test", "Test all tags in Preview mode"),
                item("gtm-publish", "Publish container"),
            ],
        ),
        section(
            "week1Speed",
            "Day 3-4: Speed & Technical Audit",
            vec![
                critical("speed-psi", "Run PageSpeed Insights (mobile + desktop)"),
                item("speed-gtmetrix", "Run GTmetrix full report"),
                item("speed-document", "Document current LCP, FID, CLS scores"),
                item("speed-compress", "Compress all images (80% reduction)"),
                item("speed-cache", "Enable browser caching"),
                item("speed-gzip", "Enable GZIP compression"),
                item("speed-minify", "Minify CSS and JavaScript"),
                item("speed-plugins", "Remove unused plugins/scripts"),
                item("speed-fonts", "Optimize web fonts"),
                item("speed-lazy", "Implement lazy loading"),
                item("speed-retest", "Re-test and document improvements"),
            ],
        ),
        section(
            "week1Listings",
            "Day 5-6: Listings & Presence",
            vec![
                critical("gbp-verify", "Verify GBP ownership"),
                item("gbp-audit", "Audit profile completeness"),
                item("gbp-nap", "Verify NAP accuracy"),
                item("gbp-categories", "Add/update service categories"),
                item("gbp-description", "Write optimized description"),
                item("gbp-photos", "Upload 15+ quality photos"),
                item("gbp-messaging", "Enable messaging"),
                item("gbp-services", "Add products/services"),
                item("gbp-reviews", "Respond to unanswered reviews"),
                critical("listings-scan", "Run Vendasta listings scan"),
                item("listings-document", "Document accuracy score"),
                item("listings-errors", "Identify incorrect listings"),
                item("listings-correct", "Submit corrections"),
                item("listings-suppress", "Suppress duplicates"),
                item("listings-add", "Add to missing directories"),
            ],
        ),
        section(
            "week1Diagnosis",
            "Day 7: Failure Mode Diagnosis",
            vec![
                critical("diag-traffic", "Review current traffic levels"),
                item("diag-sources", "Review traffic sources breakdown"),
                item("diag-bounce", "Review bounce rate and time on site"),
                item("diag-clarity", "Review Clarity recordings (min 10)"),
                item("diag-heatmaps", "Review homepage heatmaps"),
                item("diag-maps", "Review Maps visibility (5 key terms)"),
                item("diag-reviews", "Review review profile"),
                item("diag-competitors", "Audit top 3 competitors"),
                item("diag-conversion", "Document conversion rate estimate"),
                critical("diag-declare", "Declare dominant failure mode"),
            ],
        ),
        section(
            "week2Headlines",
            "Day 8-10: Homepage Hero Rewrite",
            vec![
                item("hero-review", "Review Clarity heatmaps for above-fold"),
                item("hero-pain", "Identify primary pain point"),
                critical("hero-draft", "Draft 3-5 headline options"),
                item("hero-select", "Select top 2 for A/B testing"),
                item("hero-subhead", "Write benefit-focused subhead"),
                item("vp-document", "Document current value props"),
                critical("vp-reframe", "Reframe features as benefits"),
                item("vp-update", "Update homepage copy"),
            ],
        ),
        section(
            "week2Offer",
            "Day 11-12: Offer Creation",
            vec![
                item("offer-audit", "Review competitor offers"),
                critical("offer-select", "Select offer type"),
                item("offer-scarcity", "Add scarcity element"),
                item("offer-homepage", "Create homepage copy"),
                item("offer-landing", "Create landing page copy"),
                item("offer-ads", "Create ad creative copy"),
                item("offer-document", "Document offer in client file"),
            ],
        ),
        section(
            "week2Landing",
            "Day 13-14: Landing Pages",
            vec![
                critical("lp-build", "Build primary conversion page"),
                item("lp-headline", "Structure above-fold headline"),
                item("lp-benefits", "Add 3 key benefits"),
                item("lp-form", "Add simple form"),
                item("lp-trust", "Add trust element"),
                item("lp-process", "Add process explanation"),
                item("lp-faq", "Add FAQ section"),
                item("lp-testimonials", "Add testimonials"),
                item("lp-conversion", "Configure GA4 conversion event"),
                item("lp-notification", "Configure instant form notification"),
                item("lp-emergency", "Build emergency landing page (if applicable)"),
            ],
        ),
        section(
            "week3Reviews",
            "Day 15-17: Review Acceleration",
            vec![
                critical("review-document", "Document current review profile"),
                item(
                    "review-vendasta-email",
                    "Set up review request email template",
                ),
                item("review-vendasta-sms", "Set up review request SMS template"),
                item("review-link", "Configure direct Google review link"),
                item("review-alerts", "Enable review monitoring alerts"),
                item("review-train", "Train client on review request process"),
                item("review-script", "Create review request script for staff"),
                item("review-response", "Set up review response protocol"),
                item(
                    "testimonial-identify",
                    "Identify past customers for outreach",
                ),
                item("testimonial-send", "Send testimonial requests (20+)"),
                item("testimonial-incentive", "Offer video testimonial incentive"),
            ],
        ),
        section(
            "week3Proof",
            "Day 18-19: Proof Stacking",
            vec![
                item("proof-badge", "Add review count badge to hero"),
                item("proof-stars", "Add star rating display"),
                item("proof-years", "Add years in business"),
                item("proof-jobs", "Add total jobs served (if impressive)"),
                item("proof-area", "Add service area coverage"),
                item("proof-certs", "Add certification badges"),
                item("proof-testimonials", "Create rotating testimonial section"),
                item("proof-service", "Add testimonials to service pages"),
                item("proof-conversion", "Add testimonials to conversion pages"),
            ],
        ),
        section(
            "week3Guarantee",
            "Day 20-21: Guarantee Creation",
            vec![
                item(
                    "guarantee-advantage",
                    "Identify competitive advantage for guarantee",
                ),
                critical("guarantee-primary", "Draft primary guarantee"),
                item("guarantee-secondary", "Draft secondary service guarantee"),
                item("guarantee-approval", "Get client approval"),
                item("guarantee-homepage", "Add to homepage"),
                item("guarantee-conversion", "Add to conversion pages"),
                item("guarantee-footer", "Add to footer"),
            ],
        ),
        section(
            "week4CTA",
            "Day 22-24: CTA Optimization",
            vec![
                item("cta-recordings", "Review new Clarity recordings (10+)"),
                item("cta-friction", "Identify friction points"),
                item("cta-phone-visible", "Verify phone visible on all pages"),
                item("cta-click-to-call", "Verify click-to-call on mobile"),
                item("cta-sticky", "Implement sticky header with phone"),
                item("cta-floating", "Add floating Call Now button"),
                item("cta-forms", "Verify forms work on mobile"),
                item("cta-test", "Test conversion path on 3 devices"),
                item("cta-exit", "Configure exit-intent popup"),
            ],
        ),
        section(
            "week4Retargeting",
            "Day 25-27: Retargeting Setup",
            vec![
                critical("meta-access", "Access Meta Business Manager"),
                item("meta-pixel", "Create/verify Meta Pixel"),
                item("meta-install", "Install pixel on all pages"),
                item("meta-events", "Configure standard events"),
                item("meta-test", "Test pixel in Events Manager"),
                item("audience-visitors", "Create Website Visitors audience"),
                item("audience-service", "Create Service Page Visitors audience"),
                item("audience-exclude", "Create Converters exclusion audience"),
                item("gads-access", "Access/create Google Ads account"),
                item("gads-link", "Link to GA4"),
                item("gads-import", "Import conversion events"),
                item("gads-remarketing", "Create remarketing audience"),
                critical("gads-campaigns", "Build campaign structure"),
                item("gads-geo", "Set geographic targeting"),
                item("gads-schedule", "Set ad scheduling"),
                item("gads-copy", "Create ad copy variations (3+ per campaign)"),
            ],
        ),
        section(
            "week4Launch",
            "Day 28-29: Campaign Launch",
            vec![
                critical("launch-tracking", "Verify all conversion tracking"),
                item("launch-speed", "Verify landing pages < 3 seconds"),
                item("launch-notifications", "Verify form notifications instant"),
                item("launch-phone", "Verify phone tracking"),
                item("launch-oviond", "Verify Oviond pulling data"),
                item("launch-meta", "Launch Meta retargeting ($10-20/day)"),
                item("launch-gads", "Launch Google Ads campaigns"),
                item("launch-monitor", "Monitor first 24 hours"),
                item("launch-approvals", "Verify ad approvals"),
                item("launch-policy", "Check for policy violations"),
            ],
        ),
        section(
            "week4Handoff",
            "Day 30: Sprint Close & Handoff",
            vec![
                item("handoff-credentials", "Compile all credentials securely"),
                item("handoff-changes", "Document all changes made"),
                item("handoff-diagnosis", "Document failure mode diagnosis"),
                item("handoff-roadmap", "Create ongoing optimization roadmap"),
                item("handoff-oviond", "Verify Oviond reports configured"),
                item("handoff-first-report", "Send first weekly report"),
                item("handoff-cadence", "Schedule ongoing reporting"),
                critical("handoff-call", "Schedule Sprint Complete call"),
                item("handoff-walkthrough", "Walk through all changes"),
                item("handoff-performance", "Review performance vs baseline"),
                item("handoff-present", "Present 60-90 day roadmap"),
                item("handoff-confirm", "Confirm ongoing retainer scope"),
                item("handoff-feedback", "Collect sprint feedback"),
            ],
        ),
    ];

    let phases = vec![
        Phase {
            id: "preSprint",
            name: "Pre-Sprint",
            subtitle: "Days -7 to 0",
            sections: vec![
                "preSprintAccess",
                "preSprintVendasta",
                "preSprintOviond",
                "preSprintAssets",
            ],
        },
        Phase {
            id: "week1",
            name: "Week 1",
            subtitle: "Foundation & Diagnosis",
            sections: vec![
                "week1Technical",
                "week1Speed",
                "week1Listings",
                "week1Diagnosis",
            ],
        },
        Phase {
            id: "week2",
            name: "Week 2",
            subtitle: "Messaging & Positioning",
            sections: vec!["week2Headlines", "week2Offer", "week2Landing"],
        },
        Phase {
            id: "week3",
            name: "Week 3",
            subtitle: "Social Proof & Trust",
            sections: vec!["week3Reviews", "week3Proof", "week3Guarantee"],
        },
        Phase {
            id: "week4",
            name: "Week 4",
            subtitle: "Conversion & Launch",
            sections: vec!["week4CTA", "week4Retargeting", "week4Launch", "week4Handoff"],
        },
    ];

    Catalogue::new(phases, sections)
}
