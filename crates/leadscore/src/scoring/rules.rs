use super::domain::{LeadProfile, Offer};

/// Ceiling of the rule layer; the classifier layer supplies the other half.
pub const RULE_SCORE_MAX: u8 = 50;

/// Titles with budget authority.
const DECISION_MAKER_KEYWORDS: [&str; 9] = [
    "ceo",
    "cto",
    "cfo",
    "vp",
    "head",
    "director",
    "founder",
    "owner",
    "president",
];

/// Titles that advocate internally but need sign-off.
const INFLUENCER_KEYWORDS: [&str; 5] = ["manager", "lead", "architect", "senior", "principal"];

/// Score a lead against the offer on objective criteria alone.
///
/// Three checks run in fixed order (role, industry, completeness), and the
/// returned reasons keep that order. Each check matches on lowercased
/// substring containment, so "Head of Growth" counts as a decision maker and
/// "Team Leadership" counts as an influencer. The loose matching is a known
/// trade-off kept for recall over precision.
pub fn score_lead(profile: &LeadProfile, offer: &Offer) -> (u8, Vec<String>) {
    let mut score = 0u8;
    let mut reasons = Vec::new();

    let role = profile.role.to_lowercase();
    if DECISION_MAKER_KEYWORDS.iter().any(|kw| role.contains(kw)) {
        score += 20;
        reasons.push("Decision maker role (+20)".to_string());
    } else if INFLUENCER_KEYWORDS.iter().any(|kw| role.contains(kw)) {
        score += 10;
        reasons.push("Influencer role (+10)".to_string());
    }

    let industry = profile.industry.trim().to_lowercase();
    let use_cases: Vec<String> = offer
        .ideal_use_cases
        .iter()
        .map(|use_case| use_case.trim().to_lowercase())
        .filter(|use_case| !use_case.is_empty())
        .collect();
    if !industry.is_empty() {
        if use_cases.iter().any(|use_case| *use_case == industry) {
            score += 20;
            reasons.push("Exact ICP match (+20)".to_string());
        } else if use_cases
            .iter()
            .any(|use_case| industry.contains(use_case.as_str()) || use_case.contains(&industry))
        {
            score += 10;
            reasons.push("Adjacent industry (+10)".to_string());
        }
    }

    if profile.is_complete() {
        score += 10;
        reasons.push("Complete profile (+10)".to_string());
    }

    (score, reasons)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer() -> Offer {
        Offer {
            name: "Outreach Copilot".to_string(),
            value_props: vec!["24/7 automated outreach".to_string()],
            ideal_use_cases: vec!["B2B SaaS".to_string(), "Mid-market recruiters".to_string()],
        }
    }

    fn complete_profile(role: &str, industry: &str) -> LeadProfile {
        LeadProfile {
            name: "Ava Ramirez".to_string(),
            role: role.to_string(),
            company: "FlowMetrics".to_string(),
            industry: industry.to_string(),
            location: "Austin, TX".to_string(),
            linkedin_bio: "Building GTM teams for a decade".to_string(),
        }
    }

    #[test]
    fn ceo_with_exact_icp_and_full_profile_scores_fifty() {
        let (score, reasons) = score_lead(&complete_profile("CEO", "B2B SaaS"), &offer());

        assert_eq!(score, 50);
        assert_eq!(
            reasons,
            vec![
                "Decision maker role (+20)".to_string(),
                "Exact ICP match (+20)".to_string(),
                "Complete profile (+10)".to_string(),
            ]
        );
    }

    #[test]
    fn manager_with_exact_match_but_incomplete_profile_scores_thirty() {
        let mut profile = complete_profile("Growth Manager", "b2b saas");
        profile.linkedin_bio = String::new();

        let (score, reasons) = score_lead(&profile, &offer());

        assert_eq!(score, 30);
        assert_eq!(
            reasons,
            vec![
                "Influencer role (+10)".to_string(),
                "Exact ICP match (+20)".to_string(),
            ]
        );
    }

    #[test]
    fn unmatched_role_and_industry_still_earn_completeness() {
        let (score, reasons) = score_lead(&complete_profile("Accountant", "Agriculture"), &offer());

        assert_eq!(score, 10);
        assert_eq!(reasons, vec!["Complete profile (+10)".to_string()]);
    }

    #[test]
    fn adjacent_industry_with_decision_maker_reaches_thirty() {
        let mut profile = complete_profile("VP Sales", "SaaS");
        profile.linkedin_bio = String::new();

        let (score, reasons) = score_lead(&profile, &offer());

        assert!(score >= 30);
        assert!(reasons.contains(&"Adjacent industry (+10)".to_string()));
    }

    #[test]
    fn substring_role_matching_is_intentionally_loose() {
        let (score, reasons) = score_lead(&complete_profile("Thought Leadership Coach", "Retail"), &offer());

        // "leadership" contains "lead"
        assert_eq!(score, 20);
        assert_eq!(reasons[0], "Influencer role (+10)");
    }

    #[test]
    fn empty_industry_earns_no_industry_points() {
        let mut profile = complete_profile("CEO", "  ");
        profile.linkedin_bio = "bio".to_string();

        let (score, reasons) = score_lead(&profile, &offer());

        assert_eq!(score, 20);
        assert_eq!(reasons, vec!["Decision maker role (+20)".to_string()]);
    }
}
