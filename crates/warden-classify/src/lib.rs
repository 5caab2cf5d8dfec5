//! Keyword-based promotional-text screening.
//!
//! Deliberately coarse: a case-insensitive substring scan over a fixed
//! keyword list. A keyword may match inside a larger word ("sale" in
//! "wholesale") — that false-positive source is accepted, this is a
//! best-effort filter, not an exhaustive one.

/// Fixed promotional keyword set. All entries lower-case; matching is
/// substring, not word-boundary.
const PROMO_KEYWORDS: &[&str] = &[
    "free offer",
    "limited time",
    "discount",
    "deal",
    "sale",
    "offer",
    "buy now",
    "special price",
    "hurry up",
    "clearance",
    "lowest price",
    "guarantee",
    "best deal",
    "earn money",
    "quick cash",
    "loan",
    "payday",
    "0% interest",
    "investment opportunity",
    "passive income",
    "credit card",
    "money back",
    "referral bonus",
    "invite & earn",
    "share and win",
    "exclusive access",
    "get started today",
    "promo code",
    "coupon",
    "voucher",
    "join now",
    "limited seats",
    "act fast",
    "don’t miss out",
    "only today",
    "expires soon",
    "last chance",
    "register now",
    "limited stock",
    "click here",
    "link in bio",
    "whatsapp me",
    "dm now",
    "guaranteed results",
    "no risk",
    "100% working",
    "secret trick",
];

/// Return `true` when `text` contains at least one promotional keyword.
///
/// Empty or whitespace-only input is never promotional. Pure and total —
/// no I/O, no failure path.
pub fn is_promotional(text: &str) -> bool {
    if text.trim().is_empty() {
        return false;
    }
    let lower = text.to_lowercase();
    PROMO_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_not_promotional() {
        assert!(!is_promotional(""));
        assert!(!is_promotional("   \n\t"));
    }

    #[test]
    fn plain_text_is_not_promotional() {
        assert!(!is_promotional("hello world"));
        assert!(!is_promotional("see you at the meeting tomorrow"));
    }

    #[test]
    fn every_keyword_matches_case_insensitively() {
        for kw in PROMO_KEYWORDS {
            let message = format!("... {} ...", kw.to_uppercase());
            assert!(is_promotional(&message), "keyword not detected: {kw}");
        }
    }

    #[test]
    fn keyword_inside_larger_word_still_matches() {
        // Substring semantics: "sale" matches inside "wholesale".
        assert!(is_promotional("our wholesale prices"));
    }

    #[test]
    fn keyword_in_the_middle_of_a_sentence() {
        assert!(is_promotional("Act FAST, this is a LIMITED TIME thing"));
    }
}
