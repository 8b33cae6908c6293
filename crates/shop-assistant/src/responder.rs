//! Keyword responder.
//!
//! Maps free text to a fixed set of product picks and canned replies.
//! Matching is plain lower-cased substring search; there is no ranking.

use rand::seq::SliceRandom;
use rand::Rng;
use shop_commerce::ProductId;

use crate::message::Message;

/// A set of keywords that recommends one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordGroup {
    pub name: &'static str,
    /// Lower-case keywords; any one of them triggers the group.
    pub keywords: &'static [&'static str],
    pub product: &'static str,
}

impl KeywordGroup {
    /// Whether any keyword occurs in already lower-cased text.
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k))
    }
}

/// Keyword groups in match order.
pub const KEYWORD_GROUPS: [KeywordGroup; 7] = [
    KeywordGroup {
        name: "earbuds",
        keywords: &["earbuds", "headphones", "audio", "music", "sound"],
        product: "p1",
    },
    KeywordGroup {
        name: "airfryer",
        keywords: &["air fryer", "fryer", "cooking", "kitchen"],
        product: "p2",
    },
    KeywordGroup {
        name: "charger",
        keywords: &["charger", "charging", "usb", "power"],
        product: "p5",
    },
    KeywordGroup {
        name: "vacuum",
        keywords: &["vacuum", "clean", "cleaner"],
        product: "p3",
    },
    KeywordGroup {
        name: "sneakers",
        keywords: &["shoes", "sneakers", "footwear"],
        product: "p4",
    },
    KeywordGroup {
        name: "bottle",
        keywords: &["bottle", "water", "drink"],
        product: "p6",
    },
    KeywordGroup {
        name: "keyboard",
        keywords: &["keyboard", "mouse", "typing", "desk"],
        product: "p7",
    },
];

/// Replies used when nothing matches; one is picked at random.
pub const FALLBACK_REPLIES: [&str; 3] = [
    "I'd be happy to help you find the perfect product! Could you tell me more about what you're looking for?",
    "Let me search for that. What's your budget range and any specific features you need?",
    "I can help with that! Are you looking for something specific in terms of brand or features?",
];

/// Lead-in text sent before a product grid.
pub fn found_products_text(count: usize) -> String {
    format!(
        "I found {} product{} that match your search. Here are my top recommendations:",
        count,
        if count == 1 { "" } else { "s" }
    )
}

/// Rule-based responder over keyword groups.
#[derive(Debug, Clone)]
pub struct Responder {
    groups: Vec<KeywordGroup>,
}

impl Default for Responder {
    fn default() -> Self {
        Self::new()
    }
}

impl Responder {
    /// Responder over the built-in groups.
    pub fn new() -> Self {
        Self::with_groups(KEYWORD_GROUPS.to_vec())
    }

    pub fn with_groups(groups: Vec<KeywordGroup>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[KeywordGroup] {
        &self.groups
    }

    /// Product ids of every matching group, in group order.
    pub fn match_products(&self, input: &str) -> Vec<ProductId> {
        let lowered = input.to_lowercase();
        self.groups
            .iter()
            .filter(|group| group.matches(&lowered))
            .map(|group| ProductId::new(group.product))
            .collect()
    }

    /// Build the reply messages for `input`.
    ///
    /// Matches produce a lead-in text followed by a product grid; no match
    /// produces one fallback reply drawn from `rng`.
    pub fn respond<R: Rng + ?Sized>(&self, input: &str, rng: &mut R) -> Vec<Message> {
        let matched = self.match_products(input);
        tracing::debug!(matched = matched.len(), "responder matched products");

        if matched.is_empty() {
            let reply = FALLBACK_REPLIES
                .choose(rng)
                .copied()
                .unwrap_or(FALLBACK_REPLIES[0]);
            return vec![Message::assistant(reply)];
        }

        vec![
            Message::assistant(found_products_text(matched.len())),
            Message::product_grid(matched),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{MessageKind, Role};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn ids(list: &[&str]) -> Vec<ProductId> {
        list.iter().map(|id| ProductId::new(*id)).collect()
    }

    #[test]
    fn test_wireless_earbuds_example() {
        let replies = Responder::new().respond("I need wireless earbuds", &mut rng());
        assert_eq!(replies.len(), 2);
        assert_eq!(
            replies[0].text.as_deref(),
            Some("I found 1 product that match your search. Here are my top recommendations:")
        );
        assert_eq!(replies[1].kind, Some(MessageKind::ProductGrid));
        assert_eq!(replies[1].recommended_ids(), ids(&["p1"]).as_slice());
        assert!(replies.iter().all(|m| m.role == Role::Assistant));
    }

    #[test]
    fn test_earbuds_any_case_matched_once() {
        let responder = Responder::new();
        for input in ["EARBUDS", "EarBuds and more earbuds", "earbuds headphones sound"] {
            let matched = responder.match_products(input);
            let count = matched.iter().filter(|id| id.as_str() == "p1").count();
            assert_eq!(count, 1, "input {:?}", input);
        }
    }

    #[test]
    fn test_multiple_groups_follow_declaration_order() {
        // Mentions keyboard, then charger, then earbuds; output is group order
        let matched = Responder::new().match_products("desk setup with a USB hub and music");
        assert_eq!(matched, ids(&["p1", "p5", "p7"]));

        let replies = Responder::new().respond("desk setup with a USB hub and music", &mut rng());
        assert!(replies[0].text.as_deref().unwrap().starts_with("I found 3 products"));
        assert_eq!(replies[1].recommended_ids().len(), 3);
    }

    #[test]
    fn test_multiword_keyword() {
        assert_eq!(Responder::new().match_products("best Air Fryer"), ids(&["p2"]));
    }

    #[test]
    fn test_no_match_yields_single_fallback() {
        let responder = Responder::new();
        let mut rng = rng();
        for _ in 0..20 {
            let replies = responder.respond("hello there", &mut rng);
            assert_eq!(replies.len(), 1);
            let text = replies[0].text.as_deref().unwrap();
            assert!(FALLBACK_REPLIES.contains(&text));
            assert!(!replies[0].is_recommendation());
        }
    }

    #[test]
    fn test_matching_is_deterministic() {
        let responder = Responder::new();
        let first = responder.match_products("water bottle and sneakers");
        let second = responder.match_products("water bottle and sneakers");
        assert_eq!(first, second);
        assert_eq!(first, ids(&["p4", "p6"]));
    }
}
