//! Purchase request lifecycle and the wire names shared by the storefront and
//! the moderation console.

#![allow(clippy::unwrap_used)]

use winner_admin::models::PurchaseRequest;
use winner_core::{DurationCategory, ModerationDecision, PrivilegeTier, PurchaseStatus};
use winner_storefront::{PurchaseSubmission, catalog};

// =============================================================================
// Status Transitions
// =============================================================================

/// Pending -> Approved
/// Pending -> Rejected
#[test]
fn test_valid_transitions() {
    let valid = [
        (ModerationDecision::Approve, PurchaseStatus::Approved),
        (ModerationDecision::Reject, PurchaseStatus::Rejected),
    ];

    for (decision, expected) in valid {
        assert_eq!(PurchaseStatus::Pending.apply(decision).unwrap(), expected);
    }
}

/// A processed request never changes again.
#[test]
fn test_terminal_states_refuse_decisions() {
    let terminal = [PurchaseStatus::Approved, PurchaseStatus::Rejected];
    let decisions = [ModerationDecision::Approve, ModerationDecision::Reject];

    for status in terminal {
        assert!(status.is_terminal());
        for decision in decisions {
            let err = status.apply(decision).unwrap_err();
            assert_eq!(err.from, status);
        }
    }
    assert!(!PurchaseStatus::Pending.is_terminal());
}

// =============================================================================
// Shared Wire Names
// =============================================================================

/// Every combination the storefront sells is listed correctly by the console.
#[test]
fn test_catalog_offers_read_back_in_console() {
    for entry in catalog() {
        for offer in &entry.offers {
            let submission = serde_json::to_value(PurchaseSubmission {
                privilege_type: entry.tier,
                duration_type: offer.duration,
                payment_proof: "ref".to_string(),
            })
            .unwrap();

            let listed: PurchaseRequest = serde_json::from_value(serde_json::json!({
                "id": 1,
                "privilege_type": submission.get("privilege_type"),
                "duration_type": submission.get("duration_type"),
                "price": offer.price.amount.to_string(),
                "payment_proof": submission.get("payment_proof"),
                "status": "pending",
                "created_at": "2025-03-01T14:05:09",
                "user": { "steam_id": "1", "steam_name": "p" }
            }))
            .unwrap();

            assert_eq!(listed.tier(), Some(entry.tier));
            assert_eq!(listed.duration(), Some(offer.duration));
            assert_eq!(listed.price(), offer.price);
        }
    }
}

#[test]
fn test_unsold_combinations() {
    let unsold = [
        (PrivilegeTier::Low, DurationCategory::OneMonth),
        (PrivilegeTier::Nice, DurationCategory::TwoWeeks),
        (PrivilegeTier::Escape, DurationCategory::TwoWeeks),
    ];

    for (tier, duration) in unsold {
        assert!(tier.price(duration).is_none(), "{tier} {duration}");
        assert!(winner_storefront::quote(tier, duration).is_err());
    }
}
