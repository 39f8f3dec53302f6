//! Unit tests for the Identifiers module

use core_kernel::{ClaimId, UserId, ActivityId, SignupRequestId, FlowId};
use uuid::Uuid;

mod claim_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        assert_ne!(ClaimId::new(), ClaimId::new());
    }

    #[test]
    fn test_new_v7_generates_time_ordered_ids() {
        let id1 = ClaimId::new_v7();
        std::thread::sleep(std::time::Duration::from_millis(1));
        let id2 = ClaimId::new_v7();
        assert!(id1 < id2);
    }

    #[test]
    fn test_parse_with_and_without_prefix() {
        let uuid = Uuid::new_v4();
        let with_prefix: ClaimId = format!("CLM-{}", uuid).parse().unwrap();
        let bare: ClaimId = uuid.to_string().parse().unwrap();
        assert_eq!(with_prefix, bare);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("CLM-not-a-uuid".parse::<ClaimId>().is_err());
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = ClaimId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_uuid()));
    }
}

#[test]
fn test_prefixes() {
    assert_eq!(ClaimId::prefix(), "CLM");
    assert_eq!(UserId::prefix(), "USR");
    assert_eq!(ActivityId::prefix(), "ACT");
    assert_eq!(SignupRequestId::prefix(), "SGN");
    assert_eq!(FlowId::prefix(), "FLW");
}

#[test]
fn test_distinct_id_types_share_uuid_without_mixing() {
    let uuid = Uuid::new_v4();
    let user = UserId::from_uuid(uuid);
    let flow = FlowId::from_uuid(uuid);
    assert_eq!(user.as_uuid(), flow.as_uuid());
    assert_ne!(user.to_string(), flow.to_string());
}
