/*
    model_scenarios.rs - End-to-end behaviour of the model facade

    Each test drives a fresh Model through the public API only: users and
    conversations are added, permissions toggled, messages posted and
    status reports read back.
*/

use huddle_core::core_space::{ErrorKind, Model};
use huddle_core::core_store::model::{
    BotUser, ConversationHeader, EntityId, Permission, Timestamp, User,
};
use huddle_core::test_utils::*;
use proptest::prelude::*;

struct World {
    model: Model,
    ids: TestIds,
    alice: EntityId,
    bob: EntityId,
    carol: EntityId,
    general: EntityId,
}

impl World {
    fn new() -> Self {
        let mut model = Model::default();
        let mut ids = TestIds::new();

        let alice = model.add_user(test_user(&mut ids, "alice")).unwrap().id.clone();
        let bob = model.add_user(test_user(&mut ids, "bob")).unwrap().id.clone();
        let carol = model.add_user(test_user(&mut ids, "carol")).unwrap().id.clone();
        let general = model
            .add_conversation(test_conversation(&mut ids, &alice, "general"))
            .unwrap()
            .id
            .clone();

        World {
            model,
            ids,
            alice,
            bob,
            carol,
            general,
        }
    }

    fn post(&mut self, author: &EntityId, count: usize) {
        let general = self.general.clone();
        for _ in 0..count {
            let message = test_message(&mut self.ids, author);
            self.model.post_message(&general, message).unwrap();
        }
    }
}

#[test]
fn test_every_user_is_reachable_through_all_indices() {
    let mut model = Model::default();
    let mut ids = TestIds::new();
    let names = ["Zed", "amy", "Bo", "carl", "dina"];

    for name in names {
        model.add_user(test_user(&mut ids, name)).unwrap();
    }

    for (n, name) in names.iter().enumerate() {
        let id = EntityId::new(n as u32 + 1);
        let user = model.users().get(&id).unwrap();
        assert_eq!(&user.name, name);
        assert_eq!(model.users().by_time(user.creation).unwrap().id, id);
        assert_eq!(model.users().by_text(&name.to_uppercase()).unwrap().id, id);
    }

    let alphabetical: Vec<_> = model.users().by_text_order().map(|u| u.name.as_str()).collect();
    assert_eq!(alphabetical, vec!["amy", "Bo", "carl", "dina", "Zed"]);
}

#[test]
fn test_deserialized_entities_start_clean() {
    let mut model = Model::default();
    let user: User = serde_json::from_str(
        r#"{"id":{"id":1,"root":null},"name":"dave","creation":1,
            "follows":[{"id":2,"root":null}],
            "created_conversations":[{"id":99,"root":null}]}"#,
    )
    .unwrap();
    let dave = model.add_user(user).unwrap();
    assert!(dave.follows().is_empty());
    assert!(dave.created_conversations().is_empty());

    let header: ConversationHeader = serde_json::from_str(
        r#"{"id":{"id":10,"root":null},"owner":{"id":1,"root":null},"creation":3,
            "title":"general","permissions":[[{"id":2,"root":null},7]],"size":5}"#,
    )
    .unwrap();
    let stored = model.add_conversation(header).unwrap().clone();
    assert_eq!(stored.size(), 0);
    assert_permission(&model, &EntityId::new(2), &EntityId::new(10), 0b000);

    let json = serde_json::to_string(&stored).unwrap();
    let back: ConversationHeader = serde_json::from_str(&json).unwrap();
    assert_eq!(back, stored);
}

#[test]
fn test_owner_bit_gate() {
    let mut w = World::new();

    // bob holds nothing and may not flip carol's owner bit
    assert_error_kind(
        w.model.toggle_permission(&w.bob, &w.carol, Permission::OWNER, &w.general),
        ErrorKind::Unauthorized,
    );
    assert_permission(&w.model, &w.carol, &w.general, 0b000);

    let granted = w
        .model
        .toggle_permission(&w.alice, &w.carol, Permission::OWNER, &w.general)
        .unwrap();
    assert!(granted.is_owner());
    assert_permission(&w.model, &w.carol, &w.general, 0b100);
}

#[test]
fn test_member_admin_grant_then_admin_denied_owner() {
    let mut w = World::new();
    assert_permission(&w.model, &w.alice, &w.general, 0b100);

    let bob = w
        .model
        .toggle_permission(&w.alice, &w.bob, Permission::from_bits_truncate(0b011), &w.general)
        .unwrap();
    assert_eq!(bob.bits(), 0b011);

    // bob is admin but not owner
    assert_error_kind(
        w.model.toggle_permission(&w.bob, &w.bob, Permission::OWNER, &w.general),
        ErrorKind::Unauthorized,
    );
    assert_permission(&w.model, &w.bob, &w.general, 0b011);
}

#[test]
fn test_unread_messages_are_consumed() {
    let mut w = World::new();
    let alice = w.alice.clone();
    let (bob, general) = (w.bob.clone(), w.general.clone());

    w.post(&alice, 5);
    assert_eq!(w.model.conversations().get(&general).unwrap().size(), 5);
    w.model.follow_conversation(&bob, &general).unwrap();
    w.post(&alice, 3);
    assert_eq!(w.model.conversations().get(&general).unwrap().size(), 8);

    let report = w.model.status_update(&bob).unwrap();
    assert_unread(&report, &general, 3);
    assert_report_line(&report, "CONVERSATION general: You have 3 new messages!");

    let report = w.model.status_update(&bob).unwrap();
    assert_unread(&report, &general, 0);
}

#[test]
fn test_unfollowed_conversation_leaves_report() {
    let mut w = World::new();
    let (bob, general) = (w.bob.clone(), w.general.clone());

    w.model.follow_conversation(&bob, &general).unwrap();
    let alice = w.alice.clone();
    w.post(&alice, 2);
    assert!(w.model.unfollow_conversation(&bob, &general).unwrap());

    let report = w.model.status_update(&bob).unwrap();
    assert_report_omits(&report, "general");
}

#[test]
fn test_message_chain_order() {
    let mut w = World::new();
    let alice = w.alice.clone();
    let general = w.general.clone();

    let m1 = test_message(&mut w.ids, &alice);
    let m1_id = m1.id.clone();
    w.model.post_message(&general, m1).unwrap();
    let chain: Vec<_> = w.model.payload(&general).unwrap().message_ids().to_vec();
    assert_eq!(chain, vec![m1_id.clone()]);

    let m2 = test_message(&mut w.ids, &alice);
    let m2_id = m2.id.clone();
    w.model.post_message(&general, m2).unwrap();
    let payload = w.model.payload(&general).unwrap();
    assert_eq!(payload.message_ids(), &[m1_id.clone(), m2_id.clone()]);
    assert_eq!(payload.next_after(&m1_id), Some(&m2_id));
    assert_eq!(payload.next_after(&m2_id), None);
}

#[test]
fn test_followed_user_creations() {
    let mut w = World::new();
    let (alice, carol) = (w.alice.clone(), w.carol.clone());

    assert!(w.model.follow_user(&carol, &alice).unwrap());
    for title in ["design", "ops"] {
        let header = test_conversation(&mut w.ids, &alice, title);
        w.model.add_conversation(header).unwrap();
    }

    let report = w.model.status_update(&carol).unwrap();
    assert_report_line(&report, "USER alice: 2 new conversations created!");

    let report = w.model.status_update(&carol).unwrap();
    assert_report_line(&report, "USER alice: 0 new conversations created!");
}

#[test]
fn test_missing_conversation_is_not_found() {
    let mut w = World::new();
    let ghost = EntityId::new(9999);

    assert_error_kind(
        w.model.toggle_permission(&w.alice, &w.bob, Permission::MEMBER, &ghost),
        ErrorKind::NotFound,
    );
    assert_error_kind(
        w.model.add_bot(BotUser::new(EntityId::new(500), "bot", Timestamp::from_millis(500)), &ghost),
        ErrorKind::NotFound,
    );
    assert_error_kind(w.model.follow_conversation(&w.bob, &ghost), ErrorKind::NotFound);
    assert_error_kind(w.model.conversation_messages(&ghost), ErrorKind::NotFound);
}

#[test]
fn test_report_serializes_to_json() {
    let mut w = World::new();
    let (bob, general) = (w.bob.clone(), w.general.clone());
    w.model.follow_conversation(&bob, &general).unwrap();
    let alice = w.alice.clone();
    w.post(&alice, 1);

    let report = w.model.status_update(&bob).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["conversations"][0]["title"], "general");
    assert_eq!(json["conversations"][0]["new_messages"], 1);
}

proptest! {
    #[test]
    fn prop_double_toggle_is_identity(start in 0u8..8, request in 0u8..8) {
        let mut w = World::new();
        let start = Permission::from_bits_truncate(start);
        let request = Permission::from_bits_truncate(request);

        if !start.is_empty() {
            w.model.toggle_permission(&w.alice, &w.bob, start, &w.general).unwrap();
        }
        w.model.toggle_permission(&w.alice, &w.bob, request, &w.general).unwrap();
        let back = w.model.toggle_permission(&w.alice, &w.bob, request, &w.general).unwrap();
        prop_assert_eq!(back, start);
    }

    #[test]
    fn prop_users_stay_reachable_with_repeated_keys(
        entries in prop::collection::vec((0usize..6, 0u64..4), 1..24)
    ) {
        let pool = ["ann", "Ann", "ANN", "bo", "Bo", "cy"];
        let mut model = Model::default();
        let mut ids = TestIds::new();
        let mut users = Vec::new();

        for (name, at) in &entries {
            let user = TestUserBuilder::new(ids.next())
                .with_name(pool[*name])
                .created_at(*at)
                .build();
            users.push(model.add_user(user).unwrap().clone());
        }
        prop_assert_eq!(model.users().len(), users.len());

        for user in &users {
            let stored = model.users().get(&user.id);
            prop_assert_eq!(stored, Some(user));

            let same_name = model.users().all_by_text(&user.name.to_uppercase());
            prop_assert!(same_name.iter().any(|u| u.id == user.id));

            let same_time: Vec<_> = model.users().created_between(user.creation..=user.creation).collect();
            prop_assert!(same_time.iter().any(|u| u.id == user.id));

            // ties resolve to the earliest insert
            let first_named = users
                .iter()
                .find(|u| u.name.eq_ignore_ascii_case(&user.name))
                .map(|u| &u.id);
            prop_assert_eq!(model.users().by_text(&user.name).map(|u| &u.id), first_named);

            let first_timed = users.iter().find(|u| u.creation == user.creation).map(|u| &u.id);
            prop_assert_eq!(model.users().by_time(user.creation).map(|u| &u.id), first_timed);
        }
    }
}
