use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use teamflow::{
    CommandOutcome, MemberPatch, NewMember, Position, Snapshot, StoreCommand, TeamStore,
};

fn carol() -> NewMember {
    NewMember::new("Carol", "Developer", Position::new(10.0, 20.0))
}

#[test]
fn seed_has_two_members_and_one_edge() {
    let s = TeamStore::new();
    let snap = s.snapshot();
    assert_eq!(snap, Snapshot::seed());
    let ids: Vec<&str> = snap.members.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert_eq!(snap.edges.len(), 1);
    assert_eq!(snap.edges[0].id, "e1-2");
    assert_eq!(snap.edges[0].source, "1");
    assert_eq!(snap.edges[0].target, "2");
}

#[test]
fn deleting_manager_cascades_its_edge() {
    let mut s = TeamStore::new();
    assert!(s.delete_member("1"));
    let snap = s.snapshot();
    assert_eq!(snap.members.len(), 1);
    assert_eq!(snap.members[0].id, "2");
    assert_eq!(snap.members[0].name, "Bob");
    assert_eq!(snap.members[0].role, "Developer");
    assert!(snap.edges.is_empty());
}

#[test]
fn add_member_then_connect_to_bob() {
    let mut s = TeamStore::new();
    let carol_id = s.add_member(carol());
    let edge_id = s.add_edge(&carol_id, "2");
    let snap = s.snapshot();
    assert_eq!(snap.members.len(), 3);
    assert_eq!(snap.edges.len(), 2);
    let edge = snap.edge(&edge_id).expect("new edge");
    assert_eq!(edge.source, carol_id);
    assert_eq!(edge.target, "2");
}

#[test]
fn add_member_assigns_fresh_id_and_keeps_fields() {
    let mut s = TeamStore::new();
    let before: HashSet<String> = s.current().members.iter().map(|m| m.id.clone()).collect();
    let id = s.add_member(carol());
    assert!(!before.contains(&id));
    assert_eq!(s.member_count(), before.len() + 1);
    let m = s.member(&id).expect("added member");
    assert_eq!(m.name, "Carol");
    assert_eq!(m.role, "Developer");
    assert_eq!(m.position, Position::new(10.0, 20.0));
    // appended, not inserted
    assert_eq!(s.current().members.last().map(|m| m.id.as_str()), Some(id.as_str()));
}

#[test]
fn update_of_missing_member_changes_nothing() {
    let mut s = TeamStore::new();
    let before = s.snapshot();
    let rev = s.revision();
    assert!(!s.update_member("missing-id", MemberPatch::default().name("Nobody")));
    assert!(!s.update_member_position("missing-id", Position::new(1.0, 1.0)));
    assert_eq!(s.snapshot(), before);
    assert_eq!(s.revision(), rev);
}

#[test]
fn update_member_merges_only_given_fields() {
    let mut s = TeamStore::new();
    assert!(s.update_member("2", MemberPatch::default().role("Lead")));
    let bob = s.member("2").unwrap();
    assert_eq!(bob.name, "Bob");
    assert_eq!(bob.role, "Lead");
    assert_eq!(bob.position, Position::new(400.0, 300.0));

    assert!(s.update_member("2", MemberPatch::default().name("Robert")));
    let bob = s.member("2").unwrap();
    assert_eq!(bob.name, "Robert");
    assert_eq!(bob.role, "Lead");
}

#[test]
fn update_position_replaces_wholesale() {
    let mut s = TeamStore::new();
    assert!(s.update_member_position("1", Position::new(-5.5, 12.25)));
    let alice = s.member("1").unwrap();
    assert_eq!(alice.position, Position::new(-5.5, 12.25));
    assert_eq!(alice.name, "Alice");
}

#[test]
fn non_finite_move_is_a_noop() {
    let mut s = TeamStore::new();
    let seen = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&seen);
    s.subscribe(move |_| *counter.borrow_mut() += 1);
    let before = s.snapshot();
    assert!(!s.update_member_position("1", Position::new(f64::NAN, 1.0)));
    assert!(!s.update_member_position("1", Position::new(0.0, f64::NEG_INFINITY)));
    assert_eq!(s.snapshot(), before);
    assert_eq!(s.revision(), 0);
    assert_eq!(*seen.borrow(), 0);
}

#[test]
fn delete_member_is_idempotent() {
    let mut s = TeamStore::new();
    assert!(s.delete_member("2"));
    let once = s.snapshot();
    let rev = s.revision();
    assert!(!s.delete_member("2"));
    assert_eq!(s.snapshot(), once);
    assert_eq!(s.revision(), rev);
}

#[test]
fn delete_edge_removes_only_that_edge() {
    let mut s = TeamStore::new();
    let extra = s.add_edge("2", "1");
    assert!(s.delete_edge("e1-2"));
    assert!(!s.delete_edge("e1-2"));
    assert_eq!(s.edge_count(), 1);
    assert!(s.edge(&extra).is_some());
    assert_eq!(s.member_count(), 2);
}

#[test]
fn add_edge_does_not_check_endpoints() {
    let mut s = TeamStore::new();
    let ghost = s.add_edge("ghost", "2");
    let looped = s.add_edge("1", "1");
    let dup = s.add_edge("1", "2");
    assert_eq!(s.edge_count(), 4);
    assert_ne!(dup, "e1-2");
    assert!(s.edge(&ghost).is_some());
    assert!(s.edge(&looped).is_some());

    // removing Bob takes every edge that names him, valid or not
    assert!(s.delete_member("2"));
    let remaining: Vec<&str> = s.current().edges.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(remaining, vec![looped.as_str()]);
}

#[test]
fn earlier_snapshot_is_unaffected_by_later_mutations() {
    let mut s = TeamStore::new();
    let before = s.snapshot();
    s.update_member("1", MemberPatch::default().name("Alicia"));
    s.update_member_position("2", Position::new(0.0, 0.0));
    s.add_member(carol());
    s.delete_member("2");
    assert_eq!(before, Snapshot::seed());
    assert_ne!(s.snapshot(), before);
}

#[test]
fn listeners_observe_each_transition() {
    let mut s = TeamStore::new();
    let first = Rc::new(RefCell::new(Vec::new()));
    let second = Rc::new(RefCell::new(Vec::new()));

    let sink = Rc::clone(&first);
    let sub = s.subscribe(move |snap: &Snapshot| sink.borrow_mut().push(snap.members.len()));
    let sink = Rc::clone(&second);
    s.subscribe(move |snap: &Snapshot| sink.borrow_mut().push(snap.edges.len()));
    assert_eq!(s.listener_count(), 2);

    let id = s.add_member(carol());
    s.add_edge(&id, "1");
    // no-ops do not notify
    s.update_member("missing", MemberPatch::default().name("x"));
    s.delete_edge("missing");

    assert!(s.unsubscribe(sub));
    assert!(!s.unsubscribe(sub));
    s.delete_member("1");

    assert_eq!(*first.borrow(), vec![3, 3]);
    assert_eq!(*second.borrow(), vec![1, 2, 0]);
}

#[test]
fn cascade_is_a_single_transition() {
    let mut s = TeamStore::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    s.subscribe(move |snap: &Snapshot| {
        let dangling = snap.dangling_edges().count();
        sink.borrow_mut().push((snap.members.len(), snap.edges.len(), dangling));
    });
    s.delete_member("2");
    assert_eq!(*seen.borrow(), vec![(1, 0, 0)]);
}

#[test]
fn ids_are_not_reused_after_deletion() {
    let mut s = TeamStore::new();
    let mut issued = HashSet::new();
    for i in 0..50 {
        let id = s.add_member(NewMember::new(
            format!("m{i}"),
            "Team Member",
            Position::new(i as f64, 0.0),
        ));
        let edge = s.add_edge(&id, "2");
        assert!(issued.insert(id.clone()));
        assert!(issued.insert(edge));
        s.delete_member(&id);
    }
    for seeded in ["1", "2", "e1-2"] {
        assert!(!issued.contains(seeded));
    }
    assert_eq!(s.member_count(), 2);
    assert_eq!(s.edge_count(), 1);
}

#[test]
fn apply_routes_each_command() {
    let mut s = TeamStore::new();
    let CommandOutcome::MemberAdded(id) = s.apply(StoreCommand::AddMember(carol())) else {
        panic!("expected member id");
    };
    let CommandOutcome::EdgeAdded(edge) = s.apply(StoreCommand::AddEdge {
        source: id.clone(),
        target: "1".into(),
    }) else {
        panic!("expected edge id");
    };
    assert_eq!(
        s.apply(StoreCommand::MoveMember {
            id: id.clone(),
            position: Position::new(7.0, 8.0)
        }),
        CommandOutcome::Applied(true)
    );
    assert_eq!(
        s.apply(StoreCommand::UpdateMember {
            id: "nope".into(),
            patch: MemberPatch::default().name("x")
        }),
        CommandOutcome::Applied(false)
    );
    assert_eq!(
        s.apply(StoreCommand::DeleteEdge { id: edge }),
        CommandOutcome::Applied(true)
    );
    assert_eq!(
        s.apply(StoreCommand::DeleteMember { id }),
        CommandOutcome::Applied(true)
    );
    assert_eq!(s.snapshot(), Snapshot::seed());
}

#[test]
fn replace_rejects_duplicate_ids_and_reset_restores_seed() {
    let mut s = TeamStore::new();
    let mut dup = Snapshot::seed();
    dup.members.push(Rc::clone(&dup.members[0]));
    assert!(s.replace(dup).is_err());
    assert_eq!(s.snapshot(), Snapshot::seed());

    let mut empty = Snapshot::default();
    assert!(s.replace(empty.clone()).is_ok());
    assert_eq!(s.member_count(), 0);
    s.reset();
    assert_eq!(s.snapshot(), Snapshot::seed());

    empty.edges.push(Rc::clone(&Snapshot::seed().edges[0]));
    assert!(s.replace(empty).is_ok());
    assert_eq!(s.edge_count(), 1);
}
