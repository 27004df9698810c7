//! Property tests for the transition machine.
//!
//! Properties:
//!   - A ticket's status only ever moves along edges of the transition table.
//!   - History is append-only: length grows by exactly one per accepted
//!     change and never shrinks; earlier records are never altered.
//!   - A rejected request leaves the snapshot exactly as it was.

use chrono::Utc;
use helpdesk_core::machine::{self, RequestedChange};
use helpdesk_core::model::{
    Priority, Status, Ticket,
    id::{CategoryId, TicketId, UserId},
};
use proptest::prelude::*;

const EDGES: [(Status, Status); 6] = [
    (Status::Open, Status::InProgress),
    (Status::InProgress, Status::Resolved),
    (Status::Resolved, Status::Closed),
    (Status::Resolved, Status::Reopened),
    (Status::Closed, Status::Reopened),
    (Status::Reopened, Status::InProgress),
];

fn any_status() -> impl Strategy<Value = Status> {
    prop_oneof![
        Just(Status::Open),
        Just(Status::InProgress),
        Just(Status::Resolved),
        Just(Status::Closed),
        Just(Status::Reopened),
    ]
}

fn any_priority() -> impl Strategy<Value = Priority> {
    prop_oneof![
        Just(Priority::Low),
        Just(Priority::Medium),
        Just(Priority::High),
        Just(Priority::Urgent),
    ]
}

fn any_change() -> impl Strategy<Value = RequestedChange> {
    prop_oneof![
        any_status().prop_map(|to| RequestedChange::Status { to }),
        any_priority().prop_map(|to| RequestedChange::Priority { to }),
        prop_oneof![
            Just(None),
            Just(Some(UserId::new_unchecked("bob"))),
            Just(Some(UserId::new_unchecked("carol"))),
        ]
        .prop_map(|to| RequestedChange::Assignee { to }),
    ]
}

fn fresh_ticket() -> Ticket {
    Ticket::open(
        TicketId::new_unchecked("tkt-prop"),
        "property subject",
        "",
        CategoryId::new_unchecked("general"),
        UserId::new_unchecked("alice"),
        Priority::Medium,
        Utc::now(),
    )
}

proptest! {
    #[test]
    fn status_pairs_match_edge_table(from in any_status(), to in any_status()) {
        let listed = EDGES.contains(&(from, to));
        prop_assert_eq!(from.can_transition_to(to).is_ok(), listed);
    }

    #[test]
    fn random_walks_hold_invariants(changes in prop::collection::vec(any_change(), 1..40)) {
        let actor = UserId::new_unchecked("bob");
        let mut ticket = fresh_ticket();

        for change in changes {
            let before = ticket.clone();
            match machine::apply(&ticket, &change, &actor, Utc::now(), None) {
                Ok((next, record)) => {
                    // Status moves only along table edges.
                    if next.status() != before.status() {
                        prop_assert!(EDGES.contains(&(before.status(), next.status())));
                    }
                    // History appends exactly one record and keeps the prefix.
                    prop_assert_eq!(next.history().len(), before.history().len() + 1);
                    prop_assert_eq!(
                        &next.history()[..before.history().len()],
                        before.history()
                    );
                    prop_assert_eq!(next.history().last(), Some(&record));
                    prop_assert_eq!(next.version(), before.version() + 1);
                    ticket = next;
                }
                Err(_) => {
                    // Rejection mutates nothing; the input is the state.
                    prop_assert_eq!(&ticket, &before);
                }
            }
        }
    }

    #[test]
    fn closed_tickets_accept_only_reopen(change in any_change()) {
        let actor = UserId::new_unchecked("bob");
        let mut ticket = fresh_ticket();
        for to in [Status::InProgress, Status::Resolved, Status::Closed] {
            let (next, _) = machine::apply(
                &ticket,
                &RequestedChange::Status { to },
                &actor,
                Utc::now(),
                None,
            )
            .expect("edge in table");
            ticket = next;
        }

        let accepted = machine::apply(&ticket, &change, &actor, Utc::now(), None).is_ok();
        let is_reopen = matches!(
            change,
            RequestedChange::Status { to: Status::Reopened }
        );
        prop_assert_eq!(accepted, is_reopen);
    }
}
