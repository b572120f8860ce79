//! Property-based tests for pending row delivery.
//!
//! Random sequences of commits, deletes, spurious notifications, forced
//! resolutions, owner drops and closes must never deliver a row twice, and
//! every delivered row must match its query at delivery time.

use proptest::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tarn_core::schema::TableBuilder;
use tarn_core::{DataType, Error, Value};
use tarn_query::TableQuery;
use tarn_reactive::{FrontEnd, PendingRow};
use tarn_row::{AccessMode, ResolvedRow, RowAccess};
use tarn_storage::Dataset;

#[derive(Clone, Debug)]
enum Op {
    Insert(i64),
    DeleteFirst,
    Notify(usize),
    ResolveNow(usize),
    DropOwner(usize),
    Close,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (0i64..60).prop_map(Op::Insert),
        2 => Just(Op::DeleteFirst),
        2 => (0usize..8).prop_map(Op::Notify),
        1 => (0usize..8).prop_map(Op::ResolveNow),
        1 => (0usize..8).prop_map(Op::DropOwner),
        1 => Just(Op::Close),
    ]
}

/// What an owner saw; outlives the owner itself.
#[derive(Default)]
struct Tally {
    deliveries: Cell<usize>,
    ages: RefCell<Vec<i64>>,
}

struct Owner {
    tally: Rc<Tally>,
}

impl FrontEnd for Owner {
    fn on_query_finished(&self, row: ResolvedRow) {
        self.tally.deliveries.set(self.tally.deliveries.get() + 1);
        if let Ok(age) = row.get_long(1) {
            self.tally.ages.borrow_mut().push(age);
        }
    }
}

struct Waiter {
    threshold: i64,
    pending: Rc<PendingRow>,
    owner: Option<Rc<Owner>>,
    /// Deliveries observed when the owner was dropped or resolution forced.
    frozen: Option<usize>,
    observed: Rc<Tally>,
}

fn people() -> Dataset {
    let dataset = Dataset::in_memory("prop");
    let schema = TableBuilder::new("people")
        .unwrap()
        .add_column("name", DataType::String)
        .unwrap()
        .add_column("age", DataType::Int64)
        .unwrap()
        .build()
        .unwrap();
    dataset.create_table(schema).unwrap();
    dataset
}

fn waiter(dataset: &Dataset, threshold: i64, mode: AccessMode) -> Waiter {
    let query = TableQuery::for_table(dataset, "people")
        .unwrap()
        .greater_than("age", threshold)
        .unwrap();
    let pending = PendingRow::new(dataset, query, None, mode);
    let tally = Rc::new(Tally::default());
    let owner = Rc::new(Owner {
        tally: tally.clone(),
    });
    pending.attach_owner(&owner);
    Waiter {
        threshold,
        pending,
        observed: tally,
        owner: Some(owner),
        frozen: None,
    }
}

proptest! {
    /// Property: each pending row delivers at most once, never after it was
    /// abandoned or forced, and only rows matching its query.
    #[test]
    fn delivery_is_at_most_once(
        thresholds in prop::collection::vec(0i64..60, 1..8),
        checked in any::<bool>(),
        ops in prop::collection::vec(op_strategy(), 0..40),
    ) {
        let dataset = people();
        let mode = if checked { AccessMode::Checked } else { AccessMode::Unchecked };
        let mut waiters: Vec<Waiter> = thresholds
            .iter()
            .map(|t| waiter(&dataset, *t, mode))
            .collect();
        let count = waiters.len();

        for op in ops {
            match op {
                Op::Insert(age) => {
                    let _ = dataset.write(|ds| {
                        ds.insert("people", vec![Value::from("p"), Value::Int64(age)])
                    });
                }
                Op::DeleteFirst => {
                    let first = dataset
                        .with_table("people", |store| store.row_ids().first().copied())
                        .ok()
                        .flatten();
                    if let Some(id) = first {
                        let _ = dataset.write(|ds| ds.delete("people", id));
                    }
                }
                Op::Notify(i) => waiters[i % count].pending.on_collection_change(),
                Op::ResolveNow(i) => {
                    let w = &mut waiters[i % count];
                    match w.pending.resolve_now() {
                        Ok(_) => w.frozen = Some(w.observed.deliveries.get()),
                        Err(err) => prop_assert_eq!(err, Error::AlreadyResolved),
                    }
                }
                Op::DropOwner(i) => {
                    let w = &mut waiters[i % count];
                    if w.owner.take().is_some() && w.frozen.is_none() {
                        w.frozen = Some(w.observed.deliveries.get());
                    }
                }
                Op::Close => dataset.close(),
            }

            for w in &waiters {
                let delivered = w.observed.deliveries.get();
                prop_assert!(delivered <= 1);
                if let Some(frozen) = w.frozen {
                    prop_assert_eq!(delivered, frozen);
                }
                if delivered == 1 {
                    prop_assert!(!w.pending.is_pending());
                }
                for age in w.observed.ages.borrow().iter() {
                    prop_assert!(*age > w.threshold);
                }
            }
        }

        // A row still pending with a live owner means nothing matches now.
        for w in &waiters {
            if w.pending.is_pending() && w.owner.is_some() && !dataset.is_closed() {
                let matches = w
                    .pending
                    .collection()
                    .map(|c| c.len())
                    .unwrap_or(0);
                prop_assert_eq!(matches, 0);
            }
        }
    }
}
