//! Shared operation state: built lazily, once per application, and released
//! with the last handle.

mod test_data_gen;

use std::cell::Cell;
use std::rc::Rc;

use lazyq::lazyq_core::metrics::materialize_events;
use lazyq::prelude::*;
use test_data_gen::{counted, depts, employees, generate_values, Dept, Employee};

#[test]
fn test_construction_never_pulls() {
    let (source, pulls) = counted(generate_values(20, 5, 1));
    let calls = Rc::new(Cell::new(0));
    let c = Rc::clone(&calls);

    let pipeline = source
        .apply(where_(move |x: &i32| {
            c.set(c.get() + 1);
            *x > 0
        }))
        .apply(order_by(|x: &i32| *x))
        .apply(distinct())
        .apply(group_by(|x: &i32| x % 2))
        .apply(reverse());
    let _cursor = pipeline.cursor();

    assert_eq!(pulls.get(), 0);
    assert_eq!(calls.get(), 0);
}

#[test]
fn test_sort_is_built_once_for_all_cursors() {
    let values = generate_values(32, 100, 2);
    let (source, pulls) = counted(values.clone());
    let sorted = source.apply(order_by(|x: &i32| *x));

    let mut first = sorted.cursor();
    let mut second = sorted.back_cursor().expect("sorted output walks backward");
    assert_eq!(pulls.get(), 0);

    let min = first.next();
    let max = second.next();
    assert_eq!(min, values.iter().copied().min());
    assert_eq!(max, values.iter().copied().max());
    assert_eq!(sorted.to_vec().len(), values.len());
    assert_eq!(pulls.get(), values.len());
}

#[test]
fn test_applications_are_independent() {
    let values = generate_values(10, 10, 3);
    let (source, pulls) = counted(values.clone());
    let a = source.clone().apply(order_by(|x: &i32| *x));
    let b = source.apply(order_by_descending(|x: &i32| *x));

    assert_eq!(a.to_vec().len(), 10);
    assert_eq!(pulls.get(), 10);
    assert_eq!(b.to_vec().len(), 10);
    assert_eq!(pulls.get(), 20);
    assert!(a.is_sorted() && b.is_sorted());
}

#[test]
fn test_join_index_is_shared_by_cursors() {
    let (inner, inner_pulls) = counted(depts());
    let joined = employees().apply(join(
        inner,
        |e: &Employee| e.dept,
        |d: &Dept| d.id,
        |e: &Employee, d: &Dept| (e.id, d.id),
    ));

    let mut a = joined.cursor();
    assert_eq!(a.next(), Some((1, 10)));
    assert_eq!(inner_pulls.get(), depts().len());

    let all: Vec<(u32, u32)> = joined.cursor().collect();
    assert_eq!(all.len(), 5);
    assert_eq!(a.next(), Some((2, 20)));
    assert_eq!(inner_pulls.get(), depts().len());
}

#[test]
fn test_skip_prefix_is_scanned_once() {
    let calls = Rc::new(Cell::new(0));
    let c = Rc::clone(&calls);
    let tail = vec![1, 2, 3, 10, 4].apply(skip_while(move |x: &i32| {
        c.set(c.get() + 1);
        *x < 5
    }));

    assert_eq!(tail.to_vec(), vec![10, 4]);
    let after_first = calls.get();
    assert_eq!(after_first, 4);
    assert_eq!(tail.to_vec(), vec![10, 4]);
    assert_eq!(tail.cursor().count(), 2);
    assert_eq!(calls.get(), after_first);
}

#[test]
fn test_state_outlives_sequence_handle_but_not_cursors() {
    let token = Rc::new(7);
    let items = vec![Rc::clone(&token), Rc::clone(&token)];
    let sorted = items.apply(order_by(|x: &Rc<i32>| **x));

    let mut cursor = sorted.cursor();
    assert_eq!(cursor.next().map(|x| *x), Some(7));
    drop(sorted);

    // The cursor alone keeps the source and the sorted buffer alive.
    assert!(Rc::strong_count(&token) > 1);
    assert_eq!(cursor.next().map(|x| *x), Some(7));
    assert!(cursor.next().is_none());

    drop(cursor);
    assert_eq!(Rc::strong_count(&token), 1);
}

#[test]
fn test_one_materialize_event_per_application() {
    if !QueryConfig::current().trace_materialization {
        return;
    }
    let values = generate_values(16, 8, 4);
    let before = materialize_events();

    let sorted = values.clone().apply(order_by(|x: &i32| *x));
    let streamed = values.clone().apply(where_(|x: &i32| *x > 2));
    assert_eq!(materialize_events(), before);

    for _ in 0..3 {
        assert_eq!(sorted.cursor().count(), values.len());
    }
    assert!(sorted.back_cursor().is_some_and(|mut c| c.next().is_some()));
    streamed.to_vec();
    assert_eq!(materialize_events() - before, 1);

    let again = values.clone().apply(order_by(|x: &i32| *x));
    let groups = values.apply(group_by(|x: &i32| x % 3));
    again.to_vec();
    groups.to_vec();
    groups.to_vec();
    assert_eq!(materialize_events() - before, 3);
}
