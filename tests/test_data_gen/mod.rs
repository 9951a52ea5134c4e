//! Test data generators shared by the integration tests.
#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use lazyq::prelude::*;

/// The running example used across the docs.
pub fn sample() -> Vec<i32> {
    vec![3, 1, 4, 1, 5, 9, 2, 6]
}

/// Deterministic pseudo-random values in `0..modulo`.
pub fn generate_values(count: usize, modulo: i32, seed: u64) -> Vec<i32> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
    (0..count)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((state >> 33) % modulo as u64) as i32
        })
        .collect()
}

/// A sequence without backward traversal over `items`.
pub fn forward_only<T: Clone + 'static>(items: Vec<T>) -> LazySeq<T> {
    LazySeq::from_fn(move || items.clone())
}

/// A forward-only sequence that counts how many elements were pulled from it.
pub fn counted<T: Clone + 'static>(items: Vec<T>) -> (LazySeq<T>, Rc<Cell<usize>>) {
    let pulls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&pulls);
    let seq = LazySeq::from_fn(move || {
        let counter = Rc::clone(&counter);
        items.clone().into_iter().inspect(move |_| {
            counter.set(counter.get() + 1);
        })
    });
    (seq, pulls)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    pub id: u32,
    pub name: &'static str,
    pub dept: u32,
    pub salary: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dept {
    pub id: u32,
    pub title: &'static str,
}

pub fn employees() -> Vec<Employee> {
    let rows = [
        (1, "ada", 10, 120),
        (2, "bob", 20, 90),
        (3, "cyd", 10, 95),
        (4, "dan", 30, 90),
        (5, "eve", 20, 150),
        (6, "fay", 10, 95),
    ];
    rows.iter()
        .map(|&(id, name, dept, salary)| Employee {
            id,
            name,
            dept,
            salary,
        })
        .collect()
}

pub fn depts() -> Vec<Dept> {
    [(10, "research"), (20, "sales"), (40, "legal")]
        .iter()
        .map(|&(id, title)| Dept { id, title })
        .collect()
}
