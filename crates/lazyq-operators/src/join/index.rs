//! Key indices shared by the join family.

use std::collections::BTreeMap;
use std::rc::Rc;

use lazyq_core::sequence::{LazySeq, Sequence};

use crate::order::{KeyOrder, Keyed};
use crate::state::SharedState;

pub(crate) type Groups<K, P, V> = BTreeMap<Keyed<K, P>, Vec<V>>;

/// One pass over `items`: key -> values in insertion order.
///
/// Keys equivalent under `order` land in the same group; the first key seen
/// represents the group.
pub(crate) fn build_groups<T, K, V, P>(
    items: impl Iterator<Item = T>,
    key: impl Fn(&T) -> K,
    value: impl Fn(T) -> V,
    order: &Rc<P>,
) -> Groups<K, P, V>
where
    P: KeyOrder<K>,
{
    let mut groups: Groups<K, P, V> = BTreeMap::new();
    for item in items {
        let k = Keyed::new(key(&item), order);
        groups.entry(k).or_default().push(value(item));
    }
    groups
}

/// Lazily built index over the inner side of a join.
pub(crate) struct InnerIndex<T, K, F, P> {
    inner: LazySeq<T>,
    key: F,
    order: Rc<P>,
    index: SharedState<BTreeMap<Keyed<K, P>, Rc<[T]>>>,
}

impl<T, K, F, P> InnerIndex<T, K, F, P>
where
    T: 'static,
    F: Fn(&T) -> K,
    P: KeyOrder<K>,
{
    pub(crate) fn new(op: &'static str, inner: LazySeq<T>, key: F, order: P) -> Self {
        Self {
            inner,
            key,
            order: Rc::new(order),
            index: SharedState::new(op),
        }
    }

    /// Builds the index if this is the first lookup of the application.
    pub(crate) fn matches(&self, key: K) -> Option<&Rc<[T]>> {
        let index = self.index.get_or_build(|| {
            build_groups(self.inner.cursor(), &self.key, |item| item, &self.order)
                .into_iter()
                .map(|(k, rows)| (k, Rc::from(rows)))
                .collect()
        });
        index.get(&Keyed::new(key, &self.order))
    }

    #[cfg(test)]
    fn is_built(&self) -> bool {
        self.index.is_built()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::NaturalOrder;

    #[test]
    fn groups_keep_insertion_order_and_first_key() {
        let by_lower = Rc::new(|a: &String, b: &String| a.to_lowercase() < b.to_lowercase());
        let words = vec!["B", "a", "b", "A", "c"];
        let groups = build_groups(
            words.into_iter(),
            |w: &&str| w.to_string(),
            |w: &str| w.len(),
            &by_lower,
        );
        let (keys, sizes): (Vec<String>, Vec<usize>) = groups
            .into_iter()
            .map(|(k, values)| (k.into_key(), values.len()))
            .unzip();
        assert_eq!(keys, vec!["a", "B", "c"]);
        assert_eq!(sizes, vec![2, 2, 1]);
    }

    #[test]
    fn index_is_built_on_first_lookup() {
        let index = InnerIndex::new(
            "test",
            LazySeq::from_vec(vec![(1, 'a'), (2, 'b'), (1, 'c')]),
            |row: &(i32, char)| row.0,
            NaturalOrder,
        );
        assert!(!index.is_built());
        let hits: Vec<char> = index
            .matches(1)
            .map(|m| m.iter().map(|r| r.1).collect())
            .unwrap_or_default();
        assert!(index.is_built());
        assert_eq!(hits, vec!['a', 'c']);
        assert!(index.matches(3).is_none());
    }
}
