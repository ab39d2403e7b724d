use core::fmt;
use core::marker::PhantomData;

use serde::de::{Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeSeq, Serializer};

use super::OrderedTree;

/// Serializes the values as a sequence in ascending order.
impl<T: Serialize> Serialize for OrderedTree<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.count()))?;
        for value in self {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

struct OrderedTreeVisitor<T> {
    marker: PhantomData<T>,
}

impl<'de, T> Visitor<'de> for OrderedTreeVisitor<T>
where
    T: Deserialize<'de> + Ord,
{
    type Value = OrderedTree<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        // Any order is accepted; duplicates collapse.
        let mut tree = OrderedTree::new();
        while let Some(value) = access.next_element()? {
            tree.insert(value);
        }
        Ok(tree)
    }
}

impl<'de, T> Deserialize<'de> for OrderedTree<T>
where
    T: Deserialize<'de> + Ord,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(OrderedTreeVisitor {
            marker: PhantomData,
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn serializes_in_ascending_order() {
        let tree = OrderedTree::from([3, 1, 2]);
        assert_eq!(serde_json::to_string(&tree).unwrap(), "[1,2,3]");
    }

    #[test]
    fn serializes_empty_tree() {
        let tree: OrderedTree<i32> = OrderedTree::new();
        assert_eq!(serde_json::to_string(&tree).unwrap(), "[]");
    }

    #[test]
    fn deserializes_unsorted_input_with_duplicates() {
        let tree: OrderedTree<i32> = serde_json::from_str("[5, 3, 5, 1]").unwrap();
        assert_eq!(tree.count(), 3);
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 3, 5]);
        assert!(tree.black_height().is_some());
    }

    #[test]
    fn rejects_non_sequence() {
        let result: Result<OrderedTree<i32>, _> = serde_json::from_str("{\"a\": 1}");
        assert!(result.is_err());
    }
}
