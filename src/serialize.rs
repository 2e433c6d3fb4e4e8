//! `serde` support: a queue is a sequence of its live elements, front first.

use core::fmt;
use core::marker::PhantomData;

use serde::de::{SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::alloc::RawAlloc;
use crate::queue::Queue;

impl<T: Serialize, A: RawAlloc> Serialize for Queue<T, A> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for item in self {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

struct QueueVisitor<T, A> {
    marker: PhantomData<fn() -> Queue<T, A>>,
}

impl<'de, T, A> Visitor<'de> for QueueVisitor<T, A>
where
    T: Deserialize<'de>,
    A: RawAlloc + Default,
{
    type Value = Queue<T, A>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
    where
        S: SeqAccess<'de>,
    {
        // cap the hint so a hostile length cannot force a huge allocation
        let hint = seq.size_hint().unwrap_or(0).min(4096);
        let mut queue = Queue::try_with_capacity_in(hint, A::default())
            .map_err(serde::de::Error::custom)?;
        while let Some(item) = seq.next_element()? {
            queue.try_enqueue(item).map_err(serde::de::Error::custom)?;
        }
        Ok(queue)
    }
}

impl<'de, T, A> Deserialize<'de> for Queue<T, A>
where
    T: Deserialize<'de>,
    A: RawAlloc + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(QueueVisitor {
            marker: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_json_round_trip() {
        let mut q = Queue::from([0, 1, 2, 3]);
        q.dequeue().unwrap();
        let json = serde_json::to_string(&q).unwrap();
        assert_eq!(json, "[1,2,3]");

        let back: Queue<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, q);
        assert_eq!(back.offset(), 0);
    }

    #[test]
    fn test_serde_json_rejects_non_sequence() {
        let err = serde_json::from_str::<Queue<i32>>("{\"a\":1}").unwrap_err();
        assert!(err.to_string().contains("a sequence"));
    }

    #[test]
    fn test_serde_json_nested() {
        let json = "[[\"a\",\"b\"],[],[\"c\"]]";
        let q: Queue<Queue<String>> = serde_json::from_str(json).unwrap();
        assert_eq!(q.len(), 3);
        assert!(q[1].is_empty());
        assert_eq!(serde_json::to_string(&q).unwrap(), json);
    }
}
