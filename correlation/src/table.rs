//! Id-indexed slots for the pending requests of one reply type tag.

/// Pending entries indexed by request id.
///
/// Slot `n` holds id `n + 1`; id 0 never correlates.
#[derive(Debug)]
pub(crate) struct Slots<T> {
    /// The number of occupied slots.
    count: usize,

    vec: Vec<Option<T>>,
}

impl<T> Slots<T> {
    pub(crate) const fn new() -> Self {
        Self {
            count: 0,
            vec: Vec::new(),
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.count
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Smallest id in `1..=max` with no entry.
    pub(crate) fn free_id(&self, max: u8) -> Option<u8> {
        let limit = usize::from(max);
        let idx = self
            .vec
            .iter()
            .take(limit)
            .position(Option::is_none)
            .or_else(|| (self.vec.len() < limit).then_some(self.vec.len()))?;
        u8::try_from(idx + 1).ok()
    }

    /// Stores `entry` under `id`, which must be free.
    pub(crate) fn insert(&mut self, id: u8, entry: T) {
        let Some(idx) = index(id) else {
            return;
        };
        if self.vec.len() <= idx {
            self.vec.resize_with(idx + 1, || None);
        }
        if self.vec[idx].replace(entry).is_none() {
            self.count += 1;
        }
    }

    pub(crate) fn get(&self, id: u8) -> Option<&T> {
        self.vec.get(index(id)?)?.as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: u8) -> Option<&mut T> {
        self.vec.get_mut(index(id)?)?.as_mut()
    }

    /// Removes and returns the entry for `id`, if any.
    pub(crate) fn try_remove(&mut self, id: u8) -> Option<T> {
        let entry = self.vec.get_mut(index(id)?)?.take()?;
        self.count = self.count.saturating_sub(1);
        while matches!(self.vec.last(), Some(None)) {
            self.vec.pop();
        }
        Some(entry)
    }

    /// The id of the only occupied slot, if exactly one is occupied.
    pub(crate) fn sole_id(&self) -> Option<u8> {
        if self.count != 1 {
            return None;
        }
        let idx = self.vec.iter().position(Option::is_some)?;
        u8::try_from(idx + 1).ok()
    }

    /// Removes every entry, in id order.
    pub(crate) fn drain(&mut self) -> impl Iterator<Item = (u8, T)> + '_ {
        self.count = 0;
        self.vec
            .drain(..)
            .enumerate()
            .filter_map(|(idx, entry)| Some((u8::try_from(idx + 1).ok()?, entry?)))
    }
}

fn index(id: u8) -> Option<usize> {
    usize::from(id).checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smallest_free_id_first() {
        let mut slots = Slots::new();
        assert_eq!(slots.free_id(255), Some(1));
        for id in 1..=4 {
            assert_eq!(slots.free_id(255), Some(id));
            slots.insert(id, id * 10);
        }
        assert_eq!(slots.len(), 4);

        assert_eq!(slots.try_remove(2), Some(20));
        assert_eq!(slots.free_id(255), Some(2));
        slots.insert(2, 21);
        assert_eq!(slots.free_id(255), Some(5));
        assert_eq!(slots.get(2), Some(&21));
    }

    #[test]
    fn exhausted_at_max() {
        let mut slots = Slots::new();
        slots.insert(1, ());
        slots.insert(2, ());
        assert_eq!(slots.free_id(2), None);
        assert_eq!(slots.free_id(3), Some(3));
        assert_eq!(Slots::<()>::new().free_id(0), None);
    }

    #[test]
    fn full_wire_range() {
        let mut slots = Slots::new();
        for id in 1..=255u8 {
            assert_eq!(slots.free_id(255), Some(id));
            slots.insert(id, ());
        }
        assert_eq!(slots.free_id(255), None);
        assert_eq!(slots.len(), 255);
    }

    #[test]
    fn id_zero_never_stored() {
        let mut slots = Slots::new();
        slots.insert(0, 'x');
        assert!(slots.is_empty());
        assert_eq!(slots.get(0), None);
        assert_eq!(slots.try_remove(0), None);
    }

    #[test]
    fn removal_trims_and_counts() {
        let mut slots = Slots::new();
        slots.insert(3, 'c');
        assert_eq!(slots.sole_id(), Some(3));
        slots.insert(1, 'a');
        assert_eq!(slots.sole_id(), None);
        assert_eq!(slots.try_remove(3), Some('c'));
        assert_eq!(slots.try_remove(3), None);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots.sole_id(), Some(1));
        if let Some(entry) = slots.get_mut(1) {
            *entry = 'b';
        }
        assert_eq!(slots.drain().collect::<Vec<_>>(), vec![(1, 'b')]);
        assert!(slots.is_empty());
    }
}
