use crate::StoreError;

/// Fixed number of optional slots addressed by index.
#[derive(Debug, Clone)]
pub struct SlotPool<T> {
    name: &'static str,
    slots: Vec<Option<T>>,
}

impl<T> SlotPool<T> {
    pub fn new(name: &'static str, capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self { name, slots }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn check(&self, slot: usize) -> Result<(), StoreError> {
        if slot < self.slots.len() {
            Ok(())
        } else {
            Err(StoreError::SlotOutOfRange {
                pool: self.name,
                slot,
                capacity: self.slots.len(),
            })
        }
    }

    /// Store `value` in `slot`, returning what was there.
    pub fn insert(&mut self, slot: usize, value: T) -> Result<Option<T>, StoreError> {
        self.check(slot).inspect_err(|e| tracing::debug!(error = %e, "slot write rejected"))?;
        Ok(self.slots[slot].replace(value))
    }

    /// Store `value` at `index` wrapped into the pool, returning the slot
    /// used. The pool must have non-zero capacity.
    pub(crate) fn put_wrapping(&mut self, index: usize, value: T) -> usize {
        let slot = index % self.slots.len();
        self.slots[slot] = Some(value);
        slot
    }

    pub fn remove(&mut self, slot: usize) -> Option<T> {
        self.slots.get_mut(slot).and_then(Option::take)
    }

    pub fn get(&self, slot: usize) -> Option<&T> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut T> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    /// Occupied slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|v| (i, v)))
    }

    /// Clear every slot for which `keep` returns false.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) -> usize {
        let mut removed = 0;
        for slot in &mut self.slots {
            if slot.as_ref().is_some_and(|v| !keep(v)) {
                *slot = None;
                removed += 1;
            }
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}
