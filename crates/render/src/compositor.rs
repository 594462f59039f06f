use crate::DepthKey;

/// Which entity a draw item refers to. Indices point into the frame's
/// model table or the entity store's pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Static(usize),
    OwnProjectile(usize),
    RemoteProjectile(usize),
    Peer(usize),
    NetworkModel(usize),
}

/// An accepted entity and its depth for this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawItem {
    pub entity: EntityRef,
    pub depth: DepthKey,
}

/// Reusable far-to-near draw order.
///
/// Sized once for the worst case; clearing keeps the allocation.
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,
}

impl DrawList {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Grow once so at least `total` items fit without reallocating.
    pub fn ensure_capacity(&mut self, total: usize) {
        if let Some(extra) = total.checked_sub(self.items.len()) {
            self.items.reserve(extra);
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn push(&mut self, entity: EntityRef, depth: DepthKey) {
        if self.items.len() == self.items.capacity() {
            tracing::debug!(capacity = self.items.capacity(), "draw list grew past its sizing");
        }
        self.items.push(DrawItem { entity, depth });
    }

    /// Farthest first. Equal depths keep no particular order.
    pub fn sort(&mut self) {
        self.items.sort_unstable_by(|a, b| b.depth.cmp(&a.depth));
    }

    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_far_to_near() {
        let mut list = DrawList::with_capacity(4);
        list.push(EntityRef::Static(0), DepthKey(100));
        list.push(EntityRef::Peer(3), DepthKey(900));
        list.push(EntityRef::OwnProjectile(1), DepthKey(400));
        list.sort();
        let order: Vec<_> = list.items().iter().map(|i| i.entity).collect();
        assert_eq!(
            order,
            vec![EntityRef::Peer(3), EntityRef::OwnProjectile(1), EntityRef::Static(0)]
        );
    }

    #[test]
    fn equal_depths_keep_multiplicity() {
        let mut list = DrawList::with_capacity(4);
        list.push(EntityRef::Static(0), DepthKey(500));
        list.push(EntityRef::RemoteProjectile(7), DepthKey(500));
        list.push(EntityRef::NetworkModel(2), DepthKey(50));
        list.sort();
        let items = list.items();
        assert_eq!(items.len(), 3);
        for entity in [EntityRef::Static(0), EntityRef::RemoteProjectile(7)] {
            assert_eq!(items[..2].iter().filter(|i| i.entity == entity).count(), 1);
        }
        assert_eq!(items[2].entity, EntityRef::NetworkModel(2));
    }

    #[test]
    fn clear_keeps_allocation() {
        let mut list = DrawList::with_capacity(16);
        for i in 0..10 {
            list.push(EntityRef::Static(i), DepthKey(i as i32));
        }
        list.clear();
        assert!(list.is_empty());
        assert!(list.capacity() >= 16);
    }
}
