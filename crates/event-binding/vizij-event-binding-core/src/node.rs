//! Value nodes and the graph-owned table that holds them.
//!
//! Bindings never own a node. They hold a [`NodeHandle`], a generational index
//! into a [`ValueGraph`]; removing a node bumps its slot generation so every
//! outstanding handle goes stale instead of dangling.

use serde::{Deserialize, Serialize};

/// Opaque handle to a node slot. Stale once the node is removed.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct NodeHandle {
    index: u32,
    generation: u32,
}

impl NodeHandle {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// Write capability consumed by bindings.
pub trait NodeWriter {
    /// Overwrite the node's value. Returns `false` when the handle is stale.
    fn write(&mut self, handle: NodeHandle, value: f64) -> bool;
}

/// Liveness query used to prune bindings whose node is gone.
pub trait NodeLiveness {
    fn is_alive(&self, handle: NodeHandle) -> bool;
}

/// Numeric value node: a base value plus an offset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueNode {
    pub value: f64,
    pub offset: f64,
}

impl ValueNode {
    pub fn new(value: f64) -> Self {
        Self { value, offset: 0.0 }
    }

    /// Replace the base value; the offset is kept.
    #[inline]
    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    pub fn set_offset(&mut self, offset: f64) {
        self.offset = offset;
    }

    /// Value observed by dependents.
    #[inline]
    pub fn current(&self) -> f64 {
        self.value + self.offset
    }

    /// Fold the value into the offset and zero the value.
    pub fn extract_offset(&mut self) {
        self.offset += self.value;
        self.value = 0.0;
    }

    /// Fold the offset into the value and zero the offset.
    pub fn flatten_offset(&mut self) {
        self.value += self.offset;
        self.offset = 0.0;
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<ValueNode>,
    /// Set while the handle sits in `ValueGraph::updated`.
    dirty: bool,
}

/// Arena of value nodes addressed by generational handles.
///
/// A slot whose generation counter is exhausted is retired rather than reused,
/// so a handle can never become valid again.
#[derive(Debug, Default)]
pub struct ValueGraph {
    slots: Vec<Slot>,
    free: Vec<u32>,
    retired: usize,
    updated: Vec<NodeHandle>,
}

impl ValueGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, reusing a freed slot when one exists.
    pub fn insert(&mut self, node: ValueNode) -> NodeHandle {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            slot.dirty = false;
            return NodeHandle {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
            dirty: false,
        });
        NodeHandle {
            index,
            generation: 0,
        }
    }

    /// Remove a node. Outstanding handles to it become stale.
    pub fn remove(&mut self, handle: NodeHandle) -> Option<ValueNode> {
        let slot = self.slot_mut(handle)?;
        let node = slot.node.take();
        let was_dirty = std::mem::replace(&mut slot.dirty, false);
        match slot.generation.checked_add(1) {
            Some(next) => {
                slot.generation = next;
                self.free.push(handle.index);
            }
            None => self.retired += 1,
        }
        if was_dirty {
            self.updated.retain(|h| *h != handle);
        }
        node
    }

    pub fn get(&self, handle: NodeHandle) -> Option<&ValueNode> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub fn get_mut(&mut self, handle: NodeHandle) -> Option<&mut ValueNode> {
        self.slot_mut(handle).and_then(|slot| slot.node.as_mut())
    }

    /// Current value (value + offset) of a live node.
    pub fn value(&self, handle: NodeHandle) -> Option<f64> {
        self.get(handle).map(ValueNode::current)
    }

    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len() - self.retired
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drain the handles written since the last call, in write order, without duplicates.
    pub fn take_updated(&mut self) -> Vec<NodeHandle> {
        let updated = std::mem::take(&mut self.updated);
        for handle in &updated {
            if let Some(slot) = self.slots.get_mut(handle.index as usize) {
                slot.dirty = false;
            }
        }
        updated
    }

    fn slot_mut(&mut self, handle: NodeHandle) -> Option<&mut Slot> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation && slot.node.is_some())
    }
}

impl NodeWriter for ValueGraph {
    fn write(&mut self, handle: NodeHandle, value: f64) -> bool {
        let Some(slot) = self.slot_mut(handle) else {
            return false;
        };
        if let Some(node) = slot.node.as_mut() {
            node.set_value(value);
        }
        if !std::mem::replace(&mut slot.dirty, true) {
            self.updated.push(handle);
        }
        true
    }
}

impl NodeLiveness for ValueGraph {
    fn is_alive(&self, handle: NodeHandle) -> bool {
        self.get(handle).is_some()
    }
}
